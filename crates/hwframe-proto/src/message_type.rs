//! Well-known message kinds.
//!
//! The framing layer carries any `u16` kind. These names cover the kinds the
//! transport itself needs plus the handful of generic replies every device
//! speaks, so logs and tools can show something better than a number.

/// Named message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    /// Reset the device's protocol state. Sent with an empty payload.
    Initialize = 0,
    /// Echo request.
    Ping = 1,
    /// Generic success reply.
    Success = 2,
    /// Generic failure reply.
    Failure = 3,
    /// Device description reply.
    Features = 17,
    /// Abort the current operation.
    Cancel = 20,
    /// Device is waiting for a button press.
    ButtonRequest = 26,
    /// Host acknowledges a button request.
    ButtonAck = 27,
    /// Ask for the device description without resetting state.
    GetFeatures = 55,
}

impl MessageType {
    /// Look up a named kind.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Initialize),
            1 => Some(Self::Ping),
            2 => Some(Self::Success),
            3 => Some(Self::Failure),
            17 => Some(Self::Features),
            20 => Some(Self::Cancel),
            26 => Some(Self::ButtonRequest),
            27 => Some(Self::ButtonAck),
            55 => Some(Self::GetFeatures),
            _ => None,
        }
    }

    /// Numeric kind.
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

impl From<MessageType> for u16 {
    fn from(kind: MessageType) -> Self {
        kind.to_u16()
    }
}
