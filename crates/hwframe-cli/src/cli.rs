//! Command-line arguments.

use std::{net::SocketAddr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use hwframe_core::{AcquireConfig, DeviceClass};

/// Talk to a hardware wallet over its report framing.
#[derive(Debug, Parser)]
#[command(name = "hwframe", version)]
pub struct Cli {
    /// Which kind of device to acquire
    #[arg(long, value_enum, default_value_t = DeviceArg::Usb, global = true)]
    pub device: DeviceArg,

    /// Emulator UDP endpoint
    #[arg(long, value_name = "ADDR", default_value_t = AcquireConfig::DEFAULT_EMULATOR_ADDR, global = true)]
    pub emulator_addr: SocketAddr,

    /// Total USB connect attempts
    #[arg(long, value_name = "N", default_value_t = 3, global = true)]
    pub connect_attempts: u32,

    /// Delay between USB connect attempts
    #[arg(long, value_name = "MS", default_value_t = 100, global = true)]
    pub retry_delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Acquisition settings from the flags.
    pub fn config(&self) -> AcquireConfig {
        AcquireConfig {
            emulator_addr: self.emulator_addr,
            connect_attempts: self.connect_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Device class selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    /// Software emulator over UDP
    Emulator,
    /// Physical device over WebUSB or HID
    Usb,
}

impl From<DeviceArg> for DeviceClass {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Emulator => DeviceClass::Emulator,
            DeviceArg::Usb => DeviceClass::Usb,
        }
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List reachable devices on every bus
    List,
    /// Send the Initialize handshake
    Init,
    /// Send a message and print the reply
    Call(MessageArgs),
    /// Print the reports a message encodes to, without opening a device
    Frames(MessageArgs),
}

/// A raw message given on the command line.
#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Numeric message type
    #[arg(long)]
    pub kind: u16,

    /// Payload as hex
    #[arg(long, default_value = "")]
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_acquire_config() {
        let cli = Cli::try_parse_from(["hwframe", "init"]).unwrap();

        assert_eq!(cli.device, DeviceArg::Usb);
        assert_eq!(cli.config(), AcquireConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "hwframe",
            "call",
            "--kind",
            "55",
            "--device",
            "emulator",
            "--emulator-addr",
            "127.0.0.1:9000",
            "--connect-attempts",
            "5",
            "--retry-delay-ms",
            "20",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(DeviceClass::from(cli.device), DeviceClass::Emulator);
        assert_eq!(config.emulator_addr.port(), 9000);
        assert_eq!(config.connect_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(20));
        assert!(matches!(cli.command, Command::Call(MessageArgs { kind: 55, ref payload }) if payload.is_empty()));
    }

    #[test]
    fn kind_is_required() {
        assert!(Cli::try_parse_from(["hwframe", "frames", "--payload", "00"]).is_err());
    }
}
