//! Subcommand implementations.
//!
//! Every command writes its results to the given writer and logs through
//! `tracing`, so tests can capture output without a terminal.

use std::io::{self, Write};

use hwframe_core::{Bus, BusSet, DeviceClass, Message, Platform};
use hwframe_transport::{EmulatorBus, SystemPlatform, system_client};
use thiserror::Error;
use tracing::{info, warn};

use crate::cli::{Cli, Command, MessageArgs};

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// Device access or exchange failed.
    #[error(transparent)]
    Device(#[from] hwframe_core::Error),

    /// `--payload` is not valid hex.
    #[error("invalid payload hex: {0}")]
    Payload(#[from] hex::FromHexError),

    /// Writing output failed.
    #[error("writing output: {0}")]
    Output(#[from] io::Error),
}

/// Run the parsed command.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let class = DeviceClass::from(cli.device);

    match &cli.command {
        Command::List => list(&SystemPlatform, cli, out),
        Command::Init => {
            system_client(class, cli.config()).initialize()?;
            info!(%class, "initialized");
            Ok(())
        },
        Command::Call(args) => {
            let reply = system_client(class, cli.config()).call(&message(args)?)?;
            print_message(&reply, out)
        },
        Command::Frames(args) => frames(&message(args)?, out),
    }
}

fn message(args: &MessageArgs) -> Result<Message, CliError> {
    Ok(Message::new(args.kind, hex::decode(args.payload.trim())?))
}

/// List devices on every bus that initializes, plus the emulator endpoint.
///
/// The emulator speaks UDP, so its entry is listed whether or not anything
/// is listening there.
fn list(platform: &impl Platform, cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mut buses = BusSet::default();
    for bus in [platform.webusb(), platform.hid()] {
        match bus {
            Ok(bus) => buses.push(bus),
            Err(err) => warn!(error = %err, "skipping bus"),
        }
    }
    buses.push(Box::new(EmulatorBus::new(cli.emulator_addr)));

    for info in buses.enumerate(0, 0)? {
        writeln!(out, "{}\t{:04x}:{:04x}", info.path, info.vendor_id, info.product_id)?;
    }
    Ok(())
}

fn frames(message: &Message, out: &mut impl Write) -> Result<(), CliError> {
    for report in message.to_reports() {
        writeln!(out, "{}", hex::encode(report.as_bytes()))?;
    }
    Ok(())
}

fn print_message(message: &Message, out: &mut impl Write) -> Result<(), CliError> {
    match message.message_type() {
        Some(known) => write!(out, "{} ({known:?})", message.kind)?,
        None => write!(out, "{}", message.kind)?,
    }
    writeln!(out, " {}", hex::encode(&message.payload))?;
    Ok(())
}
