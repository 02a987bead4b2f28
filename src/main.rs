// src/main.rs
//! NMEA Relay - decode GPS receiver output into JSON records

use clap::Parser;
use nmea_relay::{config::RelayConfig, logging, relay, JsonLineSink, Relay, RelayMode};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "nmea-relay", version, about)]
struct Args {
    /// Serial port of the GPS receiver
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Read sentences from a file instead of a serial port ("-" for stdin)
    #[arg(short, long, conflicts_with = "port")]
    input: Option<PathBuf>,

    /// Which records to publish
    #[arg(short, long, value_enum)]
    mode: Option<RelayMode>,

    /// Device identifier stamped on every record
    #[arg(long)]
    device_id: Option<String>,

    /// Route identifier stamped on combined records
    #[arg(long)]
    route_id: Option<u32>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbose);

    if args.list_ports {
        relay::list_serial_ports()?;
        return Ok(());
    }

    let mut config = RelayConfig::load().unwrap_or_else(|e| {
        warn!("Using default configuration: {}", e);
        RelayConfig::default()
    });
    apply_args(&mut config, &args);

    if args.save_config {
        config.save()?;
        info!("Saved configuration to {}", RelayConfig::get_config_path()?.display());
    }

    let reader = open_input(&config, args.input.as_ref()).await?;
    let running = Arc::new(AtomicBool::new(true));
    let mut relay =
        Relay::new_with_shared(config.identity.clone(), config.mode, Arc::clone(&running));
    let mut sink = JsonLineSink::stdout();

    // Handle Ctrl+C
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            running.store(false, Ordering::Relaxed);
        }
    });

    relay.run(reader, &mut sink).await?;
    Ok(())
}

fn apply_args(config: &mut RelayConfig, args: &Args) {
    if let Some(port) = &args.port {
        let baud = args.baud.unwrap_or(config.serial_baudrate);
        config.update_serial(port.clone(), baud);
    } else if let Some(baud) = args.baud {
        config.serial_baudrate = baud;
    }

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    config.update_identity(args.device_id.clone(), args.route_id);
}

async fn open_input(
    config: &RelayConfig,
    input: Option<&PathBuf>,
) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match (input, &config.serial_port) {
        (Some(path), _) if path.as_os_str() == "-" => {
            info!("Reading sentences from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
        (Some(path), _) => {
            info!("Reading sentences from {}", path.display());
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(BufReader::new(file)))
        }
        (None, Some(port)) => {
            let serial = relay::open_serial(port, config.serial_baudrate)?;
            Ok(Box::new(BufReader::new(serial)))
        }
        (None, None) => {
            info!("No serial port configured, reading sentences from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
    }
}
