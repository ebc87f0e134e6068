//! # Checkout Kiosk Binary
//!
//! ## Usage
//! ```bash
//! # Built-in catalog, default config location
//! checkout-kiosk
//!
//! # Explicit config file
//! checkout-kiosk --config ./kiosk.toml
//!
//! # JSON lines for a display process
//! CHECKOUT_RENDER=json checkout-kiosk
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use checkout_kiosk::{init_tracing, run, KioskConfig};
use tracing::{error, info};

fn parse_args() -> Result<Option<PathBuf>, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config needs a path".to_string())?;
                config_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--help" | "-h" => {
                println!("Usage: checkout-kiosk [--config <PATH>]");
                println!();
                println!("Lines starting with '/' are operator commands:");
                println!("  /search [q]  /find [q]  /rec <n>  /inc <id>  /dec <id>");
                println!("  /rm <id>  /pay  /clear  /quit");
                println!("Any other line is treated as a scanned barcode.");
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(config_path)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = match parse_args() {
        Ok(path) => path,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    init_tracing();

    let config = match KioskConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return ExitCode::from(2);
        }
    };

    let code = match run(config).await {
        Ok(()) => {
            info!("Kiosk shut down cleanly");
            0
        }
        Err(e) => {
            error!(error = %e, "Kiosk stopped");
            1
        }
    };

    // The stdin reader thread may still be blocked in read(); don't join it
    std::process::exit(code)
}
