//! One-shot reading example
//!
//! This example demonstrates how to:
//! - Open the Linux I2C bus
//! - Apply the start-up configuration
//! - Wait for the sensor to settle
//! - Read one sample and report lux and proximity

#[cfg(target_os = "linux")]
use clap::Parser;
#[cfg(target_os = "linux")]
use linux_embedded_hal::{Delay, I2cdev};
#[cfg(target_os = "linux")]
use tmd2772::Tmd2772;
#[cfg(target_os = "linux")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(target_os = "linux")]
#[derive(Parser)]
#[command(name = "read_once")]
#[command(about = "Read one TMD2772 sample and print lux and proximity", long_about = None)]
struct Args {
    /// I2C bus device
    #[arg(short, long, default_value = "/dev/i2c-1", env = "TMD2772_BUS")]
    bus: String,
}

#[cfg(target_os = "linux")]
fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let i2c = match I2cdev::new(&args.bus) {
        Ok(i2c) => i2c,
        Err(e) => {
            tracing::error!(bus = %args.bus, error = %e, "failed to open the bus");
            std::process::exit(1);
        }
    };

    let mut sensor = Tmd2772::new_with_delay(i2c, Delay);

    tracing::info!(bus = %args.bus, "configuring TMD2772");
    if let Err(e) = sensor.configure_and_settle() {
        tracing::error!(error = %e, "configuration failed");
        std::process::exit(1);
    }

    match sensor.measure() {
        Ok(measurement) => println!("{}", measurement),
        Err(e) => {
            tracing::debug!(error = ?e, "sample read failed");
            println!("Error : {}", e);
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This example requires Linux with I2C support.");
    println!("Please adapt the I2C initialization for your platform.");
}
