//! Periodic reading example
//!
//! Configures the sensor once, then reports lux and proximity at a fixed
//! interval. A failed read is reported for that tick and polling continues.

#[cfg(target_os = "linux")]
use clap::Parser;
#[cfg(target_os = "linux")]
use embedded_hal::delay::DelayNs;
#[cfg(target_os = "linux")]
use linux_embedded_hal::{Delay, I2cdev};
#[cfg(target_os = "linux")]
use tmd2772::Tmd2772;
#[cfg(target_os = "linux")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(target_os = "linux")]
#[derive(Parser)]
#[command(name = "poll")]
#[command(about = "Poll a TMD2772 and print lux and proximity", long_about = None)]
struct Args {
    /// I2C bus device
    #[arg(short, long, default_value = "/dev/i2c-1", env = "TMD2772_BUS")]
    bus: String,

    /// Time between readings in milliseconds
    #[arg(short, long, default_value_t = 300)]
    interval_ms: u32,

    /// Stop after this many readings
    #[arg(short, long)]
    count: Option<u64>,
}

#[cfg(target_os = "linux")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
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

    let mut delay = Delay;
    let mut sensor = Tmd2772::new_with_delay(i2c, Delay);
    sensor.configure_and_settle()?;
    tracing::info!(
        interval_ms = args.interval_ms,
        cpl = sensor.calibration().cpl(),
        "sensor configured, polling"
    );

    let mut reading_count = 0u64;
    while args.count.map_or(true, |count| reading_count < count) {
        reading_count += 1;
        match sensor.measure() {
            Ok(measurement) => println!("{}", measurement),
            Err(e) => {
                tracing::warn!(reading = reading_count, error = %e, "read failed");
                println!("Error : {}", e);
            }
        }
        delay.delay_ms(args.interval_ms);
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This example requires Linux with I2C support.");
    println!("Please adapt the I2C initialization for your platform.");
}
