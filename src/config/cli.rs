use crate::config::toml_config::ReservationConfig;
use crate::core::record::LoadPolicy;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "bus-reservation")]
#[command(about = "Seat reservations for a single bus, kept in a flat record file")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the record file location
    #[arg(long)]
    pub record_file: Option<String>,

    #[arg(long)]
    pub bus_name: Option<String>,

    #[arg(long)]
    pub total_seats: Option<u32>,

    #[arg(long)]
    pub fare: Option<f64>,

    /// How to treat malformed lines in the record file
    #[arg(long, value_enum)]
    pub on_malformed: Option<LoadPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Show the seat map
    Seats,
    /// Book a seat
    Book {
        seat: u32,
        first_name: String,
        middle_name: String,
        last_name: String,
        contact: String,
    },
    /// Cancel a booking
    Cancel { seat: u32 },
    /// List all bookings
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Search bookings by name or contact
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the fare
    Fare,
    /// Write all bookings to a CSV file
    Export { output: String },
    /// Start the interactive menu (default)
    Menu,
}

impl CliConfig {
    /// 預設值 → TOML 檔 → 命令列參數，依序覆蓋
    pub fn resolve(&self) -> Result<ReservationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                ReservationConfig::from_file(path)?
            }
            None => ReservationConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ReservationConfig) {
        if let Some(record_file) = &self.record_file {
            config.storage.record_file = record_file.clone();
        }
        if let Some(name) = &self.bus_name {
            config.bus.name = name.clone();
        }
        if let Some(total_seats) = self.total_seats {
            config.bus.total_seats = total_seats;
        }
        if let Some(fare) = self.fare {
            config.bus.fare = fare;
        }
        if let Some(policy) = self.on_malformed {
            config.storage.on_malformed = policy;
        }
    }
}
