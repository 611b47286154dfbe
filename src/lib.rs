pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{FileStorage, MemoryStorage};
pub use app::Menu;
pub use config::ReservationConfig;
pub use crate::core::{
    BookingSummary, Bus, LoadPolicy, LoadReport, Passenger, RecordStorage, ReservationStore,
    SeatMap,
};
pub use utils::error::{ReservationError, Result};
