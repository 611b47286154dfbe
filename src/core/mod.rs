pub mod export;
pub mod record;
pub mod store;

pub use crate::domain::model::{BookingSummary, Bus, Passenger, Seat, SeatMap};
pub use crate::domain::ports::RecordStorage;
pub use crate::utils::error::Result;
pub use record::LoadPolicy;
pub use store::{LoadReport, ReservationStore};
