use crate::core::record::{self, LoadPolicy};
use crate::domain::model::{BookingSummary, Bus, Passenger, Seat, SeatMap};
use crate::domain::ports::RecordStorage;
use crate::utils::error::{ReservationError, Result};
use crate::utils::validation::{validate_positive_number, validate_record_field};

/// Outcome of replaying the record file onto the seat table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: usize,
    pub out_of_range: usize,
    pub malformed: usize,
    /// Line at which reading stopped under `LoadPolicy::Halt`.
    pub halted_at: Option<usize>,
}

/// Seat table for one bus, mirrored to a `RecordStorage` after every
/// booking and cancellation.
pub struct ReservationStore<S: RecordStorage> {
    bus: Bus,
    seats: Vec<Seat>,
    storage: S,
    policy: LoadPolicy,
}

impl<S: RecordStorage> ReservationStore<S> {
    pub fn initialize(bus: Bus, storage: S) -> Result<Self> {
        Self::initialize_with_policy(bus, storage, LoadPolicy::default())
    }

    pub fn initialize_with_policy(bus: Bus, storage: S, policy: LoadPolicy) -> Result<Self> {
        validate_positive_number("total_seats", bus.total_seats, 1)?;

        let seats = vec![Seat::default(); bus.total_seats as usize];
        let mut store = Self {
            bus,
            seats,
            storage,
            policy,
        };

        let report = store.load_history()?;
        tracing::info!(
            "Loaded {} reservation(s) for {} from {}",
            report.applied,
            store.bus.name,
            store.storage.location()
        );

        Ok(store)
    }

    /// Replays persisted records onto the current table. Occupied records
    /// overwrite whatever the table holds for that seat.
    pub fn load_history(&mut self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        let Some(contents) = self.storage.load()? else {
            tracing::debug!("No reservation history at {}", self.storage.location());
            return Ok(report);
        };

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;

            let raw = match record::parse_record(line_number, line) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    report.malformed += 1;
                    match self.policy {
                        LoadPolicy::Strict => return Err(e),
                        LoadPolicy::Skip => {
                            tracing::warn!("⚠️ Skipping {}", e);
                            continue;
                        }
                        LoadPolicy::Halt => {
                            tracing::warn!("⚠️ Stopped reading reservation history: {}", e);
                            report.halted_at = Some(line_number);
                            break;
                        }
                    }
                }
            };

            let seat_number = raw.seat_number;
            let Some(passenger) = raw.into_passenger(self.bus.total_seats) else {
                tracing::debug!("Ignoring record for out-of-range seat {}", seat_number);
                report.out_of_range += 1;
                continue;
            };

            let seat = passenger.seat_number;
            tracing::debug!("Restored seat {} for {}", seat, passenger.full_name());
            self.seats[Self::index(seat)].passenger = Some(passenger);
            report.applied += 1;
        }

        Ok(report)
    }

    /// Rewrites the whole record file from the occupied seats, ascending.
    pub fn persist(&self) -> Result<()> {
        let contents = record::format_records(self.seats.iter().filter_map(|s| s.passenger.as_ref()));

        self.storage
            .save(&contents)
            .map_err(|source| {
                let location = self.storage.location();
                tracing::error!("❌ Failed to persist reservations to {}: {}", location, source);
                ReservationError::PersistenceFailure { location, source }
            })
    }

    pub fn book_seat(&mut self, seat: u32, mut passenger: Passenger) -> Result<()> {
        self.check_seat(seat)?;

        if self.is_occupied(seat) {
            return Err(ReservationError::SeatAlreadyBooked { seat });
        }

        validate_record_field("first name", &passenger.first_name)?;
        validate_record_field("middle name", &passenger.middle_name)?;
        validate_record_field("last name", &passenger.last_name)?;
        validate_record_field("contact", &passenger.contact)?;

        if passenger.seat_number != seat {
            tracing::debug!(
                "Rebinding passenger from seat {} to booked seat {}",
                passenger.seat_number,
                seat
            );
            passenger.seat_number = seat;
        }

        let index = Self::index(seat);
        self.seats[index].passenger = Some(passenger);

        if let Err(e) = self.persist() {
            // 寫檔失敗時回滾，記憶體與檔案保持一致
            self.seats[index].passenger = None;
            return Err(e);
        }

        tracing::info!("✅ Seat {} booked", seat);
        Ok(())
    }

    /// Frees a seat and returns the passenger that held it.
    pub fn cancel_seat(&mut self, seat: u32) -> Result<Passenger> {
        self.check_seat(seat)?;

        let index = Self::index(seat);
        let Some(passenger) = self.seats[index].passenger.take() else {
            return Err(ReservationError::SeatAlreadyVacant { seat });
        };

        if let Err(e) = self.persist() {
            self.seats[index].passenger = Some(passenger);
            return Err(e);
        }

        tracing::info!("✅ Seat {} canceled", seat);
        Ok(passenger)
    }

    pub fn view_seats(&self) -> SeatMap {
        SeatMap {
            bus_name: self.bus.name.clone(),
            occupied: self.seats.iter().map(Seat::is_occupied).collect(),
        }
    }

    pub fn list_bookings(&self) -> Vec<BookingSummary> {
        self.passengers().map(BookingSummary::from).collect()
    }

    pub fn search_passengers(&self, query: &str) -> Vec<BookingSummary> {
        self.passengers()
            .filter(|p| p.matches(query))
            .map(BookingSummary::from)
            .collect()
    }

    pub fn fare(&self) -> f64 {
        self.bus.fare
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_occupied(&self, seat: u32) -> bool {
        self.passenger(seat).is_some()
    }

    pub fn passenger(&self, seat: u32) -> Option<&Passenger> {
        if !self.bus.contains_seat(seat) {
            return None;
        }
        self.seats[Self::index(seat)].passenger.as_ref()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn available_seats(&self) -> Vec<u32> {
        (1..=self.bus.total_seats)
            .filter(|&seat| !self.is_occupied(seat))
            .collect()
    }

    fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.seats.iter().filter_map(|s| s.passenger.as_ref())
    }

    fn check_seat(&self, seat: u32) -> Result<()> {
        if self.bus.contains_seat(seat) {
            Ok(())
        } else {
            Err(ReservationError::InvalidSeatNumber {
                seat,
                total_seats: self.bus.total_seats,
            })
        }
    }

    fn index(seat: u32) -> usize {
        (seat - 1) as usize
    }
}
