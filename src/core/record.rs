use crate::domain::model::Passenger;
use crate::utils::error::{ReservationError, Result};
use serde::{Deserialize, Serialize};

/// firstName middleName lastName contact seatNumber
const FIELD_COUNT: usize = 5;

/// How `load_history` reacts to a line it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Stop at the first malformed line, keeping what was already applied.
    #[default]
    Halt,
    /// Skip the malformed line and keep reading.
    Skip,
    /// Refuse to load.
    Strict,
}

/// One parsed line. The seat number is kept signed so that out-of-range
/// values (including negative ones) can be told apart from unparsable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub contact: String,
    pub seat_number: i64,
}

impl RawRecord {
    /// Returns the passenger when the seat lies in `[1, total_seats]`.
    pub fn into_passenger(self, total_seats: u32) -> Option<Passenger> {
        let seat = u32::try_from(self.seat_number).ok()?;
        if seat == 0 || seat > total_seats {
            return None;
        }
        Some(Passenger::new(
            self.first_name,
            self.middle_name,
            self.last_name,
            self.contact,
            seat,
        ))
    }
}

/// Parses one line of the record file. Blank lines yield `Ok(None)`.
/// `line_number` is 1-based and only used for error reporting.
pub fn parse_record(line_number: usize, line: &str) -> Result<Option<RawRecord>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    if fields.len() != FIELD_COUNT {
        return Err(ReservationError::MalformedRecord {
            line: line_number,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }

    let seat_number = fields[4]
        .parse::<i64>()
        .map_err(|e| ReservationError::MalformedRecord {
            line: line_number,
            reason: format!("seat number '{}' is not a valid number: {}", fields[4], e),
        })?;

    Ok(Some(RawRecord {
        first_name: fields[0].to_string(),
        middle_name: fields[1].to_string(),
        last_name: fields[2].to_string(),
        contact: fields[3].to_string(),
        seat_number,
    }))
}

pub fn format_record(passenger: &Passenger) -> String {
    format!(
        "{} {} {} {} {}",
        passenger.first_name,
        passenger.middle_name,
        passenger.last_name,
        passenger.contact,
        passenger.seat_number
    )
}

/// Renders the whole file, one newline-terminated record per passenger.
pub fn format_records<'a>(passengers: impl IntoIterator<Item = &'a Passenger>) -> String {
    passengers
        .into_iter()
        .map(|p| format_record(p) + "\n")
        .collect()
}
