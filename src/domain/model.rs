use serde::{Deserialize, Serialize};
use std::fmt;

/// 每排座位數，座位圖固定以 5 個為一排顯示
pub const SEATS_PER_ROW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub total_seats: u32,
    pub fare: f64,
}

impl Bus {
    pub fn new(name: impl Into<String>, total_seats: u32, fare: f64) -> Self {
        Self {
            name: name.into(),
            total_seats,
            fare,
        }
    }

    pub fn contains_seat(&self, seat: u32) -> bool {
        (1..=self.total_seats).contains(&seat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub contact: String,
    pub seat_number: u32,
}

impl Passenger {
    pub fn new(
        first_name: impl Into<String>,
        middle_name: impl Into<String>,
        last_name: impl Into<String>,
        contact: impl Into<String>,
        seat_number: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            middle_name: middle_name.into(),
            last_name: last_name.into(),
            contact: contact.into(),
            seat_number,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
    }

    /// 姓名或聯絡方式包含查詢字串（區分大小寫）
    pub fn matches(&self, query: &str) -> bool {
        self.full_name().contains(query) || self.contact.contains(query)
    }
}

/// A seat is occupied exactly when it holds a passenger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seat {
    pub passenger: Option<Passenger>,
}

impl Seat {
    pub fn is_occupied(&self) -> bool {
        self.passenger.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub seat_number: u32,
    pub full_name: String,
    pub contact: String,
}

impl From<&Passenger> for BookingSummary {
    fn from(passenger: &Passenger) -> Self {
        Self {
            seat_number: passenger.seat_number,
            full_name: passenger.full_name(),
            contact: passenger.contact.clone(),
        }
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seat {} booked by {} (Contact: {})",
            self.seat_number, self.full_name, self.contact
        )
    }
}

/// Occupancy snapshot, index 0 is seat 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    pub bus_name: String,
    pub occupied: Vec<bool>,
}

impl SeatMap {
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.occupied.chunks(SEATS_PER_ROW)
    }
}

impl fmt::Display for SeatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seating arrangement for bus: {}", self.bus_name)?;
        for row in self.rows() {
            for &occupied in row {
                write!(f, "{}", if occupied { "[X] " } else { "[ ] " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_and_matching() {
        let passenger = Passenger::new("Ann", "B", "Lee", "555-1000", 5);
        assert_eq!(passenger.full_name(), "Ann B Lee");
        assert!(passenger.matches("Lee"));
        assert!(passenger.matches("n B L"));
        assert!(passenger.matches("1000"));
        assert!(!passenger.matches("lee"));
        assert!(!passenger.matches("999"));
    }

    #[test]
    fn test_summary_display() {
        let passenger = Passenger::new("Ann", "B", "Lee", "555-1000", 5);
        assert_eq!(
            BookingSummary::from(&passenger).to_string(),
            "Seat 5 booked by Ann B Lee (Contact: 555-1000)"
        );
    }

    #[test]
    fn test_seat_map_rows_of_five() {
        let mut occupied = vec![false; 12];
        occupied[0] = true;
        occupied[6] = true;
        let map = SeatMap {
            bus_name: "Express Bus".to_string(),
            occupied,
        };

        let rows: Vec<&[bool]> = map.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 5);
        assert_eq!(rows[2].len(), 2);

        let rendered = map.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Seating arrangement for bus: Express Bus");
        assert_eq!(lines[1], "[X] [ ] [ ] [ ] [ ] ");
        assert_eq!(lines[2], "[ ] [X] [ ] [ ] [ ] ");
        assert_eq!(lines[3], "[ ] [ ] ");
    }

    #[test]
    fn test_bus_seat_range() {
        let bus = Bus::new("Express Bus", 20, 15.0);
        assert!(!bus.contains_seat(0));
        assert!(bus.contains_seat(1));
        assert!(bus.contains_seat(20));
        assert!(!bus.contains_seat(21));
    }
}
