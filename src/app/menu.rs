use crate::core::{Passenger, RecordStorage, ReservationStore};
use crate::utils::error::{ErrorSeverity, ReservationError, Result};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ViewSeats,
    Book,
    Cancel,
    Summary,
    Search,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ViewSeats),
            "2" => Some(Self::Book),
            "3" => Some(Self::Cancel),
            "4" => Some(Self::Summary),
            "5" => Some(Self::Search),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Text menu driving a `ReservationStore`. All store errors are rendered
/// for the operator and the loop keeps going.
pub struct Menu<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run<S: RecordStorage>(&mut self, store: &mut ReservationStore<S>) -> Result<()> {
        loop {
            writeln!(self.output, "\n--- Bus Reservation System ---")?;
            writeln!(self.output, "1. View Available Seats")?;
            writeln!(self.output, "2. Book a Seat")?;
            writeln!(self.output, "3. Cancel a Booking")?;
            writeln!(self.output, "4. View Booking Summary")?;
            writeln!(self.output, "5. Search for a Passenger")?;
            writeln!(self.output, "6. Exit")?;

            // 輸入結束（EOF）視同離開
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::ViewSeats) => {
                    write!(self.output, "\n{}", store.view_seats())?;
                }
                Some(MenuChoice::Book) => {
                    if !self.book(store)? {
                        break;
                    }
                }
                Some(MenuChoice::Cancel) => {
                    if !self.cancel(store)? {
                        break;
                    }
                }
                Some(MenuChoice::Summary) => {
                    writeln!(self.output, "\n--- Booking Summary ---")?;
                    for booking in store.list_bookings() {
                        writeln!(self.output, "{}", booking)?;
                    }
                }
                Some(MenuChoice::Search) => {
                    let Some(query) = self.prompt_exact("Enter the name or contact of the passenger to search: ")?
                    else {
                        break;
                    };
                    writeln!(self.output, "\n--- Search Results ---")?;
                    let matches = store.search_passengers(&query);
                    if matches.is_empty() {
                        self.report(&ReservationError::NoMatchesFound { query })?;
                    }
                    for booking in matches {
                        writeln!(self.output, "{}", booking)?;
                    }
                }
                Some(MenuChoice::Exit) => {
                    writeln!(
                        self.output,
                        "Thank you for using the Bus Reservation System. Goodbye!"
                    )?;
                    break;
                }
                None => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Returns `false` when input ran out mid-dialog.
    fn book<S: RecordStorage>(&mut self, store: &mut ReservationStore<S>) -> Result<bool> {
        let Some(seat) = self.prompt("Enter the seat number you want to book: ")? else {
            return Ok(false);
        };
        let Some(seat) = self.parse_seat(&seat)? else {
            return Ok(true);
        };

        let mut fields = Vec::with_capacity(4);
        for prompt in [
            "\nEnter your first name: ",
            "Enter your middle name: ",
            "Enter your last name: ",
            "Enter your contact information: ",
        ] {
            match self.prompt(prompt)? {
                Some(value) => fields.push(value),
                None => return Ok(false),
            }
        }
        let [first_name, middle_name, last_name, contact]: [String; 4] = match fields.try_into() {
            Ok(fields) => fields,
            Err(_) => return Ok(false),
        };

        let passenger = Passenger::new(first_name, middle_name, last_name, contact, seat);
        match store.book_seat(seat, passenger) {
            Ok(()) => {
                writeln!(self.output, "Seat {} successfully booked!", seat)?;
                writeln!(self.output, "Fare: ${:.2}", store.fare())?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn cancel<S: RecordStorage>(&mut self, store: &mut ReservationStore<S>) -> Result<bool> {
        let Some(seat) = self.prompt("Enter the seat number you want to cancel: ")? else {
            return Ok(false);
        };
        let Some(seat) = self.parse_seat(&seat)? else {
            return Ok(true);
        };

        match store.cancel_seat(seat) {
            Ok(_) => writeln!(self.output, "Seat {} has been successfully canceled.", seat)?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn parse_seat(&mut self, input: &str) -> Result<Option<u32>> {
        match input.parse::<u32>() {
            Ok(seat) => Ok(Some(seat)),
            Err(_) => {
                writeln!(self.output, "Invalid seat number. Please try again.")?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, error: &ReservationError) -> Result<()> {
        if error.severity() >= ErrorSeverity::Critical {
            tracing::error!("❌ {} (Category: {:?})", error, error.category());
        } else {
            tracing::debug!("{}", error);
        }
        writeln!(self.output, "{}", error.user_friendly_message())?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        Ok(self.prompt_exact(text)?.map(|line| line.trim().to_string()))
    }

    /// Keeps the answer as typed, only the line terminator is removed.
    fn prompt_exact(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::core::Bus;

    fn run_script(store: &mut ReservationStore<MemoryStorage>, script: &str) -> String {
        let mut menu = Menu::new(script.as_bytes(), Vec::new());
        menu.run(store).unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    fn new_store() -> ReservationStore<MemoryStorage> {
        ReservationStore::initialize(Bus::new("Express Bus", 20, 15.0), MemoryStorage::new()).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::Book));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("book"), None);
    }

    #[test]
    fn test_book_search_cancel_session() {
        let mut store = new_store();
        let output = run_script(
            &mut store,
            "2\n5\nAnn\nB\nLee\n555-1000\n5\nLee\n3\n5\n3\n5\n6\n",
        );

        assert!(output.contains("Seat 5 successfully booked!"));
        assert!(output.contains("Fare: $15.00"));
        assert!(output.contains("Seat 5 booked by Ann B Lee (Contact: 555-1000)"));
        assert!(output.contains("Seat 5 has been successfully canceled."));
        assert!(output.contains("Seat 5 is already vacant."));
        assert!(output.contains("Goodbye!"));
        assert_eq!(store.occupied_count(), 0);
    }

    #[test]
    fn test_double_booking_is_reported() {
        let mut store = new_store();
        let output = run_script(
            &mut store,
            "2\n1\nAnn\nB\nLee\n555\n2\n1\nTom\nJ\nPark\n777\n4\n",
        );
        assert!(output.contains("Seat 1 is already booked. Please choose another."));
        assert!(output.contains("Seat 1 booked by Ann B Lee (Contact: 555)"));
        assert!(!output.contains("Tom J Park"));
    }

    #[test]
    fn test_invalid_inputs_keep_the_loop_running() {
        let mut store = new_store();
        let output = run_script(&mut store, "9\n2\nabc\n3\n21\n5\nnobody\n1\n6\n");

        assert!(output.contains("Invalid choice. Please try again."));
        assert_eq!(output.matches("Invalid seat number. Please try again.").count(), 2);
        assert!(output.contains("No passengers found with the given details."));
        assert!(output.contains("Seating arrangement for bus: Express Bus"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_search_query_is_matched_as_typed() {
        let mut store = new_store();
        store
            .book_seat(5, Passenger::new("Ann", "B", "Lee", "555-1000", 5))
            .unwrap();
        store
            .book_seat(6, Passenger::new("Bob", "K", "Ray", "555-2000", 6))
            .unwrap();

        // " B " 只出現在 Ann B Lee 的全名中
        let output = run_script(&mut store, "5\n B \r\n6\n");
        assert!(output.contains("Seat 5 booked by Ann B Lee (Contact: 555-1000)"));
        assert!(!output.contains("Seat 6 booked by"));

        let output = run_script(&mut store, "5\nLee \n6\n");
        assert!(output.contains("No passengers found with the given details."));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let mut store = new_store();
        let output = run_script(&mut store, "2\n3\nAnn\n");
        assert!(!output.contains("successfully booked"));
        assert_eq!(store.occupied_count(), 0);
    }
}
