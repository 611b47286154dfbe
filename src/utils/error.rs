use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Invalid seat number: {seat} (valid range is 1-{total_seats})")]
    InvalidSeatNumber { seat: u32, total_seats: u32 },

    #[error("Seat {seat} is already booked")]
    SeatAlreadyBooked { seat: u32 },

    #[error("Seat {seat} is already vacant")]
    SeatAlreadyVacant { seat: u32 },

    #[error("No passengers found matching '{query}'")]
    NoMatchesFound { query: String },

    #[error("Invalid passenger {field} '{value}': {reason}")]
    InvalidPassenger {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Failed to persist reservations to {location}: {source}")]
    PersistenceFailure {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Booking,
    Input,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReservationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SeatAlreadyBooked { .. }
            | Self::SeatAlreadyVacant { .. }
            | Self::NoMatchesFound { .. } => ErrorCategory::Booking,
            Self::InvalidSeatNumber { .. } | Self::InvalidPassenger { .. } => ErrorCategory::Input,
            Self::MalformedRecord { .. } | Self::PersistenceFailure { .. } | Self::CsvError(_) => {
                ErrorCategory::Persistence
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 空結果只是提示
            Self::NoMatchesFound { .. } => ErrorSeverity::Low,
            Self::InvalidSeatNumber { .. }
            | Self::SeatAlreadyBooked { .. }
            | Self::SeatAlreadyVacant { .. }
            | Self::InvalidPassenger { .. } => ErrorSeverity::Medium,
            Self::MalformedRecord { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::PersistenceFailure { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidSeatNumber { .. } => "Invalid seat number. Please try again.".to_string(),
            Self::SeatAlreadyBooked { seat } => {
                format!("Seat {} is already booked. Please choose another.", seat)
            }
            Self::SeatAlreadyVacant { seat } => format!("Seat {} is already vacant.", seat),
            Self::NoMatchesFound { .. } => "No passengers found with the given details.".to_string(),
            Self::InvalidPassenger { field, reason, .. } => {
                format!("The {} you entered cannot be used: {}", field, reason)
            }
            Self::MalformedRecord { line, .. } => {
                format!("The reservation history file is damaged at line {}.", line)
            }
            Self::PersistenceFailure { location, .. } => {
                format!("Could not save reservations to {}. No changes were made.", location)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Booking => "Use the seat map or the booking summary to pick another seat",
            ErrorCategory::Input => "Check the seat number and passenger details, names must be single words",
            ErrorCategory::Persistence => {
                "Check that the record file is writable and well-formed, or use on_malformed = \"skip\""
            }
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReservationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_errors_are_not_fatal() {
        let err = ReservationError::SeatAlreadyBooked { seat: 3 };
        assert_eq!(err.category(), ErrorCategory::Booking);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(
            err.user_friendly_message(),
            "Seat 3 is already booked. Please choose another."
        );
    }

    #[test]
    fn test_no_matches_is_low_severity() {
        let err = ReservationError::NoMatchesFound {
            query: "999".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_persistence_failure_is_critical() {
        let err = ReservationError::PersistenceFailure {
            location: "history.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("history.txt"));
    }
}
