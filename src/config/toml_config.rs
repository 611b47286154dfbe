use crate::core::record::LoadPolicy;
use crate::domain::model::Bus;
use crate::utils::error::{ReservationError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_path, validate_positive_number,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BUS_NAME: &str = "Express Bus";
pub const DEFAULT_TOTAL_SEATS: u32 = 20;
pub const DEFAULT_FARE: f64 = 15.0;
pub const DEFAULT_RECORD_FILE: &str = "reservation_history.txt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationConfig {
    pub bus: BusConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub name: String,
    pub total_seats: u32,
    pub fare: f64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BUS_NAME.to_string(),
            total_seats: DEFAULT_TOTAL_SEATS,
            fare: DEFAULT_FARE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub record_file: String,
    pub on_malformed: LoadPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_file: DEFAULT_RECORD_FILE.to_string(),
            on_malformed: LoadPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl ReservationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ReservationError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReservationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RECORD_DIR})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReservationError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_bus(&self) -> Bus {
        Bus::new(self.bus.name.clone(), self.bus.total_seats, self.bus.fare)
    }
}

impl Validate for ReservationConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("bus.name", &self.bus.name)?;
        validate_positive_number("bus.total_seats", self.bus.total_seats, 1)?;
        validate_non_negative("bus.fare", self.bus.fare)?;
        validate_path("storage.record_file", &self.storage.record_file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReservationConfig::default();
        assert_eq!(config.bus.name, "Express Bus");
        assert_eq!(config.bus.total_seats, 20);
        assert_eq!(config.bus.fare, 15.0);
        assert_eq!(config.storage.record_file, "reservation_history.txt");
        assert_eq!(config.storage.on_malformed, LoadPolicy::Halt);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[bus]
name = "Night Liner"
total_seats = 40
fare = 22.5

[storage]
record_file = "data/night.txt"
on_malformed = "skip"

[logging]
format = "json"
"#;
        let config = ReservationConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.bus.name, "Night Liner");
        assert_eq!(config.bus.total_seats, 40);
        assert_eq!(config.bus.fare, 22.5);
        assert_eq!(config.storage.record_file, "data/night.txt");
        assert_eq!(config.storage.on_malformed, LoadPolicy::Skip);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = ReservationConfig::from_toml_str("[bus]\ntotal_seats = 30\n").unwrap();
        assert_eq!(config.bus.total_seats, 30);
        assert_eq!(config.bus.name, "Express Bus");
        assert_eq!(config.storage.record_file, "reservation_history.txt");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BUS_RESERVATION_TEST_DIR", "/tmp/buses");
        let config = ReservationConfig::from_toml_str(
            "[storage]\nrecord_file = \"${BUS_RESERVATION_TEST_DIR}/history.txt\"\n",
        )
        .unwrap();
        assert_eq!(config.storage.record_file, "/tmp/buses/history.txt");
    }

    #[test]
    fn test_unknown_env_var_is_left_verbatim() {
        let config = ReservationConfig::from_toml_str(
            "[bus]\nname = \"${BUS_RESERVATION_SURELY_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(config.bus.name, "${BUS_RESERVATION_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut config = ReservationConfig::default();
        config.bus.total_seats = 0;
        assert!(config.validate().is_err());

        let mut config = ReservationConfig::default();
        config.bus.fare = -1.0;
        assert!(config.validate().is_err());

        let mut config = ReservationConfig::default();
        config.storage.record_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = ReservationConfig::from_toml_str("[bus\nname = ");
        assert!(matches!(
            result,
            Err(ReservationError::ConfigValidationError { .. })
        ));
    }
}
