use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;
use std::str::FromStr;
use dotenv::var;
use serde::Deserialize;
use thiserror::Error;
use charlcd_gpio::lcd::hd44780::driver::CharacterSize;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("missing variable {0}")]
    Missing(&'static str),
    #[error("invalid number in {0}: {1:?}")]
    InvalidNumber(&'static str, String),
    #[error("expected 4 data pins, got {0}")]
    InvalidPinCount(usize),
    #[error("unknown backend {0:?}, expected \"gpiod\" or \"raw\"")]
    UnknownBackend(String),
}

#[derive(Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Linux GPIO character device.
    Gpiod,
    /// Memory-mapped registers through `/dev/gpiomem`.
    #[default]
    Raw,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpiod" => Ok(Backend::Gpiod),
            "raw" => Ok(Backend::Raw),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct DemoConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_chip")]
    pub chip: String,
    pub pin_rs: usize,
    pub pin_e: usize,
    /// D4..D7
    pub pins_data: [usize; 4],
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default = "default_rows")]
    pub rows: u8,
    /// 0 for 5x8, 1 for 5x10
    #[serde(default)]
    pub font: u8,
}

fn default_chip() -> String {
    "/dev/gpiochip0".to_string()
}

fn default_columns() -> u8 {
    16
}

fn default_rows() -> u8 {
    2
}

pub fn parse_pin_bus(pin_str: &str) -> Result<[usize; 4], ConfigError> {
    let pins = pin_str
        .split([',', ' ', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ConfigError::InvalidNumber("CHARLCD_PINS_DATA", s.to_string()))
        })
        .collect::<Result<Vec<usize>, _>>()?;
    let count = pins.len();
    pins.try_into().map_err(|_| ConfigError::InvalidPinCount(count))
}

impl DemoConfig {
    pub fn character_size(&self) -> CharacterSize {
        CharacterSize::from(self.font)
    }

    /// Loads the JSON file named by `CONFIG_FILE` (`charlcd.json` by default) if it exists, and the
    /// `CHARLCD_*` environment variables otherwise.
    pub fn load() -> eyre::Result<Self> {
        let config_str = var_os("CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("charlcd.json"));
        let config_path = Path::new(config_str);
        if config_path.exists() {
            let file = std::fs::File::open(config_path)?;
            let reader = std::io::BufReader::new(file);
            Ok(serde_json::from_reader(reader)?)
        } else {
            Ok(Self::from_lookup(|key| var(key).ok())?)
        }
    }

    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        fn number<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
            value.trim().parse().map_err(|_| ConfigError::InvalidNumber(key, value))
        }

        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(DemoConfig {
            backend: match lookup("CHARLCD_BACKEND") {
                Some(backend) => backend.parse()?,
                None => Backend::default(),
            },
            chip: lookup("CHARLCD_CHIP").unwrap_or_else(default_chip),
            pin_rs: number("CHARLCD_PIN_RS", required("CHARLCD_PIN_RS")?)?,
            pin_e: number("CHARLCD_PIN_E", required("CHARLCD_PIN_E")?)?,
            pins_data: parse_pin_bus(&required("CHARLCD_PINS_DATA")?)?,
            columns: match lookup("CHARLCD_COLUMNS") {
                Some(columns) => number("CHARLCD_COLUMNS", columns)?,
                None => default_columns(),
            },
            rows: match lookup("CHARLCD_ROWS") {
                Some(rows) => number("CHARLCD_ROWS", rows)?,
                None => default_rows(),
            },
            font: match lookup("CHARLCD_FONT") {
                Some(font) => number("CHARLCD_FONT", font)?,
                None => 0,
            },
        })
    }
}
