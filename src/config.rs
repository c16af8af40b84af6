//!
//! Configuration for the delimiter grouping.
//!
//! ```rust
//! use rat_group_input::GroupConfig;
//!
//! let cfg = GroupConfig::new(' ', 4);
//! assert!(cfg.is_err());
//!
//! let cfg = GroupConfig::default();
//! assert_eq!(cfg.delimiter(), '-');
//! assert_eq!(cfg.group_len(), 4);
//! ```
//!

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Default delimiter.
pub const DEFAULT_DELIMITER: char = '-';
/// Default group length.
pub const DEFAULT_GROUP_LENGTH: usize = 4;

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The group length was negative.
    NegativeGroupLength(i64),
    /// The delimiter is a control character or whitespace,
    /// or a delimiter string is not exactly one char long.
    BadDelimiter(String),
    /// An attribute value could not be parsed.
    InvalidValue { key: String, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NegativeGroupLength(v) => {
                write!(f, "group length must be >= 0, got {}", v)
            }
            ConfigError::BadDelimiter(v) => {
                write!(f, "delimiter must be a single printable char, got {:?}", v)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl Error for ConfigError {}

/// Grouping configuration.
///
/// Immutable once it is handed to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupConfig {
    delimiter: char,
    group_len: usize,
    show_delimiter_before_next_char: bool,
    remove_delimiter_in_last_position: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            group_len: DEFAULT_GROUP_LENGTH,
            show_delimiter_before_next_char: true,
            remove_delimiter_in_last_position: true,
        }
    }
}

impl GroupConfig {
    /// New configuration.
    ///
    /// A group length of 0 disables the delimiter.
    pub fn new(delimiter: char, group_len: i64) -> Result<Self, ConfigError> {
        if group_len < 0 {
            return Err(ConfigError::NegativeGroupLength(group_len));
        }
        if delimiter <= ' ' || delimiter.is_control() || delimiter.is_whitespace() {
            return Err(ConfigError::BadDelimiter(delimiter.to_string()));
        }

        Ok(Self {
            delimiter,
            group_len: group_len as usize,
            ..Default::default()
        })
    }

    /// New configuration with the delimiter given as a string.
    pub fn from_delimiter_str(delimiter: &str, group_len: i64) -> Result<Self, ConfigError> {
        let mut it = delimiter.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => Self::new(c, group_len),
            _ => Err(ConfigError::BadDelimiter(delimiter.to_string())),
        }
    }

    /// Load the configuration from a list of attributes.
    ///
    /// Known keys are
    /// * `delimiter`
    /// * `group_length`
    /// * `show_delimiter_before_next_char`
    /// * `remove_delimiter_in_last_position`
    ///
    /// Missing keys use the default, other keys are ignored.
    pub fn from_attrs<'a, I>(attrs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut delimiter = None;
        let mut group_len = DEFAULT_GROUP_LENGTH as i64;
        let mut show_before = true;
        let mut remove_last = true;

        for (key, value) in attrs {
            let key = key.trim();
            let value = value.trim();
            match key {
                "delimiter" => delimiter = Some(value),
                "group_length" => {
                    group_len = value
                        .parse::<i64>()
                        .map_err(|_| invalid_value(key, value))?;
                }
                "show_delimiter_before_next_char" => {
                    show_before = parse_bool(key, value)?;
                }
                "remove_delimiter_in_last_position" => {
                    remove_last = parse_bool(key, value)?;
                }
                _ => {}
            }
        }

        let cfg = if let Some(delimiter) = delimiter {
            Self::from_delimiter_str(delimiter, group_len)?
        } else {
            Self::new(DEFAULT_DELIMITER, group_len)?
        };

        Ok(cfg
            .show_delimiter_before_next_char(show_before)
            .remove_delimiter_in_last_position(remove_last))
    }

    /// Show the delimiter before the next char is typed.
    ///
    /// With `true` the text reads `1234-5` after typing 5 chars,
    /// and `1234` after typing 4. With `false` the delimiter
    /// follows a completed group immediately: `1234-`.
    pub fn show_delimiter_before_next_char(mut self, show: bool) -> Self {
        self.show_delimiter_before_next_char = show;
        self
    }

    /// Remove a trailing delimiter if there is no room for
    /// another char.
    pub fn remove_delimiter_in_last_position(mut self, remove: bool) -> Self {
        self.remove_delimiter_in_last_position = remove;
        self
    }

    /// Delimiter
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Group length. 0 means no grouping.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.group_len
    }

    #[inline]
    pub fn shows_delimiter_before_next_char(&self) -> bool {
        self.show_delimiter_before_next_char
    }

    #[inline]
    pub fn removes_delimiter_in_last_position(&self) -> bool {
        self.remove_delimiter_in_last_position
    }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid_value(key, value)),
    }
}

/// Parses `key=value` pairs separated by `,`.
///
/// A `,` delimiter can't be written this way, use
/// [GroupConfig::from_attrs] for that.
impl FromStr for GroupConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attrs = Vec::new();
        for part in s.split(',') {
            if part.trim().is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((key, value)) => attrs.push((key, value)),
                None => return Err(invalid_value(part.trim(), "")),
            }
        }
        Self::from_attrs(attrs)
    }
}
