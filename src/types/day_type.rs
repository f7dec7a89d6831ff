//! Defines the weekday/weekend split used to group daily observations.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

/// Classifies a calendar day as part of the working week or the weekend.
///
/// The string form (`"Weekday"` / `"Weekend"`) is what gets stored in the
/// `label` column of the cloud cover table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

impl DayType {
    /// All variants, in the order they are reported and plotted.
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];

    /// Returns the label stored in the `label` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }

    /// Plural form used in report headings ("Weekdays", "Weekends").
    pub fn plural(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekdays",
            DayType::Weekend => "Weekends",
        }
    }
}

impl From<Weekday> for DayType {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }
}

/// Allows formatting a `DayType` using its column label.
///
/// # Examples
///
/// ```
/// use cloudcover::DayType;
///
/// assert_eq!(DayType::Weekend.to_string(), "Weekend");
/// assert_eq!(format!("{}", DayType::Weekday), "Weekday");
/// ```
impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown day type label '{0}'")]
pub struct ParseDayTypeError(pub String);

impl FromStr for DayType {
    type Err = ParseDayTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Weekday" => Ok(DayType::Weekday),
            "Weekend" => Ok(DayType::Weekend),
            other => Err(ParseDayTypeError(other.to_string())),
        }
    }
}
