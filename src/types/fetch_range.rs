//! Date ranges requested from the timeline API.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// An inclusive range of calendar days requested in a single API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchRangeError {
    #[error("Range end {end} is before range start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Invalid range '{0}', expected START:END with dates as YYYY-MM-DD")]
    Malformed(String),
}

impl FetchRange {
    /// Creates a range, rejecting ranges that end before they start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FetchRangeError> {
        if end < start {
            return Err(FetchRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The ranges fetched when none are configured: 1990 through the first day of 2025,
    /// split into blocks small enough for a single request each.
    pub fn defaults() -> Vec<FetchRange> {
        [
            ((1990, 1, 1), (1999, 12, 31)),
            ((2000, 1, 1), (2006, 12, 31)),
            ((2007, 1, 1), (2016, 12, 31)),
            ((2017, 1, 1), (2021, 12, 31)),
            ((2022, 1, 1), (2025, 1, 1)),
        ]
        .into_iter()
        .filter_map(|((sy, sm, sd), (ey, em, ed))| {
            Some(FetchRange {
                start: NaiveDate::from_ymd_opt(sy, sm, sd)?,
                end: NaiveDate::from_ymd_opt(ey, em, ed)?,
            })
        })
        .collect()
    }
}

impl fmt::Display for FetchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Parses `START:END`, e.g. `2022-01-01:2022-12-31`.
impl FromStr for FetchRange {
    type Err = FetchRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| FetchRangeError::Malformed(s.to_string()))?;
        let parse = |part: &str| {
            NaiveDate::parse_from_str(part.trim(), "%Y-%m-%d")
                .map_err(|_| FetchRangeError::Malformed(s.to_string()))
        };
        FetchRange::new(parse(start)?, parse(end)?)
    }
}
