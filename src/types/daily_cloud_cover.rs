use crate::types::day_type::DayType;
use chrono::{Datelike, NaiveDate};

/// One row of the cloud cover table.
///
/// `day_of_week` and `label` are always derived from `date`, so two records
/// with the same date only differ in their cloud cover value.
#[derive(Debug, PartialEq, Clone)]
pub struct DailyCloudCover {
    pub date: NaiveDate,           // date
    pub cloud_cover: Option<f64>,  // cloudcover (percent)
    pub day_of_week: String,       // day_of_week ("Monday", ...)
    pub label: DayType,            // label
}

impl DailyCloudCover {
    pub fn new(date: NaiveDate, cloud_cover: Option<f64>) -> Self {
        Self {
            date,
            cloud_cover,
            day_of_week: date.format("%A").to_string(),
            label: DayType::from(date.weekday()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_day_name_and_label() {
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let row = DailyCloudCover::new(saturday, Some(12.5));
        assert_eq!(row.day_of_week, "Saturday");
        assert_eq!(row.label, DayType::Weekend);

        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let row = DailyCloudCover::new(monday, None);
        assert_eq!(row.day_of_week, "Monday");
        assert_eq!(row.label, DayType::Weekday);
        assert_eq!(row.cloud_cover, None);
    }
}
