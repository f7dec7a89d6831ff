//! Subset of the timeline JSON payload that the fetcher reads.

use crate::types::daily_cloud_cover::DailyCloudCover;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    /// Address the API resolved the requested location to.
    pub resolved_address: Option<String>,
    /// IANA zone the `datetime` days are expressed in.
    pub timezone: Option<String>,
    /// One entry per day when `include=days` is requested.
    #[serde(default)]
    pub days: Vec<TimelineDay>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineDay {
    /// Calendar day, `YYYY-MM-DD`.
    pub datetime: NaiveDate,
    /// Daily mean cloud cover in percent. Null or absent when unknown.
    #[serde(default)]
    pub cloudcover: Option<f64>,
}

impl TimelineResponse {
    /// Flattens the `days` array into table rows, in response order.
    pub fn into_records(self) -> Vec<DailyCloudCover> {
        self.days
            .into_iter()
            .map(|day| DailyCloudCover::new(day.datetime, day.cloudcover))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DayType;

    #[test]
    fn test_parses_days_with_missing_cloud_cover() {
        let body = r#"{
            "queryCost": 3,
            "resolvedAddress": "New York, NY, United States",
            "timezone": "America/New_York",
            "days": [
                {"datetime": "2024-01-05", "cloudcover": 87.4, "temp": 2.1},
                {"datetime": "2024-01-06", "cloudcover": null},
                {"datetime": "2024-01-07"}
            ]
        }"#;
        let response: TimelineResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.resolved_address.as_deref(),
            Some("New York, NY, United States")
        );

        let records = response.into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].cloud_cover, Some(87.4));
        assert_eq!(records[0].label, DayType::Weekday);
        assert_eq!(records[1].cloud_cover, None);
        assert_eq!(records[1].day_of_week, "Saturday");
        assert_eq!(records[2].cloud_cover, None);
        assert_eq!(records[2].label, DayType::Weekend);
    }

    #[test]
    fn test_missing_days_array_yields_no_rows() {
        let response: TimelineResponse =
            serde_json::from_str(r#"{"resolvedAddress": "Nowhere"}"#).unwrap();
        assert!(response.into_records().is_empty());
    }
}
