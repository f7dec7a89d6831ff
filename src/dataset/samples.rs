use crate::types::day_type::DayType;
use chrono::NaiveDate;

/// A single usable observation: cloud cover present and label known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub cloud_cover: f64,
    pub label: DayType,
}

/// The cleaned table, ordered by date, ready for statistics and plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSamples {
    pub observations: Vec<Observation>,
}

impl GroupSamples {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    /// Cloud cover values of one group, in date order.
    pub fn values(&self, label: DayType) -> Vec<f64> {
        self.observations
            .iter()
            .filter(|o| o.label == label)
            .map(|o| o.cloud_cover)
            .collect()
    }

    /// Date and value pairs of one group, in date order.
    pub fn series(&self, label: DayType) -> Vec<(NaiveDate, f64)> {
        self.observations
            .iter()
            .filter(|o| o.label == label)
            .map(|o| (o.date, o.cloud_cover))
            .collect()
    }

    pub fn weekdays(&self) -> Vec<f64> {
        self.values(DayType::Weekday)
    }

    pub fn weekends(&self) -> Vec<f64> {
        self.values(DayType::Weekend)
    }

    /// First and last observed dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.observations.first()?.date, self.observations.last()?.date))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(day: u32, value: f64, label: DayType) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            cloud_cover: value,
            label,
        }
    }

    #[test]
    fn test_split_keeps_date_order() {
        let samples = GroupSamples::new(vec![
            obs(4, 40.0, DayType::Weekday),
            obs(2, 20.0, DayType::Weekend),
            obs(1, 10.0, DayType::Weekday),
            obs(3, 30.0, DayType::Weekend),
        ]);
        assert_eq!(samples.weekdays(), vec![10.0, 40.0]);
        assert_eq!(samples.weekends(), vec![20.0, 30.0]);
        assert_eq!(
            samples.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
            ))
        );
    }

    #[test]
    fn test_empty_samples_have_no_span() {
        assert_eq!(GroupSamples::default().date_span(), None);
    }
}
