pub mod daily_cloud_cover;
pub mod day_type;
pub mod fetch_range;
