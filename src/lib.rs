mod analysis;
mod chart;
mod cloudcover;
mod dataset;
mod error;
mod timeline;
mod types;

pub use cloudcover::*;
pub use error::CloudCoverError;

pub use types::daily_cloud_cover::DailyCloudCover;
pub use types::day_type::{DayType, ParseDayTypeError};
pub use types::fetch_range::{FetchRange, FetchRangeError};

pub use timeline::client::{TimelineClient, DEFAULT_BASE_URL, DEFAULT_LOCATION};
pub use timeline::error::TimelineError;

pub use dataset::error::DatasetError;
pub use dataset::samples::{GroupSamples, Observation};
pub use dataset::store::{merge, CloudCoverStore, DEFAULT_DATA_FILE};

pub use analysis::comparison::{Comparison, ALPHA};
pub use analysis::density::{gaussian_kde, linspace, scott_bandwidth};
pub use analysis::error::AnalysisError;
pub use analysis::rolling::rolling_mean;
pub use analysis::summary::GroupSummary;
pub use analysis::welch::WelchTest;

pub use chart::error::ChartError;
pub use chart::panels::{BoxStats, ChartData, GroupPanel};
pub use chart::render::render_chart;
