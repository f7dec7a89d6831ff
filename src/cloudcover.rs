//! The three steps of the workflow (fetch, compare, plot) behind one entry point.
//!
//! Every step reads from and writes to the same CSV table, so they can run in
//! separate processes and in any order once the table exists.

use crate::analysis::comparison::Comparison;
use crate::chart::panels::ChartData;
use crate::chart::render::render_chart;
use crate::dataset::store::{CloudCoverStore, DEFAULT_DATA_FILE};
use crate::error::CloudCoverError;
use crate::timeline::client::{TimelineClient, DEFAULT_LOCATION};
use crate::types::daily_cloud_cover::DailyCloudCover;
use crate::types::fetch_range::FetchRange;
use bon::bon;
use log::info;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::task;

pub const DEFAULT_CHART_FILE: &str = "cloud_cover_analysis.png";

/// Entry point for fetching, comparing and plotting daily cloud cover of one location.
///
/// # Examples
///
/// ```rust
/// # use cloudcover::{CloudCover, CloudCoverError};
/// # async fn run() -> Result<(), CloudCoverError> {
/// let app = CloudCover::builder()
///     .data_file("cloudcover_daily.csv")
///     .location("New York,NY,USA")
///     .build();
///
/// let comparison = app.compare().await?;
/// println!("{comparison}");
/// # Ok(())
/// # }
/// ```
pub struct CloudCover {
    store: CloudCoverStore,
    location: String,
}

#[bon]
impl CloudCover {
    /// Creates the workflow for `location`, backed by the CSV table at `data_file`.
    ///
    /// Defaults to `cloudcover_daily.csv` in the working directory and New York.
    #[builder]
    pub fn new(
        #[builder(into)] data_file: Option<PathBuf>,
        #[builder(into)] location: Option<String>,
    ) -> Self {
        Self {
            store: CloudCoverStore::new(
                data_file.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            ),
            location: location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        }
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Downloads daily cloud cover for every range and merges it into the table.
    ///
    /// Rows already present in the table are kept as they are, so running the
    /// fetch again does not change the file. Returns the full merged table.
    ///
    /// # Errors
    ///
    /// Returns [`CloudCoverError::MissingApiKey`] before any request is made if
    /// `api_key` is empty. Any failing request aborts the fetch and leaves the
    /// table untouched.
    #[builder]
    pub async fn fetch(
        &self,
        #[builder(into)] api_key: String,
        ranges: Option<Vec<FetchRange>>,
        #[builder(into)] base_url: Option<String>,
        http_client: Option<Client>,
    ) -> Result<Vec<DailyCloudCover>, CloudCoverError> {
        if api_key.trim().is_empty() {
            return Err(CloudCoverError::MissingApiKey);
        }
        let ranges = ranges.unwrap_or_else(FetchRange::defaults);
        let client = TimelineClient::builder()
            .api_key(api_key)
            .location(self.location.clone())
            .maybe_base_url(base_url)
            .maybe_http_client(http_client)
            .build()?;

        let fresh = client.fetch_all(&ranges).await?;
        info!("Fetched {} days across {} ranges", fresh.len(), ranges.len());
        Ok(self.store.merge_and_save(fresh).await?)
    }

    /// Summarizes both groups and runs Welch's t-test on the stored table.
    pub async fn compare(&self) -> Result<Comparison, CloudCoverError> {
        let samples = self.store.load_samples().await?;
        info!(
            "Comparing {} days from {:?}",
            samples.len(),
            self.store.path()
        );
        Ok(Comparison::from_samples(&samples)?)
    }

    /// Renders the four-panel figure to `output` and returns its path.
    ///
    /// `.svg` paths produce a vector image, anything else a bitmap whose
    /// format follows the extension. `scale` multiplies the pixel size.
    #[builder]
    pub async fn plot(
        &self,
        #[builder(into)] output: Option<PathBuf>,
        scale: Option<u32>,
    ) -> Result<PathBuf, CloudCoverError> {
        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_FILE));
        let scale = scale.unwrap_or(1);
        let samples = self.store.load_samples().await?;
        let data = ChartData::new(self.location.clone(), &samples)?;

        let path = output.clone();
        task::spawn_blocking(move || render_chart(&data, &path, scale)).await??;
        info!("Chart saved to {:?}", output);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::client::tests::{days_body, serve};
    use crate::AnalysisError;
    use tempfile::tempdir;

    fn no_proxy() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let dir = tempdir().unwrap();
        let app = CloudCover::builder()
            .data_file(dir.path().join("daily.csv"))
            .build();

        let err = app
            .fetch()
            .api_key("  ")
            .base_url("http://127.0.0.1:9/unused")
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, CloudCoverError::MissingApiKey));
        assert!(!app.data_file().exists());
    }

    #[tokio::test]
    async fn test_fetch_then_compare() {
        let dir = tempdir().unwrap();
        let app = CloudCover::builder()
            .data_file(dir.path().join("daily.csv"))
            .location("Somewhere")
            .build();

        // 2024-06-03 is a Monday; two weeks of data in two ranges.
        let first = days_body(&[
            ("2024-06-03", Some(50.0)),
            ("2024-06-04", Some(55.0)),
            ("2024-06-05", Some(60.0)),
            ("2024-06-06", Some(45.0)),
            ("2024-06-07", Some(65.0)),
            ("2024-06-08", Some(20.0)),
            ("2024-06-09", Some(30.0)),
        ]);
        let second = days_body(&[
            ("2024-06-10", Some(52.0)),
            ("2024-06-11", None),
            ("2024-06-15", Some(25.0)),
            ("2024-06-16", Some(35.0)),
        ]);
        let (base_url, server) =
            serve(vec![("200 OK", first), ("200 OK", second)]).await;

        let ranges = vec![
            "2024-06-03:2024-06-09".parse().unwrap(),
            "2024-06-10:2024-06-16".parse().unwrap(),
        ];
        let rows = app
            .fetch()
            .api_key("SECRET")
            .ranges(ranges)
            .base_url(base_url)
            .http_client(no_proxy())
            .call()
            .await
            .unwrap();
        assert_eq!(rows.len(), 11);
        let requests = server.await.unwrap();
        assert!(requests[1].starts_with("GET /rest/services/timeline/Somewhere/2024-06-10/2024-06-16?"));

        let comparison = app.compare().await.unwrap();
        // the row without cloud cover is dropped
        assert_eq!(comparison.weekdays.n, 6);
        assert_eq!(comparison.weekends.n, 4);
        assert!(comparison.mean_difference() > 0.0);
    }

    #[tokio::test]
    async fn test_compare_without_data_is_an_error() {
        let dir = tempdir().unwrap();
        let app = CloudCover::builder()
            .data_file(dir.path().join("missing.csv"))
            .build();

        let err = app.compare().await.unwrap_err();
        assert!(matches!(
            err,
            CloudCoverError::Analysis(AnalysisError::InsufficientData { found: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_plot_renders_svg() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let data_file = dir.path().join("daily.csv");
        let app = CloudCover::builder()
            .data_file(data_file.clone())
            .location("Somewhere")
            .build();

        let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("bad date")?;
        let rows: Vec<DailyCloudCover> = (0..120)
            .map(|i| {
                let cloud_cover = ((i * 37) % 100) as f64;
                DailyCloudCover::new(start + chrono::Duration::days(i), Some(cloud_cover))
            })
            .collect();
        CloudCoverStore::new(&data_file).save(&rows).await?;

        let output = dir.path().join("charts").join("c.svg");
        let written = app.plot().output(output.clone()).call().await?;
        assert_eq!(written, output);
        assert!(std::fs::metadata(&output)?.len() > 0);
        let svg = std::fs::read_to_string(&output)?;
        assert!(svg.contains("<svg"));
        Ok(())
    }

    #[tokio::test]
    async fn test_plot_without_data_is_an_error() {
        let dir = tempdir().unwrap();
        let app = CloudCover::builder()
            .data_file(dir.path().join("missing.csv"))
            .build();
        let output = dir.path().join("chart.png");

        let err = app.plot().output(output.clone()).call().await.unwrap_err();
        assert!(matches!(err, CloudCoverError::Chart(_)));
        assert!(!output.exists());
    }
}
