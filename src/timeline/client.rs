//! HTTP client for the Visual Crossing timeline API.
//!
//! Each [`FetchRange`] maps to exactly one GET request. The `days` array of the
//! response is flattened into [`DailyCloudCover`] rows.

use crate::timeline::error::TimelineError;
use crate::timeline::response::TimelineResponse;
use crate::types::daily_cloud_cover::DailyCloudCover;
use crate::types::fetch_range::FetchRange;
use bon::bon;
use log::{info, warn};
use reqwest::{Client, Url};

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
pub const DEFAULT_LOCATION: &str = "New York,NY,USA";
const DEFAULT_UNIT_GROUP: &str = "metric";

/// Fetches daily records for a single location.
///
/// # Examples
///
/// ```no_run
/// # use cloudcover::{TimelineClient, FetchRange, TimelineError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TimelineClient::builder()
///     .api_key("MY_KEY")
///     .location("Amsterdam,NL")
///     .build()?;
/// let rows = client.fetch_range("2024-01-01:2024-01-31".parse()?).await?;
/// println!("{} days", rows.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TimelineClient {
    http: Client,
    base_url: Url,
    api_key: String,
    location: String,
    unit_group: String,
}

#[bon]
impl TimelineClient {
    /// Creates a client.
    ///
    /// * `.api_key(..)`: **Required.** Visual Crossing API key.
    /// * `.location(..)`: Optional. Free-form address. Defaults to [`DEFAULT_LOCATION`].
    /// * `.base_url(..)`: Optional. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.unit_group(..)`: Optional. Defaults to `metric`.
    /// * `.http_client(..)`: Optional. A preconfigured `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidBaseUrl`] if the base URL does not parse and
    /// [`TimelineError::ClientBuild`] if the default HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] location: Option<String>,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] unit_group: Option<String>,
        http_client: Option<Client>,
    ) -> Result<Self, TimelineError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = Url::parse(&base_url)
            .map_err(|e| TimelineError::InvalidBaseUrl(base_url.clone(), Box::new(e)))?;
        if parsed.cannot_be_a_base() {
            return Err(TimelineError::BaseUrlNotHierarchical(base_url));
        }
        let http = match http_client {
            Some(client) => client,
            None => Client::builder()
                .build()
                .map_err(TimelineError::ClientBuild)?,
        };

        Ok(Self {
            http,
            base_url: parsed,
            api_key,
            location: location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            unit_group: unit_group.unwrap_or_else(|| DEFAULT_UNIT_GROUP.to_string()),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Builds `{base}/{location}/{start}/{end}` with every segment percent-encoded.
    /// The query string (which carries the key) is added by the request builder.
    pub(crate) fn range_url(&self, range: FetchRange) -> Result<Url, TimelineError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TimelineError::BaseUrlNotHierarchical(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push(&self.location)
                .push(&range.start.format("%Y-%m-%d").to_string())
                .push(&range.end.format("%Y-%m-%d").to_string());
        }
        Ok(url)
    }

    /// Fetches all days in `range` with a single request.
    pub async fn fetch_range(
        &self,
        range: FetchRange,
    ) -> Result<Vec<DailyCloudCover>, TimelineError> {
        let url = self.range_url(range)?;
        // Logged and reported without the query string so the key never leaks.
        let display_url = url.to_string();
        info!("Fetching cloud cover for {} ({})", self.location, range);

        let response = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", self.unit_group.as_str()),
                ("include", "days"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await
            .map_err(|e| TimelineError::NetworkRequest(display_url.clone(), e.without_url()))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                warn!("HTTP error for {}: {:?}", display_url, e);
                return Err(if let Some(status) = e.status() {
                    TimelineError::HttpStatus {
                        url: display_url,
                        status,
                        source: e,
                    }
                } else {
                    TimelineError::NetworkRequest(display_url, e)
                });
            }
        };

        let body: TimelineResponse = response
            .json()
            .await
            .map_err(|e| TimelineError::Decode(display_url.clone(), e.without_url()))?;
        if let Some(address) = body.resolved_address.as_deref() {
            info!(
                "Resolved '{}' to '{}' ({}, {} days)",
                self.location,
                address,
                body.timezone.as_deref().unwrap_or("unknown timezone"),
                body.days.len()
            );
        }
        Ok(body.into_records())
    }

    /// Fetches every range in order, concatenating the rows.
    /// Stops at the first failing request.
    pub async fn fetch_all(
        &self,
        ranges: &[FetchRange],
    ) -> Result<Vec<DailyCloudCover>, TimelineError> {
        let mut records = Vec::new();
        for range in ranges {
            let mut fetched = self.fetch_range(*range).await?;
            info!("Received {} days for {}", fetched.len(), range);
            records.append(&mut fetched);
        }
        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::DayType;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response per accepted connection and returns the
    /// request heads it received.
    pub(crate) async fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 16 * 1024];
                let n = socket.read(&mut buf).await.unwrap();
                requests.push(String::from_utf8_lossy(&buf[..n]).to_string());
                let reply = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });
        (format!("http://{addr}/rest/services/timeline"), handle)
    }

    pub(crate) fn test_client(base_url: &str) -> TimelineClient {
        TimelineClient::builder()
            .api_key("SECRET")
            .base_url(base_url)
            .http_client(Client::builder().no_proxy().build().unwrap())
            .build()
            .unwrap()
    }

    pub(crate) fn days_body(days: &[(&str, Option<f64>)]) -> String {
        let days: Vec<serde_json::Value> = days
            .iter()
            .map(|(date, cc)| serde_json::json!({ "datetime": date, "cloudcover": cc }))
            .collect();
        serde_json::json!({ "resolvedAddress": "New York, NY, United States", "days": days })
            .to_string()
    }

    fn range(s: &str) -> FetchRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_url_encodes_location() {
        let client = TimelineClient::builder().api_key("SECRET").build().unwrap();
        let url = client.range_url(range("1990-01-01:1999-12-31")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/New%20York,NY,USA/1990-01-01/1999-12-31"
        );
        assert!(!url.as_str().contains("SECRET"));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = TimelineClient::builder()
            .api_key("k")
            .base_url("not a url")
            .build();
        assert!(matches!(result, Err(TimelineError::InvalidBaseUrl(..))));

        let result = TimelineClient::builder()
            .api_key("k")
            .base_url("mailto:someone@example.com")
            .build();
        assert!(matches!(
            result,
            Err(TimelineError::BaseUrlNotHierarchical(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_range_sends_query_and_flattens_days() {
        let body = days_body(&[("2024-06-01", Some(40.0)), ("2024-06-03", None)]);
        let (base_url, server) = serve(vec![("200 OK", body)]).await;
        let client = test_client(&base_url);

        let rows = client
            .fetch_range(range("2024-06-01:2024-06-03"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, DayType::Weekend);
        assert_eq!(rows[0].cloud_cover, Some(40.0));
        assert_eq!(rows[1].cloud_cover, None);

        let requests = server.await.unwrap();
        let request_line = requests[0].lines().next().unwrap();
        assert!(request_line.starts_with(
            "GET /rest/services/timeline/New%20York,NY,USA/2024-06-01/2024-06-03?"
        ));
        assert!(request_line.contains("unitGroup=metric"));
        assert!(request_line.contains("include=days"));
        assert!(request_line.contains("key=SECRET"));
        assert!(request_line.contains("contentType=json"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_reported_without_key() {
        let (base_url, server) =
            serve(vec![("401 Unauthorized", "{\"error\":\"bad key\"}".to_string())]).await;
        let client = test_client(&base_url);

        let err = client
            .fetch_range(range("2024-06-01:2024-06-03"))
            .await
            .unwrap_err();
        match &err {
            TimelineError::HttpStatus { status, url, .. } => {
                assert_eq!(status.as_u16(), 401);
                assert!(!url.contains("SECRET"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!format!("{err}").contains("SECRET"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_ranges_in_order() {
        let (base_url, server) = serve(vec![
            ("200 OK", days_body(&[("2024-01-01", Some(10.0))])),
            ("200 OK", days_body(&[("2024-02-01", Some(20.0))])),
        ])
        .await;
        let client = test_client(&base_url);

        let rows = client
            .fetch_all(&[range("2024-01-01:2024-01-01"), range("2024-02-01:2024-02-01")])
            .await
            .unwrap();
        let values: Vec<_> = rows.iter().map(|r| r.cloud_cover).collect();
        assert_eq!(values, vec![Some(10.0), Some(20.0)]);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].contains("/2024-02-01/2024-02-01?"));
    }
}
