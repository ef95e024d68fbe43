//! HTTP quote source for the ZenQuotes `today` endpoint.
//!
//! The endpoint answers with a JSON array of `{q, a, i, c, h}` objects;
//! only `q` (text) and `a` (author) are used.

use super::{QuoteCandidate, QuoteSource, SourceError, SourceResult};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Public ZenQuotes API base.
pub const DEFAULT_BASE_URL: &str = "https://zenquotes.io/api/";

const TODAY_PATH: &str = "today";

/// Default HTTP request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ZenQuoteDto {
    #[serde(rename = "q")]
    quote: String,
    #[serde(rename = "a")]
    author: String,
    #[serde(rename = "i", default)]
    #[allow(dead_code)]
    image: Option<String>,
    #[serde(rename = "c", default)]
    #[allow(dead_code)]
    length: Option<String>,
    #[serde(rename = "h", default)]
    #[allow(dead_code)]
    html: Option<String>,
}

/// Blocking HTTP client for the daily quote endpoint.
pub struct ZenQuotesSource {
    client: Client,
    base_url: String,
}

impl ZenQuotesSource {
    /// Creates a source against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(err) => {
                warn!(
                    "event=quote_fetch module=source status=error stage=client_build \
                     timeout_ms={} error={err}; using client without timeout",
                    timeout.as_millis()
                );
                Client::new()
            }
        };

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Full URL of the `today` endpoint.
    pub fn today_url(&self) -> String {
        format!("{}/{TODAY_PATH}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ZenQuotesSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

impl QuoteSource for ZenQuotesSource {
    fn fetch_daily(&self) -> SourceResult<Vec<QuoteCandidate>> {
        let started_at = Instant::now();
        let url = self.today_url();
        info!("event=quote_fetch module=source status=start url={url}");

        let result = self
            .client
            .get(&url)
            .send()
            .map_err(|err| SourceError::Network(err.to_string()))
            .and_then(|response| {
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::HttpStatus(status.as_u16()));
                }
                response
                    .text()
                    .map_err(|err| SourceError::Network(err.to_string()))
            })
            .and_then(|body| parse_today_response(&body));

        match &result {
            Ok(candidates) => info!(
                "event=quote_fetch module=source status=ok duration_ms={} candidates={}",
                started_at.elapsed().as_millis(),
                candidates.len()
            ),
            Err(err) => warn!(
                "event=quote_fetch module=source status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

/// Decodes a `today` response body into raw candidates.
pub fn parse_today_response(body: &str) -> SourceResult<Vec<QuoteCandidate>> {
    let items: Vec<ZenQuoteDto> =
        serde_json::from_str(body).map_err(|err| SourceError::Decode(err.to_string()))?;
    Ok(items
        .into_iter()
        .map(|item| QuoteCandidate::new(item.quote, item.author))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{parse_today_response, ZenQuotesSource};
    use crate::source::{QuoteCandidate, QuoteSource, SourceError};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    #[test]
    fn parses_short_keys_and_ignores_extras() {
        let body = r#"[{"q":" Hi ","a":"Bob","i":"","c":"2","h":"<blockquote>Hi</blockquote>"}]"#;
        let candidates = parse_today_response(body).unwrap();
        assert_eq!(candidates, vec![QuoteCandidate::new(" Hi ", "Bob")]);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let candidates = parse_today_response(r#"[{"q":"A","a":"B"},{"q":"C","a":"D"}]"#).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].text, "C");
    }

    #[test]
    fn empty_array_is_empty_success() {
        assert!(parse_today_response("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_today_response(r#"{"error":"rate limited"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
        assert!(err.to_string().starts_with("Network error:"));
    }

    #[test]
    fn today_url_handles_trailing_slash() {
        let with_slash = ZenQuotesSource::new("https://example.test/api/", Duration::from_secs(1));
        let without = ZenQuotesSource::new("https://example.test/api", Duration::from_secs(1));
        assert_eq!(with_slash.today_url(), "https://example.test/api/today");
        assert_eq!(without.today_url(), "https://example.test/api/today");
    }

    #[test]
    fn configured_timeout_bounds_a_silent_server() {
        // Accepted by the backlog but never answered.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/api/", listener.local_addr().unwrap());
        let source = ZenQuotesSource::new(base, Duration::from_millis(200));

        let started_at = Instant::now();
        let err = source.fetch_daily().unwrap_err();

        assert!(matches!(err, SourceError::Network(_)));
        assert!(started_at.elapsed() < Duration::from_secs(10));
        drop(listener);
    }
}
