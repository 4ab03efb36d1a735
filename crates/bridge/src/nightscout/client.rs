//! Nightscout API HTTP client
//!
//! Uses synchronous HTTP (ureq); a run never has more than one request in
//! flight.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use crate::models::{Entry, EntryKind, TimeWindow};
use crate::sync::EntrySource;

/// Nightscout API client for fetching entries and treatments
pub struct NightscoutClient {
    base: Url,
    token: Option<String>,
    agent: ureq::Agent,
}

impl NightscoutClient {
    /// Upper bound on records returned per request
    const MAX_COUNT: usize = 131_072;

    /// Request timeout
    const TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a client for the site at `base_url`
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid Nightscout url: {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Self::TIMEOUT))
            .build()
            .into();

        Ok(Self {
            base,
            token: token.filter(|t| !t.is_empty()),
            agent,
        })
    }

    /// Build the request url for one kind and window
    pub fn entries_url(&self, kind: EntryKind, window: &TimeWindow) -> Result<Url> {
        let mut url = match kind {
            EntryKind::Glucose => self.base.join("api/v1/entries/sgv.json")?,
            EntryKind::Food | EntryKind::Insulin => self.base.join("api/v1/treatments.json")?,
        };

        {
            let mut query = url.query_pairs_mut();
            match kind {
                EntryKind::Glucose => {
                    query
                        .append_pair("find[date][$gte]", &window.from.timestamp_millis().to_string())
                        .append_pair("find[date][$lt]", &window.to.timestamp_millis().to_string());
                }
                EntryKind::Food | EntryKind::Insulin => {
                    let field = if kind == EntryKind::Food { "carbs" } else { "insulin" };
                    query
                        .append_pair("find[created_at][$gte]", &window.from_iso())
                        .append_pair("find[created_at][$lt]", &window.to_iso())
                        .append_pair(&format!("find[{field}][$gt]"), "0");
                }
            }
            query.append_pair("count", &Self::MAX_COUNT.to_string());
            if let Some(token) = &self.token {
                query.append_pair("token", token);
            }
        }

        Ok(url)
    }

    fn get_entries(&self, kind: EntryKind, window: &TimeWindow) -> Result<Vec<Entry>> {
        let url = self.entries_url(kind, window)?;
        log::debug!("Fetching {} entries from {}", kind, self.base);

        let mut response = self
            .agent
            .get(url.as_str())
            .header("Accept", "application/json")
            .call()
            .with_context(|| format!("Failed to send {kind} request to Nightscout"))?;

        let entries: Vec<Entry> = response
            .body_mut()
            .read_json()
            .with_context(|| format!("Failed to parse {kind} response from Nightscout"))?;

        Ok(within(entries, window))
    }
}

impl EntrySource for NightscoutClient {
    fn fetch(&self, kind: EntryKind, window: &TimeWindow) -> Result<Vec<Entry>> {
        self.get_entries(kind, window)
    }
}

/// Drop entries the server returned outside the window
///
/// Entries without a readable time are kept; the converter decides about them.
fn within(entries: Vec<Entry>, window: &TimeWindow) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|entry| entry.timestamp().is_none_or(|ts| window.contains(ts)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_glucose_url() {
        let client = NightscoutClient::new("https://ns.example.com", Some("reader-abc".into())).unwrap();
        let url = client.entries_url(EntryKind::Glucose, &window()).unwrap();

        assert_eq!(url.path(), "/api/v1/entries/sgv.json");
        let pairs = query(&url);
        assert!(pairs.contains(&("find[date][$gte]".into(), "1704067200000".into())));
        assert!(pairs.contains(&("find[date][$lt]".into(), "1704153600000".into())));
        assert!(pairs.contains(&("token".into(), "reader-abc".into())));
    }

    #[test]
    fn test_treatment_urls() {
        let client = NightscoutClient::new("https://ns.example.com/", None).unwrap();

        let food = client.entries_url(EntryKind::Food, &window()).unwrap();
        assert_eq!(food.path(), "/api/v1/treatments.json");
        let pairs = query(&food);
        assert!(pairs.contains(&("find[created_at][$gte]".into(), "2024-01-01T00:00:00.000Z".into())));
        assert!(pairs.contains(&("find[created_at][$lt]".into(), "2024-01-02T00:00:00.000Z".into())));
        assert!(pairs.contains(&("find[carbs][$gt]".into(), "0".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "token"));

        let insulin = client.entries_url(EntryKind::Insulin, &window()).unwrap();
        assert!(query(&insulin).contains(&("find[insulin][$gt]".into(), "0".into())));
    }

    #[test]
    fn test_site_under_subpath() {
        let client = NightscoutClient::new("https://example.com/ns", Some(String::new())).unwrap();
        let url = client.entries_url(EntryKind::Glucose, &window()).unwrap();
        assert_eq!(url.path(), "/ns/api/v1/entries/sgv.json");
        assert!(!query(&url).iter().any(|(k, _)| k == "token"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(NightscoutClient::new("not a url", None).is_err());
    }

    #[test]
    fn test_within_window() {
        let entries = vec![
            Entry::new(json!({ "sgv": 100, "date": 1704067200000_i64 })),
            Entry::new(json!({ "sgv": 101, "date": 1704153600000_i64 })),
            Entry::new(json!({ "sgv": 102 })),
        ];
        let kept = within(entries, &window());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].number("sgv"), Some(100.0));
        assert_eq!(kept[1].number("sgv"), Some(102.0));
    }
}
