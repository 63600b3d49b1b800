use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, is_remote, load_source};
use crate::network::records::AqiRecord;
use crate::parser::parse_air_quality;

/// World Air Quality Index keyword search.
pub struct WaqiClient {
    http: Arc<dyn HttpClient>,
    search_source: String,
    keyword: String,
}

impl WaqiClient {
    pub fn new(http: BasicClient, search_source: &str, keyword: &str, token: &str) -> Self {
        Self {
            http: Arc::new(UrlParam::new(http, "token", token)),
            search_source: search_source.to_string(),
            keyword: keyword.to_string(),
        }
    }

    /// The search URL with the keyword attached, or the file path unchanged.
    pub fn search_source(&self) -> Result<String> {
        if !is_remote(&self.search_source) {
            return Ok(self.search_source.clone());
        }
        let url = reqwest::Url::parse_with_params(
            &self.search_source,
            &[("keyword", self.keyword.as_str())],
        )
        .with_context(|| format!("invalid WAQI search URL '{}'", self.search_source))?;
        Ok(url.to_string())
    }

    pub async fn air_quality(&self) -> Result<Vec<AqiRecord>> {
        let source = self.search_source()?;
        let bytes = load_source(self.http.as_ref(), &source).await?;
        let records = parse_air_quality(&bytes)?;
        info!(records = records.len(), keyword = %self.keyword, "AQI feed decoded");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_source_adds_keyword() {
        let client = WaqiClient::new(
            BasicClient::new(),
            "https://api.waqi.info/search/",
            "london",
            "demo",
        );
        assert_eq!(
            client.search_source().unwrap(),
            "https://api.waqi.info/search/?keyword=london"
        );
    }

    #[test]
    fn test_search_source_keeps_file_path() {
        let client = WaqiClient::new(BasicClient::new(), "fixtures/aqi.json", "london", "demo");
        assert_eq!(client.search_source().unwrap(), "fixtures/aqi.json");
    }
}
