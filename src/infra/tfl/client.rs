use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, load_source};
use crate::network::records::{RouteRecord, StationRecord};
use crate::parser::{parse_routes, parse_stations};

/// Transport for London unified API: stop points and line routes.
pub struct TflClient {
    http: Arc<dyn HttpClient>,
    stations_source: String,
    routes_source: String,
}

impl TflClient {
    /// `app_key` is optional; anonymous requests are rate limited harder.
    pub fn new(
        http: BasicClient,
        stations_source: &str,
        routes_source: &str,
        app_key: Option<&str>,
    ) -> Self {
        let http: Arc<dyn HttpClient> = match app_key {
            Some(key) => Arc::new(UrlParam::new(http, "app_key", key)),
            None => Arc::new(http),
        };
        Self {
            http,
            stations_source: stations_source.to_string(),
            routes_source: routes_source.to_string(),
        }
    }

    pub async fn stations(&self) -> Result<Vec<StationRecord>> {
        let bytes = load_source(self.http.as_ref(), &self.stations_source).await?;
        let records = parse_stations(&bytes)?;
        info!(records = records.len(), "Station feed decoded");
        Ok(records)
    }

    pub async fn routes(&self) -> Result<Vec<RouteRecord>> {
        let bytes = load_source(self.http.as_ref(), &self.routes_source).await?;
        let records = parse_routes(&bytes)?;
        info!(records = records.len(), "Route feed decoded");
        Ok(records)
    }
}
