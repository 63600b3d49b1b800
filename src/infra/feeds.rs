use anyhow::Result;

use crate::config::Config;
use crate::fetch::BasicClient;
use crate::infra::tfl::TflClient;
use crate::infra::waqi::WaqiClient;
use crate::network::records::{AqiRecord, RouteRecord, StationRecord};
use crate::services::feed_source::FeedSource;

/// TfL topology plus WAQI readings, configured from [`Config`].
pub struct LiveFeeds {
    tfl: TflClient,
    waqi: WaqiClient,
}

impl LiveFeeds {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = BasicClient::with_timeout(config.http_timeout)?;

        let tfl = TflClient::new(
            http.clone(),
            &config.stations_source,
            &config.routes_source,
            config.tfl_app_key.as_deref(),
        );
        let waqi = WaqiClient::new(
            http,
            &config.aqi_source,
            &config.waqi_keyword,
            &config.waqi_token,
        );

        Ok(Self { tfl, waqi })
    }
}

#[async_trait::async_trait]
impl FeedSource for LiveFeeds {
    async fn stations(&self) -> Result<Vec<StationRecord>> {
        self.tfl.stations().await
    }

    async fn routes(&self) -> Result<Vec<RouteRecord>> {
        self.tfl.routes().await
    }

    async fn air_quality(&self) -> Result<Vec<AqiRecord>> {
        self.waqi.air_quality().await
    }
}
