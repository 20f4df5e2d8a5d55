//! Current weather from wttr.in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::config::UpstreamConfig;
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;

use crate::client::{UpstreamClient, join_url};

/// wttr.in one-line format: temperature and condition.
const REPORT_FORMAT: &str = "%t|%C";

/// Payload of `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Temperature without the leading `+`, e.g. `"27°C"`.
    pub temp: String,
    /// Human-readable condition, e.g. `"Partly cloudy"`.
    pub condition: String,
    /// When the report was fetched.
    pub last_updated: DateTime<Utc>,
}

/// Split a `"<temp>|<condition>"` report.
pub fn parse_report(body: &str) -> AppResult<(String, String)> {
    let (temp, condition) = body
        .split_once('|')
        .ok_or_else(|| AppError::external_service("Weather report missing separator"))?;
    Ok((temp.replace('+', "").trim().to_string(), condition.trim().to_string()))
}

#[derive(Debug)]
pub struct WeatherSource {
    client: UpstreamClient,
    url: String,
    location: String,
}

impl WeatherSource {
    pub fn new(client: UpstreamClient, config: &UpstreamConfig) -> Self {
        Self {
            client,
            url: config.weather_url.clone(),
            location: config.weather_location.clone(),
        }
    }
}

#[async_trait]
impl Upstream for WeatherSource {
    type Output = Weather;

    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self) -> AppResult<Weather> {
        let request = self
            .client
            .get(&join_url(&self.url, &self.location))
            .query(&[("format", REPORT_FORMAT)]);
        let body = self.client.text(request, "wttr.in").await?;
        let (temp, condition) = parse_report(&body)?;

        Ok(Weather {
            temp,
            condition,
            last_updated: Utc::now(),
        })
    }
}
