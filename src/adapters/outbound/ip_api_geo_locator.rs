//! ip-api.com Geo Locator
//!
//! Implements GeoLocator against the ip-api.com JSON endpoint
//! (`GET {base}/{ip}`).

use crate::domain::entities::HopAddress;
use crate::domain::errors::ResolutionFailure;
use crate::domain::ports::GeoLocator;
use crate::domain::value_objects::Coordinates;
use crate::infrastructure::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Public ip-api.com endpoint (free tier, HTTP only).
pub const DEFAULT_API_URL: &str = "http://ip-api.com/json";

/// Per-lookup timeout.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

const SUCCESS_STATUS: &str = "success";

/// Response body from ip-api.com.
///
/// Only `status` is always present; `lat`/`lon` come with a success and
/// `message` with a failure.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// ip-api.com geolocation client.
///
/// One attempt per lookup, bounded by the client timeout. When a rate
/// limiter is attached, each lookup waits for a token before the request is
/// sent; that wait is not part of the timeout.
pub struct IpApiGeoLocator {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Option<Arc<RateLimiter>>,
}

impl IpApiGeoLocator {
    /// Create a locator for `base_url` with the given per-lookup timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: None,
        })
    }

    /// Throttle lookups through a shared rate limiter.
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    fn lookup_url(&self, address: &HopAddress) -> String {
        format!("{}/{}", self.base_url, address)
    }

    /// Interpret a response body.
    fn parse_body(body: &str) -> Result<Coordinates, ResolutionFailure> {
        let data: IpApiResponse =
            serde_json::from_str(body).map_err(|e| ResolutionFailure::Malformed(e.to_string()))?;

        if data.status != SUCCESS_STATUS {
            return Err(ResolutionFailure::Rejected(
                data.message.unwrap_or(data.status),
            ));
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(ResolutionFailure::Malformed(
                "success response without lat/lon".to_string(),
            )),
        }
    }

    fn classify(err: reqwest::Error) -> ResolutionFailure {
        if err.is_timeout() {
            ResolutionFailure::Timeout
        } else {
            ResolutionFailure::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl GeoLocator for IpApiGeoLocator {
    async fn locate(&self, address: &HopAddress) -> Result<Coordinates, ResolutionFailure> {
        if let Some(limiter) = &self.rate_limiter {
            let left = limiter.acquire().await;
            tracing::debug!("locating {} ({} lookups left in window)", address, left);
        }

        let response = self
            .client
            .get(self.lookup_url(address))
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionFailure::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(Self::classify)?;
        Self::parse_body(&body)
    }
}
