//! postcodes.io lookup client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeResolver, Geocoded};
use crate::error::GeocodeError;
use crate::models::GeoPoint;

pub const POSTCODES_IO_URL: &str = "https://api.postcodes.io";

/// Resolves UK postcodes with `GET {base}/postcodes/{postcode}`.
#[derive(Debug, Clone)]
pub struct PostcodesIoResolver {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    result: Option<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    admin_district: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl PostcodesIoResolver {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GeocodeError::Service(format!("invalid geocoder URL {}: {}", base_url, e))
        })?;
        let client = Client::builder()
            .user_agent(concat!("postfinder/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Service(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn lookup_url(&self, postcode: &str) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GeocodeError::Service(format!("cannot use {} as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .push("postcodes")
            .push(postcode);
        Ok(url)
    }
}

#[async_trait]
impl GeocodeResolver for PostcodesIoResolver {
    async fn resolve(&self, text: &str) -> Result<Geocoded, GeocodeError> {
        let postcode = text.trim();
        if postcode.is_empty() {
            return Err(GeocodeError::InvalidInput(text.to_string()));
        }

        let url = self.lookup_url(postcode)?;
        debug!("Geocoding {} via {}", postcode, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Geocoder request failed for {}: {}", postcode, e);
            GeocodeError::Service(format!("request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.to_string());
            debug!("Geocoder returned {} for {}: {}", status, postcode, message);

            return Err(match status {
                StatusCode::NOT_FOUND => GeocodeError::NotFound(postcode.to_string()),
                StatusCode::BAD_REQUEST => GeocodeError::InvalidInput(postcode.to_string()),
                _ => {
                    warn!("Geocoder error {} for {}: {}", status, postcode, message);
                    GeocodeError::Service(format!("{}: {}", status, message))
                }
            });
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Service(format!("unreadable response: {}", e)))?;

        let result = body
            .result
            .ok_or_else(|| GeocodeError::NotFound(postcode.to_string()))?;

        match (result.latitude, result.longitude) {
            (Some(lat), Some(lon)) if GeoPoint::new(lat, lon).is_valid() => Ok(Geocoded {
                location: GeoPoint::new(lat, lon),
                administrative_area: result.admin_district,
            }),
            _ => Err(GeocodeError::NotFound(postcode.to_string())),
        }
    }
}
