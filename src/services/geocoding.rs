//! Address to coordinate lookup.
//!
//! [`GoogleGeocoder`] talks to the Google Geocoding HTTP API; [`StaticGeocoder`] answers
//! from an in-memory table and is used when no API key is configured.

use crate::model::GeoPoint;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum GeocodeError {
    /// An HTTP transport or deserialization error occurred.
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Address must not be empty")]
    EmptyAddress,

    #[error("No results for '{0}'")]
    NoResults(String),

    /// The API answered with a non-OK status.
    #[error("Geocoding API returned {status}: {message}")]
    Api { status: String, message: String },
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

/// HTTP client for the Google Geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: GeoPoint,
}

impl GeocodeResponse {
    /// First result's location, or the error the API reported.
    pub(crate) fn into_point(self, address: &str) -> Result<GeoPoint, GeocodeError> {
        match self.status.as_str() {
            "OK" => self
                .results
                .into_iter()
                .next()
                .map(|result| result.geometry.location)
                .ok_or_else(|| GeocodeError::NoResults(address.to_string())),
            "ZERO_RESULTS" => Err(GeocodeError::NoResults(address.to_string())),
            _ => Err(GeocodeError::Api {
                message: self.error_message.unwrap_or_default(),
                status: self.status,
            }),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let parsed: GeocodeResponse = response.json().await?;
        let point = parsed.into_point(address);
        match &point {
            Ok(point) => debug!(?point, "Geocoded"),
            Err(e) => warn!(error = %e, "Geocoding failed"),
        }
        point
    }
}

/// Fixed address table. Lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, address: &str, point: GeoPoint) -> Self {
        self.entries.insert(Self::key(address), point);
        self
    }

    fn key(address: &str) -> String {
        address.trim().to_lowercase()
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        self.entries
            .get(&Self::key(address))
            .copied()
            .ok_or_else(|| GeocodeError::NoResults(address.to_string()))
    }
}
