/*
[INPUT]:  Live geolocation source, coarse server-side lookup
[OUTPUT]: One resolved coordinate tagged with where it came from
[POS]:    Location layer - live fix first, IP-based fallback second
[UPDATE]: When adding geolocation sources or changing fallback order
*/

use async_trait::async_trait;
use helper_map_adapter::{Coordinate, HelperClient, HelperError};
use thiserror::Error;
use tracing::{info, warn};

/// Why the live geolocation signal produced no fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// Live position provider (device GPS, OS location service, ...).
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// Geolocation source backed by an optional fixed position.
///
/// `None` behaves like a device without location support.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGeolocation {
    position: Option<Coordinate>,
}

impl StaticGeolocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    pub fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl GeolocationSource for StaticGeolocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.position
            .ok_or_else(|| GeolocationError::Unavailable("no position fix supplied".to_string()))
    }
}

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Both the live fix and the coarse lookup failed.
#[derive(Debug, Error)]
#[error("Location access denied or unavailable: {live}; fallback lookup failed: {fallback}")]
pub struct ResolveError {
    pub live: GeolocationError,
    #[source]
    pub fallback: HelperError,
}

/// Resolves the user's coordinate, preferring the live source.
pub struct LocationResolver<G> {
    geolocation: G,
    client: HelperClient,
}

impl<G: GeolocationSource> LocationResolver<G> {
    pub fn new(geolocation: G, client: HelperClient) -> Self {
        Self {
            geolocation,
            client,
        }
    }

    pub async fn resolve(&self) -> Result<Resolution, ResolveError> {
        let live = match self.geolocation.current_position().await {
            Ok(coordinate) if coordinate.is_valid() => {
                info!(lat = coordinate.latitude, lng = coordinate.longitude, "live position resolved");
                return Ok(Resolution {
                    coordinate,
                    source: LocationSource::Live,
                });
            }
            Ok(coordinate) => GeolocationError::Unavailable(format!(
                "out of range position ({}, {})",
                coordinate.latitude, coordinate.longitude
            )),
            Err(err) => err,
        };

        warn!(error = %live, "live geolocation failed; trying coarse lookup");
        match self.client.geolocate().await {
            Ok(coordinate) if coordinate.is_valid() => {
                info!(lat = coordinate.latitude, lng = coordinate.longitude, "coarse position resolved");
                Ok(Resolution {
                    coordinate,
                    source: LocationSource::Fallback,
                })
            }
            Ok(coordinate) => Err(ResolveError {
                live,
                fallback: HelperError::InvalidResponse(format!(
                    "unusable coordinate ({}, {})",
                    coordinate.latitude, coordinate.longitude
                )),
            }),
            Err(fallback) => Err(ResolveError { live, fallback }),
        }
    }
}
