// Geolocation providers
// One-shot position lookup used when an alert is dispatched

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use crate::notify::types::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation unavailable")]
    Unavailable,

    #[error("Geolocation permission denied")]
    PermissionDenied,
}

/// Asynchronous one-shot position source
pub trait GeolocationProvider: Send + Sync + 'static {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// Fixed position from configuration, or none at all
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocation {
    position: Option<Coordinates>,
}

impl StaticLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        StaticLocation { position }
    }

    pub fn unavailable() -> Self {
        StaticLocation { position: None }
    }
}

impl GeolocationProvider for StaticLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LocationFix {
    Unknown,
    Denied,
    Known(Coordinates),
}

/// Latest position reported by the host (e.g. the webview's geolocation API)
/// The host keeps it current while listening; a configured fallback answers
/// whenever the host has no fix or was denied.
#[derive(Debug, Clone)]
pub struct SharedLocation {
    fix: Arc<RwLock<LocationFix>>,
    fallback: Option<Coordinates>,
}

impl Default for SharedLocation {
    fn default() -> Self {
        SharedLocation {
            fix: Arc::new(RwLock::new(LocationFix::Unknown)),
            fallback: None,
        }
    }
}

impl SharedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Option<Coordinates>) -> Self {
        SharedLocation {
            fallback,
            ..Self::default()
        }
    }

    fn set(&self, fix: LocationFix) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) = fix;
    }

    pub fn report(&self, position: Coordinates) {
        self.set(LocationFix::Known(position));
    }

    pub fn report_denied(&self) {
        self.set(LocationFix::Denied);
    }

    pub fn forget(&self) {
        self.set(LocationFix::Unknown);
    }

    fn lookup(&self) -> Result<Coordinates, GeolocationError> {
        match (*self.fix.read().unwrap_or_else(PoisonError::into_inner), self.fallback) {
            (LocationFix::Known(position), _) => Ok(position),
            (_, Some(fallback)) => Ok(fallback),
            (LocationFix::Denied, None) => Err(GeolocationError::PermissionDenied),
            (LocationFix::Unknown, None) => Err(GeolocationError::Unavailable),
        }
    }
}

impl GeolocationProvider for SharedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.lookup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_location() {
        let here = Coordinates::new(51.5, -0.12);
        assert_eq!(
            StaticLocation::new(Some(here)).current_position().await,
            Ok(here)
        );
        assert_eq!(
            StaticLocation::unavailable().current_position().await,
            Err(GeolocationError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_shared_location_lifecycle() {
        let location = SharedLocation::new();
        assert_eq!(
            location.current_position().await,
            Err(GeolocationError::Unavailable)
        );

        let here = Coordinates::new(35.68, 139.69);
        location.clone().report(here);
        assert_eq!(location.current_position().await, Ok(here));

        location.report_denied();
        assert_eq!(
            location.current_position().await,
            Err(GeolocationError::PermissionDenied)
        );

        location.forget();
        assert_eq!(
            location.current_position().await,
            Err(GeolocationError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_fallback_survives_denial() {
        let fixed = Coordinates::new(40.71, -74.0);
        let location = SharedLocation::with_fallback(Some(fixed));
        assert_eq!(location.current_position().await, Ok(fixed));

        location.report_denied();
        assert_eq!(location.current_position().await, Ok(fixed));

        // A live fix from the host takes precedence
        let here = Coordinates::new(40.73, -73.99);
        location.report(here);
        assert_eq!(location.current_position().await, Ok(here));

        location.forget();
        assert_eq!(location.current_position().await, Ok(fixed));
    }
}
