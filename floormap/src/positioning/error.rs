//! Error types for positioning sessions.
//!
//! Every external-service error is terminal for the operation that triggered
//! it and nothing else: the session logs it and keeps reacting to the next
//! event.

use thiserror::Error;

use super::service::SubscriptionHandle;

/// Device location stream failures. The stream keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The user denied location permission.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not produce a fix.
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    /// No fix within the platform's timeout.
    #[error("Location request timed out")]
    Timeout,
}

/// Building list could not be fetched. Resolution is aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildingFetchError {
    /// The positioning service returned an error.
    #[error("Failed to fetch buildings: {0}")]
    Service(String),
}

/// Floor list could not be fetched. The overlay never appears, positioning
/// continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FloorFetchError {
    /// The positioning service returned an error.
    #[error("Failed to fetch floors for building {building_id}: {reason}")]
    Service { building_id: String, reason: String },
}

/// Subscription-level failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositioningError {
    /// Positioning permission has not been granted.
    #[error("Positioning not authorized")]
    NotAuthorized,

    /// The service does not know the requested building.
    #[error("Unknown building {0}")]
    UnknownBuilding(String),

    /// The handle does not refer to a live subscription.
    #[error("Unknown subscription {0}")]
    UnknownSubscription(SubscriptionHandle),

    /// Any other error reported by the positioning service.
    #[error("Positioning service error: {0}")]
    Service(String),
}

/// Errors surfaced by the session state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    BuildingFetch(#[from] BuildingFetchError),

    #[error(transparent)]
    FloorFetch(#[from] FloorFetchError),

    #[error(transparent)]
    Positioning(#[from] PositioningError),
}

impl SessionError {
    /// Short taxonomy label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Location(_) => "location",
            SessionError::BuildingFetch(_) => "building_fetch",
            SessionError::FloorFetch(_) => "floor_fetch",
            SessionError::Positioning(_) => "positioning",
        }
    }
}
