//! Core state types for positioning sessions.
//!
//! - [`FixSource`] - Which collaborator produced a fix
//! - [`Fix`] - A single location/position observation
//! - [`SessionPhase`] - Where the session state machine currently is
//! - [`SessionSnapshot`] - Immutable copy of the session's observable state

use std::time::{Duration, Instant};

use super::building::{Building, Floor};
use super::service::SubscriptionHandle;
use crate::geo::LatLon;

/// Source of a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixSource {
    /// Coarse device geolocation (GPS/network).
    Geolocation,
    /// Building-scoped indoor positioning stream.
    IndoorPositioning,
}

impl std::fmt::Display for FixSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geolocation => write!(f, "Geolocation"),
            Self::IndoorPositioning => write!(f, "Indoor"),
        }
    }
}

/// A single location or position observation.
///
/// Fixes are immutable snapshots: the latest fix from a source replaces
/// the previous one, it is never merged into it.
///
/// Equality compares the observation only, not when it was received.
#[derive(Debug, Clone)]
pub struct Fix {
    /// Which collaborator produced this fix.
    pub source: FixSource,

    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Bearing in degrees (0-360), used to rotate the map marker.
    pub bearing: f64,

    /// Horizontal accuracy in meters, if the source reports one.
    pub accuracy: Option<f64>,

    /// When this fix was received.
    pub timestamp: Instant,
}

impl Fix {
    /// Create a coarse fix from device geolocation.
    ///
    /// Devices report a negative heading when it is unknown; that is
    /// normalized to 0.
    pub fn from_geolocation(
        latitude: f64,
        longitude: f64,
        heading: f64,
        accuracy: Option<f64>,
    ) -> Self {
        Self {
            source: FixSource::Geolocation,
            latitude,
            longitude,
            bearing: if heading.is_finite() && heading >= 0.0 {
                heading
            } else {
                0.0
            },
            accuracy,
            timestamp: Instant::now(),
        }
    }

    /// Create a fix from the indoor positioning stream.
    pub fn from_indoor(latitude: f64, longitude: f64, bearing: f64, accuracy: Option<f64>) -> Self {
        Self {
            source: FixSource::IndoorPositioning,
            latitude,
            longitude,
            bearing,
            accuracy,
            timestamp: Instant::now(),
        }
    }

    /// Time since the fix was received.
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// The fix coordinates as a point.
    #[inline]
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

impl PartialEq for Fix {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.bearing == other.bearing
            && self.accuracy == other.accuracy
    }
}

/// Phase of the positioning session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No building selected, no subscription.
    #[default]
    Idle,
    /// Fetching buildings for the current coarse location.
    Resolving,
    /// A building is selected and its subscription is live.
    Active,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Resolving => write!(f, "Resolving"),
            Self::Active => write!(f, "Active"),
        }
    }
}

/// Observable session state, copied out after every transition.
///
/// Everything the overlay projector needs is in here, so projection is a
/// pure function of a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: SessionPhase,

    /// Latest coarse location.
    pub location: Option<Fix>,

    /// Latest indoor position (cleared when leaving the building).
    pub position: Option<Fix>,

    /// Building the session is scoped to.
    pub building: Option<Building>,

    /// Floors of the current building, once fetched.
    pub floors: Option<Vec<Floor>>,

    /// Floor identifier reported by the latest indoor fix.
    pub floor_id: Option<String>,

    /// Handle of the live positioning subscription.
    pub subscription: Option<SubscriptionHandle>,
}

impl SessionSnapshot {
    /// Check if the session has a live indoor position.
    pub fn is_indoor(&self) -> bool {
        self.position.is_some()
    }

    /// Identifier of the current building, if any.
    pub fn building_id(&self) -> Option<&str> {
        self.building.as_ref().map(|b| b.id.as_str())
    }
}
