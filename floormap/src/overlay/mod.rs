//! Overlay projection and the map rendering seam.
//!
//! [`OverlayProjector`] turns a [`SessionSnapshot`](crate::positioning::SessionSnapshot)
//! into an [`OverlayState`]: camera target, floor image, overlay geometry and
//! markers. It is a pure function; the state is recomputed after every
//! session transition and never patched.
//!
//! [`MapSurface`] is the rendering side. The crate never draws anything
//! itself; [`TracingMapSurface`] only logs what would be drawn.

mod projector;
mod surface;

pub use projector::{
    floor_image_url, OverlayBounds, OverlayProjector, OverlayState, DEFAULT_REGION_DELTA,
};
pub use surface::{
    CameraRequest, MapRegion, MapSurface, Marker, MarkerKind, OverlayDraw, TracingMapSurface,
    OVERLAY_ANCHOR, OVERLAY_Z_INDEX,
};
