//! # maplet-triangle
//!
//! A fixed-size, rotatable triangle marker for the maplet canvas renderer.
//!
//! The marker keeps its size in screen pixels regardless of zoom, can be
//! rotated around its projected center, and is drawn by a 2D-canvas-style
//! immediate-mode renderer shared between all markers registered with it.
//!
//! ```no_run
//! use maplet_triangle::prelude::*;
//!
//! let mut marker = TriangleMarker::new(
//!     LatLng::new(52.2297, 21.0122),
//!     TriangleMarkerOptions::default().width(20.0).rotation(45.0),
//! );
//! marker.set_rotation(90.0);
//! ```

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod traits;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    geo::{IntoLatLng, LatLng, Point},
    viewport::Viewport,
};

pub use crate::layers::{
    base::LayerTrait,
    path::{PathOptions, PathStyle},
    triangle::{triangle_marker, TriangleMarker, TriangleMarkerOptions},
};

pub use crate::input::events::LayerEvent;

pub use crate::rendering::{
    canvas::{canvas, default_renderer, CanvasRenderer, RendererOptions, SharedRenderer},
    context::CanvasContext,
    shapes::CanvasPath,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
