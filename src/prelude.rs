//! Prelude module for common maplet-triangle types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_triangle::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    geo::{IntoLatLng, LatLng, Point},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    path::{FillRule, LineCap, LineJoin, PathOptions, PathStyle},
    triangle::{triangle_marker, TriangleMarker, TriangleMarkerOptions},
};

pub use crate::input::{events::LayerEvent, handler::EventManager};

pub use crate::rendering::{
    canvas::{canvas, default_renderer, lock, CanvasRenderer, RendererOptions, SharedRenderer},
    context::{CanvasCommand, CanvasContext},
    shapes::{triangle_vertices, CanvasPath},
};

pub use crate::traits::{
    LayerProjection, MatrixTransform, Positionable, Redrawable, Styleable, ViewportAware,
};

pub use crate::{Error as MapError, Result};

pub use fxhash::FxHashMap as HashMap;
