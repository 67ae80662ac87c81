//! Shared trait abstractions for common patterns
//!
//! Layers are assembled from small capability traits instead of a base class:
//! a marker is [`Positionable`], [`Styleable`] and [`Redrawable`], reacts to
//! view changes through [`ViewportAware`] and is managed by the host through
//! [`LayerOperations`].

use crate::{
    core::geo::{IntoLatLng, LatLng, Point},
    layers::path::{PathOptions, PathStyle},
    Result,
};

/// Maps a geographical coordinate to a pixel position in the map's layer space
pub trait LayerProjection {
    fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point;
}

/// Trait for viewport-aware components
/// Standardizes viewport change handling
pub trait ViewportAware {
    /// Handle viewport changes
    fn on_viewport_changed(&mut self, viewport: &crate::core::viewport::Viewport) -> Result<()>;

    /// Check if component requires viewport updates
    fn requires_viewport_updates(&self) -> bool {
        true
    }
}

/// Unified matrix transformation operations
///
/// Matrices use the canvas layout `[a, b, c, d, e, f]`:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
pub trait MatrixTransform {
    /// Apply 2D transformation matrix
    fn apply_transform(&self, matrix: &[f64; 6]) -> Self;

    /// Identity matrix
    fn identity_matrix() -> [f64; 6] {
        [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
    }

    /// Combine two transformation matrices (`a` applied after `b`)
    fn combine_matrices(a: &[f64; 6], b: &[f64; 6]) -> [f64; 6] {
        [
            a[0] * b[0] + a[2] * b[1],        // a
            a[1] * b[0] + a[3] * b[1],        // b
            a[0] * b[2] + a[2] * b[3],        // c
            a[1] * b[2] + a[3] * b[3],        // d
            a[0] * b[4] + a[2] * b[5] + a[4], // e
            a[1] * b[4] + a[3] * b[5] + a[5], // f
        ]
    }
}

impl MatrixTransform for Point {
    fn apply_transform(&self, matrix: &[f64; 6]) -> Self {
        Point::new(
            matrix[0] * self.x + matrix[2] * self.y + matrix[4], // a*x + c*y + e
            matrix[1] * self.x + matrix[3] * self.y + matrix[5], // b*x + d*y + f
        )
    }
}

/// Components anchored at a geographical position
pub trait Positionable {
    fn position(&self) -> LatLng;

    /// Normalizes and stores a new position. Malformed input is returned as an error
    /// and leaves the component untouched.
    fn set_position<C: IntoLatLng>(&mut self, coord: C) -> Result<&mut Self>;
}

/// Components styled like a vector path
pub trait Styleable {
    fn style(&self) -> &PathStyle;

    fn set_style(&mut self, options: &PathOptions) -> &mut Self;

    /// Extra hit slack in pixels derived from the stroke
    fn click_tolerance(&self) -> f64;
}

/// Components that ask their renderer to repaint them
pub trait Redrawable {
    fn redraw(&mut self) -> &mut Self;
}

/// Trait for layer-like objects
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> crate::layers::base::LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Get layer options
    fn options(&self) -> serde_json::Value;

    /// Set layer options
    fn set_options(&mut self, options: serde_json::Value) -> Result<()>;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
