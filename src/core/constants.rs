//! Core constants derived from Leaflet defaults and the triangle marker plugin.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Default triangle width in screen pixels.
pub const DEFAULT_TRIANGLE_WIDTH: f64 = 12.0;

/// Default triangle height in screen pixels.
pub const DEFAULT_TRIANGLE_HEIGHT: f64 = 12.0;

/// Default triangle rotation in degrees (apex pointing up).
pub const DEFAULT_TRIANGLE_ROTATION: f64 = 0.0;

/// How much the canvas extends beyond the visible map area, relative to its size.
pub const DEFAULT_RENDERER_PADDING: f64 = 0.1;

/// Extra hit slack the renderer adds to every path, in pixels.
pub const DEFAULT_RENDERER_TOLERANCE: f64 = 0.0;

/// Padding added around dirty regions so antialiased edges get cleared too.
pub const REDRAW_BOUNDS_PADDING: f64 = 1.0;

/// Leaflet's default path color.
pub const DEFAULT_PATH_COLOR: &str = "#3388ff";
