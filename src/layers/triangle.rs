//! A triangle marker of a fixed pixel size.
//!
//! The marker is anchored at a geographical position but its width and height
//! are screen pixels, so it keeps the same size at every zoom level. It can be
//! rotated about its projected point; the apex points up at rotation 0 and
//! positive angles turn it clockwise.

use crate::{
    constants::{
        DEFAULT_TRIANGLE_HEIGHT, DEFAULT_TRIANGLE_ROTATION, DEFAULT_TRIANGLE_WIDTH,
        REDRAW_BOUNDS_PADDING,
    },
    core::{
        bounds::Bounds,
        geo::{IntoLatLng, LatLng, Point},
        viewport::Viewport,
    },
    input::{events::LayerEvent, handler::EventManager},
    layers::{
        base::{next_layer_id, LayerProperties, LayerTrait, LayerType},
        path::{PathOptions, PathStyle},
    },
    rendering::{
        canvas::{default_renderer, lock, CanvasRenderer, SharedRenderer},
        shapes::CanvasPath,
    },
    traits::{LayerProjection, Positionable, Redrawable, Styleable, ViewportAware},
    Result,
};

/// Construction options for [`TriangleMarker`]
#[derive(Debug, Clone)]
pub struct TriangleMarkerOptions {
    /// Whether to fill the triangle
    pub fill: bool,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
    /// Rotation in degrees, clockwise
    pub rotation: f64,
    /// Renderer to draw with; the shared default renderer when `None`
    pub renderer: Option<SharedRenderer>,
    /// Initial stroke/fill style
    pub style: PathOptions,
    /// Layer id; generated when `None`
    pub id: Option<String>,
}

impl Default for TriangleMarkerOptions {
    fn default() -> Self {
        Self {
            fill: true,
            width: DEFAULT_TRIANGLE_WIDTH,
            height: DEFAULT_TRIANGLE_HEIGHT,
            rotation: DEFAULT_TRIANGLE_ROTATION,
            renderer: None,
            style: PathOptions::default(),
            id: None,
        }
    }
}

impl TriangleMarkerOptions {
    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn renderer(mut self, renderer: SharedRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn style(mut self, style: PathOptions) -> Self {
        self.style = style;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Creates a triangle marker from any supported coordinate input
pub fn triangle_marker<C: IntoLatLng>(
    coord: C,
    options: TriangleMarkerOptions,
) -> Result<TriangleMarker> {
    Ok(TriangleMarker::new(coord.into_lat_lng()?, options))
}

pub struct TriangleMarker {
    properties: LayerProperties,
    position: LatLng,
    width: f64,
    height: f64,
    rotation: f64,
    style: PathStyle,
    renderer: SharedRenderer,
    /// Cached from the renderer options, which never change after creation
    renderer_tolerance: f64,
    projected_point: Option<Point>,
    pixel_bounds: Option<Bounds>,
    needs_projection: bool,
    events: EventManager,
}

impl TriangleMarker {
    /// Creates a marker at an already validated position.
    ///
    /// Use [`triangle_marker`] for raw input; it rejects non-finite or malformed
    /// coordinates instead of carrying them into projection.
    pub fn new(position: LatLng, options: TriangleMarkerOptions) -> Self {
        if !position.lat.is_finite() || !position.lng.is_finite() {
            log::warn!(
                "triangle marker created at non-finite position ({}, {})",
                position.lat,
                position.lng
            );
        }
        let renderer = options.renderer.unwrap_or_else(default_renderer);
        let renderer_tolerance = lock(&renderer).options().tolerance;

        let mut style = PathStyle {
            fill: options.fill,
            ..PathStyle::default()
        };
        style.apply(&options.style);

        let id = options.id.unwrap_or_else(|| next_layer_id("triangle"));

        Self {
            properties: LayerProperties::new(id, "Triangle".to_string(), LayerType::Marker),
            position,
            width: options.width,
            height: options.height,
            rotation: options.rotation,
            style,
            renderer,
            renderer_tolerance,
            projected_point: None,
            pixel_bounds: None,
            needs_projection: true,
            events: EventManager::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the width in pixels. Non-positive widths are accepted and make the marker empty.
    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self.needs_projection = true;
        self.redraw()
    }

    /// Sets the height in pixels. Non-positive heights are accepted and make the marker empty.
    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.height = height;
        self.needs_projection = true;
        self.redraw()
    }

    /// Sets the rotation in degrees, clockwise
    pub fn set_rotation(&mut self, rotation: f64) -> &mut Self {
        self.rotation = rotation;
        self.redraw()
    }

    pub fn renderer(&self) -> &SharedRenderer {
        &self.renderer
    }

    /// Position in layer pixels from the last projection
    pub fn projected_point(&self) -> Option<Point> {
        self.projected_point
    }

    /// Bounding box in layer pixels from the last projection
    pub fn pixel_bounds(&self) -> Option<&Bounds> {
        self.pixel_bounds.as_ref()
    }

    /// True after construction and after any change to position, size or stroke,
    /// until the next [`reproject_and_bound`](Self::reproject_and_bound)
    pub fn needs_projection(&self) -> bool {
        self.needs_projection
    }

    /// Recomputes the projected point and pixel bounds for the current view.
    ///
    /// The host calls this whenever the view changes, and before drawing a
    /// marker that [`needs_projection`](Self::needs_projection). When the marker
    /// was stale its new area is added to the renderer's dirty region, so the next
    /// partial pass repaints it where it now is. A view change still needs a full
    /// redraw requested by the host.
    pub fn reproject_and_bound<P: LayerProjection + ?Sized>(&mut self, projector: &P) {
        let was_stale = self.needs_projection;
        self.projected_point = Some(projector.lat_lng_to_layer_point(&self.position));
        self.update_bounds();
        self.needs_projection = false;

        if was_stale {
            if let Some(area) = self.dirty_area() {
                lock(&self.renderer).mark_dirty(area);
            }
        }
    }

    /// Area to repaint for this marker: its bounds grown by the stroke and a pixel
    fn dirty_area(&self) -> Option<Bounds> {
        self.pixel_bounds
            .as_ref()
            .map(|bounds| bounds.expanded(self.style.weight + REDRAW_BOUNDS_PADDING))
    }

    fn update_bounds(&mut self) {
        if let Some(point) = self.projected_point {
            let tolerance = self.click_tolerance();
            let half_extent = Point::new(
                self.width / 2.0 + tolerance,
                self.height / 2.0 + tolerance,
            );
            self.pixel_bounds = Some(Bounds::around(point, half_extent));
        }
    }

    /// Whether the marker would draw nothing: a non-positive dimension, no
    /// projection yet, or bounds entirely outside the renderer's visible region.
    ///
    /// Locks the marker's renderer; inside a draw pass use [`is_empty_in`](Self::is_empty_in).
    pub fn is_empty(&self) -> bool {
        let renderer = lock(&self.renderer);
        self.is_empty_in(renderer.bounds())
    }

    /// [`is_empty`](Self::is_empty) against an explicit visible region
    pub fn is_empty_in(&self, visible: Option<&Bounds>) -> bool {
        if !(self.width > 0.0 && self.height > 0.0) {
            return true;
        }
        match (&self.pixel_bounds, visible) {
            (None, _) => true,
            (Some(pixel_bounds), Some(visible)) => !visible.intersects(pixel_bounds),
            (Some(_), None) => false,
        }
    }

    /// Bounding-box hit test in layer pixels. The triangle's exact outline is not
    /// consulted; edges count as inside.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.pixel_bounds
            .as_ref()
            .map(|bounds| bounds.contains(point))
            .unwrap_or(false)
    }

    /// Subscribe to marker events (`"move"`)
    pub fn on<F>(&mut self, event_type: &str, callback: F) -> &mut Self
    where
        F: Fn(&LayerEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
        self
    }

    pub fn off(&mut self, event_type: &str) -> &mut Self {
        self.events.off(event_type);
        self
    }

    /// Detaches the marker from its renderer, scheduling a repaint of the area it covered
    pub fn remove_from_renderer(&self) -> bool {
        lock(&self.renderer).remove_layer(&self.properties.id)
    }
}

impl Positionable for TriangleMarker {
    fn position(&self) -> LatLng {
        self.position
    }

    fn set_position<C: IntoLatLng>(&mut self, coord: C) -> Result<&mut Self> {
        self.position = coord.into_lat_lng()?;
        self.needs_projection = true;
        self.redraw();

        self.events.fire(&LayerEvent::Move {
            layer_id: self.properties.id.clone(),
            lat_lng: self.position,
        });
        Ok(self)
    }
}

impl Styleable for TriangleMarker {
    fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Merges `options` into the style, then re-applies width and height from the
    /// options when given (and non-zero), otherwise from the current size.
    fn set_style(&mut self, options: &PathOptions) -> &mut Self {
        let width = options
            .width
            .filter(|width| *width != 0.0 && !width.is_nan())
            .unwrap_or(self.width);
        let height = options
            .height
            .filter(|height| *height != 0.0 && !height.is_nan())
            .unwrap_or(self.height);

        self.style.apply(options);
        self.redraw();

        self.set_width(width);
        self.set_height(height);
        if self.style.stroke && options.weight.is_some() {
            self.update_bounds();
        }
        self
    }

    fn click_tolerance(&self) -> f64 {
        let stroke_slack = if self.style.stroke {
            self.style.weight / 2.0
        } else {
            0.0
        };
        stroke_slack + self.renderer_tolerance
    }
}

impl Redrawable for TriangleMarker {
    fn redraw(&mut self) -> &mut Self {
        let area = self.dirty_area();
        lock(&self.renderer).request_redraw(area);
        self
    }
}

impl ViewportAware for TriangleMarker {
    fn on_viewport_changed(&mut self, viewport: &Viewport) -> Result<()> {
        self.reproject_and_bound(viewport);
        Ok(())
    }
}

impl CanvasPath for TriangleMarker {
    fn layer_id(&self) -> &str {
        &self.properties.id
    }

    fn pixel_bounds(&self) -> Option<&Bounds> {
        TriangleMarker::pixel_bounds(self)
    }

    fn update_path(&self, renderer: &mut CanvasRenderer) {
        renderer.update_triangle(self);
    }
}

impl LayerTrait for TriangleMarker {
    crate::impl_layer_trait!(TriangleMarker, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": self.position,
            "width": self.width,
            "height": self.height,
            "rotation": self.rotation,
            "fill": self.style.fill,
            "style": self.style,
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let options = PathOptions::from_json(options)?;
        self.set_style(&options);
        Ok(())
    }
}

impl std::fmt::Debug for TriangleMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleMarker")
            .field("id", &self.properties.id)
            .field("position", &self.position)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation", &self.rotation)
            .field("projected_point", &self.projected_point)
            .field("pixel_bounds", &self.pixel_bounds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::canvas::{canvas, RendererOptions};
    use serde_json::json;

    struct FixedProjection(Point);

    impl LayerProjection for FixedProjection {
        fn lat_lng_to_layer_point(&self, _lat_lng: &LatLng) -> Point {
            self.0
        }
    }

    fn marker(options: TriangleMarkerOptions) -> TriangleMarker {
        let options = options.renderer(canvas(RendererOptions::default()));
        TriangleMarker::new(LatLng::new(52.23, 21.01), options)
    }

    fn redraws(marker: &TriangleMarker) -> u64 {
        lock(marker.renderer()).redraw_requests()
    }

    #[test]
    fn test_defaults() {
        let m = marker(TriangleMarkerOptions::default());
        assert_eq!(m.width(), 12.0);
        assert_eq!(m.height(), 12.0);
        assert_eq!(m.rotation(), 0.0);
        assert!(m.style().fill);
        assert!(m.needs_projection());
        assert!(m.pixel_bounds().is_none());
        assert_eq!(m.layer_type(), LayerType::Marker);
        assert!(m.id().starts_with("triangle_"));
    }

    #[test]
    fn test_style_options_apply_over_fill_flag() {
        let m = marker(
            TriangleMarkerOptions::default()
                .fill(true)
                .style(PathOptions::new().fill(false).color("red"))
                .id("custom"),
        );
        assert!(!m.style().fill);
        assert_eq!(m.style().color, "red");
        assert_eq!(m.id(), "custom");
    }

    #[test]
    fn test_bounds_include_click_tolerance() {
        let mut m = marker(TriangleMarkerOptions::default().width(20.0).height(10.0));
        // default stroke weight 3 => tolerance 1.5
        m.reproject_and_bound(&FixedProjection(Point::new(50.0, 50.0)));
        assert_eq!(
            m.pixel_bounds(),
            Some(&Bounds::from_coords(38.5, 43.5, 61.5, 56.5))
        );
        assert!(!m.needs_projection());
    }

    #[test]
    fn test_renderer_tolerance_adds_to_stroke_slack() {
        let renderer = canvas(RendererOptions {
            tolerance: 2.0,
            ..RendererOptions::default()
        });
        let m = TriangleMarker::new(
            LatLng::default(),
            TriangleMarkerOptions::default().renderer(renderer),
        );
        assert_eq!(m.click_tolerance(), 3.5);
    }

    #[test]
    fn test_set_style_with_weight_rebounds() {
        let mut m = marker(TriangleMarkerOptions::default());
        m.reproject_and_bound(&FixedProjection(Point::new(0.0, 0.0)));
        m.set_style(&PathOptions::new().weight(9.0));
        assert_eq!(
            m.pixel_bounds(),
            Some(&Bounds::from_coords(-10.5, -10.5, 10.5, 10.5))
        );
    }

    #[test]
    fn test_set_style_rebounds_with_new_size_and_weight() {
        let mut m = marker(TriangleMarkerOptions::default());
        m.reproject_and_bound(&FixedProjection(Point::new(0.0, 0.0)));
        m.set_style(&PathOptions::new().weight(9.0).width(30.0));
        assert_eq!(
            m.pixel_bounds(),
            Some(&Bounds::from_coords(-19.5, -10.5, 19.5, 10.5))
        );
    }

    #[test]
    fn test_reprojecting_a_stale_marker_marks_its_new_area_dirty() {
        let mut m = marker(TriangleMarkerOptions::default());
        m.reproject_and_bound(&FixedProjection(Point::new(0.0, 0.0)));
        lock(m.renderer()).draw_layers([&m as &dyn CanvasPath]);

        m.set_position((1.0, 1.0)).unwrap();
        m.reproject_and_bound(&FixedProjection(Point::new(200.0, 0.0)));

        // old area from the request, new area from the reprojection
        let area = lock(m.renderer()).redraw_area().cloned().unwrap();
        assert_eq!(area, Bounds::from_coords(-11.5, -11.5, 211.5, 11.5));

        // an up-to-date marker leaves the dirty region alone
        lock(m.renderer()).draw_layers(std::iter::empty());
        m.reproject_and_bound(&FixedProjection(Point::new(200.0, 0.0)));
        assert!(!lock(m.renderer()).needs_redraw());
    }

    #[test]
    fn test_set_style_zero_size_falls_back_to_current() {
        let mut m = marker(TriangleMarkerOptions::default().width(20.0).height(10.0));
        m.set_style(&PathOptions::new().width(0.0).height(f64::NAN));
        assert_eq!(m.width(), 20.0);
        assert_eq!(m.height(), 10.0);

        m.set_style(&PathOptions::new().width(30.0));
        assert_eq!(m.width(), 30.0);
        assert_eq!(m.height(), 10.0);
    }

    #[test]
    fn test_redraw_area_covers_stroke() {
        let mut m = marker(TriangleMarkerOptions::default());
        m.reproject_and_bound(&FixedProjection(Point::new(100.0, 100.0)));
        m.set_rotation(10.0);

        // bounds 92.5..107.5 grown by weight 3 + 1
        let area = lock(m.renderer()).redraw_area().cloned();
        assert_eq!(area, Some(Bounds::from_coords(88.5, 88.5, 111.5, 111.5)));
    }

    #[test]
    fn test_invalid_position_leaves_marker_untouched() {
        let mut m = marker(TriangleMarkerOptions::default());
        let before = redraws(&m);

        assert!(m.set_position(json!({"lat": "x"})).is_err());
        assert_eq!(m.position(), LatLng::new(52.23, 21.01));
        assert_eq!(redraws(&m), before);
    }

    #[test]
    fn test_triangle_marker_constructor_normalizes_input() {
        let m = triangle_marker(
            [10.0, 20.0],
            TriangleMarkerOptions::default().renderer(canvas(RendererOptions::default())),
        )
        .unwrap();
        assert_eq!(m.position(), LatLng::new(10.0, 20.0));

        assert!(triangle_marker(json!("nowhere"), TriangleMarkerOptions::default()).is_err());
        assert!(
            triangle_marker(LatLng::new(f64::NAN, 0.0), TriangleMarkerOptions::default()).is_err()
        );
    }

    #[test]
    fn test_options_round_trip() {
        let mut m = marker(TriangleMarkerOptions::default().rotation(45.0));
        let options = m.options();
        assert_eq!(options["rotation"], json!(45.0));
        assert_eq!(options["width"], json!(12.0));
        assert_eq!(options["style"]["color"], json!("#3388ff"));

        m.set_options(json!({"color": "red", "height": 30.0})).unwrap();
        assert_eq!(m.style().color, "red");
        assert_eq!(m.height(), 30.0);
        assert_eq!(m.width(), 12.0);

        assert!(m.set_options(json!({"weight": "heavy"})).is_err());
    }

    #[test]
    fn test_layer_trait_boilerplate() {
        let mut m = marker(TriangleMarkerOptions::default());
        m.set_z_index(4);
        m.set_visible(false);
        assert_eq!(m.z_index(), 4);
        assert!(!m.is_visible());
        assert_eq!(m.name(), "Triangle");
        assert!(m.as_any().downcast_ref::<TriangleMarker>().is_some());
    }

    #[test]
    fn test_viewport_change_reprojects() {
        let mut m = marker(TriangleMarkerOptions::default());
        let viewport = Viewport::new(LatLng::new(52.23, 21.01), 10.0, Point::new(400.0, 400.0));
        m.on_viewport_changed(&viewport).unwrap();

        let point = m.projected_point().unwrap();
        assert!(point.x.abs() < 1.0 && point.y.abs() < 1.0);
        assert!(m.requires_viewport_updates());
    }
}
