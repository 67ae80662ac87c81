//! Shape routines the canvas renderer runs for path layers during a draw pass.

use crate::core::{bounds::Bounds, geo::Point};
use crate::layers::triangle::TriangleMarker;
use crate::rendering::canvas::CanvasRenderer;
use crate::traits::Styleable;

/// Draw hook the renderer invokes once per layer per draw pass
pub trait CanvasPath {
    fn layer_id(&self) -> &str;

    /// Pixel bounds from the last projection, if any
    fn pixel_bounds(&self) -> Option<&Bounds>;

    /// Emit this layer's geometry onto `renderer`
    fn update_path(&self, renderer: &mut CanvasRenderer);
}

/// Triangle outline in local coordinates centered on the marker point:
/// apex at `(0, -hh)`, base corners at `(±hw, 2 * hh)`.
pub fn triangle_vertices(half_width: f64, half_height: f64) -> [Point; 3] {
    [
        Point::new(0.0, -half_height),
        Point::new(half_width, half_height * 2.0),
        Point::new(-half_width, half_height * 2.0),
    ]
}

impl CanvasRenderer {
    /// Draws `layer` as a triangle rotated about its projected point.
    ///
    /// Does nothing outside a draw pass or when the layer is empty. The context
    /// transform is restored before the shared fill/stroke step runs.
    pub fn update_triangle(&mut self, layer: &TriangleMarker) {
        if !self.is_drawing() || layer.is_empty_in(self.bounds()) {
            return;
        }
        let (Some(point), Some(pixel_bounds)) = (layer.projected_point(), layer.pixel_bounds())
        else {
            return;
        };

        self.register_drawn(layer.layer_id(), pixel_bounds.clone(), layer.style().interactive);

        let rotation = if layer.rotation() != 0.0 {
            layer.rotation().to_radians()
        } else {
            0.0
        };
        let [apex, right, left] = triangle_vertices(layer.width() / 2.0, layer.height() / 2.0);

        let ctx = self.context_mut();
        ctx.save();
        ctx.translate(point.x, point.y);
        if rotation != 0.0 {
            ctx.rotate(rotation);
        }
        ctx.begin_path();
        ctx.move_to(apex.x, apex.y);
        ctx.line_to(right.x, right.y);
        ctx.line_to(left.x, left.y);
        ctx.close_path();
        ctx.restore();

        log::trace!("drew triangle {} at ({:.1}, {:.1})", layer.layer_id(), point.x, point.y);

        self.fill_stroke(layer.style());
    }
}
