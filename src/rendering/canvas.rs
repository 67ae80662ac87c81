//! The canvas renderer: one shared drawing surface for many path layers.
//!
//! Layers do not draw whenever they change. They record a redraw request (and the
//! pixel area it affects) on their renderer; the host later runs a draw pass with
//! [`CanvasRenderer::draw_layers`], during which each affected layer's
//! [`CanvasPath::update_path`] hook emits its geometry onto the shared context.

use crate::constants::{DEFAULT_RENDERER_PADDING, DEFAULT_RENDERER_TOLERANCE};
use crate::core::{bounds::Bounds, geo::Point, viewport::Viewport};
use crate::layers::path::PathStyle;
use crate::prelude::HashMap;
use crate::rendering::{context::CanvasContext, shapes::CanvasPath};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A renderer shared between every layer registered with it
pub type SharedRenderer = Arc<Mutex<CanvasRenderer>>;

static DEFAULT_RENDERER: Lazy<SharedRenderer> = Lazy::new(|| {
    log::debug!("creating process-wide default canvas renderer");
    canvas(RendererOptions::default())
});

/// Creates a new, independent canvas renderer
pub fn canvas(options: RendererOptions) -> SharedRenderer {
    Arc::new(Mutex::new(CanvasRenderer::new(options)))
}

/// The renderer used by layers that were not given one explicitly.
///
/// It is created on first use and shared by every such layer for the rest of
/// the process, so they all draw onto the same surface.
pub fn default_renderer() -> SharedRenderer {
    DEFAULT_RENDERER.clone()
}

/// Locks a shared renderer. A poisoned lock still holds a consistent renderer,
/// since no renderer method can panic halfway through a mutation.
pub fn lock(renderer: &SharedRenderer) -> MutexGuard<'_, CanvasRenderer> {
    renderer.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererOptions {
    /// How far the surface extends past the visible map, relative to the map size
    pub padding: f64,
    /// Extra hit slack added to every path, in pixels
    pub tolerance: f64,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_RENDERER_PADDING,
            tolerance: DEFAULT_RENDERER_TOLERANCE,
        }
    }
}

/// Bookkeeping for a layer drawn in a previous pass
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnLayer {
    pub id: String,
    pub pixel_bounds: Bounds,
    pub interactive: bool,
    sequence: u64,
}

#[derive(Debug)]
pub struct CanvasRenderer {
    options: RendererOptions,
    ctx: CanvasContext,
    drawing: bool,
    /// Visible pixel region, in layer points. `None` until attached to a view.
    bounds: Option<Bounds>,
    drawn_layers: HashMap<String, DrawnLayer>,
    draw_sequence: u64,
    redraw_requested: bool,
    redraw_bounds: Option<Bounds>,
    full_redraw: bool,
    redraw_requests: u64,
}

impl CanvasRenderer {
    pub fn new(options: RendererOptions) -> Self {
        Self {
            options,
            ctx: CanvasContext::new(),
            drawing: false,
            bounds: None,
            drawn_layers: HashMap::default(),
            draw_sequence: 0,
            redraw_requested: false,
            redraw_bounds: None,
            full_redraw: false,
            redraw_requests: 0,
        }
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn context(&self) -> &CanvasContext {
        &self.ctx
    }

    pub(crate) fn context_mut(&mut self) -> &mut CanvasContext {
        &mut self.ctx
    }

    /// Whether a draw pass is in progress
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// The currently visible pixel region
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    /// Recomputes the visible region from the view: the viewport rectangle in
    /// layer points, grown by `padding` times its size on every side.
    pub fn update_bounds(&mut self, viewport: &Viewport) {
        let padding = self.options.padding;
        let min = viewport
            .container_point_to_layer_point(&viewport.size.multiply(-padding))
            .floor();
        let max = min.add(&viewport.size.multiply(1.0 + padding * 2.0));
        self.bounds = Some(Bounds::new(min, max));
    }

    /// Asks for a repaint of `area`, or of the whole surface when `None`
    pub fn request_redraw(&mut self, area: Option<Bounds>) {
        self.redraw_requests += 1;
        self.redraw_requested = true;
        match area {
            Some(area) => {
                self.redraw_bounds = Some(match self.redraw_bounds.take() {
                    Some(existing) => existing.extend_with(&area),
                    None => area,
                });
            }
            None => self.full_redraw = true,
        }
    }

    /// Adds `area` to the region the next pass repaints without counting it as a
    /// request. Used when a layer lands somewhere new after reprojection.
    pub fn mark_dirty(&mut self, area: Bounds) {
        self.redraw_requested = true;
        self.redraw_bounds = Some(match self.redraw_bounds.take() {
            Some(existing) => existing.extend_with(&area),
            None => area,
        });
    }

    /// Total redraw requests received
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Whether a draw pass is pending
    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    /// Dirty region of the pending pass; `None` means everything is dirty
    pub fn redraw_area(&self) -> Option<&Bounds> {
        if self.full_redraw {
            None
        } else {
            self.redraw_bounds.as_ref()
        }
    }

    /// Runs a draw pass over `layers`, in order.
    ///
    /// Only the dirty region is cleared and only layers touching it are redrawn;
    /// a full redraw (or no pending request at all) repaints everything. The
    /// context afterwards holds just this pass's commands, starting with the
    /// `ClearRect` of a partial pass, for a backend to replay onto its surface.
    pub fn draw_layers<'a, I>(&mut self, layers: I)
    where
        I: IntoIterator<Item = &'a dyn CanvasPath>,
    {
        let area = if self.full_redraw {
            None
        } else {
            self.redraw_bounds.take()
        };

        self.ctx.clear();
        match &area {
            Some(area) => {
                self.ctx.clear_rect(area);
                // whatever was painted there is gone until redrawn below
                self.drawn_layers
                    .retain(|_, layer| !layer.pixel_bounds.intersects(area));
            }
            None => self.drawn_layers.clear(),
        }

        self.drawing = true;
        let mut drawn = 0usize;
        for layer in layers {
            let touches_area = match (&area, layer.pixel_bounds()) {
                (None, _) => true,
                (Some(area), Some(pixel_bounds)) => pixel_bounds.intersects(area),
                (Some(_), None) => false,
            };
            if touches_area {
                layer.update_path(self);
                drawn += 1;
            }
        }
        self.drawing = false;

        self.redraw_requested = false;
        self.redraw_bounds = None;
        self.full_redraw = false;

        log::debug!(
            "canvas pass drew {} layers ({})",
            drawn,
            if area.is_some() { "partial" } else { "full" }
        );
    }

    /// Records that `id` was drawn in the current pass
    pub fn register_drawn(&mut self, id: &str, pixel_bounds: Bounds, interactive: bool) {
        self.draw_sequence += 1;
        self.drawn_layers.insert(
            id.to_string(),
            DrawnLayer {
                id: id.to_string(),
                pixel_bounds,
                interactive,
                sequence: self.draw_sequence,
            },
        );
    }

    pub fn is_drawn(&self, id: &str) -> bool {
        self.drawn_layers.contains_key(id)
    }

    pub fn drawn_layer(&self, id: &str) -> Option<&DrawnLayer> {
        self.drawn_layers.get(id)
    }

    /// Forgets a layer and schedules a repaint of the area it covered
    pub fn remove_layer(&mut self, id: &str) -> bool {
        match self.drawn_layers.remove(id) {
            Some(layer) => {
                log::debug!("removing layer {} from canvas", id);
                self.request_redraw(Some(layer.pixel_bounds));
                true
            }
            None => false,
        }
    }

    /// Topmost interactive layer whose pixel bounds contain `point`
    pub fn layer_at(&self, point: &Point) -> Option<&str> {
        self.drawn_layers
            .values()
            .filter(|layer| layer.interactive && layer.pixel_bounds.contains(point))
            .max_by_key(|layer| layer.sequence)
            .map(|layer| layer.id.as_str())
    }

    /// Applies fill and stroke for the current path according to `style`
    pub fn fill_stroke(&mut self, style: &PathStyle) {
        let ctx = &mut self.ctx;

        if style.fill {
            ctx.set_global_alpha(style.fill_opacity);
            ctx.set_fill_style(style.effective_fill_color());
            ctx.fill(style.fill_rule);
        }

        if style.stroke && style.weight != 0.0 {
            ctx.set_line_dash(style.dash_array.as_deref().unwrap_or(&[]));
            if let Some(offset) = style.dash_offset {
                ctx.set_line_dash_offset(offset);
            }
            ctx.set_global_alpha(style.opacity);
            ctx.set_line_width(style.weight);
            ctx.set_stroke_style(&style.color);
            ctx.set_line_cap(style.line_cap);
            ctx.set_line_join(style.line_join);
            ctx.stroke();
        }
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new(RendererOptions::default())
    }
}
