//! Immediate-mode 2D drawing context in the style of `CanvasRenderingContext2D`.
//!
//! The context does not rasterize anything itself: every call is appended to a
//! display list that a backend replays, the same way the engine's other render
//! contexts queue draw commands. The current transform is tracked as well, so
//! each recorded path point is available both in the local coordinates it was
//! issued in and in device (layer pixel) space.

use crate::core::bounds::Bounds;
use crate::core::geo::Point;
use crate::layers::path::{FillRule, LineCap, LineJoin};
use crate::traits::MatrixTransform;

/// Commands recorded by [`CanvasContext`]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
    BeginPath,
    MoveTo { local: Point, device: Point },
    LineTo { local: Point, device: Point },
    ClosePath,
    SetGlobalAlpha(f64),
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetLineDash(Vec<f64>),
    SetLineDashOffset(f64),
    Fill(FillRule),
    Stroke,
    ClearRect(Bounds),
}

/// Recording 2D canvas context
#[derive(Debug, Clone)]
pub struct CanvasContext {
    commands: Vec<CanvasCommand>,
    transform: [f64; 6],
    saved: Vec<[f64; 6]>,
    /// Current path in device space, one entry per sub-path
    path: Vec<Vec<Point>>,
}

impl CanvasContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            transform: Point::identity_matrix(),
            saved: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
        self.commands.push(CanvasCommand::Save);
    }

    /// Pops the last saved transform. An unbalanced restore is ignored, like on a real canvas.
    pub fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
        self.commands.push(CanvasCommand::Restore);
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        let translation = [1.0, 0.0, 0.0, 1.0, x, y];
        self.transform = Point::combine_matrices(&self.transform, &translation);
        self.commands.push(CanvasCommand::Translate { x, y });
    }

    /// Rotates clockwise (y axis pointing down) by `angle` radians
    pub fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let rotation = [cos, sin, -sin, cos, 0.0, 0.0];
        self.transform = Point::combine_matrices(&self.transform, &rotation);
        self.commands.push(CanvasCommand::Rotate { angle });
    }

    pub fn begin_path(&mut self) {
        self.path.clear();
        self.commands.push(CanvasCommand::BeginPath);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let local = Point::new(x, y);
        let device = local.apply_transform(&self.transform);
        self.path.push(vec![device]);
        self.commands.push(CanvasCommand::MoveTo { local, device });
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let local = Point::new(x, y);
        let device = local.apply_transform(&self.transform);
        match self.path.last_mut() {
            Some(sub_path) => sub_path.push(device),
            None => self.path.push(vec![device]),
        }
        self.commands.push(CanvasCommand::LineTo { local, device });
    }

    pub fn close_path(&mut self) {
        self.commands.push(CanvasCommand::ClosePath);
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(CanvasCommand::SetGlobalAlpha(alpha));
    }

    pub fn set_fill_style(&mut self, color: &str) {
        self.commands.push(CanvasCommand::SetFillStyle(color.to_string()));
    }

    pub fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(CanvasCommand::SetStrokeStyle(color.to_string()));
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.commands.push(CanvasCommand::SetLineWidth(width));
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(CanvasCommand::SetLineCap(cap));
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(CanvasCommand::SetLineJoin(join));
    }

    pub fn set_line_dash(&mut self, segments: &[f64]) {
        self.commands.push(CanvasCommand::SetLineDash(segments.to_vec()));
    }

    pub fn set_line_dash_offset(&mut self, offset: f64) {
        self.commands.push(CanvasCommand::SetLineDashOffset(offset));
    }

    pub fn fill(&mut self, rule: FillRule) {
        self.commands.push(CanvasCommand::Fill(rule));
    }

    pub fn stroke(&mut self) {
        self.commands.push(CanvasCommand::Stroke);
    }

    pub fn clear_rect(&mut self, bounds: &Bounds) {
        self.commands.push(CanvasCommand::ClearRect(bounds.clone()));
    }

    /// Drop the whole display list and reset the drawing state
    pub fn clear(&mut self) {
        self.commands.clear();
        self.path.clear();
        self.saved.clear();
        self.transform = Point::identity_matrix();
    }

    /// Commands recorded since the last [`clear`](Self::clear), in issue order
    pub fn commands(&self) -> &[CanvasCommand] {
        &self.commands
    }

    /// Current transform matrix `[a, b, c, d, e, f]`
    pub fn transform(&self) -> [f64; 6] {
        self.transform
    }

    /// Depth of the save/restore stack
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Device-space points of the current path, sub-paths concatenated
    pub fn current_path(&self) -> Vec<Point> {
        self.path.iter().flatten().copied().collect()
    }
}

impl Default for CanvasContext {
    fn default() -> Self {
        Self::new()
    }
}
