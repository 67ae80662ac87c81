//! Stroke and fill styling shared by canvas path layers.
//!
//! [`PathStyle`] is the complete style a path is drawn with; [`PathOptions`] is a
//! partial update merged into it by `Styleable::set_style`. Field names follow the
//! usual web-map JSON spelling (`fillColor`, `dashArray`, ...), so styles can be
//! read straight from configuration files.

use crate::constants::DEFAULT_PATH_COLOR;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// Full style of a vector path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Whether to draw the outline
    pub stroke: bool,
    /// Stroke color (any CSS color)
    pub color: String,
    /// Stroke width in pixels
    pub weight: f64,
    /// Stroke opacity (0.0 to 1.0)
    pub opacity: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Dash pattern; `None` draws a solid line
    pub dash_array: Option<Vec<f64>>,
    pub dash_offset: Option<f64>,
    /// Whether to fill the path
    pub fill: bool,
    /// Fill color; falls back to `color` when unset
    pub fill_color: Option<String>,
    /// Fill opacity (0.0 to 1.0)
    pub fill_opacity: f64,
    pub fill_rule: FillRule,
    /// Whether the path takes part in pointer hit-testing
    pub interactive: bool,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke: true,
            color: DEFAULT_PATH_COLOR.to_string(),
            weight: 3.0,
            opacity: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash_array: None,
            dash_offset: None,
            fill: false,
            fill_color: None,
            fill_opacity: 0.2,
            fill_rule: FillRule::EvenOdd,
            interactive: true,
        }
    }
}

impl PathStyle {
    /// Color used for filling
    pub fn effective_fill_color(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(&self.color)
    }

    /// Merge a partial update into this style
    pub fn apply(&mut self, options: &PathOptions) {
        if let Some(stroke) = options.stroke {
            self.stroke = stroke;
        }
        if let Some(color) = &options.color {
            self.color = color.clone();
        }
        if let Some(weight) = options.weight {
            self.weight = weight;
        }
        if let Some(opacity) = options.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(line_cap) = options.line_cap {
            self.line_cap = line_cap;
        }
        if let Some(line_join) = options.line_join {
            self.line_join = line_join;
        }
        if let Some(dash_array) = &options.dash_array {
            self.dash_array = Some(dash_array.clone());
        }
        if let Some(dash_offset) = options.dash_offset {
            self.dash_offset = Some(dash_offset);
        }
        if let Some(fill) = options.fill {
            self.fill = fill;
        }
        if let Some(fill_color) = &options.fill_color {
            self.fill_color = Some(fill_color.clone());
        }
        if let Some(fill_opacity) = options.fill_opacity {
            self.fill_opacity = fill_opacity.clamp(0.0, 1.0);
        }
        if let Some(fill_rule) = options.fill_rule {
            self.fill_rule = fill_rule;
        }
        if let Some(interactive) = options.interactive {
            self.interactive = interactive;
        }
    }
}

/// Partial style update. Unset fields leave the current style untouched.
///
/// `width` and `height` are not part of the stroke style; layers with a pixel size
/// (like the triangle marker) pick them up after the style has been merged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathOptions {
    pub stroke: Option<bool>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub opacity: Option<f64>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub dash_array: Option<Vec<f64>>,
    pub dash_offset: Option<f64>,
    pub fill: Option<bool>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub fill_rule: Option<FillRule>,
    pub interactive: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Keys this crate does not understand
    #[serde(flatten)]
    pub unknown: serde_json::Map<String, serde_json::Value>,
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON such as `{"color": "red", "fillOpacity": 0.5}`
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let options: PathOptions = serde_json::from_value(value).map_err(MapError::from)?;
        if !options.unknown.is_empty() {
            log::warn!(
                "ignoring unknown style options: {:?}",
                options.unknown.keys().collect::<Vec<_>>()
            );
        }
        Ok(options)
    }

    pub fn stroke(mut self, stroke: bool) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn fill_color(mut self, fill_color: impl Into<String>) -> Self {
        self.fill_color = Some(fill_color.into());
        self
    }

    pub fn fill_opacity(mut self, fill_opacity: f64) -> Self {
        self.fill_opacity = Some(fill_opacity);
        self
    }

    pub fn dash_array(mut self, dash_array: Vec<f64>) -> Self {
        self.dash_array = Some(dash_array);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}
