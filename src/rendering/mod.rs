pub mod canvas;
pub mod context;
pub mod shapes;

pub use canvas::{canvas, default_renderer, CanvasRenderer, RendererOptions, SharedRenderer};
pub use context::{CanvasCommand, CanvasContext};
pub use shapes::CanvasPath;
