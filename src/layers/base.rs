use std::sync::atomic::{AtomicU64, Ordering};

// LayerTrait is unified with LayerOperations in shared traits
pub use crate::traits::LayerOperations as LayerTrait;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out a process-unique layer id such as `triangle_7`
pub fn next_layer_id(prefix: &str) -> String {
    format!("{}_{}", prefix, NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Marker,
    Custom,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Marker => write!(f, "marker"),
            LayerType::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            visible: true,
        }
    }
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self::new(
            next_layer_id("layer"),
            "Layer".to_string(),
            LayerType::Custom,
        )
    }
}
