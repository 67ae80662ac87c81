use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Events emitted by individual layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerEvent {
    /// The layer was moved to a new geographical position
    Move { layer_id: String, lat_lng: LatLng },
}

impl LayerEvent {
    /// Name listeners subscribe with
    pub fn event_type(&self) -> &'static str {
        match self {
            LayerEvent::Move { .. } => "move",
        }
    }
}
