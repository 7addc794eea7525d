//! Car registry entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One car in the registry, keyed by its external `car_id`.
///
/// Created on first sighting of a given id; later sightings with different
/// metadata are no-ops (first-seen-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    /// Always `#rrggbb` lowercase, whatever encoding the producer used
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_analog: Option<String>,
    /// Free-form extras the producer sent that we have no field for
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}
