use serde::{Deserialize, Serialize};

/// Session bootstrap payload of `Client.Options.Set`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Username of the connected client
    pub name: String,
    /// Layer to select once the floors have arrived
    #[serde(default)]
    pub active_layer: Option<String>,
    #[serde(flatten)]
    pub display: DisplaySettings,
}

/// Per-user display settings. Stored verbatim, never interpreted by the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub grid_size: u32,
    pub grid_colour: String,
    pub fow_colour: String,
    pub ruler_colour: String,
    pub invert_alt: bool,
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom_factor: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            grid_size: 50,
            grid_colour: "#000000".to_string(),
            fow_colour: "#000000".to_string(),
            ruler_colour: "#ff0000".to_string(),
            invert_alt: false,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom_factor: 1.0,
        }
    }
}
