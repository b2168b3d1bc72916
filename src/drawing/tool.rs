//! Active drawing tool selected by the toolbar

use serde::{Deserialize, Serialize};

/// The toolbar's active tool. Serialized as a lowercase string
/// (`"none"`, `"pen"`, `"eraser"`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTool {
    #[default]
    None,
    Pen,
    Eraser,
}

impl ActiveTool {
    /// True for any tool that captures pointer gestures
    pub fn is_drawing(self) -> bool {
        !matches!(self, ActiveTool::None)
    }
}
