//! Layout and editor configuration
//!
//! The defaults reproduce the scoresheet page geometry. Hosts can override
//! any field from JSON or YAML; missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Number of grid lines on a page
pub const LINE_COUNT: usize = 11;
/// Y of the first grid line
pub const FIRST_LINE_Y: f64 = 230.0;
/// Vertical distance between grid lines
pub const LINE_SPACING: f64 = 110.0;
/// Left boundary for automatic placement (also the initial cursor x)
pub const LEFT_BOUNDARY: f64 = 170.0;
/// Right boundary for automatic placement
pub const RIGHT_BOUNDARY: f64 = 1000.0;
/// Visual width of one notation image
pub const NOTATION_WIDTH: f64 = 48.0;
/// Horizontal advance after each automatic placement
pub const X_INCREMENT: f64 = 50.0;
/// Interior margin used to clamp manual placement
pub const PAGE_MARGIN: f64 = 20.0;
pub const PAGE_WIDTH: f64 = 1100.0;
pub const PAGE_HEIGHT: f64 = 1500.0;
pub const ERASER_RADIUS: f64 = 10.0;

/// Page geometry used by the placement engine and the manual click path
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Allowed Y coordinates for automatic placement, top to bottom
    pub line_ys: Vec<f64>,
    pub left_boundary: f64,
    pub right_boundary: f64,
    pub notation_width: f64,
    pub x_increment: f64,
    pub page_margin: f64,
    pub page_width: f64,
    pub page_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_ys: (0..LINE_COUNT)
                .map(|i| FIRST_LINE_Y + LINE_SPACING * i as f64)
                .collect(),
            left_boundary: LEFT_BOUNDARY,
            right_boundary: RIGHT_BOUNDARY,
            notation_width: NOTATION_WIDTH,
            x_increment: X_INCREMENT,
            page_margin: PAGE_MARGIN,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
        }
    }
}

impl LayoutConfig {
    /// Check the geometry is usable for placement
    pub fn validate(&self) -> Result<()> {
        if self.line_ys.is_empty() {
            return Err(ScoreError::Config("at least one grid line is required".into()));
        }
        if self.line_ys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScoreError::Config("grid lines must be strictly increasing".into()));
        }
        if self.left_boundary + self.notation_width > self.right_boundary {
            return Err(ScoreError::Config(format!(
                "no room for a notation between {} and {}",
                self.left_boundary, self.right_boundary
            )));
        }
        if self.x_increment <= 0.0 {
            return Err(ScoreError::Config("x increment must be positive".into()));
        }
        if self.page_width <= 2.0 * self.page_margin || self.page_height <= 2.0 * self.page_margin {
            return Err(ScoreError::Config("page is smaller than its margins".into()));
        }
        Ok(())
    }
}

/// Full editor configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    /// Radius of the eraser brush in page pixels
    pub eraser_radius: f64,
    /// Maximum number of undo steps kept
    pub undo_limit: usize,
    /// Keyboard auto-input starts enabled
    pub keyboard_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            eraser_radius: ERASER_RADIUS,
            undo_limit: 100,
            keyboard_enabled: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ScoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| ScoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.eraser_radius <= 0.0 {
            return Err(ScoreError::Config("eraser radius must be positive".into()));
        }
        Ok(())
    }
}
