//! Viewport to design-space layout
//!
//! The design space matches the viewport one to one; everything that should
//! scale with screen size is multiplied by `unit`.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH, DESIGN_REFERENCE_HEIGHT};

/// Result of fitting the design space into a viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub view_width: f32,
    pub view_height: f32,
    pub design_width: f32,
    pub design_height: f32,
    /// Design to view scale (letterboxing)
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub is_portrait: bool,
    /// Design-space scale relative to a 1280 tall reference
    pub unit: f32,
}

impl Layout {
    /// Compute the layout for a viewport. Degenerate sizes are clamped to one pixel.
    pub fn compute(view_width: f32, view_height: f32) -> Self {
        let view_width = view_width.max(1.0);
        let view_height = view_height.max(1.0);
        let design_width = view_width;
        let design_height = view_height;
        let scale = (view_width / design_width).min(view_height / design_height);

        Self {
            view_width,
            view_height,
            design_width,
            design_height,
            scale,
            offset_x: (view_width - design_width * scale) / 2.0,
            offset_y: (view_height - design_height * scale) / 2.0,
            is_portrait: view_height >= view_width,
            unit: design_height / DESIGN_REFERENCE_HEIGHT,
        }
    }

    /// Ground line as a fraction of design height
    pub fn ground_ratio(&self) -> f32 {
        if self.is_portrait { 0.73 } else { 0.77 }
    }

    /// Y of the lowest lane
    pub fn ground_y(&self) -> f32 {
        self.design_height * self.ground_ratio()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::compute(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
    }
}
