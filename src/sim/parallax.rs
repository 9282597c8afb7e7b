//! Roadside parallax (cosmetic)
//!
//! Rows of trees and street lamps slide left at a fraction of road speed and
//! wrap around to the right of the right-most item.

use serde::{Deserialize, Serialize};

/// Which roadside decoration a strip holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParallaxKind {
    Trees,
    Lamps,
}

/// One wrapping row of decorations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxStrip {
    pub kind: ParallaxKind,
    /// Item x positions (bottom-center anchored)
    pub xs: Vec<f32>,
    pub y: f32,
    pub spacing: f32,
    pub speed_factor: f32,
    /// Drawn scale in units
    pub scale: f32,
    /// Item width used to decide when it is off-screen
    pub item_width: f32,
}

impl ParallaxStrip {
    /// Scroll by `distance` road pixels, wrapping items that leave the screen
    pub fn scroll(&mut self, distance: f32) {
        let mut max_x = self.xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let shift = distance * self.speed_factor;
        for x in &mut self.xs {
            *x -= shift;
            if *x < -self.item_width {
                *x = max_x + self.spacing;
                max_x = *x;
            }
        }
    }
}

/// Both decoration rows, rebuilt whenever the layout changes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parallax {
    pub strips: Vec<ParallaxStrip>,
}

impl Parallax {
    pub fn build(design_width: f32, design_height: f32, unit: f32) -> Self {
        let per_screen = (design_width / 420.0).ceil() as usize;

        let tree_count = per_screen + 4;
        let tree_spacing = design_width / (tree_count - 3) as f32;
        let trees = ParallaxStrip {
            kind: ParallaxKind::Trees,
            xs: (0..tree_count)
                .map(|i| -tree_spacing + i as f32 * tree_spacing)
                .collect(),
            y: design_height * 0.6,
            spacing: tree_spacing,
            speed_factor: 0.25,
            scale: 2.2 * unit,
            item_width: 400.0 * unit,
        };

        let lamp_count = per_screen + 2;
        let lamp_spacing = design_width / (lamp_count - 1) as f32;
        let lamps = ParallaxStrip {
            kind: ParallaxKind::Lamps,
            xs: (0..lamp_count)
                .map(|i| -lamp_spacing * 0.5 + i as f32 * lamp_spacing)
                .collect(),
            y: design_height * 0.62,
            spacing: lamp_spacing,
            speed_factor: 0.35,
            scale: 1.2 * unit,
            item_width: 60.0 * unit,
        };

        Self {
            strips: vec![trees, lamps],
        }
    }

    pub fn scroll(&mut self, distance: f32) {
        for strip in &mut self.strips {
            strip.scroll(distance);
        }
    }

    pub fn item_count(&self) -> usize {
        self.strips.iter().map(|s| s.xs.len()).sum()
    }
}
