//! Forgiving overlap tests
//!
//! Both boxes shrink toward their centers by the same factor before a strict
//! intersection test, so grazing contacts count as near misses.

use super::state::Rect;

/// Shrink a box symmetrically toward its center. `factor` 1.0 keeps it as is.
pub fn shrink(rect: Rect, factor: f32) -> Rect {
    let pad = rect.size() * (1.0 - factor) * 0.5;
    Rect::new(rect.min + pad, rect.max - pad)
}

/// Strict intersection of two boxes after shrinking both by `factor`
pub fn rects_overlap(a: Rect, b: Rect, factor: f32) -> bool {
    let a = shrink(a, factor);
    let b = shrink(b, factor);
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ENEMY_OVERLAP, PICKUP_OVERLAP, WARNING_OVERLAP};
    use glam::Vec2;
    use proptest::prelude::*;

    const FACTORS: [f32; 3] = [ENEMY_OVERLAP, WARNING_OVERLAP, PICKUP_OVERLAP];

    fn unit_box(x: f32, y: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(x + 1.0, y + 1.0))
    }

    #[test]
    fn test_identical_boxes_hit_at_full_scale() {
        assert!(rects_overlap(unit_box(0.0, 0.0), unit_box(0.0, 0.0), 1.0));
    }

    #[test]
    fn test_identical_boxes_hit_at_every_factor() {
        for factor in FACTORS {
            assert!(rects_overlap(unit_box(3.0, -2.0), unit_box(3.0, -2.0), factor));
        }
    }

    #[test]
    fn test_grazing_contact_is_forgiven() {
        // Overlapping by 0.2 at full size, but each box loses 0.14 per side at 0.72
        let a = unit_box(0.0, 0.0);
        let b = unit_box(0.8, 0.0);
        assert!(rects_overlap(a, b, 1.0));
        assert!(!rects_overlap(a, b, ENEMY_OVERLAP));
    }

    #[test]
    fn test_touching_edges_do_not_hit() {
        assert!(!rects_overlap(unit_box(0.0, 0.0), unit_box(1.0, 0.0), 1.0));
    }

    #[test]
    fn test_shrink_keeps_center() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0));
        let s = shrink(r, 0.6);
        assert!((s.center() - r.center()).length() < 1e-5);
        assert!((s.size() - Vec2::new(6.0, 12.0)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_separated_beyond_shrunk_extent_never_hits(
            gap in 0.001f32..50.0,
            factor_idx in 0usize..3,
            vertical in proptest::bool::ANY,
        ) {
            let factor = FACTORS[factor_idx];
            // Shrunk unit boxes span `factor`; centers further apart than that cannot meet
            let offset = factor + gap;
            let b = if vertical { unit_box(0.0, offset) } else { unit_box(offset, 0.0) };
            prop_assert!(!rects_overlap(unit_box(0.0, 0.0), b, factor));
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -5.0f32..5.0, ay in -5.0f32..5.0,
            bx in -5.0f32..5.0, by in -5.0f32..5.0,
            factor_idx in 0usize..3,
        ) {
            let factor = FACTORS[factor_idx];
            let a = unit_box(ax, ay);
            let b = unit_box(bx, by);
            prop_assert_eq!(rects_overlap(a, b, factor), rects_overlap(b, a, factor));
        }
    }
}
