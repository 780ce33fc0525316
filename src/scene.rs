//! The scene graph: every visual entity of one mounted scene.
//!
//! Built once at mount and mutated per tick by the animation loop. The graph
//! is plain CPU state — a flat collection of letter panels, the star cloud,
//! and the fixed lights — so it builds and tests without a GPU. The matching
//! GPU resources (glyph textures, buffers, pipelines) live in
//! [`ScenePass`](crate::scene_pass::ScenePass).

use glam::Vec3;

use crate::letters::{LetterPanel, layout_offsets};
use crate::starfield::StarField;

/// The label this scene spells out. Fixed; not a configuration surface.
pub const LABEL: &str = "LOVETCS";

/// Static lighting: one ambient light and one directional light, unchanged
/// for the scene's lifetime. Letter materials add a fixed emissive term on
/// top so the glyphs glow slightly against the dark background.
#[derive(Clone, Copy, Debug)]
pub struct Lighting {
    pub ambient: f32,
    pub direction: Vec3,
    pub directional: f32,
    pub emissive: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.8,
            direction: Vec3::new(5.0, 10.0, 7.5),
            directional: 0.6,
            emissive: 0.3,
        }
    }
}

/// All visual entities of one mount: letter panels in string order, the
/// starfield, and the lights.
pub struct SceneGraph {
    pub panels: Vec<LetterPanel>,
    pub stars: StarField,
    pub lights: Lighting,
}

impl SceneGraph {
    /// Build the graph for `label`.
    ///
    /// Structure is deterministic given the label: same panel count, layout,
    /// and phases on every build. Star positions are freshly randomized, but
    /// their count and bounds are invariant.
    pub fn build(label: &str) -> Self {
        let glyphs: Vec<char> = label.chars().collect();
        let offsets = layout_offsets(glyphs.len());
        let panels = glyphs
            .into_iter()
            .zip(offsets)
            .enumerate()
            .map(|(i, (glyph, x))| LetterPanel::new(i, glyph, x))
            .collect();

        Self {
            panels,
            stars: StarField::generate(),
            lights: Lighting::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_one_panel_per_character_in_order() {
        let scene = SceneGraph::build(LABEL);
        assert_eq!(scene.panels.len(), 7);
        let glyphs: String = scene.panels.iter().map(|p| p.glyph).collect();
        assert_eq!(glyphs, "LOVETCS");

        let xs: Vec<f32> = scene.panels.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![-7.5, -5.0, -2.5, 0.0, 2.5, 5.0, 7.5]);
    }

    #[test]
    fn rebuild_is_structurally_equivalent() {
        let a = SceneGraph::build(LABEL);
        let b = SceneGraph::build(LABEL);
        assert_eq!(a.panels.len(), b.panels.len());
        for (pa, pb) in a.panels.iter().zip(&b.panels) {
            assert_eq!(pa.position.x, pb.position.x);
            assert_eq!(pa.phase, pb.phase);
        }
        // Star content regenerates; shape does not.
        assert_eq!(a.stars.positions().len(), b.stars.positions().len());
    }

    #[test]
    fn lighting_is_fixed() {
        let lights = SceneGraph::build(LABEL).lights;
        assert_eq!(lights.ambient, 0.8);
        assert_eq!(lights.directional, 0.6);
        assert_eq!(lights.emissive, 0.3);
        assert_eq!(lights.direction, Vec3::new(5.0, 10.0, 7.5));
    }
}
