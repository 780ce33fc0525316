//! Letter panels and the glyph factory that textures them.
//!
//! Each character of the label becomes one flat panel: a quad carrying a
//! texture with the glyph rasterized white-on-transparent. Layout is
//! symmetric about x = 0 with a fixed spacing between panel centers, so the
//! word as a whole is centered regardless of its length.

use glam::Vec3;

use crate::animation::{float_offset, sway_angle};
use crate::error::SceneError;

/// Distance between adjacent panel centers, in world units.
pub const SPACING: f32 = 2.5;

/// Panel quad dimensions, in world units.
pub const PANEL_WIDTH: f32 = 2.0;
pub const PANEL_HEIGHT: f32 = 2.5;

/// Phase offset between adjacent panels, in radians.
pub const PHASE_STEP: f32 = 0.5;

/// Side length of the square glyph texture, in pixels.
pub const GLYPH_TEXTURE_SIZE: u32 = 256;

/// Nominal glyph size passed to the rasterizer, in pixels.
const GLYPH_PX: f32 = 200.0;

/// Embedded bold font for glyph rasterization. Embedding avoids any file or
/// network dependency at mount time.
const EMBEDDED_FONT: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

/// Horizontal center offsets for `count` panels: symmetric about 0 with
/// [`SPACING`] between adjacent centers.
pub fn layout_offsets(count: usize) -> Vec<f32> {
    let start_x = -((count as f32 - 1.0) * SPACING) / 2.0;
    (0..count).map(|i| start_x + i as f32 * SPACING).collect()
}

/// One floating letter.
///
/// Created once at mount, mutated every tick by the animation loop, dropped
/// with the scene at unmount. `position.x` is the fixed layout offset; only
/// `position.y` and `rotation_y` animate.
#[derive(Clone, Copy, Debug)]
pub struct LetterPanel {
    pub index: usize,
    pub glyph: char,
    /// Rest height the float oscillates around.
    pub initial_y: f32,
    /// Fixed per-panel phase, `index * PHASE_STEP`.
    pub phase: f32,
    pub position: Vec3,
    pub rotation_y: f32,
}

impl LetterPanel {
    pub fn new(index: usize, glyph: char, base_x: f32) -> Self {
        Self {
            index,
            glyph,
            initial_y: 0.0,
            phase: index as f32 * PHASE_STEP,
            position: Vec3::new(base_x, 0.0, 0.0),
            rotation_y: 0.0,
        }
    }

    /// Move the panel to its pose at elapsed time `time`. Both components are
    /// pure functions of `time` and the fixed phase.
    pub fn animate(&mut self, time: f32) {
        self.position.y = self.initial_y + float_offset(time, self.phase);
        self.rotation_y = sway_angle(time, self.phase);
    }
}

/// Rasterizes single characters into square RGBA textures.
///
/// The glyph is drawn white with fontdue's coverage as alpha, centered in the
/// canvas. Characters the font has no mapping for rasterize as the font's
/// notdef glyph, so any single Unicode character produces a texture.
pub struct GlyphRasterizer {
    font: fontdue::Font,
}

impl GlyphRasterizer {
    pub fn new() -> Result<Self, SceneError> {
        let font = fontdue::Font::from_bytes(EMBEDDED_FONT, fontdue::FontSettings::default())
            .map_err(SceneError::FontParse)?;
        Ok(Self { font })
    }

    /// Rasterize one character into a `GLYPH_TEXTURE_SIZE` square RGBA
    /// bitmap. Oversized glyphs are clipped at the canvas edges.
    pub fn rasterize(&self, c: char) -> Vec<u8> {
        let size = GLYPH_TEXTURE_SIZE as i32;
        let mut pixels = vec![0u8; (GLYPH_TEXTURE_SIZE * GLYPH_TEXTURE_SIZE * 4) as usize];

        let (metrics, coverage) = self.font.rasterize(c, GLYPH_PX);
        let x0 = (size - metrics.width as i32) / 2;
        let y0 = (size - metrics.height as i32) / 2;

        for gy in 0..metrics.height as i32 {
            let py = y0 + gy;
            if py < 0 || py >= size {
                continue;
            }
            for gx in 0..metrics.width as i32 {
                let px = x0 + gx;
                if px < 0 || px >= size {
                    continue;
                }
                let alpha = coverage[(gy * metrics.width as i32 + gx) as usize];
                let dst = ((py * size + px) * 4) as usize;
                pixels[dst] = 255;
                pixels[dst + 1] = 255;
                pixels[dst + 2] = 255;
                pixels[dst + 3] = alpha;
            }
        }

        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_letters_center_symmetrically() {
        let xs = layout_offsets(7);
        assert_eq!(xs, vec![-7.5, -5.0, -2.5, 0.0, 2.5, 5.0, 7.5]);
    }

    #[test]
    fn single_letter_sits_at_origin() {
        assert_eq!(layout_offsets(1), vec![0.0]);
    }

    #[test]
    fn phase_steps_by_half_per_panel() {
        let panel = LetterPanel::new(4, 'T', 2.5);
        assert_eq!(panel.phase, 2.0);
        assert_eq!(panel.initial_y, 0.0);
    }

    #[test]
    fn panel_zero_rests_at_time_zero() {
        let mut panel = LetterPanel::new(0, 'L', -7.5);
        panel.animate(0.0);
        assert_eq!(panel.position.y, 0.0);
        assert_eq!(panel.rotation_y, 0.0);
        assert_eq!(panel.position.x, -7.5);
    }

    #[test]
    fn animate_is_idempotent_for_fixed_time() {
        let mut a = LetterPanel::new(3, 'E', 0.0);
        let mut b = a;
        a.animate(2.25);
        b.animate(2.25);
        assert_eq!(a.position.y, b.position.y);
        assert_eq!(a.rotation_y, b.rotation_y);
    }

    #[test]
    fn rasterizer_fills_the_canvas_buffer() {
        let rasterizer = GlyphRasterizer::new().unwrap();
        let pixels = rasterizer.rasterize('L');
        assert_eq!(
            pixels.len(),
            (GLYPH_TEXTURE_SIZE * GLYPH_TEXTURE_SIZE * 4) as usize
        );
        assert!(pixels.chunks_exact(4).any(|px| px[3] > 0));
    }

    #[test]
    fn rasterizer_accepts_any_character() {
        let rasterizer = GlyphRasterizer::new().unwrap();
        // Not mapped by the embedded font; must still produce a full canvas.
        let pixels = rasterizer.rasterize('\u{1F600}');
        assert_eq!(
            pixels.len(),
            (GLYPH_TEXTURE_SIZE * GLYPH_TEXTURE_SIZE * 4) as usize
        );
    }
}
