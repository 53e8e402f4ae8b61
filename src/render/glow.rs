//! Halo layering for glowing points and lines.
//!
//! A glow primitive is drawn as a stack of translucent copies of itself. Layer
//! `i` (from 0) is `step * i` pixels larger than the core, composited outermost
//! first and finished with the opaque core primitive on top. The core geometry never
//! depends on the layer configuration.

use crate::config::GlowConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlowLayer {
    /// Pixels added to the core radius or thickness.
    pub grow: i32,
    pub alpha: u8,
}

/// Halo layers for a glow point, outermost first.
pub fn point_layers(cfg: &GlowConfig) -> impl Iterator<Item = GlowLayer> + use<> {
    layers(
        cfg.point_layers,
        cfg.step,
        cfg.point_alpha,
        cfg.point_alpha_decay,
        cfg.min_alpha,
    )
}

/// Halo layers for a glow line, outermost first.
pub fn line_layers(cfg: &GlowConfig) -> impl Iterator<Item = GlowLayer> + use<> {
    layers(
        cfg.line_layers,
        cfg.step,
        cfg.line_alpha,
        cfg.line_alpha_decay,
        cfg.min_alpha,
    )
}

fn layers(
    count: u32,
    step: i32,
    alpha: u8,
    decay: u8,
    min_alpha: u8,
) -> impl Iterator<Item = GlowLayer> {
    (0..count).rev().map(move |i| GlowLayer {
        grow: step * i as i32,
        alpha: layer_alpha(alpha, decay, min_alpha, i),
    })
}

fn layer_alpha(alpha: u8, decay: u8, min_alpha: u8, layer: u32) -> u8 {
    let faded = u32::from(alpha).saturating_sub(u32::from(decay) * layer);
    faded.max(u32::from(min_alpha)).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Canvas, Painter};
    use crate::types::{Point, Rgb};

    #[test]
    fn point_layers_grow_and_fade() {
        let layers: Vec<_> = point_layers(&GlowConfig::default()).collect();
        assert_eq!(
            layers,
            vec![
                GlowLayer { grow: 4, alpha: 40 },
                GlowLayer { grow: 2, alpha: 70 },
                GlowLayer { grow: 0, alpha: 100 },
            ]
        );
    }

    #[test]
    fn line_layers_grow_and_fade() {
        let layers: Vec<_> = line_layers(&GlowConfig::default()).collect();
        assert_eq!(
            layers,
            vec![
                GlowLayer { grow: 2, alpha: 30 },
                GlowLayer { grow: 0, alpha: 50 },
            ]
        );
    }

    #[test]
    fn alpha_never_drops_below_floor() {
        let cfg = GlowConfig {
            point_layers: 6,
            ..GlowConfig::default()
        };
        let outermost = point_layers(&cfg).next().unwrap();
        assert_eq!(outermost.grow, 10);
        assert_eq!(outermost.alpha, cfg.min_alpha);
    }

    #[test]
    fn zero_layers_yield_nothing() {
        let cfg = GlowConfig {
            point_layers: 0,
            line_layers: 0,
            ..GlowConfig::default()
        };
        assert_eq!(point_layers(&cfg).count(), 0);
        assert_eq!(line_layers(&cfg).count(), 0);
    }

    fn core_pixels(canvas: &Canvas, color: Rgb) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.pixel(x, y) == Some(color.rgba()) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn core_geometry_ignores_layer_count() {
        let color = Rgb(200, 255, 250);
        let bare_cfg = GlowConfig {
            point_layers: 0,
            line_layers: 0,
            ..GlowConfig::default()
        };
        let layered_cfg = GlowConfig {
            point_layers: 3,
            line_layers: 3,
            ..GlowConfig::default()
        };

        let mut bare = Canvas::new(120, 90, bare_cfg);
        let mut layered = Canvas::new(120, 90, layered_cfg);
        for canvas in [&mut bare, &mut layered] {
            canvas.draw_glow_point(color, Point::new(40, 40), 12);
            canvas.draw_glow_line(color, Point::new(70, 10), Point::new(100, 80), 4);
        }

        let core = core_pixels(&bare, color);
        assert!(!core.is_empty());
        assert_eq!(core, core_pixels(&layered, color));
    }

    #[test]
    fn halo_surrounds_core() {
        let color = Rgb(255, 255, 255);
        let mut canvas = Canvas::new(64, 64, GlowConfig::default());
        canvas.draw_glow_point(color, Point::new(32, 32), 5);
        // The outermost ring reaches radius + 4 and no further.
        let [r, _, _, _] = canvas.pixel(32 + 9, 32).unwrap();
        assert!(r > 0 && r < 255);
        assert_eq!(canvas.pixel(32 + 10, 32), Some([0, 0, 0, 255]));
    }
}
