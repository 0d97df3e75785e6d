//! Procedural generation of platforms and decorations
//!
//! Every new entity is placed at the frontier (rightmost edge of its kind)
//! plus a random gap. Gaps and widths are sampled as whole pixels.

use std::ops::Range;

use rand::Rng;

use super::state::{Decoration, DecorationLook, IndicatorLight, Platform};
use crate::consts::*;
use crate::{DecorationTheme, Viewport};

/// Gap range between platforms
pub fn platform_gap_range(debug: bool) -> Range<u32> {
    if debug {
        DEBUG_PLATFORM_MIN_GAP..DEBUG_PLATFORM_MAX_GAP
    } else {
        PLATFORM_MIN_GAP..PLATFORM_MAX_GAP
    }
}

/// Generate the next platform after the rightmost existing one
///
/// `id` is the number of platforms generated so far this run, so ids keep
/// increasing even after housekeeping removes old platforms.
pub fn generate_platform<R: Rng + ?Sized>(
    platforms: &[Platform],
    id: u32,
    debug: bool,
    rng: &mut R,
) -> Platform {
    let frontier = platforms.last().map_or(0.0, Platform::right);
    let gap = rng.random_range(platform_gap_range(debug));
    let width = rng.random_range(PLATFORM_MIN_WIDTH..PLATFORM_MAX_WIDTH);

    Platform::new(frontier + gap as f32, width as f32, id)
}

/// The fixed starting platform followed by the first batch of generated ones
pub fn initial_platforms<R: Rng + ?Sized>(debug: bool, rng: &mut R) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(INITIAL_PLATFORMS + 1);
    // Right edge of the first platform lines up with PADDING_X
    platforms.push(Platform::new(FIRST_PLATFORM_X, FIRST_PLATFORM_WIDTH, 0));
    for _ in 0..INITIAL_PLATFORMS {
        let id = platforms.len() as u32;
        let platform = generate_platform(&platforms, id, debug, rng);
        platforms.push(platform);
    }
    platforms
}

/// Gap range between decorations; narrows once the world is well populated
pub fn decoration_gap_range(count: usize) -> Range<u32> {
    if count > DENSE_DECORATION_THRESHOLD {
        DENSE_DECORATION_MIN_GAP..DENSE_DECORATION_MAX_GAP
    } else {
        DECORATION_MIN_GAP..DECORATION_MAX_GAP
    }
}

/// Random visual attributes for a decoration of the given theme
pub fn decoration_look<R: Rng + ?Sized>(theme: DecorationTheme, rng: &mut R) -> DecorationLook {
    let color = rng.random_range(0..PALETTE_SIZE);
    match theme {
        DecorationTheme::Servers => {
            let mut lights = Vec::new();
            for rack in 0..SERVER_RACKS {
                if rng.random_bool(0.5) {
                    lights.push(IndicatorLight {
                        rack,
                        healthy: rng.random_bool(0.5),
                    });
                }
            }
            DecorationLook::Server { color, lights }
        }
        DecorationTheme::Trees => DecorationLook::Tree { color },
    }
}

/// Generate the next decoration after the rightmost existing one
pub fn generate_decoration<R: Rng + ?Sized>(
    decorations: &[Decoration],
    theme: DecorationTheme,
    rng: &mut R,
) -> Decoration {
    let frontier = decorations.last().map_or(0.0, |d| d.x);
    let gap = rng.random_range(decoration_gap_range(decorations.len()));

    Decoration {
        x: frontier + gap as f32,
        look: decoration_look(theme, rng),
    }
}

/// Scatter decorations across one and a half window widths
pub fn initial_decorations<R: Rng + ?Sized>(
    viewport: Viewport,
    theme: DecorationTheme,
    rng: &mut R,
) -> Vec<Decoration> {
    let width_factor = (viewport.width / CANVAS_WIDTH).ceil().max(0.0) as usize;
    let count = MIN_INITIAL_DECORATIONS.max(width_factor * DECORATIONS_PER_CANVAS_WIDTH);
    let stride = viewport.width * 1.5 / count as f32;

    (0..count)
        .map(|i| Decoration {
            x: i as f32 * stride + rng.random::<f32>() * stride * 0.7,
            look: decoration_look(theme, rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_platforms() {
        let mut rng = Pcg32::seed_from_u64(1);
        let platforms = initial_platforms(false, &mut rng);
        assert_eq!(platforms.len(), INITIAL_PLATFORMS + 1);
        assert_eq!(platforms[0].right(), PADDING_X);
        for (i, p) in platforms.iter().enumerate() {
            assert_eq!(p.id, i as u32);
        }
    }

    #[test]
    fn test_platform_dimensions_are_whole_pixels() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut platforms = vec![Platform::new(50.0, 50.0, 0)];
        for id in 1..200 {
            let p = generate_platform(&platforms, id, false, &mut rng);
            assert_eq!(p.width.fract(), 0.0);
            assert!((20.0..100.0).contains(&p.width));
            let gap = p.x - platforms.last().unwrap().right();
            assert!((40.0..200.0).contains(&gap));
            platforms.push(p);
        }
    }

    #[test]
    fn test_debug_mode_shrinks_gaps() {
        let mut rng = Pcg32::seed_from_u64(5);
        let base = [Platform::new(50.0, 50.0, 0)];
        for _ in 0..200 {
            let p = generate_platform(&base, 1, true, &mut rng);
            let gap = p.x - base[0].right();
            assert!((30.0..100.0).contains(&gap));
        }
    }

    #[test]
    fn test_decoration_gap_narrows_when_dense() {
        assert_eq!(decoration_gap_range(20), 50..200);
        assert_eq!(decoration_gap_range(21), 40..150);
    }

    #[test]
    fn test_tree_theme() {
        let mut rng = Pcg32::seed_from_u64(9);
        let d = generate_decoration(&[], DecorationTheme::Trees, &mut rng);
        assert!(matches!(d.look, DecorationLook::Tree { color } if color < PALETTE_SIZE));
        assert!((50.0..200.0).contains(&d.x));
    }

    #[test]
    fn test_server_lights_on_valid_racks() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            match decoration_look(DecorationTheme::Servers, &mut rng) {
                DecorationLook::Server { lights, .. } => {
                    assert!(lights.len() <= SERVER_RACKS as usize);
                    assert!(lights.windows(2).all(|w| w[0].rack < w[1].rack));
                }
                other => panic!("unexpected look {other:?}"),
            }
        }
    }

    #[test]
    fn test_initial_decorations_scale_with_width() {
        let mut rng = Pcg32::seed_from_u64(2);
        let narrow = initial_decorations(Viewport::new(375.0, 375.0), DecorationTheme::Servers, &mut rng);
        assert_eq!(narrow.len(), 10);
        let wide = initial_decorations(Viewport::new(1500.0, 900.0), DecorationTheme::Servers, &mut rng);
        assert_eq!(wide.len(), 32);
        assert!(wide.iter().all(|d| d.x >= 0.0 && d.x < 1500.0 * 1.5));
        assert!(wide.windows(2).all(|w| w[0].x < w[1].x));
    }

    proptest! {
        #[test]
        fn prop_platforms_never_touch(seed in any::<u64>(), debug in any::<bool>(), n in 1usize..60) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut platforms = initial_platforms(debug, &mut rng);
            for _ in 0..n {
                let id = platforms.len() as u32;
                let p = generate_platform(&platforms, id, debug, &mut rng);
                platforms.push(p);
            }
            let min_gap = platform_gap_range(debug).start as f32;
            for w in platforms.windows(2) {
                prop_assert!(w[1].x >= w[0].right() + min_gap);
                prop_assert!(w[1].id > w[0].id);
            }
        }

        #[test]
        fn prop_decorations_increase(seed in any::<u64>(), n in 1usize..80) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut decorations = Vec::new();
            for _ in 0..n {
                let d = generate_decoration(&decorations, DecorationTheme::Servers, &mut rng);
                decorations.push(d);
            }
            for w in decorations.windows(2) {
                prop_assert!(w[1].x - w[0].x >= DENSE_DECORATION_MIN_GAP as f32);
            }
        }
    }
}
