//! Canvas2D renderer for the browser

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backdrop::{Backdrop, CELL_HEIGHT, CELL_WIDTH};
use super::{
    FrameSnapshot, LIGHT_FAULT, LIGHT_OK, Renderer, SERVER_PALETTE, TREE_PALETTE,
    bonus_gem_color, decoration_screen_x, decoration_y, gem_color, hill_y,
};
use crate::Viewport;
use crate::consts::*;
use crate::sim::DecorationLook;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    backdrop: Backdrop,
    /// Backdrop RNG, independent of the simulation stream
    rng: Pcg32,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, seed: u64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
        let backdrop = Backdrop::generate(viewport, &mut rng);
        Ok(Self {
            canvas,
            ctx,
            backdrop,
            rng,
        })
    }

    /// Fresh backdrop after a restart
    pub fn regenerate(&mut self) {
        self.backdrop = Backdrop::generate(self.viewport(), &mut self.rng);
    }

    fn draw_background(&self, frame: &FrameSnapshot<'_>) -> Result<(), JsValue> {
        let viewport = self.viewport();
        let ctx = &self.ctx;

        ctx.set_fill_style_str("#1A202C");
        ctx.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        ctx.set_fill_style_str("rgba(104, 211, 145, 0.08)");
        ctx.set_font("12px monospace");
        for (col, column) in self.backdrop.binary.iter().enumerate() {
            for row in 0..column.len() {
                if let Some(digit) = self.backdrop.digit(col, row) {
                    ctx.fill_text(
                        &digit.to_string(),
                        (col as f32 * CELL_WIDTH) as f64,
                        (row as f32 * CELL_HEIGHT) as f64,
                    )?;
                }
            }
        }

        self.draw_hill(frame, HILL1_BASE_HEIGHT, HILL1_AMPLITUDE, HILL1_STRETCH, "#2D3748");
        self.draw_hill(frame, HILL2_BASE_HEIGHT, HILL2_AMPLITUDE, HILL2_STRETCH, "#4A5568");

        ctx.set_stroke_style_str("rgba(104, 211, 145, 0.25)");
        ctx.set_line_width(1.0);
        for line in &self.backdrop.circuit_lines {
            let y1 = viewport.height - HILL2_BASE_HEIGHT + line.offset1;
            let y2 = viewport.height - HILL2_BASE_HEIGHT + line.offset2;
            ctx.begin_path();
            ctx.move_to(line.x1 as f64, y1 as f64);
            ctx.line_to(line.x2 as f64, y2 as f64);
            ctx.stroke();
        }
        for &x in &self.backdrop.hill_nodes {
            let y = hill_y(x, viewport, HILL1_BASE_HEIGHT, HILL1_AMPLITUDE, HILL1_STRETCH, frame.scene_offset);
            ctx.set_fill_style_str(LIGHT_OK);
            ctx.fill_rect(x as f64 - 2.0, y as f64 - 2.0, 4.0, 4.0);
        }

        for decoration in frame.decorations {
            let x = decoration_screen_x(decoration.x, frame.scene_offset) as f64;
            let y = decoration_y(decoration.x, viewport) as f64;
            match &decoration.look {
                DecorationLook::Server { color, lights } => {
                    ctx.set_fill_style_str(SERVER_PALETTE[*color as usize % SERVER_PALETTE.len()]);
                    ctx.fill_rect(x - 10.0, y - 50.0, 20.0, 50.0);
                    for light in lights {
                        ctx.set_fill_style_str(if light.healthy { LIGHT_OK } else { LIGHT_FAULT });
                        ctx.fill_rect(x + 5.0, y - 46.0 + light.rack as f64 * 9.0, 3.0, 3.0);
                    }
                }
                DecorationLook::Tree { color } => {
                    ctx.set_fill_style_str("#7D833C");
                    ctx.fill_rect(x - 2.0, y - 15.0, 4.0, 15.0);
                    ctx.set_fill_style_str(TREE_PALETTE[*color as usize % TREE_PALETTE.len()]);
                    ctx.fill_rect(x - 10.0, y - 40.0, 20.0, 25.0);
                }
            }
        }
        Ok(())
    }

    fn draw_hill(&self, frame: &FrameSnapshot<'_>, base: f32, amplitude: f32, stretch: f32, color: &str) {
        let viewport = self.viewport();
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(0.0, viewport.height as f64);
        let mut x = 0.0;
        while x <= viewport.width {
            let y = hill_y(x, viewport, base, amplitude, stretch, frame.scene_offset);
            ctx.line_to(x as f64, y as f64);
            x += 1.0;
        }
        ctx.line_to(viewport.width as f64, viewport.height as f64);
        ctx.set_fill_style_str(color);
        ctx.fill();
    }

    fn draw_world(&self, frame: &FrameSnapshot<'_>) -> Result<(), JsValue> {
        let viewport = self.viewport();
        let ctx = &self.ctx;
        let ground = (CANVAS_HEIGHT - PLATFORM_HEIGHT) as f64;

        ctx.save();
        ctx.translate(
            (viewport.margin_x() - frame.scene_offset) as f64,
            viewport.margin_y() as f64,
        )?;

        for platform in frame.platforms {
            ctx.set_fill_style_str("#4A5568");
            ctx.fill_rect(
                platform.x as f64,
                ground,
                platform.width as f64,
                (PLATFORM_HEIGHT + viewport.margin_y().max(0.0)) as f64,
            );
            if platform.x > frame.current_stick.x {
                let half = frame.perfect_area as f64 / 2.0;
                ctx.set_fill_style_str(LIGHT_OK);
                ctx.fill_rect(platform.center() as f64 - half, ground, half * 2.0, 3.0);

                ctx.save();
                ctx.translate(platform.center() as f64, ground - half * 2.0)?;
                ctx.rotate((frame.bonus_gem_rotation as f64).to_radians())?;
                ctx.set_fill_style_str(bonus_gem_color(frame.debug));
                ctx.fill_rect(-half * 0.75, -half * 0.75, half * 1.5, half * 1.5);
                ctx.restore();
            }
        }

        for gem in frame.gems {
            let pos = gem.pos();
            let size = (gem.size() * gem.scale()) as f64;
            ctx.set_global_alpha(gem.opacity() as f64);
            ctx.set_fill_style_str(gem_color(gem));
            ctx.save();
            ctx.translate(pos.x as f64, pos.y as f64)?;
            ctx.rotate((gem.rotation() as f64).to_radians())?;
            ctx.fill_rect(-size / 2.0, -size / 2.0, size, size);
            ctx.restore();
        }
        ctx.set_global_alpha(1.0);

        ctx.set_stroke_style_str("#E2E8F0");
        ctx.set_line_width(2.0);
        for stick in frame.all_sticks() {
            ctx.save();
            ctx.translate(stick.x as f64, ground)?;
            ctx.rotate(stick.rotation.to_radians() as f64)?;
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);
            ctx.line_to(0.0, -stick.length as f64);
            ctx.stroke();
            ctx.restore();
        }

        let hero_x = (frame.hero.x - HERO_WIDTH / 2.0) as f64;
        let hero_y = (frame.hero.y + CANVAS_HEIGHT - PLATFORM_HEIGHT - HERO_HEIGHT) as f64;
        ctx.set_fill_style_str("#68D391");
        ctx.fill_rect(hero_x, hero_y, HERO_WIDTH as f64, HERO_HEIGHT as f64);
        let eye = 3.0 * (1.0 - frame.eyes_closed as f64);
        ctx.set_fill_style_str("#1A202C");
        ctx.fill_rect(hero_x + 10.0, hero_y + 8.0 + (3.0 - eye) / 2.0, 3.0, eye.max(0.5));

        ctx.restore();
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
        self.backdrop.extend(viewport, &mut self.rng);
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        let result = self
            .draw_background(frame)
            .and_then(|_| self.draw_world(frame));
        if let Err(e) = result {
            log::warn!("Render error: {:?}", e);
        }
    }
}
