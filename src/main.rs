//! Deploy Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use deploy_dash::consts::BANNER_MS;
    use deploy_dash::renderer::{CanvasRenderer, FrameSnapshot, Renderer};
    use deploy_dash::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use deploy_dash::{Record, Settings, Viewport};

    /// Longest frame simulated in one step (ms), e.g. after a tab switch
    const MAX_FRAME_MS: f32 = 100.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        record: Record,
        input: TickInput,
        last_time: Option<f64>,
        /// An animation frame is scheduled
        looping: bool,
    }

    impl Game {
        /// Advance, draw and report whether another frame should be requested
        fn frame(&mut self, time: f64) -> bool {
            let dt = match self.last_time {
                Some(last) => ((time - last) as f32).clamp(0.0, MAX_FRAME_MS),
                None => 0.0,
            };
            self.last_time = Some(time);

            let input = std::mem::take(&mut self.input);
            if let Err(e) = tick(&mut self.state, &input, dt) {
                log::error!("Simulation fault, stopping: {}", e);
                return false;
            }

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            self.renderer.draw(&FrameSnapshot::of(&self.state));
            set_text("score", &self.state.score.to_string());

            !self.state.over
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::PhaseChanged {
                    to: GamePhase::Coding,
                    ..
                } => set_style("introduction", "opacity", "0"),
                GameEvent::RecordBroken { record } => {
                    if self.record.raise(record) {
                        self.record.save();
                    }
                    set_text("record", &record.to_string());
                }
                GameEvent::Banner(message) => show_banner(&message.to_string()),
                GameEvent::GameOver => {
                    let label = if self.state.settings.debug_mode {
                        "DEBUG COMPLETE\nRESTART"
                    } else {
                        "DEBUG & RESTART"
                    };
                    if let Some(btn) = element("restart") {
                        btn.set_inner_text(label);
                        let _ = btn.style().set_property("display", "grid");
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }

        /// Reset game state for restart
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state.reset(seed);
            self.renderer.regenerate();
            self.input = TickInput::default();
            self.last_time = None;

            set_style("restart", "display", "none");
            set_style("introduction", "opacity", "1");
            set_style("perfect", "opacity", "0");
            set_text("score", "0");
            set_text("record", &self.record.best.to_string());
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    fn element(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_inner_text(text);
        }
    }

    fn set_style(id: &str, property: &str, value: &str) {
        if let Some(el) = element(id) {
            let _ = el.style().set_property(property, value);
        }
    }

    /// Show a streak banner and fade it after a while. Presentation only.
    fn show_banner(text: &str) {
        set_text("perfect", text);
        set_style("perfect", "opacity", "1");

        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || set_style("perfect", "opacity", "0"));
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            BANNER_MS,
        );
        closure.forget();
    }

    fn window_viewport() -> Viewport {
        let window = web_sys::window();
        let size = |v: Option<JsValue>| v.and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        Viewport::new(
            size(window.as_ref().and_then(|w| w.inner_width().ok())),
            size(window.as_ref().and_then(|w| w.inner_height().ok())),
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Deploy Dash starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No game canvas");
            return;
        };

        let viewport = window_viewport();
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);

        let seed = js_sys::Date::now() as u64;
        let renderer = match CanvasRenderer::new(canvas.clone(), seed ^ 0x5eed) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to create renderer: {:?}", e);
                return;
            }
        };

        let record = Record::load();
        let settings = Settings::load();
        let state = GameState::new(seed, record.best, settings, viewport);
        log::info!("Game initialized with seed: {}", seed);

        set_text("record", &record.best.to_string());
        set_text("score", "0");

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer,
            record,
            input: TickInput::default(),
            last_time: None,
            looping: true,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_debug_button(game.clone());

        request_animation_frame(game);
        log::info!("Deploy Dash running!");
    }

    fn press(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().input.press = true;
    }

    fn release(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().input.release = true;
    }

    fn restart(game: Rc<RefCell<Game>>) {
        let resume = {
            let mut g = game.borrow_mut();
            g.restart();
            !std::mem::replace(&mut g.looping, true)
        };
        if resume {
            request_animation_frame(game);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                press(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                release(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse (left button only for press)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    event.prevent_default();
                    press(&game);
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                release(&game);
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space: press/release, or restart once the run is over
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() != " " {
                    return;
                }
                event.prevent_default();
                if event.repeat() {
                    return;
                }
                let over = game.borrow().state.over;
                if over {
                    restart(game.clone());
                } else {
                    press(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    release(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: renderer extends its backdrop, sim picks up the new size
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let viewport = window_viewport();
                let mut g = game.borrow_mut();
                let Game {
                    renderer, state, ..
                } = &mut *g;
                renderer.resize(viewport);
                state.viewport = viewport;
                renderer.draw(&FrameSnapshot::of(state));
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = element("restart") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            restart(game.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Optional `#debug-mode` button: toggle, persist and start over
    fn setup_debug_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = element("debug-mode") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            let enabled = {
                let mut g = game.borrow_mut();
                g.state.settings.debug_mode = !g.state.settings.debug_mode;
                g.state.settings.save();
                g.state.settings.debug_mode
            };
            set_text(
                "debug-mode",
                if enabled {
                    "Disable Debug Mode"
                } else {
                    "Enable Debug Mode"
                },
            );
            log::info!("Debug mode {}", if enabled { "on" } else { "off" });
            restart(game.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.frame(time);
            if !keep_going {
                g.looping = false;
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Deploy Dash (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    println!("\nRunning headless demo...");
    headless_demo(2024, 20_000);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play with a bot that aims for platform centers with some error
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(seed: u64, max_frames: u32) {
    use deploy_dash::consts::CODING_SPEED;
    use deploy_dash::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use deploy_dash::{Settings, Viewport};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    let mut state = GameState::new(seed, 0, Settings::default(), Viewport::new(1280.0, 720.0));
    let mut bot = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let mut input = TickInput::default();
    let mut target = 0.0;
    let mut landings = 0u32;
    let mut perfects = 0u32;

    for frame in 0..max_frames {
        if let Err(e) = tick(&mut state, &input, FRAME_MS) {
            log::error!("Simulation fault at frame {}: {}", frame, e);
            return;
        }
        input = TickInput::default();

        for event in state.drain_events() {
            match event {
                GameEvent::Landed { perfect, .. } => {
                    landings += 1;
                    perfects += perfect as u32;
                }
                GameEvent::GameOver => log::info!("Bot fell at frame {}", frame),
                _ => {}
            }
        }
        if state.over {
            break;
        }

        match state.phase {
            GamePhase::Waiting => {
                let stick = state.current_stick;
                if let Some(next) = state.platforms.iter().find(|p| p.x > stick.x) {
                    target = next.center() - stick.x + bot.random_range(-30.0..30.0);
                    input.press = true;
                }
            }
            GamePhase::Coding => {
                let step = FRAME_MS / CODING_SPEED;
                if state.current_stick.length + step / 2.0 >= target {
                    input.release = true;
                }
            }
            _ => {}
        }
    }

    println!(
        "Demo finished: score {}, {} landings ({} perfect), {} platforms and {} decorations alive",
        state.score,
        landings,
        perfects,
        state.platforms.len(),
        state.decorations.len()
    );
}
