//! Gravflip entry point
//!
//! Handles platform-specific initialization and runs the fixed-timestep
//! frame loop. Native builds run a scripted headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use gravflip::audio::{effect_for_event, AudioManager};
    use gravflip::consts::*;
    use gravflip::settings::RunConfig;
    use gravflip::sim::{tick, GameEvent, TickInput, World};
    use gravflip::stats;

    /// Game instance holding all state
    struct Game {
        world: World,
        config: RunConfig,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        ended: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let config = RunConfig::load();
            let audio = AudioManager::new(&config);
            Self {
                world: World::new(seed),
                config,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                ended: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.world, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.flip = false;

                self.handle_events();
            }
        }

        /// Route drained simulation events to audio and stats
        fn handle_events(&mut self) {
            for event in self.world.drain_events() {
                if let Some(effect) = effect_for_event(&event) {
                    self.audio.play(effect);
                }
                if let GameEvent::RunEnded { .. } = event {
                    self.on_run_ended();
                }
            }
        }

        fn on_run_ended(&mut self) {
            if self.ended {
                return;
            }
            self.ended = true;

            stats::submit_run(&self.world.stats, &self.config);

            let mut bests = stats::LocalBests::load();
            let rank = bests.add(
                self.world.stats.final_score,
                self.world.stats.max_distance.max(0.0) as u64,
                js_sys::Date::now(),
            );
            if let Some(rank) = rank {
                bests.save();
                if rank == 1 {
                    self.audio.play(gravflip::audio::SoundEffect::HighScore);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.world.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-distance") {
                let distance = (self.world.stats.max_distance.max(0.0) / 100.0) as u64;
                el.set_text_content(Some(&format!("{distance}m")));
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if self.ended { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Reset for a fresh run
        fn restart(&mut self, seed: u64) {
            self.world = World::new(seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.ended = false;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Gravflip starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());

        request_animation_frame(game);

        log::info!("Gravflip running");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    " " | "ArrowUp" | "w" | "W" => {
                        if !event.repeat() {
                            g.input.flip = true;
                            g.audio.resume();
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Run restarted with seed: {seed}");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    run_demo(seed);
}

/// Headless scripted run: hold right, flip on a fixed cadence, and report
/// how far the run got. Useful for eyeballing generation and pacing.
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(seed: u64) {
    use gravflip::audio::{effect_for_event, AudioManager};
    use gravflip::consts::*;
    use gravflip::render;
    use gravflip::settings::RunConfig;
    use gravflip::sim::{tick, GameEvent, TickInput, World};
    use gravflip::stats;

    let config = RunConfig::load();
    let audio = AudioManager::new(&config);
    let mut world = World::new(seed);

    log::info!("demo run starting (seed {seed})");

    let max_frames = 120 * 60;
    for frame in 0..max_frames {
        let input = TickInput {
            right: true,
            flip: frame % 90 == 45,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);

        for event in world.drain_events() {
            if let Some(effect) = effect_for_event(&event) {
                audio.play(effect);
            }
            if let GameEvent::RunEnded { .. } = event {
                stats::submit_run(&world.stats, &config);
            }
        }

        let sprites = render::snapshot(&world);
        if frame % 600 == 0 {
            log::debug!(
                "frame {frame}: x {:.0}, {} sprites visible",
                world.player.pos.x,
                sprites.len()
            );
        }

        if !world.is_running() {
            break;
        }
    }

    println!(
        "demo finished: score {} distance {:.0} collectibles {} time {}s",
        world.score,
        world.stats.max_distance,
        world.stats.collectibles,
        world.stats.game_time_secs()
    );
}
