//! Gemini Flappy entry point
//!
//! Browser: WebGPU canvas, DOM HUD and a requestAnimationFrame loop.
//! Native: headless autopilot runs on a fixed-timestep clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gemini_flappy::commentary::{CommentaryConfig, CommentaryRequest, gemini};
    use gemini_flappy::consts::*;
    use gemini_flappy::renderer::{RenderState, scene};
    use gemini_flappy::sim::{GamePhase, autopilot};
    use gemini_flappy::{Game, Settings};

    /// Idle mode waits this long on the game-over screen before restarting
    const IDLE_RESTART_MS: f64 = 3000.0;

    /// Driver state around the game
    struct App {
        game: Game,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// In-game clock, advanced one tick length per simulation tick
        sim_clock_ms: f64,
        /// Activate pressed since the last frame
        activate_queued: bool,
        /// Idle/demo mode - autopilot plays the game
        idle_mode: bool,
        /// Frame time when the current game-over screen appeared
        game_over_since: Option<f64>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                game: Game::new(seed),
                idle_mode: settings.idle_mode,
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                sim_clock_ms: 0.0,
                activate_queued: false,
                game_over_since: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Apply queued input and run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);

            if self.idle_mode {
                self.queue_idle_restart(time);
            }
            if std::mem::take(&mut self.activate_queued) {
                self.game.activate(self.sim_clock_ms);
            }

            if self.game.phase() == GamePhase::Playing {
                self.game_over_since = None;
                self.accumulator += dt;

                let mut substeps = 0;
                while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                    if self.idle_mode && autopilot::should_flap(self.game.state()) {
                        self.game.activate(self.sim_clock_ms);
                    }
                    self.sim_clock_ms += TICK_MS;
                    self.game.step(self.sim_clock_ms);
                    self.accumulator -= SIM_DT;
                    substeps += 1;

                    if self.game.phase() != GamePhase::Playing {
                        self.game_over_since = Some(time);
                        break;
                    }
                }
            }
            if self.game.phase() != GamePhase::Playing {
                // Don't bank time while nothing is simulating
                self.accumulator = 0.0;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Idle mode starts runs by itself, lingering on the game-over screen
        fn queue_idle_restart(&mut self, time: f64) {
            match self.game.phase() {
                GamePhase::Start => self.activate_queued = true,
                GamePhase::GameOver => {
                    let shown_for = self.game_over_since.map(|t| time - t).unwrap_or(0.0);
                    if !self.game.commentary().pending && shown_for >= IDLE_RESTART_MS {
                        self.activate_queued = true;
                    }
                }
                GamePhase::Playing => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::build(&self.game);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.game.phase();

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("hidden", !visible);
                }
            };

            set_text("score", &self.game.score().to_string());
            set_visible("score", phase != GamePhase::Start);

            set_visible("fps", self.settings.show_fps);
            set_text("fps", &format!("{} FPS", self.fps));

            set_visible("idle-badge", self.idle_mode);
            set_visible("start-screen", phase == GamePhase::Start);
            set_visible("game-over", phase == GamePhase::GameOver);

            if phase == GamePhase::GameOver {
                set_text("final-score", &self.game.score().to_string());
                set_text("best-score", &self.game.best_score().to_string());
                set_text("runs", &self.game.scores().runs().to_string());

                let commentary = self.game.commentary();
                set_visible("commentary-pending", commentary.pending);
                set_visible("commentary-text", !commentary.pending);
                if !commentary.pending {
                    set_text("commentary-text", &format!("\"{}\"", commentary.text));
                }
            }
        }
    }

    /// Send a commentary request without blocking the frame loop
    fn dispatch_commentary(
        app: Rc<RefCell<App>>,
        request: CommentaryRequest,
        config: CommentaryConfig,
    ) {
        log::info!(
            "Requesting commentary for run {} (score {})",
            request.session,
            request.score
        );
        wasm_bindgen_futures::spawn_local(async move {
            let result = gemini::fetch(request.score, &config).await;
            app.borrow_mut()
                .game
                .resolve_commentary(request.session, result);
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gemini Flappy starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store at device resolution, same aspect as the playfield
        let dpr = window.device_pixel_ratio();
        let width = (PLAYFIELD_WIDTH as f64 * dpr) as u32;
        let height = (PLAYFIELD_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings
            .seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Gemini Flappy running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                app.borrow_mut().activate_queued = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (no scrolling or synthetic mouse events)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().activate_queued = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        a.activate_queued = true;
                    }
                    "KeyI" => {
                        a.idle_mode = !a.idle_mode;
                        a.settings.idle_mode = a.idle_mode;
                        a.settings.save();
                        log::info!("Idle mode: {}", a.idle_mode);
                    }
                    "KeyF" => {
                        a.settings.show_fps = !a.settings.show_fps;
                        a.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let request = {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();

            a.game
                .take_commentary_request()
                .map(|request| (request, a.settings.commentary.clone()))
        };

        if let Some((request, config)) = request {
            dispatch_commentary(app.clone(), request, config);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::thread::{self, JoinHandle};

    use gemini_flappy::commentary::{CommentaryError, CommentaryRequest, gemini};
    use gemini_flappy::consts::TICK_MS;
    use gemini_flappy::sim::{GameEvent, GamePhase, autopilot};
    use gemini_flappy::{Game, Settings};

    type InFlight = (CommentaryRequest, JoinHandle<Result<String, CommentaryError>>);

    /// Play `settings.demo_runs` autopilot runs back to back
    ///
    /// Each run restarts as soon as the previous one ends, so commentary for
    /// earlier runs usually arrives late and is discarded.
    pub fn run(settings: &Settings, seed: u64) -> Game {
        let mut game = Game::new(seed);
        let mut clock_ms = 0.0;
        let mut in_flight: Vec<InFlight> = Vec::new();

        for run in 1..=settings.demo_runs {
            game.activate(clock_ms);

            let mut ticks = 0;
            while game.phase() == GamePhase::Playing && ticks < settings.max_ticks_per_run {
                if autopilot::should_flap(game.state()) {
                    game.activate(clock_ms);
                }
                clock_ms += TICK_MS;
                for event in game.step(clock_ms) {
                    if let GameEvent::Passed { score, .. } = event {
                        log::debug!("Run {}: score {}", run, score);
                    }
                }
                ticks += 1;
                poll(&mut game, &mut in_flight);
            }

            if game.phase() == GamePhase::Playing {
                log::info!(
                    "Run {} reached the tick cap with score {}, stopping",
                    run,
                    game.score()
                );
                break;
            }

            if let Some(request) = game.take_commentary_request() {
                let config = settings.commentary.clone();
                let handle = thread::spawn(move || gemini::fetch_blocking(request.score, &config));
                in_flight.push((request, handle));
            }
            println!(
                "Run {}: score {} after {} ticks (best {})",
                run,
                game.score(),
                ticks,
                game.best_score()
            );
        }

        for (request, handle) in in_flight.drain(..) {
            resolve(&mut game, request, handle);
        }
        game
    }

    /// Apply any requests that have finished
    fn poll(game: &mut Game, in_flight: &mut Vec<InFlight>) {
        let mut i = 0;
        while i < in_flight.len() {
            if in_flight[i].1.is_finished() {
                let (request, handle) = in_flight.swap_remove(i);
                resolve(game, request, handle);
            } else {
                i += 1;
            }
        }
    }

    fn resolve(
        game: &mut Game,
        request: CommentaryRequest,
        handle: JoinHandle<Result<String, CommentaryError>>,
    ) {
        let result = handle
            .join()
            .unwrap_or_else(|_| Err(CommentaryError::Transport("worker panicked".into())));
        game.resolve_commentary(request.session, result);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Gemini Flappy (native) starting...");
    log::info!("Native mode runs headless demo games - run with `trunk serve` to play");

    let settings = gemini_flappy::Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    log::info!("Seed: {}", seed);

    let game = headless::run(&settings, seed);

    println!(
        "\nBest score: {} over {} runs",
        game.best_score(),
        game.scores().runs()
    );
    if game.phase() == gemini_flappy::sim::GamePhase::GameOver {
        println!("Commentary: {}", game.commentary().text);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
