//! Endless Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use endless_racer::consts::*;
    use endless_racer::renderer::SdfRenderState;
    use endless_racer::sim::{GameEvent, GameState, tick};
    use endless_racer::{HudSnapshot, InputQueue, InputState, Intent, KeyEdge, Settings, Tuning};

    /// Game instance
    struct Game {
        state: GameState,
        render_state: Option<SdfRenderState>,
        settings: Settings,
        input_queue: InputQueue,
        input_state: InputState,
        last_time: f64,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning),
                render_state: None,
                settings,
                input_queue: InputQueue::default(),
                input_state: InputState::default(),
                last_time: 0.0,
                last_hud: None,
            }
        }

        /// Run one simulation tick
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            let input = self.input_state.snapshot(&mut self.input_queue);
            tick(&mut self.state, &input, dt);

            for event in &self.state.events {
                match event {
                    GameEvent::GameOver { final_score } => {
                        log::info!("Final score: {}", final_score);
                    }
                    GameEvent::Reset => log::info!("New run started"),
                    _ => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
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
        fn update_hud(&mut self) {
            let hud = HudSnapshot::from_state(&self.state);
            if self.last_hud == Some(hud) {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score_text()));
            }
            if let Some(el) = document.get_element_by_id("speed") {
                el.set_text_content(Some(&hud.speed_text()));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                match hud.final_score_text() {
                    Some(text) => {
                        if let Some(score_el) = document.get_element_by_id("final-score") {
                            score_el.set_text_content(Some(&text));
                        }
                        let _ = el.class_list().remove_1("hidden");
                    }
                    None => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }

            self.last_hud = Some(hud);
        }
    }

    /// Tuning overrides embedded in the page as `<script type="application/json" id="tuning">`
    fn load_tuning(document: &Document) -> Tuning {
        document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default()
    }

    /// Size the canvas backing store to its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Endless Racer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let (width, height) = fit_canvas(&canvas);

        let tuning = load_tuning(&document);
        let settings = Settings::from_query(&window.location().search().unwrap_or_default());
        log::info!(
            "Quality: {}, reduced motion: {}",
            settings.quality.as_str(),
            settings.reduced_motion
        );

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, settings)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => {
                                game.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_resize(&canvas, game.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        request_animation_frame(game);

        log::info!("Endless Racer running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(intent) = Intent::from_key_code(&event.code()) {
                    event.prevent_default();
                    game.borrow_mut().input_queue.push(KeyEdge::down(intent));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(intent) = Intent::from_key_code(&event.code()) {
                    game.borrow_mut().input_queue.push(KeyEdge::up(intent));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost while unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.input_queue.clear();
                g.input_state.release_all();
                log::info!("Input released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                if let Some(ref mut render_state) = g.render_state {
                    render_state.set_start_time(time);
                }
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use endless_racer::Tuning;

    env_logger::init();
    log::info!("Endless Racer (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    headless::run(42, tuning, 3600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use endless_racer::consts::FRAME_DT;
    use endless_racer::sim::{GameState, TickInput, tick};
    use endless_racer::{HudSnapshot, Tuning};

    /// How far ahead the autopilot looks for obstacles
    const LOOKAHEAD: f32 = 90.0;

    fn lane_blocked(state: &GameState, lane: u8) -> bool {
        state
            .obstacles
            .iter()
            .any(|o| o.lane == lane && o.position_z > -3.0 && o.position_z < LOOKAHEAD)
    }

    /// Hold throttle, dodge into a free neighbouring lane, brake if boxed in
    fn autopilot(state: &GameState) -> TickInput {
        let lane = state.vehicle.lane;
        let mut input = TickInput {
            accelerate: true,
            ..Default::default()
        };
        if !lane_blocked(state, lane) {
            return input;
        }
        if lane > 0 && !lane_blocked(state, lane - 1) {
            input.steer_left = true;
        } else if lane < 2 && !lane_blocked(state, lane + 1) {
            input.steer_right = true;
        } else {
            input.accelerate = false;
            input.brake = true;
        }
        input
    }

    pub fn run(seed: u64, tuning: Tuning, max_ticks: u64) {
        let mut state = GameState::with_tuning(seed, tuning);

        while state.time_ticks < max_ticks && !state.is_over() {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_DT);
        }

        let hud = HudSnapshot::from_state(&state);
        log::info!(
            "Session (seed {}) finished after {} ticks: {}, {}, game over: {}",
            state.seed,
            state.time_ticks,
            hud.score_text(),
            hud.speed_text(),
            state.is_over()
        );
        println!("{} ({} ticks)", hud.score_text(), state.time_ticks);
    }
}
