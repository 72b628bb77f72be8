//! Pet Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use pet_flap::highscores::LocalStorageStore;
    use pet_flap::pets::{Pet, pet_by_id};
    use pet_flap::sim::{GameEvent, GamePhase, PcgSource, Playfield, Snapshot};
    use pet_flap::{Engine, TuningProfile, ViewportClass};

    /// LocalStorage key holding an optional `TuningProfile` JSON override
    const TUNING_KEY: &str = "petFlapTuning";
    /// How long the milestone toast stays up
    const TOAST_MS: i32 = 3000;

    thread_local! {
        /// Running game, for the console diagnostics hook
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        engine: Engine<LocalStorageStore, PcgSource>,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        pet: &'static Pet,
        viewport: ViewportClass,
        /// Pending requestAnimationFrame handle
        frame_id: Option<i32>,
    }

    impl Game {
        fn phase(&self) -> GamePhase {
            self.engine.phase()
        }

        /// Match canvas backing store and playfield to the window
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0);
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            self.engine.resize(width as f32, height as f32);

            let viewport = ViewportClass::from_width(width as f32);
            if viewport != self.viewport {
                self.viewport = viewport;
                self.engine.set_profile(profile_for(viewport));
            }
        }

        /// Draw the current snapshot
        fn render(&self) {
            let snap = self.engine.snapshot();
            let playfield = self.engine.playfield();
            let ctx = &self.ctx;

            ctx.set_fill_style_str(self.pet.background_from);
            ctx.fill_rect(0.0, 0.0, playfield.width as f64, playfield.height as f64);

            ctx.set_fill_style_str(self.pet.obstacle_color);
            for obstacle in &snap.obstacles {
                let x = obstacle.horizontal_position as f64;
                let w = snap.obstacle_width as f64;
                let gap_top = obstacle.gap_top_height as f64;
                let gap_bottom = gap_top + snap.gap_size as f64;
                ctx.fill_rect(x, 0.0, w, gap_top);
                ctx.fill_rect(x, gap_bottom, w, playfield.height as f64 - gap_bottom);
            }

            self.draw_pet(&snap);
            self.update_hud(&snap);
        }

        fn draw_pet(&self, snap: &Snapshot) {
            let ctx = &self.ctx;
            let radius = self.engine.profile().hitbox_radius as f64 * self.pet.scale as f64;
            ctx.save();
            let _ = ctx.translate(pet_flap::consts::ENTITY_X as f64, snap.entity_position as f64);
            let _ = ctx.rotate((snap.tilt_degrees() as f64).to_radians());
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, radius, 0.0, std::f64::consts::TAU);
            ctx.set_fill_style_str(self.pet.body_color);
            ctx.fill();
            ctx.set_stroke_style_str("#000000");
            ctx.stroke();
            ctx.restore();
        }

        fn update_hud(&self, snap: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("{} / {}", snap.score, snap.milestone_score)));
            }
            if let Some(el) = document.get_element_by_id("best-score") {
                el.set_text_content(Some(&snap.best_score.to_string()));
            }
            set_visible(&document, "start-prompt", snap.phase == GamePhase::Idle);
            set_visible(&document, "pause-overlay", snap.phase == GamePhase::Paused);
            set_visible(&document, "game-over", snap.phase == GamePhase::Ended);
            if snap.phase == GamePhase::Ended {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&snap.score.to_string()));
                }
                set_visible(&document, "goal-reached", snap.goal_reached());
            }
        }

        fn handle_events(&mut self) {
            for event in self.engine.drain_events() {
                match event {
                    GameEvent::Milestone { score } => {
                        log::info!("Milestone reached: {}", score);
                        show_toast(&format!("Congratulations! You reached {} points!", score));
                    }
                }
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn show_toast(message: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        if let Some(el) = document.get_element_by_id("toast") {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "toast");
        }
        let closure = Closure::once(hide_toast);
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TOAST_MS,
        );
        closure.forget();
    }

    fn hide_toast() {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_visible(&document, "toast", false);
        }
    }

    /// Built-in profile for the viewport unless LocalStorage carries an override
    fn profile_for(viewport: ViewportClass) -> TuningProfile {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(TUNING_KEY).ok())
            .flatten();
        TuningProfile::resolve(stored.as_deref(), viewport)
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Inspect the core from the browser console
    #[wasm_bindgen]
    pub fn game_debug() -> String {
        GAME.with(|slot| {
            slot.borrow()
                .as_ref()
                .and_then(|game| serde_json::to_string(&game.borrow().engine.debug_snapshot()).ok())
                .unwrap_or_else(|| "null".to_string())
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pet Flap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // Pet from the URL query (?pet=rabbit), default otherwise
        let pet_id = window
            .location()
            .search()
            .ok()
            .and_then(|q| {
                q.trim_start_matches('?')
                    .split('&')
                    .find_map(|kv| kv.strip_prefix("pet=").map(str::to_string))
            })
            .unwrap_or_default();
        let pet = pet_by_id(&pet_id);

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        let viewport = ViewportClass::from_width(width);
        let profile = profile_for(viewport);
        log::info!("Viewport {} -> {} profile, pet {}", viewport.as_str(), profile.name, pet.name);

        let seed = js_sys::Date::now() as u64;
        let engine = Engine::new(
            profile,
            Playfield::default(),
            PcgSource::new(seed),
            LocalStorageStore,
        );
        let game = Rc::new(RefCell::new(Game {
            engine,
            ctx,
            canvas: canvas.clone(),
            pet,
            viewport,
            frame_id: None,
        }));
        {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            g.render();
        }
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game);

        log::info!("Pet Flap running!");
    }

    /// Schedule the next frame if running and none is pending
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let needs_frame = {
            let g = game.borrow();
            g.frame_id.is_none() && g.phase() == GamePhase::Running
        };
        if needs_frame {
            let id = request_animation_frame(game.clone());
            game.borrow_mut().frame_id = id;
        }
    }

    /// Cancel the pending frame callback, if any
    fn cancel_loop(game: &Rc<RefCell<Game>>) {
        let id = game.borrow_mut().frame_id.take();
        if let (Some(id), Some(window)) = (id, web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) -> Option<i32> {
        let window = web_sys::window()?;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        id
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_id = None;
            g.engine.frame(time);
            g.handle_events();
            g.render();
        }

        // Stops by itself once the run ends
        ensure_loop(&game);
    }

    /// Impulse, then make sure the loop runs (an impulse may start a run)
    fn flap(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.phase() == GamePhase::Idle {
                hide_toast();
            }
            g.engine.impulse(now_ms());
            g.render();
        }
        ensure_loop(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Tap / click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                flap(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space bar
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" || event.key() == " " {
                    event.prevent_default();
                    flap(&game);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                hide_toast();
                {
                    let mut g = game.borrow_mut();
                    g.engine.retry();
                    g.render();
                }
                ensure_loop(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cancel_loop(&game);
                hide_toast();
                let mut g = game.borrow_mut();
                g.engine.return_to_menu();
                g.render();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_paused(game: &Rc<RefCell<Game>>, paused: bool) {
        if paused {
            cancel_loop(game);
        }
        {
            let mut g = game.borrow_mut();
            g.engine.set_paused(paused, now_ms());
            g.render();
        }
        if !paused {
            ensure_loop(game);
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                if hidden {
                    log::info!("Auto-paused (tab hidden)");
                }
                set_paused(&game, hidden);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                log::info!("Auto-paused (window blur)");
                set_paused(&game, true);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                set_paused(&game, false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
    log::info!("Pet Flap (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use the web build to play");

    let score = autopilot_demo(std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(7));
    println!("Autopilot finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Fly a seeded run at 60 Hz for up to two minutes, flapping whenever the
/// pet sinks below the middle of the next gap
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_demo(seed: u64) -> u32 {
    use pet_flap::consts::{ENTITY_X, OBSTACLE_WIDTH};
    use pet_flap::sim::{GameEvent, GamePhase, PcgSource, Playfield};
    use pet_flap::{Engine, MemoryStore, TuningProfile};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut engine = Engine::new(
        TuningProfile::desktop(),
        Playfield::new(1024.0, 720.0),
        PcgSource::new(seed),
        MemoryStore::new(),
    );
    let mut t = 0.0;
    engine.start();

    while engine.phase() == GamePhase::Running && t < 120_000.0 {
        let snap = engine.snapshot();
        let target = snap
            .obstacles
            .iter()
            .find(|o| o.horizontal_position + OBSTACLE_WIDTH > ENTITY_X)
            .map(|o| o.gap_top_height + snap.gap_size * 0.6)
            .unwrap_or(360.0);
        if snap.entity_position > target && snap.entity_velocity > 0.0 {
            engine.impulse(t);
        }
        engine.frame(t);
        for event in engine.drain_events() {
            let GameEvent::Milestone { score } = event;
            log::info!("Milestone reached: {}", score);
        }
        t += FRAME_MS;
    }

    engine.snapshot().score
}
