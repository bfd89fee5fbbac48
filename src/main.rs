//! Asteroid Field entry point
//!
//! The browser build draws on a 2D canvas and reads the keyboard. The native
//! binary runs a scripted headless session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use asteroid_field::Settings;
    use asteroid_field::audio::web::WebAudioBackend;
    use asteroid_field::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use asteroid_field::platform::{FrameClock, KeyboardState};
    use asteroid_field::renderer::{RenderSurface, Rgba, TextAlign};
    use asteroid_field::sim::{Game, render, tick};

    /// `RenderSurface` on a 2D canvas context
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    fn css(color: Rgba) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0).round() as u8,
            (color[1] * 255.0).round() as u8,
            (color[2] * 255.0).round() as u8,
            color[3]
        )
    }

    impl CanvasSurface {
        fn trace_circle(&self, center: Vec2, radius: f32) {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            );
        }
    }

    impl RenderSurface for CanvasSurface {
        fn clear(&mut self, color: Rgba) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx
                .fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        }

        fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba) {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            self.ctx.set_stroke_style_str(&css(color));
            self.ctx.begin_path();
            self.ctx.move_to(first.x as f64, first.y as f64);
            for p in rest {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
            self.ctx.close_path();
            self.ctx.stroke();
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.ctx.set_stroke_style_str(&css(color));
            self.trace_circle(center, radius);
            self.ctx.stroke();
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.ctx.set_fill_style_str(&css(color));
            self.trace_circle(center, radius);
            self.ctx.fill();
        }

        fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx
                .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        }

        fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Rgba) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.set_font(&format!("{}px Arial", size_px));
            self.ctx.set_text_align(match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
            });
            let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
        }
    }

    /// Browser session: simulation plus its platform glue
    struct App {
        game: Game,
        surface: CanvasSurface,
        keys: KeyboardState,
        clock: FrameClock,
    }

    impl App {
        fn frame(&mut self, timestamp: f64) {
            let dt = self.clock.advance(timestamp);
            self.game.set_fps(self.clock.fps());
            let input = self.keys.snapshot();
            tick(&mut self.game, &input, dt);
            render(&self.game, &mut self.surface);
        }
    }

    fn canvas_context() -> Option<CanvasRenderingContext2d> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id("canvas")?.dyn_into().ok()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        canvas.get_context("2d").ok()??.dyn_into().ok()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::log_1(&format!("Logger init failed: {}", e).into());
        }
        log::info!("Asteroid Field starting...");

        let Some(ctx) = canvas_context() else {
            log::error!("No 2D canvas context available; not starting");
            return;
        };

        let settings = Settings::load();
        // Write back so new keys show up in storage with their defaults
        settings.save();

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, settings, Box::new(WebAudioBackend::new()));
        game.init();

        let app = Rc::new(RefCell::new(App {
            game,
            surface: CanvasSurface { ctx },
            keys: KeyboardState::new(),
            clock: FrameClock::new(),
        }));

        setup_input_handlers(app.clone());
        request_animation_frame(app);
        log::info!("Asteroid Field running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().keys.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().keys.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-ups are lost while unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Scripted headless session: spin, shoot and press Enter whenever asked
#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser)]
#[command(name = "asteroid-field")]
#[command(about = "Run a scripted headless Asteroid Field session")]
struct Args {
    /// Settings JSON file (defaults when omitted)
    settings: Option<std::path::PathBuf>,

    /// Number of 60 Hz frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// RNG seed for the run
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_field::Settings;
    use asteroid_field::audio::LogBackend;
    use asteroid_field::platform::InputSnapshot;
    use asteroid_field::renderer::DrawList;
    use asteroid_field::sim::{Game, GamePhase, render, tick};
    use clap::Parser;

    env_logger::init();
    let args = Args::parse();
    log::info!("Asteroid Field (native) starting...");
    log::info!("Native mode runs a scripted headless session - build for wasm32 to play");

    let settings = match &args.settings {
        Some(path) => match Settings::load_from_path(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut game = Game::new(args.seed, settings, Box::new(LogBackend));
    game.init();

    const DT: f32 = 1.0 / 60.0;
    let mut surface = DrawList::new();
    for frame in 0..args.frames {
        let waiting = matches!(
            game.director.phase(),
            GamePhase::Start | GamePhase::LevelComplete | GamePhase::GameOver
        );
        let input = InputSnapshot {
            left: true,
            fire: true,
            forward: frame % 120 < 20,
            start: waiting,
            ..Default::default()
        };
        tick(&mut game, &input, DT);
        render(&game, &mut surface);
    }

    println!(
        "{} frames: phase {}, level {}, score {}, lives {}, {} entities, {} draw calls last frame",
        args.frames,
        game.director.phase(),
        game.director.level(),
        game.director.score(),
        game.director.lives(),
        game.world.len(),
        surface.len()
    );
    game.shutdown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
