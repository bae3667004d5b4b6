//! Beam Calc entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use beam_calc::consts::*;
    use beam_calc::renderer::{RenderState, shapes};
    use beam_calc::sim::{SceneConfig, SceneEvent, SceneState, TickInput, tick};
    use beam_calc::{CalculatorForm, Settings, Shape};

    /// App instance holding all state
    struct App {
        scene: SceneState,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        collisions: u64,
    }

    impl App {
        fn new(settings: Settings, width: f32, height: f32, seed: u64) -> Self {
            let config = SceneConfig {
                timing: settings.timing(),
                ..SceneConfig::reference()
            };
            Self {
                scene: SceneState::new(config, width, height, seed),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                collisions: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.scene, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.resize = None;
            }

            for event in self.scene.drain_events() {
                if let SceneEvent::Collision { .. } = event {
                    self.collisions += 1;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = shapes::scene(&self.scene, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    /// CSS size and physical pixel size of the canvas
    fn canvas_size(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        (
            (client_w as f32, client_h as f32),
            (
                (client_w as f64 * dpr) as u32,
                (client_h as f64 * dpr) as u32,
            ),
        )
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Beam Calc starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Calculator works even if the background cannot start
        setup_calculator(&document);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (viewport, (width, height)) = canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(
            settings,
            viewport.0,
            viewport.1,
            seed,
        )));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_resize(&canvas, app.clone());
        setup_keyboard(app.clone());

        request_animation_frame(app);

        log::info!("Beam Calc running!");
        Ok(())
    }

    /// Bind the calculator form on the page, if there is one
    fn setup_calculator(document: &Document) {
        let Some(root) = document.get_element_by_id("calculator") else {
            return;
        };
        let shape = root
            .get_attribute("data-shape")
            .and_then(|slug| Shape::from_slug(&slug))
            .unwrap_or(Shape::Rectangle);
        let Some(button) = document.get_element_by_id("hitung") else {
            log::warn!("Calculator without a submit button");
            return;
        };

        let form = Rc::new(RefCell::new(CalculatorForm::new(shape)));
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let mut form = form.borrow_mut();

            for field in shape.inputs() {
                let value = input_element(&document, field)
                    .map(|el| el.value())
                    .unwrap_or_default();
                if let Err(e) = form.set_input(field, &value) {
                    log::warn!("{}", e);
                }
            }

            // Bad input keeps whatever is on screen
            if let Err(e) = form.calculate() {
                log::debug!("Skipping calculation: {}", e);
                return;
            }
            for (field, value) in form.results() {
                if let Some(el) = input_element(&document, field) {
                    el.set_value(value);
                }
            }
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();

        log::info!("Calculator ready: {}", shape.slug());
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (viewport, (width, height)) = canvas_size(&canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut app = app.borrow_mut();
            app.input.resize = Some(viewport);
            if let Some(ref mut render_state) = app.render_state {
                render_state.resize(width, height, viewport);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut app = app.borrow_mut();
            match event.key().as_str() {
                "Escape" => app.input.pause = true,
                "q" | "Q" => {
                    let preset = app.settings.cycle_quality();
                    app.settings.save();
                    log::info!("Quality: {}", preset.as_str());
                }
                "m" | "M" => {
                    app.settings.reduced_motion = !app.settings.reduced_motion;
                    app.settings.save();
                    log::info!("Reduced motion: {}", app.settings.reduced_motion);
                }
                "?" => log::info!(
                    "{} collisions over {} ticks",
                    app.collisions,
                    app.scene.time_ticks
                ),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use beam_calc::consts::SIM_HZ;
    use beam_calc::sim::{SceneEvent, SceneState, TickInput, tick};
    use beam_calc::{CalculatorForm, Shape};

    env_logger::init();
    log::info!("Beam Calc (native) starting...");
    log::info!("Native mode runs the scene headless - serve the wasm build for the web version");

    // Ten seconds of the reference scene
    let mut scene = SceneState::reference(1280.0, 720.0, 42);
    let input = TickInput::default();
    let mut collisions = 0;
    for _ in 0..(SIM_HZ * 10) {
        tick(&mut scene, &input);
        for event in scene.drain_events() {
            match event {
                SceneEvent::Collision { beam_id, at } => {
                    collisions += 1;
                    println!(
                        "t={:>5.2}s beam {:>2} collided at ({:.1}, {:.1})",
                        beam_calc::ticks_to_secs(scene.time_ticks),
                        beam_id,
                        at.x,
                        at.y
                    );
                }
                SceneEvent::CycleReset { beam_id, cycle_key } => {
                    log::debug!("beam {} -> cycle {}", beam_id, cycle_key);
                }
            }
        }
    }
    println!("{} collisions in 10s", collisions);

    let mut form = CalculatorForm::new(Shape::Rectangle);
    let _ = form.set_input("panjang", "5");
    let _ = form.set_input("lebar", "3");
    match form.calculate() {
        Ok(()) => {
            for (field, value) in form.results() {
                println!("{}: {}", field, value);
            }
        }
        Err(e) => log::warn!("{}", e),
    }
}
