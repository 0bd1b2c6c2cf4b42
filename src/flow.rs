//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]. On `resumed` it creates the
//! window and the [`SceneController`], so the editor and theme controls respond
//! right away, then starts loading: configuration, GPU context, font and
//! matcaps. Natively the loading future is driven by a tokio runtime; on the web
//! it runs in `spawn_local` and the finished [`AppState`] comes back as a
//! [`FlowEvent::Initialized`] user event. The scene is bootstrapped once it arrives.
//!
//! # Lifecycle
//!
//! Every frame (`RedrawRequested`):
//! 1. Advance the [`Clock`]
//! 2. Apply damped orbit motion and upload the camera uniform
//! 3. Sync GPU buffers with the scene and draw it
//! 4. Request the next redraw
//!
//! Input that edits the scene is turned into [`UiEvent`]s: natively from winit
//! events, on the web from DOM listeners (see `crate::web`).

use std::{fmt::Debug, sync::Arc};

use instant::{Duration, Instant};
use rand::{SeedableRng, rngs::SmallRng};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{
    config::Config,
    context::Context,
    controller::{BACKSPACE_KEY, SceneController, UiEvent},
    data_structures::{scene_graph::Scene, texture::Texture},
    editor::{DOUBLE_TAP_MS, SUBMIT_KEY},
    font::Font,
    overlay::Overlay,
    render::SceneRenderer,
    resources::load_assets,
    viewport::{Layout, Viewport},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Interval between two frame rate log lines.
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Monotonic frame clock.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last: Instant,
    frames: u32,
    last_report: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frames: 0,
            last_report: now,
        }
    }

    /// Start a new frame and return the time since the previous one.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        self.frames += 1;
        let since_report = now - self.last_report;
        if since_report >= FPS_REPORT_INTERVAL {
            log::debug!(
                "{:.1} fps",
                self.frames as f64 / since_report.as_secs_f64()
            );
            self.frames = 0;
            self.last_report = now;
        }
        dt
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns pairs of left clicks into double clicks. Timestamps are in milliseconds.
#[derive(Debug, Default)]
pub struct DoubleClick {
    last_press_ms: Option<f64>,
}

impl DoubleClick {
    pub fn press(&mut self, now_ms: f64) -> bool {
        match self.last_press_ms.take() {
            Some(last) if now_ms - last < DOUBLE_TAP_MS => true,
            _ => {
                self.last_press_ms = Some(now_ms);
                false
            }
        }
    }
}

/// Translate a winit key press into the DOM style key names the controller expects.
pub fn key_event(event: &KeyEvent) -> Option<UiEvent> {
    if event.state != ElementState::Pressed {
        return None;
    }
    let key = match &event.logical_key {
        Key::Character(c) => c.to_string(),
        Key::Named(NamedKey::Enter) => SUBMIT_KEY.to_string(),
        Key::Named(NamedKey::Backspace) => BACKSPACE_KEY.to_string(),
        Key::Named(NamedKey::Space) => " ".to_string(),
        _ => return None,
    };
    let text = event
        .text
        .as_ref()
        .map(|text| text.to_string())
        .filter(|text| !text.chars().any(char::is_control));
    Some(UiEvent::KeyDown { key, text })
}

/// GPU context and renderer once loading finished.
pub struct AppState {
    pub(crate) ctx: Context,
    renderer: SceneRenderer,
    is_surface_configured: bool,
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ctx", &self.ctx)
            .field("is_surface_configured", &self.is_surface_configured)
            .finish()
    }
}

/// Loaded configuration and font, handed to the controller for the bootstrap.
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub font: Option<Font>,
}

impl AppState {
    async fn new(window: Arc<Window>, viewport: Viewport) -> anyhow::Result<(Self, Loaded)> {
        let config = Config::load().await;
        let ctx = Context::new(window, viewport).await?;
        let assets = load_assets(&config.font, &ctx.device, &ctx.queue).await;
        let renderer = SceneRenderer::new(&ctx, &assets.matcaps);
        let state = Self {
            ctx,
            renderer,
            is_surface_configured: false,
        };
        Ok((
            state,
            Loaded {
                config,
                font: assets.font,
            },
        ))
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        let (width, height) = viewport.surface_size();
        self.ctx.viewport = viewport;
        self.ctx.config.width = width;
        self.ctx.config.height = height;
        self.is_surface_configured = true;
        self.ctx
            .projection
            .resize(viewport.width as f32, viewport.height as f32);
        self.ctx.camera.controller.resize(viewport.height as f32);
        self.ctx
            .surface
            .configure(&self.ctx.device, &self.ctx.config);
        self.ctx.depth_texture =
            Texture::create_depth_texture(&self.ctx.device, [width, height], "depth_texture");
        log::debug!(
            "resized to {}x{} at pixel ratio {}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio()
        );
    }

    fn current_viewport(&self) -> Viewport {
        let size = self.ctx.window.inner_size();
        Viewport::from_physical(size.width, size.height, self.ctx.window.scale_factor())
    }

    fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.ctx.write_camera();
        self.renderer.sync(&self.ctx, scene);
        self.renderer.render(&self.ctx, scene)
    }
}

pub enum FlowEvent {
    Initialized {
        state: Box<AppState>,
        loaded: Loaded,
    },
    Ui(UiEvent),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state, loaded } => f
                .debug_struct("Initialized")
                .field("state", state)
                .field("loaded", loaded)
                .finish(),
            Self::Ui(event) => f.debug_tuple("Ui").field(event).finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    /// Exists from `resumed` on, so the editor works while assets load.
    controller: Option<SceneController>,
    state: Option<AppState>,
    started: bool,
    clock: Clock,
    #[cfg(not(target_arch = "wasm32"))]
    double_click: DoubleClick,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            controller: None,
            state: None,
            started: false,
            clock: Clock::new(),
            #[cfg(not(target_arch = "wasm32"))]
            double_click: DoubleClick::default(),
        })
    }

    fn handle_ui(&mut self, event: UiEvent) {
        match &mut self.controller {
            Some(controller) => controller.handle(event),
            None => log::debug!("dropping {:?}, no window yet", event),
        }
    }

    /// Install what loading produced and build the scene.
    fn ready(&mut self, mut state: AppState, loaded: Loaded, viewport: Viewport) {
        let Loaded { config, font } = loaded;
        let seed = config.seed();
        log::debug!("shape layout seed {}", seed);
        if let Some(controller) = &mut self.controller {
            controller.attach(config, font);
            controller.bootstrap(&mut SmallRng::seed_from_u64(seed));
        }
        state.resize(viewport);
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    /// Native input that maps onto editor events. The web gets these from the DOM.
    #[cfg(not(target_arch = "wasm32"))]
    fn platform_input(&mut self, event: &WindowEvent) {
        let now_ms = self.now_ms();
        let ui = match event {
            WindowEvent::KeyboardInput { event, .. } => key_event(event),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: winit::event::MouseButton::Left,
                ..
            } => self.double_click.press(now_ms).then_some(UiEvent::DoubleClick),
            WindowEvent::Touch(touch) if touch.phase == winit::event::TouchPhase::Started => {
                Some(UiEvent::TouchStart {
                    timestamp_ms: now_ms,
                })
            }
            _ => None,
        };
        if let Some(ui) = ui {
            self.handle_ui(ui);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn platform_input(&mut self, _event: &WindowEvent) {}
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("matcap text");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match crate::web::canvas() {
                Ok(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                Err(e) => log::error!("{:#}", e),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        let (viewport, overlay): (Viewport, Box<dyn Overlay>) = {
            let size = window.inner_size();
            let viewport =
                Viewport::from_physical(size.width, size.height, window.scale_factor());
            (viewport, Box::new(crate::overlay::HeadlessOverlay::new()))
        };

        #[cfg(target_arch = "wasm32")]
        let (viewport, overlay): (Viewport, Box<dyn Overlay>) = {
            if let Err(e) = crate::web::install_listeners(self.proxy.clone()) {
                log::error!("{:#}", e);
            }
            let viewport = crate::web::initial_viewport().unwrap_or_else(|| {
                let size = window.inner_size();
                Viewport::from_physical(size.width, size.height, window.scale_factor())
            });
            match crate::web::DomOverlay::new() {
                Ok(overlay) => (viewport, Box::new(overlay)),
                Err(e) => {
                    log::error!("{:#}", e);
                    (viewport, Box::new(crate::overlay::HeadlessOverlay::new()))
                }
            }
        };

        let viewport = if viewport.is_empty() {
            log::warn!("window reports an empty size, assuming 800x600");
            Viewport::new(800.0, 600.0, viewport.device_pixel_ratio)
        } else {
            viewport
        };

        let mut controller = SceneController::new(Config::default(), None, overlay);
        controller
            .overlay_mut()
            .set_tooltip_mode(Layout::for_width(viewport.width).tooltips);
        self.controller = Some(controller);

        let init_future = AppState::new(window, viewport);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((state, loaded)) => {
                    let viewport = state.current_viewport();
                    self.ready(state, loaded, viewport);
                }
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok((state, loaded)) => {
                        if proxy
                            .send_event(FlowEvent::Initialized {
                                state: Box::new(state),
                                loaded,
                            })
                            .is_err()
                        {
                            log::error!("event loop closed before the scene was ready");
                        }
                    }
                    Err(e) => log::error!("App initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized { state, loaded } => {
                let state = *state;
                // The canvas may have been resized while loading
                #[cfg(target_arch = "wasm32")]
                let viewport = crate::web::initial_viewport()
                    .unwrap_or_else(|| state.current_viewport());
                #[cfg(not(target_arch = "wasm32"))]
                let viewport = state.current_viewport();
                self.ready(state, loaded, viewport);
            }
            FlowEvent::Ui(ui) => self.handle_ui(ui),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.state.is_none() {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        }

        self.platform_input(&event);

        let (Some(state), Some(controller)) = (&mut self.state, &mut self.controller) else {
            return;
        };
        state.ctx.camera.controller.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.resize(Viewport::from_physical(
                    size.width,
                    size.height,
                    state.ctx.window.scale_factor(),
                ));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let viewport = state.current_viewport();
                state.resize(viewport);
            }
            WindowEvent::RedrawRequested => {
                self.clock.tick();
                match state.render(controller.scene_mut()) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let viewport = state.current_viewport();
                        state.resize(viewport);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Initialise logging, open the window and run until it closes.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
