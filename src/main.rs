use anyhow::Result;
use panovr_config::{AppConfig, MotionSource, PanoramaControl};
use panovr_input::mouse::MouseDragTracker;
use panovr_input::GestureEvent;
use panovr_motion::replay::ImuRecording;
use panovr_motion::{MotionManager, OrientationEngine, ScreenOrientation};
use panovr_scene::StereoViews;
use std::sync::Arc;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Roll step for Q/E, used when the panorama follows drag gestures.
const ROLL_STEP: f32 = 0.05;

/// Application state. Everything here lives on the event-loop thread; the
/// motion task only publishes attitude snapshots that are pulled on redraw.
struct App {
    config: AppConfig,
    motion: MotionManager,
    engine: OrientationEngine,
    views: StereoViews,
    mouse: MouseDragTracker,
    window: Option<Arc<Window>>,
    frame_count: u64,
    frames_without_sample: u64,
}

impl App {
    fn new(config: AppConfig, motion: MotionManager) -> Self {
        let engine = OrientationEngine::new(config.screen_orientation);
        let views = StereoViews::new(&config, engine.mount_angles());
        Self {
            config,
            motion,
            engine,
            views,
            mouse: MouseDragTracker::new(),
            window: None,
            frame_count: 0,
            frames_without_sample: 0,
        }
    }

    fn set_screen_orientation(&mut self, screen: ScreenOrientation) {
        let mount = self.engine.set_screen_orientation(screen);
        self.views.set_mount(mount);
    }

    fn roll_panorama(&mut self, radians: f32) {
        if !self.views.roll_panorama(radians) {
            tracing::debug!(control = ?self.views.control(), "Roll ignored");
        }
    }

    fn handle_gesture(&mut self, event: Option<GestureEvent>) {
        if let Some(event) = event {
            self.views.handle_gesture(event);
        }
    }

    /// Per-frame tick: pull the newest attitude and write both cameras.
    fn tick(&mut self) {
        let attitude = self.motion.latest();
        match self.engine.update(attitude.as_ref()) {
            Some(frame) => self.views.apply_frame(&frame),
            None => self.frames_without_sample += 1,
        }
        self.views.update_viewfinder();

        self.frame_count += 1;
        if self.frame_count % 300 == 0 {
            tracing::debug!(
                frames = self.frame_count,
                without_sample = self.frames_without_sample,
                scene_forward = ?self.views.scene_camera().forward(),
                panorama_forward = ?self.views.panorama.camera().forward(),
                ring = self.views.viewfinder().loading_radius(),
                "Frame heartbeat"
            );
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.motion.stop();
        self.config.screen_orientation = self.engine.screen_orientation();
        self.config.panorama.control = self.views.control();
        if let Err(e) = panovr_config::save_config(&self.config) {
            error!(?e, "Failed to save config");
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Scene view on top, panorama view below.
        let attrs = Window::default_attributes()
            .with_title("Panorama VR")
            .with_inner_size(PhysicalSize::new(960, 1080));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(?e, "Failed to create window");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.views.resize(size.width as f32, size.height as f32);
        window.request_redraw();
        self.window = Some(window);

        info!(
            screen = ?self.engine.screen_orientation(),
            control = ?self.views.control(),
            aspect = self.views.scene_camera().aspect_ratio,
            fov_y = self.views.scene_camera().fov_y_degrees,
            "Viewer initialized"
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                self.views.resize(size.width as f32, size.height as f32);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::F5) => self.motion.set_zero(),
                    PhysicalKey::Code(KeyCode::F6) => {
                        self.set_screen_orientation(ScreenOrientation::Portrait)
                    }
                    PhysicalKey::Code(KeyCode::F7) => {
                        self.set_screen_orientation(ScreenOrientation::PortraitUpsideDown)
                    }
                    PhysicalKey::Code(KeyCode::F8) => {
                        self.set_screen_orientation(ScreenOrientation::LandscapeLeft)
                    }
                    PhysicalKey::Code(KeyCode::F9) => {
                        self.set_screen_orientation(ScreenOrientation::LandscapeRight)
                    }
                    PhysicalKey::Code(KeyCode::F10) => {
                        let control = self.views.control().toggled();
                        self.views.set_control(control);
                    }
                    PhysicalKey::Code(KeyCode::F11) => {
                        self.motion.recalibrate(self.config.motion.calibration_samples);
                    }
                    PhysicalKey::Code(KeyCode::KeyQ) => self.roll_panorama(-ROLL_STEP),
                    PhysicalKey::Code(KeyCode::KeyE) => self.roll_panorama(ROLL_STEP),
                    PhysicalKey::Code(KeyCode::Escape) => self.shutdown(event_loop),
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                // The panorama occupies the lower half of the window.
                let top = self.views.panorama.size().y as f64;
                let event = self.mouse.on_cursor_moved(position.x, position.y - top);
                self.handle_gesture(event);
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let event = self.mouse.on_mouse_button(button, state);
                self.handle_gesture(event);
            }

            WindowEvent::CursorLeft { .. } => {
                let event = self.mouse.on_cursor_left();
                self.handle_gesture(event);
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "panovr=info,panovr_motion=info,panovr_input=info,panovr_scene=info".into()
            }),
        )
        .init();

    info!("Panorama VR viewer starting");

    let mut config = panovr_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        screen = ?config.screen_orientation,
        rate_hz = config.motion.update_rate_hz,
        reference_frame = ?config.motion.reference_frame,
        "Config loaded"
    );

    let interval = config.motion.update_interval();
    let motion = match config.motion.source.clone() {
        MotionSource::Simulated => MotionManager::simulated(interval),
        MotionSource::Replay { path } => match ImuRecording::load(&path) {
            Ok(recording) => MotionManager::replay(
                recording,
                interval,
                config.motion.madgwick_beta,
                config.motion.calibration_samples,
            ),
            Err(e) => {
                warn!(?e, ?path, "Failed to load IMU recording, using simulated motion");
                MotionManager::simulated(interval)
            }
        },
        MotionSource::Stationary => {
            warn!("No motion source, panorama follows drag gestures only");
            config.panorama.control = PanoramaControl::Drag;
            MotionManager::stationary()
        }
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, motion);
    event_loop.run_app(&mut app)?;

    Ok(())
}
