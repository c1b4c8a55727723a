pub mod camera;
pub mod rig;
pub mod view;
pub mod viewfinder;

use camera::Camera;
use glam::{Quat, Vec3};
use panovr_config::{AppConfig, PanoramaControl};
use panovr_input::gesture::FieldOfView;
use panovr_input::GestureEvent;
use panovr_motion::types::MountAngles;
use panovr_motion::FrameUpdate;
use rig::CameraRig;
use view::PanoramaView;
use viewfinder::{aimed_node, InteractiveNode, NodeId, Viewfinder};

/// The two halves of the stereo display.
///
/// The scene half looks through the sensor-driven rig. The panorama half
/// takes its orientation either from the corrected attitude or from drag
/// gestures, depending on `control`. This is the only writer of both camera
/// orientations.
pub struct StereoViews {
    pub rig: CameraRig,
    scene_camera: Camera,
    pub panorama: PanoramaView,
    control: PanoramaControl,
    nodes: Vec<InteractiveNode>,
    viewfinder: Viewfinder,
}

impl StereoViews {
    pub fn new(config: &AppConfig, mount: MountAngles) -> Self {
        let fov = FieldOfView::new(
            config.gesture.horizontal_fov_degrees,
            config.gesture.vertical_fov_degrees,
        );
        let rig = CameraRig::new(mount);
        let mut scene_camera = Camera::new(fov.vertical_degrees, config.scene.z_far);
        scene_camera.orientation = rig.orientation();
        Self {
            rig,
            scene_camera,
            panorama: PanoramaView::new(&config.panorama, fov),
            control: config.panorama.control,
            nodes: InteractiveNode::default_nodes(),
            viewfinder: Viewfinder::new(),
        }
    }

    pub fn control(&self) -> PanoramaControl {
        self.control
    }

    pub fn set_control(&mut self, control: PanoramaControl) {
        if control != self.control {
            // A drag in flight would otherwise resume from a stale base.
            self.panorama.handle_gesture(GestureEvent::End);
            tracing::info!(?control, "Panorama control changed");
        }
        self.control = control;
    }

    /// Both views share one window split in half; each gets one half.
    pub fn resize(&mut self, width: f32, height: f32) {
        let half = height / 2.0;
        self.scene_camera.set_viewport(width, half);
        self.panorama.resize(width, half);
    }

    pub fn set_mount(&mut self, mount: MountAngles) {
        self.rig.set_mount(mount);
        self.scene_camera.orientation = self.rig.orientation();
    }

    /// Write one frame's attitude-derived update into the cameras.
    pub fn apply_frame(&mut self, frame: &FrameUpdate) {
        self.rig.set_joints(frame.rig_joints);
        self.scene_camera.orientation = self.rig.orientation();
        if self.control == PanoramaControl::Motion {
            self.panorama.set_camera_orientation(frame.panorama_orientation);
        }
    }

    /// Route a pan gesture to the panorama view. Ignored while the panorama
    /// follows device motion.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        if self.control == PanoramaControl::Drag {
            self.panorama.handle_gesture(event);
        }
    }

    /// Roll the panorama camera about its view axis.
    ///
    /// Only takes effect while gestures own the panorama and no drag is in
    /// progress. Returns whether the roll was applied.
    pub fn roll_panorama(&mut self, radians: f32) -> bool {
        if self.control != PanoramaControl::Drag || self.panorama.is_dragging() {
            return false;
        }
        self.panorama.roll(radians);
        true
    }

    /// Advance the dwell ring one frame using where the scene camera looks.
    /// Returns the node toggled this frame, if any.
    pub fn update_viewfinder(&mut self) -> Option<NodeId> {
        let aimed = aimed_node(&self.nodes, Vec3::ZERO, self.scene_camera.forward());
        let activated = self.viewfinder.update(aimed)?;
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == activated) {
            node.toggle_color();
            tracing::info!(node = activated.0, color = ?node.color(), "Node selected");
        }
        Some(activated)
    }

    pub fn viewfinder(&self) -> &Viewfinder {
        &self.viewfinder
    }

    pub fn nodes(&self) -> &[InteractiveNode] {
        &self.nodes
    }

    pub fn scene_camera(&self) -> &Camera {
        &self.scene_camera
    }

    pub fn scene_orientation(&self) -> Quat {
        self.scene_camera.orientation
    }

    pub fn panorama_orientation(&self) -> Quat {
        self.panorama.camera_orientation()
    }
}
