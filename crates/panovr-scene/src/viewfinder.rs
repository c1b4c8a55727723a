//! Gaze dwell selection.
//!
//! A ring in the middle of the scene view fills while the user keeps looking
//! at one interactive node. Once it is full the node is activated and the
//! ring starts over.

use glam::Vec3;

/// Ring radius when idle and after each activation.
pub const RING_START_RADIUS: f32 = 0.03;
/// Growth per frame while a node stays aimed at.
pub const RING_GROWTH_PER_FRAME: f32 = 0.0005;
/// The node activates once the ring grows past this radius.
pub const RING_ACTIVATION_RADIUS: f32 = 0.1;

/// Gaze segment along the camera's forward axis, in scene units.
const GAZE_NEAR: f32 = 2.0;
const GAZE_FAR: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// RGBA, components in 0..=1.
pub type Color = [f32; 4];

pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
pub const PURPLE: Color = [0.5, 0.0, 0.5, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];

/// A box in the scene that flips between two colors when activated.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveNode {
    pub id: NodeId,
    pub position: Vec3,
    /// Radius of the sphere enclosing the node, used for gaze tests.
    pub bounding_radius: f32,
    colors: [Color; 2],
    showing_first: bool,
}

impl InteractiveNode {
    pub fn new(id: NodeId, position: Vec3, bounding_radius: f32, first: Color, second: Color) -> Self {
        Self {
            id,
            position,
            bounding_radius,
            colors: [first, second],
            showing_first: true,
        }
    }

    /// The two unit boxes placed beside the viewer.
    pub fn default_nodes() -> Vec<Self> {
        // Half the diagonal of a unit cube.
        let radius = 3f32.sqrt() / 2.0;
        vec![
            Self::new(NodeId(0), Vec3::new(4.0, 0.0, -1.0), radius, BLUE, YELLOW),
            Self::new(NodeId(1), Vec3::new(4.0, 0.0, 1.0), radius, PURPLE, YELLOW),
        ]
    }

    pub fn color(&self) -> Color {
        if self.showing_first {
            self.colors[0]
        } else {
            self.colors[1]
        }
    }

    pub fn toggle_color(&mut self) {
        self.showing_first = !self.showing_first;
    }
}

/// The nearest node whose bounding sphere the gaze segment passes through.
pub fn aimed_node(nodes: &[InteractiveNode], origin: Vec3, forward: Vec3) -> Option<NodeId> {
    let dir = forward.try_normalize()?;
    nodes
        .iter()
        .filter_map(|node| {
            let to_node = node.position - origin;
            let along = to_node.dot(dir).clamp(GAZE_NEAR, GAZE_FAR);
            let closest = origin + dir * along;
            let miss = closest.distance(node.position);
            (miss <= node.bounding_radius).then_some((along, node.id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

/// Dwell ring state. The ring is visible only while a node is aimed at.
#[derive(Debug, Clone)]
pub struct Viewfinder {
    loading_radius: f32,
    aimed: Option<NodeId>,
}

impl Viewfinder {
    pub fn new() -> Self {
        Self {
            loading_radius: RING_START_RADIUS,
            aimed: None,
        }
    }

    pub fn loading_radius(&self) -> f32 {
        self.loading_radius
    }

    pub fn aimed(&self) -> Option<NodeId> {
        self.aimed
    }

    pub fn is_loading(&self) -> bool {
        self.aimed.is_some()
    }

    /// Advance one frame with the node currently aimed at, if any.
    ///
    /// Returns the node to activate when the ring fills. Looking away, or at a
    /// different node, starts the ring over.
    pub fn update(&mut self, aimed: Option<NodeId>) -> Option<NodeId> {
        let Some(id) = aimed else {
            self.aimed = None;
            self.loading_radius = RING_START_RADIUS;
            return None;
        };

        if self.aimed != Some(id) {
            self.loading_radius = RING_START_RADIUS;
        }
        self.aimed = Some(id);
        self.loading_radius += RING_GROWTH_PER_FRAME;

        if self.loading_radius > RING_ACTIVATION_RADIUS {
            self.loading_radius = RING_START_RADIUS;
            Some(id)
        } else {
            None
        }
    }
}

impl Default for Viewfinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: NodeId = NodeId(7);

    #[test]
    fn ring_grows_while_aimed() {
        let mut viewfinder = Viewfinder::new();
        assert_eq!(viewfinder.update(Some(NODE)), None);
        assert_eq!(viewfinder.update(Some(NODE)), None);
        assert!((viewfinder.loading_radius() - (RING_START_RADIUS + 2.0 * RING_GROWTH_PER_FRAME)).abs() < 1e-6);
        assert!(viewfinder.is_loading());
    }

    #[test]
    fn ring_activates_past_threshold_and_restarts() {
        let mut viewfinder = Viewfinder::new();
        let mut frames = 0;
        let activated = loop {
            frames += 1;
            if let Some(id) = viewfinder.update(Some(NODE)) {
                break id;
            }
            assert!(frames < 1000);
        };
        assert_eq!(activated, NODE);
        // (0.1 - 0.03) / 0.0005 = 140 frames to reach the threshold.
        assert!((140..=142).contains(&frames), "{frames}");
        assert_eq!(viewfinder.loading_radius(), RING_START_RADIUS);
    }

    #[test]
    fn looking_away_resets() {
        let mut viewfinder = Viewfinder::new();
        for _ in 0..50 {
            viewfinder.update(Some(NODE));
        }
        assert!(viewfinder.loading_radius() > RING_START_RADIUS);
        assert_eq!(viewfinder.update(None), None);
        assert_eq!(viewfinder.loading_radius(), RING_START_RADIUS);
        assert!(!viewfinder.is_loading());
    }

    #[test]
    fn switching_target_restarts_ring() {
        let mut viewfinder = Viewfinder::new();
        for _ in 0..100 {
            viewfinder.update(Some(NODE));
        }
        viewfinder.update(Some(NodeId(8)));
        assert!((viewfinder.loading_radius() - (RING_START_RADIUS + RING_GROWTH_PER_FRAME)).abs() < 1e-6);
        assert_eq!(viewfinder.aimed(), Some(NodeId(8)));
    }

    #[test]
    fn toggle_flips_between_colors() {
        let mut node = InteractiveNode::new(NODE, Vec3::X * 4.0, 0.5, BLUE, YELLOW);
        assert_eq!(node.color(), BLUE);
        node.toggle_color();
        assert_eq!(node.color(), YELLOW);
        node.toggle_color();
        assert_eq!(node.color(), BLUE);
    }

    #[test]
    fn gaze_picks_node_in_front() {
        let nodes = InteractiveNode::default_nodes();
        let at_first = (nodes[0].position).normalize();
        assert_eq!(aimed_node(&nodes, Vec3::ZERO, at_first), Some(NodeId(0)));
        assert_eq!(aimed_node(&nodes, Vec3::ZERO, Vec3::NEG_X), None);
        assert_eq!(aimed_node(&nodes, Vec3::ZERO, Vec3::Y), None);
        assert_eq!(aimed_node(&nodes, Vec3::ZERO, Vec3::ZERO), None);
    }

    #[test]
    fn gaze_ignores_nodes_past_far_end() {
        let node = InteractiveNode::new(NODE, Vec3::new(0.0, 0.0, -20.0), 0.5, BLUE, YELLOW);
        assert_eq!(aimed_node(&[node], Vec3::ZERO, Vec3::NEG_Z), None);
    }
}
