//! Turns pointer gestures and search commands into view operations and
//! publishes what happened on the [`EventBus`].
//!
//! Drags are coalesced: [`Controller::on_dragged`] only records where the
//! pointer went and [`Controller::drag`], called by the host right before
//! painting, applies the accumulated move once per frame.

use crate::geom::Point;
use crate::view::View;
use std::time::Instant;
use tracing::{debug, warn};
use treebolic_core::{Edge, MountPoint, NodeId};
use treebolic_events::{Event, EventBus, StatusKind, TooltipInfo};
use treebolic_hyper::Complex;
use treebolic_hyper::distance::euclidean_distance;
use treebolic_search::{Generator, MatchMode, MatchScope, NoCaseMatcher, spawn_traverser};

/// Longest disk distance a single drag event may move the tree.
pub const MAX_SHIFT_SPAN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Translate,
    Rotate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Start a new search, from `start` or the root.
    Search {
        scope: MatchScope,
        mode: MatchMode,
        target: String,
        start: Option<NodeId>,
    },
    Continue,
    Reset,
}

pub struct Controller {
    bus: EventBus,

    drag_start: Complex,
    drag_end: Complex,
    drag_mode: DragMode,
    was_dragged: bool,
    was_moved: bool,

    hot: Option<NodeId>,
    hover: Option<NodeId>,

    traverser: Option<Generator<NodeId>>,
}

impl Controller {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            drag_start: Complex::ZERO,
            drag_end: Complex::ZERO,
            drag_mode: DragMode::default(),
            was_dragged: false,
            was_moved: false,
            hot: None,
            hover: None,
            traverser: None,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn reset(&mut self) {
        self.hot = None;
        self.hover = None;
        self.was_dragged = false;
        self.was_moved = false;
        self.drag_start = Complex::ZERO;
        self.drag_end = Complex::ZERO;
    }

    /// Reset the view and any gesture in progress.
    pub fn reset_view(&mut self, view: &mut View) {
        self.reset();
        view.reset();
    }

    // P O I N T E R

    pub fn on_down(&mut self, view: &View, p: Point, mode: DragMode) {
        self.drag_start = view.to_disk(p);
        self.drag_end = self.drag_start;
        self.drag_mode = mode;
    }

    pub fn on_up(&mut self, view: &mut View, p: Point) {
        if self.was_dragged {
            self.was_dragged = false;
            view.leave_drag();
            self.bus.publish(Event::DragEnded);
        } else {
            self.on_select(view, p);
        }
    }

    pub fn on_dragged(&mut self, view: &mut View, p: Point) {
        let mut end = view.to_disk(p);
        if euclidean_distance(self.drag_start, end) > MAX_SHIFT_SPAN {
            end = Complex::from_arg_abs((end - self.drag_start).arg(), MAX_SHIFT_SPAN) + self.drag_start;
        }
        self.drag_end = end;
        self.was_moved = true;
        if !self.was_dragged {
            self.was_dragged = true;
            view.enter_drag();
            self.bus.publish(Event::DragStarted);
        }
        view.repaint();
    }

    /// Apply the move recorded since the last frame. Returns whether the
    /// tree moved.
    pub fn drag(&mut self, view: &mut View) -> bool {
        if !self.was_moved {
            return false;
        }
        match self.drag_mode {
            DragMode::Translate => view.compose_translate(self.drag_start, self.drag_end),
            DragMode::Rotate => view.compose_rotate(self.drag_start, self.drag_end),
        }
        self.drag_start = self.drag_end;
        self.was_moved = false;
        true
    }

    pub fn on_select(&mut self, view: &mut View, p: Point) {
        if let Some(node) = view.find_node_at(p) {
            self.select(view, node);
        }
    }

    /// Returns whether a new node came under the pointer.
    pub fn on_hover(&mut self, view: &mut View, p: Point) -> bool {
        let node = view.find_node_at(p);
        let again = self.hot == node;
        self.hot = node;
        match node {
            Some(node) if !again => {
                self.hover(view, node);
                true
            }
            None if !again => {
                self.bus.publish(Event::HoverCleared);
                false
            }
            _ => false,
        }
    }

    /// The pointer rested on the hot node. Focuses it when the view focuses
    /// on hover and the node is not centered already.
    pub fn on_long_hover(&mut self, view: &mut View) -> bool {
        if !view.focus_on_hover() {
            return false;
        }
        let again = self.hot == self.hover;
        self.hover = self.hot;
        let Some(node) = self.hover else {
            return false;
        };
        if !again || view.model()[node].location.hyper.center == Complex::ZERO {
            return false;
        }
        self.focus(view, node);
        true
    }

    pub fn on_focus(&mut self, view: &mut View, p: Point) {
        if let Some(node) = view.find_node_at(p) {
            self.focus(view, node);
        }
    }

    pub fn on_mount(&mut self, view: &mut View, p: Point) {
        if let Some(node) = view.find_node_at(p) {
            self.toggle_mount(view, node);
        }
    }

    pub fn on_link(&mut self, view: &mut View, p: Point) {
        let Some(node) = view.find_node_at(p) else {
            return;
        };
        let data = &view.model()[node].data;
        if let Some(href) = data.link.clone() {
            let target = data.target.clone();
            self.link_to(view, &href, target);
        }
    }

    /// Zoom by `factor` about `pivot`; see [`View::set_zoom`].
    pub fn on_zoom(&mut self, view: &mut View, factor: f64, pivot: Option<Point>) {
        view.set_zoom(factor, pivot);
        self.bus.publish(Event::ZoomChanged {
            factor: view.painter().config().zoom_factor as f32,
        });
    }

    pub fn on_scale(&mut self, view: &mut View, map: f64, font: f32, image: f32) {
        view.set_scale_factors(map, font, image);
        let config = view.painter().config();
        self.bus.publish(Event::ScaleChanged {
            map: view.painter().mapper().map_scale_factor() as f32,
            font: config.font_scale_factor,
            image: config.image_scale_factor,
        });
    }

    // A C T I O N S

    fn select(&mut self, view: &View, node: NodeId) {
        self.bus.publish(Event::NodeSelected { id: node });
        self.put_status(view, node);
    }

    fn hover(&mut self, view: &View, node: NodeId) {
        let data = &view.model()[node].data;
        let tooltip = match (&data.label, &data.content) {
            (None, None) => None,
            (label, content) => Some(TooltipInfo {
                title: label.clone().unwrap_or_default(),
                description: content.clone().unwrap_or_default(),
            }),
        };
        let has_link = data.link.as_deref().is_some_and(|l| !l.is_empty());
        self.bus.publish(Event::NodeHovered {
            id: node,
            tooltip,
            has_link,
        });
    }

    fn put_status(&self, view: &View, node: NodeId) {
        let data = &view.model()[node].data;
        self.bus.publish(Event::Status {
            kind: StatusKind::Info,
            title: data.label.clone().unwrap_or_default(),
            message: data.content.clone().unwrap_or_default(),
        });
    }

    /// Animate `node` to the center unless an animation is already running.
    pub fn focus(&mut self, view: &mut View, node: NodeId) {
        if view.is_animating() {
            return;
        }
        match view.animate_to_center(node, false) {
            Ok(steps) => {
                self.bus.publish(Event::FocusChanged { id: node });
                if let Some(steps) = steps {
                    self.bus.publish(Event::AnimationStarted { steps });
                }
            }
            Err(e) => warn!("Cannot focus {}: {}", node, e),
        }
    }

    /// Focus by node id string; an empty id means the root.
    pub fn focus_id(&mut self, view: &mut View, id: &str) {
        let node = if id.is_empty() {
            Some(view.model().root())
        } else {
            view.find_node_by_id(id)
        };
        if let Some(node) = node {
            self.focus(view, node);
        }
    }

    /// Unmount a mounted root, or mount a placeholder: the subtree pruned from
    /// it earlier goes back in place, otherwise the host is asked for one.
    pub fn toggle_mount(&mut self, view: &mut View, node: NodeId) {
        let url = match &view.model()[node].mount_point {
            Some(MountPoint::Mounted { .. }) => None,
            Some(MountPoint::Mounting { url, .. }) => Some(url.clone()),
            None => return,
        };
        let Some(url) = url else {
            match view.umount(node) {
                Ok(mounting) => self.bus.publish(Event::Unmounted { mounting }),
                Err(e) => self.put_error(StatusKind::Mount, "unmount", &e.to_string()),
            }
            return;
        };
        if let Some((mounted, edges)) = view.take_pruned(node) {
            debug!("Remounting {} at {}", mounted, node);
            self.complete_mount(view, node, mounted, edges);
        } else {
            debug!("Mount requested at {} for {}", node, url);
            self.bus.publish(Event::MountRequested { id: node, url });
        }
    }

    /// Graft a subtree the host built in answer to a
    /// [`Event::MountRequested`].
    pub fn complete_mount(&mut self, view: &mut View, mounting: NodeId, mounted: NodeId, edges: Vec<Edge>) {
        match view.mount(mounting, mounted, edges) {
            Ok(()) => self.bus.publish(Event::Mounted { mounting, mounted }),
            Err(e) => self.put_error(StatusKind::Mount, "mount", &e.to_string()),
        }
    }

    /// Follow a link: `#id` focuses that node, anything else is handed to the
    /// host.
    pub fn link_to(&mut self, view: &mut View, href: &str, target: Option<String>) {
        if let Some(bookmark) = href.strip_prefix('#') {
            if let Some(node) = view.find_node_by_id(bookmark) {
                self.focus(view, node);
                return;
            }
        }
        self.bus.publish(Event::Status {
            kind: StatusKind::Link,
            title: "link".to_string(),
            message: href.to_string(),
        });
        self.bus.publish(Event::LinkFollow {
            href: href.to_string(),
            target,
        });
    }

    fn put_error(&self, kind: StatusKind, title: &str, message: &str) {
        warn!("{} failed: {}", title, message);
        self.bus.publish(Event::Status {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    // S E A R C H

    /// Run a search command. Returns the node found and focused, if any.
    pub fn search(&mut self, view: &mut View, command: SearchCommand) -> Option<NodeId> {
        match command {
            SearchCommand::Search {
                scope,
                mode,
                target,
                start,
            } => {
                self.reset_search();
                let start = start.unwrap_or_else(|| view.model().root());
                self.bus.publish(Event::SearchStarted {
                    scope: scope.to_string(),
                    mode: mode.to_string(),
                    target: target.clone(),
                });
                let matcher = NoCaseMatcher::new(&target, scope, mode);
                self.traverser = Some(spawn_traverser(view.model(), start, Box::new(matcher)));
                self.next_result(view)
            }
            SearchCommand::Continue => self.next_result(view),
            SearchCommand::Reset => {
                self.reset_search();
                self.bus.publish(Event::SearchReset);
                None
            }
        }
    }

    pub fn is_searching(&self) -> bool {
        self.traverser.is_some()
    }

    fn next_result(&mut self, view: &mut View) -> Option<NodeId> {
        let traverser = self.traverser.as_mut()?;
        match traverser.next_item() {
            Some(Ok(node)) => {
                self.bus.publish(Event::SearchResult { id: node });
                self.focus(view, node);
                self.put_status(view, node);
                Some(node)
            }
            Some(Err(e)) => {
                self.traverser = None;
                self.put_error(StatusKind::Search, "search", &e.to_string());
                None
            }
            None => {
                self.traverser = None;
                self.bus.publish(Event::SearchExhausted);
                None
            }
        }
    }

    fn reset_search(&mut self) {
        if let Some(mut traverser) = self.traverser.take() {
            traverser.terminate();
        }
    }

    // F R A M E

    /// Advance the running animation. Returns whether it is still running.
    pub fn tick(&mut self, view: &mut View, now: Instant) -> bool {
        if !view.is_animating() {
            return false;
        }
        let running = view.tick(now);
        if !running {
            self.bus.publish(Event::AnimationFinished);
        }
        running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PainterConfig;
    use treebolic_core::{LayerOut, Model, NodeData};

    fn setup() -> (Controller, View, NodeId) {
        let mut model = Model::new(NodeData::new("root").with_label("Root"));
        let root = model.root();
        let a = model.add_child(root, NodeData::new("alpha").with_label("Alpha").with_content("first"));
        model.add_child(root, NodeData::new("beta").with_label("Beta").with_link("#alpha"));
        model.add_child(a, NodeData::new("alphabet").with_label("Alphabet"));
        let mut view = View::new(model, LayerOut::new(), PainterConfig::default());
        view.resize(400.0, 400.0);
        (Controller::new(EventBus::new()), view, a)
    }

    #[test]
    fn test_drag_is_clamped() {
        let (mut controller, mut view, _) = setup();
        controller.on_down(&view, Point::new(200.0, 200.0), DragMode::Translate);
        controller.on_dragged(&mut view, Point::new(390.0, 200.0));
        assert!((controller.drag_end.abs() - MAX_SHIFT_SPAN).abs() < 1e-9);
        assert!(view.painter().is_dragging());

        assert!(controller.drag(&mut view));
        assert!(!controller.drag(&mut view));

        controller.on_up(&mut view, Point::new(390.0, 200.0));
        assert!(!view.painter().is_dragging());
        let events = controller.bus().drain();
        assert!(events.contains(&Event::DragStarted));
        assert!(events.contains(&Event::DragEnded));
    }

    #[test]
    fn test_click_selects() {
        let (mut controller, mut view, _) = setup();
        controller.on_down(&view, Point::new(200.0, 200.0), DragMode::Translate);
        controller.on_up(&mut view, Point::new(200.0, 200.0));
        let root = view.model().root();
        let events = controller.bus().drain();
        assert_eq!(events[0], Event::NodeSelected { id: root });
    }

    #[test]
    fn test_hover_fires_once() {
        let (mut controller, mut view, _) = setup();
        let center = Point::new(200.0, 200.0);
        assert!(controller.on_hover(&mut view, center));
        assert!(!controller.on_hover(&mut view, center));
        let events = controller.bus().drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::NodeHovered { has_link: false, .. }));
    }

    #[test]
    fn test_bookmark_link_focuses() {
        let (mut controller, mut view, a) = setup();
        controller.link_to(&mut view, "#alpha", None);
        assert_eq!(view.focus_node(), Some(a));
        assert!(view.is_animating());

        controller.link_to(&mut view, "https://example.org", Some("_blank".into()));
        let events = controller.bus().drain();
        assert!(events.iter().any(|e| matches!(e, Event::LinkFollow { href, .. } if href == "https://example.org")));
    }

    #[test]
    fn test_search_continue_and_exhaust() {
        let (mut controller, mut view, a) = setup();
        let found = controller.search(
            &mut view,
            SearchCommand::Search {
                scope: MatchScope::Label,
                mode: MatchMode::StartsWith,
                target: "ALPHA".into(),
                start: None,
            },
        );
        assert_eq!(found, Some(a));
        let second = controller.search(&mut view, SearchCommand::Continue);
        assert!(second.is_some());
        assert_eq!(controller.search(&mut view, SearchCommand::Continue), None);
        assert!(!controller.is_searching());
        assert!(controller.bus().drain().contains(&Event::SearchExhausted));
    }

    #[test]
    fn test_search_reset_terminates() {
        let (mut controller, mut view, _) = setup();
        controller.search(
            &mut view,
            SearchCommand::Search {
                scope: MatchScope::Id,
                mode: MatchMode::Includes,
                target: "a".into(),
                start: None,
            },
        );
        assert!(controller.is_searching());
        assert_eq!(controller.search(&mut view, SearchCommand::Reset), None);
        assert!(!controller.is_searching());
    }

    #[test]
    fn test_mount_request_for_placeholder() {
        let (mut controller, mut view, _) = setup();
        let root = view.model().root();
        let placeholder = view.model_mut().add_child(root, NodeData::new("remote"));
        view.model_mut()[placeholder].mount_point = Some(MountPoint::mounting("sub.json"));
        controller.toggle_mount(&mut view, placeholder);
        assert_eq!(
            controller.bus().drain(),
            vec![Event::MountRequested {
                id: placeholder,
                url: "sub.json".into()
            }]
        );
    }

    #[test]
    fn test_remount_grafts_pruned_subtree_again() {
        let (mut controller, mut view, _) = setup();
        let root = view.model().root();
        let model = view.model_mut();
        let placeholder = model.add_child(root, NodeData::new("remote"));
        model[placeholder].mount_point = Some(MountPoint::mounting("sub.json"));
        let sub = model.add_node(NodeData::new("sub"));
        model.add_child(sub, NodeData::new("sub1"));
        treebolic_core::prepare(view.model_mut(), &LayerOut::new());

        controller.complete_mount(&mut view, placeholder, sub, Vec::new());
        let nodes = view.model().node_count();
        for _ in 0..5 {
            controller.toggle_mount(&mut view, sub);
            controller.toggle_mount(&mut view, placeholder);
        }
        assert_eq!(view.model().node_count(), nodes);
        assert_eq!(view.model().children(root).last(), Some(&sub));

        let events = controller.bus().drain();
        assert!(!events.iter().any(|e| matches!(e, Event::MountRequested { .. })));
        let remounts = events
            .iter()
            .filter(|e| matches!(e, Event::Mounted { mounted, .. } if *mounted == sub))
            .count();
        assert_eq!(remounts, 1 + 5);
    }
}
