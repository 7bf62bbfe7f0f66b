//! One displayed tree: model, layout, current transform, painter and the
//! running animation, plus the bookkeeping a host needs to decide when to
//! repaint.
//!
//! The view never draws on its own. Hosts call [`View::tick`] and then
//! [`View::paint`] once per frame while [`View::needs_repaint`] or
//! [`View::is_animating`] say so.

use crate::animation::{ANIMATION_START_DELAY, Animation, AnimationTarget, AnimationTransforms, Animator};
use crate::config::PainterConfig;
use crate::error::{Result, ViewError};
use crate::geom::Point;
use crate::graphics::Graphics;
use crate::painter::Painter;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use treebolic_core::{
    Edge, LayerOut, Model, MountPoint, Node, NodeId, Settings, Transformer, finder, graft, mounted_edges, prune, weigher,
};
use treebolic_hyper::{Complex, HyperRotation, HyperTransform, map_to_euclidean};

/// Where the initial transform parks the root before the first focus
/// animation brings the focus node in.
const INITIAL_ROOT_DISTANCE: f64 = 0.9;

pub struct View {
    model: Model,
    layout: LayerOut,
    transformer: Transformer,
    painter: Painter,
    animator: Option<Animator>,
    focus: Option<NodeId>,
    focus_on_hover: bool,
    // placeholder -> last subtree pruned from it, with the edges it brought
    pruned: HashMap<NodeId, (NodeId, Vec<Edge>)>,

    // startup focus taken from settings
    focus_id: Option<String>,
    move_to: Option<Complex>,

    size: (f64, f64),
    surface_valid: bool,
    dirty: bool,
}

impl View {
    /// Weigh and lay out `model`, then show it untransformed.
    pub fn new(mut model: Model, layout: LayerOut, config: PainterConfig) -> Self {
        treebolic_core::prepare(&mut model, &layout);
        Self {
            model,
            layout,
            transformer: Transformer::new(),
            painter: Painter::new(config),
            animator: None,
            focus: None,
            focus_on_hover: false,
            pruned: HashMap::new(),
            focus_id: None,
            move_to: None,
            size: (0.0, 0.0),
            surface_valid: false,
            dirty: true,
        }
    }

    pub fn from_settings(model: Model, settings: &Settings) -> Result<Self> {
        let mut layout = LayerOut::new();
        layout.apply(settings)?;
        let mut view = Self::new(model, layout, PainterConfig::default());
        view.apply(settings);
        Ok(view)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn layout(&self) -> &LayerOut {
        &self.layout
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut Painter {
        self.invalidate();
        &mut self.painter
    }

    pub fn focus_node(&self) -> Option<NodeId> {
        self.focus
    }

    pub fn focus_on_hover(&self) -> bool {
        self.focus_on_hover
    }

    // S U R F A C E

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.painter.setup(width, height);
            self.invalidate();
        }
    }

    pub fn needs_repaint(&self) -> bool {
        self.dirty
    }

    pub fn repaint(&mut self) {
        self.dirty = true;
    }

    /// Force the painter to set up its surface again on the next frame.
    pub fn invalidate(&mut self) {
        self.surface_valid = false;
        self.dirty = true;
    }

    pub fn is_surface_valid(&self) -> bool {
        self.surface_valid
    }

    pub fn paint(&mut self, g: &mut dyn Graphics) {
        if !self.surface_valid {
            let (width, height) = self.size;
            self.painter.setup(width, height);
            self.surface_valid = true;
            debug!("Painter surface set up at {}x{}", width, height);
        }
        self.painter.paint_background(g);
        self.painter.paint(g, &mut self.model);
        self.dirty = false;
    }

    // S E T T I N G S

    /// Overlay the options set in `settings`. Layout options only take effect
    /// through [`View::from_settings`].
    pub fn apply(&mut self, settings: &Settings) {
        if let Some(flag) = settings.focus_on_hover {
            self.set_focus_on_hover(Some(flag));
        }
        if let Some(flag) = settings.preserve_orientation {
            self.set_preserve_orientation(Some(flag));
        }
        if let Some(x) = settings.x_shift {
            self.set_x_shift(x, false);
        }
        if let Some(y) = settings.y_shift {
            self.set_y_shift(y, false);
        }
        self.painter.config_mut().apply(settings);

        if settings.focus.is_some() {
            self.focus_id = settings.focus.clone();
        }
        let (x, y) = (settings.x_move_to, settings.y_move_to);
        if x.is_some_and(|x| x < 1.0) || y.is_some_and(|y| y < 1.0) {
            let to = Complex::new(x.unwrap_or(0.0), y.unwrap_or(0.0));
            self.move_to = Some(if to.abs2() > 1.0 {
                to.normalize().scale(INITIAL_ROOT_DISTANCE)
            } else {
                to
            });
        }
        self.invalidate();
    }

    /// `None` toggles.
    pub fn set_focus_on_hover(&mut self, flag: Option<bool>) {
        self.focus_on_hover = flag.unwrap_or(!self.focus_on_hover);
    }

    /// `None` toggles.
    pub fn set_preserve_orientation(&mut self, flag: Option<bool>) {
        let flag = flag.unwrap_or(!self.transformer.preserve_orientation());
        self.transformer.set_preserve_orientation(flag);
    }

    /// `None` toggles.
    pub fn set_arc_edges(&mut self, flag: Option<bool>) {
        let config = self.painter.config_mut();
        config.arc_edges = flag.unwrap_or(!config.arc_edges);
        self.invalidate();
    }

    /// `None` toggles.
    pub fn set_ellipsize(&mut self, flag: Option<bool>) {
        let config = self.painter.config_mut();
        config.ellipsize = flag.unwrap_or(!config.ellipsize);
        self.invalidate();
    }

    /// Pan horizontally by a fraction of the width, added to the current pan
    /// when `increment` is set.
    pub fn set_x_shift(&mut self, x: f64, increment: bool) {
        let (current_x, current_y) = self.painter.mapper().shift();
        let x = if increment { current_x + x } else { x };
        self.painter.mapper_mut().set_shift(x, current_y);
        self.repaint();
    }

    pub fn set_y_shift(&mut self, y: f64, increment: bool) {
        let (current_x, current_y) = self.painter.mapper().shift();
        let y = if increment { current_y + y } else { y };
        self.painter.mapper_mut().set_shift(current_x, y);
        self.repaint();
    }

    pub fn set_zoom(&mut self, factor: f64, pivot: Option<Point>) {
        self.painter.set_zoom(factor, pivot);
        self.repaint();
    }

    pub fn set_scale_factors(&mut self, map: f64, font: f32, image: f32) {
        self.painter.set_scale_factors(map, font, image);
        self.repaint();
    }

    // T R A N S F O R M S

    pub fn reset(&mut self) {
        self.animator = None;
        self.apply_null_transform();
        self.painter.mapper_mut().set_shift(0.0, 0.0);
        self.focus = None;
        self.repaint();
    }

    pub fn reset_transform(&mut self) {
        self.transformer.set_transform(HyperTransform::IDENTITY);
    }

    pub fn apply_transform(&mut self, transform: HyperTransform) {
        self.transformer.set_transform(transform);
        let root = self.model.root();
        self.transformer.transform(&mut self.model, root);
    }

    pub fn apply_composed_transform(&mut self, transform: HyperTransform) {
        self.transformer.compose(&transform);
        let root = self.model.root();
        self.transformer.transform(&mut self.model, root);
    }

    pub fn apply_null_transform(&mut self) {
        let root = self.model.root();
        self.transformer.reset(&mut self.model, root);
    }

    /// Park the root off-center, towards the upper left.
    pub fn apply_initial_transform(&mut self) {
        let start = Complex::new(-1.0, -1.0).normalize().scale(INITIAL_ROOT_DISTANCE);
        let transform = self
            .transformer
            .make_transform(start, Complex::ZERO, self.layout.orientation());
        self.apply_transform(transform);
    }

    /// Drag translation: carry the disk point `start` to `end` on top of the
    /// current transform.
    pub fn compose_translate(&mut self, start: Complex, end: Complex) {
        let transform = self.transformer.make_transform(start, end, self.layout.orientation());
        self.apply_composed_transform(transform);
    }

    /// Drag rotation about the disk center by the angle between `start` and
    /// `end`.
    pub fn compose_rotate(&mut self, start: Complex, end: Complex) {
        if start.is_zero() || end.is_zero() {
            return;
        }
        let rotation = HyperRotation((end / start).normalize());
        self.apply_composed_transform(HyperTransform::from_rotation(rotation));
    }

    fn translate(&mut self, start: Complex, end: Complex) {
        let transform = self.transformer.make_transform(start, end, self.layout.orientation());
        self.apply_transform(transform);
    }

    /// Jump (no animation) so that `node`'s laid-out center lands on
    /// `destination`.
    pub fn move_to(&mut self, node: NodeId, destination: Complex) -> Result<()> {
        let center0 = self.node(node)?.location.hyper.center0;
        self.translate(center0, destination);
        self.focus = Some(node);
        self.repaint();
        Ok(())
    }

    pub fn move_to_center(&mut self, node: NodeId) -> Result<()> {
        self.move_to(node, Complex::ZERO)
    }

    // A N I M A T I O N

    /// Start animating `node` to the disk center. Returns the step count, or
    /// `None` if the node is already there.
    pub fn animate_to_center(&mut self, node: NodeId, now: bool) -> Result<Option<usize>> {
        self.animate_to(node, Complex::ZERO, None, now)
    }

    /// Start animating `node` to `destination` in `steps` steps, or in as many
    /// as its distance calls for. Unless `now` is set the animation waits
    /// [`ANIMATION_START_DELAY`] before the first step.
    pub fn animate_to(
        &mut self,
        node: NodeId,
        destination: Complex,
        steps: Option<usize>,
        now: bool,
    ) -> Result<Option<usize>> {
        let from = self.node(node)?.location.hyper.center;
        let delay = if now { Duration::ZERO } else { ANIMATION_START_DELAY };
        let steps = self.animate(from, destination, steps, Instant::now(), delay);
        self.focus = Some(node);
        Ok(steps)
    }

    /// Start animating from disk point `from` to `to`, replacing any running
    /// animation.
    pub fn animate(
        &mut self,
        from: Complex,
        to: Complex,
        steps: Option<usize>,
        clock: Instant,
        delay: Duration,
    ) -> Option<usize> {
        let transforms =
            AnimationTransforms::make(from, to, &self.transformer, self.layout.orientation(), steps)?;
        let animation = Animation::new(transforms);
        let steps = animation.steps();
        self.animator = Some(Animator::new(animation, clock, delay));
        self.repaint();
        Some(steps)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_some()
    }

    /// When the running animation wants its next frame.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.animator.as_ref().map(Animator::next_deadline)
    }

    /// Apply the animation step due at `now`. Returns whether an animation is
    /// still running afterwards.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(mut animator) = self.animator.take() else {
            return false;
        };
        if animator.tick(self, now) {
            self.animator = Some(animator);
            true
        } else {
            debug!("Animation finished after {} steps", animator.animation().steps());
            false
        }
    }

    /// Jump to the end of the running animation.
    pub fn finish_animation(&mut self) {
        if let Some(mut animator) = self.animator.take() {
            animator.finish(self);
        }
    }

    /// Initial placement: park the tree and animate towards the focus node
    /// named in the settings, if any.
    pub fn start(&mut self, animate: bool) -> Result<()> {
        if !animate {
            self.apply_null_transform();
            self.repaint();
            return Ok(());
        }
        self.apply_initial_transform();
        let root = self.model.root();
        let Some(focus) = self
            .focus_id
            .as_deref()
            .and_then(|id| finder::find_node_by_id(&self.model, root, id))
        else {
            self.repaint();
            return Ok(());
        };
        match self.move_to {
            Some(to) => self.animate_to(focus, to, None, false)?,
            None => self.animate_to_center(focus, false)?,
        };
        Ok(())
    }

    // D R A G

    pub fn enter_drag(&mut self) {
        self.painter.set_dragging(true);
        self.invalidate();
    }

    pub fn leave_drag(&mut self) {
        self.painter.set_dragging(false);
        self.invalidate();
    }

    // M O U N T

    /// Graft the detached subtree rooted at `mounted` in place of the
    /// `mounting` placeholder, lay it out inside the placeholder's wedge and
    /// move it under the current transform.
    pub fn mount(&mut self, mounting: NodeId, mounted: NodeId, edges: Vec<Edge>) -> Result<()> {
        let (half_wedge, orientation) = match &self.node(mounting)?.mount_point {
            Some(MountPoint::Mounting {
                half_wedge,
                orientation,
                ..
            }) => (*half_wedge, *orientation),
            _ => return Err(ViewError::NotMountable(mounting)),
        };
        self.node(mounted)?;
        if !graft(&mut self.model, mounting, mounted, edges) {
            return Err(ViewError::GraftRejected { mounting, mounted });
        }
        if let Some((old, _)) = self.pruned.remove(&mounting)
            && old != mounted
        {
            debug!("Dropped pruned subtree {} of {}", old, mounting);
        }

        weigher::weigh(&mut self.model, mounted);
        let (children_weight, min_weight) = {
            let root = &self.model[mounted];
            (root.children_weight, root.min_weight)
        };
        let placeholder = &mut self.model[mounting];
        placeholder.children_weight = children_weight;
        placeholder.min_weight = min_weight;

        let center0 = self.model[mounting].location.hyper.center0;
        self.layout
            .layout_subtree(&mut self.model, mounted, center0, half_wedge, orientation);
        self.transformer.transform(&mut self.model, mounted);
        debug!("Mounted {} at {}", mounted, mounting);
        self.repaint();
        Ok(())
    }

    /// Undo [`View::mount`]; the placeholder takes over the mounted root's
    /// position. Returns the placeholder.
    ///
    /// The pruned subtree stays in the arena and is kept for the placeholder,
    /// see [`View::take_pruned`].
    pub fn umount(&mut self, mounted: NodeId) -> Result<NodeId> {
        self.node(mounted)?;
        let edges = mounted_edges(&self.model, mounted);
        let mounting = prune(&mut self.model, mounted).ok_or(ViewError::PruneRejected(mounted))?;
        self.pruned.insert(mounting, (mounted, edges));
        self.model[mounting].location.hyper = self.model[mounted].location.hyper;
        self.transformer.transform(&mut self.model, mounting);
        debug!("Unmounted {}, restored {}", mounted, mounting);
        self.repaint();
        Ok(mounting)
    }

    /// The subtree last pruned from `mounting` and its edges, ready to be
    /// passed to [`View::mount`] again.
    pub fn take_pruned(&mut self, mounting: NodeId) -> Option<(NodeId, Vec<Edge>)> {
        self.pruned.remove(&mounting)
    }

    // Q U E R I E S

    /// Disk point under a view pixel.
    pub fn to_disk(&self, p: Point) -> Complex {
        self.painter.mapper().to_disk(p)
    }

    /// Node under a view pixel. Refreshes stale Euclidean circles first, so
    /// hits are right even before the next paint.
    pub fn find_node_at(&mut self, p: Point) -> Option<NodeId> {
        let root = self.model.root();
        let ids: Vec<NodeId> = self.model.subtree(root).collect();
        for id in ids {
            let location = &mut self.model[id].location;
            if location.hyper.is_dirty {
                map_to_euclidean(location);
            }
        }
        finder::find_node_at(&self.model, root, self.to_disk(p))
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<NodeId> {
        finder::find_node_by_id(&self.model, self.model.root(), id)
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.model.get(id).ok_or(ViewError::UnknownNode(id))
    }
}

impl AnimationTarget for View {
    fn apply_transform(&mut self, transform: HyperTransform) {
        View::apply_transform(self, transform);
    }

    fn repaint(&mut self) {
        View::repaint(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treebolic_core::NodeData;

    fn view() -> (View, NodeId) {
        let mut model = Model::new(NodeData::new("root").with_label("root"));
        let root = model.root();
        let a = model.add_child(root, NodeData::new("a").with_label("a"));
        model.add_child(root, NodeData::new("b").with_label("b"));
        model.add_child(a, NodeData::new("a1"));
        let mut view = View::new(model, LayerOut::new(), PainterConfig::default());
        view.resize(400.0, 400.0);
        (view, a)
    }

    #[test]
    fn test_move_to_center() {
        let (mut view, a) = view();
        view.move_to_center(a).unwrap();
        assert!(view.model()[a].location.hyper.center.abs() < 1e-9);
        assert_eq!(view.focus_node(), Some(a));
        assert!(view.needs_repaint());
    }

    #[test]
    fn test_unknown_node() {
        let (mut view, _) = view();
        assert!(matches!(view.move_to_center(NodeId(99)), Err(ViewError::UnknownNode(_))));
    }

    #[test]
    fn test_animation_runs_to_completion() {
        let (mut view, a) = view();
        let clock = Instant::now();
        let from = view.model()[a].location.hyper.center;
        let steps = view.animate(from, Complex::ZERO, Some(5), clock, Duration::ZERO);
        assert_eq!(steps, Some(5));
        assert!(view.is_animating());

        assert!(view.tick(clock + Duration::from_millis(100)));
        assert!(!view.tick(clock + Duration::from_secs(5)));
        assert!(!view.is_animating());
        assert!(view.model()[a].location.hyper.center.abs() < 1e-6);
    }

    #[test]
    fn test_no_animation_for_centered_node() {
        let (mut view, _) = view();
        let root = view.model().root();
        assert_eq!(view.animate_to_center(root, true).unwrap(), None);
        assert!(!view.is_animating());
        assert_eq!(view.focus_node(), Some(root));
    }

    #[test]
    fn test_compose_rotate_keeps_center() {
        let (mut view, a) = view();
        let before = view.model()[a].location.hyper.center;
        view.compose_rotate(Complex::EAST, Complex::NORTH);
        let after = view.model()[a].location.hyper.center;
        assert!((before.abs() - after.abs()).abs() < 1e-9);
        assert!((after - before * Complex::NORTH).abs() < 1e-9);
    }

    #[test]
    fn test_drag_invalidates_surface() {
        let (mut view, _) = view();
        view.surface_valid = true;
        view.enter_drag();
        assert!(view.painter().is_dragging());
        assert!(!view.is_surface_valid());
    }

    #[test]
    fn test_mount_and_umount() {
        let (mut view, _) = view();
        let root = view.model().root();
        let model = view.model_mut();
        let placeholder = model.add_child(root, NodeData::new("remote"));
        model[placeholder].mount_point = Some(MountPoint::mounting("remote.json"));
        let mounted = model.add_node(NodeData::new("sub"));
        model.add_child(mounted, NodeData::new("sub1"));
        model.add_child(mounted, NodeData::new("sub2"));
        treebolic_core::prepare(view.model_mut(), &LayerOut::new());

        view.mount(placeholder, mounted, Vec::new()).unwrap();
        assert!(view.model().children(root).contains(&mounted));
        let center = view.model()[mounted].location.hyper.center0;
        assert!((center - view.model()[placeholder].location.hyper.center0).abs() < 1e-9);

        assert_eq!(view.umount(mounted).unwrap(), placeholder);
        assert!(view.model().children(root).contains(&placeholder));
        assert!(matches!(view.umount(mounted), Err(ViewError::PruneRejected(_))));
    }

    #[test]
    fn test_remount_reuses_pruned_subtree() {
        let (mut view, _) = view();
        let root = view.model().root();
        let model = view.model_mut();
        let placeholder = model.add_child(root, NodeData::new("remote"));
        model[placeholder].mount_point = Some(MountPoint::mounting("remote.json"));
        let mounted = model.add_node(NodeData::new("sub"));
        let leaf = model.add_child(mounted, NodeData::new("sub1"));
        let edge = model.new_edge(leaf, root);
        treebolic_core::prepare(view.model_mut(), &LayerOut::new());
        view.mount(placeholder, mounted, vec![edge]).unwrap();
        let nodes = view.model().node_count();

        for _ in 0..20 {
            view.umount(mounted).unwrap();
            assert!(view.model().edges().is_empty());
            let (again, edges) = view.take_pruned(placeholder).unwrap();
            assert_eq!(again, mounted);
            view.mount(placeholder, again, edges).unwrap();
        }
        assert_eq!(view.model().node_count(), nodes);
        assert_eq!(view.model().edges().len(), 1);
        assert!(view.take_pruned(placeholder).is_none());
    }

    #[test]
    fn test_mount_requires_placeholder() {
        let (mut view, a) = view();
        let mounted = view.model_mut().add_node(NodeData::new("sub"));
        assert!(matches!(view.mount(a, mounted, Vec::new()), Err(ViewError::NotMountable(_))));
    }

    #[test]
    fn test_apply_settings_move_to() {
        let (mut view, _) = view();
        let settings = Settings {
            focus: Some("a".into()),
            x_move_to: Some(3.0),
            y_move_to: Some(0.5),
            ..Default::default()
        };
        view.apply(&settings);
        // pulled back inside the disk
        let to = view.move_to.unwrap();
        assert!((to.abs() - INITIAL_ROOT_DISTANCE).abs() < 1e-9);
        assert!(to.re > to.im);
        view.start(true).unwrap();
        assert!(view.is_animating());
    }
}
