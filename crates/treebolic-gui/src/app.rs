use crate::components::{search_bar::SearchBar, status_bar::StatusBar, tooltip::TooltipManager};
use crate::graphics::EguiGraphics;
use crate::images::ImageCache;
use crate::settings::AppSettings;
use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use eframe::egui;
use std::time::{Duration, Instant};
use treebolic_core::synthetic;
use treebolic_events::{Event, EventBus, StatusKind};
use treebolic_view::{Controller, DragMode, Point, SearchCommand, View};

/// Zoom step per scroll notch.
const ZOOM_STEP: f64 = 1.1;
/// Pan step for the arrow keys, as a fraction of the view.
const SHIFT_STEP: f64 = 0.05;

pub struct TreebolicApp {
    view: View,
    controller: Controller,
    events: Receiver<Event>,
    settings: AppSettings,
    images: ImageCache,

    search_bar: SearchBar,
    status_bar: StatusBar,
    tooltip_manager: TooltipManager,

    started: bool,
    hover_since: Option<Instant>,
    link_cursor: bool,
    dragging: bool,
}

impl TreebolicApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let settings = AppSettings::load();
        let model = synthetic::generate(settings.tree.shape());
        tracing::info!("Demo tree with {} nodes", model.node_count());

        let view = View::from_settings(model, &settings.engine).context("Failed to apply settings")?;
        let bus = EventBus::new();
        let events = bus.receiver();

        Ok(Self {
            view,
            controller: Controller::new(bus),
            events,
            images: ImageCache::new(settings.image_dir.clone()),
            settings,
            search_bar: SearchBar::new(),
            status_bar: StatusBar::new(),
            tooltip_manager: TooltipManager::new(),
            started: false,
            hover_since: None,
            link_cursor: false,
            dragging: false,
        })
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Home)) {
            self.controller.reset_view(&mut self.view);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F3)) {
            self.search(SearchCommand::Continue);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.search(SearchCommand::Reset);
        }
        let shifts = [
            (egui::Key::ArrowLeft, -SHIFT_STEP, 0.0),
            (egui::Key::ArrowRight, SHIFT_STEP, 0.0),
            (egui::Key::ArrowUp, 0.0, -SHIFT_STEP),
            (egui::Key::ArrowDown, 0.0, SHIFT_STEP),
        ];
        for (key, dx, dy) in shifts {
            if ctx.input(|i| i.key_pressed(key)) {
                if dx != 0.0 {
                    self.view.set_x_shift(dx, true);
                }
                if dy != 0.0 {
                    self.view.set_y_shift(dy, true);
                }
            }
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::E)) {
            self.view.set_arc_edges(None);
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::H)) {
            self.view.set_focus_on_hover(None);
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Num0)) {
            self.controller.on_zoom(&mut self.view, 1.0, None);
        }
    }

    fn search(&mut self, command: SearchCommand) {
        if matches!(command, SearchCommand::Continue) && !self.controller.is_searching() {
            // F3 without a running search starts one from the bar
            if let Some(command) = self.search_bar.command() {
                self.controller.search(&mut self.view, command);
            }
            return;
        }
        self.controller.search(&mut self.view, command);
    }

    fn tree_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        let size = (rect.width() as f64, rect.height() as f64);
        if self.view.size() != size {
            self.view.resize(size.0, size.1);
        }
        if !self.started {
            self.started = true;
            if let Err(e) = self.view.start(self.settings.animate_on_start) {
                tracing::warn!("Initial focus failed: {}", e);
            }
        }

        let origin = rect.min;
        let to_point = |pos: egui::Pos2| Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);

        // D R A G
        if response.drag_started()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let mode = if ui.input(|i| i.modifiers.shift) {
                DragMode::Rotate
            } else {
                DragMode::Translate
            };
            self.controller.on_down(&self.view, to_point(pos), mode);
        }
        if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.controller.on_dragged(&mut self.view, to_point(pos));
        }
        if response.drag_stopped()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.controller.on_up(&mut self.view, to_point(pos));
        }

        // C L I C K
        if let Some(pos) = response.interact_pointer_pos() {
            let p = to_point(pos);
            let modifiers = ui.input(|i| i.modifiers);
            if response.double_clicked() {
                self.controller.on_focus(&mut self.view, p);
            } else if response.secondary_clicked() {
                self.controller.on_mount(&mut self.view, p);
            } else if response.clicked() {
                if modifiers.command {
                    self.controller.on_link(&mut self.view, p);
                } else {
                    self.controller.on_select(&mut self.view, p);
                }
            }
        }

        // H O V E R
        if let Some(pos) = response.hover_pos() {
            if self.controller.on_hover(&mut self.view, to_point(pos)) && self.view.focus_on_hover() {
                self.hover_since = Some(Instant::now());
            }
            self.tooltip_manager.move_to(pos);
            let long_hover = Duration::from_millis(self.settings.long_hover_ms);
            if let Some(since) = self.hover_since
                && since.elapsed() >= long_hover
            {
                // the first long hover arms the node, the next one focuses it
                let focused = self.controller.on_long_hover(&mut self.view);
                self.hover_since = (!focused).then(Instant::now);
            }

            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                let factor = if scroll > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                // negative factors multiply the current zoom
                self.controller.on_zoom(&mut self.view, -factor, Some(to_point(pos)));
            }
        } else {
            self.hover_since = None;
        }

        // F R A M E
        self.controller.tick(&mut self.view, Instant::now());
        self.controller.drag(&mut self.view);

        let mut g = EguiGraphics::new(&painter, &mut self.images, origin.to_vec2());
        self.view.paint(&mut g);

        if self.dragging {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if self.link_cursor {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }

    fn mount(&mut self, mounting: treebolic_core::NodeId, url: &str) {
        let tree = self.settings.tree;
        let mounted = synthetic::subtree(self.view.model_mut(), url, tree.mount_depth, tree.fanout);
        self.controller
            .complete_mount(&mut self.view, mounting, mounted, Vec::new());
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: Event) {
        match event {
            Event::NodeHovered { tooltip, has_link, .. } => {
                self.link_cursor = has_link;
                match (tooltip, ctx.pointer_hover_pos()) {
                    (Some(info), Some(pos)) if self.settings.show_tooltips => {
                        self.tooltip_manager.show(info, pos);
                    }
                    _ => self.tooltip_manager.hide(),
                }
            }
            Event::HoverCleared => {
                self.link_cursor = false;
                self.tooltip_manager.hide();
            }
            Event::DragStarted => {
                self.dragging = true;
                self.tooltip_manager.hide();
            }
            Event::DragEnded => self.dragging = false,
            Event::MountRequested { id, url } => self.mount(id, &url),
            Event::Mounted { mounted, .. } => {
                let count = self.view.model().subtree(mounted).count();
                self.status_bar
                    .put(StatusKind::Mount, "mounted", &format!("{} nodes", count));
            }
            Event::Unmounted { .. } => self.status_bar.put(StatusKind::Mount, "unmounted", ""),
            Event::LinkFollow { href, target } => {
                tracing::info!("Opening {}", href);
                ctx.open_url(egui::OpenUrl {
                    url: href,
                    new_tab: target.is_some(),
                });
            }
            Event::SearchStarted { target, .. } => {
                self.status_bar
                    .put(StatusKind::Search, "search", &format!("Searching for {}", target));
            }
            Event::SearchExhausted => self.status_bar.put(StatusKind::Search, "search", "No more matches"),
            Event::SearchReset => self.status_bar.put(StatusKind::Search, "search", "Reset"),
            Event::Status { kind, title, message } => self.status_bar.put(kind, &title, &message),
            other => tracing::trace!("Unhandled event {:?}", other),
        }
    }
}

impl eframe::App for TreebolicApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("search_panel").show(ctx, |ui| {
            if let Some(command) = self.search_bar.ui(ui) {
                self.search(command);
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            let zoom = self.view.painter().config().zoom_factor;
            let nodes = self.view.model().node_count();
            if self.status_bar.ui(ui, nodes, zoom, self.view.is_animating()) {
                self.controller.reset_view(&mut self.view);
            }
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.tree_ui(ui));

        let events: Vec<Event> = self.events.try_iter().collect();
        for event in events {
            self.handle_event(ctx, event);
        }
        self.search_bar.active = self.controller.is_searching();

        self.tooltip_manager.ui(ctx);

        if let Some(deadline) = self.view.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        } else if self.view.needs_repaint() || self.hover_since.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
