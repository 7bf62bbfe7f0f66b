use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use treebolic_core::NodeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Link,
    Mount,
    Search,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TooltipInfo {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Pointer
    NodeSelected {
        id: NodeId,
    },
    NodeHovered {
        id: NodeId,
        tooltip: Option<TooltipInfo>,
        /// The node carries a link, hosts show a link cursor.
        has_link: bool,
    },
    HoverCleared,
    DragStarted,
    DragEnded,

    // Navigation
    FocusChanged {
        id: NodeId,
    },
    AnimationStarted {
        steps: usize,
    },
    AnimationFinished,
    ZoomChanged {
        factor: f32,
    },
    ScaleChanged {
        map: f32,
        font: f32,
        image: f32,
    },

    // Mounting
    MountRequested {
        id: NodeId,
        url: String,
    },
    Mounted {
        mounting: NodeId,
        mounted: NodeId,
    },
    Unmounted {
        mounting: NodeId,
    },

    // Links
    LinkFollow {
        href: String,
        target: Option<String>,
    },

    // Search
    SearchStarted {
        scope: String,
        mode: String,
        target: String,
    },
    SearchResult {
        id: NodeId,
    },
    SearchExhausted,
    SearchReset,

    Status {
        kind: StatusKind,
        title: String,
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!("publish {:?}", event);
        let _ = self.tx.send(event);
    }

    /// Drain pending events into a listener, typically once per UI frame.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Pending events, without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Implement this to receive events from the [`EventBus`].
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
