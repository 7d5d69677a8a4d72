//! Window events delivered to the world.
//!
//! The windowing layer pushes [`WorldEvent`]s through a
//! `crossbeam_channel` sender obtained from
//! [`World::event_sender`](crate::world::World::event_sender); the world
//! drains them at the start of its next update.

use crossbeam_channel::{Receiver, Sender, unbounded};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// Vertical scroll delta; one event is one zoom tick.
    Scroll { dy: f64 },
    /// New window aspect ratio and aspect-ratio handling mode.
    Resized {
        aspect_ratio: f32,
        aspect_ratio_action: bool,
    },
}

/// Unbounded event queue owned by the world.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<WorldEvent>,
    rx: Receiver<WorldEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<WorldEvent> {
        self.tx.clone()
    }

    /// Takes every event queued so far, oldest first.
    pub fn drain(&self) -> Vec<WorldEvent> {
        self.rx.try_iter().collect()
    }
}
