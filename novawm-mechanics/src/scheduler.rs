// novawm-mechanics/src/scheduler.rs

//! Coalesced per-window recomputation.
//!
//! Mutations mark a window in one or more queues; [`WindowManager::run_queued`]
//! drains them once per event-loop turn, visibility first, then geometry, then
//! icons.

use std::collections::HashSet;
use std::time::Instant;

use bitflags::bitflags;
use tracing::{debug, warn};

use crate::coordinator::MoveResizeFlags;
use crate::data_types::WindowId;
use crate::events::WindowEvent;
use crate::manager::WindowManager;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QueueKinds: u8 {
        const CALC_SHOWING = 1 << 0;
        const MOVE_RESIZE = 1 << 1;
        const UPDATE_ICON = 1 << 2;
    }
}

/// One ordered, de-duplicating queue.
#[derive(Debug, Default)]
struct WorkQueue {
    order: Vec<WindowId>,
    members: HashSet<WindowId>,
}

impl WorkQueue {
    fn push(&mut self, id: WindowId) {
        if self.members.insert(id) {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: WindowId) {
        if self.members.remove(&id) {
            self.order.retain(|queued| *queued != id);
        }
    }

    fn drain(&mut self) -> Vec<WindowId> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }
}

/// The three recompute queues.
#[derive(Debug, Default)]
pub struct RecomputeQueues {
    showing: WorkQueue,
    move_resize: WorkQueue,
    icon: WorkQueue,
}

impl RecomputeQueues {
    pub fn new() -> Self {
        Self::default()
    }

    fn queues_mut(&mut self, kinds: QueueKinds) -> impl Iterator<Item = &mut WorkQueue> {
        [
            (QueueKinds::CALC_SHOWING, &mut self.showing),
            (QueueKinds::MOVE_RESIZE, &mut self.move_resize),
            (QueueKinds::UPDATE_ICON, &mut self.icon),
        ]
        .into_iter()
        .filter(move |(kind, _)| kinds.contains(*kind))
        .map(|(_, queue)| queue)
    }

    /// Marks `id` in every queue of `kinds`; already-queued entries keep their place.
    pub fn queue(&mut self, id: WindowId, kinds: QueueKinds) {
        for queue in self.queues_mut(kinds) {
            queue.push(id);
        }
    }

    pub fn unqueue_all(&mut self, id: WindowId) {
        for queue in self.queues_mut(QueueKinds::all()) {
            queue.remove(id);
        }
    }

    /// Kinds `id` is pending in.
    pub fn queued_kinds(&self, id: WindowId) -> QueueKinds {
        let mut kinds = QueueKinds::empty();
        kinds.set(QueueKinds::CALC_SHOWING, self.showing.members.contains(&id));
        kinds.set(QueueKinds::MOVE_RESIZE, self.move_resize.members.contains(&id));
        kinds.set(QueueKinds::UPDATE_ICON, self.icon.members.contains(&id));
        kinds
    }

    pub fn is_queued(&self, id: WindowId, kind: QueueKinds) -> bool {
        self.queued_kinds(id).contains(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.showing.order.is_empty() && self.move_resize.order.is_empty() && self.icon.order.is_empty()
    }

    /// Takes every id pending in the single queue `kind`, in queueing order.
    pub fn drain_kind(&mut self, kind: QueueKinds) -> Vec<WindowId> {
        if kind == QueueKinds::CALC_SHOWING {
            self.showing.drain()
        } else if kind == QueueKinds::MOVE_RESIZE {
            self.move_resize.drain()
        } else if kind == QueueKinds::UPDATE_ICON {
            self.icon.drain()
        } else {
            Vec::new()
        }
    }
}

impl WindowManager {
    pub fn queue_recompute(&mut self, id: WindowId, kinds: QueueKinds) {
        self.queues.queue(id, kinds);
    }

    /// Drains all queues once.
    pub fn run_queued(&mut self, now: Instant) {
        for id in self.queues.drain_kind(QueueKinds::CALC_SHOWING) {
            let active = self.active_workspace;
            let Some(window) = self.registry.get_mut(id) else {
                continue;
            };
            let showing = window.should_be_showing(active);
            if showing != window.showing {
                window.showing = showing;
                debug!("Window {} is now {}", id, if showing { "shown" } else { "hidden" });
                self.events.push(WindowEvent::VisibilityChanged { window: id, visible: showing });
            }
        }

        let mut deferred = Vec::new();
        for id in self.queues.drain_kind(QueueKinds::MOVE_RESIZE) {
            let Some(window) = self.registry.get(id) else {
                continue;
            };
            if !window.showing {
                deferred.push(id);
                continue;
            }
            let requested = window.unconstrained_rect;
            if let Err(err) = self.move_resize(id, requested, MoveResizeFlags::empty(), now) {
                warn!("Window {}: queued geometry recompute failed: {}", id, err);
            }
        }
        for id in deferred {
            self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        }

        for id in self.queues.drain_kind(QueueKinds::UPDATE_ICON) {
            if self.registry.contains(id) {
                self.events.push(WindowEvent::IconInvalidated { window: id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queueing_twice_is_a_no_op() {
        let mut queues = RecomputeQueues::new();
        let a = WindowId::new_v4();
        let b = WindowId::new_v4();
        queues.queue(a, QueueKinds::MOVE_RESIZE);
        queues.queue(b, QueueKinds::MOVE_RESIZE | QueueKinds::UPDATE_ICON);
        queues.queue(a, QueueKinds::MOVE_RESIZE);
        assert_eq!(queues.queued_kinds(b), QueueKinds::MOVE_RESIZE | QueueKinds::UPDATE_ICON);
        assert_eq!(queues.drain_kind(QueueKinds::MOVE_RESIZE), vec![a, b]);
        assert!(!queues.is_queued(a, QueueKinds::MOVE_RESIZE));
        assert!(queues.is_queued(b, QueueKinds::UPDATE_ICON));
    }

    #[test]
    fn unqueue_all_clears_every_kind() {
        let mut queues = RecomputeQueues::new();
        let a = WindowId::new_v4();
        queues.queue(a, QueueKinds::all());
        queues.unqueue_all(a);
        assert!(queues.is_empty());
        assert_eq!(queues.queued_kinds(a), QueueKinds::empty());
    }

    #[test]
    fn composite_kind_drains_nothing() {
        let mut queues = RecomputeQueues::new();
        queues.queue(WindowId::new_v4(), QueueKinds::all());
        assert!(queues.drain_kind(QueueKinds::all()).is_empty());
        assert!(!queues.is_empty());
    }
}
