// novawm-mechanics/src/registry.rs

use std::collections::{BTreeMap, HashMap};

use crate::data_types::WindowId;
use crate::error::WindowManagerError;
use crate::window::Window;

/// All managed windows, keyed by id.
///
/// Owned by the [`WindowManager`](crate::WindowManager); cross-window links
/// (tile match, transient parent) are ids resolved through here.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, Window>,
    /// Creation order, keyed by `stable_sequence`.
    order: BTreeMap<u64, WindowId>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, window: Window) {
        let (sequence, id) = (window.stable_sequence, window.id);
        if let Some(previous) = self.windows.insert(id, window) {
            self.order.remove(&previous.stable_sequence);
        }
        self.order.insert(sequence, id);
    }

    pub(crate) fn remove(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(&id)?;
        self.order.remove(&window.stable_sequence);
        Some(window)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    /// Like [`Self::get`], failing with `UnknownWindow`.
    pub fn require(&self, id: WindowId) -> Result<&Window, WindowManagerError> {
        self.windows.get(&id).ok_or(WindowManagerError::UnknownWindow(id))
    }

    pub(crate) fn require_mut(&mut self, id: WindowId) -> Result<&mut Window, WindowManagerError> {
        self.windows.get_mut(&id).ok_or(WindowManagerError::UnknownWindow(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    /// Ids in creation order.
    pub fn ids_in_order(&self) -> Vec<WindowId> {
        self.order.values().copied().collect()
    }
}
