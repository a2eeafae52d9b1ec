//! Per-proposition expand/collapse state for the theme view.
//!
//! Panels are independent: opening one never closes another. The first time
//! a panel opens its related-link chips become active ("wired"); later opens
//! leave them as they are.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelChange {
    Opened { newly_wired: bool },
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccordionState {
    open: BTreeSet<String>,
    wired: BTreeSet<String>,
}

impl AccordionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `prop_id`. Returns `true` if its chips were wired by this call.
    pub fn open(&mut self, prop_id: &str) -> bool {
        self.open.insert(prop_id.to_owned());
        self.wired.insert(prop_id.to_owned())
    }

    pub fn close(&mut self, prop_id: &str) {
        self.open.remove(prop_id);
    }

    pub fn toggle(&mut self, prop_id: &str) -> PanelChange {
        if self.is_open(prop_id) {
            self.close(prop_id);
            PanelChange::Closed
        } else {
            PanelChange::Opened {
                newly_wired: self.open(prop_id),
            }
        }
    }

    #[must_use]
    pub fn is_open(&self, prop_id: &str) -> bool {
        self.open.contains(prop_id)
    }

    /// Related chips of `prop_id` respond to activation.
    #[must_use]
    pub fn is_wired(&self, prop_id: &str) -> bool {
        self.wired.contains(prop_id)
    }

    pub fn open_ids(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }

    /// Drop all state; the panels it described were unmounted.
    pub fn reset(&mut self) {
        self.open.clear();
        self.wired.clear();
    }
}
