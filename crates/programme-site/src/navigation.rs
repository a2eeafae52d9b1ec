//! Navigation controller: the transition mutex and the pending proposition.
//!
//! A navigation is a two-step affair. [`Navigator::request`] either rejects
//! the call or locks the controller and hands back a [`PendingNavigation`]
//! for the caller to commit once the fade-out delay has elapsed;
//! [`Navigator::release`] unlocks it. Calls arriving while locked are
//! dropped, never queued.

/// Transient UI state. Both fields reset once a navigation completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub navigating: bool,
    pub pending_prop_id: Option<String>,
}

/// A navigation accepted by the controller, waiting for its transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub fragment: String,
    /// Target equals the fragment at request time: no fragment-change
    /// notification will fire, so the commit must re-render explicitly.
    pub same_fragment: bool,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Started(PendingNavigation),
    /// Another transition is in flight.
    Busy,
    /// Target is the current fragment and no proposition was requested.
    Unchanged,
}

impl NavOutcome {
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavigationState,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn is_navigating(&self) -> bool {
        self.state.navigating
    }

    pub fn request(
        &mut self,
        current_fragment: &str,
        target_fragment: &str,
        prop_id: Option<&str>,
    ) -> NavOutcome {
        if self.state.navigating {
            tracing::debug!(target_fragment, "navigation rejected: transition in flight");
            return NavOutcome::Busy;
        }
        let same_fragment = current_fragment == target_fragment;
        if same_fragment && prop_id.is_none() {
            return NavOutcome::Unchanged;
        }

        self.state.navigating = true;
        self.state.pending_prop_id = prop_id.map(str::to_owned);
        tracing::debug!(target_fragment, ?prop_id, "navigation started");
        NavOutcome::Started(PendingNavigation {
            fragment: target_fragment.to_owned(),
            same_fragment,
        })
    }

    /// Unlock after the transition delay.
    pub fn release(&mut self) {
        self.state.navigating = false;
    }

    /// Consume the pending proposition; called by every render.
    pub fn take_pending_prop(&mut self) -> Option<String> {
        self.state.pending_prop_id.take()
    }
}
