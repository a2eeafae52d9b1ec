//! programme-web-adapter: boundary layer standing in for the browser page.
//!
//! The site crate never touches a real DOM. It renders markup into the named
//! regions of a [`surface::Surface`], reads and writes the location fragment
//! through [`location::Location`], receives canonical [`input`] events, and
//! schedules its timeouts on a virtual-clock [`timer::TimerQueue`] that the
//! host advances.

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "programme-web-adapter"
}

pub mod snapshot;

/// Page regions, transition styles, and scroll state.
pub mod surface {
    use std::collections::{BTreeMap, BTreeSet};

    /// Named regions of the page shell that renderers may replace.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Region {
        App,
        Breadcrumb,
        SearchDropdown,
        FooterList,
        FooterCity,
        FooterElection,
    }

    impl Region {
        pub const ALL: [Region; 6] = [
            Region::App,
            Region::Breadcrumb,
            Region::SearchDropdown,
            Region::FooterList,
            Region::FooterCity,
            Region::FooterElection,
        ];

        /// Element id of the region in the page shell.
        #[must_use]
        pub fn element_id(self) -> &'static str {
            match self {
                Self::App => "app",
                Self::Breadcrumb => "breadcrumb",
                Self::SearchDropdown => "search-dropdown",
                Self::FooterList => "footer-list",
                Self::FooterCity => "footer-city",
                Self::FooterElection => "footer-election",
            }
        }
    }

    /// Opacity/transform transition applied to the root content region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Transition {
        #[default]
        Idle,
        /// Content fades out and lifts before a navigation commits.
        FadeOut { duration_ms: u64 },
        /// Freshly mounted content fades in from slightly below.
        FadeIn { duration_ms: u64 },
    }

    impl Transition {
        /// Inline style for the root region.
        #[must_use]
        pub fn inline_style(self) -> String {
            match self {
                Self::Idle => String::new(),
                Self::FadeOut { duration_ms } => format!(
                    "transition: opacity {d} ease, transform {d} ease; opacity: 0; transform: translateY(-8px)",
                    d = seconds(duration_ms)
                ),
                Self::FadeIn { duration_ms } => format!(
                    "transition: opacity {d} ease, transform {d} ease; opacity: 1; transform: translateY(0)",
                    d = seconds(duration_ms)
                ),
            }
        }

        #[must_use]
        pub fn is_idle(self) -> bool {
            matches!(self, Self::Idle)
        }
    }

    fn seconds(ms: u64) -> String {
        format!("{}.{:02}s", ms / 1000, (ms % 1000) / 10)
    }

    /// Retained page state: document title, region markup, visibility,
    /// root transition, and the element last scrolled into view.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Surface {
        title: String,
        regions: BTreeMap<Region, String>,
        visible: BTreeSet<Region>,
        transition: Transition,
        scroll_target: Option<String>,
    }

    impl Surface {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn title(&self) -> &str {
            &self.title
        }

        pub fn set_title(&mut self, title: impl Into<String>) {
            self.title = title.into();
        }

        /// Replace the whole content of `region`.
        pub fn set_html(&mut self, region: Region, html: impl Into<String>) {
            self.regions.insert(region, html.into());
        }

        #[must_use]
        pub fn html(&self, region: Region) -> &str {
            self.regions.get(&region).map_or("", String::as_str)
        }

        pub fn show(&mut self, region: Region) {
            self.visible.insert(region);
        }

        pub fn hide(&mut self, region: Region) {
            self.visible.remove(&region);
        }

        /// Whether `region` carries the `visible` class (overlay regions only).
        #[must_use]
        pub fn is_visible(&self, region: Region) -> bool {
            self.visible.contains(&region)
        }

        #[must_use]
        pub fn transition(&self) -> Transition {
            self.transition
        }

        pub fn set_transition(&mut self, transition: Transition) {
            self.transition = transition;
        }

        pub fn scroll_into_view(&mut self, element_id: impl Into<String>) {
            self.scroll_target = Some(element_id.into());
        }

        pub fn clear_scroll(&mut self) {
            self.scroll_target = None;
        }

        #[must_use]
        pub fn scroll_target(&self) -> Option<&str> {
            self.scroll_target.as_deref()
        }
    }
}

/// The location fragment: the page's only externally observable navigation
/// state.
pub mod location {
    /// Current fragment without the leading `#`.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Location {
        fragment: String,
    }

    impl Location {
        #[must_use]
        pub fn new(fragment: &str) -> Self {
            Self {
                fragment: strip_hash(fragment).to_owned(),
            }
        }

        #[must_use]
        pub fn fragment(&self) -> &str {
            &self.fragment
        }

        /// `#fragment`, or an empty string for the bare page.
        #[must_use]
        pub fn hash(&self) -> String {
            if self.fragment.is_empty() {
                String::new()
            } else {
                format!("#{}", self.fragment)
            }
        }

        /// Set the fragment. Returns `true` when it changed, i.e. when a
        /// fragment-change notification would fire.
        pub fn set_fragment(&mut self, fragment: &str) -> bool {
            let fragment = strip_hash(fragment);
            if self.fragment == fragment {
                return false;
            }
            fragment.clone_into(&mut self.fragment);
            true
        }
    }

    fn strip_hash(fragment: &str) -> &str {
        fragment.strip_prefix('#').unwrap_or(fragment)
    }
}

/// Stable input abstraction shielding the site crate from host event models.
pub mod input {
    /// Canonical key set delivered to interactive elements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Key {
        Enter,
        Space,
        Escape,
        Tab,
        Char(char),
    }

    impl Key {
        /// Enter or Space: the keys that activate buttons and cards.
        #[must_use]
        pub fn is_activation(self) -> bool {
            matches!(self, Self::Enter | Self::Space)
        }

        /// Parse a DOM-style key name (`"Enter"`, `" "`, `"Escape"`, `"a"`).
        #[must_use]
        pub fn from_dom_name(name: &str) -> Option<Self> {
            match name {
                "Enter" => Some(Self::Enter),
                " " | "Spacebar" => Some(Self::Space),
                "Escape" | "Esc" => Some(Self::Escape),
                "Tab" => Some(Self::Tab),
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(ch), None) => Some(Self::Char(ch)),
                        _ => None,
                    }
                }
            }
        }
    }
}

/// Virtual-clock timeouts.
pub mod timer {
    use std::collections::BTreeMap;

    /// Handle returned by [`TimerQueue::schedule`], usable for cancellation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TimerId(u64);

    /// A timer that came due.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Fired<T> {
        pub id: TimerId,
        pub at_ms: u64,
        pub payload: T,
    }

    /// One-shot timeouts ordered by due time, then by scheduling order.
    ///
    /// Time only moves when the host calls [`TimerQueue::pop_due`] or
    /// [`TimerQueue::advance_to`].
    #[derive(Debug, Clone)]
    pub struct TimerQueue<T> {
        now_ms: u64,
        next_id: u64,
        entries: BTreeMap<(u64, TimerId), T>,
    }

    impl<T> Default for TimerQueue<T> {
        fn default() -> Self {
            Self {
                now_ms: 0,
                next_id: 0,
                entries: BTreeMap::new(),
            }
        }
    }

    impl<T> TimerQueue<T> {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn now_ms(&self) -> u64 {
            self.now_ms
        }

        pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
            let id = TimerId(self.next_id);
            self.next_id += 1;
            self.entries
                .insert((self.now_ms.saturating_add(delay_ms), id), payload);
            id
        }

        /// Cancel a pending timer, returning its payload if it had not fired.
        pub fn cancel(&mut self, id: TimerId) -> Option<T> {
            let key = self.entries.keys().find(|(_, entry)| *entry == id).copied()?;
            self.entries.remove(&key)
        }

        #[must_use]
        pub fn len(&self) -> usize {
            self.entries.len()
        }

        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        /// Due time of the earliest pending timer.
        #[must_use]
        pub fn next_due_ms(&self) -> Option<u64> {
            self.entries.keys().next().map(|(due, _)| *due)
        }

        /// Remove the earliest timer due at or before `until_ms`, moving the
        /// clock to its due time.
        pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<T>> {
            let (&(due, id), _) = self.entries.iter().next()?;
            if due > until_ms {
                return None;
            }
            let payload = self.entries.remove(&(due, id))?;
            self.now_ms = self.now_ms.max(due);
            Some(Fired {
                id,
                at_ms: due,
                payload,
            })
        }

        /// Move the clock forward without firing anything.
        pub fn advance_to(&mut self, ms: u64) {
            self.now_ms = self.now_ms.max(ms);
        }
    }
}
