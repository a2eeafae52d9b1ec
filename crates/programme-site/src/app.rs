//! App shell for the programme site.
//!
//! Owns the document store, the page surface, the location fragment and the
//! virtual timer queue, and routes UI events to the navigation, accordion
//! and search handlers. Every mount bumps a generation counter; timers that
//! belong to an older mount are ignored when they fire.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use programme_core::config::SiteConfig;
use programme_core::error::LoadError;
use programme_core::store::{DocumentStore, ProgramSource};
use programme_web_adapter::input::Key;
use programme_web_adapter::location::Location;
use programme_web_adapter::surface::{Region, Surface, Transition};
use programme_web_adapter::timer::{Fired, TimerQueue};

use crate::accordion::{AccordionState, PanelChange};
use crate::navigation::{NavOutcome, NavigationState, Navigator, PendingNavigation};
use crate::router::{parse_route, theme_fragment, Route};
use crate::search::{perform_search, render_dropdown, SearchBox};
use crate::views::breadcrumb::{self, Crumb, CrumbAction, HOME_LABEL};
use crate::views::home::{self, DEFAULT_LIST_LABEL};
use crate::views::shell::{self, SearchChrome};
use crate::views::theme::{self as theme_view, CardState};
use crate::views::states;

// ---------------------------------------------------------------------------
// Events and timers
// ---------------------------------------------------------------------------

/// Interactive element an event was delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    NavBrand,
    NavHome,
    /// Breadcrumb item by position.
    Crumb(usize),
    ThemeCard(String),
    RandomProp,
    BackButton,
    PropHeader(String),
    /// Related chip rendered inside the card of `owner_id`.
    RelatedChip {
        owner_id: String,
        theme_id: String,
        prop_id: String,
    },
    SearchInput,
    SearchClear,
    SearchResult {
        theme_id: String,
        prop_id: String,
    },
    /// Anything without a handler of its own.
    Elsewhere,
}

impl Target {
    /// Whether the element sits inside the navbar search control.
    #[must_use]
    pub fn within_search(&self) -> bool {
        matches!(
            self,
            Self::SearchInput | Self::SearchClear | Self::SearchResult { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click(Target),
    Key(Target, Key),
    /// New raw value of the search input.
    Input(String),
    /// The host changed the location fragment (back button, typed URL).
    FragmentChanged(String),
}

/// Payloads of the shell's timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    CommitNavigation(PendingNavigation),
    FadeInComplete { generation: u64 },
    AutoOpen { generation: u64, prop_id: String },
    ClearHighlight { generation: u64, prop_id: String },
    RunSearch { query: String },
}

/// View currently mounted in the root region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mounted {
    /// Loading placeholder or error panel.
    #[default]
    Nothing,
    Home,
    Theme { theme_id: String },
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct App {
    config: SiteConfig,
    store: Option<DocumentStore>,
    surface: Surface,
    location: Location,
    timers: TimerQueue<Timer>,
    navigator: Navigator,
    accordion: AccordionState,
    search: SearchBox,
    mounted: Mounted,
    generation: u64,
    highlighted: Option<String>,
    crumbs: Vec<Crumb>,
    rng: StdRng,
}

impl App {
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic random-proposition picks.
    #[must_use]
    pub fn with_seed(config: SiteConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SiteConfig, rng: StdRng) -> Self {
        let mut surface = Surface::new();
        surface.set_title(DEFAULT_LIST_LABEL);
        surface.set_html(Region::App, states::loading());
        Self {
            config,
            store: None,
            surface,
            location: Location::default(),
            timers: TimerQueue::new(),
            navigator: Navigator::new(),
            accordion: AccordionState::new(),
            search: SearchBox::new(),
            mounted: Mounted::Nothing,
            generation: 0,
            highlighted: None,
            crumbs: Vec::new(),
            rng,
        }
    }

    /// Fragment the page was opened with. Call before [`App::load`].
    pub fn set_initial_fragment(&mut self, fragment: &str) {
        self.location = Location::new(fragment);
    }

    /// Fetch the programme and mount the view for the current fragment. On
    /// failure the root region shows the error panel for the rest of the
    /// session.
    pub fn load(&mut self, source: &dyn ProgramSource) -> Result<(), LoadError> {
        match DocumentStore::load(source) {
            Ok(store) => {
                self.install(store);
                Ok(())
            }
            Err(err) => {
                tracing::error!(source = %source.describe(), error = %err, "failed to load programme");
                self.surface
                    .set_html(Region::App, states::load_error(&self.config.data.path));
                self.mounted = Mounted::Nothing;
                Err(err)
            }
        }
    }

    /// Install an already decoded programme.
    pub fn install(&mut self, store: DocumentStore) {
        let meta = store.meta();
        self.surface.set_title(shell::document_title(meta));
        self.surface
            .set_html(Region::FooterList, shell::footer_list(meta));
        self.surface.set_html(
            Region::FooterCity,
            meta.city.clone().unwrap_or_default(),
        );
        self.surface.set_html(
            Region::FooterElection,
            meta.election.clone().unwrap_or_default(),
        );
        self.store = Some(store);
        self.render();
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> Option<&DocumentStore> {
        self.store.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        self.navigator.state()
    }

    #[must_use]
    pub fn accordion(&self) -> &AccordionState {
        &self.accordion
    }

    #[must_use]
    pub fn search(&self) -> &SearchBox {
        &self.search
    }

    #[must_use]
    pub fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Serialised page: shell plus the current content of every region.
    #[must_use]
    pub fn page_html(&self) -> String {
        let brand = self
            .store
            .as_ref()
            .and_then(|store| store.meta().list.as_deref())
            .filter(|list| !list.is_empty())
            .unwrap_or(DEFAULT_LIST_LABEL);
        shell::render_page(
            &self.surface,
            brand,
            SearchChrome {
                value: self.search.value(),
                clear_active: self.search.is_clear_active(),
                focused: self.search.is_focused(),
            },
        )
    }

    // -- clock --------------------------------------------------------------

    /// Move the clock forward by `ms`, firing every timer that comes due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now_ms().saturating_add(ms);
        while let Some(fired) = self.timers.pop_due(until) {
            self.fire(fired);
        }
        self.timers.advance_to(until);
    }

    /// Fire timers until none are left.
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.timers.next_due_ms() {
            while let Some(fired) = self.timers.pop_due(due) {
                self.fire(fired);
            }
        }
    }

    fn fire(&mut self, fired: Fired<Timer>) {
        match fired.payload {
            Timer::CommitNavigation(pending) => self.commit_navigation(&pending),
            Timer::FadeInComplete { generation } => {
                // A navigation started mid fade-in owns the transition now.
                if generation == self.generation
                    && matches!(self.surface.transition(), Transition::FadeIn { .. })
                {
                    self.surface.set_transition(Transition::Idle);
                }
            }
            Timer::AutoOpen {
                generation,
                prop_id,
            } => {
                if generation == self.generation {
                    self.auto_open(prop_id);
                }
            }
            Timer::ClearHighlight {
                generation,
                prop_id,
            } => {
                if generation == self.generation
                    && self.highlighted.as_deref() == Some(prop_id.as_str())
                {
                    self.highlighted = None;
                    self.draw_mounted();
                }
            }
            Timer::RunSearch { query } => {
                self.search.settle(fired.id);
                self.run_search(&query);
            }
        }
    }

    // -- navigation ---------------------------------------------------------

    /// Start a fade-out transition towards `fragment`, optionally opening
    /// `prop_id` once the theme view is mounted.
    pub fn navigate_to(&mut self, fragment: &str, prop_id: Option<&str>) -> NavOutcome {
        let outcome = self
            .navigator
            .request(self.location.fragment(), fragment, prop_id);
        if let NavOutcome::Started(pending) = &outcome {
            let delay = self.config.timing.nav_fade_out_ms;
            self.surface
                .set_transition(Transition::FadeOut { duration_ms: delay });
            self.timers
                .schedule(delay, Timer::CommitNavigation(pending.clone()));
        }
        outcome
    }

    fn commit_navigation(&mut self, pending: &PendingNavigation) {
        // A changed fragment stands in for the fragment-change notification.
        if pending.same_fragment || self.location.set_fragment(&pending.fragment) {
            self.render();
        }
        self.navigator.release();
    }

    /// Mount the view for the current fragment. No-op before load.
    pub fn render(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let route = parse_route(self.location.fragment());
        tracing::debug!(?route, "render");
        match route {
            Route::Theme { theme_id, prop_id } if store.theme(&theme_id).is_some() => {
                self.mount_theme(theme_id, prop_id);
            }
            _ => self.mount_home(),
        }
    }

    fn begin_mount(&mut self, mounted: Mounted) -> Option<String> {
        self.generation += 1;
        self.accordion.reset();
        self.highlighted = None;
        self.mounted = mounted;
        self.surface.clear_scroll();
        let fade_in = self.config.timing.fade_in_ms;
        self.surface
            .set_transition(Transition::FadeIn { duration_ms: fade_in });
        self.timers.schedule(
            fade_in,
            Timer::FadeInComplete {
                generation: self.generation,
            },
        );
        self.navigator.take_pending_prop()
    }

    fn mount_home(&mut self) {
        self.begin_mount(Mounted::Home);
        self.set_breadcrumb(vec![Crumb::active(HOME_LABEL)]);
        self.draw_mounted();
    }

    fn mount_theme(&mut self, theme_id: String, prop_id: Option<String>) {
        let pending = self.begin_mount(Mounted::Theme {
            theme_id: theme_id.clone(),
        });
        let Some(theme) = self.store.as_ref().and_then(|store| store.theme(&theme_id)) else {
            return;
        };
        let title = theme.title.clone();
        let target = prop_id
            .or(pending)
            .filter(|target| theme.contains(target));

        self.set_breadcrumb(vec![
            Crumb::link(HOME_LABEL, CrumbAction::GoHome),
            Crumb::active(&title),
        ]);
        self.draw_mounted();

        if let Some(prop_id) = target {
            self.timers.schedule(
                self.config.timing.auto_open_delay_ms,
                Timer::AutoOpen {
                    generation: self.generation,
                    prop_id,
                },
            );
        }
    }

    fn auto_open(&mut self, prop_id: String) {
        self.accordion.open(&prop_id);
        self.surface
            .scroll_into_view(theme_view::card_id(&prop_id));
        self.highlighted = Some(prop_id.clone());
        self.draw_mounted();
        self.timers.schedule(
            self.config.timing.highlight_ms,
            Timer::ClearHighlight {
                generation: self.generation,
                prop_id,
            },
        );
    }

    fn set_breadcrumb(&mut self, crumbs: Vec<Crumb>) {
        self.surface
            .set_html(Region::Breadcrumb, breadcrumb::render(&crumbs));
        self.crumbs = crumbs;
    }

    /// Re-serialise the mounted view with the current accordion and
    /// highlight state. Does not start a new mount.
    fn draw_mounted(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let html = match &self.mounted {
            Mounted::Nothing => return,
            Mounted::Home => home::render(store, &self.config.share),
            Mounted::Theme { theme_id } => match store.theme(theme_id) {
                Some(theme) => theme_view::render(
                    store,
                    theme,
                    CardState {
                        accordion: &self.accordion,
                        highlighted: self.highlighted.as_deref(),
                    },
                ),
                None => return,
            },
        };
        self.surface.set_html(Region::App, html);
    }

    fn open_random_prop(&mut self) -> Option<NavOutcome> {
        let store = self.store.as_ref()?;
        let count = store.proposition_count();
        if count == 0 {
            return None;
        }
        let pick = store.propositions().nth(self.rng.gen_range(0..count))?;
        let fragment = theme_fragment(&pick.theme.id);
        let prop_id = pick.proposition.id.clone();
        Some(self.navigate_to(&fragment, Some(&prop_id)))
    }

    // -- events -------------------------------------------------------------

    pub fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Click(target) => {
                if !target.within_search() {
                    self.hide_dropdown();
                    self.search.blur();
                }
                self.activate(target);
            }
            UiEvent::Key(target, key) => self.key(target, key),
            UiEvent::Input(value) => self.search_input(&value),
            UiEvent::FragmentChanged(fragment) => {
                if self.location.set_fragment(&fragment) {
                    self.render();
                }
            }
        }
    }

    fn key(&mut self, target: Target, key: Key) {
        match target {
            Target::SearchInput => {
                if key == Key::Escape {
                    self.hide_dropdown();
                    self.search.blur();
                }
            }
            Target::Crumb(_) | Target::SearchResult { .. } => {
                if key == Key::Enter {
                    self.activate(target);
                }
            }
            Target::Elsewhere => {}
            _ => {
                if key.is_activation() {
                    self.activate(target);
                }
            }
        }
    }

    fn activate(&mut self, target: Target) {
        match target {
            Target::NavBrand | Target::NavHome => {
                self.navigate_to("", None);
            }
            Target::BackButton => {
                if matches!(self.mounted, Mounted::Theme { .. }) {
                    self.navigate_to("", None);
                }
            }
            Target::Crumb(idx) => {
                let action = self
                    .crumbs
                    .get(idx)
                    .filter(|crumb| !crumb.active)
                    .and_then(|crumb| crumb.action);
                if let Some(CrumbAction::GoHome) = action {
                    self.navigate_to("", None);
                }
            }
            Target::ThemeCard(theme_id) => {
                let known = self
                    .store
                    .as_ref()
                    .is_some_and(|store| store.theme(&theme_id).is_some());
                if self.mounted == Mounted::Home && known {
                    self.navigate_to(&theme_fragment(&theme_id), None);
                }
            }
            Target::RandomProp => {
                if self.mounted == Mounted::Home {
                    self.open_random_prop();
                }
            }
            Target::PropHeader(prop_id) => {
                if self.mounted_theme_contains(&prop_id) {
                    if let PanelChange::Opened { newly_wired: true } =
                        self.accordion.toggle(&prop_id)
                    {
                        tracing::debug!(%prop_id, "related links wired");
                    }
                    self.draw_mounted();
                }
            }
            Target::RelatedChip {
                owner_id,
                theme_id,
                prop_id,
            } => {
                if self.mounted_theme_contains(&owner_id) && self.accordion.is_wired(&owner_id) {
                    self.navigate_to(&theme_fragment(&theme_id), Some(&prop_id));
                }
            }
            Target::SearchInput => self.search.focus(),
            Target::SearchClear => {
                if let Some(pending) = self.search.clear() {
                    self.timers.cancel(pending);
                }
                self.hide_dropdown();
                self.search.focus();
            }
            Target::SearchResult { theme_id, prop_id } => {
                if self.surface.is_visible(Region::SearchDropdown) {
                    self.select_result(&theme_id, &prop_id);
                }
            }
            Target::Elsewhere => {}
        }
    }

    fn mounted_theme_contains(&self, prop_id: &str) -> bool {
        let Mounted::Theme { theme_id } = &self.mounted else {
            return false;
        };
        self.store
            .as_ref()
            .and_then(|store| store.theme(theme_id))
            .is_some_and(|theme| theme.contains(prop_id))
    }

    // -- search -------------------------------------------------------------

    fn search_input(&mut self, value: &str) {
        if let Some(superseded) = self.search.input(value) {
            self.timers.cancel(superseded);
        }
        let query = self.search.query().to_owned();
        let id = self.timers.schedule(
            self.config.timing.search_debounce_ms,
            Timer::RunSearch { query },
        );
        self.search.set_pending(id);
    }

    fn run_search(&mut self, query: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if !SearchBox::is_searchable(query, self.config.search.min_query_chars) {
            self.hide_dropdown();
            return;
        }
        let html = render_dropdown(&perform_search(store, query), query);
        self.surface.set_html(Region::SearchDropdown, html);
        self.surface.show(Region::SearchDropdown);
    }

    fn select_result(&mut self, theme_id: &str, prop_id: &str) {
        self.hide_dropdown();
        if let Some(pending) = self.search.clear() {
            self.timers.cancel(pending);
        }
        self.navigate_to(&theme_fragment(theme_id), Some(prop_id));
    }

    fn hide_dropdown(&mut self) {
        self.surface.hide(Region::SearchDropdown);
    }
}
