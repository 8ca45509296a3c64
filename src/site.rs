//! Page session: every component of one loaded page, behind one dispatcher.
//!
//! [`Site::start`] initializes each component against the page; components
//! whose markup is missing are skipped, so the same session type serves the
//! front page, the works page, the image page and the contact page. Input
//! arrives through four entry points:
//!
//! | Entry point          | Browser equivalent                         |
//! |----------------------|--------------------------------------------|
//! | [`Site::dispatch`]   | click, input, keydown, submit, pointer     |
//! | [`Site::scroll`]     | scroll / resize                            |
//! | [`Site::intersect`]  | IntersectionObserver callbacks             |
//! | [`Site::advance`]    | timers                                     |

use crate::carousel::Carousel;
use crate::catalog::Catalog;
use crate::clipboard::Clipboard;
use crate::config::SiteConfig;
use crate::contact::{ContactError, ContactForm, Submission};
use crate::dom::{NodeId, Page};
use crate::events::{BindingTable, Event, EventKind};
use crate::floating::{FloatingButtons, Placement, Viewport};
use crate::gallery::{Gallery, GalleryConfig, GalleryContext};
use crate::page_chrome::{self, Accordion, NavToggle, Toast};
use crate::prefs::{PreferenceStore, PrefsError, StatusCycle, StatusPills, ThemeToggle};
use crate::reveal::{LazyImages, Reveal, ScheduledFill, StatusPanel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("preferences: {0}")]
    Prefs(#[from] PrefsError),
    #[error("contact form: {0}")]
    Contact(#[from] ContactError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Nav,
    Faq,
    Copy,
    Theme,
    StatusCycle,
    BackToTop,
    Contact,
}

fn bindings() -> Result<BindingTable<Action>, crate::dom::SelectorError> {
    Ok(BindingTable::new()
        .on(EventKind::Click, ".nav-toggle", Action::Nav)?
        .on(EventKind::Click, ".faq-q", Action::Faq)?
        .on(EventKind::Click, ".js-copy, .js-copy-email", Action::Copy)?
        .on(EventKind::Click, "#themeToggle", Action::Theme)?
        .on(EventKind::Click, ".js-status-cycle", Action::StatusCycle)?
        .on(EventKind::Click, ".back-to-top", Action::BackToTop)?
        .on(EventKind::Submit, "#contactForm", Action::Contact)?)
}

pub struct Site<C: Clipboard> {
    page: Page,
    config: SiteConfig,
    catalog: Catalog,
    prefs: PreferenceStore,
    clipboard: C,
    bindings: BindingTable<Action>,
    now_ms: u64,

    works: Option<Gallery>,
    images: Option<Gallery>,
    nav: Option<NavToggle>,
    accordion: Option<Accordion>,
    floating: FloatingButtons,
    carousel: Option<Carousel>,
    reveal: Option<Reveal>,
    lazy: Option<LazyImages>,
    status_panel: Option<StatusPanel>,
    pending_fills: Vec<ScheduledFill>,
    played_at: u64,
    theme: Option<ThemeToggle>,
    pills: Option<StatusPills>,
    contact: Option<ContactForm>,
    toast: Toast,

    scroll_to_top: bool,
    last_submission: Option<Submission>,
}

impl<C: Clipboard> Site<C> {
    pub fn start(
        mut page: Page,
        config: SiteConfig,
        catalog: Catalog,
        prefs: PreferenceStore,
        clipboard: C,
        reduced_motion: bool,
    ) -> Self {
        let labels = &config.labels;
        let floating = FloatingButtons::init(&mut page, labels);
        let works = Gallery::init(&mut page, GalleryConfig::works());
        let images = Gallery::init(&mut page, GalleryConfig::my_images());
        let nav = NavToggle::init(&page);
        let accordion = Accordion::init(&page);
        let carousel = Carousel::init(&mut page, &config.carousel, labels, 0);
        let reveal = Reveal::init(&mut page);
        let lazy = LazyImages::init(&page);
        let status_panel = StatusPanel::init(&page, &config.reveal, reduced_motion);
        let theme = ThemeToggle::init(&mut page, &prefs, &config.preferences, labels);
        let pills = StatusPills::init(&page);
        if let Some(p) = &pills
            && let Some(entry) = StatusCycle::new(&config.status, &config.preferences).current(&prefs)
        {
            p.apply(&mut page, entry);
        }
        let contact = ContactForm::init(&page);
        let toast = Toast::init(&mut page, &config.toast);
        let bindings = bindings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid site binding");
            BindingTable::new()
        });

        tracing::debug!(
            works = works.is_some(),
            images = images.is_some(),
            carousel = carousel.is_some(),
            contact = contact.is_some(),
            "site session started"
        );

        Self {
            page,
            config,
            catalog,
            prefs,
            clipboard,
            bindings,
            now_ms: 0,
            works,
            images,
            nav,
            accordion,
            floating,
            carousel,
            reveal,
            lazy,
            status_panel,
            pending_fills: Vec::new(),
            played_at: 0,
            theme,
            pills,
            contact,
            toast,
            scroll_to_top: false,
            last_submission: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn works(&self) -> Option<&Gallery> {
        self.works.as_ref()
    }

    pub fn images(&self) -> Option<&Gallery> {
        self.images.as_ref()
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn floating(&self) -> &FloatingButtons {
        &self.floating
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    /// Whether back-to-top was pressed since the last call.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    /// Deliver one UI event. Returns whether anything handled it.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool, SiteError> {
        let mut handled = false;
        let ctx = GalleryContext {
            catalog: &self.catalog,
            labels: &self.config.labels,
        };
        for gallery in [self.works.as_mut(), self.images.as_mut()].into_iter().flatten() {
            handled |= gallery.handle(&mut self.page, ctx, event);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            handled |= carousel.handle(&mut self.page, event, self.now_ms);
        }

        let fired = self.bindings.resolve(&self.page, event);
        for f in fired {
            handled |= self.run(f.action, event)?;
        }
        Ok(handled)
    }

    fn run(&mut self, action: Action, event: &Event) -> Result<bool, SiteError> {
        let labels = &self.config.labels;
        match action {
            Action::Nav => Ok(self.nav.as_ref().map(|n| n.flip(&mut self.page)).is_some()),
            Action::Faq => {
                let (Some(acc), Some(target)) = (&self.accordion, event.target()) else {
                    return Ok(false);
                };
                match acc.question_for(&self.page, target) {
                    Some(q) => {
                        acc.flip(&mut self.page, q);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            Action::Copy => {
                let Some(target) = event.target() else {
                    return Ok(false);
                };
                match page_chrome::copy_from_click(&self.page, target, &mut self.clipboard, labels) {
                    Some(notice) => {
                        self.toast.show(&mut self.page, &notice, self.now_ms);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            Action::Theme => {
                let Some(theme) = &self.theme else {
                    return Ok(false);
                };
                theme.toggle(&mut self.page, &mut self.prefs, &self.config.preferences, labels)?;
                Ok(true)
            }
            Action::StatusCycle => {
                let cycle = StatusCycle::new(&self.config.status, &self.config.preferences);
                let Some(entry) = cycle.advance(&mut self.prefs)? else {
                    return Ok(false);
                };
                if let Some(p) = &self.pills {
                    p.apply(&mut self.page, entry);
                }
                self.toast.show(&mut self.page, &labels.status_updated, self.now_ms);
                Ok(true)
            }
            Action::BackToTop => {
                self.scroll_to_top = true;
                Ok(true)
            }
            Action::Contact => {
                let Some(form) = &self.contact else {
                    return Ok(false);
                };
                let submission = form.submit(&self.page, &self.config.contact, &mut self.clipboard)?;
                self.last_submission = Some(submission);
                Ok(true)
            }
        }
    }

    /// Scroll or resize.
    pub fn scroll(&mut self, viewport: &Viewport) -> Placement {
        self.floating.update(&mut self.page, viewport, &self.config.floating)
    }

    /// Elements that just entered the viewport.
    pub fn intersect(&mut self, visible: &[NodeId]) {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.on_intersect(&mut self.page, visible);
        }
        if let Some(lazy) = self.lazy.as_mut() {
            lazy.on_intersect(&mut self.page, visible);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.on_intersect(&mut self.page, visible);
        }
        if let Some(panel) = self.status_panel.as_mut() {
            let panel_visible = self
                .page
                .by_id("statusPanel")
                .is_some_and(|p| visible.contains(&p));
            let schedule = panel.on_intersect(&mut self.page, panel_visible);
            if !schedule.is_empty() {
                self.pending_fills = schedule;
                self.played_at = self.now_ms;
            }
        }
    }

    /// Let `ms` milliseconds pass.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.tick(&mut self.page, self.now_ms);
        }
        self.toast.tick(&mut self.page, self.now_ms);
        if !self.pending_fills.is_empty() {
            let elapsed = self.now_ms - self.played_at;
            self.pending_fills =
                StatusPanel::apply_due(&mut self.page, std::mem::take(&mut self.pending_fills), elapsed);
        }
    }
}
