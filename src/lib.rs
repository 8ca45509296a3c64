//! # Commission Folio
//!
//! The interaction engine behind an illustration-commission portfolio: a
//! filterable works gallery with per-category detail modals, a personal image
//! gallery with an image modal, and the site glue around them (theme,
//! commission status, contact composer, floating buttons, carousel,
//! scroll-reveal).
//!
//! # Architecture: Page Model + Controllers
//!
//! The browser is replaced by an in-memory element tree ([`dom::Page`]).
//! Controllers are initialized against a page, keep [`dom::NodeId`] handles to
//! the elements they own, and mutate the page only when an event reaches them:
//!
//! ```text
//! generate     catalog  →  works.html / myimages.html  (static markup)
//! generate     catalog  →  dom::Page                   (same structure, in memory)
//! site         Page + events  →  class / text / style changes
//! ```
//!
//! Keeping time and visibility explicit (callers pass `now_ms` and the set of
//! intersecting nodes) makes every behavior deterministic and testable without
//! a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Element arena, selectors, `closest`, tree queries |
//! | [`events`] | UI event model and declarative selector → action binding tables |
//! | [`catalog`] | Works, images, and per-category detail records from TOML |
//! | [`filter`] | Category + free-text visibility over gallery cards |
//! | [`detail`] | Detail lookup and modal content markup |
//! | [`modal`] | Open/close state machine, scroll lock, image zoom layer |
//! | [`gallery`] | Wires filter + modal for one gallery page from a config preset |
//! | [`reveal`] | Lazy images, scroll-reveal, status-bar fill scheduling |
//! | [`carousel`] | Slide carousel with dots, autoplay, swipe |
//! | [`floating`] | Back-to-top and quick-commission button placement |
//! | [`page_chrome`] | Nav toggle, FAQ accordion, copy buttons, toast |
//! | [`clipboard`] | Clipboard seam with in-memory and unavailable backends |
//! | [`contact`] | Contact form → Gmail compose URL + clipboard body |
//! | [`prefs`] | Persisted theme and commission status |
//! | [`site`] | One page session: every component behind one dispatcher |
//! | [`config`] | `config.toml` loading, merging, validation, color CSS |
//! | [`generate`] | Gallery page HTML via Maud, plus the matching page models |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Declarative Bindings Over Ad-Hoc Listeners
//!
//! Every component declares which selector and event kind maps to which
//! action ([`events::BindingTable`]). Resolution walks up from the event
//! target with `closest`, so clicks on a card's image or caption resolve to
//! the card, and dynamically inserted nodes (sample figures, zoom layers) are
//! handled without re-binding.
//!
//! ## Optional Components
//!
//! A page that lacks a component's markup simply skips it. The works gallery
//! without a grid still runs its modal; a page without `#contactForm` has no
//! contact handler. Nothing panics on missing markup.
//!
//! ## Maud For Static Pages
//!
//! The static gallery pages are rendered with [Maud](https://maud.lambda.xyz/),
//! so markup is checked at compile time and interpolation is escaped.

pub mod carousel;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod contact;
pub mod detail;
pub mod dom;
pub mod events;
pub mod filter;
pub mod floating;
pub mod gallery;
pub mod generate;
pub mod modal;
pub mod output;
pub mod page_chrome;
pub mod prefs;
pub mod reveal;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
