//! Small site-wide behaviors: nav toggle, FAQ accordion, copy buttons, toast.

use crate::clipboard::Clipboard;
use crate::config::{Labels, ToastConfig};
use crate::dom::{Element, NodeId, Page, Selector};

/// `.nav-toggle` opens and closes `.site-nav` on narrow screens.
#[derive(Debug, Clone)]
pub struct NavToggle {
    toggle: NodeId,
    nav: NodeId,
}

impl NavToggle {
    pub fn init(page: &Page) -> Option<Self> {
        let toggle = page.query(&Selector::parse(".nav-toggle").ok()?)?;
        let nav = page.query(&Selector::parse(".site-nav").ok()?)?;
        Some(Self { toggle, nav })
    }

    pub fn toggle(&self) -> NodeId {
        self.toggle
    }

    /// Returns whether the nav is open afterwards.
    pub fn flip(&self, page: &mut Page) -> bool {
        page.get_mut(self.nav).toggle_class("is-open")
    }
}

/// FAQ accordion: a question toggles itself and the answer right after it.
#[derive(Debug, Clone)]
pub struct Accordion {
    questions: Vec<NodeId>,
}

impl Accordion {
    pub fn init(page: &Page) -> Option<Self> {
        let wrap_sel = Selector::parse("[data-accordion]").ok()?;
        let q_sel = Selector::parse(".faq-q").ok()?;
        let questions: Vec<NodeId> = page
            .query_all(&wrap_sel)
            .into_iter()
            .flat_map(|wrap| page.query_all_within(wrap, &q_sel))
            .collect();
        if questions.is_empty() {
            return None;
        }
        Some(Self { questions })
    }

    pub fn question_for(&self, page: &Page, target: NodeId) -> Option<NodeId> {
        self.questions
            .iter()
            .copied()
            .find(|q| page.contains(*q, target))
    }

    /// Flip a question; its answer follows. Returns the new open state.
    pub fn flip(&self, page: &mut Page, question: NodeId) -> bool {
        let open = page.get_mut(question).toggle_class("is-open");
        if let Some(answer) = page.next_sibling(question) {
            page.get_mut(answer).set_class("is-open", open);
        }
        open
    }
}

/// Copy buttons: `.js-copy[data-copy="#selector"]` copies the trimmed text of
/// the referenced element, `.js-copy-email[data-email]` copies the address.
///
/// Returns the notice to show, or `None` when the click was not on a copy
/// button or the button had nothing to copy.
pub fn copy_from_click(
    page: &Page,
    target: NodeId,
    clipboard: &mut dyn Clipboard,
    labels: &Labels,
) -> Option<String> {
    let copy_sel = Selector::parse(".js-copy").ok()?;
    let email_sel = Selector::parse(".js-copy-email").ok()?;

    let (text, ok_label) = if let Some(btn) = page.closest(target, &copy_sel) {
        let reference = page.get(btn).attr_nonempty("data-copy")?;
        let source = match Selector::parse(reference) {
            Ok(sel) => page.query(&sel)?,
            Err(e) => {
                tracing::warn!(selector = reference, error = %e, "bad copy reference");
                return None;
            }
        };
        (page.text_content(source).trim().to_string(), &labels.copied)
    } else if let Some(btn) = page.closest(target, &email_sel) {
        let email = page.get(btn).attr_nonempty("data-email")?;
        (email.to_string(), &labels.email_copied)
    } else {
        return None;
    };

    match clipboard.write_text(&text) {
        Ok(()) => Some(ok_label.clone()),
        Err(e) => {
            tracing::warn!(error = %e, "copy failed");
            Some(labels.copy_failed.clone())
        }
    }
}

/// Transient notice at the bottom of the page.
#[derive(Debug, Clone)]
pub struct Toast {
    node: NodeId,
    hide_at: Option<u64>,
    duration_ms: u64,
}

impl Toast {
    pub fn init(page: &mut Page, config: &ToastConfig) -> Self {
        let body = page.body();
        let node = page.append(body, Element::new("div").with_class("toast"));
        Self {
            node,
            hide_at: None,
            duration_ms: config.duration_ms,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_showing(&self) -> bool {
        self.hide_at.is_some()
    }

    /// Show `message`; a second message restarts the countdown.
    pub fn show(&mut self, page: &mut Page, message: &str, now_ms: u64) {
        let el = page.get_mut(self.node);
        el.text = message.to_string();
        el.add_class("is-show");
        self.hide_at = Some(now_ms + self.duration_ms);
    }

    pub fn tick(&mut self, page: &mut Page, now_ms: u64) {
        if let Some(at) = self.hide_at
            && now_ms >= at
        {
            page.get_mut(self.node).remove_class("is-show");
            self.hide_at = None;
        }
    }
}
