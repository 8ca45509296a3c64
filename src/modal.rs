//! Modal controller: open/close lifecycle, scroll locking, zoom overlay.
//!
//! ```text
//!            open(target)              close(any trigger)
//!  Closed ───────────────▶ Open(target) ─────────────────▶ Closed
//!                            │   ▲
//!                 open_zoom  │   │ close_zoom / Escape / image click
//!                            ▼   │
//!                        Open + one zoom layer
//! ```
//!
//! Opening marks the modal root `is-open` / `aria-hidden="false"`, locks page
//! scroll with `overflow: hidden` on `<body>` and scrolls every registered
//! scroll region back to the top. Closing undoes all of that and clears the
//! transient content (generated markup, image source, zoom layer) so the next
//! open never flashes stale data. Every close trigger goes through the same
//! path, and closing a closed modal does nothing.

use crate::config::Labels;
use crate::dom::{Element, NodeId, Page, Selector};
use maud::Markup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalTarget {
    /// Works modal: a catalog category key.
    Category(String),
    /// Image modal: an item id.
    Item(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ModalTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Control,
    Backdrop,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomTrigger {
    Control,
    Backdrop,
    Escape,
    Image,
}

/// Elements of one modal instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalParts {
    pub root: NodeId,
    /// Receives the heading text, when the modal has a heading slot.
    pub title: Option<NodeId>,
    /// Receives generated markup.
    pub content: NodeId,
    /// Large image slot of the image modal.
    pub image: Option<NodeId>,
    /// Regions whose scroll offset is reset on open and close.
    pub scrollers: Vec<NodeId>,
}

/// What to put into the modal.
#[derive(Debug, Clone)]
pub struct ModalContent {
    pub title: Option<String>,
    pub body: Markup,
    pub image: Option<(String, String)>,
}

pub const ZOOM_CLASS: &str = "img-zoom";
const OPEN_CLASS: &str = "is-open";

#[derive(Debug, Clone)]
pub struct ModalController {
    parts: ModalParts,
    state: ModalState,
    zoom: Option<NodeId>,
    zoom_selector: Selector,
}

impl ModalController {
    pub fn new(parts: ModalParts) -> Self {
        Self {
            parts,
            state: ModalState::Closed,
            zoom: None,
            zoom_selector: Selector::parse(".img-zoom").expect("static selector"),
        }
    }

    pub fn parts(&self) -> &ModalParts {
        &self.parts
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn has_zoom(&self) -> bool {
        self.zoom.is_some()
    }

    /// Populate the modal and open it. Opening while already open replaces
    /// the content and drops any zoom layer.
    pub fn open(&mut self, page: &mut Page, target: ModalTarget, content: ModalContent) {
        self.remove_zoom_layers(page);

        if let (Some(title), Some(node)) = (&content.title, self.parts.title) {
            page.get_mut(node).text = title.clone();
        }
        self.clear_content(page);
        page.get_mut(self.parts.content).inner_html = Some(content.body.into_string());
        if let (Some((src, alt)), Some(node)) = (&content.image, self.parts.image) {
            let img = page.get_mut(node);
            img.set_attr("src", src);
            img.set_attr("alt", alt);
        }

        let root = page.get_mut(self.parts.root);
        root.add_class(OPEN_CLASS);
        root.set_attr("aria-hidden", "false");
        let body = page.body();
        page.get_mut(body).set_style("overflow", "hidden");
        self.reset_scroll(page);

        tracing::debug!(?target, "modal opened");
        self.state = ModalState::Open(target);
    }

    /// Close the modal. Returns `false` when it was already closed.
    pub fn close(&mut self, page: &mut Page, trigger: CloseTrigger) -> bool {
        if !self.is_open() {
            return false;
        }
        self.remove_zoom_layers(page);

        let root = page.get_mut(self.parts.root);
        root.remove_class(OPEN_CLASS);
        root.set_attr("aria-hidden", "true");
        let body = page.body();
        page.get_mut(body).set_style("overflow", "");

        self.clear_content(page);
        page.get_mut(self.parts.content).inner_html = None;
        if let Some(node) = self.parts.title {
            page.get_mut(node).text.clear();
        }
        if let Some(node) = self.parts.image {
            let img = page.get_mut(node);
            img.remove_attr("src");
            img.set_attr("alt", "");
        }
        self.reset_scroll(page);

        tracing::debug!(?trigger, "modal closed");
        self.state = ModalState::Closed;
        true
    }

    /// Detach live nodes mounted under the content container.
    fn clear_content(&self, page: &mut Page) {
        for child in page.children(self.parts.content).to_vec() {
            page.remove(child);
        }
    }

    fn reset_scroll(&self, page: &mut Page) {
        page.get_mut(self.parts.content).scroll_top = 0;
        for node in &self.parts.scrollers {
            page.get_mut(*node).scroll_top = 0;
        }
    }

    /// Open the single-image zoom layer inside the open modal.
    ///
    /// Any existing layer is removed first. Returns `false` (and does
    /// nothing) when the modal is closed or `src` is empty.
    pub fn open_zoom(&mut self, page: &mut Page, src: &str, alt: &str, labels: &Labels) -> bool {
        if !self.is_open() || src.is_empty() {
            return false;
        }
        self.remove_zoom_layers(page);

        let alt = if alt.is_empty() {
            labels.zoom_default_alt.as_str()
        } else {
            alt
        };
        let wrap = page.append(self.parts.root, Element::new("div").with_class(ZOOM_CLASS));
        page.append(
            wrap,
            Element::new("div")
                .with_class("img-zoom-backdrop")
                .with_attr("role", "button")
                .with_attr("aria-label", &labels.zoom_backdrop),
        );
        let dialog = page.append(
            wrap,
            Element::new("div")
                .with_class("img-zoom-dialog")
                .with_attr("role", "dialog")
                .with_attr("aria-modal", "true"),
        );
        page.append(
            dialog,
            Element::new("button")
                .with_class("img-zoom-close")
                .with_attr("type", "button")
                .with_attr("aria-label", &labels.zoom_close)
                .with_text("×"),
        );
        page.append(
            dialog,
            Element::new("img")
                .with_class("img-zoom-img")
                .with_attr("src", src)
                .with_attr("alt", alt),
        );
        self.zoom = Some(wrap);
        true
    }

    /// Remove the zoom layer. Returns `false` when there was none.
    pub fn close_zoom(&mut self, page: &mut Page, trigger: ZoomTrigger) -> bool {
        if self.zoom.is_none() {
            return false;
        }
        self.remove_zoom_layers(page);
        tracing::debug!(?trigger, "zoom closed");
        true
    }

    /// Number of zoom layers currently attached under the modal root.
    pub fn zoom_layers(&self, page: &Page) -> usize {
        page.query_all_within(self.parts.root, &self.zoom_selector)
            .len()
    }

    fn remove_zoom_layers(&mut self, page: &mut Page) {
        for node in page.query_all_within(self.parts.root, &self.zoom_selector) {
            page.remove(node);
        }
        self.zoom = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    fn setup() -> (Page, ModalController) {
        let mut page = Page::new();
        let body = page.body();
        let root = page.append(
            body,
            Element::new("div")
                .with_id("workModal")
                .with_attr("aria-hidden", "true"),
        );
        let title = page.append(root, Element::new("h2"));
        let content = page.append(root, Element::new("div").with_id("workModalContent"));
        let image = page.append(root, Element::new("img"));
        let modal = ModalController::new(ModalParts {
            root,
            title: Some(title),
            content,
            image: Some(image),
            scrollers: vec![root],
        });
        (page, modal)
    }

    fn content(title: &str) -> ModalContent {
        ModalContent {
            title: Some(title.to_string()),
            body: html! { p { (title) } },
            image: Some(("a.jpg".into(), "A".into())),
        }
    }

    fn target() -> ModalTarget {
        ModalTarget::Category("full".into())
    }

    #[test]
    fn starts_closed() {
        let (_, modal) = setup();
        assert_eq!(modal.state(), &ModalState::Closed);
    }

    #[test]
    fn open_populates_and_locks_scroll() {
        let (mut page, mut modal) = setup();
        modal.open(&mut page, target(), content("Full"));
        let parts = modal.parts().clone();
        assert!(modal.is_open());
        assert!(page.get(parts.root).has_class("is-open"));
        assert_eq!(page.get(parts.root).attr("aria-hidden"), Some("false"));
        assert_eq!(page.get(page.body()).style("overflow"), Some("hidden"));
        assert_eq!(page.get(parts.title.unwrap()).text, "Full");
        assert_eq!(
            page.get(parts.content).inner_html.as_deref(),
            Some("<p>Full</p>")
        );
        assert_eq!(page.get(parts.image.unwrap()).attr("src"), Some("a.jpg"));
    }

    #[test]
    fn close_restores_and_clears() {
        let (mut page, mut modal) = setup();
        modal.open(&mut page, target(), content("Full"));
        assert!(modal.close(&mut page, CloseTrigger::Control));
        let parts = modal.parts().clone();
        assert_eq!(modal.state(), &ModalState::Closed);
        assert!(!page.get(parts.root).has_class("is-open"));
        assert_eq!(page.get(parts.root).attr("aria-hidden"), Some("true"));
        assert_eq!(page.get(page.body()).style("overflow"), None);
        assert_eq!(page.get(parts.content).inner_html, None);
        assert_eq!(page.get(parts.title.unwrap()).text, "");
        assert_eq!(page.get(parts.image.unwrap()).attr("src"), None);
    }

    #[test]
    fn mounted_nodes_cleared_on_close_and_reopen() {
        let (mut page, mut modal) = setup();
        modal.open(&mut page, target(), content("Full"));
        let content_node = modal.parts().content;
        let stale = page.append(content_node, Element::new("figure"));
        modal.open(&mut page, target(), content("Half"));
        assert!(!page.is_attached(stale));
        let again = page.append(content_node, Element::new("figure"));
        modal.close(&mut page, CloseTrigger::Control);
        assert!(!page.is_attached(again));
    }

    #[test]
    fn close_triggers_equivalent_and_idempotent() {
        for trigger in [CloseTrigger::Control, CloseTrigger::Backdrop, CloseTrigger::Escape] {
            let (mut page, mut modal) = setup();
            modal.open(&mut page, target(), content("Full"));
            assert!(modal.close(&mut page, trigger));
            let after_first = page.clone();
            assert!(!modal.close(&mut page, trigger));
            assert_eq!(
                after_first.get(modal.parts().root),
                page.get(modal.parts().root)
            );
        }
    }

    #[test]
    fn reopen_resets_scroll_every_time() {
        let (mut page, mut modal) = setup();
        let parts = modal.parts().clone();
        for _ in 0..3 {
            modal.open(&mut page, target(), content("Full"));
            assert_eq!(page.get(parts.content).scroll_top, 0);
            assert_eq!(page.get(parts.root).scroll_top, 0);
            page.get_mut(parts.content).scroll_top = 480;
            page.get_mut(parts.root).scroll_top = 120;
            modal.close(&mut page, CloseTrigger::Escape);
        }
    }

    #[test]
    fn zoom_requires_open_modal_and_src() {
        let (mut page, mut modal) = setup();
        let labels = Labels::default();
        assert!(!modal.open_zoom(&mut page, "a.jpg", "", &labels));
        modal.open(&mut page, target(), content("Full"));
        assert!(!modal.open_zoom(&mut page, "", "", &labels));
        assert_eq!(modal.zoom_layers(&page), 0);
    }

    #[test]
    fn second_zoom_replaces_first() {
        let (mut page, mut modal) = setup();
        let labels = Labels::default();
        modal.open(&mut page, target(), content("Full"));
        assert!(modal.open_zoom(&mut page, "a.jpg", "A", &labels));
        assert!(modal.open_zoom(&mut page, "b.jpg", "", &labels));
        assert_eq!(modal.zoom_layers(&page), 1);
        let img = page
            .query(&Selector::parse(".img-zoom-img").unwrap())
            .unwrap();
        assert_eq!(page.get(img).attr("src"), Some("b.jpg"));
        assert_eq!(page.get(img).attr("alt"), Some("作品"));
    }

    #[test]
    fn close_zoom_keeps_modal_open() {
        let (mut page, mut modal) = setup();
        let labels = Labels::default();
        modal.open(&mut page, target(), content("Full"));
        modal.open_zoom(&mut page, "a.jpg", "A", &labels);
        assert!(modal.close_zoom(&mut page, ZoomTrigger::Image));
        assert!(!modal.close_zoom(&mut page, ZoomTrigger::Image));
        assert_eq!(modal.zoom_layers(&page), 0);
        assert!(modal.is_open());
    }

    #[test]
    fn closing_modal_drops_zoom() {
        let (mut page, mut modal) = setup();
        let labels = Labels::default();
        modal.open(&mut page, target(), content("Full"));
        modal.open_zoom(&mut page, "a.jpg", "A", &labels);
        modal.close(&mut page, CloseTrigger::Backdrop);
        assert_eq!(modal.zoom_layers(&page), 0);
        assert!(!modal.has_zoom());
    }
}
