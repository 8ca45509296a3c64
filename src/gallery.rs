//! Generic gallery component: filter + search + modal over a card grid.
//!
//! The site has two galleries that behave the same way and differ only in
//! markup hooks: the commission "works" grid (modal shows a catalog detail
//! record) and the "my images" grid (modal shows the clicked image). Both are
//! instances of [`Gallery`], parameterized by a [`GalleryConfig`]; the presets
//! [`GalleryConfig::works`] and [`GalleryConfig::my_images`] hold the hooks
//! used by the generated pages.
//!
//! ## Initialization
//!
//! A gallery whose required elements are missing from the page does not
//! initialize: the filter needs the grid (and, when `require_cards` is set, at
//! least one card); the modal needs its root and content container.
//! [`Gallery::init`] returns `None` only when neither part is present, so a
//! page with just the works modal still gets a working modal.
//!
//! ## Card clicks
//!
//! A click opens the modal when it lands inside a trigger element, except
//! when it lands inside a link (unless that link sits inside an explicit
//! modal-trigger element) or inside a form field.

use crate::catalog::{Catalog, Sample};
use crate::config::Labels;
use crate::detail::{self, ImageView};
use crate::dom::{Element, NodeId, Page, Selector};
use crate::events::{BindingTable, Event, EventKind, Key};
use crate::filter::{ALL, Chip, FilterController, Item};
use crate::modal::{CloseTrigger, ModalContent, ModalController, ModalParts, ModalTarget, ZoomTrigger};
use crate::reveal::promote_lazy_image;
use std::collections::HashSet;

/// What the modal displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Catalog detail record looked up by the card's category key.
    Detail,
    /// The clicked card's own image, title, description and tags.
    Image,
}

/// Where a piece of a card's searchable text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Attribute on the card.
    Attr(String),
    /// Text of the first descendant matching the selector.
    Child(String),
    /// Attribute if non-empty, otherwise text of the first matching descendant.
    AttrOrChild { attr: String, child: String },
    /// Texts of every matching descendant, space joined.
    AllChildren(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    pub root_id: String,
    pub title_id: Option<String>,
    pub content_id: String,
    pub image_id: Option<String>,
    /// Scrollable dialog inside the root, reset on open/close.
    pub dialog_selector: Option<String>,
    pub close_selector: String,
    pub backdrop_selector: Option<String>,
    /// Clicks inside these elements open the modal.
    pub trigger_selector: String,
    /// Links inside these elements still open the modal.
    pub link_override: Option<String>,
    /// Clicking one of these inside the modal content opens the zoom layer.
    pub sample_selector: Option<String>,
    /// Template element whose markup is appended to the detail body.
    pub shared_template_id: Option<String>,
    /// Card attributes tried, in order, for the catalog key.
    pub key_attrs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub name: String,
    pub kind: ContentKind,
    pub grid_id: String,
    pub card_selector: String,
    pub chip_selector: String,
    /// Chip attribute holding the category value (missing → "all").
    pub chip_attr: String,
    pub search_id: String,
    pub hidden_class: String,
    pub category_attr: String,
    pub id_attr: String,
    pub text_sources: Vec<TextSource>,
    /// Skip the filter when the grid has no cards.
    pub require_cards: bool,
    pub modal: ModalConfig,
}

impl GalleryConfig {
    pub fn works() -> Self {
        Self {
            name: "works".into(),
            kind: ContentKind::Detail,
            grid_id: "workGrid".into(),
            card_selector: ".gallery-work".into(),
            chip_selector: ".filter-chip[data-work-filter]".into(),
            chip_attr: "data-work-filter".into(),
            search_id: "workSearch".into(),
            hidden_class: "is-hidden".into(),
            category_attr: "data-type".into(),
            id_attr: "data-id".into(),
            text_sources: vec![
                TextSource::Child(".gallery-title".into()),
                TextSource::Child(".gallery-text".into()),
                TextSource::Attr("data-keywords".into()),
                TextSource::AllChildren(".chip".into()),
            ],
            require_cards: true,
            modal: ModalConfig {
                root_id: "workModal".into(),
                title_id: Some("workModalTitle".into()),
                content_id: "workModalContent".into(),
                image_id: None,
                dialog_selector: None,
                close_selector: ".gallery-modal-close".into(),
                backdrop_selector: Some(".gallery-modal-backdrop".into()),
                trigger_selector: ".gallery-work".into(),
                link_override: Some(".js-work-modal".into()),
                sample_selector: Some(".works-modal-sample".into()),
                shared_template_id: Some("worksSharedTemplate".into()),
                key_attrs: vec!["data-type".into(), "data-open".into()],
            },
        }
    }

    pub fn my_images() -> Self {
        Self {
            name: "my-images".into(),
            kind: ContentKind::Image,
            grid_id: "myimagesGrid".into(),
            card_selector: ".myimages-item".into(),
            chip_selector: ".filter-chip[data-img-filter]".into(),
            chip_attr: "data-img-filter".into(),
            search_id: "myimagesSearch".into(),
            hidden_class: "myimages-hidden".into(),
            category_attr: "data-type".into(),
            id_attr: "data-id".into(),
            text_sources: vec![
                TextSource::AttrOrChild {
                    attr: "data-title".into(),
                    child: ".myimages-title".into(),
                },
                TextSource::AttrOrChild {
                    attr: "data-desc".into(),
                    child: ".myimages-desc".into(),
                },
                TextSource::Attr("data-tags".into()),
            ],
            require_cards: false,
            modal: ModalConfig {
                root_id: "myimagesModal".into(),
                title_id: None,
                content_id: "myimagesModalText".into(),
                image_id: Some("myimagesModalImg".into()),
                dialog_selector: Some(".myimages-modal-dialog".into()),
                close_selector: "[data-myimages-close]".into(),
                backdrop_selector: None,
                trigger_selector: ".myimages-thumb-btn".into(),
                link_override: None,
                sample_selector: None,
                shared_template_id: None,
                key_attrs: vec!["data-type".into()],
            },
        }
    }
}

/// Read-only data a gallery needs while handling events.
#[derive(Debug, Clone, Copy)]
pub struct GalleryContext<'a> {
    pub catalog: &'a Catalog,
    pub labels: &'a Labels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SelectChip,
    Search,
    OpenCard,
    CloseModal(CloseTrigger),
    ZoomSample,
    CloseZoom(ZoomTrigger),
    Escape,
}

#[derive(Debug, Clone)]
struct Selectors {
    card: Selector,
    link: Selector,
    form_field: Selector,
    link_override: Option<Selector>,
    img: Selector,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    config: GalleryConfig,
    filter: Option<FilterController>,
    modal: Option<ModalController>,
    search: Option<NodeId>,
    bindings: BindingTable<Action>,
    selectors: Selectors,
}

fn compile(s: &str) -> Option<Selector> {
    match Selector::parse(s) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(selector = s, error = %e, "invalid gallery selector");
            None
        }
    }
}

impl Gallery {
    /// Wire the gallery to `page`. Runs an initial recompute so the page
    /// reflects the default filter state.
    pub fn init(page: &mut Page, config: GalleryConfig) -> Option<Self> {
        let selectors = Selectors {
            card: compile(&config.card_selector)?,
            link: compile("a")?,
            form_field: compile("input, textarea, select, label")?,
            link_override: match &config.modal.link_override {
                Some(s) => Some(compile(s)?),
                None => None,
            },
            img: compile("img")?,
        };

        let filter = Self::init_filter(page, &config, &selectors.card);
        let modal = Self::init_modal(page, &config.modal);
        if filter.is_none() && modal.is_none() {
            tracing::debug!(gallery = %config.name, "gallery not present on page");
            return None;
        }
        let bindings = match Self::bindings(&config) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(gallery = %config.name, error = %e, "invalid gallery binding");
                return None;
            }
        };
        let search = page.by_id(&config.search_id);

        let mut gallery = Self {
            config,
            filter,
            modal,
            search,
            bindings,
            selectors,
        };
        if let Some(filter) = gallery.filter.as_mut() {
            filter.recompute(page);
        }
        tracing::debug!(
            gallery = %gallery.config.name,
            items = gallery.filter.as_ref().map_or(0, |f| f.items().len()),
            modal = gallery.modal.is_some(),
            "gallery initialized"
        );
        Some(gallery)
    }

    fn init_filter(page: &Page, config: &GalleryConfig, card: &Selector) -> Option<FilterController> {
        let grid = page.by_id(&config.grid_id)?;
        let cards = page.query_all_within(grid, card);
        if config.require_cards && cards.is_empty() {
            return None;
        }
        let mut taken: HashSet<String> = cards
            .iter()
            .filter_map(|n| page.get(*n).attr_nonempty(&config.id_attr))
            .map(String::from)
            .collect();
        let items = cards
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let el = page.get(*node);
                let id = match el.attr_nonempty(&config.id_attr) {
                    Some(id) => id.to_string(),
                    None => fallback_id(&mut taken, i + 1),
                };
                let category = el.attr(&config.category_attr).unwrap_or_default();
                let text = searchable_text(page, *node, &config.text_sources);
                Item::new(*node, &id, category, &text)
            })
            .collect();
        let chip_sel = compile(&config.chip_selector)?;
        let chips = page
            .query_all(&chip_sel)
            .into_iter()
            .map(|node| Chip {
                node,
                value: page
                    .get(node)
                    .attr_nonempty(&config.chip_attr)
                    .unwrap_or(ALL)
                    .to_string(),
            })
            .collect();
        Some(FilterController::new(items, chips, &config.hidden_class))
    }

    fn init_modal(page: &Page, config: &ModalConfig) -> Option<ModalController> {
        let root = page.by_id(&config.root_id)?;
        let content = page.by_id(&config.content_id)?;
        let title = config.title_id.as_deref().and_then(|id| page.by_id(id));
        let image = config.image_id.as_deref().and_then(|id| page.by_id(id));
        let mut scrollers = vec![root];
        if let Some(sel) = config.dialog_selector.as_deref().and_then(compile) {
            scrollers.extend(page.query_within(root, &sel));
        }
        Some(ModalController::new(ModalParts {
            root,
            title,
            content,
            image,
            scrollers,
        }))
    }

    fn bindings(config: &GalleryConfig) -> Result<BindingTable<Action>, crate::dom::SelectorError> {
        let m = &config.modal;
        let mut table = BindingTable::new()
            .on(EventKind::Click, ".img-zoom-close", Action::CloseZoom(ZoomTrigger::Control))?
            .on(EventKind::Click, ".img-zoom-backdrop", Action::CloseZoom(ZoomTrigger::Backdrop))?
            .on(EventKind::Click, ".img-zoom-img", Action::CloseZoom(ZoomTrigger::Image))?;
        if let Some(sample) = &m.sample_selector {
            table = table.on(EventKind::Click, sample, Action::ZoomSample)?;
        }
        table = table.on(EventKind::Click, &m.close_selector, Action::CloseModal(CloseTrigger::Control))?;
        if let Some(backdrop) = &m.backdrop_selector {
            table = table.on(EventKind::Click, backdrop, Action::CloseModal(CloseTrigger::Backdrop))?;
        }
        Ok(table
            .on(EventKind::Click, &config.chip_selector, Action::SelectChip)?
            .on(EventKind::Input, &format!("#{}", config.search_id), Action::Search)?
            .on(EventKind::Click, &m.trigger_selector, Action::OpenCard)?
            .on_document(EventKind::KeyDown, Action::Escape))
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn filter(&self) -> Option<&FilterController> {
        self.filter.as_ref()
    }

    pub fn filter_mut(&mut self) -> Option<&mut FilterController> {
        self.filter.as_mut()
    }

    pub fn modal(&self) -> Option<&ModalController> {
        self.modal.as_ref()
    }

    pub fn search_box(&self) -> Option<NodeId> {
        self.search
    }

    /// Dispatch one event. Returns whether any handler ran.
    pub fn handle(&mut self, page: &mut Page, ctx: GalleryContext<'_>, event: &Event) -> bool {
        let fired = self.bindings.resolve(page, event);
        let mut handled = false;
        for f in fired {
            handled |= match (f.action, f.matched) {
                (Action::SelectChip, Some(chip)) => self.on_chip(page, chip),
                (Action::Search, _) => match event {
                    Event::Input { value, .. } => self.on_search(page, value),
                    _ => false,
                },
                (Action::OpenCard, Some(trigger)) => match event.target() {
                    Some(target) => self.on_card_click(page, ctx, trigger, target),
                    None => false,
                },
                (Action::CloseModal(trigger), _) => self.close(page, trigger),
                (Action::ZoomSample, Some(sample)) => self.on_sample(page, ctx, sample),
                (Action::CloseZoom(trigger), _) => self.close_zoom(page, trigger),
                (Action::Escape, _) => match event {
                    Event::KeyDown { key: Key::Escape } => {
                        let zoom = self.close_zoom(page, ZoomTrigger::Escape);
                        self.close(page, CloseTrigger::Escape) || zoom
                    }
                    _ => false,
                },
                _ => false,
            };
        }
        handled
    }

    fn on_chip(&mut self, page: &mut Page, chip: NodeId) -> bool {
        match self.filter.as_mut() {
            Some(filter) => {
                filter.select_chip(page, chip);
                true
            }
            None => false,
        }
    }

    fn on_search(&mut self, page: &mut Page, value: &str) -> bool {
        match self.filter.as_mut() {
            Some(filter) => {
                filter.set_query(page, value);
                true
            }
            None => false,
        }
    }

    fn on_card_click(
        &mut self,
        page: &mut Page,
        ctx: GalleryContext<'_>,
        trigger: NodeId,
        target: NodeId,
    ) -> bool {
        if page.closest(target, &self.selectors.link).is_some() {
            let overridden = self
                .selectors
                .link_override
                .as_ref()
                .is_some_and(|sel| page.closest(target, sel).is_some());
            if !overridden {
                return false;
            }
        }
        if page.closest(target, &self.selectors.form_field).is_some() {
            return false;
        }
        let Some(card) = page.closest(trigger, &self.selectors.card) else {
            return false;
        };
        match self.config.kind {
            ContentKind::Detail => self.open_detail(page, ctx, card),
            ContentKind::Image => self.open_image(page, card),
        }
    }

    /// Open the detail modal for `card`'s category key.
    pub fn open_detail(&mut self, page: &mut Page, ctx: GalleryContext<'_>, card: NodeId) -> bool {
        let key = self
            .config
            .modal
            .key_attrs
            .iter()
            .find_map(|a| page.get(card).attr_nonempty(a))
            .unwrap_or_default()
            .to_string();
        self.open_key(page, ctx, &key)
    }

    /// Open the detail modal for a category key; unknown keys show the
    /// fallback body.
    pub fn open_key(&mut self, page: &mut Page, ctx: GalleryContext<'_>, key: &str) -> bool {
        let shared = self
            .config
            .modal
            .shared_template_id
            .as_deref()
            .and_then(|id| page.by_id(id))
            .and_then(|n| page.get(n).inner_html.clone());
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        let (content, samples) = match detail::render(ctx.catalog, key) {
            Ok(view) => (
                ModalContent {
                    title: Some(detail::modal_title(Some(&view), ctx.labels)),
                    body: detail::detail_markup(&view, ctx.labels, shared.as_deref()),
                    image: None,
                },
                view.samples,
            ),
            Err(missing) => {
                tracing::debug!(key = %missing.key, "no detail record, showing fallback");
                let content = ModalContent {
                    title: Some(detail::modal_title(None, ctx.labels)),
                    body: detail::fallback_markup(ctx.labels, shared.as_deref()),
                    image: None,
                };
                (content, &[][..])
            }
        };
        modal.open(page, ModalTarget::Category(key.to_string()), content);
        mount_samples(page, modal.parts().content, samples);
        true
    }

    /// Open the image modal for `card`. Cards without any image source are
    /// ignored.
    pub fn open_image(&mut self, page: &mut Page, card: NodeId) -> bool {
        let Some(img) = page.query_within(card, &self.selectors.img) else {
            return false;
        };
        let card_el = page.get(card);
        let img_el = page.get(img);
        let title = card_el
            .attr_nonempty("data-title")
            .or_else(|| img_el.attr_nonempty("alt"))
            .unwrap_or_default()
            .to_string();
        let desc = card_el.attr("data-desc").unwrap_or_default().to_string();
        let tags = card_el.attr("data-tags").unwrap_or_default().to_string();
        let id = card_el
            .attr_nonempty(&self.config.id_attr)
            .unwrap_or_default()
            .to_string();
        let Some(src) = img_el
            .attr_nonempty("src")
            .or_else(|| img_el.attr_nonempty("data-src"))
            .map(String::from)
        else {
            return false;
        };
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        promote_lazy_image(page, img);

        let view = ImageView::new(&title, &desc, &tags, &src);
        modal.open(
            page,
            ModalTarget::Item(id),
            ModalContent {
                title: None,
                body: detail::image_text_markup(&view),
                image: Some((src, title)),
            },
        );
        true
    }

    fn on_sample(&mut self, page: &mut Page, ctx: GalleryContext<'_>, sample: NodeId) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        if !page.contains(modal.parts().content, sample) {
            return false;
        }
        let Some(img) = page.query_within(sample, &self.selectors.img) else {
            return false;
        };
        let src = page.get(img).attr("src").unwrap_or_default().to_string();
        let alt = page.get(img).attr("alt").unwrap_or_default().to_string();
        modal.open_zoom(page, &src, &alt, ctx.labels)
    }

    pub fn close(&mut self, page: &mut Page, trigger: CloseTrigger) -> bool {
        self.modal
            .as_mut()
            .is_some_and(|m| m.close(page, trigger))
    }

    fn close_zoom(&mut self, page: &mut Page, trigger: ZoomTrigger) -> bool {
        self.modal
            .as_mut()
            .is_some_and(|m| m.close_zoom(page, trigger))
    }
}

/// The body markup is serialized; sample figures are also mounted as live
/// nodes so clicks on them reach the zoom handler.
/// Positional id for a card without one: `#n`, suffixed while it clashes
/// with another card's id.
fn fallback_id(taken: &mut HashSet<String>, position: usize) -> String {
    let mut id = format!("#{position}");
    let mut n = 1;
    while taken.contains(&id) {
        n += 1;
        id = format!("#{position}-{n}");
    }
    taken.insert(id.clone());
    id
}

fn mount_samples(page: &mut Page, content: NodeId, samples: &[Sample]) {
    if samples.is_empty() {
        return;
    }
    let wrap = page.append(content, Element::new("div").with_class("works-modal-samples"));
    for s in samples {
        let figure = page.append(wrap, Element::new("figure").with_class("works-modal-sample"));
        page.append(
            figure,
            Element::new("img").with_attr("src", &s.src).with_attr("alt", &s.alt),
        );
        page.append(figure, Element::new("figcaption").with_text(&s.caption));
    }
}

fn searchable_text(page: &Page, card: NodeId, sources: &[TextSource]) -> String {
    let child_text = |sel: &str| -> String {
        compile(sel)
            .and_then(|s| page.query_within(card, &s))
            .map(|n| page.text_content(n))
            .unwrap_or_default()
    };
    let el = page.get(card);
    sources
        .iter()
        .map(|src| match src {
            TextSource::Attr(name) => el.attr(name).unwrap_or_default().to_string(),
            TextSource::Child(sel) => child_text(sel),
            TextSource::AttrOrChild { attr, child } => el
                .attr_nonempty(attr)
                .map(String::from)
                .unwrap_or_else(|| child_text(child)),
            TextSource::AllChildren(sel) => compile(sel)
                .map(|s| {
                    page.query_all_within(card, &s)
                        .into_iter()
                        .map(|n| page.text_content(n))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
