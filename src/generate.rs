//! Static gallery page generation.
//!
//! Renders the two gallery pages from the catalog:
//!
//! - **Works page** (`works.html`): category chips, search box, work cards
//!   and the detail modal shell.
//! - **My images page** (`myimages.html`): category chips, search box, image
//!   cards with deferred thumbnails and the image modal shell.
//!
//! Every hook the gallery engine looks for (`#workGrid`, `.gallery-work`,
//! `data-work-filter`, `#workModalContent`, …) is emitted here. The same
//! structure is also built as a [`Page`] model by [`works_page`] and
//! [`my_images_page`], which is what the engine and the CLI run against; the
//! tests check both representations carry the same hooks.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── works.html
//! └── myimages.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Catalog text is escaped; nothing from the catalog is emitted raw.

use crate::catalog::{Catalog, CategoryLabel, ImageRecord, WorkRecord};
use crate::config::{self, Labels, SiteConfig};
use crate::dom::{Element, NodeId, Page};
use crate::filter::ALL;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One written page, for the CLI summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub file: String,
    pub title: String,
    pub cards: usize,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

pub fn generate(
    catalog: &Catalog,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<Vec<GeneratedPage>, GenerateError> {
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    fs::create_dir_all(output_dir)?;

    let works = render_works_page(catalog, &config.labels, &css);
    fs::write(output_dir.join("works.html"), works.into_string())?;
    let images = render_my_images_page(catalog, &config.labels, &css);
    fs::write(output_dir.join("myimages.html"), images.into_string())?;

    tracing::debug!(dir = %output_dir.display(), "gallery pages written");
    Ok(vec![
        GeneratedPage {
            file: "works.html".into(),
            title: "Works".into(),
            cards: catalog.works.len(),
        },
        GeneratedPage {
            file: "myimages.html".into(),
            title: "My Images".into(),
            cards: catalog.images.len(),
        },
    ])
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="zh-Hant" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header(labels: &Labels) -> Markup {
    html! {
        header.site-header {
            button.nav-toggle type="button" aria-label="Menu" { "☰" }
            nav.site-nav {
                a href="index.html" { "Home" }
                a href="works.html" { "Works" }
                a href="myimages.html" { "My Images" }
                a href="contact.html" { "Contact" }
            }
            button id="themeToggle" type="button" { (labels.theme_glyph_light) }
        }
    }
}

fn site_footer() -> Markup {
    html! {
        footer.site-footer {
            p { "© IGU" }
        }
        button.back-to-top type="button" aria-label="Top" { "↑" }
    }
}

/// Which chip attribute a filter bar uses. maud attribute names are literal,
/// so each gallery gets its own arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChipAttr {
    Work,
    Image,
}

impl ChipAttr {
    fn name(self) -> &'static str {
        match self {
            ChipAttr::Work => "data-work-filter",
            ChipAttr::Image => "data-img-filter",
        }
    }
}

fn filter_chip(attr: ChipAttr, value: &str, label: &str, active: bool) -> Markup {
    match attr {
        ChipAttr::Work => html! {
            button.filter-chip.is-active[active] type="button" data-work-filter=(value) { (label) }
        },
        ChipAttr::Image => html! {
            button.filter-chip.is-active[active] type="button" data-img-filter=(value) { (label) }
        },
    }
}

fn filter_bar(chips: &[CategoryLabel], attr: ChipAttr, search_id: &str, labels: &Labels) -> Markup {
    html! {
        div.filter-bar {
            div.filter-chips {
                (filter_chip(attr, ALL, &labels.all_chip, true))
                @for c in chips {
                    (filter_chip(attr, &c.key, &c.label, false))
                }
            }
            input.filter-search id=(search_id) type="search" placeholder=(labels.search_placeholder);
        }
    }
}

fn work_card(work: &WorkRecord, labels: &Labels) -> Markup {
    html! {
        article.gallery-work data-id=(work.id) data-type=(work.category) data-keywords=(work.keywords) {
            img.work-thumb data-src=(work.thumb) alt=(work.title);
            h3.gallery-title { (work.title) }
            p.gallery-text { (work.text) }
            @if !work.chips.is_empty() {
                div.gallery-chips {
                    @for chip in &work.chips {
                        span.chip { (chip) }
                    }
                }
            }
            a.js-work-modal href={ "#" (work.category) } { (labels.modal_title_suffix) }
        }
    }
}

fn image_card(image: &ImageRecord) -> Markup {
    html! {
        figure.myimages-item data-id=(image.id) data-type=(image.category)
            data-title=(image.title) data-desc=(image.desc) data-tags=(image.tags) {
            button.myimages-thumb-btn type="button" {
                img.myimages-thumb data-src=(image.src) alt=(image.title);
            }
            figcaption {
                h3.myimages-title { (image.title) }
                p.myimages-desc { (image.desc) }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

pub fn render_works_page(catalog: &Catalog, labels: &Labels, css: &str) -> Markup {
    let content = html! {
        (site_header(labels))
        main.works-page {
            div.status-pill id="commissionPillWorks" {
                span.status-text {}
                span.status-subtext {}
            }
            (filter_bar(&catalog.categories, ChipAttr::Work, "workSearch", labels))
            div.gallery-grid id="workGrid" {
                @for work in &catalog.works {
                    (work_card(work, labels))
                }
            }
        }
        div.gallery-modal id="workModal" aria-hidden="true" {
            div.gallery-modal-backdrop {}
            div.gallery-modal-dialog role="dialog" aria-modal="true" aria-labelledby="workModalTitle" {
                button.gallery-modal-close type="button" aria-label=(labels.zoom_close) { "×" }
                h2 id="workModalTitle" {}
                div id="workModalContent" {}
            }
        }
        (site_footer())
    };
    base_document("Works", css, content)
}

pub fn render_my_images_page(catalog: &Catalog, labels: &Labels, css: &str) -> Markup {
    let content = html! {
        (site_header(labels))
        main.myimages-page {
            (filter_bar(&catalog.image_categories, ChipAttr::Image, "myimagesSearch", labels))
            div.myimages-grid id="myimagesGrid" {
                @for image in &catalog.images {
                    (image_card(image))
                }
            }
        }
        div.myimages-modal id="myimagesModal" aria-hidden="true" {
            div.myimages-modal-backdrop data-myimages-close="" {}
            div.myimages-modal-dialog role="dialog" aria-modal="true" {
                button.myimages-modal-close type="button" data-myimages-close="" aria-label=(labels.zoom_close) { "×" }
                img id="myimagesModalImg" alt="";
                div id="myimagesModalText" {}
            }
        }
        (site_footer())
    };
    base_document("My Images", css, content)
}

// ============================================================================
// Page models
// ============================================================================

fn header_model(page: &mut Page, labels: &Labels) {
    let body = page.body();
    let header = page.append(body, Element::new("header").with_class("site-header"));
    page.append(header, Element::new("button").with_class("nav-toggle").with_text("☰"));
    let nav = page.append(header, Element::new("nav").with_class("site-nav"));
    for (href, text) in [
        ("index.html", "Home"),
        ("works.html", "Works"),
        ("myimages.html", "My Images"),
        ("contact.html", "Contact"),
    ] {
        page.append(nav, Element::new("a").with_attr("href", href).with_text(text));
    }
    page.append(
        header,
        Element::new("button")
            .with_id("themeToggle")
            .with_text(&labels.theme_glyph_light),
    );
}

fn footer_model(page: &mut Page) {
    let body = page.body();
    page.append(body, Element::new("footer").with_class("site-footer"));
    page.append(body, Element::new("button").with_class("back-to-top").with_text("↑"));
}

fn filter_bar_model(
    page: &mut Page,
    parent: NodeId,
    chips: &[CategoryLabel],
    attr: ChipAttr,
    search_id: &str,
    labels: &Labels,
) {
    let attr = attr.name();
    let bar = page.append(parent, Element::new("div").with_class("filter-bar"));
    let chip_row = page.append(bar, Element::new("div").with_class("filter-chips"));
    page.append(
        chip_row,
        Element::new("button")
            .with_class("filter-chip is-active")
            .with_attr(attr, ALL)
            .with_text(&labels.all_chip),
    );
    for c in chips {
        page.append(
            chip_row,
            Element::new("button")
                .with_class("filter-chip")
                .with_attr(attr, &c.key)
                .with_text(&c.label),
        );
    }
    page.append(
        bar,
        Element::new("input")
            .with_class("filter-search")
            .with_id(search_id)
            .with_attr("type", "search"),
    );
}

/// Page model of `works.html`.
pub fn works_page(catalog: &Catalog, labels: &Labels) -> Page {
    let mut page = Page::new();
    header_model(&mut page, labels);
    let body = page.body();
    let main = page.append(body, Element::new("main").with_class("works-page"));

    let pill = page.append(
        main,
        Element::new("div").with_id("commissionPillWorks").with_class("status-pill"),
    );
    page.append(pill, Element::new("span").with_class("status-text"));
    page.append(pill, Element::new("span").with_class("status-subtext"));

    filter_bar_model(&mut page, main, &catalog.categories, ChipAttr::Work, "workSearch", labels);

    let grid = page.append(main, Element::new("div").with_id("workGrid").with_class("gallery-grid"));
    for work in &catalog.works {
        let card = page.append(
            grid,
            Element::new("article")
                .with_class("gallery-work")
                .with_attr("data-id", &work.id)
                .with_attr("data-type", &work.category)
                .with_attr("data-keywords", &work.keywords),
        );
        page.append(
            card,
            Element::new("img")
                .with_class("work-thumb")
                .with_attr("data-src", &work.thumb)
                .with_attr("alt", &work.title),
        );
        page.append(card, Element::new("h3").with_class("gallery-title").with_text(&work.title));
        page.append(card, Element::new("p").with_class("gallery-text").with_text(&work.text));
        if !work.chips.is_empty() {
            let chips = page.append(card, Element::new("div").with_class("gallery-chips"));
            for chip in &work.chips {
                page.append(chips, Element::new("span").with_class("chip").with_text(chip));
            }
        }
        page.append(
            card,
            Element::new("a")
                .with_class("js-work-modal")
                .with_attr("href", &format!("#{}", work.category))
                .with_text(&labels.modal_title_suffix),
        );
    }

    let modal = page.append(
        body,
        Element::new("div")
            .with_id("workModal")
            .with_class("gallery-modal")
            .with_attr("aria-hidden", "true"),
    );
    page.append(modal, Element::new("div").with_class("gallery-modal-backdrop"));
    let dialog = page.append(
        modal,
        Element::new("div")
            .with_class("gallery-modal-dialog")
            .with_attr("role", "dialog"),
    );
    page.append(dialog, Element::new("button").with_class("gallery-modal-close").with_text("×"));
    page.append(dialog, Element::new("h2").with_id("workModalTitle"));
    page.append(dialog, Element::new("div").with_id("workModalContent"));

    footer_model(&mut page);
    page
}

/// Page model of `myimages.html`.
pub fn my_images_page(catalog: &Catalog, labels: &Labels) -> Page {
    let mut page = Page::new();
    header_model(&mut page, labels);
    let body = page.body();
    let main = page.append(body, Element::new("main").with_class("myimages-page"));

    filter_bar_model(
        &mut page,
        main,
        &catalog.image_categories,
        ChipAttr::Image,
        "myimagesSearch",
        labels,
    );

    let grid = page.append(
        main,
        Element::new("div").with_id("myimagesGrid").with_class("myimages-grid"),
    );
    for image in &catalog.images {
        let card = page.append(
            grid,
            Element::new("figure")
                .with_class("myimages-item")
                .with_attr("data-id", &image.id)
                .with_attr("data-type", &image.category)
                .with_attr("data-title", &image.title)
                .with_attr("data-desc", &image.desc)
                .with_attr("data-tags", &image.tags),
        );
        let button = page.append(card, Element::new("button").with_class("myimages-thumb-btn"));
        page.append(
            button,
            Element::new("img")
                .with_class("myimages-thumb")
                .with_attr("data-src", &image.src)
                .with_attr("alt", &image.title),
        );
        let caption = page.append(card, Element::new("figcaption"));
        page.append(caption, Element::new("h3").with_class("myimages-title").with_text(&image.title));
        page.append(caption, Element::new("p").with_class("myimages-desc").with_text(&image.desc));
    }

    let modal = page.append(
        body,
        Element::new("div")
            .with_id("myimagesModal")
            .with_class("myimages-modal")
            .with_attr("aria-hidden", "true"),
    );
    page.append(
        modal,
        Element::new("div")
            .with_class("myimages-modal-backdrop")
            .with_attr("data-myimages-close", ""),
    );
    let dialog = page.append(modal, Element::new("div").with_class("myimages-modal-dialog"));
    page.append(
        dialog,
        Element::new("button")
            .with_class("myimages-modal-close")
            .with_attr("data-myimages-close", "")
            .with_text("×"),
    );
    page.append(dialog, Element::new("img").with_id("myimagesModalImg").with_attr("alt", ""));
    page.append(dialog, Element::new("div").with_id("myimagesModalText"));

    footer_model(&mut page);
    page
}
