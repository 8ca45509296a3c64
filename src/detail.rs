//! Detail renderer: category key → view model → markup.
//!
//! [`render`] is a pure lookup. A key with no catalog entry yields
//! [`NotFound`], which callers turn into [`fallback_markup`] rather than an
//! error page. The markup functions never compute anything from prices; the
//! strings are emitted as they appear in the catalog.
//!
//! Section order is fixed: lead, samples, price table, process table (only
//! when rows exist), notes (only when notes exist). The title goes into the
//! modal's title slot, see [`modal_title`].

use crate::catalog::{Catalog, CategoryDetail, PriceRow, ProcessRow, Sample};
use crate::config::Labels;
use maud::{Markup, PreEscaped, html};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no catalog entry for '{key}'")]
pub struct NotFound {
    pub key: String,
}

/// Everything the works modal shows for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView<'a> {
    pub key: &'a str,
    pub title: &'a str,
    pub lead: &'a str,
    pub samples: &'a [Sample],
    pub price_rows: &'a [PriceRow],
    pub process_rows: Option<&'a [ProcessRow]>,
    pub notes: Option<&'a [String]>,
}

impl<'a> From<&'a CategoryDetail> for DetailView<'a> {
    fn from(d: &'a CategoryDetail) -> Self {
        Self {
            key: &d.key,
            title: &d.title,
            lead: &d.lead,
            samples: &d.samples,
            price_rows: &d.price_rows,
            process_rows: (!d.process_rows.is_empty()).then_some(d.process_rows.as_slice()),
            notes: (!d.notes.is_empty()).then_some(d.notes.as_slice()),
        }
    }
}

pub fn render<'a>(catalog: &'a Catalog, key: &str) -> Result<DetailView<'a>, NotFound> {
    catalog
        .detail(key)
        .map(DetailView::from)
        .ok_or_else(|| NotFound {
            key: key.to_string(),
        })
}

/// Modal heading: `"{title}｜{suffix}"`, or just the suffix for the fallback.
pub fn modal_title(view: Option<&DetailView<'_>>, labels: &Labels) -> String {
    match view {
        Some(v) => format!("{}｜{}", v.title, labels.modal_title_suffix),
        None => labels.modal_title_suffix.clone(),
    }
}

fn section_heading(text: &str, tag: &str) -> Markup {
    html! {
        h3.works-modal-h3 { (text) " " small { (tag) } }
    }
}

/// Works modal body for a found category.
///
/// `shared` is trusted page markup (a template element's content) appended
/// after the catalog sections, minus its own `works-modal` wrapper.
pub fn detail_markup(view: &DetailView<'_>, labels: &Labels, shared: Option<&str>) -> Markup {
    html! {
        div.works-modal data-key=(view.key) {
            div.works-modal-head {
                p.works-modal-lead { (view.lead) }
            }

            (section_heading(&labels.samples_heading, &labels.samples_tag))
            div.works-modal-samples {
                @for s in view.samples {
                    figure.works-modal-sample {
                        img src=(s.src) alt=(s.alt);
                        figcaption { (s.caption) }
                    }
                }
            }

            (section_heading(&labels.price_heading, &labels.price_tag))
            div.works-modal-price {
                table.commission-table {
                    thead {
                        tr {
                            @for col in &labels.price_columns {
                                th { (col) }
                            }
                        }
                    }
                    tbody {
                        @if view.price_rows.is_empty() {
                            tr { td colspan="3" { (labels.price_empty) } }
                        }
                        @for row in view.price_rows {
                            tr {
                                td { (row.item) }
                                td { (row.desc) }
                                td { (row.price) }
                            }
                        }
                    }
                }
            }

            @if let Some(rows) = view.process_rows {
                (section_heading(&labels.process_heading, &labels.process_tag))
                div.works-modal-price {
                    table.commission-table.is-flow {
                        thead {
                            tr {
                                @for col in &labels.process_columns {
                                    th { (col) }
                                }
                            }
                        }
                        tbody {
                            @for row in rows {
                                tr {
                                    td { (row.item) }
                                    td { (row.desc) }
                                }
                            }
                        }
                    }
                }
            }

            @if let Some(notes) = view.notes {
                (section_heading(&labels.notes_heading, &labels.notes_tag))
                ul.simple-list.works-modal-notes {
                    @for note in notes {
                        li { (note) }
                    }
                }
            }

            @if let Some(extra) = shared {
                (PreEscaped(unwrap_shared(extra)))
            }
        }
    }
}

const SHARED_WRAPPER_OPEN: &str = "<div class=\"works-modal\">";

/// Inner markup of a shared template that carries its own `works-modal`
/// wrapper, so appending it does not nest a second modal body. Templates
/// without the wrapper pass through untouched.
fn unwrap_shared(shared: &str) -> &str {
    let Some(start) = shared.find(SHARED_WRAPPER_OPEN) else {
        return shared;
    };
    let body = &shared[start + SHARED_WRAPPER_OPEN.len()..];
    match body.rfind("</div>") {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Shown in place of the detail body when the key is unknown.
///
/// A shared template, when the page has one, replaces the whole body as is.
pub fn fallback_markup(labels: &Labels, shared: Option<&str>) -> Markup {
    html! {
        @if let Some(extra) = shared {
            (PreEscaped(extra))
        } @else {
            div.works-modal {
                p.works-modal-lead { (labels.not_found) }
            }
        }
    }
}

/// What the image modal shows for one image card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub title: String,
    pub desc: String,
    pub tags: Vec<String>,
    pub src: String,
}

impl ImageView {
    pub fn new(title: &str, desc: &str, tags: &str, src: &str) -> Self {
        Self {
            title: title.to_string(),
            desc: desc.to_string(),
            tags: tags.split_whitespace().map(String::from).collect(),
            src: src.to_string(),
        }
    }
}

/// Text panel of the image modal: title, description with line breaks kept,
/// and one chip per tag.
pub fn image_text_markup(view: &ImageView) -> Markup {
    html! {
        h3.myimages-modal-title { (view.title) }
        p.myimages-modal-desc {
            @for (i, line) in view.desc.split('\n').enumerate() {
                @if i > 0 { br; }
                (line)
            }
        }
        @if !view.tags.is_empty() {
            div.myimages-modal-tags {
                @for tag in &view.tags {
                    span.chip { (tag) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::scenario_catalog;

    fn labels() -> Labels {
        Labels::default()
    }

    #[test]
    fn render_known_key() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        assert_eq!(view.title, "Full body");
        assert_eq!(view.lead, "Whole character, outfit included.");
        assert_eq!(view.samples.len(), 2);
        assert!(view.process_rows.is_some());
    }

    #[test]
    fn render_unknown_key_is_not_found() {
        let catalog = scenario_catalog();
        assert_eq!(
            render(&catalog, "mural"),
            Err(NotFound {
                key: "mural".into()
            })
        );
    }

    #[test]
    fn optional_sections_absent_when_empty() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "half").unwrap();
        assert!(view.process_rows.is_none());
        assert!(view.notes.is_none());
        let html = detail_markup(&view, &labels(), None).into_string();
        assert!(!html.contains("is-flow"));
        assert!(!html.contains("works-modal-notes"));
    }

    #[test]
    fn sections_in_fixed_order() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        let html = detail_markup(&view, &labels(), None).into_string();
        let lead = html.find("works-modal-lead").unwrap();
        let samples = html.find("works-modal-samples").unwrap();
        let price = html.find("commission-table").unwrap();
        let flow = html.find("is-flow").unwrap();
        let notes = html.find("works-modal-notes").unwrap();
        assert!(lead < samples && samples < price && price < flow && flow < notes);
    }

    #[test]
    fn samples_in_catalog_order() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        let html = detail_markup(&view, &labels(), None).into_string();
        let first = html.find("images/full-1.jpg").unwrap();
        let second = html.find("images/full-2.jpg").unwrap();
        assert!(first < second);
    }

    #[test]
    fn prices_emitted_verbatim() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        let html = detail_markup(&view, &labels(), None).into_string();
        assert!(html.contains("<td>NT$ 1000 ~ 1400</td>"));
        assert!(html.contains("<td>×2</td>"));
    }

    #[test]
    fn empty_price_table_shows_placeholder_row() {
        let catalog = Catalog::from_toml_str("[details.x]\ntitle = \"X\"\n").unwrap();
        let view = render(&catalog, "x").unwrap();
        let html = detail_markup(&view, &labels(), None).into_string();
        assert!(html.contains(r#"<td colspan="3">尚未設定此項目報價</td>"#));
    }

    #[test]
    fn shared_template_wrapper_is_stripped_in_detail() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        let shared = "\n  <div class=\"works-modal\"><div class=\"faq\"><p>FAQ</p></div></div>\n";
        let html = detail_markup(&view, &labels(), Some(shared)).into_string();
        assert_eq!(html.matches("class=\"works-modal\"").count(), 1);
        assert!(html.contains("<div class=\"faq\"><p>FAQ</p></div>"));
    }

    #[test]
    fn unwrap_shared_leaves_unwrapped_templates_alone() {
        assert_eq!(unwrap_shared("<p>FAQ</p>"), "<p>FAQ</p>");
        assert_eq!(
            unwrap_shared("<div class=\"works-modal\"><p>FAQ</p></div>"),
            "<p>FAQ</p>"
        );
    }

    #[test]
    fn fallback_uses_message_or_shared_template() {
        let html = fallback_markup(&labels(), None).into_string();
        assert!(html.contains("找不到此項目資料。"));
        let html = fallback_markup(&labels(), Some("<p class=\"shared\">FAQ</p>")).into_string();
        assert!(html.contains("<p class=\"shared\">FAQ</p>"));
        assert!(!html.contains("找不到此項目資料。"));
        assert!(!html.contains("works-modal"));
    }

    #[test]
    fn modal_title_formats() {
        let catalog = scenario_catalog();
        let view = render(&catalog, "full").unwrap();
        assert_eq!(modal_title(Some(&view), &labels()), "Full body｜查看更多&價目");
        assert_eq!(modal_title(None, &labels()), "查看更多&價目");
    }

    #[test]
    fn catalog_text_is_escaped() {
        let catalog = Catalog::from_toml_str(
            "[details.x]\ntitle = \"X\"\nlead = \"<script>alert(1)</script>\"\n",
        )
        .unwrap();
        let view = render(&catalog, "x").unwrap();
        let html = detail_markup(&view, &labels(), None).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn image_text_keeps_line_breaks_and_tags() {
        let view = ImageView::new("Cat", "line one\nline two", "cat  chibi", "a.jpg");
        assert_eq!(view.tags, vec!["cat", "chibi"]);
        let html = image_text_markup(&view).into_string();
        assert!(html.contains("line one<br>line two"));
        assert!(html.contains(r#"<span class="chip">chibi</span>"#));
    }

    #[test]
    fn image_text_omits_empty_tag_row() {
        let view = ImageView::new("Cat", "", "", "a.jpg");
        let html = image_text_markup(&view).into_string();
        assert!(!html.contains("myimages-modal-tags"));
    }
}
