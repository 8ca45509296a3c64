//! CLI output formatting for every command.
//!
//! Output is **item-centric**: the primary line for a work or image is its
//! positional index plus id and title, with the category tag as secondary
//! context. The same header shape is used by `filter`, `check` and
//! `generate`, so one inventory reads the same wherever it shows up.
//!
//! # Output Format
//!
//! ## Filter
//!
//! ```text
//! works: category=full query=""
//! 001 [1] Mio City
//!     Category: full
//! Showing 1 of 2
//! ```
//!
//! ## Generate
//!
//! ```text
//! Works → works.html (2 cards)
//! My Images → myimages.html (2 cards)
//! Generated 2 pages in dist
//! ```
//!
//! ## Check
//!
//! ```text
//! Categories
//! 001 full  Full body (2 samples, 2 prices)
//! Works (2)
//! Images (2)
//! Status
//!     open: 開放委託中
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::config::{SiteConfig, StatusEntry};
use crate::contact::{ContactNotice, Submission};
use crate::filter::FilterState;
use crate::generate::GeneratedPage;
use crate::prefs::Theme;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Item header: index, bracketed id, then the title (or `(untitled)`).
///
/// ```text
/// 001 [1] Mio City
/// 002 [i9] (untitled)
/// ```
fn item_header(index: usize, id: &str, title: &str) -> String {
    if title.trim().is_empty() {
        format!("{} [{}] (untitled)", format_index(index), id)
    } else {
        format!("{} [{}] {}", format_index(index), id, title)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Filter
// ============================================================================

/// One visible gallery item, as resolved by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedItem<'a> {
    pub id: &'a str,
    pub category: &'a str,
    pub title: &'a str,
}

pub fn format_filter_output(
    gallery: &str,
    state: &FilterState,
    visible: &[ListedItem<'_>],
    total: usize,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: category={} query={:?}",
        gallery, state.active_category, state.query_text
    )];
    for (i, item) in visible.iter().enumerate() {
        lines.push(item_header(i + 1, item.id, item.title));
        lines.push(format!("{}Category: {}", indent(1), item.category));
    }
    lines.push(format!("Showing {} of {}", visible.len(), total));
    lines
}

pub fn print_filter_output(
    gallery: &str,
    state: &FilterState,
    visible: &[ListedItem<'_>],
    total: usize,
) {
    print_lines(format_filter_output(gallery, state, visible, total));
}

// ============================================================================
// Show
// ============================================================================

/// Modal title line followed by the rendered content markup.
pub fn format_show_output(title: &str, markup: &str) -> Vec<String> {
    let mut lines = vec![title.to_string(), String::new()];
    lines.extend(markup.lines().map(String::from));
    lines
}

pub fn print_show_output(title: &str, markup: &str) {
    print_lines(format_show_output(title, markup));
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(pages: &[GeneratedPage], output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = pages
        .iter()
        .map(|p| {
            format!(
                "{} → {} ({})",
                p.title,
                p.file,
                plural(p.cards, "card", "cards")
            )
        })
        .collect();
    lines.push(format!(
        "Generated {} in {}",
        plural(pages.len(), "page", "pages"),
        output_dir.display()
    ));
    lines
}

pub fn print_generate_output(pages: &[GeneratedPage], output_dir: &Path) {
    print_lines(format_generate_output(pages, output_dir));
}

// ============================================================================
// Preferences
// ============================================================================

pub fn format_theme_output(theme: Theme) -> Vec<String> {
    vec![format!("Theme: {}", theme.as_str())]
}

pub fn format_status_output(entry: Option<&StatusEntry>) -> Vec<String> {
    match entry {
        Some(e) => {
            let mut lines = vec![format!("Status: {} ({})", e.text, e.key)];
            if !e.sub.is_empty() {
                lines.push(format!("{}{}", indent(1), e.sub));
            }
            lines
        }
        None => vec!["Status: (none configured)".to_string()],
    }
}

pub fn print_theme_output(theme: Theme) {
    print_lines(format_theme_output(theme));
}

pub fn print_status_output(entry: Option<&StatusEntry>) {
    print_lines(format_status_output(entry));
}

// ============================================================================
// Contact
// ============================================================================

/// Compose URL first; the body is echoed when the visitor has to copy it.
pub fn format_contact_output(submission: &Submission) -> Vec<String> {
    let mut lines = vec![
        format!("Subject: {}", submission.message.subject),
        submission.message.url.to_string(),
        submission.notice.text().to_string(),
    ];
    if matches!(submission.notice, ContactNotice::ManualCopy(_)) {
        lines.push(String::new());
        lines.extend(submission.message.body.lines().map(String::from));
    }
    lines
}

pub fn print_contact_output(submission: &Submission) {
    print_lines(format_contact_output(submission));
}

// ============================================================================
// Check
// ============================================================================

/// Content inventory: categories with their detail coverage, item counts per
/// category, and the configured status cycle.
pub fn format_check_output(catalog: &Catalog, config: &SiteConfig) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, cat) in catalog.categories.iter().enumerate() {
        let detail = match catalog.detail(&cat.key) {
            Some(d) => format!(
                "{} ({}, {})",
                d.title,
                plural(d.samples.len(), "sample", "samples"),
                plural(d.price_rows.len(), "price", "prices")
            ),
            None => "(no detail)".to_string(),
        };
        lines.push(format!("{} {}  {}", format_index(i + 1), cat.key, detail));
    }

    lines.push(format!("Works ({})", catalog.works.len()));
    for cat in &catalog.categories {
        let n = catalog.works.iter().filter(|w| w.category == cat.key).count();
        lines.push(format!("{}{}: {}", indent(1), cat.label, n));
    }

    lines.push(format!("Images ({})", catalog.images.len()));
    for cat in &catalog.image_categories {
        let n = catalog.images.iter().filter(|w| w.category == cat.key).count();
        lines.push(format!("{}{}: {}", indent(1), cat.label, n));
    }

    lines.push("Status".to_string());
    for entry in &config.status.entries {
        lines.push(format!("{}{}: {}", indent(1), entry.key, entry.text));
    }
    lines
}

pub fn print_check_output(catalog: &Catalog, config: &SiteConfig) {
    print_lines(format_check_output(catalog, config));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContactConfig;
    use crate::contact::{ContactFields, compose};
    use crate::test_helpers::scenario_catalog;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn item_header_untitled() {
        assert_eq!(item_header(2, "i9", "  "), "002 [i9] (untitled)");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "card", "cards"), "1 card");
        assert_eq!(plural(0, "card", "cards"), "0 cards");
    }

    // =========================================================================
    // Command output
    // =========================================================================

    #[test]
    fn filter_output_lists_visible() {
        let state = FilterState {
            active_category: "full".into(),
            query_text: String::new(),
        };
        let visible = [ListedItem {
            id: "1",
            category: "full",
            title: "Mio City",
        }];
        let lines = format_filter_output("works", &state, &visible, 2);
        assert_eq!(
            lines,
            vec![
                "works: category=full query=\"\"",
                "001 [1] Mio City",
                "    Category: full",
                "Showing 1 of 2",
            ]
        );
    }

    #[test]
    fn filter_output_empty() {
        let lines = format_filter_output("images", &FilterState::default(), &[], 3);
        assert_eq!(lines.last().unwrap(), "Showing 0 of 3");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn generate_output_summary() {
        let pages = vec![
            GeneratedPage {
                file: "works.html".into(),
                title: "Works".into(),
                cards: 1,
            },
            GeneratedPage {
                file: "myimages.html".into(),
                title: "My Images".into(),
                cards: 2,
            },
        ];
        let lines = format_generate_output(&pages, Path::new("dist"));
        assert_eq!(lines[0], "Works → works.html (1 card)");
        assert_eq!(lines[1], "My Images → myimages.html (2 cards)");
        assert_eq!(lines[2], "Generated 2 pages in dist");
    }

    #[test]
    fn show_output_splits_markup() {
        let lines = format_show_output("Full body", "<p>a</p>\n<p>b</p>");
        assert_eq!(lines, vec!["Full body", "", "<p>a</p>", "<p>b</p>"]);
    }

    #[test]
    fn status_output_with_sub() {
        let entry = StatusEntry {
            key: "open".into(),
            text: "Open".into(),
            sub: "2 slots".into(),
        };
        assert_eq!(
            format_status_output(Some(&entry)),
            vec!["Status: Open (open)", "    2 slots"]
        );
        assert_eq!(format_status_output(None), vec!["Status: (none configured)"]);
    }

    #[test]
    fn theme_output() {
        assert_eq!(format_theme_output(Theme::Dark), vec!["Theme: dark"]);
    }

    fn submission(notice: ContactNotice) -> Submission {
        let fields = ContactFields {
            name: "Mio".into(),
            email: "mio@example.com".into(),
            kind: "Full body".into(),
            message: "Hi".into(),
        };
        Submission {
            message: compose(&fields, &ContactConfig::default()).unwrap(),
            notice,
        }
    }

    #[test]
    fn contact_output_copied_omits_body() {
        let lines = format_contact_output(&submission(ContactNotice::Copied("ok".into())));
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("https://mail.google.com/"));
        assert_eq!(lines[2], "ok");
    }

    #[test]
    fn contact_output_manual_copy_echoes_body() {
        let lines = format_contact_output(&submission(ContactNotice::ManualCopy("copy it".into())));
        assert_eq!(lines[2], "copy it");
        assert!(lines.iter().any(|l| l == "Hi"));
    }

    #[test]
    fn check_output_inventory() {
        let catalog = scenario_catalog();
        let lines = format_check_output(&catalog, &SiteConfig::default());
        assert_eq!(lines[0], "Categories");
        assert_eq!(lines[1], "001 full  Full body (2 samples, 2 prices)");
        assert_eq!(lines[2], "002 half  Half body (1 sample, 1 price)");
        assert!(lines.contains(&"Works (2)".to_string()));
        assert!(lines.contains(&"Images (2)".to_string()));
        assert!(lines.contains(&"Status".to_string()));
    }
}
