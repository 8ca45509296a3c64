//! Shared test utilities for the commission-folio test suite.
//!
//! Provides the fixture catalog, page builders, and lookup helpers that
//! panic with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = scenario_catalog();
//! let mut page = scenario_works_page(&catalog);
//!
//! let chip = find_chip(&page, "data-work-filter", "full");
//! let title = card_child(&page, "1", ".gallery-title");
//! assert!(!card_hidden(&page, "1", "is-hidden"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::config::Labels;
use crate::dom::{NodeId, Page, Selector};
use crate::generate;

// =========================================================================
// Fixture setup
// =========================================================================

const FIXTURE_CATALOG: &str = include_str!("../fixtures/catalog.toml");

/// Copy `fixtures/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// The fixture catalog: categories `full` and `half`, works `1` ("Mio City",
/// full) and `2` ("Cat Chibi", half), images `i1` ("Cat") and `i2`
/// ("Mio City").
pub fn scenario_catalog() -> Catalog {
    Catalog::from_toml_str(FIXTURE_CATALOG).unwrap()
}

pub fn scenario_works_page(catalog: &Catalog) -> Page {
    generate::works_page(catalog, &Labels::default())
}

pub fn scenario_images_page(catalog: &Catalog) -> Page {
    generate::my_images_page(catalog, &Labels::default())
}

// =========================================================================
// Page lookups: panic with a clear message on miss
// =========================================================================

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap_or_else(|e| panic!("bad selector '{s}': {e}"))
}

/// Find the filter chip with `attr="value"`. Panics if not found.
pub fn find_chip(page: &Page, attr: &str, value: &str) -> NodeId {
    page.query(&sel(&format!(".filter-chip[{attr}=\"{value}\"]")))
        .unwrap_or_else(|| panic!("chip {attr}=\"{value}\" not found"))
}

/// Find a card by `data-id`. Panics if not found.
pub fn find_card(page: &Page, id: &str) -> NodeId {
    page.query(&sel(&format!("[data-id=\"{id}\"]")))
        .unwrap_or_else(|| {
            let ids: Vec<&str> = page
                .query_all(&sel("[data-id]"))
                .into_iter()
                .filter_map(|n| page.get(n).attr("data-id"))
                .collect();
            panic!("card '{id}' not found. Available: {ids:?}")
        })
}

/// First descendant of card `id` matching `selector`. Panics if not found.
pub fn card_child(page: &Page, id: &str, selector: &str) -> NodeId {
    let card = find_card(page, id);
    page.query_within(card, &sel(selector))
        .unwrap_or_else(|| panic!("card '{id}' has no '{selector}'"))
}

/// Whether card `id` carries the hidden class.
pub fn card_hidden(page: &Page, id: &str, hidden_class: &str) -> bool {
    page.get(find_card(page, id)).has_class(hidden_class)
}

