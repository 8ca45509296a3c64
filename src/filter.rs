//! Gallery filter: category chips plus free-text search.
//!
//! An item is visible when both predicates hold:
//!
//! ```text
//! visible = (active_category == "all" || item.category_tag == active_category)
//!        && (query == "" || item.searchable_text.contains(normalize(query)))
//! ```
//!
//! [`FilterController::recompute`] is the only code that writes visibility. It
//! evaluates the predicate for every item from scratch, so calling it twice in
//! a row changes nothing.
//!
//! Matching is a plain substring test on normalized text: no tokenizing, no
//! word boundaries, no ranking. "cat" matches "concatenate".

use crate::dom::{NodeId, Page};

/// Category value that disables the category predicate.
pub const ALL: &str = "all";

/// Lower-case, collapse whitespace runs to a single space, trim.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Current filter inputs. Values are stored exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub active_category: String,
    pub query_text: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: ALL.to_string(),
            query_text: String::new(),
        }
    }
}

impl FilterState {
    pub fn matches(&self, item: &Item) -> bool {
        let category_ok =
            self.active_category == ALL || item.category_tag == self.active_category;
        let query = normalize(&self.query_text);
        category_ok && (query.is_empty() || item.searchable_text.contains(&query))
    }
}

/// One filterable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The card element whose hidden class is toggled.
    pub node: NodeId,
    pub id: String,
    pub category_tag: String,
    /// Already normalized.
    pub searchable_text: String,
    pub visible: bool,
}

impl Item {
    pub fn new(node: NodeId, id: &str, category_tag: &str, raw_text: &str) -> Self {
        Self {
            node,
            id: id.to_string(),
            category_tag: category_tag.to_string(),
            searchable_text: normalize(raw_text),
            visible: true,
        }
    }
}

/// A category selector control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub node: NodeId,
    pub value: String,
}

const ACTIVE_CLASS: &str = "is-active";

#[derive(Debug, Clone)]
pub struct FilterController {
    state: FilterState,
    items: Vec<Item>,
    chips: Vec<Chip>,
    hidden_class: String,
}

impl FilterController {
    pub fn new(items: Vec<Item>, chips: Vec<Chip>, hidden_class: &str) -> Self {
        Self {
            state: FilterState::default(),
            items,
            chips,
            hidden_class: hidden_class.to_string(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| i.visible)
            .map(|i| i.id.as_str())
            .collect()
    }

    /// Set the category by value. The first chip carrying that value becomes
    /// the only active chip; an unknown value leaves no chip active.
    pub fn set_category(&mut self, page: &mut Page, tag: &str) {
        let chip = self.chips.iter().find(|c| c.value == tag).map(|c| c.node);
        self.activate(page, chip, tag);
    }

    /// Select a specific chip control: it becomes the only active chip and
    /// its value becomes the category.
    pub fn select_chip(&mut self, page: &mut Page, chip: NodeId) {
        let value = self
            .chips
            .iter()
            .find(|c| c.node == chip)
            .map(|c| c.value.clone())
            .unwrap_or_else(|| ALL.to_string());
        self.activate(page, Some(chip), &value);
    }

    fn activate(&mut self, page: &mut Page, chip: Option<NodeId>, tag: &str) {
        self.state.active_category = tag.to_string();
        for c in &self.chips {
            page.get_mut(c.node)
                .set_class(ACTIVE_CLASS, Some(c.node) == chip);
        }
        tracing::debug!(category = tag, "filter category set");
        self.recompute(page);
    }

    pub fn set_query(&mut self, page: &mut Page, text: &str) {
        self.state.query_text = text.to_string();
        self.recompute(page);
    }

    pub fn recompute(&mut self, page: &mut Page) {
        for item in &mut self.items {
            item.visible = self.state.matches(item);
            page.get_mut(item.node)
                .set_class(&self.hidden_class, !item.visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn setup(items: &[(&str, &str, &str)], chip_values: &[&str]) -> (Page, FilterController) {
        let mut page = Page::new();
        let body = page.body();
        let chips = chip_values
            .iter()
            .map(|v| Chip {
                node: page.append(body, Element::new("button").with_class("filter-chip")),
                value: v.to_string(),
            })
            .collect();
        let items = items
            .iter()
            .map(|(id, cat, text)| {
                let node = page.append(body, Element::new("article"));
                Item::new(node, id, cat, text)
            })
            .collect();
        let mut filter = FilterController::new(items, chips, "is-hidden");
        filter.recompute(&mut page);
        (page, filter)
    }

    fn scenario() -> (Page, FilterController) {
        setup(
            &[("1", "full", "mio city"), ("2", "half", "cat chibi")],
            &["all", "full", "half"],
        )
    }

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize("  Mio \n  CITY\t"), "mio city");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn everything_visible_initially() {
        let (_, filter) = scenario();
        assert_eq!(filter.visible_ids(), vec!["1", "2"]);
        assert_eq!(filter.state(), &FilterState::default());
    }

    #[test]
    fn category_filter_hides_other_tags() {
        let (mut page, mut filter) = scenario();
        filter.set_category(&mut page, "full");
        assert_eq!(filter.visible_ids(), vec!["1"]);
        let hidden = filter.items()[1].node;
        assert!(page.get(hidden).has_class("is-hidden"));
        assert!(!page.get(filter.items()[0].node).has_class("is-hidden"));
    }

    #[test]
    fn query_is_plain_substring() {
        let (mut page, mut filter) = scenario();
        filter.set_category(&mut page, "all");
        filter.set_query(&mut page, "cat");
        // "mio city" does not contain the substring "cat"
        assert_eq!(filter.visible_ids(), vec!["2"]);

        filter.set_query(&mut page, "ci");
        // substring inside words: "city" and "chibi"
        assert_eq!(filter.visible_ids(), vec!["1", "2"]);
    }

    #[test]
    fn query_normalization_equivalence() {
        let (mut page, mut filter) = scenario();
        filter.set_query(&mut page, " Cat ");
        let padded = filter.visible_ids().into_iter().map(String::from).collect::<Vec<_>>();
        filter.set_query(&mut page, "cat");
        assert_eq!(filter.visible_ids(), padded);
        assert_eq!(filter.state().query_text, "cat");
    }

    #[test]
    fn query_stored_verbatim() {
        let (mut page, mut filter) = scenario();
        filter.set_query(&mut page, "  Mio  ");
        assert_eq!(filter.state().query_text, "  Mio  ");
        assert_eq!(filter.visible_ids(), vec!["1"]);
    }

    #[test]
    fn all_ignores_category_but_not_query() {
        let (mut page, mut filter) = scenario();
        filter.set_query(&mut page, "chibi");
        filter.set_category(&mut page, ALL);
        assert_eq!(filter.visible_ids(), vec!["2"]);
        filter.set_query(&mut page, "");
        assert_eq!(filter.visible_ids(), vec!["1", "2"]);
    }

    #[test]
    fn unknown_category_hides_everything() {
        let (mut page, mut filter) = scenario();
        filter.set_category(&mut page, "landscape");
        assert!(filter.visible_ids().is_empty());
        assert!(filter.chips().iter().all(|c| !page.get(c.node).has_class("is-active")));
    }

    #[test]
    fn exactly_one_chip_active() {
        let (mut page, mut filter) = scenario();
        filter.set_category(&mut page, "half");
        let active: Vec<&str> = filter
            .chips()
            .iter()
            .filter(|c| page.get(c.node).has_class("is-active"))
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(active, vec!["half"]);
    }

    #[test]
    fn select_chip_marks_clicked_chip_even_with_duplicate_values() {
        let (mut page, mut filter) = setup(&[("1", "full", "x")], &["full", "full"]);
        let second = filter.chips()[1].node;
        filter.select_chip(&mut page, second);
        assert!(page.get(second).has_class("is-active"));
        assert!(!page.get(filter.chips()[0].node).has_class("is-active"));
        assert_eq!(filter.state().active_category, "full");
    }

    #[test]
    fn recompute_is_idempotent() {
        let (mut page, mut filter) = scenario();
        filter.set_category(&mut page, "half");
        filter.set_query(&mut page, "chi");
        let before_page = page.clone();
        let before: Vec<bool> = filter.items().iter().map(|i| i.visible).collect();
        filter.recompute(&mut page);
        filter.recompute(&mut page);
        let after: Vec<bool> = filter.items().iter().map(|i| i.visible).collect();
        assert_eq!(before, after);
        for item in filter.items() {
            assert_eq!(before_page.get(item.node), page.get(item.node));
        }
    }

    #[test]
    fn visibility_independent_of_history() {
        let (mut page_a, mut a) = scenario();
        a.set_query(&mut page_a, "zzz");
        a.set_category(&mut page_a, "half");
        a.set_query(&mut page_a, "cat");

        let (mut page_b, mut b) = scenario();
        b.set_category(&mut page_b, "half");
        b.set_query(&mut page_b, "cat");

        assert_eq!(a.visible_ids(), b.visible_ids());
        for item in a.items() {
            assert_eq!(item.visible, a.state().matches(item));
        }
    }
}
