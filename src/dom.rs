//! In-memory page model.
//!
//! Every interactive component in this crate reads from and writes to a
//! [`Page`]: an arena of [`Element`]s linked by parent/child indices. The model
//! carries exactly what the components touch on a real page: tag, id,
//! classes, attributes, inline style, own text, replaced inner markup and a
//! vertical scroll offset.
//!
//! ## Selectors
//!
//! Lookups use a deliberately small selector language ([`Selector`]):
//! comma-separated lists of compound selectors built from a tag name,
//! `#id`, `.class`, `[attr]` and `[attr=value]` parts. There are no
//! combinators; ancestry questions go through [`Page::closest`] instead.
//!
//! ```text
//! .filter-chip[data-work-filter]
//! input, textarea, select, label
//! #workModal
//! ```
//!
//! ## Removal
//!
//! Removed elements stay in the arena (their [`NodeId`] remains valid to
//! read) but are detached from their parent and skipped by every query.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("invalid selector '{0}'")]
    Invalid(String),
}

/// Index of an element inside a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single element of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    /// Own text (not including descendants).
    pub text: String,
    /// Markup that replaced this element's children, if any.
    pub inner_html: Option<String>,
    pub scroll_top: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        for c in class.split_whitespace() {
            self.add_class(c);
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Add or remove `class` depending on `on`, like `classList.toggle(c, on)`.
    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        let on = !self.has_class(class);
        self.set_class(class, on);
        on
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute value, treating an empty string as absent.
    pub fn attr_nonempty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.style.remove(name);
        } else {
            self.style.insert(name.to_string(), value.to_string());
        }
    }
}

/// The page: an element arena rooted at `<html>`, with a `<body>` child.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Element>,
    root: NodeId,
    body: NodeId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let mut page = Self {
            nodes: vec![Element::new("html")],
            root: NodeId(0),
            body: NodeId(0),
        };
        page.body = page.append(page.root, Element::new("body"));
        page
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        element.removed = false;
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach `node` from its parent. Descendants become unreachable.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root || node == self.body {
            return;
        }
        if let Some(parent) = self.nodes[node.0].parent {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
        self.nodes[node.0].removed = true;
    }

    pub fn get(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn get_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Whether `node` is still attached to the document.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.nodes[n.0].removed {
                return false;
            }
            if n == self.root {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(&self.nodes[node.0])
    }

    /// Nearest element, starting at `node` itself, that matches `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.matches(n, selector) {
                return Some(n);
            }
            cur = self.nodes[n.0].parent;
        }
        None
    }

    /// All attached elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_all_within(self.root, selector)
    }

    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`.
    pub fn query_all_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| *n != scope && self.matches(*n, selector))
            .collect()
    }

    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all_within(scope, selector).into_iter().next()
    }

    /// Concatenated text of `node` and its descendants, space separated.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .map(|n| self.nodes[n.0].text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `node` and all attached descendants in pre-order.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            for child in self.nodes[n.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// A comma-separated list of compound selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && *tag != el.tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(v) => el.attr(name) == Some(v.as_str()),
            None => el.attrs.contains_key(name),
        })
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_compound(part).ok_or_else(|| SelectorError::Invalid(part.into()))?);
        }
        Ok(Self { alternatives })
    }

    pub fn matches(&self, el: &Element) -> bool {
        !el.removed && self.alternatives.iter().any(|c| c.matches(el))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(input: &str) -> Option<Compound> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars[0] == '*' {
        compound.tag = Some("*".into());
        pos = 1;
    } else if is_ident_char(chars[0]) {
        compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '.' => {
                pos += 1;
                compound.classes.push(take_ident(&chars, &mut pos)?);
            }
            '#' => {
                pos += 1;
                compound.id = Some(take_ident(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos)?;
                let value = if chars.get(pos) == Some(&'=') {
                    pos += 1;
                    let quote = chars.get(pos).copied().filter(|c| *c == '"' || *c == '\'');
                    let value: String = match quote {
                        Some(q) => {
                            pos += 1;
                            let start = pos;
                            while pos < chars.len() && chars[pos] != q {
                                pos += 1;
                            }
                            let v = chars.get(start..pos)?.iter().collect();
                            pos += 1;
                            v
                        }
                        None => take_ident(&chars, &mut pos)?,
                    };
                    Some(value)
                } else {
                    None
                };
                if chars.get(pos) != Some(&']') {
                    return None;
                }
                pos += 1;
                compound.attrs.push((name, value));
            }
            _ => return None,
        }
    }
    Some(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn sample_page() -> (Page, NodeId, NodeId, NodeId) {
        let mut page = Page::new();
        let body = page.body();
        let grid = page.append(body, Element::new("div").with_id("workGrid"));
        let card = page.append(
            grid,
            Element::new("article")
                .with_class("gallery-work card")
                .with_attr("data-type", "full"),
        );
        let link = page.append(card, Element::new("a").with_attr("href", "#"));
        (page, grid, card, link)
    }

    #[test]
    fn parse_compound_parts() {
        let s = sel(".filter-chip[data-work-filter]");
        let el = Element::new("button")
            .with_class("filter-chip")
            .with_attr("data-work-filter", "all");
        assert!(s.matches(&el));
        assert!(!s.matches(&Element::new("button").with_class("filter-chip")));
    }

    #[test]
    fn parse_attr_value_quoted_and_bare() {
        let el = Element::new("div").with_attr("data-type", "half");
        assert!(sel("[data-type=half]").matches(&el));
        assert!(sel("[data-type=\"half\"]").matches(&el));
        assert!(!sel("[data-type='full']").matches(&el));
    }

    #[test]
    fn selector_list_matches_any() {
        let s = sel("input, textarea, select, label");
        assert!(s.matches(&Element::new("label")));
        assert!(!s.matches(&Element::new("button")));
    }

    #[test]
    fn invalid_selectors_rejected() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("a,"), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("div > p"), Err(SelectorError::Invalid(_))));
        assert!(matches!(Selector::parse("[data-x"), Err(SelectorError::Invalid(_))));
    }

    #[test]
    fn closest_walks_ancestors_including_self() {
        let (page, grid, card, link) = sample_page();
        assert_eq!(page.closest(link, &sel(".gallery-work")), Some(card));
        assert_eq!(page.closest(link, &sel("a")), Some(link));
        assert_eq!(page.closest(card, &sel("#workGrid")), Some(grid));
        assert_eq!(page.closest(grid, &sel(".gallery-work")), None);
    }

    #[test]
    fn query_in_document_order() {
        let mut page = Page::new();
        let body = page.body();
        let a = page.append(body, Element::new("p").with_class("x"));
        let wrap = page.append(body, Element::new("div"));
        let b = page.append(wrap, Element::new("p").with_class("x"));
        let c = page.append(body, Element::new("p").with_class("x"));
        assert_eq!(page.query_all(&sel(".x")), vec![a, b, c]);
        assert_eq!(page.query_all_within(wrap, &sel("p")), vec![b]);
    }

    #[test]
    fn removed_nodes_are_skipped() {
        let (mut page, grid, card, link) = sample_page();
        page.remove(card);
        assert!(page.query_all(&sel(".gallery-work")).is_empty());
        assert!(page.children(grid).is_empty());
        assert!(!page.is_attached(link));
        assert!(page.is_attached(grid));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let mut page = Page::new();
        let body = page.body();
        let card = page.append(body, Element::new("div"));
        page.append(card, Element::new("h3").with_text("Mio"));
        page.append(card, Element::new("p").with_text("City walk"));
        assert_eq!(page.text_content(card), "Mio City walk");
    }

    #[test]
    fn class_helpers() {
        let mut el = Element::new("div").with_class("a b");
        assert!(el.has_class("b"));
        assert!(!el.toggle_class("a"));
        assert!(el.toggle_class("a"));
        el.set_class("c", true);
        el.set_class("b", false);
        assert_eq!(el.classes, vec!["a", "c"]);
    }

    #[test]
    fn next_sibling_follows_parent_order() {
        let mut page = Page::new();
        let body = page.body();
        let q = page.append(body, Element::new("button").with_class("faq-q"));
        let a = page.append(body, Element::new("div").with_class("faq-a"));
        assert_eq!(page.next_sibling(q), Some(a));
        assert_eq!(page.next_sibling(a), None);
    }
}
