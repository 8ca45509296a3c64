//! UI events and the declarative binding table.
//!
//! Each component declares its handlers as rows of `(event kind, selector) →
//! action`. Dispatch walks the rows in declaration order; a row fires when
//! the event's target has an ancestor-or-self matching the row's selector
//! (document-level rows fire for every event of their kind). Several rows
//! may fire for one event, just as several listeners would.
//!
//! ```text
//! Click    .filter-chip[data-work-filter]  → SelectChip
//! Input    #workSearch                     → Search
//! KeyDown  (document)                      → Escape
//! ```

use crate::dom::{NodeId, Page, Selector, SelectorError};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click { target: NodeId },
    Input { target: NodeId, value: String },
    KeyDown { key: Key },
    Submit { target: NodeId },
    PointerDown { target: NodeId, x: f64 },
    PointerUp { target: NodeId, x: f64 },
    PointerCancel { target: NodeId },
    MouseEnter { target: NodeId },
    MouseLeave { target: NodeId },
    TouchStart { target: NodeId },
    TouchEnd { target: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Input,
    KeyDown,
    Submit,
    PointerDown,
    PointerUp,
    PointerCancel,
    MouseEnter,
    MouseLeave,
    TouchStart,
    TouchEnd,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::Input { .. } => EventKind::Input,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::Submit { .. } => EventKind::Submit,
            Event::PointerDown { .. } => EventKind::PointerDown,
            Event::PointerUp { .. } => EventKind::PointerUp,
            Event::PointerCancel { .. } => EventKind::PointerCancel,
            Event::MouseEnter { .. } => EventKind::MouseEnter,
            Event::MouseLeave { .. } => EventKind::MouseLeave,
            Event::TouchStart { .. } => EventKind::TouchStart,
            Event::TouchEnd { .. } => EventKind::TouchEnd,
        }
    }

    pub fn target(&self) -> Option<NodeId> {
        match self {
            Event::KeyDown { .. } => None,
            Event::Click { target }
            | Event::Input { target, .. }
            | Event::Submit { target }
            | Event::PointerDown { target, .. }
            | Event::PointerUp { target, .. }
            | Event::PointerCancel { target }
            | Event::MouseEnter { target }
            | Event::MouseLeave { target }
            | Event::TouchStart { target }
            | Event::TouchEnd { target } => Some(*target),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding<A> {
    kind: EventKind,
    selector: Option<Selector>,
    action: A,
}

/// A matched row: the action plus the element its selector matched
/// (`None` for document-level rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<A> {
    pub action: A,
    pub matched: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BindingTable<A> {
    rows: Vec<Binding<A>>,
}

impl<A> Default for BindingTable<A> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<A: Copy> BindingTable<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row bound to elements matching `selector`.
    pub fn on(mut self, kind: EventKind, selector: &str, action: A) -> Result<Self, SelectorError> {
        self.rows.push(Binding {
            kind,
            selector: Some(Selector::parse(selector)?),
            action,
        });
        Ok(self)
    }

    /// Add a document-level row.
    pub fn on_document(mut self, kind: EventKind, action: A) -> Self {
        self.rows.push(Binding {
            kind,
            selector: None,
            action,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that fire for `event`, in declaration order.
    pub fn resolve(&self, page: &Page, event: &Event) -> Vec<Fired<A>> {
        let kind = event.kind();
        let target = event.target();
        self.rows
            .iter()
            .filter(|row| row.kind == kind)
            .filter_map(|row| match (&row.selector, target) {
                (None, _) => Some(Fired {
                    action: row.action,
                    matched: None,
                }),
                (Some(sel), Some(t)) if page.is_attached(t) => page.closest(t, sel).map(|m| Fired {
                    action: row.action,
                    matched: Some(m),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Chip,
        Card,
        Escape,
    }

    fn table() -> BindingTable<Action> {
        BindingTable::new()
            .on(EventKind::Click, ".filter-chip", Action::Chip)
            .unwrap()
            .on(EventKind::Click, ".card", Action::Card)
            .unwrap()
            .on_document(EventKind::KeyDown, Action::Escape)
    }

    #[test]
    fn click_resolves_by_closest_ancestor() {
        let mut page = Page::new();
        let body = page.body();
        let card = page.append(body, Element::new("div").with_class("card"));
        let img = page.append(card, Element::new("img"));
        let fired = table().resolve(&page, &Event::Click { target: img });
        assert_eq!(
            fired,
            vec![Fired {
                action: Action::Card,
                matched: Some(card)
            }]
        );
    }

    #[test]
    fn document_rows_fire_without_target() {
        let page = Page::new();
        let fired = table().resolve(&page, &Event::KeyDown { key: Key::Escape });
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, Action::Escape);
        assert_eq!(fired[0].matched, None);
    }

    #[test]
    fn multiple_rows_fire_in_order() {
        let mut page = Page::new();
        let body = page.body();
        let both = page.append(body, Element::new("button").with_class("card filter-chip"));
        let actions: Vec<Action> = table()
            .resolve(&page, &Event::Click { target: both })
            .into_iter()
            .map(|f| f.action)
            .collect();
        assert_eq!(actions, vec![Action::Chip, Action::Card]);
    }

    #[test]
    fn detached_targets_fire_nothing() {
        let mut page = Page::new();
        let body = page.body();
        let card = page.append(body, Element::new("div").with_class("card"));
        page.remove(card);
        assert!(table().resolve(&page, &Event::Click { target: card }).is_empty());
    }

    #[test]
    fn bad_selector_rejected() {
        let result = BindingTable::new().on(EventKind::Click, "div > p", Action::Card);
        assert!(result.is_err());
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other("Enter".into()));
    }
}
