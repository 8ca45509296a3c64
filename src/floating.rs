//! Floating back-to-top and quick-commission buttons.
//!
//! Both buttons appear together once the page is scrolled past the
//! threshold. The quick button sits lower; the back-to-top button sits one
//! `gap` above it. When the footer enters the viewport both are pushed up by
//! the overlap plus `footer_gap`, so neither ever covers the footer.
//!
//! On pages with a hero (a `.hero` or carousel) the quick button stays
//! hidden until the hero has scrolled completely out of view.

use crate::config::{FloatingConfig, Labels};
use crate::dom::{Element, NodeId, Page, Selector};

/// Layout inputs, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
    /// Top edge of the footer relative to the viewport, if the page has one.
    pub footer_top: Option<f64>,
    /// Bottom edge of the hero relative to the viewport, if the page has one.
    pub hero_bottom: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub visible: bool,
    pub quick_bottom: f64,
    pub back_top_bottom: f64,
    /// Quick button suppressed because the hero is still on screen.
    pub hidden_by_hero: bool,
}

pub fn footer_push(viewport: &Viewport, config: &FloatingConfig) -> f64 {
    match viewport.footer_top {
        Some(top) if top < viewport.height => viewport.height - top + config.footer_gap,
        _ => 0.0,
    }
}

pub fn place(viewport: &Viewport, config: &FloatingConfig) -> Placement {
    let push = footer_push(viewport, config);
    Placement {
        visible: viewport.scroll_y > config.threshold,
        quick_bottom: config.base + push,
        back_top_bottom: config.base + config.gap + push,
        hidden_by_hero: viewport.hero_bottom.is_some_and(|bottom| bottom > 0.0),
    }
}

fn px(v: f64) -> String {
    format!("{v}px")
}

#[derive(Debug, Clone)]
pub struct FloatingButtons {
    quick: NodeId,
    back_top: Option<NodeId>,
    has_hero: bool,
}

impl FloatingButtons {
    /// Find the buttons, creating the quick-commission link when the page
    /// does not have one.
    pub fn init(page: &mut Page, labels: &Labels) -> Self {
        let quick_sel = Selector::parse(".quick-commission").ok();
        let existing = quick_sel.as_ref().and_then(|s| page.query(s));
        let quick = match existing {
            Some(node) => node,
            None => {
                let body = page.body();
                tracing::debug!("creating quick-commission button");
                page.append(
                    body,
                    Element::new("a")
                        .with_class("quick-commission")
                        .with_attr("href", &labels.quick_commission_href)
                        .with_attr("aria-label", &labels.quick_commission_aria)
                        .with_text(&labels.quick_commission),
                )
            }
        };
        let back_top = Selector::parse(".back-to-top")
            .ok()
            .and_then(|s| page.query(&s));
        let has_hero = Selector::parse(".hero, .carousel, .hero-carousel")
            .ok()
            .and_then(|s| page.query(&s))
            .is_some();
        Self {
            quick,
            back_top,
            has_hero,
        }
    }

    pub fn quick(&self) -> NodeId {
        self.quick
    }

    pub fn back_top(&self) -> Option<NodeId> {
        self.back_top
    }

    pub fn has_hero(&self) -> bool {
        self.has_hero
    }

    /// Recompute placement after a scroll or resize.
    pub fn update(&self, page: &mut Page, viewport: &Viewport, config: &FloatingConfig) -> Placement {
        let placement = place(viewport, config);
        let quick = page.get_mut(self.quick);
        quick.set_class("show", placement.visible);
        quick.set_style("bottom", &px(placement.quick_bottom));
        if self.has_hero {
            quick.set_class("is-hidden", placement.hidden_by_hero);
        }
        if let Some(back) = self.back_top {
            let el = page.get_mut(back);
            el.set_class("show", placement.visible);
            el.set_style("bottom", &px(placement.back_top_bottom));
        }
        placement
    }
}
