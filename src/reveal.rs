//! One-shot visibility effects: lazy images, scroll reveal, status bars.
//!
//! The page model has no layout, so "intersection" is reported by the caller:
//! each `on_intersect` takes the nodes that just became visible. Every
//! observed node fires at most once, after which it is no longer observed.

use crate::config::RevealConfig;
use crate::dom::{NodeId, Page, Selector};

/// Elements that get the `reveal` class on every page.
const REVEAL_TARGETS: &str = ".card, .hero, .gallery-work, .info-box, .contact-block, .reveal";
const LAZY_THUMBS: &str = ".myimages-thumb[data-src], .work-thumb[data-src]";

/// Copy `data-src` into `src` when the image has no source yet.
///
/// Returns `true` when the image was promoted.
pub fn promote_lazy_image(page: &mut Page, img: NodeId) -> bool {
    let el = page.get_mut(img);
    if el.attr_nonempty("src").is_some() {
        return false;
    }
    let Some(src) = el.attr_nonempty("data-src").map(String::from) else {
        return false;
    };
    el.set_attr("src", &src);
    el.remove_attr("data-src");
    true
}

/// Tracks nodes that should react to their first intersection only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneShotObserver {
    pending: Vec<NodeId>,
}

impl OneShotObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, node: NodeId) {
        if !self.pending.contains(&node) {
            self.pending.push(node);
        }
    }

    pub fn unobserve(&mut self, node: NodeId) {
        self.pending.retain(|n| *n != node);
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.pending.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Stop observing the visible nodes and return them, in observation order.
    pub fn take_intersecting(&mut self, visible: &[NodeId]) -> Vec<NodeId> {
        let (fired, rest): (Vec<_>, Vec<_>) =
            self.pending.iter().partition(|n| visible.contains(n));
        self.pending = rest;
        fired
    }
}

/// Thumbnails whose real source is deferred in `data-src`.
#[derive(Debug, Clone)]
pub struct LazyImages {
    observer: OneShotObserver,
}

impl LazyImages {
    pub fn init(page: &Page) -> Option<Self> {
        let sel = Selector::parse(LAZY_THUMBS).ok()?;
        let mut observer = OneShotObserver::new();
        for img in page.query_all(&sel) {
            observer.observe(img);
        }
        if observer.is_empty() {
            return None;
        }
        tracing::debug!(images = observer.len(), "lazy images observed");
        Some(Self { observer })
    }

    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    /// Load the visible images. Returns how many were promoted.
    pub fn on_intersect(&mut self, page: &mut Page, visible: &[NodeId]) -> usize {
        self.observer
            .take_intersecting(visible)
            .into_iter()
            .filter(|img| promote_lazy_image(page, *img))
            .count()
    }
}

/// Fade-in on first view: targets get `reveal`, then `is-in` once visible.
#[derive(Debug, Clone)]
pub struct Reveal {
    observer: OneShotObserver,
}

impl Reveal {
    pub fn init(page: &mut Page) -> Option<Self> {
        let sel = Selector::parse(REVEAL_TARGETS).ok()?;
        let targets = page.query_all(&sel);
        if targets.is_empty() {
            return None;
        }
        let mut observer = OneShotObserver::new();
        for node in targets {
            page.get_mut(node).add_class("reveal");
            observer.observe(node);
        }
        Some(Self { observer })
    }

    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    pub fn on_intersect(&mut self, page: &mut Page, visible: &[NodeId]) -> usize {
        let fired = self.observer.take_intersecting(visible);
        for node in &fired {
            page.get_mut(*node).add_class("is-in");
        }
        fired.len()
    }
}

/// A bar width to apply after `delay_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledFill {
    pub fill: NodeId,
    pub width: String,
    pub delay_ms: u64,
}

/// Parse a bar's `data-value` and clamp it to `0..=100`. Unparsable values
/// count as zero.
pub fn clamp_percent(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

/// Front-page status bars that fill once when the panel comes into view.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    panel: NodeId,
    bars: Vec<(NodeId, Option<NodeId>, f64)>,
    played: bool,
    reduced_motion: bool,
    timing: RevealConfig,
}

impl StatusPanel {
    pub fn init(page: &Page, timing: &RevealConfig, reduced_motion: bool) -> Option<Self> {
        let panel = page.by_id("statusPanel")?;
        let bar_sel = Selector::parse(".status-bar[data-value]").ok()?;
        let fill_sel = Selector::parse(".status-fill").ok()?;
        let bars: Vec<_> = page
            .query_all_within(panel, &bar_sel)
            .into_iter()
            .map(|bar| {
                let value = clamp_percent(page.get(bar).attr("data-value").unwrap_or_default());
                (bar, page.query_within(bar, &fill_sel), value)
            })
            .collect();
        if bars.is_empty() {
            return None;
        }
        Some(Self {
            panel,
            bars,
            played: false,
            reduced_motion,
            timing: timing.clone(),
        })
    }

    pub fn played(&self) -> bool {
        self.played
    }

    /// Start the fill animation the first time the panel is visible.
    ///
    /// With reduced motion every width is applied immediately and the
    /// returned schedule is empty. Otherwise bar `i` is scheduled at
    /// `base_delay_ms + i * step_ms`.
    pub fn on_intersect(&mut self, page: &mut Page, visible: bool) -> Vec<ScheduledFill> {
        if !visible || self.played {
            return Vec::new();
        }
        self.played = true;
        page.get_mut(self.panel).add_class("is-animate");

        let mut schedule = Vec::new();
        for (i, (_, fill, value)) in self.bars.iter().enumerate() {
            let Some(fill) = *fill else { continue };
            let width = format!("{value}%");
            if self.reduced_motion {
                let el = page.get_mut(fill);
                el.set_style("transition", "none");
                el.set_style("width", &width);
            } else {
                schedule.push(ScheduledFill {
                    fill,
                    width,
                    delay_ms: self.timing.base_delay_ms + i as u64 * self.timing.step_ms,
                });
            }
        }
        tracing::debug!(bars = self.bars.len(), reduced_motion = self.reduced_motion, "status bars played");
        schedule
    }

    /// Apply fills whose delay has elapsed at `elapsed_ms`; returns the rest.
    pub fn apply_due(page: &mut Page, schedule: Vec<ScheduledFill>, elapsed_ms: u64) -> Vec<ScheduledFill> {
        let (due, later): (Vec<_>, Vec<_>) =
            schedule.into_iter().partition(|s| s.delay_ms <= elapsed_ms);
        for s in due {
            page.get_mut(s.fill).set_style("width", &s.width);
        }
        later
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn promote_only_when_src_missing() {
        let mut page = Page::new();
        let body = page.body();
        let lazy = page.append(body, Element::new("img").with_attr("data-src", "a.jpg"));
        let loaded = page.append(
            body,
            Element::new("img").with_attr("src", "b.jpg").with_attr("data-src", "c.jpg"),
        );
        assert!(promote_lazy_image(&mut page, lazy));
        assert_eq!(page.get(lazy).attr("src"), Some("a.jpg"));
        assert_eq!(page.get(lazy).attr("data-src"), None);
        assert!(!promote_lazy_image(&mut page, lazy));
        assert!(!promote_lazy_image(&mut page, loaded));
        assert_eq!(page.get(loaded).attr("src"), Some("b.jpg"));
    }

    #[test]
    fn observer_fires_once() {
        let mut page = Page::new();
        let body = page.body();
        let a = page.append(body, Element::new("div"));
        let b = page.append(body, Element::new("div"));
        let mut obs = OneShotObserver::new();
        obs.observe(a);
        obs.observe(b);
        obs.observe(a);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.take_intersecting(&[b]), vec![b]);
        assert_eq!(obs.take_intersecting(&[a, b]), vec![a]);
        assert!(obs.is_empty());
    }

    #[test]
    fn lazy_images_promote_on_first_view() {
        let mut page = Page::new();
        let body = page.body();
        let thumb = page.append(
            body,
            Element::new("img").with_class("myimages-thumb").with_attr("data-src", "a.jpg"),
        );
        let other = page.append(body, Element::new("img").with_attr("data-src", "b.jpg"));
        let mut lazy = LazyImages::init(&page).unwrap();
        assert_eq!(lazy.pending(), 1);
        assert_eq!(lazy.on_intersect(&mut page, &[thumb, other]), 1);
        assert_eq!(page.get(other).attr("src"), None);
        assert_eq!(lazy.on_intersect(&mut page, &[thumb]), 0);
    }

    #[test]
    fn reveal_marks_targets_then_shows() {
        let mut page = Page::new();
        let body = page.body();
        let card = page.append(body, Element::new("div").with_class("card"));
        let mut reveal = Reveal::init(&mut page).unwrap();
        assert!(page.get(card).has_class("reveal"));
        assert!(!page.get(card).has_class("is-in"));
        assert_eq!(reveal.on_intersect(&mut page, &[card]), 1);
        assert!(page.get(card).has_class("is-in"));
        assert_eq!(reveal.pending(), 0);
    }

    #[test]
    fn reveal_skips_pages_without_targets() {
        let mut page = Page::new();
        assert!(Reveal::init(&mut page).is_none());
    }

    #[test]
    fn clamp_handles_range_and_garbage() {
        assert_eq!(clamp_percent("50"), 50.0);
        assert_eq!(clamp_percent("150"), 100.0);
        assert_eq!(clamp_percent("-3"), 0.0);
        assert_eq!(clamp_percent("abc"), 0.0);
        assert_eq!(clamp_percent(""), 0.0);
    }

    fn status_page() -> (Page, Vec<NodeId>) {
        let mut page = Page::new();
        let body = page.body();
        let panel = page.append(body, Element::new("section").with_id("statusPanel"));
        let fills = ["80", "120"]
            .iter()
            .map(|v| {
                let bar = page.append(
                    panel,
                    Element::new("div").with_class("status-bar").with_attr("data-value", v),
                );
                page.append(bar, Element::new("span").with_class("status-fill"))
            })
            .collect();
        (page, fills)
    }

    #[test]
    fn status_bars_stagger_and_fire_once() {
        let (mut page, fills) = status_page();
        let mut panel = StatusPanel::init(&page, &RevealConfig::default(), false).unwrap();
        assert!(panel.on_intersect(&mut page, false).is_empty());
        let schedule = panel.on_intersect(&mut page, true);
        assert_eq!(
            schedule.iter().map(|s| s.delay_ms).collect::<Vec<_>>(),
            vec![120, 210]
        );
        assert_eq!(schedule[1].width, "100%");
        assert!(panel.on_intersect(&mut page, true).is_empty());

        let rest = StatusPanel::apply_due(&mut page, schedule, 150);
        assert_eq!(page.get(fills[0]).style("width"), Some("80%"));
        assert_eq!(page.get(fills[1]).style("width"), None);
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn reduced_motion_applies_immediately() {
        let (mut page, fills) = status_page();
        let mut panel = StatusPanel::init(&page, &RevealConfig::default(), true).unwrap();
        assert!(panel.on_intersect(&mut page, true).is_empty());
        assert_eq!(page.get(fills[0]).style("width"), Some("80%"));
        assert_eq!(page.get(fills[0]).style("transition"), Some("none"));
        assert!(panel.played());
    }
}
