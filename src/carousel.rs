//! Front-page image carousel.
//!
//! Index-only: the track is shifted by `-index * 100%` and one dot per slide
//! mirrors the index. Time is passed in explicitly (`now_ms`), so autoplay is
//! a deadline checked by [`Carousel::tick`] rather than a running timer.
//!
//! - Autoplay advances every `interval_ms`.
//! - Any user navigation (buttons, dots, swipe) restarts the countdown.
//! - Hover and touch pause autoplay; leaving resumes it.
//! - A pointer drag wider than `swipe_threshold` moves one slide; a shorter
//!   one just resumes autoplay.
//! - Slide images load lazily: the second slide after `preload_delay_ms`,
//!   every slide on any button press, the rest as they come into view.

use crate::config::{CarouselConfig, Labels};
use crate::dom::{Element, NodeId, Page, Selector, SelectorError};
use crate::events::{BindingTable, Event, EventKind};
use crate::reveal::{OneShotObserver, promote_lazy_image};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Prev,
    Dot,
    LoadAll,
    Pause,
    Resume,
    DragStart,
    DragEnd,
    DragCancel,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    track: NodeId,
    slides: Vec<NodeId>,
    dots: Vec<NodeId>,
    index: usize,
    next_fire: Option<u64>,
    drag_start: Option<f64>,
    preload_at: Option<u64>,
    lazy: OneShotObserver,
    config: CarouselConfig,
    bindings: BindingTable<Action>,
}

fn bindings() -> Result<BindingTable<Action>, SelectorError> {
    Ok(BindingTable::new()
        .on(EventKind::Click, ".carousel-btn", Action::LoadAll)?
        .on(EventKind::Click, ".carousel-btn.next", Action::Next)?
        .on(EventKind::Click, ".carousel-btn.prev", Action::Prev)?
        .on(EventKind::Click, ".carousel-dot", Action::Dot)?
        .on(EventKind::MouseEnter, ".carousel", Action::Pause)?
        .on(EventKind::TouchStart, ".carousel", Action::Pause)?
        .on(EventKind::MouseLeave, ".carousel", Action::Resume)?
        .on(EventKind::TouchEnd, ".carousel", Action::Resume)?
        .on(EventKind::PointerDown, ".carousel", Action::DragStart)?
        .on(EventKind::PointerUp, ".carousel", Action::DragEnd)?
        .on(EventKind::PointerCancel, ".carousel", Action::DragCancel)?)
}

impl Carousel {
    /// Build dots and start autoplay. Returns `None` when the page has no
    /// carousel, no track, no slide images or no dot container.
    pub fn init(page: &mut Page, config: &CarouselConfig, labels: &Labels, now_ms: u64) -> Option<Self> {
        let root = page.query(&Selector::parse(".carousel").ok()?)?;
        let track = page.query_within(root, &Selector::parse(".carousel-track").ok()?)?;
        let slides = page.query_all_within(track, &Selector::parse("img").ok()?);
        let dots_wrap = page.query_within(root, &Selector::parse(".carousel-dots").ok()?)?;
        if slides.is_empty() {
            return None;
        }
        let bindings = match bindings() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "invalid carousel binding");
                return None;
            }
        };

        let dots = (0..slides.len())
            .map(|i| {
                let mut dot = Element::new("button")
                    .with_class("carousel-dot")
                    .with_attr("type", "button")
                    .with_attr("aria-label", &labels.carousel_dot.replace("{n}", &(i + 1).to_string()));
                if i == 0 {
                    dot.add_class("is-active");
                }
                page.append(dots_wrap, dot)
            })
            .collect();

        let mut lazy = OneShotObserver::new();
        for img in &slides {
            if page.get(*img).attr_nonempty("data-src").is_some() {
                lazy.observe(*img);
            }
        }

        let mut carousel = Self {
            track,
            slides,
            dots,
            index: 0,
            next_fire: None,
            drag_start: None,
            preload_at: Some(now_ms + config.preload_delay_ms),
            lazy,
            config: config.clone(),
            bindings,
        };
        carousel.start(now_ms);
        tracing::debug!(slides = carousel.slides.len(), "carousel initialized");
        Some(carousel)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.next_fire.is_some()
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    pub fn slides(&self) -> &[NodeId] {
        &self.slides
    }

    /// A zero interval disables autoplay.
    fn start(&mut self, now_ms: u64) {
        self.next_fire = (self.config.interval_ms > 0).then(|| now_ms + self.config.interval_ms);
    }

    fn stop(&mut self) {
        self.next_fire = None;
    }

    fn render(&self, page: &mut Page) {
        let transform = if self.index == 0 {
            "translateX(0%)".to_string()
        } else {
            format!("translateX(-{}%)", self.index * 100)
        };
        page.get_mut(self.track).set_style("transform", &transform);
        for (i, dot) in self.dots.iter().enumerate() {
            page.get_mut(*dot).set_class("is-active", i == self.index);
        }
    }

    /// Move to slide `i`, wrapping in both directions.
    pub fn go(&mut self, page: &mut Page, i: isize, user: bool, now_ms: u64) {
        let n = self.slides.len() as isize;
        self.index = i.rem_euclid(n) as usize;
        self.render(page);
        if user {
            self.start(now_ms);
        }
    }

    pub fn next(&mut self, page: &mut Page, user: bool, now_ms: u64) {
        self.go(page, self.index as isize + 1, user, now_ms);
    }

    pub fn prev(&mut self, page: &mut Page, user: bool, now_ms: u64) {
        self.go(page, self.index as isize - 1, user, now_ms);
    }

    /// Run autoplay and the delayed preload up to `now_ms`.
    pub fn tick(&mut self, page: &mut Page, now_ms: u64) {
        if let Some(at) = self.preload_at
            && now_ms >= at
        {
            self.preload_at = None;
            if let Some(second) = self.slides.get(1).copied() {
                self.load(page, second);
            }
        }
        while let Some(at) = self.next_fire
            && now_ms >= at
        {
            self.next(page, false, now_ms);
            self.next_fire = Some(at + self.config.interval_ms);
        }
    }

    fn load(&mut self, page: &mut Page, img: NodeId) {
        promote_lazy_image(page, img);
        self.lazy.unobserve(img);
    }

    fn load_all(&mut self, page: &mut Page) {
        for img in self.slides.clone() {
            self.load(page, img);
        }
    }

    /// Slide images that just came into view.
    pub fn on_intersect(&mut self, page: &mut Page, visible: &[NodeId]) {
        for img in self.lazy.take_intersecting(visible) {
            promote_lazy_image(page, img);
        }
    }

    pub fn handle(&mut self, page: &mut Page, event: &Event, now_ms: u64) -> bool {
        let fired = self.bindings.resolve(page, event);
        let handled = !fired.is_empty();
        for f in fired {
            match f.action {
                Action::LoadAll => self.load_all(page),
                Action::Next => self.next(page, true, now_ms),
                Action::Prev => self.prev(page, true, now_ms),
                Action::Dot => {
                    if let Some(i) = f.matched.and_then(|m| self.dots.iter().position(|d| *d == m)) {
                        self.go(page, i as isize, true, now_ms);
                    }
                }
                Action::Pause => self.stop(),
                Action::Resume => self.start(now_ms),
                Action::DragStart => {
                    if let Event::PointerDown { x, .. } = event {
                        self.drag_start = Some(*x);
                        self.stop();
                    }
                }
                Action::DragEnd => {
                    if let (Event::PointerUp { x, .. }, Some(start)) = (event, self.drag_start.take()) {
                        let dx = x - start;
                        if dx.abs() > self.config.swipe_threshold {
                            if dx < 0.0 {
                                self.next(page, true, now_ms);
                            } else {
                                self.prev(page, true, now_ms);
                            }
                        } else {
                            self.start(now_ms);
                        }
                    }
                }
                Action::DragCancel => {
                    self.drag_start = None;
                    self.start(now_ms);
                }
            }
        }
        handled
    }
}
