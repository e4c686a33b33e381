//! Trending carousel: a sliding window over the trending products.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_catalog::{Product, ProductId};
use storefront_data::{FeedSource, FetchError};

use crate::render::{escape_html, render_card, CardVariant, DisplayConfig};

/// Shown in place of the track when nothing is trending.
pub const EMPTY_MESSAGE: &str = "No trending products found.";

/// Viewport widths at which the window grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Below this width, one item per view.
    pub small: u32,
    /// Below this width, two items per view; three otherwise.
    pub medium: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            small: 576,
            medium: 992,
        }
    }
}

impl Breakpoints {
    pub fn items_per_view(&self, viewport_width: u32) -> usize {
        if viewport_width < self.small {
            1
        } else if viewport_width < self.medium {
            2
        } else {
            3
        }
    }
}

/// Shortest auto-advance period; smaller configured values are raised to it.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Carousel behaviour settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    pub drag_threshold_px: f64,
    pub breakpoints: Breakpoints,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            drag_threshold_px: 50.0,
            breakpoints: Breakpoints::default(),
        }
    }
}

impl CarouselConfig {
    /// Auto-advance period, never below [`MIN_INTERVAL_MS`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_INTERVAL_MS))
    }
}

/// Identifies one started auto-advance timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Holds at most one active timer.
///
/// Starting always cancels the previous token first, so a driver that only
/// honours the active token can never run two intervals at once.
#[derive(Debug, Default)]
pub struct TimerSlot {
    next: u64,
    active: Option<TimerToken>,
}

impl TimerSlot {
    pub fn start(&mut self) -> TimerToken {
        self.cancel();
        self.next += 1;
        let token = TimerToken(self.next);
        self.active = Some(token);
        token
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<TimerToken> {
        self.active
    }

    pub fn is_active(&self, token: TimerToken) -> bool {
        self.active == Some(token)
    }
}

/// State of the prev/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No items at all.
    Hidden,
    /// Everything fits in one view.
    Disabled,
    Enabled,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Advanced,
    Retreated,
    SnappedBack,
}

/// One indicator dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub index: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f64,
    current_x: f64,
}

impl Drag {
    fn displacement(&self) -> f64 {
        self.current_x - self.start_x
    }
}

/// Carousel over the trending subset of a feed.
///
/// The window start always stays in `[0, max_start]`. Navigation wraps at
/// both ends and is only ever disabled because everything already fits.
#[derive(Debug)]
pub struct Carousel {
    items: Vec<Product>,
    index: usize,
    items_per_view: usize,
    container_width: f64,
    hovering: bool,
    drag: Option<Drag>,
    timer: TimerSlot,
    config: CarouselConfig,
}

impl Carousel {
    pub fn new(config: CarouselConfig, viewport_width: u32, container_width: f64) -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            items_per_view: config.breakpoints.items_per_view(viewport_width),
            container_width,
            hovering: false,
            drag: None,
            timer: TimerSlot::default(),
            config,
        }
    }

    /// Take the trending products out of `products` and start over.
    pub fn load(&mut self, products: &[Product]) {
        self.items = products.iter().filter(|p| p.is_trending()).cloned().collect();
        self.index = 0;
        self.drag = None;
        tracing::debug!(
            trending = self.items.len(),
            per_view = self.items_per_view,
            "loaded carousel"
        );
        self.restart_timer();
    }

    /// Fetch a fresh feed and load its trending subset.
    pub async fn fetch<S: FeedSource + ?Sized>(&mut self, source: &S) -> Result<usize, FetchError> {
        let feed = source.fetch_products().await?;
        self.load(feed.products());
        Ok(self.items.len())
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current window start.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    pub fn item_width(&self) -> f64 {
        self.container_width / self.items_per_view as f64
    }

    /// Last valid window start.
    pub fn max_start(&self) -> usize {
        self.items.len().saturating_sub(self.items_per_view)
    }

    /// Horizontal track translation in pixels, live drag included.
    pub fn track_offset(&self) -> f64 {
        let base = -(self.index as f64) * self.item_width();
        match self.drag {
            Some(drag) => base + drag.displacement(),
            None => base,
        }
    }

    /// Items currently in view.
    pub fn visible(&self) -> &[Product] {
        let end = (self.index + self.items_per_view).min(self.items.len());
        &self.items[self.index.min(end)..end]
    }

    /// Move the window start to `target`, wrapping past either end.
    pub fn go_to(&mut self, target: isize) {
        let max = self.max_start();
        self.index = if target < 0 {
            max
        } else if target as usize > max {
            0
        } else {
            target as usize
        };
    }

    /// Manual next.
    pub fn advance(&mut self) {
        self.go_to(self.index as isize + 1);
        self.restart_timer();
    }

    /// Manual previous.
    pub fn retreat(&mut self) {
        self.go_to(self.index as isize - 1);
        self.restart_timer();
    }

    pub fn nav_state(&self) -> NavState {
        if self.items.is_empty() {
            NavState::Hidden
        } else if self.items.len() <= self.items_per_view {
            NavState::Disabled
        } else {
            NavState::Enabled
        }
    }

    fn should_auto_advance(&self) -> bool {
        !self.hovering && self.drag.is_none() && self.items.len() > self.items_per_view
    }

    fn restart_timer(&mut self) {
        self.timer.cancel();
        if self.should_auto_advance() {
            self.timer.start();
        }
    }

    /// Token of the running auto-advance timer, if any.
    pub fn active_timer(&self) -> Option<TimerToken> {
        self.timer.active()
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    /// A timer tick. Only the active token advances; returns whether it did.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if !self.timer.is_active(token) || !self.should_auto_advance() {
            tracing::trace!(?token, "ignoring stale carousel tick");
            return false;
        }
        self.go_to(self.index as isize + 1);
        true
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn pointer_enter(&mut self) {
        self.hovering = true;
        self.timer.cancel();
    }

    /// Leaving the track also ends a drag in progress.
    pub fn pointer_leave(&mut self) {
        if self.drag.is_some() {
            self.drag_end();
        } else {
            self.hovering = false;
            self.restart_timer();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_start(&mut self, x: f64) {
        self.drag = Some(Drag {
            start_x: x,
            current_x: x,
        });
        self.hovering = true;
        self.timer.cancel();
    }

    pub fn drag_move(&mut self, x: f64) {
        if let Some(drag) = &mut self.drag {
            drag.current_x = x;
        }
    }

    /// Commit or snap back, then resume auto-advance.
    pub fn drag_end(&mut self) -> DragOutcome {
        let Some(drag) = self.drag.take() else {
            return DragOutcome::SnappedBack;
        };
        self.hovering = false;

        let moved = drag.displacement();
        let outcome = if moved.abs() > self.config.drag_threshold_px {
            if moved > 0.0 {
                self.go_to(self.index as isize - 1);
                DragOutcome::Retreated
            } else {
                self.go_to(self.index as isize + 1);
                DragOutcome::Advanced
            }
        } else {
            DragOutcome::SnappedBack
        };
        self.restart_timer();
        outcome
    }

    /// React to a viewport or container size change.
    pub fn resize(&mut self, viewport_width: u32, container_width: f64) {
        self.container_width = container_width;
        let per_view = self.config.breakpoints.items_per_view(viewport_width);
        if per_view != self.items_per_view {
            self.items_per_view = per_view;
            self.index = self.index.min(self.max_start());
            tracing::debug!(per_view, index = self.index, "carousel breakpoint changed");
            self.restart_timer();
        }
    }

    /// One dot per valid window start.
    pub fn indicators(&self) -> Vec<Indicator> {
        if self.items.is_empty() {
            return Vec::new();
        }
        (0..=self.max_start())
            .map(|index| Indicator {
                index,
                active: index == self.index,
            })
            .collect()
    }

    /// Jump to a dot. Counts as manual navigation.
    pub fn go_to_indicator(&mut self, index: usize) {
        self.go_to(index.min(self.max_start()) as isize);
        self.restart_timer();
    }

    /// Resolve a card's details action.
    pub fn details(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Track markup, or the empty message.
    pub fn render(&self, config: &DisplayConfig) -> String {
        if self.items.is_empty() {
            return format!(r#"<div class="carousel-empty"><p>{}</p></div>"#, escape_html(EMPTY_MESSAGE));
        }
        let width = self.item_width();
        let slides: String = self
            .items
            .iter()
            .enumerate()
            .map(|(i, p)| render_card(p, i, CardVariant::Carousel, config))
            .collect::<Vec<_>>()
            .join("\n");
        let dots: String = self
            .indicators()
            .iter()
            .map(|d| {
                let active = if d.active { " active" } else { "" };
                format!(r#"<button class="carousel-indicator{active}" data-index="{}"></button>"#, d.index)
            })
            .collect();
        format!(
            r#"<div class="carousel-track" style="--slide-width: {width:.2}px; transform: translateX({offset:.2}px)">
{slides}
</div>
<div class="carousel-indicators">{dots}</div>"#,
            offset = self.track_offset(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(n: i64) -> Vec<Product> {
        (1..=n)
            .map(|i| Product::new(i, format!("P{i}"), 1.0).with_tag("trending"))
            .collect()
    }

    fn desktop(n: i64) -> Carousel {
        let mut c = Carousel::new(CarouselConfig::default(), 1200, 900.0);
        c.load(&trending(n));
        c
    }

    #[test]
    fn test_interval_has_a_floor() {
        let zero = CarouselConfig {
            interval_ms: 0,
            ..CarouselConfig::default()
        };
        assert_eq!(zero.interval(), Duration::from_millis(MIN_INTERVAL_MS));
        assert_eq!(CarouselConfig::default().interval(), Duration::from_millis(5000));
    }

    #[test]
    fn test_breakpoints() {
        let b = Breakpoints::default();
        assert_eq!(b.items_per_view(375), 1);
        assert_eq!(b.items_per_view(576), 2);
        assert_eq!(b.items_per_view(991), 2);
        assert_eq!(b.items_per_view(992), 3);
    }

    #[test]
    fn test_load_keeps_only_trending() {
        let mut products = trending(2);
        products.push(Product::new(9, "Plain", 1.0));
        let mut c = Carousel::new(CarouselConfig::default(), 1200, 900.0);
        c.load(&products);
        assert_eq!(c.len(), 2);
        assert!(c.details(ProductId::new(9)).is_none());
        assert_eq!(c.details(ProductId::new(2)).map(|p| p.name.as_str()), Some("P2"));
    }

    #[test]
    fn test_wraparound() {
        let mut c = desktop(5);
        assert_eq!(c.max_start(), 2);
        c.retreat();
        assert_eq!(c.index(), 2);
        c.advance();
        assert_eq!(c.index(), 0);
        c.go_to(7);
        assert_eq!(c.index(), 0);
        c.go_to(-3);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_geometry() {
        let mut c = desktop(5);
        assert_eq!(c.item_width(), 300.0);
        c.advance();
        assert_eq!(c.track_offset(), -300.0);
        assert_eq!(c.visible().len(), 3);
        c.drag_start(500.0);
        c.drag_move(460.0);
        assert_eq!(c.track_offset(), -340.0);
    }

    #[test]
    fn test_nav_state() {
        let mut c = Carousel::new(CarouselConfig::default(), 1200, 900.0);
        c.load(&[]);
        assert_eq!(c.nav_state(), NavState::Hidden);
        assert!(c.render(&DisplayConfig::default()).contains(EMPTY_MESSAGE));
        assert_eq!(desktop(3).nav_state(), NavState::Disabled);
        assert_eq!(desktop(4).nav_state(), NavState::Enabled);
    }

    #[test]
    fn test_no_timer_when_everything_fits() {
        let c = desktop(3);
        assert!(c.active_timer().is_none());
        assert!(desktop(4).active_timer().is_some());
    }

    #[test]
    fn test_single_active_timer() {
        let mut c = desktop(5);
        let first = c.active_timer().unwrap();
        c.advance();
        let second = c.active_timer().unwrap();
        assert_ne!(first, second);

        // The cancelled timer's ticks do nothing.
        assert!(!c.on_timer(first));
        assert_eq!(c.index(), 1);
        assert!(c.on_timer(second));
        assert_eq!(c.index(), 2);
        assert!(c.on_timer(second));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_hover_suspends() {
        let mut c = desktop(5);
        let token = c.active_timer().unwrap();
        c.pointer_enter();
        assert!(c.active_timer().is_none());
        assert!(!c.on_timer(token));
        c.pointer_leave();
        let resumed = c.active_timer().unwrap();
        assert!(c.on_timer(resumed));
    }

    #[test]
    fn test_drag_commit_and_snap() {
        let mut c = desktop(5);

        c.drag_start(400.0);
        assert!(c.active_timer().is_none());
        c.drag_move(330.0);
        assert_eq!(c.drag_end(), DragOutcome::Advanced);
        assert_eq!(c.index(), 1);
        assert!(c.active_timer().is_some());

        c.drag_start(400.0);
        c.drag_move(460.0);
        assert_eq!(c.drag_end(), DragOutcome::Retreated);
        assert_eq!(c.index(), 0);

        c.drag_start(400.0);
        c.drag_move(430.0);
        assert_eq!(c.drag_end(), DragOutcome::SnappedBack);
        assert_eq!(c.index(), 0);
        assert_eq!(c.track_offset(), 0.0);
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut c = desktop(5);
        c.pointer_enter();
        c.drag_start(400.0);
        c.drag_move(300.0);
        c.pointer_leave();
        assert!(!c.is_dragging());
        assert!(!c.is_hovering());
        assert_eq!(c.index(), 1);
        assert!(c.active_timer().is_some());
    }

    #[test]
    fn test_resize_clamps_index() {
        let mut c = Carousel::new(CarouselConfig::default(), 375, 360.0);
        c.load(&trending(3));
        c.go_to(2);
        assert_eq!(c.index(), 2);

        c.resize(1200, 900.0);
        assert_eq!(c.items_per_view(), 3);
        assert_eq!(c.index(), 0);
        assert_eq!(c.nav_state(), NavState::Disabled);
        assert!(c.active_timer().is_none());
    }

    #[test]
    fn test_resize_same_breakpoint_keeps_index_and_timer() {
        let mut c = desktop(5);
        c.go_to(2);
        let token = c.active_timer().unwrap();
        c.resize(1400, 1200.0);
        assert_eq!(c.index(), 2);
        assert_eq!(c.item_width(), 400.0);
        assert_eq!(c.active_timer(), Some(token));
    }

    #[test]
    fn test_indicators() {
        let mut c = desktop(5);
        assert_eq!(c.indicators().len(), 3);
        c.go_to_indicator(2);
        let active: Vec<_> = c.indicators().iter().filter(|d| d.active).map(|d| d.index).collect();
        assert_eq!(active, vec![2]);
        c.go_to_indicator(10);
        assert_eq!(c.index(), 2);
        assert_eq!(desktop(2).indicators().len(), 1);
    }
}
