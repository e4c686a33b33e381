//! Trending carousel command.

use std::time::Duration;

use anyhow::{Context as _, Result};
use console::style;
use storefront_ui::carousel::EMPTY_MESSAGE;
use storefront_ui::{Carousel, NavState, TimerToken};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::TrendingArgs;
use crate::context::Context;

/// Runs a carousel's auto-advance timer on a tokio interval.
///
/// The interval is re-armed whenever the carousel's active token changes,
/// so manual navigation restarts the countdown and a cancelled timer never
/// fires.
pub struct CarouselDriver {
    period: Duration,
    token: Option<TimerToken>,
    interval: Option<Interval>,
}

impl CarouselDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            // tokio intervals reject a zero period.
            period: period.max(Duration::from_millis(1)),
            token: None,
            interval: None,
        }
    }

    fn sync(&mut self, carousel: &Carousel) {
        let active = carousel.active_timer();
        if active == self.token {
            return;
        }
        self.token = active;
        self.interval = active.map(|_| {
            let mut interval = interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
    }

    /// Wait for the active timer's next tick and deliver it.
    ///
    /// Returns `false` straight away when the carousel has no running timer.
    pub async fn tick(&mut self, carousel: &mut Carousel) -> bool {
        self.sync(carousel);
        let (Some(token), Some(interval)) = (self.token, self.interval.as_mut()) else {
            return false;
        };
        interval.tick().await;
        carousel.on_timer(token)
    }
}

/// Run the trending command.
pub async fn run(args: TrendingArgs, ctx: &Context) -> Result<()> {
    let client = ctx.feed_client()?;
    let mut carousel = Carousel::new(ctx.config.carousel, args.width, f64::from(args.width));

    let spinner = ctx.output.spinner("Cargando destacados...");
    let loaded = carousel.fetch(&client).await;
    spinner.finish_and_clear();
    loaded.map_err(|e| anyhow::anyhow!(e.user_message())).context("No se pudieron cargar los destacados")?;

    print_window(&carousel, ctx);
    if !args.watch || carousel.nav_state() != NavState::Enabled {
        return Ok(());
    }

    let mut driver = CarouselDriver::new(carousel.interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut advances = 0u64;

    loop {
        let advanced = tokio::select! {
            advanced = driver.tick(&mut carousel) => advanced,
            _ = &mut ctrl_c => break,
        };
        if !advanced {
            break;
        }
        advances += 1;
        print_window(&carousel, ctx);
        if args.ticks.is_some_and(|limit| advances >= limit) {
            break;
        }
    }

    Ok(())
}

fn print_window(carousel: &Carousel, ctx: &Context) {
    if ctx.output.is_json() {
        let visible: Vec<_> = carousel.visible().iter().map(|p| p.id).collect();
        ctx.output.json(&serde_json::json!({
            "index": carousel.index(),
            "items_per_view": carousel.items_per_view(),
            "total": carousel.len(),
            "visible": visible,
        }));
        return;
    }

    if carousel.is_empty() {
        ctx.output.info(EMPTY_MESSAGE);
        return;
    }

    let names: Vec<String> = carousel
        .visible()
        .iter()
        .map(|p| {
            format!(
                "{} {}",
                style(&p.name).bold(),
                style(p.money(ctx.config.display.currency).display()).dim()
            )
        })
        .collect();
    let dots: String = carousel
        .indicators()
        .iter()
        .map(|d| if d.active { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ");
    let nav = match carousel.nav_state() {
        NavState::Enabled => "‹ ›",
        _ => "   ",
    };
    println!("{nav}  {}  {}", names.join("  |  "), style(dots).dim());
}
