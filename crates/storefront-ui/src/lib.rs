//! Headless page controllers for the storefront.
//!
//! Each page is an explicit state object driven by plain method calls, so the
//! whole client can run and be tested without a browser:
//!
//! - [`CatalogPage`]: load, search, filter, sort and the product grid
//! - [`DetailModal`]: one product's full attributes
//! - [`Carousel`]: trending window with auto-advance, drag and resize
//! - [`AdminPage`]: session-gated product management
//!
//! Markup is produced as strings by the [`render`] module.

pub mod admin;
pub mod carousel;
pub mod catalog;
pub mod modal;
pub mod render;

pub use admin::{AdminPage, InlineMessage, ListState, LoginOutcome, Notification};
pub use carousel::{Breakpoints, Carousel, CarouselConfig, NavState, TimerToken};
pub use catalog::{CatalogPage, CatalogView, LoadState};
pub use modal::{ClickTarget, DetailModal, ModalEvent, PricePresentation};
pub use render::{CardVariant, ContactLink, DisplayConfig, ProductGrid};
