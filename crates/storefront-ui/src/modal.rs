//! Product detail modal.

use storefront_catalog::Product;

use crate::render::{escape_html, ContactLink, DisplayConfig};

/// Where a click inside the modal overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed background around the dialog.
    Scrim,
    /// Anywhere inside the dialog itself.
    Content,
}

/// Input delivered to an open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    CloseButton,
    Click(ClickTarget),
    Key(String),
}

impl ModalEvent {
    pub fn key(key: impl Into<String>) -> Self {
        ModalEvent::Key(key.into())
    }
}

/// How the price is presented in the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PricePresentation {
    #[default]
    Price,
    /// Hide the price and send buyers to a contact link.
    Contact { url: String, label: String },
}

impl PricePresentation {
    pub fn from_config(config: &DisplayConfig) -> Self {
        match &config.contact {
            Some(ContactLink { url, label }) => PricePresentation::Contact {
                url: url.clone(),
                label: label.clone(),
            },
            None => PricePresentation::Price,
        }
    }
}

/// Document-level listeners the modal holds while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listener {
    EscapeKey,
    ScrimClick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    Closed,
    Open(Box<Product>),
}

/// Detail modal.
///
/// Listeners are scoped to the open lifetime: registered on the transition
/// from closed to open and released on close. Opening over an already open
/// modal swaps the content only.
#[derive(Debug)]
pub struct DetailModal {
    state: ModalState,
    listeners: Vec<Listener>,
    presentation: PricePresentation,
    config: DisplayConfig,
    markup: String,
}

impl DetailModal {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            state: ModalState::Closed,
            listeners: Vec::new(),
            presentation: PricePresentation::from_config(&config),
            config,
            markup: String::new(),
        }
    }

    pub fn with_presentation(mut self, presentation: PricePresentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Show `product`.
    pub fn open(&mut self, product: Product) {
        self.markup = render_detail(&product, &self.presentation, &self.config);
        if self.listeners.is_empty() {
            self.listeners.push(Listener::EscapeKey);
            self.listeners.push(Listener::ScrimClick);
        }
        tracing::debug!(product = %product.id, "opened detail modal");
        self.state = ModalState::Open(Box::new(product));
    }

    pub fn close(&mut self) {
        if self.is_open() {
            tracing::debug!("closed detail modal");
        }
        self.state = ModalState::Closed;
        self.listeners.clear();
        self.markup.clear();
    }

    /// Feed an input event. Returns true if it closed the modal.
    pub fn handle(&mut self, event: &ModalEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        let closes = match event {
            ModalEvent::CloseButton => true,
            ModalEvent::Click(ClickTarget::Scrim) => self.listeners.contains(&Listener::ScrimClick),
            ModalEvent::Click(ClickTarget::Content) => false,
            ModalEvent::Key(key) => key == "Escape" && self.listeners.contains(&Listener::EscapeKey),
        };
        if closes {
            self.close();
        }
        closes
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn product(&self) -> Option<&Product> {
        match &self.state {
            ModalState::Open(product) => Some(product),
            ModalState::Closed => None,
        }
    }

    /// Dialog title, the product name.
    pub fn title(&self) -> Option<&str> {
        self.product().map(|p| p.name.as_str())
    }

    /// Body markup of the open modal; empty when closed.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Document listeners currently registered.
    pub fn registered_listeners(&self) -> usize {
        self.listeners.len()
    }
}

/// Render the detail body for one product.
pub fn render_detail(product: &Product, presentation: &PricePresentation, config: &DisplayConfig) -> String {
    let name = escape_html(&product.name);
    let price = match presentation {
        PricePresentation::Price => format!(
            r#"<div class="price">{}</div>"#,
            escape_html(&product.money(config.currency).display())
        ),
        PricePresentation::Contact { url, label } => format!(
            r#"<a href="{}" class="contact-button" target="_blank" rel="noopener"><div class="btn btn-outline">{}</div></a>"#,
            escape_html(url),
            escape_html(label)
        ),
    };

    let group = |title: &str, class: &str, badge: &str, values: Vec<&str>| {
        if values.is_empty() {
            return String::new();
        }
        let items: String = values
            .iter()
            .map(|v| format!(r#"<span class="badge {badge}">{}</span>"#, escape_html(v)))
            .collect();
        format!(r#"<div class="{class}"><h4>{title}</h4>{items}</div>"#)
    };
    let categories = group(
        "Categorías",
        "product-category-tags",
        "badge-category",
        product.categories.iter().map(String::as_str).collect(),
    );
    let brands = group(
        "Marcas",
        "product-brand-tags",
        "badge-brand",
        product.brand_tags().collect(),
    );

    let sku = product
        .sku
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!(r#"<div class="product-detail-sku"><strong>SKU:</strong> {}</div>"#, escape_html(s)))
        .unwrap_or_default();
    let stock = product
        .stock
        .filter(|s| *s != 0)
        .map(|s| format!(r#"<div class="product-detail-stock"><strong>Stock:</strong> {s}</div>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="product-detail-container">
    <div class="product-detail-image">
        <img src="{image}" alt="{name}" class="product-detail-image" data-fallback="{placeholder}">
    </div>
    <div class="product-detail-info">
        {price}
        <div class="product-detail-description"><p>{description}</p></div>
        <div class="product-detail-tags">{categories}{brands}</div>
        {sku}
        {stock}
    </div>
</div>"#,
        image = escape_html(product.image_src(&config.placeholder)),
        placeholder = escape_html(&config.placeholder),
        description = escape_html(&product.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        let mut p = Product::new(3, "Taza Zelda", 4990.0)
            .with_description("Taza de cerámica")
            .with_category("Tazas")
            .with_tag("Nintendo")
            .with_tag("trending");
        p.sku = Some("TZ-01".into());
        p.stock = Some(0);
        p
    }

    #[test]
    fn test_close_paths() {
        let mut modal = DetailModal::new(DisplayConfig::default());

        modal.open(product());
        assert!(!modal.handle(&ModalEvent::Click(ClickTarget::Content)));
        assert!(!modal.handle(&ModalEvent::key("Enter")));
        assert!(modal.is_open());
        assert!(modal.handle(&ModalEvent::key("Escape")));
        assert!(!modal.is_open());

        modal.open(product());
        assert!(modal.handle(&ModalEvent::Click(ClickTarget::Scrim)));

        modal.open(product());
        assert!(modal.handle(&ModalEvent::CloseButton));
        assert!(!modal.handle(&ModalEvent::CloseButton));
    }

    #[test]
    fn test_repeated_opens_do_not_stack_listeners() {
        let mut modal = DetailModal::new(DisplayConfig::default());
        for _ in 0..5 {
            modal.open(product());
            assert_eq!(modal.registered_listeners(), 2);
        }
        modal.open(Product::new(4, "Otro", 1.0));
        assert_eq!(modal.title(), Some("Otro"));
        assert_eq!(modal.registered_listeners(), 2);

        modal.close();
        assert_eq!(modal.registered_listeners(), 0);
        assert!(modal.markup().is_empty());
    }

    #[test]
    fn test_detail_markup() {
        let html = render_detail(&product(), &PricePresentation::Price, &DisplayConfig::default());
        assert!(html.contains("$4.990 CLP"));
        assert!(html.contains("Categorías"));
        assert!(html.contains("Marcas"));
        assert!(html.contains("TZ-01"));
        assert!(!html.contains("Stock:"), "zero stock is hidden");
        assert!(!html.contains(r#"badge-brand">trending"#));
    }

    #[test]
    fn test_contact_presentation_replaces_price() {
        let config = DisplayConfig {
            contact: Some(ContactLink {
                url: "https://instagram.com/tienda".into(),
                label: "Comprar".into(),
            }),
            ..DisplayConfig::default()
        };
        let mut p = product();
        p.stock = Some(4);

        let mut modal = DetailModal::new(config);
        modal.open(p);
        let html = modal.markup();
        assert!(html.contains("https://instagram.com/tienda"));
        assert!(html.contains("Comprar"));
        assert!(!html.contains("4.990"));
        assert!(html.contains("<strong>Stock:</strong> 4"));
    }
}
