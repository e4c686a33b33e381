//! Card and table markup.

use serde::{Deserialize, Serialize};
use storefront_catalog::{Currency, Product, DEFAULT_PLACEHOLDER};

/// Default card description length, in characters.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 120;

/// Label of the per-card details action.
pub const DETAILS_LABEL: &str = "Detalles";

/// Where buyers are sent instead of seeing a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub url: String,
    pub label: String,
}

/// Presentation settings shared by every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency: Currency,
    pub placeholder: String,
    pub description_limit: usize,
    /// When set, detail views replace the price with this link.
    pub contact: Option<ContactLink>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            contact: None,
        }
    }
}

/// Which page a card is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    /// Listing grid: badges, short description, details keyed by position.
    Catalog,
    /// Carousel slide: image, badge, name, price, details keyed by id.
    Carousel,
}

/// Escape text for interpolation into markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Cut `text` to at most `limit` characters, appending `...` when cut.
pub fn truncate_description(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => format!("{}...", text[..byte].trim_end()),
        None => text.to_string(),
    }
}

fn badges(values: impl IntoIterator<Item = impl AsRef<str>>, class: &str) -> String {
    values
        .into_iter()
        .map(|v| format!(r#"<span class="badge {class}">{}</span>"#, escape_html(v.as_ref())))
        .collect::<Vec<_>>()
        .join("")
}

fn trending_badge(product: &Product) -> &'static str {
    if product.is_trending() {
        r#"<div class="product-badge badge badge-new">Trending</div>"#
    } else {
        ""
    }
}

/// Render one product card.
///
/// `index` is the card's position in the list being rendered; catalog
/// cards key their details action on it.
pub fn render_card(product: &Product, index: usize, variant: CardVariant, config: &DisplayConfig) -> String {
    let name = escape_html(&product.name);
    let image = escape_html(product.image_src(&config.placeholder));
    let placeholder = escape_html(&config.placeholder);

    match variant {
        CardVariant::Catalog => {
            let description = escape_html(&truncate_description(
                &product.description,
                config.description_limit,
            ));
            format!(
                r#"<div class="card product-card" data-index="{index}">
    {badge}
    <div class="card-img-container">
        <img src="{image}" alt="{name}" class="card-img" data-fallback="{placeholder}">
    </div>
    <div class="card-body">
        <h3 class="card-title">{name}</h3>
        <p class="card-text">{description}</p>
        <div class="product-tags">{categories}{tags}</div>
    </div>
    <div class="card-footer">
        <button class="btn btn-outline btn-sm details-button" data-product-index="{index}">{DETAILS_LABEL}</button>
    </div>
</div>"#,
                badge = trending_badge(product),
                categories = badges(&product.categories, "badge-category"),
                tags = badges(product.brand_tags(), "badge-brand"),
            )
        }
        CardVariant::Carousel => format!(
            r#"<div class="carousel-slide" data-product-id="{id}">
    <div class="card product-card">
        <div class="card-img-container">
            <img src="{image}" alt="{name}" class="card-img" data-fallback="{placeholder}">
            {badge}
        </div>
        <div class="card-body">
            <h3 class="card-title">{name}</h3>
            <div class="price">{price}</div>
        </div>
        <div class="card-footer">
            <button class="btn btn-outline btn-sm details-button" data-product-id="{id}">{DETAILS_LABEL}</button>
        </div>
    </div>
</div>"#,
            id = product.id,
            badge = trending_badge(product),
            price = escape_html(&product.money(config.currency).display()),
        ),
    }
}

/// Render one row of the admin products table.
pub fn render_admin_row(product: &Product, config: &DisplayConfig) -> String {
    let id = product.id;
    format!(
        r#"<tr data-id="{id}">
    <td>{id}</td>
    <td><img src="{image}" alt="{name}" class="product-thumbnail"></td>
    <td>{name}</td>
    <td>{price}</td>
    <td><div class="product-categories">{categories}</div></td>
    <td><div class="product-tags">{tags}</div></td>
    <td class="table-actions">
        <button class="btn btn-sm btn-outline edit-product" data-id="{id}">Editar</button>
        <button class="btn btn-sm btn-danger delete-product" data-id="{id}">Eliminar</button>
    </td>
</tr>"#,
        image = escape_html(product.image_src(&config.placeholder)),
        name = escape_html(&product.name),
        price = escape_html(&product.money(config.currency).display_code()),
        categories = badges(&product.categories, "badge-category"),
        tags = badges(&product.tags, "badge-brand"),
    )
}

/// Retained product grid.
///
/// Each render replaces the held list and markup wholesale. Details actions
/// resolve against the latest render only, so there are no per-card bindings
/// to re-attach or leak.
#[derive(Debug, Default)]
pub struct ProductGrid {
    products: Vec<Product>,
    markup: String,
    renders: u64,
}

impl ProductGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grid contents.
    pub fn render(&mut self, products: &[Product], config: &DisplayConfig) -> &str {
        self.products = products.to_vec();
        self.markup = products
            .iter()
            .enumerate()
            .map(|(i, p)| render_card(p, i, CardVariant::Catalog, config))
            .collect::<Vec<_>>()
            .join("\n");
        self.renders += 1;
        tracing::trace!(cards = self.products.len(), renders = self.renders, "rendered grid");
        &self.markup
    }

    /// Drop the current contents.
    pub fn clear(&mut self) {
        self.products.clear();
        self.markup.clear();
    }

    /// Resolve a details action from the current render.
    pub fn details(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of render passes so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goku() -> Product {
        Product::new(7, "Funko <Goku>", 12990.0)
            .with_description("Figura de vinilo")
            .with_category("Figuras")
            .with_tag("Funko")
            .with_tag("trending")
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_description("corto", 120), "corto");
        assert_eq!(truncate_description("ñandú azul", 5), "ñandú...");
        let long = "a".repeat(130);
        let cut = truncate_description(&long, 120);
        assert_eq!(cut.chars().count(), 123);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_description(&"b".repeat(120), 120), "b".repeat(120));
    }

    #[test]
    fn test_catalog_card() {
        let html = render_card(&goku(), 3, CardVariant::Catalog, &DisplayConfig::default());
        assert!(html.contains("Funko &lt;Goku&gt;"));
        assert!(html.contains(r#"data-product-index="3""#));
        assert!(html.contains("badge-new"));
        assert!(html.contains(r#"<span class="badge badge-category">Figuras</span>"#));
        assert!(html.contains(r#"<span class="badge badge-brand">Funko</span>"#));
        assert!(!html.contains(r#"badge-brand">trending"#));
        assert!(html.contains(r#"src="placeholder.jpg""#));
    }

    #[test]
    fn test_carousel_card_shows_price() {
        let html = render_card(&goku().with_image("/img/goku.png"), 0, CardVariant::Carousel, &DisplayConfig::default());
        assert!(html.contains(r#"data-product-id="7""#));
        assert!(html.contains("$12.990 CLP"));
        assert!(html.contains(r#"src="/img/goku.png""#));
    }

    #[test]
    fn test_admin_row() {
        let html = render_admin_row(&goku(), &DisplayConfig::default());
        assert!(html.contains("CLP 12,990"));
        assert!(html.contains(r#"class="btn btn-sm btn-outline edit-product" data-id="7""#));
        assert!(html.contains(r#"class="btn btn-sm btn-danger delete-product" data-id="7""#));
    }

    #[test]
    fn test_grid_details_follow_latest_render() {
        let config = DisplayConfig::default();
        let a = Product::new(1, "A", 1.0);
        let b = Product::new(2, "B", 1.0);
        let mut grid = ProductGrid::new();

        grid.render(&[a.clone(), b.clone()], &config);
        assert_eq!(grid.details(1).map(|p| p.id.get()), Some(2));

        grid.render(&[b], &config);
        assert_eq!(grid.details(0).map(|p| p.id.get()), Some(2));
        assert!(grid.details(1).is_none());
        assert_eq!(grid.markup().matches("details-button").count(), 1);
        assert_eq!(grid.renders(), 2);
    }
}
