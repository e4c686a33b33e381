//! Catalog browsing commands.

use anyhow::{bail, Result};
use storefront_catalog::{FilterSet, SortDirection, SortOption};
use storefront_ui::{CatalogPage, CatalogView, PricePresentation};

use super::{BrowseArgs, QueryArgs, ShowArgs};
use crate::context::Context;
use crate::output::{fit, tags_line};

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let page = load_page(&args.query, ctx).await?;

    match page.view() {
        CatalogView::Loading => bail!("El catálogo no terminó de cargar"),
        CatalogView::Error { message, retry_label } => {
            bail!("{message} ({retry_label}: vuelve a ejecutar el comando)")
        }
        CatalogView::Empty { message } => {
            if ctx.output.is_json() {
                ctx.output.json(&Vec::<()>::new());
            }
            ctx.output.info(message);
        }
        CatalogView::NoResults { message, controls } => {
            if ctx.output.is_json() {
                ctx.output.json(&Vec::<()>::new());
                return Ok(());
            }
            ctx.output.warn(message);
            let tags: Vec<&str> = controls.tags.iter().map(|o| o.value.as_str()).collect();
            let categories: Vec<&str> = controls.categories.iter().map(|o| o.value.as_str()).collect();
            ctx.output.kv("Marcas", &tags.join(", "));
            ctx.output.kv("Categorías", &categories.join(", "));
        }
        CatalogView::Results { cards, markup, controls } => {
            if ctx.output.is_json() {
                ctx.output.json(&cards);
                return Ok(());
            }
            if args.html {
                ctx.output.raw(markup);
                return Ok(());
            }

            let direction = if controls.sort.direction.is_ascending() { "↑" } else { "↓" };
            ctx.output.header(&format!(
                "{} productos · {} {}",
                cards.len(),
                controls.sort.key.display_name(),
                direction
            ));
            let widths = [4, 32, 14, 30];
            ctx.output.table_row(&["#", "Nombre", "Precio", "Etiquetas"], &widths);
            for (i, product) in cards.iter().enumerate() {
                let price = product.money(ctx.config.display.currency).display();
                ctx.output.table_row(
                    &[
                        i.to_string().as_str(),
                        fit(&product.name, 32).as_str(),
                        price.as_str(),
                        tags_line(product).as_str(),
                    ],
                    &widths,
                );
            }
        }
    }

    Ok(())
}

/// Run the show command.
pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let mut page = load_page(&args.query, ctx).await?;
    if let CatalogView::Error { message, .. } = page.view() {
        bail!("{message}");
    }

    let total = page.results().len();
    let Some(product) = page.open_details(args.index).cloned() else {
        bail!("No hay un producto en la posición {} ({} resultados)", args.index, total);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }
    if args.html {
        ctx.output.raw(page.modal().markup());
        return Ok(());
    }

    ctx.output.header(&product.name);
    match PricePresentation::from_config(&ctx.config.display) {
        PricePresentation::Price => {
            ctx.output.kv("Precio", &product.money(ctx.config.display.currency).display())
        }
        PricePresentation::Contact { url, label } => ctx.output.kv(&label, &url),
    }
    if !product.description.is_empty() {
        ctx.output.kv("Descripción", &product.description);
    }
    if !product.categories.is_empty() {
        ctx.output.kv("Categorías", &product.categories.join(", "));
    }
    let brands: Vec<&str> = product.brand_tags().collect();
    if !brands.is_empty() {
        ctx.output.kv("Marcas", &brands.join(", "));
    }
    ctx.output.kv("Imagen", product.image_src(&ctx.config.display.placeholder));
    if let Some(sku) = product.sku.as_deref().filter(|s| !s.is_empty()) {
        ctx.output.kv("SKU", sku);
    }
    if let Some(stock) = product.stock.filter(|s| *s != 0) {
        ctx.output.kv("Stock", &stock.to_string());
    }
    Ok(())
}

/// Fetch the feed and apply the query, as the page would on user input.
async fn load_page(query: &QueryArgs, ctx: &Context) -> Result<CatalogPage> {
    let client = ctx.feed_client()?;
    let mut page = CatalogPage::new(ctx.config.display.clone());

    let spinner = ctx.output.spinner("Cargando productos...");
    page.load(&client).await;
    spinner.finish_and_clear();
    ctx.output.detail("feed", client.url());
    ctx.output.detail("productos", &page.feed().len().to_string());

    apply_query(&mut page, query);
    ctx.output.detail(
        "memo",
        &format!("{} aciertos, {} fallos", page.engine().hits(), page.engine().misses()),
    );
    Ok(page)
}

/// Selection named on the command line. Repeating a value keeps it selected.
fn query_filters(query: &QueryArgs) -> FilterSet {
    let filters = query
        .tags
        .iter()
        .fold(FilterSet::new(), |filters, tag| filters.with_tag(tag.as_str()));
    query
        .categories
        .iter()
        .fold(filters, |filters, category| filters.with_category(category.as_str()))
}

fn apply_query(page: &mut CatalogPage, query: &QueryArgs) {
    page.set_filters(query_filters(query));
    let direction = if query.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    page.set_sort(SortOption::new(query.sort.into(), direction));
    if let Some(term) = &query.search {
        page.set_search_term(term);
    }
}
