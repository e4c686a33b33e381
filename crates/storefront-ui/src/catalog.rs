//! Catalog page controller.

use storefront_catalog::{
    sort_products, Facets, FilterEngine, FilterSet, Product, ProductFeed, SearchTerm, SortKey,
    SortOption,
};
use storefront_data::FeedSource;

use crate::carousel::{Carousel, CarouselConfig};
use crate::modal::DetailModal;
use crate::render::{DisplayConfig, ProductGrid};

/// Shown when the feed has no products at all.
pub const EMPTY_CATALOG_MESSAGE: &str = "No hay productos disponibles por el momento.";
/// Shown when the current search and filters match nothing.
pub const NO_RESULTS_MESSAGE: &str = "No se encontraron productos que coincidan con tu búsqueda o filtros.";
/// Label of the retry control on the error panel.
pub const RETRY_LABEL: &str = "Reintentar";

/// Where the page is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// One checkbox in a filter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

/// The search, filter and sort controls as currently set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControls {
    pub search: String,
    pub tags: Vec<FilterOption>,
    pub categories: Vec<FilterOption>,
    pub sort: SortOption,
    /// Whether the "clear filters" control is offered.
    pub can_clear: bool,
}

/// What the page should display.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView<'a> {
    Loading,
    Error { message: String, retry_label: &'static str },
    Empty { message: &'static str },
    Results { cards: &'a [Product], markup: &'a str, controls: FilterControls },
    NoResults { message: &'static str, controls: FilterControls },
}

/// State of the public catalog page.
#[derive(Debug)]
pub struct CatalogPage {
    state: LoadState,
    feed: ProductFeed,
    term: SearchTerm,
    filters: FilterSet,
    sort: SortOption,
    engine: FilterEngine,
    grid: ProductGrid,
    modal: DetailModal,
    facets: Facets,
    controls_built: u64,
    config: DisplayConfig,
}

impl CatalogPage {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            state: LoadState::Idle,
            feed: ProductFeed::empty(),
            term: SearchTerm::default(),
            filters: FilterSet::new(),
            sort: SortOption::default(),
            engine: FilterEngine::new(),
            grid: ProductGrid::new(),
            modal: DetailModal::new(config.clone()),
            facets: Facets::default(),
            controls_built: 0,
            config,
        }
    }

    /// Fetch the feed and show it. Failures land in [`LoadState::Failed`].
    pub async fn load<S: FeedSource + ?Sized>(&mut self, source: &S) {
        self.state = LoadState::Loading;
        self.grid.clear();

        match source.fetch_products().await {
            Ok(feed) => {
                if let Err(e) = feed.validate() {
                    tracing::warn!(error = %e, "feed failed validation");
                }
                self.facets = Facets::from_products(feed.products());
                self.controls_built += 1;
                // Selections for values that no longer exist would hide everything.
                self.filters.tags.retain(|t| self.facets.tags.contains(t));
                self.filters
                    .categories
                    .retain(|c| self.facets.categories.contains(c));
                self.feed = feed;
                self.state = LoadState::Ready;
                self.refresh();
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog load failed");
                self.state = LoadState::Failed(format!(
                    "No se pudieron cargar los productos. {}",
                    e.user_message()
                ));
            }
        }
    }

    /// Manual retry from the error panel.
    pub async fn retry<S: FeedSource + ?Sized>(&mut self, source: &S) {
        self.load(source).await
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.term = SearchTerm::new(term);
        self.refresh();
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.filters.toggle_tag(tag);
        self.refresh();
        selected
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        let selected = self.filters.toggle_category(category);
        self.refresh();
        selected
    }

    /// Replace the whole selection at once.
    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.refresh();
    }

    /// Reset term, filters and the memoized result.
    pub fn clear_filters(&mut self) {
        self.term = SearchTerm::default();
        self.filters.clear();
        self.engine.invalidate();
        self.refresh();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort = self.sort.toggled();
        self.refresh();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort.key = key;
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
        self.refresh();
    }

    fn refresh(&mut self) {
        if self.state != LoadState::Ready || self.feed.is_empty() {
            self.grid.clear();
            return;
        }
        let matched = self.engine.filter(&self.feed, &self.term, &self.filters);
        let ordered = sort_products(&matched, self.sort);
        self.grid.render(&ordered, &self.config);
    }

    fn controls(&self) -> FilterControls {
        let options = |values: &[String], selected: &std::collections::BTreeSet<String>| {
            values
                .iter()
                .map(|v| FilterOption {
                    value: v.clone(),
                    selected: selected.contains(v),
                })
                .collect::<Vec<_>>()
        };
        FilterControls {
            search: self.term.as_str().to_string(),
            tags: options(&self.facets.tags, &self.filters.tags),
            categories: options(&self.facets.categories, &self.filters.categories),
            sort: self.sort,
            can_clear: !self.term.is_empty() || !self.filters.is_empty(),
        }
    }

    pub fn view(&self) -> CatalogView<'_> {
        match &self.state {
            LoadState::Idle | LoadState::Loading => CatalogView::Loading,
            LoadState::Failed(message) => CatalogView::Error {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            },
            LoadState::Ready if self.feed.is_empty() => CatalogView::Empty {
                message: EMPTY_CATALOG_MESSAGE,
            },
            LoadState::Ready if self.grid.is_empty() => CatalogView::NoResults {
                message: NO_RESULTS_MESSAGE,
                controls: self.controls(),
            },
            LoadState::Ready => CatalogView::Results {
                cards: self.grid.products(),
                markup: self.grid.markup(),
                controls: self.controls(),
            },
        }
    }

    /// Open the modal for the card at `index` of the current render.
    pub fn open_details(&mut self, index: usize) -> Option<&Product> {
        let product = self.grid.details(index)?.clone();
        self.modal.open(product);
        self.modal.product()
    }

    /// Build a carousel over the currently loaded feed.
    pub fn trending(&self, config: CarouselConfig, viewport_width: u32, container_width: f64) -> Carousel {
        let mut carousel = Carousel::new(config, viewport_width, container_width);
        carousel.load(self.feed.products());
        carousel
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn feed(&self) -> &ProductFeed {
        &self.feed
    }

    /// Cards in display order.
    pub fn results(&self) -> &[Product] {
        self.grid.products()
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// How many times the filter controls have been built.
    pub fn controls_built(&self) -> u64 {
        self.controls_built
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn modal(&self) -> &DetailModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut DetailModal {
        &mut self.modal
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use storefront_catalog::SortDirection;
    use storefront_data::FetchError;

    use super::*;

    /// Answers with queued results, then repeats the last one.
    struct FakeFeed {
        queue: Mutex<Vec<Result<Vec<Product>, String>>>,
    }

    impl FakeFeed {
        fn new(results: Vec<Result<Vec<Product>, String>>) -> Self {
            Self {
                queue: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl FeedSource for FakeFeed {
        async fn fetch_products(&self) -> Result<ProductFeed, FetchError> {
            let mut queue = self.queue.lock().unwrap();
            let next = if queue.len() > 1 { queue.remove(0) } else { queue[0].clone() };
            next.map(ProductFeed::new).map_err(FetchError::Connection)
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new(1, "Funko Goku", 12990.0).with_tag("Funko").with_category("Figuras"),
            Product::new(2, "Taza Zelda", 4990.0).with_tag("Nintendo").with_category("Tazas"),
            Product::new(3, "Funko Link", 13990.0)
                .with_tag("Funko")
                .with_tag("Nintendo")
                .with_category("Figuras"),
        ]
    }

    fn names(page: &CatalogPage) -> Vec<&str> {
        page.results().iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_and_filter() {
        let mut page = CatalogPage::new(DisplayConfig::default());
        assert_eq!(page.view(), CatalogView::Loading);

        page.load(&FakeFeed::new(vec![Ok(products())])).await;
        assert_eq!(names(&page), vec!["Funko Goku", "Funko Link", "Taza Zelda"]);
        assert_eq!(page.facets().tags, vec!["Funko", "Nintendo"]);

        page.toggle_tag("Nintendo");
        assert_eq!(names(&page), vec!["Funko Link", "Taza Zelda"]);
        page.toggle_category("Figuras");
        assert_eq!(names(&page), vec!["Funko Link"]);

        page.toggle_sort_direction();
        page.clear_filters();
        assert_eq!(page.sort().direction, SortDirection::Descending);
        assert_eq!(names(&page), vec!["Taza Zelda", "Funko Link", "Funko Goku"]);
    }

    #[tokio::test]
    async fn test_set_filters_replaces_selection() {
        let mut page = CatalogPage::new(DisplayConfig::default());
        page.load(&FakeFeed::new(vec![Ok(products())])).await;

        page.set_filters(FilterSet::new().with_tag("Funko").with_tag("Funko"));
        assert_eq!(page.filters().tags.len(), 1);
        assert_eq!(names(&page), vec!["Funko Goku", "Funko Link"]);

        page.set_filters(FilterSet::new().with_category("Tazas"));
        assert!(page.filters().tags.is_empty());
        assert_eq!(names(&page), vec!["Taza Zelda"]);
    }

    #[tokio::test]
    async fn test_sort_by_price() {
        let mut page = CatalogPage::new(DisplayConfig::default());
        page.load(&FakeFeed::new(vec![Ok(products())])).await;
        page.set_sort_key(SortKey::Price);
        assert_eq!(names(&page), vec!["Taza Zelda", "Funko Goku", "Funko Link"]);
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let feed = FakeFeed::new(vec![Err("refused".into()), Ok(products())]);
        let mut page = CatalogPage::new(DisplayConfig::default());

        page.load(&feed).await;
        match page.view() {
            CatalogView::Error { message, retry_label } => {
                assert!(message.contains("No se pudo establecer conexión"));
                assert_eq!(retry_label, RETRY_LABEL);
            }
            other => panic!("expected error view, got {other:?}"),
        }

        page.retry(&feed).await;
        assert!(matches!(page.view(), CatalogView::Results { .. }));
    }

    #[tokio::test]
    async fn test_repeated_search_uses_memo() {
        let mut page = CatalogPage::new(DisplayConfig::default());
        page.load(&FakeFeed::new(vec![Ok(products())])).await;

        page.set_search_term("funko");
        let misses = page.engine().misses();
        page.toggle_sort_direction();
        page.toggle_sort_direction();
        assert_eq!(page.engine().misses(), misses);
        assert!(page.engine().hits() >= 2);
    }

    #[tokio::test]
    async fn test_open_details_uses_display_position() {
        let mut page = CatalogPage::new(DisplayConfig::default());
        page.load(&FakeFeed::new(vec![Ok(products())])).await;
        page.set_search_term("link");

        let opened = page.open_details(0).map(|p| p.id.get());
        assert_eq!(opened, Some(3));
        assert!(page.modal().is_open());
        assert!(page.open_details(1).is_none());
    }

    #[tokio::test]
    async fn test_reload_rebuilds_controls_and_drops_stale_selection() {
        let second = vec![Product::new(5, "Polera", 9990.0).with_tag("Marvel")];
        let feed = FakeFeed::new(vec![Ok(products()), Ok(second)]);
        let mut page = CatalogPage::new(DisplayConfig::default());

        page.load(&feed).await;
        page.toggle_tag("Funko");
        page.load(&feed).await;

        assert_eq!(page.controls_built(), 2);
        assert!(page.filters().is_empty());
        assert_eq!(names(&page), vec!["Polera"]);
    }
}
