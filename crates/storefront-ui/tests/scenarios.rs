//! End-to-end page scenarios over in-memory backends.

use std::sync::Mutex;

use async_trait::async_trait;
use storefront_cache::{AdminSession, LocalStore};
use storefront_catalog::{
    filter_products, sort_products, FilterSet, Product, ProductFeed, ProductId, SearchTerm, SortDirection,
    SortKey, SortOption,
};
use storefront_data::{CatalogApi, FeedSource, FetchError, FormField, ProductForm};
use storefront_ui::catalog::NO_RESULTS_MESSAGE;
use storefront_ui::{
    CarouselConfig, CatalogPage, CatalogView, DisplayConfig, ListState, LoginOutcome, NavState,
};

struct StaticFeed(Vec<Product>);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch_products(&self) -> Result<ProductFeed, FetchError> {
        Ok(ProductFeed::new(self.0.clone()))
    }
}

fn five_with_two_trending() -> Vec<Product> {
    vec![
        Product::new(1, "Funko Goku", 12990.0).with_tag("Funko").with_tag("trending"),
        Product::new(2, "Taza Zelda", 4990.0).with_tag("Nintendo"),
        Product::new(3, "Polera Spider-Man", 9990.0).with_tag("Marvel").with_category("Ropa"),
        Product::new(4, "Funko Link", 13990.0).with_tag("Funko").with_tag("trending"),
        Product::new(5, "Llavero Pikachu", 2990.0).with_tag("Pokemon"),
    ]
}

#[tokio::test]
async fn empty_feed_shows_empty_state_without_controls() {
    let mut page = CatalogPage::new(DisplayConfig::default());
    page.load(&StaticFeed(vec![])).await;

    assert!(matches!(page.view(), CatalogView::Empty { .. }));
    assert!(page.facets().is_empty());

    let carousel = page.trending(CarouselConfig::default(), 1200, 900.0);
    assert_eq!(carousel.nav_state(), NavState::Hidden);
}

#[tokio::test]
async fn carousel_shows_only_trending_while_list_shows_all() {
    let feed = StaticFeed(five_with_two_trending());
    let mut page = CatalogPage::new(DisplayConfig::default());
    page.load(&feed).await;

    match page.view() {
        CatalogView::Results { cards, .. } => assert_eq!(cards.len(), 5),
        other => panic!("expected results, got {other:?}"),
    }

    let mut carousel = storefront_ui::Carousel::new(CarouselConfig::default(), 1200, 900.0);
    assert_eq!(carousel.fetch(&feed).await.unwrap(), 2);
    let ids: Vec<i64> = carousel.items().iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[tokio::test]
async fn page_results_match_plain_filter_and_sort() {
    let products = five_with_two_trending();
    let mut page = CatalogPage::new(DisplayConfig::default());
    page.load(&StaticFeed(products.clone())).await;

    let sort = SortOption::new(SortKey::Price, SortDirection::Descending);
    page.set_search_term("funko");
    page.set_filters(FilterSet::new().with_tag("Funko"));
    page.set_sort(sort);

    let expected = sort_products(
        &filter_products(&products, &SearchTerm::new("funko"), &FilterSet::new().with_tag("Funko")),
        sort,
    );
    assert_eq!(page.results(), expected.as_slice());
    let names: Vec<&str> = expected.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Funko Link", "Funko Goku"]);
}

#[tokio::test]
async fn search_without_matches_keeps_controls() {
    let mut page = CatalogPage::new(DisplayConfig::default());
    page.load(&StaticFeed(five_with_two_trending())).await;
    page.set_search_term("batman");

    match page.view() {
        CatalogView::NoResults { message, controls } => {
            assert_eq!(message, NO_RESULTS_MESSAGE);
            assert_eq!(controls.search, "batman");
            assert!(controls.can_clear);
            assert_eq!(controls.tags.len(), 4);
        }
        other => panic!("expected no results, got {other:?}"),
    }

    // Controls still work.
    page.toggle_tag("Marvel");
    page.set_search_term("");
    assert_eq!(page.results().len(), 1);
}

#[test]
fn resize_to_wider_view_clamps_index() {
    let trending: Vec<Product> = (1..=3)
        .map(|i| Product::new(i, format!("T{i}"), 1.0).with_tag("trending"))
        .collect();
    let mut carousel = storefront_ui::Carousel::new(CarouselConfig::default(), 400, 380.0);
    carousel.load(&trending);
    carousel.advance();
    carousel.advance();
    assert_eq!(carousel.index(), 2);

    carousel.resize(1280, 1140.0);
    assert_eq!(carousel.index(), carousel.max_start());
    assert_eq!(carousel.index(), 0);

    carousel.resize(400, 380.0);
    carousel.retreat();
    assert_eq!(carousel.index(), 2);
}

/// Records the multipart fields each update would send.
#[derive(Default)]
struct RecordingApi {
    updates: Mutex<Vec<(ProductId, Vec<&'static str>)>>,
}

#[async_trait]
impl CatalogApi for RecordingApi {
    async fn authenticate(&self, _password: &str) -> Result<bool, FetchError> {
        Ok(true)
    }

    async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        Ok(vec![Product::new(7, "Funko Vegeta", 12990.0)
            .with_image("/uploads/vegeta.png")
            .with_tag("Funko")])
    }

    async fn create_product(&self, _form: &ProductForm) -> Result<(), FetchError> {
        Ok(())
    }

    async fn update_product(&self, id: ProductId, form: &ProductForm) -> Result<(), FetchError> {
        let names = form.fields().iter().map(FormField::name).collect();
        self.updates.lock().unwrap().push((id, names));
        Ok(())
    }

    async fn delete_product(&self, _id: ProductId) -> Result<(), FetchError> {
        Ok(())
    }
}

#[tokio::test]
async fn edit_without_new_image_omits_image_field() {
    let dir = tempfile::tempdir().unwrap();
    let session = AdminSession::new(LocalStore::open(dir.path().join("session.json")).unwrap());
    let mut page = storefront_ui::AdminPage::new(RecordingApi::default(), session, DisplayConfig::default());

    assert_eq!(page.login("whatever").await, LoginOutcome::Unlocked);
    assert!(matches!(page.list(), ListState::Table(_)));
    assert!(page.open_edit(ProductId::new(7)));

    let mut form = page.form().unwrap().initial.clone();
    form.price = 11990.0;
    assert!(page.submit(form).await);

    let updates = page.api().updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    let (id, fields) = &updates[0];
    assert_eq!(id.get(), 7);
    assert!(!fields.contains(&"image"));
    assert!(fields.contains(&"price"));
}
