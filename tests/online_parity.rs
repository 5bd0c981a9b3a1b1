//! Online/offline parity tests
//!
//! Seeds the same records into a live MongoDB deployment and into the
//! offline store, then checks that every query agrees. Set
//! `BOOKSTORE_TEST_MONGODB_URI` to run them; without it each test returns
//! immediately.

use bookstore::query::{BookStore, PriceOrder};
use bookstore::seed::seed;
use bookstore::storage::dataset;
use bookstore::{Book, Config, MongoStore, OfflineStore};
use std::path::PathBuf;

const TEST_DATABASE: &str = "bookstore_parity_tests";

/// Connect to the test deployment, one collection per test
async fn live_store(collection: &str) -> Option<MongoStore> {
    let uri = std::env::var("BOOKSTORE_TEST_MONGODB_URI").ok()?;
    let config = Config {
        uri,
        database: TEST_DATABASE.to_string(),
        collection: collection.to_string(),
        ..Config::default()
    };
    Some(MongoStore::connect(&config).await.expect("Failed to connect to test deployment"))
}

async fn sample_books() -> Vec<Book> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/books.json");
    dataset::load(&path).await.expect("Failed to load sample dataset")
}

/// Seed both stores with the sample dataset
async fn seeded_pair(collection: &str) -> Option<(MongoStore, OfflineStore)> {
    let mut online = live_store(collection).await?;
    let mut offline = OfflineStore::default();
    let books = sample_books().await;

    seed(&mut online, &books).await.expect("Failed to seed MongoDB");
    seed(&mut offline, &books).await.expect("Failed to seed offline store");
    Some((online, offline))
}

/// Natural order is not part of the contract, so compare as sorted lists
fn by_title(mut books: Vec<Book>) -> Vec<Book> {
    books.sort_by(|a, b| a.title.cmp(&b.title));
    books
}

#[tokio::test]
async fn test_finds_agree() {
    let Some((online, offline)) = seeded_pair("finds").await else {
        return;
    };

    assert_eq!(
        by_title(online.find_by_genre("Fiction").await.unwrap()),
        by_title(offline.find_by_genre("Fiction").await.unwrap())
    );
    assert_eq!(
        by_title(online.find_after_year(1950).await.unwrap()),
        by_title(offline.find_after_year(1950).await.unwrap())
    );
    assert_eq!(
        by_title(online.find_by_author("George Orwell").await.unwrap()),
        by_title(offline.find_by_author("George Orwell").await.unwrap())
    );
    assert_eq!(
        by_title(online.in_stock_after_2010().await.unwrap()),
        by_title(offline.in_stock_after_2010().await.unwrap())
    );

    online.close().await;
}

#[tokio::test]
async fn test_ordering_and_pages_agree() {
    let Some((online, offline)) = seeded_pair("ordering").await else {
        return;
    };

    for order in [PriceOrder::Ascending, PriceOrder::Descending] {
        assert_eq!(
            online.sort_by_price(order).await.unwrap(),
            offline.sort_by_price(order).await.unwrap()
        );
    }
    for page in 1..=4 {
        assert_eq!(
            online.paginate(page, 5).await.unwrap(),
            offline.paginate(page, 5).await.unwrap()
        );
    }

    let mut projected = online.projection().await.unwrap();
    let mut expected = offline.projection().await.unwrap();
    projected.sort_by(|a, b| a.title.cmp(&b.title));
    expected.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(projected, expected);

    online.close().await;
}

#[tokio::test]
async fn test_aggregations_agree() {
    let Some((online, offline)) = seeded_pair("aggregations").await else {
        return;
    };

    let live = online.average_price_by_genre().await.unwrap();
    let local = offline.average_price_by_genre().await.unwrap();
    assert_eq!(live.len(), local.len());
    for (a, b) in live.iter().zip(&local) {
        assert_eq!(a.genre, b.genre);
        assert_eq!(a.count, b.count);
        assert!((a.average_price - b.average_price).abs() < 1e-9);
    }

    assert_eq!(
        online.author_with_most_books().await.unwrap(),
        offline.author_with_most_books().await.unwrap()
    );
    assert_eq!(
        online.group_by_decade().await.unwrap(),
        offline.group_by_decade().await.unwrap()
    );

    online.close().await;
}

#[tokio::test]
async fn test_mutations_agree() {
    let Some((mut online, mut offline)) = seeded_pair("mutations").await else {
        return;
    };

    assert_eq!(
        online.update_price("1984", 12.49).await.unwrap(),
        offline.update_price("1984", 12.49).await.unwrap()
    );
    assert_eq!(
        online.update_price("Missing", 1.0).await.unwrap(),
        offline.update_price("Missing", 1.0).await.unwrap()
    );
    assert_eq!(
        online.delete_by_title("Animal Farm").await.unwrap(),
        offline.delete_by_title("Animal Farm").await.unwrap()
    );
    assert_eq!(
        by_title(online.find_all().await.unwrap()),
        by_title(offline.find_all().await.unwrap())
    );

    let ack = online.create_title_index().await.unwrap();
    assert_eq!(ack.name, "idx_title_asc");
    assert!(!ack.simulated);
    assert!(!online.explain_title_query().await.unwrap().simulated);

    online.close().await;
}
