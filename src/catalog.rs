//! The fixed query catalog
//!
//! Runs the demonstration sequence in order against any store and collects
//! every result into a [`CatalogReport`]. Rendering is left to the caller.

use crate::config::Mode;
use crate::query::{
    AuthorBookCount, BookStore, DecadeCount, DeleteOutcome, ExplainReport, GenrePriceStats,
    IndexAck, PriceOrder, UpdateOutcome,
};
use crate::storage::book::{Book, BookSummary};
use crate::Result;
use serde::Serialize;

/// Genre counted in the CRUD section
pub const SAMPLE_GENRE: &str = "Fiction";
/// Year counted in the CRUD section
pub const SAMPLE_YEAR: i32 = 1950;
pub const SAMPLE_AUTHOR: &str = "George Orwell";
/// Title whose price is updated
pub const SAMPLE_UPDATE: (&str, f64) = ("1984", 12.49);
/// Title that is deleted; absent from the sample data, so a no-op
pub const SAMPLE_DELETE: &str = "Non-Existing Title";
/// Books shown from each end of the price ordering
pub const SORT_PREVIEW: usize = 3;
pub const PAGE_SIZE: u64 = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrudSection {
    pub genre_matches: usize,
    pub after_year_matches: usize,
    pub author_matches: usize,
    pub update: UpdateOutcome,
    pub delete: DeleteOutcome,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdvancedSection {
    pub in_stock_after_2010: Vec<Book>,
    pub projection: Vec<BookSummary>,
    pub cheapest: Vec<Book>,
    pub most_expensive: Vec<Book>,
    pub page_one: Vec<Book>,
    pub page_two: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregationSection {
    pub average_price_by_genre: Vec<GenrePriceStats>,
    pub author_with_most_books: Option<AuthorBookCount>,
    pub books_by_decade: Vec<DecadeCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexingSection {
    pub title_index: IndexAck,
    pub author_year_index: IndexAck,
    pub explain: ExplainReport,
}

/// Everything one catalog run produced
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogReport {
    pub mode: Mode,
    pub crud: CrudSection,
    pub advanced: AdvancedSection,
    pub aggregations: AggregationSection,
    pub indexing: IndexingSection,
}

/// Run the whole catalog; the first failing operation aborts the run
pub async fn run<S: BookStore>(store: &mut S) -> Result<CatalogReport> {
    let mode = store.mode();
    tracing::info!(%mode, "running query catalog");

    let crud = run_crud(store).await?;
    let advanced = run_advanced(store).await?;
    let aggregations = AggregationSection {
        average_price_by_genre: store.average_price_by_genre().await?,
        author_with_most_books: store.author_with_most_books().await?,
        books_by_decade: store.group_by_decade().await?,
    };
    let indexing = IndexingSection {
        title_index: store.create_title_index().await?,
        author_year_index: store.create_author_year_index().await?,
        explain: store.explain_title_query().await?,
    };

    Ok(CatalogReport {
        mode,
        crud,
        advanced,
        aggregations,
        indexing,
    })
}

async fn run_crud<S: BookStore>(store: &mut S) -> Result<CrudSection> {
    let genre_matches = store.find_by_genre(SAMPLE_GENRE).await?.len();
    let after_year_matches = store.find_after_year(SAMPLE_YEAR).await?.len();
    let author_matches = store.find_by_author(SAMPLE_AUTHOR).await?.len();

    let (title, price) = SAMPLE_UPDATE;
    let update = store.update_price(title, price).await?;
    if update.matched == 0 {
        tracing::warn!(title, "price update matched no book");
    }

    let delete = store.delete_by_title(SAMPLE_DELETE).await?;
    tracing::debug!(title = SAMPLE_DELETE, deleted = delete.deleted, "delete by title");

    Ok(CrudSection {
        genre_matches,
        after_year_matches,
        author_matches,
        update,
        delete,
    })
}

async fn run_advanced<S: BookStore>(store: &S) -> Result<AdvancedSection> {
    let mut cheapest = store.sort_by_price(PriceOrder::Ascending).await?;
    cheapest.truncate(SORT_PREVIEW);
    let mut most_expensive = store.sort_by_price(PriceOrder::Descending).await?;
    most_expensive.truncate(SORT_PREVIEW);

    Ok(AdvancedSection {
        in_stock_after_2010: store.in_stock_after_2010().await?,
        projection: store.projection().await?,
        cheapest,
        most_expensive,
        page_one: store.paginate(1, PAGE_SIZE).await?,
        page_two: store.paginate(2, PAGE_SIZE).await?,
    })
}
