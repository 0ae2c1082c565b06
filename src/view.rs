// Client-side state container: record cache, filter state, derived counts

use crate::client::ApiClient;
use crate::format;
use crate::models::Book;
use crate::query::BookQuery;
use chrono::{DateTime, Local, NaiveDate};
use eyre::Result;
use tracing::debug;

/// A cached record plus its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBook {
    pub book: Book,
    /// Derived via [`format::relative_label`] at cache-fill time.
    pub created_label: String,
}

/// Current filter inputs and the derived counts.
///
/// The date bounds hold the raw user strings (`DD.MM.YY[YY]`); parsing
/// happens on every filter application so an unparseable bound simply acts
/// as absent. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search_text: String,
    pub total_count: usize,
    pub filtered_count: usize,
}

/// Owned view state: the full record cache, the filtered subset shown to the
/// user, and the filter inputs. Replaces the cache wholesale on reload.
#[derive(Debug, Default)]
pub struct BookViewModel {
    books: Vec<DisplayBook>,
    filtered: Vec<DisplayBook>,
    filter: FilterState,
}

impl BookViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[DisplayBook] {
        &self.books
    }

    pub fn filtered(&self) -> &[DisplayBook] {
        &self.filtered
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Fetch the full list from the API and replace the cache wholesale,
    /// then re-apply the current filter. On error the cache is untouched.
    pub async fn reload(&mut self, client: &ApiClient) -> Result<()> {
        let books = client.list(&BookQuery::default()).await?;
        self.set_books(books);
        Ok(())
    }

    /// Replace the cache with freshly fetched records, labeling each, and
    /// re-apply the current filter.
    pub fn set_books(&mut self, books: Vec<Book>) {
        self.books = books
            .into_iter()
            .map(|book| {
                let created_label = format::relative_label(&book.created_at);
                DisplayBook { book, created_label }
            })
            .collect();
        self.apply_filter();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
        self.apply_filter();
    }

    pub fn set_start_date(&mut self, date: Option<String>) {
        self.filter.start_date = date;
        self.apply_filter();
    }

    pub fn set_end_date(&mut self, date: Option<String>) {
        self.filter.end_date = date;
        self.apply_filter();
    }

    /// Clear all filter inputs and show the full cache again.
    pub fn reset_filter(&mut self) {
        self.filter.search_text.clear();
        self.filter.start_date = None;
        self.filter.end_date = None;
        self.apply_filter();
    }

    /// Recompute the filtered subset from the cache and the current inputs.
    ///
    /// All sub-conditions AND together: case-insensitive title substring,
    /// and the record's local calendar day within the inclusive [start, end]
    /// bounds that are present. Order is preserved; applying twice with
    /// unchanged inputs yields the same subset.
    pub fn apply_filter(&mut self) {
        let start = self
            .filter
            .start_date
            .as_deref()
            .and_then(format::parse_display_date);
        let end = self
            .filter
            .end_date
            .as_deref()
            .and_then(format::parse_display_date);
        let search = self.filter.search_text.trim().to_lowercase();

        if start.is_none() && end.is_none() && search.is_empty() {
            self.filtered = self.books.clone();
        } else {
            self.filtered = self
                .books
                .iter()
                .filter(|entry| Self::matches(entry, start, end, &search))
                .cloned()
                .collect();
        }

        self.filter.total_count = self.books.len();
        self.filter.filtered_count = self.filtered.len();
        debug!(
            total = self.filter.total_count,
            filtered = self.filter.filtered_count,
            "Applied filter"
        );
    }

    fn matches(entry: &DisplayBook, start: Option<NaiveDate>, end: Option<NaiveDate>, search: &str) -> bool {
        if !search.is_empty() && !entry.book.title.to_lowercase().contains(search) {
            return false;
        }

        if start.is_none() && end.is_none() {
            return true;
        }

        // A record whose timestamp does not parse cannot satisfy a date bound.
        let Some(day) = creation_day(&entry.book.created_at) else {
            return false;
        };
        if let Some(start) = start {
            if day < start {
                return false;
            }
        }
        if let Some(end) = end {
            if day > end {
                return false;
            }
        }
        true
    }
}

/// Local calendar day of a stored timestamp, time of day stripped.
fn creation_day(iso: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// A book created at local noon of the given day.
    fn book_on(id: i64, title: &str, y: i32, mo: u32, d: u32) -> Book {
        let created = Local
            .with_ymd_and_hms(y, mo, d, 12, 0, 0)
            .unwrap()
            .to_rfc3339();
        Book {
            id,
            title: title.to_string(),
            author: "Autor T".to_string(),
            created_at: created,
            created_by: "Test".to_string(),
        }
    }

    fn sample_model() -> BookViewModel {
        let mut model = BookViewModel::new();
        model.set_books(vec![
            book_on(1, "Buch Heute", 2025, 8, 10),
            book_on(2, "Buch Gestern", 2025, 8, 12),
            book_on(3, "Roman Alt", 2025, 8, 14),
        ]);
        model
    }

    fn filtered_ids(model: &BookViewModel) -> Vec<i64> {
        model.filtered().iter().map(|e| e.book.id).collect()
    }

    #[test]
    fn test_empty_filter_shows_full_cache() {
        let model = sample_model();

        assert_eq!(model.filtered(), model.books());
        assert_eq!(model.filter().total_count, 3);
        assert_eq!(model.filter().filtered_count, 3);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut model = sample_model();
        model.set_search("buch");

        assert_eq!(filtered_ids(&model), vec![1, 2]);
        assert_eq!(model.filter().total_count, 3);
        assert_eq!(model.filter().filtered_count, 2);
    }

    #[test]
    fn test_search_excludes_non_matching_titles() {
        let mut model = sample_model();
        model.set_search("roman");

        assert_eq!(filtered_ids(&model), vec![3]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let mut model = sample_model();
        model.set_start_date(Some("10.08.2025".to_string()));
        model.set_end_date(Some("12.08.2025".to_string()));

        // Day equal to either bound is included; one day past is not.
        assert_eq!(filtered_ids(&model), vec![1, 2]);
    }

    #[test]
    fn test_one_day_outside_bounds_is_excluded() {
        let mut model = sample_model();
        model.set_start_date(Some("11.08.2025".to_string()));

        assert_eq!(filtered_ids(&model), vec![2, 3]);

        model.set_start_date(None);
        model.set_end_date(Some("13.08.25".to_string()));
        assert_eq!(filtered_ids(&model), vec![1, 2]);
    }

    #[test]
    fn test_search_and_dates_combine_with_and() {
        let mut model = sample_model();
        model.set_search("Buch");
        model.set_start_date(Some("11.08.2025".to_string()));

        assert_eq!(filtered_ids(&model), vec![2]);
    }

    #[test]
    fn test_unparseable_bound_acts_as_absent() {
        let mut model = sample_model();
        model.set_start_date(Some("keine Ahnung".to_string()));

        assert_eq!(filtered_ids(&model), vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let mut model = sample_model();
        model.set_search("Buch");
        model.set_end_date(Some("11.08.2025".to_string()));

        let first = model.filtered().to_vec();
        model.apply_filter();
        assert_eq!(model.filtered(), first.as_slice());
        assert_eq!(model.filter().filtered_count, first.len());
    }

    #[test]
    fn test_reset_filter_restores_full_cache() {
        let mut model = sample_model();
        model.set_search("Roman");
        assert_eq!(model.filter().filtered_count, 1);

        model.reset_filter();
        assert!(model.filter().search_text.is_empty());
        assert!(model.filter().start_date.is_none());
        assert!(model.filter().end_date.is_none());
        assert_eq!(model.filtered(), model.books());
        assert_eq!(model.filter().filtered_count, 3);
    }

    #[test]
    fn test_reload_replaces_cache_wholesale() {
        let mut model = sample_model();
        model.set_books(vec![book_on(9, "Neu", 2025, 8, 20)]);

        assert_eq!(model.books().len(), 1);
        assert_eq!(model.filter().total_count, 1);
        assert_eq!(filtered_ids(&model), vec![9]);
    }

    #[test]
    fn test_cache_entries_carry_display_label() {
        let model = sample_model();
        // Well in the past relative to any test run: plain date form.
        assert_eq!(model.books()[0].created_label, "10.08.2025, 12:00 Uhr");
    }
}
