// Buchstore - book management: SQLite-backed REST API plus a terminal client

pub mod api;
pub mod client;
pub mod format;
pub mod models;
pub mod query;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use client::ApiClient;
pub use models::{Book, BookInput};
pub use query::BookQuery;
pub use store::BookStore;
pub use view::{BookViewModel, DisplayBook, FilterState};
