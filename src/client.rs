// HTTP client for the books API

use crate::models::{Book, BookInput};
use crate::query::BookQuery;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use tracing::debug;

/// Client for the REST surface under `/api/books`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct Created {
    id: i64,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch books, optionally server-filtered.
    pub async fn list(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let url = self.url("/api/books");
        debug!(url = %url, "Fetching books");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Failed to reach books API")?;
        if !response.status().is_success() {
            return Err(eyre!("Server returned {}", response.status()));
        }

        response.json().await.context("Failed to decode book list")
    }

    /// Fetch one book; `None` when the server answers 404.
    pub async fn get(&self, id: i64) -> Result<Option<Book>> {
        let response = self
            .http
            .get(self.url(&format!("/api/books/{}", id)))
            .send()
            .await
            .context("Failed to reach books API")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(eyre!("Server returned {}", response.status()));
        }

        let book = response.json().await.context("Failed to decode book")?;
        Ok(Some(book))
    }

    /// Create a book; returns the server-assigned id.
    pub async fn create(&self, input: &BookInput) -> Result<i64> {
        let response = self
            .http
            .post(self.url("/api/books"))
            .json(input)
            .send()
            .await
            .context("Failed to reach books API")?;
        if !response.status().is_success() {
            return Err(eyre!("Server returned {}", response.status()));
        }

        let created: Created = response
            .json()
            .await
            .context("Failed to decode create response")?;
        debug!(id = created.id, "Created book");
        Ok(created.id)
    }

    pub async fn update(&self, id: i64, input: &BookInput) -> Result<()> {
        let response = self
            .http
            .put(self.url(&format!("/api/books/{}", id)))
            .json(input)
            .send()
            .await
            .context("Failed to reach books API")?;
        if !response.status().is_success() {
            return Err(eyre!("Server returned {}", response.status()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/books/{}", id)))
            .send()
            .await
            .context("Failed to reach books API")?;
        if !response.status().is_success() {
            return Err(eyre!("Server returned {}", response.status()));
        }
        Ok(())
    }
}
