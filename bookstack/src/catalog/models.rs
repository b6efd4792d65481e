//! Catalog data models.

use serde::{Deserialize, Serialize};

/// A catalog record.
///
/// Every field is a string, mirroring the CSV export the catalog is loaded
/// from; numeric-looking columns like `num_pages` or `average_rating` are
/// passed through untouched. The wire names match the CSV headers, so
/// `book_id` serializes as `bookID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "bookID", default)]
    pub book_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub average_rating: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub isbn13: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub num_pages: String,
    #[serde(default)]
    pub ratings_count: String,
    #[serde(default)]
    pub text_reviews_count: String,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub price: String,
}
