//! Catalog loading and querying.

use std::path::Path;

use super::errors::{CatalogError, CatalogResult};
use super::models::Book;

/// Immutable in-memory catalog.
#[derive(Debug)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    /// Load the catalog from a CSV file. Headers are trimmed because some
    /// exports pad them with whitespace, and short rows deserialize with
    /// empty-string defaults instead of failing the whole load.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|source| CatalogError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let mut books = Vec::new();
        for record in reader.deserialize() {
            let book: Book = record.map_err(|source| CatalogError::Load {
                path: path.to_path_buf(),
                source,
            })?;
            books.push(book);
        }
        Ok(Self { books })
    }

    /// Build a catalog from records already in memory.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Search and paginate.
    ///
    /// The search term is matched case-insensitively against title, authors
    /// and publisher; `None` or an empty term matches everything. Pages are
    /// 1-based and sized by `limit`; a page past the end yields an empty
    /// list, not an error.
    pub fn query(&self, search: Option<&str>, limit: usize, page: usize) -> Vec<Book> {
        let needle = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        let matches = self.books.iter().filter(|book| match &needle {
            Some(term) => {
                book.title.to_lowercase().contains(term)
                    || book.authors.to_lowercase().contains(term)
                    || book.publisher.to_lowercase().contains(term)
            }
            None => true,
        });

        let start = page.saturating_sub(1).saturating_mul(limit);
        matches.skip(start).take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn book(id: &str, title: &str, authors: &str, publisher: &str) -> Book {
        Book {
            book_id: id.to_string(),
            title: title.to_string(),
            authors: authors.to_string(),
            publisher: publisher.to_string(),
            ..Book::default()
        }
    }

    fn catalog() -> BookCatalog {
        BookCatalog::from_books(vec![
            book("1", "The Rust Programming Language", "Klabnik/Nichols", "No Starch"),
            book("2", "Programming Pearls", "Jon Bentley", "Addison-Wesley"),
            book("3", "The Pragmatic Programmer", "Hunt/Thomas", "Addison-Wesley"),
            book("4", "Dune", "Frank Herbert", "Chilton Books"),
        ])
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let catalog = catalog();
        assert_eq!(catalog.query(Some("RUST"), 10, 1).len(), 1);
        assert_eq!(catalog.query(Some("bentley"), 10, 1).len(), 1);
        assert_eq!(catalog.query(Some("addison"), 10, 1).len(), 2);
        assert_eq!(catalog.query(Some("nonexistent"), 10, 1).len(), 0);
    }

    #[test]
    fn empty_search_matches_everything() {
        let catalog = catalog();
        assert_eq!(catalog.query(None, 10, 1).len(), 4);
        assert_eq!(catalog.query(Some(""), 10, 1).len(), 4);
        assert_eq!(catalog.query(Some("   "), 10, 1).len(), 4);
    }

    #[test]
    fn pagination_is_one_based() {
        let catalog = catalog();
        let first = catalog.query(None, 2, 1);
        let second = catalog.query(None, 2, 2);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_ne!(first[0].book_id, second[0].book_id);
        assert!(catalog.query(None, 2, 3).is_empty());
        // Page 0 clamps to the first page rather than panicking.
        assert_eq!(catalog.query(None, 2, 0), first);
    }

    #[test]
    fn load_parses_csv_with_padded_headers() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("bookstack-catalog-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "bookID,title,authors,average_rating,isbn,isbn13,language_code,  num_pages,ratings_count,text_reviews_count,publication_date,publisher,price"
        )
        .unwrap();
        writeln!(
            file,
            "1,Dune,Frank Herbert,4.25,0441013597,9780441013593,eng,604,1000,50,8/2/2005,Ace,9.99"
        )
        .unwrap();
        writeln!(file, "2,Short Row,Someone,3.0,,,,,,,,,").unwrap();
        drop(file);

        let catalog = BookCatalog::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.len(), 2);
        let dune = &catalog.query(Some("dune"), 10, 1)[0];
        assert_eq!(dune.book_id, "1");
        assert_eq!(dune.num_pages, "604");
        assert_eq!(dune.price, "9.99");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = BookCatalog::load(Path::new("/nonexistent/books.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/books.csv"));
    }
}
