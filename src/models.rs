use chrono::{DateTime, Utc};

use crate::error::RepoError;
use crate::schema::books;

#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, diesel::Queryable, diesel::Selectable,
)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub description: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the book has been soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A book as submitted for creation. The store assigns the id and timestamps.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewBook {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: i64,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), RepoError> {
        validate_price(self.price)
    }
}

/// Sparse update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize, diesel::AsChangeset)]
#[diesel(table_name = books)]
pub struct BookPatch {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl BookPatch {
    pub fn validate(&self) -> Result<(), RepoError> {
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }

    /// Apply the provided fields to `book`, leaving the rest alone
    pub fn apply_to(self, book: &mut Book) {
        if let Some(name) = self.name {
            book.name = name;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(price) = self.price {
            book.price = price;
        }
    }
}

fn validate_price(price: i64) -> Result<(), RepoError> {
    if price < 0 {
        return Err(RepoError::Validation(format!(
            "price must not be negative, got {price}"
        )));
    }
    Ok(())
}

// Row written on insert; timestamps come from the application clock so that
// every store implementation agrees on them
#[derive(diesel::Insertable)]
#[diesel(table_name = books)]
pub(crate) struct BookRow<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> BookRow<'a> {
    pub(crate) fn new(new_book: &'a NewBook, now: DateTime<Utc>) -> Self {
        BookRow {
            name: &new_book.name,
            author: &new_book.author,
            description: &new_book.description,
            price: new_book.price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        let now = Utc::now();
        Book {
            id: 1,
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
            description: "Desert planet".to_string(),
            price: 20,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut book = dune();
        let patch = BookPatch {
            price: Some(0),
            ..Default::default()
        };

        patch.apply_to(&mut book);

        assert_eq!(0, book.price);
        assert_eq!("Dune", book.name);
        assert_eq!("Herbert", book.author);
        assert_eq!("Desert planet", book.description);
    }

    #[test]
    fn negative_price_is_rejected() {
        let new_book = NewBook {
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
            description: String::new(),
            price: -1,
        };
        assert!(matches!(new_book.validate(), Err(RepoError::Validation(_))));

        let patch = BookPatch {
            price: Some(-5),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(RepoError::Validation(_))));
        assert!(BookPatch::default().validate().is_ok());
    }

    #[test]
    fn new_book_defaults_description_and_price() {
        let new_book: NewBook =
            serde_json::from_str(r#"{"name":"Dune","author":"Herbert"}"#).unwrap();
        assert_eq!("", new_book.description);
        assert_eq!(0, new_book.price);
    }

    #[test]
    fn book_serializes_with_camel_case_timestamps() {
        let json = serde_json::to_value(dune()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("deletedAt").unwrap().is_null());
    }
}
