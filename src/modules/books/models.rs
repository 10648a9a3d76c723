use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Descriptive fields shared by every book shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub publisher: String,
    /// Free-form date text, stored as given.
    pub published_date: String,
    pub page_count: i32,
    pub language: String,
}

/// Request body for creating a book: every field is required.
pub type CreateBook = BookFields;

/// A stored book, as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub uid: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: BookFields,
}

impl Book {
    pub fn new(fields: CreateBook) -> Self {
        Self {
            uid: Uuid::new_v4(),
            fields,
        }
    }
}

/// Partial update of a book.
///
/// Each field distinguishes three states: `None` when the key is absent
/// (leave the stored value alone), `Some(Some(v))` when a value is supplied,
/// and `Some(None)` when the key is present with `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub published_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub language: Option<Option<String>>,
}

impl UpdateBook {
    /// Names of fields that were sent as explicit `null`. Every column is
    /// mandatory, so these cannot be applied.
    pub fn null_fields(&self) -> Vec<&'static str> {
        let mut nulls = Vec::new();
        if matches!(self.title, Some(None)) {
            nulls.push("title");
        }
        if matches!(self.author, Some(None)) {
            nulls.push("author");
        }
        if matches!(self.publisher, Some(None)) {
            nulls.push("publisher");
        }
        if matches!(self.published_date, Some(None)) {
            nulls.push("published_date");
        }
        if matches!(self.page_count, Some(None)) {
            nulls.push("page_count");
        }
        if matches!(self.language, Some(None)) {
            nulls.push("language");
        }
        nulls
    }

    /// Assign every supplied value onto `fields`; absent keys are untouched.
    pub fn apply(self, fields: &mut BookFields) {
        if let Some(Some(title)) = self.title {
            fields.title = title;
        }
        if let Some(Some(author)) = self.author {
            fields.author = author;
        }
        if let Some(Some(publisher)) = self.publisher {
            fields.publisher = publisher;
        }
        if let Some(Some(published_date)) = self.published_date {
            fields.published_date = published_date;
        }
        if let Some(Some(page_count)) = self.page_count {
            fields.page_count = page_count;
        }
        if let Some(Some(language)) = self.language {
            fields.language = language;
        }
    }
}

/// Marks a key as present, whatever its value (including `null`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> BookFields {
        BookFields {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            publisher: "Chilton".to_string(),
            published_date: "1965-08-01".to_string(),
            page_count: 412,
            language: "en".to_string(),
        }
    }

    #[test]
    fn book_serializes_flat_with_uid() {
        let book = Book::new(dune());
        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(value["uid"], json!(book.uid.to_string()));
        assert_eq!(value["title"], "Dune");
        assert_eq!(value["page_count"], 412);
        assert!(value.get("fields").is_none());
        assert_eq!(value.as_object().unwrap().len(), 7);
    }

    #[test]
    fn create_requires_every_field() {
        let missing_language = json!({
            "title": "Dune",
            "author": "Herbert",
            "publisher": "Chilton",
            "published_date": "1965-08-01",
            "page_count": 412
        });
        assert!(serde_json::from_value::<CreateBook>(missing_language).is_err());

        let wrong_type = json!({
            "title": "Dune",
            "author": "Herbert",
            "publisher": "Chilton",
            "published_date": "1965-08-01",
            "page_count": "many",
            "language": "en"
        });
        assert!(serde_json::from_value::<CreateBook>(wrong_type).is_err());
    }

    #[test]
    fn generated_uids_are_distinct() {
        assert_ne!(Book::new(dune()).uid, Book::new(dune()).uid);
    }

    #[test]
    fn update_distinguishes_absent_null_and_value() {
        let patch: UpdateBook =
            serde_json::from_value(json!({ "page_count": 420, "publisher": null, "title": "" }))
                .unwrap();

        assert_eq!(patch.page_count, Some(Some(420)));
        assert_eq!(patch.publisher, Some(None));
        assert_eq!(patch.title, Some(Some(String::new())));
        assert_eq!(patch.author, None);
        assert_eq!(patch.null_fields(), vec!["publisher"]);
    }

    #[test]
    fn empty_update_is_default() {
        let patch: UpdateBook = serde_json::from_value(json!({})).unwrap();
        assert_eq!(patch, UpdateBook::default());
        assert!(patch.null_fields().is_empty());
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let mut fields = dune();
        let patch: UpdateBook =
            serde_json::from_value(json!({ "page_count": 420, "language": "" })).unwrap();

        patch.apply(&mut fields);

        assert_eq!(fields.page_count, 420);
        assert_eq!(fields.language, "");
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.author, "Herbert");
        assert_eq!(fields.publisher, "Chilton");
        assert_eq!(fields.published_date, "1965-08-01");
    }

    #[test]
    fn update_serializes_only_present_keys() {
        let patch = UpdateBook {
            title: Some(Some("Dune Messiah".to_string())),
            ..UpdateBook::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "Dune Messiah" })
        );
    }
}
