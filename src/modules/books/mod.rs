pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookly_kernel::{InitCtx, Migration, Module};

use repository::SharedBookRepository;

/// Books module: the book records resource and its storage schema
pub struct BooksModule {
    repository: SharedBookRepository,
}

impl BooksModule {
    pub fn new(repository: SharedBookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_fields = serde_json::json!({
            "title": { "type": "string", "description": "Title of the book" },
            "author": { "type": "string", "description": "Author of the book" },
            "publisher": { "type": "string", "description": "Publisher of the book" },
            "published_date": {
                "type": "string",
                "description": "Publication date as free-form text, e.g. 1965-08-01"
            },
            "page_count": { "type": "integer", "format": "int32", "description": "Number of pages" },
            "language": { "type": "string", "description": "Language of the book" }
        });
        let field_names = [
            "title",
            "author",
            "publisher",
            "published_date",
            "page_count",
            "language",
        ];

        let mut book_properties = book_fields.clone();
        book_properties["uid"] = serde_json::json!({
            "type": "string",
            "format": "uuid",
            "description": "Unique identifier for the book"
        });
        let mut book_required = vec!["uid"];
        book_required.extend(field_names);

        let error_response = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let not_found = serde_json::json!({
            "description": "Book not found",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/NotFound" }
                }
            }
        });
        let book_response = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let uid_parameter = serde_json::json!([{
            "name": "uid",
            "in": "path",
            "required": true,
            "schema": { "type": "string", "format": "uuid" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["books"],
                        "responses": {
                            "200": {
                                "description": "All books in creation order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error_response("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book_response("Created book"),
                            "422": error_response("Validation error"),
                            "500": error_response("Internal server error")
                        }
                    }
                },
                "/book/{uid}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["books"],
                        "parameters": uid_parameter.clone(),
                        "responses": {
                            "200": book_response("The book"),
                            "404": not_found.clone(),
                            "422": error_response("Malformed uid")
                        }
                    },
                    "patch": {
                        "summary": "Update the supplied fields of a book",
                        "tags": ["books"],
                        "parameters": uid_parameter.clone(),
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book_response("Updated book"),
                            "404": not_found.clone(),
                            "422": error_response("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["books"],
                        "parameters": uid_parameter,
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": not_found,
                            "422": error_response("Malformed uid")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": book_properties,
                        "required": book_required
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": book_fields.clone(),
                        "required": field_names
                    },
                    "UpdateBook": {
                        "type": "object",
                        "description": "Only the keys present are applied",
                        "properties": book_fields
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    seq            BIGSERIAL NOT NULL,
                    uid            UUID      PRIMARY KEY,
                    title          TEXT      NOT NULL,
                    author         TEXT      NOT NULL,
                    publisher      TEXT      NOT NULL,
                    published_date TEXT      NOT NULL,
                    page_count     INTEGER   NOT NULL,
                    language       TEXT      NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS books_seq_idx ON books (seq);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(repository: SharedBookRepository) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}
