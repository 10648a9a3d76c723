//! Runs the book lifecycle against a live PostgreSQL when
//! `BOOKLY_TEST_DATABASE_URL` is set: `cargo test -- --ignored`.

use bookly::app;
use bookly::modules::books::models::{BookFields, UpdateBook};
use bookly::modules::books::repository::{BookRepository, PgBookRepository};
use bookly_db::Database;
use bookly_kernel::settings::DatabaseSettings;
use uuid::Uuid;

async fn connect() -> Option<Database> {
    let url = std::env::var("BOOKLY_TEST_DATABASE_URL").ok()?;
    let settings = DatabaseSettings {
        url,
        require_tls: false,
        max_connections: 4,
        ..DatabaseSettings::default()
    };
    Some(Database::connect(&settings).await.unwrap())
}

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

#[tokio::test]
#[ignore = "requires BOOKLY_TEST_DATABASE_URL"]
async fn postgres_repository_lifecycle() {
    let Some(db) = connect().await else {
        return;
    };
    let registry = app::build_registry(&db);
    app::initialize(&db, &registry).await.unwrap();
    assert_eq!(app::initialize(&db, &registry).await.unwrap(), 0);

    let repo = PgBookRepository::new(db.clone());

    let first = repo.create(dune()).await.unwrap();
    let second = repo.create(dune()).await.unwrap();
    assert_ne!(first.uid, second.uid);
    assert_eq!(repo.get(first.uid).await.unwrap().unwrap(), first);

    let patch = UpdateBook {
        page_count: Some(Some(420)),
        ..UpdateBook::default()
    };
    let updated = repo.update(first.uid, patch).await.unwrap().unwrap();
    assert_eq!(updated.fields.page_count, 420);
    assert_eq!(updated.fields.title, "Dune");

    let listed: Vec<Uuid> = repo.list().await.unwrap().iter().map(|b| b.uid).collect();
    let first_pos = listed.iter().position(|uid| *uid == first.uid).unwrap();
    let second_pos = listed.iter().position(|uid| *uid == second.uid).unwrap();
    assert!(first_pos < second_pos);

    assert!(repo.delete(first.uid).await.unwrap());
    assert!(repo.delete(second.uid).await.unwrap());
    assert!(repo.get(first.uid).await.unwrap().is_none());
    assert!(!repo.delete(first.uid).await.unwrap());
    assert!(repo
        .update(second.uid, UpdateBook::default())
        .await
        .unwrap()
        .is_none());

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires BOOKLY_TEST_DATABASE_URL"]
async fn concurrent_updates_of_one_book_are_serialized() {
    let Some(db) = connect().await else {
        return;
    };
    let registry = app::build_registry(&db);
    app::initialize(&db, &registry).await.unwrap();

    let repo = PgBookRepository::new(db.clone());
    let uid = repo.create(dune()).await.unwrap().uid;

    let pages = UpdateBook {
        page_count: Some(Some(420)),
        ..UpdateBook::default()
    };
    let language = UpdateBook {
        language: Some(Some("fr".to_string())),
        ..UpdateBook::default()
    };
    let (first, second) = tokio::join!(
        tokio::spawn({
            let repo = repo.clone();
            async move { repo.update(uid, pages).await }
        }),
        tokio::spawn({
            let repo = repo.clone();
            async move { repo.update(uid, language).await }
        }),
    );
    assert!(first.unwrap().unwrap().is_some());
    assert!(second.unwrap().unwrap().is_some());

    let stored = repo.get(uid).await.unwrap().unwrap();
    assert_eq!(stored.fields.page_count, 420);
    assert_eq!(stored.fields.language, "fr");
    assert_eq!(stored.fields.title, "Dune");

    assert!(repo.delete(uid).await.unwrap());
    db.close().await;
}
