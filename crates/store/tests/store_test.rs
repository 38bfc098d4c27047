use serde_json::{json, Value};
use std::sync::Arc;

use store::{
    seed_sample_data, Database, DatabaseConfig, DigimonInput, DigimonLevel, DigimonStore,
    DigimonType, StoreError,
};

/// Store on a SQLite file with a real multi-connection pool
async fn file_store(dir: &tempfile::TempDir) -> DigimonStore {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("digiworld.db").display());
    let config = DatabaseConfig {
        max_connections: 8,
        ..DatabaseConfig::new(url)
    };
    let db = Database::connect(&config)
        .await
        .expect("file database should open");
    DigimonStore::new(Arc::new(db))
}

async fn new_store() -> DigimonStore {
    let db = Database::connect(&DatabaseConfig::new("sqlite::memory:"))
        .await
        .expect("in-memory database should open");
    DigimonStore::new(Arc::new(db))
}

fn body(name: &str) -> Value {
    json!({
        "name": name,
        "level": "Rookie",
        "type": "Data",
        "description": "A shy wolf Digimon.",
        "attackPower": 110,
        "defenseValue": 100
    })
}

fn input(value: Value) -> DigimonInput {
    DigimonInput::from_json(&value)
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let store = new_store().await;

    let created = store.create(&input(body("Gabumon"))).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Gabumon");
    assert_eq!(created.level, DigimonLevel::Rookie);
    assert_eq!(created.digimon_type, DigimonType::Data);
    assert_eq!(created.attack_power, 110);
    assert_eq!(created.defense_value, 100);
    assert_eq!(created.image_url, None);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let store = new_store().await;

    store.create(&input(body("Agumon"))).await.unwrap();
    let err = store.create(&input(body("Agumon"))).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "Agumon"));

    let agumons: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|d| d.name == "Agumon")
        .collect();
    assert_eq!(agumons.len(), 1);
}

#[tokio::test]
async fn test_name_uniqueness_is_case_sensitive() {
    let store = new_store().await;

    store.create(&input(body("Agumon"))).await.unwrap();
    store.create(&input(body("agumon"))).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_creates_with_same_name() {
    let store = new_store().await;
    let first = input(body("Patamon"));
    let second = input(body("Patamon"));

    let (a, b) = tokio::join!(store.create(&first), store.create(&second));

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let err = a.err().or(b.err()).unwrap();
    assert!(matches!(err, StoreError::DuplicateName(_)));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_same_name_creates_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.create(&input(body("Agumon"))).await })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(StoreError::DuplicateName(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 19);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_distinct_creates_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create(&input(body(&format!("Digimon{}", i)))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.list().await.unwrap().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_creates_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let id = store.create(&input(body("Gabumon"))).await.unwrap().id;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut value = body("Gabumon");
                value["attackPower"] = json!(100 + i);
                store.update(id, &input(value)).await?;
                store.create(&input(body(&format!("Gabumon{}", i)))).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.list().await.unwrap().len(), 11);
}

#[tokio::test]
async fn test_validation_failure_writes_nothing() {
    let store = new_store().await;

    let err = store
        .create(&input(json!({"name": "  ", "level": "Rookie", "attackPower": -5})))
        .await
        .unwrap_err();
    let fields: Vec<_> = err
        .field_errors()
        .unwrap()
        .iter()
        .map(|e| e.field.clone())
        .collect();
    assert_eq!(fields, vec!["name", "type", "description", "attackPower"]);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_stats_are_rejected_on_create() {
    let store = new_store().await;

    let mut value = body("Tentomon");
    value.as_object_mut().unwrap().remove("defenseValue");
    let err = store.create(&input(value)).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap()[0].field, "defenseValue");
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_level_is_invalid_argument() {
    let store = new_store().await;

    let mut value = body("Devimon");
    value["level"] = json!("Bogus");
    let err = store.create(&input(value)).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_image_url_is_stored_when_given() {
    let store = new_store().await;

    let mut value = body("Greymon");
    value["imageUrl"] = json!("https://digimon.shadowsmith.com/img/greymon.jpg");
    let created = store.create(&input(value)).await.unwrap();
    assert_eq!(
        created.image_url.as_deref(),
        Some("https://digimon.shadowsmith.com/img/greymon.jpg")
    );
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let store = new_store().await;

    for name in ["Agumon", "Gabumon", "Patamon"] {
        store.create(&input(body(name))).await.unwrap();
    }

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["Patamon", "Gabumon", "Agumon"]);
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let store = new_store().await;
    let created = store.create(&input(body("Gabumon"))).await.unwrap();

    let mut value = body("Gabumon");
    value["description"] = json!("A loyal wolf Digimon.");
    value["attackPower"] = json!(150);
    let updated = store.update(created.id, &input(value)).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.name, "Gabumon");
    assert_eq!(updated.description, "A loyal wolf Digimon.");
    assert_eq!(updated.attack_power, 150);

    let all = store.list().await.unwrap();
    assert_eq!(all.iter().filter(|d| d.id == created.id).count(), 1);
    assert_eq!(store.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_keeps_own_name_but_rejects_taken_name() {
    let store = new_store().await;
    let agumon = store.create(&input(body("Agumon"))).await.unwrap();
    store.create(&input(body("Gabumon"))).await.unwrap();

    // Renaming to its own name is fine
    store.update(agumon.id, &input(body("Agumon"))).await.unwrap();

    let err = store
        .update(agumon.id, &input(body("Gabumon")))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));
    assert_eq!(store.get(agumon.id).await.unwrap().name, "Agumon");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let store = new_store().await;
    let err = store.update(999, &input(body("Agumon"))).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(999)));
}

#[tokio::test]
async fn test_update_with_invalid_input_writes_nothing() {
    let store = new_store().await;
    let created = store.create(&input(body("Gabumon"))).await.unwrap();

    let mut value = body("Gabumon");
    value["description"] = json!("");
    let err = store.update(created.id, &input(value)).await.unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailed(_)));
    assert_eq!(store.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_delete_is_terminal() {
    let store = new_store().await;
    let created = store.create(&input(body("Devimon"))).await.unwrap();

    store.delete(created.id).await.unwrap();

    assert!(matches!(
        store.get(created.id).await,
        Err(StoreError::NotFound(id)) if id == created.id
    ));
    assert!(store.list().await.unwrap().iter().all(|d| d.id != created.id));
    assert!(matches!(
        store.delete(created.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let store = new_store().await;
    let first = store.create(&input(body("Agumon"))).await.unwrap();
    store.delete(first.id).await.unwrap();

    let second = store.create(&input(body("Agumon"))).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_seed_is_repeatable() {
    let store = new_store().await;
    store.create(&input(body("Custommon"))).await.unwrap();

    let seeded = seed_sample_data(&store).await.unwrap();
    assert_eq!(seeded.len(), 6);

    let seeded_again = seed_sample_data(&store).await.unwrap();
    assert_eq!(seeded_again.len(), 6);

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"Agumon".to_string()));
    assert!(!names.contains(&"Custommon".to_string()));
}

#[tokio::test]
async fn test_replace_all_keeps_old_records_on_failure() {
    let store = new_store().await;
    let existing = store.create(&input(body("Custommon"))).await.unwrap();

    // The second insert collides with the first inside the batch
    let err = store
        .replace_all(&[input(body("Agumon")), input(body("Agumon"))])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));
    assert_eq!(store.list().await.unwrap(), vec![existing.clone()]);

    // Invalid input is rejected before the table is cleared
    let err = store
        .replace_all(&[input(body("Agumon")), input(json!({"name": ""}))])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailed(_)));
    assert_eq!(store.list().await.unwrap(), vec![existing]);
}

#[tokio::test]
async fn test_seed_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    assert_eq!(seed_sample_data(&store).await.unwrap().len(), 6);
    assert_eq!(store.list().await.unwrap().len(), 6);
}
