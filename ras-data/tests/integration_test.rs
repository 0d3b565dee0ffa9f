//! Integration tests for equipment catalog loading using the actual SQLite
//! backend.

use pretty_assertions::assert_eq;
use sqlx::sqlite::SqlitePoolOptions;

use ras_core::{PropertyRepository, SpaceKind};
use ras_data::{EquipmentCatalogLoader, EquipmentLoaderError, EquipmentRecord};
use ras_db_sqlite::SqliteRepository;

const TEST_CSV: &str = include_str!("../test-data/equipment_catalog.csv");

async fn setup_test_db() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    let repo = SqliteRepository::new_with_pool(pool).await;
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");

    repo
}

#[tokio::test]
async fn load_full_catalog() {
    let repo = setup_test_db().await;

    let records = EquipmentCatalogLoader::parse(TEST_CSV.as_bytes()).expect("Should parse CSV");
    assert_eq!(records.len(), 13);

    let inserted = EquipmentCatalogLoader::load(&repo, &records)
        .await
        .expect("Should load catalog");

    // 11 kind-scoped rows plus 2 `any` rows expanded to all 6 kinds.
    assert_eq!(inserted, 11 + 2 * SpaceKind::all().len());

    let kitchen = repo.list_equipment(SpaceKind::Kitchen).await.unwrap();
    let codes: Vec<&str> = kitchen.iter().map(|item| item.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["air_conditioning", "dishwasher", "fridge", "heating", "oven"]
    );

    // A kind with no scoped rows still receives the `any` equipment.
    let extra = repo.list_equipment(SpaceKind::Extra).await.unwrap();
    assert_eq!(extra.len(), 2);
}

#[tokio::test]
async fn reloading_replaces_instead_of_duplicating() {
    let repo = setup_test_db().await;
    let records = EquipmentCatalogLoader::parse(TEST_CSV.as_bytes()).unwrap();

    EquipmentCatalogLoader::load(&repo, &records).await.unwrap();
    let second = EquipmentCatalogLoader::load(&repo, &records).await.unwrap();

    assert_eq!(second, 11 + 2 * SpaceKind::all().len());
    let bathroom = repo.list_equipment(SpaceKind::Bathroom).await.unwrap();
    assert_eq!(bathroom.len(), 5); // shower, bathtub, towel_rail + 2 any
}

#[tokio::test]
async fn load_touches_only_kinds_present_in_the_input() {
    let repo = setup_test_db().await;
    let records = EquipmentCatalogLoader::parse(TEST_CSV.as_bytes()).unwrap();
    EquipmentCatalogLoader::load(&repo, &records).await.unwrap();

    // Reload only the kitchen rows; every other kind keeps its catalog.
    let kitchen_only = vec![EquipmentRecord {
        space_kind: "kitchen".to_string(),
        code: "microwave".to_string(),
        label: "Microwave".to_string(),
    }];
    EquipmentCatalogLoader::load(&repo, &kitchen_only)
        .await
        .unwrap();

    let kitchen = repo.list_equipment(SpaceKind::Kitchen).await.unwrap();
    assert_eq!(kitchen.len(), 1);
    assert_eq!(kitchen[0].code, "microwave");

    let bedroom = repo.list_equipment(SpaceKind::Bedroom).await.unwrap();
    assert_eq!(bedroom.len(), 4); // wardrobe, blackout_blinds + 2 any
}

#[tokio::test]
async fn unknown_space_kind_fails_before_touching_the_database() {
    let repo = setup_test_db().await;

    let records = vec![EquipmentRecord {
        space_kind: "garage".to_string(),
        code: "workbench".to_string(),
        label: "Workbench".to_string(),
    }];

    let result = EquipmentCatalogLoader::load(&repo, &records).await;

    assert!(matches!(
        result,
        Err(EquipmentLoaderError::UnknownSpaceKind(code)) if code == "garage"
    ));
    for kind in SpaceKind::all() {
        assert!(repo.list_equipment(*kind).await.unwrap().is_empty());
    }
}
