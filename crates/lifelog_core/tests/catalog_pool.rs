use lifelog_core::db::open_db_in_memory;
use lifelog_core::{
    CatalogRepository, CatalogService, CatalogServiceError, SqliteCatalogRepository,
};
use uuid::Uuid;

#[test]
fn category_create_rename_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    let category = service.create_category("Beach", "sun.max").unwrap();
    assert_eq!(category.name, "Beach");

    service.rename_category(category.uuid, "Seaside").unwrap();
    let names: Vec<String> = service
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Seaside"]);

    service.delete_category(category.uuid).unwrap();
    assert!(service.list_categories().unwrap().is_empty());
}

#[test]
fn blank_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.create_category("   ", "cube.box"),
        Err(CatalogServiceError::InvalidName)
    ));

    let category = service.create_category("Beach", "sun.max").unwrap();
    assert!(matches!(
        service.rename_category(category.uuid, ""),
        Err(CatalogServiceError::InvalidName)
    ));
    assert!(matches!(
        service.add_template(category.uuid, "  "),
        Err(CatalogServiceError::InvalidName)
    ));
}

#[test]
fn duplicate_names_are_permitted() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    service.create_category("Beach", "sun.max").unwrap();
    service.create_category("Beach", "sun.max").unwrap();
    assert_eq!(service.list_categories().unwrap().len(), 2);

    let categories = service.list_categories().unwrap();
    service.add_template(categories[0].uuid, "Towel").unwrap();
    service.add_template(categories[0].uuid, "Towel").unwrap();
    assert_eq!(service.list_templates(categories[0].uuid).unwrap().len(), 2);
}

#[test]
fn template_names_are_capitalized_per_word() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    let category = service.create_category("Electronics", "laptopcomputer").unwrap();
    let template = service
        .add_template(category.uuid, "spare usb cable")
        .unwrap()
        .unwrap();
    assert_eq!(template.name, "Spare Usb Cable");

    service.rename_template(template.uuid, "POWER bank").unwrap();
    let templates = service.list_templates(category.uuid).unwrap();
    assert_eq!(templates[0].name, "Power Bank");
}

#[test]
fn templates_list_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    let category = service.create_category("Hiking", "figure.hiking").unwrap();
    // Force distinct created_at values so ordering is not left to chance.
    for (offset, name) in ["Boots", "Map", "Compass"].iter().enumerate() {
        let template = service.add_template(category.uuid, name).unwrap().unwrap();
        conn.execute(
            "UPDATE master_items SET created_at = ?2 WHERE uuid = ?1;",
            rusqlite::params![template.uuid.to_string(), 1_000 + offset as i64],
        )
        .unwrap();
    }

    let names: Vec<String> = service
        .list_templates(category.uuid)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Boots", "Map", "Compass"]);
}

#[test]
fn deleting_category_cascades_to_templates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    let doomed = service.create_category("Beach", "sun.max").unwrap();
    let kept = service.create_category("Hiking", "figure.hiking").unwrap();
    service.add_template(doomed.uuid, "Towel").unwrap();
    service.add_template(doomed.uuid, "Sunscreen").unwrap();
    service.add_template(kept.uuid, "Boots").unwrap();

    service.delete_category(doomed.uuid).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM master_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(repo.list_templates(kept.uuid).unwrap().len(), 1);
}

#[test]
fn mutations_on_missing_ids_are_noops() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    let ghost = Uuid::new_v4();
    service.rename_category(ghost, "Anything").unwrap();
    service.delete_category(ghost).unwrap();
    service.rename_template(ghost, "Anything").unwrap();
    service.delete_template(ghost).unwrap();

    // Adding a template under a deleted category reports the skip.
    assert!(service.add_template(ghost, "Towel").unwrap().is_none());
}

#[test]
fn starter_seed_runs_only_when_catalog_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());

    assert_eq!(service.seed_starter_categories().unwrap(), 7);
    assert_eq!(service.seed_starter_categories().unwrap(), 0);

    let categories = service.list_categories().unwrap();
    assert_eq!(categories.len(), 7);
    // Catalog order is name ascending.
    assert_eq!(categories[0].name, "Border Control");

    // One surviving category suppresses the seed.
    for category in &categories[1..] {
        service.delete_category(category.uuid).unwrap();
    }
    assert_eq!(service.seed_starter_categories().unwrap(), 0);

    // Deleting the last one re-arms the count-based trigger.
    service.delete_category(categories[0].uuid).unwrap();
    assert_eq!(service.seed_starter_categories().unwrap(), 7);
}
