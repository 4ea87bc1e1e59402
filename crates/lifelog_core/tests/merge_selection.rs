use lifelog_core::db::open_db_in_memory;
use lifelog_core::{
    CatalogRepository, CatalogService, MasterPackingItem, PackingBoardService,
    SqliteCatalogRepository, SqliteTripRepository, TemplateId, TripRepository, TripService,
};
use rusqlite::Connection;
use std::collections::HashSet;

const DAY_MS: i64 = 86_400_000;

fn board_service(conn: &Connection) -> PackingBoardService<SqliteCatalogRepository<'_>, SqliteTripRepository<'_>> {
    PackingBoardService::new(
        SqliteCatalogRepository::try_new(conn).unwrap(),
        SqliteTripRepository::try_new(conn).unwrap(),
    )
}

fn pin_template_created_at(conn: &Connection, id: TemplateId, created_at: i64) {
    conn.execute(
        "UPDATE master_items SET created_at = ?2 WHERE uuid = ?1;",
        rusqlite::params![id.to_string(), created_at],
    )
    .unwrap();
}

#[test]
fn merge_appends_past_existing_items_in_catalog_order() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let repo = SqliteTripRepository::try_new(&conn).unwrap();
    let board = board_service(&conn);

    // Created out of name order on purpose; merge iterates name order.
    let beta = catalog.create_category("Beta", "cube.box").unwrap();
    let alpha = catalog.create_category("Alpha", "cube.box").unwrap();
    let torch = catalog.add_template(alpha.uuid, "Torch").unwrap().unwrap();
    let rope = catalog.add_template(alpha.uuid, "Rope").unwrap().unwrap();
    let tent = catalog.add_template(beta.uuid, "Tent").unwrap().unwrap();
    pin_template_created_at(&conn, torch.uuid, 1_000);
    pin_template_created_at(&conn, rope.uuid, 2_000);
    pin_template_created_at(&conn, tent.uuid, 3_000);

    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();
    trips.add_item(trip.uuid, "Snacks", "Misc", 1).unwrap(); // order 0
    trips.add_item(trip.uuid, "Book", "Misc", 1).unwrap(); // order 1

    let selected: HashSet<_> = [torch.uuid, rope.uuid, tent.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 3);

    let appended: Vec<(String, String, i64)> = repo
        .list_items(trip.uuid)
        .unwrap()
        .into_iter()
        .filter(|item| item.category_name != "Misc")
        .map(|item| (item.name, item.category_name, item.order_index))
        .collect();
    assert_eq!(
        appended,
        vec![
            ("Torch".to_string(), "Alpha".to_string(), 2),
            ("Rope".to_string(), "Alpha".to_string(), 3),
            ("Tent".to_string(), "Beta".to_string(), 4),
        ]
    );
}

#[test]
fn merge_is_idempotent_across_calls() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let repo = SqliteTripRepository::try_new(&conn).unwrap();
    let board = board_service(&conn);

    let hiking = catalog.create_category("Hiking", "figure.hiking").unwrap();
    let boots = catalog.add_template(hiking.uuid, "Boots").unwrap().unwrap();
    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();

    let selected: HashSet<_> = [boots.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 1);
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 0);
    assert_eq!(repo.count_items(trip.uuid).unwrap(), 1);
}

#[test]
fn duplicate_templates_in_one_call_insert_at_most_once() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let repo = SqliteTripRepository::try_new(&conn).unwrap();
    let board = board_service(&conn);

    // The catalog permits duplicate templates; merging both must add one item.
    let hiking = catalog.create_category("Hiking", "figure.hiking").unwrap();
    let first = catalog.add_template(hiking.uuid, "Boots").unwrap().unwrap();
    let second = catalog.add_template(hiking.uuid, "Boots").unwrap().unwrap();
    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();

    let selected: HashSet<_> = [first.uuid, second.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 1);
    assert_eq!(repo.count_items(trip.uuid).unwrap(), 1);
}

#[test]
fn same_name_under_different_categories_both_merge() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let repo = SqliteTripRepository::try_new(&conn).unwrap();
    let board = board_service(&conn);

    let hiking = catalog.create_category("Hiking", "figure.hiking").unwrap();
    let beach = catalog.create_category("Beach", "sun.max").unwrap();
    let a = catalog.add_template(hiking.uuid, "Towel").unwrap().unwrap();
    let b = catalog.add_template(beach.uuid, "Towel").unwrap().unwrap();
    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();

    let selected: HashSet<_> = [a.uuid, b.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 2);
    assert_eq!(repo.count_items(trip.uuid).unwrap(), 2);
}

#[test]
fn templates_without_a_category_are_skipped() {
    let conn = open_db_in_memory().unwrap();
    let catalog_repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let board = board_service(&conn);

    let orphan = MasterPackingItem::new("Loose End", None);
    catalog_repo.create_template(&orphan).unwrap();
    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();

    let selected: HashSet<_> = [orphan.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 0);
}

#[test]
fn merge_into_missing_trip_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let board = board_service(&conn);

    let hiking = catalog.create_category("Hiking", "figure.hiking").unwrap();
    let boots = catalog.add_template(hiking.uuid, "Boots").unwrap().unwrap();

    let selected: HashSet<_> = [boots.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(uuid::Uuid::new_v4(), &selected).unwrap(), 0);
}

#[test]
fn manual_item_with_matching_pair_blocks_merge() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(&conn).unwrap());
    let trips = TripService::new(SqliteTripRepository::try_new(&conn).unwrap());
    let repo = SqliteTripRepository::try_new(&conn).unwrap();
    let board = board_service(&conn);

    let hiking = catalog.create_category("Hiking", "figure.hiking").unwrap();
    let boots = catalog.add_template(hiking.uuid, "Boots").unwrap().unwrap();
    let trip = trips.create_trip("Lofoten", 0, DAY_MS).unwrap();
    // Matching (name, category) pair added by hand, not from the template.
    trips.add_item(trip.uuid, "Boots", "Hiking", 1).unwrap();

    let selected: HashSet<_> = [boots.uuid].into_iter().collect();
    assert_eq!(board.merge_selection(trip.uuid, &selected).unwrap(), 0);
    assert_eq!(repo.count_items(trip.uuid).unwrap(), 1);
}
