//! Trip repository: trips and their per-trip packing items.
//!
//! # Responsibility
//! - Provide CRUD over `trips` and `packing_items`.
//! - Apply bucket reorder index writes atomically.
//!
//! # Invariants
//! - Deleting a trip cascades to its packing items (FK `ON DELETE CASCADE`).
//! - Item listing is deterministic: `order_index ASC, created_at ASC,
//!   uuid ASC`.
//! - `set_order_indices` touches exactly the rows it is given; callers are
//!   responsible for passing a single bucket.

use crate::model::travel::{PackingItem, PackingItemId, Trip, TripId};
use crate::repo::{ensure_connection_ready, parse_bool, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    (
        "trips",
        &["uuid", "destination", "start_date", "end_date", "created_at"],
    ),
    (
        "packing_items",
        &[
            "uuid",
            "trip_uuid",
            "name",
            "category_name",
            "is_packed",
            "quantity",
            "order_index",
            "created_at",
        ],
    ),
];

/// Repository interface for trip and packing item operations.
pub trait TripRepository {
    fn create_trip(&self, trip: &Trip) -> RepoResult<TripId>;
    fn get_trip(&self, id: TripId) -> RepoResult<Option<Trip>>;
    /// Lists all trips sorted by start date ascending.
    fn list_trips(&self) -> RepoResult<Vec<Trip>>;
    /// Returns `false` when the trip no longer exists.
    fn update_trip(&self, trip: &Trip) -> RepoResult<bool>;
    fn delete_trip(&self, id: TripId) -> RepoResult<bool>;

    fn insert_item(&self, item: &PackingItem) -> RepoResult<PackingItemId>;
    fn get_item(&self, id: PackingItemId) -> RepoResult<Option<PackingItem>>;
    /// Lists one trip's items across all buckets.
    fn list_items(&self, trip_id: TripId) -> RepoResult<Vec<PackingItem>>;
    fn count_items(&self, trip_id: TripId) -> RepoResult<i64>;
    fn toggle_packed(&self, id: PackingItemId) -> RepoResult<bool>;
    fn set_quantity(&self, id: PackingItemId, quantity: i64) -> RepoResult<bool>;
    fn delete_item(&self, id: PackingItemId) -> RepoResult<bool>;
    /// Reassigns order indices for the given items in one transaction.
    fn set_order_indices(&self, assignments: &[(PackingItemId, i64)]) -> RepoResult<()>;
}

/// SQLite-backed trip repository.
pub struct SqliteTripRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTripRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl TripRepository for SqliteTripRepository<'_> {
    fn create_trip(&self, trip: &Trip) -> RepoResult<TripId> {
        self.conn.execute(
            "INSERT INTO trips (uuid, destination, start_date, end_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                trip.uuid.to_string(),
                trip.destination.as_str(),
                trip.start_date,
                trip.end_date,
                trip.created_at,
            ],
        )?;
        Ok(trip.uuid)
    }

    fn get_trip(&self, id: TripId) -> RepoResult<Option<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, destination, start_date, end_date, created_at
             FROM trips
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_trip_row(row)?));
        }
        Ok(None)
    }

    fn list_trips(&self) -> RepoResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, destination, start_date, end_date, created_at
             FROM trips
             ORDER BY start_date ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut trips = Vec::new();
        while let Some(row) = rows.next()? {
            trips.push(parse_trip_row(row)?);
        }
        Ok(trips)
    }

    fn update_trip(&self, trip: &Trip) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE trips
             SET destination = ?2, start_date = ?3, end_date = ?4
             WHERE uuid = ?1;",
            params![
                trip.uuid.to_string(),
                trip.destination.as_str(),
                trip.start_date,
                trip.end_date,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_trip(&self, id: TripId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM trips WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn insert_item(&self, item: &PackingItem) -> RepoResult<PackingItemId> {
        self.conn.execute(
            "INSERT INTO packing_items (
                uuid,
                trip_uuid,
                name,
                category_name,
                is_packed,
                quantity,
                order_index,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                item.uuid.to_string(),
                item.trip_uuid.to_string(),
                item.name.as_str(),
                item.category_name.as_str(),
                i64::from(item.is_packed),
                item.quantity,
                item.order_index,
                item.created_at,
            ],
        )?;
        Ok(item.uuid)
    }

    fn get_item(&self, id: PackingItemId) -> RepoResult<Option<PackingItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL} WHERE uuid = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(&self, trip_id: TripId) -> RepoResult<Vec<PackingItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE trip_uuid = ?1
             ORDER BY order_index ASC, created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([trip_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn count_items(&self, trip_id: TripId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM packing_items WHERE trip_uuid = ?1;",
            [trip_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn toggle_packed(&self, id: PackingItemId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE packing_items SET is_packed = 1 - is_packed WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn set_quantity(&self, id: PackingItemId, quantity: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE packing_items SET quantity = ?2 WHERE uuid = ?1;",
            params![id.to_string(), quantity],
        )?;
        Ok(changed > 0)
    }

    fn delete_item(&self, id: PackingItemId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM packing_items WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn set_order_indices(&self, assignments: &[(PackingItemId, i64)]) -> RepoResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (id, order_index) in assignments {
            tx.execute(
                "UPDATE packing_items SET order_index = ?2 WHERE uuid = ?1;",
                params![id.to_string(), order_index],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    trip_uuid,
    name,
    category_name,
    is_packed,
    quantity,
    order_index,
    created_at
FROM packing_items";

fn parse_trip_row(row: &Row<'_>) -> RepoResult<Trip> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Trip {
        uuid: parse_uuid(&uuid_text, "trips.uuid")?,
        destination: row.get("destination")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<PackingItem> {
    let uuid_text: String = row.get("uuid")?;
    let trip_uuid_text: String = row.get("trip_uuid")?;
    Ok(PackingItem {
        uuid: parse_uuid(&uuid_text, "packing_items.uuid")?,
        trip_uuid: parse_uuid(&trip_uuid_text, "packing_items.trip_uuid")?,
        name: row.get("name")?,
        category_name: row.get("category_name")?,
        is_packed: parse_bool(row.get("is_packed")?, "packing_items.is_packed")?,
        quantity: row.get("quantity")?,
        order_index: row.get("order_index")?,
        created_at: row.get("created_at")?,
    })
}
