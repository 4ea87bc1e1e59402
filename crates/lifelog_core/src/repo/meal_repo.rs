//! Meal repository: meal entries and the food items they own.
//!
//! # Invariants
//! - A meal and its food items are inserted in one transaction.
//! - Deleting a meal cascades to its food items (FK `ON DELETE CASCADE`).

use crate::model::food::{FoodItem, MealEntry, MealId, MealType};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    (
        "meal_entries",
        &["uuid", "meal_type", "logged_at", "created_at"],
    ),
    (
        "food_items",
        &["uuid", "meal_uuid", "name", "calories", "protein", "carbs", "fat"],
    ),
];

/// Summed macro nutrients over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacroTotals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Repository interface for meal logging.
pub trait MealRepository {
    /// Inserts a meal together with its food items atomically.
    fn create_meal(&self, meal: &MealEntry, foods: &[FoodItem]) -> RepoResult<MealId>;
    /// Lists meals with `start <= logged_at < end`, newest first.
    fn list_meals_between(&self, start: i64, end: i64) -> RepoResult<Vec<MealEntry>>;
    fn list_foods(&self, meal_id: MealId) -> RepoResult<Vec<FoodItem>>;
    /// Sums macros across every food item logged in the window.
    fn totals_between(&self, start: i64, end: i64) -> RepoResult<MacroTotals>;
    fn delete_meal(&self, id: MealId) -> RepoResult<bool>;
}

/// SQLite-backed meal repository.
pub struct SqliteMealRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMealRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl MealRepository for SqliteMealRepository<'_> {
    fn create_meal(&self, meal: &MealEntry, foods: &[FoodItem]) -> RepoResult<MealId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO meal_entries (uuid, meal_type, logged_at, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                meal.uuid.to_string(),
                meal_type_to_db(meal.meal_type),
                meal.logged_at,
                meal.created_at,
            ],
        )?;
        for food in foods {
            tx.execute(
                "INSERT INTO food_items (uuid, meal_uuid, name, calories, protein, carbs, fat)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    food.uuid.to_string(),
                    meal.uuid.to_string(),
                    food.name.as_str(),
                    food.calories,
                    food.protein,
                    food.carbs,
                    food.fat,
                ],
            )?;
        }
        tx.commit()?;
        Ok(meal.uuid)
    }

    fn list_meals_between(&self, start: i64, end: i64) -> RepoResult<Vec<MealEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, meal_type, logged_at, created_at
             FROM meal_entries
             WHERE logged_at >= ?1 AND logged_at < ?2
             ORDER BY logged_at DESC, uuid ASC;",
        )?;
        let mut rows = stmt.query(params![start, end])?;
        let mut meals = Vec::new();
        while let Some(row) = rows.next()? {
            meals.push(parse_meal_row(row)?);
        }
        Ok(meals)
    }

    fn list_foods(&self, meal_id: MealId) -> RepoResult<Vec<FoodItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, meal_uuid, name, calories, protein, carbs, fat
             FROM food_items
             WHERE meal_uuid = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([meal_id.to_string()])?;
        let mut foods = Vec::new();
        while let Some(row) = rows.next()? {
            foods.push(parse_food_row(row)?);
        }
        Ok(foods)
    }

    fn totals_between(&self, start: i64, end: i64) -> RepoResult<MacroTotals> {
        let totals = self.conn.query_row(
            "SELECT
                COALESCE(SUM(f.calories), 0),
                COALESCE(SUM(f.protein), 0.0),
                COALESCE(SUM(f.carbs), 0.0),
                COALESCE(SUM(f.fat), 0.0)
             FROM food_items f
             INNER JOIN meal_entries m ON m.uuid = f.meal_uuid
             WHERE m.logged_at >= ?1 AND m.logged_at < ?2;",
            params![start, end],
            |row| {
                Ok(MacroTotals {
                    calories: row.get(0)?,
                    protein: row.get(1)?,
                    carbs: row.get(2)?,
                    fat: row.get(3)?,
                })
            },
        )?;
        Ok(totals)
    }

    fn delete_meal(&self, id: MealId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM meal_entries WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn meal_type_to_db(meal_type: MealType) -> &'static str {
    match meal_type {
        MealType::Breakfast => "breakfast",
        MealType::Lunch => "lunch",
        MealType::Dinner => "dinner",
        MealType::Snack => "snack",
    }
}

fn parse_meal_type(value: &str) -> Option<MealType> {
    match value {
        "breakfast" => Some(MealType::Breakfast),
        "lunch" => Some(MealType::Lunch),
        "dinner" => Some(MealType::Dinner),
        "snack" => Some(MealType::Snack),
        _ => None,
    }
}

fn parse_meal_row(row: &Row<'_>) -> RepoResult<MealEntry> {
    let uuid_text: String = row.get("uuid")?;
    let type_text: String = row.get("meal_type")?;
    let meal_type = parse_meal_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid meal type `{type_text}` in meal_entries.meal_type"
        ))
    })?;
    Ok(MealEntry {
        uuid: parse_uuid(&uuid_text, "meal_entries.uuid")?,
        meal_type,
        logged_at: row.get("logged_at")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_food_row(row: &Row<'_>) -> RepoResult<FoodItem> {
    let uuid_text: String = row.get("uuid")?;
    let meal_uuid_text: String = row.get("meal_uuid")?;
    Ok(FoodItem {
        uuid: parse_uuid(&uuid_text, "food_items.uuid")?,
        meal_uuid: parse_uuid(&meal_uuid_text, "food_items.meal_uuid")?,
        name: row.get("name")?,
        calories: row.get("calories")?,
        protein: row.get("protein")?,
        carbs: row.get("carbs")?,
        fat: row.get("fat")?,
    })
}
