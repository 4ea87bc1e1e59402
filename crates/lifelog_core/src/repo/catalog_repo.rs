//! Catalog repository: global packing categories and their template items.
//!
//! # Responsibility
//! - Provide CRUD over `packing_categories` and `master_items`.
//! - Keep catalog ordering rules (name ASC, templates in creation order)
//!   inside the persistence boundary.
//!
//! # Invariants
//! - Deleting a category cascades to its templates (FK `ON DELETE CASCADE`).
//! - Category/template names are stored as given; duplicates are permitted.

use crate::model::travel::{CategoryId, MasterPackingItem, PackingCategory, TemplateId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row};

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    (
        "packing_categories",
        &["uuid", "name", "icon", "created_at"],
    ),
    (
        "master_items",
        &["uuid", "name", "category_uuid", "created_at"],
    ),
];

/// A template joined with its owning category's current name, in merge
/// iteration order (category name ASC, then template creation order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWithCategory {
    pub template: MasterPackingItem,
    /// `None` when the template has no owning category.
    pub category_name: Option<String>,
}

/// Repository interface for catalog operations.
pub trait CatalogRepository {
    fn create_category(&self, category: &PackingCategory) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<PackingCategory>>;
    /// Lists all categories sorted by name ascending (case-sensitive).
    fn list_categories(&self) -> RepoResult<Vec<PackingCategory>>;
    fn count_categories(&self) -> RepoResult<u32>;
    /// Returns `false` when the category no longer exists.
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<bool>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<bool>;

    fn create_template(&self, template: &MasterPackingItem) -> RepoResult<TemplateId>;
    /// Lists one category's templates in creation order.
    fn list_templates(&self, category_id: CategoryId) -> RepoResult<Vec<MasterPackingItem>>;
    /// Flattens all templates in merge iteration order.
    fn list_templates_with_categories(&self) -> RepoResult<Vec<TemplateWithCategory>>;
    fn rename_template(&self, id: TemplateId, name: &str) -> RepoResult<bool>;
    fn delete_template(&self, id: TemplateId) -> RepoResult<bool>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_category(&self, category: &PackingCategory) -> RepoResult<CategoryId> {
        self.conn.execute(
            "INSERT INTO packing_categories (uuid, name, icon, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                category.uuid.to_string(),
                category.name.as_str(),
                category.icon.as_str(),
                category.created_at,
            ],
        )?;
        Ok(category.uuid)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<PackingCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, icon, created_at
             FROM packing_categories
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<PackingCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, icon, created_at
             FROM packing_categories
             ORDER BY name ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn count_categories(&self) -> RepoResult<u32> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM packing_categories;", [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE packing_categories SET name = ?2 WHERE uuid = ?1;",
            params![id.to_string(), name],
        )?;
        Ok(changed > 0)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM packing_categories WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn create_template(&self, template: &MasterPackingItem) -> RepoResult<TemplateId> {
        self.conn.execute(
            "INSERT INTO master_items (uuid, name, category_uuid, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                template.uuid.to_string(),
                template.name.as_str(),
                template.category_uuid.map(|id| id.to_string()),
                template.created_at,
            ],
        )?;
        Ok(template.uuid)
    }

    fn list_templates(&self, category_id: CategoryId) -> RepoResult<Vec<MasterPackingItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, category_uuid, created_at
             FROM master_items
             WHERE category_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([category_id.to_string()])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }
        Ok(templates)
    }

    fn list_templates_with_categories(&self) -> RepoResult<Vec<TemplateWithCategory>> {
        // Uncategorized templates sort first under SQLite NULL ordering; the
        // merge path skips them regardless of where they land.
        let mut stmt = self.conn.prepare(
            "SELECT
                m.uuid AS uuid,
                m.name AS name,
                m.category_uuid AS category_uuid,
                m.created_at AS created_at,
                c.name AS category_name
             FROM master_items m
             LEFT JOIN packing_categories c ON c.uuid = m.category_uuid
             ORDER BY c.name ASC, c.uuid ASC, m.created_at ASC, m.uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(TemplateWithCategory {
                template: parse_template_row(row)?,
                category_name: row.get("category_name")?,
            });
        }
        Ok(templates)
    }

    fn rename_template(&self, id: TemplateId, name: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE master_items SET name = ?2 WHERE uuid = ?1;",
            params![id.to_string(), name],
        )?;
        Ok(changed > 0)
    }

    fn delete_template(&self, id: TemplateId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM master_items WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<PackingCategory> {
    let uuid_text: String = row.get("uuid")?;
    Ok(PackingCategory {
        uuid: parse_uuid(&uuid_text, "packing_categories.uuid")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<MasterPackingItem> {
    let uuid_text: String = row.get("uuid")?;
    let category_uuid = row
        .get::<_, Option<String>>("category_uuid")?
        .map(|value| parse_uuid(&value, "master_items.category_uuid"))
        .transpose()?;
    Ok(MasterPackingItem {
        uuid: parse_uuid(&uuid_text, "master_items.uuid")?,
        name: row.get("name")?,
        category_uuid,
        created_at: row.get("created_at")?,
    })
}
