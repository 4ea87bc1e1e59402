//! Travel domain model: trips, packing items, and the global catalog.
//!
//! # Responsibility
//! - Define the trip/packing records and the catalog (category + template)
//!   records shared by repositories and services.
//!
//! # Invariants
//! - `PackingItem.category_name` is a string copy of a catalog category name,
//!   never a reference. Renaming or deleting a category must not corrupt
//!   existing trips; orphaned items surface in the derived "Other" bucket.
//! - `PackingItem.order_index` positions an item within its own
//!   (trip, category-name) bucket only.
//! - A packing item never links back to the template it was created from.

use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a trip.
pub type TripId = Uuid;
/// Stable identifier for a per-trip packing item.
pub type PackingItemId = Uuid;
/// Stable identifier for a catalog category.
pub type CategoryId = Uuid;
/// Stable identifier for a catalog template item.
pub type TemplateId = Uuid;

/// A planned trip owning an ordered collection of packing items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub uuid: TripId,
    pub destination: String,
    /// Epoch ms. Expected to be `<= end_date`; enforced at the service layer.
    pub start_date: i64,
    pub end_date: i64,
    pub created_at: i64,
}

impl Trip {
    pub fn new(destination: impl Into<String>, start_date: i64, end_date: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            destination: destination.into(),
            start_date,
            end_date,
            created_at: now_epoch_ms(),
        }
    }
}

/// A global catalog category owning template items.
///
/// Name uniqueness is not enforced; duplicate names are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingCategory {
    pub uuid: CategoryId,
    pub name: String,
    /// Opaque icon reference rendered by the UI layer.
    pub icon: String,
    pub created_at: i64,
}

impl PackingCategory {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            icon: icon.into(),
            created_at: now_epoch_ms(),
        }
    }
}

/// A catalog template item. Never itself packed or unpacked; selection only
/// seeds a new `PackingItem`'s name and category at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPackingItem {
    pub uuid: TemplateId,
    pub name: String,
    /// Owning category. `None` templates cannot be merged into a trip.
    pub category_uuid: Option<CategoryId>,
    pub created_at: i64,
}

impl MasterPackingItem {
    pub fn new(name: impl Into<String>, category_uuid: Option<CategoryId>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            category_uuid,
            created_at: now_epoch_ms(),
        }
    }
}

/// A concrete packing item belonging to one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    pub uuid: PackingItemId,
    pub trip_uuid: TripId,
    pub name: String,
    /// Denormalized category name copy, see module invariants.
    pub category_name: String,
    pub is_packed: bool,
    /// Always `>= 1`; non-positive updates are rejected upstream.
    pub quantity: i64,
    /// Position within this item's bucket, dense `0..len` after any reorder.
    pub order_index: i64,
    pub created_at: i64,
}

impl PackingItem {
    pub fn new(
        trip_uuid: TripId,
        name: impl Into<String>,
        category_name: impl Into<String>,
        quantity: i64,
        order_index: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            trip_uuid,
            name: name.into(),
            category_name: category_name.into(),
            is_packed: false,
            quantity,
            order_index,
            created_at: now_epoch_ms(),
        }
    }
}
