//! Core domain logic for lifelog: food/calorie logging and travel
//! packing-list management over one local SQLite store.
//! This crate is the single source of truth for business invariants; UI
//! layers query it and subscribe to [`events::ChangeBus`] notifications.

pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod profile;
pub mod repo;
pub mod service;

pub use events::{ChangeBus, ChangeEvent};
pub use logging::{default_log_level, init_logging};
pub use model::food::{FoodItem, MealEntry, MealId, MealType};
pub use model::travel::{
    CategoryId, MasterPackingItem, PackingCategory, PackingItem, PackingItemId, TemplateId, Trip,
    TripId,
};
pub use profile::ProfilePhotoStore;
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository, TemplateWithCategory};
pub use repo::meal_repo::{MacroTotals, MealRepository, SqliteMealRepository};
pub use repo::trip_repo::{SqliteTripRepository, TripRepository};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::{CatalogService, CatalogServiceError};
pub use service::meal_service::{FoodDraft, MealService, MealServiceError};
pub use service::packing_board::{
    compose_board, plan_move, BoardSection, BucketRef, PackingBoard, PackingBoardService,
};
pub use service::trip_service::{TripService, TripServiceError, TripUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
