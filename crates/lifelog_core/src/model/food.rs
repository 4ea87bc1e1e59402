//! Food domain model: meal entries owning food items.

use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a meal entry.
pub type MealId = Uuid;
/// Stable identifier for a logged food item.
pub type FoodItemId = Uuid;

/// Kind of meal a food entry is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Opaque icon reference rendered by the UI layer.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Breakfast => "cup.and.saucer.fill",
            Self::Lunch => "fork.knife",
            Self::Dinner => "wineglass.fill",
            Self::Snack => "carrot.fill",
        }
    }
}

/// One logged meal owning its food items (cascade delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub uuid: MealId,
    pub meal_type: MealType,
    /// Epoch ms the meal was eaten; drives day grouping.
    pub logged_at: i64,
    pub created_at: i64,
}

impl MealEntry {
    pub fn new(meal_type: MealType, logged_at: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            meal_type,
            logged_at,
            created_at: now_epoch_ms(),
        }
    }
}

/// One food item within a meal, with its macro breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub uuid: FoodItemId,
    pub meal_uuid: MealId,
    pub name: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodItem {
    pub fn new(meal_uuid: MealId, name: impl Into<String>, calories: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            meal_uuid,
            name: name.into(),
            calories,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }
}
