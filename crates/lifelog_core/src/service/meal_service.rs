//! Meal logging use-case service.
//!
//! # Responsibility
//! - Log meals with their food items and expose daily totals for the
//!   dashboard ring.
//!
//! # Invariants
//! - A meal is persisted together with its food items or not at all.
//! - Totals are recomputed per query; nothing is materialized.

use crate::events::{notify, ChangeBus, ChangeEvent};
use crate::model::food::{FoodItem, MealEntry, MealId, MealType};
use crate::repo::meal_repo::{MacroTotals, MealRepository};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Errors from meal service operations.
#[derive(Debug)]
pub enum MealServiceError {
    /// Food name is blank after trim.
    InvalidName,
    /// A meal must contain at least one food item.
    EmptyMeal,
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for MealServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "food name must not be blank"),
            Self::EmptyMeal => write!(f, "meal must contain at least one food item"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MealServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MealServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One food item of a meal about to be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDraft {
    pub name: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Use-case service over the meal repository.
pub struct MealService<R: MealRepository> {
    repo: R,
    events: Option<Rc<ChangeBus>>,
}

impl<R: MealRepository> MealService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, events: None }
    }

    /// Attaches a change bus; mutations emit [`ChangeEvent::Meals`].
    pub fn with_events(repo: R, events: Rc<ChangeBus>) -> Self {
        Self {
            repo,
            events: Some(events),
        }
    }

    /// Logs one meal with its food items atomically.
    pub fn log_meal(
        &self,
        meal_type: MealType,
        logged_at: i64,
        foods: &[FoodDraft],
    ) -> Result<MealEntry, MealServiceError> {
        if foods.is_empty() {
            return Err(MealServiceError::EmptyMeal);
        }
        let meal = MealEntry::new(meal_type, logged_at);
        let mut items = Vec::with_capacity(foods.len());
        for draft in foods {
            let name = draft.name.trim();
            if name.is_empty() {
                return Err(MealServiceError::InvalidName);
            }
            let mut item = FoodItem::new(meal.uuid, name, draft.calories);
            item.protein = draft.protein;
            item.carbs = draft.carbs;
            item.fat = draft.fat;
            items.push(item);
        }
        self.repo.create_meal(&meal, &items)?;
        notify(&self.events, ChangeEvent::Meals);
        Ok(meal)
    }

    /// Meals with `start <= logged_at < end`, newest first.
    pub fn meals_between(&self, start: i64, end: i64) -> RepoResult<Vec<MealEntry>> {
        self.repo.list_meals_between(start, end)
    }

    pub fn foods_for(&self, meal_id: MealId) -> RepoResult<Vec<FoodItem>> {
        self.repo.list_foods(meal_id)
    }

    /// Summed macros over a day window (or any window the caller picks).
    pub fn daily_totals(&self, start: i64, end: i64) -> RepoResult<MacroTotals> {
        self.repo.totals_between(start, end)
    }

    /// Deletes a meal and, via cascade, its food items. No-op when gone.
    pub fn delete_meal(&self, id: MealId) -> RepoResult<()> {
        if self.repo.delete_meal(id)? {
            notify(&self.events, ChangeEvent::Meals);
        }
        Ok(())
    }
}
