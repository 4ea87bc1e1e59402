use lifelog_core::db::open_db_in_memory;
use lifelog_core::{FoodDraft, MealService, MealServiceError, MealType, SqliteMealRepository};
use uuid::Uuid;

const DAY_MS: i64 = 86_400_000;

fn draft(name: &str, calories: i64, protein: f64, carbs: f64, fat: f64) -> FoodDraft {
    FoodDraft {
        name: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
    }
}

#[test]
fn log_meal_persists_meal_and_foods() {
    let conn = open_db_in_memory().unwrap();
    let service = MealService::new(SqliteMealRepository::try_new(&conn).unwrap());

    let meal = service
        .log_meal(
            MealType::Breakfast,
            1_000,
            &[
                draft("Oats", 350, 12.0, 60.0, 7.0),
                draft("Banana", 105, 1.3, 27.0, 0.4),
            ],
        )
        .unwrap();

    let foods = service.foods_for(meal.uuid).unwrap();
    assert_eq!(foods.len(), 2);
    assert_eq!(foods[0].name, "Oats");
    assert_eq!(foods[1].calories, 105);
}

#[test]
fn guards_reject_empty_meal_and_blank_food_name() {
    let conn = open_db_in_memory().unwrap();
    let service = MealService::new(SqliteMealRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.log_meal(MealType::Snack, 0, &[]),
        Err(MealServiceError::EmptyMeal)
    ));
    assert!(matches!(
        service.log_meal(MealType::Snack, 0, &[draft("  ", 100, 0.0, 0.0, 0.0)]),
        Err(MealServiceError::InvalidName)
    ));
    // Nothing was persisted by the rejected calls.
    assert!(service.meals_between(i64::MIN, i64::MAX).unwrap().is_empty());
}

#[test]
fn daily_totals_sum_only_the_window() {
    let conn = open_db_in_memory().unwrap();
    let service = MealService::new(SqliteMealRepository::try_new(&conn).unwrap());

    service
        .log_meal(MealType::Breakfast, 1_000, &[draft("Oats", 350, 12.0, 60.0, 7.0)])
        .unwrap();
    service
        .log_meal(MealType::Lunch, 2_000, &[draft("Salad", 200, 5.0, 10.0, 12.0)])
        .unwrap();
    // Next day, outside the window.
    service
        .log_meal(MealType::Dinner, DAY_MS + 500, &[draft("Pasta", 700, 20.0, 90.0, 18.0)])
        .unwrap();

    let totals = service.daily_totals(0, DAY_MS).unwrap();
    assert_eq!(totals.calories, 550);
    assert!((totals.protein - 17.0).abs() < 1e-9);
    assert!((totals.carbs - 70.0).abs() < 1e-9);
    assert!((totals.fat - 19.0).abs() < 1e-9);

    // Empty window sums to zero.
    let empty = service.daily_totals(10 * DAY_MS, 11 * DAY_MS).unwrap();
    assert_eq!(empty.calories, 0);
    assert_eq!(empty.protein, 0.0);
}

#[test]
fn meals_list_newest_first_within_window() {
    let conn = open_db_in_memory().unwrap();
    let service = MealService::new(SqliteMealRepository::try_new(&conn).unwrap());

    service
        .log_meal(MealType::Breakfast, 1_000, &[draft("Oats", 350, 0.0, 0.0, 0.0)])
        .unwrap();
    service
        .log_meal(MealType::Lunch, 2_000, &[draft("Salad", 200, 0.0, 0.0, 0.0)])
        .unwrap();

    let meals = service.meals_between(0, DAY_MS).unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0].meal_type, MealType::Lunch);
    assert_eq!(meals[1].meal_type, MealType::Breakfast);
}

#[test]
fn deleting_meal_cascades_to_foods_and_spares_other_meals() {
    let conn = open_db_in_memory().unwrap();
    let service = MealService::new(SqliteMealRepository::try_new(&conn).unwrap());

    let doomed = service
        .log_meal(MealType::Snack, 1_000, &[draft("Chips", 250, 3.0, 30.0, 14.0)])
        .unwrap();
    let kept = service
        .log_meal(MealType::Dinner, 2_000, &[draft("Stew", 450, 30.0, 25.0, 20.0)])
        .unwrap();

    service.delete_meal(doomed.uuid).unwrap();
    // Deleting an already-gone meal is a no-op.
    service.delete_meal(doomed.uuid).unwrap();
    service.delete_meal(Uuid::new_v4()).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM food_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(service.foods_for(kept.uuid).unwrap().len(), 1);
}
