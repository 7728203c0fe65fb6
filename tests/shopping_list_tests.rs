use diet_planner::plan::{Ingredient, MealPlan, MealSlot, PlanItem, PlanMode};
use diet_planner::shopping::{
    aggregate, format_entry, format_unit, parse_amount, render_shopping_list, ParsedAmount, ShoppingListEntry,
    EMPTY_LIST_MESSAGE,
};
use serde_json::json;

fn ingredient(name: &str, amount: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount: amount.to_string(),
    }
}

fn parsed(value: f64, unit: &str) -> ParsedAmount {
    ParsedAmount {
        value,
        unit: unit.to_string(),
    }
}

#[test]
fn test_parse_amount_examples() {
    assert_eq!(parse_amount(Some("1/2 шт")), parsed(0.5, "шт"));
    assert_eq!(parse_amount(Some("200г")), parsed(200.0, "г"));
    assert_eq!(parse_amount(Some("щепотка")), parsed(1.0, "щепотка"));
    assert_eq!(parse_amount(None), parsed(1.0, ""));
}

#[test]
fn test_eggs_summed_over_breakfast_and_lunch() {
    let mut plan = MealPlan::default();
    plan.assign(MealSlot::Breakfast, PlanItem::new("Яичница", vec![ingredient("яйцо", "2 шт")]), PlanMode::Diy);
    plan.assign(MealSlot::Lunch, PlanItem::new("Салат", vec![ingredient("яйцо", "3 шт")]), PlanMode::Diy);

    assert_eq!(
        aggregate(&plan),
        vec![ShoppingListEntry {
            ingredient_name: "яйцо".to_string(),
            totals: vec![("шт".to_string(), 5.0)],
        }]
    );
}

#[test]
fn test_restaurant_dinner_contributes_nothing() {
    let plan: MealPlan = serde_json::from_value(json!({
        "breakfast": {"name": "Каша", "mode": "diy", "ingredients": [{"name": "овсянка", "amount": "50 г"}]},
        "dinner": {"name": "Стейк", "mode": "restaurants", "ingredients": [{"name": "говядина", "amount": "300 г"}]}
    }))
    .unwrap();
    let names: Vec<_> = aggregate(&plan).into_iter().map(|e| e.ingredient_name).collect();
    assert_eq!(names, vec!["овсянка"]);
}

#[test]
fn test_collation_and_idempotence() {
    let mut plan = MealPlan::default();
    plan.assign(
        MealSlot::Dinner,
        PlanItem::new(
            "Всё",
            vec![
                ingredient("яблоко", "1 шт"),
                ingredient("ёж", "1 шт"),
                ingredient("Ель", "1 шт"),
                ingredient("ель", "1 шт"),
                ingredient("апельсин", "1 шт"),
            ],
        ),
        PlanMode::Diy,
    );
    let first = aggregate(&plan);
    let names: Vec<_> = first.iter().map(|e| e.ingredient_name.as_str()).collect();
    assert_eq!(names, vec!["апельсин", "ёж", "ель", "Ель", "яблоко"]);
    assert_eq!(first, aggregate(&plan));
}

#[test]
fn test_pluralized_units() {
    assert_eq!(format_unit(1.0, "щепотка"), "щепотка");
    assert_eq!(format_unit(3.0, "щепотка"), "щепотки");
    assert_eq!(format_unit(10.0, "щепотка"), "щепоток");
    assert_eq!(format_unit(5.0, "г"), "г");
}

#[test]
fn test_rendered_list() {
    let mut plan = MealPlan::default();
    assert_eq!(render_shopping_list(&aggregate(&plan)), EMPTY_LIST_MESSAGE);

    plan.assign(
        MealSlot::Lunch,
        PlanItem::new(
            "Суп",
            vec![
                ingredient("соль", "щепотка"),
                ingredient("соль", "1 щепотка"),
                ingredient("вода", "1500.5 г"),
                ingredient("мука", "12000 г"),
            ],
        ),
        PlanMode::Diy,
    );
    let list = aggregate(&plan);
    let mut lines = Vec::new();
    for entry in &list {
        lines.push(format!("{}: {}", entry.ingredient_name, format_entry(entry)));
    }
    assert_eq!(lines, vec!["вода: 1\u{a0}500,5 г", "мука: 12\u{a0}000 г", "соль: 2 щепотки"]);
    assert_eq!(
        render_shopping_list(&list),
        "вода — 1\u{a0}500,5 г\nмука — 12\u{a0}000 г\nсоль — 2 щепотки"
    );
}
