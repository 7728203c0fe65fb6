use diet_planner::plan::{Ingredient, MealSlot, PlanItem, PlanMode};
use diet_planner::session::PlannerSession;
use diet_planner::storage::{load_session, save_session, FileStore, KeyValueStore, APP_STATE_KEY};
use diet_planner::wizard::{RecipeWizard, WizardError, WizardStep};
use tempfile::tempdir;

#[test]
fn test_plan_and_readings_survive_restart() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path());

    let mut session = PlannerSession::new();
    session.set_reading_from_input("vitamin_d", "18,5");
    session.set_reading("ferritin", 22.0);
    session.set_allergies(vec!["орехи".to_string()]);
    session.set_plan_item(
        MealSlot::Breakfast,
        PlanItem::new(
            "Сырники",
            vec![Ingredient {
                name: "творог".to_string(),
                amount: "400г".to_string(),
            }],
        ),
        PlanMode::Diy,
    );
    session.set_last_detected_products(vec!["творог".to_string(), "яйца".to_string()]);
    save_session(&mut store, &session);

    let restored = load_session(&FileStore::new(dir.path())).unwrap();
    assert_eq!(restored.readings, session.readings);
    assert_eq!(restored.readings.get("vitamin_d"), Some(18.0));
    assert_eq!(restored.plan, session.plan);
    assert_eq!(restored.preferences, session.preferences);
    assert_eq!(restored.last_detected_products, session.last_detected_products);
    assert_eq!(restored.shopping_list(), session.shopping_list());
}

#[test]
fn test_missing_state_is_none() {
    let dir = tempdir().unwrap();
    assert!(load_session(&FileStore::new(dir.path())).is_none());
}

#[test]
fn test_partial_snapshot_fills_defaults() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(APP_STATE_KEY, r#"{"biomarkers": {"b12": 310}}"#).unwrap();

    let restored = load_session(&store).unwrap();
    assert_eq!(restored.readings.get("b12"), Some(310.0));
    assert!(restored.plan.is_empty());
}

#[test]
fn test_malformed_plan_keeps_readings() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store
        .set(
            APP_STATE_KEY,
            r#"{"biomarkers": {"ferritin": 12, "b12": 300},
                "plan": {"breakfast": 42, "lunch": {"name": 5, "mode": "diy"}, "dinner": {"name": null, "mode": 7}}}"#,
        )
        .unwrap();

    let restored = load_session(&store).unwrap();
    assert_eq!(restored.readings.get("ferritin"), Some(12.0));
    assert_eq!(restored.readings.get("b12"), Some(300.0));
    assert!(restored.plan.get(MealSlot::Breakfast).is_none());

    let lunch = restored.plan.get(MealSlot::Lunch).unwrap();
    assert_eq!(lunch.name, "");
    assert_eq!(lunch.mode, Some(PlanMode::Diy));

    let dinner = restored.plan.get(MealSlot::Dinner).unwrap();
    assert_eq!(dinner.mode, Some(PlanMode::Other));
}

#[test]
fn test_wizard_feeds_last_detected_products() {
    let mut session = PlannerSession::new();
    let mut wizard = RecipeWizard::new();
    assert!(matches!(
        wizard.confirm_products(),
        Err(WizardError::InvalidStep { step: WizardStep::Upload, .. })
    ));

    wizard.attach_photo("fridge.jpg").unwrap();
    wizard.apply_detection(vec!["кабачок".to_string(), "сыр".to_string()]).unwrap();
    session.set_last_detected_products(wizard.confirm_products().unwrap());

    let mut second_run = RecipeWizard::new();
    second_run.start_with_products(&session.last_detected_products).unwrap();
    assert_eq!(second_run.step(), WizardStep::Products);
    assert_eq!(second_run.selected(), ["кабачок", "сыр"]);
}
