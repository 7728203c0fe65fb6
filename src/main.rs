use anyhow::{anyhow, Context, Result};
use diet_planner::actions;
use diet_planner::api_connection::connection::ApiClient;
use diet_planner::biomarkers::Catalog;
use diet_planner::cli::{parse_args, Command, PlanCommand};
use diet_planner::config::{AppConfig, BACKEND_URL_ENV_VAR};
use diet_planner::logging::init_logging;
use diet_planner::plan::{MealPlan, MealSlot, PlanItem};
use diet_planner::session::PlannerSession;
use diet_planner::shopping::{aggregate_with_locale, Locale, PluralTable, ShoppingListFormatter};
use diet_planner::storage::{load_session, save_session, FileStore};
use std::path::Path;
use tokio::fs;

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::load_csv(path)
            .with_context(|| format!("Failed to load biomarker catalog from '{}'", path.display())),
        None => Catalog::embedded(),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in '{}'", path.display()))
}

fn print_plan(session: &PlannerSession) {
    for slot in MealSlot::ALL {
        match session.plan.get(slot) {
            Some(item) => {
                let mode = item.mode.map(|m| m.as_str()).unwrap_or("-");
                println!("{}: {} [{}]", slot.title(), item.name, mode);
            }
            None => println!("{}: —", slot.title()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log_level)?;

    let cli_args = parse_args();
    let data_dir = cli_args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let mut store = FileStore::new(&data_dir);
    let locale = Locale::new(&config.locale);
    let formatter = ShoppingListFormatter::new(locale.clone(), PluralTable::default());

    let mut session = load_session(&store).unwrap_or_default().with_locale(locale.clone());
    tracing::debug!(data_dir = %data_dir.display(), readings = session.readings.len(), "Session loaded");

    match cli_args.command {
        Command::Status { marker, value } => {
            let catalog = load_catalog(&config)?;
            let def = catalog
                .get(&marker)
                .ok_or_else(|| anyhow!("Unknown biomarker '{}'", marker))?;
            let status = def.status(Some(value));
            println!(
                "{}: {} {} — {}",
                def.display_name,
                locale.format_number(value),
                def.unit,
                status.label()
            );
        }
        Command::Biomarkers => {
            let catalog = load_catalog(&config)?;
            for (def, status) in session.biomarker_statuses(&catalog) {
                let value = session
                    .readings
                    .get(&def.key)
                    .map(|v| format!("{} {}", locale.format_number(v), def.unit))
                    .unwrap_or_else(|| "—".to_string());
                println!("{:<14} {:<28} {:<16} {}", def.key, def.display_name, value, status.label());
            }
        }
        Command::SetReading { key, raw } => {
            let catalog = load_catalog(&config)?;
            if catalog.get(&key).is_none() {
                tracing::warn!(key = %key, "Reading for a biomarker missing from the catalog");
            }
            match session.set_reading_from_input(&key, &raw) {
                Some(value) => println!("{} = {}", key, locale.format_number(value)),
                None => println!("{} cleared", key),
            }
            save_session(&mut store, &session);
        }
        Command::Plan(PlanCommand::Set { meal, file, mode }) => {
            let item: PlanItem = read_json(&file).await?;
            session.set_plan_item(meal, item, mode);
            save_session(&mut store, &session);
            print_plan(&session);
        }
        Command::Plan(PlanCommand::Clear { meal }) => {
            match meal {
                Some(meal) => session.clear_plan_item(meal),
                None => session.clear_plan(),
            }
            save_session(&mut store, &session);
            print_plan(&session);
        }
        Command::Plan(PlanCommand::Show) => print_plan(&session),
        Command::ShoppingList { plan } => {
            let entries = match plan {
                Some(path) => {
                    let plan: MealPlan = read_json(&path).await?;
                    aggregate_with_locale(&plan, &locale)
                }
                None => session.shopping_list(),
            };
            println!("{}", formatter.render(&entries));
        }
        Command::Generate { mode, meal } => {
            let backend_url = config
                .backend_url
                .as_deref()
                .ok_or_else(|| anyhow!("{} must be set to talk to the backend", BACKEND_URL_ENV_VAR))?;
            let client = ApiClient::new(backend_url)?.with_token(session.auth.token.clone());

            session.set_current_meal(meal);
            actions::fetch_recommendations(&client, &mut session, mode, None)
                .await
                .context("Generation failed")?;

            for (idx, item) in session.generator.results.iter().enumerate() {
                println!("{}. {}", idx + 1, item.name);
            }
            if session.generator.results.is_empty() {
                println!("Нет предложений.");
            } else if let Some(slot) = session.choose_result(0) {
                println!("Добавлено в {}: {}", slot.title(), session.plan.get(slot).map(|i| i.name.as_str()).unwrap_or(""));
                save_session(&mut store, &session);
            }
        }
    }

    Ok(())
}
