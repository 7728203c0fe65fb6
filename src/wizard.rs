use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::plan::{MealSlot, PlanItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Upload,
    Preview,
    Products,
    Difficulty,
    Result,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Upload,
        WizardStep::Preview,
        WizardStep::Products,
        WizardStep::Difficulty,
        WizardStep::Result,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Upload => "Загрузка",
            WizardStep::Preview => "Подтверждение",
            WizardStep::Products => "Продукты",
            WizardStep::Difficulty => "Сложность",
            WizardStep::Result => "Результат",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "легкий")]
    Easy,
    #[default]
    #[serde(rename = "средний")]
    Medium,
    #[serde(rename = "сложный")]
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "легкий",
            Difficulty::Medium => "средний",
            Difficulty::Hard => "сложный",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Быстрые рецепты до 20 минут, минимум ингредиентов.",
            Difficulty::Medium => "Сбалансированные рецепты с интересными сочетаниями.",
            Difficulty::Hard => "Изысканные блюда для тех, кто любит готовить.",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "легкий" | "лёгкий" | "easy" => Ok(Difficulty::Easy),
            "средний" | "medium" => Ok(Difficulty::Medium),
            "сложный" | "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot {operation} at step {step}")]
    InvalidStep { operation: &'static str, step: WizardStep },
    #[error("no products selected")]
    NoProducts,
    #[error("no meal selected for generation")]
    NoMealSelected,
}

/// What the backend needs to generate recipes from confirmed products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeGenerationRequest {
    pub products: Vec<String>,
    pub difficulty: Difficulty,
    pub meal: MealSlot,
}

/// Photo to recipe flow: upload a photo, confirm what was recognised on it,
/// pick a difficulty, then receive generated recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeWizard {
    step: WizardStep,
    photo: Option<PathBuf>,
    detected: Vec<String>,
    selected: Vec<String>,
    difficulty: Difficulty,
    status: GenerationStatus,
    recipes: Vec<PlanItem>,
}

impl RecipeWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn photo(&self) -> Option<&Path> {
        self.photo.as_deref()
    }

    pub fn detected(&self) -> &[String] {
        &self.detected
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, product: &str) -> bool {
        self.selected.iter().any(|p| p == product)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn recipes(&self) -> &[PlanItem] {
        &self.recipes
    }

    fn expect_step(&self, expected: WizardStep, operation: &'static str) -> Result<(), WizardError> {
        let step = self.step();
        if step != expected {
            return Err(WizardError::InvalidStep { operation, step });
        }
        Ok(())
    }

    fn goto(&mut self, step: WizardStep) {
        tracing::debug!(from = %self.step(), to = %step, "Wizard step change");
        self.step = step;
    }

    pub fn attach_photo(&mut self, path: impl Into<PathBuf>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Upload, "attach a photo")?;
        self.photo = Some(path.into());
        self.goto(WizardStep::Preview);
        Ok(())
    }

    pub fn remove_photo(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Preview, "remove the photo")?;
        self.photo = None;
        self.detected.clear();
        self.selected.clear();
        self.goto(WizardStep::Upload);
        Ok(())
    }

    /// Records recognised products; all of them start selected.
    pub fn apply_detection(&mut self, products: Vec<String>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Preview, "apply detection results")?;
        self.selected = products.clone();
        self.detected = products;
        self.goto(WizardStep::Products);
        Ok(())
    }

    /// Skips the photo and reuses products confirmed in an earlier run.
    pub fn start_with_products(&mut self, last: &[String]) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Upload, "reuse previous products")?;
        if last.is_empty() {
            return Err(WizardError::NoProducts);
        }
        self.detected = last.to_vec();
        self.selected = last.to_vec();
        self.goto(WizardStep::Products);
        Ok(())
    }

    /// Selects or deselects a product. Returns whether it is selected afterwards.
    pub fn toggle_product(&mut self, product: &str) -> Result<bool, WizardError> {
        self.expect_step(WizardStep::Products, "toggle a product")?;
        if let Some(pos) = self.selected.iter().position(|p| p == product) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(product.to_string());
            Ok(true)
        }
    }

    /// Moves on to difficulty selection. The returned list is what the
    /// session should remember as the last detected products.
    pub fn confirm_products(&mut self) -> Result<Vec<String>, WizardError> {
        self.expect_step(WizardStep::Products, "confirm products")?;
        if self.selected.is_empty() {
            return Err(WizardError::NoProducts);
        }
        self.goto(WizardStep::Difficulty);
        Ok(self.selected.clone())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Difficulty, "set the difficulty")?;
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn begin_generation(&mut self, meal: Option<MealSlot>) -> Result<RecipeGenerationRequest, WizardError> {
        self.expect_step(WizardStep::Difficulty, "start generation")?;
        let meal = meal.ok_or(WizardError::NoMealSelected)?;
        self.status = GenerationStatus::Loading;
        self.recipes.clear();
        self.goto(WizardStep::Result);
        Ok(RecipeGenerationRequest {
            products: self.selected.clone(),
            difficulty: self.difficulty,
            meal,
        })
    }

    pub fn generation_succeeded(&mut self, recipes: Vec<PlanItem>) -> Result<(), WizardError> {
        self.expect_loading("store generated recipes")?;
        self.status = GenerationStatus::Succeeded;
        self.recipes = recipes;
        Ok(())
    }

    pub fn generation_failed(&mut self) -> Result<(), WizardError> {
        self.expect_loading("record a failed generation")?;
        self.status = GenerationStatus::Failed;
        Ok(())
    }

    fn expect_loading(&self, operation: &'static str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Result, operation)?;
        if self.status != GenerationStatus::Loading {
            return Err(WizardError::InvalidStep {
                operation,
                step: WizardStep::Result,
            });
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = RecipeWizard::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn at_difficulty() -> RecipeWizard {
        let mut wizard = RecipeWizard::new();
        wizard.attach_photo("fridge.jpg").unwrap();
        wizard.apply_detection(products(&["яйца", "сыр", "томаты"])).unwrap();
        wizard.confirm_products().unwrap();
        wizard
    }

    #[test]
    fn test_full_flow() {
        let mut wizard = RecipeWizard::new();
        assert_eq!(wizard.step(), WizardStep::Upload);
        wizard.attach_photo("fridge.jpg").unwrap();
        assert_eq!(wizard.step(), WizardStep::Preview);
        assert_eq!(wizard.photo(), Some(Path::new("fridge.jpg")));

        wizard.apply_detection(products(&["яйца", "сыр", "томаты"])).unwrap();
        assert_eq!(wizard.selected(), wizard.detected());

        assert!(!wizard.toggle_product("сыр").unwrap());
        assert!(wizard.toggle_product("зелень").unwrap());
        let confirmed = wizard.confirm_products().unwrap();
        assert_eq!(confirmed, products(&["яйца", "томаты", "зелень"]));
        assert_eq!(wizard.step(), WizardStep::Difficulty);

        assert_eq!(wizard.difficulty(), Difficulty::Medium);
        wizard.set_difficulty(Difficulty::Easy).unwrap();
        let request = wizard.begin_generation(Some(MealSlot::Lunch)).unwrap();
        assert_eq!(request.difficulty, Difficulty::Easy);
        assert_eq!(request.meal, MealSlot::Lunch);
        assert_eq!(wizard.status(), GenerationStatus::Loading);

        wizard.generation_succeeded(vec![PlanItem::new("Омлет", vec![])]).unwrap();
        assert_eq!(wizard.status(), GenerationStatus::Succeeded);
        assert_eq!(wizard.recipes().len(), 1);
    }

    #[test]
    fn test_confirm_rejected_at_upload() {
        let mut wizard = RecipeWizard::new();
        let err = wizard.confirm_products().unwrap_err();
        assert_eq!(
            err,
            WizardError::InvalidStep {
                operation: "confirm products",
                step: WizardStep::Upload
            }
        );
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_empty_selection_cannot_be_confirmed() {
        let mut wizard = RecipeWizard::new();
        wizard.attach_photo("a.png").unwrap();
        wizard.apply_detection(products(&["лук"])).unwrap();
        wizard.toggle_product("лук").unwrap();
        assert_eq!(wizard.confirm_products(), Err(WizardError::NoProducts));
        assert_eq!(wizard.step(), WizardStep::Products);
    }

    #[test]
    fn test_remove_photo_clears_detection() {
        let mut wizard = RecipeWizard::new();
        wizard.attach_photo("a.png").unwrap();
        wizard.remove_photo().unwrap();
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert!(wizard.photo().is_none());
        assert!(wizard.detected().is_empty());
    }

    #[test]
    fn test_start_with_previous_products() {
        let mut wizard = RecipeWizard::new();
        assert_eq!(wizard.start_with_products(&[]), Err(WizardError::NoProducts));
        wizard.start_with_products(&products(&["рис"])).unwrap();
        assert_eq!(wizard.step(), WizardStep::Products);
        assert!(wizard.is_selected("рис"));
    }

    #[test]
    fn test_generation_needs_meal() {
        let mut wizard = at_difficulty();
        assert_eq!(wizard.begin_generation(None), Err(WizardError::NoMealSelected));
        assert_eq!(wizard.step(), WizardStep::Difficulty);
        assert_eq!(wizard.status(), GenerationStatus::Idle);
    }

    #[test]
    fn test_failure_and_reset() {
        let mut wizard = at_difficulty();
        wizard.begin_generation(Some(MealSlot::Dinner)).unwrap();
        wizard.generation_failed().unwrap();
        assert_eq!(wizard.status(), GenerationStatus::Failed);
        assert!(wizard.generation_succeeded(vec![]).is_err());

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.status(), GenerationStatus::Idle);
        assert_eq!(wizard.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_parse_and_serde() {
        assert_eq!("Сложный".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("extreme".parse::<Difficulty>().is_err());
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"легкий\"");
    }

    #[test]
    fn test_step_titles() {
        let titles: Vec<_> = WizardStep::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Загрузка", "Подтверждение", "Продукты", "Сложность", "Результат"]);
        assert_eq!(WizardStep::Difficulty.index(), 3);
    }
}
