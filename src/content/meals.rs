//! Weekly meal plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::DiabetesType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// The day for a lowercase English tag such as `"friday"`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda",
            Weekday::Tuesday => "Terça",
            Weekday::Wednesday => "Quarta",
            Weekday::Thursday => "Quinta",
            Weekday::Friday => "Sexta",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Seg",
            Weekday::Tuesday => "Ter",
            Weekday::Wednesday => "Qua",
            Weekday::Thursday => "Qui",
            Weekday::Friday => "Sex",
            Weekday::Saturday => "Sáb",
            Weekday::Sunday => "Dom",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlot {
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Café da Manhã",
            MealSlot::MorningSnack => "Lanche da Manhã",
            MealSlot::Lunch => "Almoço",
            MealSlot::AfternoonSnack => "Lanche da Tarde",
            MealSlot::Dinner => "Jantar",
            MealSlot::EveningSnack => "Ceia",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionalInfo {
    pub carbs: f64,
    pub protein: f64,
    pub fiber: f64,
    pub fat: f64,
    pub sodium: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub time: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fiber: f64,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutritional_info: NutritionalInfo,
    pub diabetes_type: Vec<DiabetesType>,
    pub difficulty: String,
    /// Minutes
    pub prep_time: u32,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Recipe {
    /// Suitable for everyone until the user has told us their diabetes type.
    pub fn recommended_for(&self, diabetes_type: Option<DiabetesType>) -> bool {
        match diabetes_type {
            None => true,
            Some(t) => self.diabetes_type.contains(&t),
        }
    }
}

/// One day of the plan, keyed by slot.
pub type DayMeals = BTreeMap<MealSlot, Recipe>;

/// A meal in a day view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub slot: MealSlot,
    pub slot_label: &'static str,
    pub recommended: bool,
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlanView {
    pub day: Weekday,
    pub label: &'static str,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Clone)]
pub struct MealPlan {
    days: BTreeMap<Weekday, DayMeals>,
}

impl MealPlan {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let days: BTreeMap<Weekday, DayMeals> = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid meal plan: {}", e)))?;
        if !days.contains_key(&Weekday::Monday) {
            return Err(AppError::Internal("Meal plan has no Monday".to_string()));
        }
        Ok(Self { days })
    }

    /// Plan for `day`; days without a plan, or not days at all, show Monday.
    pub fn day(&self, day: &str) -> (Weekday, &DayMeals) {
        let requested = Weekday::parse(day)
            .and_then(|d| self.days.get(&d).map(|meals| (d, meals)));
        match requested {
            Some(found) => found,
            None => (Weekday::Monday, &self.days[&Weekday::Monday]),
        }
    }

    pub fn has_plan(&self, day: Weekday) -> bool {
        self.days.contains_key(&day)
    }

    pub fn day_view(&self, day: &str, diabetes_type: Option<DiabetesType>) -> DayPlanView {
        let (weekday, meals) = self.day(day);
        DayPlanView {
            day: weekday,
            label: weekday.label(),
            meals: meals
                .iter()
                .map(|(slot, recipe)| PlannedMeal {
                    slot: *slot,
                    slot_label: slot.label(),
                    recommended: recipe.recommended_for(diabetes_type),
                    recipe: recipe.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, types: Vec<DiabetesType>) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            time: "07:00".to_string(),
            calories: 300.0,
            carbs: 40.0,
            protein: 10.0,
            fiber: 5.0,
            description: String::new(),
            ingredients: vec![],
            instructions: vec![],
            nutritional_info: NutritionalInfo {
                carbs: 40.0,
                protein: 10.0,
                fiber: 5.0,
                fat: 3.0,
                sodium: 100.0,
            },
            diabetes_type: types,
            difficulty: "Fácil".to_string(),
            prep_time: 10,
            tips: vec![],
        }
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse("friday"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("sunday"), Some(Weekday::Sunday));
        assert_eq!(Weekday::parse("Friday"), None);
        assert_eq!(Weekday::parse("feriado"), None);
    }

    #[test]
    fn test_recommendation() {
        let meal = recipe("a", vec![DiabetesType::Type2]);
        assert!(meal.recommended_for(None));
        assert!(meal.recommended_for(Some(DiabetesType::Type2)));
        assert!(!meal.recommended_for(Some(DiabetesType::Type1)));
    }

    #[test]
    fn test_unknown_day_falls_back_to_monday() {
        let mut days = BTreeMap::new();
        let mut monday = DayMeals::new();
        monday.insert(MealSlot::Breakfast, recipe("mon-breakfast", vec![]));
        days.insert(Weekday::Monday, monday);
        let plan = MealPlan { days };

        assert_eq!(plan.day("friday").0, Weekday::Monday);
        assert_eq!(plan.day("feriado").0, Weekday::Monday);
        assert_eq!(plan.day("monday").1[&MealSlot::Breakfast].id, "mon-breakfast");
    }

    #[test]
    fn test_slots_in_day_order() {
        let raw = r#"{"monday": {
            "dinner": {"id": "d", "name": "d", "time": "19:00", "calories": 1, "carbs": 1, "protein": 1,
              "fiber": 1, "description": "", "ingredients": [], "instructions": [],
              "nutritionalInfo": {"carbs": 1, "protein": 1, "fiber": 1, "fat": 1, "sodium": 1},
              "diabetesType": ["type1"], "difficulty": "Médio", "prepTime": 30, "tips": []},
            "breakfast": {"id": "b", "name": "b", "time": "07:00", "calories": 1, "carbs": 1, "protein": 1,
              "fiber": 1, "description": "", "ingredients": [], "instructions": [],
              "nutritionalInfo": {"carbs": 1, "protein": 1, "fiber": 1, "fat": 1, "sodium": 1},
              "diabetesType": ["type2"], "difficulty": "Fácil", "prepTime": 5}
        }}"#;
        let plan = MealPlan::from_json(raw).unwrap();
        let view = plan.day_view("monday", Some(DiabetesType::Type2));
        let slots: Vec<MealSlot> = view.meals.iter().map(|m| m.slot).collect();
        assert_eq!(slots, vec![MealSlot::Breakfast, MealSlot::Dinner]);
        assert!(view.meals[0].recommended);
        assert!(!view.meals[1].recommended);
        assert_eq!(view.meals[0].slot_label, "Café da Manhã");
    }

    #[test]
    fn test_plan_without_monday_is_rejected() {
        assert!(MealPlan::from_json(r#"{"tuesday": {}}"#).is_err());
    }
}
