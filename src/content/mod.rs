//! Static educational content bundled with the binary.

pub mod ebook;
pub mod meals;

pub use ebook::{parse_page, Chapter, ChapterSummary, Ebook, ReaderPosition, TOTAL_PAGES};
pub use meals::{DayPlanView, MealPlan, Weekday};

use crate::errors::AppError;

const EBOOK_JSON: &str = include_str!("../../data/ebook.json");
const MEAL_PLANS_JSON: &str = include_str!("../../data/meal_plans.json");

/// E-book and meal plan, parsed once at startup.
#[derive(Debug, Clone)]
pub struct Content {
    pub ebook: Ebook,
    pub meals: MealPlan,
}

impl Content {
    pub fn load() -> Result<Self, AppError> {
        let ebook = Ebook::from_json(EBOOK_JSON)?;
        let meals = MealPlan::from_json(MEAL_PLANS_JSON)?;
        tracing::info!("Loaded {} e-book chapters", ebook.chapters().len());
        Ok(Self { ebook, meals })
    }
}

#[cfg(test)]
mod tests {
    use super::meals::MealSlot;
    use super::*;

    #[test]
    fn test_bundled_content_loads() {
        let content = Content::load().unwrap();
        assert_eq!(content.ebook.chapters().len(), 5);
        assert_eq!(content.ebook.chapter(2).unwrap().title, "Tipos de Diabetes");
        assert!(content.meals.has_plan(Weekday::Monday));
        assert!(!content.meals.has_plan(Weekday::Sunday));

        let monday = content.meals.day_view("monday", None);
        assert!(monday.meals.iter().all(|m| m.recommended));
        assert!(monday.meals.iter().any(|m| m.slot == MealSlot::MorningSnack));
    }
}
