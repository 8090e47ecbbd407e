//! Onboarding questionnaire.
//!
//! A linear five-step wizard over a transient draft. The draft is only turned
//! into a [`User`] when the last step is completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    parse_age, DiabetesType, ExperienceLevel, User, CHALLENGE_OPTIONS, MEDICATION_OPTIONS,
};

/// In-progress answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub name: String,
    pub email: String,
    /// Raw text of the age field
    pub age: String,
    pub diabetes_type: Option<DiabetesType>,
    pub challenges: Vec<String>,
    pub medications: Vec<String>,
    pub experience: Option<ExperienceLevel>,
}

/// Partial update of the draft. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraftPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<serde_json::Value>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default)]
    pub experience: Option<ExperienceLevel>,
}

/// Multi-select questions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuizChoice {
    Challenges,
    Medications,
}

impl QuizChoice {
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            QuizChoice::Challenges => &CHALLENGE_OPTIONS,
            QuizChoice::Medications => &MEDICATION_OPTIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleRequest {
    pub field: QuizChoice,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuizStep {
    BasicInfo,
    DiabetesType,
    Challenges,
    Medications,
    Experience,
}

impl QuizStep {
    pub const ALL: [QuizStep; 5] = [
        QuizStep::BasicInfo,
        QuizStep::DiabetesType,
        QuizStep::Challenges,
        QuizStep::Medications,
        QuizStep::Experience,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            QuizStep::BasicInfo => "Informações Básicas",
            QuizStep::DiabetesType => "Tipo de Diabetes",
            QuizStep::Challenges => "Principais Desafios",
            QuizStep::Medications => "Medicações Atuais",
            QuizStep::Experience => "Experiência com Controle",
        }
    }

    pub fn can_proceed(&self, draft: &QuizDraft) -> bool {
        match self {
            QuizStep::BasicInfo => {
                !draft.name.trim().is_empty()
                    && !draft.email.trim().is_empty()
                    && !draft.age.trim().is_empty()
            }
            QuizStep::DiabetesType => draft.diabetes_type.is_some(),
            QuizStep::Challenges => !draft.challenges.is_empty(),
            QuizStep::Medications => true,
            QuizStep::Experience => draft.experience.is_some(),
        }
    }
}

/// What happened when the user pressed "next".
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the step at this index.
    Moved(usize),
    /// The last step was completed with these answers.
    Completed(QuizDraft),
}

/// Wizard position and draft.
#[derive(Debug, Clone, Default)]
pub struct QuizWizard {
    step: usize,
    draft: QuizDraft,
}

/// A single-choice answer with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct Choice<T> {
    pub value: T,
    pub label: &'static str,
}

/// Serializable view of the wizard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub step_index: usize,
    pub total_steps: usize,
    pub step: QuizStep,
    pub title: &'static str,
    pub can_proceed: bool,
    pub is_last_step: bool,
    pub draft: QuizDraft,
    pub diabetes_types: Vec<Choice<DiabetesType>>,
    pub experience_levels: Vec<Choice<ExperienceLevel>>,
    pub challenge_options: &'static [&'static str],
    pub medication_options: &'static [&'static str],
}

impl QuizWizard {
    pub fn step(&self) -> QuizStep {
        QuizStep::ALL[self.step]
    }

    pub fn draft(&self) -> &QuizDraft {
        &self.draft
    }

    pub fn can_proceed(&self) -> bool {
        self.step().can_proceed(&self.draft)
    }

    pub fn view(&self) -> QuizView {
        QuizView {
            step_index: self.step,
            total_steps: QuizStep::ALL.len(),
            step: self.step(),
            title: self.step().title(),
            can_proceed: self.can_proceed(),
            is_last_step: self.step + 1 == QuizStep::ALL.len(),
            draft: self.draft.clone(),
            diabetes_types: DiabetesType::ALL
                .iter()
                .map(|t| Choice {
                    value: *t,
                    label: t.label(),
                })
                .collect(),
            experience_levels: ExperienceLevel::ALL
                .iter()
                .map(|e| Choice {
                    value: *e,
                    label: e.label(),
                })
                .collect(),
            challenge_options: &CHALLENGE_OPTIONS,
            medication_options: &MEDICATION_OPTIONS,
        }
    }

    pub fn patch(&mut self, patch: QuizDraftPatch) {
        if let Some(name) = patch.name {
            self.draft.name = name;
        }
        if let Some(email) = patch.email {
            self.draft.email = email;
        }
        if let Some(age) = patch.age {
            self.draft.age = match age {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
        }
        if let Some(diabetes_type) = patch.diabetes_type {
            self.draft.diabetes_type = Some(diabetes_type);
        }
        if let Some(experience) = patch.experience {
            self.draft.experience = Some(experience);
        }
    }

    /// Select `value` if it is not selected, deselect it otherwise.
    pub fn toggle(&mut self, field: QuizChoice, value: &str) -> Result<(), AppError> {
        if !field.options().contains(&value) {
            return Err(AppError::Validation(format!(
                "Unknown option {:?} for {:?}",
                value, field
            )));
        }

        let selected = match field {
            QuizChoice::Challenges => &mut self.draft.challenges,
            QuizChoice::Medications => &mut self.draft.medications,
        };
        if let Some(pos) = selected.iter().position(|v| v == value) {
            selected.remove(pos);
        } else {
            selected.push(value.to_string());
        }
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Move forward, or complete the quiz on the last step.
    ///
    /// Completing resets the wizard so a later visit starts over.
    pub fn advance(&mut self) -> Result<Advance, AppError> {
        if !self.can_proceed() {
            return Err(AppError::Validation(format!(
                "Step \"{}\" is not complete",
                self.step().title()
            )));
        }

        if self.step + 1 < QuizStep::ALL.len() {
            self.step += 1;
            Ok(Advance::Moved(self.step))
        } else {
            let draft = std::mem::take(&mut self.draft);
            self.step = 0;
            Ok(Advance::Completed(draft))
        }
    }
}

/// Whether `email` is the administrative identity. Case-sensitive, exact.
pub fn is_admin(email: &str, admin_email: &str) -> bool {
    email == admin_email
}

/// Turn completed answers into the user record.
pub fn build_user(draft: QuizDraft, admin_email: &str, now: DateTime<Utc>) -> Result<User, AppError> {
    let diabetes_type = draft
        .diabetes_type
        .ok_or_else(|| AppError::Validation("Diabetes type is required".to_string()))?;
    let experience = draft
        .experience
        .ok_or_else(|| AppError::Validation("Experience is required".to_string()))?;

    Ok(User {
        id: uuid::Uuid::new_v4().to_string(),
        has_access: is_admin(&draft.email, admin_email),
        age: parse_age(&draft.age),
        email: draft.email,
        name: draft.name,
        diabetes_type,
        challenges: draft.challenges,
        medications: draft.medications,
        experience,
        created_at: now,
    })
}
