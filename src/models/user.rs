//! User profile created by the onboarding questionnaire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Diabetes category chosen during onboarding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiabetesType {
    Type1,
    Type2,
    Gestational,
    Prediabetes,
}

impl DiabetesType {
    pub const ALL: [DiabetesType; 4] = [
        DiabetesType::Type1,
        DiabetesType::Type2,
        DiabetesType::Gestational,
        DiabetesType::Prediabetes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "Diabetes Tipo 1",
            DiabetesType::Type2 => "Diabetes Tipo 2",
            DiabetesType::Gestational => "Diabetes Gestacional",
            DiabetesType::Prediabetes => "Pré-diabetes",
        }
    }
}

/// Self-reported experience managing the condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Iniciante",
            ExperienceLevel::Intermediate => "Intermediário",
            ExperienceLevel::Advanced => "Avançado",
        }
    }
}

/// Options offered by the "main challenges" question.
pub const CHALLENGE_OPTIONS: [&str; 7] = [
    "Controle da alimentação",
    "Exercícios regulares",
    "Monitoramento da glicemia",
    "Aderência à medicação",
    "Controle do peso",
    "Gestão do estresse",
    "Complicações existentes",
];

/// Options offered by the "current medications" question.
pub const MEDICATION_OPTIONS: [&str; 7] = [
    "Insulina de ação rápida",
    "Insulina de ação lenta",
    "Metformina",
    "Sulfoniluréia",
    "Inibidores DPP-4",
    "Análogos GLP-1",
    "Não uso medicação",
];

/// The single user of the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub age: u32,
    pub diabetes_type: DiabetesType,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub experience: ExperienceLevel,
    pub has_access: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// First word of the name, or the generic salutation when the name is blank.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("Usuário")
    }
}

/// Request body for editing the profile. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<serde_json::Value>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default)]
    pub challenges: Option<Vec<String>>,
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<ExperienceLevel>,
}

impl UpdateProfileRequest {
    /// Apply the edit over `user`. Identity, access and signup date never change.
    pub fn apply(&self, user: &User) -> User {
        User {
            id: user.id.clone(),
            email: self.email.clone().unwrap_or_else(|| user.email.clone()),
            name: self.name.clone().unwrap_or_else(|| user.name.clone()),
            age: self.age.as_ref().map(parse_age_value).unwrap_or(user.age),
            diabetes_type: self.diabetes_type.unwrap_or(user.diabetes_type),
            challenges: self
                .challenges
                .clone()
                .unwrap_or_else(|| user.challenges.clone()),
            medications: self
                .medications
                .clone()
                .unwrap_or_else(|| user.medications.clone()),
            experience: self.experience.unwrap_or(user.experience),
            has_access: user.has_access,
            created_at: user.created_at,
        }
    }
}

/// Parse a user-entered age, falling back to 0.
pub fn parse_age(raw: &str) -> u32 {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| {
            // Leading digits are enough: "35 anos" is 35.
            let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

fn parse_age_value(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_age(s),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana Maria Souza".to_string(),
            age: 42,
            diabetes_type: DiabetesType::Type2,
            challenges: vec!["Controle do peso".to_string()],
            medications: vec![],
            experience: ExperienceLevel::Beginner,
            has_access: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_parse_age_falls_back_to_zero() {
        assert_eq!(parse_age("35"), 35);
        assert_eq!(parse_age(" 61 "), 61);
        assert_eq!(parse_age("35 anos"), 35);
        assert_eq!(parse_age(""), 0);
        assert_eq!(parse_age("abc"), 0);
    }

    #[test]
    fn test_first_name() {
        let mut user = sample_user();
        assert_eq!(user.first_name(), "Ana");
        user.name = "   ".to_string();
        assert_eq!(user.first_name(), "Usuário");
    }

    #[test]
    fn test_profile_edit_keeps_identity() {
        let user = sample_user();
        let edit = UpdateProfileRequest {
            name: Some("Ana Souza".to_string()),
            age: Some(serde_json::json!("43")),
            experience: Some(ExperienceLevel::Intermediate),
            ..Default::default()
        };

        let updated = edit.apply(&user);
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(updated.has_access, user.has_access);
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(updated.age, 43);
        assert_eq!(updated.experience, ExperienceLevel::Intermediate);
        assert_eq!(updated.diabetes_type, DiabetesType::Type2);
        assert_eq!(updated.challenges, user.challenges);
    }

    #[test]
    fn test_diabetes_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&DiabetesType::Prediabetes).unwrap(),
            "\"prediabetes\""
        );
        let parsed: DiabetesType = serde_json::from_str("\"type1\"").unwrap();
        assert_eq!(parsed, DiabetesType::Type1);
        assert!(serde_json::from_str::<DiabetesType>("\"type3\"").is_err());
    }
}
