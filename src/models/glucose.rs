//! Glucose readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Factor converting mmol/L to mg/dL.
pub const MMOL_TO_MG_DL: f64 = 18.0;

/// Unit a reading was captured in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GlucoseUnit {
    #[default]
    #[serde(rename = "mg/dL")]
    MgDl,
    #[serde(rename = "mmol/L")]
    MmolL,
}

impl GlucoseUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseUnit::MgDl => "mg/dL",
            GlucoseUnit::MmolL => "mmol/L",
        }
    }

    /// Convert a raw value in this unit to mg/dL.
    pub fn to_mg_dl(&self, value: f64) -> f64 {
        match self {
            GlucoseUnit::MgDl => value,
            GlucoseUnit::MmolL => value * MMOL_TO_MG_DL,
        }
    }
}

/// One glucose measurement. Value and unit are stored exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    pub id: String,
    pub value: f64,
    pub unit: GlucoseUnit,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GlucoseReading {
    pub fn mg_dl(&self) -> f64 {
        self.unit.to_mg_dl(self.value)
    }
}

/// Request body for logging a reading.
///
/// `value` accepts a number or the raw text of the input field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub unit: GlucoseUnit,
    #[serde(default)]
    pub notes: Option<String>,
    /// Capture time; defaults to now.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateReadingRequest {
    /// The entered value, if it is present and a finite number.
    pub fn parsed_value(&self) -> Option<f64> {
        let value = match self.value.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Notes with blank input treated as absent.
    pub fn cleaned_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateReadingRequest {
        serde_json::from_value(json!({ "value": value })).unwrap()
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&GlucoseUnit::MgDl).unwrap(), "\"mg/dL\"");
        assert_eq!(
            serde_json::from_str::<GlucoseUnit>("\"mmol/L\"").unwrap(),
            GlucoseUnit::MmolL
        );
    }

    #[test]
    fn test_mmol_conversion() {
        assert_eq!(GlucoseUnit::MmolL.to_mg_dl(5.5), 99.0);
        assert_eq!(GlucoseUnit::MgDl.to_mg_dl(5.5), 5.5);
    }

    #[test]
    fn test_parsed_value() {
        assert_eq!(request(json!(120)).parsed_value(), Some(120.0));
        assert_eq!(request(json!("6,2")).parsed_value(), Some(6.2));
        assert_eq!(request(json!(" 98.5 ")).parsed_value(), Some(98.5));
        assert_eq!(request(json!("")).parsed_value(), None);
        assert_eq!(request(json!("alto")).parsed_value(), None);
        assert_eq!(request(json!(null)).parsed_value(), None);
    }

    #[test]
    fn test_blank_notes_are_absent() {
        let req: CreateReadingRequest =
            serde_json::from_value(json!({ "value": 100, "notes": "  " })).unwrap();
        assert_eq!(req.cleaned_notes(), None);
        assert_eq!(req.unit, GlucoseUnit::MgDl);
    }
}
