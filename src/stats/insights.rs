//! Automatic insights for the records view.

use serde::Serialize;

use super::{whole, GlucoseStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl InsightTier {
    pub fn from_percentage(percentage_in_range: f64) -> Self {
        if percentage_in_range >= 70.0 {
            InsightTier::Excellent
        } else if percentage_in_range >= 50.0 {
            InsightTier::Good
        } else {
            InsightTier::NeedsImprovement
        }
    }
}

pub const NO_DATA_INSIGHT: &str =
    "Adicione mais registros para ver insights personalizados sobre seu controle glicêmico.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<InsightTier>,
    pub messages: Vec<String>,
}

pub fn insights(stats: Option<&GlucoseStats>) -> Insights {
    let Some(stats) = stats else {
        return Insights {
            tier: None,
            messages: vec![NO_DATA_INSIGHT.to_string()],
        };
    };

    let pct = whole(stats.percentage_in_range);
    let tier = InsightTier::from_percentage(stats.percentage_in_range);
    let range_message = match tier {
        InsightTier::Excellent => format!(
            "🎉 Excelente! Você está mantendo {}% das suas leituras dentro da meta.",
            pct
        ),
        InsightTier::Good => format!(
            "👍 Bom progresso! {}% das leituras estão no alvo. Continue assim!",
            pct
        ),
        InsightTier::NeedsImprovement => format!(
            "💪 Há espaço para melhoria. Apenas {}% das leituras estão no alvo.",
            pct
        ),
    };
    let average_message = format!(
        "📈 Sua média atual é {} mg/dL. A meta é manter abaixo de 140 mg/dL.",
        whole(stats.average)
    );

    Insights {
        tier: Some(tier),
        messages: vec![range_message, average_message],
    }
}
