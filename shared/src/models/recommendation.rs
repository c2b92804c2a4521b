//! Sowing-window recommendation rule engine

use serde::{Deserialize, Serialize};

use crate::models::settings::Thresholds;

/// Discrete sowing-window levels, ascending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    NoViable,
    Arriesgada,
    Favorable,
    Optima,
    Perfecta,
}

impl RecommendationLevel {
    /// Headline shown on the advisory card.
    pub fn title(&self) -> &'static str {
        match self {
            RecommendationLevel::NoViable => "No Viable",
            RecommendationLevel::Arriesgada => "Ventana Arriesgada",
            RecommendationLevel::Favorable => "Ventana Favorable",
            RecommendationLevel::Optima => "Ventana Óptima",
            RecommendationLevel::Perfecta => "Ventana Perfecta",
        }
    }

    /// Presentation color token; not part of the classification contract.
    pub fn color_token(&self) -> &'static str {
        match self {
            RecommendationLevel::NoViable => "red",
            RecommendationLevel::Arriesgada => "yellow",
            RecommendationLevel::Favorable => "emerald",
            RecommendationLevel::Optima => "green",
            RecommendationLevel::Perfecta => "blue",
        }
    }
}

impl std::fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationLevel::NoViable => write!(f, "No Viable"),
            RecommendationLevel::Arriesgada => write!(f, "Arriesgada"),
            RecommendationLevel::Favorable => write!(f, "Favorable"),
            RecommendationLevel::Optima => write!(f, "Óptima"),
            RecommendationLevel::Perfecta => write!(f, "Perfecta"),
        }
    }
}

/// A derived recommendation, recomputed on every analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub title: String,
    pub details: String,
    pub color: String,
}

impl Recommendation {
    fn new(level: RecommendationLevel, details: String) -> Self {
        Self {
            level,
            title: level.title().to_string(),
            details,
            color: level.color_token().to_string(),
        }
    }
}

/// Classify a seven-day accumulated rainfall figure plus the follow-up
/// forecast into a sowing-window recommendation.
///
/// Thresholds are evaluated highest-first, first match wins; thresholds are
/// taken as given, never validated or reordered. All comparisons are
/// inclusive. The Favorable arm is the only one where the follow-up check
/// changes the level itself: Perfecta and Óptima merely append a caution
/// note when follow-up rain falls short.
pub fn classify(
    seven_day_total: f64,
    total_forecast_rain: f64,
    thresholds: &Thresholds,
    min_follow_up_rain: f64,
    forecast_days: u32,
) -> Recommendation {
    let has_follow_up = total_forecast_rain >= min_follow_up_rain;

    let rules = [
        (thresholds.perfect, RecommendationLevel::Perfecta),
        (thresholds.optimal, RecommendationLevel::Optima),
        (thresholds.minimum, RecommendationLevel::Favorable),
    ];
    let matched = rules
        .iter()
        .find(|(limit, _)| seven_day_total >= *limit)
        .map(|(_, level)| *level);

    match matched {
        Some(RecommendationLevel::Perfecta) => {
            let mut details = format!(
                "Evento de {seven_day_total:.1}mm. Saturación profunda."
            );
            if !has_follow_up {
                details.push_str(&format!(
                    " PRECAUCIÓN: Lluvia de seguimiento escasa ({total_forecast_rain:.1}mm en {forecast_days}d)."
                ));
            }
            Recommendation::new(RecommendationLevel::Perfecta, details)
        }
        Some(RecommendationLevel::Optima) => {
            let mut details = format!(
                "Evento de {seven_day_total:.1}mm. Humedad favorable."
            );
            if !has_follow_up {
                details.push_str(&format!(
                    " RIESGO: Lluvia de seguimiento baja ({total_forecast_rain:.1}mm en {forecast_days}d)."
                ));
            }
            Recommendation::new(RecommendationLevel::Optima, details)
        }
        Some(RecommendationLevel::Favorable) => {
            if has_follow_up {
                let details = format!(
                    "Evento de {seven_day_total:.1}mm. Humedad superficial. Lluvia de seguimiento positiva ({total_forecast_rain:.1}mm en próximos {forecast_days} días)."
                );
                Recommendation::new(RecommendationLevel::Favorable, details)
            } else {
                // The one rule where the secondary condition downgrades the
                // level instead of annotating it.
                let details = format!(
                    "Evento de {seven_day_total:.1}mm, pero lluvia de seguimiento insuficiente ({total_forecast_rain:.1}mm < {min_follow_up_rain}mm). Alto riesgo de desecación."
                );
                Recommendation::new(RecommendationLevel::Arriesgada, details)
            }
        }
        _ => {
            let details = format!(
                "Lluvia acumulada ({seven_day_total:.1}mm) insuficiente. Esperando evento de lluvia significativo (>{}mm).",
                thresholds.minimum
            );
            Recommendation::new(RecommendationLevel::NoViable, details)
        }
    }
}
