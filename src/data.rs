use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::DepositQuote;
use crate::rates::{
    Backend, Database, DesignComplexity, Frontend, ProjectType, SupportLevel, Urgency,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalStack {
    pub frontend: Option<Frontend>,
    pub backend: Option<Backend>,
    pub database: Option<Database>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePreferences {
    /// Preferred duration in weeks. Advisory only.
    pub duration: Option<u32>,
    pub urgency: Option<Urgency>,
    pub support: Option<SupportLevel>,
}

impl Default for TimelinePreferences {
    fn default() -> Self {
        Self {
            duration: Some(8),
            urgency: Some(Urgency::Normal),
            support: Some(SupportLevel::Basic),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            min: Some(5000.0),
            max: Some(15000.0),
        }
    }
}

/// Everything the estimation wizard collects. `None` means not chosen yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub project_type: Option<ProjectType>,
    pub features: Vec<String>,
    pub design_complexity: Option<DesignComplexity>,
    pub technical_stack: TechnicalStack,
    pub timeline: TimelinePreferences,
    pub budget: Budget,
}

impl FormData {
    /// Add a feature id unless it is already selected.
    pub fn with_feature(mut self, id: &str) -> Self {
        if !self.features.iter().any(|f| f == id) {
            self.features.push(id.to_string());
        }
        self
    }

    /// Selected feature ids with duplicates removed, first occurrence wins.
    pub fn distinct_features(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.features.len());
        for id in &self.features {
            if !seen.contains(&id.as_str()) {
                seen.push(id);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: String,
    pub amount: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub development: f64,
    pub design: f64,
    pub testing: f64,
    pub deployment: f64,
    pub support: f64,
    pub total: f64,
    pub breakdown: Vec<CostLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    pub name: String,
    pub duration: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResult {
    pub planning: u32,
    pub design: u32,
    pub development: u32,
    pub testing: u32,
    pub deployment: u32,
    pub total: u32,
    pub phases: Vec<PhaseEstimate>,
}

impl TimelineResult {
    pub fn phase_sum(&self) -> u32 {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// A pricing and timeline pair computed from the same form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub pricing: PricingResult,
    pub timeline: TimelineResult,
}

/// A finalized estimate kept for booking follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub form: FormData,
    pub estimate: Estimate,
    pub deposit: DepositQuote,
}

impl Quote {
    pub fn new(form: FormData, estimate: Estimate, deposit_rate: f64) -> Self {
        let deposit = crate::pricing::deposit_quote(&estimate.pricing, deposit_rate);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            form,
            estimate,
            deposit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FieldUpdated,
    StepAdvanced,
    StepBlocked,
    StepBack,
    StepJumped,
    Reset,
    Estimated,
}

/// One wizard interaction, appended to a quote's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub step: usize,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(step: usize, event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            ts: Utc::now(),
            step,
            event_type,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_matches_wizard_start() {
        let form = FormData::default();
        assert!(form.project_type.is_none());
        assert!(form.features.is_empty());
        assert!(form.design_complexity.is_none());
        assert_eq!(form.technical_stack, TechnicalStack::default());
        assert_eq!(form.timeline.duration, Some(8));
        assert_eq!(form.timeline.urgency, Some(Urgency::Normal));
        assert_eq!(form.timeline.support, Some(SupportLevel::Basic));
        assert_eq!(form.budget.min, Some(5000.0));
        assert_eq!(form.budget.max, Some(15000.0));
    }

    #[test]
    fn test_form_parses_camel_case_json() {
        let json = serde_json::json!({
            "projectType": "saas-platform",
            "features": ["user-authentication", "analytics-dashboard"],
            "designComplexity": "premium",
            "technicalStack": {"frontend": "nextjs", "backend": "python", "database": "postgresql"},
            "timeline": {"duration": 12, "urgency": "urgent", "support": "premium"},
            "budget": {"min": 10000, "max": 50000}
        });

        let form: FormData = serde_json::from_value(json).unwrap();
        assert_eq!(form.project_type, Some(ProjectType::SaasPlatform));
        assert_eq!(form.features.len(), 2);
        assert_eq!(form.technical_stack.frontend, Some(Frontend::Nextjs));
        assert_eq!(form.timeline.urgency, Some(Urgency::Urgent));
        assert_eq!(form.budget.max, Some(50000.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let form: FormData =
            serde_json::from_str(r#"{"projectType": "simple-website"}"#).unwrap();
        assert_eq!(form.project_type, Some(ProjectType::SimpleWebsite));
        assert_eq!(form.timeline, TimelinePreferences::default());
        assert_eq!(form.budget, Budget::default());
    }

    #[test]
    fn test_quote_carries_deposit_split() {
        let mut form = FormData::default();
        form.project_type = Some(ProjectType::SimpleWebsite);
        let estimate = crate::advisor::estimate(&form);

        let quote = Quote::new(form.clone(), estimate, 0.3);
        assert_eq!(quote.form, form);
        assert_eq!(quote.deposit.deposit, 120_000.0);
        assert_eq!(quote.deposit.remaining, 280_000.0);
    }

    #[test]
    fn test_event_type_serializes_snake_case() {
        let event = Event::new(2, EventType::StepBlocked, serde_json::json!({"errors": 1}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "step_blocked");
        assert_eq!(json["step"], 2);
    }

    #[test]
    fn test_distinct_features_drops_duplicates() {
        let mut form = FormData::default();
        form.features = vec!["dark-mode".into(), "file-upload".into(), "dark-mode".into()];
        assert_eq!(form.distinct_features(), vec!["dark-mode", "file-upload"]);

        let form = FormData::default()
            .with_feature("ar-vr")
            .with_feature("ar-vr");
        assert_eq!(form.features, vec!["ar-vr".to_string()]);
    }
}
