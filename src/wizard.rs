use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::{Estimate, FormData, PricingResult, TimelineResult};
use crate::pricing::calculate_pricing;
use crate::rates::{
    parse_choice, Backend, Choice, Database, DesignComplexity, Frontend, ProjectType,
    SupportLevel, Urgency,
};
use crate::timeline::calculate_timeline;
use crate::validation::{format_errors, FieldPath, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    ProjectType,
    Features,
    Design,
    Technical,
    Timeline,
    Results,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::ProjectType,
        WizardStep::Features,
        WizardStep::Design,
        WizardStep::Technical,
        WizardStep::Timeline,
        WizardStep::Results,
    ];

    pub const RESULTS_INDEX: usize = 5;

    pub fn from_index(index: usize) -> WizardStep {
        Self::ALL[index.min(Self::RESULTS_INDEX)]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::ProjectType => "Project Type",
            WizardStep::Features => "Features & Functionality",
            WizardStep::Design => "Design Requirements",
            WizardStep::Technical => "Technical Specifications",
            WizardStep::Timeline => "Timeline & Support",
            WizardStep::Results => "Your Estimate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::ProjectType => "What type of web solution do you need?",
            WizardStep::Features => "Select the features you need",
            WizardStep::Design => "What level of design do you need?",
            WizardStep::Technical => "Technical requirements and integrations",
            WizardStep::Timeline => "Project duration and ongoing support",
            WizardStep::Results => "Cost breakdown and project schedule",
        }
    }
}

/// A typed write to one form field. `None` clears the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    ProjectType(Option<ProjectType>),
    Features(Vec<String>),
    DesignComplexity(Option<DesignComplexity>),
    Frontend(Option<Frontend>),
    Backend(Option<Backend>),
    Database(Option<Database>),
    Duration(Option<u32>),
    Urgency(Option<Urgency>),
    Support(Option<SupportLevel>),
    BudgetMin(Option<f64>),
    BudgetMax(Option<f64>),
}

fn parse_optional_choice<T: Choice>(field: FieldPath, raw: &str) -> Result<Option<T>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_choice::<T>(raw).map(Some).ok_or_else(|| {
        let options: Vec<_> = T::ALL.iter().map(|c| c.key()).collect();
        anyhow::anyhow!(
            "Invalid value '{}' for {} (expected one of: {})",
            raw.trim(),
            field,
            options.join(", ")
        )
    })
}

fn parse_optional_number<T>(field: FieldPath, raw: &str) -> Result<Option<T>>
where
    T: std::str::FromStr + Copy + Into<f64>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse::<T>()
        .with_context(|| format!("Invalid number '{}' for {}", raw, field))?;
    if !value.into().is_finite() {
        anyhow::bail!("Invalid number '{}' for {} (must be finite)", raw, field);
    }
    Ok(Some(value))
}

impl FieldUpdate {
    /// Build an update from a dotted path and a raw string. An empty value
    /// clears the field; features take a comma-separated list.
    pub fn parse(path: &str, raw: &str) -> Result<FieldUpdate> {
        let field: FieldPath = path.parse()?;
        let update = match field {
            FieldPath::ProjectType => FieldUpdate::ProjectType(parse_optional_choice(field, raw)?),
            FieldPath::Features => FieldUpdate::Features(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            FieldPath::DesignComplexity => {
                FieldUpdate::DesignComplexity(parse_optional_choice(field, raw)?)
            }
            FieldPath::Frontend => FieldUpdate::Frontend(parse_optional_choice(field, raw)?),
            FieldPath::Backend => FieldUpdate::Backend(parse_optional_choice(field, raw)?),
            FieldPath::Database => FieldUpdate::Database(parse_optional_choice(field, raw)?),
            FieldPath::Duration => FieldUpdate::Duration(parse_optional_number(field, raw)?),
            FieldPath::Urgency => FieldUpdate::Urgency(parse_optional_choice(field, raw)?),
            FieldPath::Support => FieldUpdate::Support(parse_optional_choice(field, raw)?),
            FieldPath::BudgetMin => FieldUpdate::BudgetMin(parse_optional_number(field, raw)?),
            FieldPath::BudgetMax => FieldUpdate::BudgetMax(parse_optional_number(field, raw)?),
        };
        Ok(update)
    }

    pub fn field(&self) -> FieldPath {
        match self {
            FieldUpdate::ProjectType(_) => FieldPath::ProjectType,
            FieldUpdate::Features(_) => FieldPath::Features,
            FieldUpdate::DesignComplexity(_) => FieldPath::DesignComplexity,
            FieldUpdate::Frontend(_) => FieldPath::Frontend,
            FieldUpdate::Backend(_) => FieldPath::Backend,
            FieldUpdate::Database(_) => FieldPath::Database,
            FieldUpdate::Duration(_) => FieldPath::Duration,
            FieldUpdate::Urgency(_) => FieldPath::Urgency,
            FieldUpdate::Support(_) => FieldPath::Support,
            FieldUpdate::BudgetMin(_) => FieldPath::BudgetMin,
            FieldUpdate::BudgetMax(_) => FieldPath::BudgetMax,
        }
    }

    pub fn apply(self, form: &mut FormData) {
        match self {
            FieldUpdate::ProjectType(v) => form.project_type = v,
            FieldUpdate::Features(v) => form.features = v,
            FieldUpdate::DesignComplexity(v) => form.design_complexity = v,
            FieldUpdate::Frontend(v) => form.technical_stack.frontend = v,
            FieldUpdate::Backend(v) => form.technical_stack.backend = v,
            FieldUpdate::Database(v) => form.technical_stack.database = v,
            FieldUpdate::Duration(v) => form.timeline.duration = v,
            FieldUpdate::Urgency(v) => form.timeline.urgency = v,
            FieldUpdate::Support(v) => form.timeline.support = v,
            FieldUpdate::BudgetMin(v) => form.budget.min = v,
            FieldUpdate::BudgetMax(v) => form.budget.max = v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    Blocked,
    AtEnd,
}

/// One estimation session. Owns the form and everything derived from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wizard {
    current_step: usize,
    form_data: FormData,
    pricing: Option<PricingResult>,
    timeline: Option<TimelineResult>,
    errors: BTreeMap<FieldPath, String>,
    #[serde(skip)]
    rules: &'static RuleSet,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::with_rules(RuleSet::standard())
    }

    pub fn with_rules(rules: &'static RuleSet) -> Self {
        Self {
            current_step: 0,
            form_data: FormData::default(),
            pricing: None,
            timeline: None,
            errors: BTreeMap::new(),
            rules,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::from_index(self.current_step)
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn pricing(&self) -> Option<&PricingResult> {
        self.pricing.as_ref()
    }

    pub fn timeline(&self) -> Option<&TimelineResult> {
        self.timeline.as_ref()
    }

    pub fn estimate(&self) -> Option<Estimate> {
        match (&self.pricing, &self.timeline) {
            (Some(pricing), Some(timeline)) => Some(Estimate {
                pricing: pricing.clone(),
                timeline: timeline.clone(),
            }),
            _ => None,
        }
    }

    /// Fields the current step collects.
    pub fn step_fields(&self) -> &'static [FieldPath] {
        let rules: &'static RuleSet = self.rules;
        rules.step_fields(self.current_step)
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.errors
    }

    pub fn is_results_step(&self) -> bool {
        self.current_step == WizardStep::RESULTS_INDEX
    }

    /// Percentage of the flow completed, counting the results step.
    pub fn progress(&self) -> f64 {
        (self.current_step + 1) as f64 / WizardStep::ALL.len() as f64 * 100.0
    }

    /// Write one field. Clears that field's error and drops stale results.
    pub fn update_field(&mut self, update: FieldUpdate) {
        let field = update.field();
        update.apply(&mut self.form_data);
        self.errors.remove(&field);
        let pricing = self.pricing.take();
        let timeline = self.timeline.take();
        if pricing.is_some() || timeline.is_some() {
            tracing::debug!(field = %field, "Form changed, cleared estimate");
        }
    }

    pub fn next_step(&mut self) -> StepOutcome {
        if self.is_results_step() {
            return StepOutcome::AtEnd;
        }

        let step = self.current_step;
        let failures = self.rules.step_errors(step, &self.form_data);
        for field in self.rules.step_fields(step) {
            self.errors.remove(field);
        }
        if !failures.is_empty() {
            tracing::debug!(step, errors = failures.len(), "Step blocked by validation");
            self.errors.extend(format_errors(&failures));
            return StepOutcome::Blocked;
        }

        if step + 1 == WizardStep::RESULTS_INDEX {
            self.recalculate();
        }
        self.current_step += 1;
        tracing::debug!(step = self.current_step, "Advanced step");
        StepOutcome::Advanced
    }

    pub fn previous_step(&mut self) {
        if self.current_step > 0 {
            self.current_step -= 1;
        }
    }

    /// Jump straight to a step without validating. Clamped to the results step.
    pub fn set_step(&mut self, step: usize) {
        self.current_step = step.min(WizardStep::RESULTS_INDEX);
    }

    /// Recompute pricing and timeline from the current form.
    pub fn recalculate(&mut self) {
        self.pricing = Some(calculate_pricing(&self.form_data));
        self.timeline = Some(calculate_timeline(&self.form_data));
    }

    pub fn reset(&mut self) {
        self.current_step = 0;
        self.form_data = FormData::default();
        self.pricing = None;
        self.timeline = None;
        self.errors.clear();
    }
}
