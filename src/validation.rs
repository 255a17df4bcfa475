use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::data::FormData;
use crate::rates::Choice;

/// Addressable form fields. Keys use one level of dot notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    ProjectType,
    Features,
    DesignComplexity,
    Frontend,
    Backend,
    Database,
    Duration,
    Urgency,
    Support,
    BudgetMin,
    BudgetMax,
}

impl FieldPath {
    pub const ALL: [FieldPath; 11] = [
        FieldPath::ProjectType,
        FieldPath::Features,
        FieldPath::DesignComplexity,
        FieldPath::Frontend,
        FieldPath::Backend,
        FieldPath::Database,
        FieldPath::Duration,
        FieldPath::Urgency,
        FieldPath::Support,
        FieldPath::BudgetMin,
        FieldPath::BudgetMax,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FieldPath::ProjectType => "projectType",
            FieldPath::Features => "features",
            FieldPath::DesignComplexity => "designComplexity",
            FieldPath::Frontend => "technicalStack.frontend",
            FieldPath::Backend => "technicalStack.backend",
            FieldPath::Database => "technicalStack.database",
            FieldPath::Duration => "timeline.duration",
            FieldPath::Urgency => "timeline.urgency",
            FieldPath::Support => "timeline.support",
            FieldPath::BudgetMin => "budget.min",
            FieldPath::BudgetMax => "budget.max",
        }
    }

    /// Human-readable name used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldPath::ProjectType => "Project type",
            FieldPath::Features => "Features",
            FieldPath::DesignComplexity => "Design complexity",
            FieldPath::Frontend => "Frontend technology",
            FieldPath::Backend => "Backend technology",
            FieldPath::Database => "Database technology",
            FieldPath::Duration => "Project duration",
            FieldPath::Urgency => "Project urgency",
            FieldPath::Support => "Support level",
            FieldPath::BudgetMin => "Minimum budget",
            FieldPath::BudgetMax => "Maximum budget",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.split('.').count() > 2 {
            anyhow::bail!("Field path {} nests deeper than one level", s);
        }
        FieldPath::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown field: {}", s))
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Read-only view of a field's current value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
    List(&'a [String]),
}

impl FieldValue<'_> {
    fn is_missing(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

fn choice_value<T: Choice>(choice: Option<T>) -> FieldValue<'static> {
    choice
        .map(|c| FieldValue::Text(c.key()))
        .unwrap_or(FieldValue::Missing)
}

fn number_value(number: Option<f64>) -> FieldValue<'static> {
    number.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
}

impl FormData {
    pub fn value_of(&self, field: FieldPath) -> FieldValue<'_> {
        match field {
            FieldPath::ProjectType => choice_value(self.project_type),
            FieldPath::Features => FieldValue::List(&self.features),
            FieldPath::DesignComplexity => choice_value(self.design_complexity),
            FieldPath::Frontend => choice_value(self.technical_stack.frontend),
            FieldPath::Backend => choice_value(self.technical_stack.backend),
            FieldPath::Database => choice_value(self.technical_stack.database),
            FieldPath::Duration => number_value(self.timeline.duration.map(f64::from)),
            FieldPath::Urgency => choice_value(self.timeline.urgency),
            FieldPath::Support => choice_value(self.timeline.support),
            FieldPath::BudgetMin => number_value(self.budget.min),
            FieldPath::BudgetMax => number_value(self.budget.max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: FieldPath,
    pub message: String,
}

/// Cross-field check. Returns the message to show on failure.
pub type CustomCheck = fn(&FieldValue<'_>, Option<&FormData>) -> Result<(), String>;

/// Rules run in order: required, min, max, pattern, custom. The first
/// failing rule wins.
#[derive(Clone, Default)]
pub struct Rule {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
    pub custom: Option<CustomCheck>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Rule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[allow(dead_code)]
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn custom(mut self, check: CustomCheck) -> Self {
        self.custom = Some(check);
        self
    }

    fn check(
        &self,
        field: FieldPath,
        value: &FieldValue<'_>,
        form: Option<&FormData>,
    ) -> Option<String> {
        let label = field.label();

        if self.required && value.is_missing() {
            return Some(format!("{} is required", label));
        }

        if let FieldValue::Number(n) = value {
            if let Some(min) = self.min.filter(|min| !n.is_finite() || n < min) {
                return Some(format!("{} must be at least {}", label, min));
            }
            if let Some(max) = self.max.filter(|max| !n.is_finite() || n > max) {
                return Some(format!("{} must be no more than {}", label, max));
            }
        }

        if let (Some(pattern), FieldValue::Text(text)) = (&self.pattern, value) {
            if !pattern.is_match(text) {
                return Some(format!("{} is invalid", label));
            }
        }

        if let Some(check) = self.custom {
            if let Err(message) = check(value, form) {
                return Some(message);
            }
        }

        None
    }
}

fn at_least_one_feature(value: &FieldValue<'_>, _form: Option<&FormData>) -> Result<(), String> {
    match value {
        FieldValue::List(items) if items.is_empty() => {
            Err("Please select at least one feature".to_string())
        }
        _ => Ok(()),
    }
}

fn max_not_below_min(value: &FieldValue<'_>, form: Option<&FormData>) -> Result<(), String> {
    let (FieldValue::Number(max), Some(min)) = (value, form.and_then(|f| f.budget.min)) else {
        return Ok(());
    };
    if *max < min {
        return Err("Maximum budget must be greater than minimum budget".to_string());
    }
    Ok(())
}

/// Field rules plus the static step-to-fields grouping.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: BTreeMap<FieldPath, Rule>,
    steps: Vec<Vec<FieldPath>>,
}

impl RuleSet {
    pub fn new(steps: Vec<Vec<FieldPath>>) -> Self {
        Self {
            rules: BTreeMap::new(),
            steps,
        }
    }

    pub fn with_rule(mut self, field: FieldPath, rule: Rule) -> Self {
        self.rules.insert(field, rule);
        self
    }

    /// The estimation wizard's rules.
    pub fn standard() -> &'static RuleSet {
        static STANDARD: OnceLock<RuleSet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            RuleSet::new(vec![
                vec![FieldPath::ProjectType],
                vec![FieldPath::Features],
                vec![FieldPath::DesignComplexity],
                vec![FieldPath::Frontend, FieldPath::Backend, FieldPath::Database],
                vec![
                    FieldPath::Duration,
                    FieldPath::Urgency,
                    FieldPath::Support,
                    FieldPath::BudgetMin,
                    FieldPath::BudgetMax,
                ],
            ])
            .with_rule(FieldPath::ProjectType, Rule::required())
            .with_rule(
                FieldPath::Features,
                Rule::required().custom(at_least_one_feature),
            )
            .with_rule(FieldPath::DesignComplexity, Rule::required())
            .with_rule(FieldPath::Frontend, Rule::required())
            .with_rule(FieldPath::Backend, Rule::required())
            .with_rule(FieldPath::Database, Rule::required())
            .with_rule(FieldPath::Duration, Rule::required().min(1.0).max(52.0))
            .with_rule(FieldPath::Urgency, Rule::required())
            .with_rule(FieldPath::Support, Rule::required())
            .with_rule(FieldPath::BudgetMin, Rule::required().min(500.0))
            .with_rule(
                FieldPath::BudgetMax,
                Rule::required().min(1000.0).custom(max_not_below_min),
            )
        })
    }

    /// Fields gated by a step; empty for steps without inputs.
    pub fn step_fields(&self, step: usize) -> &[FieldPath] {
        self.steps.get(step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn validate_field(
        &self,
        field: FieldPath,
        value: &FieldValue<'_>,
        form: Option<&FormData>,
    ) -> Option<ValidationError> {
        let rule = self.rules.get(&field)?;
        rule.check(field, value, form)
            .map(|message| ValidationError { field, message })
    }

    fn validate_in_form(&self, field: FieldPath, form: &FormData) -> Option<ValidationError> {
        self.validate_field(field, &form.value_of(field), Some(form))
    }

    pub fn validate_form(&self, form: &FormData) -> Vec<ValidationError> {
        self.rules
            .keys()
            .filter_map(|field| self.validate_in_form(*field, form))
            .collect()
    }

    pub fn step_errors(&self, step: usize, form: &FormData) -> Vec<ValidationError> {
        self.step_fields(step)
            .iter()
            .filter_map(|field| self.validate_in_form(*field, form))
            .collect()
    }

    pub fn validate_step(&self, step: usize, form: &FormData) -> bool {
        self.step_fields(step)
            .iter()
            .all(|field| self.validate_in_form(*field, form).is_none())
    }
}

#[allow(dead_code)]
pub fn validate_field(
    field: FieldPath,
    value: &FieldValue<'_>,
    form: Option<&FormData>,
) -> Option<ValidationError> {
    RuleSet::standard().validate_field(field, value, form)
}

pub fn validate_form(form: &FormData) -> Vec<ValidationError> {
    RuleSet::standard().validate_form(form)
}

pub fn validate_step(step: usize, form: &FormData) -> bool {
    RuleSet::standard().validate_step(step, form)
}

pub fn is_form_valid(form: &FormData) -> bool {
    validate_form(form).is_empty()
}

/// Keep one message per field, the last one reported wins.
pub fn format_errors(errors: &[ValidationError]) -> BTreeMap<FieldPath, String> {
    errors
        .iter()
        .map(|e| (e.field, e.message.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{Backend, Database, DesignComplexity, Frontend, ProjectType};

    fn complete_form() -> FormData {
        let mut form = FormData::default().with_feature("dark-mode");
        form.project_type = Some(ProjectType::WebApplication);
        form.design_complexity = Some(DesignComplexity::Custom);
        form.technical_stack.frontend = Some(Frontend::Vue);
        form.technical_stack.backend = Some(Backend::Ruby);
        form.technical_stack.database = Some(Database::Mysql);
        form
    }

    #[test]
    fn test_field_path_parse() {
        assert_eq!(
            "technicalStack.frontend".parse::<FieldPath>().unwrap(),
            FieldPath::Frontend
        );
        assert_eq!("budget.max".parse::<FieldPath>().unwrap(), FieldPath::BudgetMax);
        assert!("budget.max.value".parse::<FieldPath>().is_err());
        assert!("color".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_budget_max_below_min() {
        let mut form = complete_form();
        form.budget.min = Some(5000.0);
        form.budget.max = Some(1000.0);

        let error = validate_field(
            FieldPath::BudgetMax,
            &FieldValue::Number(1000.0),
            Some(&form),
        )
        .expect("budget max should fail");
        assert_eq!(error.field, FieldPath::BudgetMax);
        assert!(error.message.contains("greater than minimum budget"));
    }

    #[test]
    fn test_required_rejects_empty_values() {
        assert!(validate_field(FieldPath::ProjectType, &FieldValue::Missing, None).is_some());
        assert!(validate_field(FieldPath::ProjectType, &FieldValue::Text(""), None).is_some());
        assert!(validate_field(FieldPath::Features, &FieldValue::List(&[]), None).is_some());

        let error = validate_field(FieldPath::Frontend, &FieldValue::Missing, None).unwrap();
        assert_eq!(error.message, "Frontend technology is required");
    }

    #[test]
    fn test_min_max_bounds() {
        let low = validate_field(FieldPath::Duration, &FieldValue::Number(0.0), None).unwrap();
        assert_eq!(low.message, "Project duration must be at least 1");

        let high = validate_field(FieldPath::Duration, &FieldValue::Number(53.0), None).unwrap();
        assert_eq!(high.message, "Project duration must be no more than 52");

        assert!(validate_field(FieldPath::Duration, &FieldValue::Number(52.0), None).is_none());
    }

    #[test]
    fn test_non_finite_numbers_fail_bounds() {
        let mut form = complete_form();
        form.budget.min = Some(f64::NAN);
        let errors = RuleSet::standard().step_errors(4, &form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FieldPath::BudgetMin);
        assert_eq!(errors[0].message, "Minimum budget must be at least 500");

        let error = validate_field(
            FieldPath::Duration,
            &FieldValue::Number(f64::INFINITY),
            None,
        )
        .unwrap();
        assert_eq!(error.message, "Project duration must be no more than 52");
    }

    #[test]
    fn test_first_failing_rule_short_circuits() {
        let mut form = complete_form();
        form.budget.min = Some(5000.0);
        // Fails min (1000) before reaching the cross-field check.
        let error =
            validate_field(FieldPath::BudgetMax, &FieldValue::Number(900.0), Some(&form)).unwrap();
        assert_eq!(error.message, "Maximum budget must be at least 1000");
    }

    #[test]
    fn test_pattern_rule() {
        let rules = RuleSet::new(vec![vec![FieldPath::ProjectType]]).with_rule(
            FieldPath::ProjectType,
            Rule::required().pattern(r"^[a-z]+(-[a-z]+)*$").unwrap(),
        );

        assert!(rules
            .validate_field(FieldPath::ProjectType, &FieldValue::Text("web-application"), None)
            .is_none());
        let error = rules
            .validate_field(FieldPath::ProjectType, &FieldValue::Text("Web App"), None)
            .unwrap();
        assert_eq!(error.message, "Project type is invalid");
    }

    #[test]
    fn test_fields_without_rules_pass() {
        let rules = RuleSet::new(vec![]);
        assert!(rules
            .validate_field(FieldPath::Features, &FieldValue::Missing, None)
            .is_none());
    }

    #[test]
    fn test_validate_form_default_reports_unselected_fields() {
        let errors = validate_form(&FormData::default());
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                FieldPath::ProjectType,
                FieldPath::Features,
                FieldPath::DesignComplexity,
                FieldPath::Frontend,
                FieldPath::Backend,
                FieldPath::Database,
            ]
        );
        assert!(!is_form_valid(&FormData::default()));
        assert!(is_form_valid(&complete_form()));
    }

    #[test]
    fn test_validate_step_groups() {
        let form = complete_form();
        for step in 0..5 {
            assert!(validate_step(step, &form), "step {} should pass", step);
        }
        // Steps without inputs always pass.
        assert!(validate_step(5, &FormData::default()));

        let mut missing_db = form.clone();
        missing_db.technical_stack.database = None;
        assert!(!validate_step(3, &missing_db));
        assert!(validate_step(2, &missing_db));

        let errors = RuleSet::standard().step_errors(3, &missing_db);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FieldPath::Database);
    }

    #[test]
    fn test_format_errors_keyed_by_field() {
        let errors = validate_form(&FormData::default());
        let formatted = format_errors(&errors);
        assert_eq!(formatted.len(), errors.len());
        assert_eq!(
            formatted.get(&FieldPath::ProjectType).map(String::as_str),
            Some("Project type is required")
        );
    }

    #[test]
    fn test_error_serializes_with_dotted_key() {
        let error = ValidationError {
            field: FieldPath::BudgetMin,
            message: "x".into(),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["field"], "budget.min");
    }
}
