use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use uuid::Uuid;

use crate::advisor::{self, Optimization, Recommendation};
use crate::catalog::{all_features, features_by_category, FeatureCategory};
use crate::config::EstimatorConfig;
use crate::data::{Estimate, Event, EventType, FormData, Quote};
use crate::format::{format_currency, format_duration, render_markdown};
use crate::pricing::{deposit_quote, estimated_range, CostRange, DepositQuote};
use crate::rates::{
    Backend, Choice, Database, DesignComplexity, Frontend, ProjectType, SupportLevel, Urgency,
};
use crate::sampler::sample_form;
use crate::storage::{FileQuoteStore, QuoteStore};
use crate::timeline::{timeline_range, WeekRange};
use crate::validation::{is_form_valid, validate_form, validate_step, FieldPath, FieldValue};
use crate::wizard::{FieldUpdate, StepOutcome, Wizard, WizardStep};

/// Everything the `estimate` command reports for one form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub form: FormData,
    pub estimate: Estimate,
    pub cost_range: CostRange,
    pub timeline_range: WeekRange,
    pub deposit: DepositQuote,
    pub recommendations: Vec<Recommendation>,
    pub optimizations: Vec<Optimization>,
}

impl EstimateReport {
    pub fn build(form: FormData, config: &EstimatorConfig) -> Self {
        let estimate = advisor::estimate(&form);
        Self {
            cost_range: estimated_range(&estimate.pricing, config.cost_variance),
            timeline_range: timeline_range(&estimate.timeline, config.timeline_variance),
            deposit: deposit_quote(&estimate.pricing, config.deposit_rate),
            recommendations: advisor::recommendations(&form),
            optimizations: advisor::optimizations(&form),
            estimate,
            form,
        }
    }

    pub fn render(&self, format: &str, config: &EstimatorConfig) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(self)?),
            "md" => Ok(render_markdown(
                &self.form,
                &self.estimate,
                &self.recommendations,
                &self.optimizations,
                config,
            )),
            other => anyhow::bail!("Unknown format: {} (expected json or md)", other),
        }
    }
}

/// Read a form from a JSON file, or from stdin when `input` is `-`.
pub fn read_form(input: &str) -> Result<FormData> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read form from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read form: {}", input))?
    };

    serde_json::from_str(&content).with_context(|| format!("Failed to parse form: {}", input))
}

pub fn list_features(category: Option<&str>) -> Result<()> {
    let categories = match category {
        Some(raw) => {
            let Some(category) = FeatureCategory::parse(raw) else {
                anyhow::bail!(
                    "Unknown category: {} (expected frontend, backend or advanced)",
                    raw
                );
            };
            vec![category]
        }
        None => FeatureCategory::ALL.to_vec(),
    };

    for category in categories {
        println!("=== {} ===", category.name());
        for feature in features_by_category(category) {
            println!(
                "  {:<26} {:<28} +{:>3.0}% cost  +{}w  {}",
                feature.id,
                feature.name,
                feature.cost_impact * 100.0,
                feature.time_impact,
                feature.complexity.label()
            );
        }
        println!();
    }

    Ok(())
}

pub fn estimate(input: &str, format: &str, save: bool, config: &EstimatorConfig) -> Result<()> {
    let form = read_form(input)?;

    let errors = validate_form(&form);
    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "Estimating an incomplete form");
    }

    let report = EstimateReport::build(form, config);
    println!("{}", report.render(format, config)?);

    if save {
        if !errors.is_empty() {
            anyhow::bail!(
                "Refusing to save: form has {} validation error(s)",
                errors.len()
            );
        }
        let quote = Quote::new(report.form, report.estimate, config.deposit_rate);
        FileQuoteStore::new(&config.quotes_dir).save_quote(&quote)?;
        eprintln!("Saved quote {}", quote.id);
    }

    Ok(())
}

pub fn validate(input: &str) -> Result<()> {
    let form = read_form(input)?;

    for (index, step) in WizardStep::ALL[..WizardStep::RESULTS_INDEX].iter().enumerate() {
        let status = if validate_step(index, &form) { "OK" } else { "INCOMPLETE" };
        println!("Step {} {}: {}", index + 1, step.title(), status);
    }

    if is_form_valid(&form) {
        println!("Form: OK");
        return Ok(());
    }

    let errors = validate_form(&form);

    println!("Errors: {} found", errors.len());
    for err in &errors {
        println!("  - {}: {}", err.field, err.message);
    }
    anyhow::bail!("Form is invalid")
}

pub fn sample(seed: Option<u64>, format: &str, config: &EstimatorConfig) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let form = sample_form(&mut rng);
    tracing::debug!(project_type = ?form.project_type, features = form.features.len(), "Sampled form");

    match format {
        "form" => println!("{}", serde_json::to_string_pretty(&form)?),
        _ => println!("{}", EstimateReport::build(form, config).render(format, config)?),
    }
    Ok(())
}

pub fn quotes_list(config: &EstimatorConfig) -> Result<()> {
    let store = FileQuoteStore::new(&config.quotes_dir);
    let quotes = store.list_quotes()?;

    if quotes.is_empty() {
        println!("No quotes found in {}", config.quotes_dir);
        return Ok(());
    }

    println!(
        "{:<36}  {:<20}  {:<22}  {:>14}  {:>18}",
        "ID", "CREATED", "PROJECT", "TOTAL", "TIMELINE"
    );
    println!("{}", "-".repeat(118));
    for quote in quotes {
        println!(
            "{:<36}  {:<20}  {:<22}  {:>14}  {:>18}",
            quote.id,
            quote.created_at.format("%Y-%m-%d %H:%M").to_string(),
            quote.form.project_type.map(|p| p.label()).unwrap_or("-"),
            format_currency(&config.currency_symbol, quote.estimate.pricing.total),
            format_duration(quote.estimate.timeline.total)
        );
    }

    Ok(())
}

pub fn quotes_show(id: &str, format: &str, config: &EstimatorConfig) -> Result<()> {
    let id = Uuid::parse_str(id).with_context(|| format!("Invalid quote id: {}", id))?;
    let quote = FileQuoteStore::new(&config.quotes_dir).load_quote(&id)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&quote)?),
        "md" => {
            println!("{}", render_markdown(&quote.form, &quote.estimate, &[], &[], config));
            println!("_Quote {} created {}_", quote.id, quote.created_at.to_rfc3339());
        }
        other => anyhow::bail!("Unknown format: {} (expected json or md)", other),
    }
    Ok(())
}

/// Run the interactive wizard on stdin/stdout, saving into the configured
/// quotes directory.
pub fn wizard(config: &EstimatorConfig) -> Result<()> {
    let store = FileQuoteStore::new(&config.quotes_dir);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_wizard(stdin.lock(), &mut stdout, config, Some(&store))?;
    Ok(())
}

const WIZARD_HELP: &str = "\
Commands:
  show                 Show the current step
  set <field> <value>  Set a field (empty value clears it, features are comma-separated)
  next                 Validate this step and continue
  back                 Go to the previous step
  goto <n>             Jump to step n (1-6) without validating
  estimate             Recompute the estimate now
  save                 Save the estimate as a quote
  reset                Start over
  help                 Show this help
  quit                 Leave the wizard";

fn option_keys<T: Choice>() -> Vec<&'static str> {
    T::ALL.iter().map(|c| c.key()).collect()
}

fn field_options(field: FieldPath) -> Vec<&'static str> {
    match field {
        FieldPath::ProjectType => option_keys::<ProjectType>(),
        FieldPath::Features => all_features().iter().map(|f| f.id).collect(),
        FieldPath::DesignComplexity => option_keys::<DesignComplexity>(),
        FieldPath::Frontend => option_keys::<Frontend>(),
        FieldPath::Backend => option_keys::<Backend>(),
        FieldPath::Database => option_keys::<Database>(),
        FieldPath::Urgency => option_keys::<Urgency>(),
        FieldPath::Support => option_keys::<SupportLevel>(),
        FieldPath::Duration | FieldPath::BudgetMin | FieldPath::BudgetMax => Vec::new(),
    }
}

fn display_value(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Missing => "-".to_string(),
        FieldValue::Text(text) => text.to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::List(items) if items.is_empty() => "-".to_string(),
        FieldValue::List(items) => items.join(", "),
    }
}

fn print_step<W: Write>(output: &mut W, wizard: &Wizard, symbol: &str) -> Result<()> {
    let step = wizard.step();
    writeln!(output)?;
    writeln!(
        output,
        "=== Step {}/{}: {} ({:.0}%) ===",
        wizard.current_step() + 1,
        WizardStep::ALL.len(),
        step.title(),
        wizard.progress()
    )?;
    writeln!(output, "{}", step.description())?;

    for field in wizard.step_fields() {
        writeln!(
            output,
            "  {:<24} {}",
            field.key(),
            display_value(wizard.form_data().value_of(*field))
        )?;
        let options = field_options(*field);
        if !options.is_empty() {
            writeln!(output, "  {:<24} options: {}", "", options.join(", "))?;
        }
        if let Some(message) = wizard.errors().get(field) {
            writeln!(output, "  {:<24} ! {}", "", message)?;
        }
    }

    if wizard.is_results_step() {
        print_estimate(output, wizard, symbol)?;
    }
    Ok(())
}

fn print_estimate<W: Write>(output: &mut W, wizard: &Wizard, symbol: &str) -> Result<()> {
    let Some(estimate) = wizard.estimate() else {
        writeln!(output, "No estimate yet. Type 'estimate' to compute one.")?;
        return Ok(());
    };

    writeln!(
        output,
        "Total: {}  Timeline: {}",
        format_currency(symbol, estimate.pricing.total),
        format_duration(estimate.timeline.total)
    )?;
    for line in &estimate.pricing.breakdown {
        writeln!(
            output,
            "  {:<12} {:>14}  {:>3}%",
            line.category,
            format_currency(symbol, line.amount),
            line.percentage
        )?;
    }
    for phase in &estimate.timeline.phases {
        writeln!(output, "  {:<12} {:>3}w  {}", phase.name, phase.duration, phase.description)?;
    }
    Ok(())
}

/// Drive a wizard session from line-oriented commands.
///
/// Interactions are buffered as events and written to the quote's history
/// when the session saves. Returns the last saved quote, if any.
pub fn run_wizard<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &EstimatorConfig,
    store: Option<&dyn QuoteStore>,
) -> Result<Option<Quote>> {
    let mut wizard = Wizard::new();
    let mut events: Vec<Event> = Vec::new();
    let mut saved: Option<Quote> = None;
    let symbol = config.currency_symbol.as_str();

    writeln!(output, "=== Project Estimator ===")?;
    writeln!(output, "Type 'help' for commands.")?;
    print_step(output, &wizard, symbol)?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read wizard input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "help" | "?" => writeln!(output, "{}", WIZARD_HELP)?,
            "show" => print_step(output, &wizard, symbol)?,
            "set" => {
                let (path, raw) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if path.is_empty() {
                    writeln!(output, "Usage: set <field> <value>")?;
                    continue;
                }
                match FieldUpdate::parse(path, raw) {
                    Ok(update) => {
                        let field = update.field();
                        wizard.update_field(update);
                        tracing::debug!(field = %field, "Field updated");
                        events.push(Event::new(
                            wizard.current_step(),
                            EventType::FieldUpdated,
                            serde_json::json!({ "field": field, "value": raw.trim() }),
                        ));
                        writeln!(
                            output,
                            "{} = {}",
                            field,
                            display_value(wizard.form_data().value_of(field))
                        )?;
                    }
                    Err(e) => writeln!(output, "Error: {:#}", e)?,
                }
            }
            "next" => {
                let from = wizard.current_step();
                match wizard.next_step() {
                    StepOutcome::Advanced => {
                        tracing::info!(from, to = wizard.current_step(), "Step advanced");
                        events.push(Event::new(
                            from,
                            EventType::StepAdvanced,
                            serde_json::json!({ "to": wizard.current_step() }),
                        ));
                        if wizard.is_results_step() {
                            events.push(estimated_event(&wizard));
                        }
                        print_step(output, &wizard, symbol)?;
                    }
                    StepOutcome::Blocked => {
                        tracing::info!(step = from, errors = wizard.errors().len(), "Step blocked");
                        events.push(Event::new(
                            from,
                            EventType::StepBlocked,
                            serde_json::json!({ "errors": wizard.errors() }),
                        ));
                        writeln!(output, "Please fix the following before continuing:")?;
                        for field in wizard.step_fields() {
                            if let Some(message) = wizard.errors().get(field) {
                                writeln!(output, "  - {}", message)?;
                            }
                        }
                    }
                    StepOutcome::AtEnd => {
                        writeln!(output, "Already at the results. Type 'save' to keep this quote.")?
                    }
                }
            }
            "back" => {
                let from = wizard.current_step();
                wizard.previous_step();
                if wizard.current_step() != from {
                    events.push(Event::new(
                        from,
                        EventType::StepBack,
                        serde_json::json!({ "to": wizard.current_step() }),
                    ));
                }
                print_step(output, &wizard, symbol)?;
            }
            "goto" => {
                let Ok(target) = rest.parse::<usize>() else {
                    writeln!(output, "Usage: goto <1-{}>", WizardStep::ALL.len())?;
                    continue;
                };
                let from = wizard.current_step();
                wizard.set_step(target.saturating_sub(1));
                tracing::info!(from, to = wizard.current_step(), "Step jumped");
                events.push(Event::new(
                    from,
                    EventType::StepJumped,
                    serde_json::json!({ "to": wizard.current_step() }),
                ));
                print_step(output, &wizard, symbol)?;
            }
            "estimate" => {
                wizard.recalculate();
                events.push(estimated_event(&wizard));
                print_estimate(output, &wizard, symbol)?;
            }
            "save" => {
                let errors = validate_form(wizard.form_data());
                if !errors.is_empty() {
                    writeln!(output, "Cannot save yet:")?;
                    for err in &errors {
                        writeln!(output, "  - {}", err.message)?;
                    }
                    continue;
                }

                if wizard.estimate().is_none() {
                    wizard.recalculate();
                    events.push(estimated_event(&wizard));
                }
                let Some(estimate) = wizard.estimate() else {
                    anyhow::bail!("Estimate missing after recalculation");
                };

                let quote = Quote::new(wizard.form_data().clone(), estimate, config.deposit_rate);
                if let Some(store) = store {
                    store.save_quote(&quote)?;
                    for event in events.drain(..) {
                        store.append_event(&quote.id, &event)?;
                    }
                }
                writeln!(
                    output,
                    "Saved quote {} (deposit {}, remaining {})",
                    quote.id,
                    format_currency(symbol, quote.deposit.deposit),
                    format_currency(symbol, quote.deposit.remaining)
                )?;
                saved = Some(quote);
            }
            "reset" => {
                wizard.reset();
                events.push(Event::new(0, EventType::Reset, serde_json::Value::Null));
                tracing::info!("Wizard reset");
                print_step(output, &wizard, symbol)?;
            }
            "quit" | "exit" => break,
            other => writeln!(output, "Unknown command: {} (type 'help')", other)?,
        }
    }

    Ok(saved)
}

fn estimated_event(wizard: &Wizard) -> Event {
    let payload = match (wizard.pricing(), wizard.timeline()) {
        (Some(pricing), Some(timeline)) => {
            serde_json::json!({ "total": pricing.total, "weeks": timeline.total })
        }
        _ => serde_json::Value::Null,
    };
    Event::new(wizard.current_step(), EventType::Estimated, payload)
}
