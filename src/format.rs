use crate::advisor::{Optimization, Recommendation};
use crate::catalog::feature_by_id;
use crate::config::EstimatorConfig;
use crate::data::{Estimate, FormData};
use crate::pricing::{deposit_quote, estimated_range};
use crate::rates::Choice;
use crate::timeline::timeline_range;

/// Whole currency units with thousands separators, e.g. `$1,320,000`.
pub fn format_currency(symbol: &str, amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, symbol, grouped)
}

pub fn format_compact_currency(symbol: &str, amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{}{:.1}M", symbol, amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{}{:.1}K", symbol, amount / 1_000.0)
    } else {
        format_currency(symbol, amount)
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Weeks as months and weeks, counting four weeks to a month.
pub fn format_duration(weeks: u32) -> String {
    if weeks < 4 {
        return plural(weeks, "week");
    }
    let months = weeks / 4;
    let rest = weeks % 4;
    if rest == 0 {
        plural(months, "month")
    } else {
        format!("{} {}", plural(months, "month"), plural(rest, "week"))
    }
}

fn selection<T: Choice>(choice: Option<T>) -> &'static str {
    choice.map(|c| c.label()).unwrap_or("-")
}

/// Markdown report for a finished estimate.
pub fn render_markdown(
    form: &FormData,
    estimate: &Estimate,
    recommendations: &[Recommendation],
    optimizations: &[Optimization],
    config: &EstimatorConfig,
) -> String {
    let symbol = config.currency_symbol.as_str();
    let pricing = &estimate.pricing;
    let timeline = &estimate.timeline;
    let cost_range = estimated_range(pricing, config.cost_variance);
    let week_range = timeline_range(timeline, config.timeline_variance);
    let deposit = deposit_quote(pricing, config.deposit_rate);

    let mut output = String::new();

    output.push_str(&format!(
        "# Project Estimate: {}\n\n",
        selection(form.project_type)
    ));
    output.push_str(&format!(
        "**Total:** {} (range {} - {})\n\n",
        format_currency(symbol, pricing.total),
        format_compact_currency(symbol, cost_range.min),
        format_compact_currency(symbol, cost_range.max)
    ));
    output.push_str(&format!(
        "**Timeline:** {} (range {} - {} weeks)\n\n",
        format_duration(timeline.total),
        week_range.min,
        week_range.max
    ));

    output.push_str("## Selections\n\n");
    output.push_str(&format!(
        "- **Design:** {}\n",
        selection(form.design_complexity)
    ));
    output.push_str(&format!(
        "- **Stack:** {} / {} / {}\n",
        selection(form.technical_stack.frontend),
        selection(form.technical_stack.backend),
        selection(form.technical_stack.database)
    ));
    output.push_str(&format!(
        "- **Urgency:** {}\n",
        selection(form.timeline.urgency)
    ));
    output.push_str(&format!(
        "- **Support:** {}\n",
        selection(form.timeline.support)
    ));
    if !form.features.is_empty() {
        output.push_str("- **Features:**\n");
        for id in form.distinct_features() {
            match feature_by_id(id) {
                Some(f) => output.push_str(&format!(
                    "  - {} (+{:.0}% cost, +{})\n",
                    f.name,
                    f.cost_impact * 100.0,
                    plural(f.time_impact, "week")
                )),
                None => output.push_str(&format!("  - {} (not in catalog)\n", id)),
            }
        }
    }
    output.push('\n');

    output.push_str("## Cost Breakdown\n\n");
    output.push_str("| Category | Amount | Share |\n");
    output.push_str("|----------|--------|-------|\n");
    for line in &pricing.breakdown {
        output.push_str(&format!(
            "| {} | {} | {}% |\n",
            line.category,
            format_currency(symbol, line.amount),
            line.percentage
        ));
    }
    output.push('\n');

    output.push_str("## Schedule\n\n");
    output.push_str("| Phase | Duration | Description |\n");
    output.push_str("|-------|----------|-------------|\n");
    for phase in &timeline.phases {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            phase.name,
            plural(phase.duration, "week"),
            phase.description
        ));
    }
    let phase_sum = timeline.phase_sum();
    if phase_sum != timeline.total {
        output.push_str(&format!(
            "\n_Phases add up to {} after rounding each one._\n",
            plural(phase_sum, "week")
        ));
    }
    output.push('\n');

    output.push_str("## Payment\n\n");
    output.push_str(&format!(
        "- **Deposit ({:.0}%):** {}\n",
        config.deposit_rate * 100.0,
        format_currency(symbol, deposit.deposit)
    ));
    output.push_str(&format!(
        "- **Remaining:** {}\n\n",
        format_currency(symbol, deposit.remaining)
    ));

    if !recommendations.is_empty() {
        output.push_str("## Recommendations\n\n");
        for rec in recommendations {
            output.push_str(&format!(
                "- **{}** ({}{}, {:+} weeks): {}\n",
                rec.title,
                if rec.impact.cost >= 0.0 { "+" } else { "" },
                format_currency(symbol, rec.impact.cost),
                rec.impact.weeks,
                rec.description
            ));
        }
        output.push('\n');
    }

    if !optimizations.is_empty() {
        output.push_str("## Ways to Save\n\n");
        for opt in optimizations {
            output.push_str(&format!(
                "- **{}:** {} -> {} saves {} ({})\n",
                opt.area,
                opt.current,
                opt.suggested,
                format_currency(symbol, opt.savings),
                opt.tradeoffs.join(", ")
            ));
        }
        output.push('\n');
    }

    output
}
