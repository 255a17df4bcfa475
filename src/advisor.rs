use serde::Serialize;

use crate::catalog::feature_by_id;
use crate::data::{Estimate, FormData};
use crate::pricing::calculate_pricing;
use crate::rates::{Choice, DesignComplexity, ProjectType, Urgency};
use crate::timeline::calculate_timeline;

/// Features above this cost impact are candidates for removal.
const EXPENSIVE_FEATURE_IMPACT: f64 = 0.5;

pub fn estimate(form: &FormData) -> Estimate {
    Estimate {
        pricing: calculate_pricing(form),
        timeline: calculate_timeline(form),
    }
}

/// Difference between two estimates, `candidate - current`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateDelta {
    pub cost: f64,
    pub weeks: i64,
}

impl EstimateDelta {
    pub fn between(current: &Estimate, candidate: &Estimate) -> Self {
        Self {
            cost: candidate.pricing.total - current.pricing.total,
            weeks: i64::from(candidate.timeline.total) - i64::from(current.timeline.total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Feature,
    Design,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub impact: EstimateDelta,
    pub quality: f64,
    pub confidence: f64,
    pub reasoning: String,
}

struct Candidate {
    kind: RecommendationKind,
    title: &'static str,
    description: &'static str,
    quality: f64,
    confidence: f64,
    reasoning: &'static str,
    form: FormData,
}

fn has_feature(form: &FormData, id: &str) -> bool {
    form.features.iter().any(|f| f == id)
}

/// Suggest additions that usually pay off for the chosen project type.
pub fn recommendations(form: &FormData) -> Vec<Recommendation> {
    let Some(project_type) = form.project_type else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    if !has_feature(form, "progressive-web-app")
        && matches!(
            project_type,
            ProjectType::WebApplication | ProjectType::EcommercePlatform
        )
    {
        candidates.push(Candidate {
            kind: RecommendationKind::Feature,
            title: "Add Progressive Web App",
            description: "A PWA improves engagement for this kind of project",
            quality: 0.8,
            confidence: 0.85,
            reasoning: "Mobile-first approach with offline capabilities and app-like experience",
            form: form.clone().with_feature("progressive-web-app"),
        });
    }

    if !has_feature(form, "user-authentication") && project_type != ProjectType::SimpleWebsite {
        candidates.push(Candidate {
            kind: RecommendationKind::Feature,
            title: "Add User Authentication",
            description: "Secure user management is essential for most web applications",
            quality: 0.9,
            confidence: 0.95,
            reasoning: "Security and user management are fundamental requirements",
            form: form.clone().with_feature("user-authentication"),
        });
    }

    if form.design_complexity == Some(DesignComplexity::Basic)
        && matches!(
            project_type,
            ProjectType::EcommercePlatform | ProjectType::SaasPlatform
        )
    {
        let mut upgraded = form.clone();
        upgraded.design_complexity = Some(DesignComplexity::Premium);
        candidates.push(Candidate {
            kind: RecommendationKind::Design,
            title: "Upgrade to Premium Design",
            description: "Premium design improves engagement and conversion rates",
            quality: 0.9,
            confidence: 0.8,
            reasoning: "Higher design quality leads to better user experience and business results",
            form: upgraded,
        });
    }

    if !has_feature(form, "analytics-dashboard") && project_type == ProjectType::SaasPlatform {
        candidates.push(Candidate {
            kind: RecommendationKind::Feature,
            title: "Add Analytics Dashboard",
            description: "Data insights are crucial for SaaS platform success",
            quality: 0.85,
            confidence: 0.9,
            reasoning: "Analytics provide valuable insights for business decisions",
            form: form.clone().with_feature("analytics-dashboard"),
        });
    }

    let current = estimate(form);
    candidates
        .into_iter()
        .map(|c| Recommendation {
            kind: c.kind,
            title: c.title.to_string(),
            description: c.description.to_string(),
            impact: EstimateDelta::between(&current, &estimate(&c.form)),
            quality: c.quality,
            confidence: c.confidence,
            reasoning: c.reasoning.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimization {
    pub area: String,
    pub current: String,
    pub suggested: String,
    /// Cost removed by the change. Positive means cheaper.
    pub savings: f64,
    pub weeks_saved: i64,
    pub tradeoffs: Vec<String>,
}

fn optimization(
    area: &str,
    current_label: &str,
    suggested_label: &str,
    current: &Estimate,
    alternative: &FormData,
    tradeoffs: &[&str],
) -> Optimization {
    let delta = EstimateDelta::between(current, &estimate(alternative));
    Optimization {
        area: area.to_string(),
        current: current_label.to_string(),
        suggested: suggested_label.to_string(),
        savings: -delta.cost,
        weeks_saved: -delta.weeks,
        tradeoffs: tradeoffs.iter().map(|t| t.to_string()).collect(),
    }
}

/// Suggest cheaper variants of the form, each priced by recomputation.
pub fn optimizations(form: &FormData) -> Vec<Optimization> {
    let current = estimate(form);
    let mut found = Vec::new();

    if form.design_complexity == Some(DesignComplexity::Premium) {
        let mut alternative = form.clone();
        alternative.design_complexity = Some(DesignComplexity::Custom);
        found.push(optimization(
            "Design Complexity",
            DesignComplexity::Premium.label(),
            DesignComplexity::Custom.label(),
            &current,
            &alternative,
            &["Fewer animations", "Simpler interactions", "Reduced visual effects"],
        ));
    }

    if form.timeline.urgency == Some(Urgency::SuperUrgent) {
        let mut alternative = form.clone();
        alternative.timeline.urgency = Some(Urgency::Normal);
        found.push(optimization(
            "Timeline Urgency",
            Urgency::SuperUrgent.label(),
            Urgency::Normal.label(),
            &current,
            &alternative,
            &["Longer development time", "Better quality assurance", "Reduced stress"],
        ));
    }

    let expensive = form
        .distinct_features()
        .into_iter()
        .filter_map(feature_by_id)
        .find(|f| f.cost_impact > EXPENSIVE_FEATURE_IMPACT);
    if let Some(feature) = expensive {
        let mut alternative = form.clone();
        alternative.features.retain(|id| id != feature.id);
        found.push(optimization(
            "Feature Selection",
            feature.name,
            "Remove or simplify",
            &current,
            &alternative,
            &["Reduced functionality", "Faster development", "Lower maintenance"],
        ));
    }

    found
}
