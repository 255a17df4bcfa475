use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureCategory {
    Frontend,
    Backend,
    Advanced,
}

impl FeatureCategory {
    pub const ALL: [FeatureCategory; 3] = [
        FeatureCategory::Frontend,
        FeatureCategory::Backend,
        FeatureCategory::Advanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureCategory::Frontend => "Frontend",
            FeatureCategory::Backend => "Backend",
            FeatureCategory::Advanced => "Advanced",
        }
    }

    pub fn parse(raw: &str) -> Option<FeatureCategory> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub category: FeatureCategory,
    pub description: &'static str,
    pub cost_impact: f64,
    pub time_impact: u32,
    pub complexity: Complexity,
}

const fn feature(
    id: &'static str,
    name: &'static str,
    category: FeatureCategory,
    description: &'static str,
    cost_impact: f64,
    time_impact: u32,
    complexity: Complexity,
) -> Feature {
    Feature {
        id,
        name,
        category,
        description,
        cost_impact,
        time_impact,
        complexity,
    }
}

use Complexity::{High, Low, Medium};
use FeatureCategory::{Advanced, Backend, Frontend};

#[rustfmt::skip]
static FEATURES: [Feature; 20] = [
    feature("responsive-design", "Responsive Design", Frontend, "Mobile-friendly design that works on all devices", 0.2, 1, Low),
    feature("progressive-web-app", "Progressive Web App", Frontend, "Installable app with offline capabilities", 0.4, 2, Medium),
    feature("real-time-updates", "Real-time Updates", Frontend, "Live data updates using WebSockets", 0.6, 3, High),
    feature("multi-language", "Multi-language Support", Frontend, "Support for multiple languages", 0.3, 2, Medium),
    feature("dark-mode", "Dark Mode", Frontend, "Dark theme option for users", 0.1, 1, Low),
    feature("user-authentication", "User Authentication", Backend, "Secure user login and registration", 0.3, 2, Medium),
    feature("payment-processing", "Payment Processing", Backend, "Integration with payment gateways", 0.5, 3, High),
    feature("database-integration", "Database Integration", Backend, "Custom database setup and integration", 0.4, 2, Medium),
    feature("api-development", "API Development", Backend, "RESTful or GraphQL API development", 0.6, 3, High),
    feature("file-upload", "File Upload", Backend, "Secure file upload and storage", 0.2, 1, Low),
    feature("content-management", "Content Management", Backend, "CMS for managing website content", 0.4, 2, Medium),
    feature("email-notifications", "Email Notifications", Backend, "Automated email system", 0.2, 1, Low),
    feature("search-functionality", "Search Functionality", Backend, "Advanced search capabilities", 0.3, 2, Medium),
    feature("ai-integration", "AI Integration", Advanced, "Artificial intelligence features", 1.0, 4, High),
    feature("machine-learning", "Machine Learning", Advanced, "ML models and predictions", 1.5, 6, High),
    feature("blockchain", "Blockchain", Advanced, "Blockchain technology integration", 1.2, 5, High),
    feature("ar-vr", "AR/VR Features", Advanced, "Augmented/Virtual Reality", 1.8, 8, High),
    feature("iot-integration", "IoT Integration", Advanced, "Internet of Things connectivity", 1.3, 5, High),
    feature("analytics-dashboard", "Analytics Dashboard", Advanced, "Data visualization and reporting", 0.4, 2, Medium),
    feature("third-party-integrations", "Third-party Integrations", Advanced, "External service connections", 0.5, 3, Medium),
];

pub fn all_features() -> &'static [Feature] {
    &FEATURES
}

pub fn feature_by_id(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id == id)
}

pub fn features_by_category(category: FeatureCategory) -> Vec<&'static Feature> {
    FEATURES.iter().filter(|f| f.category == category).collect()
}

/// Multiplicative price factor for a feature; `None` for unknown ids.
pub fn pricing_factor(id: &str) -> Option<f64> {
    let factor = match id {
        "responsive-design" => 1.2,
        "progressive-web-app" => 1.4,
        "real-time-updates" => 1.6,
        "multi-language" => 1.3,
        "dark-mode" => 1.1,
        "user-authentication" => 1.3,
        "payment-processing" => 1.5,
        "database-integration" => 1.4,
        "api-development" => 1.6,
        "file-upload" => 1.2,
        "content-management" => 1.4,
        "email-notifications" => 1.2,
        "search-functionality" => 1.3,
        "ai-integration" => 2.0,
        "machine-learning" => 2.5,
        "blockchain" => 2.2,
        "ar-vr" => 2.8,
        "iot-integration" => 2.3,
        "analytics-dashboard" => 1.4,
        "third-party-integrations" => 1.5,
        _ => return None,
    };
    Some(factor)
}
