use serde::{Deserialize, Serialize};

/// A closed set of selectable options with stable string keys.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;
}

/// Parse an option key, returning `None` for anything not in the table.
pub fn parse_choice<T: Choice>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    T::ALL.iter().copied().find(|c| c.key() == raw)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    SimpleWebsite,
    WebApplication,
    EcommercePlatform,
    SaasPlatform,
    EnterpriseSolution,
}

impl ProjectType {
    /// Rate used when no project type has been chosen.
    pub const DEFAULT: ProjectType = ProjectType::WebApplication;

    pub fn base_rate(&self) -> PriceRange {
        let (min, max, avg) = match self {
            ProjectType::SimpleWebsite => (160_000.0, 640_000.0, 400_000.0),
            ProjectType::WebApplication => (640_000.0, 2_000_000.0, 1_320_000.0),
            ProjectType::EcommercePlatform => (1_200_000.0, 4_000_000.0, 2_600_000.0),
            ProjectType::SaasPlatform => (2_000_000.0, 8_000_000.0, 5_000_000.0),
            ProjectType::EnterpriseSolution => (4_000_000.0, 16_000_000.0, 10_000_000.0),
        };
        PriceRange { min, max, avg }
    }

    pub fn base_weeks(&self) -> f64 {
        match self {
            ProjectType::SimpleWebsite => 4.0,
            ProjectType::WebApplication => 8.0,
            ProjectType::EcommercePlatform => 12.0,
            ProjectType::SaasPlatform => 16.0,
            ProjectType::EnterpriseSolution => 24.0,
        }
    }
}

impl Choice for ProjectType {
    const ALL: &'static [Self] = &[
        ProjectType::SimpleWebsite,
        ProjectType::WebApplication,
        ProjectType::EcommercePlatform,
        ProjectType::SaasPlatform,
        ProjectType::EnterpriseSolution,
    ];

    fn key(&self) -> &'static str {
        match self {
            ProjectType::SimpleWebsite => "simple-website",
            ProjectType::WebApplication => "web-application",
            ProjectType::EcommercePlatform => "ecommerce-platform",
            ProjectType::SaasPlatform => "saas-platform",
            ProjectType::EnterpriseSolution => "enterprise-solution",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProjectType::SimpleWebsite => "Simple Website",
            ProjectType::WebApplication => "Web Application",
            ProjectType::EcommercePlatform => "E-commerce Platform",
            ProjectType::SaasPlatform => "SaaS Platform",
            ProjectType::EnterpriseSolution => "Enterprise Solution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignComplexity {
    Basic,
    Custom,
    Premium,
    Enterprise,
}

impl DesignComplexity {
    pub fn multiplier(&self) -> f64 {
        match self {
            DesignComplexity::Basic => 1.0,
            DesignComplexity::Custom => 1.5,
            DesignComplexity::Premium => 2.0,
            DesignComplexity::Enterprise => 2.5,
        }
    }

    /// Extra weeks added to the schedule for this design tier.
    pub fn weeks_bonus(&self) -> f64 {
        match self {
            DesignComplexity::Basic => 0.0,
            DesignComplexity::Custom => 2.0,
            DesignComplexity::Premium => 4.0,
            DesignComplexity::Enterprise => 6.0,
        }
    }
}

impl Choice for DesignComplexity {
    const ALL: &'static [Self] = &[
        DesignComplexity::Basic,
        DesignComplexity::Custom,
        DesignComplexity::Premium,
        DesignComplexity::Enterprise,
    ];

    fn key(&self) -> &'static str {
        match self {
            DesignComplexity::Basic => "basic",
            DesignComplexity::Custom => "custom",
            DesignComplexity::Premium => "premium",
            DesignComplexity::Enterprise => "enterprise",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DesignComplexity::Basic => "Basic",
            DesignComplexity::Custom => "Custom",
            DesignComplexity::Premium => "Premium",
            DesignComplexity::Enterprise => "Enterprise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frontend {
    React,
    Nextjs,
    Vue,
    Angular,
    Svelte,
}

impl Frontend {
    pub fn factor(&self) -> f64 {
        match self {
            Frontend::React => 1.0,
            Frontend::Nextjs => 1.1,
            Frontend::Vue => 1.0,
            Frontend::Angular => 1.2,
            Frontend::Svelte => 0.9,
        }
    }
}

impl Choice for Frontend {
    const ALL: &'static [Self] = &[
        Frontend::React,
        Frontend::Nextjs,
        Frontend::Vue,
        Frontend::Angular,
        Frontend::Svelte,
    ];

    fn key(&self) -> &'static str {
        match self {
            Frontend::React => "react",
            Frontend::Nextjs => "nextjs",
            Frontend::Vue => "vue",
            Frontend::Angular => "angular",
            Frontend::Svelte => "svelte",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Frontend::React => "React",
            Frontend::Nextjs => "Next.js",
            Frontend::Vue => "Vue.js",
            Frontend::Angular => "Angular",
            Frontend::Svelte => "Svelte",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Nodejs,
    Python,
    Ruby,
    Php,
    Java,
}

impl Backend {
    pub fn factor(&self) -> f64 {
        match self {
            Backend::Nodejs => 1.0,
            Backend::Python => 1.1,
            Backend::Ruby => 1.0,
            Backend::Php => 0.9,
            Backend::Java => 1.3,
        }
    }
}

impl Choice for Backend {
    const ALL: &'static [Self] = &[
        Backend::Nodejs,
        Backend::Python,
        Backend::Ruby,
        Backend::Php,
        Backend::Java,
    ];

    fn key(&self) -> &'static str {
        match self {
            Backend::Nodejs => "nodejs",
            Backend::Python => "python",
            Backend::Ruby => "ruby",
            Backend::Php => "php",
            Backend::Java => "java",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Backend::Nodejs => "Node.js",
            Backend::Python => "Python",
            Backend::Ruby => "Ruby",
            Backend::Php => "PHP",
            Backend::Java => "Java",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Database {
    Postgresql,
    Mongodb,
    Mysql,
    Redis,
}

impl Database {
    pub fn factor(&self) -> f64 {
        match self {
            Database::Postgresql => 1.0,
            Database::Mongodb => 1.1,
            Database::Mysql => 0.9,
            Database::Redis => 1.2,
        }
    }
}

impl Choice for Database {
    const ALL: &'static [Self] = &[
        Database::Postgresql,
        Database::Mongodb,
        Database::Mysql,
        Database::Redis,
    ];

    fn key(&self) -> &'static str {
        match self {
            Database::Postgresql => "postgresql",
            Database::Mongodb => "mongodb",
            Database::Mysql => "mysql",
            Database::Redis => "redis",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Database::Postgresql => "PostgreSQL",
            Database::Mongodb => "MongoDB",
            Database::Mysql => "MySQL",
            Database::Redis => "Redis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Normal,
    Urgent,
    SuperUrgent,
}

impl Urgency {
    /// Price surcharge for compressed delivery.
    pub fn multiplier(&self) -> f64 {
        match self {
            Urgency::Normal => 1.0,
            Urgency::Urgent => 1.3,
            Urgency::SuperUrgent => 1.6,
        }
    }

    /// Schedule compression as `(scale, floor_weeks)`.
    pub fn compression(&self) -> Option<(f64, f64)> {
        match self {
            Urgency::Normal => None,
            Urgency::Urgent => Some((0.8, 2.0)),
            Urgency::SuperUrgent => Some((0.6, 1.0)),
        }
    }
}

impl Choice for Urgency {
    const ALL: &'static [Self] = &[Urgency::Normal, Urgency::Urgent, Urgency::SuperUrgent];

    fn key(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
            Urgency::SuperUrgent => "super-urgent",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Urgency::Normal => "Normal",
            Urgency::Urgent => "Urgent",
            Urgency::SuperUrgent => "Super Urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportLevel {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

impl Choice for SupportLevel {
    const ALL: &'static [Self] = &[
        SupportLevel::Basic,
        SupportLevel::Standard,
        SupportLevel::Premium,
        SupportLevel::Enterprise,
    ];

    fn key(&self) -> &'static str {
        match self {
            SupportLevel::Basic => "basic",
            SupportLevel::Standard => "standard",
            SupportLevel::Premium => "premium",
            SupportLevel::Enterprise => "enterprise",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SupportLevel::Basic => "Basic Support",
            SupportLevel::Standard => "Standard Support",
            SupportLevel::Premium => "Premium Support",
            SupportLevel::Enterprise => "Enterprise Support",
        }
    }
}
