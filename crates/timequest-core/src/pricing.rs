//! Pricing tiers. Each resolves to a static external checkout link.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Individual,
    Family,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Plan {
    pub tier: PlanTier,
    pub name: &'static str,
    pub description: &'static str,
    /// One-time price in US cents.
    pub price_cents: u32,
    pub features: &'static [&'static str],
    pub checkout: &'static str,
    pub most_popular: bool,
}

pub static PLANS: [Plan; 2] = [
    Plan {
        tier: PlanTier::Individual,
        name: "Individual Plan",
        description: "Perfect for one child ready to become a time management pro.",
        price_cents: 1250,
        features: &[
            "Full access for one child",
            "All interactive lessons",
            "AI planner tools",
            "Calendar and To-Do lists",
        ],
        checkout: "https://buy.stripe.com/6oU6oG0D19PNaTncRl5AR1p",
        most_popular: false,
    },
    Plan {
        tier: PlanTier::Family,
        name: "Family Plan",
        description: "Get the whole family organized and on track.",
        price_cents: 1750,
        features: &[
            "Full access for up to two children",
            "All features from Individual Plan",
            "Separate profiles for each child",
            "Family progress tracking (coming soon!)",
        ],
        checkout: "https://buy.stripe.com/5kQ6oG1H5bXVgdH7x15AR1h",
        most_popular: true,
    },
];

impl PlanTier {
    pub fn plan(&self) -> &'static Plan {
        match self {
            PlanTier::Individual => &PLANS[0],
            PlanTier::Family => &PLANS[1],
        }
    }
}

impl Plan {
    /// "$12.50"
    pub fn price_text(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }

    pub fn checkout_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.checkout)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Individual => write!(f, "individual"),
            PlanTier::Family => write!(f, "family"),
        }
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "individual" => Ok(PlanTier::Individual),
            "family" => Ok(PlanTier::Family),
            other => Err(format!("unknown plan '{other}' (expected individual or family)")),
        }
    }
}
