//! StartupField - The Field Schema
//!
//! The fixed, ordered set of startup attributes the assistant must collect
//! before a deck can be generated.

use serde::{Deserialize, Serialize};

/// A required startup attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupField {
    CompanyName,
    Industry,
    Problem,
    Solution,
    TargetMarket,
    BusinessModel,
}

impl StartupField {
    /// Every required field, in schema order
    pub const REQUIRED: [StartupField; 6] = [
        StartupField::CompanyName,
        StartupField::Industry,
        StartupField::Problem,
        StartupField::Solution,
        StartupField::TargetMarket,
        StartupField::BusinessModel,
    ];

    /// Wire name used in tool arguments and stored data
    pub fn as_str(&self) -> &'static str {
        match self {
            StartupField::CompanyName => "company_name",
            StartupField::Industry => "industry",
            StartupField::Problem => "problem",
            StartupField::Solution => "solution",
            StartupField::TargetMarket => "target_market",
            StartupField::BusinessModel => "business_model",
        }
    }

    /// Description advertised to the chat-completion service
    pub fn description(&self) -> &'static str {
        match self {
            StartupField::CompanyName => "Company or product name",
            StartupField::Industry => "Industry or sector",
            StartupField::Problem => "Problem being solved",
            StartupField::Solution => "Your solution",
            StartupField::TargetMarket => "Target customers/market",
            StartupField::BusinessModel => "How you make money",
        }
    }
}

impl std::fmt::Display for StartupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StartupField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StartupField::REQUIRED
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown startup field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for field in StartupField::REQUIRED {
            assert_eq!(field.as_str().parse::<StartupField>(), Ok(field));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("team_size".parse::<StartupField>().is_err());
        assert!("Company_Name".parse::<StartupField>().is_err());
    }

    #[test]
    fn test_serde_matches_wire_name() {
        let json = serde_json::to_string(&StartupField::TargetMarket).unwrap();
        assert_eq!(json, "\"target_market\"");
    }
}
