//! Target asset mix by risk profile

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Investor risk tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// Portfolio split in whole percentages summing to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub stocks: u8,
    pub bonds: u8,
    pub cash: u8,
    pub real_estate: u8,
}

impl AssetAllocation {
    pub fn total(&self) -> u32 {
        self.stocks as u32 + self.bonds as u32 + self.cash as u32 + self.real_estate as u32
    }
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }

    /// Recommended allocation for this profile
    pub fn allocation(&self) -> AssetAllocation {
        let (stocks, bonds, cash, real_estate) = match self {
            RiskProfile::Conservative => (30, 50, 15, 5),
            RiskProfile::Moderate => (60, 25, 10, 5),
            RiskProfile::Aggressive => (80, 10, 5, 5),
        };
        AssetAllocation {
            stocks,
            bonds,
            cash,
            real_estate,
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "aggressive" => Ok(RiskProfile::Aggressive),
            other => Err(format!("unknown risk profile: {other}")),
        }
    }
}
