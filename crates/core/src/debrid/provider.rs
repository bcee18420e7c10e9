use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ReconcileError;

/// Debrid services whose availability responses can be reconciled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    RealDebrid,
    AllDebrid,
    Premiumize,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::RealDebrid => "realdebrid",
            ProviderKind::AllDebrid => "alldebrid",
            ProviderKind::Premiumize => "premiumize",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realdebrid" | "real_debrid" | "real-debrid" => Ok(ProviderKind::RealDebrid),
            "alldebrid" | "all_debrid" | "all-debrid" => Ok(ProviderKind::AllDebrid),
            "premiumize" => Ok(ProviderKind::Premiumize),
            _ => Err(ReconcileError::UnsupportedProvider(s.to_string())),
        }
    }
}
