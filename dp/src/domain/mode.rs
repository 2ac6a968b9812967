//! Behavioral modes for planning

use serde::{Deserialize, Serialize};

/// Coarse behavioral posture controlling scoring bias and block composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Recovery-oriented: favor self-care, suppress deep work
    Rest,
    /// Middle band: small uniform rewards for both task families
    #[default]
    Balance,
    /// Push-oriented: favor deep work, suppress self-care
    Focus,
}

impl Mode {
    /// Normalize an arbitrary mode string: trimmed and lowercased, anything
    /// outside the three known values coerces to Balance
    pub fn coerce(value: &str) -> Self {
        value.parse().unwrap_or(Self::Balance)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Balance => write!(f, "balance"),
            Self::Focus => write!(f, "focus"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "balance" => Ok(Self::Balance),
            "focus" => Ok(Self::Focus),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}
