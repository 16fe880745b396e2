use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a journaled trade resolved.
///
/// Serialized with the labels the journal stores (`"Stop Loss"`, `"Non Fillato"`),
/// so records coming from the storage layer deserialize without a mapping step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Target,
    #[serde(rename = "Stop Loss")]
    StopLoss,
    Breakeven,
    /// The order was never filled.
    #[serde(rename = "Non Fillato")]
    NotFilled,
    /// A setup that was journaled but not traded.
    Setup,
}

impl Outcome {
    /// Returns `true` for resolved outcomes that take part in win/loss statistics.
    pub fn is_active(&self) -> bool {
        matches!(self, Outcome::Target | Outcome::StopLoss | Outcome::Breakeven)
    }

    /// The label used by the journal's storage layer.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Target => "Target",
            Outcome::StopLoss => "Stop Loss",
            Outcome::Breakeven => "Breakeven",
            Outcome::NotFilled => "Non Fillato",
            Outcome::Setup => "Setup",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Target" => Ok(Outcome::Target),
            "Stop Loss" => Ok(Outcome::StopLoss),
            "Breakeven" => Ok(Outcome::Breakeven),
            "Non Fillato" => Ok(Outcome::NotFilled),
            "Setup" => Ok(Outcome::Setup),
            other => Err(CoreError::UnknownValue { field: "outcome", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Long" => Ok(Direction::Long),
            "Short" => Ok(Direction::Short),
            other => Err(CoreError::UnknownValue { field: "direction", value: other.to_string() }),
        }
    }
}
