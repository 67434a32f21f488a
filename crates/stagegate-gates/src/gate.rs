//! Gate and tier identifiers.
//!
//! Gates are strictly ordered but carry no implicit path between them: each
//! evaluation is independent, and the caller tracks which gate its evidence
//! currently represents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The five checkpoints, named by the phase transition they guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gate {
    /// P0 → P1: research complete, acceptable tier.
    P0ToP1,
    /// P1 → P2: business model sound, market validated.
    P1ToP2,
    /// P2 → P3: the critical go/no-go on committing further resources.
    P2ToP3,
    /// P3 → P4: code complete, tests passing, deployment ready.
    P3ToP4,
    /// P4 → P5: sustainability proven on actual figures.
    P4ToP5,
}

impl Gate {
    /// All gates in process order.
    pub const fn all() -> [Gate; 5] {
        [Gate::P0ToP1, Gate::P1ToP2, Gate::P2ToP3, Gate::P3ToP4, Gate::P4ToP5]
    }

    /// Resolve a phase identifier ("p1" … "p5") naming the phase being entered.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    pub fn from_phase_id(phase: &str) -> Option<Gate> {
        match phase.trim().to_ascii_lowercase().as_str() {
            "p1" => Some(Gate::P0ToP1),
            "p2" => Some(Gate::P1ToP2),
            "p3" => Some(Gate::P2ToP3),
            "p4" => Some(Gate::P3ToP4),
            "p5" => Some(Gate::P4ToP5),
            _ => None,
        }
    }

    /// The phase this gate admits into (1 … 5).
    pub fn target_phase(self) -> u8 {
        match self {
            Gate::P0ToP1 => 1,
            Gate::P1ToP2 => 2,
            Gate::P2ToP3 => 3,
            Gate::P3ToP4 => 4,
            Gate::P4ToP5 => 5,
        }
    }

    /// The identifier accepted by `from_phase_id`.
    pub fn phase_id(self) -> String {
        format!("p{}", self.target_phase())
    }

    /// Human label used in `GateResult::gate`.
    pub fn label(self) -> &'static str {
        match self {
            Gate::P0ToP1 => "P0 → P1",
            Gate::P1ToP2 => "P1 → P2",
            Gate::P2ToP3 => "P2 → P3 (critical go/no-go)",
            Gate::P3ToP4 => "P3 → P4",
            Gate::P4ToP5 => "P4 → P5 (sustainability check)",
        }
    }

    /// The gate after this one, if any.
    pub fn next(self) -> Option<Gate> {
        match self {
            Gate::P0ToP1 => Some(Gate::P1ToP2),
            Gate::P1ToP2 => Some(Gate::P2ToP3),
            Gate::P2ToP3 => Some(Gate::P3ToP4),
            Gate::P3ToP4 => Some(Gate::P4ToP5),
            Gate::P4ToP5 => None,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Research outcome tier. Only T1 and T2 may proceed past the first gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    T1,
    T2,
    T3,
    T4,
}

impl Tier {
    pub fn allows_proceed(self) -> bool {
        matches!(self, Tier::T1 | Tier::T2)
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t1" => Ok(Tier::T1),
            "t2" => Ok(Tier::T2),
            "t3" => Ok(Tier::T3),
            "t4" => Ok(Tier::T4),
            other => Err(format!("unrecognized tier '{}'", other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::T1 => "T1",
            Tier::T2 => "T2",
            Tier::T3 => "T3",
            Tier::T4 => "T4",
        })
    }
}
