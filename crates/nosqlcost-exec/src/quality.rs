use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse five-tier rating of a query from its time and fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quality {
    Critical,
    Slow,
    Ok,
    Good,
    Excellent,
}

impl Quality {
    pub fn assess(time_ms: f64, servers_accessed: u64) -> Self {
        if time_ms < 1.0 && servers_accessed == 1 {
            Quality::Excellent
        } else if time_ms < 10.0 && servers_accessed <= 2 {
            Quality::Good
        } else if time_ms < 100.0 && servers_accessed <= 5 {
            Quality::Ok
        } else if time_ms < 10_000.0 && servers_accessed <= 100 {
            Quality::Slow
        } else {
            Quality::Critical
        }
    }

    /// 1 (critical) to 5 (excellent).
    pub fn stars(&self) -> u8 {
        match self {
            Quality::Critical => 1,
            Quality::Slow => 2,
            Quality::Ok => 3,
            Quality::Good => 4,
            Quality::Excellent => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Critical => "CRITICAL",
            Quality::Slow => "SLOW",
            Quality::Ok => "OK",
            Quality::Good => "GOOD",
            Quality::Excellent => "EXCELLENT",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/5] {}", self.stars(), self.label())
    }
}
