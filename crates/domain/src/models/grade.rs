//! Letter grades and the fixed grade-point table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade recorded on a completed enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 13] = [
        LetterGrade::APlus,
        LetterGrade::A,
        LetterGrade::AMinus,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::BMinus,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::CMinus,
        LetterGrade::DPlus,
        LetterGrade::D,
        LetterGrade::DMinus,
        LetterGrade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
        }
    }

    /// Grade points on the 4.33 scale. The SQL function `grade_points`
    /// carries the same table.
    pub fn points(&self) -> f64 {
        match self {
            LetterGrade::APlus => 4.33,
            LetterGrade::A => 4.0,
            LetterGrade::AMinus => 3.67,
            LetterGrade::BPlus => 3.33,
            LetterGrade::B => 3.0,
            LetterGrade::BMinus => 2.67,
            LetterGrade::CPlus => 2.33,
            LetterGrade::C => 2.0,
            LetterGrade::CMinus => 1.67,
            LetterGrade::DPlus => 1.33,
            LetterGrade::D => 1.0,
            LetterGrade::DMinus => 0.67,
            LetterGrade::F => 0.0,
        }
    }

    /// Parses a stored grade, treating NULL and unknown values alike.
    pub fn parse_stored(raw: Option<&str>) -> Option<LetterGrade> {
        raw.and_then(|g| g.trim().parse().ok())
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterGrade::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid letter grade: {}", s))
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
