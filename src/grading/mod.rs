//! Card condition self-assessment
//!
//! Collectors score centering, corners, edges and surface from 1 to 10.
//! The average maps to an estimated grade band, which in turn drives a
//! rough return-on-investment estimate for sending the card to a grader.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradingError {
    #[error("{aspect} score must be between 1 and 10, got {score}")]
    ScoreOutOfRange { aspect: &'static str, score: u8 },

    #[error("Unknown grading service: {0}")]
    UnknownService(String),

    #[error("Unknown turnaround: {0}")]
    UnknownTurnaround(String),
}

/// Self-assessed condition scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingEvaluation {
    pub centering: u8,
    pub corners: u8,
    pub edges: u8,
    pub surface: u8,
}

impl Default for GradingEvaluation {
    fn default() -> Self {
        Self {
            centering: 5,
            corners: 5,
            edges: 5,
            surface: 5,
        }
    }
}

impl GradingEvaluation {
    /// Build an evaluation, rejecting scores outside 1..=10
    pub fn new(centering: u8, corners: u8, edges: u8, surface: u8) -> Result<Self, GradingError> {
        let evaluation = Self {
            centering,
            corners,
            edges,
            surface,
        };
        evaluation.validate()?;
        Ok(evaluation)
    }

    pub fn validate(&self) -> Result<(), GradingError> {
        for (aspect, score) in self.aspects() {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(GradingError::ScoreOutOfRange { aspect, score });
            }
        }
        Ok(())
    }

    /// Each aspect with its score
    pub fn aspects(&self) -> [(&'static str, u8); 4] {
        [
            ("centering", self.centering),
            ("corners", self.corners),
            ("edges", self.edges),
            ("surface", self.surface),
        ]
    }

    pub fn average(&self) -> f64 {
        let total: u32 = self.aspects().iter().map(|(_, s)| *s as u32).sum();
        total as f64 / 4.0
    }

    pub fn estimated_grade(&self) -> GradeBand {
        GradeBand::from_average(self.average())
    }
}

/// Descriptive label for a single aspect score
pub fn condition_label(score: u8) -> &'static str {
    match score {
        9..=u8::MAX => "Excellent",
        7..=8 => "Very Good",
        5..=6 => "Good",
        _ => "Fair",
    }
}

/// Estimated grading outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeBand {
    #[serde(rename = "9.5-10")]
    GemMint,
    #[serde(rename = "8.5-9")]
    Mint,
    #[serde(rename = "7.5-8")]
    NearMint,
    #[serde(rename = "Below 7.5")]
    Below,
}

impl GradeBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 9.5 {
            Self::GemMint
        } else if average >= 8.5 {
            Self::Mint
        } else if average >= 7.5 {
            Self::NearMint
        } else {
            Self::Below
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GemMint => "9.5-10",
            Self::Mint => "8.5-9",
            Self::NearMint => "7.5-8",
            Self::Below => "Below 7.5",
        }
    }

    /// How many times the raw value a graded card in this band sells for
    pub fn value_multiplier(&self) -> f64 {
        match self {
            Self::GemMint => 15.0,
            Self::Mint => 5.0,
            Self::NearMint | Self::Below => 2.0,
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected profit of grading a card: graded value less the raw value and fee
pub fn roi(card_value: f64, grading_cost: f64, band: GradeBand) -> f64 {
    card_value * band.value_multiplier() - card_value - grading_cost
}

/// Grading companies and their base fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingService {
    Psa,
    Bgs,
    Sgc,
}

impl GradingService {
    pub fn all() -> [GradingService; 3] {
        [Self::Psa, Self::Bgs, Self::Sgc]
    }

    /// Submission fee in USD
    pub fn fee(&self) -> f64 {
        match self {
            Self::Psa => 30.0,
            Self::Bgs => 35.0,
            Self::Sgc => 25.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Psa => "PSA",
            Self::Bgs => "BGS",
            Self::Sgc => "SGC",
        }
    }
}

impl FromStr for GradingService {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "psa" => Ok(Self::Psa),
            "bgs" => Ok(Self::Bgs),
            "sgc" => Ok(Self::Sgc),
            _ => Err(GradingError::UnknownService(s.to_string())),
        }
    }
}

/// Grading turnaround tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turnaround {
    Economy,
    #[default]
    Regular,
    Express,
}

impl Turnaround {
    pub fn days(&self) -> u32 {
        match self {
            Self::Economy => 120,
            Self::Regular => 60,
            Self::Express => 20,
        }
    }
}

impl FromStr for Turnaround {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" => Ok(Self::Economy),
            "regular" => Ok(Self::Regular),
            "express" => Ok(Self::Express),
            _ => Err(GradingError::UnknownTurnaround(s.to_string())),
        }
    }
}

/// Complete estimate for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingEstimate {
    pub average: f64,
    pub estimated_grade: GradeBand,
    pub service: Option<GradingService>,
    pub turnaround_days: Option<u32>,
    pub grading_cost: f64,
    /// Present when a card value was supplied
    pub roi: Option<f64>,
}

/// Estimate grade and, given a raw value, the return of grading with `service`
pub fn estimate(
    evaluation: &GradingEvaluation,
    card_value: Option<f64>,
    service: Option<GradingService>,
    turnaround: Option<Turnaround>,
) -> Result<GradingEstimate, GradingError> {
    evaluation.validate()?;

    let band = evaluation.estimated_grade();
    let grading_cost = service.map(|s| s.fee()).unwrap_or(0.0);

    Ok(GradingEstimate {
        average: evaluation.average(),
        estimated_grade: band,
        service,
        turnaround_days: turnaround.map(|t| t.days()),
        grading_cost,
        roi: card_value.map(|value| roi(value, grading_cost, band)),
    })
}
