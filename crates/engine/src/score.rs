// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Points table and win-probability scoring.
//!
//! A hand is worth its base points weighted by the probability of winning its
//! position. The probability comes from a [WinEstimator]; the default
//! [PointsEstimator] is a category heuristic, a [TieredTable] looks up
//! measured probabilities from a CSV file, and model-based estimators can
//! plug in through the same trait.
use ahash::AHashMap;
use thiserror::Error;

use pyramid_eval::{Category, HandRank};

use crate::arrangement::Position;

/// The base points of a category at a position, 1 if not listed.
pub fn base_points(category: Category, position: Position) -> u32 {
    match position {
        Position::Front => match category {
            Category::Trips => 3,
            Category::Straight => 4,
            Category::Flush => 4,
            Category::FullHouse => 5,
            Category::Quads => 12,
            Category::StraightFlush => 15,
            Category::FiveOfAKind => 18,
            _ => 1,
        },
        Position::Middle => match category {
            Category::FullHouse => 2,
            Category::Quads => 8,
            Category::StraightFlush => 10,
            Category::FiveOfAKind => 12,
            Category::StraightFlush6 => 16,
            Category::SixOfAKind => 20,
            Category::StraightFlush7 => 22,
            Category::SevenOfAKind => 28,
            _ => 1,
        },
        Position::Back => match category {
            Category::Quads => 4,
            Category::StraightFlush => 5,
            Category::FiveOfAKind => 6,
            Category::StraightFlush6 => 8,
            Category::SixOfAKind => 10,
            Category::StraightFlush7 => 11,
            Category::SevenOfAKind => 14,
            Category::StraightFlush8 => 14,
            Category::EightOfAKind => 18,
            _ => 1,
        },
    }
}

/// Estimates the probability that a hand wins its position.
pub trait WinEstimator {
    /// The win probability of a hand at a position on a `players` table.
    fn estimate(&self, rank: &HandRank, position: Position, players: u32) -> f64;
}

/// The default heuristic estimator.
///
/// Base probability by category, adjusted for the table size, penalized for
/// weak front hands, boosted for strong back hands, and capped at 0.95.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointsEstimator;

impl WinEstimator for PointsEstimator {
    fn estimate(&self, rank: &HandRank, position: Position, players: u32) -> f64 {
        let category = rank.category();
        let base: f64 = match category.number() {
            10.. => 0.85,
            9 => 0.75,
            8 => 0.65,
            7 => 0.55,
            6 => 0.45,
            5 => 0.40,
            4 => 0.35,
            3 => 0.25,
            2 => 0.20,
            _ => 0.15,
        };

        // Probabilities are tuned for a 4 players table.
        let mut p: f64 = if players != 4 {
            base.powf((players.max(2) - 1) as f64 / 3.0)
        } else {
            base
        };

        if position == Position::Front && category < Category::Trips {
            p *= 0.8;
        }
        if position == Position::Back && category >= Category::FullHouse {
            p *= 1.1;
        }

        p.min(0.95)
    }
}

/// An invalid tiered probability table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A line that is not position,category[,high],probability.
    #[error("invalid tiered table line {0}: {1:?}")]
    InvalidLine(usize, String),
}

/// A win-probability lookup table loaded from CSV.
///
/// Plain tables are keyed by position and category; detailed tables add the
/// first tiebreak value. Missing keys fall back to a fixed probability.
#[derive(Debug, Clone)]
pub struct TieredTable {
    probs: AHashMap<(Position, u8, Option<u8>), f64>,
    detailed: bool,
    fallback: f64,
}

impl TieredTable {
    /// Loads a table from CSV text.
    ///
    /// Lines are `position,category,probability`, or
    /// `position,category,high,probability` for a detailed table; empty lines
    /// and `#` comments are skipped.
    pub fn from_csv(text: &str, detailed: bool) -> Result<Self, TableError> {
        let mut probs = AHashMap::default();

        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("position") {
                continue;
            }

            let invalid = || TableError::InvalidLine(n + 1, line.to_string());
            let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
            if fields.len() != 3 + detailed as usize {
                return Err(invalid());
            }

            let position = match fields[0] {
                "front" => Position::Front,
                "middle" => Position::Middle,
                "back" => Position::Back,
                _ => return Err(invalid()),
            };

            let category = fields[1].parse::<u8>().map_err(|_| invalid())?;
            let high = if detailed {
                Some(fields[2].parse::<u8>().map_err(|_| invalid())?)
            } else {
                None
            };

            let prob = fields
                .last()
                .unwrap()
                .parse::<f64>()
                .map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&prob) {
                return Err(invalid());
            }

            probs.insert((position, category, high), prob);
        }

        Ok(Self {
            probs,
            detailed,
            fallback: 0.1,
        })
    }

    /// Sets the probability used for missing keys.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }
}

impl WinEstimator for TieredTable {
    fn estimate(&self, rank: &HandRank, position: Position, _players: u32) -> f64 {
        let high = if self.detailed {
            Some(rank.tiebreaks().first().copied().unwrap_or(0))
        } else {
            None
        };

        let key = (position, rank.category().number(), high);
        self.probs.get(&key).copied().unwrap_or(self.fallback)
    }
}

/// Scores hands combining base points and a win estimator.
pub struct Scoring {
    estimator: Box<dyn WinEstimator>,
    players: u32,
}

impl Scoring {
    /// Creates a scoring model with the heuristic estimator for 4 players.
    pub fn new() -> Self {
        Self {
            estimator: Box::new(PointsEstimator),
            players: 4,
        }
    }

    /// Replaces the win estimator.
    pub fn with_estimator(mut self, estimator: Box<dyn WinEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Sets the table size.
    pub fn with_players(mut self, players: u32) -> Self {
        self.players = players;
        self
    }

    /// The base points of a hand at a position.
    pub fn points(&self, rank: &HandRank, position: Position) -> u32 {
        base_points(rank.category(), position)
    }

    /// The win probability of a hand at a position.
    pub fn probability(&self, rank: &HandRank, position: Position) -> f64 {
        self.estimator.estimate(rank, position, self.players)
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoring")
            .field("players", &self.players)
            .finish()
    }
}

/// The score a search maximizes.
pub trait ScoreStrategy {
    /// The expected points of a hand at a position.
    fn expected(&self, rank: &HandRank, position: Position) -> f64;
}

impl ScoreStrategy for Scoring {
    fn expected(&self, rank: &HandRank, position: Position) -> f64 {
        self.probability(rank, position) * self.points(rank, position) as f64
    }
}

impl<F> ScoreStrategy for F
where
    F: Fn(&HandRank, Position) -> f64,
{
    fn expected(&self, rank: &HandRank, position: Position) -> f64 {
        self(rank, position)
    }
}
