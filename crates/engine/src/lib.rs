// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pyramid poker arrangement engine.
//!
//! Splits a 17-card pool into back, middle and front hands maximizing the
//! expected points, the sum over the three positions of the hand base points
//! weighted by its win probability:
//!
//! ```
//! use pyramid_cards::Deck;
//! use pyramid_engine::Engine;
//!
//! let mut rng = rand::rng();
//! let mut deck = Deck::new_and_shuffled(&mut rng, 2, 0);
//! let pool = deck.deal_pool();
//!
//! let mut engine = Engine::new();
//! let arranged = engine.arrange(&pool).unwrap();
//!
//! assert_eq!(arranged.arrangement.validate(&pool), Ok(()));
//! assert!(arranged.score > 0.0);
//! ```
//!
//! The pipeline enumerates candidate hands from the pool, runs a
//! branch-and-bound [Search] over them, completes the best triple with
//! kickers, and validates the result. Pools with wilds are dispatched to a
//! [WildSolver].
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod arrangement;
mod candidates;
mod complete;
mod score;
mod search;
mod setup;
mod wilds;

pub use arrangement::{Arrangement, ArrangementError, Position, RankedHand};
pub use candidates::{Candidate, Candidates, CategoryCounts};
pub use complete::complete;
pub use score::{
    PointsEstimator, ScoreStrategy, Scoring, TableError, TieredTable, WinEstimator, base_points,
};
pub use search::{
    BestTriple, BoundFn, Search, SearchConfig, SearchOutcome, SearchState, SearchStats,
};
pub use setup::{ArrangeStats, Arranged, DispatchStats, Engine, EngineError};
pub use wilds::{Solution, SubstitutionSolver, WildSolver, enhance};
