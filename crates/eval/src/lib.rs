// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pyramid Poker hand evaluator.
//!
//! Pyramid Poker hands range from 3 to 8 cards: the front hand has 3 or 5
//! cards, the middle 5 to 7, the back 5 to 8. This crate defines the hand
//! [Category] numbers, the lexicographic [HandRank] used to order hands, and
//! the [evaluate] function that ranks a hand, with wild cards standing for
//! whatever card completes the best hand:
//!
//! ```
//! # use pyramid_cards::parse_hand;
//! # use pyramid_eval::{evaluate, Category};
//! let hand = parse_hand("AS KS QS JS TS").unwrap();
//! let rank = evaluate(&hand).unwrap();
//! assert_eq!(rank.category(), Category::StraightFlush);
//! assert_eq!(rank.name(), "Royal Flush");
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod eval;
mod rank;

pub use eval::{EvalError, evaluate, evaluate_partial};
pub use rank::{Category, HandRank};
