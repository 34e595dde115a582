// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pyramid Poker cards types.
//!
//! This crate defines types to create cards:
//!
//! ```
//! # use pyramid_cards::{Card, Rank, Suit};
//! let ah = Card::new(0, Rank::Ace, Suit::Hearts);
//! let kd = Card::new(1, Rank::King, Suit::Diamonds);
//! let jk = Card::wild(2);
//! ```
//!
//! Pyramid Poker is played with more than one standard deck plus a few wild
//! cards, so two cards may share the same rank and suit; each card carries a
//! numeric id that makes it unique within a pool. The [Deck] type builds the
//! combined deck, shuffles it, and deals 17-card pools:
//!
//! ```
//! # use pyramid_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng(), 2, 2);
//! assert_eq!(deck.count(), 106);
//!
//! let pool = deck.deal_pool();
//! assert_eq!(pool.len(), 17);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, ParseCardError, Rank, Suit, parse_hand};
