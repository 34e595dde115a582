// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand categories and lexicographic hand ranks.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A hand category, higher categories beat lower ones.
///
/// Categories above [Category::FiveOfAKind] belong to the large 6 to 8 cards
/// hands that only exist in the middle and back positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// No pair.
    HighCard = 1,
    /// One pair.
    Pair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    Trips,
    /// Five consecutive values.
    Straight,
    /// Five cards of one suit.
    Flush,
    /// Trips plus a pair.
    FullHouse,
    /// Four of a kind.
    Quads,
    /// A straight in one suit.
    StraightFlush,
    /// Five of a kind, needs duplicate decks or wilds.
    FiveOfAKind,
    /// A 6-card straight in one suit.
    StraightFlush6,
    /// Six of a kind.
    SixOfAKind,
    /// A 7-card straight in one suit.
    StraightFlush7,
    /// Seven of a kind.
    SevenOfAKind,
    /// An 8-card straight in one suit.
    StraightFlush8,
    /// Eight of a kind.
    EightOfAKind,
}

impl Category {
    /// The category number, 1 for a high card up to 16 for eight of a kind.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// The number of equal-rank cards for of-a-kind categories.
    pub fn of_a_kind_size(&self) -> Option<usize> {
        let size = match self {
            Category::Pair => 2,
            Category::Trips => 3,
            Category::Quads => 4,
            Category::FiveOfAKind => 5,
            Category::SixOfAKind => 6,
            Category::SevenOfAKind => 7,
            Category::EightOfAKind => 8,
            _ => return None,
        };
        Some(size)
    }

    /// The hand length for straight-flush categories.
    pub fn straight_flush_len(&self) -> Option<usize> {
        let len = match self {
            Category::StraightFlush => 5,
            Category::StraightFlush6 => 6,
            Category::StraightFlush7 => 7,
            Category::StraightFlush8 => 8,
            _ => return None,
        };
        Some(len)
    }

    /// The category name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::Trips => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::Quads => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::FiveOfAKind => "Five of a Kind",
            Category::StraightFlush6 => "6-Card Straight Flush",
            Category::SixOfAKind => "Six of a Kind",
            Category::StraightFlush7 => "7-Card Straight Flush",
            Category::SevenOfAKind => "Seven of a Kind",
            Category::StraightFlush8 => "8-Card Straight Flush",
            Category::EightOfAKind => "Eight of a Kind",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The rank of an evaluated hand.
///
/// A rank is a category followed by tiebreak values compared
/// lexicographically; a missing tiebreak compares as zero so that, for
/// example, a bare pair rank equals the same rank padded with zero kickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRank {
    category: Category,
    tiebreaks: Vec<u8>,
}

impl HandRank {
    /// Creates a rank from a category and its tiebreak values.
    pub fn new(category: Category, tiebreaks: Vec<u8>) -> Self {
        Self {
            category,
            tiebreaks,
        }
    }

    /// The hand category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The tiebreak values.
    pub fn tiebreaks(&self) -> &[u8] {
        &self.tiebreaks
    }

    /// A readable hand name, the ace-high straight flush is a Royal Flush.
    pub fn name(&self) -> &'static str {
        if self.category == Category::StraightFlush && self.tiebreaks.first() == Some(&14) {
            "Royal Flush"
        } else {
            self.category.name()
        }
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandRank {}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category.cmp(&other.category).then_with(|| {
            let len = self.tiebreaks.len().max(other.tiebreaks.len());
            for i in 0..len {
                let a = self.tiebreaks.get(i).copied().unwrap_or(0);
                let b = other.tiebreaks.get(i).copied().unwrap_or(0);
                match a.cmp(&b) {
                    Ordering::Equal => {}
                    ord => return ord,
                }
            }
            Ordering::Equal
        })
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order() {
        let mut numbers = Vec::new();
        for c in [
            Category::HighCard,
            Category::Pair,
            Category::TwoPair,
            Category::Trips,
            Category::Straight,
            Category::Flush,
            Category::FullHouse,
            Category::Quads,
            Category::StraightFlush,
            Category::FiveOfAKind,
            Category::StraightFlush6,
            Category::SixOfAKind,
            Category::StraightFlush7,
            Category::SevenOfAKind,
            Category::StraightFlush8,
            Category::EightOfAKind,
        ] {
            numbers.push(c.number());
        }

        assert_eq!(numbers, (1..=16).collect::<Vec<_>>());

        // A six of a kind beats a 6-card straight flush.
        assert!(Category::SixOfAKind > Category::StraightFlush6);
        assert!(Category::StraightFlush7 > Category::SixOfAKind);
    }

    #[test]
    fn rank_lexicographic_order() {
        let aces = HandRank::new(Category::Pair, vec![14, 13, 12, 11]);
        let kings = HandRank::new(Category::Pair, vec![13, 14, 12, 11]);
        assert!(aces > kings);

        let trips = HandRank::new(Category::Trips, vec![2]);
        assert!(trips > aces);

        // Equal kickers decide on the next value.
        let a = HandRank::new(Category::HighCard, vec![14, 12, 9, 7, 4]);
        let b = HandRank::new(Category::HighCard, vec![14, 12, 9, 7, 3]);
        assert!(a > b);
    }

    #[test]
    fn rank_implicit_zero_padding() {
        let short = HandRank::new(Category::Pair, vec![14]);
        let padded = HandRank::new(Category::Pair, vec![14, 0, 0]);
        assert_eq!(short, padded);

        let kicker = HandRank::new(Category::Pair, vec![14, 2]);
        assert!(kicker > short);
    }

    #[test]
    fn rank_names() {
        let royal = HandRank::new(Category::StraightFlush, vec![14, 13]);
        assert_eq!(royal.name(), "Royal Flush");

        let sf = HandRank::new(Category::StraightFlush, vec![9, 8]);
        assert_eq!(sf.name(), "Straight Flush");

        let wheel = HandRank::new(Category::StraightFlush, vec![5, 4]);
        assert_eq!(wheel.name(), "Straight Flush");
        assert!(wheel < sf);
    }
}
