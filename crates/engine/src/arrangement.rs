// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Arrangement model and invariants.
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use pyramid_cards::Card;
use pyramid_eval::{Category, EvalError, HandRank, evaluate};

/// One of the three hands of an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// The 3 or 5 cards front hand.
    Front,
    /// The 5 to 7 cards middle hand.
    Middle,
    /// The 5 to 8 cards back hand.
    Back,
}

impl Position {
    /// Returns all positions, front first.
    pub fn positions() -> impl DoubleEndedIterator<Item = Position> {
        [Position::Front, Position::Middle, Position::Back].into_iter()
    }

    /// The largest hand this position can hold.
    pub fn max_len(&self) -> usize {
        match self {
            Position::Front => 5,
            Position::Middle => 7,
            Position::Back => 8,
        }
    }

    /// The hand size kicker completion fills up to.
    pub fn target_len(&self) -> usize {
        match self {
            Position::Front => 3,
            Position::Middle => 5,
            Position::Back => 5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::Front => "front",
            Position::Middle => "middle",
            Position::Back => "back",
        };
        write!(f, "{name}")
    }
}

/// A hand with its evaluated rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedHand {
    cards: Vec<Card>,
    rank: HandRank,
}

impl RankedHand {
    /// Creates a hand from cards and a known rank.
    pub fn new(cards: Vec<Card>, rank: HandRank) -> Self {
        Self { cards, rank }
    }

    /// Creates a hand evaluating its cards.
    pub fn evaluated(cards: Vec<Card>) -> Result<Self, EvalError> {
        let rank = evaluate(&cards)?;
        Ok(Self { cards, rank })
    }

    /// The hand cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The hand rank.
    pub fn rank(&self) -> &HandRank {
        &self.rank
    }

    /// Number of cards in the hand.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks if the hand has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for RankedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.rank.name())?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}

/// An invalid arrangement error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangementError {
    /// A hand has a size its position does not allow.
    #[error("{position} hand cannot have {len} cards")]
    WrongHandSize {
        /// The offending position.
        position: Position,
        /// The hand size.
        len: usize,
    },
    /// A 5-card front hand below a straight.
    #[error("a 5 cards front hand must be a straight or better")]
    WeakFrontHand,
    /// The hands are not back >= middle >= front.
    #[error("the {0} hand outranks the hand behind it")]
    OutOfOrder(Position),
    /// A card appears in more than one hand.
    #[error("card id {0} is used twice")]
    DuplicateCard(u8),
    /// A card does not come from the player pool.
    #[error("card id {0} is not in the pool")]
    CardNotInPool(u8),
}

/// A complete three-hand arrangement with its unused staging cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    back: RankedHand,
    middle: RankedHand,
    front: RankedHand,
    staging: Vec<Card>,
}

impl Arrangement {
    /// Creates an arrangement from its hands and staging cards.
    pub fn new(back: RankedHand, middle: RankedHand, front: RankedHand, staging: Vec<Card>) -> Self {
        Self {
            back,
            middle,
            front,
            staging,
        }
    }

    /// The hand at the given position.
    pub fn hand(&self, position: Position) -> &RankedHand {
        match position {
            Position::Front => &self.front,
            Position::Middle => &self.middle,
            Position::Back => &self.back,
        }
    }

    /// The back hand.
    pub fn back(&self) -> &RankedHand {
        &self.back
    }

    /// The middle hand.
    pub fn middle(&self) -> &RankedHand {
        &self.middle
    }

    /// The front hand.
    pub fn front(&self) -> &RankedHand {
        &self.front
    }

    /// The cards not used by any hand.
    pub fn staging(&self) -> &[Card] {
        &self.staging
    }

    /// Checks the arrangement invariants against its source pool.
    ///
    /// Hands must have legal sizes for their positions, a 5-card front must
    /// be a straight or better, hands must not share cards, every card must
    /// come from the pool, and the hands must satisfy back >= middle >= front.
    pub fn validate(&self, pool: &[Card]) -> Result<(), ArrangementError> {
        if !matches!(self.front.len(), 3 | 5) {
            return Err(ArrangementError::WrongHandSize {
                position: Position::Front,
                len: self.front.len(),
            });
        }
        if self.front.len() == 5 && self.front.rank().category() < Category::Straight {
            return Err(ArrangementError::WeakFrontHand);
        }
        if !(5..=7).contains(&self.middle.len()) {
            return Err(ArrangementError::WrongHandSize {
                position: Position::Middle,
                len: self.middle.len(),
            });
        }
        if !(5..=8).contains(&self.back.len()) {
            return Err(ArrangementError::WrongHandSize {
                position: Position::Back,
                len: self.back.len(),
            });
        }

        if self.middle.rank() > self.back.rank() {
            return Err(ArrangementError::OutOfOrder(Position::Middle));
        }
        if self.front.rank() > self.middle.rank() {
            return Err(ArrangementError::OutOfOrder(Position::Front));
        }

        let pool_ids = pool.iter().map(|c| c.id()).collect::<AHashSet<_>>();
        let mut seen = AHashSet::default();
        let cards = self
            .back
            .cards()
            .iter()
            .chain(self.middle.cards())
            .chain(self.front.cards())
            .chain(self.staging.iter());

        for card in cards {
            if !pool_ids.contains(&card.id()) {
                return Err(ArrangementError::CardNotInPool(card.id()));
            }
            if !seen.insert(card.id()) {
                return Err(ArrangementError::DuplicateCard(card.id()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "back:   {}", self.back)?;
        writeln!(f, "middle: {}", self.middle)?;
        write!(f, "front:  {}", self.front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyramid_cards::parse_hand;

    fn hand(codes: &str, ids: &[u8]) -> RankedHand {
        let mut cards = parse_hand(codes).unwrap();
        for (card, id) in cards.iter_mut().zip(ids) {
            *card = renumber(*card, *id);
        }
        RankedHand::evaluated(cards).unwrap()
    }

    fn renumber(card: Card, id: u8) -> Card {
        match (card.rank(), card.suit()) {
            (Some(rank), Some(suit)) => Card::new(id, rank, suit),
            _ => Card::wild(id),
        }
    }

    fn pool_17() -> Vec<Card> {
        parse_hand("9S 9H 9D KC KD 8S 7S 6S 5S 4S AH QH JH TH 2C 3C 2D").unwrap()
    }

    #[test]
    fn validate_accepts_legal_arrangement() {
        let pool = pool_17();
        // 9S 9H 9D KC KD full house back, 8S..4S straight flush? No, the
        // back must outrank the middle so give the straight flush the back.
        let back = hand("8S 7S 6S 5S 4S", &[5, 6, 7, 8, 9]);
        let middle = hand("9S 9H 9D KC KD", &[0, 1, 2, 3, 4]);
        let front = hand("AH QH JH", &[10, 11, 12]);
        let staging = vec![pool[13], pool[14], pool[15], pool[16]];

        let arrangement = Arrangement::new(back, middle, front, staging);
        assert_eq!(arrangement.validate(&pool), Ok(()));
    }

    #[test]
    fn validate_rejects_out_of_order() {
        let pool = pool_17();
        let back = hand("9S 9H 9D KC KD", &[0, 1, 2, 3, 4]);
        let middle = hand("8S 7S 6S 5S 4S", &[5, 6, 7, 8, 9]);
        let front = hand("AH QH JH", &[10, 11, 12]);
        let staging = vec![pool[13], pool[14], pool[15], pool[16]];

        let arrangement = Arrangement::new(back, middle, front, staging);
        assert_eq!(
            arrangement.validate(&pool),
            Err(ArrangementError::OutOfOrder(Position::Middle))
        );
    }

    #[test]
    fn validate_rejects_shared_cards() {
        let pool = pool_17();
        let back = hand("8S 7S 6S 5S 4S", &[5, 6, 7, 8, 9]);
        let middle = hand("9S 9H 9D KC KD", &[0, 1, 2, 3, 4]);
        // Front reuses the 9S.
        let front = hand("AH QH 9S", &[10, 11, 0]);
        let staging = vec![pool[13], pool[14], pool[15], pool[16]];

        let arrangement = Arrangement::new(back, middle, front, staging);
        assert_eq!(
            arrangement.validate(&pool),
            Err(ArrangementError::DuplicateCard(0))
        );
    }

    #[test]
    fn validate_rejects_weak_five_card_front() {
        let pool = pool_17();
        let back = hand("8S 7S 6S 5S 4S", &[5, 6, 7, 8, 9]);
        let middle = hand("9S 9H 9D KC KD", &[0, 1, 2, 3, 4]);
        // A pair is not allowed as a 5-card front.
        let front = hand("2C 2D AH QH JH", &[14, 16, 10, 11, 12]);
        let staging = vec![pool[13], pool[15]];

        let arrangement = Arrangement::new(back, middle, front, staging);
        assert_eq!(
            arrangement.validate(&pool),
            Err(ArrangementError::WeakFrontHand)
        );
    }
}
