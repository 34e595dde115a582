// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cards and multi-deck pools definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 2,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The numeric value used for tiebreaks, deuce is 2 and ace is 14.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Parses a rank from its display character.
    pub fn from_char(c: char) -> Option<Rank> {
        let rank = match c.to_ascii_uppercase() {
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        };
        Some(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 1,
    /// Diamonds suit.
    Diamonds = 2,
    /// Hearts suit.
    Hearts = 3,
    /// Spades suit.
    Spades = 4,
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }

    /// Parses a suit from its display character.
    pub fn from_char(c: char) -> Option<Suit> {
        let suit = match c.to_ascii_uppercase() {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            _ => return None,
        };
        Some(suit)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

/// A Pyramid Poker card.
///
/// Cards come from up to three combined standard decks plus wild cards, so
/// rank and suit do not identify a card; the id does. Two cards with equal
/// rank and suit but different ids are distinct physical cards.
///
/// A wild card has no rank or suit, it stands for whatever card completes the
/// best hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: u8,
    face: Option<(Rank, Suit)>,
}

impl Card {
    /// Creates a natural card with the given pool id.
    pub fn new(id: u8, rank: Rank, suit: Suit) -> Card {
        Self {
            id,
            face: Some((rank, suit)),
        }
    }

    /// Creates a wild card with the given pool id.
    pub fn wild(id: u8) -> Card {
        Self { id, face: None }
    }

    /// This card unique id within its pool.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Returns the card rank, `None` for a wild card.
    pub fn rank(&self) -> Option<Rank> {
        self.face.map(|(rank, _)| rank)
    }

    /// Returns the card suit, `None` for a wild card.
    pub fn suit(&self) -> Option<Suit> {
        self.face.map(|(_, suit)| suit)
    }

    /// Checks if this card is wild.
    pub fn is_wild(&self) -> bool {
        self.face.is_none()
    }

    /// The card value, 2 to 14 for naturals; wild cards sort ahead of aces.
    pub fn value(&self) -> u8 {
        match self.face {
            Some((rank, _)) => rank.value(),
            None => Rank::Ace.value() + 1,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.face {
            Some((rank, suit)) => write!(f, "{rank}{suit}"),
            None => write!(f, "??"),
        }
    }
}

/// An error parsing a card code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    /// The code is not two characters.
    #[error("invalid card code {0:?}")]
    InvalidCode(String),
    /// The rank character is unknown.
    #[error("invalid rank {0:?}")]
    InvalidRank(char),
    /// The suit character is unknown.
    #[error("invalid suit {0:?}")]
    InvalidSuit(char),
}

/// Parses a whitespace separated list of card codes.
///
/// Codes are rank then suit (`AS`, `TD`, `9h`), wild cards are `??`; ids are
/// assigned from position in the list.
///
/// ```
/// # use pyramid_cards::{parse_hand, Rank, Suit};
/// let cards = parse_hand("AS td ??").unwrap();
/// assert_eq!(cards[0].rank(), Some(Rank::Ace));
/// assert_eq!(cards[1].suit(), Some(Suit::Diamonds));
/// assert!(cards[2].is_wild());
/// ```
pub fn parse_hand(s: &str) -> Result<Vec<Card>, ParseCardError> {
    s.split_whitespace()
        .enumerate()
        .map(|(id, code)| parse_card(id as u8, code))
        .collect()
}

fn parse_card(id: u8, code: &str) -> Result<Card, ParseCardError> {
    if code == "??" {
        return Ok(Card::wild(id));
    }

    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(r), Some(s), None) => {
            let rank = Rank::from_char(r).ok_or(ParseCardError::InvalidRank(r))?;
            let suit = Suit::from_char(s).ok_or(ParseCardError::InvalidSuit(s))?;
            Ok(Card::new(id, rank, suit))
        }
        _ => Err(ParseCardError::InvalidCode(code.to_string())),
    }
}

/// A combined deck of one or more standard decks plus wild cards.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in a standard deck.
    pub const SIZE: usize = 52;

    /// The number of cards dealt to a player.
    pub const POOL_SIZE: usize = 17;

    /// Creates a deck from `decks` standard decks and `wilds` wild cards.
    ///
    /// Panics if decks is not 1 to 3 or wilds is not 0 to 4.
    pub fn new(decks: usize, wilds: usize) -> Self {
        assert!((1..=3).contains(&decks), "1 <= decks <= 3");
        assert!(wilds <= 4, "wilds <= 4");

        let mut cards = Vec::with_capacity(decks * Self::SIZE + wilds);
        let mut id = 0u8;
        for _ in 0..decks {
            for suit in Suit::suits() {
                for rank in Rank::ranks() {
                    cards.push(Card::new(id, rank, suit));
                    id += 1;
                }
            }
        }

        for _ in 0..wilds {
            cards.push(Card::wild(id));
            id += 1;
        }

        Self { cards }
    }

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R, decks: usize, wilds: usize) -> Self {
        let mut deck = Self::new(decks, wilds);
        deck.shuffle(rng);
        deck
    }

    /// Shuffles the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals a card from the deck.
    pub fn deal(&mut self) -> Card {
        self.cards.pop().unwrap()
    }

    /// Deals a 17-card player pool.
    ///
    /// Panics if the deck has fewer than 17 cards left.
    pub fn deal_pool(&mut self) -> Vec<Card> {
        assert!(self.cards.len() >= Self::POOL_SIZE, "not enough cards");
        (0..Self::POOL_SIZE).map(|_| self.deal()).collect()
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;

    #[test]
    fn card_identity() {
        let a1 = Card::new(0, Rank::Ace, Suit::Spades);
        let a2 = Card::new(1, Rank::Ace, Suit::Spades);
        assert_ne!(a1, a2);
        assert_eq!(a1.rank(), a2.rank());
        assert_eq!(a1.suit(), a2.suit());

        let wild = Card::wild(2);
        assert!(wild.is_wild());
        assert_eq!(wild.rank(), None);
        assert_eq!(wild.suit(), None);
        assert!(wild.value() > Rank::Ace.value());
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(0, Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "KD");

        let c = Card::new(1, Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5S");

        let c = Card::new(2, Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "TH");

        let c = Card::wild(3);
        assert_eq!(c.to_string(), "??");
    }

    #[test]
    fn parse_hand_codes() {
        let cards = parse_hand("AS kd ?? Th 2c").unwrap();
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].to_string(), "AS");
        assert_eq!(cards[1].to_string(), "KD");
        assert_eq!(cards[2].to_string(), "??");
        assert_eq!(cards[3].to_string(), "TH");
        assert_eq!(cards[4].to_string(), "2C");

        let ids = cards.iter().map(|c| c.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        assert_eq!(
            parse_hand("1S"),
            Err(ParseCardError::InvalidRank('1'))
        );
        assert_eq!(
            parse_hand("AX"),
            Err(ParseCardError::InvalidSuit('X'))
        );
        assert_eq!(
            parse_hand("AST"),
            Err(ParseCardError::InvalidCode("AST".to_string()))
        );
    }

    #[test]
    fn deck_composition() {
        let deck = Deck::new(2, 2);
        assert_eq!(deck.count(), 2 * Deck::SIZE + 2);

        let cards = deck.into_iter().collect::<Vec<_>>();
        let ids = cards.iter().map(|c| c.id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), cards.len());
        assert_eq!(cards.iter().filter(|c| c.is_wild()).count(), 2);

        // Every rank and suit pair appears once per deck.
        let aces = cards
            .iter()
            .filter(|c| c.rank() == Some(Rank::Ace) && c.suit() == Some(Suit::Spades))
            .count();
        assert_eq!(aces, 2);

        let deck = Deck::new(1, 0);
        assert_eq!(deck.count(), Deck::SIZE);
    }

    #[test]
    fn deck_deal_pool() {
        let mut deck = Deck::new_and_shuffled(&mut rand::rng(), 2, 2);
        let pool = deck.deal_pool();
        assert_eq!(pool.len(), Deck::POOL_SIZE);
        assert_eq!(deck.count(), 2 * Deck::SIZE + 2 - Deck::POOL_SIZE);

        let ids = pool.iter().map(|c| c.id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), Deck::POOL_SIZE);
    }
}
