// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand evaluation for 3 to 8 cards hands with wild cards.
use ahash::AHashMap;
use thiserror::Error;

use pyramid_cards::{Card, Rank};

use crate::rank::{Category, HandRank};

/// An error evaluating a hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The hand size cannot be evaluated.
    #[error("unsupported hand size {0}")]
    InvalidHandSize(usize),
    /// A 6 to 8 cards hand that is neither an of-a-kind nor a straight flush.
    #[error("a {0} cards hand must be an of-a-kind or a straight flush")]
    UnsupportedLargeHand(usize),
}

/// Evaluates a hand of 3, 5, 6, 7, or 8 cards.
///
/// Wild cards stand for whatever card completes the strongest hand. Hands of
/// 6 to 8 cards only exist as of-a-kinds or straight flushes, anything else
/// is a caller bug and fails with [EvalError::UnsupportedLargeHand].
pub fn evaluate(cards: &[Card]) -> Result<HandRank, EvalError> {
    match cards.len() {
        3 => Ok(eval_three(cards)),
        5 => Ok(eval_five(cards)),
        n @ 6..=8 => eval_large(cards, n),
        n => Err(EvalError::InvalidHandSize(n)),
    }
}

/// Evaluates a possibly incomplete hand.
///
/// Candidate hands of 1, 2, or 4 cards are ranked before kicker completion so
/// they order correctly against complete hands; other sizes go through
/// [evaluate].
pub fn evaluate_partial(cards: &[Card]) -> Result<HandRank, EvalError> {
    match cards.len() {
        1 | 2 | 4 => Ok(eval_incomplete(cards)),
        _ => evaluate(cards),
    }
}

/// Splits a hand into natural cards and a wild count.
fn split_wilds(cards: &[Card]) -> (Vec<Card>, usize) {
    let naturals = cards.iter().copied().filter(|c| !c.is_wild()).collect();
    let wilds = cards.iter().filter(|c| c.is_wild()).count();
    (naturals, wilds)
}

/// Card values grouped by count, ordered by count then value descending.
fn value_counts(cards: &[Card]) -> Vec<(u8, u8)> {
    let mut groups = AHashMap::default();
    for card in cards {
        *groups.entry(card.value()).or_insert(0u8) += 1;
    }

    let mut counts = groups.into_iter().collect::<Vec<_>>();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    counts
}

/// Card values sorted descending, duplicates included.
fn values_desc(cards: &[Card]) -> Vec<u8> {
    let mut values = cards.iter().map(|c| c.value()).collect::<Vec<_>>();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values
}

/// Distinct card values sorted descending.
fn distinct_values(cards: &[Card]) -> Vec<u8> {
    let mut values = values_desc(cards);
    values.dedup();
    values
}

/// Checks that all natural cards share one suit.
fn same_suit(cards: &[Card]) -> bool {
    let mut suits = cards.iter().filter_map(|c| c.suit());
    match suits.next() {
        Some(first) => suits.all(|s| s == first),
        None => false,
    }
}

/// The effective high card of the best `len` straight window covering all
/// the given distinct values with at most `wilds` gaps.
///
/// Windows are tried from ace high down; the ace-low wheel exists for
/// lengths 5 and 6 and its effective high is the highest non-ace value, so a
/// wheel ranks below every other straight of the same length.
fn straight_high(values: &[u8], len: usize, wilds: usize) -> Option<u8> {
    if values.len() + wilds < len {
        return None;
    }

    let len = len as u8;
    for high in (len + 1..=14).rev() {
        let low = high - len + 1;
        if values.iter().all(|&v| v >= low && v <= high) {
            return Some(high);
        }
    }

    if len <= 6 && values.iter().all(|&v| v == 14 || (2..=len).contains(&v)) {
        return Some(len);
    }

    None
}

fn eval_three(cards: &[Card]) -> HandRank {
    let (naturals, wilds) = split_wilds(cards);
    let counts = value_counts(&naturals);
    let (top_value, top_count) = counts.first().copied().unwrap_or((Rank::Ace.value(), 0));

    if top_count as usize + wilds >= 3 {
        HandRank::new(Category::Trips, vec![top_value])
    } else if top_count == 2 {
        let kicker = counts[1].0;
        HandRank::new(Category::Pair, vec![top_value, kicker])
    } else if wilds == 1 {
        // The wild pairs the highest card.
        let values = values_desc(&naturals);
        HandRank::new(Category::Pair, vec![values[0], values[1]])
    } else {
        HandRank::new(Category::HighCard, values_desc(&naturals))
    }
}

fn eval_five(cards: &[Card]) -> HandRank {
    let (naturals, wilds) = split_wilds(cards);
    if wilds == 0 {
        eval_five_natural(&naturals)
    } else {
        eval_five_wilds(&naturals, wilds)
    }
}

fn eval_five_natural(cards: &[Card]) -> HandRank {
    let counts = value_counts(cards);
    let values = values_desc(cards);
    let distinct = distinct_values(cards);
    let flush = same_suit(cards);
    let straight = if distinct.len() == 5 {
        straight_high(&distinct, 5, 0)
    } else {
        None
    };

    let (top_value, top_count) = counts[0];
    match (top_count, straight, flush) {
        (5, _, _) => HandRank::new(Category::FiveOfAKind, vec![top_value]),
        (_, Some(high), true) => HandRank::new(Category::StraightFlush, vec![high, high - 1]),
        (4, _, _) => HandRank::new(Category::Quads, vec![top_value, counts[1].0]),
        (3, _, _) if counts[1].1 == 2 => {
            HandRank::new(Category::FullHouse, vec![top_value, counts[1].0])
        }
        (_, _, true) => HandRank::new(Category::Flush, values),
        (_, Some(high), _) => HandRank::new(Category::Straight, vec![high, high - 1]),
        (3, _, _) => {
            let kickers = values.iter().copied().filter(|&v| v != top_value);
            let mut tiebreaks = vec![top_value];
            tiebreaks.extend(kickers);
            HandRank::new(Category::Trips, tiebreaks)
        }
        (2, _, _) if counts[1].1 == 2 => {
            HandRank::new(Category::TwoPair, vec![top_value, counts[1].0, counts[2].0])
        }
        (2, _, _) => {
            let kickers = values.iter().copied().filter(|&v| v != top_value);
            let mut tiebreaks = vec![top_value];
            tiebreaks.extend(kickers);
            HandRank::new(Category::Pair, tiebreaks)
        }
        _ => HandRank::new(Category::HighCard, values),
    }
}

/// Ranks a 5-card hand with 1 to 4 wilds trying categories strongest first.
fn eval_five_wilds(naturals: &[Card], wilds: usize) -> HandRank {
    if naturals.is_empty() {
        return HandRank::new(Category::FiveOfAKind, vec![Rank::Ace.value()]);
    }

    let counts = value_counts(naturals);
    let values = values_desc(naturals);
    let distinct = distinct_values(naturals);
    let flush = same_suit(naturals);
    let (top_value, top_count) = counts[0];
    let top_count = top_count as usize;

    if top_count + wilds >= 5 {
        return HandRank::new(Category::FiveOfAKind, vec![top_value]);
    }

    if flush && distinct.len() == naturals.len() {
        if let Some(high) = straight_high(&distinct, 5, wilds) {
            return HandRank::new(Category::StraightFlush, vec![high, high - 1]);
        }
    }

    if top_count + wilds >= 4 {
        let kicker = values.iter().copied().find(|&v| v != top_value);
        if let Some(kicker) = kicker {
            return HandRank::new(Category::Quads, vec![top_value, kicker]);
        }
    }

    if top_count >= 2 && counts.len() > 1 && counts[1].1 >= 2 {
        // Two pairs and a wild, the higher pair becomes trips.
        return HandRank::new(Category::FullHouse, vec![top_value, counts[1].0]);
    }

    if flush {
        // Wilds count as aces in a flush.
        let mut flush_values = vec![Rank::Ace.value(); wilds];
        flush_values.extend(values.iter().copied());
        flush_values.sort_unstable_by(|a, b| b.cmp(a));
        flush_values.truncate(5);
        return HandRank::new(Category::Flush, flush_values);
    }

    if distinct.len() == naturals.len() {
        if let Some(high) = straight_high(&distinct, 5, wilds) {
            return HandRank::new(Category::Straight, vec![high, high - 1]);
        }
    }

    if top_count + wilds >= 3 {
        let kickers = values.iter().copied().filter(|&v| v != top_value);
        let mut tiebreaks = vec![top_value];
        tiebreaks.extend(kickers);
        return HandRank::new(Category::Trips, tiebreaks);
    }

    // A single wild always pairs the highest card.
    HandRank::new(Category::Pair, values)
}

fn eval_large(cards: &[Card], size: usize) -> Result<HandRank, EvalError> {
    let (naturals, wilds) = split_wilds(cards);
    let counts = value_counts(&naturals);

    let category = match size {
        6 => (Category::SixOfAKind, Category::StraightFlush6),
        7 => (Category::SevenOfAKind, Category::StraightFlush7),
        _ => (Category::EightOfAKind, Category::StraightFlush8),
    };

    if counts.len() == 1 {
        return Ok(HandRank::new(category.0, vec![counts[0].0]));
    }

    let distinct = distinct_values(&naturals);
    if same_suit(&naturals) && distinct.len() == naturals.len() {
        if let Some(high) = straight_high(&distinct, size, wilds) {
            return Ok(HandRank::new(category.1, vec![high, high - 1]));
        }
    }

    Err(EvalError::UnsupportedLargeHand(size))
}

/// Ranks an incomplete candidate of 1, 2, or 4 cards.
fn eval_incomplete(cards: &[Card]) -> HandRank {
    let counts = value_counts(cards);
    let values = values_desc(cards);

    match cards.len() {
        1 => HandRank::new(Category::HighCard, values),
        2 if counts[0].1 == 2 => HandRank::new(Category::Pair, vec![counts[0].0]),
        2 => HandRank::new(Category::HighCard, values),
        _ => match (counts[0].1, counts.get(1).map(|c| c.1).unwrap_or(0)) {
            (4, _) => HandRank::new(Category::Quads, vec![counts[0].0]),
            (3, _) => HandRank::new(Category::Trips, vec![counts[0].0, counts[1].0]),
            (2, 2) => HandRank::new(Category::TwoPair, vec![counts[0].0, counts[1].0]),
            (2, _) => {
                let kickers = values.iter().copied().filter(|&v| v != counts[0].0);
                let mut tiebreaks = vec![counts[0].0];
                tiebreaks.extend(kickers);
                HandRank::new(Category::Pair, tiebreaks)
            }
            _ => HandRank::new(Category::HighCard, values),
        },
    }
}
