// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Wild card solvers.
//!
//! Pools with one or two wilds go through a [WildSolver]; the specialized
//! exhaustive solvers are external, [SubstitutionSolver] is an exact but
//! slow reference implementation that tries every natural stand-in. Pools
//! with three or four wilds reuse the two-wild result and [enhance] one
//! position with the extra wilds.
use pyramid_cards::{Card, Rank, Suit};
use pyramid_eval::evaluate;

use crate::arrangement::{Arrangement, Position, RankedHand};
use crate::score::{ScoreStrategy, Scoring};
use crate::search::{SearchConfig, SearchStats};
use crate::setup::{EngineError, arrangement_score, solve_naturals};

/// A solved pool.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The completed arrangement.
    pub arrangement: Arrangement,
    /// The arrangement expected score.
    pub score: f64,
    /// The statistics of the search that found it.
    pub search: SearchStats,
}

/// Solves pools that contain wild cards.
pub trait WildSolver {
    /// Arranges a pool with at most two wild cards.
    fn arrange(
        &self,
        pool: &[Card],
        scoring: &Scoring,
        config: &SearchConfig,
    ) -> Result<Solution, EngineError>;
}

/// A reference solver that tries every natural stand-in for the wilds.
///
/// Exact but slow, one no-wild solve per stand-in choice; production tables
/// plug real solvers through [WildSolver].
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstitutionSolver;

impl WildSolver for SubstitutionSolver {
    fn arrange(
        &self,
        pool: &[Card],
        scoring: &Scoring,
        config: &SearchConfig,
    ) -> Result<Solution, EngineError> {
        let wild_ids = pool
            .iter()
            .filter(|c| c.is_wild())
            .map(|c| c.id())
            .collect::<Vec<_>>();
        let naturals = pool
            .iter()
            .copied()
            .filter(|c| !c.is_wild())
            .collect::<Vec<_>>();

        match wild_ids.as_slice() {
            [] => solve_naturals(pool, scoring, config),
            [wild] => {
                let mut best: Option<Solution> = None;
                for (rank, suit) in stand_ins() {
                    let mut resolved = naturals.clone();
                    resolved.push(Card::new(*wild, rank, suit));
                    track_best(&mut best, solve_naturals(&resolved, scoring, config));
                }

                let solution = best.ok_or(EngineError::NoArrangement)?;
                log::debug!("one wild solved, best {:.3}", solution.score);
                Ok(restore_wilds(solution, &wild_ids, scoring))
            }
            [first, second] => {
                let cards = stand_ins().collect::<Vec<_>>();
                let mut best: Option<Solution> = None;
                for (i, &(r1, s1)) in cards.iter().enumerate() {
                    for &(r2, s2) in &cards[i..] {
                        let mut resolved = naturals.clone();
                        resolved.push(Card::new(*first, r1, s1));
                        resolved.push(Card::new(*second, r2, s2));
                        track_best(&mut best, solve_naturals(&resolved, scoring, config));
                    }
                }

                let solution = best.ok_or(EngineError::NoArrangement)?;
                log::debug!("two wilds solved, best {:.3}", solution.score);
                Ok(restore_wilds(solution, &wild_ids, scoring))
            }
            wilds => Err(EngineError::TooManyWilds(wilds.len())),
        }
    }
}

/// Every rank and suit a wild can stand in for.
fn stand_ins() -> impl Iterator<Item = (Rank, Suit)> {
    Suit::suits().flat_map(|suit| Rank::ranks().map(move |rank| (rank, suit)))
}

fn track_best(best: &mut Option<Solution>, solution: Result<Solution, EngineError>) {
    if let Ok(solution) = solution {
        if best.as_ref().is_none_or(|b| solution.score > b.score) {
            *best = Some(solution);
        }
    }
}

/// Puts the wild cards back in place of their stand-ins, ranks are kept as
/// the stand-ins computed them.
fn restore_wilds(solution: Solution, wild_ids: &[u8], scoring: &Scoring) -> Solution {
    let restore_hand = |hand: &RankedHand| {
        let cards = hand
            .cards()
            .iter()
            .map(|&c| restore_card(c, wild_ids))
            .collect();
        RankedHand::new(cards, hand.rank().clone())
    };

    let arrangement = Arrangement::new(
        restore_hand(solution.arrangement.back()),
        restore_hand(solution.arrangement.middle()),
        restore_hand(solution.arrangement.front()),
        solution
            .arrangement
            .staging()
            .iter()
            .map(|&c| restore_card(c, wild_ids))
            .collect(),
    );

    let score = arrangement_score(&arrangement, scoring);
    Solution {
        arrangement,
        score,
        search: solution.search,
    }
}

fn restore_card(card: Card, wild_ids: &[u8]) -> Card {
    if wild_ids.contains(&card.id()) {
        Card::wild(card.id())
    } else {
        card
    }
}

/// Enhances a solved arrangement with extra wild cards.
///
/// Each wild may extend the back or middle hand when it is an of-a-kind or
/// a straight flush, within the position size caps and never beyond 8 cards;
/// quads swap their kicker for the wild to become five of a kind. Wilds are
/// placed one at a time, each on its best-gaining position, so two wilds may
/// end up extending different positions. Wilds that improve nothing go to
/// staging.
pub fn enhance(solution: Solution, extras: &[Card], scoring: &Scoring) -> Solution {
    let mut arrangement = solution.arrangement;
    let mut staging = arrangement.staging().to_vec();

    for &wild in extras {
        match best_extension(&arrangement, wild, scoring) {
            Some((position, hand, displaced)) => {
                staging.extend(displaced);
                arrangement = replace_hand(&arrangement, position, hand, staging.clone());
            }
            None => staging.push(wild),
        }
    }

    arrangement = Arrangement::new(
        arrangement.back().clone(),
        arrangement.middle().clone(),
        arrangement.front().clone(),
        staging,
    );

    let score = arrangement_score(&arrangement, scoring);
    Solution {
        arrangement,
        score,
        search: solution.search,
    }
}

/// The best single-position extension for a wild, if any improves the score.
fn best_extension(
    arrangement: &Arrangement,
    wild: Card,
    scoring: &Scoring,
) -> Option<(Position, RankedHand, Option<Card>)> {
    let mut best: Option<(Position, RankedHand, Option<Card>, f64)> = None;

    for position in [Position::Back, Position::Middle] {
        let hand = arrangement.hand(position);
        let Some((cards, displaced)) = extend_cards(hand, position, wild) else {
            continue;
        };
        let Ok(rank) = evaluate(&cards) else {
            continue;
        };

        // An enhanced middle must not outrank the back.
        if position == Position::Middle && rank > *arrangement.back().rank() {
            continue;
        }

        let gain = scoring.expected(&rank, position) - scoring.expected(hand.rank(), position);
        if gain > 0.0 && best.as_ref().is_none_or(|b| gain > b.3) {
            best = Some((position, RankedHand::new(cards, rank), displaced, gain));
        }
    }

    best.map(|(position, hand, displaced, _)| (position, hand, displaced))
}

/// The extended cards for a hand and the displaced kicker, if any.
fn extend_cards(
    hand: &RankedHand,
    position: Position,
    wild: Card,
) -> Option<(Vec<Card>, Option<Card>)> {
    let category = hand.rank().category();

    if let Some(size) = category.of_a_kind_size() {
        if size == 4 {
            // Quads swap their kicker for the wild and become five of a kind.
            let modal = hand.rank().tiebreaks()[0];
            let (mut cards, displaced): (Vec<_>, Vec<_>) = hand
                .cards()
                .iter()
                .copied()
                .partition(|c| c.value() == modal || c.is_wild());
            cards.push(wild);
            return Some((cards, displaced.into_iter().next()));
        }

        if size >= 5 && hand.len() < position.max_len() && hand.len() < 8 {
            let mut cards = hand.cards().to_vec();
            cards.push(wild);
            return Some((cards, None));
        }

        return None;
    }

    if category.straight_flush_len().is_some() && hand.len() < position.max_len() {
        let mut cards = hand.cards().to_vec();
        cards.push(wild);
        return Some((cards, None));
    }

    None
}

fn replace_hand(
    arrangement: &Arrangement,
    position: Position,
    hand: RankedHand,
    staging: Vec<Card>,
) -> Arrangement {
    let mut back = arrangement.back().clone();
    let mut middle = arrangement.middle().clone();
    let mut front = arrangement.front().clone();
    match position {
        Position::Back => back = hand,
        Position::Middle => middle = hand,
        Position::Front => front = hand,
    }
    Arrangement::new(back, middle, front, staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchStats;
    use pyramid_cards::parse_hand;
    use pyramid_eval::Category;
    use std::time::Duration;

    fn stats() -> SearchStats {
        SearchStats {
            explored_nodes: 0,
            pruned_nodes: 0,
            elapsed: Duration::ZERO,
            efficiency: 0.0,
        }
    }

    fn solution(back: &str, middle: &str, front: &str, staging: &str) -> Solution {
        let mut id = 0u8;
        let mut hand = |codes: &str| {
            let cards = parse_hand(codes)
                .unwrap()
                .into_iter()
                .map(|c| {
                    let card = match (c.rank(), c.suit()) {
                        (Some(rank), Some(suit)) => Card::new(id, rank, suit),
                        _ => Card::wild(id),
                    };
                    id += 1;
                    card
                })
                .collect::<Vec<_>>();
            cards
        };

        let back = RankedHand::evaluated(hand(back)).unwrap();
        let middle = RankedHand::evaluated(hand(middle)).unwrap();
        let front = RankedHand::evaluated(hand(front)).unwrap();
        let staging = hand(staging);

        let scoring = Scoring::new();
        let arrangement = Arrangement::new(back, middle, front, staging);
        let score = arrangement_score(&arrangement, &scoring);
        Solution {
            arrangement,
            score,
            search: stats(),
        }
    }

    #[test]
    fn enhance_extends_of_a_kind() {
        // Five of a kind back grows to seven of a kind with two wilds.
        let solution = solution(
            "9S 9H 9D 9C 9S",
            "KS KH KD 2C 2D",
            "QS QH QD",
            "8C 7C 6C 5D",
        );
        let wilds = vec![Card::wild(100), Card::wild(101)];

        let scoring = Scoring::new();
        let enhanced = enhance(solution, &wilds, &scoring);

        let back = enhanced.arrangement.back();
        assert_eq!(back.rank().category(), Category::SevenOfAKind);
        assert_eq!(back.len(), 7);
        assert_eq!(enhanced.arrangement.staging().len(), 4);
    }

    #[test]
    fn enhance_swaps_quads_kicker() {
        let solution = solution(
            "9S 9H 9D 9C KD",
            "QS QH QD 2C 2D",
            "JS JH JD",
            "8C 7C 6C 5D",
        );
        let wilds = vec![Card::wild(100)];

        let scoring = Scoring::new();
        let enhanced = enhance(solution, &wilds, &scoring);

        let back = enhanced.arrangement.back();
        assert_eq!(back.rank().category(), Category::FiveOfAKind);
        assert_eq!(back.len(), 5);

        // The displaced king moved to staging.
        assert_eq!(enhanced.arrangement.staging().len(), 5);
        assert!(
            enhanced
                .arrangement
                .staging()
                .iter()
                .any(|c| c.value() == 13)
        );
    }

    #[test]
    fn enhance_places_each_wild_on_its_best_position() {
        // The first wild takes the middle to seven of a kind, hitting the
        // middle size cap; the second falls back to the back hand.
        let solution = solution(
            "9S 9H 9D 9C 9S 9H 9D",
            "8S 8H 8D 8C 8S 8H",
            "7S 7H 7D",
            "2C",
        );
        let wilds = vec![Card::wild(100), Card::wild(101)];

        let scoring = Scoring::new();
        let enhanced = enhance(solution, &wilds, &scoring);

        assert_eq!(
            enhanced.arrangement.middle().rank().category(),
            Category::SevenOfAKind
        );
        assert_eq!(
            enhanced.arrangement.back().rank().category(),
            Category::EightOfAKind
        );
        assert_eq!(enhanced.arrangement.staging().len(), 1);
    }

    #[test]
    fn enhance_respects_position_caps() {
        // A straight flush back grows within its cap, a hand with no
        // extension sends the wild to staging.
        let solution = solution(
            "9S 8S 7S 6S 5S",
            "AS AH QD JC 9D",
            "2S 2H 3D",
            "8C 7C 6C 5D",
        );
        let wilds = vec![Card::wild(100)];

        let scoring = Scoring::new();
        let enhanced = enhance(solution, &wilds, &scoring);

        // The straight flush back grows to six cards.
        assert_eq!(
            enhanced.arrangement.back().rank().category(),
            Category::StraightFlush6
        );

        let solution = self::solution(
            "AS AH KD KC 2S",
            "QS QH JD JC 9D",
            "2H 3C 4D",
            "8C 7C 6C 5D",
        );
        let enhanced = enhance(solution, &wilds, &scoring);
        // Two pair hands have no extension, the wild stays in staging.
        assert_eq!(enhanced.arrangement.staging().len(), 5);
        assert!(enhanced.arrangement.staging().iter().any(|c| c.is_wild()));
    }

    #[test]
    fn substitution_solver_restores_wilds() {
        // A sparse pool keeps the per-substitution searches small.
        let mut pool =
            parse_hand("2S 2H 4S 4H 6S 6H 8S 8H TS TH QS QH AS AH 7C 9C").unwrap();
        pool.push(Card::wild(16));
        assert_eq!(pool.len(), 17);

        let scoring = Scoring::new();
        let config = SearchConfig::default();
        let solution = SubstitutionSolver
            .arrange(&pool, &scoring, &config)
            .unwrap();

        // The wild is somewhere in the arrangement, never a stand-in.
        let all_cards = solution
            .arrangement
            .back()
            .cards()
            .iter()
            .chain(solution.arrangement.middle().cards())
            .chain(solution.arrangement.front().cards())
            .chain(solution.arrangement.staging())
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(all_cards.len(), 17);
        assert_eq!(all_cards.iter().filter(|c| c.is_wild()).count(), 1);
        assert!(all_cards.iter().any(|c| c.id() == 16 && c.is_wild()));

        // A wild can only improve on the natural pairs arrangement.
        let naturals = parse_hand("2S 2H 4S 4H 6S 6H 8S 8H TS TH QS QH AS AH 7C 9C 3D").unwrap();
        let base = solve_naturals(&naturals, &scoring, &config).unwrap();
        assert!(solution.score >= base.score);
    }
}
