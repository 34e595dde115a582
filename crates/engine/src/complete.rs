// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Kicker completion of a searched triple.
use ahash::AHashSet;

use pyramid_cards::Card;
use pyramid_eval::{EvalError, evaluate};

use crate::arrangement::{Arrangement, Position, RankedHand};
use crate::candidates::Candidate;

/// Completes a searched triple into a full arrangement.
///
/// Undersized hands are padded with the strongest unused cards, the back
/// first up to 5 cards, then the middle to 5, then the front to 3 (a 4-card
/// quads front fills to 5); padded hands are re-evaluated, untouched hands
/// keep their ranks. Leftover cards go to staging. Completing already
/// full-sized hands changes nothing.
///
/// Panics if the pool cannot fill every hand to its target; the search only
/// returns triples that can.
pub fn complete(
    pool: &[Card],
    back: &Candidate,
    middle: &Candidate,
    front: &Candidate,
) -> Result<Arrangement, EvalError> {
    let used = back
        .cards()
        .iter()
        .chain(middle.cards())
        .chain(front.cards())
        .map(|c| c.id())
        .collect::<AHashSet<_>>();

    let mut unused = pool
        .iter()
        .copied()
        .filter(|c| !used.contains(&c.id()))
        .collect::<Vec<_>>();
    unused.sort_by(|a, b| b.value().cmp(&a.value()));

    let mut kickers = unused.into_iter();
    let mut fill = |candidate: &Candidate, position: Position| -> Result<RankedHand, EvalError> {
        let mut cards = candidate.cards().to_vec();
        let target = if position == Position::Front && cards.len() == 4 {
            5
        } else {
            position.target_len()
        };
        while cards.len() < target {
            // The pool always has enough cards to fill 5/5/3.
            cards.push(kickers.next().unwrap());
        }

        if cards.len() == candidate.len() {
            Ok(RankedHand::new(cards, candidate.rank().clone()))
        } else {
            let rank = evaluate(&cards)?;
            Ok(RankedHand::new(cards, rank))
        }
    };

    let back = fill(back, Position::Back)?;
    let middle = fill(middle, Position::Middle)?;
    let front = fill(front, Position::Front)?;
    let staging = kickers.collect();

    Ok(Arrangement::new(back, middle, front, staging))
}
