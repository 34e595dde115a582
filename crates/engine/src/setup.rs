// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine setup and pool dispatching.
use ahash::AHashSet;
use std::time::{Duration, Instant};
use thiserror::Error;

use pyramid_cards::{Card, Deck};
use pyramid_eval::EvalError;

use crate::arrangement::{Arrangement, ArrangementError, Position};
use crate::candidates::Candidates;
use crate::complete::complete;
use crate::score::{ScoreStrategy, Scoring};
use crate::search::{Search, SearchConfig, SearchStats};
use crate::wilds::{Solution, SubstitutionSolver, WildSolver, enhance};

/// An arrangement engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The pool is not 17 cards.
    #[error("a pool must have 17 cards, got {0}")]
    InvalidPoolSize(usize),
    /// Two pool cards share an identity.
    #[error("duplicate card id {0} in pool")]
    DuplicateCardId(u8),
    /// More wilds than the engine supports.
    #[error("at most 4 wild cards are supported, got {0}")]
    TooManyWilds(usize),
    /// The search found no legal triple.
    #[error("no valid arrangement found")]
    NoArrangement,
    /// A hand could not be evaluated.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// The produced arrangement broke an invariant.
    #[error(transparent)]
    Arrangement(#[from] ArrangementError),
}

/// Statistics of a single arrange call.
#[derive(Debug, Clone, Copy)]
pub struct ArrangeStats {
    /// Number of wilds in the pool.
    pub wild_count: usize,
    /// Total dispatch time, search and completion included.
    pub dispatch_time: Duration,
    /// The statistics of the search behind the arrangement.
    pub search: SearchStats,
}

/// A scored arrangement with its statistics.
#[derive(Debug, Clone)]
pub struct Arranged {
    /// The completed arrangement.
    pub arrangement: Arrangement,
    /// The arrangement expected score.
    pub score: f64,
    /// The arrange call statistics.
    pub stats: ArrangeStats,
}

/// Counters of the pools dispatched by an engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchStats {
    /// Total arrange calls that passed validation.
    pub total_calls: u64,
    /// Calls by number of wilds in the pool.
    pub by_wild_count: [u64; 5],
}

/// Arranges 17-card pools into scored pyramids.
///
/// Pools without wilds go straight to candidate search; one and two wild
/// pools go through the configured [WildSolver]; three and four wild pools
/// are solved with two wilds and enhanced with the rest.
pub struct Engine {
    scoring: Scoring,
    config: SearchConfig,
    solver: Box<dyn WildSolver>,
    stats: DispatchStats,
}

impl Engine {
    /// Creates an engine with default scoring and the substitution solver.
    pub fn new() -> Self {
        Self {
            scoring: Scoring::new(),
            config: SearchConfig::default(),
            solver: Box::new(SubstitutionSolver),
            stats: DispatchStats::default(),
        }
    }

    /// Replaces the scoring model.
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the wild card solver.
    pub fn with_solver(mut self, solver: Box<dyn WildSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Arranges a 17-card pool.
    pub fn arrange(&mut self, pool: &[Card]) -> Result<Arranged, EngineError> {
        let started = Instant::now();

        if pool.len() != Deck::POOL_SIZE {
            return Err(EngineError::InvalidPoolSize(pool.len()));
        }

        let mut seen = AHashSet::default();
        for card in pool {
            if !seen.insert(card.id()) {
                return Err(EngineError::DuplicateCardId(card.id()));
            }
        }

        let wild_count = pool.iter().filter(|c| c.is_wild()).count();
        if wild_count > 4 {
            return Err(EngineError::TooManyWilds(wild_count));
        }

        self.stats.total_calls += 1;
        self.stats.by_wild_count[wild_count] += 1;

        let solution = match wild_count {
            0 => solve_naturals(pool, &self.scoring, &self.config)?,
            1 | 2 => self.solver.arrange(pool, &self.scoring, &self.config)?,
            _ => {
                // Solve the naturals with two wilds, enhance with the rest.
                let mut base = pool
                    .iter()
                    .copied()
                    .filter(|c| !c.is_wild())
                    .collect::<Vec<_>>();
                let wilds = pool
                    .iter()
                    .copied()
                    .filter(|c| c.is_wild())
                    .collect::<Vec<_>>();
                base.extend(&wilds[..2]);

                let solution = self.solver.arrange(&base, &self.scoring, &self.config)?;
                enhance(solution, &wilds[2..], &self.scoring)
            }
        };

        solution.arrangement.validate(pool)?;
        log::info!(
            "arranged {wild_count} wilds pool, score {:.3}, {} nodes in {:?}",
            solution.score,
            solution.search.explored_nodes,
            started.elapsed()
        );

        Ok(Arranged {
            score: solution.score,
            stats: ArrangeStats {
                wild_count,
                dispatch_time: started.elapsed(),
                search: solution.search,
            },
            arrangement: solution.arrangement,
        })
    }

    /// The dispatch counters of this engine.
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scoring", &self.scoring)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Solves a pool without wilds, search then kicker completion.
pub(crate) fn solve_naturals(
    pool: &[Card],
    scoring: &Scoring,
    config: &SearchConfig,
) -> Result<Solution, EngineError> {
    let candidates = Candidates::enumerate(pool);
    let hands = candidates.hands();

    let outcome = Search::new(hands, scoring)
        .with_config(config.clone())
        .run();
    let best = outcome.best().ok_or(EngineError::NoArrangement)?;

    let arrangement = complete(pool, &hands[best.back], &hands[best.middle], &hands[best.front])?;
    let score = arrangement_score(&arrangement, scoring);

    Ok(Solution {
        arrangement,
        score,
        search: outcome.stats,
    })
}

/// The expected score of a completed arrangement.
pub(crate) fn arrangement_score(arrangement: &Arrangement, scoring: &Scoring) -> f64 {
    Position::positions()
        .map(|position| scoring.expected(arrangement.hand(position).rank(), position))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::RankedHand;
    use pyramid_cards::parse_hand;
    use pyramid_eval::Category;

    #[test]
    fn rejects_bad_pools() {
        let mut engine = Engine::new();

        let short = parse_hand("9S 9H 9D 9C KD KC 8S 7S").unwrap();
        assert!(matches!(
            engine.arrange(&short),
            Err(EngineError::InvalidPoolSize(8))
        ));

        let mut dups = parse_hand("9S 9H 9D 9C KD KC 8S 7S 6H 5S 4D AH QH JC TH 2C").unwrap();
        dups.push(dups[0]);
        assert!(matches!(
            engine.arrange(&dups),
            Err(EngineError::DuplicateCardId(0))
        ));

        let mut wilds = parse_hand("9S 9H 9D 9C KD KC 8S 7S 6H 5S 4D AH").unwrap();
        for id in 12..17 {
            wilds.push(Card::wild(id));
        }
        assert!(matches!(
            engine.arrange(&wilds),
            Err(EngineError::TooManyWilds(5))
        ));

        // Failed calls are not counted.
        assert_eq!(engine.stats().total_calls, 0);
    }

    #[test]
    fn arranges_natural_pool() {
        let pool = parse_hand("9S 9H 9D 9C KD KC 8S 7S 6H 5S 4D AH QH JC TH 2C 3C").unwrap();
        let mut engine = Engine::new();

        let arranged = engine.arrange(&pool).unwrap();
        assert_eq!(arranged.arrangement.validate(&pool), Ok(()));
        assert!(arranged.score > 0.0);
        assert_eq!(arranged.stats.wild_count, 0);
        assert!(arranged.stats.search.explored_nodes > 0);

        assert_eq!(engine.stats().total_calls, 1);
        assert_eq!(engine.stats().by_wild_count[0], 1);
    }

    #[test]
    fn arranges_pool_with_no_spare_kickers() {
        // The 8-card straight flush, seven deuces, and the trey pair consume
        // all 17 cards; the chosen triple must leave room for kickers.
        let pool = parse_hand("AS KS QS JS TS 9S 8S 7S 2H 2H 2D 2D 2C 2C 2S 3H 3D").unwrap();
        let mut engine = Engine::new();

        let arranged = engine.arrange(&pool).unwrap();
        assert_eq!(arranged.arrangement.validate(&pool), Ok(()));
        assert!(arranged.score > 0.0);
    }

    #[test]
    fn front_quads_are_reachable() {
        // Five aces back, king quads middle, queen quads front with a kicker
        // is the best split for this pool.
        let pool = parse_hand("AS AH AD AC AS KS KH KD KC QS QH QD QC 2H 3D 4C 5S").unwrap();
        let mut engine = Engine::new();

        let arranged = engine.arrange(&pool).unwrap();
        let front = arranged.arrangement.front();
        assert_eq!(front.rank().category(), Category::Quads);
        assert_eq!(front.rank().tiebreaks()[0], 12);
        assert_eq!(front.len(), 5);
        assert_eq!(arranged.arrangement.validate(&pool), Ok(()));
    }

    /// A solver returning a canned solution, to isolate the dispatcher.
    struct FixedSolver(Solution);

    impl WildSolver for FixedSolver {
        fn arrange(
            &self,
            _pool: &[Card],
            _scoring: &Scoring,
            _config: &SearchConfig,
        ) -> Result<Solution, EngineError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn three_wilds_enhance_the_base_solution() {
        let mut pool = parse_hand("9S 9H 9D 9C 9S KD KC QH QD JC 2C 3C 4D 5D").unwrap();
        for id in 14..17 {
            pool.push(Card::wild(id));
        }

        // The canned base solution covers the naturals plus two wilds.
        let scoring = Scoring::new();
        let back = RankedHand::evaluated(pool[0..5].to_vec()).unwrap();
        let middle = RankedHand::evaluated(pool[5..10].to_vec()).unwrap();
        let front = RankedHand::evaluated(pool[10..13].to_vec()).unwrap();
        let staging = vec![pool[13], pool[14], pool[15]];

        let arrangement = Arrangement::new(back, middle, front, staging);
        let score = arrangement_score(&arrangement, &scoring);
        let solution = Solution {
            arrangement,
            score,
            search: SearchStats {
                explored_nodes: 1,
                pruned_nodes: 0,
                elapsed: Duration::ZERO,
                efficiency: 0.0,
            },
        };

        let mut engine = Engine::new().with_solver(Box::new(FixedSolver(solution)));
        let arranged = engine.arrange(&pool).unwrap();

        // The third wild extends the five 9s to six of a kind.
        let back = arranged.arrangement.back();
        assert_eq!(back.rank().category(), Category::SixOfAKind);
        assert_eq!(back.len(), 6);

        assert_eq!(arranged.arrangement.validate(&pool), Ok(()));
        assert_eq!(arranged.stats.wild_count, 3);
        assert_eq!(engine.stats().by_wild_count[3], 1);
    }
}
