// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Branch-and-bound search over sorted candidates.
//!
//! Back hands are tried strongest first, middle hands from the back index on
//! so the sort order enforces back >= middle, and fronts from the middle
//! index. Before scanning fronts a branch is pruned when its back and middle
//! score plus an optimistic front bound cannot beat the best score found so
//! far.
use std::time::{Duration, Instant};

use crate::arrangement::Position;
use crate::candidates::Candidate;
use crate::score::ScoreStrategy;

/// Search tuning knobs.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How many front-eligible candidates the default bound scans.
    ///
    /// Front expected scores track the candidate sort order, so a small
    /// window is a good optimistic estimate; raise it (up to the candidate
    /// count) when the scoring model inverts that order.
    pub front_scan_window: usize,
    /// Disables pruning when false, for exhaustive search.
    pub prune: bool,
    /// Stops the search after this many explored nodes.
    pub max_nodes: u64,
    /// Stops the search once the best score exceeds this ceiling.
    pub score_ceiling: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            front_scan_window: 50,
            prune: true,
            max_nodes: 100_000,
            score_ceiling: 1000.0,
        }
    }
}

/// The candidate indices of the best triple found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestTriple {
    /// The back candidate index.
    pub back: usize,
    /// The middle candidate index.
    pub middle: usize,
    /// The front candidate index.
    pub front: usize,
}

/// The threaded search state.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The best triple found so far.
    pub best: Option<BestTriple>,
    /// The best score found so far.
    pub best_score: f64,
    /// Number of back and middle pairs explored.
    pub explored: u64,
    /// Number of pairs pruned by the bound.
    pub pruned: u64,
}

impl SearchState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self {
            best: None,
            best_score: f64::NEG_INFINITY,
            explored: 0,
            pruned: 0,
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Search statistics.
#[derive(Debug, Clone, Copy)]
pub struct SearchStats {
    /// Number of explored back and middle pairs.
    pub explored_nodes: u64,
    /// Number of pruned back and middle pairs.
    pub pruned_nodes: u64,
    /// Time spent searching.
    pub elapsed: Duration,
    /// Fraction of pairs pruned.
    pub efficiency: f64,
}

/// The search result.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The final search state.
    pub state: SearchState,
    /// The search statistics.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// The best triple found, if any.
    pub fn best(&self) -> Option<BestTriple> {
        self.state.best
    }

    /// The best score found.
    pub fn score(&self) -> f64 {
        self.state.best_score
    }
}

/// An optimistic estimate of the best front score from a middle index given
/// the cards already used.
pub type BoundFn<'a> = dyn Fn(&[Candidate], usize, u32) -> f64 + 'a;

/// Branch-and-bound search for the best scoring triple.
///
/// Only triples whose kicker-completed sizes fit the pool are considered, so
/// every returned triple can be completed.
pub struct Search<'a> {
    candidates: &'a [Candidate],
    scoring: &'a dyn ScoreStrategy,
    config: SearchConfig,
    bound: Option<Box<BoundFn<'a>>>,
    pool_size: usize,
}

impl<'a> Search<'a> {
    /// Creates a search over candidates sorted by descending rank.
    pub fn new(candidates: &'a [Candidate], scoring: &'a dyn ScoreStrategy) -> Self {
        debug_assert!(candidates.windows(2).all(|w| w[0].rank() >= w[1].rank()));
        let pool_size = candidates
            .iter()
            .fold(0u32, |acc, c| acc | c.mask())
            .count_ones() as usize;
        Self {
            candidates,
            scoring,
            config: SearchConfig::default(),
            bound: None,
            pool_size,
        }
    }

    /// Sets the search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the front bound used for pruning.
    ///
    /// The search stays exact as long as the bound never underestimates the
    /// best front score reachable from the given middle index.
    pub fn with_bound(mut self, bound: Box<BoundFn<'a>>) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Runs the search to completion.
    pub fn run(&self) -> SearchOutcome {
        let mut state = SearchState::new();
        let started = Instant::now();
        self.run_with_state(&mut state);

        let elapsed = started.elapsed();
        let nodes = state.explored + state.pruned;
        let stats = SearchStats {
            explored_nodes: state.explored,
            pruned_nodes: state.pruned,
            elapsed,
            efficiency: if nodes > 0 {
                state.pruned as f64 / nodes as f64
            } else {
                0.0
            },
        };

        log::debug!(
            "search explored {} pruned {} best {:.3}",
            state.explored,
            state.pruned,
            state.best_score
        );

        SearchOutcome { state, stats }
    }

    /// Runs the search threading the given state.
    pub fn run_with_state(&self, state: &mut SearchState) {
        let n = self.candidates.len();

        'outer: for bi in 0..n {
            let back = &self.candidates[bi];
            if !back.eligible(Position::Back) {
                continue;
            }

            let back_score = self.scoring.expected(back.rank(), Position::Back);
            let back_full = back.len().max(5);

            for mi in bi..n {
                let middle = &self.candidates[mi];
                if !middle.eligible(Position::Middle) || middle.overlaps(back.mask()) {
                    continue;
                }

                // Completed hands must fit the pool; a 3-card front is the
                // smallest completion.
                let middle_full = middle.len().max(5);
                if back_full + middle_full + 3 > self.pool_size {
                    continue;
                }

                state.explored += 1;
                if state.explored > self.config.max_nodes {
                    log::warn!("search stopped at {} nodes", self.config.max_nodes);
                    break 'outer;
                }

                let partial = back_score + self.scoring.expected(middle.rank(), Position::Middle);
                let used = back.mask() | middle.mask();

                if self.config.prune && partial + self.front_bound(mi, used) <= state.best_score {
                    state.pruned += 1;
                    continue;
                }

                for fi in mi..n {
                    let front = &self.candidates[fi];
                    if !front.eligible(Position::Front) || front.overlaps(used) {
                        continue;
                    }

                    let front_full = if front.len() > 3 { 5 } else { 3 };
                    if back_full + middle_full + front_full > self.pool_size {
                        continue;
                    }

                    let score = partial + self.scoring.expected(front.rank(), Position::Front);
                    if score > state.best_score {
                        state.best_score = score;
                        state.best = Some(BestTriple {
                            back: bi,
                            middle: mi,
                            front: fi,
                        });
                    }
                }

                if state.best_score > self.config.score_ceiling {
                    break 'outer;
                }
            }
        }
    }

    /// The optimistic best front score from a middle index.
    fn front_bound(&self, middle_idx: usize, used: u32) -> f64 {
        if let Some(bound) = &self.bound {
            return bound(self.candidates, middle_idx, used);
        }

        let mut best = 0.0f64;
        let mut scanned = 0;
        for candidate in &self.candidates[middle_idx..] {
            if !candidate.eligible(Position::Front) {
                continue;
            }

            let score = self.scoring.expected(candidate.rank(), Position::Front);
            best = best.max(score);

            scanned += 1;
            if scanned >= self.config.front_scan_window {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::Candidates;
    use crate::score::Scoring;
    use pyramid_cards::parse_hand;

    fn pool() -> Vec<pyramid_cards::Card> {
        parse_hand("9S 9H 9D 9C KD KC 8S 7S 6H 5S 4D AH QH JC TH 2C 3C").unwrap()
    }

    #[test]
    fn finds_valid_triple() {
        let pool = pool();
        let candidates = Candidates::enumerate(&pool);
        let scoring = Scoring::new();
        let outcome = Search::new(candidates.hands(), &scoring).run();

        let best = outcome.best().expect("a triple");
        let hands = candidates.hands();
        let back = &hands[best.back];
        let middle = &hands[best.middle];
        let front = &hands[best.front];

        // Index order guarantees back >= middle >= front.
        assert!(back.rank() >= middle.rank());
        assert!(middle.rank() >= front.rank());

        // Hands are pairwise disjoint.
        assert_eq!(back.mask() & middle.mask(), 0);
        assert_eq!((back.mask() | middle.mask()) & front.mask(), 0);

        assert!(outcome.score().is_finite());
        assert!(outcome.stats.explored_nodes > 0);
    }

    #[test]
    fn pruning_preserves_the_best_score() {
        let pool = pool();
        let candidates = Candidates::enumerate(&pool);
        let scoring = Scoring::new();

        // Make the window cover every candidate so the bound is admissible.
        let mut config = SearchConfig {
            front_scan_window: candidates.hands().len(),
            ..SearchConfig::default()
        };

        let pruned = Search::new(candidates.hands(), &scoring)
            .with_config(config.clone())
            .run();

        config.prune = false;
        let exhaustive = Search::new(candidates.hands(), &scoring)
            .with_config(config)
            .run();

        assert!(pruned.best().is_some());
        assert_eq!(pruned.score(), exhaustive.score());
        assert!(pruned.state.pruned > 0);
        assert_eq!(exhaustive.state.pruned, 0);
    }

    #[test]
    fn custom_bound_is_used() {
        let pool = pool();
        let candidates = Candidates::enumerate(&pool);
        let scoring = Scoring::new();

        // An infinite bound disables pruning without disabling the check.
        let outcome = Search::new(candidates.hands(), &scoring)
            .with_bound(Box::new(|_, _, _| f64::INFINITY))
            .run();

        assert!(outcome.best().is_some());
        assert_eq!(outcome.state.pruned, 0);
    }

    #[test]
    fn node_valve_stops_the_search() {
        let pool = pool();
        let candidates = Candidates::enumerate(&pool);
        let scoring = Scoring::new();

        let config = SearchConfig {
            max_nodes: 10,
            ..SearchConfig::default()
        };
        let outcome = Search::new(candidates.hands(), &scoring)
            .with_config(config)
            .run();

        assert!(outcome.stats.explored_nodes <= 11);
    }

    #[test]
    fn triples_leave_enough_kickers() {
        // An 8-card straight flush, seven deuces, and a pair of treys can
        // consume all 17 cards; triples that leave a hand short of kickers
        // are skipped.
        let pool = parse_hand("AS KS QS JS TS 9S 8S 7S 2H 2H 2D 2D 2C 2C 2S 3H 3D").unwrap();
        let candidates = Candidates::enumerate(&pool);
        let scoring = Scoring::new();
        let outcome = Search::new(candidates.hands(), &scoring).run();

        let best = outcome.best().expect("a triple");
        let hands = candidates.hands();
        let back = hands[best.back].len().max(5);
        let middle = hands[best.middle].len().max(5);
        let front = if hands[best.front].len() > 3 { 5 } else { 3 };
        assert!(back + middle + front <= pool.len());
    }

    #[test]
    fn empty_candidates_find_nothing() {
        let scoring = Scoring::new();
        let outcome = Search::new(&[], &scoring).run();
        assert!(outcome.best().is_none());
        assert_eq!(outcome.score(), f64::NEG_INFINITY);
    }
}
