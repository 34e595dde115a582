// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Candidate hand enumeration from a 17-card pool.
//!
//! The search does not look at raw card subsets, it works on the candidate
//! hands worth considering: of-a-kinds with their drop-one variants, full
//! houses, every same-suit 5-card subset, straights and straight flushes as
//! cartesian products of duplicate choices over rank windows, and single
//! cards. Undersized candidates (singles, pairs, quads) are completed with
//! kickers after the search.
use ahash::AHashMap;

use pyramid_cards::{Card, Suit};
use pyramid_eval::{Category, HandRank, evaluate_partial};

use crate::arrangement::Position;

/// A candidate hand for one or more positions.
#[derive(Debug, Clone)]
pub struct Candidate {
    cards: Vec<Card>,
    category: Category,
    rank: HandRank,
    mask: u32,
    front: bool,
    middle: bool,
    back: bool,
}

impl Candidate {
    /// The candidate cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The candidate category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The candidate rank, partial for undersized candidates.
    pub fn rank(&self) -> &HandRank {
        &self.rank
    }

    /// A bitmask over pool indices for O(1) disjointness tests.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Number of cards in the candidate.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks if the candidate has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Checks if the candidate can play at the given position.
    pub fn eligible(&self, position: Position) -> bool {
        match position {
            Position::Front => self.front,
            Position::Middle => self.middle,
            Position::Back => self.back,
        }
    }

    /// Checks if this candidate shares cards with the given mask.
    pub fn overlaps(&self, mask: u32) -> bool {
        self.mask & mask != 0
    }
}

/// Per-category candidate counts.
///
/// The enumeration follows closed-form combinatorics (drop-one of-a-kind
/// variants, trips by pairs full houses, C(n,5) flushes, window products for
/// straights) so the counts can be validated against those formulas.
#[derive(Debug, Clone, Default)]
pub struct CategoryCounts {
    counts: AHashMap<Category, usize>,
}

impl CategoryCounts {
    fn add(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// The number of candidates enumerated for a category.
    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// The total number of candidates.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// All candidate hands of a pool, sorted strongest first.
#[derive(Debug, Clone)]
pub struct Candidates {
    hands: Vec<Candidate>,
    counts: CategoryCounts,
}

impl Candidates {
    /// Enumerates the candidate hands of a wild-free pool.
    ///
    /// Panics if the pool has more than 32 cards or contains wild cards;
    /// wilds must be resolved by the dispatcher before enumeration.
    pub fn enumerate(pool: &[Card]) -> Self {
        assert!(pool.len() <= 32, "pool too large for index masks");
        assert!(
            pool.iter().all(|c| !c.is_wild()),
            "cannot enumerate wild cards"
        );

        let index = pool
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id(), i as u32))
            .collect::<AHashMap<_, _>>();

        let mut builder = Builder {
            index,
            hands: Vec::new(),
            counts: CategoryCounts::default(),
        };

        builder.straight_flushes(pool);
        builder.of_a_kinds(pool);
        builder.full_houses(pool);
        builder.flushes(pool);
        builder.straights(pool);
        builder.high_cards(pool);

        let Builder {
            mut hands, counts, ..
        } = builder;
        hands.sort_by(|a, b| b.rank.cmp(&a.rank));

        log::debug!(
            "enumerated {} candidates from {} cards",
            hands.len(),
            pool.len()
        );

        Self { hands, counts }
    }

    /// The candidates sorted by descending rank.
    pub fn hands(&self) -> &[Candidate] {
        &self.hands
    }

    /// The per-category candidate counts.
    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }
}

struct Builder {
    index: AHashMap<u8, u32>,
    hands: Vec<Candidate>,
    counts: CategoryCounts,
}

impl Builder {
    fn push(&mut self, cards: Vec<Card>, category: Category, rank: HandRank) {
        let mask = cards
            .iter()
            .map(|c| 1u32 << self.index[&c.id()])
            .fold(0, |acc, bit| acc | bit);

        let len = cards.len();
        let front = match len {
            1..=3 => true,
            // Quads front with a kicker completing the hand to 5 cards.
            4 => category == Category::Quads,
            5 => category >= Category::Straight,
            _ => false,
        };

        self.counts.add(category);
        self.hands.push(Candidate {
            cards,
            category,
            rank,
            mask,
            front,
            middle: len <= 7,
            back: true,
        });
    }

    /// Groups cards by value, highest value first.
    fn value_groups(cards: &[Card]) -> Vec<(u8, Vec<Card>)> {
        let mut groups: AHashMap<u8, Vec<Card>> = AHashMap::default();
        for &card in cards {
            groups.entry(card.value()).or_default().push(card);
        }

        let mut groups = groups.into_iter().collect::<Vec<_>>();
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        groups
    }

    /// Groups cards by suit.
    fn suit_groups(cards: &[Card]) -> Vec<(Suit, Vec<Card>)> {
        let mut groups: AHashMap<Suit, Vec<Card>> = AHashMap::default();
        for &card in cards {
            if let Some(suit) = card.suit() {
                let group = groups.entry(suit).or_default();
                group.push(card);
            }
        }

        let mut groups = groups.into_iter().collect::<Vec<_>>();
        for (_, group) in groups.iter_mut() {
            group.sort_by(|a, b| b.value().cmp(&a.value()));
        }
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        groups
    }

    fn of_a_kind_category(size: usize) -> Category {
        match size {
            2 => Category::Pair,
            3 => Category::Trips,
            4 => Category::Quads,
            5 => Category::FiveOfAKind,
            6 => Category::SixOfAKind,
            7 => Category::SevenOfAKind,
            _ => Category::EightOfAKind,
        }
    }

    /// Every natural of-a-kind plus its drop-one variants, down to pairs.
    ///
    /// Of-a-kind hands cap at 8 cards; larger rank groups enumerate as an
    /// 8-card group, drop-one variants included.
    fn of_a_kinds(&mut self, pool: &[Card]) {
        for (_, group) in Self::value_groups(pool) {
            if group.len() < 2 {
                continue;
            }

            let group = &group[..group.len().min(8)];
            let n = group.len();

            let rank = evaluate_partial(group).unwrap();
            self.push(group.to_vec(), Self::of_a_kind_category(n), rank);

            if n > 2 {
                for skip in 0..n {
                    let cards = drop_nth(group, skip);
                    let rank = evaluate_partial(&cards).unwrap();
                    self.push(cards, Self::of_a_kind_category(n - 1), rank);
                }
            }
        }
    }

    /// Trips variants crossed with pair variants over distinct values.
    fn full_houses(&mut self, pool: &[Card]) {
        let groups = Self::value_groups(pool);

        let mut trips: Vec<(u8, Vec<Card>)> = Vec::new();
        let mut pairs: Vec<(u8, Vec<Card>)> = Vec::new();
        for (value, group) in &groups {
            match group.len() {
                2 => pairs.push((*value, group.clone())),
                3 => {
                    trips.push((*value, group.clone()));
                    for skip in 0..3 {
                        pairs.push((*value, drop_nth(group, skip)));
                    }
                }
                4 => {
                    for skip in 0..4 {
                        trips.push((*value, drop_nth(group, skip)));
                    }
                }
                _ => {}
            }
        }

        for (tv, tcards) in &trips {
            for (pv, pcards) in &pairs {
                if tv == pv {
                    continue;
                }

                let mut cards = tcards.clone();
                cards.extend(pcards.iter().copied());
                let rank = HandRank::new(Category::FullHouse, vec![*tv, *pv]);
                self.push(cards, Category::FullHouse, rank);
            }
        }
    }

    /// Every C(n,5) same-suit subset.
    ///
    /// Consecutive subsets also exist as straight-flush candidates; as a
    /// flush candidate they keep a flush rank.
    fn flushes(&mut self, pool: &[Card]) {
        for (_, group) in Self::suit_groups(pool) {
            if group.len() < 5 {
                continue;
            }

            let mut scratch = Vec::with_capacity(5);
            combinations(&group, 5, &mut scratch, &mut |cards| {
                let values = cards.iter().map(|c| c.value()).collect::<Vec<_>>();
                let rank = HandRank::new(Category::Flush, values);
                self.push(cards.to_vec(), Category::Flush, rank);
            });
        }
    }

    /// Straight windows from ace high down to the wheel, one candidate per
    /// choice of duplicates.
    fn straights(&mut self, pool: &[Card]) {
        let groups: AHashMap<u8, Vec<Card>> = Self::value_groups(pool).into_iter().collect();

        for (high, window) in windows(5) {
            let Some(choices) = window_choices(&groups, &window) else {
                continue;
            };

            let mut scratch = Vec::with_capacity(5);
            product(&choices, &mut scratch, &mut |cards| {
                let rank = HandRank::new(Category::Straight, vec![high, high - 1]);
                self.push(cards.to_vec(), Category::Straight, rank);
            });
        }
    }

    /// Straight-flush windows per suit, longest hands first.
    fn straight_flushes(&mut self, pool: &[Card]) {
        for (_, group) in Self::suit_groups(pool) {
            if group.len() < 5 {
                continue;
            }

            let groups: AHashMap<u8, Vec<Card>> = Self::value_groups(&group).into_iter().collect();

            for (len, category) in [
                (8, Category::StraightFlush8),
                (7, Category::StraightFlush7),
                (6, Category::StraightFlush6),
                (5, Category::StraightFlush),
            ] {
                for (high, window) in windows(len) {
                    let Some(choices) = window_choices(&groups, &window) else {
                        continue;
                    };

                    let mut scratch = Vec::with_capacity(len);
                    product(&choices, &mut scratch, &mut |cards| {
                        let rank = HandRank::new(category, vec![high, high - 1]);
                        self.push(cards.to_vec(), category, rank);
                    });
                }
            }
        }
    }

    /// One single-card candidate per card.
    fn high_cards(&mut self, pool: &[Card]) {
        for &card in pool {
            let rank = HandRank::new(Category::HighCard, vec![card.value()]);
            self.push(vec![card], Category::HighCard, rank);
        }
    }
}

fn drop_nth(cards: &[Card], n: usize) -> Vec<Card> {
    cards
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != n)
        .map(|(_, c)| *c)
        .collect()
}

/// The `len` straight windows as (effective high, values): ace high down to
/// the lowest natural high, then the ace-low wheel for lengths 5 and 6.
fn windows(len: usize) -> Vec<(u8, Vec<u8>)> {
    let len = len as u8;
    let mut windows = Vec::new();
    for high in ((len + 1)..=14).rev() {
        windows.push((high, (high - len + 1..=high).rev().collect()));
    }

    if len <= 6 {
        let mut wheel = vec![14];
        wheel.extend((2..=len).rev());
        windows.push((len, wheel));
    }

    windows
}

/// The per-value card choices of a window, `None` when a value is missing.
fn window_choices<'a>(
    groups: &'a AHashMap<u8, Vec<Card>>,
    window: &[u8],
) -> Option<Vec<&'a [Card]>> {
    window
        .iter()
        .map(|v| groups.get(v).map(|g| g.as_slice()))
        .collect()
}

/// Calls `f` for every k-cards combination.
fn combinations(cards: &[Card], k: usize, scratch: &mut Vec<Card>, f: &mut impl FnMut(&[Card])) {
    if scratch.len() == k {
        f(scratch);
        return;
    }

    let needed = k - scratch.len();
    if cards.len() < needed {
        return;
    }

    for i in 0..=cards.len() - needed {
        scratch.push(cards[i]);
        combinations(&cards[i + 1..], k, scratch, f);
        scratch.pop();
    }
}

/// Calls `f` for every pick of one card per group.
fn product(groups: &[&[Card]], scratch: &mut Vec<Card>, f: &mut impl FnMut(&[Card])) {
    if scratch.len() == groups.len() {
        f(scratch);
        return;
    }

    for &card in groups[scratch.len()] {
        scratch.push(card);
        product(groups, scratch, f);
        scratch.pop();
    }
}
