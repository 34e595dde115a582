// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pyramid Poker arrangement CLI.
//!
//! Arranges a dealt or given 17-card pool and prints the pyramid with its
//! expected points.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::fs;
use std::path::PathBuf;

use pyramid_cards::{Deck, parse_hand};
use pyramid_engine::{Engine, Position, Scoring, TieredTable};

#[derive(Debug, Parser)]
struct Cli {
    /// A 17-card pool as card codes (`AS td 9h ??` ...), dealt if not given.
    #[clap(long, short = 'n')]
    hand: Option<String>,
    /// Number of decks to deal from.
    #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=3))]
    decks: u8,
    /// Number of wild cards in the deck.
    #[clap(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=4))]
    wilds: u8,
    /// Deal with a deterministic seed.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Number of players at the table.
    #[clap(long, short, default_value_t = 4, value_parser = clap::value_parser!(u32).range(2..=8))]
    players: u32,
    /// A CSV win-probability table replacing the heuristic estimator.
    #[clap(long)]
    tiered: Option<PathBuf>,
    /// The tiered table has per-high-card probabilities.
    #[clap(long)]
    detailed: bool,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let pool = match &cli.hand {
        Some(codes) => {
            let pool = parse_hand(codes).context("invalid hand")?;
            if pool.len() != Deck::POOL_SIZE {
                bail!("a hand must have {} cards, got {}", Deck::POOL_SIZE, pool.len());
            }
            pool
        }
        None => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let mut deck = Deck::new_and_shuffled(&mut rng, cli.decks as usize, cli.wilds as usize);
            deck.deal_pool()
        }
    };

    let codes = pool.iter().map(ToString::to_string).collect::<Vec<_>>();
    println!("pool:   {}", codes.join(" "));

    let mut engine = Engine::new().with_scoring(build_scoring(&cli)?);
    let arranged = engine.arrange(&pool)?;

    println!("{}", arranged.arrangement);

    let staging = arranged
        .arrangement
        .staging()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("staging: {}", staging.join(" "));

    let scoring = build_scoring(&cli)?;
    for position in Position::positions().rev() {
        let rank = arranged.arrangement.hand(position).rank();
        let label = position.to_string();
        println!(
            "{label:>6}: {} points, {:.0}% to win",
            scoring.points(rank, position),
            scoring.probability(rank, position) * 100.0,
        );
    }

    println!("expected score: {:.3}", arranged.score);

    let stats = &arranged.stats;
    log::info!(
        "{} wilds, {} nodes explored, {} pruned, {:.0}% efficiency in {:?}",
        stats.wild_count,
        stats.search.explored_nodes,
        stats.search.pruned_nodes,
        stats.search.efficiency * 100.0,
        stats.dispatch_time,
    );

    Ok(())
}

/// The scoring model from the command line options.
fn build_scoring(cli: &Cli) -> Result<Scoring> {
    let mut scoring = Scoring::new().with_players(cli.players);
    if let Some(path) = &cli.tiered {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let table = TieredTable::from_csv(&text, cli.detailed)?;
        scoring = scoring.with_estimator(Box::new(table));
    }
    Ok(scoring)
}
