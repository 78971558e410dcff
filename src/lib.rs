//! holdem-sim: Texas Hold'em strategy simulator
//!
//! Goals:
//! - Exact, deterministic hand evaluation over 5 to 7 cards
//! - A rules-enforcing betting engine driven by pluggable strategies
//! - Reproducible multi-threaded batch runs and Monte Carlo equity
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: score a Hold'em hand
//! ```
//! use holdem_sim::cards::parse_cards;
//! use holdem_sim::evaluator::{score_holdem, Category};
//! use holdem_sim::hand::HoleCards;
//!
//! let hole: HoleCards = "As Ah".parse().unwrap();
//! let board = parse_cards("Kc Qd Jh 3s 2c").unwrap();
//!
//! let score = score_holdem(&hole, &board).unwrap();
//! assert_eq!(score.category(), Category::OnePair);
//! ```
//!
//! ## Quick start: play hands and estimate equity
//! ```
//! use holdem_sim::config::TableConfig;
//! use holdem_sim::game::Game;
//! use holdem_sim::strategy::StrategyKind;
//!
//! let lineup = [StrategyKind::Tight, StrategyKind::Aggressive, StrategyKind::Random];
//! let mut game = Game::with_lineup(TableConfig::default(), &lineup, Some(7)).unwrap();
//! for _ in 0..20 {
//!     game.simulate_hand().unwrap();
//! }
//! let equity = game.estimate_equity(&[], 200, 2).unwrap();
//! let total: f64 = equity.probabilities.iter().sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```
//!
//! ## CLI
//! ```sh
//! cargo run --bin holdem-sim -- --hands 5000 --strategies tight,aggressive,random
//! ```

pub mod batch;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod stats;
pub mod strategy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
