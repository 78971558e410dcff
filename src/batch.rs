//! Bulk "play N hands" runs spread over worker threads.

use crate::config::SimulationConfig;
use crate::game::{Game, GameError};
use crate::stats::Stats;
use crate::strategy::StrategyKind;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

/// Aggregated outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub hands: u64,
    pub strategy_names: Vec<String>,
    pub player_stats: Vec<Stats>,
}

/// Play `cfg.num_hands` hands split across `cfg.num_workers` workers.
///
/// Each worker owns a private [`Game`] (own deck, betting engine, strategies
/// and stats); per-player stats are merged after every worker has finished.
/// With a seed, worker `w` plays with a seed derived from it so the report is
/// reproducible.
///
/// ```
/// use holdem_sim::batch::run_batches;
/// use holdem_sim::config::SimulationConfig;
///
/// let cfg = SimulationConfig::default().with_hands(40).with_workers(2).with_seed(3);
/// let report = run_batches(&cfg, &[]).unwrap();
/// assert_eq!(report.hands, 40);
/// assert_eq!(report.player_stats[0].hands_played(), 40);
/// ```
pub fn run_batches(cfg: &SimulationConfig, lineup: &[StrategyKind]) -> Result<BatchReport, GameError> {
    cfg.validate()?;
    let workers = cfg.num_workers as u64;
    let base = cfg.num_hands / workers;
    let extra = cfg.num_hands % workers;

    let partials: Vec<(Vec<String>, Vec<Stats>)> = (0..workers)
        .into_par_iter()
        .map(|w| -> Result<(Vec<String>, Vec<Stats>), GameError> {
            let hands = base + u64::from(w < extra);
            let _span = info_span!("batch_worker", worker = w, hands).entered();
            let mut worker_cfg = cfg.clone();
            worker_cfg.seed = cfg.seed.map(|s| s.wrapping_add(w.wrapping_mul(0x2545_F491_4F6C_DD1D)));
            let mut game = Game::from_config(&worker_cfg, lineup)?;
            for _ in 0..hands {
                game.simulate_hand()?;
            }
            Ok((game.strategy_names(), game.player_stats()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut names = Vec::new();
    let mut totals = vec![Stats::new(); cfg.num_players];
    for (worker_names, stats) in partials {
        names = worker_names;
        for (total, s) in totals.iter_mut().zip(&stats) {
            total.merge(s);
        }
    }
    info!(hands = cfg.num_hands, workers, "batch finished");
    Ok(BatchReport { hands: cfg.num_hands, strategy_names: names, player_stats: totals })
}
