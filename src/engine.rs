// Simulation API boundary. Frontends (CLI, GUI, analytics, persistence) drive
// the core through these two call shapes and never touch betting internals.
// It is implemented for the core `Game` type.

use crate::cards::Card;
use crate::game::{Game, GameError, HandResult, TableEquity};
use crate::stats::Stats;

pub trait SimulationEngine {
    /// Play one hand and return its record.
    fn simulate_hand(&mut self) -> Result<HandResult, GameError>;

    /// Win probabilities for the current players over random completions of `board`.
    fn estimate_equity(
        &mut self,
        board: &[Card],
        num_simulations: u64,
        num_workers: usize,
    ) -> Result<TableEquity, GameError>;

    // Queries
    fn strategy_names(&self) -> Vec<String>;
    fn player_stats(&self) -> Vec<Stats>;
    fn num_players(&self) -> usize;
}

impl SimulationEngine for Game {
    fn simulate_hand(&mut self) -> Result<HandResult, GameError> {
        self.simulate_hand()
    }

    fn estimate_equity(
        &mut self,
        board: &[Card],
        num_simulations: u64,
        num_workers: usize,
    ) -> Result<TableEquity, GameError> {
        self.estimate_equity(board, num_simulations, num_workers)
    }

    fn strategy_names(&self) -> Vec<String> {
        self.strategy_names()
    }
    fn player_stats(&self) -> Vec<Stats> {
        self.player_stats()
    }
    fn num_players(&self) -> usize {
        self.num_players()
    }
}
