use crate::betting::{Action, ActionRecord, BettingEngine, BettingError, Phase};
use crate::cards::Card;
use crate::config::{ConfigError, SimulationConfig, TableConfig, MAX_PLAYERS};
use crate::deck::{Deck, DeckError};
use crate::equity::{EquityError, EquityRequest};
use crate::evaluator::{best_category, score, Category, EvalError, HandScore};
use crate::hand::{validate_table, Board, HandError, HoleCards};
use crate::stats::{PositionBucket, Stats};
use crate::strategy::{DecisionContext, Strategy, StrategyKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("betting failed: {0}")]
    Betting(#[from] BettingError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("hand evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Equity(#[from] EquityError),
    #[error("unknown player {0}")]
    UnknownPlayer(usize),
}

/// How a hand was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HandEnd {
    Showdown,
    /// Everyone else folded.
    Uncontested,
}

/// Everything a frontend needs to know about one simulated hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_number: u64,
    /// Pot recipients, by player index.
    pub winners: Vec<usize>,
    /// Chip result of this hand per player; sums to zero.
    pub profits: Vec<i64>,
    /// Showdown scores of the players who reached showdown.
    pub hand_strengths: BTreeMap<usize, HandScore>,
    pub betting_history: Vec<ActionRecord>,
    /// Cumulative stats after this hand.
    pub player_stats: Vec<Stats>,
    pub strategy_names: Vec<String>,
    pub board: Vec<Card>,
    pub pot: u64,
    pub end: HandEnd,
}

/// Win probabilities for the players currently seated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEquity {
    /// Hole cards the estimate was run with, pinned or dealt.
    pub holes: Vec<HoleCards>,
    pub probabilities: Vec<f64>,
    pub confidence_intervals: Vec<(f64, f64)>,
    pub player_stats: Vec<Stats>,
    pub strategy_names: Vec<String>,
}

pub struct Player {
    pub(crate) strategy: Box<dyn Strategy>,
    pub(crate) stack: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) fixed_hole: Option<HoleCards>,
    pub(crate) stats: Stats,
}

impl Player {
    pub fn name(&self) -> &str {
        self.strategy.name()
    }

    /// Stack at the end of the last hand.
    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Hole cards of the last hand played.
    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    /// Hole cards pinned for equity estimates.
    pub fn fixed_hole(&self) -> Option<HoleCards> {
        self.fixed_hole
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("strategy", &self.name())
            .field("stack", &self.stack)
            .field("hole", &self.hole)
            .field("fixed_hole", &self.fixed_hole)
            .finish()
    }
}

/// Drives complete hands between seated strategies.
///
/// Every hand starts each player at the table's starting stack, deals from a
/// fresh deck and rotates the blinds by one seat.
///
/// ```
/// use holdem_sim::config::TableConfig;
/// use holdem_sim::game::Game;
/// use holdem_sim::strategy::StrategyKind;
///
/// let lineup = StrategyKind::default_lineup(3);
/// let mut game = Game::with_lineup(TableConfig::default(), &lineup, Some(42)).unwrap();
/// let result = game.simulate_hand().unwrap();
/// assert_eq!(result.profits.iter().sum::<i64>(), 0);
/// assert!(!result.winners.is_empty());
/// ```
#[derive(Debug)]
pub struct Game {
    table: TableConfig,
    players: Vec<Player>,
    engine: BettingEngine,
    rng: ChaCha8Rng,
    board: Board,
    hands_played: u64,
}

impl Game {
    pub fn new(
        table: TableConfig,
        strategies: Vec<Box<dyn Strategy>>,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        table.validate()?;
        if !(2..=MAX_PLAYERS).contains(&strategies.len()) {
            return Err(ConfigError::PlayerCount(strategies.len()).into());
        }
        let players = strategies
            .into_iter()
            .map(|strategy| Player {
                strategy,
                stack: table.starting_stack,
                hole: None,
                fixed_hole: None,
                stats: Stats::new(),
            })
            .collect();
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            table,
            players,
            engine: BettingEngine::new(table.small_blind, table.big_blind),
            rng: ChaCha8Rng::seed_from_u64(seed),
            board: Board::empty(),
            hands_played: 0,
        })
    }

    /// Seat one built-in style per entry of `lineup`. With a seed, every
    /// strategy gets its own seed derived from it.
    pub fn with_lineup(
        table: TableConfig,
        lineup: &[StrategyKind],
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        let strategies = lineup
            .iter()
            .enumerate()
            .map(|(i, kind)| kind.build(seed.map(|s| strategy_seed(s, i))))
            .collect();
        Self::new(table, strategies, seed)
    }

    /// Table from a simulation config, using `lineup` or the default lineup
    /// when it is empty.
    pub fn from_config(cfg: &SimulationConfig, lineup: &[StrategyKind]) -> Result<Self, GameError> {
        cfg.validate()?;
        let lineup = if lineup.is_empty() {
            StrategyKind::default_lineup(cfg.num_players)
        } else if lineup.len() == cfg.num_players {
            lineup.to_vec()
        } else {
            return Err(ConfigError::LineupSize { lineup: lineup.len(), players: cfg.num_players }
                .into());
        };
        Self::with_lineup(cfg.table, &lineup, cfg.seed)
    }

    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Board of the last hand.
    pub fn board(&self) -> &[Card] {
        self.board.as_slice()
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn player_stats(&self) -> Vec<Stats> {
        self.players.iter().map(|p| p.stats.clone()).collect()
    }

    /// Pin a player's hole cards for [`Game::estimate_equity`]; `None` lets
    /// the next estimate deal them.
    pub fn set_hole_cards(&mut self, player: usize, hole: Option<HoleCards>) -> Result<(), GameError> {
        let p = self.players.get_mut(player).ok_or(GameError::UnknownPlayer(player))?;
        p.fixed_hole = hole;
        Ok(())
    }

    /// Play one complete hand and fold its outcome into the players' stats.
    ///
    /// Stats are only touched once the hand has fully resolved; a hand that
    /// fails part way leaves every record as it was.
    pub fn simulate_hand(&mut self) -> Result<HandResult, GameError> {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        self.simulate_hand_with_deck(deck)
    }

    /// Play one hand dealing from `deck` as it is, without shuffling.
    ///
    /// Hole cards go two at a time to each player in seating order (small
    /// blind first), then each street burns one card before it is dealt.
    pub fn simulate_hand_with_deck(&mut self, mut deck: Deck) -> Result<HandResult, GameError> {
        let n = self.players.len();
        let start = self.table.starting_stack;
        self.engine.start_new_round(&vec![start; n])?;
        let hand_number = self.hands_played + 1;
        debug!(hand = hand_number, order = ?self.engine.order(), "hand start");

        let mut holes: Vec<Option<HoleCards>> = vec![None; n];
        for &p in self.engine.order() {
            holes[p] = Some(HoleCards::from_slice(&deck.deal(2)?)?);
        }
        let holes: Vec<HoleCards> = holes.into_iter().flatten().collect();

        let mut board = Board::empty();
        let mut raised = vec![false; n];
        for phase in Phase::ALL {
            if phase != Phase::Preflop {
                self.engine.advance_phase()?;
                deck.burn()?;
                board.extend(deck.deal(phase.cards_dealt())?);
            }
            debug!(%phase, board = ?board.as_slice(), pot = self.engine.pot(), "phase");
            self.run_betting(phase, &holes, board.as_slice(), &mut raised)?;
            if self.engine.live_count() <= 1 {
                break;
            }
        }

        let live = self.engine.active_players();
        let mut hand_strengths = BTreeMap::new();
        let (winners, end) = if live.len() == 1 {
            (live, HandEnd::Uncontested)
        } else {
            for &p in &live {
                hand_strengths.insert(p, score(&holes[p].with_board(board.as_slice()))?);
            }
            let best = hand_strengths.values().max().copied();
            let winners: Vec<usize> =
                live.into_iter().filter(|p| hand_strengths.get(p).copied() == best).collect();
            (winners, HandEnd::Showdown)
        };

        let pot = self.engine.pot();
        let payouts = self.split_pot(pot, &winners);
        let profits: Vec<i64> = (0..n)
            .map(|p| {
                let left = self.engine.stack(p).unwrap_or(0);
                (left + payouts[p]) as i64 - start as i64
            })
            .collect();

        for p in 0..n {
            let seat = self.engine.seat_of(p).unwrap_or(p);
            let bucket = PositionBucket::for_seat(seat, n);
            let won = winners.contains(&p);
            let player = &mut self.players[p];
            player.stats.record_hand(bucket, won, profits[p]);
            if raised[p] && best_category(&holes[p].with_board(board.as_slice())) < Category::Straight {
                player.stats.record_bluff(won);
            }
            player.stack = (start as i64 + profits[p]) as u64;
            player.hole = Some(holes[p]);
        }
        self.board = board;
        self.hands_played = hand_number;

        debug!(hand = hand_number, ?winners, pot, ?end, "hand finished");
        Ok(HandResult {
            hand_number,
            winners,
            profits,
            hand_strengths,
            betting_history: self.engine.history().to_vec(),
            player_stats: self.player_stats(),
            strategy_names: self.strategy_names(),
            board: self.board.as_slice().to_vec(),
            pot,
            end,
        })
    }

    /// One betting pass. Loops over the seating order until every live player
    /// with chips has acted and matched the bet.
    fn run_betting(
        &mut self,
        phase: Phase,
        holes: &[HoleCards],
        board: &[Card],
        raised: &mut [bool],
    ) -> Result<(), GameError> {
        let n = self.players.len();
        let order = self.engine.order().to_vec();
        // Preflop action starts left of the big blind.
        let mut cursor = if phase == Phase::Preflop { 2 % n } else { 0 };
        let mut acted = vec![false; n];
        let mut raises = 0u32;
        let mut idle = 0usize;

        while idle < n && self.engine.live_count() > 1 {
            let p = order[cursor % n];
            cursor += 1;
            if !self.needs_action(p, &acted) {
                idle += 1;
                continue;
            }
            idle = 0;

            let ctx = DecisionContext {
                hole: &holes[p],
                board,
                phase,
                pot: self.engine.pot(),
                current_bet: self.engine.current_bet(),
                to_call: self.engine.amount_to_call(p),
                stack: self.engine.stack(p).unwrap_or(0),
                min_raise: self.engine.min_raise(),
            };
            let mut action = self.players[p].strategy.decide(&ctx);
            if matches!(action, Action::Raise(_)) && raises >= self.table.max_raises_per_phase {
                action = Action::Call;
            }

            let applied = match self.engine.handle_action(p, action) {
                Ok(()) => action,
                Err(err) => {
                    let fallback = ctx.give_up();
                    warn!(player = p, %action, %err, %fallback, "decision rejected");
                    self.engine.handle_action(p, fallback)?;
                    fallback
                }
            };

            acted[p] = true;
            if matches!(applied, Action::Raise(_)) {
                raises += 1;
                raised[p] = true;
                for (q, a) in acted.iter_mut().enumerate() {
                    if q != p {
                        *a = false;
                    }
                }
            }
        }
        Ok(())
    }

    fn needs_action(&self, p: usize, acted: &[bool]) -> bool {
        if self.engine.is_folded(p) || self.engine.stack(p).unwrap_or(0) == 0 {
            return false;
        }
        !acted[p] || self.engine.amount_to_call(p) > 0
    }

    /// Even split among `winners`; odd chips go one each to winners in seat
    /// order starting from the small blind.
    fn split_pot(&self, pot: u64, winners: &[usize]) -> Vec<u64> {
        let mut payouts = vec![0u64; self.players.len()];
        if winners.is_empty() {
            return payouts;
        }
        let share = pot / winners.len() as u64;
        let mut odd = pot % winners.len() as u64;
        for &w in winners {
            payouts[w] = share;
        }
        for &p in self.engine.order() {
            if odd == 0 {
                break;
            }
            if winners.contains(&p) {
                payouts[p] += 1;
                odd -= 1;
            }
        }
        payouts
    }

    /// Win probabilities for the seated players given `board`.
    ///
    /// Players with pinned hole cards (see [`Game::set_hole_cards`]) keep
    /// them; the others are dealt two from a deck without the board and the
    /// pinned cards. Cards from earlier hands play no part. A rejected call
    /// leaves the game exactly as it was.
    pub fn estimate_equity(
        &mut self,
        board: &[Card],
        num_simulations: u64,
        num_workers: usize,
    ) -> Result<TableEquity, GameError> {
        if num_simulations == 0 {
            return Err(EquityError::ZeroSimulations.into());
        }
        if num_workers == 0 {
            return Err(EquityError::ZeroWorkers.into());
        }
        if board.len() > 5 {
            return Err(EquityError::TooManyBoardCards(board.len()).into());
        }
        let pinned: Vec<HoleCards> = self.players.iter().filter_map(|p| p.fixed_hole).collect();
        validate_table(&pinned, board)?;

        let mut rng = self.rng.clone();
        let known: Vec<Card> =
            pinned.iter().flat_map(|h| h.as_array()).chain(board.iter().copied()).collect();
        let mut deck = Deck::without(&known);
        deck.shuffle_with(&mut rng);
        let mut holes = Vec::with_capacity(self.players.len());
        for p in &self.players {
            let hole = match p.fixed_hole {
                Some(h) => h,
                None => HoleCards::from_slice(&deck.deal(2)?)?,
            };
            holes.push(hole);
        }

        let report = EquityRequest::new(holes.clone(), board.to_vec())
            .with_simulations(num_simulations)
            .with_workers(num_workers)
            .with_seed(rng.random())
            .run()?;
        self.rng = rng;
        Ok(TableEquity {
            holes,
            probabilities: report.probabilities,
            confidence_intervals: report.confidence_intervals,
            player_stats: self.player_stats(),
            strategy_names: self.strategy_names(),
        })
    }
}

fn strategy_seed(seed: u64, seat: usize) -> u64 {
    seed ^ (seat as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
