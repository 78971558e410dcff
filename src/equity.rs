//! Monte Carlo equity: win probabilities for known hole cards over random
//! completions of the board.

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::evaluator::{score, EvalError, HandScore};
use crate::hand::{validate_table, HandError, HoleCards};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, info_span};

const Z_95: f64 = 1.96;
/// Half-width used when the normal approximation has no usable standard error.
const FALLBACK_HALF_WIDTH: f64 = 0.05;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EquityError {
    #[error("number of simulations must be positive")]
    ZeroSimulations,
    #[error("number of workers must be positive")]
    ZeroWorkers,
    #[error("board has {0} cards, at most 5 allowed")]
    TooManyBoardCards(usize),
    #[error("no hands to simulate")]
    NoPlayers,
    #[error("invalid cards: {0}")]
    Hand(#[from] HandError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("deadline passed after {completed} trials")]
    DeadlineExceeded { completed: u64 },
}

/// Inputs for one equity estimate.
///
/// ```
/// use holdem_sim::cards::parse_cards;
/// use holdem_sim::equity::EquityRequest;
/// use holdem_sim::hand::HoleCards;
///
/// let holes: Vec<HoleCards> = vec!["As Ad".parse().unwrap(), "7c 2d".parse().unwrap()];
/// let board = parse_cards("Kh 9s 4c").unwrap();
/// let report = EquityRequest::new(holes, board)
///     .with_simulations(2_000)
///     .with_workers(2)
///     .with_seed(1)
///     .run()
///     .unwrap();
/// assert!(report.probabilities[0] > report.probabilities[1]);
/// ```
#[derive(Debug, Clone)]
pub struct EquityRequest {
    holes: Vec<HoleCards>,
    board: Vec<Card>,
    num_simulations: u64,
    num_workers: usize,
    seed: Option<u64>,
    deadline: Option<Instant>,
}

impl EquityRequest {
    pub fn new(holes: Vec<HoleCards>, board: Vec<Card>) -> Self {
        Self { holes, board, num_simulations: 1000, num_workers: 4, seed: None, deadline: None }
    }

    pub fn with_simulations(mut self, n: u64) -> Self {
        self.num_simulations = n;
        self
    }

    pub fn with_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Seed every worker deterministically; results become reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Abort remaining trials once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn holes(&self) -> &[HoleCards] {
        &self.holes
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// Reject degenerate inputs before any work is scheduled.
    pub fn validate(&self) -> Result<(), EquityError> {
        if self.num_simulations == 0 {
            return Err(EquityError::ZeroSimulations);
        }
        if self.num_workers == 0 {
            return Err(EquityError::ZeroWorkers);
        }
        if self.board.len() > 5 {
            return Err(EquityError::TooManyBoardCards(self.board.len()));
        }
        if self.holes.is_empty() {
            return Err(EquityError::NoPlayers);
        }
        validate_table(&self.holes, &self.board)?;
        let remaining = 52usize.saturating_sub(2 * self.holes.len() + self.board.len());
        let wanted = 5 - self.board.len();
        if wanted > remaining {
            return Err(DeckError::Exhausted { wanted, remaining }.into());
        }
        Ok(())
    }

    pub fn run(&self) -> Result<EquityReport, EquityError> {
        estimate(self)
    }
}

/// Point estimates and 95% intervals, one entry per hand in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityReport {
    pub probabilities: Vec<f64>,
    pub confidence_intervals: Vec<(f64, f64)>,
    pub simulations: u64,
}

/// Shorthand for [`EquityRequest`] with fresh randomness.
pub fn estimate_win_probabilities(
    holes: &[HoleCards],
    board: &[Card],
    num_simulations: u64,
    num_workers: usize,
) -> Result<EquityReport, EquityError> {
    EquityRequest::new(holes.to_vec(), board.to_vec())
        .with_simulations(num_simulations)
        .with_workers(num_workers)
        .run()
}

/// Run the simulation described by `req`.
///
/// Trials are split evenly across `num_workers` batches run on the rayon
/// pool, the first `num_simulations % num_workers` workers taking one extra.
/// Each worker owns its RNG and decks and returns a private credit vector;
/// the vectors are summed in worker order. Ties split the credit for a trial evenly.
pub fn estimate(req: &EquityRequest) -> Result<EquityReport, EquityError> {
    req.validate()?;
    let _span = info_span!(
        "equity",
        players = req.holes.len(),
        board = req.board.len(),
        simulations = req.num_simulations,
        workers = req.num_workers
    )
    .entered();

    let seed = req.seed.unwrap_or_else(|| rand::rng().random());
    let workers = req.num_workers;
    let base = req.num_simulations / workers as u64;
    let extra = req.num_simulations % workers as u64;

    // Logical workers are batches on the global rayon pool, not OS threads.
    let partials: Vec<Vec<f64>> = (0..workers)
        .into_par_iter()
        .map(|w| {
            let trials = base + u64::from((w as u64) < extra);
            run_worker(req, seed, w as u64, trials)
        })
        .collect::<Result<Vec<_>, EquityError>>()?;

    let mut credit = vec![0.0f64; req.holes.len()];
    for partial in &partials {
        for (total, c) in credit.iter_mut().zip(partial) {
            *total += c;
        }
    }

    let n = req.num_simulations;
    let probabilities: Vec<f64> = credit.iter().map(|c| c / n as f64).collect();
    let confidence_intervals = probabilities.iter().map(|&p| confidence_interval(p, n)).collect();
    info!(?probabilities, "equity estimate finished");
    Ok(EquityReport { probabilities, confidence_intervals, simulations: n })
}

fn run_worker(
    req: &EquityRequest,
    seed: u64,
    worker: u64,
    trials: u64,
) -> Result<Vec<f64>, EquityError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(worker);

    let known = req.holes.iter().flat_map(|h| h.as_array()).chain(req.board.iter().copied());
    let known: Vec<Card> = known.collect();
    let unseen = Deck::without(&known);
    let missing = 5 - req.board.len();

    let mut credit = vec![0.0f64; req.holes.len()];
    let mut cards: Vec<Card> = Vec::with_capacity(7);
    let mut scores: Vec<HandScore> = Vec::with_capacity(req.holes.len());

    for done in 0..trials {
        if let Some(deadline) = req.deadline {
            if Instant::now() >= deadline {
                return Err(EquityError::DeadlineExceeded { completed: done });
            }
        }
        let mut deck = unseen.clone();
        deck.shuffle_with(&mut rng);
        let mut board = req.board.clone();
        board.extend(deck.deal(missing)?);

        scores.clear();
        for hole in &req.holes {
            cards.clear();
            cards.extend_from_slice(&hole.as_array());
            cards.extend_from_slice(&board);
            scores.push(score(&cards)?);
        }

        let best = scores.iter().max().copied();
        let winners = scores.iter().filter(|s| Some(**s) == best).count();
        let share = 1.0 / winners as f64;
        for (c, s) in credit.iter_mut().zip(&scores) {
            if Some(*s) == best {
                *c += share;
            }
        }
    }
    debug!(worker, trials, "equity worker done");
    Ok(credit)
}

/// 95% normal-approximation interval for a proportion `p` estimated from
/// `n` trials, clamped to `[0, 1]`.
///
/// `p` of exactly 0 or 1 collapses to a point. When the standard error is
/// unusable the interval falls back to `p ± 0.05`.
///
/// ```
/// use holdem_sim::equity::confidence_interval;
///
/// assert_eq!(confidence_interval(1.0, 50), (1.0, 1.0));
/// let (lo, hi) = confidence_interval(0.5, 10_000);
/// assert!((hi - lo - 2.0 * 1.96 * 0.005).abs() < 1e-9);
/// assert_eq!(confidence_interval(0.5, 0), (0.45, 0.55));
/// ```
pub fn confidence_interval(p: f64, n: u64) -> (f64, f64) {
    if p <= 0.0 || p >= 1.0 {
        let p = p.clamp(0.0, 1.0);
        return (p, p);
    }
    let se = (p * (1.0 - p) / n as f64).sqrt();
    let half = if se.is_finite() && se > 0.0 { Z_95 * se } else { FALLBACK_HALF_WIDTH };
    ((p - half).max(0.0), (p + half).min(1.0))
}
