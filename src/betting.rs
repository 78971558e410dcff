use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// The four betting phases of a Hold'em hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Preflop, Phase::Flop, Phase::Turn, Phase::River];

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Preflop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            Phase::River => None,
        }
    }

    /// Community cards revealed when this phase opens.
    pub const fn cards_dealt(self) -> usize {
        match self {
            Phase::Preflop => 0,
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A decision submitted to the engine.
///
/// `Raise(n)` raises by `n` chips above the current bet, on top of whatever
/// the player already owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(u64),
}

impl Action {
    /// Build an action from a loosely typed name/amount pair, the shape
    /// external strategy code tends to produce.
    ///
    /// ```
    /// use holdem_sim::betting::{Action, BettingError};
    ///
    /// assert_eq!(Action::from_parts("RAISE", 40), Ok(Action::Raise(40)));
    /// assert!(matches!(Action::from_parts("allin", 0), Err(BettingError::UnsupportedAction(_))));
    /// assert_eq!(Action::from_parts("call", -5), Err(BettingError::NegativeAmount(-5)));
    /// ```
    pub fn from_parts(name: &str, amount: i64) -> Result<Action, BettingError> {
        if amount < 0 {
            return Err(BettingError::NegativeAmount(amount));
        }
        match name.trim().to_ascii_lowercase().as_str() {
            "fold" => Ok(Action::Fold),
            "check" => Ok(Action::Check),
            "call" => Ok(Action::Call),
            "raise" => Ok(Action::Raise(amount as u64)),
            _ => Err(BettingError::UnsupportedAction(name.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Raise(n) => write!(f, "raise {n}"),
        }
    }
}

/// What an entry in the action log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Raise,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::SmallBlind => "SB",
            ActionKind::BigBlind => "BB",
            ActionKind::Fold => "Fold",
            ActionKind::Check => "Check",
            ActionKind::Call => "Call",
            ActionKind::Raise => "Raise",
        }
    }
}

/// One applied action. `amount` is the number of chips moved into the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub phase: Phase,
    pub player: usize,
    pub kind: ActionKind,
    pub amount: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BettingError {
    #[error("unknown player {0}")]
    UnknownPlayer(usize),
    #[error("player {0} has folded")]
    PlayerFolded(usize),
    #[error("cannot check while owing {owed}")]
    CheckWhileOwing { owed: u64 },
    #[error("insufficient stack: need {needed}, have {stack}")]
    InsufficientStack { needed: u64, stack: u64 },
    #[error("raise too small: min {min}, got {got}")]
    RaiseTooSmall { min: u64, got: u64 },
    #[error("raise too large: max {max}, got {got}")]
    RaiseTooLarge { max: u64, got: u64 },
    #[error("player {player} has no chips to post the blind")]
    CannotPostBlind { player: usize },
    #[error("need at least 2 players, got {0}")]
    NotEnoughPlayers(usize),
    #[error("no phase after the river")]
    NoNextPhase,
    #[error("unsupported action '{0}'")]
    UnsupportedAction(String),
    #[error("negative amount {0}")]
    NegativeAmount(i64),
}

/// Per-hand betting state machine.
///
/// The engine never advances on its own: the caller deals cards and calls
/// [`BettingEngine::advance_phase`]. Every rejected action leaves the state
/// exactly as it was.
///
/// ```
/// use holdem_sim::betting::{Action, BettingEngine};
///
/// let mut engine = BettingEngine::new(5, 10);
/// engine.start_new_round(&[1000, 1000, 1000]).unwrap();
/// assert_eq!(engine.pot(), 15);
/// assert_eq!(engine.current_bet(), 10);
///
/// // Seat 2 acts first preflop and raises by 20 on top of the 10 it owes.
/// engine.handle_action(2, Action::Raise(20)).unwrap();
/// assert_eq!(engine.current_bet(), 30);
/// assert_eq!(engine.min_raise(), 20);
/// assert!(engine.handle_action(0, Action::Check).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BettingEngine {
    small_blind: u64,
    big_blind: u64,
    phase: Phase,
    pot: u64,
    current_bet: u64,
    min_raise: u64,
    stacks: Vec<u64>,
    contributions: Vec<u64>,
    totals: Vec<u64>,
    folded: Vec<bool>,
    order: Vec<usize>,
    history: Vec<ActionRecord>,
    rounds: u64,
}

impl BettingEngine {
    pub fn new(small_blind: u64, big_blind: u64) -> Self {
        Self {
            small_blind,
            big_blind,
            phase: Phase::Preflop,
            pot: 0,
            current_bet: 0,
            min_raise: big_blind,
            stacks: Vec::new(),
            contributions: Vec::new(),
            totals: Vec::new(),
            folded: Vec::new(),
            order: Vec::new(),
            history: Vec::new(),
            rounds: 0,
        }
    }

    /// Reset for a new hand with the given stacks and post the blinds.
    ///
    /// The seating order rotates by one seat on every call after the first
    /// with the same number of players; `order()[0]` posts the small blind and
    /// `order()[1]` the big blind. A blind larger than the stack is posted
    /// all-in. A player with an empty stack cannot post and the call fails
    /// without touching the previous state.
    pub fn start_new_round(&mut self, stacks: &[u64]) -> Result<(), BettingError> {
        let n = stacks.len();
        if n < 2 {
            return Err(BettingError::NotEnoughPlayers(n));
        }
        let order = if self.rounds > 0 && self.order.len() == n {
            let mut rotated = self.order.clone();
            rotated.rotate_left(1);
            rotated
        } else {
            (0..n).collect::<Vec<usize>>()
        };
        let (sb, bb) = (order[0], order[1]);
        for player in [sb, bb] {
            if stacks[player] == 0 {
                return Err(BettingError::CannotPostBlind { player });
            }
        }

        self.phase = Phase::Preflop;
        self.pot = 0;
        self.stacks = stacks.to_vec();
        self.contributions = vec![0; n];
        self.totals = vec![0; n];
        self.folded = vec![false; n];
        self.order = order;
        self.history.clear();
        self.rounds += 1;

        self.post_blind(sb, self.small_blind, ActionKind::SmallBlind);
        self.post_blind(bb, self.big_blind, ActionKind::BigBlind);
        self.current_bet = self.big_blind;
        self.min_raise = self.big_blind;
        Ok(())
    }

    fn post_blind(&mut self, player: usize, blind: u64, kind: ActionKind) {
        let paid = self.stacks[player].min(blind);
        self.commit(player, paid);
        self.record(player, kind, paid);
    }

    /// Validate and apply one action.
    ///
    /// A `Call` with nothing owed is recorded as a check.
    pub fn handle_action(&mut self, player: usize, action: Action) -> Result<(), BettingError> {
        if player >= self.stacks.len() {
            return Err(BettingError::UnknownPlayer(player));
        }
        if self.folded[player] {
            return Err(BettingError::PlayerFolded(player));
        }
        let owed = self.amount_to_call(player);
        let stack = self.stacks[player];

        match action {
            Action::Fold => {
                self.folded[player] = true;
                self.record(player, ActionKind::Fold, 0);
            }
            Action::Check => {
                if owed > 0 {
                    return Err(BettingError::CheckWhileOwing { owed });
                }
                self.record(player, ActionKind::Check, 0);
            }
            Action::Call if owed == 0 => {
                self.record(player, ActionKind::Check, 0);
            }
            Action::Call => {
                if owed > stack {
                    return Err(BettingError::InsufficientStack { needed: owed, stack });
                }
                self.commit(player, owed);
                self.record(player, ActionKind::Call, owed);
            }
            Action::Raise(increment) => {
                if increment < self.min_raise {
                    return Err(BettingError::RaiseTooSmall { min: self.min_raise, got: increment });
                }
                let max = stack.saturating_sub(owed);
                if increment > max {
                    return Err(BettingError::RaiseTooLarge { max, got: increment });
                }
                let cost = owed + increment;
                self.commit(player, cost);
                self.current_bet += increment;
                self.min_raise = increment;
                self.record(player, ActionKind::Raise, cost);
            }
        }
        Ok(())
    }

    /// Move to the next phase: per-phase contributions and the bet level reset.
    pub fn advance_phase(&mut self) -> Result<Phase, BettingError> {
        let next = self.phase.next().ok_or(BettingError::NoNextPhase)?;
        self.phase = next;
        self.contributions.iter_mut().for_each(|c| *c = 0);
        self.current_bet = 0;
        self.min_raise = self.big_blind;
        Ok(next)
    }

    fn commit(&mut self, player: usize, chips: u64) {
        self.stacks[player] -= chips;
        self.contributions[player] += chips;
        self.totals[player] += chips;
        self.pot += chips;
    }

    fn record(&mut self, player: usize, kind: ActionKind, amount: u64) {
        trace!(phase = %self.phase, player, action = kind.label(), amount, pot = self.pot, "action");
        self.history.push(ActionRecord { phase: self.phase, player, kind, amount });
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    pub fn num_players(&self) -> usize {
        self.stacks.len()
    }

    pub fn stacks(&self) -> &[u64] {
        &self.stacks
    }

    pub fn stack(&self, player: usize) -> Option<u64> {
        self.stacks.get(player).copied()
    }

    /// Chips put in during the current phase.
    pub fn contribution(&self, player: usize) -> Option<u64> {
        self.contributions.get(player).copied()
    }

    /// Chips put in over the whole hand.
    pub fn total_contribution(&self, player: usize) -> Option<u64> {
        self.totals.get(player).copied()
    }

    pub fn is_folded(&self, player: usize) -> bool {
        self.folded.get(player).copied().unwrap_or(true)
    }

    pub fn amount_to_call(&self, player: usize) -> u64 {
        let contributed = self.contributions.get(player).copied().unwrap_or(0);
        self.current_bet.saturating_sub(contributed)
    }

    /// Players still holding cards, in seat-index order.
    pub fn active_players(&self) -> Vec<usize> {
        (0..self.folded.len()).filter(|&p| !self.folded[p]).collect()
    }

    pub fn live_count(&self) -> usize {
        self.folded.iter().filter(|f| !**f).count()
    }

    /// Seating order for the current hand, small blind first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Position of `player` in this hand's seating order.
    pub fn seat_of(&self, player: usize) -> Option<usize> {
        self.order.iter().position(|&p| p == player)
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn history_for(&self, phase: Phase) -> impl Iterator<Item = &ActionRecord> {
        self.history.iter().filter(move |r| r.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_engine(n: usize) -> BettingEngine {
        let mut e = BettingEngine::new(5, 10);
        e.start_new_round(&vec![1000; n]).unwrap();
        e
    }

    fn pot_matches_contributions(e: &BettingEngine) -> bool {
        let sum: u64 = (0..e.num_players()).filter_map(|p| e.total_contribution(p)).sum();
        sum == e.pot()
    }

    #[test]
    fn blinds_posted_from_first_two_seats() {
        let e = mk_engine(3);
        assert_eq!(e.stack(0), Some(995));
        assert_eq!(e.stack(1), Some(990));
        assert_eq!(e.stack(2), Some(1000));
        assert_eq!(e.pot(), 15);
        assert_eq!(e.current_bet(), 10);
        assert_eq!(e.amount_to_call(0), 5);
        assert_eq!(e.amount_to_call(1), 0);
        assert_eq!(e.history()[0].kind, ActionKind::SmallBlind);
        assert_eq!(e.history()[1].kind, ActionKind::BigBlind);
    }

    #[test]
    fn order_rotates_each_round() {
        let mut e = mk_engine(3);
        assert_eq!(e.order(), &[0, 1, 2]);
        e.start_new_round(&[1000; 3]).unwrap();
        assert_eq!(e.order(), &[1, 2, 0]);
        assert_eq!(e.stack(1), Some(995));
        assert_eq!(e.stack(2), Some(990));
        e.start_new_round(&[1000; 3]).unwrap();
        assert_eq!(e.order(), &[2, 0, 1]);
        assert_eq!(e.seat_of(0), Some(1));
    }

    #[test]
    fn short_blind_posts_all_in() {
        let mut e = BettingEngine::new(5, 10);
        e.start_new_round(&[3, 1000]).unwrap();
        assert_eq!(e.stack(0), Some(0));
        assert_eq!(e.pot(), 13);
        assert_eq!(e.current_bet(), 10);
    }

    #[test]
    fn empty_stack_cannot_post_and_state_is_kept() {
        let mut e = mk_engine(3);
        let before_order = e.order().to_vec();
        let err = e.start_new_round(&[1000, 0, 1000]).unwrap_err();
        assert_eq!(err, BettingError::CannotPostBlind { player: 1 });
        assert_eq!(e.order(), before_order.as_slice());
        assert_eq!(e.pot(), 15);
        assert!(matches!(
            BettingEngine::new(5, 10).start_new_round(&[100]),
            Err(BettingError::NotEnoughPlayers(1))
        ));
    }

    #[test]
    fn check_only_when_nothing_owed() {
        let mut e = mk_engine(3);
        assert_eq!(e.handle_action(2, Action::Check), Err(BettingError::CheckWhileOwing { owed: 10 }));
        assert!(e.handle_action(1, Action::Check).is_ok());
        assert!(pot_matches_contributions(&e));
    }

    #[test]
    fn raise_sets_min_raise_to_last_increment() {
        let mut e = mk_engine(3);
        e.handle_action(2, Action::Raise(30)).unwrap();
        assert_eq!(e.stack(2), Some(960));
        assert_eq!(e.current_bet(), 40);
        assert_eq!(e.min_raise(), 30);
        assert_eq!(
            e.handle_action(0, Action::Raise(20)),
            Err(BettingError::RaiseTooSmall { min: 30, got: 20 })
        );
        e.handle_action(0, Action::Raise(50)).unwrap();
        assert_eq!(e.current_bet(), 90);
        assert_eq!(e.contribution(0), Some(90));
        assert_eq!(e.min_raise(), 50);
        assert!(pot_matches_contributions(&e));
    }

    #[test]
    fn rejected_actions_change_nothing() {
        let mut e = BettingEngine::new(5, 10);
        e.start_new_round(&[1000, 1000, 25]).unwrap();
        let pot = e.pot();
        let history = e.history().len();
        assert_eq!(
            e.handle_action(2, Action::Raise(20)),
            Err(BettingError::RaiseTooLarge { max: 15, got: 20 })
        );
        e.handle_action(0, Action::Raise(500)).unwrap();
        assert_eq!(
            e.handle_action(2, Action::Call),
            Err(BettingError::InsufficientStack { needed: 510, stack: 25 })
        );
        assert_eq!(e.stack(2), Some(25));
        assert_eq!(e.pot(), pot + 505);
        assert_eq!(e.history().len(), history + 1);
    }

    #[test]
    fn folded_player_cannot_act() {
        let mut e = mk_engine(2);
        e.handle_action(0, Action::Fold).unwrap();
        assert!(e.is_folded(0));
        assert_eq!(e.handle_action(0, Action::Call), Err(BettingError::PlayerFolded(0)));
        assert_eq!(e.active_players(), vec![1]);
        assert_eq!(e.handle_action(7, Action::Fold), Err(BettingError::UnknownPlayer(7)));
    }

    #[test]
    fn call_with_nothing_owed_is_logged_as_check() {
        let mut e = mk_engine(2);
        e.handle_action(1, Action::Call).unwrap();
        assert_eq!(e.history().last().map(|r| r.kind), Some(ActionKind::Check));
        assert_eq!(e.pot(), 15);
    }

    #[test]
    fn advance_phase_resets_bet_level() {
        let mut e = mk_engine(2);
        e.handle_action(0, Action::Call).unwrap();
        assert_eq!(e.advance_phase(), Ok(Phase::Flop));
        assert_eq!(e.current_bet(), 0);
        assert_eq!(e.contribution(0), Some(0));
        assert_eq!(e.total_contribution(0), Some(10));
        assert_eq!(e.pot(), 20);
        e.handle_action(0, Action::Raise(10)).unwrap();
        assert_eq!(e.history_for(Phase::Flop).count(), 1);
        assert_eq!(e.history_for(Phase::Preflop).count(), 3);
        e.advance_phase().unwrap();
        e.advance_phase().unwrap();
        assert_eq!(e.advance_phase(), Err(BettingError::NoNextPhase));
    }
}
