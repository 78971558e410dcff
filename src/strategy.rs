//! Strategies: pluggable decision makers seated at the table.
//!
//! The orchestrator only depends on the [`Strategy`] trait. The shared
//! strength helpers live here so every style reads hands the same way.

use crate::betting::{Action, Phase};
use crate::cards::{Card, Rank};
use crate::evaluator::{best_category, score};
use crate::hand::HoleCards;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod styles;

pub use styles::{
    Aggressive, Bluffing, Conservative, LooseAggressive, RandomStrategy, Tight, TightAggressive,
};

/// Everything a strategy may look at when it is asked to act.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub hole: &'a HoleCards,
    pub board: &'a [Card],
    pub phase: Phase,
    pub pot: u64,
    pub current_bet: u64,
    pub to_call: u64,
    pub stack: u64,
    pub min_raise: u64,
}

impl DecisionContext<'_> {
    pub fn hand_strength(&self) -> f64 {
        evaluate_hand_strength(self.hole, self.board)
    }

    pub fn pot_odds(&self) -> f64 {
        pot_odds(self.to_call, self.pot)
    }

    /// Check when nothing is owed, fold otherwise.
    pub fn give_up(&self) -> Action {
        if self.to_call == 0 {
            Action::Check
        } else {
            Action::Fold
        }
    }

    /// Stay in the hand for the current price, or give up if it cannot be paid.
    pub fn call(&self) -> Action {
        match self.to_call {
            0 => Action::Check,
            owed if owed <= self.stack => Action::Call,
            _ => Action::Fold,
        }
    }

    /// Raise so the bet reaches roughly `multiple` times the current bet.
    ///
    /// The increment is at least the minimum raise and at most what the stack
    /// allows after calling; if even a minimum raise is unaffordable this
    /// degrades to [`DecisionContext::call`].
    pub fn raise_to_multiple(&self, multiple: f64) -> Action {
        let target = (self.current_bet as f64 * multiple).round() as u64;
        let increment = target.saturating_sub(self.current_bet).max(self.min_raise);
        let max = self.stack.saturating_sub(self.to_call);
        if self.min_raise == 0 || max < self.min_raise {
            return self.call();
        }
        Action::Raise(increment.min(max))
    }

    pub fn min_raise(&self) -> Action {
        self.raise_to_multiple(0.0)
    }
}

/// A seat controller: maps what it can see to an action.
pub trait Strategy: Send {
    fn name(&self) -> &str;
    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action;
}

/// Preflop strength of two hole cards in `0.0..=1.0`.
///
/// ```
/// use holdem_sim::hand::HoleCards;
/// use holdem_sim::strategy::evaluate_preflop_strength;
///
/// let jacks: HoleCards = "Jh Jd".parse().unwrap();
/// assert_eq!(evaluate_preflop_strength(&jacks), 1.0);
/// let junk: HoleCards = "7h 2d".parse().unwrap();
/// assert_eq!(evaluate_preflop_strength(&junk), 0.2);
/// ```
pub fn evaluate_preflop_strength(hole: &HoleCards) -> f64 {
    let (a, b) = (hole.first(), hole.second());
    let (v1, v2) = (a.rank().value(), b.rank().value());
    let suited = a.suit() == b.suit();
    let high = v1.max(v2);
    let low = v1.min(v2);
    let gap = high - low;

    if v1 == v2 {
        return if v1 >= 11 {
            1.0
        } else if v1 >= 7 {
            0.8
        } else {
            0.6
        };
    }
    if suited && gap == 1 {
        return 0.75;
    }
    if high == Rank::Ace.value() && low >= 10 {
        return if suited { 0.7 } else { 0.6 };
    }
    if high >= 11 && low >= 10 {
        return if suited { 0.65 } else { 0.55 };
    }
    if suited && high >= 10 {
        return 0.55;
    }
    if !suited && gap == 1 {
        return 0.5;
    }
    if suited {
        0.3
    } else {
        0.2
    }
}

/// Strength of hole cards plus board in `0.0..=1.0`.
///
/// Preflop this is [`evaluate_preflop_strength`]. Afterwards it is the made
/// category over ten (a royal flush counts as ten) plus up to 0.1 for the
/// highest hole card.
pub fn evaluate_hand_strength(hole: &HoleCards, board: &[Card]) -> f64 {
    if board.is_empty() {
        return evaluate_preflop_strength(hole);
    }
    let cards = hole.with_board(board);
    let category = match score(&cards) {
        Ok(s) if s.is_royal() => 10,
        Ok(s) => s.category().value(),
        Err(_) => best_category(&cards).value(),
    };
    let base = category as f64 / 10.0;
    (base + high_card_bonus(hole)).min(1.0)
}

fn high_card_bonus(hole: &HoleCards) -> f64 {
    let high = hole.first().rank().max(hole.second().rank()).value();
    (high - 2) as f64 / 12.0 * 0.1
}

/// Share of the final pot the caller would be paying: `to_call / (pot + to_call)`.
pub fn pot_odds(to_call: u64, pot: u64) -> f64 {
    if to_call == 0 {
        return 0.0;
    }
    to_call as f64 / (pot + to_call) as f64
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrategyParseError {
    #[error("unknown strategy '{0}'")]
    Unknown(String),
}

/// Registry of the built-in styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Conservative,
    Aggressive,
    Bluffing,
    Tight,
    TightAggressive,
    LooseAggressive,
    Random,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::Conservative,
        StrategyKind::Aggressive,
        StrategyKind::Bluffing,
        StrategyKind::Tight,
        StrategyKind::TightAggressive,
        StrategyKind::LooseAggressive,
        StrategyKind::Random,
    ];

    const DEFAULT_LINEUP: [StrategyKind; 5] = [
        StrategyKind::Conservative,
        StrategyKind::Aggressive,
        StrategyKind::Bluffing,
        StrategyKind::Tight,
        StrategyKind::Random,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::Conservative => "conservative",
            StrategyKind::Aggressive => "aggressive",
            StrategyKind::Bluffing => "bluffing",
            StrategyKind::Tight => "tight",
            StrategyKind::TightAggressive => "tight-aggressive",
            StrategyKind::LooseAggressive => "loose-aggressive",
            StrategyKind::Random => "random",
        }
    }

    /// Instantiate the style. Styles that roll dice use `seed` when given.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Conservative => Box::new(Conservative),
            StrategyKind::Aggressive => Box::new(Aggressive),
            StrategyKind::Bluffing => Box::new(Bluffing::new(seed)),
            StrategyKind::Tight => Box::new(Tight),
            StrategyKind::TightAggressive => Box::new(TightAggressive),
            StrategyKind::LooseAggressive => Box::new(LooseAggressive::new(seed)),
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
        }
    }

    /// Conservative, Aggressive, Bluffing, Tight, Random, repeating as needed.
    ///
    /// ```
    /// use holdem_sim::strategy::StrategyKind;
    ///
    /// let lineup = StrategyKind::default_lineup(6);
    /// assert_eq!(lineup[0], StrategyKind::Conservative);
    /// assert_eq!(lineup[5], StrategyKind::Conservative);
    /// ```
    pub fn default_lineup(players: usize) -> Vec<StrategyKind> {
        Self::DEFAULT_LINEUP.iter().copied().cycle().take(players).collect()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| StrategyParseError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn hole(s: &str) -> HoleCards {
        s.parse().unwrap()
    }

    fn ctx<'a>(hole: &'a HoleCards, board: &'a [Card], to_call: u64, stack: u64) -> DecisionContext<'a> {
        DecisionContext {
            hole,
            board,
            phase: Phase::Preflop,
            pot: 30,
            current_bet: 20,
            to_call,
            stack,
            min_raise: 10,
        }
    }

    #[test]
    fn preflop_table() {
        assert_eq!(evaluate_preflop_strength(&hole("8h 8d")), 0.8);
        assert_eq!(evaluate_preflop_strength(&hole("3h 3d")), 0.6);
        assert_eq!(evaluate_preflop_strength(&hole("9h 8h")), 0.75);
        assert_eq!(evaluate_preflop_strength(&hole("Ah Qh")), 0.7);
        assert_eq!(evaluate_preflop_strength(&hole("As Qh")), 0.6);
        assert_eq!(evaluate_preflop_strength(&hole("Ks Jh")), 0.55);
        assert_eq!(evaluate_preflop_strength(&hole("Kh Jh")), 0.65);
        assert_eq!(evaluate_preflop_strength(&hole("10h 4h")), 0.55);
        assert_eq!(evaluate_preflop_strength(&hole("9s 8h")), 0.5);
        assert_eq!(evaluate_preflop_strength(&hole("9h 4h")), 0.3);
    }

    #[test]
    fn postflop_strength_uses_category_and_high_card() {
        let h = hole("Ah Ad");
        let board = parse_cards("7c 8s 2d").unwrap();
        let s = evaluate_hand_strength(&h, &board);
        assert!((s - 0.3).abs() < 1e-9, "{s}");

        let royal = hole("As Ks");
        let board = parse_cards("Qs Js 10s").unwrap();
        assert_eq!(evaluate_hand_strength(&royal, &board), 1.0);
    }

    #[test]
    fn pot_odds_formula() {
        assert_eq!(pot_odds(0, 100), 0.0);
        assert!((pot_odds(50, 150) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn sizing_respects_stack_and_min_raise() {
        let h = hole("Ah Kd");
        let c = ctx(&h, &[], 10, 1000);
        assert_eq!(c.raise_to_multiple(3.0), Action::Raise(40));
        assert_eq!(c.min_raise(), Action::Raise(10));

        let short = ctx(&h, &[], 10, 30);
        assert_eq!(short.raise_to_multiple(3.0), Action::Raise(20));

        let broke = ctx(&h, &[], 10, 15);
        assert_eq!(broke.raise_to_multiple(3.0), Action::Call);

        let cannot_call = ctx(&h, &[], 10, 5);
        assert_eq!(cannot_call.call(), Action::Fold);
        assert_eq!(ctx(&h, &[], 0, 5).give_up(), Action::Check);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Tight_Aggressive".parse::<StrategyKind>(), Ok(StrategyKind::TightAggressive));
        assert_eq!("random".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert!("maniac".parse::<StrategyKind>().is_err());
        for kind in StrategyKind::ALL {
            assert_eq!(kind.build(Some(1)).name(), kind.name());
        }
    }
}
