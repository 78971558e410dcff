use super::{evaluate_preflop_strength, DecisionContext, Strategy};
use crate::betting::{Action, Phase};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

/// Plays only strong hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Conservative;

impl Strategy for Conservative {
    fn name(&self) -> &str {
        "conservative"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        let strength = ctx.hand_strength();
        if strength > 0.85 {
            ctx.raise_to_multiple(2.0)
        } else if strength > 0.7 && ctx.pot_odds() < 0.25 {
            ctx.call()
        } else {
            ctx.give_up()
        }
    }
}

/// Raises a wide range and calls speculative hands at a fair price.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggressive;

impl Strategy for Aggressive {
    fn name(&self) -> &str {
        "aggressive"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        let strength = ctx.hand_strength();
        if strength > 0.6 {
            ctx.raise_to_multiple(3.0)
        } else if strength > 0.4 {
            ctx.raise_to_multiple(1.5)
        } else if ctx.pot_odds() < 0.4 {
            ctx.call()
        } else {
            ctx.give_up()
        }
    }
}

/// Fires a random raise 30% of the time regardless of cards.
#[derive(Debug)]
pub struct Bluffing {
    rng: StdRng,
}

impl Bluffing {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl Strategy for Bluffing {
    fn name(&self) -> &str {
        "bluffing"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        if self.rng.random::<f64>() < 0.3 {
            return ctx.raise_to_multiple(2.0);
        }
        let strength = ctx.hand_strength();
        if strength > 0.7 {
            ctx.raise_to_multiple(3.0)
        } else if strength > 0.4 || ctx.pot_odds() < 0.4 {
            ctx.call()
        } else {
            ctx.give_up()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tight;

impl Strategy for Tight {
    fn name(&self) -> &str {
        "tight"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        let strength = ctx.hand_strength();
        let odds = ctx.pot_odds();
        if strength > 0.75 {
            ctx.raise_to_multiple(2.0)
        } else if (strength > 0.55 && odds < 0.4) || (strength > 0.4 && odds < 0.2) {
            ctx.call()
        } else if strength > 0.3 && odds < 0.15 {
            // semi-bluff
            ctx.raise_to_multiple(2.0)
        } else {
            ctx.give_up()
        }
    }
}

/// Enters selectively, then keeps betting with lower thresholds each street.
#[derive(Debug, Clone, Copy, Default)]
pub struct TightAggressive;

impl TightAggressive {
    fn threshold(phase: Phase) -> f64 {
        match phase {
            Phase::Preflop => 0.6,
            Phase::Flop => 0.55,
            Phase::Turn => 0.48,
            Phase::River => 0.43,
        }
    }
}

impl Strategy for TightAggressive {
    fn name(&self) -> &str {
        "tight-aggressive"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        if ctx.hand_strength() >= Self::threshold(ctx.phase) {
            ctx.min_raise()
        } else {
            ctx.give_up()
        }
    }
}

/// Plays many hands preflop and bluffs more often as the board fills in.
#[derive(Debug)]
pub struct LooseAggressive {
    rng: StdRng,
}

impl LooseAggressive {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }

    /// (value threshold, bluff probability) after the flop.
    fn postflop_params(phase: Phase) -> (f64, f64) {
        match phase {
            Phase::Flop => (0.35, 0.2),
            Phase::Turn => (0.45, 0.25),
            Phase::River | Phase::Preflop => (0.5, 0.3),
        }
    }
}

impl Strategy for LooseAggressive {
    fn name(&self) -> &str {
        "loose-aggressive"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        if ctx.phase == Phase::Preflop {
            let strength = evaluate_preflop_strength(ctx.hole);
            return if strength >= 0.6 {
                ctx.min_raise()
            } else if strength >= 0.35 {
                ctx.call()
            } else if self.rng.random::<f64>() < 0.15 {
                ctx.min_raise()
            } else {
                ctx.give_up()
            };
        }

        let (threshold, bluff) = Self::postflop_params(ctx.phase);
        if ctx.hand_strength() >= threshold || self.rng.random::<f64>() < bluff {
            ctx.min_raise()
        } else {
            ctx.give_up()
        }
    }
}

/// Picks fold, call or raise uniformly; raises are 2 to 5 times the bet.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        match self.rng.random_range(0..3) {
            0 => ctx.give_up(),
            1 => ctx.call(),
            _ => {
                let multiple = self.rng.random_range(2..=5);
                ctx.raise_to_multiple(multiple as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Card};
    use crate::hand::HoleCards;

    fn ctx<'a>(hole: &'a HoleCards, board: &'a [Card], phase: Phase, to_call: u64) -> DecisionContext<'a> {
        DecisionContext {
            hole,
            board,
            phase,
            pot: 100,
            current_bet: 20,
            to_call,
            stack: 1000,
            min_raise: 10,
        }
    }

    #[test]
    fn conservative_raises_only_premium() {
        let aces: HoleCards = "Ah Ad".parse().unwrap();
        let junk: HoleCards = "7h 2d".parse().unwrap();
        let mut s = Conservative;
        assert!(matches!(s.decide(&ctx(&aces, &[], Phase::Preflop, 20)), Action::Raise(_)));
        assert_eq!(s.decide(&ctx(&junk, &[], Phase::Preflop, 20)), Action::Fold);
        assert_eq!(s.decide(&ctx(&junk, &[], Phase::Preflop, 0)), Action::Check);
    }

    #[test]
    fn aggressive_calls_cheap_junk() {
        let junk: HoleCards = "7h 2d".parse().unwrap();
        // pot odds 10 / 110 < 0.4
        assert_eq!(Aggressive.decide(&ctx(&junk, &[], Phase::Preflop, 10)), Action::Call);
    }

    #[test]
    fn tight_aggressive_thresholds_drop_by_street() {
        let hole: HoleCards = "Kh 9d".parse().unwrap();
        // One pair of nines: 0.2 + 0.0917
        let board = parse_cards("9c 4s 2d").unwrap();
        let mut s = TightAggressive;
        assert_eq!(s.decide(&ctx(&hole, &board, Phase::Flop, 10)), Action::Fold);
        let board = parse_cards("9c 4s 2d Kc").unwrap();
        // Two pair: 0.3 + 0.0917
        assert_eq!(s.decide(&ctx(&hole, &board, Phase::Turn, 10)), Action::Fold);
        let board = parse_cards("9c 4s 2d Kc 9h").unwrap();
        // Full house
        assert!(matches!(s.decide(&ctx(&hole, &board, Phase::River, 10)), Action::Raise(10)));
    }

    #[test]
    fn seeded_styles_are_reproducible() {
        let hole: HoleCards = "7h 2d".parse().unwrap();
        let c = ctx(&hole, &[], Phase::Preflop, 20);
        let run = |seed| {
            let mut r = RandomStrategy::new(Some(seed));
            (0..32).map(|_| r.decide(&c)).collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));

        let mut b1 = Bluffing::new(Some(3));
        let mut b2 = Bluffing::new(Some(3));
        for _ in 0..32 {
            assert_eq!(b1.decide(&c), b2.decide(&c));
        }
    }

    #[test]
    fn random_raises_stay_in_range() {
        let hole: HoleCards = "7h 2d".parse().unwrap();
        let c = ctx(&hole, &[], Phase::Preflop, 20);
        let mut r = RandomStrategy::new(Some(11));
        for _ in 0..200 {
            match r.decide(&c) {
                Action::Raise(inc) => assert!((20..=80).contains(&inc), "{inc}"),
                Action::Fold | Action::Call => {}
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
