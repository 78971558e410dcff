use holdem_sim::betting::{Action, ActionKind, Phase};
use holdem_sim::cards::parse_cards;
use holdem_sim::config::{ConfigError, SimulationConfig, TableConfig};
use holdem_sim::deck::Deck;
use holdem_sim::engine::SimulationEngine;
use holdem_sim::evaluator::Category;
use holdem_sim::game::{Game, GameError, HandEnd, HandResult};
use holdem_sim::hand::HoleCards;
use holdem_sim::strategy::{DecisionContext, Strategy, StrategyKind};

/// Never folds, never raises.
struct CallingStation;

impl Strategy for CallingStation {
    fn name(&self) -> &str {
        "calling-station"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        ctx.call()
    }
}

/// Min-raises once per street, then calls.
struct StreetRaiser {
    last: Option<Phase>,
}

impl Strategy for StreetRaiser {
    fn name(&self) -> &str {
        "street-raiser"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Action {
        if self.last == Some(ctx.phase) {
            return ctx.call();
        }
        self.last = Some(ctx.phase);
        ctx.min_raise()
    }
}

fn contributed(result: &HandResult, player: usize) -> u64 {
    result.betting_history.iter().filter(|r| r.player == player).map(|r| r.amount).sum()
}

/// Aces for seat 0, 7-2 for seat 1, a dry board that pairs neither.
fn aces_vs_seven_deuce() -> Deck {
    let cards = parse_cards("As Ad 7c 2d 3h Kc 9d 4s 5h Jh 6c 8s").unwrap();
    Deck::stacked(&cards).unwrap()
}

#[test]
fn pocket_aces_take_the_pot_at_showdown() {
    let strategies: Vec<Box<dyn Strategy>> = vec![Box::new(CallingStation), Box::new(CallingStation)];
    let mut game = Game::new(TableConfig::default(), strategies, Some(1)).unwrap();
    let result = game.simulate_hand_with_deck(aces_vs_seven_deuce()).unwrap();

    assert_eq!(result.end, HandEnd::Showdown);
    assert_eq!(result.winners, vec![0]);
    assert_eq!(result.board, parse_cards("Kc 9d 4s Jh 8s").unwrap());
    assert_eq!(result.hand_strengths[&0].category(), Category::OnePair);
    assert_eq!(result.hand_strengths[&1].category(), Category::HighCard);
    assert_eq!(result.pot, 20);
    assert_eq!(result.profits, vec![10, -10]);
    assert_eq!(result.profits[0], (result.pot - contributed(&result, 0)) as i64);
    assert_eq!(game.players()[0].hole(), Some("As Ad".parse::<HoleCards>().unwrap()));
}

#[test]
fn raised_pot_still_pays_pot_minus_contribution() {
    let strategies: Vec<Box<dyn Strategy>> =
        vec![Box::new(StreetRaiser { last: None }), Box::new(CallingStation)];
    let mut game = Game::new(TableConfig::default(), strategies, Some(1)).unwrap();
    let result = game.simulate_hand_with_deck(aces_vs_seven_deuce()).unwrap();

    assert_eq!(result.winners, vec![0]);
    let raises = result.betting_history.iter().filter(|r| r.kind == ActionKind::Raise).count();
    assert_eq!(raises, 4);
    let mine = contributed(&result, 0);
    assert_eq!(mine, contributed(&result, 1));
    assert_eq!(result.pot, 2 * mine);
    assert_eq!(result.profits[0], (result.pot - mine) as i64);
    assert_eq!(result.profits[1], -(mine as i64));

    // Raising with one pair counts as a bluff, and this one got paid.
    let stats = &result.player_stats[0];
    assert_eq!(stats.bluffs_attempted(), 1);
    assert_eq!(stats.bluffs_successful(), 1);
    assert_eq!(result.player_stats[1].bluffs_attempted(), 0);
}

#[test]
fn seeded_hands_are_zero_sum_and_consistent() {
    let lineup = StrategyKind::ALL;
    let mut game = Game::with_lineup(TableConfig::default(), &lineup, Some(2024)).unwrap();
    let mut profit_totals = vec![0i64; lineup.len()];

    for hand in 1..=150u64 {
        let result = game.simulate_hand().unwrap();
        assert_eq!(result.hand_number, hand);
        assert_eq!(result.profits.iter().sum::<i64>(), 0, "hand {hand}");

        let history_total: u64 = result.betting_history.iter().map(|r| r.amount).sum();
        assert_eq!(result.pot, history_total);
        assert_eq!(result.betting_history[0].kind, ActionKind::SmallBlind);
        assert_eq!(result.betting_history[1].kind, ActionKind::BigBlind);

        assert!(!result.winners.is_empty());
        for w in &result.winners {
            let folded = result
                .betting_history
                .iter()
                .any(|r| r.player == *w && r.kind == ActionKind::Fold);
            assert!(!folded, "hand {hand}: folded player {w} won");
        }
        match result.end {
            HandEnd::Showdown => {
                assert_eq!(result.board.len(), 5);
                assert!(result.winners.iter().all(|w| result.hand_strengths.contains_key(w)));
            }
            HandEnd::Uncontested => {
                assert_eq!(result.winners.len(), 1);
                assert!(result.hand_strengths.is_empty());
            }
            other => unreachable!("unexpected HandEnd variant {other:?}"),
        }
        for (p, profit) in result.profits.iter().enumerate() {
            profit_totals[p] += profit;
            assert!(*profit >= -(TableConfig::default().starting_stack as i64));
        }
    }

    for (p, stats) in game.player_stats().iter().enumerate() {
        assert_eq!(stats.hands_played(), 150);
        assert_eq!(stats.total_profit(), profit_totals[p]);
        assert!(stats.bluffs_successful() <= stats.bluffs_attempted());
    }
}

#[test]
fn same_seed_replays_the_same_hands() {
    let lineup = StrategyKind::default_lineup(5);
    let mut a = Game::with_lineup(TableConfig::default(), &lineup, Some(9)).unwrap();
    let mut b = Game::with_lineup(TableConfig::default(), &lineup, Some(9)).unwrap();
    for _ in 0..20 {
        assert_eq!(a.simulate_hand().unwrap(), b.simulate_hand().unwrap());
    }
}

#[test]
fn nine_handed_table_plays_through() {
    let lineup = StrategyKind::default_lineup(9);
    let table = TableConfig::default().with_max_raises(2);
    let mut game = Game::with_lineup(table, &lineup, Some(77)).unwrap();
    for _ in 0..30 {
        let result = game.simulate_hand().unwrap();
        assert_eq!(result.profits.len(), 9);
        assert_eq!(result.profits.iter().sum::<i64>(), 0);
        for phase in Phase::ALL {
            let raises =
                result.betting_history.iter().filter(|r| r.phase == phase && r.kind == ActionKind::Raise);
            assert!(raises.count() <= 2);
        }
    }
}

#[test]
fn config_errors_surface_before_play() {
    let cfg = SimulationConfig::default().with_players(1);
    assert_eq!(
        Game::from_config(&cfg, &[]).unwrap_err(),
        GameError::Config(ConfigError::PlayerCount(1))
    );

    let table = TableConfig::default().with_blinds(20, 10);
    let err = Game::with_lineup(table, &StrategyKind::default_lineup(3), None).unwrap_err();
    assert_eq!(err, GameError::Config(ConfigError::Blinds { small: 20, big: 10 }));
}

#[test]
fn engine_trait_drives_a_game() {
    fn run(engine: &mut dyn SimulationEngine) -> (u64, Vec<f64>) {
        let mut hands = 0;
        for _ in 0..10 {
            engine.simulate_hand().unwrap();
            hands += 1;
        }
        let equity = engine.estimate_equity(&[], 400, 2).unwrap();
        (hands, equity.probabilities)
    }

    let cfg = SimulationConfig::default().with_seed(5);
    let mut game = Game::from_config(&cfg, &[]).unwrap();
    let (hands, probabilities) = run(&mut game);
    assert_eq!(hands, 10);
    assert_eq!(probabilities.len(), 4);
    assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert_eq!(game.player_stats()[0].hands_played(), 10);
}

#[test]
fn equity_uses_fixed_hole_cards() {
    let mut game = Game::with_lineup(
        TableConfig::default(),
        &[StrategyKind::Tight, StrategyKind::Random],
        Some(3),
    )
    .unwrap();
    game.set_hole_cards(0, Some("As Ah".parse().unwrap())).unwrap();
    game.set_hole_cards(1, Some("7c 2d".parse().unwrap())).unwrap();
    let board = parse_cards("Kc 9d 4s").unwrap();
    let equity = game.estimate_equity(&board, 2000, 4).unwrap();

    assert!(equity.probabilities[0] > 0.85, "{:?}", equity.probabilities);
    assert_eq!(equity.strategy_names, vec!["tight".to_string(), "random".to_string()]);
    assert_eq!(game.set_hole_cards(5, None), Err(GameError::UnknownPlayer(5)));
}

#[test]
fn rejected_equity_calls_leave_the_game_untouched() {
    let lineup = [StrategyKind::Tight, StrategyKind::Random];
    let mut rejected = Game::with_lineup(TableConfig::default(), &lineup, Some(1)).unwrap();
    let mut control = Game::with_lineup(TableConfig::default(), &lineup, Some(1)).unwrap();
    rejected.set_hole_cards(0, Some("Ks Kd".parse().unwrap())).unwrap();

    let six = parse_cards("2c 3c 4c 5c 6c 7c").unwrap();
    let overlapping = parse_cards("Ks 2h 3h").unwrap();
    assert!(matches!(rejected.estimate_equity(&[], 0, 1), Err(GameError::Equity(_))));
    assert!(matches!(rejected.estimate_equity(&[], 10, 0), Err(GameError::Equity(_))));
    assert!(matches!(rejected.estimate_equity(&six, 10, 1), Err(GameError::Equity(_))));
    assert!(rejected.estimate_equity(&overlapping, 10, 1).is_err());

    let holes: Vec<_> = rejected.players().iter().map(|p| (p.hole(), p.fixed_hole())).collect();
    assert_eq!(holes, vec![(None, Some("Ks Kd".parse().unwrap())), (None, None)]);

    // The game's dealing sequence did not move.
    rejected.set_hole_cards(0, None).unwrap();
    for _ in 0..5 {
        assert_eq!(rejected.simulate_hand().unwrap(), control.simulate_hand().unwrap());
    }
}

#[test]
fn equity_after_a_hand_ignores_its_hole_cards() {
    let lineup = StrategyKind::default_lineup(3);
    let mut game = Game::with_lineup(TableConfig::default(), &lineup, Some(11)).unwrap();
    game.simulate_hand().unwrap();
    let last = game.players()[0].hole().unwrap();

    let equity = game.estimate_equity(&[last.first(), last.second()], 300, 2).unwrap();
    assert!((equity.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert_eq!(equity.holes.len(), 3);
    assert!(equity.holes.iter().all(|h| !h.contains(last.first()) && !h.contains(last.second())));
    assert_eq!(game.players()[0].hole(), Some(last));
}
