//! End-to-end combat tests.
//!
//! These tests drive whole encounters through `TurnScheduler`:
//! - Catalog-loaded decks and AI-controlled groups
//! - Player target selection and error recovery
//! - Forced resolution on death, victory and defeat
//! - Played-card routing and status decay across turns
//! - Stalls when no combatant can make progress

use std::cell::RefCell;
use std::rc::Rc;

use card_combat::cards::{Card, CardCatalog, CardType, StatMod, TargetKind};
use card_combat::core::{
    CardInstanceId, CombatConfig, CombatError, CombatResult, CombatState, CombatantId,
    CombatantSpec, ErrorSeverity, GroupId, GroupSpec, Phase, HEALTH,
};
use card_combat::effects::StatusStack;
use card_combat::piles::PileKind;
use card_combat::rules::{
    ActorPolicy, CombatEvent, Decision, FirstPlayable, LegalPlay, RandomPolicy, TurnScheduler,
};

const HERO: CombatantId = CombatantId::new(GroupId::A, 0);
const ALLY: CombatantId = CombatantId::new(GroupId::A, 1);
const SLIME: CombatantId = CombatantId::new(GroupId::B, 0);
const BAT: CombatantId = CombatantId::new(GroupId::B, 1);

const CARDS: &str = r#"[
    {"name": "Strike", "type": "attack", "target": "TARGET_ENEMY", "cost": 1,
     "value": -4, "mods": [{"stat": "health"}]},
    {"name": "Slap", "type": "attack", "target": "FRONT_ENEMY", "cost": 1,
     "mods": [{"stat": "health", "magnitude": -1}]},
    {"name": "Hex", "type": "curse", "target": "TARGET_ENEMY", "cost": 1,
     "mods": [{"stat": "weak", "magnitude": 2, "duration": 2}]},
    {"name": "Idle", "type": "func", "cost": 5},
    {"name": "Wobble", "type": "func", "target": "SIDEWAYS"}
]"#;

fn catalog() -> CardCatalog {
    CardCatalog::from_json(CARDS).unwrap()
}

fn deck(names: &[&str]) -> Vec<Card> {
    catalog().build_deck(names).unwrap()
}

fn hand_card(combat: &TurnScheduler, id: CombatantId, name: &str) -> CardInstanceId {
    combat
        .state()
        .combatant(id)
        .unwrap()
        .piles()
        .pile(PileKind::Hand)
        .iter()
        .find(|c| c.name() == name)
        .map(|c| c.id)
        .unwrap()
}

fn recorder(combat: &mut TurnScheduler) -> Rc<RefCell<Vec<CombatEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    combat.subscribe(Box::new(move |event: &CombatEvent| {
        sink.borrow_mut().push(event.clone());
    }));
    events
}

/// Both groups AI-controlled: `start` plays the whole combat.
#[test]
fn test_ai_vs_ai_runs_to_victory() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(1),
        GroupSpec::ai(vec![CombatantSpec::new("Hero").with_deck(deck(&["Strike"; 5]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime")
            .with_health(12)
            .with_deck(deck(&["Slap"; 5]))]),
    )
    .unwrap();

    combat.start().unwrap();

    assert_eq!(combat.result(), Some(CombatResult::Victory));
    assert_eq!(combat.state().turn_number, 1);
    assert_eq!(combat.state().history.len(), 3);
    assert!(!combat.state().combatant(SLIME).unwrap().alive);
}

/// Group B wiped out: VICTORY, then every request is rejected.
#[test]
fn test_victory_rejects_further_plays() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(2),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(deck(&["Strike"; 5]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime").with_health(4)]),
    )
    .unwrap();
    combat.start().unwrap();

    let strike = hand_card(&combat, HERO, "Strike");
    let outcome = combat.play_card(HERO, strike, Some(SLIME)).unwrap();
    assert_eq!(outcome.deaths().collect::<Vec<_>>(), vec![SLIME]);
    assert_eq!(combat.phase(), Phase::Victory);

    let next = hand_card(&combat, HERO, "Strike");
    assert_eq!(
        combat.play_card(HERO, next, Some(SLIME)).unwrap_err(),
        CombatError::CombatAlreadyEnded
    );
    assert_eq!(combat.pass(HERO).unwrap_err(), CombatError::CombatAlreadyEnded);
}

/// Single-target plays need a living enemy; errors leave state untouched.
#[test]
fn test_target_selection_errors_are_recoverable() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(3),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(deck(&["Strike"; 5]))]),
        GroupSpec::ai(vec![
            CombatantSpec::new("Slime").with_health(10),
            CombatantSpec::new("Bat").with_health(4),
        ]),
    )
    .unwrap();
    combat.start().unwrap();
    let strike = hand_card(&combat, HERO, "Strike");

    let missing = combat.play_card(HERO, strike, None).unwrap_err();
    assert_eq!(missing, CombatError::MissingTargetSelection { card: strike });
    assert_eq!(missing.severity(), ErrorSeverity::Recoverable);

    let own_side = combat.play_card(HERO, strike, Some(HERO)).unwrap_err();
    assert_eq!(own_side, CombatError::InvalidTargetSelection { target: HERO });

    let hero = combat.state().combatant(HERO).unwrap();
    assert_eq!(hero.energy, 3);
    assert_eq!(hero.piles().locate(strike), Some(PileKind::Hand));

    combat.play_card(HERO, strike, Some(BAT)).unwrap();
    assert!(!combat.state().combatant(BAT).unwrap().alive);

    let plays = combat.legal_plays(HERO).unwrap();
    assert_eq!(plays.len(), 4);
    assert!(plays.iter().all(|p| p.candidates.as_slice() == [SLIME]));

    let dead = hand_card(&combat, HERO, "Strike");
    assert_eq!(
        combat.play_card(HERO, dead, Some(BAT)).unwrap_err(),
        CombatError::InvalidTargetSelection { target: BAT }
    );
}

/// An unknown target kind fails the play and never shows up as legal.
#[test]
fn test_invalid_target_kind_is_fatal_for_the_play() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(4).with_hand_size(2),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(deck(&["Wobble", "Slap"]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime")]),
    )
    .unwrap();
    combat.start().unwrap();
    let wobble = hand_card(&combat, HERO, "Wobble");

    let err = combat.play_card(HERO, wobble, None).unwrap_err();
    assert_eq!(err, CombatError::InvalidTargetKind("SIDEWAYS".to_string()));
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
    assert_eq!(combat.phase(), Phase::Action);

    let plays = combat.legal_plays(HERO).unwrap();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].name, "Slap");
}

/// The actor dying mid-ACTION ends their turn at once.
#[test]
fn test_self_death_forces_resolution() {
    let overload = Card::new("Overload", CardType::Func, TargetKind::SelfOnly)
        .with_mod(StatMod::immediate(HEALTH, -5));

    let mut combat = TurnScheduler::new(
        CombatConfig::new(5).with_hand_size(3),
        GroupSpec::player(vec![
            CombatantSpec::new("Hero")
                .with_health(1)
                .with_deck(vec![overload, catalog().instantiate("Slap").unwrap()]),
            CombatantSpec::new("Ally").with_deck(deck(&["Slap"; 3])),
        ]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime").with_deck(deck(&["Idle"; 3]))]),
    )
    .unwrap();
    combat.start().unwrap();

    let card = hand_card(&combat, HERO, "Overload");
    let outcome = combat.play_card(HERO, card, None).unwrap();

    assert_eq!(outcome.deaths().collect::<Vec<_>>(), vec![HERO]);
    assert_eq!(combat.phase(), Phase::Action);
    assert_eq!(combat.state().actor, Some(ALLY));
    assert_eq!(combat.state().turn_number, 2);

    let hero = combat.state().combatant(HERO).unwrap();
    assert!(!hero.alive);
    assert_eq!(hero.piles().len(PileKind::Hand), 0);
    assert_eq!(hero.piles().len(PileKind::Discard), 2);
}

/// Both groups wiped by one play: group A falling is a defeat.
#[test]
fn test_mutual_wipe_is_defeat() {
    let nova = Card::new("Nova", CardType::Attack, TargetKind::All)
        .with_mod(StatMod::immediate(HEALTH, -50));

    let mut combat = TurnScheduler::new(
        CombatConfig::new(6).with_hand_size(1),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(vec![nova])]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime"), CombatantSpec::new("Bat")]),
    )
    .unwrap();
    let events = recorder(&mut combat);
    combat.start().unwrap();

    let card = hand_card(&combat, HERO, "Nova");
    let outcome = combat.play_card(HERO, card, None).unwrap();

    assert_eq!(outcome.targets.as_slice(), &[HERO, SLIME, BAT]);
    assert_eq!(combat.result(), Some(CombatResult::Defeat));
    assert_eq!(
        events.borrow().last(),
        Some(&CombatEvent::CombatEnded {
            result: CombatResult::Defeat
        })
    );
}

/// Tokens leave circulation, bloat cards multiply, plain cards are discarded.
#[test]
fn test_played_card_routing() {
    let sludge = Card::new("Sludge", CardType::Curse, TargetKind::SelfOnly).bloat();
    let spark = Card::new("Spark", CardType::Token, TargetKind::FrontEnemy)
        .with_mod(StatMod::immediate(HEALTH, -1))
        .token();
    let mut starting = vec![sludge, spark];
    starting.extend(deck(&["Slap"; 3]));

    let mut combat = TurnScheduler::new(
        CombatConfig::new(7),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(starting)]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime")]),
    )
    .unwrap();
    combat.start().unwrap();

    let sludge = hand_card(&combat, HERO, "Sludge");
    let outcome = combat.play_card(HERO, sludge, None).unwrap();
    let copy = outcome.duplicate.unwrap();

    let spark = hand_card(&combat, HERO, "Spark");
    combat.play_card(HERO, spark, None).unwrap();

    let slap = hand_card(&combat, HERO, "Slap");
    combat.play_card(HERO, slap, None).unwrap();

    let piles = combat.state().combatant(HERO).unwrap().piles();
    assert_eq!(piles.total_cards(), 6);
    assert_eq!(piles.len(PileKind::Hand), 2);
    assert_eq!(piles.len(PileKind::Discard), 3);
    assert_eq!(piles.len(PileKind::Void), 1);
    assert_eq!(piles.locate(spark), Some(PileKind::Void));
    assert_eq!(piles.locate(copy), Some(PileKind::Discard));
    assert_eq!(piles.locate(slap), Some(PileKind::Discard));
}

/// Status stacks count down at the end of their holder's turns.
#[test]
fn test_status_decays_on_holders_turn_end() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(8),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(deck(&["Hex"; 5]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime").with_deck(deck(&["Idle"; 5]))]),
    )
    .unwrap();
    let events = recorder(&mut combat);
    combat.start().unwrap();

    let hex = hand_card(&combat, HERO, "Hex");
    combat.play_card(HERO, hex, Some(SLIME)).unwrap();
    let slime = combat.state().combatant(SLIME).unwrap();
    assert_eq!(slime.status.get("weak"), Some(&StatusStack::new(2, 2)));
    assert_eq!(slime.effective_stat("weak"), 2);

    combat.pass(HERO).unwrap();
    assert_eq!(combat.state().turn_number, 3);
    assert_eq!(
        combat.state().combatant(SLIME).unwrap().status.get("weak"),
        Some(&StatusStack::new(2, 1))
    );

    combat.pass(HERO).unwrap();
    assert!(combat.state().combatant(SLIME).unwrap().status.is_empty());
    assert!(events.borrow().contains(&CombatEvent::StatusExpired {
        combatant: SLIME,
        stat: "weak".to_string(),
    }));
}

/// Every turn draws back up to the hand size, reshuffling when needed.
#[test]
fn test_hand_replenish_reshuffles_discard() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(9),
        GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(deck(&["Slap"; 7]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime").with_deck(deck(&["Idle"; 5]))]),
    )
    .unwrap();
    let events = recorder(&mut combat);
    combat.start().unwrap();
    combat.pass(HERO).unwrap();

    let piles = combat.state().combatant(HERO).unwrap().piles();
    assert_eq!(piles.len(PileKind::Hand), 5);
    assert_eq!(piles.len(PileKind::Draw), 2);
    assert_eq!(piles.len(PileKind::Discard), 0);
    assert!(events
        .borrow()
        .contains(&CombatEvent::Reshuffled { combatant: HERO }));
}

/// Same seed and same policies give the same combat.
#[test]
fn test_random_policies_are_deterministic() {
    let run = |seed: u64| {
        let mut combat = TurnScheduler::new(
            CombatConfig::new(seed),
            GroupSpec::ai(vec![CombatantSpec::new("Hero")
                .with_deck(deck(&["Slap", "Strike", "Slap", "Slap", "Strike", "Slap"]))]),
            GroupSpec::ai(vec![CombatantSpec::new("Slime")
                .with_health(15)
                .with_deck(deck(&["Slap"; 6]))]),
        )
        .unwrap();
        combat.set_policy(GroupId::A, Box::new(RandomPolicy::new(seed)));
        combat.set_policy(GroupId::B, Box::new(RandomPolicy::new(seed + 1)));
        combat.start().unwrap();
        (combat.result(), combat.state().history.clone())
    };

    let (result, history) = run(21);
    assert!(result.is_some());
    assert_eq!(run(21), (result, history));
}

/// Always passes, even with cards to play.
struct Pacifist;

impl ActorPolicy for Pacifist {
    fn choose_action(&mut self, _: &CombatState, _: CombatantId, _: &[LegalPlay]) -> Decision {
        Decision::Pass
    }
}

/// Nobody holding a card: `start` hands control back instead of cycling.
#[test]
fn test_empty_decks_stall() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(10),
        GroupSpec::ai(vec![CombatantSpec::new("Hero"), CombatantSpec::new("Ally")]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime")]),
    )
    .unwrap();
    let events = recorder(&mut combat);

    combat.start().unwrap();

    assert!(combat.is_stalled());
    assert_eq!(combat.result(), None);
    assert_eq!(combat.phase(), Phase::Draw);
    assert_eq!(combat.state().actor, Some(HERO));
    assert_eq!(combat.state().turn_number, 4);
    assert!(events.borrow().contains(&CombatEvent::Stalled { turns: 3 }));
    assert_eq!(
        combat.pass(HERO).unwrap_err(),
        CombatError::WrongPhase {
            expected: Phase::Action,
            actual: Phase::Draw
        }
    );
}

/// AI groups that only ever pass stall once every combatant has passed.
#[test]
fn test_passive_ai_stalls() {
    let mut combat = TurnScheduler::new(
        CombatConfig::new(11),
        GroupSpec::ai(vec![CombatantSpec::new("Hero").with_deck(deck(&["Slap"; 5]))]),
        GroupSpec::ai(vec![CombatantSpec::new("Slime").with_deck(deck(&["Slap"; 5]))]),
    )
    .unwrap();
    combat.set_policy(GroupId::A, Box::new(Pacifist));
    combat.set_policy(GroupId::B, Box::new(Pacifist));

    combat.start().unwrap();

    assert!(combat.is_stalled());
    assert_eq!(combat.state().history.len(), 2);
    assert_eq!(combat.state().combatant(SLIME).unwrap().health, 20);

    // One side waking up ends the stall.
    combat.set_policy(GroupId::A, Box::new(FirstPlayable));
    combat.resume().unwrap();
    assert!(!combat.is_stalled());
    assert_eq!(combat.result(), Some(CombatResult::Victory));
}
