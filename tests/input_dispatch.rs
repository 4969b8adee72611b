//! Integration tests driving a session through the input dispatcher.

use delve::{
    Character, CombatEngine, Direction, DungeonMap, Encounter, GameAction, GameConfig,
    GameSession, GameState, HeroSetup, HeroType, InputDispatcher, KeyCode, KeyEvent, ManualClock,
    Monster, MonsterType, Position, StateController,
};
use rand::rngs::mock::StepRng;
use std::collections::HashMap;
use std::rc::Rc;

/// Open floor everywhere, with encounters placed by hand.
#[derive(Default)]
struct OpenFloor {
    encounters: HashMap<Position, Encounter>,
}

impl DungeonMap for OpenFloor {
    fn is_walkable(&self, _position: Position) -> bool {
        true
    }

    fn take_encounter(&mut self, position: Position) -> Option<Encounter> {
        self.encounters.remove(&position)
    }
}

/// Moves the controller from combat back to exploration and lets the dispatcher see it at `at_ms`.
fn end_combat_at(
    dispatcher: &mut InputDispatcher<&ManualClock>,
    controller: &mut StateController,
    clock: &ManualClock,
    at_ms: u64,
) {
    controller.change_state(GameState::Combat);
    dispatcher.observe(controller);
    clock.set(at_ms);
    controller.change_state(GameState::Exploring);
    dispatcher.observe(controller);
}

/// Dispatches one key press and applies every resulting action.
fn press(
    dispatcher: &mut InputDispatcher<&ManualClock>,
    session: &mut GameSession,
    engine: &mut CombatEngine<StepRng>,
    dungeon: &mut OpenFloor,
    key: KeyCode,
) {
    let dispatch = dispatcher.dispatch(KeyEvent::press(key), session.state());
    for action in dispatch.actions {
        session.apply(action, engine, dungeon).unwrap();
    }
}

#[test]
fn test_movement_press_in_combat_dispatches_nothing() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();
    controller.change_state(GameState::Combat);
    dispatcher.observe(&controller);

    for key in [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right, KeyCode::W, KeyCode::D] {
        let dispatch = dispatcher.dispatch(KeyEvent::press(key), &controller);
        assert!(
            dispatch.actions.iter().all(|action| !action.is_movement()),
            "{:?} produced movement in combat",
            key
        );
        assert!(dispatch.consumed());
    }
}

#[test]
fn test_press_within_cooldown_suppressed() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();
    end_combat_at(&mut dispatcher, &mut controller, &clock, 10_000);

    for offset in [0, 1, 250, 499, 500] {
        clock.set(10_000 + offset);
        let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::Right), &controller);
        assert!(dispatch.is_empty(), "press at +{} ms should be suppressed", offset);
        assert!(dispatch.suppressed);
    }
}

#[test]
fn test_press_after_cooldown_dispatched() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();
    end_combat_at(&mut dispatcher, &mut controller, &clock, 10_000);

    clock.set(10_501);
    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::Right), &controller);
    assert_eq!(dispatch.actions, vec![GameAction::MoveStart(Direction::East)]);
    assert!(!dispatch.suppressed);
}

#[test]
fn test_cooldown_only_after_combat() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();

    controller.change_state(GameState::Inventory);
    dispatcher.observe(&controller);
    controller.change_state(GameState::Exploring);

    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::W), &controller);
    assert_eq!(dispatch.actions, vec![GameAction::MoveStart(Direction::North)]);
}

#[test]
fn test_combat_input_not_gated_by_cooldown() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();
    end_combat_at(&mut dispatcher, &mut controller, &clock, 1_000);

    controller.change_state(GameState::Combat);
    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::A), &controller);
    assert_eq!(
        dispatch.actions,
        vec![GameAction::StopAllMovement, GameAction::BasicAttack]
    );
}

#[test]
fn test_dispatcher_reads_state_fresh() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();

    controller.change_state(GameState::Chest);
    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::E), &controller);
    assert_eq!(
        dispatch.actions,
        vec![GameAction::StopAllMovement, GameAction::OpenChest]
    );
    assert_eq!(dispatcher.previous_state(), GameState::Chest);
}

/// Full loop: walk into a goblin, beat it, then wait out the cooldown.
#[test]
fn test_walk_fight_and_resume_walking() {
    let clock = ManualClock::new();
    let config = GameConfig::default();
    let mut dispatcher = InputDispatcher::from_config(&clock, &config);
    let mut engine = CombatEngine::new(StepRng::new(0, 0));
    let mut dungeon = OpenFloor::default();
    dungeon.encounters.insert(
        Position::new(1, 0),
        Encounter::Monster(Monster::new(MonsterType::Goblin, Position::new(1, 0))),
    );
    let mut session = GameSession::start(
        HeroSetup::new(HeroType::Warrior, "Brom", Position::origin()),
        config,
    )
    .unwrap();

    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::D);
    session.tick(&mut dungeon);
    assert_eq!(session.current_state(), GameState::Combat);
    assert_eq!(session.held_directions(), &[Direction::East]);

    // The edge into combat cancels the held key before the attack lands.
    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::A);
    assert!(session.held_directions().is_empty());
    assert_eq!(session.monster().map(|m| m.health()), Some(10));

    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::A);
    assert_eq!(session.current_state(), GameState::Exploring);
    dispatcher.observe(session.state());

    clock.advance(300);
    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::D);
    assert!(session.held_directions().is_empty());

    clock.advance(300);
    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::D);
    session.tick(&mut dungeon);
    assert_eq!(session.hero().position(), Position::new(2, 0));
}

/// A host that only ever dispatches: the cooldown still runs from the moment combat ended.
#[test]
fn test_first_press_long_after_combat_dispatched() {
    let clock = Rc::new(ManualClock::new());
    let config = GameConfig::default();
    let mut dispatcher = InputDispatcher::from_config(&*clock, &config);
    let mut engine = CombatEngine::new(StepRng::new(0, 0));
    let mut dungeon = OpenFloor::default();
    dungeon.encounters.insert(
        Position::new(1, 0),
        Encounter::Monster(Monster::new(MonsterType::Goblin, Position::new(1, 0))),
    );
    let mut session = GameSession::start(
        HeroSetup::new(HeroType::Warrior, "Brom", Position::origin()),
        config,
    )
    .unwrap()
    .with_clock(clock.clone());

    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::D);
    session.tick(&mut dungeon);
    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::A);

    clock.set(1_000);
    press(&mut dispatcher, &mut session, &mut engine, &mut dungeon, KeyCode::A);
    assert_eq!(session.current_state(), GameState::Exploring);

    clock.set(5_000);
    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::W), session.state());
    assert_eq!(dispatch.actions, vec![GameAction::MoveStart(Direction::North)]);
    assert!(!dispatch.suppressed);
}

#[test]
fn test_press_soon_after_stamped_combat_suppressed() {
    let clock = ManualClock::new();
    let mut dispatcher = InputDispatcher::new(&clock);
    let mut controller = StateController::new();
    controller.change_state_at(GameState::Combat, 0);
    dispatcher.observe(&controller);
    controller.change_state_at(GameState::Exploring, 1_000);

    // Noticed late, but measured from the transition.
    clock.set(1_499);
    assert!(dispatcher.dispatch(KeyEvent::press(KeyCode::W), &controller).suppressed);
    clock.set(1_500);
    assert!(dispatcher.dispatch(KeyEvent::press(KeyCode::W), &controller).suppressed);
    clock.set(1_501);
    let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::W), &controller);
    assert_eq!(dispatch.actions, vec![GameAction::MoveStart(Direction::North)]);
}
