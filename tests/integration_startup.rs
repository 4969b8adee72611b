//! Integration test to ensure a game session can start up without errors.

use delve::{
    Character, GameConfig, GameSession, GameState, Hero, HeroSetup, HeroType, Position,
    SetupDeclined, StateController,
};

#[test]
fn test_basic_startup() {
    let session = GameSession::start(
        HeroSetup::new(HeroType::Warrior, "TestPlayer", Position::new(5, 5)),
        GameConfig::default(),
    )
    .expect("complete setup should start a game");

    assert_eq!(session.current_state(), GameState::Exploring);
    assert_eq!(session.state().transition_count(), 0);
    assert!(session.monster().is_none());
    assert!(session.held_directions().is_empty());

    let hero = session.hero();
    assert_eq!(hero.name, "TestPlayer");
    assert_eq!(hero.position(), Position::new(5, 5));
    assert_eq!(hero.health(), 125);
    assert!(hero.inventory.is_empty());
    assert_eq!(hero.pillars_activated(), 0);
}

#[test]
fn test_startup_declines_are_recoverable() {
    let mut setup = HeroSetup {
        hero_type: None,
        name: String::new(),
        start: Position::origin(),
    };
    assert_eq!(
        GameSession::start(setup.clone(), GameConfig::default()).unwrap_err(),
        SetupDeclined::NoHeroType
    );

    setup.hero_type = Some(HeroType::Thief);
    assert_eq!(
        GameSession::start(setup.clone(), GameConfig::default()).unwrap_err(),
        SetupDeclined::EmptyName
    );

    setup.name = "Vex".to_string();
    assert!(GameSession::start(setup, GameConfig::default()).is_ok());
}

#[test]
fn test_player_can_be_created() {
    let hero = Hero::new(HeroType::Priestess, "Hero", Position::new(5, 5)).unwrap();
    assert_eq!(hero.name, "Hero");
    assert_eq!(hero.position(), Position::new(5, 5));
    assert!(hero.is_alive());
}

#[test]
fn test_controller_starts_exploring() {
    let controller = StateController::new();
    assert!(controller.is_in_state(GameState::Exploring));
}

#[test]
fn test_state_types_are_public() {
    let mut controller = StateController::new();
    let transition = controller.change_state(GameState::Combat).unwrap();
    assert_eq!(transition.from, GameState::Exploring);

    let error = delve::DelveError::InvalidTransition {
        from: GameState::Exploring,
        to: GameState::Chest,
    };
    assert!(error.to_string().contains("Chest"));
}
