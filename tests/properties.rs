//! Property tests for the entity, movement and state models.

use delve::{
    step, Character, Direction, GameState, Hero, HeroType, Monster, MonsterType, Position,
    StateController,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

fn game_state() -> impl Strategy<Value = GameState> {
    prop_oneof![
        Just(GameState::Exploring),
        Just(GameState::Combat),
        Just(GameState::Inventory),
        Just(GameState::Chest),
        Just(GameState::Paused),
        Just(GameState::GameOver),
        Just(GameState::Victory),
    ]
}

fn position() -> impl Strategy<Value = Position> {
    (-10_000i32..10_000, -10_000i32..10_000).prop_map(|(x, y)| Position::new(x, y))
}

proptest! {
    #[test]
    fn test_take_damage_clamps(amount in 0i64..1_000, pre_damage in 0i64..200) {
        let mut ogre = Monster::new(MonsterType::Ogre, Position::origin());
        ogre.take_damage(pre_damage);
        let before = ogre.health() as i64;

        ogre.take_damage(amount);
        prop_assert_eq!(ogre.health() as i64, (before - amount).max(0));
    }

    #[test]
    fn test_negative_damage_never_heals(amount in i64::MIN..0) {
        let mut hero = Hero::new(HeroType::Thief, "Vex", Position::origin()).unwrap();
        hero.take_damage(10);
        hero.take_damage(amount);
        prop_assert_eq!(hero.health(), 65);
    }

    #[test]
    fn test_opposite_is_involution(direction in direction()) {
        prop_assert_eq!(direction.opposite().opposite(), direction);
    }

    #[test]
    fn test_move_then_inverse_roundtrips(start in position(), direction in direction()) {
        let moved = step(start, direction);
        prop_assert_eq!(moved.distance(start), 1.0);
        prop_assert_eq!(step(moved, direction.opposite()), start);

        let mut goblin = Monster::new(MonsterType::Goblin, start);
        goblin.move_in(direction);
        goblin.move_in(direction.opposite());
        prop_assert_eq!(goblin.position(), start);
    }

    #[test]
    fn test_transition_count_ignores_self_transitions(targets in prop::collection::vec(game_state(), 0..50)) {
        let mut controller = StateController::new();
        let mut expected = 0;
        let mut current = GameState::Exploring;

        for target in targets {
            let transition = controller.change_state(target);
            if target == current {
                prop_assert!(transition.is_none());
            } else {
                expected += 1;
                prop_assert_eq!(transition.map(|t| t.from), Some(current));
            }
            current = target;
            prop_assert_eq!(controller.current_state(), target);
        }
        prop_assert_eq!(controller.transition_count(), expected);
    }
}
