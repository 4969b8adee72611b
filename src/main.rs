//! # Delve Main Entry Point
//!
//! Runs a headless crawl through a scripted corridor. An autopilot presses keys,
//! the input dispatcher turns them into actions and the session plays them out,
//! exactly as an interactive front end would drive the core.

use clap::Parser;
use delve::{
    Character, CombatEngine, DelveError, DelveResult, DungeonMap, Encounter, GameConfig,
    GameSession, GameState, HeroSetup, HeroType, InputDispatcher, Item, ItemKind, KeyCode,
    KeyEvent, ManualClock, Monster, MonsterType, PillarKind, Position, SessionEvent,
};
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Simulated time between frames
const FRAME_MS: u64 = 100;

/// Upper bound on simulated frames before giving up
const MAX_FRAMES: u32 = 10_000;

/// Command line arguments for the Delve demo.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Headless demo crawl through the Delve runtime core")]
#[command(version)]
struct Args {
    /// Random seed for combat rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hero type (warrior, priestess, thief)
    #[arg(long, default_value = "warrior")]
    hero: HeroType,

    /// Hero name
    #[arg(long, default_value = "Brom")]
    name: String,

    /// JSON file overriding gameplay configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .format_target(false)
        .init();

    info!("Starting Delve v{}", delve::VERSION);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut engine = match args.seed {
        Some(seed) => CombatEngine::from_seed(seed),
        None => CombatEngine::from_entropy(),
    };

    let clock = Rc::new(ManualClock::new());
    let setup = HeroSetup::new(args.hero, args.name.clone(), Position::origin());
    let mut session = GameSession::start(setup, config.clone())
        .map_err(|declined| DelveError::InvalidArgument(declined.to_string()))?
        .with_clock(clock.clone());

    let mut dispatcher = InputDispatcher::from_config(Rc::clone(&clock), &config);
    let mut dungeon = CorridorDungeon::new();
    let mut autopilot = Autopilot::default();

    for frame in 0..MAX_FRAMES {
        clock.advance(FRAME_MS);

        if session.current_state().is_terminal() {
            break;
        }
        if session.current_state() == GameState::Paused {
            report(&session.resume()?);
            continue;
        }

        if let Some(key) = autopilot.next_key(&session) {
            let dispatch = dispatcher.dispatch(KeyEvent::press(key), session.state());
            for action in dispatch.actions {
                report(&session.apply(action, &mut engine, &mut dungeon)?);
            }
        }

        if let Some(stop) = dispatcher.observe(session.state()) {
            report(&session.apply(stop, &mut engine, &mut dungeon)?);
        }
        report(&session.tick(&mut dungeon));

        if frame + 1 == MAX_FRAMES {
            warn!("Gave up after {} frames", MAX_FRAMES);
        }
    }

    let hero = session.hero();
    println!(
        "{} the {} finished in {:?} with {}/{} health, {} gold, {} pillars and {} items",
        hero.name,
        hero.hero_type,
        session.current_state(),
        hero.health(),
        hero.hero_type.archetype().base_health,
        hero.gold,
        hero.pillars_activated(),
        hero.inventory.len()
    );
    Ok(())
}

/// Logs session events the way a front end would show them.
fn report(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::Combat(outcome) => info!(
                "{:?} hit for {}{} ({} health left)",
                outcome.kind,
                outcome.damage,
                if outcome.critical { " CRITICAL" } else { "" },
                outcome.defender_health
            ),
            SessionEvent::Moved { .. } | SessionEvent::Blocked { .. } => {}
            other => info!("{:?}", other),
        }
    }
}

/// Picks keys for the hero: walk east, fight, loot, drink when hurt.
#[derive(Default)]
struct Autopilot {
    turn: u32,
    drinking: bool,
}

impl Autopilot {
    fn next_key(&mut self, session: &GameSession) -> Option<KeyCode> {
        let hero = session.hero();
        let potion = hero
            .inventory
            .iter()
            .position(|item| matches!(item.kind, ItemKind::HealingPotion { .. }));
        let hurt = hero.health() * 2 < hero.hero_type.archetype().base_health;

        match session.current_state() {
            GameState::Exploring | GameState::Combat if hurt && potion.is_some() && !self.drinking => {
                self.drinking = true;
                Some(KeyCode::I)
            }
            GameState::Exploring => Some(KeyCode::Right),
            GameState::Combat => {
                self.turn += 1;
                Some(if self.turn % 3 == 0 { KeyCode::S } else { KeyCode::A })
            }
            GameState::Chest => Some(KeyCode::Enter),
            GameState::Inventory => match potion {
                Some(index) if self.drinking && index < session.cursor() => Some(KeyCode::Up),
                Some(index) if self.drinking && index > session.cursor() => Some(KeyCode::Down),
                Some(_) if self.drinking => {
                    self.drinking = false;
                    Some(KeyCode::Enter)
                }
                _ => {
                    self.drinking = false;
                    Some(KeyCode::Escape)
                }
            },
            GameState::Paused | GameState::GameOver | GameState::Victory => None,
        }
    }
}

/// A single east-west corridor with hand-placed encounters.
struct CorridorDungeon {
    length: i32,
    encounters: HashMap<Position, Encounter>,
}

impl CorridorDungeon {
    fn new() -> Self {
        let mut encounters = HashMap::new();
        let mut place = |x: i32, encounter: Encounter| {
            encounters.insert(Position::new(x, 0), encounter);
        };

        place(
            3,
            Encounter::Monster(monster(MonsterType::Goblin, 3).with_rewards(vec![Item::healing_potion(30)])),
        );
        place(
            6,
            Encounter::Chest(vec![Item::healing_potion(40), Item::pillar(PillarKind::Abstraction)]),
        );
        place(9, Encounter::Monster(monster(MonsterType::Skeleton, 9)));
        place(
            12,
            Encounter::Monster(
                monster(MonsterType::Orc, 12).with_rewards(vec![Item::pillar(PillarKind::Encapsulation)]),
            ),
        );
        place(
            15,
            Encounter::Chest(vec![Item::healing_potion(60), Item::pillar(PillarKind::Inheritance)]),
        );
        place(
            18,
            Encounter::Monster(
                monster(MonsterType::Ogre, 18).with_rewards(vec![Item::pillar(PillarKind::Polymorphism)]),
            ),
        );
        place(21, Encounter::Monster(monster(MonsterType::Dragon, 21)));

        Self {
            length: 21,
            encounters,
        }
    }
}

fn monster(monster_type: MonsterType, x: i32) -> Monster {
    Monster::new(monster_type, Position::new(x, 0))
}

impl DungeonMap for CorridorDungeon {
    fn is_walkable(&self, position: Position) -> bool {
        position.y == 0 && (0..=self.length).contains(&position.x)
    }

    fn take_encounter(&mut self, position: Position) -> Option<Encounter> {
        self.encounters.remove(&position)
    }

    fn restore_encounter(&mut self, position: Position, encounter: Encounter) {
        self.encounters.insert(position, encounter);
    }
}
