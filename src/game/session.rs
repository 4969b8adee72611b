//! # Session Module
//!
//! The explicitly owned context of one game: the hero, the state controller and
//! whatever encounter is in progress.
//!
//! The session is the caller the combat engine expects. It checks that targets
//! are alive, grants defeat rewards to the hero and moves the state machine in
//! response to the actions the input dispatcher produces.

use crate::combat::{AttackKind, CombatEngine, CombatOutcome};
use crate::config::GameConfig;
use crate::game::{
    Character, Direction, GameState, Hero, HeroType, Item, ItemEffect, Monster, MonsterType,
    Position, StateController, StateTransition,
};
use crate::input::{Clock, GameAction};
use crate::{DelveError, DelveResult};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Something waiting on a dungeon tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Encounter {
    Monster(Monster),
    Chest(Vec<Item>),
}

/// The dungeon collaborator: walkability and tile contents.
///
/// Room generation and connectivity live behind this trait.
pub trait DungeonMap {
    /// Whether the hero may stand on `position`.
    fn is_walkable(&self, position: Position) -> bool;

    /// Removes and returns whatever waits at `position`.
    fn take_encounter(&mut self, position: Position) -> Option<Encounter>;

    /// Puts back an encounter the hero walked away from.
    fn restore_encounter(&mut self, _position: Position, _encounter: Encounter) {}
}

/// Choices made on the new-game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSetup {
    pub hero_type: Option<HeroType>,
    pub name: String,
    pub start: Position,
}

impl HeroSetup {
    /// A complete setup starting at `start`.
    pub fn new(hero_type: HeroType, name: impl Into<String>, start: Position) -> Self {
        Self {
            hero_type: Some(hero_type),
            name: name.into(),
            start,
        }
    }
}

/// Why a new game could not start. The player is expected to fix it and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupDeclined {
    NoHeroType,
    EmptyName,
}

impl fmt::Display for SetupDeclined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupDeclined::NoHeroType => f.write_str("choose a hero type first"),
            SetupDeclined::EmptyName => f.write_str("enter a name for your hero"),
        }
    }
}

/// Observable results of applying actions, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    StateChanged(StateTransition),
    Moved { from: Position, to: Position },
    Blocked { at: Position, direction: Direction },
    EncounterStarted { monster: MonsterType, elite: bool },
    ChestFound { items: usize },
    Combat(CombatOutcome),
    ItemsAcquired(Vec<Item>),
    GoldAwarded { amount: u32, total: u32 },
    ItemUsed { item: Item, effect: ItemEffect },
    Fled,
    FleeFailed,
}

/// One running game.
#[derive(Debug, Clone)]
pub struct GameSession {
    hero: Hero,
    state: StateController,
    config: GameConfig,
    /// Held movement keys, most recent last
    held: Vec<Direction>,
    monster: Option<Monster>,
    chest: Option<Vec<Item>>,
    /// State to return to when inventory or pause closes
    resume_state: GameState,
    cursor: usize,
    /// Stamps state transitions for the dispatcher's cooldown
    clock: Option<Rc<dyn Clock>>,
}

impl GameSession {
    /// Starts a new game, or declines if the setup is incomplete.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameConfig, GameSession, GameState, HeroSetup, HeroType, Position, SetupDeclined};
    ///
    /// let session = GameSession::start(
    ///     HeroSetup::new(HeroType::Priestess, "Ilse", Position::origin()),
    ///     GameConfig::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(session.current_state(), GameState::Exploring);
    ///
    /// let declined = GameSession::start(
    ///     HeroSetup::new(HeroType::Thief, "", Position::origin()),
    ///     GameConfig::default(),
    /// );
    /// assert_eq!(declined.unwrap_err(), SetupDeclined::EmptyName);
    /// ```
    pub fn start(setup: HeroSetup, config: GameConfig) -> Result<Self, SetupDeclined> {
        let hero_type = setup.hero_type.ok_or(SetupDeclined::NoHeroType)?;
        let mut hero =
            Hero::new(hero_type, setup.name, setup.start).map_err(|_| SetupDeclined::EmptyName)?;
        hero.gold = config.starting_gold;
        info!("New game: {} the {}", hero.name, hero_type);

        Ok(Self {
            hero,
            state: StateController::new(),
            config,
            held: Vec::new(),
            monster: None,
            chest: None,
            resume_state: GameState::Exploring,
            cursor: 0,
            clock: None,
        })
    }

    /// Records the time of every state transition using `clock`.
    ///
    /// Pass the clock the input dispatcher reads; its post-combat cooldown then
    /// runs from the moment combat ended rather than from when it noticed.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    /// The authoritative state holder, for the input dispatcher to read.
    pub fn state(&self) -> &StateController {
        &self.state
    }

    pub fn current_state(&self) -> GameState {
        self.state.current_state()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The monster currently being fought
    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    /// Contents of the chest currently being looked at
    pub fn chest(&self) -> Option<&[Item]> {
        self.chest.as_deref()
    }

    /// Selected inventory slot
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Held movement directions, most recent last
    pub fn held_directions(&self) -> &[Direction] {
        &self.held
    }

    /// Applies one dispatched action.
    ///
    /// Actions that make no sense in the current state fail with
    /// [`DelveError::InvalidTransition`]. Movement stops are accepted anywhere.
    pub fn apply<R: Rng>(
        &mut self,
        action: GameAction,
        engine: &mut CombatEngine<R>,
        dungeon: &mut dyn DungeonMap,
    ) -> DelveResult<Vec<SessionEvent>> {
        let mut events = Vec::new();

        match action {
            GameAction::StopAllMovement => self.held.clear(),
            GameAction::MoveStop(direction) => self.held.retain(|&held| held != direction),
            GameAction::MoveStart(direction) => {
                self.require(&[GameState::Exploring], GameState::Exploring)?;
                self.held.retain(|&held| held != direction);
                self.held.push(direction);
            }
            GameAction::Interact => {
                self.require(&[GameState::Exploring], GameState::Exploring)?;
                self.resolve_tile(self.hero.position(), dungeon, &mut events);
            }
            GameAction::OpenInventory => {
                self.require(&[GameState::Exploring, GameState::Combat], GameState::Inventory)?;
                self.resume_state = self.current_state();
                self.cursor = self.cursor.min(self.hero.inventory.len().saturating_sub(1));
                self.transition(GameState::Inventory, &mut events);
            }
            GameAction::Pause => {
                self.require(&[GameState::Exploring, GameState::Combat], GameState::Paused)?;
                self.resume_state = self.current_state();
                self.transition(GameState::Paused, &mut events);
            }
            GameAction::BasicAttack | GameAction::SpecialAttack => {
                self.require(&[GameState::Combat], GameState::Combat)?;
                let kind = if action == GameAction::BasicAttack {
                    AttackKind::Basic
                } else {
                    AttackKind::Special
                };
                self.hero_attack(kind, engine, &mut events)?;
            }
            GameAction::Flee => {
                self.require(&[GameState::Combat], GameState::Exploring)?;
                self.flee(engine, dungeon, &mut events)?;
            }
            GameAction::ScrollUp => {
                self.require(&[GameState::Inventory], GameState::Inventory)?;
                self.cursor = self.cursor.saturating_sub(1);
            }
            GameAction::ScrollDown => {
                self.require(&[GameState::Inventory], GameState::Inventory)?;
                let last = self.hero.inventory.len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            GameAction::UseSelected => {
                self.require(&[GameState::Inventory], GameState::Inventory)?;
                self.use_selected(&mut events)?;
            }
            GameAction::CloseInventory => {
                self.require(&[GameState::Inventory], self.resume_state)?;
                self.transition(self.resume_state, &mut events);
            }
            GameAction::OpenChest => {
                self.require(&[GameState::Chest], GameState::Exploring)?;
                let items = self.chest.take().unwrap_or_default();
                self.grant_items(items, &mut events);
                self.transition(GameState::Exploring, &mut events);
            }
            GameAction::CancelChest => {
                self.require(&[GameState::Chest], GameState::Exploring)?;
                if let Some(items) = self.chest.take() {
                    dungeon.restore_encounter(self.hero.position(), Encounter::Chest(items));
                }
                self.transition(GameState::Exploring, &mut events);
            }
        }

        Ok(events)
    }

    /// Walks one step in the most recently held direction, if any.
    ///
    /// Does nothing outside exploration.
    pub fn tick(&mut self, dungeon: &mut dyn DungeonMap) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.state.is_in_state(GameState::Exploring) {
            return events;
        }
        let Some(&direction) = self.held.last() else {
            return events;
        };

        let from = self.hero.position();
        let to = from.step(direction);
        if !dungeon.is_walkable(to) {
            debug!("{:?} of {:?} is not walkable", direction, from);
            events.push(SessionEvent::Blocked { at: from, direction });
            return events;
        }

        self.hero.move_in(direction);
        events.push(SessionEvent::Moved { from, to });
        self.resolve_tile(to, dungeon, &mut events);
        events
    }

    /// Leaves the pause screen.
    pub fn resume(&mut self) -> DelveResult<Vec<SessionEvent>> {
        self.require(&[GameState::Paused], self.resume_state)?;
        let mut events = Vec::new();
        self.transition(self.resume_state, &mut events);
        Ok(events)
    }

    /// Starts a fight with `monster`, regardless of where it came from.
    pub fn begin_combat(&mut self, mut monster: Monster) -> DelveResult<Vec<SessionEvent>> {
        self.require(&[GameState::Exploring], GameState::Combat)?;
        if !monster.is_alive() {
            return Err(DelveError::InvalidTarget(format!(
                "{} has no health left",
                monster.name()
            )));
        }
        let mut events = Vec::new();
        monster.set_elite_multiplier(self.config.elite_multiplier);
        self.enter_combat(monster, &mut events);
        Ok(events)
    }

    fn enter_combat(&mut self, monster: Monster, events: &mut Vec<SessionEvent>) {
        info!(
            "{} encounters {}{}",
            self.hero.name,
            if monster.is_elite { "an elite " } else { "a " },
            monster.name()
        );
        events.push(SessionEvent::EncounterStarted {
            monster: monster.monster_type,
            elite: monster.is_elite,
        });
        self.monster = Some(monster);
        self.transition(GameState::Combat, events);
    }

    fn resolve_tile(&mut self, position: Position, dungeon: &mut dyn DungeonMap, events: &mut Vec<SessionEvent>) {
        match dungeon.take_encounter(position) {
            Some(Encounter::Monster(mut monster)) if monster.is_alive() => {
                monster.set_elite_multiplier(self.config.elite_multiplier);
                self.enter_combat(monster, events);
            }
            Some(Encounter::Monster(_)) => {}
            Some(Encounter::Chest(items)) => {
                events.push(SessionEvent::ChestFound { items: items.len() });
                self.chest = Some(items);
                self.transition(GameState::Chest, events);
            }
            None => {}
        }
    }

    fn hero_attack<R: Rng>(
        &mut self,
        kind: AttackKind,
        engine: &mut CombatEngine<R>,
        events: &mut Vec<SessionEvent>,
    ) -> DelveResult<()> {
        let monster = self
            .monster
            .as_mut()
            .ok_or_else(|| DelveError::InvalidTarget("no monster to attack".to_string()))?;

        let outcome = engine.resolve(&self.hero, &mut *monster, kind)?;
        let was_boss = monster.is_boss();
        let reward = outcome.reward.clone();
        let defeated = outcome.defeated;
        events.push(SessionEvent::Combat(outcome));

        if !defeated {
            return self.monster_turn(engine, events);
        }

        self.monster = None;
        if let Some(reward) = reward {
            self.grant_items(reward.items, events);
            if reward.gold > 0 {
                self.hero.gold += reward.gold;
                events.push(SessionEvent::GoldAwarded {
                    amount: reward.gold,
                    total: self.hero.gold,
                });
            }
        }

        if was_boss {
            info!("{} has slain the boss", self.hero.name);
            self.transition(GameState::Victory, events);
        } else {
            self.transition(GameState::Exploring, events);
        }
        Ok(())
    }

    fn monster_turn<R: Rng>(&mut self, engine: &mut CombatEngine<R>, events: &mut Vec<SessionEvent>) -> DelveResult<()> {
        let Some(monster) = self.monster.as_ref() else {
            return Ok(());
        };

        let outcome = engine.resolve(monster, &mut self.hero, AttackKind::Basic)?;
        let defeated = outcome.defeated;
        events.push(SessionEvent::Combat(outcome));

        if defeated {
            info!("{} has fallen", self.hero.name);
            self.transition(GameState::GameOver, events);
        }
        Ok(())
    }

    fn flee<R: Rng>(
        &mut self,
        engine: &mut CombatEngine<R>,
        dungeon: &mut dyn DungeonMap,
        events: &mut Vec<SessionEvent>,
    ) -> DelveResult<()> {
        if engine.attempt_flee(self.config.flee_chance) {
            if let Some(monster) = self.monster.take() {
                dungeon.restore_encounter(self.hero.position(), Encounter::Monster(monster));
            }
            events.push(SessionEvent::Fled);
            self.transition(GameState::Exploring, events);
            Ok(())
        } else {
            events.push(SessionEvent::FleeFailed);
            self.monster_turn(engine, events)
        }
    }

    fn use_selected(&mut self, events: &mut Vec<SessionEvent>) -> DelveResult<()> {
        let Some(item) = self.hero.inventory.get(self.cursor).cloned() else {
            return Ok(());
        };
        let effect = self.hero.use_item(self.cursor)?;
        self.cursor = self.cursor.min(self.hero.inventory.len().saturating_sub(1));
        if matches!(effect, ItemEffect::PillarActivated { .. }) && self.hero.has_all_pillars() {
            info!("{} has activated every pillar", self.hero.name);
        }
        events.push(SessionEvent::ItemUsed { item, effect });
        Ok(())
    }

    fn grant_items(&mut self, items: Vec<Item>, events: &mut Vec<SessionEvent>) {
        if items.is_empty() {
            return;
        }
        self.hero.add_items(items.iter().cloned());
        events.push(SessionEvent::ItemsAcquired(items));
    }

    fn require(&self, allowed: &[GameState], target: GameState) -> DelveResult<()> {
        let current = self.current_state();
        if allowed.contains(&current) {
            Ok(())
        } else {
            Err(DelveError::InvalidTransition {
                from: current,
                to: target,
            })
        }
    }

    fn transition(&mut self, target: GameState, events: &mut Vec<SessionEvent>) {
        let changed = match &self.clock {
            Some(clock) => self.state.change_state_at(target, clock.now_millis()),
            None => self.state.change_state(target),
        };
        if let Some(transition) = changed {
            events.push(SessionEvent::StateChanged(transition));
        }
    }
}
