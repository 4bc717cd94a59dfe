//! Battle orchestration
//!
//! `BattleState` owns every unit, the RNG stream, and the clock. One call
//! to `tick` advances the whole battle by a fixed step and returns the
//! events that happened, in order:
//!
//! 1. player movement
//! 2. gauge charging (a refill drops any standing guard)
//! 3. ready adversaries pick and queue actions; charging players count down
//! 4. telegraph queues advance and ripe attacks resolve
//! 5. status effects
//! 6. adversary passives
//! 7. mana regeneration
//! 8. death sweep
//! 9. display smoothing
//!
//! Commands are submitted between ticks and validated synchronously; a
//! rejected command leaves the state untouched.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::battle::behavior;
use crate::battle::command::{Command, ItemKind};
use crate::battle::constants::{
    FALCON_FEATHER_DURATION, FALCON_FEATHER_FACTOR, FIELD_WIDTH, MANA_POTION_HEAL, POTION_HEAL,
    VARIANCE_MAX, VARIANCE_MIN,
};
use crate::battle::damage::{
    resolve_magical, resolve_physical, CastingCost, MagicalStrike, PhysicalStrike,
};
use crate::battle::effect::{self, EffectKind, HasteState, StatusEffect};
use crate::battle::events::{CombatEvent, UnitId};
use crate::battle::gauge;
use crate::battle::movement;
use crate::battle::passive;
use crate::battle::queue::{self, QueuedAttack, StrikeKind};
use crate::battle::unit::{
    Adversary, AdversaryDefinition, ChargingCommand, PlayerDefinition, PlayerUnit,
};
use crate::core::config::EngineConfig;
use crate::core::error::{CommandError, EngineError, Result};
use crate::core::types::{AdversaryId, Cell, PlayerId};

/// Terminal state of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Snapshot of one unit for rendering and tooling
#[derive(Debug, Clone, Serialize)]
pub struct UnitView {
    pub name: String,
    pub alive: bool,
    pub max_hp: f32,
    pub left_hp: f32,
    pub disp_hp: f32,
    pub max_mana: f32,
    pub left_mana: f32,
    pub disp_mana: f32,
    pub gauge: f32,
    pub guard_active: bool,
    /// Occupied cell; adversaries have none
    pub cell: Option<Cell>,
    pub effects: Vec<String>,
}

/// A telegraph currently visible on the field
#[derive(Debug, Clone, Serialize)]
pub struct TelegraphView {
    pub name: String,
    pub cell: Cell,
    /// Seconds of warning left before it lands
    pub remaining: f32,
}

pub struct BattleState {
    config: EngineConfig,
    rng: ChaCha8Rng,
    players: Vec<PlayerUnit>,
    adversaries: Vec<Adversary>,
    pending_events: Vec<CombatEvent>,
    elapsed: f32,
}

impl BattleState {
    pub fn new(
        player_defs: &[PlayerDefinition],
        adversary_defs: &[AdversaryDefinition],
        config: EngineConfig,
    ) -> Result<Self> {
        if player_defs.is_empty() {
            return Err(EngineError::InvalidDefinition(
                "battle needs at least one player".into(),
            ));
        }
        if adversary_defs.is_empty() {
            return Err(EngineError::InvalidDefinition(
                "battle needs at least one adversary".into(),
            ));
        }
        for def in player_defs {
            if def.hp <= 0.0 {
                return Err(EngineError::InvalidDefinition(format!(
                    "player {} has non-positive HP",
                    def.name
                )));
            }
            if !def.start.in_field() {
                return Err(EngineError::InvalidDefinition(format!(
                    "player {} starts off the field",
                    def.name
                )));
            }
        }
        for def in adversary_defs {
            if def.hp <= 0.0 {
                return Err(EngineError::InvalidDefinition(format!(
                    "adversary {} has non-positive HP",
                    def.name
                )));
            }
            if def.hit_cells.iter().any(|&x| x >= FIELD_WIDTH) {
                return Err(EngineError::InvalidDefinition(format!(
                    "adversary {} has a hit column off the field",
                    def.name
                )));
            }
        }

        info!(
            players = player_defs.len(),
            adversaries = adversary_defs.len(),
            seed = config.seed,
            "battle start"
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            players: player_defs.iter().map(PlayerUnit::from_definition).collect(),
            adversaries: adversary_defs
                .iter()
                .map(Adversary::from_definition)
                .collect(),
            pending_events: Vec::new(),
            elapsed: 0.0,
            config,
        })
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Victory once every adversary is down for good, defeat once every
    /// player is. A dead adversary still charging toward a revival keeps
    /// the battle open.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if self.players.iter().all(|p| !p.unit.alive) {
            return Some(BattleOutcome::Defeat);
        }
        let adversaries_done = self
            .adversaries
            .iter()
            .all(|a| !a.unit.alive && !passive::resonance_armed(a));
        if adversaries_done {
            return Some(BattleOutcome::Victory);
        }
        None
    }

    /// Advance the battle by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Vec<CombatEvent> {
        let mut events = std::mem::take(&mut self.pending_events);

        // Movement
        for player in &mut self.players {
            movement::advance(player, dt);
        }

        // Gauges; a full gauge sheds the guard raised last turn
        for (index, player) in self.players.iter_mut().enumerate() {
            if player.unit.gauge_ready() {
                player.unit.guard.reset();
            } else if gauge::charge_player(player, &self.config, dt) {
                player.unit.guard.reset();
                events.push(CombatEvent::GaugeReady {
                    unit: UnitId::Player(PlayerId(index as u32)),
                });
            }
        }
        for (index, adversary) in self.adversaries.iter_mut().enumerate() {
            let armed = passive::resonance_armed(adversary);
            let was_full = adversary.unit.gauge_ready();
            if gauge::charge_adversary(adversary, &self.config, dt, armed) && !was_full {
                events.push(CombatEvent::GaugeReady {
                    unit: UnitId::Adversary(AdversaryId(index as u32)),
                });
            }
        }

        // Ready adversaries draw from their tables
        for index in 0..self.adversaries.len() {
            let adversary = &mut self.adversaries[index];
            if adversary.unit.alive && adversary.unit.gauge_ready() && adversary.unit.caps.can_act
            {
                if let Some(kind) = behavior::act(adversary, &mut self.rng) {
                    events.push(CombatEvent::AdversaryActed {
                        adversary: AdversaryId(index as u32),
                        action: kind.name().into(),
                    });
                }
            }
        }

        // Charging players count down and fire
        for index in 0..self.players.len() {
            if !self.players[index].unit.alive {
                continue;
            }
            let due = match self.players[index].charging.as_mut() {
                Some(charging) if charging.remaining > 0.0 => {
                    charging.remaining -= dt;
                    None
                }
                Some(charging) => Some(charging.command_index),
                None => None,
            };
            if let Some(command_index) = due {
                self.players[index].charging = None;
                self.execute_command(index, command_index, &mut events);
            }
        }

        // Telegraph queues
        for index in 0..self.adversaries.len() {
            let step = queue::advance(&mut self.adversaries[index].queue, dt);
            for cell in step.revealed {
                events.push(CombatEvent::TelegraphRevealed {
                    adversary: AdversaryId(index as u32),
                    cell,
                });
            }
            for attack in step.ready {
                self.resolve_adversary_strike(index, &attack, &mut events);
            }
        }

        // Status effects
        for index in 0..self.players.len() {
            let id = UnitId::Player(PlayerId(index as u32));
            effect::tick_effects(&mut self.players[index].unit, id, &mut self.rng, dt, &mut events);
        }
        for index in 0..self.adversaries.len() {
            let id = UnitId::Adversary(AdversaryId(index as u32));
            effect::tick_effects(
                &mut self.adversaries[index].unit,
                id,
                &mut self.rng,
                dt,
                &mut events,
            );
        }

        // Passives
        passive::tick_passives(&mut self.adversaries, &mut events);

        // Mana regeneration
        for player in &mut self.players {
            if player.unit.alive {
                player.unit.mana.regenerate(dt);
            }
        }
        for adversary in &mut self.adversaries {
            if adversary.unit.alive {
                adversary.unit.mana.regenerate(dt);
            }
        }

        // Death sweep
        for (index, player) in self.players.iter_mut().enumerate() {
            if player.unit.left_hp <= 0.0 && player.unit.alive {
                player.unit.alive = false;
                player.route.clear();
                player.charging = None;
                events.push(CombatEvent::UnitDied {
                    unit: UnitId::Player(PlayerId(index as u32)),
                });
            }
        }
        for (index, adversary) in self.adversaries.iter_mut().enumerate() {
            if adversary.unit.left_hp <= 0.0 && adversary.unit.alive {
                adversary.unit.alive = false;
                // Death takes the whole telegraph queue with it
                adversary.queue.clear();
                events.push(CombatEvent::UnitDied {
                    unit: UnitId::Adversary(AdversaryId(index as u32)),
                });
            }
        }

        // Display smoothing, cosmetic only
        let steps = self.config.display_smoothing_steps;
        for player in &mut self.players {
            smooth(&mut player.unit.disp_hp, player.unit.left_hp, steps, dt);
            smooth(
                &mut player.unit.mana.disp,
                player.unit.mana.left,
                steps,
                dt,
            );
        }
        for adversary in &mut self.adversaries {
            smooth(&mut adversary.unit.disp_hp, adversary.unit.left_hp, steps, dt);
            smooth(
                &mut adversary.unit.mana.disp,
                adversary.unit.mana.left,
                steps,
                dt,
            );
        }

        self.elapsed += dt;
        events
    }

    /// Submit a command for a player whose gauge is full
    ///
    /// Instant commands take effect immediately; commands with a charge
    /// delay start counting down and fire from a later tick.
    pub fn submit_player_command(
        &mut self,
        player: PlayerId,
        command_index: usize,
    ) -> std::result::Result<(), CommandError> {
        let index = player.0 as usize;
        let unit = self
            .players
            .get(index)
            .ok_or(CommandError::UnknownUnit)?;

        if !unit.unit.alive {
            return Err(CommandError::UnitDead);
        }
        if unit.charging.is_some() {
            return Err(CommandError::AlreadyCharging);
        }
        if !unit.unit.gauge_ready() {
            return Err(CommandError::GaugeNotReady);
        }
        if !unit.unit.caps.can_act {
            return Err(CommandError::CannotAct);
        }
        let command = unit
            .commands
            .get(command_index)
            .ok_or(CommandError::UnknownCommand)?;

        let capability = match command {
            Command::Attack { .. } => unit.unit.caps.can_attack,
            Command::Defend { .. } => unit.unit.caps.can_defend,
            Command::Magic { .. } => unit.unit.caps.can_cast,
            Command::Item { .. } => unit.unit.caps.can_use_item,
        };
        if !capability {
            return Err(CommandError::CapabilityDisabled);
        }
        if command.mana_cost(unit.unit.mana.left) > unit.unit.mana.left {
            return Err(CommandError::InsufficientResource);
        }

        let delay = command.charge_delay();
        if delay > 0.0 {
            let name = command.name().to_owned();
            self.players[index].charging = Some(ChargingCommand {
                command_index,
                remaining: delay,
            });
            self.pending_events.push(CombatEvent::ChargeStarted {
                player,
                command: name,
            });
            return Ok(());
        }

        let mut events = Vec::new();
        self.execute_command(index, command_index, &mut events);
        self.pending_events.extend(events);
        Ok(())
    }

    /// Replace a player's movement route
    ///
    /// The route starts from the unit's current cell; every waypoint must
    /// lie on the field.
    pub fn set_player_route(&mut self, player: PlayerId, waypoints: Vec<Cell>) -> Result<()> {
        let index = player.0 as usize;
        let unit = self
            .players
            .get_mut(index)
            .ok_or(EngineError::UnknownPlayer(player.0))?;
        if let Some(bad) = waypoints.iter().find(|c| !c.in_field()) {
            return Err(EngineError::InvalidDefinition(format!(
                "waypoint ({}, {}) is off the field",
                bad.x, bad.y
            )));
        }

        let mut route = vec![unit.cell()];
        route.extend(waypoints);
        unit.route = route;
        Ok(())
    }

    pub fn player_state(&self, player: PlayerId) -> Result<UnitView> {
        let unit = self
            .players
            .get(player.0 as usize)
            .ok_or(EngineError::UnknownPlayer(player.0))?;
        Ok(view(&unit.unit, Some(unit.cell())))
    }

    pub fn adversary_state(&self, adversary: AdversaryId) -> Result<UnitView> {
        let unit = self
            .adversaries
            .get(adversary.0 as usize)
            .ok_or(EngineError::UnknownAdversary(adversary.0))?;
        Ok(view(&unit.unit, None))
    }

    /// Telegraphs this adversary currently shows; hidden entries stay
    /// hidden
    pub fn pending_attacks(&self, adversary: AdversaryId) -> Result<Vec<TelegraphView>> {
        let unit = self
            .adversaries
            .get(adversary.0 as usize)
            .ok_or(EngineError::UnknownAdversary(adversary.0))?;
        Ok(unit
            .queue
            .iter()
            .filter(|a| a.visible())
            .map(|a| TelegraphView {
                name: a.name.clone(),
                cell: a.cell,
                remaining: a.preliminary,
            })
            .collect())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn adversary_count(&self) -> usize {
        self.adversaries.len()
    }

    fn roll_variance(&mut self) -> u32 {
        self.rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX)
    }

    /// Run a player command that is due now
    ///
    /// A charged cast whose mana ran out while charging fizzles without
    /// touching the gauge, so the turn is not wasted.
    fn execute_command(&mut self, index: usize, command_index: usize, events: &mut Vec<CombatEvent>) {
        let Some(command) = self.players[index].commands.get(command_index).cloned() else {
            return;
        };
        let player_id = PlayerId(index as u32);
        let cast_cost = command.mana_cost(self.players[index].unit.mana.left);
        debug!(player = index, command = command.name(), "command executes");

        match command {
            Command::Attack {
                name,
                power,
                element,
                effects,
                ..
            } => {
                let any_hit =
                    self.strike_adversaries(index, power, element, None, &effects, events);
                if !any_hit {
                    events.push(CombatEvent::StrikeMissed {
                        attacker: UnitId::Player(player_id),
                    });
                }
                events.push(CombatEvent::CommandExecuted {
                    player: player_id,
                    command: name,
                });
                self.players[index].unit.reset_gauge();
            }
            Command::Magic {
                name,
                power,
                element,
                effects,
                ..
            } => {
                if self.players[index].unit.mana.left < cast_cost {
                    return;
                }
                let any_hit = self.strike_adversaries(
                    index,
                    power,
                    element,
                    Some(cast_cost),
                    &effects,
                    events,
                );
                if any_hit {
                    self.players[index].unit.mana.spend(cast_cost);
                } else {
                    events.push(CombatEvent::StrikeMissed {
                        attacker: UnitId::Player(player_id),
                    });
                }
                events.push(CombatEvent::CommandExecuted {
                    player: player_id,
                    command: name,
                });
                self.players[index].unit.reset_gauge();
            }
            Command::Defend {
                name,
                reduce_percent,
                reduce_const,
                speed_modifier,
            } => {
                let guard = &mut self.players[index].unit.guard;
                guard.active = true;
                guard.reduce_percent = reduce_percent;
                guard.reduce_const = reduce_const;
                guard.speed_modifier = speed_modifier;
                events.push(CombatEvent::CommandExecuted {
                    player: player_id,
                    command: name,
                });
                self.players[index].unit.reset_gauge();
            }
            Command::Item { name, kind } => {
                let unit = &mut self.players[index].unit;
                match kind {
                    ItemKind::Potion => unit.apply_hp_delta(POTION_HEAL),
                    ItemKind::ManaPotion => unit.mana.restore(MANA_POTION_HEAL),
                    ItemKind::FalconFeather => unit.effects.push(StatusEffect::timed(
                        EffectKind::Haste(HasteState {
                            factor: FALCON_FEATHER_FACTOR,
                            applied: false,
                        }),
                        FALCON_FEATHER_DURATION,
                    )),
                }
                events.push(CombatEvent::ItemUsed {
                    player: player_id,
                    kind,
                });
                events.push(CombatEvent::CommandExecuted {
                    player: player_id,
                    command: name,
                });
                self.players[index].unit.reset_gauge();
            }
        }
    }

    /// Land one player strike on every adversary covering the player's
    /// column; returns whether anything was hit
    ///
    /// `cast_cost` switches the math to the magical pipeline, with the
    /// caster's efficiency falloff folded in.
    fn strike_adversaries(
        &mut self,
        index: usize,
        power: i64,
        element: crate::element::Element,
        cast_cost: Option<f32>,
        effects: &[StatusEffect],
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let player_id = PlayerId(index as u32);
        let column = self.players[index].cell().x;
        let row = self.players[index].row();
        let attacker_elements = self.players[index].unit.elements.clone();
        let attack = self.players[index].unit.attack;
        let caster_mana = self.players[index].unit.mana.left;
        let caster_max_mana = self.players[index].unit.mana.max;
        let caster_efficiency = self.players[index].unit.mana.efficiency;

        let mut any_hit = false;
        for adv_index in 0..self.adversaries.len() {
            if !self.adversaries[adv_index].unit.alive
                || !self.adversaries[adv_index].hit_cells.contains(&column)
            {
                continue;
            }
            let variance = self.roll_variance();
            let adversary = &self.adversaries[adv_index];
            let delta = match cast_cost {
                None => {
                    let strike = PhysicalStrike {
                        attack,
                        defense: adversary.unit.defense,
                        power,
                        element,
                        attacker_elements: &attacker_elements,
                        guard: None,
                        player_row: row,
                        adversary_row: adversary.row,
                    };
                    resolve_physical(&strike, &adversary.unit.elements, variance)
                }
                Some(cost) => {
                    let strike = MagicalStrike {
                        attacker_mana: caster_mana,
                        defender_mana: adversary.unit.mana.left,
                        power,
                        element,
                        attacker_elements: &attacker_elements,
                        efficiency: Some(CastingCost {
                            efficiency: caster_efficiency,
                            left_mana: caster_mana,
                            max_mana: caster_max_mana,
                            cost,
                        }),
                    };
                    resolve_magical(&strike, &adversary.unit.elements, variance)
                }
            };
            self.adversaries[adv_index].unit.apply_hp_delta(delta);
            any_hit = true;
            events.push(CombatEvent::StrikeLanded {
                attacker: UnitId::Player(player_id),
                target: UnitId::Adversary(AdversaryId(adv_index as u32)),
                delta,
            });

            for template in effects {
                self.adversaries[adv_index].unit.effects.push(template.clone());
                events.push(CombatEvent::EffectApplied {
                    target: UnitId::Adversary(AdversaryId(adv_index as u32)),
                    effect: template.kind.name().into(),
                });
            }
        }
        any_hit
    }

    fn resolve_adversary_strike(
        &mut self,
        adv_index: usize,
        attack: &QueuedAttack,
        events: &mut Vec<CombatEvent>,
    ) {
        let adversary_id = AdversaryId(adv_index as u32);
        let attacker_elements = self.adversaries[adv_index].unit.elements.clone();
        let attack_stat = self.adversaries[adv_index].unit.attack;
        let attacker_mana = self.adversaries[adv_index].unit.mana.left;
        let row = self.adversaries[adv_index].row;

        for (p_index, player) in self.players.iter_mut().enumerate() {
            if !player.unit.alive || player.cell() != attack.cell {
                continue;
            }
            let variance = self.rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX);
            let delta = match attack.kind {
                StrikeKind::Physical => {
                    let strike = PhysicalStrike {
                        attack: attack_stat,
                        defense: player.unit.defense,
                        power: attack.power,
                        element: attack.element,
                        attacker_elements: &attacker_elements,
                        guard: Some(player.unit.guard),
                        player_row: f64::from(player.position.1),
                        adversary_row: row,
                    };
                    resolve_physical(&strike, &player.unit.elements, variance)
                }
                StrikeKind::Magical => {
                    let strike = MagicalStrike {
                        attacker_mana,
                        defender_mana: player.unit.mana.left,
                        power: attack.power,
                        element: attack.element,
                        attacker_elements: &attacker_elements,
                        efficiency: None,
                    };
                    resolve_magical(&strike, &player.unit.elements, variance)
                }
            };
            player.unit.apply_hp_delta(delta);
            events.push(CombatEvent::StrikeLanded {
                attacker: UnitId::Adversary(adversary_id),
                target: UnitId::Player(PlayerId(p_index as u32)),
                delta,
            });

            for template in &attack.effects {
                player.unit.effects.push(template.clone());
                events.push(CombatEvent::EffectApplied {
                    target: UnitId::Player(PlayerId(p_index as u32)),
                    effect: template.kind.name().into(),
                });
            }
        }
    }
}

fn view(unit: &crate::battle::unit::Unit, cell: Option<Cell>) -> UnitView {
    UnitView {
        name: unit.name.clone(),
        alive: unit.alive,
        max_hp: unit.max_hp,
        left_hp: unit.left_hp,
        disp_hp: unit.disp_hp,
        max_mana: unit.mana.max,
        left_mana: unit.mana.left,
        disp_mana: unit.mana.disp,
        gauge: unit.gauge,
        guard_active: unit.guard.active,
        cell,
        effects: unit.effects.iter().map(|e| e.kind.name().into()).collect(),
    }
}

/// One tick of display relaxation toward the authoritative value
fn smooth(disp: &mut f32, target: f32, steps: u32, dt: f32) {
    for _ in 0..steps {
        *disp += (target - *disp) * dt;
    }
    if (target - *disp).abs() < 1.0 {
        *disp = target;
    }
}
