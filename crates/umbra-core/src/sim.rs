//! The simulation driver: one `tick` advances lights, casts exposure,
//! and commits all damage at the end of the tick.
//!
//! Every source in a tick sees the same frozen scene, so the result of a
//! tick never depends on the order sources are stored in. Destruction,
//! receptor switching and the player kill all commit after the cast pass.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::ability::{AbilityKind, AbilitySet};
use crate::actor::{Flame, Player, Receptor, ReceptorId};
use crate::block::{Block, BlockId, Mirror};
use crate::consts::{BLOCK_CREATION_GRACE, BLOCK_MAX_HP, DEFAULT_ABILITY_RANGE};
use crate::geom::Vec2;
use crate::grid::{GridMap, PlacementOutcome};
use crate::light::{
    LightColor, LightCommand, LightId, LightKind, LightSource, reflect,
};
use crate::rng::SimRng;
use crate::score::{LevelStats, ScoreThresholds};
use crate::world::{
    AbilityError, Event, EventQueue, LightSink, Stage, TargetId, WorldError,
};

/// What a tick ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The player died this tick; the embedding layer decides when to
    /// call [`Simulation::respawn_player`].
    PlayerKilled,
}

/// Everything the cast pass learned this tick, committed in one place.
#[derive(Default)]
struct TickLedger {
    damage: HashMap<TargetId, f32>,
    red_hit: HashSet<TargetId>,
    /// Blocks lit by a primary, non-lethal source. Only these energize
    /// mirrors; reflected beams never do.
    primary_lit: HashMap<BlockId, LightColor>,
    /// Receptors hit this tick, with the color that reached them. Red
    /// wins when several sources land on one receptor.
    receptor_hits: HashMap<ReceptorId, LightColor>,
    killed: bool,
    killer: Option<LightId>,
    flame_snuffed: bool,
    exits: Vec<(LightId, TargetId)>,
}

impl TickLedger {
    fn note_hit(&mut self, target: TargetId, damage: f32, color: LightColor) {
        match target {
            TargetId::Block(_) => {
                if color.is_lethal() {
                    self.red_hit.insert(target);
                } else {
                    *self.damage.entry(target).or_insert(0.0) += damage;
                }
            }
            TargetId::Receptor(id) => {
                let entry = self.receptor_hits.entry(id).or_insert(color);
                if color.is_lethal() {
                    *entry = color;
                }
            }
            TargetId::Flame => {
                if color.is_lethal() {
                    self.flame_snuffed = true;
                }
            }
            TargetId::Player => {}
        }
    }
}

/// A full level simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub stage: Stage,
    lights: Vec<LightSource>,
    next_light: LightId,
    pub abilities: AbilitySet,
    pub stats: LevelStats,
    pub thresholds: ScoreThresholds,
    events: EventQueue,
    rng: SimRng,
    /// Blocks the player placed, eligible for charge refund and cleared
    /// on respawn. Level-authored blocks are not in here.
    placed: HashSet<BlockId>,
    time: f32,
    ticks: u64,
    completed: bool,
}

impl Simulation {
    pub fn new(grid: GridMap, spawn_pos: Vec2) -> Self {
        Self::with_seed(grid, spawn_pos, 0)
    }

    pub fn with_seed(grid: GridMap, spawn_pos: Vec2, seed: u64) -> Self {
        Self {
            stage: Stage::new(grid, Player::new(spawn_pos)),
            lights: Vec::new(),
            next_light: LightId(1),
            abilities: AbilitySet::default(),
            stats: LevelStats::default(),
            thresholds: ScoreThresholds::default(),
            events: EventQueue::default(),
            rng: SimRng::new(seed),
            placed: HashSet::new(),
            time: 0.0,
            ticks: 0,
            completed: false,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn add_light(&mut self, pos: Vec2, color: LightColor, kind: LightKind) -> LightId {
        let id = self.next_light;
        self.next_light = id.next();
        self.lights.push(LightSource::new(id, pos, color, kind));
        id
    }

    pub fn light(&self, id: LightId) -> Option<&LightSource> {
        self.lights.iter().find(|l| l.id == id)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut LightSource> {
        self.lights.iter_mut().find(|l| l.id == id)
    }

    pub fn lights(&self) -> impl Iterator<Item = &LightSource> {
        self.lights.iter()
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Apply a reconfiguration command to the light it names. Level
    /// scripts use this directly; receptors route through it per tick.
    pub fn command_light(&mut self, cmd: &LightCommand) -> Result<(), WorldError> {
        let light = self
            .light_mut(cmd.light)
            .ok_or(WorldError::UnknownLight(cmd.light))?;
        light.apply(&cmd.action);
        Ok(())
    }

    /// Advance the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        let player_pos = self.stage.player.is_alive().then_some(self.stage.player.pos);
        for light in &mut self.lights {
            light.advance(dt, &mut self.rng, player_pos);
        }

        let scene = self.stage.build_scene();

        // Cast pass. Unlit sources still reconcile, flushing their hit
        // set into exit notifications.
        let mut ledger = TickLedger::default();
        for light in &mut self.lights {
            let exposures = light.cast(&scene);
            for (target, dist) in exposures.iter() {
                if target == TargetId::Player {
                    if light.kills_player() && !ledger.killed {
                        ledger.killed = true;
                        ledger.killer = Some(light.id);
                    }
                    continue;
                }
                ledger.note_hit(target, light.damage_at(dist, dt), light.color);
                // Only direct, non-lethal exposure qualifies a mirror for
                // energizing; reflected hits stay out of this map.
                if let TargetId::Block(b) = target {
                    if !light.color.is_lethal() {
                        ledger.primary_lit.insert(b, light.color);
                    }
                }
            }
            let exited = light.tracker.reconcile(exposures.targets());
            ledger.exits.extend(exited.into_iter().map(|t| (light.id, t)));
        }

        self.mirror_pass(dt, &scene, &mut ledger);
        self.commit_blocks(dt, &ledger);
        self.commit_receptors(dt, &ledger);
        self.commit_flame(dt, &ledger);
        let outcome = self.commit_player(&ledger);
        self.flush_exits(ledger.exits);

        self.time += dt;
        self.ticks += 1;
        self.stats.elapsed = self.time;
        outcome
    }

    /// Energize or decay every mirror, then cast the active beams into
    /// the same ledger. Beams use the tick-start scene, so a mirror
    /// destroyed this tick still fires once.
    fn mirror_pass(
        &mut self,
        dt: f32,
        scene: &[crate::geom::Collider],
        ledger: &mut TickLedger,
    ) {
        for id in self.stage.block_ids() {
            let Some(block) = self.stage.block_mut(id) else {
                continue;
            };
            if block.is_destroyed() {
                continue;
            }
            let origin = block.pos;
            let Some(mirror) = block.mirror.as_mut() else {
                continue;
            };

            match ledger.primary_lit.get(&id) {
                Some(&color) => mirror.energize(color),
                None => mirror.tick_unlit(dt),
            }
            if !mirror.is_active() {
                continue;
            }

            let Some(hit) =
                reflect::cast_reflection(id, origin, mirror.beam_dir, mirror.beam_range, 0, scene)
            else {
                continue;
            };
            if hit.target == TargetId::Player {
                // Reflected light is as lethal as the primary beam, but
                // carries no source id.
                ledger.killed = true;
                continue;
            }
            let falloff = 1.0 - hit.distance / mirror.beam_range;
            let damage = mirror.beam_damage * mirror.beam_curve.evaluate(falloff) * dt;
            ledger.note_hit(hit.target, damage, mirror.color);
        }
    }

    fn commit_blocks(&mut self, dt: f32, ledger: &TickLedger) {
        let mut destroyed = Vec::new();
        for id in self.stage.block_ids() {
            let target = TargetId::Block(id);
            let Some(block) = self.stage.block_mut(id) else {
                continue;
            };
            let red = ledger.red_hit.contains(&target);
            let damage = ledger.damage.get(&target).copied();
            if red {
                block.receive_light(0.0, LightColor::Red);
            } else if let Some(d) = damage {
                block.receive_light(d, LightColor::Yellow);
            }
            block.tick_light_state(dt, red || damage.is_some());
            if block.is_destroyed() {
                destroyed.push(id);
            }
        }

        for id in destroyed {
            let Some(block) = self.stage.remove_block(id) else {
                continue;
            };
            let cell_released = self.time - block.spawned_at >= BLOCK_CREATION_GRACE;
            if cell_released {
                self.stage.grid.release(block.cell);
            }
            if self.placed.remove(&id) {
                let kind = if block.is_reflective() {
                    AbilityKind::MirrorBlock
                } else {
                    AbilityKind::ShadowBlock
                };
                self.abilities.refund(kind);
            }
            self.events.push(Event::BlockDestroyed {
                block: id,
                cell: block.cell,
                cell_released,
            });
        }
    }

    fn commit_receptors(&mut self, dt: f32, ledger: &TickLedger) {
        let mut commands = Vec::new();
        for id in self.stage.receptor_ids() {
            let hit = ledger.receptor_hits.get(&id).copied();
            let Some(receptor) = self.stage.receptor_mut(id) else {
                continue;
            };
            let was = receptor.is_activated();
            if let Some(color) = hit {
                receptor.receive_light(0.0, color);
            } else {
                receptor.tick_unlit(dt);
            }
            let now = receptor.is_activated();
            if now && !was {
                commands.extend(receptor.on_activate.iter().cloned());
                self.events.push(Event::ReceptorActivated(id));
            } else if was && !now {
                commands.extend(receptor.on_deactivate.iter().cloned());
                self.events.push(Event::ReceptorDeactivated(id));
            }
        }

        for cmd in commands {
            if let Err(err) = self.command_light(&cmd) {
                tracing::warn!(%err, "receptor command dropped");
            }
        }
    }

    fn commit_flame(&mut self, dt: f32, ledger: &TickLedger) {
        let mut burned_out_at = None;
        if let Some(flame) = self.stage.flame.as_mut() {
            if ledger.flame_snuffed {
                flame.receive_light(0.0, LightColor::Red);
            }
            flame.advance(dt);
            if flame.is_out() {
                burned_out_at = Some(flame.pos);
            }
        }
        if let Some(pos) = burned_out_at {
            self.stage.flame = None;
            let cell = self.stage.grid.world_to_cell(pos);
            let corrupted = self.stage.grid.corrupt_cell(cell).then_some(cell);
            self.events.push(Event::FlameExtinguished { corrupted });
        }
    }

    fn commit_player(&mut self, ledger: &TickLedger) -> TickOutcome {
        if !ledger.killed || !self.stage.player.is_alive() {
            return TickOutcome::Continue;
        }

        self.stats.deaths += 1;
        let pos = self.stage.player.pos;
        self.stage.player.kill();

        let corrupted = self.stage.grid.corrupt_around(pos);
        if !corrupted.is_empty() {
            self.events.push(Event::CellsCorrupted(corrupted));
        }
        self.abilities.reset_charges();
        self.events.push(Event::PlayerKilled {
            by: ledger.killer,
            deaths: self.stats.deaths,
        });
        TickOutcome::PlayerKilled
    }

    fn flush_exits(&mut self, exits: Vec<(LightId, TargetId)>) {
        for (light, target) in exits {
            match target {
                TargetId::Block(b) => {
                    if let Some(block) = self.stage.block_mut(b) {
                        block.on_light_exit();
                    }
                }
                TargetId::Receptor(r) => {
                    if let Some(receptor) = self.stage.receptor_mut(r) {
                        receptor.on_light_exit();
                    }
                }
                TargetId::Flame => {
                    if let Some(flame) = self.stage.flame.as_mut() {
                        flame.on_light_exit();
                    }
                }
                TargetId::Player => {}
            }
            self.events.push(Event::LightExited { light, target });
        }
    }

    // --- player-facing operations ---

    pub fn set_player_position(&mut self, pos: Vec2) {
        self.stage.player.pos = pos;
    }

    pub fn unlock_ability(&mut self, kind: AbilityKind) {
        if self.abilities.unlock(kind) {
            self.events.push(Event::AbilityUnlocked(kind));
        }
    }

    /// Place a shadow or mirror block on the cell the player aims at.
    pub fn place_block(&mut self, kind: AbilityKind, aim: Vec2) -> Result<BlockId, AbilityError> {
        debug_assert!(matches!(
            kind,
            AbilityKind::ShadowBlock | AbilityKind::MirrorBlock
        ));
        if !self.stage.player.is_alive() {
            return Err(AbilityError::PlayerDead);
        }
        if !self.abilities.is_unlocked(kind) {
            return Err(AbilityError::Locked);
        }

        let cell = self
            .stage
            .grid
            .resolve_cell(aim)
            .ok_or(AbilityError::Placement(PlacementOutcome::NoCell))?;
        let outcome =
            self.stage
                .grid
                .check_placement(cell, self.stage.player.pos, DEFAULT_ABILITY_RANGE);
        if outcome != PlacementOutcome::Success {
            return Err(AbilityError::Placement(outcome));
        }
        self.abilities.try_spend(kind)?;

        let id = self.stage.alloc_block_id();
        let center = self.stage.grid.cell_center(cell);
        let half = Vec2::new(self.stage.grid.cell_size / 2.0, self.stage.grid.cell_size / 2.0);
        let mut block = Block::new(id, center, half, BLOCK_MAX_HP, cell, self.time);
        let reflective = kind == AbilityKind::MirrorBlock;
        if reflective {
            block = block.with_mirror(Mirror::new(Vec2::UP));
        }
        self.stage.grid.occupy(cell);
        self.stage.insert_block(block);
        self.placed.insert(id);

        self.stats.ability_uses += 1;
        self.events.push(Event::AbilityUsed(kind));
        self.events.push(Event::BlockPlaced {
            block: id,
            cell,
            reflective,
        });
        Ok(id)
    }

    /// Rotate a mirror block's beam a quarter turn.
    pub fn rotate_mirror(&mut self, id: BlockId) -> Result<Vec2, WorldError> {
        let block = self
            .stage
            .block_mut(id)
            .ok_or(WorldError::UnknownBlock(id))?;
        let mirror = block.mirror.as_mut().ok_or(WorldError::NotReflective(id))?;
        let dir = mirror.rotate();
        self.events.push(Event::MirrorRotated {
            block: id,
            beam_dir: dir,
        });
        Ok(dir)
    }

    /// Teleport the player onto a corrupted cell within reach.
    pub fn teleport(&mut self, aim: Vec2) -> Result<(), AbilityError> {
        if !self.stage.player.is_alive() {
            return Err(AbilityError::PlayerDead);
        }
        if !self.abilities.is_unlocked(AbilityKind::ShadowTp) {
            return Err(AbilityError::Locked);
        }
        let cell = self
            .stage
            .grid
            .resolve_cell(aim)
            .ok_or(AbilityError::Placement(PlacementOutcome::NoCell))?;
        if !self.stage.grid.is_unlocked(cell) {
            return Err(AbilityError::Placement(PlacementOutcome::CellLocked));
        }
        let center = self.stage.grid.cell_center(cell);
        if center.distance(self.stage.player.pos) > DEFAULT_ABILITY_RANGE {
            return Err(AbilityError::Placement(PlacementOutcome::OutOfRange));
        }
        self.abilities.try_spend(AbilityKind::ShadowTp)?;

        self.stage.player.pos = center;
        self.stats.ability_uses += 1;
        self.events.push(Event::AbilityUsed(AbilityKind::ShadowTp));
        self.events.push(Event::PlayerTeleported { to: center });
        Ok(())
    }

    /// Launch an abyss flame from the player with the given drift.
    pub fn spawn_flame(&mut self, velocity: Vec2) -> Result<(), AbilityError> {
        if !self.stage.player.is_alive() {
            return Err(AbilityError::PlayerDead);
        }
        if !self.abilities.is_unlocked(AbilityKind::AbyssFlame) {
            return Err(AbilityError::Locked);
        }
        if self.stage.flame.is_some() {
            return Err(AbilityError::FlameAlreadyActive);
        }
        self.abilities.try_spend(AbilityKind::AbyssFlame)?;

        self.stage.flame = Some(Flame::new(self.stage.player.pos, velocity));
        self.stats.ability_uses += 1;
        self.events.push(Event::AbilityUsed(AbilityKind::AbyssFlame));
        self.events.push(Event::FlameSpawned);
        Ok(())
    }

    /// Put the flame out early; its cell corrupts on the next tick.
    pub fn snuff_flame(&mut self) {
        if let Some(flame) = self.stage.flame.as_mut() {
            flame.snuff();
        }
    }

    pub fn add_receptor(&mut self, make: impl FnMut(ReceptorId) -> Receptor) -> ReceptorId {
        self.stage.add_receptor(make)
    }

    /// Bring the player back: player-placed blocks vanish, their cells
    /// free up, charges refill. Corruption and level-authored blocks stay.
    pub fn respawn_player(&mut self) {
        let mut placed: Vec<_> = core::mem::take(&mut self.placed).into_iter().collect();
        placed.sort_unstable();
        for id in placed {
            if let Some(block) = self.stage.remove_block(id) {
                self.stage.grid.release(block.cell);
            }
        }
        self.abilities.reset_charges();
        self.stage.player.respawn();
        self.events.push(Event::PlayerRespawned);
    }

    /// Score the run and mark the level complete.
    pub fn complete_level(&mut self) -> u8 {
        self.stats.elapsed = self.time;
        let stars = self.thresholds.stars(&self.stats);
        self.completed = true;
        self.events.push(Event::LevelCompleted { stars });
        stars
    }
}
