//! The per-tick update loop.

use crate::actor::{Actor, Intent};
use crate::camera::Camera;
use crate::collision::resolve_in;
use crate::config::GameConfig;
use crate::entity::{Collidable, Drawable, EntityId, Positioned, SpriteFrame, Updatable};
use crate::spatial::{GridCoord, TileGrid};
use crate::trigger::Trigger;
use log::debug;
use macroquad::math::{Rect, Vec2};
use std::collections::HashMap;

/// Owns every actor and trigger of a running level and drives one tick at a time.
pub struct World {
    map_size: Vec2,
    actors: Vec<Actor>,
    triggers: Vec<Trigger>,
    grid: TileGrid,
    cells: HashMap<EntityId, GridCoord>,
    camera: Camera,
    tracked: Option<EntityId>,
    now: f64,
    tick_seconds: f64,
}

impl World {
    /// Empty world over a `map_size` pixel map.
    pub fn new(map_size: Vec2, tile_w: u32, tile_h: u32, camera: Camera, tick_seconds: f64) -> Self {
        World {
            map_size,
            actors: Vec::new(),
            triggers: Vec::new(),
            grid: TileGrid::new(tile_w, tile_h),
            cells: HashMap::new(),
            camera,
            tracked: None,
            now: 0.0,
            tick_seconds,
        }
    }

    /// Empty world using tile size, viewport and tick rate from `cfg`.
    pub fn from_config(cfg: &GameConfig, map_size: Vec2) -> Self {
        World::new(
            map_size,
            cfg.tile_width,
            cfg.tile_height,
            Camera::with_viewport(cfg.viewport_width, cfg.viewport_height),
            cfg.tick_seconds(),
        )
    }

    /// Map size in pixels.
    pub fn map_size(&self) -> Vec2 {
        self.map_size
    }

    /// Seconds of game time elapsed.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// The scrolling camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Cell occupancy of every actor and trigger.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Actors in spawn order, which is also update order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Triggers in insertion order.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Actor by id.
    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// Mutable actor by id.
    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    /// Trigger by id.
    pub fn trigger(&self, id: EntityId) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id() == id)
    }

    /// Grid cell an entity is registered in.
    pub fn cell_of(&self, id: EntityId) -> Option<GridCoord> {
        self.cells.get(&id).copied()
    }

    /// Adds an actor and registers it in the grid.
    pub fn spawn_actor(&mut self, actor: Actor) -> EntityId {
        let id = actor.id();
        let at = self.grid.grid_from_screen(actor.position());
        debug!("spawn {} at {}", actor.name(), at);
        self.grid.add(at, id);
        self.cells.insert(id, at);
        self.actors.push(actor);
        id
    }

    /// Adds a trigger and registers it in the grid.
    pub fn add_trigger(&mut self, trigger: Trigger) -> EntityId {
        let id = trigger.id();
        let at = self.grid.grid_from_screen(trigger.position());
        self.grid.add(at, id);
        self.cells.insert(id, at);
        self.triggers.push(trigger);
        id
    }

    /// Removes an actor; the camera stops following it.
    pub fn remove_actor(&mut self, id: EntityId) -> Option<Actor> {
        let i = self.actors.iter().position(|a| a.id() == id)?;
        self.forget(id);
        if self.tracked == Some(id) {
            self.tracked = None;
        }
        Some(self.actors.remove(i))
    }

    /// Removes a trigger; any pending re-arm goes with it.
    pub fn remove_trigger(&mut self, id: EntityId) -> Option<Trigger> {
        let i = self.triggers.iter().position(|t| t.id() == id)?;
        self.forget(id);
        Some(self.triggers.remove(i))
    }

    fn forget(&mut self, id: EntityId) {
        if let Some(at) = self.cells.remove(&id) {
            self.grid.remove(at, id);
        }
    }

    /// The camera follows this actor at the end of every tick.
    pub fn track(&mut self, id: EntityId) {
        self.tracked = Some(id);
    }

    /// Runs one tick: re-arms triggers, clears contacts, moves every actor with the intent
    /// `intents` returns for it, resolves collisions axis by axis, updates
    /// grid occupancy, moves the camera and advances animations.
    pub fn update<F>(&mut self, mut intents: F)
    where
        F: FnMut(&Actor) -> Intent,
    {
        self.now += self.tick_seconds;
        for t in &mut self.triggers {
            t.update(self.now);
        }
        for a in &mut self.actors {
            a.clear_contacts();
        }

        for i in 0..self.actors.len() {
            let intent = intents(&self.actors[i]);
            self.actors[i].step(intent, self.map_size);
            let delta = self.actors[i].delta();
            resolve_in(i, delta, &mut self.actors, &mut self.triggers);
            self.sync_cell(i);
        }

        if let Some(p) = self.tracked.and_then(|id| self.actor(id)).map(|a| a.position()) {
            self.camera.follow_to(p.x, p.y);
            self.camera.constrain(self.map_size.x, self.map_size.y);
        }

        for a in &mut self.actors {
            a.update(self.now);
        }
    }

    fn sync_cell(&mut self, i: usize) {
        let actor = &self.actors[i];
        let id = actor.id();
        let now_at = self.grid.grid_from_screen(actor.position());
        match self.cells.insert(id, now_at) {
            Some(was) if was != now_at => {
                self.grid.move_from_to(was, now_at, id);
            }
            Some(_) => {}
            None => self.grid.add(now_at, id),
        }
    }

    /// Actors registered in `cell`, in arrival order.
    pub fn actors_at(&self, cell: GridCoord) -> Vec<EntityId> {
        self.grid
            .occupants_at(cell)
            .iter()
            .copied()
            .filter(|id| self.actor(*id).is_some())
            .collect()
    }

    /// Sprite frames for every actor, in spawn order.
    pub fn frames(&self) -> Vec<(EntityId, SpriteFrame)> {
        self.actors
            .iter()
            .filter_map(|a| a.frame().map(|f| (a.id(), f)))
            .collect()
    }

    /// Bounds of every actor and trigger, for debug overlays.
    pub fn body_bounds(&self) -> Vec<(EntityId, Rect)> {
        self.actors
            .iter()
            .map(|a| (a.id(), a.bounds()))
            .chain(self.triggers.iter().map(|t| (t.id(), t.bounds())))
            .collect()
    }
}
