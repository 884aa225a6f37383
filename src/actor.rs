//! Player- and AI-driven actors: direction input, bounded stepping, attack state.

use crate::entity::{Collidable, Contact, Drawable, EntityId, Identity, Positioned, SpriteFrame, Updatable};
use crate::sprite::SpriteSheet;
use log::debug;
use macroquad::math::{vec2, Rect, Vec2};
use std::fmt;

const ATTACK_PREFIX: &str = "attack/";

/// One of the four walking directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl Direction {
    /// Picks one direction from held keys, in priority right, left, up, down.
    pub fn from_held(right: bool, left: bool, up: bool, down: bool) -> Option<Direction> {
        if right {
            Some(Direction::Right)
        } else if left {
            Some(Direction::Left)
        } else if up {
            Some(Direction::Up)
        } else if down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// `None` for anything but `"up"`, `"down"`, `"left"`, `"right"`.
    pub fn parse(token: &str) -> Option<Direction> {
        match token {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Animation state used while facing this way.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Unit step in screen space, y pointing down.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => vec2(0.0, -1.0),
            Direction::Down => vec2(0.0, 1.0),
            Direction::Left => vec2(-1.0, 0.0),
            Direction::Right => vec2(1.0, 0.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the player (or an AI) wants an actor to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    /// Requested walking direction, if any.
    pub direction: Option<Direction>,
    /// Start the attack animation when standing still.
    pub attack: bool,
}

impl Intent {
    /// Walk one step in `direction`.
    pub fn moving(direction: Direction) -> Self {
        Intent {
            direction: Some(direction),
            attack: false,
        }
    }

    /// Attack without moving.
    pub fn attack() -> Self {
        Intent {
            direction: None,
            attack: true,
        }
    }
}

/// `true` when a sprite of size `size` placed at `pos` fits the map.
#[inline]
pub fn is_inside_boundary(pos: Vec2, size: Vec2, map_size: Vec2) -> bool {
    pos.x >= 0.0 && pos.x < map_size.x - size.x && pos.y >= 0.0 && pos.y < map_size.y - size.y
}

/// A moving, animated, solid body.
#[derive(Debug, Clone)]
pub struct Actor {
    identity: Identity,
    pos: Vec2,
    delta: Vec2,
    speed: f32,
    sheet: SpriteSheet,
    solid: bool,
    contacts: Vec<EntityId>,
}

impl Actor {
    /// New solid actor facing its sheet's first animation, speed 1.
    pub fn new(name: impl Into<String>, sheet: SpriteSheet, pos: Vec2) -> Self {
        Actor {
            identity: Identity::new(name),
            pos,
            delta: Vec2::ZERO,
            speed: 1.0,
            sheet,
            solid: true,
            contacts: Vec::new(),
        }
    }

    /// Pixels moved per step.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Non-solid actors are reported in contacts but never block.
    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Pixels moved per step.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Movement applied during the last [`Actor::step`].
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Animation state and frames.
    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    /// Mutable access to the sprite sheet, for registering animations.
    pub fn sheet_mut(&mut self) -> &mut SpriteSheet {
        &mut self.sheet
    }

    /// Ids of the bodies this actor touched since contacts were last cleared,
    /// in callback order.
    pub fn contacts(&self) -> &[EntityId] {
        &self.contacts
    }

    /// Forgets recorded contacts; the world does this at the start of a tick.
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// Scaled frame size, which is also the collision box.
    pub fn size(&self) -> Vec2 {
        let (w, h) = self.sheet.scaled_size();
        vec2(w, h)
    }

    /// `true` while an `attack/...` animation is active.
    pub fn is_attacking(&self) -> bool {
        self.sheet.state().starts_with(ATTACK_PREFIX)
    }

    /// Moves one tick along `intent`, staying inside a map of `map_size` pixels.
    ///
    /// The facing animation follows the requested direction even when the move
    /// is refused at the map edge.
    ///
    /// # Panics
    ///
    /// Panics if the sprite sheet has no animation named after the direction,
    /// or, on an attack, no `attack/<facing>` animation.
    pub fn step(&mut self, intent: Intent, map_size: Vec2) {
        self.delta = Vec2::ZERO;

        match intent.direction {
            Some(dir) => {
                let offset = dir.unit() * self.speed;
                if is_inside_boundary(self.pos + offset, self.size(), map_size) {
                    self.delta = offset;
                }
                self.sheet.set_state(dir.as_str());
            }
            None if intent.attack => self.start_attack(),
            None => {}
        }

        self.pos += self.delta;
    }

    /// Same as [`Actor::step`] with a direction token; unknown tokens do nothing.
    pub fn step_towards(&mut self, token: &str, map_size: Vec2) -> bool {
        match Direction::parse(token) {
            Some(dir) => {
                self.step(Intent::moving(dir), map_size);
                true
            }
            None => {
                debug!("{}: ignoring unknown direction {:?}", self.name(), token);
                false
            }
        }
    }

    fn start_attack(&mut self) {
        if self.is_attacking() {
            return;
        }
        let key = format!("{ATTACK_PREFIX}{}", self.sheet.state());
        self.sheet.set_state(&key);
    }
}

impl Positioned for Actor {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

impl Collidable for Actor {
    fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::new(self.pos.x, self.pos.y, size.x, size.y)
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn collide_with(&mut self, other: &Contact) {
        self.contacts.push(other.id);
    }
}

impl Updatable for Actor {
    fn update(&mut self, _now: f64) {
        self.sheet.advance();
    }
}

impl Drawable for Actor {
    fn frame(&self) -> Option<SpriteFrame> {
        Some(SpriteFrame {
            source: self.sheet.current_rect()?,
            dest: self.pos,
            scale: self.sheet.scale(),
        })
    }
}
