//! Contact triggers with a cooldown.

use crate::entity::{Collidable, Contact, EntityId, Identity, Positioned, Updatable};
use log::info;
use macroquad::math::{Rect, Vec2};

/// A static body that fires when something touches it, then stays quiet
/// until its cooldown has elapsed on the world clock.
///
/// The re-arm deadline lives on the trigger, so removing the trigger from the
/// world drops any pending re-arm with it.
#[derive(Debug, Clone)]
pub struct Trigger {
    identity: Identity,
    bounds: Rect,
    solid: bool,
    cooldown: f64,
    now: f64,
    rearm_at: Option<f64>,
    fired: Vec<EntityId>,
}

impl Trigger {
    /// Armed, solid trigger covering `bounds`.
    pub fn new(name: impl Into<String>, bounds: Rect, cooldown_secs: f64) -> Self {
        Trigger {
            identity: Identity::new(name),
            bounds,
            solid: true,
            cooldown: cooldown_secs.max(0.0),
            now: 0.0,
            rearm_at: None,
            fired: Vec::new(),
        }
    }

    /// A non-solid trigger fires without blocking.
    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// `true` between firing and re-arming.
    pub fn is_triggered(&self) -> bool {
        self.rearm_at.is_some()
    }

    /// Clock time at which the trigger re-arms, if it is waiting.
    pub fn rearm_at(&self) -> Option<f64> {
        self.rearm_at
    }

    /// Re-arms immediately, discarding the pending deadline.
    pub fn cancel(&mut self) {
        self.rearm_at = None;
    }

    /// Bodies that fired this trigger, oldest first.
    pub fn fired_by(&self) -> &[EntityId] {
        &self.fired
    }
}

impl Positioned for Trigger {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn position(&self) -> Vec2 {
        self.bounds.point()
    }

    fn set_position(&mut self, pos: Vec2) {
        self.bounds = self.bounds.offset(pos - self.bounds.point());
    }
}

impl Collidable for Trigger {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn collide_with(&mut self, other: &Contact) {
        if self.is_triggered() {
            return;
        }
        info!("trigger {} fired by {}", self.identity.name, other.name);
        self.rearm_at = Some(self.now + self.cooldown);
        self.fired.push(other.id);
    }
}

impl Updatable for Trigger {
    fn update(&mut self, now: f64) {
        self.now = now;
        if let Some(deadline) = self.rearm_at {
            if now >= deadline {
                info!("trigger {} re-armed", self.identity.name);
                self.rearm_at = None;
            }
        }
    }
}
