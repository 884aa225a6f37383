//! Entity ids and the capability traits shared by actors and triggers.

use macroquad::math::{Rect, Vec2};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle for anything placed in a world or grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Allocates the next id. Safe to call from any thread.
    pub fn next() -> Self {
        EntityId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Name, tag and creation time attached to an [`EntityId`].
#[derive(Debug, Clone)]
pub struct Identity {
    /// Unique id.
    pub id: EntityId,
    /// Human-readable name, used in logs.
    pub name: String,
    /// Free-form group label.
    pub tag: String,
    /// Milliseconds since the Unix epoch at creation.
    pub created_ms: u128,
}

impl Identity {
    /// Identity with a fresh id and the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let created_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            id: EntityId::next(),
            name: name.into(),
            tag: String::new(),
            created_ms,
        }
    }

    /// Sets the group label.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// What a collision callback learns about the other body.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Id of the other body.
    pub id: EntityId,
    /// Name of the other body.
    pub name: String,
    /// Its bounds at the time of contact.
    pub bounds: Rect,
}

/// Anything with an identity and a world position.
pub trait Positioned {
    /// Id, name and tag.
    fn identity(&self) -> &Identity;
    /// Top-left corner in world space.
    fn position(&self) -> Vec2;
    /// Moves the body without any collision check.
    fn set_position(&mut self, pos: Vec2);

    /// Shorthand for `identity().id`.
    fn id(&self) -> EntityId {
        self.identity().id
    }
}

/// A body the collision resolver can test and push back.
pub trait Collidable: Positioned {
    /// World-space axis-aligned bounding box.
    fn bounds(&self) -> Rect;

    /// Two solid bodies block each other; anything else only reports contact.
    fn is_solid(&self) -> bool {
        true
    }

    /// Called once per overlapping pair and pass.
    fn collide_with(&mut self, _other: &Contact) {}

    /// Snapshot handed to the other body's callback.
    fn contact(&self) -> Contact {
        Contact {
            id: self.id(),
            name: self.identity().name.clone(),
            bounds: self.bounds(),
        }
    }
}

/// Per-tick behaviour driven by the world clock (seconds since start).
pub trait Updatable {
    /// Advances one tick; `now` is the world clock in seconds.
    fn update(&mut self, now: f64);
}

/// A frame of a sprite atlas placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    /// Sub-rectangle of the atlas, in pixels.
    pub source: Rect,
    /// Top-left corner in world space.
    pub dest: Vec2,
    /// Draw scale applied to `source`.
    pub scale: f32,
}

/// Something that shows one sprite frame.
pub trait Drawable {
    /// `None` when there is nothing to draw this frame.
    fn frame(&self) -> Option<SpriteFrame>;
}

/// Strict AABB overlap; touching edges do not count.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}
