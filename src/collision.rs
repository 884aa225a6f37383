//! Axis-separated collision undo.
//!
//! After an actor has moved, the horizontal pass runs over every other body
//! and then the vertical pass does the same. Each pass only ever reverts its
//! own axis. A diagonal corner hit that neither pass sees on its own is left
//! unresolved.

use crate::entity::{overlaps, Collidable};
use macroquad::math::{vec2, Vec2};

/// Which half of the movement a pass checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// x only.
    Horizontal,
    /// y only.
    Vertical,
}

impl Axis {
    /// The part of `delta` that lies on this axis.
    #[inline]
    pub fn component(self, delta: Vec2) -> Vec2 {
        match self {
            Axis::Horizontal => vec2(delta.x, 0.0),
            Axis::Vertical => vec2(0.0, delta.y),
        }
    }
}

/// Checks `mover` against `others` on one axis.
///
/// For each overlapping body the mover's callback runs first, then the
/// other's. If both are solid the mover is put back to where the pass started,
/// minus this axis' share of `delta`. Returns the number of overlaps seen.
pub fn resolve_axis<'a, M, I>(axis: Axis, mover: &mut M, delta: Vec2, others: I) -> usize
where
    M: Collidable + ?Sized,
    I: IntoIterator<Item = &'a mut dyn Collidable>,
{
    let start = mover.position();
    let undo = axis.component(delta);
    let mut hits = 0;

    for other in others {
        if other.id() == mover.id() {
            continue;
        }
        if !overlaps(&mover.bounds(), &other.bounds()) {
            continue;
        }
        hits += 1;

        let theirs = other.contact();
        let mine = mover.contact();
        mover.collide_with(&theirs);
        other.collide_with(&mine);

        if mover.is_solid() && other.is_solid() {
            mover.set_position(start - undo);
        }
    }

    hits
}

/// Horizontal pass fully, then vertical pass, over a slice of bodies.
///
/// `mover` indexes into `bodies`; `statics` are extra bodies that never move.
pub fn resolve_in<B, S>(mover: usize, delta: Vec2, bodies: &mut [B], statics: &mut [S]) -> usize
where
    B: Collidable,
    S: Collidable,
{
    if mover >= bodies.len() {
        return 0;
    }
    let mut hits = 0;
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (before, rest) = bodies.split_at_mut(mover);
        let Some((me, after)) = rest.split_first_mut() else {
            return hits;
        };
        let others = before
            .iter_mut()
            .chain(after.iter_mut())
            .map(|b| b as &mut dyn Collidable)
            .chain(statics.iter_mut().map(|s| s as &mut dyn Collidable));
        hits += resolve_axis(axis, me, delta, others);
    }
    hits
}
