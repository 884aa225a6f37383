//! Follow-and-clamp camera.

use macroquad::math::{vec2, Rect, Vec2};

/// Scroll offset for a fixed-size viewport over the map.
///
/// `origin` is added to world coordinates to get screen coordinates, so it is
/// zero or negative while the view stays inside the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Added to world positions to get screen positions.
    pub origin: Vec2,
    /// Viewport size in pixels.
    pub size: Vec2,
}

impl Camera {
    /// Camera at a given origin.
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Camera { origin, size }
    }

    /// Camera at the map's top-left corner.
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Camera {
            origin: Vec2::ZERO,
            size: vec2(width, height),
        }
    }

    /// Centres the viewport on `(x, y)`.
    pub fn follow_to(&mut self, x: f32, y: f32) {
        self.origin = vec2(-x + self.size.x / 2.0, -y + self.size.y / 2.0);
    }

    /// Keeps the viewport inside a `map_w x map_h` pixel map.
    ///
    /// The upper bound (0) is applied first, then the lower bound
    /// `viewport - map`. A map smaller than the viewport pins the origin at 0.
    pub fn constrain(&mut self, map_w: f32, map_h: f32) {
        self.origin.x = self.origin.x.min(0.0);
        self.origin.y = self.origin.y.min(0.0);

        self.origin.x = self.origin.x.max((self.size.x - map_w).min(0.0));
        self.origin.y = self.origin.y.max((self.size.y - map_h).min(0.0));
    }

    /// World to screen.
    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.origin
    }

    /// Screen to world.
    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.origin
    }

    /// The part of the world currently in view.
    pub fn view_rect(&self) -> Rect {
        Rect::new(-self.origin.x, -self.origin.y, self.size.x, self.size.y)
    }
}
