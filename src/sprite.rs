//! Tick-driven frame animation over a shared sprite atlas.

use crate::error::SpriteError;
use log::debug;
use macroquad::math::Rect;
use std::collections::HashMap;

/// Ticks a frame stays up unless configured otherwise.
pub const DEFAULT_TICKS_PER_FRAME: u32 = 15;

/// Named animations over one atlas image, plus the cursor of the active one.
///
/// Each animation is a flat list of pixel offsets `[x0, y0, x1, y1, ...]`;
/// every pair is the top-left corner of one `frame_w x frame_h` frame.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    frame_w: u32,
    frame_h: u32,
    scale: f32,
    animations: HashMap<String, Vec<u32>>,
    state: String,
    frame_index: usize,
    tick_counter: u32,
    ticks_per_frame: u32,
}

impl SpriteSheet {
    /// Empty sheet of `frame_w x frame_h` frames at scale 1.
    pub fn new(frame_w: u32, frame_h: u32) -> Self {
        SpriteSheet {
            frame_w,
            frame_h,
            scale: 1.0,
            animations: HashMap::new(),
            state: String::new(),
            frame_index: 0,
            tick_counter: 0,
            ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
        }
    }

    /// Draw and collision scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Frame duration in ticks, at least 1.
    pub fn with_ticks_per_frame(mut self, ticks: u32) -> Self {
        self.ticks_per_frame = ticks.max(1);
        self
    }

    /// Registers an animation. The first one registered becomes the active state.
    pub fn with_animation(
        mut self,
        key: impl Into<String>,
        offsets: Vec<u32>,
    ) -> Result<Self, SpriteError> {
        self.add_animation(key, offsets)?;
        Ok(self)
    }

    /// In-place form of [`SpriteSheet::with_animation`].
    pub fn add_animation(
        &mut self,
        key: impl Into<String>,
        offsets: Vec<u32>,
    ) -> Result<(), SpriteError> {
        let key = key.into();
        if offsets.is_empty() || offsets.len() % 2 != 0 {
            return Err(SpriteError::InvalidFrames {
                key,
                len: offsets.len(),
            });
        }
        if self.state.is_empty() {
            self.state = key.clone();
        }
        self.animations.insert(key, offsets);
        Ok(())
    }

    /// Frames laid out down one column of a regular grid, starting at `col`.
    pub fn column_frames(&self, col: u32, frames: u32) -> Vec<u32> {
        (0..frames)
            .flat_map(|row| [col * self.frame_w, row * self.frame_h])
            .collect()
    }

    /// Frames laid out along one row of a regular grid, starting at `row`.
    pub fn row_frames(&self, row: u32, frames: u32) -> Vec<u32> {
        (0..frames)
            .flat_map(|col| [col * self.frame_w, row * self.frame_h])
            .collect()
    }

    /// `true` if `key` was registered.
    pub fn has_animation(&self, key: &str) -> bool {
        self.animations.contains_key(key)
    }

    /// Active animation key.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Position inside the active animation.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Unscaled frame size.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_w, self.frame_h)
    }

    /// Draw scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// On-screen size of one frame.
    pub fn scaled_size(&self) -> (f32, f32) {
        (
            self.frame_w as f32 * self.scale,
            self.frame_h as f32 * self.scale,
        )
    }

    /// Switches the active animation, resetting the cursor when it changes.
    ///
    /// # Panics
    ///
    /// Panics if `key` was never registered. A missing state is a
    /// configuration bug; use [`SpriteSheet::try_set_state`] to check instead.
    pub fn set_state(&mut self, key: &str) {
        if let Err(e) = self.try_set_state(key) {
            panic!("{e}");
        }
    }

    /// Like [`SpriteSheet::set_state`] but reports unknown keys. Returns
    /// whether the state actually changed.
    pub fn try_set_state(&mut self, key: &str) -> Result<bool, SpriteError> {
        if !self.animations.contains_key(key) {
            return Err(SpriteError::UnknownAnimation(key.to_owned()));
        }
        if self.state == key {
            return Ok(false);
        }
        debug!("sprite state {} -> {}", self.state, key);
        self.state = key.to_owned();
        self.frame_index = 0;
        self.tick_counter = 0;
        Ok(true)
    }

    fn frames(&self) -> &[u32] {
        self.animations
            .get(&self.state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Frames in the active animation.
    pub fn frame_count(&self) -> usize {
        self.frames().len() / 2
    }

    /// One tick. Every `ticks_per_frame` calls the frame index moves on by one,
    /// wrapping at the end of the active animation.
    pub fn advance(&mut self) {
        self.tick_counter = (self.tick_counter + 1) % self.ticks_per_frame;
        if self.tick_counter == 0 {
            let count = self.frame_count();
            if count > 0 {
                self.frame_index = (self.frame_index + 1) % count;
            }
        }
    }

    /// Atlas sub-rectangle of the current frame. `None` before any animation
    /// is registered.
    pub fn current_rect(&self) -> Option<Rect> {
        let frames = self.frames();
        let i = self.frame_index * 2;
        let (x, y) = (*frames.get(i)?, *frames.get(i + 1)?);
        Some(Rect::new(
            x as f32,
            y as f32,
            self.frame_w as f32,
            self.frame_h as f32,
        ))
    }

    /// Fixed-grid lookup, independent of the animation cursor.
    pub fn sprite_at(&self, row: u32, col: u32) -> Rect {
        Rect::new(
            (col * self.frame_w) as f32,
            (row * self.frame_h) as f32,
            self.frame_w as f32,
            self.frame_h as f32,
        )
    }
}
