//! Game pad state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(button)` returns true every frame the
//!   button is physically down. Used for continuous actions like running.
//!
//! - **Edge-triggered (pressed / released):** true only during the frame the
//!   transition happened. `apply_snapshot` clears them before folding in the
//!   next polled snapshot, so a START press toggles pause exactly once.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadButton {
    A,
    B,
    Z,
    Start,
    L,
    R,
    CUp,
    CDown,
    CLeft,
    CRight,
    DUp,
    DDown,
    DLeft,
    DRight,
}

impl PadButton {
    pub const ALL: &'static [PadButton] = &[
        PadButton::A,
        PadButton::B,
        PadButton::Z,
        PadButton::Start,
        PadButton::L,
        PadButton::R,
        PadButton::CUp,
        PadButton::CDown,
        PadButton::CLeft,
        PadButton::CRight,
        PadButton::DUp,
        PadButton::DDown,
        PadButton::DLeft,
        PadButton::DRight,
    ];
}

/// One polled reading of the pad: buttons currently down and the analog stick.
#[derive(Debug, Clone, Default)]
pub struct PadSnapshot {
    pub buttons: HashSet<PadButton>,
    /// Stick deflection, each axis in [-1, 1].
    pub stick: (f32, f32),
}

impl PadSnapshot {
    pub fn with_buttons(buttons: &[PadButton], stick: (f32, f32)) -> Self {
        Self {
            buttons: buttons.iter().copied().collect(),
            stick,
        }
    }
}

pub struct PadState {
    held: HashSet<PadButton>,
    just_pressed: HashSet<PadButton>,
    just_released: HashSet<PadButton>,

    pub stick: (f32, f32),
}

impl PadState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            stick: (0.0, 0.0),
        }
    }

    pub fn button_down(&mut self, button: PadButton) {
        if self.held.insert(button) {
            self.just_pressed.insert(button);
        }
    }

    pub fn button_up(&mut self, button: PadButton) {
        if self.held.remove(&button) {
            self.just_released.insert(button);
        }
    }

    pub fn is_held(&self, button: PadButton) -> bool {
        self.held.contains(&button)
    }

    pub fn is_just_pressed(&self, button: PadButton) -> bool {
        self.just_pressed.contains(&button)
    }

    pub fn is_just_released(&self, button: PadButton) -> bool {
        self.just_released.contains(&button)
    }

    /// Start a new frame from a polled snapshot. Edges from the previous frame
    /// are dropped; the stick is clamped to the unit square.
    pub fn apply_snapshot(&mut self, snapshot: &PadSnapshot) {
        self.end_frame();
        for &button in PadButton::ALL {
            if snapshot.buttons.contains(&button) {
                self.button_down(button);
            } else {
                self.button_up(button);
            }
        }
        self.stick = (
            snapshot.stick.0.clamp(-1.0, 1.0),
            snapshot.stick.1.clamp(-1.0, 1.0),
        );
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for PadState {
    fn default() -> Self {
        Self::new()
    }
}
