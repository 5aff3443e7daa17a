//! Platform abstraction layer
//!
//! Translates raw key events from whatever window layer hosts the game into
//! per-tick `TickInput`s. Movement keys are held state; everything else is a
//! one-shot that is consumed by the next tick.

use std::collections::HashSet;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::session::{GameMode, GamePhase};
use crate::sim::state::GameState;
use crate::sim::tick::{TextKey, TickInput};

/// Keys the game cares about. Letters and digits arrive as `Char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Movement direction a key maps to, if any
fn direction_of(key: Key) -> Option<Vec2> {
    match key {
        Key::Up | Key::Char('w') => Some(Vec2::Y),
        Key::Down | Key::Char('s') => Some(Vec2::NEG_Y),
        Key::Left | Key::Char('a') => Some(Vec2::NEG_X),
        Key::Right | Key::Char('d') => Some(Vec2::X),
        _ => None,
    }
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Accumulated input between ticks
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pending: TickInput,
    /// Demo mode: the autopilot steers
    pub idle_mode: bool,
    fullscreen_requested: bool,
    quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one key event in. Name entry captures typing, so letters that are
    /// shortcuts elsewhere go into the name instead.
    pub fn handle(&mut self, event: KeyEvent, phase: GamePhase) {
        if !event.pressed {
            self.held.remove(&normalize(event.key));
            return;
        }

        if phase == GamePhase::NameEntry {
            match event.key {
                Key::Char(c) => self.pending.text.push(TextKey::Char(c)),
                Key::Backspace => self.pending.text.push(TextKey::Backspace),
                Key::Enter => self.pending.text.push(TextKey::Enter),
                Key::Escape => self.quit_requested = true,
                _ => {}
            }
            return;
        }

        let key = normalize(event.key);
        if direction_of(key).is_some() {
            self.held.insert(key);
            return;
        }

        match key {
            Key::Escape => self.quit_requested = true,
            Key::Char('r') => self.pending.restart = true,
            Key::Char('h') => self.pending.toggle_high_scores = true,
            Key::Char('m') => self.pending.toggle_mode_select = true,
            Key::Char('p') => self.pending.pause = true,
            Key::Char('f') => self.fullscreen_requested = !self.fullscreen_requested,
            Key::Char(c @ '1'..='3') if phase == GamePhase::ModeSelect => {
                let index = c as usize - '1' as usize;
                self.pending.select_mode = Some(GameMode::ALL[index]);
            }
            _ => {}
        }
    }

    /// Per-axis direction from held keys, each axis in [-1, 1]
    pub fn movement(&self) -> Vec2 {
        self.held
            .iter()
            .filter_map(|&key| direction_of(key))
            .fold(Vec2::ZERO, |acc, dir| acc + dir)
            .clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    /// Input for the next tick. One-shots are cleared, so calling this again
    /// within the same frame only carries movement.
    pub fn take_tick_input(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.movement = self.movement();
        input.idle_mode = self.idle_mode;
        input
    }

    /// Drop held keys (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Start from the saved fullscreen preference
    pub fn set_fullscreen(&mut self, on: bool) {
        self.fullscreen_requested = on;
    }

    /// Carry the F-key toggle into the settings and the game's screen size.
    /// `display` is the area used while fullscreen. Returns true when the
    /// preference changed and should be saved.
    pub fn sync_fullscreen(
        &self,
        settings: &mut Settings,
        state: &mut GameState,
        display: Vec2,
    ) -> bool {
        if self.fullscreen_requested == settings.fullscreen {
            return false;
        }
        settings.fullscreen = self.fullscreen_requested;
        state.resize(settings.viewport(display));
        log::info!(
            "Fullscreen {}, screen {}x{}",
            if settings.fullscreen { "on" } else { "off" },
            state.screen.x,
            state.screen.y
        );
        true
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
