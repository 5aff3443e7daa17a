//! Fixed timestep simulation tick
//!
//! Advances the game by one step: phase actions first, then (while playing)
//! movement, world generation, collection, scoring, timer and camera.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollectionEvent;
use super::items::ItemColor;
use super::session::{GameMode, GamePhase, ScoreChange};
use super::state::GameState;
use crate::consts::*;
use crate::highscores::HighScores;

/// A text-editing key for name entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKey {
    Char(char),
    Backspace,
    Enter,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held movement, each axis in [-1, 1] (+y is up)
    pub movement: Vec2,
    /// Start a fresh run (from any phase)
    pub restart: bool,
    /// Show / leave the leaderboard
    pub toggle_high_scores: bool,
    /// Enter / leave the mode selection screen
    pub toggle_mode_select: bool,
    /// Mode picked on the selection screen
    pub select_mode: Option<GameMode>,
    /// Pause toggle
    pub pause: bool,
    /// Name entry keystrokes, in order
    pub text: Vec<TextKey>,
    /// Idle/demo mode - AI steers the player
    pub idle_mode: bool,
}

/// Things that happened during a tick, for audio/UI/logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ItemCollected(CollectionEvent),
    /// Wrong color picked up: score wiped
    ScoreReset { new_color: ItemColor },
    GameCompleted { score: u32, time: f32 },
    HighScoreRecorded { rank: usize },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Advance the game state by one fixed timestep
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    scores: &mut HighScores,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let phase_before = state.session.phase;
    state.time_ticks += 1;

    if input.restart {
        state.restart();
    } else {
        match state.session.phase {
            GamePhase::Playing => tick_playing(state, input, dt, &mut events),
            GamePhase::GameOver => state.session.resolve_game_over(scores),
            GamePhase::NameEntry => {
                for key in &input.text {
                    match *key {
                        TextKey::Char(c) => {
                            state.session.push_name_char(c);
                        }
                        TextKey::Backspace => state.session.pop_name_char(),
                        TextKey::Enter => {
                            let rank = state.session.confirm_name(scores);
                            events.push(GameEvent::HighScoreRecorded { rank });
                            break;
                        }
                    }
                }
            }
            GamePhase::HighScores => {
                if input.toggle_high_scores {
                    state.restart();
                }
            }
            GamePhase::Paused => {
                if input.pause {
                    state.session.toggle_pause();
                }
            }
            GamePhase::ModeSelect => {
                if let Some(mode) = input.select_mode {
                    state.session.select_mode(mode);
                } else if input.toggle_mode_select {
                    state.session.toggle_mode_select();
                }
            }
        }
    }

    let phase_after = state.session.phase;
    if phase_after != phase_before {
        events.push(GameEvent::PhaseChanged {
            from: phase_before,
            to: phase_after,
        });
    }
    events
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    // Menu actions take the whole tick
    if input.pause {
        state.session.toggle_pause();
        return;
    }
    if input.toggle_mode_select {
        state.session.toggle_mode_select();
        return;
    }
    if input.toggle_high_scores {
        state.session.show_high_scores();
        return;
    }

    let direction = if input.idle_mode {
        autopilot(state)
    } else {
        input.movement
    };
    state.player.steer(direction);
    state.player.step(dt, &state.obstacles);

    let pos = state.player.pos;
    state.items.update_generation(pos);
    state.obstacles.update_generation(pos);

    // Items are applied one at a time; once the run completes the rest
    // stay in the world
    let radius = state.player.radius;
    let session = &mut state.session;
    let color = &mut state.player.color;
    state.items.collect(pos, radius, |event| {
        if !session.is_playing() {
            return false;
        }
        events.push(GameEvent::ItemCollected(*event));
        match session.apply_collection(event, color) {
            ScoreChange::Added(_) => {
                if !session.is_playing() {
                    events.push(GameEvent::GameCompleted {
                        score: session.final_score,
                        time: session.final_time,
                    });
                }
            }
            ScoreChange::Reset { new_color } => {
                events.push(GameEvent::ScoreReset { new_color });
            }
        }
        true
    });

    state.session.tick_timer(dt);

    let multiplier = state.session.margin_multiplier();
    state.camera.follow(state.player.pos, state.screen, multiplier);
    state.background.update_generation(state.camera.pos, state.screen);
}

/// Demo steering: head for the nearest item of the player's color, or the
/// nearest item at all when none match. Sidesteps when the last move was
/// fully blocked.
fn autopilot(state: &GameState) -> Vec2 {
    let pos = state.player.pos;
    let nearby = state.items.visible(pos, RENDER_RADIUS);

    let nearest = |matching: bool| {
        nearby
            .iter()
            .filter(|item| !matching || item.color() == state.player.color)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .total_cmp(&b.pos.distance_squared(pos))
            })
            .map(|item| item.pos)
    };

    let Some(target) = nearest(true).or_else(|| nearest(false)) else {
        return Vec2::X;
    };

    let dir = (target - pos).normalize_or_zero();
    let stuck = state.player.vel != Vec2::ZERO && state.player.pos == state.player.prev_pos;
    if stuck { dir.perp() } else { dir }
}
