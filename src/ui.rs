//! HUD and menu view models
//!
//! Plain data describing what each phase shows. Text rendering is up to the
//! embedding application.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::highscores::{HighScores, MAX_HIGH_SCORES, format_date};
use crate::sim::items::{ItemColor, ItemKind};
use crate::sim::session::{GameMode, GamePhase, Session};
use crate::sim::state::GameState;

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub time: String,
    pub date: String,
    /// The entry just recorded this run
    pub highlight: bool,
}

/// One choice on the mode selection screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeOption {
    /// Number key that picks it
    pub key: char,
    pub name: &'static str,
    pub multiplier: f32,
    pub selected: bool,
}

/// In-game status bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBar {
    pub score: u32,
    pub target: u32,
    /// 0..=1
    pub progress: f32,
    pub time: String,
    pub mode: &'static str,
    pub color: ItemColor,
}

/// What to draw over the world for the current phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HudView {
    Playing(StatusBar),
    Paused(StatusBar),
    GameOver {
        score: u32,
        time: String,
    },
    NameEntry {
        score: u32,
        time: String,
        name: String,
        max_len: usize,
        rank: Option<usize>,
    },
    HighScores {
        rows: Vec<ScoreRow>,
    },
    ModeSelect {
        options: Vec<ModeOption>,
    },
}

impl HudView {
    pub fn for_state(state: &GameState, scores: &HighScores, now: DateTime<Local>) -> Self {
        let session = &state.session;
        match session.phase {
            GamePhase::Playing => HudView::Playing(status_bar(session, state.player.color)),
            GamePhase::Paused => HudView::Paused(status_bar(session, state.player.color)),
            GamePhase::GameOver => HudView::GameOver {
                score: session.final_score,
                time: format_time(session.final_time),
            },
            GamePhase::NameEntry => HudView::NameEntry {
                score: session.final_score,
                time: format_time(session.final_time),
                name: session.entered_name.clone(),
                max_len: crate::consts::MAX_NAME_LEN,
                rank: scores.potential_rank(session.final_score, session.final_time),
            },
            GamePhase::HighScores => HudView::HighScores {
                rows: score_rows(scores, session.score_position, now),
            },
            GamePhase::ModeSelect => HudView::ModeSelect {
                options: GameMode::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, &mode)| ModeOption {
                        key: char::from(b'1' + i as u8),
                        name: mode.as_str(),
                        multiplier: mode.margin_multiplier(),
                        selected: mode == session.mode,
                    })
                    .collect(),
            },
        }
    }
}

fn status_bar(session: &Session, color: ItemColor) -> StatusBar {
    StatusBar {
        score: session.score,
        target: session.target_score,
        progress: session.progress(),
        time: format_time(session.elapsed),
        mode: session.mode.as_str(),
        color,
    }
}

/// Leaderboard rows, flagging the 1-based `highlight` rank (0 for none)
pub fn score_rows(scores: &HighScores, highlight: usize, now: DateTime<Local>) -> Vec<ScoreRow> {
    scores
        .top(MAX_HIGH_SCORES)
        .iter()
        .enumerate()
        .map(|(i, entry)| ScoreRow {
            rank: i + 1,
            name: entry.name.clone(),
            score: entry.score,
            time: format_time(entry.time),
            date: format_date(&entry.date.with_timezone(&Local), &now),
            highlight: i + 1 == highlight,
        })
        .collect()
}

/// Seconds as `M:SS.ss`
pub fn format_time(seconds: f32) -> String {
    let hundredths = (seconds.max(0.0) * 100.0).round() as u32;
    let (minutes, rest) = (hundredths / 6000, hundredths % 6000);
    format!("{}:{:02}.{:02}", minutes, rest / 100, rest % 100)
}

/// Frames averaged by `FpsCounter`
const FPS_WINDOW: usize = 60;

/// Frame rate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    recorded: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            recorded: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame presented at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.recorded += 1;

        // Oldest sample sits in the slot we write next
        if self.recorded >= FPS_WINDOW {
            let elapsed = time - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    /// 0 until a full window has been recorded
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Controls and scoring help shown at startup
pub fn help_lines() -> Vec<String> {
    let mut lines = vec![
        "Collect 100 points as fast as possible!".to_string(),
        "Matching colors score; any other color resets you to 0 and recolors you.".to_string(),
        "WASD / arrows: move   R: restart   H: high scores   M: mode   P: pause".to_string(),
        "F: fullscreen   Esc: quit".to_string(),
    ];
    for kind in [
        ItemKind::Battery,
        ItemKind::Gear,
        ItemKind::Gem,
        ItemKind::Crystal,
        ItemKind::PowerCore,
    ] {
        let props = kind.props();
        lines.push(format!(
            "  {} ({}): {} point{}",
            kind.name(),
            props.color.as_str(),
            props.value,
            if props.value == 1 { "" } else { "s" }
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(
            1,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            GameMode::Spency,
            ItemColor::Yellow,
        )
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.00");
        assert_eq!(format_time(7.5), "0:07.50");
        assert_eq!(format_time(83.25), "1:23.25");
        assert_eq!(format_time(-3.0), "0:00.00");
        assert_eq!(format_time(59.999), "1:00.00");
        assert_eq!(format_time(119.996), "2:00.00");
    }

    #[test]
    fn test_playing_view_shows_progress() {
        let mut state = state();
        state.session.score = 25;
        state.session.elapsed = 12.0;
        let view = HudView::for_state(&state, &HighScores::new(), Local::now());
        let HudView::Playing(bar) = view else {
            panic!("expected playing view");
        };
        assert_eq!(bar.score, 25);
        assert_eq!(bar.target, TARGET_SCORE);
        assert_eq!(bar.progress, 0.25);
        assert_eq!(bar.time, "0:12.00");
        assert_eq!(bar.mode, "Spency");
    }

    #[test]
    fn test_name_entry_view_reports_rank() {
        let mut state = state();
        let mut scores = HighScores::new();
        scores.add_score("fast", 100, 10.0);
        state.session.score = 100;
        state.session.elapsed = 20.0;
        state.session.complete();
        state.session.resolve_game_over(&scores);
        state.session.push_name_char('Q');

        match HudView::for_state(&state, &scores, Local::now()) {
            HudView::NameEntry { name, rank, max_len, .. } => {
                assert_eq!(name, "Q");
                assert_eq!(rank, Some(2));
                assert_eq!(max_len, MAX_NAME_LEN);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_high_score_rows_highlight_new_entry() {
        let mut scores = HighScores::new();
        scores.add_score("a", 100, 10.0);
        scores.add_score("b", 100, 5.0);
        let now = scores.entries[0].date.with_timezone(&Local);
        let rows = score_rows(&scores, 1, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "b");
        assert!(rows[0].highlight);
        assert!(!rows[1].highlight);
        assert_eq!(rows[0].date, "Just now");
    }

    #[test]
    fn test_mode_select_lists_all_modes() {
        let mut state = state();
        state.session.toggle_mode_select();
        let HudView::ModeSelect { options } = HudView::for_state(&state, &HighScores::new(), Local::now())
        else {
            panic!("expected mode select");
        };
        let keys: Vec<char> = options.iter().map(|o| o.key).collect();
        assert_eq!(keys, vec!['1', '2', '3']);
        assert!(options[1].selected);
        assert_eq!(options[0].multiplier, 3.5);
    }

    #[test]
    fn test_fps_counter_averages_full_window() {
        let mut counter = FpsCounter::new();
        for frame in 0..30 {
            counter.record(frame as f64 / 30.0);
        }
        assert_eq!(counter.fps(), 0);

        for frame in 30..150 {
            counter.record(frame as f64 / 30.0);
        }
        assert_eq!(counter.fps(), 30);
    }

    #[test]
    fn test_help_lists_every_item() {
        let help = help_lines();
        assert!(help.iter().any(|l| l.contains("power_core (red): 20 points")));
        assert!(help.iter().any(|l| l.contains("battery (yellow): 1 point")));
    }
}
