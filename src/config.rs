use cozy_chess::Color;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::opponent::OpponentPolicy;
use crate::view::ViewMode;

/// Serializable stand-in for `cozy_chess::Color`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl From<Side> for Color {
    fn from(s: Side) -> Color {
        match s { Side::White => Color::White, Side::Black => Color::Black }
    }
}

impl From<Color> for Side {
    fn from(c: Color) -> Side {
        match c { Color::White => Side::White, Color::Black => Side::Black }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub player: Side,
    pub policy: OpponentPolicy,
    /// Pause before the opponent replies; pacing only.
    pub delay_ms: u64,
    pub seed: u64,
    pub view: ViewMode,
    pub start_fen: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player: Side::White,
            policy: OpponentPolicy::Random,
            delay_ms: 300,
            seed: 42,
            view: ViewMode::TwoD,
            start_fen: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Missing or unreadable files fall back to defaults with a warning.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let Some(p) = path else { return Self::default() };
        match std::fs::read_to_string(p.as_ref()) {
            Ok(s) => match Self::from_json_str(&s) {
                Ok(cfg) => cfg,
                Err(e) => { warn!("ignoring config {}: {e}", p.as_ref().display()); Self::default() }
            },
            Err(e) => { warn!("cannot read config {}: {e}", p.as_ref().display()); Self::default() }
        }
    }
}
