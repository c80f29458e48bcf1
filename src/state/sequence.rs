//! Color sequence generation, difficulty curve and playback planning.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Flash duration used for the first stage of the game.
pub const BASE_SPEED_MS: u32 = 600;
/// Floor of the second stage (rounds 31–60).
pub const MEDIUM_SPEED_FLOOR_MS: u32 = 350;
/// Absolute floor of the curve (rounds 61+).
pub const MIN_SPEED_MS: u32 = 300;
/// Rounds per difficulty step, also used to derive the displayed level.
pub const ROUNDS_PER_STAGE: u32 = 10;

const EASY_STAGE_LAST_ROUND: u32 = 30;
const MEDIUM_STAGE_LAST_ROUND: u32 = 60;
const MEDIUM_STEP_MS: u32 = 50;
const HARD_STEP_MS: u32 = 30;

/// One of the four pads of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    /// Every color in board order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Lowercase identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// Note played when this pad flashes (C major arpeggio, C4 to C5).
    pub fn tone_hz(self) -> f32 {
        match self {
            Color::Red => 261.63,
            Color::Blue => 329.63,
            Color::Green => 392.0,
            Color::Yellow => 523.25,
        }
    }

    /// Keyboard shortcut bound to this pad.
    pub fn key_binding(self) -> char {
        match self {
            Color::Red => '1',
            Color::Blue => '2',
            Color::Green => '3',
            Color::Yellow => '4',
        }
    }

    /// Resolve a keyboard shortcut back to its pad.
    pub fn from_key(key: char) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.key_binding() == key)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names neither a color nor a shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color `{0}`")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts color names (case-insensitive) and the `1`–`4` shortcuts.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if let Some(color) = Color::from_key(key) {
                return Ok(color);
            }
        }

        Color::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseColorError(value.to_string()))
    }
}

/// Errors raised when building a [`Palette`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,
    #[error("palette lists `{0}` more than once")]
    Duplicate(Color),
}

/// Non-empty, duplicate-free set of colors the sequence is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        for (index, color) in colors.iter().enumerate() {
            if colors[..index].contains(color) {
                return Err(PaletteError::Duplicate(*color));
            }
        }
        Ok(Self(colors))
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true once the palette is built.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0.contains(&color)
    }

    /// Draw one color uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.0[rng.random_range(0..self.0.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Color::ALL.to_vec())
    }
}

/// Return `sequence` extended by one color drawn from `palette`.
pub fn append_random_color<R: Rng + ?Sized>(
    mut sequence: Vec<Color>,
    palette: &Palette,
    rng: &mut R,
) -> Vec<Color> {
    sequence.push(palette.pick(rng));
    sequence
}

/// Flash duration for `round`, a three-stage non-increasing step function.
///
/// Rounds 1–30 stay at 600 ms; rounds 31–60 lose 50 ms every full ten rounds, floored
/// at 350 ms; from round 61 the curve drops 30 ms every full ten rounds down to 300 ms.
/// Round 0 is treated as round 1.
pub fn speed_for_round(round: u32) -> u32 {
    let round = round.max(1);
    if round <= EASY_STAGE_LAST_ROUND {
        BASE_SPEED_MS
    } else if round <= MEDIUM_STAGE_LAST_ROUND {
        let stages = (round - EASY_STAGE_LAST_ROUND) / ROUNDS_PER_STAGE;
        BASE_SPEED_MS
            .saturating_sub(stages * MEDIUM_STEP_MS)
            .max(MEDIUM_SPEED_FLOOR_MS)
    } else {
        let stages = (round - MEDIUM_STAGE_LAST_ROUND) / ROUNDS_PER_STAGE;
        MEDIUM_SPEED_FLOOR_MS
            .saturating_sub(stages.saturating_mul(HARD_STEP_MS))
            .max(MIN_SPEED_MS)
    }
}

/// Displayed level for `round`: one level per ten rounds, starting at 1.
pub fn level_for_round(round: u32) -> u32 {
    round.max(1).div_ceil(ROUNDS_PER_STAGE)
}

/// A single scheduled flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlaybackStep {
    /// Zero-based position in the sequence.
    pub index: usize,
    pub color: Color,
    /// How long the pad stays lit.
    pub flash_ms: u32,
    /// Pause after the flash before the next step (or before input opens).
    pub gap_ms: u32,
}

impl PlaybackStep {
    /// Delay between the start of this step and the start of the next one.
    pub fn step_ms(&self) -> u64 {
        u64::from(self.flash_ms) + u64::from(self.gap_ms)
    }
}

/// Lazy playback plan for one round: the driver pulls one step at a time and sleeps
/// [`PlaybackStep::step_ms`] between pulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    round: u32,
    lead_in_ms: u32,
    speed_ms: u32,
    colors: Vec<Color>,
    cursor: usize,
}

impl Playback {
    pub fn new(round: u32, colors: Vec<Color>, lead_in_ms: u32) -> Self {
        Self {
            round,
            lead_in_ms,
            speed_ms: speed_for_round(round),
            colors,
            cursor: 0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Delay before the first flash.
    pub fn lead_in_ms(&self) -> u32 {
        self.lead_in_ms
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Wall-clock length of the whole plan, lead-in included.
    pub fn total_duration_ms(&self) -> u64 {
        let per_step = u64::from(self.speed_ms) * 2;
        u64::from(self.lead_in_ms) + per_step * self.colors.len() as u64
    }
}

impl Iterator for Playback {
    type Item = PlaybackStep;

    fn next(&mut self) -> Option<Self::Item> {
        let color = *self.colors.get(self.cursor)?;
        let step = PlaybackStep {
            index: self.cursor,
            color,
            flash_ms: self.speed_ms,
            gap_ms: self.speed_ms,
        };
        self.cursor += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.colors.len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Playback {}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn first_stage_is_flat() {
        for round in 0..=30 {
            assert_eq!(speed_for_round(round), 600, "round {round}");
        }
    }

    #[test]
    fn second_stage_steps_every_ten_rounds() {
        assert_eq!(speed_for_round(31), 600);
        assert_eq!(speed_for_round(39), 600);
        assert_eq!(speed_for_round(40), 550);
        assert_eq!(speed_for_round(50), 500);
        assert_eq!(speed_for_round(60), 450);
    }

    #[test]
    fn third_stage_is_floored() {
        assert_eq!(speed_for_round(61), 350);
        assert_eq!(speed_for_round(70), 320);
        assert_eq!(speed_for_round(80), 300);
        assert_eq!(speed_for_round(100), 300);
        assert_eq!(speed_for_round(u32::MAX), 300);
    }

    #[test]
    fn level_starts_at_one() {
        assert_eq!(level_for_round(0), 1);
        assert_eq!(level_for_round(1), 1);
        assert_eq!(level_for_round(10), 1);
        assert_eq!(level_for_round(11), 2);
    }

    #[test]
    fn append_adds_exactly_one_palette_color() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = Palette::new(vec![Color::Green, Color::Yellow]).unwrap();
        let before = vec![Color::Red, Color::Blue];

        let after = append_random_color(before.clone(), &palette, &mut rng);
        assert_eq!(after.len(), 3);
        assert_eq!(&after[..2], &before[..]);
        assert!(palette.contains(after[2]));
    }

    #[test]
    fn palette_rejects_empty_and_duplicates() {
        assert_eq!(Palette::new(vec![]), Err(PaletteError::Empty));
        assert_eq!(
            Palette::new(vec![Color::Red, Color::Blue, Color::Red]),
            Err(PaletteError::Duplicate(Color::Red))
        );
    }

    #[test]
    fn colors_parse_from_names_and_shortcuts() {
        assert_eq!("red".parse::<Color>(), Ok(Color::Red));
        assert_eq!(" Yellow ".parse::<Color>(), Ok(Color::Yellow));
        assert_eq!("2".parse::<Color>(), Ok(Color::Blue));
        assert!("purple".parse::<Color>().is_err());
        assert!("5".parse::<Color>().is_err());
    }

    #[test]
    fn playback_yields_each_color_with_round_speed() {
        let colors = vec![Color::Red, Color::Green, Color::Red];
        let playback = Playback::new(45, colors.clone(), 500);
        assert_eq!(playback.len(), 3);
        assert_eq!(playback.total_duration_ms(), 500 + 3 * 2 * 550);

        let steps: Vec<_> = playback.collect();
        assert_eq!(
            steps.iter().map(|step| step.color).collect::<Vec<_>>(),
            colors
        );
        assert!(steps.iter().all(|step| step.flash_ms == 550 && step.gap_ms == 550));
        assert_eq!(steps[2].index, 2);
    }
}
