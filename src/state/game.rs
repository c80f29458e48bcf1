use std::mem;

use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::state::{
    sequence::{Color, Palette, Playback, append_random_color, level_for_round, speed_for_round},
    state_machine::{
        GameEvent, GamePhase, GameStateMachine, InputVerdict, InvalidTransition, Snapshot,
    },
};

/// Lead-in used when none is configured.
pub const DEFAULT_LEAD_IN_MS: u32 = 500;

/// Reasons a session event is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The event is not valid in the current phase.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// The event targets a session that has since been restarted.
    #[error("event for stale session {got} ignored (current session is {current})")]
    StaleSession { current: Uuid, got: Uuid },
}

/// What a submitted color did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Correct; `remaining` more colors are expected this round.
    Continue { remaining: usize },
    /// Correct and complete; the round can be advanced.
    RoundComplete,
    /// Wrong color; the session is over.
    GameOver { final_score: u32 },
}

/// One play-through: the growing sequence, the player's input and the round counter.
///
/// Every transition method takes the caller's session id so delayed callbacks that
/// outlived a restart are rejected as [`SessionError::StaleSession`].
#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    machine: GameStateMachine,
    sequence: Vec<Color>,
    user_input: Vec<Color>,
    round: u32,
    play_count: u32,
    palette: Palette,
    lead_in_ms: u32,
    rng: StdRng,
}

impl GameSession {
    /// Create an idle session drawing colors from the OS random source.
    pub fn new(palette: Palette, lead_in_ms: u32) -> Self {
        Self::with_rng(palette, lead_in_ms, StdRng::from_os_rng())
    }

    /// Create an idle session with an explicit random source.
    pub fn with_rng(palette: Palette, lead_in_ms: u32, rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            machine: GameStateMachine::new(),
            sequence: Vec::new(),
            user_input: Vec::new(),
            round: 1,
            play_count: 0,
            palette,
            lead_in_ms,
            rng,
        }
    }

    /// Deterministic session, mostly useful in tests and replays.
    pub fn seeded(palette: Palette, lead_in_ms: u32, seed: u64) -> Self {
        Self::with_rng(palette, lead_in_ms, StdRng::seed_from_u64(seed))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Flash duration for the current round.
    pub fn speed_ms(&self) -> u32 {
        speed_for_round(self.round)
    }

    /// Displayed level for the current round.
    pub fn level(&self) -> u32 {
        level_for_round(self.round)
    }

    pub fn sequence(&self) -> &[Color] {
        &self.sequence
    }

    pub fn user_input(&self) -> &[Color] {
        &self.user_input
    }

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Completed rounds so far.
    pub fn score(&self) -> u32 {
        self.round - 1
    }

    /// Score once the session has ended.
    pub fn final_score(&self) -> Option<u32> {
        (self.phase() == GamePhase::Ended).then(|| self.score())
    }

    /// Playback plan for the current sequence.
    pub fn playback(&self) -> Playback {
        Playback::new(self.round, self.sequence.clone(), self.lead_in_ms)
    }

    /// Reset everything, draw the first color and enter the presenting phase.
    ///
    /// Valid from every phase. The session gets a new identity so callbacks scheduled
    /// for the previous one become no-ops.
    pub fn start(&mut self) -> Playback {
        let previous = mem::replace(&mut self.id, Uuid::new_v4());
        self.user_input.clear();
        self.round = 1;
        self.play_count = 0;
        self.sequence = append_random_color(Vec::new(), &self.palette, &mut self.rng);
        self.machine.restart();
        debug!(session_id = %self.id, previous = %previous, "session started");
        self.playback()
    }

    /// The presentation layer finished flashing the sequence: open input.
    pub fn on_presentation_complete(&mut self, session_id: Uuid) -> Result<(), SessionError> {
        self.ensure_current(session_id)?;
        self.machine.apply(GameEvent::PresentationComplete)?;
        self.user_input.clear();
        Ok(())
    }

    /// Check one pad press against the sequence.
    pub fn submit_color(
        &mut self,
        session_id: Uuid,
        color: Color,
    ) -> Result<InputOutcome, SessionError> {
        self.ensure_current(session_id)?;

        let position = self.user_input.len();
        let verdict = match self.sequence.get(position) {
            Some(expected) if *expected == color && position + 1 == self.sequence.len() => {
                InputVerdict::Completed
            }
            Some(expected) if *expected == color => InputVerdict::Matched,
            _ => InputVerdict::Mismatched,
        };

        self.machine.apply(GameEvent::Input { color, verdict })?;
        self.user_input.push(color);

        let outcome = match verdict {
            InputVerdict::Matched => InputOutcome::Continue {
                remaining: self.sequence.len() - self.user_input.len(),
            },
            InputVerdict::Completed => {
                self.play_count += 1;
                InputOutcome::RoundComplete
            }
            InputVerdict::Mismatched => {
                self.play_count += 1;
                InputOutcome::GameOver {
                    final_score: self.score(),
                }
            }
        };
        Ok(outcome)
    }

    /// Grow the sequence by one color and present it again.
    pub fn advance_round(&mut self, session_id: Uuid) -> Result<Playback, SessionError> {
        self.ensure_current(session_id)?;
        self.machine.apply(GameEvent::AdvanceRound)?;
        self.round += 1;
        self.user_input.clear();
        self.sequence = append_random_color(
            mem::take(&mut self.sequence),
            &self.palette,
            &mut self.rng,
        );
        debug!(session_id = %self.id, round = self.round, speed_ms = self.speed_ms(), "round advanced");
        Ok(self.playback())
    }

    fn ensure_current(&self, session_id: Uuid) -> Result<(), SessionError> {
        if session_id == self.id {
            Ok(())
        } else {
            Err(SessionError::StaleSession {
                current: self.id,
                got: session_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::seeded(Palette::default(), DEFAULT_LEAD_IN_MS, 42)
    }

    fn wrong_color(expected: Color) -> Color {
        Color::ALL
            .into_iter()
            .find(|color| *color != expected)
            .unwrap()
    }

    /// Play the whole current sequence back correctly.
    fn replay(session: &mut GameSession) -> InputOutcome {
        let id = session.id();
        session.on_presentation_complete(id).unwrap();
        let colors = session.sequence().to_vec();
        let mut last = None;
        for color in colors {
            last = Some(session.submit_color(id, color).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn start_presents_a_single_color() {
        let mut session = session();
        let playback = session.start();

        assert_eq!(session.phase(), GamePhase::Presenting);
        assert_eq!(session.round(), 1);
        assert_eq!(session.sequence().len(), 1);
        assert_eq!(playback.len(), 1);
        assert_eq!(playback.speed_ms(), 600);
        assert_eq!(playback.lead_in_ms(), DEFAULT_LEAD_IN_MS);
    }

    #[test]
    fn wrong_first_color_scores_zero() {
        let mut session = session();
        session.start();
        let id = session.id();
        session.on_presentation_complete(id).unwrap();

        let wrong = wrong_color(session.sequence()[0]);
        let outcome = session.submit_color(id, wrong).unwrap();

        assert_eq!(outcome, InputOutcome::GameOver { final_score: 0 });
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.final_score(), Some(0));
    }

    #[test]
    fn completing_rounds_grows_sequence_with_round() {
        let mut session = session();
        session.start();

        for expected_round in 1..=5 {
            assert_eq!(session.round(), expected_round);
            assert_eq!(session.sequence().len() as u32, expected_round);
            assert_eq!(replay(&mut session), InputOutcome::RoundComplete);
            assert_eq!(session.phase(), GamePhase::RoundComplete);
            session.advance_round(session.id()).unwrap();
        }

        assert_eq!(session.round(), 6);
        assert_eq!(session.play_count(), 5);
        assert_eq!(session.final_score(), None);
    }

    #[test]
    fn sequence_prefix_is_kept_between_rounds() {
        let mut session = session();
        session.start();
        let first = session.sequence().to_vec();
        replay(&mut session);
        session.advance_round(session.id()).unwrap();
        assert_eq!(&session.sequence()[..1], &first[..]);
    }

    #[test]
    fn failure_after_three_rounds_scores_three() {
        let mut session = session();
        session.start();
        for _ in 0..3 {
            replay(&mut session);
            session.advance_round(session.id()).unwrap();
        }
        let id = session.id();
        session.on_presentation_complete(id).unwrap();
        let first = session.sequence()[0];
        session.submit_color(id, first).unwrap();
        let wrong = wrong_color(session.sequence()[1]);

        assert_eq!(
            session.submit_color(id, wrong).unwrap(),
            InputOutcome::GameOver { final_score: 3 }
        );
        assert_eq!(session.final_score(), Some(session.round() - 1));
    }

    #[test]
    fn partial_input_reports_remaining_colors() {
        let mut session = session();
        session.start();
        replay(&mut session);
        session.advance_round(session.id()).unwrap();
        let id = session.id();
        session.on_presentation_complete(id).unwrap();

        let first = session.sequence()[0];
        assert_eq!(
            session.submit_color(id, first).unwrap(),
            InputOutcome::Continue { remaining: 1 }
        );
        assert_eq!(session.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn input_before_presentation_completes_is_rejected() {
        let mut session = session();
        session.start();
        let id = session.id();
        let color = session.sequence()[0];

        let err = session.submit_color(id, color).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition(_)));
        assert!(session.user_input().is_empty());
        assert_eq!(session.phase(), GamePhase::Presenting);
    }

    #[test]
    fn advance_outside_round_complete_is_rejected() {
        let mut session = session();
        assert!(matches!(
            session.advance_round(session.id()),
            Err(SessionError::InvalidTransition(_))
        ));
        session.start();
        assert!(session.advance_round(session.id()).is_err());
        assert_eq!(session.sequence().len(), 1);
    }

    #[test]
    fn restart_invalidates_previous_identity() {
        let mut session = session();
        session.start();
        let old_id = session.id();
        session.on_presentation_complete(old_id).unwrap();
        let first = session.sequence()[0];
        session.submit_color(old_id, first).unwrap();

        session.start();
        assert_ne!(session.id(), old_id);
        assert!(session.user_input().is_empty());
        assert_eq!(session.round(), 1);

        let err = session.on_presentation_complete(old_id).unwrap_err();
        assert!(matches!(err, SessionError::StaleSession { .. }));
        assert_eq!(session.phase(), GamePhase::Presenting);
    }

    #[test]
    fn restart_after_game_over() {
        let mut session = session();
        session.start();
        let id = session.id();
        session.on_presentation_complete(id).unwrap();
        let wrong = wrong_color(session.sequence()[0]);
        session.submit_color(id, wrong).unwrap();

        session.start();
        assert_eq!(session.phase(), GamePhase::Presenting);
        assert_eq!(session.final_score(), None);
        assert_eq!(session.play_count(), 0);
    }
}
