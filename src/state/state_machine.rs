use thiserror::Error;

use crate::state::sequence::Color;

/// Phases a game session moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No session has been started yet.
    #[default]
    Idle,
    /// The sequence is being flashed; input is closed.
    Presenting,
    /// The player is reproducing the sequence.
    AwaitingInput,
    /// The whole sequence was reproduced; waiting for the next round to begin.
    RoundComplete,
    /// A wrong color ended the session.
    Ended,
}

/// How a submitted color compares with the expected sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputVerdict {
    /// Correct, more colors are expected.
    Matched,
    /// Correct and the last color of the sequence.
    Completed,
    /// Wrong color.
    Mismatched,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Begin a fresh session, cancelling whatever was running.
    Start,
    /// The presentation layer finished flashing the sequence.
    PresentationComplete,
    /// The player pressed a pad.
    Input {
        color: Color,
        verdict: InputVerdict,
    },
    /// Move on after a completed round.
    AdvanceRound,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// Increments on each applied transition.
    pub version: usize,
}

/// Phase bookkeeping for a single session. The phase is the only source of truth for
/// which events are acceptable.
#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
}

impl GameStateMachine {
    /// Create a new state machine initialised in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
        }
    }

    /// Whether `event` would be accepted from the current phase.
    #[cfg(test)]
    pub fn accepts(&self, event: GameEvent) -> bool {
        self.compute_transition(event).is_ok()
    }

    /// Apply `event`, returning the new phase. Nothing changes on error.
    pub fn apply(&mut self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Restart from any phase. Equivalent to applying [`GameEvent::Start`], which is
    /// accepted everywhere.
    pub fn restart(&mut self) -> GamePhase {
        self.phase = GamePhase::Presenting;
        self.version += 1;
        self.phase
    }

    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (_, GameEvent::Start) => GamePhase::Presenting,
            (GamePhase::Presenting, GameEvent::PresentationComplete) => GamePhase::AwaitingInput,
            (
                GamePhase::AwaitingInput,
                GameEvent::Input {
                    verdict: InputVerdict::Matched,
                    ..
                },
            ) => GamePhase::AwaitingInput,
            (
                GamePhase::AwaitingInput,
                GameEvent::Input {
                    verdict: InputVerdict::Completed,
                    ..
                },
            ) => GamePhase::RoundComplete,
            (
                GamePhase::AwaitingInput,
                GameEvent::Input {
                    verdict: InputVerdict::Mismatched,
                    ..
                },
            ) => GamePhase::Ended,
            (GamePhase::RoundComplete, GameEvent::AdvanceRound) => GamePhase::Presenting,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(verdict: InputVerdict) -> GameEvent {
        GameEvent::Input {
            color: Color::Red,
            verdict,
        }
    }

    #[test]
    fn initial_state_is_idle() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Idle);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn full_round_then_failure() {
        let mut sm = GameStateMachine::new();

        assert_eq!(sm.apply(GameEvent::Start), Ok(GamePhase::Presenting));
        assert_eq!(
            sm.apply(GameEvent::PresentationComplete),
            Ok(GamePhase::AwaitingInput)
        );
        assert_eq!(
            sm.apply(input(InputVerdict::Matched)),
            Ok(GamePhase::AwaitingInput)
        );
        assert_eq!(
            sm.apply(input(InputVerdict::Completed)),
            Ok(GamePhase::RoundComplete)
        );
        assert_eq!(sm.apply(GameEvent::AdvanceRound), Ok(GamePhase::Presenting));
        assert_eq!(
            sm.apply(GameEvent::PresentationComplete),
            Ok(GamePhase::AwaitingInput)
        );
        assert_eq!(sm.apply(input(InputVerdict::Mismatched)), Ok(GamePhase::Ended));
        assert_eq!(sm.version(), 7);
    }

    #[test]
    fn start_is_accepted_from_every_phase() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Start).unwrap();
        sm.apply(GameEvent::PresentationComplete).unwrap();
        assert!(sm.accepts(GameEvent::Start));
        assert_eq!(sm.restart(), GamePhase::Presenting);

        sm.apply(GameEvent::PresentationComplete).unwrap();
        sm.apply(input(InputVerdict::Mismatched)).unwrap();
        assert!(sm.accepts(GameEvent::Start));
    }

    #[test]
    fn input_while_presenting_is_rejected_without_change() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Start).unwrap();
        let before = sm.snapshot();

        let err = sm.apply(input(InputVerdict::Matched)).unwrap_err();
        assert_eq!(err.from, GamePhase::Presenting);
        assert_eq!(sm.snapshot(), before);
    }

    #[test]
    fn invalid_transition_returns_error() {
        let mut sm = GameStateMachine::new();
        for event in [
            GameEvent::PresentationComplete,
            GameEvent::AdvanceRound,
            input(InputVerdict::Completed),
        ] {
            let err = sm.apply(event).unwrap_err();
            assert_eq!(err, InvalidTransition {
                from: GamePhase::Idle,
                event
            });
        }
        assert_eq!(sm.phase(), GamePhase::Idle);
    }

    #[test]
    fn ended_only_accepts_start() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Start).unwrap();
        sm.apply(GameEvent::PresentationComplete).unwrap();
        sm.apply(input(InputVerdict::Mismatched)).unwrap();

        assert!(!sm.accepts(GameEvent::AdvanceRound));
        assert!(!sm.accepts(GameEvent::PresentationComplete));
        assert!(!sm.accepts(input(InputVerdict::Matched)));
    }
}
