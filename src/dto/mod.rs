pub mod health;
pub mod language;
pub mod leaderboard;
pub mod phase;
pub mod session;
pub mod share;
pub mod sse;
pub mod validation;
