/// Durable key-value backends.
pub mod kv_store;
/// Display language persistence.
pub mod language_store;
/// Leaderboard list persistence.
pub mod leaderboard_store;
/// Persisted document shapes.
pub mod models;
/// Best-score persistence.
pub mod score_store;
/// Storage error types shared by every backend.
pub mod storage;
