use std::sync::Arc;

use color_memory_back::{
    dao::{
        kv_store::{KeyValueStore, memory::MemoryStore},
        leaderboard_store::LeaderboardStore,
        models::LeaderboardEntryEntity,
        score_store::ScoreStore,
    },
    i18n::{Catalog, Translate},
    state::{
        game::{GameSession, InputOutcome},
        leaderboard::{EntryMetadata, LeaderboardManager},
        sequence::{Color, MIN_SPEED_MS, Palette, speed_for_round},
        state_machine::GamePhase,
    },
};
use proptest::prelude::*;

const NAMESPACE: &str = "props";

fn manager(capacity: usize) -> LeaderboardManager {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let scores = Arc::new(ScoreStore::new(store.clone(), NAMESPACE));
    let translator: Arc<dyn Translate> = Arc::new(Catalog::builtin());
    LeaderboardManager::new(
        capacity,
        LeaderboardStore::new(store, NAMESPACE),
        scores,
        translator,
    )
}

fn entity(score: u32, day: u8) -> LeaderboardEntryEntity {
    LeaderboardEntryEntity {
        score,
        date: format!("2026-01-{:02}", day % 28 + 1),
        metadata: Default::default(),
    }
}

proptest! {
    #[test]
    fn speed_never_increases_and_stays_above_floor(round in 1u32..100_000) {
        let current = speed_for_round(round);
        let next = speed_for_round(round + 1);
        prop_assert!(next <= current);
        prop_assert!(current >= MIN_SPEED_MS);
    }

    #[test]
    fn board_stays_sorted_and_bounded(
        capacity in 1usize..15,
        scores in proptest::collection::vec(0u32..200, 0..60),
    ) {
        let mut board = manager(capacity);
        for score in scores {
            let outcome = board.add_score(score, EntryMetadata::new());
            let entries = board.entries();
            prop_assert!(entries.len() <= capacity);
            prop_assert!(entries.windows(2).all(|pair| pair[0].score >= pair[1].score));
            if let Some(rank) = outcome.rank {
                prop_assert!(rank >= 1 && rank <= entries.len());
                prop_assert_eq!(entries[rank - 1].score, score);
            }
        }
    }

    #[test]
    fn score_below_full_board_is_rejected(
        capacity in 1usize..10,
        floor in 10u32..100,
        below in 0u32..10,
    ) {
        let mut board = manager(capacity);
        for offset in 0..capacity as u32 {
            board.add_score(floor + offset, EntryMetadata::new());
        }
        let before = board.entries().to_vec();

        let outcome = board.add_score(below, EntryMetadata::new());
        prop_assert_eq!(outcome.rank, None);
        prop_assert!(!outcome.is_new_record);
        prop_assert_eq!(board.entries(), before.as_slice());
    }

    #[test]
    fn top_scores_is_idempotent(
        scores in proptest::collection::vec(0u32..500, 0..20),
        limit in 0usize..25,
    ) {
        let mut board = manager(10);
        for score in scores {
            board.add_score(score, EntryMetadata::new());
        }
        let first = board.top_scores(limit).to_vec();
        let second = board.top_scores(limit).to_vec();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), limit.min(board.entries().len()));
    }

    #[test]
    fn leaderboard_store_round_trips(
        raw in proptest::collection::vec((0u32..1_000, any::<u8>()), 0..=10),
    ) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let leaderboard = LeaderboardStore::new(store, NAMESPACE);
        let entries: Vec<_> = raw.into_iter().map(|(score, day)| entity(score, day)).collect();

        leaderboard.save_entries(&entries).unwrap();
        prop_assert_eq!(leaderboard.load_entries().unwrap(), entries);
    }

    #[test]
    fn final_score_is_completed_rounds(seed in any::<u64>(), rounds in 0u32..12) {
        let mut session = GameSession::seeded(Palette::default(), 0, seed);
        session.start();

        for _ in 0..rounds {
            let id = session.id();
            session.on_presentation_complete(id).unwrap();
            for color in session.sequence().to_vec() {
                session.submit_color(id, color).unwrap();
            }
            session.advance_round(id).unwrap();
        }

        let id = session.id();
        session.on_presentation_complete(id).unwrap();
        let expected = session.sequence()[0];
        let wrong = Color::ALL.into_iter().find(|color| *color != expected).unwrap();
        let outcome = session.submit_color(id, wrong).unwrap();

        prop_assert_eq!(outcome, InputOutcome::GameOver { final_score: rounds });
        prop_assert_eq!(session.phase(), GamePhase::Ended);
        prop_assert_eq!(session.final_score(), Some(session.round() - 1));
    }
}
