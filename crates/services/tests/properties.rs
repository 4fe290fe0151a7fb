//! Property-based invariant tests for the game session.
//!
//! Random move sequences are played against individual and team sessions:
//!
//! 1. The question cursor never runs past the active set.
//! 2. A rejected move leaves the saved picture untouched.
//! 3. A wrong team answer always leaves that team on zero.
//! 4. The turn only ever points at a rostered team.
//! 5. Spending a lifeline twice changes nothing.
//! 6. Any resumable session survives a snapshot round trip.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{
    AnswerIndex, Difficulty, GameMode, Lifeline, NextStep, Phase, Question, QuestionBank, TopicId,
};
use quiz_core::time::fixed_now;
use services::Session;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Move {
    Answer(u8),
    Lifeline(usize),
    Advance,
    WalkAway,
    ContinueRisking,
    PassSafe,
    NextTeam,
    EndTournament,
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        4 => (0u8..4).prop_map(Move::Answer),
        1 => (0usize..3).prop_map(Move::Lifeline),
        4 => Just(Move::Advance),
        1 => Just(Move::WalkAway),
        2 => Just(Move::ContinueRisking),
        2 => Just(Move::PassSafe),
        2 => Just(Move::NextTeam),
        1 => Just(Move::EndTournament),
    ]
}

fn easy() -> Difficulty {
    Difficulty::new("easy").unwrap()
}

fn build_session(team: bool, teams: usize, correct: &[u8], seed: u64) -> Session {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(n, &c)| {
            Question::new(
                format!("Q{n}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                c,
                "",
            )
            .unwrap()
        })
        .collect();
    let mut session = Session::new();
    if team {
        session.select_mode(GameMode::Team).unwrap();
        for n in 0..teams {
            session.add_team(&format!("Team {n}")).unwrap();
        }
        session.start_tournament().unwrap();
    } else {
        session.select_mode(GameMode::Individual).unwrap();
    }
    session
        .choose_topic(
            TopicId::new("mixed").unwrap(),
            QuestionBank::new().with_set(easy(), questions),
        )
        .unwrap();
    session
        .select_difficulty(easy(), &mut StdRng::seed_from_u64(seed))
        .unwrap();
    session
}

/// Applies one move, returning whether it was accepted.
fn apply(session: &mut Session, mv: Move, rng: &mut StdRng) -> bool {
    match mv {
        Move::Answer(value) => {
            let Ok(ticket) = session.submit_answer(AnswerIndex::new(value).unwrap()) else {
                return false;
            };
            matches!(session.reveal(ticket), Ok(Some(_)))
        }
        Move::Lifeline(n) => session.use_lifeline(Lifeline::ALL[n], rng).is_ok(),
        Move::Advance => session.advance().is_ok(),
        Move::WalkAway => session.walk_away().is_ok(),
        Move::ContinueRisking => session.continue_risking().is_ok(),
        Move::PassSafe => session.pass_safe().is_ok(),
        Move::NextTeam => session.next_team_after_wrong().is_ok(),
        Move::EndTournament => session.end_tournament().is_ok(),
    }
}

fn game_strategy() -> impl Strategy<Value = (bool, usize, Vec<u8>, u64, Vec<Move>)> {
    (
        any::<bool>(),
        2usize..=5,
        prop::collection::vec(0u8..4, 1..8),
        any::<u64>(),
        prop::collection::vec(move_strategy(), 0..60),
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Invariants hold after every move
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn random_play_keeps_invariants((team, teams, correct, seed, moves) in game_strategy()) {
        let mut session = build_session(team, teams, &correct, seed);
        let mut rng = StdRng::seed_from_u64(seed);

        for mv in moves {
            let before = session.to_snapshot(fixed_now());
            let accepted = apply(&mut session, mv, &mut rng);
            if !accepted {
                prop_assert_eq!(
                    session.to_snapshot(fixed_now()),
                    before,
                    "rejected {:?} changed the session",
                    mv
                );
            }

            prop_assert!(
                session.cursor() <= session.questions().len(),
                "cursor {} past set of {}",
                session.cursor(),
                session.questions().len()
            );
            if matches!(session.phase(), Phase::InQuestion | Phase::Decision) {
                prop_assert!(session.cursor() < session.questions().len());
            }

            if team {
                let tournament = session.tournament();
                prop_assert!(tournament.current_index() < tournament.len());
                prop_assert_eq!(tournament.len(), teams);
                if let Phase::AnswerRevealed { next: NextStep::TeamWrong { .. }, .. } =
                    session.phase()
                {
                    prop_assert_eq!(tournament.current_stats().unwrap().score(), 0);
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Lifelines are single-use
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn second_lifeline_use_is_a_no_op(
        correct in prop::collection::vec(0u8..4, 1..5),
        seed in any::<u64>(),
        n in 0usize..3,
    ) {
        let mut session = build_session(false, 0, &correct, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let kind = Lifeline::ALL[n];

        let first = session.use_lifeline(kind, &mut rng).unwrap();
        prop_assert!(first.is_some());
        let after_first = session.to_snapshot(fixed_now());

        let second = session.use_lifeline(kind, &mut rng).unwrap();
        prop_assert!(second.is_none());
        prop_assert_eq!(session.to_snapshot(fixed_now()), after_first);

        let question = session.displayed_question().unwrap();
        prop_assert!(!session.eliminated().contains(&question.correct()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Snapshot round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn snapshot_round_trip_preserves_progress(
        (team, teams, correct, seed, moves) in game_strategy()
    ) {
        let mut session = build_session(team, teams, &correct, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        for mv in moves {
            apply(&mut session, mv, &mut rng);
        }

        let snapshot = session.to_snapshot(fixed_now());
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = Session::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        prop_assert_eq!(restored.phase(), &session.phase().resumable());
        prop_assert_eq!(restored.cursor(), session.cursor());
        prop_assert_eq!(restored.questions(), session.questions());
        prop_assert_eq!(restored.tournament(), session.tournament());
        prop_assert_eq!(restored.to_snapshot(fixed_now()), snapshot);
    }
}
