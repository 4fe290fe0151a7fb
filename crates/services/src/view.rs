use serde::Serialize;

use quiz_core::ladder::ladder_steps;
use quiz_core::model::{
    AnswerIndex, Difficulty, GameMode, GameOutcome, Lifeline, Phase, Standing, TeamName, TopicId,
    TopicSummary,
};
use quiz_core::{LadderStep, Tier};

use crate::session::Session;

/// Everything a presenter needs to draw the current screen.
///
/// This is intentionally **not** formatted text: labels, markdown rendering and
/// layout are up to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub phase: Phase,
    pub mode: GameMode,
    pub topics: Vec<TopicSummary>,
    pub topic: Option<TopicId>,
    pub difficulties: Vec<Difficulty>,
    pub difficulty: Option<Difficulty>,
    pub question: Option<QuestionView>,
    pub ladder: Vec<LadderStep>,
    pub lifelines: Vec<LifelineView>,
    pub team: Option<TeamPanel>,
    pub roster: Vec<TeamName>,
    pub standings: Vec<Standing>,
    pub outcome: Option<GameOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub answers: Vec<AnswerView>,
    pub stake: Option<Tier>,
    pub selected: Option<AnswerIndex>,
    /// Revealed answer. Hidden after a wrong team answer so the next team
    /// still has something to play for.
    pub correct_answer: Option<AnswerIndex>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub index: AnswerIndex,
    pub text: String,
    pub eliminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelineView {
    pub kind: Lifeline,
    pub label: &'static str,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPanel {
    pub team: TeamName,
    pub score: u32,
    pub question_number: usize,
}

impl GameView {
    #[must_use]
    pub fn build(session: &Session, topics: &[TopicSummary]) -> Self {
        let phase = session.phase().clone();
        let question = build_question(session);
        let in_play = question.is_some();

        let ladder = if in_play && session.mode() == GameMode::Individual {
            ladder_steps(session.cursor())
        } else {
            Vec::new()
        };
        let lifelines = if in_play {
            Lifeline::ALL
                .into_iter()
                .map(|kind| LifelineView {
                    kind,
                    label: kind.label(),
                    used: session.lifelines().is_used(kind),
                })
                .collect()
        } else {
            Vec::new()
        };

        let tournament = session.tournament();
        let team = match (session.mode(), &phase) {
            (GameMode::Team, Phase::ModeSelect | Phase::TeamSetup | Phase::GameOver(_)) => None,
            (GameMode::Team, _) => tournament.current_team().map(|team| TeamPanel {
                team: team.clone(),
                score: tournament.current_stats().map_or(0, |s| s.score()),
                question_number: session.cursor() + 1,
            }),
            (GameMode::Individual, _) => None,
        };
        let standings = if session.mode() == GameMode::Team {
            tournament.standings()
        } else {
            Vec::new()
        };
        let outcome = match &phase {
            Phase::GameOver(outcome) => Some(outcome.clone()),
            _ => None,
        };
        let topics = if matches!(phase, Phase::TopicSelect | Phase::DifficultySelect) {
            topics.to_vec()
        } else {
            Vec::new()
        };

        Self {
            mode: session.mode(),
            topics,
            topic: session.topic().cloned(),
            difficulties: session.difficulties(),
            difficulty: session.difficulty().cloned(),
            question,
            ladder,
            lifelines,
            team,
            roster: tournament.roster().to_vec(),
            standings,
            outcome,
            phase,
        }
    }
}

fn build_question(session: &Session) -> Option<QuestionView> {
    let index = session.displayed_index()?;
    let question = session.questions().get(index)?;

    let (selected, revealed) = match *session.phase() {
        Phase::AnswerPending { selected } => (Some(selected), false),
        Phase::AnswerRevealed {
            selected, correct, ..
        } => (
            Some(selected),
            correct || session.mode() == GameMode::Individual,
        ),
        Phase::Decision => (None, true),
        _ => (None, false),
    };

    let answers = AnswerIndex::ALL
        .into_iter()
        .map(|idx| AnswerView {
            index: idx,
            text: question.answer(idx).to_owned(),
            eliminated: session.eliminated().contains(&idx),
        })
        .collect();

    Some(QuestionView {
        number: index + 1,
        total: session.questions().len(),
        prompt: question.prompt().to_owned(),
        answers,
        stake: session.stake(),
        selected,
        correct_answer: revealed.then(|| question.correct()),
        explanation: revealed.then(|| question.explanation().to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::StepState;
    use quiz_core::model::{Question, QuestionBank};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(mode: GameMode) -> Session {
        let questions = (0..3)
            .map(|n| {
                Question::new(
                    format!("Q{n}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    1,
                    "b wins",
                )
                .unwrap()
            })
            .collect();
        let easy = Difficulty::new("easy").unwrap();
        let mut s = Session::new();
        s.select_mode(mode).unwrap();
        if mode == GameMode::Team {
            s.add_team("Red").unwrap();
            s.add_team("Blue").unwrap();
            s.start_tournament().unwrap();
        }
        s.choose_topic(
            TopicId::new("misc").unwrap(),
            QuestionBank::new().with_set(easy.clone(), questions),
        )
        .unwrap();
        s.select_difficulty(easy, &mut StdRng::seed_from_u64(3))
            .unwrap();
        s
    }

    #[test]
    fn individual_reveal_shows_answer_and_ladder_progress() {
        let mut s = session(GameMode::Individual);
        let ticket = s.submit_answer(AnswerIndex::new(1).unwrap()).unwrap();
        s.reveal(ticket).unwrap();

        let view = GameView::build(&s, &[]);
        let question = view.question.unwrap();
        assert_eq!(question.number, 1);
        assert_eq!(question.correct_answer, AnswerIndex::new(1).ok());
        assert_eq!(question.explanation.as_deref(), Some("b wins"));
        assert_eq!(view.ladder[0].state, StepState::Completed);
        assert_eq!(view.ladder[1].state, StepState::Current);
        assert!(view.team.is_none());
    }

    #[test]
    fn wrong_team_answer_keeps_the_solution_hidden() {
        let mut s = session(GameMode::Team);
        let ticket = s.submit_answer(AnswerIndex::new(0).unwrap()).unwrap();
        s.reveal(ticket).unwrap();

        let view = GameView::build(&s, &[]);
        let question = view.question.unwrap();
        assert_eq!(question.selected, AnswerIndex::new(0).ok());
        assert!(question.correct_answer.is_none());
        assert!(question.explanation.is_none());
        assert!(view.ladder.is_empty());
        assert_eq!(view.team.unwrap().team.as_str(), "Red");
        assert_eq!(view.standings.len(), 2);
    }

    #[test]
    fn view_serializes_for_web_presenters() {
        let s = session(GameMode::Individual);
        let json = serde_json::to_value(GameView::build(&s, &[])).unwrap();
        assert_eq!(json["phase"], "in_question");
        assert_eq!(json["question"]["total"], 3);
        assert_eq!(json["lifelines"][0]["label"], "50:50");
    }
}
