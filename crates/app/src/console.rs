use std::io::Write;

use quiz_core::StepState;
use quiz_core::model::{EndReason, GameOutcome, Lifeline, Phase, Standing};
use services::{GameEvent, GameView, InputError, Presenter, QuestionView};

const AUDIENCE_PROMPT: &str =
    "Time for your classmates to vote! Show them the options and let them decide.";
const PROFESSOR_PROMPT: &str =
    "Time to call your professor! Ask them for their expert advice on this question.";

/// Plain-text presenter for a terminal. Writes whole blocks at once.
pub struct ConsolePresenter<W> {
    out: W,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn say(&mut self, text: &str) {
        self.emit(format!("{text}\n"));
    }

    pub fn prompt(&mut self) {
        self.emit("> ".to_owned());
    }

    fn emit(&mut self, text: String) {
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to write to the terminal");
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render(&mut self, view: &GameView) {
        let text = render_view(view);
        if !text.is_empty() {
            self.emit(text);
        }
    }

    fn notify(&mut self, event: GameEvent) {
        if let Some(text) = describe_event(&event) {
            self.emit(format!("{text}\n"));
        }
    }
}

fn render_view(view: &GameView) -> String {
    let mut out = String::new();
    match &view.phase {
        Phase::ModeSelect => {
            out.push_str("\n=== Who Wants to Be a Millionaire? ===\n");
            out.push_str("Choose a mode: `individual` or `team`.\n");
        }
        Phase::TeamSetup => {
            out.push_str("\nTeam setup. Teams so far:");
            if view.roster.is_empty() {
                out.push_str(" none");
            }
            out.push('\n');
            for team in &view.roster {
                out.push_str(&format!("  - {team}\n"));
            }
            out.push_str("`add <name>`, `remove <name>`, then `start` (2+ teams).\n");
        }
        Phase::TopicSelect => {
            push_team_line(&mut out, view);
            out.push_str("\nPick a topic:\n");
            for (n, topic) in view.topics.iter().enumerate() {
                out.push_str(&format!("  {}. {}", n + 1, topic.display_name));
                if !topic.description.is_empty() {
                    out.push_str(&format!(" - {}", topic.description));
                }
                out.push('\n');
            }
            if view.topics.is_empty() {
                out.push_str("  (no topics available)\n");
            }
        }
        Phase::DifficultySelect => {
            out.push_str("\nPick a difficulty:\n");
            for (n, difficulty) in view.difficulties.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", n + 1, difficulty.as_str().to_uppercase()));
            }
        }
        Phase::InQuestion | Phase::AnswerPending { .. } | Phase::AnswerRevealed { .. } => {
            push_team_line(&mut out, view);
            if let Some(question) = &view.question {
                push_question(&mut out, view, question);
            }
            match view.phase {
                Phase::InQuestion => {
                    let open: Vec<&str> = view
                        .lifelines
                        .iter()
                        .filter(|l| !l.used)
                        .map(|l| l.label)
                        .collect();
                    if !open.is_empty() {
                        out.push_str(&format!("Lifelines: {}\n", open.join(", ")));
                    }
                }
                Phase::AnswerRevealed { .. } => out.push_str("`next` to continue.\n"),
                _ => {}
            }
        }
        Phase::Decision => {
            push_team_line(&mut out, view);
            out.push_str("Correct! `risk` to play on, or `pass` to bank your score.\n");
        }
        Phase::TeamWrong { points_lost } => {
            push_team_line(&mut out, view);
            if *points_lost > 0 {
                out.push_str(&format!("Wrong. {points_lost} points lost.\n"));
            } else {
                out.push_str("Wrong.\n");
            }
            out.push_str("`next` hands the question to the next team.\n");
        }
        Phase::GameOver(outcome) => {
            out.push_str("\n=== GAME OVER ===\n");
            match outcome {
                GameOutcome::Individual { reason, prize } => {
                    let headline = match reason {
                        EndReason::Completed => "You won the top prize!",
                        EndReason::WrongAnswer => "Wrong answer.",
                        EndReason::WalkedAway => "You walked away.",
                    };
                    out.push_str(headline);
                    out.push('\n');
                    let prize = prize.map_or("nothing", |tier| tier.label());
                    out.push_str(&format!("You take home: {prize}\n"));
                    out.push_str("`again` to play again.\n");
                }
                GameOutcome::Tournament { winner, standings } => {
                    out.push_str(&format!("Winner: {winner}\n"));
                    push_standings(&mut out, standings);
                    out.push_str("`replay`, `newquiz` or `menu`.\n");
                }
            }
        }
    }
    out
}

fn push_team_line(out: &mut String, view: &GameView) {
    if let Some(panel) = &view.team {
        out.push_str(&format!(
            "\n[{}] score {} - question {}\n",
            panel.team, panel.score, panel.question_number
        ));
    }
}

fn push_question(out: &mut String, view: &GameView, question: &QuestionView) {
    out.push_str(&format!(
        "\nQuestion {} of {}",
        question.number, question.total
    ));
    if let Some(stake) = question.stake {
        out.push_str(&format!(" - playing for {}", stake.label()));
    }
    out.push_str(&format!("\n{}\n", question.prompt));

    for answer in &question.answers {
        let marker = if question.correct_answer == Some(answer.index) {
            '*'
        } else if question.selected == Some(answer.index) {
            '>'
        } else {
            ' '
        };
        if answer.eliminated {
            out.push_str(&format!(" {marker} {}: ---\n", answer.index));
        } else {
            out.push_str(&format!(" {marker} {}: {}\n", answer.index, answer.text));
        }
    }
    if let Some(explanation) = question.explanation.as_deref().filter(|e| !e.is_empty()) {
        out.push_str(&format!("{explanation}\n"));
    }

    let reached = view
        .ladder
        .iter()
        .rev()
        .find(|step| step.state == StepState::Completed);
    if let Some(step) = reached {
        out.push_str(&format!("Banked so far: {}\n", step.label));
    }
}

fn push_standings(out: &mut String, standings: &[Standing]) {
    for row in standings {
        out.push_str(&format!(
            "  {}. {} - {} pts ({}/{} correct)\n",
            row.rank,
            row.team,
            row.stats.score(),
            row.stats.correct_answers(),
            row.stats.questions_answered()
        ));
    }
}

fn describe_event(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::SavedGameFound { description } => {
            format!("Saved game found: {description}. `continue` to resume or `reset` to discard.")
        }
        GameEvent::Resumed { description } => format!("Resumed: {description}"),
        GameEvent::GameStarted { mode, questions } => {
            format!("Starting a {mode} game with {questions} questions.")
        }
        GameEvent::AnswerLocked(answer) => format!("Final answer: {answer}..."),
        GameEvent::Correct(_) => "Correct!".to_owned(),
        GameEvent::Wrong {
            correct: Some(correct),
            ..
        } => format!("Wrong! The right answer was {correct}."),
        GameEvent::Wrong { correct: None, .. } => "Wrong!".to_owned(),
        GameEvent::MoneyWin(tier) => format!("You have won {}!", tier.label()),
        GameEvent::Jackpot => "ONE MILLION DOLLARS!".to_owned(),
        GameEvent::TeamScored { team, score } => format!("{team} now has {score} points."),
        GameEvent::PointsLost { team, points } => format!("{team} loses {points} points."),
        GameEvent::TurnPassed { team } => format!("Over to {team}."),
        GameEvent::LifelineUsed(used) => match used.kind {
            Lifeline::FiftyFifty => "50:50 - two wrong answers removed.".to_owned(),
            Lifeline::AskAudience => format!("Ask the Class: {AUDIENCE_PROMPT}"),
            Lifeline::PhoneAFriend => format!("Phone the Professor: {PROFESSOR_PROMPT}"),
        },
        GameEvent::Leaderboard(standings) => {
            let mut out = String::from("Leaderboard:\n");
            push_standings(&mut out, standings);
            out.trim_end().to_owned()
        }
        GameEvent::GameEnded(_) | GameEvent::GameSaved | GameEvent::SaveCleared => return None,
        GameEvent::Rejected(err) => rejection(err),
        GameEvent::LoadFailed(reason) => format!("Could not load quiz content: {reason}"),
        _ => return None,
    };
    Some(text)
}

fn rejection(err: &InputError) -> String {
    match err {
        InputError::WrongPhase { .. } => format!("Not now: {err}."),
        _ => format!("Sorry: {err}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerIndex, GameMode};
    use services::Session;

    fn printed(presenter: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn mode_menu_lists_both_modes() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.render(&GameView::build(&Session::new(), &[]));
        let text = printed(presenter);
        assert!(text.contains("individual"));
        assert!(text.contains("team"));
    }

    #[test]
    fn wrong_team_answer_is_announced_without_the_solution() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.notify(GameEvent::Wrong {
            selected: AnswerIndex::new(0).unwrap(),
            correct: None,
        });
        presenter.notify(GameEvent::Wrong {
            selected: AnswerIndex::new(0).unwrap(),
            correct: AnswerIndex::new(2).ok(),
        });
        assert_eq!(
            printed(presenter),
            "Wrong!\nWrong! The right answer was C.\n"
        );
    }

    #[test]
    fn housekeeping_events_stay_quiet() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.notify(GameEvent::GameSaved);
        presenter.notify(GameEvent::SaveCleared);
        presenter.notify(GameEvent::GameStarted {
            mode: GameMode::Team,
            questions: 5,
        });
        assert_eq!(printed(presenter), "Starting a team game with 5 questions.\n");
    }
}
