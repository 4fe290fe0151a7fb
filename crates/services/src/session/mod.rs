//! The game session state machine.
//!
//! `Session` is plain data plus transitions. It performs no I/O: the service
//! layer fetches content, persists snapshots and talks to the presenter.

mod lifelines;
mod reveal;
mod snapshot;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::Tier;
use quiz_core::model::{
    AnswerIndex, Difficulty, EndReason, GameMode, GameOutcome, Lifeline, LifelineSet, NextStep,
    Phase, Question, QuestionBank, TopicId,
};

use crate::error::{GameError, InputError};
use crate::tournament::{AnswerVerdict, Tournament};

pub use lifelines::LifelineUse;
pub use reveal::{Reveal, RevealTicket};

/// Full mutable state of one game run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: GameMode,
    phase: Phase,
    topic: Option<TopicId>,
    bank: Option<QuestionBank>,
    difficulty: Option<Difficulty>,
    questions: Vec<Question>,
    cursor: usize,
    lifelines: LifelineSet,
    eliminated: Vec<AnswerIndex>,
    tournament: Tournament,
    generation: u64,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn topic(&self) -> Option<&TopicId> {
        self.topic.as_ref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<&Difficulty> {
        self.difficulty.as_ref()
    }

    /// Difficulties offered by the loaded topic, if one is loaded.
    #[must_use]
    pub fn difficulties(&self) -> Vec<Difficulty> {
        self.bank
            .as_ref()
            .map(|bank| bank.difficulties().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn lifelines(&self) -> &LifelineSet {
        &self.lifelines
    }

    #[must_use]
    pub fn eliminated(&self) -> &[AnswerIndex] {
        &self.eliminated
    }

    #[must_use]
    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    /// True once the game has been decided, including while the deciding
    /// answer is still on screen.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(
            self.phase,
            Phase::GameOver(_)
                | Phase::AnswerRevealed {
                    next: NextStep::GameOver,
                    ..
                }
        )
    }

    /// Index of the question the player is looking at. After a correct
    /// individual reveal the cursor has already moved past it.
    #[must_use]
    pub fn displayed_index(&self) -> Option<usize> {
        let index = match self.phase {
            Phase::InQuestion
            | Phase::AnswerPending { .. }
            | Phase::Decision
            | Phase::TeamWrong { .. } => self.cursor,
            Phase::AnswerRevealed { correct, .. } => {
                if correct && self.mode == GameMode::Individual {
                    self.cursor.checked_sub(1)?
                } else {
                    self.cursor
                }
            }
            _ => return None,
        };
        (index < self.questions.len()).then_some(index)
    }

    #[must_use]
    pub fn displayed_question(&self) -> Option<&Question> {
        self.displayed_index().and_then(|idx| self.questions.get(idx))
    }

    /// Tier being played for, individual mode only.
    #[must_use]
    pub fn stake(&self) -> Option<Tier> {
        (self.mode == GameMode::Individual && self.displayed_index().is_some())
            .then(|| Tier::at_stake(self.cursor))
    }

    /// True when a resumed session sits at difficulty selection without its bank.
    #[must_use]
    pub fn needs_bank(&self) -> bool {
        self.phase == Phase::DifficultySelect && self.bank.is_none() && self.topic.is_some()
    }

    //
    // ─── SETUP ─────────────────────────────────────────────────────────────────
    //

    /// Starts a fresh session in `mode`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` while a question set is in play.
    pub fn select_mode(&mut self, mode: GameMode) -> Result<(), InputError> {
        if !self.phase.allows_mode_change() {
            return Err(self.reject("select_mode"));
        }
        self.reset();
        self.mode = mode;
        self.phase = match mode {
            GameMode::Individual => Phase::TopicSelect,
            GameMode::Team => Phase::TeamSetup,
        };
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InputError` outside team setup, or for a blank or duplicate name.
    pub fn add_team(&mut self, name: &str) -> Result<(), InputError> {
        self.ensure_phase(&Phase::TeamSetup, "add_team")?;
        self.tournament.add_team(name).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `InputError` outside team setup or for an unknown team.
    pub fn remove_team(&mut self, name: &str) -> Result<(), InputError> {
        self.ensure_phase(&Phase::TeamSetup, "remove_team")?;
        self.tournament.remove_team(name).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `InputError` outside team setup or with fewer than two teams.
    pub fn start_tournament(&mut self) -> Result<(), InputError> {
        self.ensure_phase(&Phase::TeamSetup, "start_tournament")?;
        self.tournament.ensure_startable()?;
        self.tournament.restart_rotation();
        self.phase = Phase::TopicSelect;
        Ok(())
    }

    /// Checks a topic may be picked now, before any content is fetched.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless a topic or difficulty is being chosen.
    pub fn ensure_topic_selectable(&self) -> Result<(), InputError> {
        if matches!(self.phase, Phase::TopicSelect | Phase::DifficultySelect) {
            Ok(())
        } else {
            Err(self.reject("select_topic"))
        }
    }

    /// Installs the question bank fetched for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless a topic or difficulty is being chosen.
    pub fn choose_topic(&mut self, topic: TopicId, bank: QuestionBank) -> Result<(), InputError> {
        self.ensure_topic_selectable()?;
        self.topic = Some(topic);
        self.bank = Some(bank);
        self.difficulty = None;
        self.phase = Phase::DifficultySelect;
        Ok(())
    }

    pub(crate) fn restore_bank(&mut self, bank: QuestionBank) {
        self.bank = Some(bank);
    }

    /// Shuffles the chosen difficulty band into the active question set.
    ///
    /// # Errors
    ///
    /// Returns `InputError` outside difficulty selection, for a difficulty the
    /// topic does not offer, or for an empty band.
    pub fn select_difficulty<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<(), InputError> {
        self.ensure_phase(&Phase::DifficultySelect, "select_difficulty")?;
        let Some(bank) = &self.bank else {
            return Err(self.reject("select_difficulty"));
        };
        let Some(set) = bank.questions(&difficulty) else {
            return Err(InputError::UnknownDifficulty(difficulty));
        };
        if set.is_empty() {
            return Err(InputError::EmptyQuestionSet(difficulty));
        }

        let mut questions = set.to_vec();
        questions.shuffle(rng);

        self.questions = questions;
        self.difficulty = Some(difficulty);
        self.cursor = 0;
        self.lifelines.clear();
        self.eliminated.clear();
        self.phase = Phase::InQuestion;
        Ok(())
    }

    //
    // ─── QUESTION PLAY ─────────────────────────────────────────────────────────
    //

    /// Locks in an answer. The reveal happens when the returned ticket is redeemed.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the game is over, an answer is already pending,
    /// no question is open, or the option was eliminated.
    pub fn submit_answer(&mut self, selected: AnswerIndex) -> Result<RevealTicket, InputError> {
        self.ensure_in_question("submit_answer")?;
        if self.eliminated.contains(&selected) {
            return Err(InputError::EliminatedAnswer(selected));
        }

        self.generation += 1;
        self.phase = Phase::AnswerPending { selected };
        Ok(RevealTicket {
            generation: self.generation,
            cursor: self.cursor,
            team_index: self.tournament.current_index(),
            selected,
        })
    }

    /// Reveals a locked answer and books its consequences.
    ///
    /// Returns `Ok(None)` for a stale ticket.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Invariant` if the locked answer has no question or
    /// team behind it.
    pub fn reveal(&mut self, ticket: RevealTicket) -> Result<Option<Reveal>, GameError> {
        let Phase::AnswerPending { selected } = self.phase else {
            return Ok(None);
        };
        if ticket.generation != self.generation
            || ticket.cursor != self.cursor
            || ticket.team_index != self.tournament.current_index()
            || ticket.selected != selected
        {
            return Ok(None);
        }

        let Some(question) = self.questions.get(self.cursor) else {
            return Err(GameError::Invariant("answer locked with no active question"));
        };
        let correct_answer = question.correct();
        let is_correct = question.is_correct(selected);

        let next = match self.mode {
            GameMode::Individual if is_correct => {
                self.cursor += 1;
                if self.cursor >= self.questions.len() {
                    NextStep::GameOver
                } else {
                    NextStep::NextQuestion
                }
            }
            GameMode::Individual => NextStep::GameOver,
            GameMode::Team => {
                match self.tournament.record_answer(is_correct) {
                    Some(AnswerVerdict::Correct { .. }) => NextStep::Decision,
                    Some(AnswerVerdict::Wrong { points_lost }) => {
                        NextStep::TeamWrong { points_lost }
                    }
                    None => return Err(GameError::Invariant("team answer with no roster")),
                }
            }
        };

        self.phase = Phase::AnswerRevealed {
            selected,
            correct: is_correct,
            next,
        };
        Ok(Some(Reveal {
            selected,
            correct_answer,
            is_correct,
            next,
        }))
    }

    /// Spends a lifeline on the open question. Spending one twice is a no-op
    /// and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `InputError` unless a question is open.
    pub fn use_lifeline<R: Rng + ?Sized>(
        &mut self,
        kind: Lifeline,
        rng: &mut R,
    ) -> Result<Option<LifelineUse>, InputError> {
        self.ensure_in_question("use_lifeline")?;
        if self.lifelines.is_used(kind) {
            return Ok(None);
        }

        let eliminated = match kind {
            Lifeline::FiftyFifty => {
                let Some(question) = self.questions.get(self.cursor) else {
                    return Err(self.reject("use_lifeline"));
                };
                lifelines::fifty_fifty(question, rng)
            }
            Lifeline::AskAudience | Lifeline::PhoneAFriend => Vec::new(),
        };

        self.lifelines.mark_used(kind);
        self.eliminated.extend(eliminated.iter().copied());
        Ok(Some(LifelineUse { kind, eliminated }))
    }

    /// Leaves the reveal according to the step decided when it happened.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless an answer is on display.
    pub fn advance(&mut self) -> Result<&Phase, InputError> {
        let Phase::AnswerRevealed { correct, next, .. } = self.phase else {
            return Err(self.reject("advance"));
        };
        self.phase = match next {
            NextStep::NextQuestion => {
                self.eliminated.clear();
                Phase::InQuestion
            }
            NextStep::Decision => Phase::Decision,
            NextStep::TeamWrong { points_lost } => Phase::TeamWrong { points_lost },
            NextStep::GameOver => {
                let reason = if correct {
                    EndReason::Completed
                } else {
                    EndReason::WrongAnswer
                };
                self.individual_outcome(reason)
            }
        };
        Ok(&self.phase)
    }

    /// Ends an individual game, banking the last completed tier.
    ///
    /// # Errors
    ///
    /// Returns `InputError` in team mode or when no question is open.
    pub fn walk_away(&mut self) -> Result<&Phase, InputError> {
        if self.mode == GameMode::Team {
            return Err(InputError::WalkAwayInTeamMode);
        }
        self.ensure_in_question("walk_away")?;
        self.phase = self.individual_outcome(EndReason::WalkedAway);
        Ok(&self.phase)
    }

    //
    // ─── TEAM DECISIONS ────────────────────────────────────────────────────────
    //

    /// Same team plays the next question with its score still exposed.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless the team just answered correctly.
    pub fn continue_risking(&mut self) -> Result<&Phase, GameError> {
        self.ensure_decision("continue_risking")?;
        self.cursor += 1;
        self.eliminated.clear();
        self.enter_next_question()?;
        Ok(&self.phase)
    }

    /// Banks the score and hands the next question to the next team.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless the team just answered correctly.
    pub fn pass_safe(&mut self) -> Result<&Phase, GameError> {
        self.ensure_decision("pass_safe")?;
        self.cursor += 1;
        self.tournament.rotate();
        self.lifelines.clear();
        self.eliminated.clear();
        self.enter_next_question()?;
        Ok(&self.phase)
    }

    /// After a wrong answer the next team gets the same question.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless a team just answered wrongly.
    pub fn next_team_after_wrong(&mut self) -> Result<&Phase, InputError> {
        let after_wrong = matches!(
            self.phase,
            Phase::TeamWrong { .. }
                | Phase::AnswerRevealed {
                    next: NextStep::TeamWrong { .. },
                    ..
                }
        );
        if !after_wrong {
            return Err(self.reject("next_team_after_wrong"));
        }
        self.tournament.rotate();
        self.lifelines.clear();
        self.eliminated.clear();
        self.phase = Phase::InQuestion;
        Ok(&self.phase)
    }

    /// Closes the tournament and crowns the leader.
    ///
    /// # Errors
    ///
    /// Returns `InputError` unless a tournament is under way.
    pub fn end_tournament(&mut self) -> Result<&Phase, GameError> {
        self.ensure_tournament_started("end_tournament")?;
        if self.phase.is_game_over() {
            return Err(InputError::GameOver.into());
        }
        self.phase = self.tournament_outcome()?;
        Ok(&self.phase)
    }

    /// Zeroes every score and goes back to topic selection with the same roster.
    ///
    /// # Errors
    ///
    /// Returns `InputError` unless a tournament was started.
    pub fn reset_and_replay(&mut self) -> Result<(), InputError> {
        self.ensure_tournament_started("reset_and_replay")?;
        self.tournament.reset_all_scores();
        self.clear_round();
        self.phase = Phase::TopicSelect;
        Ok(())
    }

    /// Starts another quiz with the same roster, carrying the scores over.
    ///
    /// # Errors
    ///
    /// Returns `InputError` unless a tournament was started.
    pub fn new_quiz_keep_scores(&mut self) -> Result<(), InputError> {
        self.ensure_tournament_started("new_quiz_keep_scores")?;
        self.tournament.restart_rotation();
        self.clear_round();
        self.phase = Phase::TopicSelect;
        Ok(())
    }

    //
    // ─── RESETS ────────────────────────────────────────────────────────────────
    //

    /// Leaves a finished game for the mode menu.
    ///
    /// # Errors
    ///
    /// Returns `InputError::WrongPhase` unless the game is over.
    pub fn play_again(&mut self) -> Result<(), InputError> {
        if !self.phase.is_game_over() {
            return Err(self.reject("play_again"));
        }
        self.reset();
        Ok(())
    }

    /// Drops everything, roster included, and returns to mode selection.
    /// Any outstanding reveal ticket goes stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn reject(&self, intent: &'static str) -> InputError {
        match self.phase {
            Phase::AnswerPending { .. } => InputError::AnswerPending,
            _ if self.is_over() => InputError::GameOver,
            _ => InputError::WrongPhase {
                intent,
                phase: self.phase.name(),
            },
        }
    }

    fn ensure_phase(&self, expected: &Phase, intent: &'static str) -> Result<(), InputError> {
        if &self.phase == expected {
            Ok(())
        } else {
            Err(self.reject(intent))
        }
    }

    fn ensure_in_question(&self, intent: &'static str) -> Result<(), InputError> {
        self.ensure_phase(&Phase::InQuestion, intent)
    }

    fn ensure_decision(&self, intent: &'static str) -> Result<(), InputError> {
        let deciding = matches!(
            self.phase,
            Phase::Decision
                | Phase::AnswerRevealed {
                    next: NextStep::Decision,
                    ..
                }
        );
        if deciding {
            Ok(())
        } else {
            Err(self.reject(intent))
        }
    }

    fn ensure_tournament_started(&self, intent: &'static str) -> Result<(), InputError> {
        if matches!(self.phase, Phase::AnswerPending { .. }) {
            return Err(InputError::AnswerPending);
        }
        if self.mode == GameMode::Team
            && !matches!(self.phase, Phase::ModeSelect | Phase::TeamSetup)
        {
            Ok(())
        } else {
            Err(InputError::WrongPhase {
                intent,
                phase: self.phase.name(),
            })
        }
    }

    fn enter_next_question(&mut self) -> Result<(), GameError> {
        self.phase = if self.cursor >= self.questions.len() {
            self.tournament_outcome()?
        } else {
            Phase::InQuestion
        };
        Ok(())
    }

    fn individual_outcome(&self, reason: EndReason) -> Phase {
        Phase::GameOver(GameOutcome::Individual {
            reason,
            prize: Tier::for_outcome(reason, self.cursor),
        })
    }

    fn tournament_outcome(&self) -> Result<Phase, GameError> {
        let Some(winner) = self.tournament.winner() else {
            return Err(GameError::Invariant("tournament ended with no teams"));
        };
        Ok(Phase::GameOver(GameOutcome::Tournament {
            winner: winner.team,
            standings: self.tournament.standings(),
        }))
    }

    fn clear_round(&mut self) {
        self.topic = None;
        self.bank = None;
        self.difficulty = None;
        self.questions.clear();
        self.cursor = 0;
        self.lifelines.clear();
        self.eliminated.clear();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::TeamName;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn idx(value: u8) -> AnswerIndex {
        AnswerIndex::new(value).unwrap()
    }

    fn question(n: usize, correct: u8) -> Question {
        Question::new(
            format!("Question {n}?"),
            vec!["A1".into(), "B1".into(), "C1".into(), "D1".into()],
            correct,
            format!("because {n}"),
        )
        .unwrap()
    }

    fn easy() -> Difficulty {
        Difficulty::new("easy").unwrap()
    }

    fn bank(len: usize) -> QuestionBank {
        let questions = (0..len).map(|n| question(n, 2)).collect();
        QuestionBank::new().with_set(easy(), questions)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn individual(len: usize) -> Session {
        let mut s = Session::new();
        s.select_mode(GameMode::Individual).unwrap();
        s.choose_topic(TopicId::new("history").unwrap(), bank(len))
            .unwrap();
        s.select_difficulty(easy(), &mut rng()).unwrap();
        s
    }

    fn team(names: &[&str], len: usize) -> Session {
        let mut s = Session::new();
        s.select_mode(GameMode::Team).unwrap();
        for name in names {
            s.add_team(name).unwrap();
        }
        s.start_tournament().unwrap();
        s.choose_topic(TopicId::new("history").unwrap(), bank(len))
            .unwrap();
        s.select_difficulty(easy(), &mut rng()).unwrap();
        s
    }

    fn answer(s: &mut Session, value: u8) -> Reveal {
        let ticket = s.submit_answer(idx(value)).unwrap();
        s.reveal(ticket).unwrap().expect("fresh ticket")
    }

    fn current_team(s: &Session) -> &str {
        s.tournament().current_team().unwrap().as_str()
    }

    fn prompts(s: &Session) -> Vec<String> {
        s.questions().iter().map(|q| q.prompt().to_owned()).collect()
    }

    #[test]
    fn difficulty_selection_shuffles_a_copy_of_the_bank() {
        let bank_order: Vec<String> = (0..10).map(|n| format!("Question {n}?")).collect();
        let mut sorted_bank = bank_order.clone();
        sorted_bank.sort();

        let mut orders = Vec::new();
        for seed in 0..8 {
            let mut s = Session::new();
            s.select_mode(GameMode::Individual).unwrap();
            s.choose_topic(TopicId::new("history").unwrap(), bank(10))
                .unwrap();
            s.select_difficulty(easy(), &mut StdRng::seed_from_u64(seed))
                .unwrap();

            let order = prompts(&s);
            let mut sorted = order.clone();
            sorted.sort();
            assert_eq!(sorted, sorted_bank);
            orders.push(order);
        }
        assert!(orders.iter().any(|order| order != &bank_order));
    }

    #[test]
    fn question_order_holds_for_the_whole_session() {
        let mut s = team(&["Alpha", "Beta"], 6);
        let order = prompts(&s);

        answer(&mut s, 2);
        s.advance().unwrap();
        s.continue_risking().unwrap();
        assert_eq!(prompts(&s), order);

        answer(&mut s, 2);
        s.pass_safe().unwrap();
        assert_eq!(prompts(&s), order);

        answer(&mut s, 0);
        s.advance().unwrap();
        s.next_team_after_wrong().unwrap();
        assert_eq!(prompts(&s), order);
        assert_eq!(s.displayed_question().unwrap().prompt(), order[2]);

        let mut solo = individual(5);
        let order = prompts(&solo);
        answer(&mut solo, 2);
        solo.advance().unwrap();
        assert_eq!(prompts(&solo), order);
        assert_eq!(solo.displayed_question().unwrap().prompt(), order[1]);
    }

    #[test]
    fn team_wrong_answer_after_risking_wipes_score_and_passes_question() {
        let mut s = team(&["Alpha", "Beta"], 3);

        let first = answer(&mut s, 2);
        assert!(first.is_correct);
        assert_eq!(first.next, NextStep::Decision);
        assert_eq!(s.tournament().current_stats().unwrap().score(), 1);

        s.continue_risking().unwrap();
        assert_eq!(s.cursor(), 1);
        assert_eq!(current_team(&s), "Alpha");

        let second = answer(&mut s, 0);
        assert_eq!(second.next, NextStep::TeamWrong { points_lost: 1 });
        s.advance().unwrap();
        s.next_team_after_wrong().unwrap();

        let alpha = TeamName::new("Alpha").unwrap();
        assert_eq!(s.tournament().stats(&alpha).unwrap().score(), 0);
        assert_eq!(current_team(&s), "Beta");
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.phase(), &Phase::InQuestion);
    }

    #[test]
    fn individual_clean_sweep_wins_the_jackpot() {
        let mut s = individual(10);
        for n in 0..10 {
            let reveal = answer(&mut s, 2);
            assert!(reveal.is_correct);
            if n < 9 {
                assert_eq!(reveal.next, NextStep::NextQuestion);
                s.advance().unwrap();
            }
        }
        assert_eq!(s.cursor(), 10);
        assert!(s.is_over());
        let phase = s.advance().unwrap().clone();
        let Phase::GameOver(GameOutcome::Individual { reason, prize }) = phase else {
            panic!("expected individual outcome, got {phase:?}");
        };
        assert_eq!(reason, EndReason::Completed);
        assert_eq!(prize.unwrap().label(), "1 MILLION DOLLARS!");
    }

    #[test]
    fn walking_away_after_two_banks_the_second_tier() {
        let mut s = individual(10);
        for _ in 0..2 {
            answer(&mut s, 2);
            s.advance().unwrap();
        }
        let phase = s.walk_away().unwrap().clone();
        assert_eq!(
            phase,
            Phase::GameOver(GameOutcome::Individual {
                reason: EndReason::WalkedAway,
                prize: Some(Tier::clamped(1)),
            })
        );
        assert_eq!(Tier::clamped(1).label(), "1 Energy Drink");
    }

    #[test]
    fn walking_away_before_any_answer_wins_nothing() {
        let mut s = individual(3);
        let phase = s.walk_away().unwrap().clone();
        assert!(matches!(
            phase,
            Phase::GameOver(GameOutcome::Individual { prize: None, .. })
        ));
    }

    #[test]
    fn wrong_first_answer_still_pays_the_first_tier() {
        let mut s = individual(3);
        let reveal = answer(&mut s, 1);
        assert_eq!(reveal.next, NextStep::GameOver);
        let phase = s.advance().unwrap().clone();
        assert_eq!(
            phase,
            Phase::GameOver(GameOutcome::Individual {
                reason: EndReason::WrongAnswer,
                prize: Some(Tier::clamped(0)),
            })
        );
    }

    #[test]
    fn duplicate_team_leaves_one_entry() {
        let mut s = Session::new();
        s.select_mode(GameMode::Team).unwrap();
        s.add_team("Alpha").unwrap();
        assert!(matches!(
            s.add_team("Alpha").unwrap_err(),
            InputError::DuplicateTeam(_)
        ));
        assert_eq!(s.tournament().len(), 1);
    }

    #[test]
    fn fifty_fifty_removes_two_wrong_answers_once() {
        let mut s = individual(3);
        let mut rng = rng();
        let used = s
            .use_lifeline(Lifeline::FiftyFifty, &mut rng)
            .unwrap()
            .expect("first use");
        assert_eq!(used.eliminated.len(), 2);
        assert!(used.eliminated.iter().all(|i| [0, 1, 3].contains(&i.value())));

        let before = s.eliminated().to_vec();
        assert!(s.use_lifeline(Lifeline::FiftyFifty, &mut rng).unwrap().is_none());
        assert_eq!(s.eliminated(), before.as_slice());

        let removed = used.eliminated[0];
        assert_eq!(
            s.submit_answer(removed).unwrap_err(),
            InputError::EliminatedAnswer(removed)
        );
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut s = individual(3);
        let ticket = s.submit_answer(idx(2)).unwrap();
        assert_eq!(s.submit_answer(idx(1)).unwrap_err(), InputError::AnswerPending);
        assert!(s.reveal(ticket).unwrap().is_some());
    }

    #[test]
    fn submit_after_game_over_is_rejected_without_mutation() {
        let mut s = individual(3);
        answer(&mut s, 0);
        assert_eq!(s.submit_answer(idx(2)).unwrap_err(), InputError::GameOver);
        s.advance().unwrap();
        assert_eq!(s.submit_answer(idx(2)).unwrap_err(), InputError::GameOver);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn stale_ticket_is_ignored_after_reset() {
        let mut s = individual(3);
        let ticket = s.submit_answer(idx(2)).unwrap();
        s.reset();
        assert!(s.reveal(ticket).unwrap().is_none());
        assert_eq!(s.phase(), &Phase::ModeSelect);
    }

    #[test]
    fn pass_safe_rotates_and_refreshes_lifelines() {
        let mut s = team(&["Alpha", "Beta"], 3);
        s.use_lifeline(Lifeline::PhoneAFriend, &mut rng()).unwrap();
        answer(&mut s, 2);
        s.pass_safe().unwrap();
        assert_eq!(current_team(&s), "Beta");
        assert_eq!(s.cursor(), 1);
        assert!(!s.lifelines().is_used(Lifeline::PhoneAFriend));
    }

    #[test]
    fn continue_risking_keeps_used_lifelines() {
        let mut s = team(&["Alpha", "Beta"], 3);
        s.use_lifeline(Lifeline::AskAudience, &mut rng()).unwrap();
        answer(&mut s, 2);
        s.advance().unwrap();
        s.continue_risking().unwrap();
        assert!(s.lifelines().is_used(Lifeline::AskAudience));
        assert!(s.eliminated().is_empty());
    }

    #[test]
    fn exhausting_the_bank_ends_the_tournament() {
        let mut s = team(&["Alpha", "Beta"], 2);
        answer(&mut s, 2);
        s.pass_safe().unwrap();
        answer(&mut s, 2);
        assert_deciding(&s);
        let phase = s.continue_risking().unwrap().clone();
        let Phase::GameOver(GameOutcome::Tournament { winner, standings }) = phase else {
            panic!("expected tournament outcome, got {phase:?}");
        };
        assert_eq!(winner.as_str(), "Alpha");
        assert_eq!(standings.len(), 2);
    }

    fn assert_deciding(s: &Session) {
        assert!(matches!(
            s.phase(),
            Phase::AnswerRevealed {
                next: NextStep::Decision,
                ..
            }
        ));
    }

    #[test]
    fn reset_and_replay_zeroes_scores_but_keeps_roster() {
        let mut s = team(&["Alpha", "Beta"], 3);
        answer(&mut s, 2);
        s.end_tournament().unwrap();
        s.reset_and_replay().unwrap();
        assert_eq!(s.phase(), &Phase::TopicSelect);
        assert_eq!(s.tournament().len(), 2);
        assert_eq!(s.tournament().current_stats().unwrap().score(), 0);
        assert!(s.questions().is_empty());
    }

    #[test]
    fn new_quiz_keeps_scores() {
        let mut s = team(&["Alpha", "Beta"], 3);
        answer(&mut s, 2);
        s.pass_safe().unwrap();
        s.end_tournament().unwrap();
        s.new_quiz_keep_scores().unwrap();
        assert_eq!(current_team(&s), "Alpha");
        assert_eq!(s.tournament().current_stats().unwrap().score(), 1);
    }

    #[test]
    fn unknown_or_empty_difficulty_is_rejected() {
        let mut s = Session::new();
        s.select_mode(GameMode::Individual).unwrap();
        let bank = QuestionBank::new().with_set(Difficulty::new("hard").unwrap(), Vec::new());
        s.choose_topic(TopicId::new("art").unwrap(), bank).unwrap();
        assert!(matches!(
            s.select_difficulty(easy(), &mut rng()).unwrap_err(),
            InputError::UnknownDifficulty(_)
        ));
        assert!(matches!(
            s.select_difficulty(Difficulty::new("hard").unwrap(), &mut rng())
                .unwrap_err(),
            InputError::EmptyQuestionSet(_)
        ));
        assert_eq!(s.phase(), &Phase::DifficultySelect);
    }

    #[test]
    fn mode_cannot_change_mid_question() {
        let mut s = individual(3);
        assert!(matches!(
            s.select_mode(GameMode::Team).unwrap_err(),
            InputError::WrongPhase { .. }
        ));
    }

    #[test]
    fn walk_away_is_individual_only() {
        let mut s = team(&["A", "B"], 3);
        assert_eq!(s.walk_away().unwrap_err(), InputError::WalkAwayInTeamMode);
    }
}
