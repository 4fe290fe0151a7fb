use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use quiz_core::model::{
    AnswerIndex, Difficulty, GameMode, GameOutcome, GameSnapshot, Lifeline, NextStep, Phase,
    TopicId, TopicSummary,
};
use quiz_core::{Clock, Tier};
use storage::repository::{QuizRepository, SnapshotRepository, Storage};

use crate::config::GameConfig;
use crate::error::{GameError, InputError};
use crate::intent::Intent;
use crate::presenter::{GameEvent, Presenter};
use crate::session::{Reveal, RevealTicket, Session};
use crate::view::GameView;

/// Owns the live session and wires it to content, persistence and the presenter.
///
/// Every handled intent ends with a render. Every state change is followed by a
/// full snapshot write (or a clear, once the game is over or back at the menu).
/// Storage failures while saving are logged and otherwise ignored.
pub struct GameService<P> {
    config: GameConfig,
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    presenter: P,
    rng: StdRng,
    session: Session,
    topics: Vec<TopicSummary>,
}

impl<P: Presenter> GameService<P> {
    #[must_use]
    pub fn new(storage: &Storage, presenter: P) -> Self {
        Self {
            config: GameConfig::default(),
            clock: Clock::default(),
            quizzes: Arc::clone(&storage.quizzes),
            snapshots: Arc::clone(&storage.snapshots),
            presenter,
            rng: StdRng::from_os_rng(),
            session: Session::new(),
            topics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the random source used for shuffles and 50:50.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub fn view(&self) -> GameView {
        GameView::build(&self.session, &self.topics)
    }

    /// Announces a resumable game, if there is one, and draws the first screen.
    pub async fn start(&mut self) -> Option<String> {
        let description = self.saved_game_info().await;
        if let Some(description) = &description {
            info!(%description, "saved game found");
            self.presenter.notify(GameEvent::SavedGameFound {
                description: description.clone(),
            });
        }
        self.render();
        description
    }

    /// Whether a saved game is worth offering for resume.
    pub async fn has_saved_game(&self) -> bool {
        self.saved_game_info().await.is_some()
    }

    /// One-line summary of the resumable game, if any.
    pub async fn saved_game_info(&self) -> Option<String> {
        self.load_saved()
            .await
            .filter(GameSnapshot::has_progress)
            .map(|snapshot| snapshot.describe())
    }

    /// Applies one intent, reports any rejection to the presenter, then renders.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Input` for a rejected intent (nothing changed),
    /// `GameError::ContentLoad` if quiz content could not be fetched, and
    /// `GameError::Invariant` if the session is internally inconsistent.
    pub async fn handle(&mut self, intent: Intent) -> Result<(), GameError> {
        let name = intent.name();
        debug!(intent = name, phase = %self.session.phase(), "handling intent");
        let result = self.dispatch(intent).await;
        if let Err(err) = &result {
            self.report(name, err);
        }
        self.render();
        result
    }

    async fn dispatch(&mut self, intent: Intent) -> Result<(), GameError> {
        match intent {
            Intent::SelectMode(mode) => self.select_mode(mode).await,
            Intent::SelectTopic(topic) => self.select_topic(topic).await,
            Intent::SelectDifficulty(difficulty) => self.select_difficulty(difficulty).await,
            Intent::SubmitAnswer(selected) => self.submit_answer(selected).await,
            Intent::UseLifeline(kind) => self.use_lifeline(kind).await,
            Intent::Advance => {
                let phase = self.session.advance()?.clone();
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::WalkAway => {
                let phase = self.session.walk_away()?.clone();
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::AddTeam(name) => {
                self.session.add_team(&name)?;
                debug!(team = name.trim(), "team added");
                self.persist().await;
                Ok(())
            }
            Intent::RemoveTeam(name) => {
                self.session.remove_team(&name)?;
                debug!(team = name.trim(), "team removed");
                self.persist().await;
                Ok(())
            }
            Intent::StartTournament => {
                self.session.start_tournament()?;
                info!(teams = self.session.tournament().len(), "tournament started");
                self.refresh_topics().await;
                self.persist().await;
                Ok(())
            }
            Intent::ContinueRisking => {
                let phase = self.session.continue_risking()?.clone();
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::PassSafe => {
                let phase = self.session.pass_safe()?.clone();
                self.announce_turn(&phase);
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::NextTeamAfterWrong => {
                let phase = self.session.next_team_after_wrong()?.clone();
                self.announce_turn(&phase);
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::EndTournament => {
                let phase = self.session.end_tournament()?.clone();
                self.after_transition(phase).await;
                Ok(())
            }
            Intent::ResetAndReplay => {
                self.session.reset_and_replay()?;
                info!("tournament scores reset");
                self.refresh_topics().await;
                self.persist().await;
                Ok(())
            }
            Intent::NewQuizKeepScores => {
                self.session.new_quiz_keep_scores()?;
                info!("new quiz with carried-over scores");
                self.refresh_topics().await;
                self.persist().await;
                Ok(())
            }
            Intent::PlayAgain => {
                self.session.play_again()?;
                self.persist().await;
                Ok(())
            }
            Intent::BackToModeSelection => {
                self.session.reset();
                self.persist().await;
                Ok(())
            }
            Intent::ResetSession => {
                self.session.reset();
                self.clear_saved().await;
                Ok(())
            }
            Intent::ContinueGame => {
                self.continue_game().await;
                Ok(())
            }
            Intent::ShowLeaderboard => self.show_leaderboard(),
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    async fn select_mode(&mut self, mode: GameMode) -> Result<(), GameError> {
        self.session.select_mode(mode)?;
        info!(%mode, "mode selected");
        if mode == GameMode::Individual {
            self.refresh_topics().await;
        }
        self.persist().await;
        Ok(())
    }

    async fn select_topic(&mut self, topic: TopicId) -> Result<(), GameError> {
        self.session.ensure_topic_selectable()?;
        let bank = self
            .quizzes
            .load_questions(&topic)
            .await
            .map_err(GameError::ContentLoad)?;
        debug!(%topic, "question bank loaded");
        self.session.choose_topic(topic, bank)?;
        self.persist().await;
        Ok(())
    }

    async fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.session.select_difficulty(difficulty, &mut self.rng)?;
        let mode = self.session.mode();
        let questions = self.session.questions().len();
        info!(
            %mode,
            topic = ?self.session.topic(),
            difficulty = ?self.session.difficulty(),
            questions,
            "game started"
        );
        self.presenter
            .notify(GameEvent::GameStarted { mode, questions });
        self.persist().await;
        Ok(())
    }

    async fn submit_answer(&mut self, selected: AnswerIndex) -> Result<(), GameError> {
        let ticket = self.session.submit_answer(selected)?;
        debug!(answer = %selected, cursor = ticket.cursor, "answer locked");
        self.presenter.notify(GameEvent::AnswerLocked(selected));

        let delay = self.config.reveal_delay();
        if !delay.is_zero() {
            self.render();
            tokio::time::sleep(delay).await;
        }
        self.reveal(ticket).await
    }

    async fn reveal(&mut self, ticket: RevealTicket) -> Result<(), GameError> {
        let Some(reveal) = self.session.reveal(ticket)? else {
            debug!(cursor = ticket.cursor, "stale reveal ignored");
            return Ok(());
        };
        debug!(
            correct = reveal.is_correct,
            next = ?reveal.next,
            "answer revealed"
        );
        self.announce(&reveal);
        self.persist().await;
        Ok(())
    }

    async fn use_lifeline(&mut self, kind: Lifeline) -> Result<(), GameError> {
        match self.session.use_lifeline(kind, &mut self.rng)? {
            Some(used) => {
                debug!(lifeline = %kind, eliminated = used.eliminated.len(), "lifeline used");
                self.presenter.notify(GameEvent::LifelineUsed(used));
                self.persist().await;
            }
            None => debug!(lifeline = %kind, "lifeline already used"),
        }
        Ok(())
    }

    async fn continue_game(&mut self) {
        let Some(snapshot) = self.load_saved().await else {
            info!("no saved game, starting fresh");
            self.session.reset();
            self.clear_saved().await;
            return;
        };

        let description = snapshot.describe();
        match Session::from_snapshot(snapshot) {
            Ok(session) => {
                self.session = session;
                info!(%description, "saved game resumed");
                if self.session.needs_bank() {
                    self.reload_bank().await;
                }
                if matches!(
                    self.session.phase(),
                    Phase::TopicSelect | Phase::DifficultySelect
                ) {
                    self.refresh_topics().await;
                }
                self.presenter.notify(GameEvent::Resumed { description });
            }
            Err(err) => {
                warn!(error = %err, "saved game is inconsistent, starting fresh");
                self.session.reset();
                self.clear_saved().await;
            }
        }
    }

    fn show_leaderboard(&mut self) -> Result<(), GameError> {
        if self.session.mode() != GameMode::Team || self.session.tournament().is_empty() {
            return Err(InputError::WrongPhase {
                intent: "show_leaderboard",
                phase: self.session.phase().name(),
            }
            .into());
        }
        let standings = self.session.tournament().standings();
        self.presenter.notify(GameEvent::Leaderboard(standings));
        Ok(())
    }

    async fn after_transition(&mut self, phase: Phase) {
        if let Phase::GameOver(outcome) = phase {
            self.finish(outcome);
        }
        self.persist().await;
    }

    fn finish(&mut self, outcome: GameOutcome) {
        match &outcome {
            GameOutcome::Individual { reason, prize } => info!(
                ?reason,
                prize = prize.map_or("nothing", Tier::label),
                "game over"
            ),
            GameOutcome::Tournament { winner, .. } => info!(%winner, "tournament over"),
        }
        self.presenter.notify(GameEvent::GameEnded(outcome));
    }

    //
    // ─── EFFECTS ───────────────────────────────────────────────────────────────
    //

    fn announce(&mut self, reveal: &Reveal) {
        let mode = self.session.mode();
        if reveal.is_correct {
            self.presenter.notify(GameEvent::Correct(reveal.selected));
        } else {
            let correct = (mode == GameMode::Individual).then_some(reveal.correct_answer);
            self.presenter.notify(GameEvent::Wrong {
                selected: reveal.selected,
                correct,
            });
        }

        let team = self.session.tournament().current_team().cloned();
        match (mode, reveal.next) {
            (GameMode::Individual, NextStep::GameOver) if reveal.is_correct => {
                self.presenter.notify(GameEvent::Jackpot);
            }
            (GameMode::Individual, NextStep::NextQuestion) => {
                if let Some(tier) = Tier::completed(self.session.cursor()) {
                    self.presenter.notify(GameEvent::MoneyWin(tier));
                }
            }
            (GameMode::Team, NextStep::Decision) => {
                if let Some(team) = team {
                    let score = self
                        .session
                        .tournament()
                        .current_stats()
                        .map_or(0, |stats| stats.score());
                    self.presenter.notify(GameEvent::TeamScored { team, score });
                }
            }
            (GameMode::Team, NextStep::TeamWrong { points_lost }) if points_lost > 0 => {
                if let Some(team) = team {
                    self.presenter.notify(GameEvent::PointsLost {
                        team,
                        points: points_lost,
                    });
                }
            }
            _ => {}
        }
    }

    fn announce_turn(&mut self, phase: &Phase) {
        if phase.is_game_over() {
            return;
        }
        if let Some(team) = self.session.tournament().current_team().cloned() {
            debug!(%team, cursor = self.session.cursor(), "turn passed");
            self.presenter.notify(GameEvent::TurnPassed { team });
        }
    }

    fn report(&mut self, intent: &'static str, err: &GameError) {
        match err {
            GameError::Input(input) => {
                debug!(intent, error = %input, "intent rejected");
                self.presenter.notify(GameEvent::Rejected(input.clone()));
            }
            GameError::ContentLoad(source) => {
                error!(intent, error = %source, "quiz content could not be loaded");
                self.presenter
                    .notify(GameEvent::LoadFailed(source.to_string()));
            }
            GameError::Invariant(what) => error!(intent, what, "session invariant violated"),
        }
    }

    fn render(&mut self) {
        let view = GameView::build(&self.session, &self.topics);
        self.presenter.render(&view);
    }

    //
    // ─── STORAGE ───────────────────────────────────────────────────────────────
    //

    async fn refresh_topics(&mut self) {
        match self.quizzes.list_topics().await {
            Ok(topics) => {
                debug!(count = topics.len(), "topics listed");
                self.topics = topics;
            }
            Err(err) => {
                self.topics.clear();
                self.report("list_topics", &GameError::ContentLoad(err));
            }
        }
    }

    async fn reload_bank(&mut self) {
        let Some(topic) = self.session.topic().cloned() else {
            return;
        };
        match self.quizzes.load_questions(&topic).await {
            Ok(bank) => self.session.restore_bank(bank),
            Err(err) => self.report("continue_game", &GameError::ContentLoad(err)),
        }
    }

    async fn persist(&mut self) {
        if matches!(self.session.phase(), Phase::ModeSelect | Phase::GameOver(_)) {
            self.clear_saved().await;
            return;
        }
        let snapshot = self.session.to_snapshot(self.clock.now());
        match self.snapshots.save_snapshot(&snapshot).await {
            Ok(()) => self.presenter.notify(GameEvent::GameSaved),
            Err(err) => warn!(error = %err, phase = %self.session.phase(), "failed to save game"),
        }
    }

    async fn clear_saved(&mut self) {
        match self.snapshots.clear_snapshot().await {
            Ok(()) => self.presenter.notify(GameEvent::SaveCleared),
            Err(err) => warn!(error = %err, "failed to clear saved game"),
        }
    }

    async fn load_saved(&self) -> Option<GameSnapshot> {
        match self.snapshots.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "saved game could not be read");
                None
            }
        }
    }
}

impl<P> fmt::Debug for GameService<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameService")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("phase", &self.session.phase())
            .field("cursor", &self.session.cursor())
            .field("topics_len", &self.topics.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;
    use quiz_core::model::{Question, QuestionBank};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service() -> (GameService<RecordingPresenter>, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let questions = (0..3)
            .map(|n| {
                Question::new(
                    format!("Q{n}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    0,
                    "",
                )
                .unwrap()
            })
            .collect();
        repo.insert_topic(
            TopicSummary {
                id: TopicId::new("misc").unwrap(),
                display_name: "Misc".into(),
                description: String::new(),
            },
            QuestionBank::new().with_set(Difficulty::new("easy").unwrap(), questions),
        )
        .unwrap();
        let storage = Storage::from_in_memory(repo.clone());
        let svc = GameService::new(&storage, RecordingPresenter::new())
            .with_config(GameConfig::instant())
            .with_clock(fixed_clock())
            .with_rng(StdRng::seed_from_u64(9));
        (svc, repo)
    }

    #[tokio::test]
    async fn rejected_intent_is_reported_and_rendered() {
        let (mut svc, _) = service();
        let err = svc.handle(Intent::Advance).await.unwrap_err();
        assert!(matches!(err, GameError::Input(InputError::WrongPhase { .. })));
        let presenter = svc.presenter();
        assert!(matches!(
            presenter.events.last(),
            Some(GameEvent::Rejected(InputError::WrongPhase { .. }))
        ));
        assert_eq!(presenter.views.len(), 1);
    }

    #[tokio::test]
    async fn unknown_topic_is_a_content_load_error() {
        let (mut svc, _) = service();
        svc.handle(Intent::SelectMode(GameMode::Individual))
            .await
            .unwrap();
        let err = svc
            .handle(Intent::SelectTopic(TopicId::new("nope").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::ContentLoad(_)));
        assert_eq!(svc.session().phase(), &Phase::TopicSelect);
        assert!(matches!(
            svc.presenter().events.last(),
            Some(GameEvent::LoadFailed(_))
        ));
    }

    #[tokio::test]
    async fn topics_are_listed_when_entering_topic_select() {
        let (mut svc, _) = service();
        svc.handle(Intent::SelectMode(GameMode::Individual))
            .await
            .unwrap();
        let view = svc.presenter().last_view().unwrap();
        assert_eq!(view.topics.len(), 1);
        assert_eq!(view.topics[0].display_name, "Misc");
    }

    #[tokio::test]
    async fn reveal_waits_for_the_configured_delay() {
        tokio::time::pause();
        let (svc, _) = service();
        let mut svc = svc.with_config(
            GameConfig::new().with_reveal_delay(std::time::Duration::from_secs(3)),
        );
        svc.handle(Intent::SelectMode(GameMode::Individual))
            .await
            .unwrap();
        svc.handle(Intent::SelectTopic(TopicId::new("misc").unwrap()))
            .await
            .unwrap();
        svc.handle(Intent::SelectDifficulty(Difficulty::new("easy").unwrap()))
            .await
            .unwrap();

        let started = tokio::time::Instant::now();
        svc.handle(Intent::SubmitAnswer(AnswerIndex::new(0).unwrap()))
            .await
            .unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_secs(3));

        let pending_view = svc
            .presenter()
            .views
            .iter()
            .rev()
            .nth(1)
            .map(|view| view.phase.clone());
        assert_eq!(
            pending_view,
            Some(Phase::AnswerPending {
                selected: AnswerIndex::new(0).unwrap()
            })
        );
    }
}
