use quiz_core::model::{AnswerIndex, Difficulty, GameMode, Lifeline, TopicId};

/// A command raised by the presenter on behalf of the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectMode(GameMode),
    SelectTopic(TopicId),
    SelectDifficulty(Difficulty),
    SubmitAnswer(AnswerIndex),
    UseLifeline(Lifeline),
    Advance,
    WalkAway,
    AddTeam(String),
    RemoveTeam(String),
    StartTournament,
    ContinueRisking,
    PassSafe,
    NextTeamAfterWrong,
    EndTournament,
    ResetAndReplay,
    NewQuizKeepScores,
    BackToModeSelection,
    PlayAgain,
    ContinueGame,
    ResetSession,
    ShowLeaderboard,
}

impl Intent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SelectMode(_) => "select_mode",
            Intent::SelectTopic(_) => "select_topic",
            Intent::SelectDifficulty(_) => "select_difficulty",
            Intent::SubmitAnswer(_) => "submit_answer",
            Intent::UseLifeline(_) => "use_lifeline",
            Intent::Advance => "advance",
            Intent::WalkAway => "walk_away",
            Intent::AddTeam(_) => "add_team",
            Intent::RemoveTeam(_) => "remove_team",
            Intent::StartTournament => "start_tournament",
            Intent::ContinueRisking => "continue_risking",
            Intent::PassSafe => "pass_safe",
            Intent::NextTeamAfterWrong => "next_team_after_wrong",
            Intent::EndTournament => "end_tournament",
            Intent::ResetAndReplay => "reset_and_replay",
            Intent::NewQuizKeepScores => "new_quiz_keep_scores",
            Intent::BackToModeSelection => "back_to_mode_selection",
            Intent::PlayAgain => "play_again",
            Intent::ContinueGame => "continue_game",
            Intent::ResetSession => "reset_session",
            Intent::ShowLeaderboard => "show_leaderboard",
        }
    }
}
