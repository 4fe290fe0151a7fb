use std::fmt;

use quiz_core::model::{AnswerIndex, Difficulty, GameMode, Lifeline, Phase, TopicId};
use services::{GameView, Intent};

/// One line of player input, resolved against what is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Intent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { command: &'static str },
    BadChoice { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(raw) => {
                write!(f, "unknown command: {raw} (type `help` for a list)")
            }
            CommandError::MissingArgument { command } => write!(f, "{command} needs an argument"),
            CommandError::BadChoice { raw } => write!(f, "no such choice: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  individual | team             choose a game mode
  add <name> | remove <name>    edit the team roster
  start                         start the tournament
  <n> | topic <id>              pick a topic (by number or id)
  <n> | level <name>            pick a difficulty
  a | b | c | d                 answer the open question
  50:50 | audience | phone      use a lifeline
  next                          move on after a reveal
  walk                          walk away with your winnings
  risk | pass                   after a correct team answer
  end                           end the tournament now
  replay | newquiz              restart the tournament (reset or keep scores)
  board                         show the leaderboard
  again | menu                  back to mode selection
  continue | reset              resume or discard the saved game
  help | quit";

/// Parses a line in the context of the current view.
///
/// Bare letters answer, bare numbers pick from the topic or difficulty list,
/// and `next` means whatever moving on means in the current phase.
///
/// # Errors
///
/// Returns `CommandError` for input that maps to no intent.
pub fn parse_command(line: &str, view: &GameView) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let head = head.to_ascii_lowercase();

    let intent = match head.as_str() {
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "individual" | "solo" | "team" | "teams" => {
            Intent::SelectMode(head.parse::<GameMode>().map_err(|_| unknown(line))?)
        }
        "mode" => Intent::SelectMode(
            required(rest, "mode")?
                .parse::<GameMode>()
                .map_err(|_| bad_choice(rest))?,
        ),
        "add" => Intent::AddTeam(required(rest, "add")?.to_owned()),
        "remove" | "rm" => Intent::RemoveTeam(required(rest, "remove")?.to_owned()),
        "start" => Intent::StartTournament,
        "topic" => Intent::SelectTopic(pick_topic(required(rest, "topic")?, view)?),
        "level" | "difficulty" => {
            Intent::SelectDifficulty(pick_difficulty(required(rest, "level")?, view)?)
        }
        "answer" => Intent::SubmitAnswer(
            required(rest, "answer")?
                .parse::<AnswerIndex>()
                .map_err(|_| bad_choice(rest))?,
        ),
        "lifeline" => Intent::UseLifeline(
            required(rest, "lifeline")?
                .parse::<Lifeline>()
                .map_err(|_| bad_choice(rest))?,
        ),
        "50:50" | "5050" | "fifty" | "audience" | "ask" | "phone" | "friend" => {
            Intent::UseLifeline(head.parse::<Lifeline>().map_err(|_| unknown(line))?)
        }
        "next" | "n" | "ok" => match view.phase {
            Phase::TeamWrong { .. } => Intent::NextTeamAfterWrong,
            _ => Intent::Advance,
        },
        "walk" => Intent::WalkAway,
        "risk" => Intent::ContinueRisking,
        "pass" | "safe" => Intent::PassSafe,
        "end" => Intent::EndTournament,
        "replay" => Intent::ResetAndReplay,
        "newquiz" => Intent::NewQuizKeepScores,
        "board" | "leaderboard" => Intent::ShowLeaderboard,
        "again" => Intent::PlayAgain,
        "menu" => Intent::BackToModeSelection,
        "continue" | "resume" => Intent::ContinueGame,
        "reset" => Intent::ResetSession,
        _ if rest.is_empty() => bare_choice(&head, view).ok_or_else(|| unknown(line))?,
        _ => return Err(unknown(line)),
    };
    Ok(Command::Play(intent))
}

fn bare_choice(word: &str, view: &GameView) -> Option<Intent> {
    match view.phase {
        Phase::TopicSelect => pick_topic(word, view).ok().map(Intent::SelectTopic),
        Phase::DifficultySelect => pick_difficulty(word, view)
            .ok()
            .map(Intent::SelectDifficulty),
        Phase::InQuestion | Phase::AnswerPending { .. } => {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_ascii_alphabetic() => {
                    AnswerIndex::from_letter(letter)
                        .ok()
                        .map(Intent::SubmitAnswer)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn pick_topic(raw: &str, view: &GameView) -> Result<TopicId, CommandError> {
    if let Some(n) = list_number(raw) {
        return view
            .topics
            .get(n)
            .map(|topic| topic.id.clone())
            .ok_or_else(|| bad_choice(raw));
    }
    TopicId::new(raw.to_ascii_lowercase()).map_err(|_| bad_choice(raw))
}

fn pick_difficulty(raw: &str, view: &GameView) -> Result<Difficulty, CommandError> {
    if let Some(n) = list_number(raw) {
        return view
            .difficulties
            .get(n)
            .cloned()
            .ok_or_else(|| bad_choice(raw));
    }
    Difficulty::new(raw.to_ascii_lowercase()).map_err(|_| bad_choice(raw))
}

/// 1-based list position to index.
fn list_number(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command })
    } else {
        Ok(rest)
    }
}

fn unknown(line: &str) -> CommandError {
    CommandError::Unknown(line.to_owned())
}

fn bad_choice(raw: &str) -> CommandError {
    CommandError::BadChoice {
        raw: raw.to_owned(),
    }
}
