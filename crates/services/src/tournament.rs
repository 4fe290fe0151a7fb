use std::collections::BTreeMap;

use quiz_core::model::{Standing, TeamName, TeamStats, rank_standings};

use crate::error::InputError;

/// Smallest roster a tournament can start with.
pub const MIN_TEAMS: usize = 2;

/// What a team's answer did to its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct { score: u32 },
    /// The score was wiped; `points_lost` is what it held before the answer.
    Wrong { points_lost: u32 },
}

//
// ─── TOURNAMENT ────────────────────────────────────────────────────────────────
//

/// Roster, per-team stats and whose turn it is.
///
/// Roster order is the rotation order. Stats are keyed by team name and always
/// cover exactly the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tournament {
    roster: Vec<TeamName>,
    stats: BTreeMap<TeamName, TeamStats>,
    current: usize,
}

impl Tournament {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts. The caller has already validated that the
    /// stats cover the roster and `current` is in range.
    pub(crate) fn from_parts(
        roster: Vec<TeamName>,
        stats: BTreeMap<TeamName, TeamStats>,
        current: usize,
    ) -> Self {
        Self {
            roster,
            stats,
            current,
        }
    }

    /// Adds a team at the end of the rotation.
    ///
    /// # Errors
    ///
    /// Returns `InputError::EmptyTeamName` for a blank name and
    /// `InputError::DuplicateTeam` if the trimmed name is already taken.
    pub fn add_team(&mut self, raw: &str) -> Result<TeamName, InputError> {
        let name = TeamName::new(raw).map_err(|_| InputError::EmptyTeamName)?;
        if self.stats.contains_key(&name) {
            return Err(InputError::DuplicateTeam(name));
        }
        self.roster.push(name.clone());
        self.stats.insert(name.clone(), TeamStats::new());
        Ok(name)
    }

    /// Removes a team and discards its stats.
    ///
    /// # Errors
    ///
    /// Returns `InputError::UnknownTeam` if no such team is on the roster.
    pub fn remove_team(&mut self, raw: &str) -> Result<TeamName, InputError> {
        let name = TeamName::new(raw).map_err(|_| InputError::UnknownTeam(raw.to_owned()))?;
        let Some(pos) = self.roster.iter().position(|t| *t == name) else {
            return Err(InputError::UnknownTeam(raw.trim().to_owned()));
        };
        self.roster.remove(pos);
        self.stats.remove(&name);
        if self.current >= self.roster.len() {
            self.current = 0;
        }
        Ok(name)
    }

    /// # Errors
    ///
    /// Returns `InputError::NotEnoughTeams` when fewer than [`MIN_TEAMS`] are registered.
    pub fn ensure_startable(&self) -> Result<(), InputError> {
        if self.roster.len() < MIN_TEAMS {
            return Err(InputError::NotEnoughTeams {
                min: MIN_TEAMS,
                have: self.roster.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn roster(&self) -> &[TeamName] {
        &self.roster
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_team(&self) -> Option<&TeamName> {
        self.roster.get(self.current)
    }

    #[must_use]
    pub fn stats(&self, team: &TeamName) -> Option<&TeamStats> {
        self.stats.get(team)
    }

    #[must_use]
    pub fn current_stats(&self) -> Option<&TeamStats> {
        self.current_team().and_then(|team| self.stats.get(team))
    }

    pub(crate) fn stats_map(&self) -> &BTreeMap<TeamName, TeamStats> {
        &self.stats
    }

    /// Books an answer for the team whose turn it is.
    ///
    /// Counters are bumped first, then the verdict is decided. Returns `None`
    /// when the roster is empty.
    pub fn record_answer(&mut self, correct: bool) -> Option<AnswerVerdict> {
        let team = self.roster.get(self.current)?;
        let stats = self.stats.get_mut(team)?;
        if correct {
            stats.record_correct();
            Some(AnswerVerdict::Correct {
                score: stats.score(),
            })
        } else {
            Some(AnswerVerdict::Wrong {
                points_lost: stats.record_wrong(),
            })
        }
    }

    /// Hands the turn to the next team in roster order.
    pub fn rotate(&mut self) -> Option<&TeamName> {
        if self.roster.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.roster.len();
        self.roster.get(self.current)
    }

    /// Teams ordered by descending score; ties keep roster order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        rank_standings(
            self.roster
                .iter()
                .map(|team| (team.clone(), self.stats.get(team).copied().unwrap_or_default())),
        )
    }

    #[must_use]
    pub fn winner(&self) -> Option<Standing> {
        self.standings().into_iter().next()
    }

    /// Zeroes every team's stats and hands the first turn back to the first team.
    pub fn reset_all_scores(&mut self) {
        self.stats.values_mut().for_each(TeamStats::reset);
        self.current = 0;
    }

    /// Keeps the stats but restarts the rotation.
    pub fn restart_rotation(&mut self) {
        self.current = 0;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Tournament {
        let mut t = Tournament::new();
        for name in names {
            t.add_team(name).unwrap();
        }
        t
    }

    #[test]
    fn duplicate_team_is_rejected_and_roster_unchanged() {
        let mut t = roster(&["Alpha"]);
        let err = t.add_team(" Alpha ").unwrap_err();
        assert!(matches!(err, InputError::DuplicateTeam(_)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn blank_team_name_is_rejected() {
        let mut t = Tournament::new();
        assert_eq!(t.add_team("   ").unwrap_err(), InputError::EmptyTeamName);
        assert!(t.is_empty());
    }

    #[test]
    fn removing_a_team_drops_its_stats() {
        let mut t = roster(&["Alpha", "Beta"]);
        let beta = t.remove_team("Beta").unwrap();
        assert_eq!(t.roster(), &[TeamName::new("Alpha").unwrap()]);
        assert!(t.stats(&beta).is_none());
        assert!(matches!(
            t.remove_team("Gamma").unwrap_err(),
            InputError::UnknownTeam(_)
        ));
    }

    #[test]
    fn start_needs_two_teams() {
        let t = roster(&["Solo"]);
        assert_eq!(
            t.ensure_startable().unwrap_err(),
            InputError::NotEnoughTeams { min: 2, have: 1 }
        );
        assert!(roster(&["A", "B"]).ensure_startable().is_ok());
    }

    #[test]
    fn rotation_wraps_in_roster_order() {
        let mut t = roster(&["A", "B", "C"]);
        let seen: Vec<_> = (0..4)
            .map(|_| t.rotate().unwrap().as_str().to_owned())
            .collect();
        assert_eq!(seen, ["B", "C", "A", "B"]);
    }

    #[test]
    fn wrong_answer_reports_points_held_before_reset() {
        let mut t = roster(&["A", "B"]);
        assert_eq!(
            t.record_answer(true),
            Some(AnswerVerdict::Correct { score: 1 })
        );
        assert_eq!(
            t.record_answer(true),
            Some(AnswerVerdict::Correct { score: 2 })
        );
        assert_eq!(
            t.record_answer(false),
            Some(AnswerVerdict::Wrong { points_lost: 2 })
        );
        let stats = t.current_stats().unwrap();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.questions_answered(), 3);
        assert_eq!(stats.correct_answers(), 2);
    }

    #[test]
    fn ties_go_to_the_earlier_team() {
        let mut t = roster(&["A", "B", "C"]);
        t.rotate();
        t.record_answer(true);
        t.rotate();
        t.record_answer(true);
        let standings = t.standings();
        assert_eq!(standings[0].team.as_str(), "B");
        assert_eq!(standings[1].team.as_str(), "C");
        assert_eq!(standings[2].team.as_str(), "A");
        assert_eq!(t.winner().unwrap().rank, 1);
    }

    #[test]
    fn reset_all_scores_keeps_roster() {
        let mut t = roster(&["A", "B"]);
        t.record_answer(true);
        t.rotate();
        t.reset_all_scores();
        assert_eq!(t.current_index(), 0);
        assert_eq!(t.len(), 2);
        assert!(t.standings().iter().all(|s| s.stats == TeamStats::new()));
    }
}
