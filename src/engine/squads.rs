use crate::domain::{Match, Side, TeamId};

/// Squads for a slot that is about to receive `teams`.
///
/// A side keeps its squad while its team stays the same. A side whose team is
/// new (or whose squad is still empty) takes the squad the team fielded in its
/// latest completed match of the event.
pub fn carry_forward(
    target: &Match,
    teams: (TeamId, TeamId),
    event_matches: &[Match],
) -> (Option<String>, Option<String>) {
    (
        squad_for_side(target, Side::Team1, teams.0, event_matches),
        squad_for_side(target, Side::Team2, teams.1, event_matches),
    )
}

fn squad_for_side(
    target: &Match,
    side: Side,
    team: TeamId,
    event_matches: &[Match],
) -> Option<String> {
    if target.team(side) == Some(team) {
        if let Some(existing) = target.squad(side) {
            return Some(existing.to_string());
        }
    }

    previous_squad(team, target, event_matches)
}

/// Squad recorded for `team` in its highest-numbered completed match
fn previous_squad(team: TeamId, target: &Match, event_matches: &[Match]) -> Option<String> {
    event_matches
        .iter()
        .filter(|m| m.id != target.id && m.completed && m.involves(team))
        .max_by_key(|m| m.match_no)
        .and_then(|m| m.side_of(team).and_then(|side| m.squad(side)))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchGroup, MatchKind, Seeding};
    use crate::engine::test_support::{completed_match, open_match};

    fn with_squads(mut m: Match, team1: &str, team2: &str) -> Match {
        m.team1_squad = Some(team1.to_string());
        m.team2_squad = Some(team2.to_string());
        m
    }

    fn final_slot() -> Match {
        open_match(11, 11, MatchGroup::Bracket, MatchKind::Final, Seeding::Open)
    }

    #[test]
    fn test_takes_latest_completed_squad() {
        let history = vec![
            with_squads(completed_match(1, 1, (1, 3), (3, 1), 1), "Anna, Bart", "Cleo"),
            with_squads(completed_match(7, 7, (4, 1), (1, 3), 1), "Dev", "Anna, Cyrus"),
        ];

        let (team1, team2) = carry_forward(&final_slot(), (1, 3), &history);
        assert_eq!(team1.as_deref(), Some("Anna, Cyrus"));
        assert_eq!(team2.as_deref(), Some("Cleo"));
    }

    #[test]
    fn test_no_history_leaves_squad_empty() {
        let (team1, team2) = carry_forward(&final_slot(), (1, 2), &[]);
        assert_eq!((team1, team2), (None, None));
    }

    #[test]
    fn test_existing_squad_kept_for_same_team() {
        let mut slot = final_slot();
        slot.team1 = Some(1);
        slot.team1_squad = Some("Chosen by captain".to_string());

        let history = vec![with_squads(completed_match(1, 1, (1, 3), (3, 1), 1), "Old", "Other")];
        let (team1, _) = carry_forward(&slot, (1, 3), &history);
        assert_eq!(team1.as_deref(), Some("Chosen by captain"));
    }

    #[test]
    fn test_replaced_team_drops_stale_squad() {
        let mut slot = final_slot();
        slot.team1 = Some(2);
        slot.team1_squad = Some("Team two squad".to_string());

        let (team1, _) = carry_forward(&slot, (1, 3), &[]);
        assert_eq!(team1, None);
    }

    #[test]
    fn test_blank_history_squad_is_skipped() {
        let history = vec![with_squads(completed_match(1, 1, (1, 3), (3, 1), 1), "  ", "Cleo")];
        let (team1, _) = carry_forward(&final_slot(), (1, 3), &history);
        assert_eq!(team1, None);
    }
}
