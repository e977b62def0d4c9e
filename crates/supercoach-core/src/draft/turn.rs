// Snake draft turn order.
//
// Round 1 runs 1..N, round 2 runs N..1, and so on. Every function here is
// pure: the same inputs always map to the same team or pick number.

use crate::error::DraftError;

fn check_inputs(pick_number: u32, total_teams: u32) -> Result<(), DraftError> {
    if total_teams == 0 {
        return Err(DraftError::invalid_config("team count must be at least 1"));
    }
    if pick_number == 0 {
        return Err(DraftError::invalid_config("pick numbers start at 1"));
    }
    Ok(())
}

fn check_slot(slot: u32, total_teams: u32) -> Result<(), DraftError> {
    if total_teams == 0 {
        return Err(DraftError::invalid_config("team count must be at least 1"));
    }
    if slot == 0 || slot > total_teams {
        return Err(DraftError::invalid_config(format!(
            "draft slot {slot} is outside 1..={total_teams}"
        )));
    }
    Ok(())
}

/// The 1-based round a pick falls in.
pub fn round_for_pick(pick_number: u32, total_teams: u32) -> Result<u32, DraftError> {
    check_inputs(pick_number, total_teams)?;
    Ok((pick_number - 1) / total_teams + 1)
}

/// The team on the clock for an absolute, 1-based pick number.
pub fn team_for_pick(pick_number: u32, total_teams: u32) -> Result<u32, DraftError> {
    let round = round_for_pick(pick_number, total_teams)?;
    let offset = (pick_number - 1) % total_teams;
    if round % 2 == 1 {
        Ok(offset + 1)
    } else {
        Ok(total_teams - offset)
    }
}

/// The absolute pick number on which `slot` picks in `round`.
///
/// Inverse of [`team_for_pick`]: `team_for_pick(pick_for_slot_in_round(s, n, r), n) == s`.
pub fn pick_for_slot_in_round(slot: u32, total_teams: u32, round: u32) -> Result<u32, DraftError> {
    check_slot(slot, total_teams)?;
    if round == 0 {
        return Err(DraftError::invalid_config("rounds start at 1"));
    }
    if round % 2 == 1 {
        Ok((round - 1) * total_teams + slot)
    } else {
        Ok(round * total_teams - slot + 1)
    }
}

/// The first pick number at or after `current_pick` on which `slot` is on
/// the clock.
pub fn next_pick_for_slot(current_pick: u32, slot: u32, total_teams: u32) -> Result<u32, DraftError> {
    let round = round_for_pick(current_pick, total_teams)?;
    let in_round = pick_for_slot_in_round(slot, total_teams, round)?;
    if in_round >= current_pick {
        Ok(in_round)
    } else {
        pick_for_slot_in_round(slot, total_teams, round + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_team_snake_order() {
        assert_eq!(team_for_pick(1, 10).unwrap(), 1);
        assert_eq!(team_for_pick(10, 10).unwrap(), 10);
        assert_eq!(team_for_pick(11, 10).unwrap(), 10);
        assert_eq!(team_for_pick(15, 10).unwrap(), 6);
        assert_eq!(team_for_pick(16, 10).unwrap(), 5);
        assert_eq!(team_for_pick(20, 10).unwrap(), 1);
        assert_eq!(team_for_pick(21, 10).unwrap(), 1);
    }

    #[test]
    fn zero_teams_is_invalid() {
        assert!(matches!(
            team_for_pick(1, 0),
            Err(DraftError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            round_for_pick(5, 0),
            Err(DraftError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_pick_is_invalid() {
        assert!(team_for_pick(0, 10).is_err());
    }

    #[test]
    fn single_team_always_picks() {
        for pick in 1..=10 {
            assert_eq!(team_for_pick(pick, 1).unwrap(), 1);
        }
    }

    #[test]
    fn output_always_in_range() {
        for teams in 1..=20u32 {
            for pick in 1..=(10 * teams) {
                let team = team_for_pick(pick, teams).unwrap();
                assert!((1..=teams).contains(&team), "pick {pick} of {teams} -> {team}");
            }
        }
    }

    #[test]
    fn serpentine_visits_each_team_once_per_round() {
        for teams in 1..=20u32 {
            let ascending: Vec<u32> = (1..=teams)
                .map(|p| team_for_pick(p, teams).unwrap())
                .collect();
            let descending: Vec<u32> = (teams + 1..=2 * teams)
                .map(|p| team_for_pick(p, teams).unwrap())
                .collect();
            let expected_up: Vec<u32> = (1..=teams).collect();
            let expected_down: Vec<u32> = (1..=teams).rev().collect();
            assert_eq!(ascending, expected_up);
            assert_eq!(descending, expected_down);
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        for pick in 1..=50 {
            assert_eq!(team_for_pick(pick, 7).unwrap(), team_for_pick(pick, 7).unwrap());
        }
    }

    #[test]
    fn pick_for_slot_matches_turn_engine() {
        for teams in 1..=20u32 {
            for slot in 1..=teams {
                for round in 1..=6 {
                    let pick = pick_for_slot_in_round(slot, teams, round).unwrap();
                    assert_eq!(team_for_pick(pick, teams).unwrap(), slot);
                    assert_eq!(round_for_pick(pick, teams).unwrap(), round);
                }
            }
        }
    }

    #[test]
    fn my_slot_five_of_ten() {
        assert_eq!(pick_for_slot_in_round(5, 10, 1).unwrap(), 5);
        assert_eq!(pick_for_slot_in_round(5, 10, 2).unwrap(), 16);
        assert_eq!(pick_for_slot_in_round(5, 10, 3).unwrap(), 25);
    }

    #[test]
    fn next_pick_rolls_into_following_round() {
        assert_eq!(next_pick_for_slot(1, 5, 10).unwrap(), 5);
        assert_eq!(next_pick_for_slot(5, 5, 10).unwrap(), 5);
        assert_eq!(next_pick_for_slot(6, 5, 10).unwrap(), 16);
        assert_eq!(next_pick_for_slot(17, 5, 10).unwrap(), 25);
    }

    #[test]
    fn slot_out_of_range_is_invalid() {
        assert!(pick_for_slot_in_round(0, 10, 1).is_err());
        assert!(pick_for_slot_in_round(11, 10, 1).is_err());
        assert!(next_pick_for_slot(1, 11, 10).is_err());
    }
}
