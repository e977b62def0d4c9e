// Positional scarcity report.
//
// For each position, compares how many players the league still needs with
// how many remain, and how many of those sit above the replacement baseline.

use serde::Serialize;

use crate::draft::pick::Position;
use crate::draft::roster::RosterTracker;
use crate::valuation::vorp::Valuator;

// ---------------------------------------------------------------------------
// Scarcity urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScarcityUrgency {
    /// Supply covers remaining demand by 2 or fewer players.
    Critical,
    /// 3-4 spare players.
    High,
    /// 5-7 spare players.
    Medium,
    /// 8+ spare players.
    Low,
}

impl ScarcityUrgency {
    /// Urgency from remaining supply minus remaining demand.
    pub fn from_margin(margin: i64) -> Self {
        match margin {
            i64::MIN..=2 => ScarcityUrgency::Critical,
            3..=4 => ScarcityUrgency::High,
            5..=7 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity entry
// ---------------------------------------------------------------------------

/// Scarcity analysis for a single position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScarcityEntry {
    pub position: Position,
    /// Starters needed across the league (`starters * num_teams`).
    pub demand: u32,
    /// Players already drafted into this position.
    pub drafted: u32,
    /// `demand - drafted`, floored at 0.
    pub remaining_demand: u32,
    /// Undrafted players eligible at this position.
    pub supply: usize,
    /// Undrafted players rated strictly above the baseline.
    pub above_baseline: usize,
    pub baseline: f64,
    pub urgency: ScarcityUrgency,
}

impl ScarcityEntry {
    /// Spare players once remaining demand is met. Negative when short.
    pub fn margin(&self) -> i64 {
        self.supply as i64 - i64::from(self.remaining_demand)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Build the scarcity report, one entry per position in display order.
pub fn compute_scarcity(valuator: &Valuator<'_>) -> Vec<ScarcityEntry> {
    let state = valuator.state();
    let config = &state.config;
    let tracker = RosterTracker::new(&state.history);
    let baselines = valuator.baselines();

    Position::ALL
        .iter()
        .map(|&position| {
            let demand = config.roster.starters_for(position).saturating_mul(config.num_teams);
            let drafted = tracker.drafted_at(position);
            let remaining_demand = demand.saturating_sub(drafted);
            let baseline = baselines
                .get(&position)
                .map(|b| b.value)
                .unwrap_or_default();
            let ratings = valuator.remaining_ratings(position);
            let above_baseline = ratings.iter().filter(|&&r| r > baseline).count();
            let supply = ratings.len();
            let margin = supply as i64 - i64::from(remaining_demand);

            ScarcityEntry {
                position,
                demand,
                drafted,
                remaining_demand,
                supply,
                above_baseline,
                baseline,
                urgency: ScarcityUrgency::from_margin(margin),
            }
        })
        .collect()
}

/// Look up the scarcity entry for a given position.
pub fn scarcity_for_position(
    scarcity: &[ScarcityEntry],
    position: Position,
) -> Option<&ScarcityEntry> {
    scarcity.iter().find(|e| e.position == position)
}

/// Entries ordered most urgent first, then tightest margin.
pub fn by_urgency(scarcity: &[ScarcityEntry]) -> Vec<&ScarcityEntry> {
    let mut sorted: Vec<&ScarcityEntry> = scarcity.iter().collect();
    sorted.sort_by(|a, b| {
        a.urgency
            .cmp(&b.urgency)
            .then_with(|| a.margin().cmp(&b.margin()))
            .then_with(|| a.position.cmp(&b.position))
    });
    sorted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
