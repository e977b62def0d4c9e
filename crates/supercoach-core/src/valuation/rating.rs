// Power rating: the single "higher is better" scalar the valuator ranks on.

use serde::{Deserialize, Serialize};

use crate::draft::pick::Position;
use crate::injury::Injury;
use crate::players::Player;

/// Anything that can turn a player (and their health, if known) into a score.
pub trait RatingModel {
    fn rate(&self, player: &Player, health: Option<&Injury>) -> f64;
}

/// Plain closures rate on player data alone.
impl<F> RatingModel for F
where
    F: Fn(&Player) -> f64,
{
    fn rate(&self, player: &Player, _health: Option<&Injury>) -> f64 {
        self(player)
    }
}

/// Weights and bonuses for [`WeightedRating`], read from `[rating]` in
/// strategy.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingWeights {
    pub season_weight: f64,
    pub form_weight: f64,
    /// Points per kick-in, applied to DEF-eligible players.
    pub kick_in_bonus: f64,
    /// Points per contested possession, applied to MID-eligible players.
    pub contested_bonus: f64,
    /// Players with fewer games than this get `low_sample_penalty`. 0 disables.
    pub min_games: u32,
    pub low_sample_penalty: f64,
    /// Multiply by the injury feed's penalty when one is available.
    pub apply_injury_penalty: bool,
}

impl Default for RatingWeights {
    fn default() -> Self {
        RatingWeights {
            season_weight: 0.6,
            form_weight: 0.4,
            kick_in_bonus: 0.0,
            contested_bonus: 0.0,
            min_games: 0,
            low_sample_penalty: 1.0,
            apply_injury_penalty: false,
        }
    }
}

impl RatingWeights {
    /// Returns the name of the first invalid field, with a reason.
    pub fn check(&self) -> Result<(), (&'static str, String)> {
        let fields: &[(&'static str, f64)] = &[
            ("rating.season_weight", self.season_weight),
            ("rating.form_weight", self.form_weight),
            ("rating.kick_in_bonus", self.kick_in_bonus),
            ("rating.contested_bonus", self.contested_bonus),
        ];
        for &(name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err((name, format!("must be a finite value >= 0, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.low_sample_penalty) {
            return Err((
                "rating.low_sample_penalty",
                format!("must be between 0.0 and 1.0, got {}", self.low_sample_penalty),
            ));
        }
        Ok(())
    }
}

/// Weighted blend of season and recent form with position bonuses.
#[derive(Debug, Clone, Default)]
pub struct WeightedRating {
    pub weights: RatingWeights,
}

impl WeightedRating {
    pub fn new(weights: RatingWeights) -> Self {
        WeightedRating { weights }
    }
}

impl RatingModel for WeightedRating {
    fn rate(&self, player: &Player, health: Option<&Injury>) -> f64 {
        let w = &self.weights;
        // No recent games recorded: let the season average stand in for form.
        let form = if player.form_avg > 0.0 {
            player.form_avg
        } else {
            player.season_avg
        };

        let mut rating = w.season_weight * player.season_avg + w.form_weight * form;

        if player.is_eligible(Position::Def) {
            rating += w.kick_in_bonus * player.kick_ins;
        }
        if player.is_eligible(Position::Mid) {
            rating += w.contested_bonus * player.contested;
        }
        if w.min_games > 0 && player.games < w.min_games {
            rating *= w.low_sample_penalty;
        }
        if w.apply_injury_penalty {
            if let Some(injury) = health {
                rating *= injury.penalty;
            }
        }
        rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injury::HealthStatus;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn canonical_blend() {
        let model = WeightedRating::default();
        let p = Player::new("A", vec![Position::Fwd], 100.0).with_form(80.0);
        assert!(approx_eq(model.rate(&p, None), 92.0));
    }

    #[test]
    fn missing_form_uses_season_average() {
        let model = WeightedRating::default();
        let p = Player::new("A", vec![Position::Fwd], 90.0);
        assert!(approx_eq(model.rate(&p, None), 90.0));
    }

    #[test]
    fn kick_in_bonus_only_for_defenders() {
        let model = WeightedRating::new(RatingWeights {
            kick_in_bonus: 1.0,
            ..RatingWeights::default()
        });
        let def = Player::new("D", vec![Position::Def], 80.0).with_kick_ins(5.0);
        let fwd = Player::new("F", vec![Position::Fwd], 80.0).with_kick_ins(5.0);
        assert!(approx_eq(model.rate(&def, None), 85.0));
        assert!(approx_eq(model.rate(&fwd, None), 80.0));
    }

    #[test]
    fn contested_bonus_for_midfield_eligible() {
        let model = WeightedRating::new(RatingWeights {
            contested_bonus: 0.5,
            ..RatingWeights::default()
        });
        let mid = Player::new("M", vec![Position::Fwd, Position::Mid], 100.0).with_contested(10.0);
        assert!(approx_eq(model.rate(&mid, None), 105.0));
    }

    #[test]
    fn low_sample_penalty_applies_below_threshold() {
        let model = WeightedRating::new(RatingWeights {
            min_games: 5,
            low_sample_penalty: 0.5,
            ..RatingWeights::default()
        });
        let rookie = Player::new("R", vec![Position::Mid], 100.0).with_games(2);
        let veteran = Player::new("V", vec![Position::Mid], 100.0).with_games(5);
        assert!(approx_eq(model.rate(&rookie, None), 50.0));
        assert!(approx_eq(model.rate(&veteran, None), 100.0));
    }

    #[test]
    fn injury_penalty_only_when_enabled() {
        let injury = Injury {
            status: HealthStatus::Test,
            penalty: 0.5,
        };
        let p = Player::new("A", vec![Position::Mid], 100.0);
        let off = WeightedRating::default();
        assert!(approx_eq(off.rate(&p, Some(&injury)), 100.0));
        let on = WeightedRating::new(RatingWeights {
            apply_injury_penalty: true,
            ..RatingWeights::default()
        });
        assert!(approx_eq(on.rate(&p, Some(&injury)), 50.0));
        assert!(approx_eq(on.rate(&p, None), 100.0));
    }

    #[test]
    fn closures_are_rating_models() {
        let model = |p: &Player| p.season_avg * 2.0;
        let p = Player::new("A", vec![Position::Mid], 10.0);
        assert!(approx_eq(model.rate(&p, None), 20.0));
    }

    #[test]
    fn check_rejects_negative_and_out_of_range() {
        let bad = RatingWeights {
            form_weight: -0.1,
            ..RatingWeights::default()
        };
        assert_eq!(bad.check().unwrap_err().0, "rating.form_weight");
        let bad = RatingWeights {
            low_sample_penalty: 1.5,
            ..RatingWeights::default()
        };
        assert_eq!(bad.check().unwrap_err().0, "rating.low_sample_penalty");
        assert!(RatingWeights::default().check().is_ok());
    }
}
