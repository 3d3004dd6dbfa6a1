//! Data-driven generation constants
//!
//! Everything the cave generator needs besides the per-stage parameters lives in
//! [`CaveTuning`]. Defaults match the shipped game; a JSON override can be loaded with
//! [`CaveTuning::from_json`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::geometry::{ceil_to_step, floor_to_step};

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A stage table with no stages
    #[error("stage table has no stages")]
    EmptyTable,
    /// A field that must be strictly positive was not
    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },
    /// A stage's opening does not fit between the margins
    #[error("stage '{stage}' needs a {gap} unit opening but only {room} fits between the margins")]
    GapTooLarge { stage: String, gap: f32, room: f32 },
}

/// World and generator constants shared by every stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveTuning {
    /// Visible width of the play area
    pub view_width: f32,
    /// Height of the play area
    pub view_height: f32,
    /// Horizontal spacing between generated columns
    pub segment_width: f32,
    /// Ceiling margin the top boundary never crosses
    pub top_margin: f32,
    /// Floor margin the bottom boundary never crosses
    pub bottom_margin: f32,
    /// Vertical quantization step
    pub block_step: f32,
    /// Amplitudes of the primary and secondary center-line waves
    pub wave_amplitudes: (f32, f32),
    /// Frequency ratio of the secondary wave
    pub wave_ratio: f32,
    /// Seed scaling for the secondary wave's phase
    pub phase_ratio: f32,
    /// Seed phases are drawn from `[0, seed_phase_range)`
    pub seed_phase_range: f32,
    /// Width of a spike cell in travel units
    pub spike_cell: f32,
    /// Chance that a cell grows a spike, per side
    pub spike_chance: f32,
    /// Tallest spike, in quantization steps
    pub spike_max_steps: u32,
    /// Fraction of the cell at each edge drawn at reduced height
    pub spike_bevel: f32,
}

impl Default for CaveTuning {
    fn default() -> Self {
        Self {
            view_width: 800.0,
            view_height: 600.0,
            segment_width: 20.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            block_step: 10.0,
            wave_amplitudes: (60.0, 30.0),
            wave_ratio: 1.37,
            phase_ratio: 1.7,
            seed_phase_range: 1000.0,
            spike_cell: 160.0,
            spike_chance: 0.22,
            spike_max_steps: 5,
            spike_bevel: 0.15,
        }
    }
}

impl CaveTuning {
    /// Parse and validate a tuning override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: CaveTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("segment_width", self.segment_width),
            ("block_step", self.block_step),
            ("spike_cell", self.spike_cell),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.playable_room() <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "view_height - margins",
            });
        }
        Ok(())
    }

    /// Highest y a top boundary may take, aligned to the block grid
    pub fn ceiling(&self) -> f32 {
        ceil_to_step(self.top_margin, self.block_step)
    }

    /// Lowest y a bottom boundary may take, aligned to the block grid
    pub fn floor(&self) -> f32 {
        floor_to_step(self.view_height - self.bottom_margin, self.block_step)
    }

    /// Vertical room between the aligned ceiling and floor
    pub fn playable_room(&self) -> f32 {
        self.floor() - self.ceiling()
    }

    /// Opening actually carved for a requested minimum gap.
    ///
    /// Rounded up to twice the block step so both halves stay on the grid.
    pub fn carved_gap(&self, min_gap: f32) -> f32 {
        ceil_to_step(min_gap, self.block_step * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_grid_aligned() {
        let tuning = CaveTuning::default();
        assert_eq!(tuning.ceiling(), 20.0);
        assert_eq!(tuning.floor(), 580.0);
        assert_eq!(tuning.carved_gap(260.0), 260.0);
        assert_eq!(tuning.carved_gap(250.0), 260.0);
    }

    #[test]
    fn test_unaligned_margins_round_inward() {
        let tuning = CaveTuning {
            top_margin: 21.0,
            bottom_margin: 30.0,
            ..Default::default()
        };
        assert_eq!(tuning.ceiling(), 30.0);
        assert_eq!(tuning.floor(), 570.0);
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let tuning = CaveTuning::from_json(r#"{ "block_step": 4.0, "spike_chance": 0.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.block_step, 4.0);
        assert_eq!(tuning.spike_chance, 0.0);
        assert_eq!(tuning.view_width, 800.0);
    }

    #[test]
    fn test_from_json_rejects_zero_segment_width() {
        let err = CaveTuning::from_json(r#"{ "segment_width": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "segment_width"
            }
        ));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let err = CaveTuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config JSON"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = ConfigError::NonPositive { field: "block_step" };
        assert_eq!(err.to_string(), "`block_step` must be positive");
        assert!(std::error::Error::source(&err).is_none());

        let err = ConfigError::GapTooLarge {
            stage: "Final Stage".to_string(),
            gap: 600.0,
            room: 560.0,
        };
        assert_eq!(
            err.to_string(),
            "stage 'Final Stage' needs a 600 unit opening but only 560 fits between the margins"
        );
    }

    #[test]
    fn test_json_errors_convert_with_question_mark() {
        fn parse(json: &str) -> Result<CaveTuning, ConfigError> {
            Ok(serde_json::from_str(json)?)
        }
        assert!(matches!(parse("[1, 2]"), Err(ConfigError::Parse(_))));
    }
}
