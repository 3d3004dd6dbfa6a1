//! Stage definitions
//!
//! An ordered list of stages, each a fixed record of generation constraints for the cave
//! plus cosmetic colors the renderer may use.

use serde::{Deserialize, Serialize};

use crate::tuning::{CaveTuning, ConfigError};

/// Display colors for a stage (hex strings, opaque to the simulation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageColors {
    pub background: String,
    pub wall: String,
}

/// Generation constraints for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageParams {
    pub name: String,
    /// Minimum vertical opening between ceiling and floor
    pub min_gap: f32,
    /// Wavelength of the center-line noise, in travel units
    pub period: f32,
    /// Largest center-line change per 100 units of travel
    pub slope_per_100: f32,
    /// Stage distance needed to clear the stage
    pub target_distance: f32,
    /// Horizontal scroll speed (units/s)
    pub scroll_speed: f32,
    pub colors: StageColors,
}

impl StageParams {
    /// Largest center-line change between two neighbouring columns
    pub fn max_step_delta(&self, segment_width: f32) -> f32 {
        self.slope_per_100 * (segment_width / 100.0)
    }

    /// Check that the stage can be generated with the given tuning
    pub fn validate(&self, tuning: &CaveTuning) -> Result<(), ConfigError> {
        let positive = [
            ("min_gap", self.min_gap),
            ("period", self.period),
            ("target_distance", self.target_distance),
            ("scroll_speed", self.scroll_speed),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.slope_per_100.is_nan() || self.slope_per_100 < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "slope_per_100",
            });
        }

        let gap = tuning.carved_gap(self.min_gap);
        let room = tuning.playable_room();
        if gap > room {
            return Err(ConfigError::GapTooLarge {
                stage: self.name.clone(),
                gap,
                room,
            });
        }
        Ok(())
    }
}

fn stage(
    name: &str,
    min_gap: f32,
    period: f32,
    slope_per_100: f32,
    target_distance: f32,
    scroll_speed: f32,
    colors: (&str, &str),
) -> StageParams {
    StageParams {
        name: name.to_string(),
        min_gap,
        period,
        slope_per_100,
        target_distance,
        scroll_speed,
        colors: StageColors {
            background: colors.0.to_string(),
            wall: colors.1.to_string(),
        },
    }
}

/// Ordered stage list; the run walks it front to back. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StageParams>", into = "Vec<StageParams>")]
pub struct StageTable {
    stages: Vec<StageParams>,
}

impl TryFrom<Vec<StageParams>> for StageTable {
    type Error = ConfigError;

    fn try_from(stages: Vec<StageParams>) -> Result<Self, Self::Error> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        Ok(Self { stages })
    }
}

impl From<StageTable> for Vec<StageParams> {
    fn from(table: StageTable) -> Self {
        table.stages
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            stages: vec![
                stage("Tutorial", 300.0, 1400.0, 30.0, 4000.0, 180.0, ("#2c3e50", "#34495e")),
                stage("Height Limit", 260.0, 1200.0, 40.0, 5000.0, 200.0, ("#34495e", "#2c3e50")),
                stage("High Speed", 240.0, 1000.0, 50.0, 6000.0, 260.0, ("#8e44ad", "#9b59b6")),
                stage("Complex Walls", 210.0, 900.0, 60.0, 7000.0, 280.0, ("#e67e22", "#f39c12")),
                stage("Final Stage", 180.0, 800.0, 70.0, 8000.0, 320.0, ("#c0392b", "#e74c3c")),
            ],
        }
    }
}

impl StageTable {
    /// Build a table from explicit stages, validating each against `tuning`
    pub fn new(stages: Vec<StageParams>, tuning: &CaveTuning) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for stage in &stages {
            stage.validate(tuning)?;
        }
        Ok(Self { stages })
    }

    /// Parse a JSON array of stages
    pub fn from_json(json: &str, tuning: &CaveTuning) -> Result<Self, ConfigError> {
        let stages: Vec<StageParams> = serde_json::from_str(json)?;
        Self::new(stages, tuning)
    }

    /// Opening stage of a run
    pub fn first(&self) -> &StageParams {
        &self.stages[0]
    }

    /// Stage by zero-based index
    pub fn get(&self, index: usize) -> Option<&StageParams> {
        self.stages.get(index)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// True for the final stage of the run
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.stages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageParams> {
        self.stages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid_and_gets_harder() {
        let tuning = CaveTuning::default();
        let table = StageTable::default();
        assert_eq!(table.len(), 5);
        for stage in table.iter() {
            stage.validate(&tuning).expect("built-in stage must be valid");
        }
        let gaps: Vec<f32> = table.iter().map(|s| s.min_gap).collect();
        assert!(gaps.windows(2).all(|w| w[1] < w[0]));
        assert!(table.is_last(4));
        assert!(!table.is_last(3));
    }

    #[test]
    fn test_max_step_delta() {
        let table = StageTable::default();
        let stage = table.get(1).expect("stage 2");
        // 40 units per 100 of travel over a 20 unit column
        assert!((stage.max_step_delta(20.0) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_json_round_trips_default_table() {
        let tuning = CaveTuning::default();
        let json = serde_json::to_string(&StageTable::default()).expect("serialize");
        let table = StageTable::from_json(&json, &tuning).expect("parse");
        assert_eq!(table, StageTable::default());
    }

    #[test]
    fn test_rejects_gap_that_cannot_fit() {
        let tuning = CaveTuning::default();
        let mut wide = StageTable::default().get(0).cloned().expect("stage 1");
        wide.min_gap = 1000.0;
        let err = StageTable::new(vec![wide], &tuning).unwrap_err();
        assert!(matches!(err, ConfigError::GapTooLarge { .. }));
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = StageTable::from_json("[]", &CaveTuning::default()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTable));
    }
}
