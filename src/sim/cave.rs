//! Procedural cave generation
//!
//! The cave is an endless corridor synthesized one column at a time as the world
//! scrolls. Each column's center line follows two detuned sine waves keyed by a
//! per-instance seed, limited by a slope clamp and the screen margins, then snapped to a
//! coarse vertical grid for a blocky silhouette. Stalactites and stalagmites are placed
//! per fixed-width cell using a reproducible sine hash, so the same seed always yields
//! the same cave.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::corridor::Corridor;
use super::geometry::{floor_to_step, snap_to_step};
use crate::stage::StageParams;
use crate::tuning::CaveTuning;

/// Deterministic pseudo-random value in `[0, 1)` for an integer index and seed.
///
/// Classic sine hash. Not a quality RNG, but a pure function of its inputs, which is
/// what spike placement needs.
#[inline]
pub fn hash01(index: i64, seed: f64) -> f64 {
    fract01(((index as f64) * 12.9898 + seed * 78.233).sin() * 43758.5453)
}

/// Fractional part in `[0, 1)`; tiny negatives would otherwise round up to exactly 1
fn fract01(v: f64) -> f64 {
    (v - v.floor()).min(1.0 - f64::EPSILON)
}

/// Spike protrusions for one column, in world units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spikes {
    /// Stalactite growing down from the ceiling
    pub top: f32,
    /// Stalagmite growing up from the floor
    pub bottom: f32,
}

/// Incremental corridor generator with a sliding window of geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cave {
    params: StageParams,
    tuning: CaveTuning,
    /// Travel during which the cave stays level and centered
    safe_dist: f32,
    /// Phase offset shared by the noise and the spike hash
    seed: f64,
    corridor: Corridor,
    /// Screen x of the next column to generate
    right_x: f32,
    /// Cumulative world travel since the stage began
    total: f32,
    /// Center of the newest column before spikes; the slope clamp follows it
    last_center: Option<f32>,
}

impl Cave {
    /// Create a cave with a randomly drawn seed
    pub fn new(params: StageParams, tuning: CaveTuning, safe_dist: f32) -> Self {
        Self::with_seed(params, tuning, safe_dist, rand::random())
    }

    /// Create a cave whose geometry is fully determined by `seed`.
    ///
    /// # Panics
    /// If `safe_dist` is negative or the stage's opening does not fit the play area.
    pub fn with_seed(params: StageParams, tuning: CaveTuning, safe_dist: f32, seed: u64) -> Self {
        assert!(safe_dist >= 0.0, "safe distance must be non-negative, got {safe_dist}");
        if let Err(err) = tuning.validate().and_then(|_| params.validate(&tuning)) {
            panic!("cannot build a cave for stage '{}': {err}", params.name);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let phase = rng.random::<f64>() * f64::from(tuning.seed_phase_range);

        let mut cave = Self {
            params,
            tuning,
            safe_dist,
            seed: phase,
            corridor: Corridor::new(),
            right_x: 0.0,
            total: 0.0,
            last_center: None,
        };
        cave.reset();
        log::debug!(
            "Cave '{}' seeded (phase {:.3}) with {} columns",
            cave.params.name,
            cave.seed,
            cave.corridor.len()
        );
        cave
    }

    /// Discard all geometry and regenerate the initial window
    pub fn reset(&mut self) {
        self.corridor.clear();
        self.right_x = 0.0;
        self.total = 0.0;
        self.last_center = None;
        self.extend();
    }

    /// Replace the stage constraints. Already generated columns are kept.
    ///
    /// # Panics
    /// If the new opening does not fit the play area.
    pub fn set_params(&mut self, params: StageParams) {
        if let Err(err) = params.validate(&self.tuning) {
            panic!("cannot switch cave to stage '{}': {err}", params.name);
        }
        self.params = params;
    }

    /// Scroll the cave left by `dx` world units, evicting and generating columns.
    ///
    /// # Panics
    /// If `dx` is negative or not finite.
    pub fn update(&mut self, dx: f32) {
        assert!(
            dx.is_finite() && dx >= 0.0,
            "cave can only scroll forward, got dx = {dx}"
        );
        self.total += dx;
        self.corridor.shift(dx);
        self.right_x -= dx;

        let evicted = self.corridor.evict_before(-self.tuning.segment_width);
        if evicted > 0 {
            log::trace!("Cave evicted {evicted} columns at travel {:.1}", self.total);
        }
        self.extend();
    }

    /// Midpoint of the opening at screen x, flat beyond the generated range
    pub fn center_at_x(&self, x: f32) -> f32 {
        self.corridor.center_at(x).unwrap_or_else(|| self.midline())
    }

    /// Whether a screen-space polygon touches or leaves the corridor
    pub fn collides(&self, polygon: &[Vec2]) -> bool {
        self.corridor.collides(polygon)
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    /// Ceiling polyline, sorted by x
    pub fn top(&self) -> &VecDeque<Vec2> {
        self.corridor.top()
    }

    /// Floor polyline, sorted by x
    pub fn bottom(&self) -> &VecDeque<Vec2> {
        self.corridor.bottom()
    }

    /// Cumulative travel since the stage began
    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn params(&self) -> &StageParams {
        &self.params
    }

    pub fn tuning(&self) -> &CaveTuning {
        &self.tuning
    }

    pub fn safe_dist(&self) -> f32 {
        self.safe_dist
    }

    /// Narrowest opening the cave may have (min gap rounded up to the grid)
    pub fn gap(&self) -> f32 {
        self.tuning.carved_gap(self.params.min_gap)
    }

    /// Opening carved around the center line before spikes.
    ///
    /// Leaves room for the tallest spike on top of [`Cave::gap`], capped to the play area,
    /// so a single spike narrows the corridor without pushing the opposite wall.
    pub fn opening(&self) -> f32 {
        let step = self.tuning.block_step;
        let spike_room = if self.tuning.spike_chance > 0.0 {
            self.tuning.spike_max_steps as f32 * step
        } else {
            0.0
        };
        let room = floor_to_step(self.tuning.playable_room(), step * 2.0);
        self.tuning
            .carved_gap(self.params.min_gap + spike_room)
            .min(room)
            .max(self.gap())
    }

    /// Unspiked center of the newest column
    pub fn base_center(&self) -> Option<f32> {
        self.last_center
    }

    /// Center line used inside the safe zone
    pub fn midline(&self) -> f32 {
        let mid = (self.tuning.ceiling() + self.tuning.floor()) / 2.0;
        let (lo, hi) = self.center_limits();
        snap_to_step(mid, self.tuning.block_step).clamp(lo, hi)
    }

    /// Spike heights at a travel position (zero inside the safe zone)
    pub fn spikes_at(&self, travel: f32) -> Spikes {
        if travel < self.safe_dist {
            return Spikes::default();
        }

        let cell_width = self.tuning.spike_cell;
        let cell = (travel / cell_width).floor();
        let frac = (travel - cell * cell_width) / cell_width;
        let cell = cell as i64;

        let side = |salt: i64| -> f32 {
            if hash01(cell * 4 + salt, self.seed) >= f64::from(self.tuning.spike_chance) {
                return 0.0;
            }
            let roll = hash01(cell * 4 + salt + 2, self.seed);
            let max_steps = self.tuning.spike_max_steps.max(1);
            let steps = ((roll * f64::from(max_steps)).floor() as u32 + 1).min(max_steps);
            let height = steps as f32 * self.tuning.block_step;

            let bevel = self.tuning.spike_bevel;
            if frac < bevel || frac >= 1.0 - bevel {
                floor_to_step(height / 2.0, self.tuning.block_step)
            } else {
                height
            }
        };

        Spikes {
            top: side(0),
            bottom: side(1),
        }
    }

    /// Allowed range for the center line so the opening stays inside the margins
    fn center_limits(&self) -> (f32, f32) {
        let half = self.opening() / 2.0;
        let lo = self.tuning.ceiling() + half;
        let hi = self.tuning.floor() - half;
        (lo, hi.max(lo))
    }

    /// Generate columns until the window reaches one segment past the right edge
    fn extend(&mut self) {
        let limit = self.tuning.view_width + self.tuning.segment_width;
        while self.right_x <= limit {
            let x = self.right_x;
            let travel = self.total + x;
            let center = self.center_y(travel);
            let (top, bottom) = self.walls(center, travel);
            self.corridor.push(x, top, bottom);
            self.last_center = Some(center);
            self.right_x += self.tuning.segment_width;
        }
    }

    /// Center line before spikes, snapped to the grid
    fn center_y(&self, travel: f32) -> f32 {
        let (lo, hi) = self.center_limits();
        if travel < self.safe_dist {
            return self.midline();
        }

        let t = f64::from(travel) / f64::from(self.params.period);
        let (a1, a2) = self.tuning.wave_amplitudes;
        let ratio = f64::from(self.tuning.wave_ratio);
        let phase_ratio = f64::from(self.tuning.phase_ratio);
        let wave = f64::from(a1) * (TAU * t + self.seed).sin()
            + f64::from(a2) * (TAU * t * ratio + self.seed * phase_ratio).sin();
        let mid = (self.tuning.ceiling() + self.tuning.floor()) / 2.0;
        let mut y = mid + wave as f32;

        if let Some(prev) = self.last_center {
            let max_delta = self.params.max_step_delta(self.tuning.segment_width);
            y = y.clamp(prev - max_delta, prev + max_delta);
        }

        snap_to_step(y.clamp(lo, hi), self.tuning.block_step).clamp(lo, hi)
    }

    /// Ceiling and floor heights around `center` for the column at `travel`
    fn walls(&self, center: f32, travel: f32) -> (f32, f32) {
        let step = self.tuning.block_step;
        let gap = self.gap();
        let half = self.opening() / 2.0;

        let spikes = self.spikes_at(travel);
        let mut top = center - half + spikes.top;
        let mut bottom = center + half - spikes.bottom;

        // Spikes may not squeeze the opening below the gap: the opposite wall gives way
        let deficit = gap - (bottom - top);
        if deficit > 0.0 {
            match (spikes.top > 0.0, spikes.bottom > 0.0) {
                (true, false) => bottom += deficit,
                (false, true) => top -= deficit,
                _ => {
                    let up = snap_to_step(deficit / 2.0, step);
                    top -= up;
                    bottom += deficit - up;
                }
            }
        }

        let (ceiling, floor) = (self.tuning.ceiling(), self.tuning.floor());
        if top < ceiling {
            top = ceiling;
            bottom = bottom.max(top + gap);
        }
        if bottom > floor {
            bottom = floor;
            top = top.min(bottom - gap);
        }

        (snap_to_step(top, step), snap_to_step(bottom, step))
    }
}
