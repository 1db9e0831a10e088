//! Settlement placement over a habitability field.
//!
//! Kinds are placed in priority order. For each kind a private copy of the
//! habitability field is sampled above a percentile threshold that relaxes as
//! attempts fail; accepted sites suppress their surroundings so later
//! settlements spread out. Placement draws from a snapshot of the world
//! stream, so the caller's stream is never advanced.
use crate::config::SettlementSettings;
use crate::field::ScalarField;
use crate::names::NameSynthesizer;
use crate::rng::WorldRng;

use super::{Settlement, SettlementKind};

/// Attempts per settlement before the kind is abandoned.
pub const MAX_ATTEMPTS: usize = 1000;
const START_PERCENTILE: f64 = 90.0;
const PERCENTILE_STEP: f64 = 10.0;
const ATTEMPTS_PER_STEP: usize = 100;
const REJECT_PENALTY: f64 = 0.5;
const ACCEPT_SUPPRESSION: f64 = 0.2;

/// The `p`-th percentile (0..=100) of `values`, linearly interpolated between
/// order statistics. NaN-free input is assumed.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut scratch = values.to_vec();
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (scratch.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;

    let (_, lo_val, upper) = scratch.select_nth_unstable_by(lo, |a, b| a.total_cmp(b));
    let lo_val = *lo_val;
    if frac == 0.0 || upper.is_empty() {
        return lo_val;
    }
    let hi_val = upper.iter().cloned().fold(f64::INFINITY, f64::min);
    lo_val + (hi_val - lo_val) * frac
}

struct Placer<'a> {
    elevation: &'a ScalarField,
    water_level: f64,
    settings: &'a SettlementSettings,
    names: &'a NameSynthesizer,
    rng: WorldRng,
    placed: Vec<Settlement>,
}

impl Placer<'_> {
    fn is_valid(&self, kind: SettlementKind, pos: (usize, usize)) -> bool {
        if self.elevation.get(pos.0, pos.1) < self.water_level {
            return false;
        }
        let own = *self.settings.min_distance.get(kind);
        self.placed.iter().all(|s| {
            let required = own.max(*self.settings.min_distance.get(s.kind));
            s.distance_to(pos) >= required
        })
    }

    fn name_for(&mut self, kind: SettlementKind) -> String {
        let epoch = &self.settings.name_epoch;
        let culture = self.settings.name_culture.as_deref();
        match self.names.generate(epoch, culture, kind.name_kind(), &mut self.rng) {
            Ok(name) => name,
            Err(e) => {
                log::warn!("name generation failed for {}: {e}; using fallback", kind.key());
                kind.fallback_name().to_string()
            }
        }
    }

    /// Multiply the disc of `radius` around `pos` by `factor`.
    fn suppress(local: &mut ScalarField, pos: (usize, usize), radius: f64, factor: f64) {
        // Never scan past the grid, whatever the radius.
        let reach = radius.ceil().min(local.width.max(local.height) as f64) as usize;
        let rows = pos.0.saturating_sub(reach)..=(pos.0 + reach).min(local.height - 1);
        for r in rows {
            let cols = pos.1.saturating_sub(reach)..=(pos.1 + reach).min(local.width - 1);
            for c in cols {
                let dr = r as f64 - pos.0 as f64;
                let dc = c as f64 - pos.1 as f64;
                if dr * dr + dc * dc <= radius * radius {
                    local.data[r * local.width + c] *= factor;
                }
            }
        }
    }

    fn place_kind(&mut self, kind: SettlementKind, habitability: &ScalarField) {
        let count = *self.settings.counts.get(kind);
        let radius = *self.settings.min_distance.get(kind);
        let mut local = habitability.clone();
        let mut attempts = 0usize;

        for placed_so_far in 0..count {
            let mut placed = false;
            while !placed && attempts < MAX_ATTEMPTS {
                attempts += 1;
                let relax = (attempts / ATTEMPTS_PER_STEP) as f64 * PERCENTILE_STEP;
                let threshold = percentile(&local.data, (START_PERCENTILE - relax).max(0.0));
                let candidates: Vec<usize> = local
                    .data
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| v >= threshold)
                    .map(|(i, _)| i)
                    .collect();
                if candidates.is_empty() {
                    continue;
                }

                let i = candidates[self.rng.range(0..candidates.len())];
                let pos = (i / local.width, i % local.width);
                if self.is_valid(kind, pos) {
                    let name = self.name_for(kind);
                    self.placed.push(Settlement::new(kind, pos, name, local.data[i]));
                    Self::suppress(&mut local, pos, radius, ACCEPT_SUPPRESSION);
                    placed = true;
                    attempts = 0;
                } else {
                    local.data[i] *= REJECT_PENALTY;
                }
            }
            if !placed {
                log::warn!(
                    "placed only {placed_so_far} of {count} {} settlements after {MAX_ATTEMPTS} attempts",
                    kind.key()
                );
                break;
            }
        }
    }
}

/// Place every configured settlement. `rng` is only read: placement runs on
/// a snapshot of it.
pub fn place(
    elevation: &ScalarField,
    habitability: &ScalarField,
    water_level: f64,
    settings: &SettlementSettings,
    names: &NameSynthesizer,
    rng: &WorldRng,
) -> Vec<Settlement> {
    let mut placer = Placer {
        elevation,
        water_level,
        settings,
        names,
        rng: rng.snapshot(),
        placed: Vec::new(),
    };
    for kind in SettlementKind::ALL {
        placer.place_kind(kind, habitability);
        log::debug!(
            "placement: {} {} settlements",
            placer.placed.iter().filter(|s| s.kind == kind).count(),
            kind.key()
        );
    }
    placer.placed
}
