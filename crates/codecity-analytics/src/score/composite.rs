use codecity_core::config::ScalabilityWeights;

/// Roughness at which a district's skyline penalty saturates.
const ROUGHNESS_CAP: f64 = 2.0;

/// Round half away from zero and clamp to a 0–100 score.
///
/// Non-finite input scores 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// District health: smooth skyline × local modularity × stability.
///
/// `round(100 × (1 − min(R/2, 1)) × M × (1 − I))`.
#[must_use]
pub fn district_health(roughness: f64, local_modularity: f64, avg_instability: f64) -> u8 {
    let roughness_penalty = normalize_unit(roughness / ROUGHNESS_CAP);
    to_score(
        100.0
            * (1.0 - roughness_penalty)
            * normalize_unit(local_modularity)
            * (1.0 - normalize_unit(avg_instability)),
    )
}

/// Share of total in-degree held by the most-imported files.
///
/// The top group is `max(1, ceil(top_fraction × n))` files. Returns 0 when
/// nothing imports anything.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn hub_concentration(in_degrees: &[usize], top_fraction: f64) -> f64 {
    let total: usize = in_degrees.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let mut sorted = in_degrees.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let top_count = ((sorted.len() as f64 * top_fraction).ceil() as usize).max(1);
    let top: usize = sorted.iter().take(top_count).sum();
    top as f64 / total as f64
}

/// `part / whole`, 0 for an empty whole.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Scalability: penalizes hub concentration, dead code and instability.
///
/// `round(100 × (1 − w_h·hub) × (1 − w_d·dead) × (1 − w_i·inst))`.
#[must_use]
pub fn scalability_score(
    hub_concentration: f64,
    dead_code_ratio: f64,
    avg_instability: f64,
    weights: &ScalabilityWeights,
) -> u8 {
    to_score(
        100.0
            * (1.0 - weights.hub * normalize_unit(hub_concentration))
            * (1.0 - weights.dead_code * normalize_unit(dead_code_ratio))
            * (1.0 - weights.instability * normalize_unit(avg_instability)),
    )
}

fn normalize_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    value.clamp(0.0, 1.0)
}
