// Step C: cohort-wide nonlinear transform and min-max rescale.
//
// The scale is cohort-relative: the transform depends on the min/max across
// the whole player set being scored in one pass. Re-running with a different
// subset changes every score even when raw stats are unchanged.

/// Floor of the display scale. Above zero so the worst player in a cohort
/// never reads as a literal zero.
pub const SCORE_FLOOR: f64 = 5.0;

/// Ceiling of the display scale.
pub const SCORE_CEILING: f64 = 99.9;

/// Transformed range below this is treated as a degenerate (all-equal)
/// cohort.
const RANGE_EPSILON: f64 = 1e-9;

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rescale a cohort of adjusted sums into `[SCORE_FLOOR, SCORE_CEILING]`.
///
/// Pipeline: shift by the cohort minimum (clamped at zero to avoid
/// negative-epsilon float artifacts), compress with `sqrt` (milder than a
/// log, but it narrows the gap between elite and replacement level), then
/// min-max rescale and round to one decimal. An all-equal cohort maps to
/// `SCORE_FLOOR` for everyone.
pub fn rescale_cohort(adjusted_sums: &[f64]) -> Vec<f64> {
    if adjusted_sums.is_empty() {
        return Vec::new();
    }

    let min_adjusted = adjusted_sums.iter().copied().fold(f64::INFINITY, f64::min);

    let transformed: Vec<f64> = adjusted_sums
        .iter()
        .map(|&sum| (sum - min_adjusted).max(0.0).sqrt())
        .collect();

    let min_t = transformed.iter().copied().fold(f64::INFINITY, f64::min);
    let max_t = transformed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max_t - min_t;

    transformed
        .iter()
        .map(|&t| {
            if range < RANGE_EPSILON {
                SCORE_FLOOR
            } else {
                let scaled = SCORE_FLOOR + (t - min_t) / range * (SCORE_CEILING - SCORE_FLOOR);
                round_one_decimal(scaled)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn min_and_max_anchor_the_scale() {
        let scores = rescale_cohort(&[-4.0, 0.0, 3.5, 12.0]);
        assert!(approx_eq(scores[0], SCORE_FLOOR, 1e-10));
        assert!(approx_eq(scores[3], SCORE_CEILING, 1e-10));
        for &s in &scores {
            assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&s));
        }
    }

    #[test]
    fn all_equal_cohort_maps_to_floor() {
        let scores = rescale_cohort(&[2.5, 2.5, 2.5]);
        assert_eq!(scores, vec![SCORE_FLOOR; 3]);
    }

    #[test]
    fn single_player_cohort_maps_to_floor() {
        assert_eq!(rescale_cohort(&[42.0]), vec![SCORE_FLOOR]);
    }

    #[test]
    fn empty_cohort_yields_empty() {
        assert!(rescale_cohort(&[]).is_empty());
    }

    #[test]
    fn rescale_is_monotonic() {
        let sums = [-3.0, -1.0, 0.0, 0.5, 2.0, 7.0, 7.0, 30.0];
        let scores = rescale_cohort(&sums);
        for w in scores.windows(2) {
            assert!(w[0] <= w[1]);
        }
        // Equal inputs yield equal outputs.
        assert!(approx_eq(scores[5], scores[6], 1e-10));
    }

    #[test]
    fn sqrt_compresses_the_top_end() {
        // On a linear scale the midpoint input would land at the midpoint
        // score; sqrt pushes it above the midpoint.
        let scores = rescale_cohort(&[0.0, 50.0, 100.0]);
        let linear_mid = SCORE_FLOOR + 0.5 * (SCORE_CEILING - SCORE_FLOOR);
        assert!(scores[1] > linear_mid);
    }

    #[test]
    fn scores_are_rounded_to_one_decimal() {
        let scores = rescale_cohort(&[0.0, 1.0, 2.0, 3.0]);
        for &s in &scores {
            assert!(approx_eq(s * 10.0, (s * 10.0).round(), 1e-9));
        }
    }

    #[test]
    fn scale_is_cohort_relative() {
        // Removing the top player re-anchors everyone else's score.
        let full = rescale_cohort(&[0.0, 5.0, 10.0]);
        let without_top = rescale_cohort(&[0.0, 5.0]);
        assert!(approx_eq(without_top[1], SCORE_CEILING, 1e-10));
        assert!(full[1] < without_top[1]);
    }
}
