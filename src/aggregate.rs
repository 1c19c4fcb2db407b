/// Overall percentage from a set of scored matches.
///
/// The strongest match dominates: the top ranks are averaged with fixed
/// descending weights, then scaled up by a multiplier that grows with the
/// number of matches found, with diminishing returns.
use crate::config::AggregateConfig;
use crate::models::{MatchCandidate, clamp_score};

/// The reported percentage never exceeds this.
pub const PERCENTAGE_CAP: f64 = 95.0;

const MULTIPLIER_STEP: f64 = 0.1;
const MULTIPLIER_MAX: f64 = 1.5;

/// `min(1 + n/10, 1.5)`.
pub fn source_count_multiplier(match_count: usize) -> f64 {
    (1.0 + match_count as f64 * MULTIPLIER_STEP).min(MULTIPLIER_MAX)
}

/// Percentage in `[0, 95]`; 0 for no matches.
pub fn aggregate(matches: &[MatchCandidate], config: &AggregateConfig) -> u8 {
    if matches.is_empty() {
        return 0;
    }

    let mut scores: Vec<f64> = matches.iter().map(|m| clamp_score(m.similarity)).collect();
    scores.sort_by(|a, b| b.total_cmp(a));

    let (weighted_sum, weight_total) = scores
        .iter()
        .take(config.top_k.max(1))
        .enumerate()
        .map(|(rank, score)| {
            let weight = config
                .weights
                .get(rank)
                .copied()
                .unwrap_or(config.residual_weight);
            (score * weight, weight)
        })
        .fold((0.0, 0.0), |(s, t), (ws, w)| (s + ws, t + w));

    if weight_total <= 0.0 {
        return 0;
    }

    let base = weighted_sum / weight_total;
    let scaled = base * source_count_multiplier(matches.len());
    scaled.clamp(0.0, PERCENTAGE_CAP).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchOrigin;

    fn matches(scores: &[f64]) -> Vec<MatchCandidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &similarity)| MatchCandidate {
                source_url: format!("https://example.com/{i}"),
                title: format!("Match {i}"),
                similarity,
                snippet: None,
                origin: MatchOrigin::Corpus,
            })
            .collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate(&[], &AggregateConfig::default()), 0);
    }

    #[test]
    fn test_single_match() {
        // 40 * 1.1
        assert_eq!(aggregate(&matches(&[40.0]), &AggregateConfig::default()), 44);
    }

    #[test]
    fn test_two_matches_normalized_by_used_weights() {
        // (0.6*60 + 0.25*20) / 0.85 = 48.235..., * 1.2 = 57.88
        assert_eq!(aggregate(&matches(&[20.0, 60.0]), &AggregateConfig::default()), 58);
    }

    #[test]
    fn test_three_matches() {
        // 0.6*50 + 0.25*40 + 0.15*30 = 44.5, * 1.3 = 57.85
        assert_eq!(
            aggregate(&matches(&[30.0, 50.0, 40.0]), &AggregateConfig::default()),
            58
        );
    }

    #[test]
    fn test_only_top_three_weighted_but_all_counted() {
        // top three 50, 40, 30 -> 44.5; five matches -> * 1.5 = 66.75
        assert_eq!(
            aggregate(&matches(&[50.0, 40.0, 30.0, 5.0, 5.0]), &AggregateConfig::default()),
            67
        );
    }

    #[test]
    fn test_residual_weight_beyond_weight_list() {
        let config = AggregateConfig {
            weights: vec![0.6, 0.25, 0.15],
            residual_weight: 0.1,
            top_k: 4,
        };
        // (0.6*80 + 0.25*60 + 0.15*40 + 0.1*20) / 1.1 = 64.545..., * 1.4 = 90.36
        assert_eq!(aggregate(&matches(&[80.0, 60.0, 40.0, 20.0]), &config), 90);
    }

    #[test]
    fn test_capped() {
        let all_high = matches(&[95.0; 8]);
        assert_eq!(aggregate(&all_high, &AggregateConfig::default()), 95);
    }

    #[test]
    fn test_out_of_range_scores_clamped() {
        let weird = matches(&[f64::NAN, -10.0, 500.0]);
        let pct = aggregate(&weird, &AggregateConfig::default());
        assert!(pct <= 95);
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(source_count_multiplier(0), 1.0);
        assert!((source_count_multiplier(3) - 1.3).abs() < 1e-12);
        assert_eq!(source_count_multiplier(5), 1.5);
        assert_eq!(source_count_multiplier(50), 1.5);
    }

    #[test]
    fn test_deterministic() {
        let m = matches(&[33.0, 71.0, 12.0, 54.0]);
        let first = aggregate(&m, &AggregateConfig::default());
        for _ in 0..5 {
            assert_eq!(aggregate(&m, &AggregateConfig::default()), first);
        }
    }
}
