use tracing::debug;

use crate::config::RECENT_SAMPLE_COUNT;
use crate::types::{PerformanceSample, RiskFactor, RiskFinding, RiskLevel};

/// Flags metrics whose newest value moved away from the mean of the other
/// recent values by at least the factor's threshold.
///
/// Stateless: the same inputs always produce the same findings.
#[derive(Debug, Clone)]
pub struct RiskDetector {
    factors: Vec<RiskFactor>,
    recent_count: usize,
}

impl RiskDetector {
    pub fn new(factors: Vec<RiskFactor>) -> Self {
        Self {
            factors,
            recent_count: RECENT_SAMPLE_COUNT,
        }
    }

    pub fn with_recent_count(mut self, recent_count: usize) -> Self {
        self.recent_count = recent_count;
        self
    }

    /// `samples` must already be sorted newest first.
    /// Findings come out in factor order, not by severity.
    pub fn detect(&self, samples: &[PerformanceSample]) -> Vec<RiskFinding> {
        let recent = &samples[..samples.len().min(self.recent_count)];
        let mut findings = Vec::new();

        for factor in &self.factors {
            let values: Vec<f64> = recent.iter().filter_map(|s| s.value(factor.field)).collect();
            let Some(change) = latest_vs_rest(&values) else {
                debug!(
                    metric = %factor.name,
                    field = %factor.field,
                    values = values.len(),
                    "not enough samples for risk factor"
                );
                continue;
            };

            if change.abs() >= factor.threshold {
                findings.push(RiskFinding {
                    metric: factor.name.clone(),
                    change: format!("{change:.2}"),
                    level: RiskLevel::from_change(change),
                });
            }
        }

        findings
    }
}

/// `values[0] - mean(values[1..])`, or None with fewer than two values.
fn latest_vs_rest(values: &[f64]) -> Option<f64> {
    let (latest, rest) = values.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mean = rest.iter().sum::<f64>() / rest.len() as f64;
    Some(latest - mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_risk_factors;
    use crate::types::MetricField;
    use chrono::NaiveDate;

    fn detect_risks(samples: &[PerformanceSample], factors: &[RiskFactor]) -> Vec<RiskFinding> {
        RiskDetector::new(factors.to_vec()).detect(samples)
    }

    fn sample(day: u32, launch_speed: Option<f64>) -> PerformanceSample {
        PerformanceSample {
            game_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            release_speed: None,
            launch_speed,
            release_spin_rate: None,
            arm_angle: None,
            sprint_speed: None,
        }
    }

    /// Newest first, one sample per day counting down from June 30.
    fn launch_series(values: &[Option<f64>]) -> Vec<PerformanceSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| sample(30 - i as u32, *v))
            .collect()
    }

    fn exit_velocity_only() -> Vec<RiskFactor> {
        vec![RiskFactor::new("Exit Velocity Drop", MetricField::LaunchSpeed, 3.0)]
    }

    #[test]
    fn drop_past_threshold_is_high() {
        let samples = launch_series(&[Some(90.0), Some(93.0), Some(94.0), Some(92.5)]);
        let findings = detect_risks(&samples, &exit_velocity_only());
        assert_eq!(
            findings,
            vec![RiskFinding {
                metric: "Exit Velocity Drop".to_string(),
                change: "-3.17".to_string(),
                level: RiskLevel::High,
            }]
        );
    }

    #[test]
    fn no_change_yields_nothing() {
        let samples = launch_series(&[Some(93.0), Some(94.0), Some(92.0)]);
        assert!(detect_risks(&samples, &exit_velocity_only()).is_empty());
    }

    #[test]
    fn single_value_yields_nothing() {
        let samples = launch_series(&[Some(50.0), None, None]);
        assert!(detect_risks(&samples, &exit_velocity_only()).is_empty());
    }

    #[test]
    fn rise_past_threshold_is_moderate() {
        let samples = launch_series(&[Some(100.0), Some(95.0), Some(95.0)]);
        let findings = detect_risks(&samples, &exit_velocity_only());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].change, "5.00");
        assert_eq!(findings[0].level, RiskLevel::Moderate);
    }

    #[test]
    fn exactly_at_threshold_is_flagged() {
        let samples = launch_series(&[Some(90.0), Some(93.0)]);
        let findings = detect_risks(&samples, &exit_velocity_only());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].change, "-3.00");
    }

    #[test]
    fn missing_values_are_skipped_in_order() {
        // Newest row has no exit velocity, so 90.0 becomes the latest value.
        let samples = launch_series(&[None, Some(90.0), None, Some(94.0), Some(94.0)]);
        let findings = detect_risks(&samples, &exit_velocity_only());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].change, "-4.00");
    }

    #[test]
    fn only_ten_newest_samples_count() {
        // Ten flat samples, then an outlier that would drag the mean if included.
        let mut values = vec![Some(95.0); 10];
        values.push(Some(10.0));
        let samples = launch_series(&values);
        assert!(detect_risks(&samples, &exit_velocity_only()).is_empty());
    }

    #[test]
    fn recent_count_is_adjustable() {
        let samples = launch_series(&[Some(90.0), Some(95.0), Some(80.0)]);
        let detector = RiskDetector::new(exit_velocity_only()).with_recent_count(2);
        let findings = detector.detect(&samples);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].change, "-5.00");
    }

    #[test]
    fn findings_follow_factor_order() {
        let mut samples = launch_series(&[Some(80.0), Some(95.0)]);
        samples[0].release_speed = Some(90.0);
        samples[1].release_speed = Some(97.0);
        samples[0].release_spin_rate = Some(2000.0);
        samples[1].release_spin_rate = Some(2400.0);

        let metrics: Vec<_> = detect_risks(&samples, &default_risk_factors())
            .into_iter()
            .map(|f| f.metric)
            .collect();
        // Spin rate moved furthest, yet table order wins.
        assert_eq!(
            metrics,
            ["Exit Velocity Drop", "Spin Rate Drop", "Pitch Velocity Drop"]
        );
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let samples = launch_series(&[Some(-10.0), Some(90.0)]);
        let findings = detect_risks(&samples, &exit_velocity_only());
        assert_eq!(findings[0].change, "-100.00");
    }

    #[test]
    fn detection_is_repeatable() {
        let samples = launch_series(&[Some(90.0), Some(93.0), Some(94.0), Some(92.5)]);
        let detector = RiskDetector::new(default_risk_factors());
        assert_eq!(detector.detect(&samples), detector.detect(&samples));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(detect_risks(&[], &default_risk_factors()).is_empty());
    }
}
