//! Safety-signal normalisation.
//!
//! Reduces a drug's adverse-event signals to a risk summary. Two independent
//! thresholds apply: the drug-level tier is classified from `max_signal`,
//! while each individual event is flagged high risk on its own strength. An
//! event can therefore be high risk while the drug is only MEDIUM.

use safer_common::entities::{RiskLevel, SafetySignal, SafetySummary};
use safer_common::policy::RiskThresholds;
use tracing::debug;

use crate::normalise::round_dp;

/// Classify a drug-level risk tier from its maximum signal strength.
pub fn classify_risk(max_signal: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if max_signal >= thresholds.high_signal {
        RiskLevel::High
    } else if max_signal >= thresholds.medium_signal {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Summarise adverse-event signals.
///
/// Signals without a finite strength are excluded from the statistics and
/// never flagged high risk. With no usable signal the zero-evidence default (`0, 0, [], LOW`) is returned.
pub fn normalize_safety_signals(
    signals: &[SafetySignal],
    thresholds: &RiskThresholds,
) -> SafetySummary {
    let strengths: Vec<f64> = signals
        .iter()
        .filter_map(|s| s.signal_strength)
        .filter(|v| v.is_finite())
        .collect();

    if strengths.is_empty() {
        return SafetySummary::default();
    }

    let max_signal = strengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_signal = strengths.iter().sum::<f64>() / strengths.len() as f64;

    let high_risk_events: Vec<String> = signals
        .iter()
        .filter(|s| matches!(s.signal_strength, Some(v) if v.is_finite() && v >= thresholds.high_risk_event))
        .map(|s| s.event.clone())
        .collect();

    let risk_level = classify_risk(max_signal, thresholds);

    debug!(
        signals = strengths.len(),
        max_signal,
        high_risk = high_risk_events.len(),
        %risk_level,
        "Safety signals normalised"
    );

    SafetySummary {
        max_signal: round_dp(max_signal, 2),
        mean_signal: round_dp(mean_signal, 2),
        high_risk_events,
        risk_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sig(event: &str, strength: Option<f64>) -> SafetySignal {
        SafetySignal::new(event, strength)
    }

    fn tier(max: f64) -> RiskLevel {
        normalize_safety_signals(&[sig("e", Some(max))], &RiskThresholds::default()).risk_level
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(999.99), RiskLevel::Medium);
        assert_eq!(tier(1000.0), RiskLevel::High);
        assert_eq!(tier(100.0), RiskLevel::Medium);
        assert_eq!(tier(99.99), RiskLevel::Low);
    }

    #[test]
    fn test_empty_signals_default() {
        let s = normalize_safety_signals(&[], &RiskThresholds::default());
        assert_eq!(s, SafetySummary::default());
    }

    #[test]
    fn test_all_null_strengths_default() {
        let s = normalize_safety_signals(
            &[sig("nausea", None), sig("rash", None)],
            &RiskThresholds::default(),
        );
        assert_eq!(s, SafetySummary::default());
    }

    #[test]
    fn test_stats_and_high_risk_events() {
        let signals = vec![
            sig("gastrointestinal haemorrhage", Some(812.456)),
            sig("nausea", Some(40.0)),
            sig("rash", None),
            sig("peptic ulcer", Some(512.0)),
            sig("gastrointestinal haemorrhage", Some(600.0)),
        ];
        let s = normalize_safety_signals(&signals, &RiskThresholds::default());

        assert_eq!(s.max_signal, 812.46);
        // (812.456 + 40 + 512 + 600) / 4 = 491.114
        assert_eq!(s.mean_signal, 491.11);
        assert_eq!(
            s.high_risk_events,
            vec![
                "gastrointestinal haemorrhage".to_string(),
                "peptic ulcer".to_string(),
                "gastrointestinal haemorrhage".to_string(),
            ]
        );
        // high-risk events present but the drug is only MEDIUM
        assert_eq!(s.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_non_finite_strengths_ignored() {
        let s = normalize_safety_signals(
            &[
                sig("a", Some(f64::NAN)),
                sig("b", Some(10.0)),
                sig("c", Some(f64::INFINITY)),
            ],
            &RiskThresholds::default(),
        );
        assert_eq!(s.max_signal, 10.0);
        assert_eq!(s.mean_signal, 10.0);
        assert!(s.high_risk_events.is_empty());
        assert_eq!(s.risk_level, RiskLevel::Low);

        let only_nan = normalize_safety_signals(&[sig("a", Some(f64::NAN))], &RiskThresholds::default());
        assert_eq!(only_nan, SafetySummary::default());
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskThresholds { high_signal: 50.0, medium_signal: 10.0, high_risk_event: 20.0 };
        let s = normalize_safety_signals(&[sig("a", Some(60.0)), sig("b", Some(15.0))], &thresholds);
        assert_eq!(s.risk_level, RiskLevel::High);
        assert_eq!(s.high_risk_events, vec!["a".to_string()]);
    }
}
