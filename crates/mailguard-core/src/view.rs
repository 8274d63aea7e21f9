//! Result interpretation: maps a [`ViewState`] to a renderable display model.
//!
//! Everything here is a pure function of its input, so interpreting the same
//! state twice yields the same model.

use std::fmt;

use tracing::warn;

use crate::message::ClassificationResponse;
use crate::state::ViewState;

pub const ACTION_SEND: &str = "Send Normally";
pub const ACTION_QUARANTINE: &str = "Quarantine for Review";

/// Severity tier derived from the response's `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTier {
    Benign,
    Caution,
    Danger,
}

impl ActionTier {
    /// Exact string match. Anything unrecognised is `Danger`.
    pub fn from_action(action: &str) -> Self {
        match action {
            ACTION_SEND => Self::Benign,
            ACTION_QUARANTINE => Self::Caution,
            _ => Self::Danger,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for ActionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One category probability, already formatted (`"87.0%"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePill {
    pub name: String,
    pub percent: String,
}

impl fmt::Display for ScorePill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.percent)
    }
}

/// Display model for a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub action: String,
    pub label: String,
    pub tier: ActionTier,
    /// Confidence bar width in percent, `0..=100`.
    pub bar_width: u8,
    pub pills: Vec<ScorePill>,
    /// Rationale joined with `", "`; `None` when absent or empty.
    pub rationale: Option<String>,
    pub model_version: Option<String>,
    pub policy_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayModel {
    /// Nothing submitted yet.
    Empty,
    /// A request is in flight.
    Pending,
    Result(ResultView),
    Error { message: String },
}

pub fn interpret(state: &ViewState) -> DisplayModel {
    match state {
        ViewState::Idle => DisplayModel::Empty,
        ViewState::Loading => DisplayModel::Pending,
        ViewState::Success(resp) => DisplayModel::Result(result_view(resp)),
        ViewState::Failure(message) => DisplayModel::Error {
            message: message.clone(),
        },
    }
}

pub fn result_view(resp: &ClassificationResponse) -> ResultView {
    let pills = resp
        .scores
        .iter()
        .map(|(name, value)| {
            if !(0.0..=1.0).contains(&value) {
                warn!(category = name, value, "category score outside [0, 1]");
            }
            ScorePill {
                name: name.to_string(),
                percent: percent(value),
            }
        })
        .collect();

    let rationale = resp
        .rationale
        .as_ref()
        .filter(|reasons| !reasons.is_empty())
        .map(|reasons| reasons.join(", "));

    ResultView {
        action: resp.action.clone(),
        label: resp.label.clone(),
        tier: ActionTier::from_action(&resp.action),
        bar_width: bar_width(resp.score),
        pills,
        rationale,
        model_version: resp.model_version.clone(),
        policy_version: resp.policy_version.clone(),
    }
}

/// `round(score * 100)`. Out-of-range scores are clamped and non-finite ones render as 0.
pub fn bar_width(score: f64) -> u8 {
    if !score.is_finite() {
        warn!(score, "non-finite score, rendering empty bar");
        return 0;
    }
    if !(0.0..=1.0).contains(&score) {
        warn!(score, "score outside [0, 1], clamping");
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// `value * 100` with exactly one fractional digit, ties rounded away from zero.
pub fn percent(value: f64) -> String {
    format!("{:.1}%", (value * 1000.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Scores;

    fn response(action: &str, score: f64) -> ClassificationResponse {
        ClassificationResponse {
            label: "sensitive".into(),
            action: action.into(),
            score,
            scores: Scores::new(),
            rationale: None,
            model_version: None,
            policy_version: None,
        }
    }

    #[test]
    fn tiers_by_exact_action() {
        assert_eq!(ActionTier::from_action("Send Normally"), ActionTier::Benign);
        assert_eq!(
            ActionTier::from_action("Quarantine for Review"),
            ActionTier::Caution
        );
        for other in [
            "",
            "Block",
            "UNKNOWN",
            "send normally",
            "Send Normally ",
            "Trash & Alert Security",
        ] {
            assert_eq!(ActionTier::from_action(other), ActionTier::Danger, "{other:?}");
        }
    }

    #[test]
    fn bar_width_rounds_score() {
        assert_eq!(bar_width(0.0), 0);
        assert_eq!(bar_width(1.0), 100);
        assert_eq!(bar_width(0.87), 87);
        assert_eq!(bar_width(0.125), 13);
        assert_eq!(bar_width(0.994), 99);
        for i in 0..=1000 {
            let score = i as f64 / 1000.0;
            assert!(bar_width(score) <= 100);
            assert_eq!(bar_width(score), (score * 100.0).round() as u8);
        }
    }

    #[test]
    fn bar_width_clamps_out_of_range() {
        assert_eq!(bar_width(1.7), 100);
        assert_eq!(bar_width(-0.2), 0);
        assert_eq!(bar_width(f64::NAN), 0);
        assert_eq!(bar_width(f64::INFINITY), 0);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(0.87), "87.0%");
        assert_eq!(percent(0.13), "13.0%");
        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(percent(1.0), "100.0%");
        assert_eq!(percent(0.4567), "45.7%");
    }

    #[test]
    fn percent_rounds_ties_up() {
        assert_eq!(percent(0.0125), "1.3%");
        assert_eq!(percent(0.0025), "0.3%");
        assert_eq!(percent(0.0375), "3.8%");
    }

    #[test]
    fn quarantine_scenario() {
        let mut resp = response("Quarantine for Review", 0.87);
        resp.scores = [("sensitive", 0.87), ("normal", 0.13)].into_iter().collect();

        let DisplayModel::Result(view) = interpret(&ViewState::Success(resp)) else {
            panic!("expected a result view");
        };
        assert_eq!(view.tier, ActionTier::Caution);
        assert_eq!(view.bar_width, 87);
        let pills: Vec<String> = view.pills.iter().map(ToString::to_string).collect();
        assert_eq!(pills, ["sensitive 87.0%", "normal 13.0%"]);
        assert_eq!(view.rationale, None);
    }

    #[test]
    fn missing_scores_render_no_pills() {
        let view = result_view(&response("Send Normally", 0.1));
        assert!(view.pills.is_empty());
        assert_eq!(view.tier, ActionTier::Benign);
    }

    #[test]
    fn rationale_joined_when_present() {
        let mut resp = response("Send Normally", 0.2);
        resp.rationale = Some(vec!["salary keyword".into(), "xlsx attachment".into()]);
        assert_eq!(
            result_view(&resp).rationale.as_deref(),
            Some("salary keyword, xlsx attachment")
        );

        resp.rationale = Some(vec![]);
        assert_eq!(result_view(&resp).rationale, None);
    }

    #[test]
    fn failure_message_is_verbatim() {
        assert_eq!(
            interpret(&ViewState::Failure("HTTP 500".into())),
            DisplayModel::Error {
                message: "HTTP 500".into()
            }
        );
    }

    #[test]
    fn response_without_action_is_danger() {
        let resp: ClassificationResponse =
            serde_json::from_str(r#"{"label":"x","score":0.9}"#).unwrap();
        let DisplayModel::Result(view) = interpret(&ViewState::Success(resp)) else {
            panic!("expected a result view");
        };
        assert_eq!(view.tier, ActionTier::Danger);
        assert_eq!(view.bar_width, 90);
    }

    #[test]
    fn idle_and_loading() {
        assert_eq!(interpret(&ViewState::Idle), DisplayModel::Empty);
        assert_eq!(interpret(&ViewState::Loading), DisplayModel::Pending);
    }

    #[test]
    fn interpretation_is_repeatable() {
        let mut resp = response("Block", 0.93);
        resp.scores = [("sensitive", 0.93), ("normal", 0.07)].into_iter().collect();
        resp.rationale = Some(vec!["payroll".into()]);
        let state = ViewState::Success(resp);
        assert_eq!(interpret(&state), interpret(&state));
    }
}
