//! Generate human-readable explanations for plan items.

use super::{LearningPlanItem, Rationale, SuggestedAction};

/// One decimal, rounded down so a score never shows the next band's threshold.
fn truncated_score(score: f64) -> f64 {
    (score * 10.0 + 1e-9).floor() / 10.0
}

/// One-line explanation built from an item's rationale.
pub fn describe_item(rationale: &Rationale, action: SuggestedAction) -> String {
    let gap = match rationale.delta {
        d if d > 1 => format!("Gap of {} levels", d),
        1 => "Gap of 1 level".to_string(),
        0 => "Requirement met".to_string(),
        d => format!("Exceeds requirement by {} level{}", -d, if d == -1 { "" } else { "s" }),
    };

    let mut parts = vec![gap];
    if rationale.delta > 0 && (rationale.weight - 1.0).abs() > f64::EPSILON {
        parts.push(format!("weight {:.1}", rationale.weight));
    }
    parts.push(format!(
        "{} risk ({:.1}/100)",
        rationale.risk_label,
        truncated_score(rationale.risk_score)
    ));

    let advice = match action {
        SuggestedAction::Train => "schedule training",
        SuggestedAction::Mentor => "pair with a mentor",
        SuggestedAction::Reassign => "consider reassignment",
        SuggestedAction::Monitor => "monitor",
    };

    format!("{}: {}", parts.join("; "), advice)
}

/// Summary of a whole plan.
pub fn summarize_plan(items: &[LearningPlanItem]) -> String {
    if items.is_empty() {
        return "No skills to address".to_string();
    }

    let count = |action| {
        items
            .iter()
            .filter(|i| i.suggested_action == action)
            .count()
    };

    let mut parts = vec![format!(
        "{} skill{} in plan",
        items.len(),
        if items.len() == 1 { "" } else { "s" }
    )];
    for (action, label) in [
        (SuggestedAction::Train, "to train"),
        (SuggestedAction::Mentor, "to mentor"),
        (SuggestedAction::Reassign, "to reassign"),
        (SuggestedAction::Monitor, "to monitor"),
    ] {
        let n = count(action);
        if n > 0 {
            parts.push(format!("{} {}", n, label));
        }
    }

    parts.join(", ")
}
