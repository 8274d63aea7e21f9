//! Terminal rendering for classification results.
//!
//! Turns a [`DisplayModel`] into a small text card: action tag and tier,
//! label, a confidence bar, one line of score pills, and the rationale.

use mailguard_client::HealthReport;
use mailguard_core::{DisplayModel, ResultView};

const BAR_CELLS: usize = 40;

// ── Public API ──

pub fn render(model: &DisplayModel) -> String {
    match model {
        DisplayModel::Empty => String::new(),
        DisplayModel::Pending => "Classifying…\n".to_string(),
        DisplayModel::Error { message } => format!("Error\n{message}\n"),
        DisplayModel::Result(view) => render_result(view),
    }
}

pub fn render_health(health: &HealthReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("status        {}\n", health.status));
    if let Some(path) = &health.model_path {
        out.push_str(&format!("model_path    {path}\n"));
    }
    if let Some(kind) = &health.problem_type {
        out.push_str(&format!("problem_type  {kind}\n"));
    }
    if let Some(n) = health.num_labels {
        out.push_str(&format!("num_labels    {n}\n"));
    }
    if !health.id2label.is_empty() {
        let labels: Vec<String> = health
            .id2label
            .iter()
            .map(|(id, name)| format!("{id}={name}"))
            .collect();
        out.push_str(&format!("labels        {}\n", labels.join(", ")));
    }
    if let Some(idx) = health.sensitive_idx {
        out.push_str(&format!("sensitive_idx {idx}\n"));
    }
    out
}

// ── Result card ──

fn render_result(view: &ResultView) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} [{}] ===\n", view.action, view.tier));
    out.push_str(&format!("Label: {}\n", view.label));
    out.push_str(&format!("  {}  {}%\n", bar(view.bar_width), view.bar_width));

    if !view.pills.is_empty() {
        let pills: Vec<String> = view.pills.iter().map(ToString::to_string).collect();
        out.push_str(&format!("  {}\n", pills.join("  |  ")));
    }
    if let Some(rationale) = &view.rationale {
        out.push_str(&format!("Rationale: {rationale}\n"));
    }

    match (&view.model_version, &view.policy_version) {
        (Some(model), Some(policy)) => {
            out.push_str(&format!("Model: {model}  Policy: {policy}\n"));
        }
        (Some(model), None) => {
            out.push_str(&format!("Model: {model}\n"));
        }
        (None, Some(policy)) => {
            out.push_str(&format!("Policy: {policy}\n"));
        }
        (None, None) => {}
    }
    out
}

fn bar(width_pct: u8) -> String {
    let filled = (usize::from(width_pct.min(100)) * BAR_CELLS + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}
