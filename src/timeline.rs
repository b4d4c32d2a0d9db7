use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineStage {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Timeline {
    pub stages: Vec<TimelineStage>,
    pub progress_percent: f64,
}

/// Derives the customer-facing progress view from the canonical stage list
/// and the order's current status name.
///
/// A stage is completed once the current status has reached or passed it.
/// The bar position overshoots the linear stage position by a fixed 10-point
/// nudge while work is in progress, so it only parks exactly on a dot at
/// completion. A status that is not in the stage list yields 0% with nothing
/// completed.
pub fn derive(stages: &[String], current_status: &str) -> Timeline {
    let current = stages.iter().position(|stage| stage == current_status);

    let timeline_stages = stages
        .iter()
        .enumerate()
        .map(|(index, name)| TimelineStage {
            name: name.clone(),
            completed: current.is_some_and(|c| index <= c),
        })
        .collect();

    let progress_percent = match current {
        None => 0.0,
        Some(index) => {
            let last = stages.len().saturating_sub(1);
            if index >= last {
                100.0
            } else {
                let base = index as f64 / last as f64 * 100.0;
                (base + 10.0).min(100.0)
            }
        }
    };

    Timeline {
        stages: timeline_stages,
        progress_percent,
    }
}
