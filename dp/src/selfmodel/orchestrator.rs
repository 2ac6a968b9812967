//! Combining the mood signal with the self-model

use serde::Serialize;

use crate::domain::Mode;
use crate::selfmodel::advisor::suggest_base_mode;
use crate::selfmodel::insights::PlannerInsights;

/// Outcome of weighing the mood signal against the self-model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeDecision {
    pub mood_mode: Mode,
    /// None when there is no execution history to model
    pub self_model_mode: Option<Mode>,
    pub final_mode: Mode,
    pub reason: String,
}

/// Decide the day's base mode from mood and execution history
///
/// With no history the mood signal stands alone. When both sides agree
/// that mode is used; a head-on focus/rest conflict is settled as
/// balance; any milder disagreement defers to the mood signal.
pub fn decide_day_mode(mood_mode: Mode, insights: &PlannerInsights) -> ModeDecision {
    if !insights.has_history() {
        return ModeDecision {
            mood_mode,
            self_model_mode: None,
            final_mode: mood_mode,
            reason: "No execution history yet, deferring entirely to the mood signal.".to_string(),
        };
    }

    let self_model_mode = suggest_base_mode(insights);

    if mood_mode == self_model_mode {
        return ModeDecision {
            mood_mode,
            self_model_mode: Some(self_model_mode),
            final_mode: mood_mode,
            reason: "Mood signal and self-model agree on the day's pace.".to_string(),
        };
    }

    if matches!(
        (mood_mode, self_model_mode),
        (Mode::Focus, Mode::Rest) | (Mode::Rest, Mode::Focus)
    ) {
        return ModeDecision {
            mood_mode,
            self_model_mode: Some(self_model_mode),
            final_mode: Mode::Balance,
            reason: "Mood signal and self-model pull in opposite directions, one pushing and \
                     one resting, so the day is planned as a balance compromise: a little key \
                     progress alongside real recovery room."
                .to_string(),
        };
    }

    ModeDecision {
        mood_mode,
        self_model_mode: Some(self_model_mode),
        final_mode: mood_mode,
        reason: format!(
            "Mood signal and self-model differ mildly; following the mood signal, noting the \
             self-model suggested {}.",
            self_model_mode
        ),
    }
}
