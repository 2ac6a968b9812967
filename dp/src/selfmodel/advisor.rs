//! Strategy advice derived from the planner portrait

use serde::Serialize;

use crate::domain::Mode;
use crate::selfmodel::insights::{PlannerInsights, TagStats};

/// A tag needs this many planned events before its rate is trusted
pub const MIN_PLANNED_PER_TAG: u32 = 3;
/// How many strength/friction tags a recommendation lists
pub const TOP_N_TAGS: usize = 3;

/// Suggest tomorrow's base mode from overall and key-tag completion rates
///
/// The ladder runs top down: no history stays neutral, extreme overall
/// rates decide outright, and the middle band is refined by how the
/// self-care and universe tags have been going.
pub fn suggest_base_mode(insights: &PlannerInsights) -> Mode {
    if !insights.has_history() {
        return Mode::Balance;
    }

    let overall = insights.overall_completion_rate;
    if overall < 0.4 {
        return Mode::Rest;
    }
    if overall > 0.75 {
        return Mode::Focus;
    }

    let self_care = insights.tag("self-care");
    let universe = insights.tag("universe");

    // self-care keeps getting planned but slipping: lighten the load
    if let Some(sc) = self_care {
        if sc.times_planned >= MIN_PLANNED_PER_TAG && sc.completion_rate() < 0.5 {
            return Mode::Rest;
        }
    }

    // comfortable upkeep is landing while the big goals stall: push
    if let (Some(sc), Some(un)) = (self_care, universe) {
        if sc.times_planned >= MIN_PLANNED_PER_TAG
            && un.times_planned >= MIN_PLANNED_PER_TAG
            && sc.completion_rate() > 0.7
            && un.completion_rate() < 0.5
        {
            return Mode::Focus;
        }
    }

    Mode::Balance
}

/// Structured strategy advice built on top of [`PlannerInsights`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfModelRecommendations {
    pub insights: PlannerInsights,
    /// Tags with the best completion rates, most reliable first
    pub strength_tags: Vec<TagStats>,
    /// Tags planned often but rarely finished, worst first
    pub friction_tags: Vec<TagStats>,
    pub suggested_base_mode: Mode,
}

/// Distill insights into strength/friction tags and a suggested mode
///
/// Tags below [`MIN_PLANNED_PER_TAG`] planned events are ignored; with no
/// history at all both lists stay empty and the mode stays balance.
pub fn build_recommendations(insights: PlannerInsights) -> SelfModelRecommendations {
    if !insights.has_history() {
        return SelfModelRecommendations {
            insights,
            strength_tags: Vec::new(),
            friction_tags: Vec::new(),
            suggested_base_mode: Mode::Balance,
        };
    }

    let significant: Vec<&TagStats> = insights
        .tag_stats
        .iter()
        .filter(|ts| ts.times_planned >= MIN_PLANNED_PER_TAG)
        .collect();

    let mut strength_tags: Vec<TagStats> = significant.iter().map(|ts| (*ts).clone()).collect();
    strength_tags.sort_by(|a, b| {
        b.completion_rate()
            .partial_cmp(&a.completion_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.times_planned.cmp(&a.times_planned))
    });
    strength_tags.truncate(TOP_N_TAGS);

    let mut friction_tags: Vec<TagStats> = significant.iter().map(|ts| (*ts).clone()).collect();
    friction_tags.sort_by(|a, b| {
        a.completion_rate()
            .partial_cmp(&b.completion_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.times_planned.cmp(&a.times_planned))
    });
    friction_tags.truncate(TOP_N_TAGS);

    let suggested_base_mode = suggest_base_mode(&insights);

    SelfModelRecommendations {
        insights,
        strength_tags,
        friction_tags,
        suggested_base_mode,
    }
}
