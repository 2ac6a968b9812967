//! Self model: what execution history says about the planner's human

mod advisor;
mod insights;
mod orchestrator;

pub use advisor::{
    MIN_PLANNED_PER_TAG, SelfModelRecommendations, TOP_N_TAGS, build_recommendations,
    suggest_base_mode,
};
pub use insights::{PlannerInsights, TagStats, compute_insights};
pub use orchestrator::{ModeDecision, decide_day_mode};
