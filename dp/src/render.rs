//! Markdown rendering for plans, reviews, and the self model
//!
//! Task rows always include the `- id: ...` marker line that the review
//! parser keys on, so every rendered plan can be reviewed later.

use std::path::Path;

use crate::domain::{DayPlanResult, Mode, PlanResult, PlannedTask};
use crate::planner::DayModePlan;
use crate::review::{DailyReviewAggregate, ExecutionSummary};
use crate::selfmodel::{
    MIN_PLANNED_PER_TAG, PlannerInsights, SelfModelRecommendations, TOP_N_TAGS, TagStats,
};

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn percent_coarse(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn push_task_detail(
    lines: &mut Vec<String>,
    heading: &str,
    idx: usize,
    planned: &PlannedTask,
    default_minutes: i64,
) {
    let t = &planned.task;
    let est = t.estimated_minutes.unwrap_or(default_minutes);
    let tags = if t.tags.is_empty() {
        "-".to_string()
    } else {
        t.tags.join(", ")
    };
    let priority = match t.priority {
        Some(p) => p.to_string(),
        None => "-".to_string(),
    };
    let reasons: Vec<String> = planned
        .reasons
        .components()
        .into_iter()
        .filter(|(_, v)| v.abs() > 0.01)
        .map(|(k, v)| format!("{k}: {v:+.2}"))
        .collect();
    let reasons = if reasons.is_empty() {
        "-".to_string()
    } else {
        reasons.join(", ")
    };

    lines.push(format!("{heading} {idx}. {}", t.title));
    lines.push(String::new());
    lines.push(format!("- id: `{}`", t.id));
    lines.push(format!("- status: `{}`", t.status));
    lines.push(format!("- priority: `{priority}`"));
    lines.push(format!("- estimated_minutes: `{est}`"));
    lines.push(format!("- tags: {tags}"));
    lines.push(format!("- score: **{:.2}**", planned.score));
    lines.push(format!("- reasons: {reasons}"));
    lines.push(String::new());
}

/// Render a single block plan
pub fn render_block_plan(plan: &PlanResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("## Focus Block Plan ({})", plan.mode));
    lines.push(String::new());
    lines.push(format!(
        "- total_estimated_minutes: **{}**",
        plan.total_estimated_minutes
    ));
    lines.push(format!("- task_count: **{}**", plan.tasks.len()));
    lines.push(String::new());

    if plan.tasks.is_empty() {
        lines.push("> No tasks available for this plan.".to_string());
        return lines.join("\n");
    }

    for (idx, planned) in plan.tasks.iter().enumerate() {
        push_task_detail(&mut lines, "###", idx + 1, planned, 25);
    }

    lines.join("\n")
}

/// Render a full day plan, block by block
pub fn render_day_plan(day_plan: &DayPlanResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("## Day Plan (base_mode = {})", day_plan.base_mode));
    lines.push(String::new());
    lines.push(format!("- total blocks: **{}**", day_plan.blocks.len()));
    lines.push(format!(
        "- total estimated minutes: **{}**",
        day_plan.total_estimated_minutes()
    ));
    lines.push(String::new());

    if day_plan.blocks.is_empty() {
        lines.push("> No tasks available for this day plan.".to_string());
        return lines.join("\n");
    }

    for block in &day_plan.blocks {
        let spec = &block.spec;
        let plan = &block.plan;

        lines.push(format!("### Block: {} ({})", spec.name, spec.mode));
        lines.push(String::new());
        lines.push(format!("- duration_minutes: `{}`", spec.duration_minutes));
        lines.push(format!("- max_tasks: `{}`", spec.max_tasks));
        lines.push(format!("- selected_tasks: `{}`", plan.tasks.len()));
        lines.push(format!(
            "- total_estimated_minutes: `{}`",
            plan.total_estimated_minutes
        ));
        lines.push(String::new());

        if plan.tasks.is_empty() {
            lines.push("> No tasks selected for this block.".to_string());
            lines.push(String::new());
            continue;
        }

        for (idx, planned) in plan.tasks.iter().enumerate() {
            push_task_detail(&mut lines, "####", idx + 1, planned, spec.default_task_minutes);
        }
    }

    lines.join("\n")
}

/// Render the execution review of one plan
pub fn render_execution_summary(summary: &ExecutionSummary, plan_file: Option<&Path>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Plan Execution Review".to_string());
    lines.push(String::new());
    if let Some(path) = plan_file {
        lines.push(format!("- plan file: `{}`", path.display()));
    }
    lines.push(format!("- total planned: **{}**", summary.total_planned));
    lines.push(format!("- tasks found in store: **{}**", summary.found_tasks));
    lines.push(format!("- completed: **{}**", summary.completed));
    lines.push(format!("- not completed: **{}**", summary.not_completed));
    lines.push(format!("- missing (not in tasks.jsonl): **{}**", summary.missing));
    lines.push(format!(
        "- completion rate (found tasks): **{}**",
        percent(summary.completion_rate)
    ));
    lines.push(String::new());

    if summary.items.is_empty() {
        lines.push("> This plan contains no tasks.".to_string());
        return lines.join("\n");
    }

    lines.push("## Tasks".to_string());
    lines.push(String::new());

    for (idx, item) in summary.items.iter().enumerate() {
        let execution = match item.is_completed {
            Some(true) => "✅ completed",
            Some(false) => "⬜ not completed",
            None => "❓ missing in tasks.jsonl",
        };
        let title = item.title.as_deref().unwrap_or("(unknown title)");
        let status = item.status.as_deref().unwrap_or("-");

        lines.push(format!("### {}. {title}", idx + 1));
        lines.push(String::new());
        lines.push(format!("- id: `{}`", item.task_id));
        lines.push(format!("- status: `{status}`"));
        lines.push(format!("- execution: {execution}"));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render the aggregated review of a whole day's plans
pub fn render_daily_review(agg: &DailyReviewAggregate) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Daily Plan Execution Review".to_string());
    lines.push(String::new());
    lines.push(format!("- total plans: **{}**", agg.total_plans));
    lines.push(format!("- total planned tasks: **{}**", agg.total_planned));
    lines.push(format!("- tasks found in store: **{}**", agg.total_found));
    lines.push(format!("- completed: **{}**", agg.total_completed));
    lines.push(format!("- not completed: **{}**", agg.total_not_completed));
    lines.push(format!("- missing (not in tasks.jsonl): **{}**", agg.total_missing));
    lines.push(format!(
        "- overall completion rate (found tasks): **{}**",
        percent(agg.overall_completion_rate)
    ));
    lines.push(String::new());

    if agg.plans.is_empty() {
        lines.push("> No plans to review today.".to_string());
        return lines.join("\n");
    }

    for named in &agg.plans {
        let s = &named.summary;
        lines.push(format!("## Plan: {}", named.plan_name));
        lines.push(String::new());
        lines.push(format!("- planned tasks: **{}**", s.total_planned));
        lines.push(format!("- tasks found in store: **{}**", s.found_tasks));
        lines.push(format!("- completed: **{}**", s.completed));
        lines.push(format!("- not completed: **{}**", s.not_completed));
        lines.push(format!("- missing: **{}**", s.missing));
        lines.push(format!("- completion rate: **{}**", percent(s.completion_rate)));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn tag_bullet(ts: &TagStats) -> String {
    format!(
        "- `{}`: completion **{}** (planned={}, completed={})",
        ts.tag,
        percent_coarse(ts.completion_rate()),
        ts.times_planned,
        ts.times_completed
    )
}

/// Render the self-model snapshot of planning habits
pub fn render_insights(insights: &PlannerInsights) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Self Model Snapshot: Planner Habits".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- distinct tasks seen in history: **{}**",
        insights.total_tasks
    ));
    lines.push(format!(
        "- total planned events: **{}**",
        insights.total_planned_events
    ));
    lines.push(format!(
        "- total completed events: **{}**",
        insights.total_completed_events
    ));
    lines.push(format!(
        "- overall completion rate: **{}**",
        percent(insights.overall_completion_rate)
    ));
    lines.push(String::new());

    if !insights.has_history() {
        lines.push("> No planner execution history yet; run an execution review first.".to_string());
        return lines.join("\n");
    }

    // tag_stats is already sorted best-first
    let significant: Vec<&TagStats> = insights
        .tag_stats
        .iter()
        .filter(|ts| ts.times_planned >= MIN_PLANNED_PER_TAG)
        .collect();

    if significant.is_empty() {
        lines.push(format!(
            "> No tag has been planned at least {MIN_PLANNED_PER_TAG} times yet; the sample is \
             too small for reliable preferences."
        ));
        return lines.join("\n");
    }

    let mut worst = significant.clone();
    worst.sort_by(|a, b| {
        a.completion_rate()
            .partial_cmp(&b.completion_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    lines.push("## Tags with highest completion rate".to_string());
    lines.push(String::new());
    for ts in significant.iter().take(TOP_N_TAGS) {
        lines.push(tag_bullet(ts));
    }
    lines.push(String::new());

    lines.push("## Tags with lowest completion rate".to_string());
    lines.push(String::new());
    for ts in worst.iter().take(TOP_N_TAGS) {
        lines.push(tag_bullet(ts));
    }
    lines.push(String::new());

    lines.push("## Interpretation (for the human self)".to_string());
    lines.push(String::new());
    lines.push(
        "- High-completion tags show where you slip into gear easily; lean on them when momentum \
         matters."
            .to_string(),
    );
    lines.push(
        "- Low-completion tags keep getting planned and postponed; pace them more gently by \
         splitting them smaller or placing them in higher-energy slots."
            .to_string(),
    );

    lines.join("\n")
}

/// Render strategy recommendations for tomorrow
pub fn render_recommendations(rec: &SelfModelRecommendations) -> String {
    let insights = &rec.insights;
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Self Model Recommendations: Planner Strategy".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- distinct tasks seen in history: **{}**",
        insights.total_tasks
    ));
    lines.push(format!(
        "- total planned events: **{}**",
        insights.total_planned_events
    ));
    lines.push(format!(
        "- total completed events: **{}**",
        insights.total_completed_events
    ));
    lines.push(format!(
        "- overall completion rate: **{}**",
        percent(insights.overall_completion_rate)
    ));
    lines.push(format!(
        "- suggested base_mode for tomorrow: **{}**",
        rec.suggested_base_mode
    ));
    lines.push(String::new());

    if !insights.has_history() {
        lines.push("> No planner execution history yet; plan and review a few days first.".to_string());
        return lines.join("\n");
    }

    if rec.strength_tags.is_empty() && rec.friction_tags.is_empty() {
        lines.push(
            "> No tag has reached the planned-count threshold yet; staying with the default \
             balance mode."
                .to_string(),
        );
        return lines.join("\n");
    }

    if !rec.strength_tags.is_empty() {
        lines.push("## Strength tags (what you finish most reliably)".to_string());
        lines.push(String::new());
        for ts in &rec.strength_tags {
            lines.push(tag_bullet(ts));
        }
        lines.push(String::new());
    }

    if !rec.friction_tags.is_empty() {
        lines.push("## Friction tags (what slips most often)".to_string());
        lines.push(String::new());
        for ts in &rec.friction_tags {
            lines.push(tag_bullet(ts));
        }
        lines.push(String::new());
    }

    lines.push("## Suggested strategy for tomorrow".to_string());
    lines.push(String::new());
    match rec.suggested_base_mode {
        Mode::Rest => {
            lines.push("- Treat tomorrow as a recovery day:".to_string());
            lines.push("  - schedule at least one pure self-care block;".to_string());
            lines.push(
                "  - lighten the long-haul load, keeping only the one or two most important \
                 tasks;"
                    .to_string(),
            );
            lines.push(
                "  - spend more time on tidying, review, sleep and physical recovery.".to_string(),
            );
        }
        Mode::Focus => {
            lines.push("- Treat tomorrow as a push day for the key projects:".to_string());
            lines.push(
                "  - put one high-intensity universe / deep-work block in the morning;".to_string(),
            );
            lines.push("  - keep self-care at just enough to avoid burning out;".to_string());
            lines.push(
                "  - give the big task you keep deferring the freshest slot of the day."
                    .to_string(),
            );
        }
        Mode::Balance => {
            lines.push("- Treat tomorrow as a day for tuning the rhythm:".to_string());
            lines.push(
                "  - open the morning with one focus block for universe tasks;".to_string(),
            );
            lines.push(
                "  - set aside one or two self-care / maintenance tasks for the afternoon or \
                 evening;"
                    .to_string(),
            );
            lines.push(
                "  - avoid stacking the whole day with the same high-pressure work.".to_string(),
            );
        }
    }

    lines.join("\n")
}

/// Render the mode decision together with the day plan it produced
pub fn render_day_mode_plan(result: &DayModePlan) -> String {
    let d = &result.decision;
    let self_model = match d.self_model_mode {
        Some(mode) => mode.to_string(),
        None => "N/A".to_string(),
    };

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Day Plan from Mood × Self-Model".to_string());
    lines.push(String::new());
    lines.push(format!("- mood-based mode: **{}**", d.mood_mode));
    lines.push(format!("- self-model mode: **{self_model}**"));
    lines.push(format!(
        "- final base_mode used for planning: **{}**",
        d.final_mode
    ));
    lines.push(String::new());
    lines.push("## Mode reasoning".to_string());
    lines.push(String::new());
    lines.push(d.reason.clone());
    lines.push(String::new());
    lines.push("## Generated day plan".to_string());
    lines.push(String::new());
    lines.push(render_day_plan(&result.day_plan));

    lines.join("\n")
}
