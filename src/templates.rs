//! Starter templates applied by `casebook init`.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::ids::generate_id;
use crate::types::{ChecklistItem, Deliverable, Objective, ObjectiveKind, Section};

/// A named set of starter sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// A UX case-study outline with typed objectives.
    CaseStudy,
    /// Nothing; build your own structure.
    Empty,
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "case-study" => Ok(Self::CaseStudy),
            "empty" => Ok(Self::Empty),
            other => Err(Error::UnknownTemplate { name: other.to_string() }),
        };
    }
}

impl Template {
    /// Fresh sections for this template, every id newly generated.
    pub fn sections(self, now: DateTime<Utc>) -> Vec<Section> {
        return match self {
            Self::CaseStudy => case_study_sections(now),
            Self::Empty => Vec::new(),
        };
    }
}

/// Objective blueprint: title plus payload.
struct Blueprint {
    /// Payload, including checklist labels.
    kind: ObjectiveKind,
    /// Objective title.
    title: &'static str,
}

/// Shorthand for a text objective.
const fn text(title: &'static str, max_length: Option<usize>) -> Blueprint {
    return Blueprint { kind: ObjectiveKind::text(max_length), title };
}

/// Shorthand for a number objective.
const fn number(title: &'static str, min: Option<f64>, max: Option<f64>) -> Blueprint {
    return Blueprint { kind: ObjectiveKind::number(min, max, None), title };
}

/// Shorthand for a checklist objective with unticked items.
fn checklist(title: &'static str, labels: &[&str]) -> Blueprint {
    let items = labels
        .iter()
        .map(|label| {
            return ChecklistItem {
                done: false,
                id: generate_id(),
                label: (*label).to_string(),
            };
        })
        .collect();
    return Blueprint { kind: ObjectiveKind::checklist(items), title };
}

/// Build one section from blueprints.
fn section(
    name: &str,
    description: &str,
    objectives: Vec<Blueprint>,
    deliverables: &[&str],
    now: DateTime<Utc>,
) -> Section {
    let mut section = Section::new(generate_id(), name, now);
    section.description = Some(description.to_string());
    section.objectives = objectives
        .into_iter()
        .map(|b| return Objective::new(generate_id(), b.title, b.kind))
        .collect();
    section.deliverables = deliverables
        .iter()
        .map(|label| {
            return Deliverable {
                id: generate_id(),
                is_completed: false,
                label: (*label).to_string(),
                note: None,
            };
        })
        .collect();
    return section;
}

/// The UX case-study outline.
fn case_study_sections(now: DateTime<Utc>) -> Vec<Section> {
    return vec![
        section(
            "Overview",
            "Frame the project for a reader who has never heard of it.",
            vec![
                text("Project summary", Some(280)),
                text("Your role", None),
                number("Timeline (weeks)", Some(1.0), Some(104.0)),
            ],
            &["One-line problem statement"],
            now,
        ),
        section(
            "Research",
            "What you learned about users and the market, and how.",
            vec![
                checklist(
                    "Research methods",
                    &["User interviews", "Surveys", "Competitive analysis", "Analytics review"],
                ),
                number("Participants", Some(0.0), None),
                text("Key insights", None),
            ],
            &["Research synthesis", "Personas"],
            now,
        ),
        section(
            "Define",
            "The problem you chose to solve and how success is measured.",
            vec![
                text("Problem statement", Some(500)),
                checklist("Success metrics", &["Primary metric defined", "Baseline captured"]),
            ],
            &["Journey map"],
            now,
        ),
        section(
            "Design",
            "Explorations, iterations, and the decisions behind them.",
            vec![number("Design iterations", Some(0.0), None), text("Design rationale", None)],
            &["Wireframes", "High-fidelity mockups"],
            now,
        ),
        section(
            "Validate",
            "How the design was tested and what changed as a result.",
            vec![number("Usability test rounds", Some(0.0), None), text("Findings", None)],
            &["Test report"],
            now,
        ),
        section(
            "Outcome",
            "Results, impact, and reflection.",
            vec![text("Impact", None), text("Lessons learned", None)],
            &["Published case study"],
            now,
        ),
    ];
}
