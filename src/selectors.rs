//! Read-only views derived from a state snapshot.

use std::collections::HashMap;

use crate::types::{AppState, Heading, Objective, ObjectiveHeadingLink, Section};

/// Totals across every section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Deliverables marked complete.
    pub completed_deliverables: usize,
    /// Objectives marked complete.
    pub completed_objectives: usize,
    /// Completed share of objectives plus deliverables, 0 to 100.
    pub overall_progress: f64,
    /// All deliverables.
    pub total_deliverables: usize,
    /// All objectives.
    pub total_objectives: usize,
    /// Number of sections.
    pub total_sections: usize,
}

/// Totals for one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionProgress {
    /// Deliverables marked complete.
    pub completed_deliverables: usize,
    /// Objectives marked complete.
    pub completed_objectives: usize,
    /// Completed share of objectives plus deliverables, 0 to 100.
    pub progress: f64,
    /// All deliverables.
    pub total_deliverables: usize,
    /// All objectives.
    pub total_objectives: usize,
}

/// An objective together with the section that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<'a> {
    /// The objective.
    pub objective: &'a Objective,
    /// Its owning section.
    pub section: &'a Section,
}

/// `100 * completed / total`, exactly 0 when there is nothing to count.
fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let as_float = |n: usize| return f64::from(u32::try_from(n).unwrap_or(u32::MAX));
    return (as_float(completed) / as_float(total) * 100.0).clamp(0.0, 100.0);
}

/// Overall progress across all sections.
pub fn progress(state: &AppState) -> Progress {
    let per_section: Vec<SectionProgress> = state.sections.iter().map(section_progress).collect();
    let sum = |f: fn(&SectionProgress) -> usize| return per_section.iter().map(f).sum::<usize>();

    let completed_objectives = sum(|p| return p.completed_objectives);
    let completed_deliverables = sum(|p| return p.completed_deliverables);
    let total_objectives = sum(|p| return p.total_objectives);
    let total_deliverables = sum(|p| return p.total_deliverables);

    return Progress {
        completed_deliverables,
        completed_objectives,
        overall_progress: percentage(
            completed_objectives.saturating_add(completed_deliverables),
            total_objectives.saturating_add(total_deliverables),
        ),
        total_deliverables,
        total_objectives,
        total_sections: state.sections.len(),
    };
}

/// Progress over exactly one section's objectives and deliverables.
pub fn section_progress(section: &Section) -> SectionProgress {
    let completed_objectives = section.objectives.iter().filter(|o| return o.is_completed).count();
    let completed_deliverables = section.deliverables.iter().filter(|d| return d.is_completed).count();
    let total_objectives = section.objectives.len();
    let total_deliverables = section.deliverables.len();

    return SectionProgress {
        completed_deliverables,
        completed_objectives,
        progress: percentage(
            completed_objectives.saturating_add(completed_deliverables),
            total_objectives.saturating_add(total_deliverables),
        ),
        total_deliverables,
        total_objectives,
    };
}

/// Every incomplete objective, in section order then objective order.
fn incomplete_steps(state: &AppState) -> impl Iterator<Item = Step<'_>> {
    return state.sections.iter().flat_map(|section| {
        return section
            .objectives
            .iter()
            .filter(|o| return !o.is_completed)
            .map(move |objective| return Step { objective, section });
    });
}

/// The first incomplete objective in document order, or `None` when
/// everything is done (including when there are no objectives at all).
pub fn next_step(state: &AppState) -> Option<Step<'_>> {
    return incomplete_steps(state).next();
}

/// Every incomplete objective in document order.
pub fn missing_steps(state: &AppState) -> Vec<Step<'_>> {
    return incomplete_steps(state).collect();
}

/// The current heading index, empty when there is no document.
pub fn case_study_headings(state: &AppState) -> &[Heading] {
    return state
        .case_study
        .as_ref()
        .map(|cs| return cs.heading_index.as_slice())
        .unwrap_or_default();
}

/// Link rows for one objective.
pub fn objective_heading_links<'a>(
    state: &'a AppState,
    section_id: &str,
    objective_id: &str,
) -> Vec<&'a ObjectiveHeadingLink> {
    return state
        .objective_heading_links
        .iter()
        .filter(|l| return l.is_for(section_id, objective_id))
        .collect();
}

/// Headings linked to one objective, in link order. Rows whose heading is
/// not in the current index are skipped.
pub fn linked_headings_for_objective<'a>(state: &'a AppState, section_id: &str, objective_id: &str) -> Vec<&'a Heading> {
    let by_id: HashMap<&str, &Heading> = case_study_headings(state)
        .iter()
        .map(|h| return (h.id.as_str(), h))
        .collect();
    return objective_heading_links(state, section_id, objective_id)
        .into_iter()
        .filter_map(|l| return by_id.get(l.heading_id.as_str()).copied())
        .collect();
}

/// Objectives linked to one heading, in link order. Rows whose section or
/// objective no longer exists are skipped.
pub fn objectives_for_heading<'a>(state: &'a AppState, heading_id: &str) -> Vec<Step<'a>> {
    return state
        .objective_heading_links
        .iter()
        .filter(|l| return l.heading_id == heading_id)
        .filter_map(|l| {
            let section = state.section(&l.section_id)?;
            let objective = section.objective(&l.objective_id)?;
            return Some(Step { objective, section });
        })
        .collect();
}
