//! The transition function: `(state, action, now) -> state`.
//!
//! Transitions never fail. An action that names a missing entity, carries a
//! value of the wrong variant, or would change nothing returns the input
//! `Arc` itself, so callers can detect a no-op with [`Arc::ptr_eq`] and skip
//! re-rendering or re-persisting. The input is never mutated.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::action::{Action, DeliverablePatch, KindPatch, ObjectivePatch, ObjectiveValue, SectionPatch};
use crate::links;
use crate::types::{AppState, CaseStudy, Deliverable, Heading, Objective, ObjectiveKind, Section};

/// Apply one action. `now` stamps any refreshed timestamps.
pub fn reduce(state: &Arc<AppState>, action: &Action, now: DateTime<Utc>) -> Arc<AppState> {
    let next = match action {
        Action::AddDeliverable { deliverable, section_id } => add_deliverable(state, section_id, deliverable, now),
        Action::AddObjective { objective, section_id } => add_objective(state, section_id, objective, now),
        Action::AddSection(section) => add_section(state, section),
        Action::DeleteDeliverable { deliverable_id, section_id } => {
            delete_deliverable(state, section_id, deliverable_id, now)
        },
        Action::DeleteObjective { objective_id, section_id } => delete_objective(state, section_id, objective_id, now),
        Action::DeleteSection { id } => delete_section(state, id),
        Action::ImportState(imported) => import_state(state, imported),
        Action::LinkObjectiveHeadings { heading_ids, objective_id, section_id } => {
            link_objective_headings(state, section_id, objective_id, heading_ids)
        },
        Action::ReorderSections { section_ids } => reorder_sections(state, section_ids),
        Action::ResetState => reset_state(state),
        Action::ToggleDeliverableComplete { deliverable_id, section_id } => {
            edit_deliverable(state, section_id, deliverable_id, now, |d| {
                d.is_completed = !d.is_completed;
                return true;
            })
        },
        Action::ToggleObjectiveComplete { objective_id, section_id } => {
            edit_objective(state, section_id, objective_id, now, |o| {
                o.is_completed = !o.is_completed;
                return true;
            })
        },
        Action::UpdateCaseStudy { content, heading_index } => Some(update_case_study(state, content, heading_index, now)),
        Action::UpdateDeliverable { deliverable_id, patch, section_id } => {
            edit_deliverable(state, section_id, deliverable_id, now, |d| return apply_deliverable_patch(d, patch))
        },
        Action::UpdateObjective { objective_id, patch, section_id } => {
            edit_objective(state, section_id, objective_id, now, |o| return apply_objective_patch(o, patch))
        },
        Action::UpdateObjectiveValue { objective_id, section_id, value } => {
            edit_objective(state, section_id, objective_id, now, |o| return apply_objective_value(o, value))
        },
        Action::UpdateSection { id, patch } => edit_section(state, id, now, |s| return apply_section_patch(s, patch)),
    };

    return match next {
        Some(next) => Arc::new(next),
        None => {
            tracing::debug!(action = action.name(), "no-op transition");
            Arc::clone(state)
        },
    };
}

/// Next `updatedAt` for a mutated section: strictly after the previous one.
fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        return now;
    }
    return previous.checked_add_signed(TimeDelta::milliseconds(1)).unwrap_or(previous);
}

/// Run `edit` against a copy of one section. Returns `None` when the section
/// is missing or `edit` reports no change; otherwise refreshes `updatedAt`.
fn edit_section<F>(state: &AppState, section_id: &str, now: DateTime<Utc>, edit: F) -> Option<AppState>
where
    F: FnOnce(&mut Section) -> bool,
{
    let index = state.sections.iter().position(|s| return s.id == section_id)?;
    let mut section = state.sections.get(index)?.clone();
    if !edit(&mut section) {
        return None;
    }
    section.updated_at = advance(section.updated_at, now);

    let mut next = state.clone();
    *next.sections.get_mut(index)? = section;
    return Some(next);
}

/// Run `edit` against one objective; the change must leave it different.
fn edit_objective<F>(
    state: &AppState,
    section_id: &str,
    objective_id: &str,
    now: DateTime<Utc>,
    edit: F,
) -> Option<AppState>
where
    F: FnOnce(&mut Objective) -> bool,
{
    return edit_section(state, section_id, now, |section| {
        let Some(objective) = section.objectives.iter_mut().find(|o| return o.id == objective_id) else {
            return false;
        };
        let before = objective.clone();
        return edit(&mut *objective) && *objective != before;
    });
}

/// Run `edit` against one deliverable; the change must leave it different.
fn edit_deliverable<F>(
    state: &AppState,
    section_id: &str,
    deliverable_id: &str,
    now: DateTime<Utc>,
    edit: F,
) -> Option<AppState>
where
    F: FnOnce(&mut Deliverable) -> bool,
{
    return edit_section(state, section_id, now, |section| {
        let Some(deliverable) = section.deliverables.iter_mut().find(|d| return d.id == deliverable_id) else {
            return false;
        };
        let before = deliverable.clone();
        return edit(&mut *deliverable) && *deliverable != before;
    });
}

// ── Sections ──────────────────────────────────────────────────────────

/// Append a section. Ids are never reused, so a duplicate id is a no-op.
fn add_section(state: &AppState, section: &Section) -> Option<AppState> {
    if state.section(&section.id).is_some() {
        return None;
    }
    let mut next = state.clone();
    next.sections.push(section.clone());
    return Some(next);
}

/// Merge name and description. Identity and timestamps are not patchable.
fn apply_section_patch(section: &mut Section, patch: &SectionPatch) -> bool {
    let before = (section.name.clone(), section.description.clone());
    if let Some(name) = &patch.name {
        section.name.clone_from(name);
    }
    if let Some(description) = &patch.description {
        section.description.clone_from(description);
    }
    return before != (section.name.clone(), section.description.clone());
}

/// Remove a section and cascade-prune its links.
fn delete_section(state: &AppState, section_id: &str) -> Option<AppState> {
    state.section(section_id)?;
    let mut next = state.clone();
    next.sections.retain(|s| return s.id != section_id);
    next.objective_heading_links = links::without_section(&state.objective_heading_links, section_id);
    tracing::debug!(
        section = section_id,
        pruned = state.objective_heading_links.len().saturating_sub(next.objective_heading_links.len()),
        "deleted section"
    );
    return Some(next);
}

/// Named sections first, in request order, then the rest in their old order.
fn reorder_sections(state: &AppState, section_ids: &[String]) -> Option<AppState> {
    let mut picked: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<Section> = Vec::with_capacity(state.sections.len());
    for id in section_ids {
        if picked.contains(id.as_str()) {
            continue;
        }
        if let Some(section) = state.section(id) {
            picked.insert(id.as_str());
            ordered.push(section.clone());
        }
    }
    ordered.extend(state.sections.iter().filter(|s| return !picked.contains(s.id.as_str())).cloned());

    let unchanged = ordered.iter().map(|s| return &s.id).eq(state.sections.iter().map(|s| return &s.id));
    if unchanged {
        return None;
    }
    let mut next = state.clone();
    next.sections = ordered;
    return Some(next);
}

// ── Objectives ────────────────────────────────────────────────────────

/// Append an objective; a duplicate id within the section is a no-op.
fn add_objective(state: &AppState, section_id: &str, objective: &Objective, now: DateTime<Utc>) -> Option<AppState> {
    if !kind_valid(&objective.kind) {
        return None;
    }
    return edit_section(state, section_id, now, |section| {
        if section.objective(&objective.id).is_some() {
            return false;
        }
        section.objectives.push(objective.clone());
        return true;
    });
}

/// Remove an objective and cascade-prune its links.
fn delete_objective(state: &AppState, section_id: &str, objective_id: &str, now: DateTime<Utc>) -> Option<AppState> {
    let mut next = edit_section(state, section_id, now, |section| {
        let before = section.objectives.len();
        section.objectives.retain(|o| return o.id != objective_id);
        return section.objectives.len() != before;
    })?;
    next.objective_heading_links = links::without_objective(&state.objective_heading_links, section_id, objective_id);
    return Some(next);
}

/// Merge a patch. A variant patch naming a different variant rejects the
/// whole patch, as does one that would break the variant's own constraints.
fn apply_objective_patch(objective: &mut Objective, patch: &ObjectivePatch) -> bool {
    let mut kind = objective.kind.clone();
    if let Some(kind_patch) = &patch.kind
        && !apply_kind_patch(&mut kind, kind_patch)
    {
        return false;
    }

    objective.kind = kind;
    if let Some(title) = &patch.title {
        objective.title.clone_from(title);
    }
    if let Some(description) = &patch.description {
        objective.description.clone_from(description);
    }
    if let Some(done) = patch.is_completed {
        objective.is_completed = done;
    }
    return true;
}

/// Apply variant settings; `false` on a variant mismatch or invalid settings.
fn apply_kind_patch(kind: &mut ObjectiveKind, patch: &KindPatch) -> bool {
    match (kind, patch) {
        (ObjectiveKind::Checklist { items }, KindPatch::Checklist { items: new_items }) => {
            if let Some(new_items) = new_items {
                items.clone_from(new_items);
            }
            return true;
        },
        (ObjectiveKind::Number { max, min, step, value }, KindPatch::Number { max: new_max, min: new_min, step: new_step }) => {
            let max_next = new_max.unwrap_or(*max);
            let min_next = new_min.unwrap_or(*min);
            let step_next = new_step.unwrap_or(*step);
            if !number_settings_valid(min_next, max_next, step_next) {
                return false;
            }
            if value.is_some_and(|v| return !within_bounds(v, min_next, max_next)) {
                return false;
            }
            (*max, *min, *step) = (max_next, min_next, step_next);
            return true;
        },
        (ObjectiveKind::Text { max_length, value }, KindPatch::Text { max_length: new_max }) => {
            let limit = new_max.unwrap_or(*max_length);
            if !fits_length(value.as_deref(), limit) {
                return false;
            }
            *max_length = limit;
            return true;
        },
        _ => return false,
    }
}

/// Set an answer. The value's variant must match the objective's.
fn apply_objective_value(objective: &mut Objective, value: &ObjectiveValue) -> bool {
    match (&mut objective.kind, value) {
        (ObjectiveKind::Checklist { items }, ObjectiveValue::Checklist(new_items)) => {
            items.clone_from(new_items);
            return true;
        },
        (ObjectiveKind::Number { max, min, value: current, .. }, ObjectiveValue::Number(n)) => {
            if !n.is_finite() || !within_bounds(*n, *min, *max) {
                return false;
            }
            *current = Some(*n);
            return true;
        },
        (ObjectiveKind::Text { max_length, value: current }, ObjectiveValue::Text(text)) => {
            if !fits_length(Some(text.as_str()), *max_length) {
                return false;
            }
            *current = Some(text.clone());
            return true;
        },
        _ => return false,
    }
}

/// Whether a new objective's settings and answer satisfy its variant.
fn kind_valid(kind: &ObjectiveKind) -> bool {
    return match kind {
        ObjectiveKind::Checklist { .. } => true,
        ObjectiveKind::Number { max, min, step, value } => {
            number_settings_valid(*min, *max, *step)
                && value.is_none_or(|v| return v.is_finite() && within_bounds(v, *min, *max))
        },
        ObjectiveKind::Text { max_length, value } => fits_length(value.as_deref(), *max_length),
    };
}

/// Whether a text value respects an optional character limit.
fn fits_length(value: Option<&str>, max_length: Option<usize>) -> bool {
    return match (value, max_length) {
        (Some(text), Some(limit)) => text.chars().count() <= limit,
        _ => true,
    };
}

/// Whether `value` lies inside the optional inclusive bounds.
fn within_bounds(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    return min.is_none_or(|lo| return value >= lo) && max.is_none_or(|hi| return value <= hi);
}

/// Finite bounds with `min <= max`, and a finite positive step.
fn number_settings_valid(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> bool {
    let finite = [min, max].into_iter().flatten().all(f64::is_finite);
    let ordered = match (min, max) {
        (Some(lo), Some(hi)) => lo <= hi,
        _ => true,
    };
    let step_ok = step.is_none_or(|s| return s.is_finite() && s > 0.0);
    return finite && ordered && step_ok;
}

// ── Deliverables ──────────────────────────────────────────────────────

/// Append a deliverable; a duplicate id within the section is a no-op.
fn add_deliverable(
    state: &AppState,
    section_id: &str,
    deliverable: &Deliverable,
    now: DateTime<Utc>,
) -> Option<AppState> {
    return edit_section(state, section_id, now, |section| {
        if section.deliverable(&deliverable.id).is_some() {
            return false;
        }
        section.deliverables.push(deliverable.clone());
        return true;
    });
}

/// Remove a deliverable.
fn delete_deliverable(state: &AppState, section_id: &str, deliverable_id: &str, now: DateTime<Utc>) -> Option<AppState> {
    return edit_section(state, section_id, now, |section| {
        let before = section.deliverables.len();
        section.deliverables.retain(|d| return d.id != deliverable_id);
        return section.deliverables.len() != before;
    });
}

/// Merge label, note, and completion flag.
fn apply_deliverable_patch(deliverable: &mut Deliverable, patch: &DeliverablePatch) -> bool {
    if let Some(label) = &patch.label {
        deliverable.label.clone_from(label);
    }
    if let Some(note) = &patch.note {
        deliverable.note.clone_from(note);
    }
    if let Some(done) = patch.is_completed {
        deliverable.is_completed = done;
    }
    return true;
}

// ── Document and links ────────────────────────────────────────────────

/// Replace the case study wholesale and drop links to vanished headings.
fn update_case_study(state: &AppState, content: &str, heading_index: &[Heading], now: DateTime<Utc>) -> AppState {
    let mut next = state.clone();
    next.objective_heading_links = links::retained_by_index(&state.objective_heading_links, heading_index);
    next.case_study = Some(CaseStudy {
        content: content.to_string(),
        heading_index: heading_index.to_vec(),
        updated_at: now,
    });

    let pruned = state.objective_heading_links.len().saturating_sub(next.objective_heading_links.len());
    if pruned > 0 {
        tracing::debug!(pruned, "pruned links to removed headings");
    }
    return next;
}

/// Replace one objective's link set. The objective must exist; heading ids
/// not in the current index are dropped so no dangling row is ever written.
fn link_objective_headings(
    state: &AppState,
    section_id: &str,
    objective_id: &str,
    heading_ids: &[String],
) -> Option<AppState> {
    state.objective(section_id, objective_id)?;
    let present: HashSet<&str> = state
        .case_study
        .iter()
        .flat_map(|cs| return cs.heading_index.iter().map(|h| return h.id.as_str()))
        .collect();

    let rows = links::replace_for_objective(&state.objective_heading_links, section_id, objective_id, heading_ids, &present);
    if rows == state.objective_heading_links {
        return None;
    }
    let mut next = state.clone();
    next.objective_heading_links = rows;
    return Some(next);
}

// ── Whole-state ───────────────────────────────────────────────────────

/// Take an imported state, dropping any link that breaks the invariants.
/// Importing a value equal to the current state is a no-op.
fn import_state(state: &AppState, imported: &AppState) -> Option<AppState> {
    let mut next = imported.clone();
    next.objective_heading_links = links::consistent_with(imported);
    let dropped = imported.objective_heading_links.len().saturating_sub(next.objective_heading_links.len());
    if dropped > 0 {
        tracing::warn!(dropped, "imported state carried dangling links");
    }
    if *state == next {
        return None;
    }
    return Some(next);
}

/// Back to the empty state, unless already there.
fn reset_state(state: &AppState) -> Option<AppState> {
    if *state == AppState::default() {
        return None;
    }
    return Some(AppState::default());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::types::{ChecklistItem, ObjectiveHeadingLink};

    fn t0() -> DateTime<Utc> {
        return Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    }

    fn heading(id: &str) -> Heading {
        return Heading {
            id: id.to_string(),
            level: 1,
            line: 0,
            text: id.to_string(),
        };
    }

    fn fixture() -> Arc<AppState> {
        let mut section = Section::new("sec1", "Research", t0());
        section.objectives.push(Objective::new("obj1", "Summary", ObjectiveKind::text(Some(5))));
        section.objectives.push(Objective::new("obj2", "Count", ObjectiveKind::number(Some(0.0), Some(10.0), None)));
        section.objectives.push(Objective::new("obj3", "Steps", ObjectiveKind::checklist(Vec::new())));
        section.deliverables.push(Deliverable {
            id: "del1".to_string(),
            is_completed: false,
            label: "Report".to_string(),
            note: None,
        });
        let state = AppState {
            case_study: Some(CaseStudy {
                content: "# A {#h1}\n# B {#h2}".to_string(),
                heading_index: vec![heading("h1"), heading("h2")],
                updated_at: t0(),
            }),
            objective_heading_links: vec![ObjectiveHeadingLink {
                heading_id: "h1".to_string(),
                objective_id: "obj1".to_string(),
                section_id: "sec1".to_string(),
            }],
            sections: vec![section, Section::new("sec2", "Design", t0())],
            ..AppState::default()
        };
        return Arc::new(state);
    }

    fn value(section: &str, objective: &str, value: ObjectiveValue) -> Action {
        return Action::UpdateObjectiveValue {
            objective_id: objective.to_string(),
            section_id: section.to_string(),
            value,
        };
    }

    #[test]
    fn unknown_targets_return_the_same_arc() {
        let state = fixture();
        let actions = [
            Action::DeleteSection { id: "nope".to_string() },
            Action::ToggleObjectiveComplete { objective_id: "nope".to_string(), section_id: "sec1".to_string() },
            Action::DeleteDeliverable { deliverable_id: "nope".to_string(), section_id: "sec1".to_string() },
            Action::UpdateSection { id: "nope".to_string(), patch: SectionPatch::default() },
            Action::LinkObjectiveHeadings {
                heading_ids: vec!["h1".to_string()],
                objective_id: "nope".to_string(),
                section_id: "sec1".to_string(),
            },
        ];
        for action in &actions {
            let next = reduce(&state, action, t0());
            assert!(Arc::ptr_eq(&state, &next), "{} was not a no-op", action.name());
        }
    }

    #[test]
    fn value_type_mismatch_is_noop() {
        let state = fixture();
        let next = reduce(&state, &value("sec1", "obj1", ObjectiveValue::Number(3.0)), t0());
        assert!(Arc::ptr_eq(&state, &next));
        let next = reduce(&state, &value("sec1", "obj2", ObjectiveValue::Text("3".to_string())), t0());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn text_value_respects_max_length() {
        let state = fixture();
        let too_long = reduce(&state, &value("sec1", "obj1", ObjectiveValue::Text("abcdef".to_string())), t0());
        assert!(Arc::ptr_eq(&state, &too_long));

        let ok = reduce(&state, &value("sec1", "obj1", ObjectiveValue::Text("abc".to_string())), t0());
        assert_eq!(
            ok.sections[0].objectives[0].kind,
            ObjectiveKind::Text { max_length: Some(5), value: Some("abc".to_string()) }
        );
    }

    #[test]
    fn number_value_respects_bounds() {
        let state = fixture();
        let out = reduce(&state, &value("sec1", "obj2", ObjectiveValue::Number(11.0)), t0());
        assert!(Arc::ptr_eq(&state, &out));
        let nan = reduce(&state, &value("sec1", "obj2", ObjectiveValue::Number(f64::NAN)), t0());
        assert!(Arc::ptr_eq(&state, &nan));
        let ok = reduce(&state, &value("sec1", "obj2", ObjectiveValue::Number(10.0)), t0());
        assert!(!Arc::ptr_eq(&state, &ok));
    }

    #[test]
    fn checklist_value_replaces_items() {
        let state = fixture();
        let items = vec![ChecklistItem { done: true, id: "i1".to_string(), label: "Interview".to_string() }];
        let next = reduce(&state, &value("sec1", "obj3", ObjectiveValue::Checklist(items.clone())), t0());
        assert_eq!(next.sections[0].objectives[2].kind, ObjectiveKind::Checklist { items });
    }

    #[test]
    fn objective_patch_cannot_change_variant() {
        let state = fixture();
        let patch = ObjectivePatch {
            kind: Some(KindPatch::Number { max: None, min: None, step: Some(Some(2.0)) }),
            title: Some("Renamed".to_string()),
            ..ObjectivePatch::default()
        };
        let action = Action::UpdateObjective {
            objective_id: "obj1".to_string(),
            patch,
            section_id: "sec1".to_string(),
        };
        assert!(Arc::ptr_eq(&state, &reduce(&state, &action, t0())));
    }

    #[test]
    fn objective_patch_merges_same_variant_settings() {
        let state = fixture();
        let patch = ObjectivePatch {
            kind: Some(KindPatch::Number { max: Some(None), min: None, step: Some(Some(0.5)) }),
            title: Some("Participants".to_string()),
            ..ObjectivePatch::default()
        };
        let action = Action::UpdateObjective {
            objective_id: "obj2".to_string(),
            patch,
            section_id: "sec1".to_string(),
        };
        let next = reduce(&state, &action, t0());
        let objective = &next.sections[0].objectives[1];
        assert_eq!(objective.title, "Participants");
        assert_eq!(objective.kind, ObjectiveKind::number(Some(0.0), None, Some(0.5)));
    }

    #[test]
    fn updated_at_strictly_increases_within_one_tick() {
        let state = fixture();
        let toggle = Action::ToggleObjectiveComplete {
            objective_id: "obj1".to_string(),
            section_id: "sec1".to_string(),
        };
        let once = reduce(&state, &toggle, t0());
        let twice = reduce(&once, &toggle, t0());
        assert!(once.sections[0].updated_at > state.sections[0].updated_at);
        assert!(twice.sections[0].updated_at > once.sections[0].updated_at);
    }

    #[test]
    fn deleting_objective_prunes_its_links() {
        let state = fixture();
        let action = Action::DeleteObjective {
            objective_id: "obj1".to_string(),
            section_id: "sec1".to_string(),
        };
        let next = reduce(&state, &action, t0());
        assert!(next.objective_heading_links.is_empty());
        assert_eq!(next.sections[0].objectives.len(), 2);
    }

    #[test]
    fn deleting_section_prunes_its_links() {
        let state = fixture();
        let next = reduce(&state, &Action::DeleteSection { id: "sec1".to_string() }, t0());
        assert!(next.objective_heading_links.is_empty());
        assert_eq!(next.sections.len(), 1);
    }

    #[test]
    fn document_update_prunes_links_to_removed_headings() {
        let state = fixture();
        let action = Action::UpdateCaseStudy {
            content: "# B {#h2}".to_string(),
            heading_index: vec![heading("h2")],
        };
        let next = reduce(&state, &action, t0());
        assert!(next.objective_heading_links.is_empty());
        assert_eq!(next.case_study.as_ref().map(|cs| cs.content.as_str()), Some("# B {#h2}"));
    }

    #[test]
    fn link_set_replaces_previous_rows() {
        let state = fixture();
        let action = Action::LinkObjectiveHeadings {
            heading_ids: vec!["h2".to_string(), "ghost".to_string()],
            objective_id: "obj1".to_string(),
            section_id: "sec1".to_string(),
        };
        let next = reduce(&state, &action, t0());
        assert_eq!(next.objective_heading_links.len(), 1);
        assert_eq!(next.objective_heading_links[0].heading_id, "h2");

        let clear = Action::LinkObjectiveHeadings {
            heading_ids: Vec::new(),
            objective_id: "obj1".to_string(),
            section_id: "sec1".to_string(),
        };
        assert!(reduce(&next, &clear, t0()).objective_heading_links.is_empty());
    }

    #[test]
    fn reorder_moves_named_sections_to_front() {
        let mut state = (*fixture()).clone();
        state.sections.push(Section::new("sec3", "Test", t0()));
        let state = Arc::new(state);
        let action = Action::ReorderSections {
            section_ids: vec!["sec3".to_string(), "missing".to_string(), "sec2".to_string()],
        };
        let next = reduce(&state, &action, t0());
        let order: Vec<&str> = next.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["sec3", "sec2", "sec1"]);

        let same = Action::ReorderSections { section_ids: vec!["sec3".to_string()] };
        assert!(Arc::ptr_eq(&next, &reduce(&next, &same, t0())));
    }

    #[test]
    fn add_section_with_existing_id_is_noop() {
        let state = fixture();
        let next = reduce(&state, &Action::AddSection(Section::new("sec1", "Again", t0())), t0());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn import_drops_dangling_links() {
        let mut imported = (*fixture()).clone();
        imported.objective_heading_links.push(ObjectiveHeadingLink {
            heading_id: "gone".to_string(),
            objective_id: "obj1".to_string(),
            section_id: "sec1".to_string(),
        });
        let next = reduce(&Arc::new(AppState::default()), &Action::ImportState(imported), t0());
        assert_eq!(next.objective_heading_links.len(), 1);
    }

    #[test]
    fn reimporting_the_current_state_is_noop() {
        let state = fixture();
        let next = reduce(&state, &Action::ImportState((*state).clone()), t0());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn add_objective_rejects_settings_an_import_would_refuse() {
        let state = fixture();
        let candidates = [
            ObjectiveKind::number(None, None, Some(0.0)),
            ObjectiveKind::number(Some(f64::NAN), None, None),
            ObjectiveKind::number(None, Some(f64::INFINITY), None),
            ObjectiveKind::number(Some(5.0), Some(1.0), None),
            ObjectiveKind::Number { max: Some(10.0), min: Some(0.0), step: None, value: Some(11.0) },
            ObjectiveKind::Text { max_length: Some(3), value: Some("four".to_string()) },
        ];
        for kind in candidates {
            let action = Action::AddObjective {
                objective: Objective::new("bad", "Budget", kind),
                section_id: "sec1".to_string(),
            };
            assert!(Arc::ptr_eq(&state, &reduce(&state, &action, t0())));
        }

        let action = Action::AddObjective {
            objective: Objective::new("ok", "Budget", ObjectiveKind::number(Some(0.0), Some(10.0), Some(0.5))),
            section_id: "sec1".to_string(),
        };
        let next = reduce(&state, &action, t0());
        assert!(next.objective("sec1", "ok").is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let next = reduce(&fixture(), &Action::ResetState, t0());
        assert_eq!(*next, AppState::default());
        assert!(Arc::ptr_eq(&next, &reduce(&next, &Action::ResetState, t0())));
    }
}
