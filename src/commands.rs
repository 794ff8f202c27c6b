//! CLI command handlers: each loads nothing itself, works through the
//! session's store, and prints its result to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;

use casebook::action::{
    self, Action, DeliverablePatch, KindPatch, ObjectivePatch, ObjectiveValue, SectionPatch,
};
use casebook::config::Config;
use casebook::error::Error;
use casebook::ids::generate_id;
use casebook::persistence;
use casebook::selectors::{self, Step};
use casebook::store::Store;
use casebook::templates::Template;
use casebook::types::{AppState, ChecklistItem, Deliverable, Heading, Objective, ObjectiveKind, Section};

/// Loaded config plus the store hydrated from it. Every command runs
/// against exactly one session.
pub struct Session {
    /// Resolved project configuration.
    pub config: Config,
    /// Owner of the current state.
    pub store: Store,
}

impl Session {
    /// Load config and hydrate the store from the configured state file.
    ///
    /// # Errors
    ///
    /// Returns config loading errors. Unreadable or invalid stored state is
    /// logged and replaced by the empty state instead.
    pub fn open(config_path: Option<&Path>) -> Result<Self, Error> {
        let config = match config_path {
            Some(path) => Config::load_file(path)?,
            None => Config::load(Path::new("."))?,
        };
        let initial = persistence::hydrate(&config.state).unwrap_or_default();
        tracing::debug!(
            state = %config.state.display(),
            sections = initial.sections.len(),
            "hydrated"
        );

        let mut store = Store::new(initial);
        store.subscribe(|state| {
            tracing::info!(
                sections = state.sections.len(),
                links = state.objective_heading_links.len(),
                "state updated"
            );
        });
        return Ok(Self { config, store });
    }

    /// Dispatch `action` and persist the result if it changed anything.
    ///
    /// # Errors
    ///
    /// Returns persistence errors.
    pub fn apply(&mut self, action: &Action) -> Result<bool, Error> {
        let changed = self.store.dispatch(action);
        if changed {
            self.save()?;
        } else {
            tracing::info!(action = action.name(), "no change");
        }
        return Ok(changed);
    }

    /// Write the current state if it is worth writing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Json` from the write.
    fn save(&self) -> Result<(), Error> {
        let state = self.store.state();
        if persistence::should_persist(&self.config.state, state) {
            persistence::persist(&self.config.state, state)?;
        }
        return Ok(());
    }

    /// The current state.
    fn state(&self) -> &AppState {
        return self.store.state();
    }
}

/// Payload of a new objective as chosen on the command line.
pub enum NewKind {
    /// Checklist with these item labels.
    Checklist(Vec<String>),
    /// Number with these settings.
    Number {
        /// Upper bound.
        max: Option<f64>,
        /// Lower bound.
        min: Option<f64>,
        /// Input increment.
        step: Option<f64>,
    },
    /// Text with an optional length limit.
    Text {
        /// Maximum answer length.
        max_length: Option<usize>,
    },
}

/// Objective edits as given on the command line. Type settings are checked
/// against the objective's own type before a patch is built.
pub struct ObjectiveEdit {
    /// Checklist labels to append.
    pub add_items: Vec<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New number upper bound.
    pub max: Option<f64>,
    /// New text length limit.
    pub max_length: Option<usize>,
    /// New number lower bound.
    pub min: Option<f64>,
    /// New number increment.
    pub step: Option<f64>,
    /// New title.
    pub title: Option<String>,
}

/// Find a section by exact id, then by case-insensitive name.
///
/// # Errors
///
/// Returns `Error::UnknownSection` if neither matches.
fn resolve_section<'a>(state: &'a AppState, key: &str) -> Result<&'a Section, Error> {
    return state
        .section(key)
        .or_else(|| return state.sections.iter().find(|s| return s.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| return Error::UnknownSection { section: key.to_string() });
}

/// Find an objective by exact id, then by case-insensitive title.
///
/// # Errors
///
/// Returns `Error::UnknownSection` or `Error::UnknownObjective`.
fn resolve_objective<'a>(state: &'a AppState, section: &str, key: &str) -> Result<Step<'a>, Error> {
    let section = resolve_section(state, section)?;
    let objective = section
        .objective(key)
        .or_else(|| return section.objectives.iter().find(|o| return o.title.eq_ignore_ascii_case(key)))
        .ok_or_else(|| {
            return Error::UnknownObjective {
                objective: key.to_string(),
                section: section.name.clone(),
            };
        })?;
    return Ok(Step { objective, section });
}

/// Find a deliverable by exact id, then by case-insensitive label.
/// Returns the owning section id and the deliverable.
///
/// # Errors
///
/// Returns `Error::UnknownSection` or `Error::UnknownDeliverable`.
fn resolve_deliverable<'a>(state: &'a AppState, section: &str, key: &str) -> Result<(&'a str, &'a Deliverable), Error> {
    let section = resolve_section(state, section)?;
    let deliverable = section
        .deliverable(key)
        .or_else(|| return section.deliverables.iter().find(|d| return d.label.eq_ignore_ascii_case(key)))
        .ok_or_else(|| {
            return Error::UnknownDeliverable {
                deliverable: key.to_string(),
                section: section.name.clone(),
            };
        })?;
    return Ok((section.id.as_str(), deliverable));
}

/// Find a heading in the current index by exact id, then by case-insensitive text.
fn resolve_heading<'a>(state: &'a AppState, key: &str) -> Option<&'a Heading> {
    let headings = selectors::case_study_headings(state);
    return headings
        .iter()
        .find(|h| return h.id == key)
        .or_else(|| return headings.iter().find(|h| return h.text.eq_ignore_ascii_case(key)));
}

/// Owned (section id, objective id) pair for dispatching.
///
/// # Errors
///
/// See [`resolve_objective`].
fn objective_ids(state: &AppState, section: &str, objective: &str) -> Result<(String, String), Error> {
    let step = resolve_objective(state, section, objective)?;
    return Ok((step.section.id.clone(), step.objective.id.clone()));
}

/// Build an `InvalidValue` error for one objective.
fn invalid_value(objective: &Objective, value: &str, reason: &str) -> Error {
    return Error::InvalidValue {
        objective: objective.title.clone(),
        reason: reason.to_string(),
        value: value.to_string(),
    };
}

/// Fresh unticked checklist items for the given labels.
fn checklist_items(labels: &[String]) -> Vec<ChecklistItem> {
    return labels
        .iter()
        .map(|label| {
            return ChecklistItem {
                done: false,
                id: generate_id(),
                label: label.clone(),
            };
        })
        .collect();
}

/// Apply a starter template to an empty case study.
///
/// # Errors
///
/// Returns `Error::UnknownTemplate` or persistence errors.
pub fn init(session: &mut Session, template: &str) -> Result<ExitCode, Error> {
    let template: Template = template.parse()?;
    let existing = session.state().sections.len();
    if existing > 0 {
        eprintln!("casebook already has {existing} sections; run `casebook reset` first to start over");
        return Ok(ExitCode::FAILURE);
    }

    let sections = template.sections(Utc::now());
    let count = sections.len();
    for section in sections {
        session.apply(&Action::AddSection(section))?;
    }
    println!("Initialised case study with {count} sections");
    return Ok(ExitCode::SUCCESS);
}

/// Print overall progress, then every section with its objectives and deliverables.
pub fn status(session: &Session) {
    let state = session.state();
    let overall = selectors::progress(state);
    let done = overall.completed_objectives.saturating_add(overall.completed_deliverables);
    let total = overall.total_objectives.saturating_add(overall.total_deliverables);
    println!(
        "{done}/{total} complete ({:.0}%) across {} sections",
        overall.overall_progress, overall.total_sections
    );

    for section in &state.sections {
        let p = selectors::section_progress(section);
        println!();
        println!("{} {{#{}}}  {:.0}%", section.name, section.id, p.progress);
        for objective in &section.objectives {
            let mark = if objective.is_completed { "x" } else { " " };
            println!(
                "  [{mark}] {} ({}) {{#{}}}",
                objective.title,
                objective.kind.type_tag(),
                objective.id
            );
        }
        for deliverable in &section.deliverables {
            let mark = if deliverable.is_completed { "x" } else { " " };
            println!("  deliverable [{mark}] {} {{#{}}}", deliverable.label, deliverable.id);
        }
    }
}

/// Print the next incomplete objective, or all of them.
pub fn next(session: &Session, all: bool) {
    let state = session.state();
    let steps = if all {
        selectors::missing_steps(state)
    } else {
        selectors::next_step(state).into_iter().collect()
    };
    if steps.is_empty() {
        println!("All objectives complete");
        return;
    }
    for step in steps {
        println!("{}: {} {{#{}}}", step.section.name, step.objective.title, step.objective.id);
    }
}

/// # Errors
///
/// Returns persistence errors.
pub fn section_add(session: &mut Session, name: &str, description: Option<String>) -> Result<(), Error> {
    let mut section = Section::new(generate_id(), name, Utc::now());
    section.description = description;
    let id = section.id.clone();
    session.apply(&Action::AddSection(section))?;
    println!("Added section {name} {{#{id}}}");
    return Ok(());
}

/// # Errors
///
/// Returns `Error::UnknownSection` or persistence errors.
pub fn section_update(
    session: &mut Session,
    section: &str,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<(), Error> {
    let id = resolve_section(session.state(), section)?.id.clone();
    let changed = session.apply(&Action::UpdateSection {
        id,
        patch: SectionPatch { description, name },
    })?;
    println!("{}", if changed { "Section updated" } else { "Section unchanged" });
    return Ok(());
}

/// # Errors
///
/// Returns `Error::UnknownSection` or persistence errors.
pub fn section_delete(session: &mut Session, section: &str) -> Result<(), Error> {
    let target = resolve_section(session.state(), section)?;
    let (id, name) = (target.id.clone(), target.name.clone());
    session.apply(&Action::DeleteSection { id })?;
    println!("Deleted section {name}");
    return Ok(());
}

/// # Errors
///
/// Returns `Error::UnknownSection` for any unresolvable name, or persistence errors.
pub fn section_move(session: &mut Session, sections: &[String]) -> Result<(), Error> {
    let section_ids = sections
        .iter()
        .map(|key| return resolve_section(session.state(), key).map(|s| return s.id.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    session.apply(&Action::ReorderSections { section_ids })?;
    for section in &session.state().sections {
        println!("{}", section.name);
    }
    return Ok(());
}

/// # Errors
///
/// Returns `Error::UnknownSection`, `Error::InvalidValue` for bad number
/// settings, or persistence errors.
pub fn objective_add(
    session: &mut Session,
    section: &str,
    title: &str,
    description: Option<String>,
    kind: NewKind,
) -> Result<(), Error> {
    let section_id = resolve_section(session.state(), section)?.id.clone();
    let kind = match kind {
        NewKind::Checklist(labels) => ObjectiveKind::checklist(checklist_items(&labels)),
        NewKind::Number { max, min, step } => {
            if let Some(bound) = [min, max, step].into_iter().flatten().find(|n| return !n.is_finite()) {
                return Err(Error::InvalidValue {
                    objective: title.to_string(),
                    reason: "bounds and step must be finite numbers".to_string(),
                    value: bound.to_string(),
                });
            }
            if let Some(s) = step
                && s <= 0.0
            {
                return Err(Error::InvalidValue {
                    objective: title.to_string(),
                    reason: "step must be positive".to_string(),
                    value: s.to_string(),
                });
            }
            if let (Some(lo), Some(hi)) = (min, max)
                && lo > hi
            {
                return Err(Error::InvalidValue {
                    objective: title.to_string(),
                    reason: "min is greater than max".to_string(),
                    value: format!("{lo}..{hi}"),
                });
            }
            ObjectiveKind::number(min, max, step)
        },
        NewKind::Text { max_length } => ObjectiveKind::text(max_length),
    };
    let mut objective = Objective::new(generate_id(), title, kind);
    objective.description = description;
    let id = objective.id.clone();
    if !session.apply(&Action::AddObjective { objective, section_id })? {
        return Err(Error::InvalidValue {
            objective: title.to_string(),
            reason: "the type settings were rejected".to_string(),
            value: "settings".to_string(),
        });
    }
    println!("Added objective {title} {{#{id}}}");
    return Ok(());
}

/// Build the type-settings part of an objective patch, refusing settings
/// that belong to another objective type.
///
/// # Errors
///
/// Returns `Error::InvalidValue` when a flag does not fit the objective's type.
fn kind_patch(objective: &Objective, edit: &ObjectiveEdit) -> Result<Option<KindPatch>, Error> {
    let number_flags = edit.min.is_some() || edit.max.is_some() || edit.step.is_some();
    let text_flags = edit.max_length.is_some();
    let checklist_flags = !edit.add_items.is_empty();
    let refuse = |flag: &str| -> Result<Option<KindPatch>, Error> {
        return Err(invalid_value(
            objective,
            flag,
            &format!("not a setting of {} objectives", objective.kind.type_tag()),
        ));
    };

    return match &objective.kind {
        ObjectiveKind::Checklist { items } => {
            if number_flags || text_flags {
                return refuse(if text_flags { "--max-length" } else { "--min/--max/--step" });
            }
            if !checklist_flags {
                return Ok(None);
            }
            let mut items = items.clone();
            items.extend(checklist_items(&edit.add_items));
            Ok(Some(KindPatch::Checklist { items: Some(items) }))
        },
        ObjectiveKind::Number { .. } => {
            if text_flags || checklist_flags {
                return refuse(if text_flags { "--max-length" } else { "--add-item" });
            }
            if !number_flags {
                return Ok(None);
            }
            Ok(Some(KindPatch::Number {
                max: edit.max.map(Some),
                min: edit.min.map(Some),
                step: edit.step.map(Some),
            }))
        },
        ObjectiveKind::Text { .. } => {
            if number_flags || checklist_flags {
                return refuse(if number_flags { "--min/--max/--step" } else { "--add-item" });
            }
            Ok(edit.max_length.map(|limit| return KindPatch::Text { max_length: Some(Some(limit)) }))
        },
    };
}

/// # Errors
///
/// Returns id-resolution errors, `Error::InvalidValue` for flags of another
/// objective type or settings the objective refuses, or persistence errors.
pub fn objective_update(session: &mut Session, section: &str, objective: &str, edit: ObjectiveEdit) -> Result<(), Error> {
    let step = resolve_objective(session.state(), section, objective)?;
    let kind = kind_patch(step.objective, &edit)?;
    let wants_settings = kind.is_some();
    let (section_id, objective_id) = (step.section.id.clone(), step.objective.id.clone());
    let before = step.objective.clone();

    let patch = ObjectivePatch {
        description: edit.description,
        is_completed: None,
        kind,
        title: edit.title,
    };
    let changed = session.apply(&Action::UpdateObjective {
        objective_id,
        patch,
        section_id,
    })?;
    if !changed && wants_settings {
        return Err(invalid_value(
            &before,
            "settings",
            "bounds must be finite with min <= max, step positive, and any current answer must still fit",
        ));
    }
    println!("{}", if changed { "Objective updated" } else { "Objective unchanged" });
    return Ok(());
}

/// Whether the objective now holds exactly `value`.
fn holds(kind: &ObjectiveKind, value: &ObjectiveValue) -> bool {
    return match (kind, value) {
        (ObjectiveKind::Number { value: Some(stored), .. }, ObjectiveValue::Number(wanted)) => {
            stored.total_cmp(wanted).is_eq()
        },
        (ObjectiveKind::Text { value: Some(stored), .. }, ObjectiveValue::Text(wanted)) => stored == wanted,
        (ObjectiveKind::Checklist { items }, ObjectiveValue::Checklist(wanted)) => items == wanted,
        _ => false,
    };
}

/// Answer a text or number objective.
///
/// # Errors
///
/// Returns id-resolution errors, `Error::InvalidValue` when the answer does
/// not parse or fit the objective, or persistence errors.
pub fn objective_set(session: &mut Session, section: &str, objective: &str, raw: &str) -> Result<(), Error> {
    let step = resolve_objective(session.state(), section, objective)?;
    let value = match &step.objective.kind {
        ObjectiveKind::Checklist { .. } => {
            return Err(invalid_value(
                step.objective,
                raw,
                "checklist objectives are answered with `casebook objective check`",
            ));
        },
        ObjectiveKind::Number { .. } => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| return v.is_finite())
            .map(ObjectiveValue::Number)
            .ok_or_else(|| return invalid_value(step.objective, raw, "not a finite number"))?,
        ObjectiveKind::Text { .. } => ObjectiveValue::Text(raw.to_string()),
    };
    let (section_id, objective_id) = (step.section.id.clone(), step.objective.id.clone());
    let before = step.objective.clone();

    session.apply(&Action::UpdateObjectiveValue {
        objective_id: objective_id.clone(),
        section_id: section_id.clone(),
        value: value.clone(),
    })?;
    let stored = session
        .state()
        .objective(&section_id, &objective_id)
        .is_some_and(|o| return holds(&o.kind, &value));
    if !stored {
        return Err(invalid_value(&before, raw, "outside the objective's limits"));
    }
    println!("{}: {raw}", before.title);
    return Ok(());
}

/// Flip one checklist item.
///
/// # Errors
///
/// Returns id-resolution errors, `Error::InvalidValue` when the objective is
/// not a checklist or has no such item, or persistence errors.
pub fn objective_check(session: &mut Session, section: &str, objective: &str, item: &str) -> Result<(), Error> {
    let step = resolve_objective(session.state(), section, objective)?;
    let ObjectiveKind::Checklist { items } = &step.objective.kind else {
        return Err(invalid_value(step.objective, item, "only checklist objectives have items"));
    };
    let position = items
        .iter()
        .position(|i| return i.id == item)
        .or_else(|| return items.iter().position(|i| return i.label.eq_ignore_ascii_case(item)))
        .ok_or_else(|| return invalid_value(step.objective, item, "no such checklist item"))?;

    let mut updated = items.clone();
    let (label, done) = match updated.get_mut(position) {
        Some(entry) => {
            entry.done = !entry.done;
            (entry.label.clone(), entry.done)
        },
        None => return Ok(()),
    };
    let (section_id, objective_id) = (step.section.id.clone(), step.objective.id.clone());
    session.apply(&Action::UpdateObjectiveValue {
        objective_id,
        section_id,
        value: ObjectiveValue::Checklist(updated),
    })?;
    println!("[{}] {label}", if done { "x" } else { " " });
    return Ok(());
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
pub fn objective_toggle(session: &mut Session, section: &str, objective: &str) -> Result<(), Error> {
    let (section_id, objective_id) = objective_ids(session.state(), section, objective)?;
    session.apply(&Action::ToggleObjectiveComplete {
        objective_id: objective_id.clone(),
        section_id: section_id.clone(),
    })?;
    if let Some(o) = session.state().objective(&section_id, &objective_id) {
        println!("{} is {}", o.title, if o.is_completed { "complete" } else { "incomplete" });
    }
    return Ok(());
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
pub fn objective_delete(session: &mut Session, section: &str, objective: &str) -> Result<(), Error> {
    let (section_id, objective_id) = objective_ids(session.state(), section, objective)?;
    session.apply(&Action::DeleteObjective { objective_id, section_id })?;
    println!("Deleted objective");
    return Ok(());
}

/// # Errors
///
/// Returns `Error::UnknownSection` or persistence errors.
pub fn deliverable_add(session: &mut Session, section: &str, label: &str, note: Option<String>) -> Result<(), Error> {
    let section_id = resolve_section(session.state(), section)?.id.clone();
    let deliverable = Deliverable {
        id: generate_id(),
        is_completed: false,
        label: label.to_string(),
        note,
    };
    let id = deliverable.id.clone();
    session.apply(&Action::AddDeliverable { deliverable, section_id })?;
    println!("Added deliverable {label} {{#{id}}}");
    return Ok(());
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
pub fn deliverable_update(
    session: &mut Session,
    section: &str,
    deliverable: &str,
    label: Option<String>,
    note: Option<Option<String>>,
) -> Result<(), Error> {
    let (section_id, target) = resolve_deliverable(session.state(), section, deliverable)?;
    let (section_id, deliverable_id) = (section_id.to_string(), target.id.clone());
    let changed = session.apply(&Action::UpdateDeliverable {
        deliverable_id,
        patch: DeliverablePatch { is_completed: None, label, note },
        section_id,
    })?;
    println!("{}", if changed { "Deliverable updated" } else { "Deliverable unchanged" });
    return Ok(());
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
pub fn deliverable_toggle(session: &mut Session, section: &str, deliverable: &str) -> Result<(), Error> {
    let (section_id, target) = resolve_deliverable(session.state(), section, deliverable)?;
    let (section_id, deliverable_id) = (section_id.to_string(), target.id.clone());
    session.apply(&Action::ToggleDeliverableComplete {
        deliverable_id: deliverable_id.clone(),
        section_id: section_id.clone(),
    })?;
    let toggled = session
        .state()
        .section(&section_id)
        .and_then(|s| return s.deliverable(&deliverable_id));
    if let Some(d) = toggled {
        println!("{} is {}", d.label, if d.is_completed { "complete" } else { "incomplete" });
    }
    return Ok(());
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
pub fn deliverable_delete(session: &mut Session, section: &str, deliverable: &str) -> Result<(), Error> {
    let (section_id, target) = resolve_deliverable(session.state(), section, deliverable)?;
    let (section_id, deliverable_id) = (section_id.to_string(), target.id.clone());
    session.apply(&Action::DeleteDeliverable { deliverable_id, section_id })?;
    println!("Deleted deliverable");
    return Ok(());
}

/// Mark every heading of the document and store it. The file is rewritten
/// only when markers had to be added. Returns the number of headings.
///
/// # Errors
///
/// Returns `Error::DocumentNotFound`, I/O errors, or persistence errors.
pub fn sync_document_file(session: &mut Session, path: &Path) -> Result<usize, Error> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::DocumentNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
    };

    let update = action::sync_document(&text);
    let Action::UpdateCaseStudy { content, heading_index } = &update else {
        return Ok(0);
    };
    if *content != text {
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "wrote heading ids");
    }
    let count = heading_index.len();
    session.apply(&update)?;
    return Ok(count);
}

/// # Errors
///
/// See [`sync_document_file`].
pub fn doc_sync(session: &mut Session, file: Option<&Path>) -> Result<(), Error> {
    let path: PathBuf = file.map_or_else(|| return session.config.document.clone(), Path::to_path_buf);
    let count = sync_document_file(session, &path)?;
    println!("Synced {count} headings from {}", path.display());
    return Ok(());
}

/// Print the stored heading index, indented by level.
pub fn doc_headings(session: &Session) {
    let state = session.state();
    let headings = selectors::case_study_headings(state);
    if headings.is_empty() {
        println!("No headings. Run `casebook doc sync` first.");
        return;
    }
    for heading in headings {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
        let linked = selectors::objectives_for_heading(state, &heading.id).len();
        let suffix = if linked > 0 { format!("  ({linked} linked)") } else { String::new() };
        println!("{indent}{} {{#{}}}{suffix}", heading.text, heading.id);
    }
}

/// Replace an objective's heading links.
///
/// # Errors
///
/// Returns id-resolution or persistence errors. Unknown headings are
/// reported and skipped.
pub fn link(session: &mut Session, section: &str, objective: &str, headings: &[String]) -> Result<(), Error> {
    let (section_id, objective_id) = objective_ids(session.state(), section, objective)?;
    let mut heading_ids = Vec::with_capacity(headings.len());
    for key in headings {
        match resolve_heading(session.state(), key) {
            Some(h) => heading_ids.push(h.id.clone()),
            None => eprintln!("skipping unknown heading `{key}`"),
        }
    }
    session.apply(&Action::LinkObjectiveHeadings {
        heading_ids,
        objective_id: objective_id.clone(),
        section_id: section_id.clone(),
    })?;
    print_linked(session.state(), &section_id, &objective_id);
    return Ok(());
}

/// Print the headings linked to one objective.
fn print_linked(state: &AppState, section_id: &str, objective_id: &str) {
    let linked = selectors::linked_headings_for_objective(state, section_id, objective_id);
    if linked.is_empty() {
        println!("No linked headings");
    }
    for heading in linked {
        println!("{} {{#{}}}", heading.text, heading.id);
    }
}

/// # Errors
///
/// Returns id-resolution errors.
pub fn linked(session: &Session, section: &str, objective: &str) -> Result<(), Error> {
    let (section_id, objective_id) = objective_ids(session.state(), section, objective)?;
    print_linked(session.state(), &section_id, &objective_id);
    return Ok(());
}

/// Print every objective linked to one heading.
///
/// # Errors
///
/// Never fails today; the signature matches the other lookups.
pub fn heading_links(session: &Session, heading: &str) -> Result<(), Error> {
    let state = session.state();
    let heading_id = resolve_heading(state, heading).map_or(heading, |h| return h.id.as_str());
    let steps = selectors::objectives_for_heading(state, heading_id);
    if steps.is_empty() {
        println!("No linked objectives");
    }
    for step in steps {
        println!("{}: {} {{#{}}}", step.section.name, step.objective.title, step.objective.id);
    }
    return Ok(());
}

/// Write the state as JSON to `path`, a dated default file, or stdout for `-`.
///
/// # Errors
///
/// Returns `Error::Json` or `Error::Io`.
pub fn export(session: &Session, path: Option<&Path>) -> Result<(), Error> {
    let json = persistence::export_json(session.state())?;
    if path == Some(Path::new("-")) {
        println!("{json}");
        return Ok(());
    }
    let target = path.map_or_else(
        || return PathBuf::from(persistence::default_export_file_name(Utc::now())),
        Path::to_path_buf,
    );
    std::fs::write(&target, format!("{json}\n"))?;
    println!("Exported to {}", target.display());
    return Ok(());
}

/// Replace the state with a validated export.
///
/// # Errors
///
/// Returns `Error::Io`, `Error::Json`, `Error::InvalidImport`, or persistence errors.
pub fn import(session: &mut Session, path: &Path) -> Result<(), Error> {
    let text = std::fs::read_to_string(path)?;
    let imported = persistence::import_json(&text)?;
    session.apply(&Action::ImportState(imported))?;
    let state = session.state();
    println!(
        "Imported {} sections and {} heading links",
        state.sections.len(),
        state.objective_heading_links.len()
    );
    return Ok(());
}

/// Back to the empty state and remove the stored file.
///
/// # Errors
///
/// Returns `Error::Io` if the stored file cannot be removed.
pub fn reset(session: &mut Session) -> Result<(), Error> {
    session.store.dispatch(&Action::ResetState);
    persistence::clear(&session.config.state)?;
    println!("Reset");
    return Ok(());
}
