//! Actions accepted by the reducer, one variant per transition.

use crate::headings::{self, EnsuredDocument};
use crate::types::{AppState, ChecklistItem, Deliverable, Heading, Objective, Section};

/// Every state transition. Addressing a missing entity makes the action a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append a deliverable to a section.
    AddDeliverable {
        /// The deliverable to append.
        deliverable: Deliverable,
        /// Owning section.
        section_id: String,
    },
    /// Append an objective to a section.
    AddObjective {
        /// The objective to append.
        objective: Objective,
        /// Owning section.
        section_id: String,
    },
    /// Append a section.
    AddSection(Section),
    /// Remove a deliverable.
    DeleteDeliverable {
        /// Deliverable to remove.
        deliverable_id: String,
        /// Owning section.
        section_id: String,
    },
    /// Remove an objective and every link that names it.
    DeleteObjective {
        /// Objective to remove.
        objective_id: String,
        /// Owning section.
        section_id: String,
    },
    /// Remove a section and every link into it.
    DeleteSection {
        /// Section to remove.
        id: String,
    },
    /// Replace the whole state with an already-validated one.
    ImportState(AppState),
    /// Replace the link set of one objective.
    LinkObjectiveHeadings {
        /// Headings to link, in order. Unknown ids are dropped.
        heading_ids: Vec<String>,
        /// Objective being linked.
        objective_id: String,
        /// Owning section.
        section_id: String,
    },
    /// Move the named sections, in order, to the front.
    ReorderSections {
        /// Sections to move. Unknown ids are ignored.
        section_ids: Vec<String>,
    },
    /// Back to the empty initial state.
    ResetState,
    /// Flip a deliverable's completion flag.
    ToggleDeliverableComplete {
        /// Deliverable to toggle.
        deliverable_id: String,
        /// Owning section.
        section_id: String,
    },
    /// Flip an objective's completion flag.
    ToggleObjectiveComplete {
        /// Objective to toggle.
        objective_id: String,
        /// Owning section.
        section_id: String,
    },
    /// Replace the case-study document wholesale.
    UpdateCaseStudy {
        /// New markdown source.
        content: String,
        /// Headings parsed from `content`.
        heading_index: Vec<Heading>,
    },
    /// Merge a patch into a deliverable.
    UpdateDeliverable {
        /// Deliverable to patch.
        deliverable_id: String,
        /// Fields to change.
        patch: DeliverablePatch,
        /// Owning section.
        section_id: String,
    },
    /// Merge a patch into an objective.
    UpdateObjective {
        /// Objective to patch.
        objective_id: String,
        /// Fields to change.
        patch: ObjectivePatch,
        /// Owning section.
        section_id: String,
    },
    /// Set an objective's answer, type-checked against its variant.
    UpdateObjectiveValue {
        /// Objective to answer.
        objective_id: String,
        /// Owning section.
        section_id: String,
        /// New answer.
        value: ObjectiveValue,
    },
    /// Merge a patch into a section.
    UpdateSection {
        /// Section to patch.
        id: String,
        /// Fields to change.
        patch: SectionPatch,
    },
}

impl Action {
    /// Short name for log events.
    pub const fn name(&self) -> &'static str {
        return match self {
            Self::AddDeliverable { .. } => "add_deliverable",
            Self::AddObjective { .. } => "add_objective",
            Self::AddSection(_) => "add_section",
            Self::DeleteDeliverable { .. } => "delete_deliverable",
            Self::DeleteObjective { .. } => "delete_objective",
            Self::DeleteSection { .. } => "delete_section",
            Self::ImportState(_) => "import_state",
            Self::LinkObjectiveHeadings { .. } => "link_objective_headings",
            Self::ReorderSections { .. } => "reorder_sections",
            Self::ResetState => "reset_state",
            Self::ToggleDeliverableComplete { .. } => "toggle_deliverable_complete",
            Self::ToggleObjectiveComplete { .. } => "toggle_objective_complete",
            Self::UpdateCaseStudy { .. } => "update_case_study",
            Self::UpdateDeliverable { .. } => "update_deliverable",
            Self::UpdateObjective { .. } => "update_objective",
            Self::UpdateObjectiveValue { .. } => "update_objective_value",
            Self::UpdateSection { .. } => "update_section",
        };
    }
}

impl From<EnsuredDocument> for Action {
    /// A parsed document becomes the case-study replacement.
    fn from(doc: EnsuredDocument) -> Self {
        return Self::UpdateCaseStudy {
            content: doc.content,
            heading_index: doc.heading_index,
        };
    }
}

/// Build the case-study replacement for freshly edited document text.
///
/// Headings get their identifier markers before the transition runs, so the
/// content carried by the action is already the rewritten source.
pub fn sync_document(content: &str) -> Action {
    return Action::from(headings::ensure_heading_ids(content));
}

/// Partial section update. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPatch {
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New name.
    pub name: Option<String>,
}

/// Partial objective update. The variant itself can never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectivePatch {
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New completion flag.
    pub is_completed: Option<bool>,
    /// Variant settings. Must name the objective's own variant.
    pub kind: Option<KindPatch>,
    /// New title.
    pub title: Option<String>,
}

/// Variant-specific settings for [`ObjectivePatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum KindPatch {
    /// Checklist settings.
    Checklist {
        /// Replacement item list.
        items: Option<Vec<ChecklistItem>>,
    },
    /// Number settings; `Some(None)` clears a bound.
    Number {
        /// New upper bound.
        max: Option<Option<f64>>,
        /// New lower bound.
        min: Option<Option<f64>>,
        /// New step.
        step: Option<Option<f64>>,
    },
    /// Text settings; `Some(None)` clears the limit.
    Text {
        /// New maximum length.
        max_length: Option<Option<usize>>,
    },
}

/// Partial deliverable update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverablePatch {
    /// New completion flag.
    pub is_completed: Option<bool>,
    /// New label.
    pub label: Option<String>,
    /// New note; `Some(None)` clears it.
    pub note: Option<Option<String>>,
}

/// An objective answer. Must match the objective's variant to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveValue {
    /// Full replacement item list for a checklist.
    Checklist(Vec<ChecklistItem>),
    /// Numeric answer.
    Number(f64),
    /// Text answer.
    Text(String),
}
