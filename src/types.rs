//! Core domain types: the state tree, its entities, and their JSON mapping.
//!
//! Every entity is reachable only through [`AppState`]. Field names follow the
//! persisted layout (`camelCase`), so a state serialized here is exactly the
//! payload the persistence gateway stores and the export command writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The only schema version this crate reads or writes.
pub const CURRENT_SCHEMA_VERSION: u64 = 1;

/// Schema version marker. Serializes as the literal `1` and refuses anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaVersion;

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return serializer.serialize_u64(CURRENT_SCHEMA_VERSION);
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        if raw != CURRENT_SCHEMA_VERSION {
            return Err(serde::de::Error::custom(format!(
                "unsupported schema version {raw}, expected {CURRENT_SCHEMA_VERSION}"
            )));
        }
        return Ok(Self);
    }
}

/// Root of ownership. A transition always produces a complete new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// The case-study document, absent until the first edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study: Option<CaseStudy>,
    /// Objective-to-heading relation rows. Absent in JSON is the same as empty.
    #[serde(default)]
    pub objective_heading_links: Vec<ObjectiveHeadingLink>,
    /// Sections in display order.
    pub sections: Vec<Section>,
    /// Schema version marker.
    pub version: SchemaVersion,
}

impl AppState {
    /// Look up a section by id.
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        return self.sections.iter().find(|s| s.id == section_id);
    }

    /// Look up an objective by its owning section and id.
    pub fn objective(&self, section_id: &str, objective_id: &str) -> Option<&Objective> {
        return self.section(section_id)?.objective(objective_id);
    }

    /// Whether a heading with this id is present in the current heading index.
    pub fn has_heading(&self, heading_id: &str) -> bool {
        return self
            .case_study
            .as_ref()
            .is_some_and(|cs| cs.heading_index.iter().any(|h| h.id == heading_id));
    }
}

/// A named group of objectives and deliverables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// When the section was created.
    pub created_at: DateTime<Utc>,
    /// Section-level deliverables. Absent in JSON is the same as empty.
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stable identifier, never reused.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Objectives in display order.
    pub objectives: Vec<Objective>,
    /// Refreshed on every structural mutation of the section or its children.
    pub updated_at: DateTime<Utc>,
}

impl Section {
    /// A new empty section stamped with `now`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        return Self {
            created_at: now,
            deliverables: Vec::new(),
            description: None,
            id: id.into(),
            name: name.into(),
            objectives: Vec::new(),
            updated_at: now,
        };
    }

    /// Look up an objective by id.
    pub fn objective(&self, objective_id: &str) -> Option<&Objective> {
        return self.objectives.iter().find(|o| o.id == objective_id);
    }

    /// Look up a deliverable by id.
    pub fn deliverable(&self, deliverable_id: &str) -> Option<&Deliverable> {
        return self.deliverables.iter().find(|d| d.id == deliverable_id);
    }
}

/// A trackable unit of progress with a typed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identifier, unique within the section and used as a link key.
    pub id: String,
    /// Completion flag, independent of the answer value.
    pub is_completed: bool,
    /// Variant payload, tagged by `type` in JSON. Fixed at creation.
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    /// Display title.
    pub title: String,
}

impl Objective {
    /// A new incomplete objective.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ObjectiveKind) -> Self {
        return Self {
            description: None,
            id: id.into(),
            is_completed: false,
            kind,
            title: title.into(),
        };
    }
}

/// Variant-specific objective payload. Fields never cross variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// An ordered list of checkable items.
    Checklist {
        /// Items in display order.
        items: Vec<ChecklistItem>,
    },
    /// A bounded numeric answer.
    Number {
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Increment used by input widgets. Defaults to 1 when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        /// Current answer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// A free-text answer.
    Text {
        /// Maximum answer length in characters.
        #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        /// Current answer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl ObjectiveKind {
    /// Empty text payload.
    pub const fn text(max_length: Option<usize>) -> Self {
        return Self::Text { max_length, value: None };
    }

    /// Empty number payload.
    pub const fn number(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        return Self::Number { max, min, step, value: None };
    }

    /// Checklist payload with the given items.
    pub fn checklist(items: Vec<ChecklistItem>) -> Self {
        return Self::Checklist { items };
    }

    /// The `type` discriminant as written in JSON.
    pub const fn type_tag(&self) -> &'static str {
        return match self {
            Self::Checklist { .. } => "checklist",
            Self::Number { .. } => "number",
            Self::Text { .. } => "text",
        };
    }
}

/// One row of a checklist objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Whether the item is ticked.
    pub done: bool,
    /// Identifier, unique within the checklist.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// A completable artifact tracked at the section level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    /// Identifier, unique within the section.
    pub id: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Display label.
    pub label: String,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A heading of the case-study document at one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Identifier, unique within one heading index.
    pub id: String,
    /// Nesting level, 1 through 6.
    pub level: u8,
    /// Zero-based source line.
    pub line: usize,
    /// Display text with any identifier marker stripped.
    pub text: String,
}

/// The singleton case-study document and its heading index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    /// Markdown source.
    pub content: String,
    /// Headings parsed from `content`, in document order.
    pub heading_index: Vec<Heading>,
    /// When the document was last replaced.
    pub updated_at: DateTime<Utc>,
}

/// A relation row connecting one objective to one heading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveHeadingLink {
    /// Linked heading.
    pub heading_id: String,
    /// Linked objective, scoped by `section_id`.
    pub objective_id: String,
    /// Section owning the objective.
    pub section_id: String,
}

impl ObjectiveHeadingLink {
    /// Whether this row belongs to the given (section, objective) pair.
    pub fn is_for(&self, section_id: &str, objective_id: &str) -> bool {
        return self.section_id == section_id && self.objective_id == objective_id;
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn objective_serializes_with_flat_type_tag() {
        let objective = Objective::new("o1", "Budget", ObjectiveKind::number(Some(0.0), None, None));
        let json = serde_json::to_value(&objective).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["min"], 0.0);
        assert!(json.get("max").is_none());
    }

    #[test]
    fn text_objective_reads_max_length() {
        let json = r#"{"id":"t","type":"text","title":"Bio","maxLength":10,"value":"hi","isCompleted":true}"#;
        let objective: Objective = serde_json::from_str(json).unwrap();
        assert_eq!(
            objective.kind,
            ObjectiveKind::Text { max_length: Some(10), value: Some("hi".to_string()) }
        );
        assert!(objective.is_completed);
    }

    #[test]
    fn state_without_optional_collections_loads() {
        let json = r#"{"version":1,"sections":[{"id":"s","name":"S","objectives":[],
            "createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"}]}"#;
        let state: AppState = serde_json::from_str(json).unwrap();
        assert!(state.objective_heading_links.is_empty());
        assert!(state.case_study.is_none());
        assert_eq!(state.sections.first().map(|s| s.deliverables.len()), Some(0));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let result: Result<AppState, _> = serde_json::from_str(r#"{"version":2,"sections":[]}"#);
        assert!(result.is_err());
    }
}
