//! Import validation: field-level schema checks on untrusted JSON.
//!
//! Nothing reaches the `ImportState` transition without passing here. The
//! checker walks the whole document and collects every problem, so the user
//! sees all of them at once instead of fixing one field per attempt.

use std::fmt;

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::types::{AppState, CURRENT_SCHEMA_VERSION};

/// One schema violation, located by a JSON path such as `sections[0].name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What is wrong.
    pub message: String,
    /// Where, as a dotted path with array indices. Empty for the root.
    pub path: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        return write!(f, "{}: {}", self.path, self.message);
    }
}

/// Allowed keys per object kind.
const STATE_KEYS: &[&str] = &["caseStudy", "objectiveHeadingLinks", "sections", "version"];
const SECTION_KEYS: &[&str] = &["createdAt", "deliverables", "description", "id", "name", "objectives", "updatedAt"];
const OBJECTIVE_BASE_KEYS: &[&str] = &["description", "id", "isCompleted", "title", "type"];
const TEXT_KEYS: &[&str] = &["maxLength", "value"];
const NUMBER_KEYS: &[&str] = &["max", "min", "step", "value"];
const CHECKLIST_KEYS: &[&str] = &["items"];
const ITEM_KEYS: &[&str] = &["done", "id", "label"];
const DELIVERABLE_KEYS: &[&str] = &["id", "isCompleted", "label", "note"];
const CASE_STUDY_KEYS: &[&str] = &["content", "headingIndex", "updatedAt"];
const HEADING_KEYS: &[&str] = &["id", "level", "line", "text"];
const LINK_KEYS: &[&str] = &["headingId", "objectiveId", "sectionId"];

/// Validate `value` against the state schema and convert it.
///
/// # Errors
///
/// Returns `Error::InvalidImport` listing every violation,
/// or `Error::Json` if conversion still fails after validation.
pub fn import_state(value: Value) -> Result<AppState, Error> {
    validate_state(&value).map_err(|issues| return Error::InvalidImport { issues })?;
    return Ok(serde_json::from_value(value)?);
}

/// Check `value` against the state schema.
///
/// # Errors
///
/// Returns every violation found, in document order.
pub fn validate_state(value: &Value) -> Result<(), Vec<ValidationIssue>> {
    let mut checker = Checker::default();
    checker.state(value);
    if checker.issues.is_empty() {
        return Ok(());
    }
    return Err(checker.issues);
}

/// `parent.key`, or just `key` at the root.
fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        return key.to_string();
    }
    return format!("{parent}.{key}");
}

/// JSON type name for messages.
const fn type_name(value: &Value) -> &'static str {
    return match value {
        Value::Array(_) => "array",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
        Value::Number(_) => "number",
        Value::Object(_) => "object",
        Value::String(_) => "string",
    };
}

/// Accumulates issues while walking the document.
#[derive(Default)]
struct Checker {
    /// Issues found so far.
    issues: Vec<ValidationIssue>,
}

impl Checker {
    /// Record an issue.
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            message: message.into(),
            path: path.to_string(),
        });
    }

    /// Expect an object with only `allowed` keys.
    fn object<'v>(&mut self, path: &str, value: &'v Value, allowed: &[&str]) -> Option<&'v Map<String, Value>> {
        let Some(map) = value.as_object() else {
            self.push(path, format!("expected object, found {}", type_name(value)));
            return None;
        };
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(&field_path(path, key), "unknown field");
            }
        }
        return Some(map);
    }

    /// Expect an array, present or not according to `required`.
    fn array<'v>(&mut self, path: &str, map: &'v Map<String, Value>, key: &str, required: bool) -> Option<&'v [Value]> {
        let here = field_path(path, key);
        return match map.get(key) {
            None if required => {
                self.push(&here, "required");
                None
            },
            None => None,
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(other) => {
                self.push(&here, format!("expected array, found {}", type_name(other)));
                None
            },
        };
    }

    /// Expect a string field.
    fn string<'v>(&mut self, path: &str, map: &'v Map<String, Value>, key: &str, required: bool) -> Option<&'v str> {
        let here = field_path(path, key);
        return match map.get(key) {
            None if required => {
                self.push(&here, "required");
                None
            },
            None => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.push(&here, format!("expected string, found {}", type_name(other)));
                None
            },
        };
    }

    /// Expect a boolean field.
    fn boolean(&mut self, path: &str, map: &Map<String, Value>, key: &str) {
        let here = field_path(path, key);
        match map.get(key) {
            None => self.push(&here, "required"),
            Some(Value::Bool(_)) => {},
            Some(other) => self.push(&here, format!("expected boolean, found {}", type_name(other))),
        }
    }

    /// Expect an optional finite number field.
    fn number(&mut self, path: &str, map: &Map<String, Value>, key: &str) -> Option<f64> {
        let value = map.get(key)?;
        let here = field_path(path, key);
        let Some(n) = value.as_f64() else {
            self.push(&here, format!("expected number, found {}", type_name(value)));
            return None;
        };
        return Some(n);
    }

    /// Expect a non-negative integer field.
    fn unsigned(&mut self, path: &str, map: &Map<String, Value>, key: &str, required: bool) -> Option<u64> {
        let here = field_path(path, key);
        let Some(value) = map.get(key) else {
            if required {
                self.push(&here, "required");
            }
            return None;
        };
        let Some(n) = value.as_u64() else {
            self.push(&here, format!("expected non-negative integer, found {value}"));
            return None;
        };
        return Some(n);
    }

    /// Expect an RFC 3339 timestamp string.
    fn timestamp(&mut self, path: &str, map: &Map<String, Value>, key: &str) {
        let Some(raw) = self.string(path, map, key, true) else {
            return;
        };
        if DateTime::parse_from_rfc3339(raw).is_err() {
            self.push(&field_path(path, key), format!("expected RFC 3339 timestamp, found `{raw}`"));
        }
    }

    /// Root object.
    fn state(&mut self, value: &Value) {
        let Some(map) = self.object("", value, STATE_KEYS) else {
            return;
        };

        match map.get("version") {
            None => self.push("version", "required"),
            Some(v) if v.as_u64() == Some(CURRENT_SCHEMA_VERSION) => {},
            Some(v) => self.push("version", format!("expected {CURRENT_SCHEMA_VERSION}, found {v}")),
        }

        for (i, section) in self.array("", map, "sections", true).unwrap_or_default().iter().enumerate() {
            self.section(&format!("sections[{i}]"), section);
        }

        if let Some(case_study) = map.get("caseStudy") {
            self.case_study("caseStudy", case_study);
        }

        for (i, link) in self.array("", map, "objectiveHeadingLinks", false).unwrap_or_default().iter().enumerate() {
            let path = format!("objectiveHeadingLinks[{i}]");
            if let Some(fields) = self.object(&path, link, LINK_KEYS) {
                for key in LINK_KEYS {
                    self.string(&path, fields, key, true);
                }
            }
        }
    }

    /// One section.
    fn section(&mut self, path: &str, value: &Value) {
        let Some(map) = self.object(path, value, SECTION_KEYS) else {
            return;
        };
        self.string(path, map, "id", true);
        self.string(path, map, "name", true);
        self.string(path, map, "description", false);
        self.timestamp(path, map, "createdAt");
        self.timestamp(path, map, "updatedAt");

        let objectives = self.array(path, map, "objectives", true).unwrap_or_default();
        for (i, objective) in objectives.iter().enumerate() {
            self.objective(&format!("{path}.objectives[{i}]"), objective);
        }
        let deliverables = self.array(path, map, "deliverables", false).unwrap_or_default();
        for (i, deliverable) in deliverables.iter().enumerate() {
            let here = format!("{path}.deliverables[{i}]");
            if let Some(fields) = self.object(&here, deliverable, DELIVERABLE_KEYS) {
                self.string(&here, fields, "id", true);
                self.string(&here, fields, "label", true);
                self.boolean(&here, fields, "isCompleted");
                self.string(&here, fields, "note", false);
            }
        }
    }

    /// One objective. The `type` tag decides which variant fields are allowed.
    fn objective(&mut self, path: &str, value: &Value) {
        let tag = value.get("type").and_then(Value::as_str);
        let variant_keys: &[&str] = match tag {
            Some("checklist") => CHECKLIST_KEYS,
            Some("number") => NUMBER_KEYS,
            Some("text") => TEXT_KEYS,
            _ => &[],
        };
        let allowed: Vec<&str> = OBJECTIVE_BASE_KEYS.iter().chain(variant_keys).copied().collect();
        let Some(map) = self.object(path, value, &allowed) else {
            return;
        };

        self.string(path, map, "id", true);
        self.string(path, map, "title", true);
        self.string(path, map, "description", false);
        self.boolean(path, map, "isCompleted");

        match tag {
            Some("checklist") => self.checklist(path, map),
            Some("number") => self.number_objective(path, map),
            Some("text") => self.text_objective(path, map),
            _ => self.push(&field_path(path, "type"), "expected one of `text`, `number`, `checklist`"),
        }
    }

    /// Text variant fields.
    fn text_objective(&mut self, path: &str, map: &Map<String, Value>) {
        let value = self.string(path, map, "value", false);
        let limit = self.unsigned(path, map, "maxLength", false);
        if let (Some(text), Some(limit)) = (value, limit) {
            let length = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
            if length > limit {
                self.push(&field_path(path, "value"), format!("longer than maxLength ({length} > {limit})"));
            }
        }
    }

    /// Number variant fields.
    fn number_objective(&mut self, path: &str, map: &Map<String, Value>) {
        let value = self.number(path, map, "value");
        let min = self.number(path, map, "min");
        let max = self.number(path, map, "max");
        if let Some(step) = self.number(path, map, "step")
            && step <= 0.0
        {
            self.push(&field_path(path, "step"), "must be positive");
        }
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            self.push(&field_path(path, "min"), format!("greater than max ({lo} > {hi})"));
        }
        if let Some(v) = value
            && (min.is_some_and(|lo| return v < lo) || max.is_some_and(|hi| return v > hi))
        {
            self.push(&field_path(path, "value"), "outside min/max bounds");
        }
    }

    /// Checklist variant fields.
    fn checklist(&mut self, path: &str, map: &Map<String, Value>) {
        let items = self.array(path, map, "items", true).unwrap_or_default();
        for (i, item) in items.iter().enumerate() {
            let here = format!("{path}.items[{i}]");
            if let Some(fields) = self.object(&here, item, ITEM_KEYS) {
                self.string(&here, fields, "id", true);
                self.string(&here, fields, "label", true);
                self.boolean(&here, fields, "done");
            }
        }
    }

    /// The case-study document.
    fn case_study(&mut self, path: &str, value: &Value) {
        let Some(map) = self.object(path, value, CASE_STUDY_KEYS) else {
            return;
        };
        self.string(path, map, "content", true);
        self.timestamp(path, map, "updatedAt");
        let headings = self.array(path, map, "headingIndex", true).unwrap_or_default();
        for (i, heading) in headings.iter().enumerate() {
            let here = format!("{path}.headingIndex[{i}]");
            let Some(fields) = self.object(&here, heading, HEADING_KEYS) else {
                continue;
            };
            self.string(&here, fields, "id", true);
            self.string(&here, fields, "text", true);
            self.unsigned(&here, fields, "line", true);
            if let Some(level) = self.unsigned(&here, fields, "level", true)
                && !(1..=6).contains(&level)
            {
                self.push(&field_path(&here, "level"), format!("expected 1 to 6, found {level}"));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths(value: &Value) -> Vec<String> {
        return validate_state(value).unwrap_err().into_iter().map(|i| i.path).collect();
    }

    fn section(objectives: Value) -> Value {
        return json!({
            "id": "s1",
            "name": "Research",
            "objectives": objectives,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
        });
    }

    #[test]
    fn accepts_a_minimal_state() {
        let value = json!({ "version": 1, "sections": [section(json!([]))] });
        assert!(validate_state(&value).is_ok());
        assert_eq!(import_state(value).unwrap().sections.len(), 1);
    }

    #[test]
    fn rejects_wrong_version_and_non_array_sections() {
        let value = json!({ "version": 2, "sections": {} });
        assert_eq!(paths(&value), vec!["version", "sections"]);
    }

    #[test]
    fn rejects_cross_variant_fields() {
        let value = json!({ "version": 1, "sections": [section(json!([
            { "id": "o", "type": "text", "title": "T", "isCompleted": false, "items": [] }
        ]))] });
        assert_eq!(paths(&value), vec!["sections[0].objectives[0].items"]);
    }

    #[test]
    fn reports_every_problem_with_its_path() {
        let value = json!({ "version": 1, "sections": [section(json!([
            { "id": 4, "type": "number", "title": "N", "isCompleted": "no", "min": 5, "max": 1 },
            { "id": "c", "type": "checklist", "title": "C", "isCompleted": true, "items": [{ "id": "i", "label": "L" }] },
            { "id": "x", "type": "video", "title": "X", "isCompleted": true }
        ]))] });
        assert_eq!(
            paths(&value),
            vec![
                "sections[0].objectives[0].id",
                "sections[0].objectives[0].isCompleted",
                "sections[0].objectives[0].min",
                "sections[0].objectives[1].items[0].done",
                "sections[0].objectives[2].type",
            ]
        );
    }

    #[test]
    fn checks_case_study_and_links() {
        let value = json!({
            "version": 1,
            "sections": [],
            "caseStudy": {
                "content": "# A",
                "updatedAt": "yesterday",
                "headingIndex": [{ "id": "a", "level": 7, "text": "A", "line": 0 }]
            },
            "objectiveHeadingLinks": [{ "sectionId": "s", "objectiveId": "o" }]
        });
        assert_eq!(
            paths(&value),
            vec![
                "caseStudy.updatedAt",
                "caseStudy.headingIndex[0].level",
                "objectiveHeadingLinks[0].headingId",
            ]
        );
    }

    #[test]
    fn text_value_longer_than_limit_is_rejected() {
        let value = json!({ "version": 1, "sections": [section(json!([
            { "id": "t", "type": "text", "title": "T", "isCompleted": false, "value": "toolong", "maxLength": 3 }
        ]))] });
        assert_eq!(paths(&value), vec!["sections[0].objectives[0].value"]);
    }

    #[test]
    fn issue_display_includes_path() {
        let issue = ValidationIssue {
            message: "required".to_string(),
            path: "sections[0].name".to_string(),
        };
        assert_eq!(issue.to_string(), "sections[0].name: required");
    }
}
