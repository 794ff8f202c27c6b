use std::fmt::Write as _;

use crate::error::Error;
use crate::validate::ValidationIssue;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::InvalidImport { issues } => render_invalid_import(issues),
        Error::UnknownSection { section } => render_unknown_section(section),
        Error::UnknownObjective { objective, section } => render_unknown_child("Objective", objective, section, "objective"),
        Error::UnknownDeliverable { deliverable, section } => {
            render_unknown_child("Deliverable", deliverable, section, "deliverable")
        },
        Error::UnknownTemplate { name } => render_unknown_template(name),
        Error::InvalidValue { objective, reason, value } => render_invalid_value(objective, value, reason),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::ConfigNotFound { path } => format!("\
# Error: Config Not Found

`{}` does not exist.

## Fix

Check the `--config` path, or drop the flag to use `.casebook.toml` in the current directory.
", path.display()),

        Error::DocumentNotFound { path } => format!("\
# Error: Document Not Found

`{}` does not exist.

## Fix

Create the document, or point `document` in `.casebook.toml` at it.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_invalid_import(issues: &[ValidationIssue]) -> String {
    let mut out = String::from("\
# Error: Invalid Import

The file does not match the casebook state schema. Nothing was imported.

## Problems

");
    for issue in issues {
        let _ = writeln!(out, "- {issue}");
    }
    out
}

fn render_unknown_section(section: &str) -> String {
    format!("\
# Error: Unknown Section

No section has the id or name `{section}`.

## Fix

List sections and their ids:

    casebook status
")
}

fn render_unknown_child(kind: &str, name: &str, section: &str, command: &str) -> String {
    format!("\
# Error: Unknown {kind}

`{name}` does not exist in section `{section}`.

## Fix

Check the id, or add it first:

    casebook {command} add {section} ...
")
}

fn render_unknown_template(name: &str) -> String {
    format!("\
# Error: Unknown Template

There is no template called `{name}`.

## Available templates

- `empty`
- `case-study`
")
}

fn render_invalid_value(objective: &str, value: &str, reason: &str) -> String {
    format!("\
# Error: Invalid Value

`{value}` cannot be stored in objective `{objective}`: {reason}.
")
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn invalid_import_lists_every_issue() {
        let e = Error::InvalidImport {
            issues: vec![
                ValidationIssue { message: "required".to_string(), path: "version".to_string() },
                ValidationIssue { message: "unknown field".to_string(), path: "sections[0].color".to_string() },
            ],
        };
        let md = render_error(&e);
        assert!(md.starts_with("# Error: Invalid Import"));
        assert!(md.contains("- version: required"));
        assert!(md.contains("- sections[0].color: unknown field"));
    }

    #[test]
    fn unknown_section_points_at_status() {
        let md = render_error(&Error::UnknownSection { section: "Reserch".to_string() });
        assert!(md.contains("`Reserch`"));
        assert!(md.contains("casebook status"));
    }
}
