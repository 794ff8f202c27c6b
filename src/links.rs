//! Objective-heading link table maintenance.
//!
//! Two invariants hold after every transition: each link's heading is in the
//! current heading index, and each link's (section, objective) pair exists.
//! The functions here compute the pruned or replaced row set; the reducer
//! decides when to call them.

use std::collections::HashSet;

use crate::types::{AppState, Heading, ObjectiveHeadingLink};

/// Drop every row pointing into `section_id`.
pub fn without_section(links: &[ObjectiveHeadingLink], section_id: &str) -> Vec<ObjectiveHeadingLink> {
    return links.iter().filter(|l| return l.section_id != section_id).cloned().collect();
}

/// Drop every row for one objective.
pub fn without_objective(
    links: &[ObjectiveHeadingLink],
    section_id: &str,
    objective_id: &str,
) -> Vec<ObjectiveHeadingLink> {
    return links
        .iter()
        .filter(|l| return !l.is_for(section_id, objective_id))
        .cloned()
        .collect();
}

/// Keep only rows whose heading is present in `index`.
pub fn retained_by_index(links: &[ObjectiveHeadingLink], index: &[Heading]) -> Vec<ObjectiveHeadingLink> {
    let present: HashSet<&str> = index.iter().map(|h| return h.id.as_str()).collect();
    return links
        .iter()
        .filter(|l| return present.contains(l.heading_id.as_str()))
        .cloned()
        .collect();
}

/// Replace one objective's rows with one row per heading id.
/// Ids are de-duplicated (first wins) and filtered to `present`; surviving
/// rows of other objectives keep their order and the new rows go last.
pub fn replace_for_objective(
    links: &[ObjectiveHeadingLink],
    section_id: &str,
    objective_id: &str,
    heading_ids: &[String],
    present: &HashSet<&str>,
) -> Vec<ObjectiveHeadingLink> {
    let mut next = without_objective(links, section_id, objective_id);
    let mut seen: HashSet<&str> = HashSet::new();
    for heading_id in heading_ids {
        if !present.contains(heading_id.as_str()) || !seen.insert(heading_id.as_str()) {
            continue;
        }
        next.push(ObjectiveHeadingLink {
            heading_id: heading_id.clone(),
            objective_id: objective_id.to_string(),
            section_id: section_id.to_string(),
        });
    }
    return next;
}

/// Keep only rows that satisfy both invariants against `state`.
/// Duplicate rows collapse to their first occurrence.
pub fn consistent_with(state: &AppState) -> Vec<ObjectiveHeadingLink> {
    let mut seen: HashSet<&ObjectiveHeadingLink> = HashSet::new();
    return state
        .objective_heading_links
        .iter()
        .filter(|l| {
            return state.has_heading(&l.heading_id)
                && state.objective(&l.section_id, &l.objective_id).is_some()
                && seen.insert(*l);
        })
        .cloned()
        .collect();
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn link(section: &str, objective: &str, heading: &str) -> ObjectiveHeadingLink {
        return ObjectiveHeadingLink {
            heading_id: heading.to_string(),
            objective_id: objective.to_string(),
            section_id: section.to_string(),
        };
    }

    #[test]
    fn replace_dedups_and_filters_unknown_headings() {
        let links = vec![link("s", "o", "old"), link("s", "other", "h1")];
        let present: HashSet<&str> = ["h1", "h2", "old"].into_iter().collect();
        let ids = vec!["h2".to_string(), "missing".to_string(), "h2".to_string(), "h1".to_string()];

        let next = replace_for_objective(&links, "s", "o", &ids, &present);
        assert_eq!(next, vec![link("s", "other", "h1"), link("s", "o", "h2"), link("s", "o", "h1")]);
    }

    #[test]
    fn retained_by_index_drops_vanished_headings() {
        let links = vec![link("s", "o", "keep"), link("s", "o", "gone")];
        let index = vec![Heading {
            id: "keep".to_string(),
            level: 1,
            line: 0,
            text: "Keep".to_string(),
        }];
        assert_eq!(retained_by_index(&links, &index), vec![link("s", "o", "keep")]);
    }

    #[test]
    fn without_section_leaves_other_sections() {
        let links = vec![link("a", "o", "h"), link("b", "o", "h")];
        assert_eq!(without_section(&links, "a"), vec![link("b", "o", "h")]);
    }
}
