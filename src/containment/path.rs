// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::fmt;

use serde::Serialize;

use crate::search::TargetEntity;

/// Entity segments a containment path may name
pub const CONTAINMENT_SEGMENTS: &[&str] = &[
    "sites",
    "initiatives",
    "projects",
    "pages",
    "content",
    "discussions",
    "events",
    "groups",
];

/// Deepest path accepted, in entities
pub const MAX_DEPTH: usize = 5;

/// Outcome of [`parse_containment_path`]. Invalid paths are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainmentPathResult {
    pub valid: bool,
    pub reason: String,
    pub parts: Vec<String>,
}

impl ContainmentPathResult {
    fn invalid(reason: String, parts: Vec<String>) -> Self {
        Self {
            valid: false,
            reason,
            parts,
        }
    }

    /// `(segment, id)` pairs, outermost first
    pub fn entities(&self) -> Vec<EntityRef> {
        if !self.valid {
            return Vec::new();
        }
        self.parts
            .chunks_exact(2)
            .map(|pair| EntityRef::new(pair[0].as_str(), pair[1].as_str()))
            .collect()
    }
}

/// One `segment/id` step of a containment path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    pub segment: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(segment: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            id: id.into(),
        }
    }

    /// Record type to search for this entity inside its parent's catalog
    pub fn target_entity(&self) -> TargetEntity {
        match self.segment.as_str() {
            "groups" => TargetEntity::Group,
            "events" => TargetEntity::Event,
            _ => TargetEntity::Item,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.segment, self.id)
    }
}

/// Validate a `segment/id/segment/id...` path.
///
/// Leading and trailing slashes are ignored.
pub fn parse_containment_path(path: &str) -> ContainmentPathResult {
    let trimmed = path.trim_matches('/');
    let parts: Vec<String> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').map(str::to_string).collect()
    };

    if parts.len() % 2 != 0 {
        return ContainmentPathResult::invalid(
            "Path does not contain an even number of parts.".to_string(),
            parts,
        );
    }
    if parts.len() > MAX_DEPTH * 2 {
        return ContainmentPathResult::invalid(
            format!("Path is > {} entities deep.", MAX_DEPTH),
            parts,
        );
    }
    if let Some(segment) = parts
        .iter()
        .step_by(2)
        .find(|segment| !CONTAINMENT_SEGMENTS.contains(&segment.as_str()))
    {
        let reason = format!("Path contains invalid segment: {}.", segment);
        return ContainmentPathResult::invalid(reason, parts);
    }

    ContainmentPathResult {
        valid: true,
        reason: String::new(),
        parts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_path() {
        let result = parse_containment_path("sites/00a/initiatives/00b/projects/00c");
        assert!(result.valid);
        assert_eq!(result.reason, "");
        assert_eq!(result.parts.len(), 6);
        assert_eq!(
            result.entities(),
            vec![
                EntityRef::new("sites", "00a"),
                EntityRef::new("initiatives", "00b"),
                EntityRef::new("projects", "00c"),
            ]
        );
    }

    #[test]
    fn test_slashes_trimmed() {
        let result = parse_containment_path("/sites/00a/pages/00b/");
        assert!(result.valid);
        assert_eq!(result.parts, vec!["sites", "00a", "pages", "00b"]);
    }

    #[test]
    fn test_odd_parts() {
        let result = parse_containment_path("/sites/00b/initiatives");
        assert!(!result.valid);
        assert_eq!(result.reason, "Path does not contain an even number of parts.");
        assert_eq!(result.parts.len(), 3);
        assert!(result.entities().is_empty());
    }

    #[test]
    fn test_too_deep() {
        let path = "sites/1/initiatives/2/projects/3/pages/4/content/5/groups/6";
        let result = parse_containment_path(path);
        assert!(!result.valid);
        assert_eq!(result.reason, "Path is > 5 entities deep.");

        let path = "sites/1/initiatives/2/projects/3/pages/4/content/5";
        assert!(parse_containment_path(path).valid);
    }

    #[test]
    fn test_invalid_segment() {
        let result = parse_containment_path("sites/00a/widgets/00b");
        assert!(!result.valid);
        assert_eq!(result.reason, "Path contains invalid segment: widgets.");
    }

    #[test]
    fn test_empty_path_is_valid_and_empty() {
        let result = parse_containment_path("/");
        assert!(result.valid);
        assert!(result.parts.is_empty());
    }

    #[test]
    fn test_target_entity_mapping() {
        assert_eq!(EntityRef::new("groups", "g").target_entity(), TargetEntity::Group);
        assert_eq!(EntityRef::new("events", "e").target_entity(), TargetEntity::Event);
        assert_eq!(EntityRef::new("projects", "p").target_entity(), TargetEntity::Item);
        assert_eq!(EntityRef::new("sites", "s").to_string(), "sites/s");
    }
}
