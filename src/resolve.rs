//! Slot and anchor resolution
//!
//! Pure matching logic between plan data and template geometry. Slot names
//! drift between a layout and the slides instantiated from it, so slot
//! identity always goes through the positional `idx` back-reference; plan
//! field keys are then matched against the canonical name with a fixed
//! precedence. Anchors are explicit drawing targets and match by exact name
//! only.

use std::collections::BTreeMap;

use crate::document::{Placeholder, PlaceholderRole, SlideLayout};
use crate::template::AnchorDescriptor;

/// Resolve a slide-instance slot back to its authored layout name
///
/// The layout placeholder sharing the instance's `idx` wins; if the layout
/// has no such placeholder the instance name is used as-is. Never fails.
pub fn canonical_slot_name<'a>(slot: &'a Placeholder, layout: &'a SlideLayout) -> &'a str {
    layout
        .placeholders
        .iter()
        .find(|ph| ph.idx == slot.idx)
        .map(|ph| ph.name.as_str())
        .unwrap_or(slot.name.as_str())
}

/// Conventional plan keys tried when name matching fails, by slot role
fn role_fallback_keys(role: PlaceholderRole) -> &'static [&'static str] {
    match role {
        PlaceholderRole::Title => &["title", "main_title", "subject"],
        PlaceholderRole::Subtitle => &["subtitle", "sub_title"],
        PlaceholderRole::Body => &["content", "body", "desc"],
        PlaceholderRole::Date => &["date"],
        PlaceholderRole::PageNumber => &["page_no"],
        PlaceholderRole::Other => &[],
    }
}

/// Find the plan field that should fill a slot
///
/// Precedence, first match wins:
/// 1. case-insensitive equality between a field key and the canonical name
/// 2. case-insensitive containment of a field key inside the canonical name
/// 3. role-conventional keys (e.g. Title -> "title", "main_title", "subject")
///
/// Returns `None` when nothing matches; the slot is then left untouched.
pub fn match_field<'a>(
    canonical: &str,
    role: PlaceholderRole,
    fields: &'a BTreeMap<String, String>,
) -> Option<&'a str> {
    let canonical_lower = canonical.to_lowercase();

    if let Some(value) = fields
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(canonical))
        .map(|(_, value)| value.as_str())
    {
        return Some(value);
    }

    if let Some(value) = fields
        .iter()
        .find(|(key, _)| canonical_lower.contains(&key.to_lowercase()))
        .map(|(_, value)| value.as_str())
    {
        return Some(value);
    }

    for fallback in role_fallback_keys(role) {
        if let Some(value) = fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(fallback))
            .map(|(_, value)| value.as_str())
        {
            return Some(value);
        }
    }

    None
}

/// Find the anchor a component targets; exact name match only
pub fn resolve_anchor<'a>(
    position: &str,
    anchors: &'a [AnchorDescriptor],
) -> Option<&'a AnchorDescriptor> {
    anchors.iter().find(|anchor| anchor.name == position)
}
