//! Template introspection
//!
//! `scan` walks a template's layouts and produces a [`TemplateGuide`]: a
//! stable, addressable map of every fillable slot and every free-draw anchor
//! region. The guide is built once per template load and read-only afterward.

use std::fmt;

use crate::document::{Bounds, PlaceholderRole, Presentation, Shape, ShapeKind};

use super::rules::TemplateRules;

/// How a layout is meant to be filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Placeholder slots only
    Static,
    /// Placeholder slots plus free-draw anchor regions
    Dynamic,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Static => write!(f, "static"),
            LayoutKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A fillable slot as defined by its layout
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDescriptor {
    /// Layout-scoped stable identity; the join key for slide instances
    pub idx: u32,
    pub name: String,
    pub role: PlaceholderRole,
}

/// A named non-placeholder shape marking a drawable region
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDescriptor {
    pub name: String,
    pub bounds: Bounds,
}

/// Everything the resolver and renderer need to know about one layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub index: usize,
    pub name: String,
    pub kind: LayoutKind,
    pub slots: Vec<SlotDescriptor>,
    pub anchors: Vec<AnchorDescriptor>,
}

/// The addressable map of a template: one descriptor per layout, in order
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateGuide {
    pub layouts: Vec<LayoutDescriptor>,
}

/// Build a guide from a template
///
/// Layout classification and anchor discovery follow the naming conventions
/// in `rules`. Scanning never fails and never mutates the template; a layout
/// with nothing to offer simply yields an empty descriptor.
pub fn scan(template: &Presentation, rules: &TemplateRules) -> TemplateGuide {
    let conventions = &rules.conventions;
    let layouts = template
        .layouts
        .iter()
        .enumerate()
        .map(|(index, layout)| {
            let kind = if layout.name.starts_with(&conventions.dynamic_prefix) {
                LayoutKind::Dynamic
            } else {
                LayoutKind::Static
            };

            let slots = layout
                .placeholders
                .iter()
                .map(|ph| SlotDescriptor {
                    idx: ph.idx,
                    name: ph.name.clone(),
                    role: ph.role,
                })
                .collect();

            let anchors = if kind == LayoutKind::Dynamic {
                collect_anchors(&layout.shapes, &conventions.anchor_prefix)
            } else {
                Vec::new()
            };

            LayoutDescriptor {
                index,
                name: layout.name.clone(),
                kind,
                slots,
                anchors,
            }
        })
        .collect();

    TemplateGuide { layouts }
}

/// Find anchor shapes in declaration order, descending into groups
///
/// Explicit worklist rather than recursion; group nesting depth is
/// input-controlled.
fn collect_anchors(shapes: &[Shape], anchor_prefix: &str) -> Vec<AnchorDescriptor> {
    let mut anchors = Vec::new();
    let mut stack: Vec<&Shape> = shapes.iter().rev().collect();

    while let Some(shape) = stack.pop() {
        if let ShapeKind::Group { children } = &shape.kind {
            stack.extend(children.iter().rev());
            continue;
        }
        if shape.name.starts_with(anchor_prefix) {
            anchors.push(AnchorDescriptor {
                name: shape.name.clone(),
                bounds: shape.bounds,
            });
        }
    }

    anchors
}

impl TemplateGuide {
    /// Descriptor for a layout index, if the template has that many layouts
    pub fn layout(&self, index: usize) -> Option<&LayoutDescriptor> {
        self.layouts.get(index)
    }

    /// One line per layout, for storyboard planning
    pub fn summary(&self, rules: &TemplateRules) -> String {
        self.layouts
            .iter()
            .map(|layout| {
                let rule = rules.for_layout(&layout.name);
                format!(
                    "[Index {}] {} ({}): {}",
                    layout.index, layout.name, layout.kind, rule.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Per-layout slot/anchor inventory plus authoring rules, for content
    /// generation and review
    pub fn details(&self, rules: &TemplateRules) -> String {
        let mut blocks = Vec::new();
        for layout in &self.layouts {
            let mut block = format!("[Layout {}] {} ({})", layout.index, layout.name, layout.kind);

            if !layout.slots.is_empty() {
                let names: Vec<&str> = layout.slots.iter().map(|s| s.name.as_str()).collect();
                block.push_str(&format!("\n  slots: {}", names.join(", ")));
            }
            if !layout.anchors.is_empty() {
                let names: Vec<&str> = layout.anchors.iter().map(|a| a.name.as_str()).collect();
                block.push_str(&format!("\n  anchors: {}", names.join(", ")));
            }

            let rule = rules.for_layout(&layout.name);
            if !rule.rules.is_empty() {
                block.push_str("\n  rules:");
                for (key, instruction) in &rule.rules {
                    block.push_str(&format!("\n    * {}: {}", key, instruction));
                }
            }

            blocks.push(block);
        }
        blocks.join("\n\n")
    }
}
