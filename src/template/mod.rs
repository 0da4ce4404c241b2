//! Template introspection and the layout-rules registry
//!
//! A template is a read-only [`Presentation`](crate::document::Presentation)
//! whose layouts define what may be filled (slots) and where free-form
//! components may be drawn (anchors). [`scan`] extracts that map once per
//! template load; [`TemplateRules`] supplies the naming conventions and the
//! authoring guidance shown to the generation collaborator.

pub mod guide;
pub mod rules;

pub use guide::{
    scan, AnchorDescriptor, LayoutDescriptor, LayoutKind, SlotDescriptor, TemplateGuide,
};
pub use rules::{Conventions, LayoutRule, RulesError, TemplateRules};
