//! Rendering engine
//!
//! Fills slots and draws components for every slide of an accepted plan.
//! Failure isolation is the organizing rule here: a bad layout index aborts
//! only that slide, an unresolved slot or anchor is logged and skipped, and a
//! component that cannot be drawn is replaced in place by an error marker.
//! The run as a whole always produces a deck.

pub mod component;
pub mod writer;

pub use component::{draw_component, draw_error_marker, sanitize_number, ComponentError};
pub use writer::write_text;

use thiserror::Error;

use crate::document::{Presentation, Slide};
use crate::plan::{DeckPlan, SlidePlan};
use crate::resolve::{canonical_slot_name, match_field, resolve_anchor};
use crate::template::{LayoutKind, TemplateGuide};

/// Errors that abort a single slide
#[derive(Debug, Error)]
pub enum RenderError {
    /// The plan referenced a layout the template does not have; a contract
    /// violation by the generation collaborator
    #[error("layout index {index} not found in template")]
    LayoutNotFound { index: usize },
}

/// Render an accepted plan against a template
///
/// Returns a new deck: the template's layouts and original slides, plus one
/// appended slide per renderable plan entry. The template itself is never
/// mutated. Slides that fail are logged and skipped.
pub fn render_deck(template: &Presentation, guide: &TemplateGuide, plan: &DeckPlan) -> Presentation {
    let mut deck = template.clone();
    for (position, slide_plan) in plan.slides.iter().enumerate() {
        if let Err(error) = render_slide(&mut deck, guide, slide_plan) {
            tracing::warn!(slide = position, %error, "skipping slide");
        }
    }
    deck
}

/// Render one plan entry onto a freshly appended slide
pub fn render_slide(
    deck: &mut Presentation,
    guide: &TemplateGuide,
    plan: &SlidePlan,
) -> Result<(), RenderError> {
    let index = plan.layout_index;
    let layout = deck
        .layout(index)
        .map_err(|_| RenderError::LayoutNotFound { index })?
        .clone();
    let descriptor = guide
        .layout(index)
        .ok_or(RenderError::LayoutNotFound { index })?;

    let mut slide = Slide {
        layout_index: index,
        placeholders: layout.placeholders.clone(),
        shapes: Vec::new(),
    };

    // Slot fills apply to every slide, static or dynamic
    for placeholder in &mut slide.placeholders {
        let canonical = canonical_slot_name(placeholder, &layout).to_string();
        match match_field(&canonical, placeholder.role, &plan.common_fields) {
            Some(value) => {
                let value = value.to_string();
                write_text(&mut placeholder.text, &value);
            }
            None => {
                tracing::debug!(slot = %canonical, "no plan field for slot, leaving as authored");
            }
        }
    }

    // Free-draw components only make sense on dynamic layouts
    if plan.kind == LayoutKind::Dynamic {
        for spec in &plan.components {
            let position = spec.position();
            let Some(anchor) = resolve_anchor(position, &descriptor.anchors) else {
                tracing::warn!(%position, "anchor not found, component skipped");
                continue;
            };
            if let Err(error) = draw_component(&mut slide.shapes, &anchor.name, anchor.bounds, spec)
            {
                tracing::warn!(%position, %error, "component failed, drawing error marker");
                draw_error_marker(
                    &mut slide.shapes,
                    &anchor.name,
                    anchor.bounds,
                    &error.to_string(),
                );
            }
        }
    }

    deck.slides.push(slide);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        Bounds, FontProps, Paragraph, Placeholder, PlaceholderRole, Run, Shape, ShapeKind,
        SlideLayout, TextFrame,
    };
    use crate::plan::ComponentSpec;
    use crate::template::{scan, TemplateRules};
    use std::collections::BTreeMap;

    fn styled_title_placeholder() -> Placeholder {
        Placeholder {
            idx: 0,
            name: "Title".to_string(),
            role: PlaceholderRole::Title,
            text: TextFrame {
                paragraphs: vec![Paragraph {
                    runs: vec![Run {
                        text: "Click to add title".to_string(),
                        font: FontProps {
                            name: None,
                            size: Some(18.0),
                            bold: Some(true),
                            color: None,
                        },
                    }],
                }],
            },
        }
    }

    fn test_template() -> Presentation {
        Presentation {
            layouts: vec![
                SlideLayout {
                    name: "Title_Slide".to_string(),
                    placeholders: vec![styled_title_placeholder()],
                    shapes: vec![],
                },
                SlideLayout {
                    name: "Dynamic_Split".to_string(),
                    placeholders: vec![],
                    shapes: vec![
                        Shape {
                            name: "Guide_Left".to_string(),
                            bounds: Bounds::new(0.5, 1.5, 4.3, 5.0),
                            kind: ShapeKind::Other,
                        },
                        Shape {
                            name: "Guide_Right".to_string(),
                            bounds: Bounds::new(5.2, 1.5, 4.3, 5.0),
                            kind: ShapeKind::Other,
                        },
                    ],
                },
            ],
            slides: vec![],
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_static_slot_fill_preserves_style() {
        // Scenario: plan fills the Title slot of a static layout
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 0,
                kind: LayoutKind::Static,
                common_fields: fields(&[("Title", "Q4 Report")]),
                components: vec![],
            }],
        };

        let deck = render_deck(&template, &guide, &plan);
        assert_eq!(deck.slides.len(), 1);
        let title = &deck.slides[0].placeholders[0];
        assert_eq!(title.text.text(), "Q4 Report");
        let run = title.text.first_run().expect("run");
        assert_eq!(run.font.size, Some(18.0));
        assert_eq!(run.font.bold, Some(true));
    }

    #[test]
    fn test_table_drawn_at_anchor_bounds() {
        // Scenario: 2x2 table lands at Guide_Left's bounds
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 1,
                kind: LayoutKind::Dynamic,
                common_fields: BTreeMap::new(),
                components: vec![ComponentSpec::Table {
                    position: "Guide_Left".to_string(),
                    rows: vec![
                        vec!["A".to_string(), "B".to_string()],
                        vec!["1".to_string(), "2".to_string()],
                    ],
                    style: None,
                    font_size: None,
                }],
            }],
        };

        let deck = render_deck(&template, &guide, &plan);
        let slide = &deck.slides[0];
        assert_eq!(slide.shapes.len(), 1);
        assert_eq!(slide.shapes[0].bounds, Bounds::new(0.5, 1.5, 4.3, 5.0));
        match &slide.shapes[0].kind {
            ShapeKind::Table { table } => {
                assert_eq!(table.cells.len(), 2);
                assert_eq!(table.cells[0].len(), 2);
            }
            other => panic!("Expected Table, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_anchor_skips_component() {
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 1,
                kind: LayoutKind::Dynamic,
                common_fields: BTreeMap::new(),
                components: vec![
                    ComponentSpec::Text {
                        position: "Guide_Nowhere".to_string(),
                        content: "lost".to_string(),
                    },
                    ComponentSpec::Text {
                        position: "Guide_Right".to_string(),
                        content: "found".to_string(),
                    },
                ],
            }],
        };

        let deck = render_deck(&template, &guide, &plan);
        let slide = &deck.slides[0];
        // Only the resolvable component is drawn; the other is skipped, not fatal
        assert_eq!(slide.shapes.len(), 1);
        assert_eq!(slide.shapes[0].name, "Guide_Right");
    }

    #[test]
    fn test_failed_component_leaves_marker_and_siblings_render() {
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 1,
                kind: LayoutKind::Dynamic,
                common_fields: BTreeMap::new(),
                components: vec![
                    ComponentSpec::Table {
                        position: "Guide_Left".to_string(),
                        rows: vec![],
                        style: None,
                        font_size: None,
                    },
                    ComponentSpec::Text {
                        position: "Guide_Right".to_string(),
                        content: "still here".to_string(),
                    },
                ],
            }],
        };

        let deck = render_deck(&template, &guide, &plan);
        let slide = &deck.slides[0];
        assert_eq!(slide.shapes.len(), 2);
        match &slide.shapes[0].kind {
            ShapeKind::TextBox { frame } => {
                assert!(frame.text().starts_with("[Component Error]"));
            }
            other => panic!("Expected error marker, got {:?}", other),
        }
        assert_eq!(slide.shapes[0].bounds, Bounds::new(0.5, 1.5, 4.3, 5.0));
        assert_eq!(slide.shapes[1].name, "Guide_Right");
    }

    #[test]
    fn test_bad_layout_index_skips_only_that_slide() {
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![
                SlidePlan {
                    layout_index: 99,
                    kind: LayoutKind::Static,
                    common_fields: BTreeMap::new(),
                    components: vec![],
                },
                SlidePlan {
                    layout_index: 0,
                    kind: LayoutKind::Static,
                    common_fields: fields(&[("Title", "Survivor")]),
                    components: vec![],
                },
            ],
        };

        let deck = render_deck(&template, &guide, &plan);
        assert_eq!(deck.slides.len(), 1);
        assert_eq!(deck.slides[0].placeholders[0].text.text(), "Survivor");
    }

    #[test]
    fn test_template_is_not_mutated() {
        let template = test_template();
        let before = template.clone();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 0,
                kind: LayoutKind::Static,
                common_fields: fields(&[("Title", "New")]),
                components: vec![],
            }],
        };

        let _deck = render_deck(&template, &guide, &plan);
        assert_eq!(template, before);
    }

    #[test]
    fn test_unmatched_slot_left_as_authored() {
        let template = test_template();
        let guide = scan(&template, &TemplateRules::default());
        let plan = DeckPlan {
            slides: vec![SlidePlan {
                layout_index: 0,
                kind: LayoutKind::Static,
                common_fields: fields(&[("speaker_notes", "irrelevant")]),
                components: vec![],
            }],
        };

        let deck = render_deck(&template, &guide, &plan);
        assert_eq!(
            deck.slides[0].placeholders[0].text.text(),
            "Click to add title"
        );
    }
}
