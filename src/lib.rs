//! Deckwright - template-driven slide deck assembly for AI agents
//!
//! This library turns a machine-authored content plan into a finished deck by
//! filling a pre-built template. Content generation and quality review are
//! delegated to external collaborators behind the [`Planner`] and
//! [`Reviewer`] traits; the crate owns everything in between: template
//! introspection, slot/anchor resolution, the bounded plan/review retry loop,
//! and defensive rendering of text, tables, and charts.
//!
//! # Example
//!
//! ```rust
//! use deckwright::{generate, CollaboratorError, Planner, Reviewer};
//! use deckwright::document::Presentation;
//! use deckwright::plan::{DeckPlan, PlanRequest, ReviewRequest, SlidePlan, Verdict};
//! use deckwright::template::LayoutKind;
//!
//! struct OneSlide;
//!
//! impl Planner for OneSlide {
//!     fn generate(&mut self, _request: PlanRequest<'_>) -> Result<DeckPlan, CollaboratorError> {
//!         Ok(DeckPlan {
//!             slides: vec![SlidePlan {
//!                 layout_index: 0,
//!                 kind: LayoutKind::Static,
//!                 common_fields: [("Title".to_string(), "Q4 Report".to_string())].into(),
//!                 components: vec![],
//!             }],
//!         })
//!     }
//! }
//!
//! struct Lenient;
//!
//! impl Reviewer for Lenient {
//!     fn review(&mut self, _request: ReviewRequest<'_>) -> Result<Verdict, CollaboratorError> {
//!         Ok(Verdict { pass: true, feedback: "Good".to_string() })
//!     }
//! }
//!
//! let template = Presentation::from_json(r#"{
//!     "layouts": [{
//!         "name": "Title_Slide",
//!         "placeholders": [{"idx": 0, "name": "Title", "role": "title"}]
//!     }],
//!     "slides": []
//! }"#).unwrap();
//!
//! let report = generate(&template, "quarterly results", OneSlide, Lenient).unwrap();
//! assert_eq!(report.deck.slides.len(), 1);
//! ```

pub mod document;
pub mod orchestrator;
pub mod plan;
pub mod render;
pub mod resolve;
pub mod template;

pub use document::{DocumentError, Presentation};
pub use orchestrator::{
    CancelToken, CollaboratorError, Orchestrator, PipelineError, Planner, Reviewer, RunReport,
    Stage,
};
pub use plan::{ComponentSpec, DeckPlan, ReviewState, ReviewStatus, SlidePlan, Verdict};
pub use render::{render_deck, RenderError};
pub use template::{scan, TemplateGuide, TemplateRules};

/// Run the whole pipeline with default rules and retry budget
///
/// Convenience wrapper over [`Orchestrator`]; use the builder methods there
/// for custom rules, retry budgets, or cancellation.
pub fn generate<P: Planner, R: Reviewer>(
    template: &Presentation,
    instruction: &str,
    planner: P,
    reviewer: R,
) -> Result<RunReport, PipelineError> {
    Orchestrator::new(planner, reviewer).run(template, instruction, &CancelToken::new())
}
