//! Generation pipeline state machine
//!
//! Scan -> Plan -> Review -> {Plan (retry) | Render}. Scan runs once per
//! template; the Plan/Review cycle is the only loop and the only retry
//! mechanism in the system, bounded by `max_retries`. Once the budget is
//! exhausted the review is forced to pass and the last-generated plan is
//! rendered as-is: termination never depends on the external reviewer
//! behaving.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::document::{DocumentError, Presentation};
use crate::plan::{DeckPlan, PlanRequest, ReviewRequest, ReviewState, ReviewStatus, Verdict};
use crate::render::render_deck;
use crate::template::{scan, TemplateRules};

/// A failed call to an external collaborator
#[derive(Debug, Error)]
#[error("collaborator call failed: {0}")]
pub struct CollaboratorError(pub String);

/// The content-generation collaborator
///
/// Blocking request/response; each call replaces the whole plan. Retries
/// carry the latest reviewer feedback and the rejected plan for reference.
pub trait Planner {
    fn generate(&mut self, request: PlanRequest<'_>) -> Result<DeckPlan, CollaboratorError>;
}

/// The quality-review collaborator
///
/// Blocking request/response; the verdict's feedback is opaque advisory text.
pub trait Reviewer {
    fn review(&mut self, request: ReviewRequest<'_>) -> Result<Verdict, CollaboratorError>;
}

/// Pipeline stages, for cancellation reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Plan,
    Review,
    Render,
}

/// Errors that abort a whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Template(#[from] DocumentError),

    #[error("plan generation failed: {0}")]
    Plan(#[source] CollaboratorError),

    #[error("review failed: {0}")]
    Review(#[source] CollaboratorError),

    #[error("run cancelled before {stage:?}")]
    Cancelled { stage: Stage },
}

/// Cooperative cancellation flag, checked between state transitions
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Everything a finished run produces
#[derive(Debug)]
pub struct RunReport {
    /// The template plus the newly rendered slides
    pub deck: Presentation,
    /// The accepted (or force-accepted) plan
    pub plan: DeckPlan,
    pub review: ReviewState,
    /// How many times the planner was invoked
    pub plan_attempts: u32,
}

/// Drives one template through scan, plan, review, and render
pub struct Orchestrator<P, R> {
    planner: P,
    reviewer: R,
    rules: TemplateRules,
    max_retries: u32,
}

impl<P: Planner, R: Reviewer> Orchestrator<P, R> {
    pub fn new(planner: P, reviewer: R) -> Self {
        Self {
            planner,
            reviewer,
            rules: TemplateRules::default(),
            max_retries: 3,
        }
    }

    /// Use a custom rules registry
    pub fn with_rules(mut self, rules: TemplateRules) -> Self {
        self.rules = rules;
        self
    }

    /// Change the review retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Open a template file and run the whole pipeline against it
    ///
    /// The template is read once and held for the entire run; it is only
    /// ever read, never written back.
    pub fn run_file(
        &mut self,
        template_path: &Path,
        instruction: &str,
        cancel: &CancelToken,
    ) -> Result<RunReport, PipelineError> {
        let template = Presentation::open(template_path)?;
        self.run(&template, instruction, cancel)
    }

    /// Run the whole pipeline against a loaded template
    pub fn run(
        &mut self,
        template: &Presentation,
        instruction: &str,
        cancel: &CancelToken,
    ) -> Result<RunReport, PipelineError> {
        check_cancelled(cancel, Stage::Scan)?;
        let guide = scan(template, &self.rules);
        let details = guide.details(&self.rules);

        let mut review = ReviewState::new();
        let mut prior_plan: Option<DeckPlan> = None;
        let mut plan_attempts = 0u32;

        let plan = loop {
            check_cancelled(cancel, Stage::Plan)?;
            tracing::debug!(attempt = plan_attempts + 1, "generating plan");
            let plan = self
                .planner
                .generate(PlanRequest {
                    guide: &details,
                    instruction,
                    feedback: (review.retry_count > 0).then_some(review.feedback.as_str()),
                    prior_plan: prior_plan.as_ref(),
                })
                .map_err(PipelineError::Plan)?;
            plan_attempts += 1;

            check_cancelled(cancel, Stage::Review)?;
            if review.retry_count >= self.max_retries {
                tracing::warn!(
                    retries = review.retry_count,
                    "retry budget exhausted, forcing pass"
                );
                review.status = ReviewStatus::ForcedPass;
                break plan;
            }

            let verdict = self
                .reviewer
                .review(ReviewRequest {
                    rules: &details,
                    plan: &plan,
                })
                .map_err(PipelineError::Review)?;
            review.feedback = verdict.feedback;

            if verdict.pass {
                review.status = ReviewStatus::Pass;
                break plan;
            }

            review.status = ReviewStatus::Fail;
            review.retry_count += 1;
            tracing::debug!(
                retry = review.retry_count,
                feedback = %review.feedback,
                "review failed, regenerating plan"
            );
            prior_plan = Some(plan);
        };

        check_cancelled(cancel, Stage::Render)?;
        let deck = render_deck(template, &guide, &plan);

        Ok(RunReport {
            deck,
            plan,
            review,
            plan_attempts,
        })
    }
}

fn check_cancelled(cancel: &CancelToken, stage: Stage) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled { stage })
    } else {
        Ok(())
    }
}
