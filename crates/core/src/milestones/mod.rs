//! Milestones module - percentage thresholds with derived achievement state.

mod milestones_evaluation;
mod milestones_model;
mod milestones_service;
mod milestones_traits;


pub use milestones_evaluation::{
    create_default_milestones_in_tx, evaluate_on_edit, evaluate_on_increase, EvaluationOutcome,
};
pub use milestones_model::{Milestone, NewMilestone};
pub use milestones_service::MilestoneService;
pub use milestones_traits::{MilestoneRepositoryTrait, MilestoneServiceTrait};
