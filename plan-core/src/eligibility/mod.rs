//! Eligibility matching: derived facts, criterion evaluation, conditional
//! CTAs and stack assembly.

pub mod cta;
pub mod evaluator;
pub mod facts;
pub mod stack;

pub use cta::resolve_conditional_cta;
pub use evaluator::{EvaluationContext, evaluate};
pub use facts::{DerivedFacts, matches_user_type};
pub use stack::{assemble, build_stack};
