//! The local NLP engine: deterministic, offline, total.

pub mod classifier;
pub mod convert;
pub mod mathexpr;
pub mod patterns;
pub mod response;
pub mod wordmath;

pub use classifier::Classifier;
pub use convert::{FixedRate, RateSource};
pub use response::{Action, ActionKind, ClassifiedResponse};
