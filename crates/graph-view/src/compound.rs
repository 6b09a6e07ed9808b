//! Commands made of several repository operations
//!
//! A [`CompoundOperation`] holds its steps as unstarted futures and runs them
//! in order under one of two policies:
//!
//! - [`FailurePolicy::ShortCircuit`]: stop at the first failure. Steps after
//!   it are never polled and do not appear in the result.
//! - [`FailurePolicy::RunAll`]: run every step and report every outcome.
//!
//! The result is one [`ErrorInfo`] per attempted step, in attempt order.
//!
//! ```rust,ignore
//! let errors = CompoundOperation::short_circuit()
//!     .step(source.add_tag(repo, "v1", hash, TagType::Lightweight, "", false))
//!     .step(source.push_tag(repo, "v1", "origin", hash, false))
//!     .execute()
//!     .await;
//! ```

use graph_view_backend::ErrorInfo;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    ShortCircuit,
    RunAll,
}

type Step<'a> = Pin<Box<dyn Future<Output = ErrorInfo> + Send + 'a>>;

pub struct CompoundOperation<'a> {
    policy: FailurePolicy,
    steps: Vec<Step<'a>>,
}

impl<'a> CompoundOperation<'a> {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            steps: Vec::new(),
        }
    }

    pub fn short_circuit() -> Self {
        Self::new(FailurePolicy::ShortCircuit)
    }

    pub fn run_all() -> Self {
        Self::new(FailurePolicy::RunAll)
    }

    /// Append a step. The future is not polled until its turn comes.
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: Future<Output = ErrorInfo> + Send + 'a,
    {
        self.steps.push(Box::pin(step));
        self
    }

    /// Append a step only when `condition` holds
    pub fn step_if<F>(self, condition: bool, step: F) -> Self
    where
        F: Future<Output = ErrorInfo> + Send + 'a,
    {
        if condition {
            self.step(step)
        } else {
            self
        }
    }

    /// Append one step per item
    pub fn steps<I, F>(self, steps: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = ErrorInfo> + Send + 'a,
    {
        steps.into_iter().fold(self, |op, step| op.step(step))
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub async fn execute(self) -> Vec<ErrorInfo> {
        let mut errors = Vec::with_capacity(self.steps.len());
        for step in self.steps {
            let outcome = step.await;
            let failed = outcome.is_some();
            errors.push(outcome);
            if failed && self.policy == FailurePolicy::ShortCircuit {
                break;
            }
        }
        errors
    }
}
