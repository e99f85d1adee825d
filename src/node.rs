//! Node adapter for graph and pipeline frameworks.

use crate::config::ExecutionOptions;
use crate::executor::Executor;
use crate::protocol::{ExecutionInput, ExecutionResult};
use crate::Result;

/// A pipeline node that forwards each invocation to an [`Executor`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessNode {
    executor: Executor,
}

impl HeadlessNode {
    /// Wrap an existing executor.
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Create a node from the public options object.
    pub fn from_options(options: ExecutionOptions) -> Result<Self> {
        Executor::from_options(options).map(Self::new)
    }

    /// Run one input through the wrapped executor.
    pub async fn invoke(&self, input: &ExecutionInput) -> Result<ExecutionResult> {
        self.executor.execute(input).await
    }

    /// Get a reference to the wrapped executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl From<Executor> for HeadlessNode {
    fn from(executor: Executor) -> Self {
        Self::new(executor)
    }
}
