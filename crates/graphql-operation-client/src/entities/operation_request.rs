use super::{ExecutionOptionValues, ExecutionOptions, MutableExecutionOptions, Operation};

/// An operation bound to its per-request options.
///
/// Created for one logical call, configured, then consumed by the client.
#[derive(Debug, Clone)]
pub struct OperationRequest<O> {
    pub operation: O,
    options: ExecutionOptionValues,
}

impl<O: Operation> OperationRequest<O> {
    pub fn new(operation: O) -> Self {
        Self {
            operation,
            options: ExecutionOptionValues::new(),
        }
    }

    pub fn with_options(mut self, options: ExecutionOptionValues) -> Self {
        self.options = options;
        self
    }

    pub fn into_parts(self) -> (O, ExecutionOptionValues) {
        (self.operation, self.options)
    }
}

impl<O> ExecutionOptions for OperationRequest<O> {
    fn execution_options(&self) -> &ExecutionOptionValues {
        &self.options
    }
}

impl<O> MutableExecutionOptions for OperationRequest<O> {
    fn execution_options_mut(&mut self) -> &mut ExecutionOptionValues {
        &mut self.options
    }
}
