use crate::endpoint::WorkspaceEndpoint;
use crate::result::CommandResult;
use async_trait::async_trait;

/// Per-call context handed to a tool by the agent runtime.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub endpoint: WorkspaceEndpoint,
}

impl ToolContext {
    pub fn new(endpoint: WorkspaceEndpoint) -> Self {
        Self { endpoint }
    }
}

/// A model-callable tool. Failures are reported inside the returned
/// `CommandResult`, never by panicking or erroring out of the agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;

    async fn execute(&self, ctx: &ToolContext, args: serde_json::Value) -> CommandResult;
}
