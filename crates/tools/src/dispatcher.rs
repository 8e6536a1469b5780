use crate::command::{CommandRequest, EditorCommand, FindFilesRequest, Script};
use crate::endpoint::WorkspaceEndpoint;
use crate::error::ToolError;
use crate::result::CommandResult;
use crate::retry::{AttemptSink, RetryPolicy, TracingSink};
use crate::transport::{HttpTransport, Transport, TransportRequest};
use crate::validation::validate;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Sends validated commands to a workspace and normalizes the answer.
///
/// Holds no per-call state, so one dispatcher can serve any number of
/// concurrent callers and endpoints.
#[derive(Clone)]
pub struct WorkspaceDispatcher {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn AttemptSink>,
    policy: RetryPolicy,
}

impl WorkspaceDispatcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()), policy)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sink: Arc::new(TracingSink),
            policy,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AttemptSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// List files under a directory by extension.
    ///
    /// A successful answer carrying a `files` list is summarized as
    /// `"Found <n> files matching criteria"`. Anything else, including an
    /// answer marked `"success": false`, comes back untouched.
    pub async fn find_files(
        &self,
        endpoint: &WorkspaceEndpoint,
        request: FindFilesRequest,
    ) -> CommandResult {
        match self.send(endpoint, &CommandRequest::FindFiles(request)).await {
            Ok(payload) => summarize_found_files(CommandResult::Success(payload)),
            Err(err) => err.into(),
        }
    }

    pub async fn editor_command(
        &self,
        endpoint: &WorkspaceEndpoint,
        command: EditorCommand,
    ) -> CommandResult {
        self.send(endpoint, &CommandRequest::Editor(command))
            .await
            .into()
    }

    pub async fn run_script(&self, endpoint: &WorkspaceEndpoint, script: Script) -> CommandResult {
        self.send(endpoint, &CommandRequest::RunScript(script))
            .await
            .into()
    }

    /// Route any command to its operation.
    pub async fn dispatch(
        &self,
        endpoint: &WorkspaceEndpoint,
        request: CommandRequest,
    ) -> CommandResult {
        match request {
            CommandRequest::FindFiles(find) => self.find_files(endpoint, find).await,
            CommandRequest::Editor(command) => self.editor_command(endpoint, command).await,
            CommandRequest::RunScript(script) => self.run_script(endpoint, script).await,
        }
    }

    async fn send(
        &self,
        endpoint: &WorkspaceEndpoint,
        request: &CommandRequest,
    ) -> Result<Value, ToolError> {
        if let Err(err) = validate(endpoint, request) {
            warn!("Rejected {} before sending: {}", request.route(), err);
            return Err(err);
        }

        let url = endpoint.url_for(&request.route());
        info!("Dispatching workspace command to {}", url);

        let transport_request = TransportRequest::post(url, endpoint.token())
            .with_body(request.body()?);
        self.policy
            .execute(self.transport.as_ref(), self.sink.as_ref(), transport_request)
            .await
    }
}

fn summarize_found_files(result: CommandResult) -> CommandResult {
    if !result.is_success() {
        return result;
    }
    let files = match result.payload().and_then(|p| p.get("files")).and_then(Value::as_array) {
        Some(files) => files.clone(),
        None => return result,
    };
    CommandResult::Success(json!({
        "message": format!("Found {} files matching criteria", files.len()),
        "files": files,
    }))
}
