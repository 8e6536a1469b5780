//! Resilient remote-command tools for a project workspace service.
//!
//! Commands are validated locally, POSTed to the workspace over HTTP with a
//! bounded immediate-retry loop, and always come back as a uniform
//! [`CommandResult`].

pub mod codebase_tools;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod registry;
pub mod result;
pub mod retry;
pub mod traits;
pub mod transport;
pub mod validation;

pub use command::{
    CommandRequest, EditorCommand, EditorCommandKind, FindFilesRequest, Script, ViewRange,
};
pub use config::ToolConfig;
pub use dispatcher::WorkspaceDispatcher;
pub use endpoint::WorkspaceEndpoint;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use result::CommandResult;
pub use retry::{AttemptEvent, AttemptSink, AttemptStatus, RetryPolicy, TracingSink};
pub use traits::{Tool, ToolContext};
pub use transport::{AttemptOutcome, HttpMethod, HttpTransport, Transport, TransportRequest};
