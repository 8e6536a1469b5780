//! Model-facing wrappers around the workspace dispatcher.

use crate::command::{EditorCommand, FindFilesRequest, Script};
use crate::dispatcher::WorkspaceDispatcher;
use crate::error::ToolError;
use crate::result::CommandResult;
use crate::traits::{Tool, ToolContext};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

fn decode_args<T: DeserializeOwned>(tool: &str, args: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(args)
        .map_err(|e| ToolError::Validation(format!("Invalid arguments for {}: {}", tool, e)))
}

pub struct FindFilesTool {
    dispatcher: Arc<WorkspaceDispatcher>,
}

impl FindFilesTool {
    pub fn new(dispatcher: Arc<WorkspaceDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for FindFilesTool {
    fn name(&self) -> &str {
        "codebase_find_files"
    }

    fn description(&self) -> &str {
        "Find files in the project matching specific suffixes and excluding directories."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "dir": {
                    "type": "string",
                    "description": "Directory path to search from (relative to project root, e.g., 'project/src/')."
                },
                "suffixes": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "description": "File extensions to search for (e.g., ['ts', 'tsx', 'js'])."
                },
                "exclude_dirs": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Directories to exclude (e.g., ['node_modules', 'dist'])."
                }
            },
            "required": ["dir", "suffixes"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: serde_json::Value) -> CommandResult {
        match decode_args::<FindFilesRequest>(self.name(), args) {
            Ok(request) => self.dispatcher.find_files(&ctx.endpoint, request).await,
            Err(err) => err.into(),
        }
    }
}

pub struct EditorCommandTool {
    dispatcher: Arc<WorkspaceDispatcher>,
}

impl EditorCommandTool {
    pub fn new(dispatcher: Arc<WorkspaceDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for EditorCommandTool {
    fn name(&self) -> &str {
        "codebase_editor_command"
    }

    fn description(&self) -> &str {
        "Send an editor command (view, create, str_replace, insert, undo_edit) to the backend for file operations."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": ["view", "create", "str_replace", "insert", "undo_edit"],
                    "description": "The editor command to execute."
                },
                "path": {
                    "type": "string",
                    "description": "The file path to operate on (relative to project root). Required for non-view commands and single-file view."
                },
                "paths": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "An array of file paths to view (for multi-file view operations only)."
                },
                "file_text": {
                    "type": "string",
                    "description": "The file content for create operations."
                },
                "insert_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "The line number for insert operations (1-based)."
                },
                "new_str": {
                    "type": "string",
                    "description": "The new string for insert or str_replace operations."
                },
                "old_str": {
                    "type": "string",
                    "description": "The old string to be replaced in str_replace operations."
                },
                "view_range": {
                    "type": "array",
                    "items": {"type": "integer"},
                    "minItems": 2,
                    "maxItems": 2,
                    "description": "The line range to view (e.g., [1, 10] or [5, -1] for all lines from 5). Applied to all files in a multi-file view."
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: serde_json::Value) -> CommandResult {
        match decode_args::<EditorCommand>(self.name(), args) {
            Ok(command) => self.dispatcher.editor_command(&ctx.endpoint, command).await,
            Err(err) => err.into(),
        }
    }
}

#[derive(Deserialize)]
struct NpmScriptArgs {
    script: Script,
}

pub struct NpmScriptTool {
    dispatcher: Arc<WorkspaceDispatcher>,
}

impl NpmScriptTool {
    pub fn new(dispatcher: Arc<WorkspaceDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for NpmScriptTool {
    fn name(&self) -> &str {
        "codebase_npm_script"
    }

    fn description(&self) -> &str {
        "Run npm scripts (lint or format) in the project root and return their output."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "script": {
                    "type": "string",
                    "enum": ["lint", "format"],
                    "description": "The npm script to run: 'lint' or 'format'."
                }
            },
            "required": ["script"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: serde_json::Value) -> CommandResult {
        match decode_args::<NpmScriptArgs>(self.name(), args) {
            Ok(args) => self.dispatcher.run_script(&ctx.endpoint, args.script).await,
            Err(err) => err.into(),
        }
    }
}
