//! Typed commands accepted by the remote workspace service and their wire
//! bodies.

use crate::error::ToolError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const FIND_FILES_ROUTE: &str = "/api/editor/find-files";
pub const EDITOR_COMMAND_ROUTE: &str = "/api/editor/command";

/// Search for files under `dir` whose extension is one of `suffixes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindFilesRequest {
    pub dir: String,
    pub suffixes: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude_dirs: Vec<String>,
}

impl FindFilesRequest {
    pub fn new(dir: impl Into<String>, suffixes: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            suffixes,
            exclude_dirs: Vec::new(),
        }
    }

    pub fn excluding(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorCommandKind {
    View,
    Create,
    StrReplace,
    Insert,
    UndoEdit,
}

impl EditorCommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorCommandKind::View => "view",
            EditorCommandKind::Create => "create",
            EditorCommandKind::StrReplace => "str_replace",
            EditorCommandKind::Insert => "insert",
            EditorCommandKind::UndoEdit => "undo_edit",
        }
    }
}

impl fmt::Display for EditorCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive line window for `view`. An `end` of `-1` reads to end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct ViewRange {
    pub start: i64,
    pub end: i64,
}

impl ViewRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn to_end(start: i64) -> Self {
        Self { start, end: -1 }
    }
}

impl From<(i64, i64)> for ViewRange {
    fn from((start, end): (i64, i64)) -> Self {
        Self { start, end }
    }
}

impl From<ViewRange> for (i64, i64) {
    fn from(range: ViewRange) -> Self {
        (range.start, range.end)
    }
}

/// One editor operation against the workspace file system.
///
/// Which of `path` / `paths` must be present depends on `command`; see
/// [`crate::validation::validate_editor_command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorCommand {
    pub command: EditorCommandKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paths: Vec<String>,
    #[serde(default)]
    pub file_text: Option<String>,
    /// 1-based line after which `new_str` is inserted.
    #[serde(default)]
    pub insert_line: Option<u32>,
    #[serde(default)]
    pub new_str: Option<String>,
    #[serde(default)]
    pub old_str: Option<String>,
    #[serde(default)]
    pub view_range: Option<ViewRange>,
}

impl EditorCommand {
    fn bare(command: EditorCommandKind, path: Option<String>) -> Self {
        Self {
            command,
            path,
            paths: Vec::new(),
            file_text: None,
            insert_line: None,
            new_str: None,
            old_str: None,
            view_range: None,
        }
    }

    pub fn view(path: impl Into<String>) -> Self {
        Self::bare(EditorCommandKind::View, Some(path.into()))
    }

    pub fn view_many(paths: Vec<String>) -> Self {
        Self {
            paths,
            ..Self::bare(EditorCommandKind::View, None)
        }
    }

    pub fn create(path: impl Into<String>, file_text: impl Into<String>) -> Self {
        Self {
            file_text: Some(file_text.into()),
            ..Self::bare(EditorCommandKind::Create, Some(path.into()))
        }
    }

    pub fn str_replace(
        path: impl Into<String>,
        old_str: impl Into<String>,
        new_str: impl Into<String>,
    ) -> Self {
        Self {
            old_str: Some(old_str.into()),
            new_str: Some(new_str.into()),
            ..Self::bare(EditorCommandKind::StrReplace, Some(path.into()))
        }
    }

    pub fn insert(path: impl Into<String>, insert_line: u32, new_str: impl Into<String>) -> Self {
        Self {
            insert_line: Some(insert_line),
            new_str: Some(new_str.into()),
            ..Self::bare(EditorCommandKind::Insert, Some(path.into()))
        }
    }

    pub fn undo_edit(path: impl Into<String>) -> Self {
        Self::bare(EditorCommandKind::UndoEdit, Some(path.into()))
    }

    pub fn with_view_range(mut self, range: ViewRange) -> Self {
        self.view_range = Some(range);
        self
    }

    /// `path` if it is present and non-empty.
    pub fn single_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Lint,
    Format,
}

impl Script {
    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Lint => "lint",
            Script::Format => "format",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of commands the dispatcher can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    FindFiles(FindFilesRequest),
    Editor(EditorCommand),
    RunScript(Script),
}

impl CommandRequest {
    pub fn route(&self) -> String {
        match self {
            CommandRequest::FindFiles(_) => FIND_FILES_ROUTE.to_string(),
            CommandRequest::Editor(_) => EDITOR_COMMAND_ROUTE.to_string(),
            CommandRequest::RunScript(script) => format!("/api/editor/{}", script),
        }
    }

    /// JSON body to POST, if the command carries one.
    ///
    /// Assumes the request already passed validation: a `view` with a
    /// non-empty `paths` sends `paths`, every other editor command sends
    /// `path`.
    pub fn body(&self) -> Result<Option<Value>, ToolError> {
        let body = match self {
            CommandRequest::FindFiles(request) => Some(encode(request)?),
            CommandRequest::Editor(command) => Some(encode(&EditorBody::from_command(command))?),
            CommandRequest::RunScript(_) => None,
        };
        Ok(body)
    }
}

/// Wire shape of an editor command. View-only and edit-only fields never
/// travel together.
#[derive(Serialize)]
struct EditorBody<'a> {
    command: EditorCommandKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view_range: Option<ViewRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insert_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_str: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_str: Option<&'a str>,
}

impl<'a> EditorBody<'a> {
    fn from_command(command: &'a EditorCommand) -> Self {
        match command.command {
            EditorCommandKind::View => {
                let (path, paths) = if command.paths.is_empty() {
                    (command.path.as_deref(), None)
                } else {
                    (None, Some(command.paths.as_slice()))
                };
                Self {
                    command: command.command,
                    path,
                    paths,
                    view_range: command.view_range,
                    file_text: None,
                    insert_line: None,
                    new_str: None,
                    old_str: None,
                }
            }
            EditorCommandKind::Create
            | EditorCommandKind::StrReplace
            | EditorCommandKind::Insert
            | EditorCommandKind::UndoEdit => Self {
                command: command.command,
                path: command.path.as_deref(),
                paths: None,
                view_range: None,
                file_text: command.file_text.as_deref(),
                insert_line: command.insert_line,
                new_str: command.new_str.as_deref(),
                old_str: command.old_str.as_deref(),
            },
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::Validation(format!("Failed to encode request body: {}", e)))
}

/// Model-generated arguments often send `null` for an omitted list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
