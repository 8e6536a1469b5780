//! Structural checks run before any network call.

use crate::command::{CommandRequest, EditorCommand, EditorCommandKind, FindFilesRequest};
use crate::endpoint::WorkspaceEndpoint;
use crate::error::{ToolError, MISSING_CONFIGURATION, MISSING_ENDPOINT};

/// Validate a command against the endpoint it is about to be sent to.
pub fn validate(endpoint: &WorkspaceEndpoint, request: &CommandRequest) -> Result<(), ToolError> {
    validate_endpoint(endpoint)?;
    match request {
        CommandRequest::FindFiles(find) => validate_find_files(find),
        CommandRequest::Editor(command) => validate_editor_command(command),
        CommandRequest::RunScript(_) => Ok(()),
    }
}

pub fn validate_endpoint(endpoint: &WorkspaceEndpoint) -> Result<(), ToolError> {
    if !endpoint.has_base_url() {
        return Err(ToolError::Configuration(MISSING_ENDPOINT.to_string()));
    }
    if !endpoint.has_token() {
        return Err(ToolError::Configuration(MISSING_CONFIGURATION.to_string()));
    }
    Ok(())
}

/// `exclude_dirs` entries are forwarded as-is; the workspace service owns
/// path interpretation.
pub fn validate_find_files(request: &FindFilesRequest) -> Result<(), ToolError> {
    if request.dir.trim().is_empty() {
        return Err(ToolError::Validation(
            "'dir' must be a non-empty directory path.".to_string(),
        ));
    }
    if request.suffixes.is_empty() {
        return Err(ToolError::Validation(
            "'suffixes' must contain at least one file extension.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_editor_command(command: &EditorCommand) -> Result<(), ToolError> {
    let has_path = command.single_path().is_some();
    let has_paths = !command.paths.is_empty();

    match command.command {
        EditorCommandKind::View => {
            if !has_path && !has_paths {
                return Err(ToolError::Validation(
                    "For 'view' command, either 'path' (for single file) or a non-empty 'paths' array (for multiple files) must be provided."
                        .to_string(),
                ));
            }
            if has_path && has_paths {
                return Err(ToolError::Validation(
                    "For 'view' command, provide either 'path' or 'paths', not both.".to_string(),
                ));
            }
        }
        kind => {
            if !has_path {
                return Err(ToolError::Validation(format!(
                    "'path' is required for command '{}'.",
                    kind
                )));
            }
            if has_paths {
                return Err(ToolError::Validation(format!(
                    "'paths' should not be provided for command '{}'.",
                    kind
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Script;

    fn endpoint() -> WorkspaceEndpoint {
        WorkspaceEndpoint::new("https://devbox.example", "tok")
    }

    #[test]
    fn test_missing_base_url() {
        let err = validate(
            &WorkspaceEndpoint::new("", "tok"),
            &CommandRequest::RunScript(Script::Lint),
        )
        .unwrap_err();
        assert_eq!(err, ToolError::Configuration(MISSING_ENDPOINT.into()));
    }

    #[test]
    fn test_missing_token() {
        let err = validate(
            &WorkspaceEndpoint::new("https://devbox.example", " "),
            &CommandRequest::RunScript(Script::Lint),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing configuration");
    }

    #[test]
    fn test_view_needs_a_target() {
        let mut command = EditorCommand::view("");
        command.path = None;
        let err = validate_editor_command(&command).unwrap_err();
        assert!(err.to_string().contains("either 'path'"));
    }

    #[test]
    fn test_view_rejects_path_and_paths() {
        let mut command = EditorCommand::view("a.ts");
        command.paths = vec!["b.ts".into()];
        let err = validate_editor_command(&command).unwrap_err();
        assert!(err
            .to_string()
            .contains("provide either 'path' or 'paths', not both"));
    }

    #[test]
    fn test_view_with_empty_paths_and_path_is_fine() {
        assert!(validate_editor_command(&EditorCommand::view("a.ts")).is_ok());
        assert!(validate_editor_command(&EditorCommand::view_many(vec!["a.ts".into()])).is_ok());
    }

    #[test]
    fn test_edit_requires_path() {
        let mut command = EditorCommand::create("a.ts", "text");
        command.path = None;
        let err = validate_editor_command(&command).unwrap_err();
        assert_eq!(err.to_string(), "'path' is required for command 'create'.");
    }

    #[test]
    fn test_edit_rejects_paths() {
        let mut command = EditorCommand::undo_edit("a.ts");
        command.paths = vec!["b.ts".into()];
        let err = validate_editor_command(&command).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'paths' should not be provided for command 'undo_edit'."
        );
    }

    #[test]
    fn test_find_files_requires_suffixes() {
        let request = FindFilesRequest::new("src", vec![]);
        let err = validate(&endpoint(), &CommandRequest::FindFiles(request)).unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[test]
    fn test_endpoint_checked_before_command() {
        let mut command = EditorCommand::view("a.ts");
        command.paths = vec!["b.ts".into()];
        let err = validate(
            &WorkspaceEndpoint::new("https://devbox.example", ""),
            &CommandRequest::Editor(command),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
    }
}
