use crate::codebase_tools::{EditorCommandTool, FindFilesTool, NpmScriptTool};
use crate::dispatcher::WorkspaceDispatcher;
use crate::error::ToolError;
use crate::result::CommandResult;
use crate::traits::{Tool, ToolContext};
use std::collections::HashMap;
use std::sync::Arc;

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding the three codebase tools, all sharing `dispatcher`.
    pub fn with_codebase_tools(dispatcher: Arc<WorkspaceDispatcher>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FindFilesTool::new(dispatcher.clone())));
        registry.register(Arc::new(EditorCommandTool::new(dispatcher.clone())));
        registry.register(Arc::new(NpmScriptTool::new(dispatcher)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// OpenAI-style function schemas, sorted by tool name.
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.list()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.schema()
                    }
                })
            })
            .collect()
    }

    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: serde_json::Value,
    ) -> CommandResult {
        match self.get(name) {
            Some(tool) => tool.execute(ctx, args).await,
            None => ToolError::Validation(format!("Tool not found: {}", name)).into(),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::WorkspaceEndpoint;
    use crate::retry::RetryPolicy;

    fn registry() -> ToolRegistry {
        ToolRegistry::with_codebase_tools(Arc::new(WorkspaceDispatcher::new(
            RetryPolicy::default(),
        )))
    }

    #[test]
    fn test_codebase_tools_registered() {
        assert_eq!(
            registry().list(),
            vec![
                "codebase_editor_command",
                "codebase_find_files",
                "codebase_npm_script"
            ]
        );
    }

    #[test]
    fn test_schemas_are_function_shaped() {
        let schemas = registry().schemas();
        assert_eq!(schemas.len(), 3);
        for schema in &schemas {
            assert_eq!(schema["type"], "function");
            assert_eq!(schema["function"]["parameters"]["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_without_panicking() {
        let ctx = ToolContext::new(WorkspaceEndpoint::new("http://devbox.test", "tok"));
        let result = registry()
            .execute("shell_exec", &ctx, serde_json::json!({}))
            .await;
        assert_eq!(result.error(), Some("Tool not found: shell_exec"));
    }
}
