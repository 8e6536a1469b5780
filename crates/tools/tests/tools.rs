use async_trait::async_trait;
use copilot_tools::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

struct EchoTransport {
    requests: Mutex<Vec<TransportRequest>>,
}

#[async_trait]
impl Transport for EchoTransport {
    async fn send(&self, request: &TransportRequest) -> AttemptOutcome {
        self.requests.lock().push(request.clone());
        AttemptOutcome::Ok(json!({"files": ["src/a.ts", "src/b.ts"], "echo": request.body}))
    }
}

fn setup() -> (Arc<EchoTransport>, ToolRegistry, ToolContext) {
    let transport = Arc::new(EchoTransport {
        requests: Mutex::new(Vec::new()),
    });
    let dispatcher = Arc::new(WorkspaceDispatcher::with_transport(
        transport.clone(),
        RetryPolicy::default(),
    ));
    let ctx = ToolContext::new(WorkspaceEndpoint::new("http://devbox.test", "tok"));
    (transport, ToolRegistry::with_codebase_tools(dispatcher), ctx)
}

#[tokio::test]
async fn test_find_files_tool_summarizes() {
    let (transport, registry, ctx) = setup();

    let result = registry
        .execute(
            "codebase_find_files",
            &ctx,
            json!({"dir": "src/", "suffixes": ["ts"], "exclude_dirs": null}),
        )
        .await;

    assert_eq!(
        result.to_json(),
        json!({
            "success": true,
            "message": "Found 2 files matching criteria",
            "files": ["src/a.ts", "src/b.ts"]
        })
    );
    assert_eq!(
        transport.requests.lock()[0].body,
        Some(json!({"dir": "src/", "suffixes": ["ts"]}))
    );
}

#[tokio::test]
async fn test_editor_tool_sends_multi_view() {
    let (transport, registry, ctx) = setup();

    let result = registry
        .execute(
            "codebase_editor_command",
            &ctx,
            json!({"command": "view", "paths": ["a.ts", "b.ts"], "view_range": [1, -1]}),
        )
        .await;

    assert!(result.is_success());
    let request = transport.requests.lock()[0].clone();
    assert_eq!(request.url, "http://devbox.test/api/editor/command");
    assert_eq!(
        request.body,
        Some(json!({"command": "view", "paths": ["a.ts", "b.ts"], "view_range": [1, -1]}))
    );
}

#[tokio::test]
async fn test_editor_tool_rejects_unknown_command() {
    let (transport, registry, ctx) = setup();

    let result = registry
        .execute(
            "codebase_editor_command",
            &ctx,
            json!({"command": "delete", "path": "a.ts"}),
        )
        .await;

    assert!(result
        .error()
        .unwrap()
        .starts_with("Invalid arguments for codebase_editor_command"));
    assert!(transport.requests.lock().is_empty());
}

#[tokio::test]
async fn test_npm_script_tool_routes_by_script() {
    let (transport, registry, ctx) = setup();

    let result = registry
        .execute("codebase_npm_script", &ctx, json!({"script": "format"}))
        .await;

    assert!(result.is_success());
    let request = transport.requests.lock()[0].clone();
    assert_eq!(request.url, "http://devbox.test/api/editor/format");
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_npm_script_tool_rejects_other_scripts() {
    let (transport, registry, ctx) = setup();

    let result = registry
        .execute("codebase_npm_script", &ctx, json!({"script": "build"}))
        .await;

    assert!(!result.is_success());
    assert!(transport.requests.lock().is_empty());
}

#[tokio::test]
async fn test_tool_without_credential() {
    let (transport, registry, _) = setup();
    let ctx = ToolContext::new(WorkspaceEndpoint::new("http://devbox.test", ""));

    let result = registry
        .execute("codebase_npm_script", &ctx, json!({"script": "lint"}))
        .await;

    assert_eq!(result.error(), Some("Missing configuration"));
    assert!(transport.requests.lock().is_empty());
}
