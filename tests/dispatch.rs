//! Integration tests for the command dispatcher
//!
//! Every test drives the dispatcher with a stub transport and a credential
//! store in a temporary directory, so nothing touches the network or the
//! user's real configuration.

use reqwest::Method;
use serde_json::{json, Value};
use tempfile::TempDir;

use trello_cli::app::{ApiRequest, Envelope, ErrorCode, RawResponse, StubTransport, Transport};
use trello_cli::auth::{CredentialResolver, CredentialStore, Credentials};
use trello_cli::cli::{Dispatcher, Invocation, COMMANDS};
use trello_cli::errors::ApiResult;

/// Test fixture owning the temporary config directory
struct Fixture {
    _dir: TempDir,
    dispatcher: Dispatcher<StubTransport>,
}

impl Fixture {
    fn new(stub: StubTransport, persisted: Option<Credentials>, env: Option<Credentials>) -> Self {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("config.json"));
        if let Some(credentials) = persisted {
            store.save(&credentials).unwrap();
        }
        Self {
            _dir: dir,
            dispatcher: Dispatcher::new(stub, CredentialResolver::new(store, env)),
        }
    }

    /// Authenticated through the credential file
    fn authed(stub: StubTransport) -> Self {
        Self::new(stub, Some(Credentials::new("file-key", "file-token")), None)
    }

    fn unauthed() -> Self {
        Self::new(StubTransport::new(), None, None)
    }

    async fn run(&self, args: &[&str]) -> Envelope<Value> {
        self.dispatcher
            .dispatch(&Invocation::parse(args.iter().copied()))
            .await
    }

    fn stub(&self) -> &StubTransport {
        self.dispatcher.transport().unwrap()
    }

    fn resolve(&self) -> Option<Credentials> {
        self.dispatcher.resolver().unwrap().resolve()
    }
}

fn parsed(envelope: &Envelope<Value>) -> Value {
    serde_json::from_str(&envelope.to_json_line()).unwrap()
}

#[tokio::test]
async fn test_missing_positional_never_calls_transport() {
    let fixture = Fixture::authed(StubTransport::new());

    for spec in COMMANDS.iter().filter(|spec| !spec.positionals.is_empty()) {
        let envelope = fixture.run(&[spec.name]).await;

        assert!(!envelope.is_ok(), "{} should fail", spec.name);
        assert_eq!(
            envelope.error_code(),
            Some(ErrorCode::MissingParam),
            "{}",
            spec.name
        );
        let expected = format!("{} required", spec.positionals[0].label);
        assert_eq!(envelope.error(), Some(expected.as_str()));
    }

    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_second_positional_missing() {
    let fixture = Fixture::authed(StubTransport::new());

    let envelope = fixture.run(&["create-card", "list-1"]).await;
    assert_eq!(envelope.error(), Some("Card name required"));
    assert_eq!(envelope.error_code(), Some(ErrorCode::MissingParam));
    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_auth_gate_runs_before_any_request() {
    let fixture = Fixture::unauthed();

    for spec in COMMANDS.iter().filter(|spec| spec.command.is_authenticated()) {
        let envelope = fixture.run(&[spec.name, "a", "b", "complete"]).await;
        assert_eq!(
            envelope.error_code(),
            Some(ErrorCode::AuthError),
            "{}",
            spec.name
        );
    }

    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_auth_gate_precedes_parameter_validation() {
    let fixture = Fixture::unauthed();

    let envelope = fixture.run(&["get-card"]).await;
    assert_eq!(envelope.error_code(), Some(ErrorCode::AuthError));
    assert!(envelope.error().unwrap().contains("set-auth"));
}

#[tokio::test]
async fn test_persisted_credentials_win_over_environment() {
    let stub = StubTransport::new().respond_json(json!({"id": "m1", "username": "ada"}));
    let fixture = Fixture::new(
        stub,
        Some(Credentials::new("file-key", "file-token")),
        Some(Credentials::new("env-key", "env-token")),
    );

    let envelope = fixture.run(&["check-auth"]).await;
    assert!(envelope.is_ok());

    let request = &fixture.stub().requests()[0];
    assert_eq!(request.query_value("key"), Some("file-key"));
    assert_eq!(request.query_value("token"), Some("file-token"));
}

#[tokio::test]
async fn test_environment_credentials_used_without_file() {
    let stub = StubTransport::new().respond_json(json!([]));
    let fixture = Fixture::new(stub, None, Some(Credentials::new("env-key", "env-token")));

    let envelope = fixture.run(&["get-boards"]).await;
    assert!(envelope.is_ok());
    assert_eq!(envelope.data(), Some(&json!([])));

    let request = &fixture.stub().requests()[0];
    assert_eq!(request.path(), "/members/me/boards");
    assert_eq!(request.query_value("key"), Some("env-key"));
}

#[tokio::test]
async fn test_set_auth_then_clear_twice() {
    let fixture = Fixture::unauthed();

    let saved = fixture.run(&["set-auth", "k", "t"]).await;
    assert!(saved.is_ok());
    let message = saved.data().unwrap()["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Auth saved to "));
    assert!(message.ends_with("config.json"));
    assert_eq!(fixture.resolve(), Some(Credentials::new("k", "t")));

    for _ in 0..2 {
        let cleared = fixture.run(&["--clear-auth"]).await;
        assert!(cleared.is_ok());
        assert_eq!(cleared.data(), Some(&json!({"message": "Auth cleared"})));
    }

    assert_eq!(fixture.resolve(), None);
    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_set_auth_requires_both_values() {
    let fixture = Fixture::unauthed();

    let envelope = fixture.run(&["set-auth", "k"]).await;
    assert_eq!(envelope.error(), Some("Token required"));
    assert_eq!(envelope.error_code(), Some(ErrorCode::MissingParam));
}

#[tokio::test]
async fn test_invalid_checklist_state() {
    let fixture = Fixture::authed(StubTransport::new());

    let envelope = fixture
        .run(&["update-checklist-item", "c1", "i1", "done"])
        .await;

    assert_eq!(envelope.error_code(), Some(ErrorCode::InvalidParam));
    assert_eq!(
        envelope.error(),
        Some("State must be 'complete' or 'incomplete'")
    );
    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_checklist_state_is_case_insensitive() {
    let stub = StubTransport::new().respond_json(json!({"id": "i1", "state": "complete"}));
    let fixture = Fixture::authed(stub);

    let envelope = fixture
        .run(&["update-checklist-item", "c1", "i1", "COMPLETE"])
        .await;
    assert!(envelope.is_ok());

    let request = &fixture.stub().requests()[0];
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path(), "/cards/c1/checkItem/i1");
    assert_eq!(request.query_value("state"), Some("complete"));
}

#[tokio::test]
async fn test_create_card_success() {
    let stub = StubTransport::new().respond_json(json!({
        "id": "card-9",
        "name": "Write docs",
        "idList": "list-1"
    }));
    let fixture = Fixture::authed(stub);

    let envelope = fixture
        .run(&["create-card", "list-1", "Write docs", "--desc", "Details"])
        .await;

    let value = parsed(&envelope);
    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["data"]["id"], json!("card-9"));
    assert!(value.get("error").is_none());
    assert!(value.get("errorCode").is_none());

    let request = &fixture.stub().requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path(), "/cards");
    assert_eq!(request.form_value("idList"), Some("list-1"));
    assert_eq!(request.form_value("name"), Some("Write docs"));
    assert_eq!(request.form_value("desc"), Some("Details"));
    assert_eq!(request.form_value("due"), None);
}

#[tokio::test]
async fn test_create_card_null_body() {
    let fixture = Fixture::authed(StubTransport::new().respond(200, "null"));

    let envelope = fixture.run(&["create-card", "list-1", "Task"]).await;
    assert_eq!(envelope.error_code(), Some(ErrorCode::CreateFailed));
}

#[tokio::test]
async fn test_update_card_without_fields() {
    let fixture = Fixture::authed(StubTransport::new());

    let envelope = fixture.run(&["update-card", "c1"]).await;
    assert_eq!(envelope.error_code(), Some(ErrorCode::NoParams));
    assert_eq!(envelope.error(), Some("No update parameters provided"));
    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_update_card_empty_desc_clears_field() {
    let fixture = Fixture::authed(StubTransport::new().respond_json(json!({"id": "c1"})));

    let envelope = fixture.run(&["update-card", "c1", "--desc", ""]).await;
    assert!(envelope.is_ok());

    let request = &fixture.stub().requests()[0];
    assert_eq!(request.form_value("desc"), Some(""));
    assert_eq!(request.form_value("name"), None);
}

#[tokio::test]
async fn test_move_card_sends_only_list() {
    let fixture = Fixture::authed(StubTransport::new().respond_json(json!({"id": "c1"})));

    let envelope = fixture.run(&["move-card", "c1", "list-2"]).await;
    assert!(envelope.is_ok());

    let requests = fixture.stub().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].path(), "/cards/c1");
    assert_eq!(
        requests[0].form_fields(),
        &[("idList".to_string(), "list-2".to_string())]
    );
}

#[tokio::test]
async fn test_not_found_shape() {
    let fixture = Fixture::authed(StubTransport::new().respond(404, "The requested resource was not found."));

    let envelope = fixture.run(&["get-card", "nonexistent"]).await;

    assert_eq!(
        envelope.to_json_line(),
        r#"{"ok":false,"error":"Card not found","errorCode":"NOT_FOUND"}"#
    );
}

#[tokio::test]
async fn test_unauthorized_and_network_failures() {
    let stub = StubTransport::new()
        .respond(401, "invalid token")
        .fail_with("connection refused");
    let fixture = Fixture::authed(stub);

    let unauthorized = fixture.run(&["get-boards"]).await;
    assert_eq!(unauthorized.error_code(), Some(ErrorCode::Unauthorized));

    let network = fixture.run(&["get-boards"]).await;
    assert_eq!(network.error_code(), Some(ErrorCode::HttpError));
    assert!(network.error().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_delete_returns_true() {
    let fixture = Fixture::authed(StubTransport::new().respond(200, r#"{"_value":null}"#));

    let envelope = fixture.run(&["delete-checklist-item", "cl1", "i1"]).await;
    assert_eq!(envelope.data(), Some(&json!(true)));
    assert_eq!(
        fixture.stub().requests()[0].path(),
        "/checklists/cl1/checkItems/i1"
    );
}

#[tokio::test]
async fn test_upload_missing_file() {
    let fixture = Fixture::authed(StubTransport::new());

    let envelope = fixture
        .run(&["upload-attachment", "c1", "/definitely/not/here.txt"])
        .await;
    assert_eq!(envelope.error_code(), Some(ErrorCode::FileNotFound));
    assert_eq!(fixture.stub().call_count(), 0);
}

#[tokio::test]
async fn test_unknown_command() {
    let fixture = Fixture::unauthed();

    let envelope = fixture.run(&["--frobnicate"]).await;
    assert_eq!(envelope.error(), Some("Unknown command: --frobnicate"));
    assert_eq!(envelope.error_code(), Some(ErrorCode::UnknownCommand));
}

#[tokio::test]
async fn test_empty_invocation_shows_help() {
    let fixture = Fixture::unauthed();

    let envelope = fixture.dispatcher.dispatch(&Invocation::default()).await;
    assert!(envelope.is_ok());
    assert_eq!(envelope.data().unwrap()["name"], json!("trello-cli"));
}

#[tokio::test]
async fn test_version_without_credentials() {
    let fixture = Fixture::unauthed();

    let envelope = fixture.run(&["-v"]).await;
    let data = envelope.data().unwrap();
    assert_eq!(data["name"], json!("trello-cli"));
    assert_eq!(data["version"], json!(env!("CARGO_PKG_VERSION")));
}

/// Transport whose every send panics
struct PanickingTransport;

impl Transport for PanickingTransport {
    async fn send(&self, _request: ApiRequest) -> ApiResult<RawResponse> {
        panic!("transport exploded")
    }
}

#[tokio::test]
async fn test_panic_becomes_error_envelope() {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("config.json"));
    let resolver = CredentialResolver::new(store, Some(Credentials::new("k", "t")));
    let dispatcher = Dispatcher::new(PanickingTransport, resolver);

    let envelope = dispatcher
        .dispatch(&Invocation::parse(["get-card", "c1"]))
        .await;

    let value = parsed(&envelope);
    assert_eq!(value["ok"], json!(false));
    assert_eq!(value["errorCode"], json!("ERROR"));
    assert_eq!(value["error"], json!("transport exploded"));
}

#[tokio::test]
async fn test_unavailable_transport_only_blocks_remote_commands() {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("config.json"));
    let resolver = CredentialResolver::new(store, Some(Credentials::new("k", "t")));
    let dispatcher: Dispatcher<StubTransport> = Dispatcher::from_parts(
        Err("Invalid settings file settings.toml".to_string()),
        Ok(resolver),
    );

    let local: [&[&str]; 4] = [&["help"], &["version"], &["set-auth", "k2", "t2"], &["clear-auth"]];
    for args in local {
        let envelope = dispatcher.dispatch(&Invocation::parse(args.iter().copied())).await;
        assert!(envelope.is_ok(), "{:?}", args);
    }

    let remote = dispatcher
        .dispatch(&Invocation::parse(["get-card", "c1"]))
        .await;
    assert_eq!(remote.error_code(), Some(ErrorCode::Error));
    assert_eq!(remote.error(), Some("Invalid settings file settings.toml"));

    // Argument checks still run first
    let missing = dispatcher.dispatch(&Invocation::parse(["get-card"])).await;
    assert_eq!(missing.error_code(), Some(ErrorCode::MissingParam));
}

#[tokio::test]
async fn test_unavailable_credential_store() {
    let dispatcher = Dispatcher::from_parts(
        Ok(StubTransport::new()),
        Err("Could not determine the home directory".to_string()),
    );

    let help = dispatcher.dispatch(&Invocation::parse(["help"])).await;
    assert!(help.is_ok());

    let saved = dispatcher
        .dispatch(&Invocation::parse(["set-auth", "k", "t"]))
        .await;
    assert_eq!(saved.error_code(), Some(ErrorCode::SaveError));

    let cleared = dispatcher.dispatch(&Invocation::parse(["clear-auth"])).await;
    assert_eq!(cleared.error_code(), Some(ErrorCode::ClearError));

    let remote = dispatcher
        .dispatch(&Invocation::parse(["get-boards"]))
        .await;
    assert_eq!(remote.error_code(), Some(ErrorCode::AuthError));
    assert_eq!(dispatcher.transport().unwrap().call_count(), 0);
}
