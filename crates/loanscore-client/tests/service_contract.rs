use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use loanscore_client::{
    ApiClient, ClientConfig, ClientError, LoginEncoding, MemoryTokenStore, ModelKind,
    RegisterRequest, SessionGuard,
};
use loanscore_model::{FeatureVector, RiskLabel};
use serde_json::json;
use tiny_http::{Response, Server, StatusCode};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    url: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// Serve the scripted `(status, body)` responses in order, then stop.
fn spawn_scripted_server(script: Vec<(u16, &'static str)>) -> (String, Log, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let base = format!("http://{}", server.server_addr());
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = Arc::clone(&log);
    let handle = thread::spawn(move || {
        for (status, body) in script {
            let mut req = match server.recv_timeout(Duration::from_secs(5)) {
                Ok(Some(req)) => req,
                Ok(None) | Err(_) => break,
            };
            let header = |name: &str| {
                req.headers()
                    .iter()
                    .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let authorization = header("Authorization");
            let content_type = header("Content-Type");
            let mut text = String::new();
            let _ = req.as_reader().read_to_string(&mut text);
            log_clone.lock().expect("log lock").push(Recorded {
                method: req.method().to_string(),
                url: req.url().to_string(),
                authorization,
                content_type,
                body: text,
            });
            let _ = req.respond(Response::from_string(body).with_status_code(StatusCode(status)));
        }
    });
    (base, log, handle)
}

fn client(base: &str, session: SessionGuard) -> ApiClient {
    let config = ClientConfig::default()
        .with_base_url(base)
        .with_timeout(Duration::from_secs(5));
    ApiClient::new(config, session).expect("client")
}

fn logged_in(token: &str) -> SessionGuard {
    SessionGuard::new(Arc::new(MemoryTokenStore::with_token(token)))
}

fn sample_vector() -> FeatureVector {
    let mut values = [0.0; 13];
    values[0] = -0.95;
    values[11] = 1.337;
    FeatureVector::new(values)
}

fn requests(log: &Log) -> Vec<Recorded> {
    log.lock().expect("log lock").clone()
}

#[test]
fn score_posts_bare_array_with_bearer_token() {
    let (base, log, handle) =
        spawn_scripted_server(vec![(200, r#"{"prediction": [1], "status": "success", "user": "lan"}"#)]);
    let api = client(&base, logged_in("tok-1"));

    let result = api.score(&sample_vector()).expect("score");
    handle.join().expect("server thread");

    assert_eq!(result.label, RiskLabel::LowRisk);
    assert!(!result.defaulted);
    assert_eq!(result.raw["user"], "lan");

    let seen = requests(&log);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "/predict");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok-1"));
    let body: Vec<f64> = serde_json::from_str(&seen[0].body).expect("array body");
    assert_eq!(body.len(), 13);
    assert_eq!(body[11], 1.337);
}

#[test]
fn score_without_token_sends_nothing() {
    let api = client("http://127.0.0.1:9", SessionGuard::in_memory());
    let err = api.score(&sample_vector()).expect_err("must refuse");
    assert!(matches!(err, ClientError::Unauthenticated));
}

#[test]
fn score_401_clears_session() {
    let (base, _log, handle) = spawn_scripted_server(vec![(401, r#"{"detail": "Token has expired"}"#)]);
    let session = logged_in("stale");
    let api = client(&base, session.clone());

    let err = api.score(&sample_vector()).expect_err("expired");
    handle.join().expect("server thread");

    assert!(err.is_auth_expired());
    assert!(!session.is_authenticated());
}

#[test]
fn score_server_error_keeps_session() {
    let (base, _log, handle) = spawn_scripted_server(vec![(
        400,
        r#"{"detail": "Credit score must be between 300 and 850"}"#,
    )]);
    let session = logged_in("tok");
    let api = client(&base, session.clone());

    let err = api.score(&sample_vector()).expect_err("rejected");
    handle.join().expect("server thread");

    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail.as_deref(), Some("Credit score must be between 300 and 850"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(session.is_authenticated());
}

#[test]
fn score_success_with_unusable_body() {
    let (base, _log, handle) = spawn_scripted_server(vec![(200, "<html>oops</html>"), (200, "{}")]);
    let api = client(&base, logged_in("tok"));

    let err = api.score(&sample_vector()).expect_err("not json");
    assert!(matches!(err, ClientError::MalformedResponse(_)));

    let result = api.score(&sample_vector()).expect("empty object is tolerated");
    handle.join().expect("server thread");
    assert_eq!(result.label, RiskLabel::HighRisk);
    assert!(result.defaulted);
}

#[test]
fn login_json_stores_token() {
    let (base, log, handle) =
        spawn_scripted_server(vec![(200, r#"{"access_token": "fresh", "token_type": "bearer"}"#)]);
    let session = SessionGuard::in_memory();
    let api = client(&base, session.clone());

    let token = api.login("lan", "secret").expect("login");
    handle.join().expect("server thread");

    assert_eq!(token.access_token, "fresh");
    assert_eq!(session.require_auth().expect("token"), "fresh");
    let seen = requests(&log);
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body, json!({"username": "lan", "password": "secret"}));
}

#[test]
fn login_form_encoding() {
    let (base, log, handle) = spawn_scripted_server(vec![(200, r#"{"access_token": "fresh"}"#)]);
    let config = ClientConfig::default()
        .with_base_url(&base)
        .with_login_encoding(LoginEncoding::Form);
    let api = ApiClient::new(config, SessionGuard::in_memory()).expect("client");

    api.login("lan", "p@ss word").expect("login");
    handle.join().expect("server thread");

    let seen = requests(&log);
    assert_eq!(
        seen[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(seen[0].body, "username=lan&password=p%40ss+word");
}

#[test]
fn login_rejected_is_api_error() {
    let (base, _log, handle) =
        spawn_scripted_server(vec![(401, r#"{"detail": "Incorrect username or password"}"#)]);
    let session = SessionGuard::in_memory();
    let api = client(&base, session.clone());

    let err = api.login("lan", "wrong").expect_err("rejected");
    handle.join().expect("server thread");

    assert_eq!(err.status(), Some(401));
    assert!(!err.is_auth_expired());
    assert_eq!(err.user_message(), "Incorrect username or password");
    assert!(!session.is_authenticated());
}

#[test]
fn logout_clears_even_when_server_fails() {
    let (base, log, handle) = spawn_scripted_server(vec![(500, "boom")]);
    let session = logged_in("tok");
    let api = client(&base, session.clone());

    let acknowledged = api.logout().expect("logout");
    handle.join().expect("server thread");

    assert!(!acknowledged);
    assert!(!session.is_authenticated());
    assert_eq!(requests(&log)[0].authorization.as_deref(), Some("Bearer tok"));
}

#[test]
fn register_and_me() {
    let profile = r#"{"id": 3, "username": "lan", "email": "lan@example.com",
        "full_name": "Lan Nguyen", "is_active": true,
        "created_at": "2025-01-02T03:04:05", "role": "staff"}"#;
    let (base, log, handle) = spawn_scripted_server(vec![(201, profile), (200, profile)]);
    let session = logged_in("tok");
    let api = client(&base, session.clone());

    let created = api
        .register(&RegisterRequest {
            username: "lan".to_string(),
            email: "lan@example.com".to_string(),
            password: "secret".to_string(),
            full_name: Some("Lan Nguyen".to_string()),
        })
        .expect("register");
    assert_eq!(created.id, 3);

    let me = api.me().expect("me");
    handle.join().expect("server thread");

    assert_eq!(me.full_name.as_deref(), Some("Lan Nguyen"));
    assert_eq!(session.role().as_deref(), Some("staff"));
    let seen = requests(&log);
    assert_eq!(seen[0].url, "/register");
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[1].method, "GET");
    assert_eq!(seen[1].url, "/users/me");
}

#[test]
fn me_without_role_keeps_stored_role() {
    let (base, _log, handle) = spawn_scripted_server(vec![(
        200,
        r#"{"id": 3, "username": "lan", "email": "lan@example.com",
            "created_at": "2025-01-02T03:04:05"}"#,
    )]);
    let session = logged_in("tok");
    session.record_role(Some("admin")).expect("record role");
    let api = client(&base, session.clone());

    let me = api.me().expect("me");
    handle.join().expect("server thread");

    assert_eq!(me.role, None);
    assert_eq!(session.role().as_deref(), Some("admin"));
}

#[test]
fn evaluate_posts_rows_with_bearer_token() {
    let (base, log, handle) = spawn_scripted_server(vec![(
        200,
        r#"{"xgboost": {"accuracy": 0.9}, "random_forest": {"accuracy": 0.93},
            "logistic_regression": {"accuracy": 0.8}}"#,
    )]);
    let api = client(&base, logged_in("tok-eval"));

    let rows = vec![json!({"person_age": "30", "loan_status": "1"})];
    let report = api.evaluate(&rows).expect("evaluate");
    handle.join().expect("server thread");

    assert_eq!(report.best_model(), ModelKind::RandomForest);
    let seen = requests(&log);
    assert_eq!(seen[0].url, "/evaluate");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok-eval"));
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(body, json!([{"person_age": "30", "loan_status": "1"}]));
}

#[test]
fn evaluate_without_token_sends_nothing() {
    let (base, log, handle) = spawn_scripted_server(vec![(200, "{}")]);
    let api = client(&base, SessionGuard::in_memory());

    let rows = vec![json!({"person_age": "30"})];
    let err = api.evaluate(&rows).expect_err("must refuse");
    handle.join().expect("server thread");

    assert!(matches!(err, ClientError::Unauthenticated));
    assert!(requests(&log).is_empty());
}

#[test]
fn evaluate_401_clears_session() {
    let (base, _log, handle) =
        spawn_scripted_server(vec![(401, r#"{"detail": "Token has expired"}"#)]);
    let session = logged_in("stale");
    let api = client(&base, session.clone());

    let err = api
        .evaluate(&[json!({"person_age": "30"})])
        .expect_err("expired");
    handle.join().expect("server thread");

    assert!(err.is_auth_expired());
    assert!(!session.is_authenticated());
}

#[test]
fn unreachable_service_is_network_error() {
    let api = client("http://127.0.0.1:9", logged_in("tok"));
    let err = api.health().expect_err("nothing listens on port 9");
    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.is_retryable());
}
