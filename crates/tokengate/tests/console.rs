//! Integration tests for the console.
//!
//! Most tests script a mock transport and check what the user would see:
//! the active view, the panel of each view, alerts and the token fields.
//! The last section runs the whole stack over HTTP against an axum stub
//! of the session service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokengate::prelude::*;
use tokengate::tokengate_present::ValueKind;
use tokengate::tokengate_session::{TOKEN_KEY, TokenPhase};
use tokengate::tokengate_transport::{RawResponse, Request, TransportError};

const TOKEN: &str = "1700000000000_123456789012";
const OTHER: &str = "1700000000999_999999999999";

// =========================================================================
// Mocks
// =========================================================================

#[derive(Default)]
struct MockState {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<Request>>,
}

#[derive(Clone, Default)]
struct MockTransport(Arc<MockState>);

impl MockTransport {
    fn reply(&self, status: u16, body: &str) -> &Self {
        self.0
            .script
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    fn fail(&self, err: TransportError) -> &Self {
        self.0.script.lock().unwrap().push_back(Err(err));
        self
    }

    fn calls(&self) -> usize {
        self.0.sent.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        self.0.sent.lock().unwrap().push(request);
        self.0
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock transport ran out of scripted replies")
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn console(
    transport: &MockTransport,
    store: MemoryStore,
    confirm: bool,
) -> Console<MockTransport, MemoryStore, AutoConfirm> {
    TokengateBuilder::new()
        .redirect_delay_ms(0)
        .build_with_transport(transport.clone(), store, AutoConfirm(confirm))
}

fn logged_in() -> MemoryStore {
    MemoryStore::with_session(TOKEN, "ana@example.com")
}

fn granted() -> String {
    r#"{"mensaje": "Acceso permitido"}"#.to_string()
}

fn done(panel: Panel) -> Render {
    panel.render().cloned().expect("panel should hold a finished render")
}

// =========================================================================
// Start-up
// =========================================================================

#[tokio::test]
async fn test_start_valid_cached_token_fills_forms() {
    let transport = MockTransport::default();
    transport.reply(200, &granted());
    let console = console(&transport, logged_in(), true);

    let result = console.start().await.unwrap();

    assert!(result.unwrap().trusted);
    let forms = console.forms().await;
    assert_eq!(forms.validate_token, TOKEN);
    assert_eq!(forms.logout_token, TOKEN);
    assert_eq!(console.guard().phase().await, TokenPhase::Trusted);
}

#[tokio::test]
async fn test_start_expired_token_empties_forms_and_store() {
    let transport = MockTransport::default();
    transport.reply(401, r#"{"error": "Token expirado"}"#);
    let console = console(&transport, logged_in(), true);

    let result = console.start().await.unwrap();

    assert_eq!(result.unwrap().reason.as_deref(), Some("Token expirado"));
    assert_eq!(console.forms().await, Forms::default());
    assert!(console.guard().store().get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_start_unreachable_service_keeps_forms() {
    let transport = MockTransport::default();
    transport.fail(TransportError::Timeout);
    let console = console(&transport, logged_in(), true);

    assert!(console.start().await.is_err());
    assert_eq!(console.forms().await.validate_token, TOKEN);
    assert_eq!(console.guard().token().await.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_start_without_session_sends_nothing() {
    let transport = MockTransport::default();
    let console = console(&transport, MemoryStore::new(), true);

    assert_eq!(console.start().await.unwrap(), None);
    assert_eq!(transport.calls(), 0);
}

// =========================================================================
// Admin view
// =========================================================================

#[tokio::test]
async fn test_switch_view_admin_without_session_alerts_and_stays() {
    let transport = MockTransport::default();
    let console = console(&transport, MemoryStore::new(), true);

    assert!(!console.switch_view(View::Admin).await);

    assert_eq!(console.active_view().await, View::Login);
    assert_eq!(transport.calls(), 0);
    let alerts = console.take_alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("No hay sesión activa"));
    assert!(console.take_alerts().await.is_empty());
}

#[tokio::test]
async fn test_switch_view_admin_granted_shows_valid_card() {
    let transport = MockTransport::default();
    transport.reply(200, &granted());
    let console = console(&transport, logged_in(), true);

    assert!(console.switch_view(View::Admin).await);

    assert_eq!(console.active_view().await, View::Admin);
    let render = done(console.panel(View::Admin).await);
    assert_eq!(render.severity, Severity::Success);
    assert_eq!(render.status, 200);
    assert!(render.text().contains("Token válido"));
    assert!(console.take_alerts().await.is_empty());
}

#[tokio::test]
async fn test_switch_view_admin_rejected_redirects_to_login() {
    let transport = MockTransport::default();
    transport.reply(200, r#"{"mensaje": "Sesión expirada"}"#);
    let console = console(&transport, logged_in(), true);
    console.set_validate_token(TOKEN).await;
    console.set_logout_token(TOKEN).await;

    assert!(!console.switch_view(View::Admin).await);

    assert_eq!(console.active_view().await, View::Login);
    let render = done(console.panel(View::Admin).await);
    assert_eq!(render.severity, Severity::Error);
    let text = render.text();
    assert!(text.contains("Token no válido o expirado: Sesión expirada"));
    assert!(text.contains("ve a la pestaña de Login"));

    let alerts = console.take_alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("Serás redirigido"));

    assert!(console.guard().store().get(TOKEN_KEY).is_none());
    assert_eq!(console.forms().await, Forms::default());
}

#[tokio::test]
async fn test_switch_view_admin_unreachable_keeps_session() {
    let transport = MockTransport::default();
    transport.fail(TransportError::RequestFailed("connection refused".into()));
    let console = console(&transport, logged_in(), true);

    assert!(!console.switch_view(View::Admin).await);

    assert_eq!(console.active_view().await, View::Login);
    let text = done(console.panel(View::Admin).await).text();
    assert!(text.contains("Error al verificar token con el servidor"));
    assert!(text.contains("connection refused"));
    assert_eq!(console.guard().store().get(TOKEN_KEY).as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_switch_view_ungated_sends_nothing() {
    let transport = MockTransport::default();
    let console = console(&transport, MemoryStore::new(), true);

    assert!(console.switch_view(View::Logout).await);
    assert_eq!(console.active_view().await, View::Logout);
    assert_eq!(transport.calls(), 0);
}

// =========================================================================
// Forms
// =========================================================================

#[tokio::test]
async fn test_submit_login_success_fills_forms_and_truncates_token() {
    let transport = MockTransport::default();
    transport.reply(200, &format!(r#"{{"mensaje": "Login exitoso", "token": "{TOKEN}"}}"#));
    let console = console(&transport, MemoryStore::new(), true);

    let render = console
        .submit_login(&Credentials::new("ana@example.com", "secreto"))
        .await;

    assert_eq!(render.severity, Severity::Success);
    let token = render.records.iter().find(|r| r.key == "token").unwrap();
    assert_eq!(token.value.kind, ValueKind::Token);
    assert_eq!(token.value.text, format!("{}...", &TOKEN[..20]));
    assert_eq!(console.forms().await.logout_token, TOKEN);
    assert_eq!(console.panel(View::Login).await, Panel::Done(render));
}

#[tokio::test]
async fn test_submit_login_refused_renders_error_and_keeps_session() {
    let transport = MockTransport::default();
    transport.reply(401, r#"{"error": "Credenciales inválidas"}"#);
    let console = console(&transport, logged_in(), true);

    let render = console
        .submit_login(&Credentials::new("ana@example.com", "mal"))
        .await;

    assert_eq!(render.severity, Severity::Error);
    assert_eq!(render.status, 401);
    assert!(render.text().contains("Credenciales inválidas"));
    assert_eq!(console.guard().token().await.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_submit_login_empty_password_fails_locally() {
    let transport = MockTransport::default();
    let console = console(&transport, MemoryStore::new(), true);

    let render = console
        .submit_login(&Credentials::new("ana@example.com", ""))
        .await;

    assert_eq!(transport.calls(), 0);
    assert_eq!(render.status, 0);
    assert!(render.text().contains("Por favor, ingresa una contraseña"));
}

#[tokio::test]
async fn test_submit_validate_401_alerts_without_touching_session() {
    let transport = MockTransport::default();
    transport.reply(401, r#"{"error": "Token inválido"}"#);
    let console = console(&transport, logged_in(), true);

    let render = console.submit_validate(OTHER).await;

    assert_eq!(render.status, 401);
    assert_eq!(render.severity, Severity::Error);
    assert_eq!(console.take_alerts().await.len(), 1);
    assert_eq!(console.guard().store().get(TOKEN_KEY).as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_submit_validate_empty_token_asks_for_one() {
    let transport = MockTransport::default();
    let console = console(&transport, MemoryStore::new(), true);

    let render = console.submit_validate("").await;

    assert_eq!(transport.calls(), 0);
    assert!(render.text().contains("❌ Por favor, ingresa un token"));
}

#[tokio::test]
async fn test_submit_logout_cancelled_restores_panel() {
    let transport = MockTransport::default();
    let console = console(&transport, logged_in(), false);

    assert!(console.submit_logout(TOKEN).await.is_none());

    assert_eq!(console.panel(View::Logout).await, Panel::Idle);
    assert_eq!(transport.calls(), 0);
    assert_eq!(console.guard().token().await.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_submit_logout_success_clears_forms() {
    let transport = MockTransport::default();
    transport
        .reply(200, &granted())
        .reply(200, r#"{"mensaje": "Sesión cerrada"}"#);
    let console = console(&transport, logged_in(), true);
    console.start().await.unwrap();

    let render = console.submit_logout(TOKEN).await.unwrap();

    assert_eq!(render.severity, Severity::Success);
    assert_eq!(console.forms().await, Forms::default());
    assert!(console.guard().store().get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_submit_admin_clear_unreachable_renders_status_zero() {
    let transport = MockTransport::default();
    transport.fail(TransportError::Timeout);
    let console = console(&transport, logged_in(), true);

    let render = console.submit_admin_clear().await.unwrap();

    assert_eq!(render.status, 0);
    assert_eq!(render.severity, Severity::Error);
    assert!(render.records.iter().any(|r| r.key == "error"));
    assert_eq!(console.guard().token().await.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_submit_admin_clear_empty_body_shows_no_data() {
    let transport = MockTransport::default();
    transport.reply(204, "");
    let console = console(&transport, logged_in(), true);

    let render = console.submit_admin_clear().await.unwrap();

    assert_eq!(render.severity, Severity::Success);
    assert!(render.html().contains("No hay datos en la respuesta"));
    assert!(console.guard().store().get(TOKEN_KEY).is_none());
}

// =========================================================================
// End to end over HTTP
// =========================================================================

mod http {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokengate::prelude::*;
    use tokengate::tokengate_session::TOKEN_KEY;

    use super::TOKEN;

    type Sessions = Arc<Mutex<Vec<String>>>;

    /// A tiny in-memory stand-in for the session service.
    async fn start_service() -> String {
        let sessions: Sessions = Arc::default();
        let app = Router::new()
            .route(
                "/login",
                post(|State(s): State<Sessions>, Json(body): Json<Value>| async move {
                    if body["password"] != "secreto" {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "error": "Credenciales inválidas" })),
                        );
                    }
                    s.lock().unwrap().push(TOKEN.to_string());
                    (
                        StatusCode::OK,
                        Json(json!({ "mensaje": "Login exitoso", "token": TOKEN })),
                    )
                }),
            )
            .route(
                "/servicio",
                get(
                    |State(s): State<Sessions>,
                     Query(q): Query<HashMap<String, String>>| async move {
                        let token = q.get("token").cloned().unwrap_or_default();
                        if s.lock().unwrap().contains(&token) {
                            (StatusCode::OK, Json(json!({ "mensaje": "Acceso permitido" })))
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({ "error": "Token inválido" })),
                            )
                        }
                    },
                ),
            )
            .route(
                "/logout",
                post(|State(s): State<Sessions>, Json(body): Json<Value>| async move {
                    let token = body["token"].as_str().unwrap_or_default().to_string();
                    s.lock().unwrap().retain(|t| *t != token);
                    Json(json!({ "mensaje": "Sesión cerrada" }))
                }),
            )
            .route(
                "/admin/clear",
                post(|State(s): State<Sessions>| async move {
                    s.lock().unwrap().clear();
                    Json(json!({ "mensaje": "Todas las sesiones eliminadas" }))
                }),
            )
            .with_state(sessions);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_full_flow_login_admin_logout() {
        let base = start_service().await;
        let console = TokengateBuilder::new()
            .base_url(&base)
            .redirect_delay_ms(0)
            .build_http(MemoryStore::new(), AutoConfirm(true))
            .expect("should build");

        assert_eq!(console.start().await.unwrap(), None);
        assert!(!console.switch_view(View::Admin).await);

        let login = console
            .submit_login(&Credentials::new("ana@example.com", "secreto"))
            .await;
        assert_eq!(login.status, 200);
        assert_eq!(console.guard().store().get(TOKEN_KEY).as_deref(), Some(TOKEN));

        assert!(console.switch_view(View::Admin).await);

        let logout = console.submit_logout(TOKEN).await.unwrap();
        assert_eq!(logout.severity, Severity::Success);
        assert!(console.guard().token().await.is_none());

        let check = console.submit_validate(TOKEN).await;
        assert_eq!(check.status, 401);
    }

    #[tokio::test]
    async fn test_full_flow_admin_clear_invalidates_token() {
        let base = start_service().await;
        let console = TokengateBuilder::new()
            .base_url(&base)
            .redirect_delay_ms(0)
            .build_http(MemoryStore::new(), AutoConfirm(true))
            .expect("should build");

        console
            .submit_login(&Credentials::new("ana@example.com", "secreto"))
            .await;
        let cleared = console.submit_admin_clear().await.unwrap();
        assert!(cleared.text().contains("Todas las sesiones eliminadas"));

        // The local copy was dropped, so the admin view is refused locally.
        assert!(!console.switch_view(View::Admin).await);
        assert!(console.take_alerts().await[0].message.contains("No hay sesión"));
    }
}
