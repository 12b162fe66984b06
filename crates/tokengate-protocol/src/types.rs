//! Core protocol types for the session API.
//!
//! These are the shapes that travel to and from the remote session
//! service: the endpoints, the request bodies, and the decoded response.
//! Field names (`correo`, `mensaje`, ...) are the service's own and are
//! kept verbatim on the wire.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// The exact `mensaje` the validation endpoint answers with when it
/// accepts a token. Anything else, including a different casing, is a
/// rejection.
pub const ACCESS_GRANTED: &str = "Acceso permitido";

/// Reason shown when the service rejects a token without saying why.
pub const DEFAULT_REJECTION: &str = "Sesión no autorizada";

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// The fixed set of endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /login` with [`Credentials`].
    Login,
    /// `GET /servicio?token=...`: read-only token validation.
    Servicio,
    /// `POST /logout` with [`LogoutRequest`].
    Logout,
    /// `POST /admin/clear`: drops every session on the server.
    AdminClear,
}

impl Endpoint {
    /// The path relative to the service's base address.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/login",
            Endpoint::Servicio => "/servicio",
            Endpoint::Logout => "/logout",
            Endpoint::AdminClear => "/admin/clear",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Login form contents.
///
/// `Debug` is implemented by hand so the password never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub correo: String,
    pub password: String,
}

impl Credentials {
    pub fn new(correo: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            correo: correo.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("correo", &self.correo)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /logout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutRequest<'a> {
    pub token: &'a str,
}

// ---------------------------------------------------------------------------
// ApiResponse
// ---------------------------------------------------------------------------

/// A decoded response from the session service.
///
/// Any status is represented here: a 401 is a perfectly well-formed
/// answer. The body is kept as a loose JSON value because the service
/// mixes `mensaje`, `error`, `detalle` and `token` freely across
/// endpoints and outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            elapsed: Duration::ZERO,
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// The `mensaje` field, if present and a string.
    pub fn message(&self) -> Option<&str> {
        self.str_field("mensaje")
    }

    /// The `error` field, if present and a string.
    pub fn error(&self) -> Option<&str> {
        self.str_field("error")
    }

    /// The session token issued by `/login`, if any.
    ///
    /// An empty string does not count as a token.
    pub fn token(&self) -> Option<&str> {
        self.str_field("token").filter(|t| !t.is_empty())
    }

    /// Whether this is the validation endpoint accepting the token:
    /// a 2xx status AND `mensaje` equal to [`ACCESS_GRANTED`].
    pub fn grants_access(&self) -> bool {
        self.is_success() && self.message() == Some(ACCESS_GRANTED)
    }

    /// Human-readable reason for a rejection: the service's `mensaje`,
    /// then its `error`, then [`DEFAULT_REJECTION`].
    pub fn rejection_reason(&self) -> &str {
        self.message()
            .or_else(|| self.error())
            .unwrap_or(DEFAULT_REJECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Login.path(), "/login");
        assert_eq!(Endpoint::Servicio.path(), "/servicio");
        assert_eq!(Endpoint::Logout.path(), "/logout");
        assert_eq!(Endpoint::AdminClear.to_string(), "/admin/clear");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("ana@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("ana@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_serialize_uses_service_field_names() {
        let creds = Credentials::new("ana@example.com", "pw");
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(value, json!({ "correo": "ana@example.com", "password": "pw" }));
    }

    #[test]
    fn test_grants_access_requires_exact_marker_and_2xx() {
        let ok = ApiResponse::new(200, json!({ "mensaje": ACCESS_GRANTED }));
        assert!(ok.grants_access());

        let wrong_case =
            ApiResponse::new(200, json!({ "mensaje": "acceso permitido" }));
        assert!(!wrong_case.grants_access());

        let no_marker = ApiResponse::new(200, json!({ "ok": true }));
        assert!(!no_marker.grants_access());

        let bad_status =
            ApiResponse::new(401, json!({ "mensaje": ACCESS_GRANTED }));
        assert!(!bad_status.grants_access());
    }

    #[test]
    fn test_token_ignores_empty_and_non_string() {
        assert_eq!(
            ApiResponse::new(200, json!({ "token": "abc_123" })).token(),
            Some("abc_123")
        );
        assert_eq!(ApiResponse::new(200, json!({ "token": "" })).token(), None);
        assert_eq!(ApiResponse::new(200, json!({ "token": 5 })).token(), None);
        assert_eq!(ApiResponse::new(200, Value::Null).token(), None);
    }

    #[test]
    fn test_rejection_reason_fallback_order() {
        let with_msg = ApiResponse::new(
            401,
            json!({ "mensaje": "Token expirado", "error": "x" }),
        );
        assert_eq!(with_msg.rejection_reason(), "Token expirado");

        let with_err = ApiResponse::new(401, json!({ "error": "No autorizado" }));
        assert_eq!(with_err.rejection_reason(), "No autorizado");

        let empty = ApiResponse::new(500, json!({}));
        assert_eq!(empty.rejection_reason(), DEFAULT_REJECTION);
    }
}
