//! Request builders and response decoding for the session API.
//!
//! [`Api`] is the only place that knows how an operation maps onto an
//! endpoint, a method, a query string and a body. The session guard asks
//! it for a [`Request`], hands that to a transport, and gives the
//! [`RawResponse`] back to it for decoding.

use serde_json::Value;
use tokengate_transport::{RawResponse, Request};

use crate::{ApiResponse, Codec, Credentials, Endpoint, LogoutRequest, ProtocolError};

/// Builds requests and decodes responses using the given codec.
#[derive(Debug, Clone, Default)]
pub struct Api<C: Codec> {
    codec: C,
}

impl<C: Codec> Api<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// `POST /login` with the credentials as the JSON body.
    pub fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Request, ProtocolError> {
        let body = self.codec.encode(credentials)?;
        Ok(Request::post(Endpoint::Login.path()).with_json_body(body))
    }

    /// `GET /servicio?token=...`. The transport encodes the token.
    pub fn validate(&self, token: &str) -> Request {
        Request::get(Endpoint::Servicio.path()).with_query("token", token)
    }

    /// `POST /logout` with `{"token": ...}`.
    pub fn logout(&self, token: &str) -> Result<Request, ProtocolError> {
        let body = self.codec.encode(&LogoutRequest { token })?;
        Ok(Request::post(Endpoint::Logout.path()).with_json_body(body))
    }

    /// `POST /admin/clear` with no body.
    pub fn admin_clear(&self) -> Request {
        Request::post(Endpoint::AdminClear.path())
    }

    /// Decodes a completed exchange.
    ///
    /// An empty (or whitespace-only) body decodes to `null`, which the
    /// presenter shows as "no data".
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if a non-empty body is not JSON.
    pub fn decode(&self, raw: RawResponse) -> Result<ApiResponse, ProtocolError> {
        let body = if raw.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            self.codec.decode(&raw.body)?
        };
        Ok(ApiResponse {
            status: raw.status,
            body,
            elapsed: raw.elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonCodec;
    use serde_json::json;
    use tokengate_transport::Method;

    fn api() -> Api<JsonCodec> {
        Api::new(JsonCodec)
    }

    #[test]
    fn test_login_request_shape() {
        let req = api()
            .login(&Credentials::new("ana@example.com", "pw"))
            .unwrap();
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/login");
        let body: Value = serde_json::from_slice(req.body().unwrap()).unwrap();
        assert_eq!(body, json!({ "correo": "ana@example.com", "password": "pw" }));
    }

    #[test]
    fn test_validate_request_puts_token_in_query() {
        let req = api().validate("1_2");
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "/servicio");
        assert_eq!(req.query_param("token"), Some("1_2"));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_logout_request_body() {
        let req = api().logout("tok").unwrap();
        assert_eq!(req.path(), "/logout");
        let body: Value = serde_json::from_slice(req.body().unwrap()).unwrap();
        assert_eq!(body, json!({ "token": "tok" }));
    }

    #[test]
    fn test_admin_clear_has_no_body() {
        let req = api().admin_clear();
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/admin/clear");
        assert!(req.body().is_none());
    }

    #[test]
    fn test_decode_keeps_status_for_error_responses() {
        let resp = api()
            .decode(RawResponse::new(401, r#"{"mensaje":"Token inválido"}"#))
            .unwrap();
        assert_eq!(resp.status, 401);
        assert_eq!(resp.message(), Some("Token inválido"));
    }

    #[test]
    fn test_decode_empty_body_is_null() {
        let resp = api().decode(RawResponse::new(204, "  \n")).unwrap();
        assert_eq!(resp.body, Value::Null);
    }

    #[test]
    fn test_decode_non_json_is_error() {
        let result = api().decode(RawResponse::new(502, "Bad Gateway"));
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
