// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-over-HTTP RPC channel shared by the typed backend clients.
//!
//! A call is `POST {base}/{package.Service}/{Method}` with a JSON body.
//! Failures come back as a non-2xx status with an optional
//! `{"code": "NOT_FOUND", "message": "..."}` body.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::error::{BackendError, BackendStatus, Service};

#[derive(Debug, Clone)]
struct Endpoint {
    base: Url,
    http: Client,
}

/// One logical connection to a backend.
///
/// Built once at startup and shared by every request. A channel without an
/// address is disabled and fails each call immediately.
#[derive(Debug, Clone)]
pub struct RpcChannel {
    service: Service,
    endpoint: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    code: BackendStatus,
    #[serde(default)]
    message: String,
}

impl RpcChannel {
    /// Build a channel whose every call is bounded by `timeout`.
    pub fn connect(service: Service, base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            service,
            endpoint: Some(Endpoint { base, http }),
        })
    }

    pub fn disabled(service: Service) -> Self {
        Self {
            service,
            endpoint: None,
        }
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Invoke `method` and decode the reply.
    ///
    /// An empty success body decodes as `{}`, so unit-like replies can use an
    /// empty struct.
    pub async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp, BackendError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let Some(endpoint) = &self.endpoint else {
            return Err(BackendError::disabled(self.service));
        };

        let url = format!(
            "{}/{}/{}",
            endpoint.base.as_str().trim_end_matches('/'),
            self.service.rpc_path(),
            method
        );

        let response = endpoint
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(method, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(method, e))?;

        if !status.is_success() {
            return Err(match serde_json::from_slice::<StatusBody>(&body) {
                Ok(parsed) => BackendError::new(self.service, parsed.code, parsed.message),
                Err(_) => BackendError::new(
                    self.service,
                    BackendStatus::from_http(status),
                    format!("{method} returned {status}"),
                ),
            });
        }

        let payload: &[u8] = if body.is_empty() { b"{}" } else { &body };
        serde_json::from_slice(payload).map_err(|e| {
            BackendError::new(
                self.service,
                BackendStatus::Internal,
                format!("{method} returned an invalid reply: {e}"),
            )
        })
    }

    fn transport_error(&self, method: &str, err: reqwest::Error) -> BackendError {
        let status = if err.is_timeout() {
            BackendStatus::DeadlineExceeded
        } else {
            BackendStatus::Unavailable
        };
        BackendError::new(self.service, status, format!("{method} failed: {err}"))
    }
}

/// Reply type for calls that return nothing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: String,
    }

    async fn channel_for(server: &MockServer) -> RpcChannel {
        let base = Url::parse(&server.uri()).unwrap();
        RpcChannel::connect(Service::Users, base, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn posts_json_to_service_method_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.v1.UsersService/GetProfile"))
            .and(body_json(json!({"id": "u-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let channel = channel_for(&server).await;
        let reply: Echo = channel
            .call("GetProfile", &json!({"id": "u-1"}))
            .await
            .unwrap();
        assert_eq!(reply, Echo { value: "ok".into() });
    }

    #[tokio::test]
    async fn status_body_takes_precedence_over_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"code": "ALREADY_EXISTS", "message": "duplicate"})),
            )
            .mount(&server)
            .await;

        let err = channel_for(&server)
            .await
            .call::<_, Empty>("CreateProfile", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status, BackendStatus::AlreadyExists);
        assert_eq!(err.service, Service::Users);
        assert_eq!(err.message, "duplicate");
    }

    #[tokio::test]
    async fn bare_http_status_is_translated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = channel_for(&server)
            .await
            .call::<_, Empty>("GetProfile", &json!({"id": "nope"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let result: Result<Empty, _> = channel_for(&server)
            .await
            .call("DeleteProfile", &json!({"id": "u-1"}))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn slow_backend_hits_the_fixed_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let channel =
            RpcChannel::connect(Service::Users, base, Duration::from_millis(200)).unwrap();
        let err = channel
            .call::<_, Empty>("GetProfile", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status, BackendStatus::DeadlineExceeded);
    }

    #[tokio::test]
    async fn disabled_channel_fails_fast() {
        let channel = RpcChannel::disabled(Service::Company);
        assert!(!channel.is_enabled());
        let err = channel
            .call::<_, Empty>("GetCompany", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status, BackendStatus::Unavailable);
        assert_eq!(err.service, Service::Company);
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        // Port 9 (discard) is closed on test hosts.
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let channel = RpcChannel::connect(Service::Auth, base, Duration::from_secs(1)).unwrap();
        let err = channel
            .call::<_, Empty>("ParseToken", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err.status,
            BackendStatus::Unavailable | BackendStatus::DeadlineExceeded
        ));
    }
}
