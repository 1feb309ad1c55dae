//! Remote configuration middleware.
//! Attaches the current configuration snapshot to every request.

use std::ops::Deref;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::client::{ConfigSnapshot, RemoteConfigClient};

/// Request extension carrying the configuration seen by this request.
///
/// Handlers read it with `Extension<RemoteConfig>`. An empty snapshot means
/// configuration is not available yet.
#[derive(Clone, Debug, Default)]
pub struct RemoteConfig(pub Arc<ConfigSnapshot>);

impl Deref for RemoteConfig {
    type Target = ConfigSnapshot;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Install with `axum::middleware::from_fn_with_state(client, inject_remote_config)`.
///
/// Never waits on a refresh and never fails the request. A `RemoteConfig`
/// already present on the request is left untouched.
pub async fn inject_remote_config(
    State(client): State<RemoteConfigClient>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<RemoteConfig>().is_none() {
        req.extensions_mut().insert(RemoteConfig(client.snapshot()));
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http, middleware, routing::get, Extension, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::client::{ConfigEntry, ConfigCache};
    use crate::config::ClientConfig;

    async fn describe(Extension(config): Extension<RemoteConfig>) -> String {
        match config.value("application", "key") {
            Some(Value::String(s)) => s.clone(),
            _ => format!("empty:{}", config.is_empty()),
        }
    }

    fn app(client: RemoteConfigClient) -> Router {
        Router::new()
            .route("/", get(describe))
            .layer(middleware::from_fn_with_state(client, inject_remote_config))
    }

    fn seed(cache: &ConfigCache, value: &str) {
        let Value::Object(doc) = json!({ "key": value }) else {
            unreachable!()
        };
        cache.apply_update("application", ConfigEntry::new(doc));
    }

    async fn body_text(router: Router, request: Request) -> String {
        let response = router.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_request_proceeds_without_configuration() {
        let client = RemoteConfigClient::new(ClientConfig::new("app")).unwrap();
        let request = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(body_text(app(client), request).await, "empty:true");
    }

    #[tokio::test]
    async fn test_attaches_current_snapshot() {
        let client = RemoteConfigClient::new(ClientConfig::new("app")).unwrap();
        seed(client.cache(), "v1");
        let request = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(body_text(app(client), request).await, "v1");
    }

    #[tokio::test]
    async fn test_preseeded_context_is_kept() {
        let client = RemoteConfigClient::new(ClientConfig::new("app")).unwrap();
        seed(client.cache(), "live");

        let preseeded = ConfigCache::new();
        seed(&preseeded, "seeded");
        let request = http::Request::builder()
            .uri("/")
            .extension(RemoteConfig(preseeded.get()))
            .body(Body::empty())
            .unwrap();

        assert_eq!(body_text(app(client), request).await, "seeded");
    }
}
