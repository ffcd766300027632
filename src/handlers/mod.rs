// src/handlers/mod.rs

use axum::{extract::rejection::JsonRejection, Json};

use crate::{
    common::{
        error::{ApiError, AppError},
        query,
    },
    middleware::i18n::Locale,
};

pub mod health;
pub mod invoice;
pub mod records;
pub mod tenants;

// Rejeição do extrator Json vira 400 no nosso formato de erro (e não o 422 em texto do axum)
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>, locale: &Locale) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidBody(rejection.body_text()).to_api_error(locale))
}

pub(crate) fn path_id(raw: &str, locale: &Locale) -> Result<i64, ApiError> {
    query::required("id", Some(raw)).map_err(|e| e.to_api_error(locale))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{path::Path, sync::Arc};

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{config::AppState, db::MemoryBillingStore};

    pub fn app() -> Router {
        let state = AppState::from_store(
            Arc::new(MemoryBillingStore::new()),
            Path::new("/nonexistent/fonts"),
            "NotoSansSC",
        );
        crate::app_router(state)
    }

    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }
}
