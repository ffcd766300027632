// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    middleware::i18n::{Lang, Locale},
    models::period::{MAX_YEAR, MIN_YEAR},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meter {
    Electricity,
    Water,
}

impl Meter {
    fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Meter::Electricity, Lang::En) => "electricity",
            (Meter::Water, Lang::En) => "water",
            (Meter::Electricity, Lang::Pt) => "luz",
            (Meter::Water, Lang::Pt) => "água",
            (Meter::Electricity, Lang::Zh) => "电表",
            (Meter::Water, Lang::Zh) => "水表",
        }
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Parâmetro obrigatório ausente: {0}")]
    MissingParameter(&'static str),

    #[error("Parâmetro inválido: {0}")]
    InvalidParameter(&'static str),

    // Corpo JSON malformado (rejeição do extrator do axum)
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error("Período inválido: {year}-{month}")]
    InvalidPeriod { year: i32, month: i32 },

    #[error("Leitura de {meter:?} ({current}) menor que a do mês anterior ({previous})")]
    ReadingRegression {
        meter: Meter,
        previous: Decimal,
        current: Decimal,
    },

    // Tarifa x leitura grande demais para um Decimal
    #[error("Valores fora da faixa suportada para o inquilino {tenant_id}")]
    AmountOutOfRange { tenant_id: i64 },

    #[error("Inquilino {0} não encontrado")]
    TenantNotFound(i64),

    #[error("Conflito de chave: {0}")]
    Conflict(String),

    // Pool esgotado, conexão perdida, banco fora do ar
    #[error("Banco de dados indisponível: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    // Variante para os demais erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[source] sqlx::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::StorageUnavailable(err),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(db_err.message().to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }
}

// ---
// ApiError: o que efetivamente vai para o cliente
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingParameter(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidPeriod { .. }
            | AppError::ReadingRegression { .. }
            | AppError::AmountOutOfRange { .. } => StatusCode::BAD_REQUEST,
            AppError::TenantNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_)
            | AppError::FontNotFound(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn localized_message(&self, lang: Lang) -> String {
        match (self, lang) {
            (AppError::ValidationError(_), Lang::En) => "One or more fields are invalid.".into(),
            (AppError::ValidationError(_), Lang::Pt) => "Um ou mais campos são inválidos.".into(),
            (AppError::ValidationError(_), Lang::Zh) => "一个或多个字段无效。".into(),

            (AppError::MissingParameter(p), Lang::En) => format!("Missing required parameter: {p}"),
            (AppError::MissingParameter(p), Lang::Pt) => format!("Parâmetro obrigatório ausente: {p}"),
            (AppError::MissingParameter(p), Lang::Zh) => format!("缺少必填参数：{p}"),

            (AppError::InvalidParameter(p), Lang::En) => format!("Invalid {p}"),
            (AppError::InvalidParameter(p), Lang::Pt) => format!("Valor inválido para {p}"),
            (AppError::InvalidParameter(p), Lang::Zh) => format!("参数 {p} 无效"),

            (AppError::InvalidBody(_), Lang::En) => "The request body is not valid JSON for this endpoint.".into(),
            (AppError::InvalidBody(_), Lang::Pt) => "O corpo da requisição não é um JSON válido para este endpoint.".into(),
            (AppError::InvalidBody(_), Lang::Zh) => "请求体不是有效的 JSON。".into(),

            (AppError::InvalidPeriod { year, month }, Lang::En) => format!(
                "Invalid period {year}-{month}: year must be between {MIN_YEAR} and {MAX_YEAR}, month between 1 and 12"
            ),
            (AppError::InvalidPeriod { year, month }, Lang::Pt) => format!(
                "Período inválido {year}-{month}: o ano deve estar entre {MIN_YEAR} e {MAX_YEAR}, o mês entre 1 e 12"
            ),
            (AppError::InvalidPeriod { year, month }, Lang::Zh) => format!(
                "账期 {year}-{month} 无效：年份须在 {MIN_YEAR} 到 {MAX_YEAR} 之间，月份须在 1 到 12 之间"
            ),

            (AppError::ReadingRegression { meter, previous, current }, Lang::En) => format!(
                "The {} reading ({current}) is lower than last month's ({previous})",
                meter.label(lang)
            ),
            (AppError::ReadingRegression { meter, previous, current }, Lang::Pt) => format!(
                "A leitura de {} ({current}) é menor que a do mês anterior ({previous})",
                meter.label(lang)
            ),
            (AppError::ReadingRegression { meter, previous, current }, Lang::Zh) => format!(
                "{}读数（{current}）小于上月读数（{previous}）",
                meter.label(lang)
            ),

            (AppError::AmountOutOfRange { .. }, Lang::En) => "The readings and rates produce an amount too large to bill.".into(),
            (AppError::AmountOutOfRange { .. }, Lang::Pt) => "As leituras e tarifas geram um valor grande demais para cobrar.".into(),
            (AppError::AmountOutOfRange { .. }, Lang::Zh) => "读数与单价计算出的金额过大，无法计费。".into(),

            (AppError::TenantNotFound(_), Lang::En) => "Tenant not found".into(),
            (AppError::TenantNotFound(_), Lang::Pt) => "Inquilino não encontrado".into(),
            (AppError::TenantNotFound(_), Lang::Zh) => "租户不存在".into(),

            (AppError::Conflict(_), Lang::En) => "The resource was modified concurrently.".into(),
            (AppError::Conflict(_), Lang::Pt) => "O recurso foi alterado concorrentemente.".into(),
            (AppError::Conflict(_), Lang::Zh) => "资源被并发修改。".into(),

            (AppError::StorageUnavailable(_), Lang::En) => "Storage is temporarily unavailable.".into(),
            (AppError::StorageUnavailable(_), Lang::Pt) => "O banco de dados está indisponível no momento.".into(),
            (AppError::StorageUnavailable(_), Lang::Zh) => "存储暂时不可用。".into(),

            (_, Lang::En) => "An unexpected error occurred.".into(),
            (_, Lang::Pt) => "Ocorreu um erro inesperado.".into(),
            (_, Lang::Zh) => "发生意外错误。".into(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        // Retorna todos os detalhes da validação, campo a campo.
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .map(Value::String)
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            message: self.localized_message(locale.0),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
