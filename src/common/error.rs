// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros de domínio/infra. Viram ApiError (com mensagem no idioma do cliente) na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Já existe uma garantia para esta unidade e produto")]
    WarrantyAlreadyExists,

    #[error("Referência inválida: {0}")]
    InvalidReference(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Mapeia violações de constraint do Postgres para erros de negócio.
    pub fn from_write(e: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::WarrantyAlreadyExists;
            }
            if db_err.is_foreign_key_violation() {
                return AppError::InvalidReference(what.to_string());
            }
        }
        AppError::DatabaseError(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WarrantyAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let pt = locale.is_portuguese();
        let status = self.status();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let msg = if pt { "Um ou mais campos são inválidos." } else { "One or more fields are invalid." };
                (msg.to_string(), Some(json!(details)))
            }
            AppError::BadRequest(msg) => (msg.clone(), None),
            AppError::ResourceNotFound(what) => {
                let msg = if pt { format!("{} não encontrado(a).", what) } else { format!("{} not found.", what) };
                (msg, None)
            }
            AppError::WarrantyAlreadyExists => {
                let msg = if pt {
                    "Já existe uma garantia para esta unidade e produto."
                } else {
                    "A warranty already exists for this unit and product."
                };
                (msg.to_string(), None)
            }
            AppError::InvalidReference(what) => {
                let msg = if pt { format!("Referência inválida: {}.", what) } else { format!("Invalid reference: {}.", what) };
                (msg, None)
            }
            // O detalhe fica no log, o cliente recebe uma mensagem genérica.
            e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                let msg = if pt { "Ocorreu um erro inesperado." } else { "An unexpected error occurred." };
                (msg.to_string(), None)
            }
        };

        ApiError { status, error, details }
    }
}

// Erro pronto para a resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
