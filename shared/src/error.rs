use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    // 照会で払い出した枠 ID が未知、または TTL 切れ
    #[error("{0}")]
    SlotExpired(String),
    // リソースが存在しない・削除済み・予約受付停止のいずれか
    #[error("{0}")]
    ResourceNotEligible(String),
    // 確定時点で同時間帯に別の予約が存在した
    #[error("{0}")]
    SlotConflict(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    UnauthenticatedError(String),
    #[error("transaction error")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation error")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// クライアントが分岐できるエラー種別
    fn kind(&self) -> &'static str {
        match self {
            AppError::UnprocessableEntity(_) | AppError::ValidationError(_) => "invalid_argument",
            AppError::EntityNotFound(_) => "not_found",
            AppError::SlotExpired(_) => "slot_expired_or_invalid",
            AppError::ResourceNotEligible(_) => "resource_not_eligible",
            AppError::SlotConflict(_) => "conflict",
            AppError::UnauthenticatedError(_) => "unauthenticated",
            _ => "internal_server_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_)
            | AppError::ValidationError(_)
            | AppError::SlotExpired(_)
            | AppError::ResourceNotEligible(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SlotConflict(_) => StatusCode::CONFLICT,
            AppError::UnauthenticatedError(_) => StatusCode::UNAUTHORIZED,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status_code, Json(body)).into_response()
    }
}
