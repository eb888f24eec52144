use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions, Value};
use platform_store::{StoreError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

#[derive(Serialize)]
struct FieldProblem<'a> {
    field: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::InvalidInput(_) | ApiError::Validation(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            StoreError::InvalidInput(message) => Self::InvalidInput(message),
            other @ (StoreError::Integrity(_) | StoreError::Backend(_)) => {
                error!(error = %other, "store failure");
                Self::internal(anyhow::Error::new(other))
            }
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::Validation(report) = self {
            let fields: Vec<Value> = report
                .errors()
                .iter()
                .filter_map(|problem| {
                    async_graphql::to_value(FieldProblem {
                        field: problem.field,
                        message: &problem.message,
                    })
                    .ok()
                })
                .collect();
            err = err.extend_with(|_err, e| e.set("fields", Value::List(fields)));
        }
        err
    }
}

/// Map anything convertible into [`ApiError`] to a GraphQL error with a
/// `code` extension. Backend details never reach the payload.
pub fn gql_error(err: impl Into<ApiError>) -> Error {
    err.into().extend()
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
