use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use responder_core::Error;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Engine(Error),
    UnknownService(String),
    /// The request outlived the server's request timeout
    RequestTimeout,
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Engine(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(err) => match err {
                Error::InvalidCoordinate { .. }
                | Error::InvalidArgument(_)
                | Error::InvalidMultiplier(_) => StatusCode::BAD_REQUEST,
                Error::NoServicesAvailable | Error::UnknownEdge(_) => StatusCode::NOT_FOUND,
                Error::DestinationUnreachable(_) | Error::OriginOffNetwork => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                Error::RouteComputationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                // only seen when the client is already gone
                Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                Error::InvalidData(_) | Error::IoError(_) | Error::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::UnknownService(_) => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Engine(err) => match err {
                Error::NoServicesAvailable => "NoServicesAvailable",
                Error::DestinationUnreachable(_) => "DestinationUnreachable",
                Error::RouteComputationTimeout(_) => "RouteComputationTimeout",
                Error::InvalidCoordinate { .. } => "InvalidCoordinate",
                Error::Cancelled => "Cancelled",
                Error::OriginOffNetwork => "OriginOffNetwork",
                Error::InvalidArgument(_) => "InvalidArgument",
                Error::UnknownEdge(_) => "UnknownEdge",
                Error::InvalidMultiplier(_) => "InvalidMultiplier",
                Error::InvalidData(_) | Error::IoError(_) | Error::Json(_) => "Internal",
            },
            ApiError::UnknownService(_) => "UnknownService",
            ApiError::RequestTimeout => "RouteComputationTimeout",
            ApiError::Internal(_) => "Internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Engine(err) => err.to_string(),
            ApiError::UnknownService(id) => format!("Unknown service: {id}"),
            ApiError::RequestTimeout => "Request timed out".to_string(),
            ApiError::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.message());
        } else {
            tracing::debug!("Request rejected: {}", self.message());
        }

        let body = ErrorBody {
            error: self.code(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
