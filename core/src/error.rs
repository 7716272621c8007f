//! Error types for the request executor.
//!
//! # Design
//! The taxonomy is flat: every failure a caller can observe maps to exactly
//! one `ServiceError` variant, and the display strings are the short labels
//! callers surface to users. Variants carry a detail string where one exists
//! so logs keep the underlying cause without widening the category set.

use thiserror::Error;

/// Errors delivered through the result of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Base URL + endpoint did not form a valid absolute URL.
    #[error("Invalid Endpoint")]
    InvalidEndpoint(String),

    /// Query parameters could not be applied to the request URL.
    #[error("Encoding Parameters Error")]
    EncodingParametersError(String),

    /// A header name or value could not be encoded as an HTTP field.
    #[error("Encoding Headers Error")]
    EncodingHeadersError(String),

    /// The request body could not be serialized.
    #[error("Encoding Error")]
    EncodingError(String),

    /// The transport failed before a response arrived.
    #[error("API Error")]
    ApiError(String),

    /// The response status was outside the accepted success range.
    #[error("Invalid Response")]
    InvalidResponse { status: u16 },

    /// The response succeeded but carried no body.
    #[error("Response No Data")]
    NoData,

    /// The body could not be decoded into the requested type.
    #[error("Decoding Response Error")]
    DecoderError(String),
}

/// Fieldless mirror of `ServiceError`, for matching on the category alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEndpoint,
    EncodingParametersError,
    EncodingHeadersError,
    EncodingError,
    ApiError,
    InvalidResponse,
    NoData,
    DecoderError,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidEndpoint(_) => ErrorKind::InvalidEndpoint,
            ServiceError::EncodingParametersError(_) => ErrorKind::EncodingParametersError,
            ServiceError::EncodingHeadersError(_) => ErrorKind::EncodingHeadersError,
            ServiceError::EncodingError(_) => ErrorKind::EncodingError,
            ServiceError::ApiError(_) => ErrorKind::ApiError,
            ServiceError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            ServiceError::NoData => ErrorKind::NoData,
            ServiceError::DecoderError(_) => ErrorKind::DecoderError,
        }
    }

    /// The underlying cause, when the variant carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ServiceError::InvalidEndpoint(d)
            | ServiceError::EncodingParametersError(d)
            | ServiceError::EncodingHeadersError(d)
            | ServiceError::EncodingError(d)
            | ServiceError::ApiError(d)
            | ServiceError::DecoderError(d) => Some(d),
            ServiceError::InvalidResponse { .. } | ServiceError::NoData => None,
        }
    }
}

/// Failure reported by an `HttpTransport` before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ServiceError {
    fn from(e: TransportError) -> Self {
        ServiceError::ApiError(e.0)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        TransportError(e.to_string())
    }
}
