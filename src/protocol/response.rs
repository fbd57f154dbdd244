//! Outbound response message.

use crate::aggregate::RouteResult;
use crate::error::RouteError;
use serde::{Deserialize, Serialize};

/// The optimizer's answer, tagged by `status`.
///
/// A caller always gets exactly one of these: a usable result, a typed
/// error, or a cancellation notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RouteResponse {
    Ok {
        correlation_id: String,
        result: RouteResult,
    },
    Error {
        correlation_id: String,
        error_kind: String,
        message: String,
    },
    Cancelled {
        correlation_id: String,
    },
}

impl RouteResponse {
    pub fn ok(correlation_id: impl Into<String>, result: RouteResult) -> Self {
        Self::Ok {
            correlation_id: correlation_id.into(),
            result,
        }
    }

    pub fn error(correlation_id: impl Into<String>, error: &RouteError) -> Self {
        Self::Error {
            correlation_id: correlation_id.into(),
            error_kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }

    pub fn cancelled(correlation_id: impl Into<String>) -> Self {
        Self::Cancelled {
            correlation_id: correlation_id.into(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Ok { correlation_id, .. }
            | Self::Error { correlation_id, .. }
            | Self::Cancelled { correlation_id } => correlation_id,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "ok",
            Self::Error { .. } => "error",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    pub fn result(&self) -> Option<&RouteResult> {
        match self {
            Self::Ok { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<RouteResult> {
        match self {
            Self::Ok { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
