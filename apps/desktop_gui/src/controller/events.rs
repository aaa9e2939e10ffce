//! Events delivered from the backend worker to the UI thread.

use client_core::ApiError;

use crate::controller::actions::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A user-visible notification. Errors from all operations collapse into
/// this one path; there is no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Action(Action),
    Toast(Toast),
    /// Page-level loading indicator around refresh calls; depth-counted by
    /// the UI so overlapping refreshes do not clear it early.
    ShowLoading,
    HideLoading,
}

/// Renders an API error for the toast, attaching a hint when the failure
/// looks like the appliance is unreachable rather than rejecting the call.
pub fn describe_api_error(err: &ApiError) -> String {
    match err {
        ApiError::Transport(inner) if inner.is_connect() || inner.is_timeout() => {
            format!("{err}. Appliance unreachable; check URL/network and retry.")
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_are_reported_verbatim() {
        let err = ApiError::Http {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Filter URL is invalid".to_string(),
        };
        let text = describe_api_error(&err);
        assert!(text.contains("Filter URL is invalid"));
        assert!(!text.contains("unreachable"));
    }
}
