// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    BadModel,
    ThreadPool,
    LayoutInFlight,
    LayoutPanicked,
    WorkerDisconnected,
    UnknownNode,
    UnknownEdge,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            BadModel => "bad_model",
            ThreadPool => "thread_pool",
            LayoutInFlight => "layout_in_flight",
            LayoutPanicked => "layout_panicked",
            WorkerDisconnected => "worker_disconnected",
            UnknownNode => "unknown_node",
            UnknownEdge => "unknown_edge",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Model,
    Layout,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Model => "ModelError",
            ErrorKind::Layout => "LayoutError",
            ErrorKind::View => "ViewError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Model, ErrorCode::BadModel, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! model_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Model,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! layout_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Layout,
            ErrorCode::$code,
            Some($str),
        ))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! view_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::View, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::View, ErrorCode::$code, None))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_details() {
        let err = Error::new(
            ErrorKind::Layout,
            ErrorCode::LayoutInFlight,
            Some("previous run still active".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "LayoutError{layout_in_flight: previous run still active}"
        );
    }

    #[test]
    fn test_error_display_without_details() {
        let err = Error::new(ErrorKind::View, ErrorCode::UnknownNode, None);
        assert_eq!(err.to_string(), "ViewError{unknown_node}");
        assert_eq!(err.get_details(), None);
    }

    #[test]
    fn test_layout_err_macro() {
        let result: Result<()> = layout_err!(ThreadPool, "no threads".to_string());
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Layout);
        assert_eq!(err.code, ErrorCode::ThreadPool);
    }

    #[test]
    fn test_json_error_converts_to_model_error() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::Model);
        assert_eq!(err.code, ErrorCode::BadModel);
    }
}
