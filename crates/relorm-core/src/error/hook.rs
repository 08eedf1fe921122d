use super::{Error, ErrorInner, ErrorKind};
use crate::schema::HookStage;

use std::sync::Arc;

/// Error returned by a lifecycle hook. The hook's own error is the cause.
#[derive(Debug)]
pub(super) struct HookError {
    stage: HookStage,
}

impl std::error::Error for HookError {}

impl core::fmt::Display for HookError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} hook failed", self.stage)
    }
}

impl Error {
    /// Wraps the error returned by a hook, recording the stage it ran at.
    pub fn hook(stage: HookStage, cause: Error) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: ErrorKind::Hook(HookError { stage }),
                cause: Some(cause),
            })),
        }
    }

    /// Returns `true` if this error was returned by a hook.
    pub fn is_hook(&self) -> bool {
        matches!(self.kind(), ErrorKind::Hook(_))
    }

    /// The stage of the failing hook, when this is a hook error.
    pub fn hook_stage(&self) -> Option<HookStage> {
        match self.kind() {
            ErrorKind::Hook(err) => Some(err.stage),
            _ => None,
        }
    }
}
