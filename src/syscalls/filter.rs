/*!
 * Interception Filter
 * Per-call claim decision made from the call context
 */

use super::types::CallContext;
use std::path::PathBuf;
use tracing::trace;

/// Claim policy evaluated once per syscall attempt
///
/// Implementations must be pure: no I/O, no mutation, and the same context
/// always yields the same answer.
pub trait InterceptFilter: Send + Sync {
    /// `true` claims the call for this plugin
    fn decide(&self, context: &CallContext) -> bool;

    /// Name of this policy (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Claims calls whose `path` equals one sentinel value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelPathFilter {
    sentinel: PathBuf,
}

impl SentinelPathFilter {
    pub fn new(sentinel: impl Into<PathBuf>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn sentinel(&self) -> &std::path::Path {
        &self.sentinel
    }
}

impl InterceptFilter for SentinelPathFilter {
    #[inline]
    fn decide(&self, context: &CallContext) -> bool {
        let claimed = context.path().is_some_and(|p| p == self.sentinel);
        trace!(path = ?context.path(), claimed, "sentinel filter");
        claimed
    }

    fn name(&self) -> &'static str {
        "sentinel_path"
    }
}

/// Claims calls whose `path` lies under a directory prefix (whole components)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixFilter {
    prefix: PathBuf,
}

impl PathPrefixFilter {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl InterceptFilter for PathPrefixFilter {
    #[inline]
    fn decide(&self, context: &CallContext) -> bool {
        let claimed = context.path().is_some_and(|p| p.starts_with(&self.prefix));
        trace!(path = ?context.path(), claimed, "prefix filter");
        claimed
    }

    fn name(&self) -> &'static str {
        "path_prefix"
    }
}
