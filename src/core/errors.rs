/*!
 * Error Types
 * Load-time and configuration errors with thiserror and miette diagnostics
 *
 * Per-call host OS failures never show up here: they travel back to the host
 * as the errno field of a `ResultTuple`.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Plugin errors raised while building or configuring a plugin instance
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[non_exhaustive]
pub enum PluginError {
    #[error("Family {family} cannot invoke primitive '{cname}'")]
    #[diagnostic(
        code(dispatch::unsupported_selector),
        help("Bind the syscall to a family whose primitives include this name.")
    )]
    UnsupportedSelector { family: &'static str, cname: String },

    #[error("Unknown syscall: {0}")]
    #[diagnostic(
        code(config::unknown_syscall),
        help("Use a syscall identity name such as open, stat64 or unlink.")
    )]
    UnknownSyscall(String),

    #[error("Unknown lifecycle class: {0}")]
    #[diagnostic(
        code(config::unknown_ctl_class),
        help("Valid classes are proc, module and mount.")
    )]
    UnknownCtlClass(String),

    #[error("Syscall {0} is bound twice")]
    #[diagnostic(code(dispatch::duplicate_binding))]
    DuplicateBinding(String),

    #[error("Managed syscall {0} has no dispatch table entry")]
    #[diagnostic(
        code(plugin::unbound_managed_syscall),
        help("Every managed syscall must be bound in the dispatch table, even if only to native.")
    )]
    UnboundSyscall(String),

    #[error("Invalid lifecycle event: {0}")]
    #[diagnostic(code(control::invalid_event))]
    InvalidEvent(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Check the SCVIRT_* environment variables or the JSON configuration file.")
    )]
    Config(String),
}

impl PluginError {
    #[inline]
    pub fn unsupported_selector(family: &'static str, cname: impl Into<String>) -> Self {
        Self::UnsupportedSelector {
            family,
            cname: cname.into(),
        }
    }

    #[inline]
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
