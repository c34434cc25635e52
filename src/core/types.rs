/*!
 * Core Types
 * Common types shared between the host boundary and the emulation layer
 */

use std::os::unix::io::RawFd;

/// Host-side process identifier as delivered by lifecycle events
pub type ProcId = u32;

/// File descriptor as seen by the host OS
pub type Fd = RawFd;

/// Socket descriptor as seen by the host OS
pub type SockFd = RawFd;

/// Native error number (host errno space)
pub type ErrnoCode = i32;

/// Scalar return value of an emulated syscall
pub type ReturnValue = i64;

/// Acknowledgement code returned to the host by the control channel
pub type CtlStatus = i32;

/// Control channel acknowledged the event
pub const CTL_ACK: CtlStatus = 0;

/// Control channel rejected the event
pub const CTL_REJECT: CtlStatus = -1;

/// Common result type for plugin load-time operations
pub type PluginResult<T> = Result<T, super::errors::PluginError>;
