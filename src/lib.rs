/*!
 * Syscall Virtualization Plugin
 *
 * A plugin for a process-virtualization host: it declares which syscalls it
 * can handle, decides per call whether to claim it, emulates claimed calls
 * against the real host OS and hands back `(return_value, errno, extra)`
 * result tuples. Lifecycle notifications arrive on a separate control
 * channel.
 */

pub mod config;
pub mod control;
pub mod core;
pub mod monitoring;
pub mod plugin;
pub mod syscalls;

// Re-exports
pub use self::core::{PluginError, PluginResult};
pub use config::{FilterConfig, PluginConfig};
pub use control::{ControlState, CtlArg, CtlClass, LifecycleEvent};
pub use monitoring::init_tracing;
pub use plugin::{Capabilities, Plugin, PluginBuilder};
pub use syscalls::{
    CallContext, DispatchTable, Family, InterceptFilter, PathPrefixFilter, Primitive, ResultTuple,
    SentinelPathFilter, SyscallArgs, SyscallId,
};
