/*!
 * Syscalls Module
 * Interception filter, dispatch table and emulation of host syscalls
 */

pub mod dispatch;
pub mod emulation;
pub mod filter;
pub mod normalizer;
pub mod primitive;
pub mod types;

// Re-export public API
pub use dispatch::{Binding, DispatchTable, DispatchTableBuilder, Emulation, Family};
pub use emulation::EmulationFn;
pub use filter::{InterceptFilter, PathPrefixFilter, SentinelPathFilter};
pub use primitive::Primitive;
pub use types::{AttrMap, BinfmtRequest, CallContext, Extra, ResultTuple, SyscallArgs, SyscallId};
