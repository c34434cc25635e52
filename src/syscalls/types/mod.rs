/*!
 * Syscall Types Module
 * Identities, call context, positional arguments and result tuples
 */

mod args;
mod context;
mod identity;
mod results;

pub use args::SyscallArgs;
pub use context::{BinfmtRequest, CallContext};
pub use identity::SyscallId;
pub use results::{AttrMap, Extra, ResultTuple};
