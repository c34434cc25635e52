/*!
 * Syscall Emulation
 * One function per syscall family, each running the real host primitive
 */

mod fs;
mod stat;

pub use fs::{sys_close, sys_open, sys_path, sys_path_mode, sys_path_owner, sys_path_pair};
pub use stat::{sys_statfs, sys_stats, STATFS_EXCLUDED};

use super::normalizer::reject;
use super::primitive::Primitive;
use super::types::{CallContext, ResultTuple, SyscallArgs};
use log::{error, warn};
use nix::errno::Errno;

/// Calling convention shared by every emulation family
pub type EmulationFn = fn(Primitive, &SyscallArgs, &CallContext) -> ResultTuple;

/// The host passed positional arguments of the wrong shape for this family
fn mismatched_args(primitive: Primitive, args: &SyscallArgs) -> ResultTuple {
    warn!(
        "{}: arguments of shape '{}' do not match the bound family",
        primitive,
        args.shape()
    );
    reject(primitive.name(), Errno::EINVAL)
}

/// Unreachable once the dispatch table has been validated
fn unsupported_primitive(family: &'static str, primitive: Primitive) -> ResultTuple {
    error!("{} family invoked with foreign primitive {}", family, primitive);
    reject(primitive.name(), Errno::ENOSYS)
}
