/*!
 * File System Emulation
 * open/close and the path-based families
 *
 * Guest flag and mode bits reach the host untouched; the host decides which
 * of them are invalid.
 */

use super::{mismatched_args, unsupported_primitive};
use crate::syscalls::normalizer::normalize;
use crate::syscalls::primitive::Primitive;
use crate::syscalls::types::{CallContext, ResultTuple, SyscallArgs};

use log::trace;
use nix::fcntl::{self, OFlag};
use nix::libc::mode_t;
use nix::sys::stat::Mode;
use nix::unistd::{self, AccessFlags, Gid, Uid};
use std::fs;
use std::os::unix::fs::PermissionsExt;

/// `open(path, flags, mode)`, returns the new descriptor
pub fn sys_open(primitive: Primitive, args: &SyscallArgs, _context: &CallContext) -> ResultTuple {
    let SyscallArgs::Open { path, flags, mode } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("opening {:?} with flags {:#o} and mode {:#o}", path, flags, mode);
    normalize(
        primitive.name(),
        fcntl::open(
            path.as_path(),
            OFlag::from_bits_retain(*flags),
            Mode::from_bits_retain(*mode as mode_t),
        ),
    )
}

/// `close(fd)`
pub fn sys_close(primitive: Primitive, args: &SyscallArgs, _context: &CallContext) -> ResultTuple {
    let SyscallArgs::Close { fd } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("closing fd {}", fd);
    normalize(primitive.name(), unistd::close(*fd))
}

/// Single-path family: `unlink`, `rmdir`
pub fn sys_path(primitive: Primitive, args: &SyscallArgs, _context: &CallContext) -> ResultTuple {
    let SyscallArgs::Path { path } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("calling {}({:?})", primitive, path);
    match primitive {
        Primitive::Unlink => normalize(primitive.name(), unistd::unlink(path.as_path())),
        Primitive::Rmdir => normalize(primitive.name(), fs::remove_dir(path)),
        other => unsupported_primitive("single-path", other),
    }
}

/// Path and mode family: `access`, `mkdir`, `chmod`
pub fn sys_path_mode(
    primitive: Primitive,
    args: &SyscallArgs,
    _context: &CallContext,
) -> ResultTuple {
    let SyscallArgs::PathMode { path, mode } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("calling {}({:?}, {:#o})", primitive, path, mode);
    match primitive {
        Primitive::Access => normalize(
            primitive.name(),
            unistd::access(path.as_path(), AccessFlags::from_bits_retain(*mode as i32)),
        ),
        Primitive::Mkdir => normalize(
            primitive.name(),
            unistd::mkdir(path.as_path(), Mode::from_bits_retain(*mode as mode_t)),
        ),
        Primitive::Chmod => normalize(
            primitive.name(),
            fs::set_permissions(path, fs::Permissions::from_mode(*mode)),
        ),
        other => unsupported_primitive("path+mode", other),
    }
}

/// Ownership family: `chown` follows symlinks, `lchown` does not
pub fn sys_path_owner(
    primitive: Primitive,
    args: &SyscallArgs,
    _context: &CallContext,
) -> ResultTuple {
    let SyscallArgs::PathOwner { path, uid, gid } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("calling {}({:?}, {:?}, {:?})", primitive, path, uid, gid);
    match primitive {
        Primitive::Chown => normalize(
            primitive.name(),
            unistd::chown(
                path.as_path(),
                uid.map(Uid::from_raw),
                gid.map(Gid::from_raw),
            ),
        ),
        Primitive::Lchown => normalize(
            primitive.name(),
            std::os::unix::fs::lchown(path, *uid, *gid),
        ),
        other => unsupported_primitive("ownership", other),
    }
}

/// Path-pair family: `link`, `symlink`
pub fn sys_path_pair(
    primitive: Primitive,
    args: &SyscallArgs,
    _context: &CallContext,
) -> ResultTuple {
    let SyscallArgs::PathPair { oldpath, newpath } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("calling {}({:?}, {:?})", primitive, oldpath, newpath);
    match primitive {
        Primitive::Link => normalize(primitive.name(), fs::hard_link(oldpath, newpath)),
        Primitive::Symlink => normalize(
            primitive.name(),
            std::os::unix::fs::symlink(oldpath, newpath),
        ),
        other => unsupported_primitive("path-pair", other),
    }
}
