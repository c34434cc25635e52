/*!
 * Result Normalizer
 * Single translation point from host OS outcomes to result tuples
 *
 * Every emulation routes its host call through `normalize` or
 * `normalize_with`; nothing here returns an error or panics, failures end
 * up as `(-1, errno)` in the host's native errno space.
 */

use super::types::{Extra, ResultTuple};
use crate::core::types::{ErrnoCode, ReturnValue};
use log::{debug, trace};
use nix::errno::Errno;
use std::io;
use std::os::unix::io::RawFd;

/// A host-level failure that carries a native error number
pub trait NativeError {
    fn errno(&self) -> ErrnoCode;
}

impl NativeError for Errno {
    #[inline]
    fn errno(&self) -> ErrnoCode {
        *self as ErrnoCode
    }
}

impl NativeError for io::Error {
    /// Errors synthesized by std without an OS code map to EIO
    #[inline]
    fn errno(&self) -> ErrnoCode {
        self.raw_os_error().unwrap_or(Errno::EIO as ErrnoCode)
    }
}

/// Scalar a successful host call contributes as the syscall return value
pub trait IntoReturnValue {
    fn into_return_value(self) -> ReturnValue;
}

impl IntoReturnValue for () {
    #[inline]
    fn into_return_value(self) -> ReturnValue {
        0
    }
}

impl IntoReturnValue for RawFd {
    #[inline]
    fn into_return_value(self) -> ReturnValue {
        ReturnValue::from(self)
    }
}

/// Translate a scalar-returning host call
#[inline]
pub fn normalize<T, E>(cname: &'static str, outcome: Result<T, E>) -> ResultTuple
where
    T: IntoReturnValue,
    E: NativeError,
{
    match outcome {
        Ok(value) => {
            let value = value.into_return_value();
            trace!("{} -> {}", cname, value);
            ResultTuple::success(value)
        }
        Err(err) => failure(cname, &err),
    }
}

/// Translate a host call whose result is reported as extra data, with a
/// scalar return of 0
#[inline]
pub fn normalize_with<T, E, F>(cname: &'static str, outcome: Result<T, E>, extra: F) -> ResultTuple
where
    E: NativeError,
    F: FnOnce(T) -> Extra,
{
    match outcome {
        Ok(data) => {
            trace!("{} -> 0 (+extra)", cname);
            ResultTuple::success_with(0, extra(data))
        }
        Err(err) => failure(cname, &err),
    }
}

/// Failure tuple for a call the plugin refuses before reaching the host OS
#[inline]
pub fn reject(cname: &'static str, errno: Errno) -> ResultTuple {
    failure(cname, &errno)
}

fn failure<E: NativeError>(cname: &'static str, err: &E) -> ResultTuple {
    let errno = err.errno();
    debug!("{} failed: errno {} ({})", cname, errno, Errno::from_raw(errno).desc());
    ResultTuple::failure(errno)
}
