/*!
 * Structured Tracing
 * Subscriber setup and per-call spans for emulated syscalls
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Emulations slower than this are reported at warn level
const SLOW_CALL_THRESHOLD: Duration = Duration::from_millis(10);

static CALL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SCVIRT_TRACE_JSON: Enable JSON output (default: false)
///
/// Records emitted through the `log` macros are bridged into the same
/// subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SCVIRT_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Span covering one claimed syscall, from dispatch to Result Tuple
pub struct SyscallSpan {
    span: tracing::Span,
    start: Instant,
    syscall: &'static str,
    call_id: u64,
}

impl SyscallSpan {
    pub fn new(syscall: &'static str, primitive: &'static str) -> Self {
        let call_id = CALL_SEQUENCE.fetch_add(1, Ordering::Relaxed);

        let span = span!(
            Level::TRACE,
            "syscall",
            call_id = call_id,
            syscall = syscall,
            primitive = primitive,
            return_value = tracing::field::Empty,
            errno = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            syscall,
            call_id,
        }
    }

    /// Sequence number of this call, unique per process
    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    /// Record the normalized outcome
    pub fn record_outcome(&self, return_value: i64, errno: i32) {
        self.span.record("return_value", return_value);
        self.span.record("errno", errno);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SyscallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_CALL_THRESHOLD {
            warn!(
                call_id = self.call_id,
                syscall = self.syscall,
                duration_ms = duration.as_millis() as u64,
                "slow emulated syscall"
            );
        } else {
            debug!(
                call_id = self.call_id,
                syscall = self.syscall,
                duration_us = duration.as_micros() as u64,
                "emulated syscall completed"
            );
        }
    }
}
