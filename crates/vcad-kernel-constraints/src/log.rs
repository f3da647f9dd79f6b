//! Injectable logging collaborator.
//!
//! The reference engine singletons a `zerolog` logger. Core solver code
//! here never formats or sinks a log line itself; it calls through a
//! [`LogSink`] trait object instead, so embedding applications can route
//! trace events wherever they like (or nowhere, via [`NullSink`]).

use std::fmt::Display;

/// Severity of a logged event, in increasing order of importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single leveled logging entry point. Implementations decide how (or
/// whether) to render `fields`.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, fields: &[(&str, &dyn Display)]);
}

/// Default sink: discards everything. Used when the caller supplies none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str, _fields: &[(&str, &dyn Display)]) {}
}

/// Adapter forwarding to the `tracing` ecosystem crate at the matching
/// level. Core code never depends on `tracing` directly — only this one
/// adapter does.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str, fields: &[(&str, &dyn Display)]) {
        let rendered = render_fields(fields);
        match level {
            LogLevel::Trace => tracing::trace!(fields = %rendered, "{}", message),
            LogLevel::Debug => tracing::debug!(fields = %rendered, "{}", message),
            LogLevel::Info => tracing::info!(fields = %rendered, "{}", message),
            LogLevel::Warn => tracing::warn!(fields = %rendered, "{}", message),
            LogLevel::Error => tracing::error!(fields = %rendered, "{}", message),
        }
    }
}

fn render_fields(fields: &[(&str, &dyn Display)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_any_call_without_panicking() {
        let sink = NullSink;
        sink.log(LogLevel::Error, "ignored", &[("x", &1)]);
    }
}
