//! Logging collaborator injected into every [`Client`](crate::client::Client).
//!
//! The client never calls a process-wide logging macro directly. It reports through a
//! [`ClientLogger`], which defaults to [`TracingLogger`] and can be swapped for a capturing
//! implementation in tests.

// self
use crate::_prelude::*;

/// Severity attached to a captured log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
	/// Informational message.
	Info,
	/// Recoverable anomaly.
	Warn,
	/// Failed operation.
	Error,
}
impl LogLevel {
	/// Returns a stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogLevel::Info => "info",
			LogLevel::Warn => "warn",
			LogLevel::Error => "error",
		}
	}
}
impl Display for LogLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Sink for the client's diagnostic output.
///
/// Implementations receive messages that are already redacted; they must not attempt to recover
/// secrets from them.
pub trait ClientLogger
where
	Self: Send + Sync,
{
	/// Records an informational message.
	fn info(&self, message: &str);

	/// Records a recoverable anomaly.
	fn warn(&self, message: &str);

	/// Records a failed operation under a caller-supplied context prefix.
	fn error(&self, context: &str, error: &Error);
}

/// Default logger that forwards to `tracing` when the `tracing` feature is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
impl ClientLogger for TracingLogger {
	fn info(&self, message: &str) {
		#[cfg(feature = "tracing")]
		{
			tracing::info!(target: "feedly_session", "{message}");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}

	fn warn(&self, message: &str) {
		#[cfg(feature = "tracing")]
		{
			tracing::warn!(target: "feedly_session", "{message}");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}

	fn error(&self, context: &str, error: &Error) {
		#[cfg(feature = "tracing")]
		{
			tracing::error!(target: "feedly_session", error = %error, "{context}");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (context, error);
		}
	}
}

/// Single line captured by [`MemoryLogger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
	/// Severity of the entry.
	pub level: LogLevel,
	/// Fully rendered message; errors are rendered as `<context>: <error>`.
	pub message: String,
}

/// Logger that keeps every entry in memory, for embedding applications and tests.
#[derive(Debug, Default)]
pub struct MemoryLogger(Mutex<Vec<LogEntry>>);
impl MemoryLogger {
	/// Returns a copy of every entry recorded so far.
	pub fn entries(&self) -> Vec<LogEntry> {
		self.0.lock().clone()
	}

	/// Returns `true` if any entry at `level` contains `needle`.
	pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
		self.0.lock().iter().any(|entry| entry.level == level && entry.message.contains(needle))
	}

	fn push(&self, level: LogLevel, message: String) {
		self.0.lock().push(LogEntry { level, message });
	}
}
impl ClientLogger for MemoryLogger {
	fn info(&self, message: &str) {
		self.push(LogLevel::Info, message.to_owned());
	}

	fn warn(&self, message: &str) {
		self.push(LogLevel::Warn, message.to_owned());
	}

	fn error(&self, context: &str, error: &Error) {
		self.push(LogLevel::Error, format!("{context}: {error}"));
	}
}
