//! Rate-limit snapshot derived from the most recent response headers.

// self
use crate::{_prelude::*, http::ResponseSnapshot};

/// Header carrying the number of calls made in the current window.
pub const COUNT_HEADER: &str = "x-ratelimit-count";
/// Header carrying the unix timestamp (seconds) at which the window resets.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota counters reported by the API on its last response.
///
/// A field is `None` when its header was missing or not a base-10 integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
	/// Calls counted against the current window.
	pub count: Option<u64>,
	/// Window reset time as unix seconds.
	pub reset: Option<i64>,
}
impl RateLimit {
	/// Reads the rate-limit headers of `snapshot`.
	pub fn from_snapshot(snapshot: &ResponseSnapshot) -> Self {
		Self {
			count: parse_header(snapshot, COUNT_HEADER),
			reset: parse_header(snapshot, RESET_HEADER),
		}
	}

	/// Returns the reset instant, if the header was present and in range.
	pub fn reset_at(&self) -> Option<OffsetDateTime> {
		self.reset.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
	}
}

fn parse_header<T>(snapshot: &ResponseSnapshot, name: &str) -> Option<T>
where
	T: std::str::FromStr,
{
	snapshot.header_str(name)?.trim().parse().ok()
}
