//! Mutable session state owned by a single client instance.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Holds the access token currently attached to outbound calls.
///
/// Reads never block on in-flight refreshes; the lock is only held long enough to clone or
/// replace the secret.
#[derive(Default)]
pub struct Session {
	access_token: RwLock<Option<TokenSecret>>,
}
impl Session {
	/// Creates a session seeded with an optional access token.
	pub fn new(access_token: Option<TokenSecret>) -> Self {
		Self { access_token: RwLock::new(access_token.filter(|token| !token.is_empty())) }
	}

	/// Returns a clone of the current access token, if one is held.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.access_token.read().clone()
	}

	/// Returns `true` while an access token is held.
	pub fn has_access_token(&self) -> bool {
		self.access_token.read().is_some()
	}

	pub(crate) fn store(&self, token: TokenSecret) {
		*self.access_token.write() = Some(token);
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("access_token_set", &self.has_access_token()).finish()
	}
}
