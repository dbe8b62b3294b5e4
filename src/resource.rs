//! Resource config discovery descriptor.
//!
//! Every resource server the broker issues tokens for is expected to expose this descriptor at a
//! conventional path (`<resource>/config`), so an authorizing UI can confirm it is pointed at the
//! correct broker before creating a session. Fetching the descriptor is the host's concern; the
//! core only validates it.

// self
use crate::_prelude::*;

/// Descriptor a resource server publishes to identify its broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
	/// Broker instance the resource trusts.
	pub middlecat_url: Url,
	/// Opaque authorization mode advertised by the resource, passed through untouched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authorization: Option<String>,
}
impl ResourceDescriptor {
	/// Whether the descriptor points at the provided broker issuer.
	///
	/// Compared with trailing-slash normalization, since hosts routinely configure either form.
	pub fn matches_issuer(&self, issuer: &Url) -> bool {
		normalized(&self.middlecat_url) == normalized(issuer)
	}
}

fn normalized(url: &Url) -> &str {
	url.as_str().trim_end_matches('/')
}
