//! Literal-host SSRF gate applied to every hint-derived URL before it is fetched.
//!
//! The gate never resolves hostnames; it inspects the literal host string only, so it
//! stays a pure synchronous function with no TOCTOU window. A URL that fails the gate is
//! treated as absent and discovery falls through to the next stage.

// std
use std::net::{Ipv4Addr, Ipv6Addr};
// crates.io
use url::{Host, Url};

/// Checks whether a hint-derived URL may be fetched at all.
///
/// Rejects any scheme other than `https`, the `localhost` hostname, host-less or
/// unparseable URLs, and every IP literal that lands in loopback, link-local, private,
/// unique-local, broadcast, or unspecified address space. IPv4-mapped IPv6 literals are
/// unwrapped and judged by their embedded IPv4 address.
pub fn is_url_safe_to_fetch(url: &str) -> bool {
	let Ok(parsed) = Url::parse(url) else {
		return false;
	};

	if parsed.scheme() != "https" {
		return false;
	}

	match parsed.host() {
		None => false,
		Some(Host::Domain(domain)) => !domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(address)) => !is_blocked_ipv4(address),
		Some(Host::Ipv6(address)) => !is_blocked_ipv6(address),
	}
}

/// Gate configuration a [`DiscoveryClient`](crate::discovery::DiscoveryClient) applies to
/// hint-derived URLs.
///
/// The default strict mode routes through [`is_url_safe_to_fetch`] unchanged. The
/// loopback-admitting mode exists so mock servers bound to `127.0.0.1` can stand in for
/// remote hosts in tests and demos; every other rejection still holds there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HintPolicy {
	/// Additionally admits plain-HTTP loopback and `localhost` URLs.
	///
	/// Production deployments must keep this disabled.
	pub allow_insecure_loopback: bool,
}
impl HintPolicy {
	/// The production gate: HTTPS-only, no loopback, no private or link-local space.
	pub const fn strict() -> Self {
		Self { allow_insecure_loopback: false }
	}

	/// Strict gate plus plain-HTTP loopback, for mock-server tests and demos.
	pub const fn insecure_loopback() -> Self {
		Self { allow_insecure_loopback: true }
	}

	pub(crate) fn permits(self, url: &str) -> bool {
		if is_url_safe_to_fetch(url) {
			return true;
		}

		self.allow_insecure_loopback && is_loopback_endpoint(url)
	}
}

fn is_blocked_ipv4(address: Ipv4Addr) -> bool {
	address.is_loopback()
		|| address.is_link_local()
		|| address.is_private()
		|| address.is_unspecified()
		|| address.is_broadcast()
}

fn is_blocked_ipv6(address: Ipv6Addr) -> bool {
	// Mapped literals such as ::ffff:127.0.0.1 would otherwise slip past the v6 checks.
	if let Some(mapped) = address.to_ipv4_mapped() {
		return is_blocked_ipv4(mapped);
	}

	address.is_loopback()
		|| address.is_unspecified()
		// Unique local, fc00::/7.
		|| (address.segments()[0] & 0xfe00) == 0xfc00
		// Link local, fe80::/10.
		|| (address.segments()[0] & 0xffc0) == 0xfe80
}

fn is_loopback_endpoint(url: &str) -> bool {
	let Ok(parsed) = Url::parse(url) else {
		return false;
	};

	if !matches!(parsed.scheme(), "http" | "https") {
		return false;
	}

	match parsed.host() {
		None => false,
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(address)) => address.is_loopback(),
		Some(Host::Ipv6(address)) => address.is_loopback(),
	}
}
