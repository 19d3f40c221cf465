//! Discovery document types and their shape validation.
//!
//! Documents are decoded to [`Value`] first and validated explicitly, so a body that is
//! not JSON and a body that is JSON of the wrong shape stay distinct failure modes. Both
//! demote the stage to its fallback; neither reaches the caller.

// self
use crate::_prelude::*;

/// RFC 8414 authorization-server metadata returned by a successful discovery.
///
/// Immutable once returned. The crate neither caches nor persists it; storing the record
/// is a caller concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationServerMetadata {
	/// Authorization endpoint users are sent to for the interactive grant.
	pub authorization_endpoint: String,
	/// Token endpoint used for code and refresh exchanges.
	pub token_endpoint: String,
	/// Optional RFC 7591 dynamic client registration endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_endpoint: Option<String>,
}
impl AuthorizationServerMetadata {
	/// Validates a decoded RFC 8414 document.
	///
	/// `authorization_endpoint` and `token_endpoint` must both be non-empty strings; a
	/// document missing either is discarded. A non-string `registration_endpoint` is
	/// tolerated and treated as absent, since the field is optional anyway.
	pub fn from_document(document: &Value) -> Result<Self, ProbeError> {
		let object = document
			.as_object()
			.ok_or(ProbeError::InvalidShape { reason: "document is not a JSON object" })?;
		let authorization_endpoint = match object.get("authorization_endpoint") {
			Some(Value::String(value)) if !value.trim().is_empty() => value.clone(),
			_ =>
				return Err(ProbeError::InvalidShape {
					reason: "authorization_endpoint must be a non-empty string",
				}),
		};
		let token_endpoint = match object.get("token_endpoint") {
			Some(Value::String(value)) if !value.trim().is_empty() => value.clone(),
			_ =>
				return Err(ProbeError::InvalidShape {
					reason: "token_endpoint must be a non-empty string",
				}),
		};
		let registration_endpoint = match object.get("registration_endpoint") {
			Some(Value::String(value)) if !value.trim().is_empty() => Some(value.clone()),
			_ => None,
		};

		Ok(Self { authorization_endpoint, token_endpoint, registration_endpoint })
	}
}

/// RFC 9728 protected-resource metadata naming the authorization servers for a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedResourceMetadata {
	/// Identifier of the protected resource.
	pub resource: String,
	/// Authorization servers that can issue tokens for this resource, in preference
	/// order. Absent or empty lists are valid but force the next discovery fallback.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authorization_servers: Option<Vec<String>>,
}
impl ProtectedResourceMetadata {
	/// Validates a decoded RFC 9728 document.
	///
	/// `resource` must be a non-empty string. `authorization_servers`, when present in
	/// any form including `null`, must be an array whose every entry is a string; a
	/// single non-string entry invalidates the whole document.
	pub fn from_document(document: &Value) -> Result<Self, ProbeError> {
		let object = document
			.as_object()
			.ok_or(ProbeError::InvalidShape { reason: "document is not a JSON object" })?;
		let resource = match object.get("resource") {
			Some(Value::String(value)) if !value.trim().is_empty() => value.clone(),
			_ =>
				return Err(ProbeError::InvalidShape {
					reason: "resource must be a non-empty string",
				}),
		};
		let authorization_servers = match object.get("authorization_servers") {
			None => None,
			Some(Value::Array(entries)) => {
				let mut servers = Vec::with_capacity(entries.len());

				for entry in entries {
					match entry {
						Value::String(value) => servers.push(value.clone()),
						_ =>
							return Err(ProbeError::InvalidShape {
								reason: "authorization_servers must be an array of strings",
							}),
					}
				}

				Some(servers)
			},
			Some(_) =>
				return Err(ProbeError::InvalidShape {
					reason: "authorization_servers must be an array of strings",
				}),
		};

		Ok(Self { resource, authorization_servers })
	}
}
