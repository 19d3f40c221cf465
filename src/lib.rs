//! SSRF-hardened OAuth authorization-server discovery for remote MCP endpoints—walk the
//! RFC 9728 and RFC 8414 fallback chain from nothing but a server URL, in one crate built
//! for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod challenge;
pub mod discovery;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod metadata;
pub mod obs;
pub mod safety;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		time::Duration,
	};

	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};

	pub use crate::error::{Error, ProbeError, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
