//! Utility functions for rule implementations.

pub mod urls;

#[doc(inline)]
pub use urls::{split_url, url_path, version_tokens, VersionToken};
