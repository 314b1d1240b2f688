//! Page Settings
//!
//! Behaviour knobs for pages, loadable from TOML. Every field has a default,
//! so an empty document yields [`PageSettings::default`].
//!
//! ```toml
//! saved_message = "Saved!"
//! double_submit = "reject"
//! require_login = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error type for loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The settings file could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The settings document is not valid TOML for [`PageSettings`]
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// What a page does when a save is requested while another is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleSubmit {
	/// Refuse the second save with [`PageError::SaveInFlight`](crate::PageError::SaveInFlight)
	#[default]
	Reject,
	/// Issue it anyway; the later completion wins
	Allow,
}

/// Settings shared by form and listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
	/// Status message shown after a successful save
	pub saved_message: String,
	/// Policy for overlapping save requests
	pub double_submit: DoubleSubmit,
	/// Whether private endpoints redirect to the login page when signed out
	pub require_login: bool,
}

impl Default for PageSettings {
	fn default() -> Self {
		Self {
			saved_message: "Saved!".to_string(),
			double_submit: DoubleSubmit::default(),
			require_login: true,
		}
	}
}

impl PageSettings {
	/// Parse settings from a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use formcell_pages::settings::{DoubleSubmit, PageSettings};
	///
	/// let settings = PageSettings::from_toml_str("double_submit = \"allow\"").unwrap();
	/// assert_eq!(settings.double_submit, DoubleSubmit::Allow);
	/// assert_eq!(settings.saved_message, "Saved!");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	/// Read settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path)?;
		let settings = Self::from_toml_str(&source)?;
		tracing::debug!(path = %path.display(), "loaded page settings");
		Ok(settings)
	}

	/// Set the message shown after a successful save
	pub fn with_saved_message(mut self, message: impl Into<String>) -> Self {
		self.saved_message = message.into();
		self
	}

	/// Set the double-submit policy
	pub fn with_double_submit(mut self, policy: DoubleSubmit) -> Self {
		self.double_submit = policy;
		self
	}

	/// Set whether private endpoints require a signed-in user
	pub fn with_require_login(mut self, required: bool) -> Self {
		self.require_login = required;
		self
	}
}
