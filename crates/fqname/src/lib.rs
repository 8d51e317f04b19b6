//! Fully-qualified hardware interface names.
//!
//! A fully-qualified name identifies one interface of one versioned package:
//!
//! ```text
//! android.hardware.nfc@1.0::INfc
//! ^^^^^^^^^^^^^^^^^^^^ ^^^   ^^^^
//! package              version name
//! ```
//!
//! The parser accepts the partial forms the rest of the framework deals in:
//! `pkg@M.m`, `@M.m::Name` and a bare `Name`. An [`FqName`] only exists once
//! the input parsed, so holding one is the validity check.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing an interface name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FqNameError {
	#[error("empty interface name")]
	Empty,

	#[error("invalid package: {0:?}")]
	Package(String),

	#[error("invalid version: {0:?}")]
	Version(String),

	#[error("invalid interface name: {0:?}")]
	Name(String),
}

/// Major/minor package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
	pub major: u32,
	pub minor: u32,
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)
	}
}

impl FromStr for Version {
	type Err = FqNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || FqNameError::Version(s.to_string());
		let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
		if !is_number(major) || !is_number(minor) {
			return Err(invalid());
		}
		Ok(Self {
			major: major.parse().map_err(|_| invalid())?,
			minor: minor.parse().map_err(|_| invalid())?,
		})
	}
}

/// A parsed interface name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FqName {
	package: String,
	version: Option<Version>,
	name: String,
}

impl FqName {
	/// Parses an interface name in any of the accepted forms.
	pub fn parse(s: &str) -> Result<Self, FqNameError> {
		if s.is_empty() {
			return Err(FqNameError::Empty);
		}

		let Some((package, rest)) = s.split_once('@') else {
			if s.contains("::") || !is_dotted_path(s) {
				return Err(FqNameError::Name(s.to_string()));
			}
			return Ok(Self {
				package: String::new(),
				version: None,
				name: s.to_string(),
			});
		};

		if !package.is_empty() && !is_dotted_path(package) {
			return Err(FqNameError::Package(package.to_string()));
		}

		let (version, name) = match rest.split_once("::") {
			Some((version, name)) => {
				if !is_dotted_path(name) {
					return Err(FqNameError::Name(name.to_string()));
				}
				(version, name)
			}
			None => (rest, ""),
		};

		let version: Version = version.parse()?;
		if package.is_empty() && name.is_empty() {
			return Err(FqNameError::Package(String::new()));
		}

		Ok(Self {
			package: package.to_string(),
			version: Some(version),
			name: name.to_string(),
		})
	}

	/// Returns true when `s` parses as an interface name.
	pub fn is_valid(s: &str) -> bool {
		Self::parse(s).is_ok()
	}

	/// Package component, empty for bare names.
	pub fn package(&self) -> &str {
		&self.package
	}

	pub fn version(&self) -> Option<Version> {
		self.version
	}

	/// Bare interface name (the part after `::`).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns true when package, version and interface name are all present.
	pub fn is_fully_qualified(&self) -> bool {
		!self.package.is_empty() && self.version.is_some() && !self.name.is_empty()
	}

	/// Returns true for a bare single-component name such as `INfc`.
	pub fn is_identifier(&self) -> bool {
		self.package.is_empty() && self.version.is_none() && !self.name.contains('.')
	}

	/// The `pkg@M.m` part of this name, with the interface dropped.
	pub fn package_and_version(&self) -> FqName {
		FqName {
			package: self.package.clone(),
			version: self.version,
			name: String::new(),
		}
	}
}

impl fmt::Display for FqName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.package)?;
		if let Some(version) = self.version {
			write!(f, "@{version}")?;
			if !self.name.is_empty() {
				f.write_str("::")?;
			}
		}
		f.write_str(&self.name)
	}
}

impl FromStr for FqName {
	type Err = FqNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

fn is_number(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_identifier(s: &str) -> bool {
	let mut bytes = s.bytes();
	match bytes.next() {
		Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
		_ => return false,
	}
	bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_dotted_path(s: &str) -> bool {
	s.split('.').all(is_identifier)
}
