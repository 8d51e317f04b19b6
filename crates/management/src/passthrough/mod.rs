//! In-process ("passthrough") service lookup.
//!
//! When no registry-backed implementation of an interface exists, a process
//! can load the implementation module directly. Modules are found by naming
//! convention: `<package>@<version>-impl*.so` in one of the configured search
//! roots, exporting `HIDL_FETCH_<Interface>`.
//!
//! # Search order
//!
//! Roots are scanned highest priority first (odm, vendor, system by default)
//! and candidates within a root in directory order. The first candidate that
//! the dynamic loader accepts wins; nothing after it is looked at, even if
//! it turns out to lack the factory symbol.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use hwsvc_fqname::FqName;
use hwsvc_transport::{RegistryHandle, ServiceHandle, ServiceManager, ServiceNotification, TransportResult};
use tracing::{debug, error, warn};

use crate::config::ServiceManagementConfig;
use crate::scanner::search;

mod factory;
mod loader;

pub use factory::{RawServiceFactory, from_raw_service, into_raw_service};
pub use loader::{DlLoader, Factory, LoadedModule, ModuleHandle, ModuleLoader};

/// Prefix of exported factory symbols, joined to the interface name with `_`.
pub const FACTORY_PREFIX: &str = "HIDL_FETCH";

/// File name suffix of loadable modules on this platform.
#[cfg(target_os = "macos")]
pub const LIBRARY_SUFFIX: &str = ".dylib";
/// File name suffix of loadable modules on this platform.
#[cfg(target_os = "windows")]
pub const LIBRARY_SUFFIX: &str = ".dll";
/// File name suffix of loadable modules on this platform.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const LIBRARY_SUFFIX: &str = ".so";

/// Module file prefix and factory symbol implementing one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTarget {
	/// `<package>@<version>-impl`
	pub prefix: String,
	/// `HIDL_FETCH_<Interface>`
	pub symbol: String,
}

impl ModuleTarget {
	/// Returns `None` unless `fq_name` is a fully-qualified interface name.
	pub fn for_interface(fq_name: &str) -> Option<Self> {
		let iface = FqName::parse(fq_name).ok()?;
		if !iface.is_fully_qualified() || iface.is_identifier() {
			return None;
		}
		Some(Self {
			prefix: format!("{}-impl", iface.package_and_version()),
			symbol: format!("{FACTORY_PREFIX}_{}", iface.name()),
		})
	}
}

/// Registry stand-in that serves lookups from locally loaded modules.
///
/// Only [`ServiceManager::get`] is meaningful. Registering, listing and
/// subscribing abort the process: there is no registry behind this manager.
pub struct PassthroughServiceManager {
	search_paths: Vec<PathBuf>,
	loader: Box<dyn ModuleLoader>,
}

impl PassthroughServiceManager {
	/// Creates a manager using the platform dynamic loader.
	pub fn new(search_paths: Vec<PathBuf>) -> Self {
		Self::with_loader(search_paths, DlLoader)
	}

	pub fn with_loader(search_paths: Vec<PathBuf>, loader: impl ModuleLoader + 'static) -> Self {
		Self {
			search_paths,
			loader: Box::new(loader),
		}
	}

	pub fn from_config(config: &ServiceManagementConfig) -> Self {
		Self::new(config.library_paths.clone())
	}

	/// Search roots, highest priority first.
	pub fn search_paths(&self) -> &[PathBuf] {
		&self.search_paths
	}

	/// Resolves instance `name` of interface `fq_name` from a local module.
	pub fn resolve(&self, fq_name: &str, name: &str) -> Option<ServiceHandle> {
		let Some(target) = ModuleTarget::for_interface(fq_name) else {
			error!(fq_name, "Invalid interface name passthrough lookup");
			return None;
		};

		let Some(module) = self.open_first(&target.prefix) else {
			debug!(fq_name, "No passthrough implementation found");
			return None;
		};

		let symbol = target.symbol;
		let Some(factory) = module.handle.lookup(&symbol) else {
			error!(library = %module.library, symbol, "Passthrough lookup opened library but could not find symbol");
			return None;
		};

		factory(name)
	}

	/// Loads the first candidate the loader accepts, across all roots.
	fn open_first(&self, prefix: &str) -> Option<LoadedModule> {
		for path in &self.search_paths {
			let libraries = search(path, prefix, LIBRARY_SUFFIX);

			if libraries.len() > 1 {
				warn!(libraries = %libraries.join(", "), "Multiple libraries found");
			}

			for library in libraries {
				match self.loader.open(&path.join(&library)) {
					Ok(handle) => return Some(LoadedModule { handle, library }),
					Err(e) => debug!(error = %e, "Skipping passthrough candidate"),
				}
			}
		}
		None
	}
}

impl ServiceManager for PassthroughServiceManager {
	fn get(&self, fq_name: &str, name: &str) -> TransportResult<Option<ServiceHandle>> {
		Ok(self.resolve(fq_name, name))
	}

	fn add(&self, _interface_chain: &[String], _name: &str, _service: ServiceHandle) -> TransportResult<bool> {
		fatal("register services")
	}

	fn list(&self) -> TransportResult<Vec<String>> {
		fatal("list services")
	}

	fn list_by_interface(&self, _fq_name: &str) -> TransportResult<Vec<String>> {
		fatal("list services")
	}

	fn register_for_notifications(
		&self,
		_fq_name: &str,
		_name: &str,
		_callback: Arc<dyn ServiceNotification>,
	) -> TransportResult<bool> {
		fatal("register for notifications")
	}
}

fn fatal(operation: &str) -> ! {
	error!("Cannot {operation} with passthrough service manager.");
	std::process::abort()
}

/// Process-wide passthrough manager, built from [`ServiceManagementConfig::global`].
pub fn passthrough_service_manager() -> RegistryHandle {
	static MANAGER: OnceLock<Arc<PassthroughServiceManager>> = OnceLock::new();
	MANAGER
		.get_or_init(|| Arc::new(PassthroughServiceManager::from_config(ServiceManagementConfig::global())))
		.clone()
}

#[cfg(test)]
mod tests;
