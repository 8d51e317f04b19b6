use std::path::Path;

use hwsvc_transport::ServiceHandle;
use libloading::Library;

use super::factory::{RawServiceFactory, call_raw_factory};
use crate::error::LoadError;

/// Builds a service for the given instance name.
pub type Factory = Box<dyn Fn(&str) -> Option<ServiceHandle> + Send + Sync>;

/// Opens passthrough modules.
pub trait ModuleLoader: Send + Sync {
	/// Loads the module at `path`.
	fn open(&self, path: &Path) -> Result<Box<dyn ModuleHandle>, LoadError>;
}

/// A module that stays resident for the rest of the process.
pub trait ModuleHandle: Send + Sync {
	/// Resolves the factory exported as `symbol`.
	fn lookup(&self, symbol: &str) -> Option<Factory>;
}

/// An opened module and the candidate name it was loaded from.
pub struct LoadedModule {
	pub handle: Box<dyn ModuleHandle>,
	pub library: String,
}

/// Loads modules with the platform dynamic loader.
///
/// Libraries are never closed: service code must stay mapped for as long as
/// any handle it produced is alive, which in practice is the process lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct DlLoader;

impl ModuleLoader for DlLoader {
	fn open(&self, path: &Path) -> Result<Box<dyn ModuleHandle>, LoadError> {
		let library = open_lazy(path).map_err(|e| LoadError {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;
		Ok(Box::new(DlModule {
			library: Box::leak(Box::new(library)),
		}))
	}
}

/// Opens with lazy binding so unused factory code is never relocated.
#[cfg(unix)]
fn open_lazy(path: &Path) -> Result<Library, libloading::Error> {
	use libloading::os::unix::{Library as UnixLibrary, RTLD_LAZY};

	// SAFETY: Running a passthrough module's initializers is the point of loading it.
	unsafe { UnixLibrary::open(Some(path), RTLD_LAZY) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_lazy(path: &Path) -> Result<Library, libloading::Error> {
	// SAFETY: Running a passthrough module's initializers is the point of loading it.
	unsafe { Library::new(path) }
}

struct DlModule {
	library: &'static Library,
}

impl ModuleHandle for DlModule {
	fn lookup(&self, symbol: &str) -> Option<Factory> {
		let mut name = Vec::with_capacity(symbol.len() + 1);
		name.extend_from_slice(symbol.as_bytes());
		name.push(0);

		// SAFETY: Factory symbols are exported with the `RawServiceFactory` signature.
		let factory: RawServiceFactory = unsafe { *self.library.get::<RawServiceFactory>(&name).ok()? };
		Some(Box::new(move |instance: &str| call_raw_factory(factory, instance)))
	}
}
