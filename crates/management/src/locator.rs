//! Registry-first service lookup with passthrough fallback.

use hwsvc_transport::{RegistryHandle, ServiceHandle};
use tracing::{debug, warn};

use crate::passthrough::passthrough_service_manager;
use crate::registry::default_service_manager;

/// Where the registry comes from.
enum Registry {
	Fixed(Option<RegistryHandle>),
	/// Acquired on demand; connecting may block until the registry is up.
	Process,
}

/// Looks services up in a registry, then in locally loadable modules.
pub struct ServiceLocator {
	registry: Registry,
	passthrough: RegistryHandle,
}

impl ServiceLocator {
	pub fn new(registry: Option<RegistryHandle>, passthrough: RegistryHandle) -> Self {
		Self {
			registry: Registry::Fixed(registry),
			passthrough,
		}
	}

	/// Locator over the process-wide registry and passthrough managers.
	///
	/// The registry is not touched until a lookup needs it.
	pub fn process() -> Self {
		Self {
			registry: Registry::Process,
			passthrough: passthrough_service_manager(),
		}
	}

	fn registry(&self) -> Option<RegistryHandle> {
		match &self.registry {
			Registry::Fixed(registry) => registry.clone(),
			Registry::Process => default_service_manager(),
		}
	}

	/// Returns instance `instance` of `fq_name`.
	///
	/// With `get_stub` the registry is skipped and only a local implementation
	/// is returned. A registry transport failure is treated as "not registered".
	pub fn get(&self, fq_name: &str, instance: &str, get_stub: bool) -> Option<ServiceHandle> {
		if !get_stub && let Some(registry) = self.registry() {
			match registry.get(fq_name, instance) {
				Ok(Some(service)) => return Some(service),
				Ok(None) => debug!(fq_name, instance, "Service not in registry, trying passthrough"),
				Err(e) => warn!(fq_name, instance, error = %e, "Registry lookup failed, trying passthrough"),
			}
		}

		match self.passthrough.get(fq_name, instance) {
			Ok(service) => service,
			Err(e) => {
				warn!(fq_name, instance, error = %e, "Passthrough lookup failed");
				None
			}
		}
	}
}

/// Looks up `instance` of `fq_name` through the process-wide managers.
pub fn get_service(fq_name: &str, instance: &str, get_stub: bool) -> Option<ServiceHandle> {
	ServiceLocator::process().get(fq_name, instance, get_stub)
}
