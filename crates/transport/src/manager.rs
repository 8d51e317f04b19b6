use std::sync::Arc;

use crate::{ServiceHandle, TransportResult};

/// Receives registration events from the registry.
///
/// Invoked on a transport-owned thread, possibly more than once for the same
/// registration.
pub trait ServiceNotification: Send + Sync {
	/// Called when `name` of interface `fq_name` is registered. `preexisting`
	/// is set when the service was already registered at subscription time.
	fn on_registration(&self, fq_name: &str, name: &str, preexisting: bool);
}

/// The registry contract.
///
/// Implemented by transport proxies to the registry process and by the
/// in-process passthrough manager.
pub trait ServiceManager: Send + Sync {
	/// Looks up instance `name` of interface `fq_name`.
	fn get(&self, fq_name: &str, name: &str) -> TransportResult<Option<ServiceHandle>>;

	/// Registers `service` under every interface in `interface_chain`.
	fn add(&self, interface_chain: &[String], name: &str, service: ServiceHandle) -> TransportResult<bool>;

	/// Lists every registered `fqName/instance`.
	fn list(&self) -> TransportResult<Vec<String>>;

	/// Lists instance names registered for `fq_name`.
	fn list_by_interface(&self, fq_name: &str) -> TransportResult<Vec<String>>;

	/// Subscribes `callback` to registrations of `name` for `fq_name`.
	fn register_for_notifications(
		&self,
		fq_name: &str,
		name: &str,
		callback: Arc<dyn ServiceNotification>,
	) -> TransportResult<bool>;
}

/// Shared handle to a registry.
pub type RegistryHandle = Arc<dyn ServiceManager>;

/// Opens transport connections to the registry process.
pub trait RegistryConnector: Send + Sync {
	/// Opens a fresh connection and wraps its root context object as a typed
	/// registry. Returns `None` while the registry is unreachable.
	fn connect(&self) -> Option<RegistryHandle>;
}
