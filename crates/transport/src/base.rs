use std::any::Any;
use std::sync::Arc;

/// Root trait of every hardware service object, local or remote.
pub trait HwBase: Any + Send + Sync {
	/// Fully-qualified name of the most derived interface.
	fn interface_descriptor(&self) -> String;

	/// Interface names from most derived to the root interface.
	fn interface_chain(&self) -> Vec<String> {
		vec![self.interface_descriptor()]
	}

	/// Returns true for proxies to objects in another process.
	fn is_remote(&self) -> bool {
		false
	}

	/// Upcast for downcasting to a concrete service type.
	fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a service. Released when the last holder drops it.
pub type ServiceHandle = Arc<dyn HwBase>;
