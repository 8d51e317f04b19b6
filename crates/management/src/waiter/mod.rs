//! Blocking wait for a service registration.
//!
//! The registry reports registrations through a callback on one of its own
//! threads, possibly before the subscribing call has even returned and
//! possibly more than once. The waiting thread therefore checks a flag under
//! the same lock the callback sets it under, so no notification is lost.

use std::sync::Arc;

use hwsvc_transport::{ServiceManager, ServiceNotification};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error};

use crate::registry::{RegistryClient, default_service_manager};

/// One-shot registration flag shared with the registry callback.
#[derive(Default)]
pub(crate) struct Waiter {
	registered: Mutex<bool>,
	condition: Condvar,
}

impl Waiter {
	/// Marks the service registered and wakes the waiter.
	///
	/// Returns false if it was already marked.
	pub(crate) fn notify(&self) -> bool {
		let mut registered = self.registered.lock();
		if *registered {
			return false;
		}
		*registered = true;
		drop(registered);

		self.condition.notify_one();
		true
	}

	/// Blocks until [`Waiter::notify`] has been called.
	pub(crate) fn wait(&self) {
		let mut registered = self.registered.lock();
		while !*registered {
			self.condition.wait(&mut registered);
		}
	}
}

impl ServiceNotification for Waiter {
	fn on_registration(&self, fq_name: &str, name: &str, preexisting: bool) {
		if self.notify() {
			debug!(fq_name, name, preexisting, "Service registered");
		}
	}
}

/// Blocks until instance `instance` of `interface` is registered with `manager`.
///
/// Returns immediately, after logging, if the subscription cannot be made.
/// There is no timeout.
pub fn wait_for_service_on(manager: &dyn ServiceManager, interface: &str, instance: &str) {
	let waiter = Arc::new(Waiter::default());

	match manager.register_for_notifications(interface, instance, waiter.clone()) {
		Err(e) => {
			error!("Transport error, {e}, during notification registration for {interface}/{instance}.");
		}
		Ok(false) => {
			error!("Could not register for notifications for {interface}/{instance}.");
		}
		Ok(true) => waiter.wait(),
	}
}

impl RegistryClient {
	/// Blocks until `instance` of `interface` is registered with this client's registry.
	pub fn wait_for_service(&self, interface: &str, instance: &str) {
		let Some(manager) = self.get() else {
			error!("Could not get default service manager.");
			return;
		};
		wait_for_service_on(&*manager, interface, instance);
	}
}

/// Blocks until `instance` of `interface` is registered with the default registry.
pub fn wait_for_hw_service(interface: &str, instance: &str) {
	let Some(manager) = default_service_manager() else {
		error!("Could not get default service manager.");
		return;
	};
	wait_for_service_on(&*manager, interface, instance);
}
