//! Registry acquisition.
//!
//! The registry process is always expected to come up eventually, so a
//! connection attempt that finds it unreachable is retried forever. The only
//! terminal "no" is a missing transport endpoint, which means the transport
//! does not exist on this device or is not reachable from this sandbox.
//!
//! # Concurrency
//!
//! - `manager`: written once, then read without locking
//! - `creation`: held for the whole retry loop so that concurrent callers
//!   queue behind one connection attempt instead of opening their own

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use hwsvc_transport::{RegistryConnector, RegistryHandle, endpoint_accessible};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::ServiceManagementConfig;

/// Pause between failed registry connection attempts.
pub trait Backoff: Send + Sync {
	/// Blocks before retry number `attempt` (starting at 1).
	fn pause(&self, attempt: u32);
}

/// Sleeps the same interval before every retry.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff(pub Duration);

impl Default for FixedBackoff {
	fn default() -> Self {
		Self(Duration::from_secs(1))
	}
}

impl Backoff for FixedBackoff {
	fn pause(&self, _attempt: u32) {
		std::thread::sleep(self.0);
	}
}

impl<F> Backoff for F
where
	F: Fn(u32) + Send + Sync,
{
	fn pause(&self, attempt: u32) {
		self(attempt)
	}
}

/// Lazily connected, shared registry handle.
pub struct RegistryClient {
	endpoint: PathBuf,
	connector: Arc<dyn RegistryConnector>,
	backoff: Box<dyn Backoff>,
	manager: OnceLock<RegistryHandle>,
	creation: Mutex<()>,
}

impl RegistryClient {
	pub fn new(endpoint: impl Into<PathBuf>, connector: Arc<dyn RegistryConnector>) -> Self {
		Self::with_backoff(endpoint, connector, FixedBackoff::default())
	}

	pub fn with_backoff(endpoint: impl Into<PathBuf>, connector: Arc<dyn RegistryConnector>, backoff: impl Backoff + 'static) -> Self {
		Self {
			endpoint: endpoint.into(),
			connector,
			backoff: Box::new(backoff),
			manager: OnceLock::new(),
			creation: Mutex::new(()),
		}
	}

	pub fn from_config(connector: Arc<dyn RegistryConnector>, config: &ServiceManagementConfig) -> Self {
		Self::with_backoff(config.transport_endpoint.clone(), connector, FixedBackoff(config.retry_interval()))
	}

	pub fn endpoint(&self) -> &Path {
		&self.endpoint
	}

	/// Returns the registry, connecting on first use.
	///
	/// Returns `None` without retrying when the transport endpoint is
	/// unavailable. Otherwise blocks until a connection succeeds.
	pub fn get(&self) -> Option<RegistryHandle> {
		if let Some(manager) = self.manager.get() {
			return Some(manager.clone());
		}

		if !endpoint_accessible(&self.endpoint) {
			debug!(endpoint = %self.endpoint.display(), "Transport endpoint not available");
			return None;
		}

		let _creation = self.creation.lock();
		let mut attempt = 0u32;
		loop {
			if let Some(manager) = self.manager.get() {
				return Some(manager.clone());
			}

			attempt = attempt.saturating_add(1);
			match self.connector.connect() {
				Some(manager) => {
					info!(attempt, "Connected to service registry");
					return Some(self.manager.get_or_init(|| manager).clone());
				}
				None => {
					debug!(attempt, "Service registry unreachable, retrying");
					self.backoff.pause(attempt);
				}
			}
		}
	}
}

static DEFAULT_CLIENT: OnceLock<RegistryClient> = OnceLock::new();

/// Installs the transport used by [`default_service_manager`].
///
/// Returns false if a transport was already installed; the first one stays.
pub fn install_transport(connector: Arc<dyn RegistryConnector>) -> bool {
	install_transport_with(connector, ServiceManagementConfig::global())
}

/// Like [`install_transport`], with explicit endpoint and retry settings.
pub fn install_transport_with(connector: Arc<dyn RegistryConnector>, config: &ServiceManagementConfig) -> bool {
	let mut installed = false;
	DEFAULT_CLIENT.get_or_init(|| {
		installed = true;
		RegistryClient::from_config(connector, config)
	});
	if !installed {
		warn!("Registry transport already installed");
	}
	installed
}

/// The process-wide registry client, if a transport has been installed.
pub fn default_registry_client() -> Option<&'static RegistryClient> {
	DEFAULT_CLIENT.get()
}

/// Returns the process-wide registry.
///
/// `None` when no transport is installed or its endpoint is unavailable.
/// Blocks while the registry process is not yet reachable.
pub fn default_service_manager() -> Option<RegistryHandle> {
	let Some(client) = default_registry_client() else {
		debug!("No registry transport installed");
		return None;
	};
	client.get()
}
