// Library code reports through tracing; printing would land in a HAL's stdio.
#![deny(clippy::print_stderr, clippy::print_stdout)]

//! Hardware service lookup.
//!
//! # Architecture
//!
//! * [`registry`]: lazy, retrying acquisition of the process-wide registry
//! * [`passthrough`]: in-process lookup by loading implementation modules
//! * [`waiter`]: blocking wait until a service registers
//! * [`locator`]: registry-first lookup with passthrough fallback
//! * [`scanner`]: directory scan for module candidates
//! * [`config`]: endpoint, search roots and retry interval
//!
//! # Resource lifetime
//!
//! The registry connection and every loaded module live until the process
//! exits. Neither is ever released: loaded service code must stay mapped while
//! its objects are reachable, and the registry handle is shared by everyone.

pub mod config;
mod error;
pub mod locator;
pub mod passthrough;
pub mod registry;
pub mod scanner;
pub mod waiter;

pub use config::ServiceManagementConfig;
pub use error::{ConfigError, LoadError};
pub use hwsvc_transport::{HwBase, RegistryHandle, ServiceHandle};
pub use locator::{ServiceLocator, get_service};
pub use passthrough::{FACTORY_PREFIX, LIBRARY_SUFFIX, ModuleTarget, PassthroughServiceManager, from_raw_service, into_raw_service, passthrough_service_manager};
pub use registry::{Backoff, FixedBackoff, RegistryClient, default_service_manager, install_transport, install_transport_with};
pub use scanner::search;
pub use waiter::{wait_for_hw_service, wait_for_service_on};

#[doc(hidden)]
pub use paste as __paste;
