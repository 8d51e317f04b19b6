//! Registry contract for hardware service IPC.
//!
//! This crate defines the seams between service management and whatever IPC
//! transport carries calls to the registry process:
//! * [`HwBase`] / [`ServiceHandle`]: reference-counted service objects
//! * [`ServiceManager`]: the registry contract (`get`, `add`, `list`, ...)
//! * [`ServiceNotification`]: sink for registration events
//! * [`RegistryConnector`]: opens a connection and yields the registry root object
//! * [`endpoint_accessible`]: probe for the transport's kernel endpoint
//!
//! The transport itself lives elsewhere and plugs in through these traits.

#![warn(missing_docs)]

mod base;
mod endpoint;
mod error;
mod manager;

pub use base::{HwBase, ServiceHandle};
pub use endpoint::{DEFAULT_ENDPOINT, endpoint_accessible};
pub use error::{TransportError, TransportResult};
pub use manager::{RegistryConnector, RegistryHandle, ServiceManager, ServiceNotification};
