use std::path::Path;

/// Kernel endpoint of the hardware IPC transport.
pub const DEFAULT_ENDPOINT: &str = "/dev/hwbinder";

/// Returns true when `path` exists and this process may read and write it.
///
/// A missing or inaccessible endpoint means the transport is unavailable on
/// this device or in this sandbox.
#[cfg(unix)]
pub fn endpoint_accessible(path: &Path) -> bool {
	use rustix::fs::{Access, access};

	match access(path, Access::EXISTS | Access::READ_OK | Access::WRITE_OK) {
		Ok(()) => true,
		Err(err) => {
			tracing::trace!(path = %path.display(), error = %err, "transport endpoint unavailable");
			false
		}
	}
}

/// Returns true when `path` exists.
#[cfg(not(unix))]
pub fn endpoint_accessible(path: &Path) -> bool {
	path.exists()
}
