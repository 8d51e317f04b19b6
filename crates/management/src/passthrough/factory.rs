//! C ABI of passthrough factories.
//!
//! A module implementing interface `INfc` exports
//! `HIDL_FETCH_INfc(instance: *const c_char) -> *mut c_void`. The returned
//! pointer is null or a boxed [`ServiceHandle`] made by [`into_raw_service`].
//! Trait objects have no stable layout across compilers, so modules must be
//! built with the same toolchain as the host process.

use std::ffi::{CString, c_char, c_void};

use hwsvc_transport::ServiceHandle;
use tracing::warn;

/// Signature of an exported factory symbol.
pub type RawServiceFactory = unsafe extern "C" fn(instance: *const c_char) -> *mut c_void;

/// Moves `service` behind a pointer suitable for returning from a factory.
pub fn into_raw_service(service: Option<ServiceHandle>) -> *mut c_void {
	match service {
		Some(service) => Box::into_raw(Box::new(service)).cast(),
		None => std::ptr::null_mut(),
	}
}

/// Takes back a pointer produced by [`into_raw_service`].
///
/// # Safety
///
/// `ptr` must be null or come from [`into_raw_service`] and not have been
/// reclaimed already.
pub unsafe fn from_raw_service(ptr: *mut c_void) -> Option<ServiceHandle> {
	if ptr.is_null() {
		return None;
	}
	// SAFETY: Guaranteed by the caller.
	Some(*unsafe { Box::from_raw(ptr.cast::<ServiceHandle>()) })
}

pub(crate) fn call_raw_factory(factory: RawServiceFactory, instance: &str) -> Option<ServiceHandle> {
	let Ok(instance) = CString::new(instance) else {
		warn!(instance, "Instance name contains a NUL byte");
		return None;
	};
	// SAFETY: The factory follows the module ABI described above.
	unsafe { from_raw_service(factory(instance.as_ptr())) }
}

/// Exports a passthrough factory for interface `$name`.
///
/// ```ignore
/// hwsvc_management::export_passthrough_factory!(INfc, |instance| {
///     Some(Arc::new(Nfc::new(instance)) as ServiceHandle)
/// });
/// ```
///
/// expands to a `#[no_mangle]` function `HIDL_FETCH_INfc`.
#[macro_export]
macro_rules! export_passthrough_factory {
	($name:ident, $fetch:expr) => {
		$crate::__paste::paste! {
			#[unsafe(no_mangle)]
			#[allow(non_snake_case)]
			pub unsafe extern "C" fn [<HIDL_FETCH_ $name>](
				instance: *const ::std::ffi::c_char,
			) -> *mut ::std::ffi::c_void {
				let instance = if instance.is_null() {
					""
				} else {
					match unsafe { ::std::ffi::CStr::from_ptr(instance) }.to_str() {
						Ok(instance) => instance,
						Err(_) => return ::std::ptr::null_mut(),
					}
				};
				let fetch: fn(&str) -> ::std::option::Option<$crate::ServiceHandle> = $fetch;
				$crate::into_raw_service(fetch(instance))
			}
		}
	};
}
