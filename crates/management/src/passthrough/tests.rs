use std::any::Any;
use std::collections::HashMap;
use std::path::Path;

use hwsvc_transport::HwBase;
use parking_lot::Mutex;

use super::*;
use crate::error::LoadError;

const IFACE: &str = "android.hardware.nfc@1.0::INfc";
const SYMBOL: &str = "HIDL_FETCH_INfc";

struct TestService {
	library: PathBuf,
	instance: String,
}

impl HwBase for TestService {
	fn interface_descriptor(&self) -> String {
		IFACE.to_string()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

fn downcast(service: &ServiceHandle) -> &TestService {
	service.as_any().downcast_ref::<TestService>().unwrap()
}

/// Loader that accepts only registered paths and records every attempt.
#[derive(Clone, Default)]
struct FakeLoader {
	modules: Arc<HashMap<PathBuf, Vec<&'static str>>>,
	opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeLoader {
	fn new(modules: impl IntoIterator<Item = (PathBuf, Vec<&'static str>)>) -> Self {
		Self {
			modules: Arc::new(modules.into_iter().collect()),
			opened: Arc::default(),
		}
	}

	fn opened(&self) -> Vec<PathBuf> {
		self.opened.lock().clone()
	}
}

impl ModuleLoader for FakeLoader {
	fn open(&self, path: &Path) -> Result<Box<dyn ModuleHandle>, LoadError> {
		self.opened.lock().push(path.to_path_buf());
		match self.modules.get(path) {
			Some(symbols) => Ok(Box::new(FakeModule {
				path: path.to_path_buf(),
				symbols: symbols.clone(),
			})),
			None => Err(LoadError {
				path: path.to_path_buf(),
				reason: "invalid ELF header".into(),
			}),
		}
	}
}

struct FakeModule {
	path: PathBuf,
	symbols: Vec<&'static str>,
}

impl ModuleHandle for FakeModule {
	fn lookup(&self, symbol: &str) -> Option<Factory> {
		if !self.symbols.iter().any(|s| *s == symbol) {
			return None;
		}
		let library = self.path.clone();
		Some(Box::new(move |instance: &str| {
			if instance == "absent" {
				return None;
			}
			Some(Arc::new(TestService {
				library: library.clone(),
				instance: instance.to_string(),
			}) as ServiceHandle)
		}))
	}
}

/// Three search roots under one scratch directory.
struct Roots {
	_dir: tempfile::TempDir,
	odm: PathBuf,
	vendor: PathBuf,
	system: PathBuf,
}

impl Roots {
	fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		let [odm, vendor, system] = ["odm", "vendor", "system"].map(|root| {
			let path = dir.path().join(root);
			std::fs::create_dir(&path).unwrap();
			path
		});
		Self {
			_dir: dir,
			odm,
			vendor,
			system,
		}
	}

	fn paths(&self) -> Vec<PathBuf> {
		vec![self.odm.clone(), self.vendor.clone(), self.system.clone()]
	}
}

fn touch(dir: &Path, name: &str) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, b"").unwrap();
	path
}

#[test]
fn test_first_loadable_candidate_wins() {
	let roots = Roots::new();
	touch(&roots.odm, "android.hardware.light@2.0-impl.so");
	let broken = touch(&roots.vendor, "android.hardware.nfc@1.0-impl-broken.so");
	let good = touch(&roots.vendor, "android.hardware.nfc@1.0-impl.so");
	let system = touch(&roots.system, "android.hardware.nfc@1.0-impl.so");

	let loader = FakeLoader::new([(good.clone(), vec![SYMBOL]), (system.clone(), vec![SYMBOL])]);
	let manager = PassthroughServiceManager::with_loader(roots.paths(), loader.clone());

	let service = manager.resolve(IFACE, "default").unwrap();
	assert_eq!(downcast(&service).library, good);
	assert_eq!(downcast(&service).instance, "default");

	let opened = loader.opened();
	assert!(opened.contains(&good));
	assert!(opened.iter().all(|p| *p == good || *p == broken), "unexpected loads: {opened:?}");
}

#[test]
fn test_missing_symbol_does_not_fall_through() {
	let roots = Roots::new();
	let vendor = touch(&roots.vendor, "android.hardware.nfc@1.0-impl.so");
	let system = touch(&roots.system, "android.hardware.nfc@1.0-impl.so");

	let loader = FakeLoader::new([(vendor.clone(), vec!["HIDL_FETCH_ILight"]), (system, vec![SYMBOL])]);
	let manager = PassthroughServiceManager::with_loader(roots.paths(), loader.clone());

	assert!(manager.resolve(IFACE, "default").is_none());
	assert_eq!(loader.opened(), vec![vendor]);
}

#[test]
fn test_invalid_names_touch_nothing() {
	let roots = Roots::new();
	let module = touch(&roots.vendor, "android.hardware.nfc@1.0-impl.so");
	let loader = FakeLoader::new([(module, vec![SYMBOL])]);
	let manager = PassthroughServiceManager::with_loader(roots.paths(), loader.clone());

	for name in ["not a name", "android.hardware.nfc@1.0", "INfc", "@1.0::INfc", ""] {
		assert!(manager.resolve(name, "default").is_none(), "{name:?} resolved");
	}
	assert!(loader.opened().is_empty());
}

#[test]
fn test_module_target() {
	assert_eq!(
		ModuleTarget::for_interface(IFACE),
		Some(ModuleTarget {
			prefix: "android.hardware.nfc@1.0-impl".to_string(),
			symbol: SYMBOL.to_string(),
		})
	);
	for name in ["INfc", "@1.0::INfc", "android.hardware.nfc@1.0", "android.hardware.nfc::INfc", "not a name"] {
		assert_eq!(ModuleTarget::for_interface(name), None, "{name:?}");
	}
}

#[test]
fn test_no_candidates() {
	let dir = tempfile::tempdir().unwrap();
	let loader = FakeLoader::default();
	let manager = PassthroughServiceManager::with_loader(vec![dir.path().join("odm"), dir.path().join("vendor")], loader.clone());

	assert!(manager.resolve(IFACE, "default").is_none());
	assert!(loader.opened().is_empty());
}

#[test]
fn test_factory_result_is_propagated() {
	let roots = Roots::new();
	let module = touch(&roots.system, "android.hardware.nfc@1.0-impl.so");
	let loader = FakeLoader::new([(module, vec![SYMBOL])]);
	let manager = PassthroughServiceManager::with_loader(roots.paths(), loader);

	assert!(manager.resolve(IFACE, "absent").is_none());
	let service = manager.get(IFACE, "secondary").unwrap().unwrap();
	assert_eq!(downcast(&service).instance, "secondary");
}

#[test]
fn test_concurrent_resolutions_are_independent() {
	let roots = Roots::new();
	let module = touch(&roots.vendor, "android.hardware.nfc@1.0-impl.so");
	let loader = FakeLoader::new([(module, vec![SYMBOL])]);
	let manager = Arc::new(PassthroughServiceManager::with_loader(roots.paths(), loader.clone()));

	let handles: Vec<_> = (0..4)
		.map(|i| {
			let manager = manager.clone();
			std::thread::spawn(move || manager.resolve(IFACE, &format!("instance{i}")))
		})
		.collect();

	for handle in handles {
		assert!(handle.join().unwrap().is_some());
	}
	assert_eq!(loader.opened().len(), 4);
}

#[test]
fn test_dl_loader_rejects_non_library() {
	let roots = Roots::new();
	std::fs::write(roots.vendor.join("android.hardware.nfc@1.0-impl.so"), b"not a shared object").unwrap();
	let manager = PassthroughServiceManager::new(roots.paths());

	assert!(manager.resolve(IFACE, "default").is_none());
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_dl_loader_resolves_real_symbols() {
	let libc = DlLoader.open(Path::new("libc.so.6")).unwrap();
	assert!(libc.lookup(SYMBOL).is_none());

	// `getenv` has the factory signature and returns null for unset names.
	let getenv = libc.lookup("getenv").unwrap();
	assert!(getenv("HWSVC_TEST_UNSET_VARIABLE").is_none());
}

#[test]
fn test_from_config_keeps_root_order() {
	let config = ServiceManagementConfig {
		library_paths: vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")],
		..Default::default()
	};
	let manager = PassthroughServiceManager::from_config(&config);
	assert_eq!(manager.search_paths(), &[PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]);
}

crate::export_passthrough_factory!(ITestFactory, |instance| {
	Some(Arc::new(TestService {
		library: PathBuf::from("in-process"),
		instance: instance.to_string(),
	}) as ServiceHandle)
});

#[test]
fn test_exported_factory_roundtrip() {
	let service = factory::call_raw_factory(HIDL_FETCH_ITestFactory, "default").unwrap();
	assert_eq!(downcast(&service).instance, "default");
	assert_eq!(Arc::strong_count(&service), 1);

	assert!(factory::call_raw_factory(HIDL_FETCH_ITestFactory, "bad\0name").is_none());
	// SAFETY: Null is always accepted.
	assert!(unsafe { from_raw_service(std::ptr::null_mut()) }.is_none());
}
