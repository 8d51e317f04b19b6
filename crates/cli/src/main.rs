//! Passthrough module inspection.
//!
//! Shows which implementation modules a process would find for an interface,
//! and resolves them the same way an in-process lookup does.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hwsvc_fqname::FqName;
use hwsvc_management::{LIBRARY_SUFFIX, ModuleTarget, PassthroughServiceManager, ServiceManagementConfig, search};
use tracing::debug;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "hwsvc")]
#[command(about = "Inspect passthrough hardware service modules")]
struct Args {
	/// Configuration file (defaults to $HWSVC_CONFIG)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List candidate modules for an interface in every search root
	Search {
		/// Fully-qualified interface name, e.g. android.hardware.nfc@1.0::INfc
		fq_name: String,
	},
	/// Load an interface's module and fetch one instance
	Get {
		fq_name: String,
		#[arg(short, long, default_value = "default")]
		instance: String,
	},
	/// Print the effective search roots and transport endpoint
	Paths,
}

fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => ServiceManagementConfig::from_path(path)?,
		None => ServiceManagementConfig::load()?,
	};
	debug!(?config, "Loaded configuration");

	match args.command {
		Command::Search { fq_name } => {
			FqName::parse(&fq_name).with_context(|| format!("invalid interface name {fq_name:?}"))?;
			let target = ModuleTarget::for_interface(&fq_name).with_context(|| format!("{fq_name:?} is not a fully-qualified interface name"))?;
			for root in &config.library_paths {
				for library in search(root, &target.prefix, LIBRARY_SUFFIX) {
					println!("{}", root.join(library).display());
				}
			}
			println!("factory symbol: {}", target.symbol);
			Ok(ExitCode::SUCCESS)
		}
		Command::Get { fq_name, instance } => {
			let manager = PassthroughServiceManager::from_config(&config);
			match manager.resolve(&fq_name, &instance) {
				Some(service) => {
					println!("{}", service.interface_descriptor());
					for iface in service.interface_chain().iter().skip(1) {
						println!("  extends {iface}");
					}
					Ok(ExitCode::SUCCESS)
				}
				None => {
					eprintln!("no passthrough implementation of {fq_name}/{instance}");
					Ok(ExitCode::FAILURE)
				}
			}
		}
		Command::Paths => {
			println!("endpoint: {}", config.transport_endpoint.display());
			for (priority, root) in config.library_paths.iter().enumerate() {
				println!("{priority}: {}", root.display());
			}
			Ok(ExitCode::SUCCESS)
		}
	}
}
