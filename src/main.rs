//! modexec - run the skip-list execution module on a local host
//!
//! Usage:
//!   modexec --help

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mod_execution_any::{
    config::ConfigError,
    core::ADDRESS_SIZE,
    proto::{
        entry_point_id, AccountId, AddSkipEntryPointArgs, EntryPoint, ExecuteArgs,
        GetSkipEntryPointsResult, Manifest, OnInstallArgs, RemoveSkipEntryPointArgs,
    },
    Address, Contract, ExecutionAny, ExecutionContext, Host, HostConfig, ModuleError, Operation,
    Receipt, Transaction, MODULE_VERSION,
};
use prost::Message;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// State directory used when neither the config nor the command line sets one
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Parser)]
#[command(name = "modexec")]
#[command(version = MODULE_VERSION)]
#[command(about = "Skip-list execution module on a local host", long_about = None)]
struct Cli {
    /// Path to a JSON host config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// State directory (overrides the config; ./data when neither sets one)
    #[arg(short, long, global = true, conflicts_with = "memory")]
    data_dir: Option<PathBuf>,

    /// Keep state in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    /// Log level (overrides the config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show module and helper contract addresses, and the entry point table
    Info,

    /// Print the module manifest
    Manifest,

    /// Install the module for an account
    Install {
        /// Account that will own the module
        #[arg(long)]
        owner: Address,
    },

    /// Add an entry point to the skip list
    AddSkip {
        /// Entry point id (decimal, 0x-hex, or a name to hash)
        #[arg(value_parser = parse_entry_point)]
        entry_point: u32,

        /// Account signing the transaction
        #[arg(long)]
        signer: Address,
    },

    /// Remove an entry point from the skip list
    RemoveSkip {
        /// Entry point id (decimal, 0x-hex, or a name to hash)
        #[arg(value_parser = parse_entry_point)]
        entry_point: u32,

        /// Account signing the transaction
        #[arg(long)]
        signer: Address,
    },

    /// Print the skip list
    List,

    /// Print the owning account
    Owner,

    /// Send an operation through the module on behalf of an account
    Execute {
        /// Account sending the operation
        #[arg(long)]
        signer: Address,

        /// Target contract (defaults to the echo contract)
        #[arg(long)]
        contract: Option<Address>,

        /// Entry point id (decimal, 0x-hex, or a name to hash)
        #[arg(long, value_parser = parse_entry_point)]
        entry_point: u32,

        /// Hex-encoded call arguments
        #[arg(long, default_value = "")]
        args: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Info = cli.command {
        show_info();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    let host = match Host::new(config) {
        Ok(host) => host,
        Err(e) => {
            error!("Failed to start host: {}", e);
            return ExitCode::FAILURE;
        }
    };
    host.deploy(module_address(), Arc::new(ExecutionAny));
    host.deploy(echo_address(), Arc::new(Echo));

    let ok = match cli.command {
        Commands::Info => true,
        Commands::Manifest => show_manifest(&host),
        Commands::Install { owner } => install(&host, owner),
        Commands::AddSkip { entry_point, signer } => {
            let args = AddSkipEntryPointArgs { entry_point }.encode_to_vec();
            call_module(&host, signer, EntryPoint::AddSkipEntryPoint, args)
        }
        Commands::RemoveSkip { entry_point, signer } => {
            let args = RemoveSkipEntryPointArgs { entry_point }.encode_to_vec();
            call_module(&host, signer, EntryPoint::RemoveSkipEntryPoint, args)
        }
        Commands::List => show_skip_list(&host),
        Commands::Owner => show_owner(&host),
        Commands::Execute {
            signer,
            contract,
            entry_point,
            args,
        } => execute(&host, signer, contract.unwrap_or_else(echo_address), entry_point, &args),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(cli: &Cli) -> Result<HostConfig, ConfigError> {
    let mut config = match cli.config {
        Some(ref path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };

    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if cli.memory {
        config.data_dir = None;
    } else if config.data_dir.is_none() {
        config.data_dir = Some(PathBuf::from(DEFAULT_DATA_DIR));
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str) {
    let (max_level, unknown) = match level.parse::<Level>() {
        Ok(level) => (level, false),
        Err(_) => (Level::INFO, true),
    };

    let subscriber = FmtSubscriber::builder().with_max_level(max_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }
    if unknown {
        warn!("Unknown log level '{}', using info", level);
    }
}

/// Deterministic address for a helper contract
fn fixed_address(seed: &str) -> Address {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; ADDRESS_SIZE];
    bytes.copy_from_slice(&digest[..ADDRESS_SIZE]);
    Address::new(bytes)
}

fn module_address() -> Address {
    fixed_address("modexec/execution-any")
}

fn echo_address() -> Address {
    fixed_address("modexec/echo")
}

fn parse_entry_point(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).map_err(|e| format!("invalid entry point {}: {}", s, e));
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().map_err(|e| format!("invalid entry point {}: {}", s, e));
    }
    Ok(entry_point_id(s))
}

/// Account entry point: install the account's module
fn account_install_id() -> u32 {
    entry_point_id("install_module")
}

/// Account entry point: send an operation through the module
fn account_execute_id() -> u32 {
    entry_point_id("execute_user")
}

/// Local account contract that routes everything through one module
struct LocalAccount {
    module: Address,
}

impl LocalAccount {
    fn call_module(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: EntryPoint,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        ctx.call(&self.module, entry_point.id(), args)
            .map_err(|e| ModuleError::DownstreamCallFailed {
                code: e.code,
                contract: self.module,
                message: e.message_or_unknown().to_string(),
            })
    }
}

impl Contract for LocalAccount {
    fn invoke(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        if entry_point == account_install_id() {
            self.call_module(ctx, EntryPoint::OnInstall, &OnInstallArgs {}.encode_to_vec())
        } else if entry_point == account_execute_id() {
            self.call_module(ctx, EntryPoint::Execute, args)
        } else {
            Err(ModuleError::UnknownEntryPoint(entry_point))
        }
    }
}

/// Target that logs whatever reaches it
struct Echo;

impl Contract for Echo {
    fn invoke(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        ctx.log(&format!("echo {} {}", entry_point, hex::encode(args)));
        Ok(args.to_vec())
    }
}

fn print_receipt(receipt: &Receipt) {
    println!();
    if receipt.success {
        println!("Status: success");
    } else {
        println!("Status: failed (code {})", receipt.code);
        if let Some(ref e) = receipt.error {
            println!("Error:  {}", e);
        }
    }
    if !receipt.logs.is_empty() {
        println!("Logs:");
        for line in &receipt.logs {
            println!("  {}", line);
        }
    }
    println!();
}

/// Read-only call to the module, decoded
fn query<T: Message + Default>(host: &Host, entry_point: EntryPoint) -> Result<T, String> {
    let output = host
        .read(&module_address(), entry_point.id(), &[])
        .map_err(|e| e.message_or_unknown().to_string())?;
    T::decode(output.as_slice()).map_err(|e| e.to_string())
}

fn show_info() {
    println!();
    println!("mod-execution-any {}", MODULE_VERSION);
    println!("==========================");
    println!();
    println!("Module address:  {}", module_address());
    println!("Echo contract:   {}", echo_address());
    println!();
    println!("Entry points:");
    for ep in EntryPoint::ALL {
        let access = if ep.read_only() { "read" } else { "write" };
        println!("  0x{:08x}  {:<24} {}", ep.id(), ep.name(), access);
    }
    println!();
}

fn show_manifest(host: &Host) -> bool {
    match query::<Manifest>(host, EntryPoint::Manifest) {
        Ok(manifest) => {
            println!("Name:        {}", manifest.name);
            println!("Description: {}", manifest.description);
            println!("Type id:     {}", manifest.type_id);
            println!("Version:     {}", manifest.version);
            for scope in manifest.scopes {
                println!("Scope:       entry point {}", scope.entry_point);
            }
            true
        }
        Err(e) => {
            error!("Failed to read manifest: {}", e);
            false
        }
    }
}

fn install(host: &Host, owner: Address) -> bool {
    info!("Installing module {} for {}", module_address(), owner);
    host.deploy(owner, Arc::new(LocalAccount { module: module_address() }));

    let tx = Transaction::new(owner).with_operation(Operation::new(
        owner,
        account_install_id(),
        Vec::new(),
    ));
    let receipt = host.apply(&tx);
    print_receipt(&receipt);
    receipt.success
}

fn call_module(host: &Host, signer: Address, entry_point: EntryPoint, args: Vec<u8>) -> bool {
    let tx = Transaction::new(signer).with_operation(Operation::new(
        module_address(),
        entry_point.id(),
        args,
    ));
    let receipt = host.apply(&tx);
    print_receipt(&receipt);
    receipt.success
}

fn show_skip_list(host: &Host) -> bool {
    match query::<GetSkipEntryPointsResult>(host, EntryPoint::GetSkipEntryPoints) {
        Ok(result) if result.value.is_empty() => {
            println!("Skip list is empty");
            true
        }
        Ok(result) => {
            for ep in result.value {
                println!("{} (0x{:08x})", ep, ep);
            }
            true
        }
        Err(e) => {
            error!("Failed to read skip list: {}", e);
            false
        }
    }
}

fn show_owner(host: &Host) -> bool {
    let owner = query::<AccountId>(host, EntryPoint::GetAccountId)
        .and_then(|id| Address::from_slice(&id.value).map_err(|e| e.to_string()));
    match owner {
        Ok(owner) => {
            println!("{}", owner);
            true
        }
        Err(e) => {
            error!("Failed to read owner: {}", e);
            false
        }
    }
}

fn execute(host: &Host, signer: Address, contract: Address, entry_point: u32, args: &str) -> bool {
    let args = match hex::decode(args) {
        Ok(args) => args,
        Err(e) => {
            error!("Invalid hex arguments: {}", e);
            return false;
        }
    };

    host.deploy(signer, Arc::new(LocalAccount { module: module_address() }));
    let payload = ExecuteArgs {
        operation: Some(Operation::new(contract, entry_point, args).to_call()),
    };
    let tx = Transaction::new(signer).with_operation(Operation::new(
        signer,
        account_execute_id(),
        payload.encode_to_vec(),
    ));

    let receipt = host.apply(&tx);
    print_receipt(&receipt);
    receipt.success
}
