mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sendlog_core::commands::Command;
use sendlog_core::{
    Address, ClientError, CountStore, RpcWallet, TransferController, Wallet, DEFAULT_CONTRACT,
};

#[derive(Parser)]
#[command(name = "sendlog", about = "Transfer-ledger client REPL", version)]
pub(crate) struct Cli {
    /// Wallet/node JSON-RPC endpoint
    #[arg(long, env = "SENDLOG_NODE_URL", default_value = "http://127.0.0.1:8545")]
    node: String,

    /// Deployed transfer-log contract address
    #[arg(long, env = "SENDLOG_CONTRACT", default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// Run without a wallet agent; operations that need one report it absent
    #[arg(long)]
    no_wallet: bool,

    /// Allow non-loopback plain-HTTP endpoints
    #[arg(long)]
    insecure: bool,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Count-cache directory (default: platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn build_controller(&self) -> Result<TransferController> {
        let contract: Address = self
            .contract
            .parse()
            .with_context(|| format!("Invalid contract address '{}'", self.contract))?;

        let wallet: Option<Arc<dyn Wallet>> = if self.no_wallet {
            None
        } else {
            Some(Arc::new(RpcWallet::new(&self.node, self.insecure)?))
        };

        let store = match &self.data_dir {
            Some(dir) => CountStore::open_in(dir)?,
            None => CountStore::open()?,
        };

        Ok(TransferController::new(wallet, contract, store))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let controller = cli.build_controller()?;

    startup(&controller).await;

    if let Some(cmd_str) = &cli.cmd {
        run_oneshot(&cli, &controller, cmd_str).await
    } else {
        repl::run_repl(&cli, &controller).await
    }
}

/// Startup sequence: silently adopt an already-authorized account, then cache
/// the remote count for the next cold start. Failures here are notices, not
/// fatal; the session continues disconnected.
async fn startup(controller: &TransferController) {
    match controller.check_existing_connection().await {
        Ok(Some(account)) => println!("Connected. Account: {account}"),
        Ok(None) => {}
        Err(ClientError::WalletAbsent) => println!("{}", ClientError::WalletAbsent),
        Err(_) => {} // cause already logged by the controller
    }

    if let Err(e) = controller.refresh_cached_count().await {
        log::debug!("count cache not refreshed at startup: {e}");
    }
}

async fn run_oneshot(cli: &Cli, controller: &TransferController, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    let output = command.execute(controller, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
