use std::{future::Future, io::Write as _, path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use txscope_config::ViewerConfig;
use txscope_rpc::{RpcBlockSource, RpcSourceConfig};
use txscope_sync::{SyncConfig, SyncHandle, SyncService};

use crate::{
    input::{HELP, Input},
    table,
};

#[derive(Parser, Debug)]
#[command(name = "txscope")]
#[command(about = "Live list of value transfers in the most recent Ethereum blocks")]
pub(crate) struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP JSON-RPC endpoint of the node.
    #[arg(long, env = "TXSCOPE_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Blocks shown at startup, ending at the head.
    #[arg(long)]
    pub window_size: Option<u64>,

    /// Older blocks added by `more` without a count.
    #[arg(long)]
    pub load_more: Option<u64>,

    /// Interval between head polls in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub(crate) fn load_config(&self) -> eyre::Result<ViewerConfig> {
        let mut config = ViewerConfig::load(self.config.as_deref())?;

        if let Some(ref url) = self.rpc_url {
            config.rpc.url = url.clone();
        }
        if let Some(window_size) = self.window_size {
            config.window.window_size = window_size;
        }
        if let Some(load_more) = self.load_more {
            config.window.load_more_blocks = load_more;
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.rpc.poll_interval_ms = poll_interval_ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub(crate) async fn run(self) -> eyre::Result<()> {
        let config = self.load_config()?;
        info!(url = %config.rpc.url, window_size = config.window.window_size, "starting txscope");
        debug!(?config, "full configuration");

        let source_config = RpcSourceConfig::new(config.rpc.url.clone())
            .with_poll_interval(config.rpc.poll_interval())
            .with_request_timeout(config.rpc.request_timeout());
        let source = Arc::new(RpcBlockSource::new(&source_config)?);
        let sync_config = SyncConfig::new()
            .with_window_size(config.window.window_size)
            .with_load_more_blocks(config.window.load_more_blocks);

        let handle = SyncService::spawn(source, sync_config);
        let stdin = BufReader::new(tokio::io::stdin());
        let result = interact(&handle, stdin, tokio::signal::ctrl_c()).await;
        handle.shutdown().await;
        result
    }
}

/// Redraws on every snapshot and forwards typed commands until `quit` resolves, the input
/// ends or the user quits.
async fn interact<R, Q>(handle: &SyncHandle, input: R, quit: Q) -> eyre::Result<()>
where
    R: AsyncBufRead + Unpin,
    Q: Future,
{
    let mut snapshots = handle.watch();
    let mut lines = input.lines();
    tokio::pin!(quit);

    show(&table::render(&snapshots.borrow_and_update()))?;
    show(HELP)?;

    loop {
        tokio::select! {
            _ = &mut quit => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let screen = table::render(&snapshots.borrow_and_update());
                show(&screen)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::More(Some(blocks)) => handle.load_more(blocks).await?,
                    Input::More(None) => handle.load_more_default().await?,
                    Input::Retry => handle.retry().await?,
                    Input::Help => show(HELP)?,
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Invalid(message) => show(&message)?,
                }
            }
        }
    }
    Ok(())
}

fn show(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end())?;
    stdout.flush()
}
