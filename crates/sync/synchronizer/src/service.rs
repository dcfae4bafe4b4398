//! Runs a synchronizer on its own task.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use txscope_primitives::BlockNumber;
use txscope_source::BlockSource;
use txscope_window::Window;

use crate::{BlockWindowSynchronizer, SyncConfig, SyncError, SyncSnapshot};

/// A user request forwarded to the synchronizer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Extend the window this many blocks into the past.
    LoadMore(u64),
    /// Re-run the failed operation.
    Retry,
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Command(SyncCommand),
    Head(BlockNumber),
}

/// Spawns [`BlockWindowSynchronizer`]s onto the tokio runtime.
///
/// The task initializes the synchronizer, then handles one event at a time: queued
/// commands in the order they were sent and head notifications coalesced into the
/// highest one. A shutdown request wins over every other event, also while a fetch is
/// in flight, and the head subscription is always released before the task ends.
#[derive(Debug, Clone, Copy)]
pub struct SyncService;

impl SyncService {
    /// Spawns a synchronizer over `source` and returns the handle controlling it.
    pub fn spawn<S: BlockSource + ?Sized>(source: Arc<S>, config: SyncConfig) -> SyncHandle {
        let (commands_tx, commands_rx) = mpsc::channel(config.command_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let load_more_blocks = config.load_more_blocks;

        let synchronizer = BlockWindowSynchronizer::new(source, config);
        let snapshots = synchronizer.watch();
        let task = tokio::spawn(Self::run(synchronizer, commands_rx, shutdown_rx));

        SyncHandle {
            commands: commands_tx,
            snapshots,
            load_more_blocks,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run<S: BlockSource + ?Sized>(
        mut synchronizer: BlockWindowSynchronizer<S>,
        mut commands: mpsc::Receiver<SyncCommand>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let initialized = tokio::select! {
            biased;
            _ = &mut shutdown => None,
            result = synchronizer.initialize() => Some(result),
        };

        match initialized {
            None => {
                synchronizer.shutdown();
                return;
            }
            Some(Ok(window)) => debug!(%window, "synchronizer initialized"),
            Some(Err(err)) => debug!(error = %err, "initialization failed, waiting for retry"),
        }

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                command = commands.recv() => match command {
                    Some(command) => Event::Command(command),
                    None => break,
                },
                Some(head) = synchronizer.next_head() => Event::Head(head),
            };

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = Self::handle(&mut synchronizer, event) => outcome,
            };
            if let Err(err) = outcome {
                debug!(?event, error = %err, "event not applied");
            }
        }

        synchronizer.shutdown();
    }

    async fn handle<S: BlockSource + ?Sized>(
        synchronizer: &mut BlockWindowSynchronizer<S>,
        event: Event,
    ) -> Result<Window, SyncError> {
        match event {
            Event::Head(head) => synchronizer.on_head_advance(head).await,
            Event::Command(SyncCommand::LoadMore(blocks)) => synchronizer.load_more(blocks).await,
            Event::Command(SyncCommand::Retry) => synchronizer.retry().await,
        }
    }
}

/// Controls a synchronizer task spawned by [`SyncService::spawn`].
///
/// Dropping the handle shuts the task down without waiting for it.
#[derive(Debug)]
pub struct SyncHandle {
    commands: mpsc::Sender<SyncCommand>,
    snapshots: watch::Receiver<SyncSnapshot>,
    load_more_blocks: u64,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Queues a command. Fails with [`SyncError::ShutDown`] once the task has ended.
    pub async fn send(&self, command: SyncCommand) -> Result<(), SyncError> {
        self.commands.send(command).await.map_err(|_| SyncError::ShutDown)
    }

    /// Queues a request for `blocks` older blocks.
    pub async fn load_more(&self, blocks: u64) -> Result<(), SyncError> {
        self.send(SyncCommand::LoadMore(blocks)).await
    }

    /// Queues a request for the configured number of older blocks.
    pub async fn load_more_default(&self) -> Result<(), SyncError> {
        self.load_more(self.load_more_blocks).await
    }

    /// Queues a retry of the failed operation.
    pub async fn retry(&self) -> Result<(), SyncError> {
        self.send(SyncCommand::Retry).await
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SyncSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    pub fn watch(&self) -> watch::Receiver<SyncSnapshot> {
        self.snapshots.clone()
    }

    /// Stops the task, interrupting any fetch in flight, and waits until the head
    /// subscription has been released.
    pub async fn shutdown(mut self) {
        self.signal_shutdown();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "synchronizer task ended abnormally");
            }
        }
        info!("sync service stopped");
    }

    fn signal_shutdown(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone.
            let _ = shutdown.send(());
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

#[cfg(test)]
mod tests {
    use txscope_source::MemoryBlockSource;

    use super::*;
    use crate::SyncState;

    async fn settled(handle: &SyncHandle) -> SyncSnapshot {
        let mut snapshots = handle.watch();
        snapshots
            .wait_for(|snapshot| matches!(snapshot.state, SyncState::Idle | SyncState::Failed))
            .await
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn spawn_initializes() {
        let source = Arc::new(MemoryBlockSource::with_head(7));
        let handle = SyncService::spawn(Arc::clone(&source), SyncConfig::default());

        let snapshot = settled(&handle).await;

        assert_eq!(snapshot.window, Some(Window::single(7)));
        handle.shutdown().await;
        assert_eq!(source.released_subscriptions(), 1);
    }

    #[tokio::test]
    async fn commands_fail_after_shutdown() {
        let source = Arc::new(MemoryBlockSource::with_head(7));
        let handle = SyncService::spawn(Arc::clone(&source), SyncConfig::default());
        settled(&handle).await;
        let snapshots = handle.watch();
        let commands = handle.commands.clone();

        handle.shutdown().await;

        assert_eq!(snapshots.borrow().state, SyncState::Stopped);
        assert!(commands.send(SyncCommand::Retry).await.is_err());
    }
}
