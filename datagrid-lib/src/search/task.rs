//! Owned, cancellable debounce timer running on tokio.
//!
//! A [`SearchTask`] is the handle to a spawned task that owns a
//! [`Debouncer`]. Keystrokes go in through the handle, committed terms come
//! out of the receiver returned by [`SearchTask::spawn`]. Dropping the handle
//! tears the task down: no commit is delivered afterwards.

use std::time::Duration;

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::Debouncer;

#[derive(Debug)]
enum Command {
    Input(String),
    Reset,
}

/// Handle to a running debounce task.
#[derive(Debug)]
pub struct SearchTask {
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
}

impl SearchTask {
    /// Spawn the task on the current tokio runtime.
    ///
    /// Returns the handle and the stream of committed terms.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(run(
            Debouncer::new(delay),
            command_rx,
            commit_tx,
            cancel.clone(),
        ));

        (Self { commands, cancel }, commit_rx)
    }

    /// Forward a keystroke (the full input text after the edit).
    ///
    /// Returns `false` if the task has already stopped.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.send(Command::Input(text.into()))
    }

    /// Clear the text and drop any pending commit, keeping the task alive.
    pub fn reset(&self) -> bool {
        self.send(Command::Reset)
    }

    /// Stop the task. Pending commits are discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn send(&self, command: Command) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(mpsc::error::SendError(command)) => {
                trace!("Search task stopped, dropping {:?}", command);
                false
            }
        }
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn sleep_until_optional(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(d) => sleep_until(Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run(
    mut debouncer: Debouncer,
    mut commands: mpsc::UnboundedReceiver<Command>,
    commits: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
) {
    loop {
        let deadline = debouncer.deadline();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Search task cancelled");
                break;
            }
            command = commands.recv() => match command {
                Some(Command::Input(text)) => debouncer.input(text, Instant::now().into_std()),
                Some(Command::Reset) => {
                    trace!("Search task reset");
                    debouncer.reset();
                }
                None => break,
            },
            _ = sleep_until_optional(deadline) => {
                if let Some(term) = debouncer.poll(Instant::now().into_std())
                    && commits.send(term).is_err()
                {
                    break;
                }
            }
        }
    }
}
