use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches the settings file and signals changes on a channel.
///
/// Dropping the watcher stops the notifications.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver yielding one `()` per burst of changes
    pub fn new(path: impl Into<PathBuf>) -> Result<(Self, mpsc::UnboundedReceiver<()>)> {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let file_name = path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |event: notify::Result<Event>| match event {
                Ok(event)
                    if Self::is_change(&event.kind)
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name) =>
                {
                    // Receiver gone means the server is shutting down
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => error!("Watch error: {:?}", e),
            },
            Config::default(),
        )?;

        // Watch the parent so editors that replace the file are still seen
        let target = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if Path::new(&path).exists() {
            watcher.watch(&target, RecursiveMode::NonRecursive)?;
            info!("Watching configuration file: {}", path.display());
        } else {
            warn!("Configuration file does not exist, not watching: {}", path.display());
        }

        Ok((Self { _watcher: watcher }, rx))
    }

    fn is_change(kind: &EventKind) -> bool {
        matches!(
            kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        )
    }

    /// Wait for the next change, swallowing the rest of its burst
    pub async fn next_change(rx: &mut mpsc::UnboundedReceiver<()>) -> Option<()> {
        rx.recv().await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        while rx.try_recv().is_ok() {}
        Some(())
    }
}
