//! Actor Coordinator - Wires up the Panel Actor System
//!
//! # Responsibility
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Creates communication channels
//! - Wires up actors
//! - Runs them concurrently
//!
//! # Architecture
//!
//! ```text
//! SchedulerActor --> HubActor --> viewer clients
//!       ^
//!   web api (SchedulerHandle)
//! ```

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::hub::HubActor;
use super::messages::{HubMsg, SchedulerMsg};
use super::scheduler::{SchedulerActor, SchedulerHandle};
use crate::board::{DisplayRegistry, TemplateStore};
use crate::viewer::Roster;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    store: Arc<TemplateStore>,
    registry: Arc<DisplayRegistry>,
    roster: Arc<Roster>,
    viewer_port: u16,
    max_clients: u32,
    sched_tx: mpsc::Sender<SchedulerMsg>,
    sched_rx: mpsc::Receiver<SchedulerMsg>,
    /// Optional shutdown signal receiver
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create the coordinator plus the scheduler handle for the web api.
    ///
    /// The scheduler channel is created here, before the runtime exists, so
    /// the HTTP side can hold its end while the actors spin up in another
    /// thread.
    pub fn new(
        store: Arc<TemplateStore>,
        registry: Arc<DisplayRegistry>,
        roster: Arc<Roster>,
        viewer_port: u16,
        max_clients: u32,
    ) -> (Self, SchedulerHandle) {
        let (sched_tx, sched_rx) = mpsc::channel::<SchedulerMsg>(CHANNEL_BUFFER);
        let handle = SchedulerHandle::new(sched_tx.clone());

        (
            Self {
                store,
                registry,
                roster,
                viewer_port,
                max_clients,
                sched_tx,
                sched_rx,
                shutdown_rx: None,
            },
            handle,
        )
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        let (hub_tx, hub_rx) = mpsc::channel::<HubMsg>(CHANNEL_BUFFER);

        // Start viewer accept server
        match crate::viewer::server::start_viewer_server(self.viewer_port, hub_tx.clone()) {
            Ok(actual_port) => {
                crate::log!("viewer"; "ws://0.0.0.0:{}", actual_port);
            }
            Err(e) => {
                return Err(anyhow::anyhow!("viewer server failed: {}", e));
            }
        }

        let hub_actor = HubActor::new(
            hub_rx,
            Arc::clone(&self.roster),
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            self.max_clients,
        );
        let scheduler_actor = SchedulerActor::new(
            self.sched_rx,
            self.store,
            self.registry,
            self.roster,
            hub_tx.clone(),
            self.max_clients,
        );

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        run_actors(
            scheduler_actor,
            hub_actor,
            self.sched_tx,
            hub_tx,
            shutdown_rx,
        )
        .await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// Run all actors concurrently
async fn run_actors(
    scheduler: SchedulerActor,
    hub: HubActor,
    sched_tx: mpsc::Sender<SchedulerMsg>,
    hub_tx: mpsc::Sender<HubMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let mut scheduler_handle = tokio::spawn(async move { scheduler.run().await });
    let mut hub_handle = tokio::spawn(async move { hub.run().await });

    // Wait for shutdown signal (poll-based since crossbeam channel)
    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            // Small sleep to avoid busy-waiting
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut scheduler_handle => return,
            _ = &mut hub_handle => return,
        }
    }

    // Shut actors down in order: scheduler first so no push races the
    // hub closing its clients
    let _ = sched_tx.send(SchedulerMsg::Shutdown).await;
    let _ = hub_tx.send(HubMsg::Shutdown).await;

    let _ = tokio::time::timeout(std::time::Duration::from_millis(500), async {
        let _ = scheduler_handle.await;
        let _ = hub_handle.await;
    })
    .await;
}
