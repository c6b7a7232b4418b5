//! Animation Scheduler Actor
//!
//! Owns the tick loop: every `update_interval` ticks (1 tick = 50 ms) it
//! advances the title frame cursor, re-renders every connected client's
//! display and pushes the batch to the hub.
//!
//! The loop is a single task, so control messages and ticks are strictly
//! serialized: a Restart or Stop can never overlap an in-flight tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::messages::{HubMsg, SchedulerMsg};
use crate::board::{DisplayRegistry, TemplateStore};
use crate::viewer::Roster;

/// Milliseconds per tick
pub const TICK_MS: u64 = 50;

/// Upper bound on the tick period, so an absurd `update_interval` cannot
/// overflow the timer arithmetic
const MAX_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Scheduler Actor - drives the panel animation
pub struct SchedulerActor {
    rx: mpsc::Receiver<SchedulerMsg>,
    store: Arc<TemplateStore>,
    registry: Arc<DisplayRegistry>,
    roster: Arc<Roster>,
    hub_tx: mpsc::Sender<HubMsg>,
    max_clients: u32,
}

impl SchedulerActor {
    pub fn new(
        rx: mpsc::Receiver<SchedulerMsg>,
        store: Arc<TemplateStore>,
        registry: Arc<DisplayRegistry>,
        roster: Arc<Roster>,
        hub_tx: mpsc::Sender<HubMsg>,
        max_clients: u32,
    ) -> Self {
        Self {
            rx,
            store,
            registry,
            roster,
            hub_tx,
            max_clients,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let mut ticker = make_ticker(self.store.snapshot().update_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                msg = self.rx.recv() => match msg {
                    Some(SchedulerMsg::Refresh) => {
                        self.refresh().await;
                    }
                    Some(SchedulerMsg::Restart { interval }) => {
                        crate::debug!("board"; "restarting ticker at {} ticks", interval);
                        ticker = make_ticker(interval);
                    }
                    Some(SchedulerMsg::Stop { ack }) => {
                        self.clear().await;
                        let _ = ack.send(());
                    }
                    Some(SchedulerMsg::Shutdown) | None => {
                        crate::debug!("board"; "scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One animation step: advance the frame cursor, re-render, push.
    async fn tick(&self) {
        if !self.store.snapshot().enabled {
            return;
        }
        self.store.advance_cursor();
        self.push_all().await;
    }

    /// Forced refresh after a config mutation. Does not advance the cursor.
    async fn refresh(&self) {
        if self.store.snapshot().enabled {
            self.push_all().await;
        } else {
            self.clear().await;
        }
    }

    /// Drop all displays and tell clients to show the neutral display.
    async fn clear(&self) {
        self.registry.clear();
        let _ = self.hub_tx.send(HubMsg::Clear).await;
    }

    async fn push_all(&self) {
        let entries = self.roster.snapshot();
        if entries.is_empty() {
            return;
        }

        let template = self.store.snapshot();
        let frame = self.store.current_frame();
        let states = self
            .registry
            .refresh_all(&entries, &template, &frame, self.max_clients);

        crate::debug!("board"; "rendered {} displays", states.len());
        let _ = self.hub_tx.send(HubMsg::Push(states)).await;
    }
}

fn make_ticker(interval_ticks: u64) -> tokio::time::Interval {
    let millis = interval_ticks.max(1).saturating_mul(TICK_MS);
    let period = Duration::from_millis(millis).min(MAX_PERIOD);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable channel handle into the scheduler, used from sync contexts
/// (the rayon request pool).
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerMsg>,
}

impl SchedulerHandle {
    pub fn new(tx: mpsc::Sender<SchedulerMsg>) -> Self {
        Self { tx }
    }

    /// Request an out-of-cycle refresh of all displays.
    pub fn refresh(&self) {
        let _ = self.tx.blocking_send(SchedulerMsg::Refresh);
    }

    /// Re-arm the tick interval.
    pub fn restart(&self, interval: u64) {
        let _ = self.tx.blocking_send(SchedulerMsg::Restart { interval });
    }

    /// Stop displaying and wait until all displays are cleared.
    pub fn stop(&self) {
        let (ack_tx, ack_rx) = crossbeam::channel::bounded(1);
        if self
            .tx
            .blocking_send(SchedulerMsg::Stop { ack: ack_tx })
            .is_ok()
        {
            let _ = ack_rx.recv_timeout(Duration::from_secs(2));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PanelTemplate;
    use crate::render::ClientContext;

    fn services(lines: &[&str]) -> (Arc<TemplateStore>, Arc<DisplayRegistry>, Arc<Roster>) {
        // Long period so only the immediate first tick fires during a test
        let mut template = PanelTemplate::default();
        template.update_interval = 20;
        template.title_frames = vec!["&6A".to_string(), "&6B".to_string()];
        template.lines = lines.iter().map(|s| s.to_string()).collect();

        let roster = Roster::new();
        roster.add(ClientContext {
            name: "Steve".to_string(),
            ..ClientContext::default()
        });

        (
            Arc::new(TemplateStore::new(template)),
            Arc::new(DisplayRegistry::new()),
            Arc::new(roster),
        )
    }

    #[tokio::test]
    async fn test_tick_advances_cursor_and_pushes() {
        let (store, registry, roster) = services(&["%player%"]);
        let (sched_tx, sched_rx) = mpsc::channel(8);
        let (hub_tx, mut hub_rx) = mpsc::channel(8);

        let actor = SchedulerActor::new(
            sched_rx,
            Arc::clone(&store),
            Arc::clone(&registry),
            roster,
            hub_tx,
            10,
        );
        let handle = tokio::spawn(actor.run());

        // First tick fires immediately
        match hub_rx.recv().await.unwrap() {
            HubMsg::Push(states) => {
                assert_eq!(states.len(), 1);
                assert_eq!(states[0].lines[0].text, "Steve");
            }
            _ => panic!("expected push"),
        }
        assert_eq!(store.frame_index(), 1);

        let _ = sched_tx.send(SchedulerMsg::Shutdown).await;
        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_stop_clears_and_acks() {
        let (store, registry, roster) = services(&["line"]);
        let (sched_tx, sched_rx) = mpsc::channel(8);
        let (hub_tx, mut hub_rx) = mpsc::channel(8);

        registry.refresh_one(
            "Steve",
            &ClientContext::default(),
            &store.snapshot(),
            "t",
            1,
            10,
        );

        let actor = SchedulerActor::new(
            sched_rx,
            store,
            Arc::clone(&registry),
            roster,
            hub_tx,
            10,
        );
        let handle = tokio::spawn(actor.run());

        let (ack_tx, ack_rx) = crossbeam::channel::bounded(1);
        sched_tx
            .send(SchedulerMsg::Stop { ack: ack_tx })
            .await
            .unwrap();

        // Ack arrives only after the registry is empty
        tokio::task::spawn_blocking(move || {
            ack_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        })
        .await
        .unwrap();
        assert!(registry.is_empty());

        // A Clear must have been pushed to the hub (first tick may have
        // pushed a display before the stop)
        let mut saw_clear = false;
        while let Ok(msg) = hub_rx.try_recv() {
            if matches!(msg, HubMsg::Clear) {
                saw_clear = true;
            }
        }
        assert!(saw_clear);

        let _ = sched_tx.send(SchedulerMsg::Shutdown).await;
        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_huge_interval_does_not_overflow() {
        assert_eq!(make_ticker(u64::MAX).period(), MAX_PERIOD);
        assert_eq!(make_ticker(u64::MAX / 2).period(), MAX_PERIOD);
        assert_eq!(make_ticker(0).period(), Duration::from_millis(TICK_MS));
        assert_eq!(make_ticker(5).period(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_disabled_tick_is_noop() {
        let (store, registry, roster) = services(&["line"]);
        let mut template = store.snapshot().as_ref().clone();
        template.enabled = false;
        store.set(template);

        let (sched_tx, sched_rx) = mpsc::channel(8);
        let (hub_tx, mut hub_rx) = mpsc::channel(8);

        let actor = SchedulerActor::new(sched_rx, store, registry, roster, hub_tx, 10);
        let handle = tokio::spawn(actor.run());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(hub_rx.try_recv().is_err());

        let _ = sched_tx.send(SchedulerMsg::Shutdown).await;
        let _ = handle.await;
    }
}
