//! Timer-driven background tasks.
//!
//! The scheduler owns the two repeating jobs of the service: the dispatch
//! pass (every 60 seconds by default) and the completion sweep (every 24
//! hours by default). Each job runs one pass immediately on start and then
//! on its fixed period, with no jitter or backoff. Errors inside a pass are
//! logged and the loop continues; the next tick retries naturally.
//!
//! A single scheduler instance is assumed. The dispatch pass takes no
//! row-level claim, so running two processes against one database risks
//! duplicate delivery.

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{dispatch, sweeper},
};

pub struct Scheduler {
    app_state: AppState<State>,
    dispatch_period: Duration,
    sweep_period: Duration,
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(app_state: AppState<State>) -> Scheduler {
        let dispatch_period =
            Duration::from_secs(app_state.config.dispatch_interval);
        let sweep_period = Duration::from_secs(app_state.config.sweep_interval);
        let (stop_tx, _) = watch::channel(false);

        Scheduler {
            app_state,
            dispatch_period,
            sweep_period,
            stop_tx,
            tasks: Vec::new(),
        }
    }

    /// Spawns both repeating tasks. The first tick of each interval fires
    /// immediately, which gives the run-once-at-startup behavior.
    pub fn start(&mut self) {
        info!(
            "Starting reminder scheduler (dispatch every {:?}, sweep every {:?})",
            self.dispatch_period, self.sweep_period
        );

        let state = self.app_state.clone();
        let mut stop = self.stop_tx.subscribe();
        let period = self.dispatch_period;
        self.tasks.push(tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = dispatch::process_due(&state).await {
                            error!("Dispatch pass failed: {}", e);
                        }
                    },
                    _ = stop.changed() => break,
                }
            }
        }));

        let state = self.app_state.clone();
        let mut stop = self.stop_tx.subscribe();
        let period = self.sweep_period;
        self.tasks.push(tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = sweeper::complete_elapsed(&state).await {
                            error!("Completion sweep failed: {}", e);
                        }
                    },
                    _ = stop.changed() => break,
                }
            }
        }));
    }

    /// Signals both tasks to stop and waits for them to finish their
    /// current pass.
    pub async fn shutdown(self) -> Result<(), Error> {
        info!("Stopping reminder scheduler");
        let _ = self.stop_tx.send(true);

        for task in self.tasks {
            task.await?;
        }

        Ok(())
    }
}
