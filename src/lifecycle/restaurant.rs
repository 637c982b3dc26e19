use crate::chef_actor;
use crate::config::{ConfigError, SimulationConfig};
use crate::model::ActorKind;
use crate::pipeline::PipelineState;
use crate::sink::{EventSink, FileEventLog, SinkError};
use crate::waiter_actor;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Errors surfaced while joining actors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{kind} {id} failed: {source}")]
    ActorFailed {
        kind: ActorKind,
        id: usize,
        #[source]
        source: JoinError,
    },
}

/// Errors surfaced by [`run_from_files`].
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot open order log: {0}")]
    Log(#[from] SinkError),
    #[error(transparent)]
    Run(#[from] LifecycleError),
}

/// Final counters of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub orders_placed: usize,
    pub orders_processed: usize,
    pub orders_served: usize,
    pub waiters_joined: usize,
    pub chefs_joined: usize,
    pub elapsed: Duration,
}

impl Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "placed {}, prepared {}, served {} ({} waiters, {} chefs, {:?})",
            self.orders_placed,
            self.orders_processed,
            self.orders_served,
            self.waiters_joined,
            self.chefs_joined,
            self.elapsed
        )
    }
}

/// The run-to-completion coordinator.
///
/// `Restaurant` is responsible for:
/// - **Construction**: Building the [`PipelineState`] sized from the config
/// - **Spawning**: Starting every waiter and chef in its own Tokio task
/// - **Joining**: Waiting for all waiters, then all chefs
///
/// # Example
///
/// ```ignore
/// let restaurant = Restaurant::open(config, Arc::new(MemoryEventLog::new()));
/// let report = restaurant.wait().await?;
/// assert_eq!(report.orders_served, report.orders_placed);
/// ```
pub struct Restaurant {
    state: Arc<PipelineState>,
    waiters: Vec<JoinHandle<()>>,
    chefs: Vec<JoinHandle<()>>,
    started: Instant,
}

impl Restaurant {
    /// Creates the shared state and spawns all actors.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(config: SimulationConfig, sink: Arc<dyn EventSink>) -> Self {
        info!(
            chefs = config.number_of_chefs,
            waiters = config.number_of_waiters,
            orders = config.number_of_orders,
            "Opening restaurant"
        );
        let state = Arc::new(PipelineState::new(config, sink));
        let config = state.config();

        let waiters = (0..config.number_of_waiters)
            .map(|id| tokio::spawn(waiter_actor::new(id, state.clone()).run()))
            .collect();
        let chefs = (0..config.number_of_chefs)
            .map(|id| tokio::spawn(chef_actor::new(id, state.clone()).run()))
            .collect();

        Self {
            state,
            waiters,
            chefs,
            started: Instant::now(),
        }
    }

    /// The state shared by every actor, for observation while the run is live.
    pub fn state(&self) -> &Arc<PipelineState> {
        &self.state
    }

    /// Joins every waiter, then every chef, and reports the final counters.
    ///
    /// If an actor task fails, the remaining actors are stopped and the error is
    /// returned.
    pub async fn wait(self) -> Result<RunReport, LifecycleError> {
        let Self {
            state,
            waiters,
            chefs,
            started,
        } = self;

        let waiters_joined = join_all(ActorKind::Waiter, waiters, &state).await?;
        info!(count = waiters_joined, "All waiters finished");
        let chefs_joined = join_all(ActorKind::Chef, chefs, &state).await?;
        info!(count = chefs_joined, "All chefs finished");

        Ok(RunReport {
            orders_placed: state.orders_placed(),
            orders_processed: state.orders_processed(),
            orders_served: state.orders_served(),
            waiters_joined,
            chefs_joined,
            elapsed: started.elapsed(),
        })
    }
}

/// Opens a restaurant and waits for it to finish.
pub async fn run(config: SimulationConfig, sink: Arc<dyn EventSink>) -> Result<RunReport, LifecycleError> {
    Restaurant::open(config, sink).wait().await
}

/// Loads the settings file, then opens the order log and runs to completion.
///
/// The log file is not created unless the settings are valid.
pub async fn run_from_files(config_path: &Path, log_path: &Path) -> Result<RunReport, StartupError> {
    let config = SimulationConfig::load(config_path)?;
    info!(path = %log_path.display(), "Settings loaded, opening order log");
    let sink = FileEventLog::open(log_path).await?;
    Ok(run(config, Arc::new(sink)).await?)
}

async fn join_all(
    kind: ActorKind,
    handles: Vec<JoinHandle<()>>,
    state: &PipelineState,
) -> Result<usize, LifecycleError> {
    let mut joined = 0;
    let mut handles = handles.into_iter().enumerate();
    while let Some((id, handle)) = handles.next() {
        if let Err(source) = handle.await {
            error!(%kind, id, error = %source, "Actor task failed");
            state.waiter_signal().cancel();
            state.chef_signal().cancel();
            for (_, rest) in handles {
                rest.abort();
            }
            return Err(LifecycleError::ActorFailed { kind, id, source });
        }
        joined += 1;
    }
    Ok(joined)
}
