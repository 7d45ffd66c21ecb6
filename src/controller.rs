//! Sync cycle orchestration.
//! The controller is the only place that sequences fetch, render, path
//! resolution, read, merge and write. Everything it calls into is either a
//! pure function (render, merge, path resolution) or a collaborator trait
//! (feed, document store, notifier), so the whole cycle can run against
//! in-memory fakes.
use crate::client::{FeedQuery, TimingsSource};
use crate::config::Config;
use crate::error::Error;
use crate::model::merge::{UNCHECKED_MARKER, merge_checkbox_state};
use crate::paths::OutputTarget;
use crate::render;
use crate::storage::DocumentStore;
use crate::system::{Notice, Notifier};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use strum::Display;

pub const SUCCESS_MESSAGE: &str = "Prayer times updated successfully!";

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Trigger {
    Startup,
    Manual,
    Timer,
}

/// Steps of a cycle, in order. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Rendering,
    PathResolving,
    Reading,
    Merging,
    Writing,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub trigger: Trigger,
    pub path: String,
    /// Whether the note existed before this write.
    pub existed: bool,
    /// Whether checkbox state was carried over from the previous note.
    pub merged: bool,
    /// The feed's date for the written schedule.
    pub date: NaiveDate,
}

#[derive(Debug)]
pub enum SyncOutcome {
    Written(SyncReport),
    /// Another cycle for the same note was still running.
    Skipped { path: String },
    Failed { phase: SyncPhase, error: Error },
}

impl SyncOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SyncOutcome::Written(_))
    }
}

/// Removes its path from the in-flight set when dropped.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    path: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<String>>>, path: &str) -> Option<Self> {
        let mut active = set.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(path.to_string()) {
            return None;
        }
        Some(Self {
            set: set.clone(),
            path: path.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut active = self.set.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.path);
    }
}

type PhaseResult<T> = Result<T, (SyncPhase, Error)>;

fn at(phase: SyncPhase) -> impl FnOnce(Error) -> (SyncPhase, Error) {
    move |e| (phase, e)
}

#[derive(Clone)]
pub struct SyncController {
    source: Arc<dyn TimingsSource>,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    config: Arc<RwLock<Arc<Config>>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SyncController {
    pub fn new(
        config: Config,
        source: Arc<dyn TimingsSource>,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            config: Arc::new(RwLock::new(Arc::new(config))),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The configuration the next cycle will use.
    pub fn config(&self) -> Arc<Config> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swaps in a new configuration. Cycles already running keep their snapshot.
    ///
    /// Only settings read per cycle take effect this way. When
    /// [`Config::requires_rebuild`] says the feed, vault or notifier changed,
    /// use [`SyncController::rebuilt`] instead.
    pub fn replace_config(&self, config: Config) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(config);
    }

    /// A controller with new collaborators and config that shares this one's
    /// in-flight set, so a cycle still running on the old store keeps blocking
    /// triggers for the same note.
    pub fn rebuilt(
        &self,
        config: Config,
        source: Arc<dyn TimingsSource>,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            config: Arc::new(RwLock::new(Arc::new(config))),
            in_flight: self.in_flight.clone(),
        }
    }

    /// Runs one cycle for today's date and reports the result to the user.
    pub async fn trigger(&self, trigger: Trigger) -> SyncOutcome {
        self.trigger_on(trigger, Local::now().date_naive()).await
    }

    /// Runs one cycle as if `today` were the current date.
    pub async fn trigger_on(&self, trigger: Trigger, today: NaiveDate) -> SyncOutcome {
        let config = self.config();

        let target = match OutputTarget::resolve(&config.output_location, today) {
            Ok(target) => target,
            Err(error) => return self.fail(trigger, SyncPhase::PathResolving, error),
        };

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &target.path) else {
            log::info!(
                "{} trigger dropped: a sync for '{}' is already running",
                trigger,
                target.path
            );
            return SyncOutcome::Skipped { path: target.path };
        };

        match self.run_cycle(trigger, &config, target).await {
            Ok(report) => {
                log::info!(
                    "{} sync wrote '{}' for {} (existed: {}, merged: {})",
                    trigger,
                    report.path,
                    report.date,
                    report.existed,
                    report.merged
                );
                self.notifier.notify(&Notice::success(SUCCESS_MESSAGE));
                SyncOutcome::Written(report)
            }
            Err((phase, error)) => self.fail(trigger, phase, error),
        }
    }

    /// Fetches and renders without touching the vault.
    pub async fn preview(&self) -> crate::error::Result<String> {
        let config = self.config();
        let schedule = self.source.fetch(&feed_query(&config)).await?;
        Ok(render::render(&schedule, &config.render_settings()))
    }

    async fn run_cycle(
        &self,
        trigger: Trigger,
        config: &Config,
        target: OutputTarget,
    ) -> PhaseResult<SyncReport> {
        log::debug!("{} sync: {}", trigger, SyncPhase::Fetching);
        let schedule = self
            .source
            .fetch(&feed_query(config))
            .await
            .map_err(at(SyncPhase::Fetching))?;

        log::debug!("{} sync: {}", trigger, SyncPhase::Rendering);
        let rendered = render::render(&schedule, &config.render_settings());

        log::debug!("{} sync: {} '{}'", trigger, SyncPhase::PathResolving, target.path);
        for dir in &target.ancestors {
            self.store
                .create_dir(dir)
                .map_err(at(SyncPhase::PathResolving))?;
        }

        log::debug!("{} sync: {}", trigger, SyncPhase::Reading);
        let previous = self
            .store
            .read(&target.path)
            .map_err(at(SyncPhase::Reading))?;
        let existed = previous.is_some();

        let (content, merged) = match previous {
            Some(previous) if rendered.contains(UNCHECKED_MARKER) => {
                log::debug!("{} sync: {}", trigger, SyncPhase::Merging);
                (merge_checkbox_state(&previous, &rendered), true)
            }
            _ => (rendered, false),
        };

        log::debug!("{} sync: {}", trigger, SyncPhase::Writing);
        self.store
            .write(&target.path, &content)
            .map_err(at(SyncPhase::Writing))?;

        Ok(SyncReport {
            trigger,
            path: target.path,
            existed,
            merged,
            date: schedule.date,
        })
    }

    fn fail(&self, trigger: Trigger, phase: SyncPhase, error: Error) -> SyncOutcome {
        log::error!("{} sync failed while {}: {}", trigger, phase, error);
        self.notifier.notify(&Notice::failure(error.user_message()));
        SyncOutcome::Failed { phase, error }
    }
}

fn feed_query(config: &Config) -> FeedQuery {
    FeedQuery {
        city: config.city.clone(),
        country: config.country.clone(),
        method: config.method,
    }
}
