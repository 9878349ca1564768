//! Dashboard controller — fetches, parses and periodically refreshes widgets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use dashdeck_domain::content::WidgetContent;
use dashdeck_domain::error::WidgetFailure;
use dashdeck_domain::payload::WidgetData;
use dashdeck_domain::status::WidgetStatus;
use dashdeck_domain::widget::{WidgetConfig, WidgetDescriptor, WidgetName};

use crate::ports::{PageSurface, WidgetSource};

/// Owns the registered widgets and their refresh timers.
///
/// Every load outcome ends up on the [`PageSurface`]; no operation returns
/// a widget failure to its caller. Timers are aborted by [`stop`](Self::stop),
/// [`stop_all`](Self::stop_all) or when the controller is dropped.
pub struct DashboardController<S, P> {
    source: Arc<S>,
    surface: Arc<P>,
    widgets: RwLock<Vec<WidgetDescriptor>>,
    timers: Mutex<HashMap<WidgetName, JoinHandle<()>>>,
}

impl<S, P> DashboardController<S, P>
where
    S: WidgetSource + Send + Sync + 'static,
    P: PageSurface + Send + Sync + 'static,
{
    /// Create a controller fetching from `source` and writing into `surface`.
    pub fn new(source: S, surface: P) -> Self {
        Self::from_arcs(Arc::new(source), Arc::new(surface))
    }

    /// Create a controller from shared handles.
    ///
    /// Use this when the surface is also read elsewhere (e.g. by the HTTP
    /// adapter serving the page).
    pub fn from_arcs(source: Arc<S>, surface: Arc<P>) -> Self {
        Self {
            source,
            surface,
            widgets: RwLock::new(Vec::new()),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Register widgets, load each once, then start their refresh timers.
    ///
    /// A name given twice keeps its first position and its last config.
    /// Re-registering an already known widget replaces its config and timer.
    pub async fn initialize(&self, widgets: impl IntoIterator<Item = WidgetDescriptor>) {
        let mut batch: Vec<WidgetDescriptor> = Vec::new();
        for descriptor in widgets {
            match batch.iter_mut().find(|d| d.name == descriptor.name) {
                Some(existing) => *existing = descriptor,
                None => batch.push(descriptor),
            }
        }

        for descriptor in &batch {
            self.register(descriptor.clone());
        }
        tracing::info!(count = batch.len(), "initializing widgets");

        self.load_concurrently(batch.clone()).await;

        for descriptor in batch {
            self.stop(&descriptor.name);
            if let Some(period) = descriptor.config.refresh_period() {
                self.schedule(descriptor, period);
            }
        }
    }

    /// Fetch one widget and write the outcome to the page.
    ///
    /// Returns the status written to the widget's indicator.
    pub async fn load_widget(&self, name: &WidgetName, config: &WidgetConfig) -> WidgetStatus {
        load(&*self.source, &*self.surface, name, config).await
    }

    /// Reload every registered widget; loads run concurrently.
    pub async fn refresh_all(&self) {
        let widgets = self.widgets();
        tracing::debug!(count = widgets.len(), "refreshing all widgets");
        self.load_concurrently(widgets).await;
    }

    /// Reload the widget registered as `name`.
    ///
    /// Returns `false`, doing nothing, when no such widget is registered.
    pub async fn refresh_one(&self, name: &WidgetName) -> bool {
        let Some(config) = self.config_of(name) else {
            tracing::debug!(widget = %name, "refresh requested for unknown widget");
            return false;
        };
        self.load_widget(name, &config).await;
        true
    }

    /// Abort the refresh timer of `name`.
    ///
    /// Returns whether a timer was running.
    pub fn stop(&self, name: &WidgetName) -> bool {
        match self.timers().remove(name) {
            Some(handle) => {
                handle.abort();
                tracing::debug!(widget = %name, "refresh timer stopped");
                true
            }
            None => false,
        }
    }

    /// Abort every refresh timer.
    pub fn stop_all(&self) {
        let mut timers = self.timers();
        let count = timers.len();
        for (_, handle) in timers.drain() {
            handle.abort();
        }
        tracing::info!(count, "refresh timers stopped");
    }

    /// Registered widgets in registration order.
    #[must_use]
    pub fn widgets(&self) -> Vec<WidgetDescriptor> {
        self.widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether `name` has a live refresh timer.
    #[must_use]
    pub fn is_scheduled(&self, name: &WidgetName) -> bool {
        self.timers()
            .get(name)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn register(&self, descriptor: WidgetDescriptor) {
        let mut widgets = self.widgets.write().unwrap_or_else(PoisonError::into_inner);
        match widgets.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => widgets.push(descriptor),
        }
    }

    fn config_of(&self, name: &WidgetName) -> Option<WidgetConfig> {
        self.widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| &d.name == name)
            .map(|d| d.config.clone())
    }

    fn schedule(&self, descriptor: WidgetDescriptor, period: Duration) {
        let source = Arc::clone(&self.source);
        let surface = Arc::clone(&self.surface);
        let name = descriptor.name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                load(&*source, &*surface, &descriptor.name, &descriptor.config).await;
            }
        });

        tracing::debug!(widget = %name, ?period, "refresh timer started");
        if let Some(previous) = self.timers().insert(name, handle) {
            previous.abort();
        }
    }

    async fn load_concurrently(&self, widgets: Vec<WidgetDescriptor>) {
        let mut tasks = JoinSet::new();
        for descriptor in widgets {
            let source = Arc::clone(&self.source);
            let surface = Arc::clone(&self.surface);
            tasks.spawn(async move {
                load(&*source, &*surface, &descriptor.name, &descriptor.config).await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!(%err, "widget load task failed");
            }
        }
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<WidgetName, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, P> Drop for DashboardController<S, P> {
    fn drop(&mut self) {
        let timers = self.timers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }
}

async fn load<S, P>(source: &S, surface: &P, name: &WidgetName, config: &WidgetConfig) -> WidgetStatus
where
    S: WidgetSource,
    P: PageSurface,
{
    let outcome = match source.fetch(name).await {
        Ok(envelope) if envelope.is_success() => {
            let data = envelope.data.unwrap_or_else(|| Value::Object(Map::new()));
            WidgetData::parse(config.kind, data).map_err(WidgetFailure::from)
        }
        Ok(envelope) => Err(WidgetFailure::Application(
            envelope.message.unwrap_or_default(),
        )),
        Err(err) => Err(WidgetFailure::from(err)),
    };

    match outcome {
        Ok(data) => {
            surface.replace_content(name, WidgetContent::Data(data));
            surface.set_status(name, WidgetStatus::Online);
            tracing::debug!(widget = %name, kind = %config.kind, "widget loaded");
            WidgetStatus::Online
        }
        Err(failure) => {
            let status = failure.status();
            tracing::warn!(widget = %name, %status, error = %failure, "widget load failed");
            surface.replace_content(name, WidgetContent::Failure(failure.to_string()));
            surface.set_status(name, status);
            status
        }
    }
}
