use std::sync::Arc;

use futures::stream::BoxStream;
use shared::{
    domain::{DiagnosisRecord, FilterSelection, Locale},
    error::FetchError,
};
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_stream::{
    wrappers::{UnboundedReceiverStream, WatchStream},
    Stream, StreamExt,
};
use tracing::{debug, info, warn};

use crate::{
    filter::FilterState,
    locale::LocaleStore,
    source::DiagnosisSource,
    strings::{BundledStrings, StringArg, StringResolver, CHANGE_LANGUAGE, HOME_TITLE, TOTAL_FORMAT},
};

const EVENT_CAPACITY: usize = 256;

/// The three trigger streams a view feeds into the coordinator.
pub struct Input {
    pub view_active: BoxStream<'static, ()>,
    pub filter_changed: BoxStream<'static, FilterSelection>,
    pub locale_changed: BoxStream<'static, ()>,
}

impl Input {
    pub fn from_streams(
        view_active: impl Stream<Item = ()> + Send + 'static,
        filter_changed: impl Stream<Item = FilterSelection> + Send + 'static,
        locale_changed: impl Stream<Item = ()> + Send + 'static,
    ) -> Self {
        Self {
            view_active: Box::pin(view_active),
            filter_changed: Box::pin(filter_changed),
            locale_changed: Box::pin(locale_changed),
        }
    }

    /// Channel-backed input plus the handle used to fire its triggers.
    pub fn channel() -> (Triggers, Self) {
        let (view_tx, view_rx) = mpsc::unbounded_channel();
        let (filter_tx, filter_rx) = mpsc::unbounded_channel();
        let (locale_tx, locale_rx) = mpsc::unbounded_channel();
        let triggers = Triggers {
            view_active: view_tx,
            filter_changed: filter_tx,
            locale_changed: locale_tx,
        };
        let input = Self::from_streams(
            UnboundedReceiverStream::new(view_rx),
            UnboundedReceiverStream::new(filter_rx),
            UnboundedReceiverStream::new(locale_rx),
        );
        (triggers, input)
    }
}

/// Sending half of [`Input::channel`]. Dropping every clone ends the inputs.
#[derive(Clone)]
pub struct Triggers {
    view_active: mpsc::UnboundedSender<()>,
    filter_changed: mpsc::UnboundedSender<FilterSelection>,
    locale_changed: mpsc::UnboundedSender<()>,
}

impl Triggers {
    pub fn view_active(&self) {
        if self.view_active.send(()).is_err() {
            debug!(trigger = "view_active", "coordinator stopped; trigger dropped");
        }
    }

    pub fn select_filter(&self, selection: FilterSelection) {
        if self.filter_changed.send(selection).is_err() {
            debug!(trigger = "filter_changed", "coordinator stopped; trigger dropped");
        }
    }

    pub fn select_filter_raw(&self, index: i64) {
        self.select_filter(FilterSelection::from_index(index));
    }

    /// Re-renders with the current locale. Toggles made through the
    /// coordinator's own [`LocaleStore`] are picked up without it.
    pub fn locale_changed(&self) {
        if self.locale_changed.send(()).is_err() {
            debug!(trigger = "locale_changed", "coordinator stopped; trigger dropped");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub items: Vec<DiagnosisRecord>,
    pub count_text: String,
}

/// One complete derived output. `list` stays `None` until the first fetch
/// result (success or failure) has landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub locale: Locale,
    pub filter: FilterSelection,
    pub title_text: String,
    pub filter_labels: Vec<String>,
    pub change_language_label: String,
    pub list: Option<ListView>,
}

impl Rendered {
    pub fn items(&self) -> Option<&[DiagnosisRecord]> {
        self.list.as_ref().map(|list| list.items.as_slice())
    }

    pub fn count_text(&self) -> Option<&str> {
        self.list.as_ref().map(|list| list.count_text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    FetchStarted { generation: u64 },
    FetchApplied { generation: u64, count: usize },
    FetchFailed { generation: u64, error: FetchError },
    StaleDiscarded { generation: u64, latest: u64 },
}

/// Consumer side of [`HomeCoordinator::transform`]. Dropping it stops the
/// coordinator.
pub struct Output {
    rendered: watch::Receiver<Rendered>,
    driver: JoinHandle<()>,
}

impl Output {
    pub fn current(&self) -> Rendered {
        self.rendered.borrow().clone()
    }

    /// Waits for the next recomputation. Returns `None` once the coordinator
    /// has stopped.
    pub async fn changed(&mut self) -> Option<Rendered> {
        self.rendered.changed().await.ok()?;
        Some(self.rendered.borrow_and_update().clone())
    }

    /// Latest-value stream of whole snapshots, starting with the current one.
    pub fn snapshots(&self) -> WatchStream<Rendered> {
        WatchStream::new(self.rendered.clone())
    }

    pub fn items(&self) -> impl Stream<Item = Vec<DiagnosisRecord>> + Send + 'static {
        self.snapshots()
            .filter_map(|rendered| rendered.list.map(|list| list.items))
    }

    pub fn count_text(&self) -> impl Stream<Item = String> + Send + 'static {
        self.snapshots()
            .filter_map(|rendered| rendered.list.map(|list| list.count_text))
    }

    pub fn title_text(&self) -> impl Stream<Item = String> + Send + 'static {
        self.snapshots().map(|rendered| rendered.title_text)
    }

}

impl Drop for Output {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

pub struct HomeCoordinator {
    source: Arc<dyn DiagnosisSource>,
    locale: Arc<LocaleStore>,
    strings: Arc<dyn StringResolver>,
    events: broadcast::Sender<CoordinatorEvent>,
}

impl HomeCoordinator {
    pub fn new(source: Arc<dyn DiagnosisSource>, locale: Arc<LocaleStore>) -> Self {
        Self::new_with_dependencies(source, locale, Arc::new(BundledStrings))
    }

    pub fn new_with_dependencies(
        source: Arc<dyn DiagnosisSource>,
        locale: Arc<LocaleStore>,
        strings: Arc<dyn StringResolver>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            locale,
            strings,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    /// Starts a driver task that owns the coordinator state and folds the
    /// three inputs into [`Rendered`] snapshots. Must be called from within a
    /// Tokio runtime.
    ///
    /// The filter starts at `All` and the locale starts with an initial tick,
    /// so the title is available immediately and the list appears as soon as
    /// the first fetch lands.
    pub fn transform(&self, input: Input) -> Output {
        let state = CoordinatorState::default();
        let initial = render(&state, self.locale.current(), self.strings.as_ref());
        let (rendered_tx, rendered_rx) = watch::channel(initial);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let locale_updates = self.locale.on_change();

        let driver = Driver {
            source: Arc::clone(&self.source),
            locale: Arc::clone(&self.locale),
            strings: Arc::clone(&self.strings),
            events: self.events.clone(),
            rendered: rendered_tx,
            completions: completions_tx,
            state,
            in_flight: 0,
        };
        let driver = tokio::spawn(driver.run(input, locale_updates, completions_rx));

        Output {
            rendered: rendered_rx,
            driver,
        }
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    records: Vec<DiagnosisRecord>,
    landed: bool,
    filter: FilterState,
    generation: u64,
}

struct Completion {
    generation: u64,
    result: Result<Vec<DiagnosisRecord>, FetchError>,
}

struct Driver {
    source: Arc<dyn DiagnosisSource>,
    locale: Arc<LocaleStore>,
    strings: Arc<dyn StringResolver>,
    events: broadcast::Sender<CoordinatorEvent>,
    rendered: watch::Sender<Rendered>,
    completions: mpsc::UnboundedSender<Completion>,
    state: CoordinatorState,
    in_flight: usize,
}

impl Driver {
    async fn run(
        mut self,
        input: Input,
        mut locale_updates: WatchStream<Locale>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        let Input {
            mut view_active,
            mut filter_changed,
            mut locale_changed,
        } = input;
        let (mut view_open, mut filter_open, mut locale_open) = (true, true, true);

        loop {
            if !view_open && !filter_open && !locale_open && self.in_flight == 0 {
                debug!("all coordinator inputs ended");
                break;
            }

            tokio::select! {
                biased;
                _ = self.rendered.closed() => {
                    debug!("coordinator output dropped");
                    break;
                }
                selection = filter_changed.next(), if filter_open => match selection {
                    Some(selection) => {
                        self.state.filter.select(selection);
                        self.publish();
                    }
                    None => filter_open = false,
                },
                tick = locale_changed.next(), if locale_open => match tick {
                    Some(()) => self.publish(),
                    None => locale_open = false,
                },
                Some(_) = locale_updates.next() => self.publish(),
                trigger = view_active.next(), if view_open => match trigger {
                    Some(()) => self.start_fetch(),
                    None => view_open = false,
                },
                Some(completion) = completions.recv(), if self.in_flight > 0 => {
                    self.apply(completion);
                }
            }
        }
    }

    fn start_fetch(&mut self) {
        self.state.generation += 1;
        let generation = self.state.generation;
        self.in_flight += 1;
        info!(generation, "fetching diagnoses");
        let _ = self.events.send(CoordinatorEvent::FetchStarted { generation });

        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { source.fetch_diagnoses().await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(generation, error = %err, "diagnosis fetch task failed");
                    Err(FetchError::ServerError)
                }
            };
            // The driver may already be gone; nothing observes the result then.
            let _ = completions.send(Completion { generation, result });
        });
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion { generation, result } = completion;
        let latest = self.state.generation;

        if generation != latest {
            debug!(generation, latest, "discarding superseded fetch result");
            let _ = self
                .events
                .send(CoordinatorEvent::StaleDiscarded { generation, latest });
            return;
        }

        let event = match result {
            Ok(records) => {
                info!(generation, count = records.len(), "diagnoses loaded");
                let count = records.len();
                self.state.records = records;
                CoordinatorEvent::FetchApplied { generation, count }
            }
            Err(error) => {
                warn!(generation, %error, code = ?error.code(), transient = error.is_transient(), "diagnosis fetch failed; showing empty list");
                self.state.records.clear();
                CoordinatorEvent::FetchFailed { generation, error }
            }
        };
        self.state.landed = true;
        self.publish();
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        let rendered = render(&self.state, self.locale.current(), self.strings.as_ref());
        self.rendered.send_replace(rendered);
    }
}

fn render(state: &CoordinatorState, locale: Locale, strings: &dyn StringResolver) -> Rendered {
    let list = state.landed.then(|| {
        let items = state.filter.apply(&state.records);
        let count_text = strings.resolve(locale, TOTAL_FORMAT, &[StringArg::Count(items.len())]);
        ListView { items, count_text }
    });

    Rendered {
        locale,
        filter: state.filter.current(),
        title_text: strings.resolve(locale, HOME_TITLE, &[]),
        filter_labels: FilterSelection::ALL
            .iter()
            .map(|selection| strings.resolve(locale, selection.label_key(), &[]))
            .collect(),
        change_language_label: strings.resolve(locale, CHANGE_LANGUAGE, &[]),
        list,
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
