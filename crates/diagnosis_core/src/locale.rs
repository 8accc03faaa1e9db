use shared::domain::Locale;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::info;

/// Process-wide display locale, shared by `Arc` between the coordinator and
/// any view that needs to re-localize itself.
#[derive(Debug)]
pub struct LocaleStore {
    current: watch::Sender<Locale>,
}

impl LocaleStore {
    pub fn new(initial: Locale) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> Locale {
        *self.current.borrow()
    }

    /// Switches to the other locale and notifies every observer before
    /// returning the new value.
    pub fn toggle(&self) -> Locale {
        self.current.send_modify(|locale| *locale = locale.toggled());
        let next = self.current();
        info!(locale = %next, "display locale switched");
        next
    }

    /// Stream of subsequent locale changes. The current value is not replayed.
    pub fn on_change(&self) -> WatchStream<Locale> {
        WatchStream::from_changes(self.current.subscribe())
    }
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
