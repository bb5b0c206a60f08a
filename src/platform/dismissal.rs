//! Desktop share sheets do not report when they close. The window losing
//! focus to the sheet and then regaining it is the closest signal, so staged
//! files are released on that transition.

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    mpsc, Arc, Mutex, MutexGuard, OnceLock,
};
use std::time::Duration;

use tauri::{Runtime, Window, WindowEvent};

use crate::{Error, Result};

/// If the window never loses focus within this time, no sheet appeared.
const SHEET_APPEAR_GRACE: Duration = Duration::from_millis(250);
const SHEET_CLOSE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SheetPhase {
    Opening,
    Open,
    Closed,
}

#[derive(Debug)]
struct SheetTracker {
    phase: SheetPhase,
}

impl SheetTracker {
    fn new() -> Self {
        Self {
            phase: SheetPhase::Opening,
        }
    }

    fn on_focus_change(&mut self, focused: bool) -> bool {
        match (self.phase, focused) {
            (SheetPhase::Opening, false) => {
                self.phase = SheetPhase::Open;
                false
            }
            (SheetPhase::Open, true) => {
                self.phase = SheetPhase::Closed;
                true
            }
            _ => false,
        }
    }

    fn on_window_destroyed(&mut self) -> bool {
        let was_waiting = self.phase != SheetPhase::Closed;
        self.phase = SheetPhase::Closed;
        was_waiting
    }

    fn on_grace_elapsed(&mut self) -> bool {
        if self.phase == SheetPhase::Opening {
            self.phase = SheetPhase::Closed;
            return true;
        }
        false
    }
}

/// Per-window state, shared with the window event listener. Each watch gets
/// a new generation so timers left over from an earlier sheet are ignored.
struct SheetWatcher {
    label: String,
    generation: AtomicU64,
    notify: Mutex<Option<mpsc::Sender<()>>>,
    tracker: Mutex<SheetTracker>,
    listening: AtomicBool,
}

impl SheetWatcher {
    fn new(label: String) -> Self {
        Self {
            label,
            generation: AtomicU64::new(0),
            notify: Mutex::new(None),
            tracker: Mutex::new(SheetTracker::new()),
            listening: AtomicBool::new(false),
        }
    }

    fn notify(&self) -> MutexGuard<'_, Option<mpsc::Sender<()>>> {
        match self.notify.lock() {
            Ok(notify) => notify,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn tracker(&self) -> MutexGuard<'_, SheetTracker> {
        match self.tracker.lock() {
            Ok(tracker) => tracker,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Starts a new watch, failing if one is still pending.
    fn begin(&self) -> Result<(u64, mpsc::Receiver<()>)> {
        let mut notify = self.notify();
        if notify.is_some() {
            return Err(Error::NativeApi("Share already in progress.".to_string()));
        }
        let (tx, rx) = mpsc::channel();
        *notify = Some(tx);
        *self.tracker() = SheetTracker::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ok((generation, rx))
    }

    /// Closes the current watch, whichever generation it is.
    fn close_current(&self) {
        let mut notify = self.notify();
        self.finish(&mut notify);
    }

    /// Closes the watch only if it is still `generation`.
    fn close(&self, generation: u64) {
        let mut notify = self.notify();
        if self.generation.load(Ordering::SeqCst) == generation {
            self.finish(&mut notify);
        }
    }

    fn grace_elapsed(&self, generation: u64) {
        let mut notify = self.notify();
        if self.generation.load(Ordering::SeqCst) == generation
            && self.tracker().on_grace_elapsed()
        {
            self.finish(&mut notify);
        }
    }

    fn finish(&self, notify: &mut Option<mpsc::Sender<()>>) {
        if let Some(tx) = notify.take() {
            let _ = tx.send(());
        }
        self.tracker().phase = SheetPhase::Closed;
    }
}

/// A pending watch on one window's share sheet.
pub struct SheetWatch {
    watcher: Arc<SheetWatcher>,
    generation: u64,
    rx: mpsc::Receiver<()>,
}

impl SheetWatch {
    fn start(watcher: Arc<SheetWatcher>) -> Result<Self> {
        let (generation, rx) = watcher.begin()?;
        let grace = watcher.clone();
        std::thread::spawn(move || {
            std::thread::sleep(SHEET_APPEAR_GRACE);
            grace.grace_elapsed(generation);
        });
        Ok(Self {
            watcher,
            generation,
            rx,
        })
    }

    /// Runs `on_closed` on a background thread once the sheet is gone, or
    /// after a timeout.
    pub fn on_closed<F>(self, on_closed: F)
    where
        F: FnOnce() + Send + 'static,
    {
        std::thread::spawn(move || {
            if self.rx.recv_timeout(SHEET_CLOSE_TIMEOUT).is_err() {
                log::debug!("share sheet on {} timed out", self.watcher.label);
            }
            self.watcher.close(self.generation);
            on_closed();
        });
    }

    /// Drops the watch without waiting, e.g. when the sheet failed to open.
    pub fn cancel(self) {
        self.watcher.close(self.generation);
    }
}

/// Starts watching `window` for a share sheet. Only one sheet per window
/// can be open at a time.
pub fn watch<R: Runtime>(window: &Window<R>) -> Result<SheetWatch> {
    let watcher = watcher_for(window)?;
    listen(window, watcher.clone());
    SheetWatch::start(watcher)
}

fn listen<R: Runtime>(window: &Window<R>, watcher: Arc<SheetWatcher>) {
    if watcher.listening.swap(true, Ordering::SeqCst) {
        return;
    }

    window.on_window_event(move |event| match event {
        WindowEvent::Focused(focused) => {
            if watcher.tracker().on_focus_change(*focused) {
                watcher.close_current();
            }
        }
        WindowEvent::Destroyed => {
            if watcher.tracker().on_window_destroyed() {
                watcher.close_current();
            }
            forget(&watcher.label);
        }
        _ => {}
    });
}

fn watcher_for<R: Runtime>(window: &Window<R>) -> Result<Arc<SheetWatcher>> {
    let mut map = watchers()
        .lock()
        .map_err(|_| Error::NativeApi("Share sheet registry poisoned.".to_string()))?;
    Ok(map
        .entry(window.label().to_string())
        .or_insert_with(|| Arc::new(SheetWatcher::new(window.label().to_string())))
        .clone())
}

fn forget(label: &str) {
    if let Ok(mut map) = watchers().lock() {
        map.remove(label);
    }
}

fn watchers() -> &'static Mutex<HashMap<String, Arc<SheetWatcher>>> {
    static WATCHERS: OnceLock<Mutex<HashMap<String, Arc<SheetWatcher>>>> = OnceLock::new();
    WATCHERS.get_or_init(|| Mutex::new(HashMap::new()))
}

#[cfg(test)]
mod tests {
    use super::{SheetPhase, SheetTracker, SheetWatcher};
    use std::sync::mpsc::TryRecvError;

    #[test]
    fn closes_after_focus_loss_and_regain() {
        let mut tracker = SheetTracker::new();
        assert!(!tracker.on_focus_change(true));
        assert!(!tracker.on_focus_change(false));
        assert!(!tracker.on_focus_change(false));
        assert!(tracker.on_focus_change(true));
        assert_eq!(tracker.phase, SheetPhase::Closed);
    }

    #[test]
    fn destroyed_window_closes_once() {
        let mut tracker = SheetTracker::new();
        assert!(tracker.on_window_destroyed());
        assert!(!tracker.on_window_destroyed());
    }

    #[test]
    fn grace_closes_when_no_sheet_appeared() {
        let mut tracker = SheetTracker::new();
        assert!(tracker.on_grace_elapsed());
        assert_eq!(tracker.phase, SheetPhase::Closed);
    }

    #[test]
    fn grace_is_ignored_once_the_sheet_is_open() {
        let mut tracker = SheetTracker::new();
        assert!(!tracker.on_focus_change(false));
        assert!(!tracker.on_grace_elapsed());
        assert_eq!(tracker.phase, SheetPhase::Open);
    }

    #[test]
    fn stale_generation_cannot_close_a_newer_watch() {
        let watcher = SheetWatcher::new("main".to_string());
        let (first, first_rx) = watcher.begin().unwrap();
        watcher.close(first);
        assert_eq!(first_rx.try_recv(), Ok(()));

        let (second, second_rx) = watcher.begin().unwrap();
        watcher.grace_elapsed(first);
        watcher.close(first);
        assert_eq!(second_rx.try_recv(), Err(TryRecvError::Empty));

        watcher.grace_elapsed(second);
        assert_eq!(second_rx.try_recv(), Ok(()));
    }

    #[test]
    fn second_watch_is_refused_while_one_is_pending() {
        let watcher = SheetWatcher::new("main".to_string());
        let (first, _rx) = watcher.begin().unwrap();
        assert!(watcher.begin().is_err());
        watcher.close(first);
        assert!(watcher.begin().is_ok());
    }
}
