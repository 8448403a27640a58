use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::catalog::{ParameterCatalog, Selection};
use crate::models::config::{EngineSettings, SessionConfig};
use crate::models::error::PassthroughError;
use crate::models::session_summary::{SessionId, SessionSummary};
use crate::session::engine::StreamingEngine;
use crate::traits::audio_platform::AudioPlatform;
use crate::traits::session_delegate::SessionDelegate;

type SessionOutcome = Result<SessionSummary, PassthroughError>;

/// The one live session: its stop flag and its pump thread.
///
/// `handle` is `None` while some caller is blocked joining it; the session
/// stays registered so it can still be stopped. `released` is set by the
/// worker once both devices are gone, just before the delegate hears the
/// outcome.
struct ActiveSession {
    id: SessionId,
    cancel: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<SessionOutcome>>,
}

impl ActiveSession {
    fn is_alive(&self) -> bool {
        !self.released.load(Ordering::SeqCst)
            && self.handle.as_ref().is_none_or(|h| !h.is_finished())
    }
}

fn join(handle: thread::JoinHandle<SessionOutcome>) -> SessionOutcome {
    handle.join().map_err(|_| PassthroughError::WorkerPanicked)?
}

/// Translates an on/off toggle into passthrough sessions.
///
/// Owns at most one session. `start` never blocks: the session runs on its
/// own thread and failures come back through the `SessionDelegate` (and
/// `stop_and_wait`/`wait`). A new session cannot start until the previous
/// one has released its devices.
pub struct PassthroughController<P: AudioPlatform + 'static> {
    platform: Arc<P>,
    catalog: ParameterCatalog,
    settings: EngineSettings,
    delegate: Option<Arc<dyn SessionDelegate>>,
    toggle: Arc<AtomicBool>,
    active: Mutex<Option<ActiveSession>>,
}

impl<P: AudioPlatform + 'static> PassthroughController<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self::with_settings(platform, EngineSettings::default())
    }

    pub fn with_settings(platform: Arc<P>, settings: EngineSettings) -> Self {
        Self {
            platform,
            catalog: ParameterCatalog::standard(),
            settings,
            delegate: None,
            toggle: Arc::new(AtomicBool::new(false)),
            active: Mutex::new(None),
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Toggle state as the UI should show it. Reset to off when a session
    /// fails.
    pub fn is_on(&self) -> bool {
        self.toggle.load(Ordering::SeqCst)
    }

    /// Whether a session still holds its devices (including teardown).
    pub fn is_active(&self) -> bool {
        self.active.lock().as_ref().is_some_and(ActiveSession::is_alive)
    }

    /// Id of the current session, if one is alive.
    pub fn active_session(&self) -> Option<SessionId> {
        self.active
            .lock()
            .as_ref()
            .filter(|s| s.is_alive())
            .map(|s| s.id)
    }

    /// Handle a toggle change from the UI.
    ///
    /// On: start a session from `selection`. Off: cancel the current
    /// session without waiting; a no-op if nothing runs.
    pub fn toggle(&self, on: bool, selection: &Selection) -> Result<(), PassthroughError> {
        if on {
            self.start_selection(selection).map(|_| ())
        } else {
            match self.active_session() {
                Some(id) => self.stop(id),
                None => {
                    self.toggle.store(false, Ordering::SeqCst);
                    Ok(())
                }
            }
        }
    }

    /// Start a session for the current selection.
    ///
    /// # Panics
    ///
    /// Panics if `selection` holds an index outside its catalog list.
    pub fn start_selection(&self, selection: &Selection) -> Result<SessionId, PassthroughError> {
        let config = self.catalog.resolve(selection);
        self.start(config)
    }

    /// Launch a session on a background thread and return immediately.
    ///
    /// Fails fast with `SessionActive` while a previous session, even a
    /// cancelled one, still holds its devices. Once those are released a
    /// new session may start, including from inside the previous session's
    /// `on_error` or `on_session_finished`.
    pub fn start(&self, config: SessionConfig) -> Result<SessionId, PassthroughError> {
        self.settings
            .validate()
            .map_err(PassthroughError::InvalidSettings)?;

        let mut active = self.active.lock();
        if active.as_ref().is_some_and(ActiveSession::is_alive) {
            return Err(PassthroughError::SessionActive);
        }
        if let Some(handle) = active.take().and_then(|finished| finished.handle) {
            // The outcome goes to the delegate. A worker still inside a
            // delegate callback, possibly this very call, is detached.
            if handle.is_finished() {
                let _ = join(handle);
            }
        }

        let id = SessionId::new();
        let cancel = Arc::new(AtomicBool::new(false));
        self.toggle.store(true, Ordering::SeqCst);

        let platform = Arc::clone(&self.platform);
        let settings = self.settings.clone();
        let delegate = self.delegate.clone();
        let toggle = Arc::clone(&self.toggle);
        let worker_cancel = Arc::clone(&cancel);
        let released = Arc::new(AtomicBool::new(false));
        let worker_released = Arc::clone(&released);

        let handle = thread::Builder::new()
            .name(self.settings.thread_name.clone())
            .spawn(move || {
                let mut engine = StreamingEngine::new(&*platform, &settings);
                if let Some(ref d) = delegate {
                    engine = engine.with_delegate(d.as_ref());
                }
                let outcome = engine.run(id, &config, &worker_cancel);

                if outcome.is_err() {
                    toggle.store(false, Ordering::SeqCst);
                }
                worker_released.store(true, Ordering::SeqCst);
                if let Some(ref d) = delegate {
                    match &outcome {
                        Ok(summary) => d.on_session_finished(summary),
                        Err(e) => d.on_error(e),
                    }
                }
                outcome
            })
            .map_err(|e| {
                self.toggle.store(false, Ordering::SeqCst);
                PassthroughError::Spawn(e.to_string())
            })?;

        log::info!("started passthrough session {}", id);
        *active = Some(ActiveSession {
            id,
            cancel,
            released,
            handle: Some(handle),
        });
        Ok(id)
    }

    /// Request cancellation of session `id` without waiting for teardown.
    pub fn stop(&self, id: SessionId) -> Result<(), PassthroughError> {
        let active = self.active.lock();
        match active.as_ref() {
            Some(session) if session.id == id => {
                session.cancel.store(true, Ordering::SeqCst);
                self.toggle.store(false, Ordering::SeqCst);
                log::info!("stop requested for session {}", id);
                Ok(())
            }
            _ => Err(PassthroughError::UnknownSession),
        }
    }

    /// Cancel session `id` and block until its devices are released.
    pub fn stop_and_wait(&self, id: SessionId) -> SessionOutcome {
        self.stop(id)?;
        self.wait(id)
    }

    /// Block until session `id` ends on its own (error) or is stopped from
    /// another thread.
    pub fn wait(&self, id: SessionId) -> SessionOutcome {
        let handle = {
            let mut active = self.active.lock();
            match active.as_mut() {
                Some(session) if session.id == id => session.handle.take(),
                _ => None,
            }
        }
        .ok_or(PassthroughError::UnknownSession)?;

        let outcome = join(handle);

        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|s| s.id == id) {
            *active = None;
        }
        outcome
    }
}

impl<P: AudioPlatform + 'static> Drop for PassthroughController<P> {
    fn drop(&mut self) {
        if let Some(session) = self.active.get_mut().take() {
            session.cancel.store(true, Ordering::SeqCst);
            if let Some(handle) = session.handle {
                let _ = join(handle);
            }
        }
    }
}
