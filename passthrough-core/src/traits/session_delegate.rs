use crate::models::error::PassthroughError;
use crate::models::session_summary::SessionSummary;
use crate::models::state::EngineState;

/// Event delegate for passthrough session notifications.
///
/// All methods are called from the pump thread, not the UI thread.
/// Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called on every engine state transition.
    fn on_state_changed(&self, state: EngineState);

    /// Called once when a session fails. The toggle has already been
    /// reset to off and both devices released when this fires, so a new
    /// session may be started from here.
    fn on_error(&self, error: &PassthroughError);

    /// Called when a session ends without error.
    fn on_session_finished(&self, summary: &SessionSummary);
}
