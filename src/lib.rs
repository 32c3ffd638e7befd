use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod flip;
pub mod game;
pub mod legality;
pub mod selector;
pub mod types;

use crate::config::Settings;
use crate::error::ShellError;
use crate::game::{Session, Status};
use crate::types::{Intent, Snapshot};

static SESSION: Lazy<Mutex<Option<Session>>> = Lazy::new(|| Mutex::new(None));

/// Returned from [`dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub terminated: bool,
    /// Absent once the session has terminated.
    pub snapshot: Option<Snapshot>,
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Starts a new session on the title screen, replacing any running one.
/// `settings` may be `undefined` or `null` for defaults.
#[wasm_bindgen]
pub fn start_session(settings: JsValue) -> Result<JsValue, JsError> {
    let settings = parse_settings(settings)?;
    let snapshot = start(&mut *lock()?, settings);
    Ok(to_js(&snapshot)?)
}

/// Feeds one intent to the running session.
#[wasm_bindgen]
pub fn dispatch(intent: JsValue) -> Result<JsValue, JsError> {
    let intent: Intent = serde_wasm_bindgen::from_value(intent).map_err(|err| {
        tracing::warn!(%err, "rejected intent from host");
        ShellError::InvalidIntent(err.to_string())
    })?;
    let outcome = apply(&mut *lock()?, intent)?;
    Ok(to_js(&outcome)?)
}

#[wasm_bindgen]
pub fn snapshot() -> Result<JsValue, JsError> {
    let slot = lock()?;
    let session = slot.as_ref().ok_or(ShellError::NoSession)?;
    Ok(to_js(&session.snapshot())?)
}

fn start(slot: &mut Option<Session>, settings: Settings) -> Snapshot {
    tracing::info!(?settings, "session started");
    let session = Session::new(settings);
    let snapshot = session.snapshot();
    *slot = Some(session);
    snapshot
}

fn apply(slot: &mut Option<Session>, intent: Intent) -> Result<DispatchOutcome, ShellError> {
    let session = slot.as_mut().ok_or(ShellError::NoSession)?;

    match session.dispatch(intent) {
        Status::Running => Ok(DispatchOutcome {
            terminated: false,
            snapshot: Some(session.snapshot()),
        }),
        Status::Terminated => {
            tracing::info!("session terminated");
            *slot = None;
            Ok(DispatchOutcome {
                terminated: true,
                snapshot: None,
            })
        }
    }
}

fn parse_settings(value: JsValue) -> Result<Settings, ShellError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Settings::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| {
        tracing::warn!(%err, "rejected settings from host");
        ShellError::InvalidSettings(err.to_string())
    })
}

fn lock() -> Result<MutexGuard<'static, Option<Session>>, ShellError> {
    SESSION.lock().map_err(|_| ShellError::SessionLocked)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ShellError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| ShellError::Snapshot(err.to_string()))
}
