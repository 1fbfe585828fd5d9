// Tauri IPC Commands
use serde::Serialize;
use tauri::async_runtime::Mutex;
use tauri::State;

use crate::classifier::{FrameBridge, HttpModelLoader, ListenOptions};
use crate::detection::{AlertState, DetectionSession, FrameOutcome, RawFrame, SessionState};
use crate::notify::{Coordinates, SharedLocation};
use crate::render::WebviewSurface;

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl<E: std::fmt::Display> From<E> for CommandError {
    fn from(error: E) -> Self {
        CommandError {
            message: error.to_string(),
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

pub type AppSession = DetectionSession<HttpModelLoader, WebviewSurface>;

/// Detection session managed by Tauri
pub struct SessionHandle(pub Mutex<AppSession>);

/// Entry points the webview uses to feed frames and positions in
pub struct HostBridge {
    pub frames: FrameBridge,
    pub location: SharedLocation,
}

/// Snapshot returned to the frontend after every lifecycle command
#[derive(Debug, Serialize)]
pub struct DetectionStatus {
    pub state: SessionState,
    pub labels: Vec<String>,
    pub model_base_url: String,
    pub listen_options: ListenOptions,
    pub alert: AlertState,
}

impl DetectionStatus {
    fn of(session: &AppSession) -> Self {
        DetectionStatus {
            state: session.state(),
            labels: session.labels().to_vec(),
            model_base_url: session.loader().base_url().to_string(),
            listen_options: session.listen_options().clone(),
            alert: session.alert_state().clone(),
        }
    }
}

// ==================== SESSION COMMANDS ====================

#[tauri::command]
pub async fn start_detection(session: State<'_, SessionHandle>) -> CommandResult<DetectionStatus> {
    let mut session = session.0.lock().await;
    session.start().await.map_err(|e| CommandError {
        message: format!("Failed to start detection: {}", e),
    })?;
    Ok(DetectionStatus::of(&session))
}

#[tauri::command]
pub async fn stop_detection(session: State<'_, SessionHandle>) -> CommandResult<DetectionStatus> {
    let mut session = session.0.lock().await;
    session.stop();
    Ok(DetectionStatus::of(&session))
}

/// Single toggle control: start when stopped, stop when listening
#[tauri::command]
pub async fn toggle_detection(
    session: State<'_, SessionHandle>,
) -> CommandResult<DetectionStatus> {
    let mut session = session.0.lock().await;
    session.toggle().await.map_err(|e| CommandError {
        message: format!("Failed to toggle detection: {}", e),
    })?;
    Ok(DetectionStatus::of(&session))
}

#[tauri::command]
pub async fn detection_status(
    session: State<'_, SessionHandle>,
) -> CommandResult<DetectionStatus> {
    Ok(DetectionStatus::of(&*session.0.lock().await))
}

// ==================== HOST INPUT COMMANDS ====================

/// Deliver one classifier result from the webview and handle it
#[tauri::command]
pub async fn submit_frame(
    session: State<'_, SessionHandle>,
    host: State<'_, HostBridge>,
    frame: RawFrame,
) -> CommandResult<Vec<FrameOutcome>> {
    if !host.frames.push(frame) {
        return Ok(Vec::new());
    }
    Ok(session.0.lock().await.pump())
}

#[tauri::command]
pub fn report_location(
    host: State<'_, HostBridge>,
    latitude: f64,
    longitude: f64,
) -> CommandResult<()> {
    let position = Coordinates::new(latitude, longitude);
    if !position.is_valid() {
        return Err(CommandError {
            message: format!("Position out of range: {}, {}", latitude, longitude),
        });
    }
    host.location.report(position);
    Ok(())
}

#[tauri::command]
pub fn report_location_denied(host: State<'_, HostBridge>) -> CommandResult<()> {
    log::info!("Geolocation permission denied by host");
    host.location.report_denied();
    Ok(())
}
