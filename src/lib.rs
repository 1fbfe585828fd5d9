// SoundGuard - Live Sound-Event Alerting
// Module declarations

pub mod classifier;
pub mod config;
pub mod detection;
pub mod notify;
pub mod render;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::async_runtime::Mutex;
    use tauri::Manager;

    use crate::classifier::{FrameBridge, HttpModelLoader};
    use crate::detection::DetectionSession;
    use crate::notify::{HttpTransport, NotificationWorker, SharedLocation};
    use crate::render::WebviewSurface;

    tauri::Builder::default()
        .setup(|app| {
            app.handle().plugin(
                tauri_plugin_log::Builder::default()
                    .level(log::LevelFilter::Info)
                    .build(),
            )?;

            let config = config::AppConfig::load().map_err(|e| {
                log::error!("Failed to load configuration: {}", e);
                e
            })?;

            let frames = FrameBridge::new();
            let location = SharedLocation::with_fallback(config.fixed_location);

            // Notification worker runs detached for the app's lifetime
            let (alerts, receiver) = notify::alert_channel();
            let transport = HttpTransport::new(&config.notification_endpoint)?;
            let worker = NotificationWorker::new(location.clone(), transport);
            tauri::async_runtime::spawn(worker.run(receiver));

            let loader = HttpModelLoader::new(&config.model_base_url, frames.clone())?;
            let session = DetectionSession::new(
                loader,
                WebviewSurface::new(app.handle().clone()),
                config.alert_policy.clone(),
                config.listen_options.clone(),
                alerts,
            );

            app.manage(commands::SessionHandle(Mutex::new(session)));
            app.manage(commands::HostBridge { frames, location });

            log::info!("SoundGuard initialized (model: {})", config.model_base_url);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::start_detection,
            commands::stop_detection,
            commands::toggle_detection,
            commands::detection_status,
            commands::submit_frame,
            commands::report_location,
            commands::report_location_denied,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
