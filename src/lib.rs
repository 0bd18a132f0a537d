//! Mystic Luna - Tauri Backend Library
//!
//! 타로 리딩 세션, 생성형 리딩 Gateway, 히스토리 영속화를 담당합니다.

#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod history;
pub mod models;
pub mod preferences;
pub mod session;
pub mod view;

/// 로거 초기화 (RUST_LOG 미설정 시 info)
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Tauri 앱 실행
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::{Arc, Mutex};
    use tauri::Manager;

    use crate::config::GatewayConfig;
    use crate::gateway::GeminiGateway;
    use crate::history::SharedStore;
    use crate::session::ReadingSession;

    // API 키는 프론트에 노출하지 않고 백엔드 환경변수로만 읽습니다.
    config::load_env();
    init_logging();
    log::info!("Mystic Luna starting up...");

    tauri::Builder::default()
        .setup(|app| {
            let db_path = app.path().app_data_dir()?.join("mystic_luna.db");
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let db = db::Database::new(&db_path)?;
            db.initialize()?;
            let store: SharedStore = Arc::new(Mutex::new(db));

            let config = GatewayConfig::from_env();
            if config.api_key.is_none() {
                log::warn!("[Gateway] GEMINI_API_KEY is not set; readings will fail");
            }
            let gateway = Arc::new(GeminiGateway::new(config)?);

            app.manage(ReadingSession::new(gateway, store)?);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Reading
            commands::reading::get_session,
            commands::reading::set_question,
            commands::reading::submit_question,
            commands::reading::cancel_request,
            commands::reading::pick_card,
            commands::reading::unpick_card,
            commands::reading::clear_selection,
            commands::reading::finalize_reading,
            commands::reading::go_back,
            commands::reading::ask_new,
            commands::reading::deepen_query,
            commands::reading::open_rules,
            commands::reading::close_rules,
            // History
            commands::history::open_history,
            commands::history::close_history,
            commands::history::open_history_record,
            commands::history::clear_history,
            // Preferences
            commands::preferences::toggle_language,
            commands::preferences::set_language,
            commands::preferences::get_ui_strings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
