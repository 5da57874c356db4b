mod routes;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use notify::{recommended_watcher, EventKind, RecursiveMode, Watcher};
use tauri::{Emitter, Manager};

use attest_core::{Profile, Record, RecordStore, RecordSummary};
use attest_nav::{BreadcrumbScope, BreadcrumbStore, Crumb, TrailEntry};

/// Tracks record ids recently written by the UI with timestamps, so the file
/// watcher can suppress ALL events from a single UI write (atomic writes on
/// Linux fire multiple inotify events: one for the temp file, one for the rename).
struct SelfWrites(Arc<Mutex<HashMap<String, Instant>>>);

/// Managed state wrapping the AI settings.
struct SettingsState(Arc<Mutex<attest_core::AiSettings>>);

/// Managed state wrapping the signed-in user's cached profile.
struct ProfileState(Arc<Mutex<Profile>>);

/// Managed record storage handle.
struct RecordsState(RecordStore);

/// The app-wide breadcrumb slot, bridged to the frontend via the
/// `trail-changed` event.
struct NavState(BreadcrumbStore);

/// The page currently holding breadcrumb ownership. Exactly one scope is
/// alive at a time; replacing it drops the old one, which clears the trail
/// before the incoming page publishes its own.
struct Page {
    route: Option<String>,
    scope: Option<BreadcrumbScope>,
}

struct PageState(Arc<Mutex<Page>>);

// --- Record commands ---

#[tauri::command]
fn list_records(records: tauri::State<'_, RecordsState>) -> Result<Vec<RecordSummary>, String> {
    records.0.list()
}

#[tauri::command]
fn read_record(id: String, records: tauri::State<'_, RecordsState>) -> Result<Record, String> {
    records.0.read(&id)
}

#[tauri::command]
fn write_record(
    record: Record,
    records: tauri::State<'_, RecordsState>,
    profile: tauri::State<'_, ProfileState>,
    writes: tauri::State<'_, SelfWrites>,
) -> Result<(), String> {
    require_manage(&profile)?;
    writes.0.lock().unwrap().insert(record.id.clone(), Instant::now());
    records.0.write(&record)
}

#[tauri::command]
fn delete_record(
    id: String,
    records: tauri::State<'_, RecordsState>,
    profile: tauri::State<'_, ProfileState>,
    writes: tauri::State<'_, SelfWrites>,
) -> Result<(), String> {
    require_manage(&profile)?;
    writes.0.lock().unwrap().insert(id.clone(), Instant::now());
    records.0.delete(&id)
}

fn require_manage(profile: &tauri::State<'_, ProfileState>) -> Result<(), String> {
    let role = profile.0.lock().unwrap().role;
    if role.can_manage() {
        Ok(())
    } else {
        Err("changing records requires the manager or admin role".to_string())
    }
}

// --- Breadcrumb commands ---

/// Called by a page when it becomes visible. Releases the previous page's
/// breadcrumb ownership, then resolves and publishes this page's trail.
/// The brief empty-trail interval between release and publish is accepted
/// transition behavior, not a defect.
#[tauri::command]
fn page_mounted(
    route: String,
    nav: tauri::State<'_, NavState>,
    records: tauri::State<'_, RecordsState>,
    page: tauri::State<'_, PageState>,
) -> Result<(), String> {
    let mut page = page.0.lock().unwrap();
    page.scope = None;

    let trail = routes::resolve(&route, &records.0);
    tracing::debug!(route = %route, entries = trail.len(), "page mounted");

    let mut scope = nav.0.acquire();
    scope.publish(trail);
    page.scope = Some(scope);
    page.route = Some(route);
    Ok(())
}

/// Called by a page on unmount. Always clears the trail, even when the page
/// never published a non-empty one.
#[tauri::command]
fn page_unmounted(page: tauri::State<'_, PageState>) -> Result<(), String> {
    let mut page = page.0.lock().unwrap();
    page.scope = None;
    page.route = None;
    Ok(())
}

#[tauri::command]
fn get_trail(nav: tauri::State<'_, NavState>) -> Result<Vec<TrailEntry>, String> {
    Ok(nav.0.get_trail())
}

/// Expanded crumb nodes for the breadcrumb bar, home anchor included.
#[tauri::command]
fn render_trail(nav: tauri::State<'_, NavState>) -> Result<Vec<Crumb>, String> {
    Ok(attest_nav::render(&nav.0.get_trail()))
}

// --- Assistant & settings commands ---

#[tauri::command]
async fn ask_assistant(
    question: String,
    records: tauri::State<'_, RecordsState>,
    state: tauri::State<'_, SettingsState>,
) -> Result<attest_assist::AssistantReply, String> {
    let settings = state.0.lock().unwrap().clone();
    let context = records.0.list().unwrap_or_default();
    attest_assist::ask(&question, &context, &settings).await
}

#[tauri::command]
fn get_ai_settings(state: tauri::State<'_, SettingsState>) -> Result<serde_json::Value, String> {
    // Masked — only says whether a key is set
    Ok(state.0.lock().unwrap().masked())
}

#[tauri::command]
fn save_ai_settings(
    provider: String,
    api_key: String,
    model: String,
    state: tauri::State<'_, SettingsState>,
) -> Result<(), String> {
    let mut settings = state.0.lock().unwrap();
    settings.apply(provider, api_key, model);
    attest_core::write_settings(&settings)
}

#[tauri::command]
fn get_profile(profile: tauri::State<'_, ProfileState>) -> Result<Profile, String> {
    Ok(profile.0.lock().unwrap().clone())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let self_writes = Arc::new(Mutex::new(HashMap::<String, Instant>::new()));
    let settings = Arc::new(Mutex::new(attest_core::read_settings()));
    let profile = Arc::new(Mutex::new(attest_core::read_profile()));
    let records = RecordStore::open_default();
    let nav = BreadcrumbStore::new();
    let page = Arc::new(Mutex::new(Page {
        route: None,
        scope: None,
    }));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(SelfWrites(self_writes.clone()))
        .manage(SettingsState(settings))
        .manage(ProfileState(profile))
        .manage(RecordsState(records.clone()))
        .manage(NavState(nav.clone()))
        .manage(PageState(page.clone()))
        .setup(move |app| {
            let handle = app.handle().clone();

            // Bridge store notifications to the frontend breadcrumb bar.
            let bridge = app.handle().clone();
            nav.subscribe(move |trail| {
                let _ = bridge.emit("trail-changed", trail.to_vec());
            });

            let writes = self_writes.clone();
            let dir = records.dir().to_path_buf();
            let _ = std::fs::create_dir_all(&dir);

            // Track known record ids so we can detect new records from rename
            // events (atomic writes use temp + rename, which fires Modify
            // instead of Create)
            let mut known_records: HashSet<String> = std::fs::read_dir(&dir)
                .into_iter()
                .flatten()
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let p = e.path();
                    if p.extension().map_or(true, |x| x != "json") {
                        return None;
                    }
                    Some(p.file_stem()?.to_str()?.to_string())
                })
                .collect();

            let watch_records = records.clone();
            let watch_page = page.clone();
            let mut watcher = recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let mut touched = false;
                for path in &event.paths {
                    if path.extension().map_or(true, |e| e != "json") {
                        continue;
                    }
                    let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    touched = true;
                    {
                        let mut guard = writes.lock().unwrap();
                        if let Some(written_at) = guard.get(id) {
                            if written_at.elapsed().as_millis() < 1000 {
                                continue; // written by UI recently, skip
                            }
                            // Stale entry — clean it up
                            guard.remove(id);
                        }
                    }
                    if known_records.insert(id.to_string()) {
                        let _ = handle.emit("record-created", id.to_string());
                    }
                    let _ = handle.emit("record-changed", id.to_string());
                }
                // A rename elsewhere may have changed a label the visible
                // breadcrumb shows. Re-resolve the active route; the publish
                // is equality-gated, so an unchanged trail writes nothing.
                if touched {
                    let mut page = watch_page.lock().unwrap();
                    if let Page {
                        route: Some(route),
                        scope: Some(scope),
                    } = &mut *page
                    {
                        let trail = routes::resolve(route, &watch_records);
                        scope.publish(trail);
                    }
                }
            })
            .map_err(|e| e.to_string())?;

            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|e| e.to_string())?;

            // Keep watcher alive for the app's lifetime
            app.manage(Mutex::new(watcher));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            list_records,
            read_record,
            write_record,
            delete_record,
            page_mounted,
            page_unmounted,
            get_trail,
            render_trail,
            ask_assistant,
            get_ai_settings,
            save_ai_settings,
            get_profile,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
