use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// --- Types ---

/// The kinds of compliance records the app manages. One record file per
/// tenant, framework, checklist, audit, document or certificate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Tenant,
    Framework,
    Checklist,
    Audit,
    Document,
    Certificate,
}

impl RecordKind {
    /// Display label of the section listing records of this kind,
    /// as shown in navigation trails.
    pub fn section_label(&self) -> &'static str {
        match self {
            RecordKind::Tenant => "Tenants",
            RecordKind::Framework => "Frameworks",
            RecordKind::Checklist => "Checklists",
            RecordKind::Audit => "Audit History",
            RecordKind::Document => "Documents",
            RecordKind::Certificate => "Certificates",
        }
    }

    /// Route of the section listing records of this kind.
    pub fn section_href(&self) -> &'static str {
        match self {
            RecordKind::Tenant => "/tenants",
            RecordKind::Framework => "/frameworks",
            RecordKind::Checklist => "/checklists",
            RecordKind::Audit => "/audits",
            RecordKind::Document => "/documents",
            RecordKind::Certificate => "/certificates",
        }
    }

    /// Reverse of [`section_href`](Self::section_href), matching on the
    /// first path segment of a route.
    pub fn from_section(segment: &str) -> Option<Self> {
        match segment {
            "tenants" => Some(RecordKind::Tenant),
            "frameworks" => Some(RecordKind::Framework),
            "checklists" => Some(RecordKind::Checklist),
            "audits" => Some(RecordKind::Audit),
            "documents" => Some(RecordKind::Document),
            "certificates" => Some(RecordKind::Certificate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordStatus {
    Draft,
    Active,
    Archived,
}

fn default_status() -> RecordStatus {
    RecordStatus::Draft
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_status")]
    pub status: RecordStatus,
    /// Owning tenant, absent for tenant records themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Listing row — everything needed to show a record in an index page or
/// resolve its name for a breadcrumb label, without the full payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: String,
    pub kind: RecordKind,
    pub name: String,
    pub status: RecordStatus,
}

// --- Storage ---

/// Resolve the app's data directory (~/.attest/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".attest")
}

/// File-backed record storage, one JSON file per record id.
///
/// The directory is injected so tests (and the xtask seeder) can run
/// against a throwaway location instead of the user's home.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at ~/.attest/records/.
    pub fn open_default() -> Self {
        Self::new(config_dir().join("records"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// List all records, sorted by name.
    pub fn list(&self) -> Result<Vec<RecordSummary>, String> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut records: Vec<RecordSummary> = fs::read_dir(&self.dir)
            .map_err(|e| e.to_string())?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension().map_or(true, |e| e != "json") {
                    return None;
                }
                let raw = fs::read_to_string(&path).ok()?;
                let record: Record = serde_json::from_str(&raw).ok()?;
                Some(RecordSummary {
                    id: record.id,
                    kind: record.kind,
                    name: record.name,
                    status: record.status,
                })
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    pub fn read(&self, id: &str) -> Result<Record, String> {
        let raw = fs::read_to_string(self.path_for(id)).map_err(|e| e.to_string())?;
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    }

    /// Write a record atomically (temp file + rename), so a file watcher
    /// sees a single event per save instead of truncate + write.
    pub fn write(&self, record: &Record) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        let json = serde_json::to_string_pretty(record).map_err(|e| e.to_string())?;
        let tmp = self.dir.join(format!(".{}.json.tmp", record.id));
        let path = self.path_for(&record.id);
        fs::write(&tmp, json).map_err(|e| e.to_string())?;
        fs::rename(&tmp, &path).map_err(|e| e.to_string())?;
        tracing::debug!(id = %record.id, "record written");
        Ok(())
    }

    /// Delete a record by id. Deleting an absent record is not an error.
    pub fn delete(&self, id: &str) -> Result<(), String> {
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| e.to_string())
        } else {
            Ok(())
        }
    }

    /// Display name of a record, for breadcrumb labels. None when the
    /// record is missing or unreadable — callers substitute a fallback.
    pub fn label_for(&self, id: &str) -> Option<String> {
        self.read(id).ok().map(|r| r.name)
    }
}

// --- Roles & profile ---

/// Access role of the signed-in user. Authentication itself is handled by
/// the hosted auth provider; this is the locally cached role the shell
/// consults before mutating records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    /// Parse a role string from a profile row. Unknown values degrade to
    /// the least-privileged role.
    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::User,
        }
    }

    pub fn can_manage(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

fn default_role() -> Role {
    Role::User
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            role: Role::User,
        }
    }
}

fn profile_path() -> PathBuf {
    config_dir().join("profile.json")
}

pub fn read_profile() -> Profile {
    let path = profile_path();
    if !path.exists() {
        return Profile::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_profile(profile: &Profile) -> Result<(), String> {
    let dir = config_dir();
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(profile).map_err(|e| e.to_string())?;
    fs::write(profile_path(), json).map_err(|e| e.to_string())
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    /// Merge a settings update coming from the UI. An empty API key means
    /// "keep existing" — the settings form round-trips the masked shape and
    /// never holds the real key.
    pub fn apply(&mut self, provider: String, api_key: String, model: String) {
        self.provider = provider;
        self.model = model;
        if !api_key.is_empty() {
            self.api_key = api_key;
        }
    }

    /// Settings as sent to the frontend. The key itself never leaves the
    /// backend, only whether one is set.
    pub fn masked(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": self.provider,
            "model": self.model,
            "hasKey": !self.api_key.is_empty(),
            "configured": ai_configured(self),
        })
    }
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings() -> AiSettings {
    let path = settings_path();
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(settings: &AiSettings) -> Result<(), String> {
    let dir = config_dir();
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(settings_path(), json).map_err(|e| e.to_string())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, kind: RecordKind, name: &str) -> Record {
        Record {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            description: String::new(),
            status: RecordStatus::Active,
            tenant_id: None,
        }
    }

    #[test]
    fn test_write_read_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());
        let rec = record("aud-1", RecordKind::Audit, "Q1 Review");
        store.write(&rec).unwrap();
        assert_eq!(store.read("aud-1").unwrap(), rec);
    }

    #[test]
    fn test_list_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());
        store.write(&record("b", RecordKind::Framework, "SOC 2")).unwrap();
        store.write(&record("a", RecordKind::Framework, "ISO 27001")).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["ISO 27001", "SOC 2"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());
        store.write(&record("doc-1", RecordKind::Document, "SLA")).unwrap();
        store.delete("doc-1").unwrap();
        store.delete("doc-1").unwrap();
        assert!(store.read("doc-1").is_err());
    }

    #[test]
    fn test_label_for_missing_record_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());
        store.write(&record("t-1", RecordKind::Tenant, "Acme")).unwrap();
        assert_eq!(store.label_for("t-1").as_deref(), Some("Acme"));
        assert_eq!(store.label_for("t-2"), None);
    }

    #[test]
    fn test_record_defaults_on_sparse_json() {
        let raw = r#"{"id":"c-1","kind":"certificate","name":"ISO Cert"}"#;
        let rec: Record = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.status, RecordStatus::Draft);
        assert_eq!(rec.description, "");
        assert!(rec.tenant_id.is_none());
    }

    #[test]
    fn test_role_parse_defaults_to_user() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("manager"), Role::Manager);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("superuser"), Role::User);
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage());
        assert!(Role::Manager.can_manage());
        assert!(!Role::User.can_manage());
    }

    #[test]
    fn test_profile_defaults_on_sparse_json() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.display_name, "");
        // An unknown role string rejects the document; read_profile then
        // falls back to the default least-privileged profile.
        assert!(serde_json::from_str::<Profile>(r#"{"role":"root"}"#).is_err());
    }

    #[test]
    fn test_section_round_trip() {
        for kind in [
            RecordKind::Tenant,
            RecordKind::Framework,
            RecordKind::Checklist,
            RecordKind::Audit,
            RecordKind::Document,
            RecordKind::Certificate,
        ] {
            let segment = kind.section_href().trim_start_matches('/');
            assert_eq!(RecordKind::from_section(segment), Some(kind));
        }
        assert_eq!(RecordKind::from_section("settings"), None);
    }

    #[test]
    fn test_apply_empty_key_keeps_existing() {
        let mut s = AiSettings {
            provider: "openai".into(),
            api_key: "secret".into(),
            model: "gpt-4o".into(),
        };
        s.apply("anthropic".into(), String::new(), "claude".into());
        assert_eq!(s.provider, "anthropic");
        assert_eq!(s.model, "claude");
        assert_eq!(s.api_key, "secret");
        s.apply("anthropic".into(), "fresh".into(), "claude".into());
        assert_eq!(s.api_key, "fresh");
    }

    #[test]
    fn test_masked_never_exposes_key() {
        let s = AiSettings {
            provider: "anthropic".into(),
            api_key: "secret".into(),
            model: "claude".into(),
        };
        let masked = s.masked();
        assert_eq!(masked["hasKey"], true);
        assert_eq!(masked["configured"], true);
        assert!(!masked.to_string().contains("secret"));

        let unset = AiSettings::default().masked();
        assert_eq!(unset["hasKey"], false);
        assert_eq!(unset["configured"], false);
    }

    #[test]
    fn test_ai_configured() {
        let mut s = AiSettings {
            provider: "anthropic".into(),
            api_key: String::new(),
            model: "claude".into(),
        };
        assert!(!ai_configured(&s));
        s.api_key = "key".into();
        assert!(ai_configured(&s));
        s.provider = "ollama".into();
        s.api_key = String::new();
        assert!(ai_configured(&s));
    }
}
