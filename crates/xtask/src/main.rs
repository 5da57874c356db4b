use std::env;

use attest_core::{Profile, Record, RecordKind, RecordStatus, RecordStore, Role};

fn main() {
    let args: Vec<String> = env::args().collect();
    let task = args.get(1).map(|s| s.as_str()).unwrap_or("");

    match task {
        "seed-records" => seed_records(args.get(2).map(|s| s.as_str())),
        "seed-profile" => seed_profile(args.get(2).map(|s| s.as_str())),
        _ => {
            eprintln!("Usage: cargo run -p xtask -- <seed-records [dir] | seed-profile [role]>");
            std::process::exit(1);
        }
    }
}

/// Write the cached profile that record mutation commands consult.
/// Defaults to manager so the seeded demo workspace is editable.
fn seed_profile(role: Option<&str>) {
    let profile = Profile {
        display_name: "Demo User".to_string(),
        role: Role::parse(role.unwrap_or("manager")),
    };
    attest_core::write_profile(&profile)
        .unwrap_or_else(|e| panic!("failed to write profile: {e}"));
    println!("profile written with role {:?}", profile.role);
}

/// Write a small demo workspace into the record store, so the app has
/// something to navigate during development. Defaults to ~/.attest/records.
fn seed_records(dir: Option<&str>) {
    let store = match dir {
        Some(d) => RecordStore::new(d),
        None => RecordStore::open_default(),
    };

    let records = demo_records();
    for record in &records {
        store
            .write(record)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", record.id));
        println!("seeded {} ({})", record.name, record.id);
    }
    println!("{} records in {}", records.len(), store.dir().display());
}

fn demo_records() -> Vec<Record> {
    let rec = |id: &str, kind, name: &str, description: &str, tenant: Option<&str>| Record {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        description: description.to_string(),
        status: RecordStatus::Active,
        tenant_id: tenant.map(str::to_string),
    };

    vec![
        rec("t-acme", RecordKind::Tenant, "Acme Corp", "Demo tenant", None),
        rec(
            "fw-soc2",
            RecordKind::Framework,
            "SOC 2",
            "Trust services criteria",
            Some("t-acme"),
        ),
        rec(
            "fw-iso27001",
            RecordKind::Framework,
            "ISO 27001",
            "Information security management",
            Some("t-acme"),
        ),
        rec(
            "cl-access",
            RecordKind::Checklist,
            "Access Control",
            "Quarterly access review checklist",
            Some("t-acme"),
        ),
        rec(
            "aud-q1",
            RecordKind::Audit,
            "Q1 Review",
            "First quarter internal audit",
            Some("t-acme"),
        ),
        rec(
            "doc-sla",
            RecordKind::Document,
            "SLA",
            "Service level agreement evidence",
            Some("t-acme"),
        ),
        rec(
            "cert-iso",
            RecordKind::Certificate,
            "ISO 27001 Certificate",
            "Issued 2025, annual surveillance",
            Some("t-acme"),
        ),
    ]
}
