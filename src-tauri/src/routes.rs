use attest_core::{RecordKind, RecordStore};
use attest_nav::TrailEntry;

/// Label substituted when a route references a record whose name cannot be
/// resolved (missing file, still syncing). A trail must always end with a
/// terminal entry for the visible page, so the page never publishes a trail
/// with its own entry omitted.
const FALLBACK_LABEL: &str = "Details";

/// Resolve an app route to its breadcrumb trail.
///
/// `/` resolves to the empty trail (the home page claims no breadcrumbs).
/// Section routes (`/audits`) resolve to a single terminal entry; detail
/// routes (`/audits/{id}`) append the record's display name. Nested section
/// routes (`/frameworks/{id}/checklists/{id}`) keep alternating section and
/// record segments. The terminal entry always gets the inert `#` href.
pub fn resolve(route: &str, store: &RecordStore) -> Vec<TrailEntry> {
    let path = route.split(['?', '#']).next().unwrap_or("");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut trail: Vec<TrailEntry> = Vec::new();
    let mut href = String::new();
    let mut i = 0;
    while i < segments.len() {
        let segment = segments[i];
        href.push('/');
        href.push_str(segment);

        if let Some(kind) = RecordKind::from_section(segment) {
            trail.push(TrailEntry::new(kind.section_label(), href.clone()));
            if i + 1 < segments.len() {
                let id = segments[i + 1];
                href.push('/');
                href.push_str(id);
                let label = store
                    .label_for(id)
                    .unwrap_or_else(|| FALLBACK_LABEL.to_string());
                trail.push(TrailEntry::new(label, href.clone()));
                i += 2;
            } else {
                i += 1;
            }
        } else {
            trail.push(TrailEntry::new(humanize(segment), href.clone()));
            i += 1;
        }
    }

    if let Some(last) = trail.pop() {
        trail.push(TrailEntry::current(last.label));
    }
    trail
}

/// "audit-log" -> "Audit Log", for route segments with no section mapping.
fn humanize(segment: &str) -> String {
    segment
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::{Record, RecordStatus};

    fn store_with(records: &[(&str, RecordKind, &str)]) -> (tempfile::TempDir, RecordStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());
        for (id, kind, name) in records {
            store
                .write(&Record {
                    id: id.to_string(),
                    kind: *kind,
                    name: name.to_string(),
                    description: String::new(),
                    status: RecordStatus::Active,
                    tenant_id: None,
                })
                .unwrap();
        }
        (tmp, store)
    }

    #[test]
    fn test_home_route_has_empty_trail() {
        let (_tmp, store) = store_with(&[]);
        assert!(resolve("/", &store).is_empty());
        assert!(resolve("", &store).is_empty());
    }

    #[test]
    fn test_section_route_is_terminal() {
        let (_tmp, store) = store_with(&[]);
        let trail = resolve("/audits", &store);
        assert_eq!(trail, vec![TrailEntry::current("Audit History")]);
    }

    #[test]
    fn test_detail_route_uses_record_name() {
        let (_tmp, store) = store_with(&[("aud-1", RecordKind::Audit, "Q1 Review")]);
        let trail = resolve("/audits/aud-1", &store);
        assert_eq!(
            trail,
            vec![
                TrailEntry::new("Audit History", "/audits"),
                TrailEntry::current("Q1 Review"),
            ]
        );
    }

    #[test]
    fn test_unknown_record_falls_back_to_details() {
        let (_tmp, store) = store_with(&[]);
        let trail = resolve("/documents/missing", &store);
        assert_eq!(trail[1], TrailEntry::current("Details"));
    }

    #[test]
    fn test_nested_sections_alternate() {
        let (_tmp, store) = store_with(&[
            ("fw-1", RecordKind::Framework, "SOC 2"),
            ("cl-1", RecordKind::Checklist, "Access Control"),
        ]);
        let trail = resolve("/frameworks/fw-1/checklists/cl-1", &store);
        assert_eq!(
            trail,
            vec![
                TrailEntry::new("Frameworks", "/frameworks"),
                TrailEntry::new("SOC 2", "/frameworks/fw-1"),
                TrailEntry::new("Checklists", "/frameworks/fw-1/checklists"),
                TrailEntry::current("Access Control"),
            ]
        );
    }

    #[test]
    fn test_nested_section_index() {
        let (_tmp, store) = store_with(&[("fw-1", RecordKind::Framework, "SOC 2")]);
        let trail = resolve("/frameworks/fw-1/checklists", &store);
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[2], TrailEntry::current("Checklists"));
    }

    #[test]
    fn test_unmapped_segment_is_humanized() {
        let (_tmp, store) = store_with(&[]);
        assert_eq!(resolve("/settings", &store), vec![TrailEntry::current("Settings")]);
        assert_eq!(
            resolve("/audit-log", &store),
            vec![TrailEntry::current("Audit Log")]
        );
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let (_tmp, store) = store_with(&[]);
        let trail = resolve("/certificates?sort=name#top", &store);
        assert_eq!(trail, vec![TrailEntry::current("Certificates")]);
    }
}
