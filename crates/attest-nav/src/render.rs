use serde::{Deserialize, Serialize};

use crate::TrailEntry;

/// Label and target of the synthesized home anchor. Home is never part of a
/// stored trail — the renderer prepends it to every non-empty trail.
pub const HOME_LABEL: &str = "Home";
pub const HOME_HREF: &str = "/";

/// One rendered node of the breadcrumb bar, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Crumb {
    /// Fixed root anchor, always first in a non-empty rendering.
    Home { label: String, href: String },
    /// Decorative divider between adjacent items; no navigation behavior.
    Separator,
    /// Navigable intermediate entry.
    Link { label: String, href: String },
    /// Terminal entry — the currently visible page, non-interactive.
    Current { label: String },
}

/// Expand a trail into renderable crumb nodes.
///
/// An empty trail renders to nothing at all (no home anchor, no container):
/// it means no page has claimed the breadcrumb slot. A non-empty trail
/// renders as home, then a separator-and-entry unit per trail entry, with
/// the last entry marked as the current page.
pub fn render(trail: &[TrailEntry]) -> Vec<Crumb> {
    if trail.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(trail.len() * 2 + 1);
    out.push(Crumb::Home {
        label: HOME_LABEL.to_string(),
        href: HOME_HREF.to_string(),
    });
    let last = trail.len() - 1;
    for (i, entry) in trail.iter().enumerate() {
        out.push(Crumb::Separator);
        if i == last {
            out.push(Crumb::Current {
                label: entry.label.clone(),
            });
        } else {
            out.push(Crumb::Link {
                label: entry.label.clone(),
                href: entry.href.clone(),
            });
        }
    }
    out
}

/// Render crumb nodes to an HTML fragment for server-rendered shells.
/// The terminal node carries `aria-current="page"`; separators are hidden
/// from assistive technology. No crumbs produces an empty string, not an
/// empty `<nav>`.
pub fn to_html(crumbs: &[Crumb]) -> String {
    if crumbs.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(crumbs.len() * 48);
    out.push_str("<nav aria-label=\"Breadcrumb\"><ol>");
    for crumb in crumbs {
        match crumb {
            Crumb::Home { label, href } | Crumb::Link { label, href } => {
                out.push_str("<li><a href=\"");
                out.push_str(&escape(href));
                out.push_str("\">");
                out.push_str(&escape(label));
                out.push_str("</a></li>");
            }
            Crumb::Separator => {
                out.push_str("<li aria-hidden=\"true\">/</li>");
            }
            Crumb::Current { label } => {
                out.push_str("<li><span aria-current=\"page\">");
                out.push_str(&escape(label));
                out.push_str("</span></li>");
            }
        }
    }
    out.push_str("</ol></nav>");
    out
}

/// Minimal HTML escaping — labels come from user-named records.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, href: &str) -> TrailEntry {
        TrailEntry::new(label, href)
    }

    #[test]
    fn test_empty_trail_renders_nothing() {
        assert!(render(&[]).is_empty());
        assert_eq!(to_html(&render(&[])), "");
    }

    #[test]
    fn test_single_entry_is_current() {
        let crumbs = render(&[entry("Users", "/um")]);
        assert_eq!(
            crumbs,
            vec![
                Crumb::Home {
                    label: "Home".into(),
                    href: "/".into()
                },
                Crumb::Separator,
                Crumb::Current {
                    label: "Users".into()
                },
            ]
        );
    }

    #[test]
    fn test_intermediate_entries_are_links() {
        let crumbs = render(&[
            entry("Audit History", "/protected/Audit"),
            entry("Q1 Review", "#"),
        ]);
        assert_eq!(crumbs.len(), 5);
        assert_eq!(
            crumbs[2],
            Crumb::Link {
                label: "Audit History".into(),
                href: "/protected/Audit".into()
            }
        );
        assert_eq!(
            crumbs[4],
            Crumb::Current {
                label: "Q1 Review".into()
            }
        );
    }

    #[test]
    fn test_node_count_is_entries_plus_home() {
        for n in 1..=5 {
            let trail: Vec<TrailEntry> = (0..n)
                .map(|i| entry(&format!("level {i}"), &format!("/l{i}")))
                .collect();
            let crumbs = render(&trail);
            let nodes = crumbs
                .iter()
                .filter(|c| !matches!(c, Crumb::Separator))
                .count();
            let current = crumbs
                .iter()
                .filter(|c| matches!(c, Crumb::Current { .. }))
                .count();
            assert_eq!(nodes, n + 1);
            assert_eq!(current, 1);
            assert!(matches!(crumbs.last(), Some(Crumb::Current { .. })));
        }
    }

    #[test]
    fn test_separator_between_every_pair() {
        let crumbs = render(&[entry("A", "/a"), entry("B", "/b"), entry("C", "#")]);
        // home, sep, A, sep, B, sep, C
        for (i, crumb) in crumbs.iter().enumerate() {
            assert_eq!(i % 2 == 1, matches!(crumb, Crumb::Separator));
        }
    }

    #[test]
    fn test_html_marks_current_page() {
        let html = to_html(&render(&[entry("Frameworks", "/frameworks"), entry("SOC 2", "#")]));
        assert!(html.starts_with("<nav aria-label=\"Breadcrumb\">"));
        assert!(html.contains("<a href=\"/frameworks\">Frameworks</a>"));
        assert!(html.contains("<span aria-current=\"page\">SOC 2</span>"));
        assert!(!html.contains("<a href=\"#\">"));
    }

    #[test]
    fn test_html_escapes_labels() {
        let html = to_html(&render(&[entry("R&D <review>", "#")]));
        assert!(html.contains("R&amp;D &lt;review&gt;"));
    }

    #[test]
    fn test_blank_entry_renders_empty_strings() {
        let crumbs = render(&[TrailEntry::default()]);
        assert_eq!(
            crumbs[2],
            Crumb::Current { label: String::new() }
        );
    }
}
