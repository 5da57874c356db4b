pub mod render;
pub mod store;

use serde::{Deserialize, Serialize};

// --- Trail model ---

/// One hop in a breadcrumb trail. `label` is display text, `href` is the
/// navigation target. The terminal entry of a trail uses the inert `"#"`
/// href and is rendered as non-interactive current-location text.
///
/// Both fields default to empty strings so a malformed entry coming from
/// the frontend degrades to blank text instead of failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

impl TrailEntry {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }

    /// Terminal entry for the currently visible page.
    pub fn current(label: impl Into<String>) -> Self {
        Self::new(label, "#")
    }
}

pub use render::{render, to_html, Crumb};
pub use store::{BreadcrumbScope, BreadcrumbStore, SubscriptionId};
