//! Output formatting modules.

pub mod json;
pub mod text;

pub use json::format_json;
pub use text::format_text;

use queryserver_core::{Meta, MetaVariant};
use serde::Serialize;
use std::collections::BTreeMap;

const MASK: &str = "********";

/// What the bootstrap created, safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct MetaReport {
    pub factory: String,
    pub variant: MetaVariant,
    pub url: String,
    pub properties: BTreeMap<String, String>,
}

impl MetaReport {
    /// Builds a report, masking any property whose key mentions a password.
    pub fn new(factory: &str, meta: &dyn Meta) -> Self {
        let properties = meta
            .properties()
            .iter()
            .map(|(key, value)| {
                let shown = if is_secret(key) { MASK } else { value };
                (key.to_string(), shown.to_string())
            })
            .collect();

        Self {
            factory: factory.to_string(),
            variant: meta.variant(),
            url: meta.url().to_string(),
            properties,
        }
    }
}

fn is_secret(key: &str) -> bool {
    key.to_ascii_lowercase().contains("password")
}
