use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Static description of a feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureMetadata {
    /// Name used on the command line and by `status test-feature`.
    pub name: &'static str,
    /// Release group the flag was introduced in.
    pub groups: &'static str,
    /// One line of help text.
    pub description: &'static str,
    /// Value the flag has unless somebody changes it.
    pub default_value: bool,
}

/// Every feature flag the shell knows about, in display order.
pub const FEATURE_METADATA: &[FeatureMetadata] = &[
    FeatureMetadata {
        name: "stderr-nocaret",
        groups: "3.0",
        description: "^ no longer redirects stderr",
        default_value: true,
    },
    FeatureMetadata {
        name: "qmark-noglob",
        groups: "3.0",
        description: "? no longer globs",
        default_value: false,
    },
    FeatureMetadata {
        name: "regex-easyesc",
        groups: "3.1",
        description: "string replace -r needs fewer \\'s",
        default_value: true,
    },
    FeatureMetadata {
        name: "ampersand-nobg-in-token",
        groups: "3.4",
        description: "& only backgrounds if followed by a separator",
        default_value: true,
    },
];

/// Read access to the feature flag registry.
pub trait FeatureRegistry {
    /// All known flags, in display order.
    fn metadata(&self) -> &[FeatureMetadata];

    /// Current value of the flag called `name`, or `None` if no such flag exists.
    fn test(&self, name: &str) -> Option<bool>;
}

/// Thread-safe feature flag values backed by [`FEATURE_METADATA`].
#[derive(Debug)]
pub struct Features {
    values: Vec<AtomicBool>,
}

impl Features {
    pub fn new() -> Self {
        Self {
            values: FEATURE_METADATA
                .iter()
                .map(|md| AtomicBool::new(md.default_value))
                .collect(),
        }
    }

    /// Set a single flag by name. Returns false if the name is unknown.
    pub fn set(&self, name: &str, value: bool) -> bool {
        match FEATURE_METADATA.iter().position(|md| md.name == name) {
            Some(idx) => {
                self.values[idx].store(value, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Apply a comma separated list like `qmark-noglob,no-regex-easyesc`.
    ///
    /// `all` and `none` toggle everything, a group name such as `3.0` toggles the
    /// flags of that group, and a `no-` prefix turns the named flags off.
    /// Unknown entries are logged and skipped.
    pub fn set_from_spec(&self, spec: &str) {
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) = match entry.strip_prefix("no-") {
                Some(rest) => (rest, false),
                None => (entry, true),
            };

            if name == "all" || name == "none" {
                let value = if name == "all" { value } else { !value };
                for cell in &self.values {
                    cell.store(value, Ordering::Relaxed);
                }
                continue;
            }

            if self.set(name, value) {
                continue;
            }

            let mut matched_group = false;
            for (md, cell) in FEATURE_METADATA.iter().zip(&self.values) {
                if md.groups == name {
                    cell.store(value, Ordering::Relaxed);
                    matched_group = true;
                }
            }
            if !matched_group {
                warn!(feature = entry, "ignoring unknown feature flag");
            }
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureRegistry for Features {
    fn metadata(&self) -> &[FeatureMetadata] {
        FEATURE_METADATA
    }

    fn test(&self, name: &str) -> Option<bool> {
        FEATURE_METADATA
            .iter()
            .position(|md| md.name == name)
            .map(|idx| self.values[idx].load(Ordering::Relaxed))
    }
}
