//! Human-readable changelog for each supported version transition

use std::sync::OnceLock;

use crate::chain::MigrationChain;

fn standard_chain() -> &'static MigrationChain {
    static CHAIN: OnceLock<MigrationChain> = OnceLock::new();
    CHAIN.get_or_init(MigrationChain::standard)
}

/// Changelog bullets for the step from `old_version` to `new_version`
///
/// Only exact single-step transitions of the standard chain have notes;
/// every other pair yields an empty list.
#[must_use]
pub fn get_migration_notes(old_version: &str, new_version: &str) -> Vec<String> {
    standard_chain()
        .find(old_version, new_version)
        .map(|step| step.notes().iter().map(|note| (*note).to_owned()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_transitions_have_notes() {
        assert!(!get_migration_notes("1.0.0", "2.0.0").is_empty());
        assert!(!get_migration_notes("2.0.0", "2.1.0").is_empty());
    }

    #[test]
    fn other_pairs_are_empty() {
        assert!(get_migration_notes("3.0.0", "4.0.0").is_empty());
        assert!(get_migration_notes("1.0.0", "2.1.0").is_empty());
        assert!(get_migration_notes("2.0.0", "1.0.0").is_empty());
        assert!(get_migration_notes("", "").is_empty());
    }

    #[test]
    fn footer_link_styles_are_mentioned() {
        let notes = get_migration_notes("2.0.0", "2.1.0").join("\n");
        assert!(notes.to_lowercase().contains("floating"));
    }
}
