//! Shared key generation for storage backends.
//!
//! The document id is rendered in uuid simple form (32 hex characters) so
//! every key has a fixed length and no separator characters.

use uuid::Uuid;

/// Storage key for a raw uploaded file: `raw/{32-hex}.pdf`.
pub fn raw_key(id: Uuid) -> String {
    format!("raw/{}.pdf", id.simple())
}

/// Storage key for a result artifact: `results/{32-hex}.json`.
pub fn result_key(id: Uuid) -> String {
    format!("results/{}.json", id.simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_fixed_length_hex_in_separate_namespaces() {
        let id = Uuid::new_v4();
        let raw = raw_key(id);
        let result = result_key(id);

        assert!(raw.starts_with("raw/"));
        assert!(result.starts_with("results/"));
        assert_eq!(raw.len(), "raw/".len() + 32 + ".pdf".len());
        assert_eq!(result.len(), "results/".len() + 32 + ".json".len());
        assert!(!raw.contains('-'));
    }
}
