use sha2::{Digest, Sha256};

/// Normalizes a migration script before checksumming (spec §4.3.1):
/// collapse every line ending to `\n`, then trim trailing spaces, tabs,
/// and stray carriage returns from each line. This matches the reference
/// tool byte-for-byte; skipping it would make checksums sensitive to
/// line-ending conventions the editor or VCS happened to apply.
pub fn normalize(script: &str) -> String {
    script
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The lowercase hex SHA-256 of the normalized script — exactly 64 hex
/// characters (spec §4.3.1).
pub fn checksum(script: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(script).as_bytes());
    hex::encode(hasher.finalize())
}

/// The checksum literal that marks a ledger row as manually managed
/// (`mark applied` / `mark rolled back`, spec §4.3) rather than backed by
/// a computed script checksum.
pub const MANUAL_CHECKSUM: &str = "manual";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent() {
        let script = "CREATE TABLE t (id INT);  \r\n\r\nSELECT 1;\t\n";
        assert_eq!(normalize(script), normalize(&normalize(script)));
    }

    #[test]
    fn checksum_is_invariant_under_line_ending_choice() {
        let unix = "CREATE TABLE t (id INT);\nSELECT 1;\n";
        let windows = "CREATE TABLE t (id INT);\r\nSELECT 1;\r\n";
        let classic_mac = "CREATE TABLE t (id INT);\rSELECT 1;\r";

        assert_eq!(checksum(unix), checksum(windows));
        assert_eq!(checksum(unix), checksum(classic_mac));
    }

    #[test]
    fn checksum_is_exactly_64_lowercase_hex_characters() {
        let sum = checksum("CREATE TABLE t (id INT);");
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn trailing_whitespace_on_a_line_does_not_affect_the_checksum() {
        let clean = "CREATE TABLE t (id INT);\n";
        let padded = "CREATE TABLE t (id INT);   \t\n";
        assert_eq!(checksum(clean), checksum(padded));
    }
}
