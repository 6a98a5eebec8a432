/// Splits a migration script into its top-level statements (spec
/// §4.3.2). A single-pass scanner tracks whether the cursor is inside a
/// `'...'` or `"..."` literal; a `;` only delimits a statement outside any
/// literal. An unescaped matching quote closes the literal; a backslash
/// immediately preceding the quote escapes it instead. Empty trimmed
/// statements are discarded; trailing content after the last `;` is
/// emitted if non-empty.
///
/// This is a regex-free scanner by design: dollar-quoted strings
/// (PostgreSQL's `$$...$$`, used in function bodies) are not recognized,
/// so a `;` inside one would still split the statement. The core's own
/// emitted DDL never produces dollar-quoted bodies, so this is a known,
/// accepted limitation rather than a bug to fix here.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut prev_was_backslash = false;

    for ch in script.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q && !prev_was_backslash {
                    quote = None;
                }
                prev_was_backslash = ch == '\\' && !prev_was_backslash;
            }
            None => {
                if ch == '\'' || ch == '"' {
                    quote = Some(ch);
                    current.push(ch);
                } else if ch == ';' {
                    let trimmed = current.trim();
                    if !trimmed.is_empty() {
                        statements.push(trimmed.to_owned());
                    }
                    current.clear();
                } else {
                    current.push(ch);
                }
                prev_was_backslash = false;
            }
        }
    }

    let trailing = current.trim();
    if !trailing.is_empty() {
        statements.push(trailing.to_owned());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_top_level_semicolons() {
        let script = "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE t (id INT)".to_owned(), "INSERT INTO t VALUES (1)".to_owned()]
        );
    }

    #[test]
    fn a_semicolon_inside_a_string_literal_does_not_split() {
        let script = "INSERT INTO t (msg) VALUES ('a;b');";
        assert_eq!(split_statements(script), vec!["INSERT INTO t (msg) VALUES ('a;b')".to_owned()]);
    }

    #[test]
    fn an_escaped_quote_does_not_close_the_literal() {
        let script = r"INSERT INTO t (msg) VALUES ('it\'s; fine');";
        assert_eq!(split_statements(script).len(), 1);
    }

    #[test]
    fn trailing_content_without_a_final_semicolon_is_still_emitted() {
        let script = "CREATE TABLE t (id INT);\nSELECT 1";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE t (id INT)".to_owned(), "SELECT 1".to_owned()]
        );
    }

    #[test]
    fn empty_statements_are_discarded() {
        let script = "CREATE TABLE t (id INT);;;\nSELECT 1;";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE t (id INT)".to_owned(), "SELECT 1".to_owned()]
        );
    }

    #[test]
    fn concatenating_the_split_results_recovers_the_original_modulo_semicolon_whitespace() {
        let script = "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\nSELECT 1";
        let rejoined = split_statements(script).join(";");
        assert_eq!(rejoined, "CREATE TABLE t (id INT);INSERT INTO t VALUES (1);SELECT 1");
    }
}
