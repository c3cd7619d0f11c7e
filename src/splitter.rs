//! Splits a SQL script into individual statements.
//!
//! Splitting happens before parsing, so it cannot rely on the SQL parser:
//! it walks the raw text and cuts at top-level semicolons only. Semicolons
//! inside quoted literals (single, double, or backtick quoted), `--` and
//! `#` line comments and block comments never terminate a statement.
//! Comment text is preserved inside the statement it belongs to.

/// Split `script` into trimmed, non-empty statement strings.
///
/// A trailing statement without a terminating semicolon is still returned.
pub fn split_statements(script: &str) -> Vec<String> {
    let chars: Vec<char> = script.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();

    let mut in_single = false;
    let mut in_double = false;
    let mut in_backtick = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if in_line_comment {
            current.push(c);
            if c == '\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if in_block_comment {
            current.push(c);
            if c == '*' && next == Some('/') {
                current.push('/');
                in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if in_single {
            current.push(c);
            if c == '\'' && !is_escaped(&chars, i) {
                in_single = false;
            }
            i += 1;
            continue;
        }

        if in_double {
            current.push(c);
            if c == '"' && !is_escaped(&chars, i) {
                in_double = false;
            }
            i += 1;
            continue;
        }

        if in_backtick {
            current.push(c);
            if c == '`' {
                in_backtick = false;
            }
            i += 1;
            continue;
        }

        match c {
            '-' if next == Some('-') => {
                in_line_comment = true;
                current.push(c);
            }
            '#' => {
                in_line_comment = true;
                current.push(c);
            }
            '/' if next == Some('*') => {
                in_block_comment = true;
                current.push(c);
                current.push('*');
                i += 2;
                continue;
            }
            '\'' => {
                in_single = true;
                current.push(c);
            }
            '"' => {
                in_double = true;
                current.push(c);
            }
            '`' => {
                in_backtick = true;
                current.push(c);
            }
            ';' => {
                push_statement(&mut statements, &current);
                current.clear();
            }
            _ => current.push(c),
        }
        i += 1;
    }

    push_statement(&mut statements, &current);
    statements
}

/// A quote character is escaped when preceded by an odd number of backslashes.
fn is_escaped(chars: &[char], pos: usize) -> bool {
    let mut backslashes = 0;
    let mut i = pos;
    while i > 0 && chars[i - 1] == '\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

fn push_statement(statements: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_top_level_semicolons() {
        let statements = split_statements("SELECT 1;\nSELECT 2;\n");
        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_semicolon_inside_single_quotes_not_a_boundary() {
        let statements = split_statements("INSERT INTO t VALUES ('a;b');");
        assert_eq!(statements, vec!["INSERT INTO t VALUES ('a;b')"]);
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        let statements = split_statements("INSERT INTO t VALUES ('it\\'s; fine');SELECT 1;");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "INSERT INTO t VALUES ('it\\'s; fine')");
    }

    #[test]
    fn test_doubled_quote_stays_inside_literal() {
        let statements = split_statements("INSERT INTO t VALUES ('a''b;c');");
        assert_eq!(statements, vec!["INSERT INTO t VALUES ('a''b;c')"]);
    }

    #[test]
    fn test_semicolon_inside_backticks_not_a_boundary() {
        let statements = split_statements("SELECT `weird;name` FROM t;");
        assert_eq!(statements, vec!["SELECT `weird;name` FROM t"]);
    }

    #[test]
    fn test_semicolon_in_line_comment_ignored() {
        let statements = split_statements("SELECT 1 -- trailing; note\n;SELECT 2;");
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("trailing; note"));
    }

    #[test]
    fn test_semicolon_in_block_comment_ignored() {
        let statements = split_statements("SELECT 1 /* a;b */;SELECT 2;");
        assert_eq!(statements, vec!["SELECT 1 /* a;b */", "SELECT 2"]);
    }

    #[test]
    fn test_hash_comment_hides_semicolon() {
        let statements = split_statements("SELECT 1 # note; here\n;SELECT 2;");
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_quoted_literal_with_semicolons() {
        let statements = split_statements("a;b'c;d'e;");
        assert_eq!(statements, vec!["a", "b'c;d'e"]);
    }

    #[test]
    fn test_unterminated_tail_kept() {
        let statements = split_statements("SELECT 1; SELECT 2");
        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_empty_fragments_dropped() {
        let statements = split_statements(";;\n  ;\nSELECT 1;");
        assert_eq!(statements, vec!["SELECT 1"]);
    }
}
