//! Target dialect identity and per-dialect conversion capabilities.

/// Supported conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    /// GaussDB in MySQL compatibility mode. Keeps MySQL-style DDL largely
    /// intact, so most rewrites are suppressed for it.
    GaussMySql,
}

impl Dialect {
    /// Dialect name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgresql",
            Dialect::GaussMySql => "gauss-mysql",
        }
    }

    /// Boolean literal in the target's preferred spelling.
    pub fn format_boolean(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Quote an identifier only when it would not survive unquoted:
    /// uppercase letters, a leading digit, or characters outside `[a-z0-9_]`.
    pub fn maybe_quote_identifier(&self, identifier: &str) -> String {
        let identifier = identifier.trim();
        if identifier.is_empty() || !needs_quoting(identifier) {
            return identifier.to_string();
        }
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}

fn needs_quoting(identifier: &str) -> bool {
    let starts_with_digit = identifier
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    starts_with_digit
        || identifier
            .chars()
            .any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
}

/// A dialect plus the switches that drive processor behavior. Immutable for
/// the whole run; processors receive it through the conversion context.
#[derive(Debug, Clone, Copy)]
pub struct DialectProfile {
    pub dialect: Dialect,
    /// Rewrite boolean-column literals in INSERT/UPDATE to TRUE/FALSE.
    pub normalize_boolean_literals: bool,
    /// Split `ALTER TABLE ... ADD INDEX` into standalone CREATE INDEX
    /// statements.
    pub extract_indexes_from_alter: bool,
}

impl DialectProfile {
    pub fn postgres() -> Self {
        Self {
            dialect: Dialect::Postgres,
            normalize_boolean_literals: true,
            extract_indexes_from_alter: true,
        }
    }

    pub fn gauss_mysql() -> Self {
        Self {
            dialect: Dialect::GaussMySql,
            normalize_boolean_literals: false,
            extract_indexes_from_alter: false,
        }
    }

    /// Resolve a profile from a user-supplied dialect name. Unrecognized
    /// names fall back to the standard PostgreSQL profile.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "gauss" | "gauss-mysql" | "gaussdb" => Self::gauss_mysql(),
            _ => Self::postgres(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(
            DialectProfile::from_name("PostgreSQL").dialect,
            Dialect::Postgres
        );
        assert_eq!(
            DialectProfile::from_name("gauss").dialect,
            Dialect::GaussMySql
        );
        assert_eq!(
            DialectProfile::from_name("unknown").dialect,
            Dialect::Postgres
        );
    }

    #[test]
    fn test_profile_switches() {
        let pg = DialectProfile::postgres();
        assert!(pg.normalize_boolean_literals);
        assert!(pg.extract_indexes_from_alter);

        let gauss = DialectProfile::gauss_mysql();
        assert!(!gauss.normalize_boolean_literals);
        assert!(!gauss.extract_indexes_from_alter);
    }

    #[test]
    fn test_format_boolean() {
        assert_eq!(Dialect::Postgres.format_boolean(true), "TRUE");
        assert_eq!(Dialect::GaussMySql.format_boolean(false), "FALSE");
    }

    #[test]
    fn test_maybe_quote_identifier() {
        let d = Dialect::Postgres;
        assert_eq!(d.maybe_quote_identifier("user_name"), "user_name");
        assert_eq!(d.maybe_quote_identifier("UserName"), "\"UserName\"");
        assert_eq!(d.maybe_quote_identifier("2fa"), "\"2fa\"");
        assert_eq!(d.maybe_quote_identifier("with space"), "\"with space\"");
    }
}
