//! Static MySQL to PostgreSQL mapping tables for column types and default
//! value keywords.

use std::collections::HashMap;
use std::sync::LazyLock;

/// MySQL type name (lowercase, without arguments) to PostgreSQL type name.
static DATA_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("tinyint", "smallint"),
        ("smallint", "smallint"),
        ("mediumint", "integer"),
        ("int", "integer"),
        ("integer", "integer"),
        ("bigint", "bigint"),
        ("float", "real"),
        ("double", "double precision"),
        ("double precision", "double precision"),
        ("decimal", "numeric"),
        ("numeric", "numeric"),
        ("bit", "boolean"),
        ("bool", "boolean"),
        ("boolean", "boolean"),
        ("char", "char"),
        ("varchar", "varchar"),
        ("tinytext", "text"),
        ("text", "text"),
        ("mediumtext", "text"),
        ("longtext", "text"),
        ("date", "date"),
        ("time", "time"),
        ("datetime", "timestamp"),
        ("timestamp", "timestamp"),
        ("year", "smallint"),
        ("binary", "bytea"),
        ("varbinary", "bytea"),
        ("tinyblob", "bytea"),
        ("blob", "bytea"),
        ("mediumblob", "bytea"),
        ("longblob", "bytea"),
        ("json", "jsonb"),
        ("enum", "varchar"),
        ("set", "varchar"),
    ])
});

/// MySQL default value keyword (lowercase) to its PostgreSQL form.
static DEFAULT_VALUES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("current_timestamp", "CURRENT_TIMESTAMP"),
        ("current_timestamp()", "CURRENT_TIMESTAMP"),
        ("now()", "CURRENT_TIMESTAMP"),
        ("localtimestamp", "CURRENT_TIMESTAMP"),
        ("localtimestamp()", "CURRENT_TIMESTAMP"),
        ("current_date", "CURRENT_DATE"),
        ("current_date()", "CURRENT_DATE"),
        ("curdate()", "CURRENT_DATE"),
        ("current_time", "CURRENT_TIME"),
        ("current_time()", "CURRENT_TIME"),
        ("curtime()", "CURRENT_TIME"),
        ("null", "NULL"),
    ])
});

/// Look up the PostgreSQL type for a MySQL base type name.
///
/// The lookup is case-insensitive and ignores type arguments; callers pass
/// the bare type name (e.g. `varchar`, not `varchar(100)`).
pub fn map_data_type(mysql_type: &str) -> Option<&'static str> {
    DATA_TYPES
        .get(mysql_type.to_lowercase().as_str())
        .copied()
}

/// Whether a mapped PostgreSQL type retains the source type's arguments.
///
/// Integer-family and unparameterized targets drop arguments: `tinyint(3)`
/// becomes plain `smallint`, `bit(1)` plain `boolean`.
pub fn type_keeps_arguments(pg_type: &str) -> bool {
    matches!(pg_type, "char" | "varchar" | "numeric" | "time" | "timestamp")
}

/// Look up the PostgreSQL rendering for a MySQL default value keyword.
///
/// Returns `None` for ordinary literals, which pass through unchanged.
pub fn map_default_value(value: &str) -> Option<&'static str> {
    DEFAULT_VALUES
        .get(value.trim().to_lowercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_data_type_case_insensitive() {
        assert_eq!(map_data_type("BIGINT"), Some("bigint"));
        assert_eq!(map_data_type("Datetime"), Some("timestamp"));
        assert_eq!(map_data_type("longtext"), Some("text"));
    }

    #[test]
    fn test_map_data_type_unknown() {
        assert_eq!(map_data_type("geometry"), None);
    }

    #[test]
    fn test_blob_family_maps_to_bytea() {
        for t in ["binary", "varbinary", "tinyblob", "blob", "mediumblob", "longblob"] {
            assert_eq!(map_data_type(t), Some("bytea"));
        }
    }

    #[test]
    fn test_type_keeps_arguments() {
        assert!(type_keeps_arguments("varchar"));
        assert!(type_keeps_arguments("numeric"));
        assert!(!type_keeps_arguments("smallint"));
        assert!(!type_keeps_arguments("boolean"));
        assert!(!type_keeps_arguments("bytea"));
    }

    #[test]
    fn test_map_default_value() {
        assert_eq!(map_default_value("CURRENT_TIMESTAMP"), Some("CURRENT_TIMESTAMP"));
        assert_eq!(map_default_value("now()"), Some("CURRENT_TIMESTAMP"));
        assert_eq!(map_default_value("curdate()"), Some("CURRENT_DATE"));
        assert_eq!(map_default_value(" NULL "), Some("NULL"));
        assert_eq!(map_default_value("'abc'"), None);
    }
}
