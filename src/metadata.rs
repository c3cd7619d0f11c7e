//! Schema metadata collected while converting DDL, consumed later by the
//! DML processors.
//!
//! CREATE TABLE statements register their column layout here so that a
//! subsequent `INSERT INTO t VALUES (...)` without a column list can be
//! expanded, and so literal handling can consult the source column type.

use std::collections::HashMap;

/// Source-side facts about one column.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    /// Lowercased MySQL base type without arguments, e.g. `tinyint`.
    pub data_type: String,
    /// Type arguments as written, e.g. `["10", "2"]` for `decimal(10,2)`.
    pub arguments: Vec<String>,
}

impl ColumnInfo {
    pub fn new(name: &str, declared_type: &str) -> Self {
        let (data_type, arguments) = parse_data_type(declared_type);
        Self {
            name: name.to_string(),
            data_type,
            arguments,
        }
    }

    /// Whether the declared type marks this column as a flag: `boolean`,
    /// or `tinyint`/`bit` with no length argument or length 1.
    pub fn is_boolean_like(&self) -> bool {
        match self.data_type.as_str() {
            "boolean" | "bool" => true,
            "tinyint" | "bit" => self
                .arguments
                .first()
                .map_or(true, |length| length == "1"),
            _ => false,
        }
    }

    /// Whether the declared type stores raw bytes. String literals bound for
    /// these columns get wrapped in `convert_to(..., 'UTF8')`.
    pub fn is_binary_like(&self) -> bool {
        matches!(
            self.data_type.as_str(),
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob"
        )
    }
}

/// Ordered column metadata for one table.
#[derive(Debug, Clone)]
pub struct TableInfo {
    name: String,
    columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a column, replacing any earlier column of the same name.
    pub fn add_column(&mut self, column: ColumnInfo) {
        let key = normalize_name(&column.name);
        if let Some(existing) = self
            .columns
            .iter_mut()
            .find(|c| normalize_name(&c.name) == key)
        {
            *existing = column;
        } else {
            self.columns.push(column);
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        let key = normalize_name(name);
        self.columns.iter().find(|c| normalize_name(&c.name) == key)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }
}

/// All tables seen so far, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct SchemaMetadata {
    tables: HashMap<String, TableInfo>,
}

impl SchemaMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, table: TableInfo) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn find(&self, table_name: &str) -> Option<&TableInfo> {
        self.tables.get(&normalize_name(table_name))
    }
}

/// Lowercase a table or column name and strip double quotes. Backticks are
/// removed from the whole script before parsing, so they never reach here,
/// but strip them anyway for callers that feed raw text.
pub fn normalize_name(name: &str) -> String {
    name.replace(['"', '`'], "").trim().to_lowercase()
}

/// Split a declared type like `decimal(10,2) unsigned` into its lowercase
/// base name and argument list. Modifier words after the arguments
/// (`unsigned`, `zerofill`) are dropped.
pub fn parse_data_type(declared: &str) -> (String, Vec<String>) {
    let declared = declared.trim();
    let (base, arguments) = match declared.find('(') {
        Some(open) => {
            let close = declared.rfind(')').unwrap_or(declared.len());
            let inner = &declared[open + 1..close.min(declared.len())];
            let args = inner
                .split(',')
                .map(|a| a.trim().trim_matches('\'').to_string())
                .filter(|a| !a.is_empty())
                .collect();
            (&declared[..open], args)
        }
        None => (declared, Vec::new()),
    };

    let mut base = base.trim().to_lowercase();
    for modifier in [" unsigned", " zerofill"] {
        if let Some(stripped) = base.strip_suffix(modifier) {
            base = stripped.trim_end().to_string();
        }
    }
    (base, arguments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_type_with_arguments() {
        assert_eq!(
            parse_data_type("decimal(10, 2)"),
            ("decimal".to_string(), vec!["10".to_string(), "2".to_string()])
        );
        assert_eq!(
            parse_data_type("VARCHAR(255)"),
            ("varchar".to_string(), vec!["255".to_string()])
        );
    }

    #[test]
    fn test_parse_data_type_strips_modifiers() {
        assert_eq!(
            parse_data_type("tinyint(3) unsigned"),
            ("tinyint".to_string(), vec!["3".to_string()])
        );
        assert_eq!(parse_data_type("INT UNSIGNED"), ("int".to_string(), vec![]));
    }

    #[test]
    fn test_parse_data_type_enum_values() {
        let (base, args) = parse_data_type("enum('a','b')");
        assert_eq!(base, "enum");
        assert_eq!(args, vec!["a", "b"]);
    }

    #[test]
    fn test_boolean_like() {
        assert!(ColumnInfo::new("f", "tinyint(1)").is_boolean_like());
        assert!(ColumnInfo::new("f", "tinyint").is_boolean_like());
        assert!(ColumnInfo::new("f", "bit(1)").is_boolean_like());
        assert!(ColumnInfo::new("f", "boolean").is_boolean_like());
        assert!(!ColumnInfo::new("f", "tinyint(3)").is_boolean_like());
        assert!(!ColumnInfo::new("f", "int(11)").is_boolean_like());
    }

    #[test]
    fn test_binary_like() {
        assert!(ColumnInfo::new("b", "longblob").is_binary_like());
        assert!(ColumnInfo::new("b", "varbinary(64)").is_binary_like());
        assert!(!ColumnInfo::new("b", "varchar(64)").is_binary_like());
    }

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        let mut table = TableInfo::new("Sys_User");
        table.add_column(ColumnInfo::new("User_Name", "varchar(64)"));
        assert!(table.column("user_name").is_some());
        assert_eq!(table.name(), "sys_user");

        let mut schema = SchemaMetadata::new();
        schema.register(table);
        assert!(schema.find("SYS_USER").is_some());
    }

    #[test]
    fn test_redefined_column_replaces_earlier_entry() {
        let mut table = TableInfo::new("t");
        table.add_column(ColumnInfo::new("c", "int"));
        table.add_column(ColumnInfo::new("c", "tinyint(1)"));
        assert_eq!(table.columns().len(), 1);
        assert!(table.column("c").is_some_and(ColumnInfo::is_boolean_like));
    }
}
