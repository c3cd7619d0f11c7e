//! ALTER TABLE conversion.
//!
//! Three shapes matter: column additions (rendered through the shared
//! column renderer, with the generated-column idiom tried first), index
//! additions (split into CREATE INDEX statements when the dialect asks for
//! it), and everything else, which passes through with only textual
//! normalization.

use sqlparser::ast::{AlterTableOperation, ColumnDef, ObjectName};

use crate::convert::{
    create_table, fallback, generated, replace_datetime, strip_charset_introducers,
    ConversionContext, ConversionResult,
};
use crate::error::ConvertError;

pub fn process(
    name: &ObjectName,
    operations: &[AlterTableOperation],
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) -> Result<(), ConvertError> {
    let table = name.to_string();

    // Only a pure column-addition ALTER is restructured; mixing in other
    // operations would risk dropping them, so such statements pass through.
    let added_columns: Vec<&ColumnDef> = if operations.iter().all(|op| {
        matches!(op, AlterTableOperation::AddColumn { .. })
    }) {
        operations
            .iter()
            .filter_map(|op| match op {
                // Dropping the positional clause (AFTER x) is intentional:
                // rendering goes through the column definition alone.
                AlterTableOperation::AddColumn { column_def, .. } => Some(column_def),
                _ => None,
            })
            .collect()
    } else {
        Vec::new()
    };

    if !added_columns.is_empty() {
        let mut block = ConversionResult::new();
        for column in &added_columns {
            if generated::try_convert_column(&table, column, context, &mut block) {
                continue;
            }
            let rendered = create_table::render_column(&table, column, context)?;
            block.append_statement(&format!("ALTER TABLE {table} ADD COLUMN {}", rendered.sql));
            if let Some(comment) = rendered.comment {
                block.append_statement(&comment);
            }
        }
        result.append_raw(block.as_sql());
        return Ok(());
    }

    if context.profile.extract_indexes_from_alter {
        if let Some(statements) = fallback::convert_alter_add_index(raw, &context.profile) {
            for statement in statements {
                result.append_statement(&statement);
            }
            return Ok(());
        }
    }

    result.append_statement(&replace_datetime(&strip_charset_introducers(raw)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::convert::convert_script;
    use crate::dialect::DialectProfile;

    fn convert(sql: &str) -> String {
        convert_script(sql, DialectProfile::postgres()).sql
    }

    #[test]
    fn test_add_column_rendered_with_mapped_type() {
        let out = convert("ALTER TABLE t ADD COLUMN remark longtext;");
        assert_eq!(out, "ALTER TABLE t ADD COLUMN remark text;\n");
    }

    #[test]
    fn test_add_column_comment_split_off() {
        let out = convert("ALTER TABLE t ADD COLUMN remark varchar(200) NULL COMMENT 'note';");
        assert!(out.contains("ALTER TABLE t ADD COLUMN remark varchar(200) NULL;"), "{out}");
        assert!(out.contains("COMMENT ON COLUMN t.remark IS 'note';"), "{out}");
    }

    #[test]
    fn test_add_column_after_clause_dropped() {
        let out = convert("ALTER TABLE t ADD COLUMN flag tinyint(1) NOT NULL DEFAULT 0 AFTER name;");
        assert!(out.contains("ALTER TABLE t ADD COLUMN flag boolean NOT NULL DEFAULT FALSE;"), "{out}");
        assert!(!out.to_uppercase().contains("AFTER"), "{out}");
    }

    #[test]
    fn test_mixed_alter_operations_pass_through() {
        let out = convert("ALTER TABLE t ADD COLUMN a int, DROP COLUMN b;");
        assert!(out.contains("ADD COLUMN a int"), "{out}");
        assert!(out.contains("DROP COLUMN b"), "{out}");
    }

    #[test]
    fn test_other_alter_passes_through_normalized() {
        let out = convert("ALTER TABLE t MODIFY COLUMN created datetime NOT NULL;");
        assert!(out.contains("timestamp"), "{out}");
        assert!(!out.to_lowercase().contains("datetime"), "{out}");
    }

    #[test]
    fn test_unsupported_added_type_keeps_statement() {
        let outcome = convert_script(
            "ALTER TABLE t ADD COLUMN shape geometry;",
            DialectProfile::postgres(),
        );
        assert!(outcome.sql.contains("shape geometry"), "{}", outcome.sql);
        assert_eq!(outcome.diagnostics.len(), 1);
    }
}
