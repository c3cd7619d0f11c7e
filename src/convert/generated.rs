//! Converts the MySQL stored generated-column idiom
//! `unique_key ... GENERATED ALWAYS AS (MD5(CONCAT(COALESCE(a,''), ...))) STORED`
//! into a physical column maintained by a trigger, plus a unique index.
//!
//! PostgreSQL-family targets only. The Gauss profile keeps the generated
//! column verbatim and never reaches this module.

use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::ColumnDef;

use crate::convert::{ConversionContext, ConversionResult};
use crate::dialect::Dialect;
use crate::metadata::TableInfo;

static GENERATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)GENERATED\s+ALWAYS\s+AS\s*\((.*)\)\s*STORED").unwrap());
static RAW_ALTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)ALTER\s+TABLE\s+([\w."]+)\s+ADD\s+COLUMN\s+(["\w]+)\s+(.+?)\s+GENERATED\s+ALWAYS\s+AS\s*\((.*)\)\s*STORED"#,
    )
    .unwrap()
});
static COALESCE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)coalesce\(\s*"?([a-zA-Z0-9_]+)"?\s*,"#).unwrap());

/// Structured-path entry: an added column from a parsed ALTER TABLE.
/// Returns false when the idiom does not match, letting normal column
/// rendering proceed.
pub(crate) fn try_convert_column(
    table: &str,
    column: &ColumnDef,
    context: &ConversionContext,
    out: &mut ConversionResult,
) -> bool {
    if context.profile.dialect != Dialect::Postgres {
        return false;
    }
    if !column.name.value.eq_ignore_ascii_case("unique_key") {
        return false;
    }
    let definition = column.to_string();
    let Some(captures) = GENERATED.captures(&definition) else {
        return false;
    };
    // DataType's Display uppercases; dumps write types in lowercase.
    convert_expression(
        table,
        &column.name.value,
        &column.data_type.to_string().to_lowercase(),
        &captures[1],
        context,
        out,
    )
}

/// Raw-text entry for when the parser rejected the ALTER outright.
pub(crate) fn try_convert_raw(
    raw: &str,
    context: &ConversionContext,
    out: &mut ConversionResult,
) -> bool {
    if context.profile.dialect != Dialect::Postgres {
        return false;
    }
    let Some(captures) = RAW_ALTER.captures(raw) else {
        return false;
    };
    let table = clean(&captures[1]);
    let column = clean(&captures[2]);
    let data_type = captures[3].trim().to_string();
    convert_expression(&table, &column, &data_type, &captures[4], context, out)
}

fn convert_expression(
    table: &str,
    column: &str,
    data_type: &str,
    expression: &str,
    context: &ConversionContext,
    out: &mut ConversionResult,
) -> bool {
    let source_columns: Vec<String> = COALESCE_COLUMN
        .captures_iter(expression)
        .map(|c| c[1].to_string())
        .collect();
    if source_columns.is_empty() {
        return false;
    }

    let table = clean(table);
    let table_meta = context.metadata.find(&table);
    let base = table.replace('.', "_");
    let function_name = format!("trg_{base}_{column}_fn");
    let trigger_name = format!("trg_{base}_{column}");
    let index_name = format!("{base}_{column}_idx");

    out.append_statement(&format!("ALTER TABLE {table} ADD COLUMN {column} {data_type};"));

    let input_expression = source_columns
        .iter()
        .map(|c| format!("        {}", render_coalesce(c, table_meta)))
        .collect::<Vec<_>>()
        .join(" ||\n");
    out.append_raw(&format!(
        "CREATE OR REPLACE FUNCTION {function_name}()\n\
         RETURNS TRIGGER AS $$\n\
         DECLARE\n\
         \x20   input_text TEXT;\n\
         BEGIN\n\
         \x20   input_text :=\n{input_expression};\n\
         \x20   NEW.{column} := LOWER(SUBSTRING(MD5(input_text) FROM 1 FOR 32));\n\
         \x20   RETURN NEW;\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n"
    ));

    out.append_raw(&format!(
        "CREATE TRIGGER {trigger_name}\n\
         \x20   BEFORE INSERT OR UPDATE ON {table}\n\
         \x20   FOR EACH ROW\n\
         \x20   EXECUTE FUNCTION {function_name}();\n"
    ));

    out.append_statement(&format!(
        "CREATE UNIQUE INDEX {index_name} ON {table} ({column});"
    ));
    true
}

fn render_coalesce(column: &str, table_meta: Option<&TableInfo>) -> String {
    let expression = match table_meta.and_then(|t| t.column(column)) {
        Some(info) => {
            let data_type = &info.data_type;
            if data_type.contains("char")
                || data_type.contains("text")
                || data_type.contains("clob")
                || data_type.contains("blob")
            {
                format!("NEW.{column}")
            } else if data_type.contains("date") {
                format!("TO_CHAR(NEW.{column}, 'YYYYMMDD')")
            } else {
                format!("NEW.{column}::TEXT")
            }
        }
        None => format!("NEW.{column}::TEXT"),
    };
    format!("COALESCE({expression}, '')")
}

fn clean(identifier: &str) -> String {
    identifier.replace(['"', '`'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use crate::convert::convert_script;
    use crate::dialect::DialectProfile;

    const SCHEMA: &str = "CREATE TABLE orders (\
        id bigint PRIMARY KEY, \
        code varchar(32), \
        created datetime, \
        amount int);";

    const GENERATED_ALTER: &str = "ALTER TABLE orders ADD COLUMN unique_key varchar(32) \
        GENERATED ALWAYS AS (MD5(CONCAT(COALESCE(code,''), COALESCE(created,''), COALESCE(amount,'')))) STORED;";

    #[test]
    fn test_emits_four_artifacts_in_order() {
        let script = format!("{SCHEMA}\n{GENERATED_ALTER}");
        let out = convert_script(&script, DialectProfile::postgres()).sql;

        let add = out
            .find("ALTER TABLE orders ADD COLUMN unique_key varchar(32);")
            .expect(&out);
        let func = out
            .find("CREATE OR REPLACE FUNCTION trg_orders_unique_key_fn()")
            .expect(&out);
        let trigger = out.find("CREATE TRIGGER trg_orders_unique_key").expect(&out);
        let index = out
            .find("CREATE UNIQUE INDEX orders_unique_key_idx ON orders (unique_key);")
            .expect(&out);
        assert!(add < func && func < trigger && trigger < index, "{out}");
    }

    #[test]
    fn test_cast_selection_per_source_type() {
        let script = format!("{SCHEMA}\n{GENERATED_ALTER}");
        let out = convert_script(&script, DialectProfile::postgres()).sql;

        assert!(out.contains("COALESCE(NEW.code, '')"), "{out}");
        assert!(out.contains("COALESCE(TO_CHAR(NEW.created, 'YYYYMMDD'), '')"), "{out}");
        assert!(out.contains("COALESCE(NEW.amount::TEXT, '')"), "{out}");
    }

    #[test]
    fn test_hash_assignment_shape() {
        let script = format!("{SCHEMA}\n{GENERATED_ALTER}");
        let out = convert_script(&script, DialectProfile::postgres()).sql;
        assert!(
            out.contains("NEW.unique_key := LOWER(SUBSTRING(MD5(input_text) FROM 1 FOR 32));"),
            "{out}"
        );
        assert!(out.contains("BEFORE INSERT OR UPDATE ON orders"), "{out}");
        assert!(out.contains("EXECUTE FUNCTION trg_orders_unique_key_fn();"), "{out}");
    }

    #[test]
    fn test_other_column_names_do_not_match() {
        let script = "ALTER TABLE t ADD COLUMN other_key varchar(32) \
            GENERATED ALWAYS AS (MD5(CONCAT(COALESCE(a,'')))) STORED;";
        let out = convert_script(script, DialectProfile::postgres()).sql;
        assert!(!out.contains("CREATE TRIGGER"), "{out}");
    }

    #[test]
    fn test_gauss_keeps_generated_column() {
        let out = convert_script(GENERATED_ALTER, DialectProfile::gauss_mysql()).sql;
        assert!(out.to_uppercase().contains("GENERATED ALWAYS AS"), "{out}");
        assert!(!out.contains("CREATE TRIGGER"), "{out}");
    }
}
