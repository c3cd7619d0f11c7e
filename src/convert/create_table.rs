//! CREATE TABLE conversion.
//!
//! The PostgreSQL renderer rebuilds the statement completely: mapped column
//! types, inline serial primary key, extracted comments, and standalone
//! CREATE INDEX / ADD CONSTRAINT statements for secondary indexes and
//! foreign keys. The Gauss renderer keeps the MySQL text and only swaps
//! `datetime` for `timestamp` and re-indents the column list.

use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::{ColumnDef, ColumnOption, CreateTable, TableConstraint};

use crate::convert::{replace_datetime, ConversionContext, ConversionResult};
use crate::dialect::Dialect;
use crate::error::ConvertError;
use crate::mapping::{map_data_type, map_default_value, type_keeps_arguments};
use crate::metadata::{parse_data_type, ColumnInfo, TableInfo};

static TABLE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bCOMMENT\s*=?\s*('(?:[^'\\]|\\.|'')*')").unwrap());

pub fn process(
    create: &CreateTable,
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) -> Result<(), ConvertError> {
    let rendered = match context.profile.dialect {
        Dialect::Postgres => render_postgres(create, raw, context)?,
        Dialect::GaussMySql => render_gauss(raw),
    };
    result.append_block(&rendered);
    context.metadata.register(table_info(create));
    Ok(())
}

/// Record the table's source-side column layout for later DML conversion.
fn table_info(create: &CreateTable) -> TableInfo {
    let mut table = TableInfo::new(&create.name.to_string());
    for column in &create.columns {
        table.add_column(ColumnInfo::new(
            &column.name.value,
            &column.data_type.to_string(),
        ));
    }
    table
}

fn render_postgres(
    create: &CreateTable,
    raw: &str,
    context: &ConversionContext,
) -> Result<String, ConvertError> {
    let table = create.name.to_string();
    let primary_key = resolve_primary_key(create, &table)?;

    let mut body_lines = Vec::new();
    let mut comments = Vec::new();

    if let Some(literal) = extract_table_comment(raw) {
        comments.push(format!("COMMENT ON TABLE {table} IS {literal};"));
    }

    for column in &create.columns {
        let name = column.name.value.clone();
        if name.eq_ignore_ascii_case(&primary_key) {
            let scanned = scan_column_options(column, false, context);
            let rendered_name = context.profile.dialect.maybe_quote_identifier(&name);
            body_lines.push(format!(
                "{rendered_name} {} PRIMARY KEY",
                primary_key_type(column, &table, context)?
            ));
            if let Some(text) = scanned.comment {
                comments.push(column_comment(&table, &name, &text));
            }
        } else {
            let rendered = render_column(&table, column, context)?;
            body_lines.push(rendered.sql);
            if let Some(comment) = rendered.comment {
                comments.push(comment);
            }
        }
    }

    let mut index_statements = Vec::new();
    let mut foreign_keys = Vec::new();
    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey { .. } => {}
            // `UNIQUE KEY uk (b)` carries its name in `index_name`;
            // `CONSTRAINT c UNIQUE (b)` carries it in `name`.
            TableConstraint::Unique {
                name,
                index_name,
                columns,
                ..
            } => {
                index_statements.push(render_index(
                    &table,
                    name.as_ref()
                        .or(index_name.as_ref())
                        .map(|n| n.value.clone()),
                    columns.iter().map(|c| c.value.clone()).collect(),
                    true,
                ));
            }
            TableConstraint::Index { name, columns, .. } => {
                index_statements.push(render_index(
                    &table,
                    name.as_ref().map(|n| n.value.clone()),
                    columns.iter().map(|c| c.value.clone()).collect(),
                    false,
                ));
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                foreign_table,
                referred_columns,
                ..
            } => {
                let columns: Vec<String> = columns.iter().map(|c| c.value.clone()).collect();
                let constraint_name = name
                    .as_ref()
                    .map(|n| n.value.clone())
                    .unwrap_or_else(|| synthesize_name(&table, &columns, "fkey"));
                foreign_keys.push(format!(
                    "ALTER TABLE {table}\n    ADD CONSTRAINT {constraint_name} FOREIGN KEY ({}) REFERENCES {} ({});",
                    columns.join(", "),
                    foreign_table,
                    referred_columns
                        .iter()
                        .map(|c| c.value.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            // CHECK constraints and anything else survive inside the body.
            other => body_lines.push(other.to_string()),
        }
    }

    let mut sql = format!("CREATE TABLE {table} (\n");
    for (i, line) in body_lines.iter().enumerate() {
        sql.push_str("    ");
        sql.push_str(line);
        if i + 1 != body_lines.len() {
            sql.push(',');
        }
        sql.push('\n');
    }
    sql.push_str(");\n");

    let mut iter = comments.iter();
    if let Some(first) = iter.next() {
        sql.push('\n');
        sql.push_str(first);
        sql.push('\n');
        for comment in iter {
            sql.push_str(comment);
            sql.push('\n');
        }
    }

    if !index_statements.is_empty() {
        sql.push('\n');
        for statement in &index_statements {
            sql.push_str(statement);
            sql.push('\n');
        }
    }
    if !foreign_keys.is_empty() {
        if index_statements.is_empty() {
            sql.push('\n');
        }
        for statement in &foreign_keys {
            sql.push_str(statement);
            sql.push('\n');
        }
    }

    Ok(sql)
}

/// Serial promotion for integer primary keys; everything else goes through
/// the normal type mapping.
fn primary_key_type(
    column: &ColumnDef,
    table: &str,
    context: &ConversionContext,
) -> Result<String, ConvertError> {
    let (base, _) = parse_data_type(&column.data_type.to_string());
    match base.as_str() {
        "bigint" => Ok("bigserial".to_string()),
        "int" | "integer" => Ok("serial".to_string()),
        _ => resolve_column_type(table, column, context),
    }
}

fn resolve_primary_key(create: &CreateTable, table: &str) -> Result<String, ConvertError> {
    let mut pk_columns: Vec<String> = Vec::new();
    for constraint in &create.constraints {
        if let TableConstraint::PrimaryKey { columns, .. } = constraint {
            pk_columns = columns.iter().map(|c| c.value.clone()).collect();
            break;
        }
    }
    if pk_columns.is_empty() {
        for column in &create.columns {
            let inline_pk = column.options.iter().any(|opt| {
                matches!(&opt.option, ColumnOption::Unique { is_primary: true, .. })
            });
            if inline_pk {
                pk_columns.push(column.name.value.clone());
                break;
            }
        }
    }
    match pk_columns.len() {
        0 => Err(ConvertError::PrimaryKeyNotFound {
            table: table.to_string(),
        }),
        1 => Ok(pk_columns.remove(0)),
        _ => Err(ConvertError::CompositePrimaryKey {
            table: table.to_string(),
        }),
    }
}

/// One fully rendered column plus its extracted COMMENT statement, if any.
pub(crate) struct RenderedColumn {
    pub sql: String,
    pub comment: Option<String>,
}

/// Render a single column definition in target form. Shared with the ALTER
/// processor's ADD COLUMN path.
pub(crate) fn render_column(
    table: &str,
    column: &ColumnDef,
    context: &ConversionContext,
) -> Result<RenderedColumn, ConvertError> {
    let resolved_type = resolve_column_type(table, column, context)?;
    let boolean_type = resolved_type == "boolean";
    let scanned = scan_column_options(column, boolean_type, context);

    let name = context.profile.dialect.maybe_quote_identifier(&column.name.value);
    let mut fragments = vec![name, resolved_type];
    if let Some(nullability) = scanned.nullability {
        fragments.push(nullability.to_string());
    }
    if !scanned.residual.is_empty() {
        fragments.push(scanned.residual.join(" "));
    }
    if let Some(default_fragment) = scanned.default_fragment {
        fragments.push(default_fragment);
    }

    Ok(RenderedColumn {
        sql: fragments.join(" "),
        comment: scanned
            .comment
            .map(|text| column_comment(table, &column.name.value, &text)),
    })
}

fn resolve_column_type(
    table: &str,
    column: &ColumnDef,
    context: &ConversionContext,
) -> Result<String, ConvertError> {
    let info = ColumnInfo::new(&column.name.value, &column.data_type.to_string());
    if info.is_boolean_like()
        || context
            .booleans
            .is_boolean_column(Some(table), &column.name.value)
    {
        return Ok("boolean".to_string());
    }
    let target = map_data_type(&info.data_type).ok_or_else(|| ConvertError::UnsupportedType {
        data_type: info.data_type.clone(),
    })?;
    let numeric_args = !info.arguments.is_empty()
        && info
            .arguments
            .iter()
            .all(|a| a.chars().all(|c| c.is_ascii_digit()));
    if numeric_args && type_keeps_arguments(target) {
        Ok(format!("{target}({})", info.arguments.join(",")))
    } else {
        Ok(target.to_string())
    }
}

/// Extracted fields from a column's option list after one forward pass.
struct ScannedOptions {
    nullability: Option<&'static str>,
    default_fragment: Option<String>,
    comment: Option<String>,
    residual: Vec<String>,
}

fn scan_column_options(
    column: &ColumnDef,
    boolean_type: bool,
    context: &ConversionContext,
) -> ScannedOptions {
    let normalize_booleans = boolean_type && context.profile.normalize_boolean_literals;
    let mut scanned = ScannedOptions {
        nullability: None,
        default_fragment: None,
        comment: None,
        residual: Vec::new(),
    };

    for opt in &column.options {
        match &opt.option {
            ColumnOption::NotNull => scanned.nullability = Some("NOT NULL"),
            ColumnOption::Null => scanned.nullability = Some("NULL"),
            ColumnOption::Default(expr) => {
                let normalized = normalize_default(&expr.to_string(), normalize_booleans);
                if normalized.eq_ignore_ascii_case("null") && scanned.nullability.is_none() {
                    scanned.nullability = Some("NULL");
                } else {
                    scanned.default_fragment = Some(format!("DEFAULT {normalized}"));
                }
            }
            ColumnOption::Comment(text) => scanned.comment = Some(text.clone()),
            // The primary key marker is handled by primary key resolution.
            ColumnOption::Unique { is_primary, .. } => {
                if !is_primary {
                    scanned.residual.push("UNIQUE".to_string());
                }
            }
            other => {
                let text = other.to_string();
                if !is_dropped_option(&text) {
                    scanned.residual.push(text);
                }
            }
        }
    }
    scanned
}

/// MySQL-only modifiers with no target equivalent.
fn is_dropped_option(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    upper == "AUTO_INCREMENT"
        || upper == "UNSIGNED"
        || upper.starts_with("ON UPDATE")
        || upper.starts_with("CHARACTER SET")
        || upper.starts_with("COLLATE")
}

fn normalize_default(mysql_default: &str, boolean_type: bool) -> String {
    let value = match map_default_value(mysql_default) {
        Some(mapped) => mapped.to_string(),
        None => mysql_default.trim().to_string(),
    };
    adjust_boolean_default(&value, boolean_type)
}

fn adjust_boolean_default(value: &str, boolean_type: bool) -> String {
    if !boolean_type {
        return value.to_string();
    }
    let trimmed = value.trim();
    let quoted = trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'');
    let unquoted = if quoted {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    match unquoted.to_lowercase().as_str() {
        "1" | "true" | "t" => "TRUE".to_string(),
        "0" | "false" | "f" => "FALSE".to_string(),
        "null" => "NULL".to_string(),
        _ => value.to_string(),
    }
}

fn column_comment(table: &str, column: &str, text: &str) -> String {
    format!(
        "COMMENT ON COLUMN {table}.{column} IS '{}';",
        text.replace('\'', "''")
    )
}

fn render_index(
    table: &str,
    name: Option<String>,
    columns: Vec<String>,
    unique: bool,
) -> String {
    let index_name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => synthesize_name(table, &columns, "idx"),
    };
    format!(
        "CREATE {}INDEX {index_name} ON {table} ({});",
        if unique { "UNIQUE " } else { "" },
        columns.join(", ")
    )
}

/// `<table>_<col1>_..._<suffix>`, lowercased, dots flattened.
fn synthesize_name(table: &str, columns: &[String], suffix: &str) -> String {
    let mut parts = vec![table.replace('.', "_").to_lowercase()];
    parts.extend(columns.iter().map(|c| c.to_lowercase()));
    parts.push(suffix.to_string());
    parts.join("_")
}

/// Quoted COMMENT literal among the raw table options, kept exactly as
/// written (including escapes).
fn extract_table_comment(raw: &str) -> Option<String> {
    let open = raw.find('(')?;
    let close = find_matching_paren(raw, open)?;
    let tail = &raw[close + 1..];
    TABLE_COMMENT
        .captures(tail)
        .map(|captures| captures[1].to_string())
}

fn render_gauss(raw: &str) -> String {
    let mut sql = replace_datetime(raw).trim().to_string();
    if !sql.ends_with(';') {
        sql.push(';');
    }
    reindent_column_list(&sql)
}

/// Re-indent the top-level column list: one definition per line, four-space
/// indent, preserving the header and the options tail untouched.
fn reindent_column_list(sql: &str) -> String {
    let Some(open) = sql.find('(') else {
        return ensure_trailing_newline(sql);
    };
    let Some(close) = find_matching_paren(sql, open) else {
        return ensure_trailing_newline(sql);
    };
    let segments = split_top_level_segments(&sql[open + 1..close]);
    if segments.is_empty() {
        return ensure_trailing_newline(sql);
    }

    let mut out = String::new();
    out.push_str(&sql[..=open]);
    out.push('\n');
    for (i, segment) in segments.iter().enumerate() {
        out.push_str("    ");
        out.push_str(segment);
        if i + 1 != segments.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&sql[close..]);
    ensure_trailing_newline(&out)
}

fn ensure_trailing_newline(sql: &str) -> String {
    if sql.ends_with('\n') {
        sql.to_string()
    } else {
        format!("{sql}\n")
    }
}

/// Index of the parenthesis matching the one at `open`, quote-aware.
pub(crate) fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes: Vec<char> = text.chars().collect();
    let byte_index: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let start = byte_index.iter().position(|&i| i == open)?;

    let mut depth = 0;
    let mut in_single = false;
    let mut in_double = false;
    let mut i = start;
    while i < bytes.len() {
        let c = bytes[i];
        if c == '\'' && !in_double {
            if in_single && bytes.get(i + 1) == Some(&'\'') {
                i += 2;
                continue;
            }
            in_single = !in_single;
        } else if c == '"' && !in_single {
            in_double = !in_double;
        } else if !in_single && !in_double {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    return Some(byte_index[i]);
                }
            }
        }
        i += 1;
    }
    None
}

/// Split on commas at parenthesis depth zero, quote-aware; segments come
/// back trimmed and non-empty.
pub(crate) fn split_top_level_segments(body: &str) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_single = false;
    let mut in_double = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' && !in_double {
            if in_single && chars.get(i + 1) == Some(&'\'') {
                current.push(c);
                current.push('\'');
                i += 2;
                continue;
            }
            in_single = !in_single;
            current.push(c);
        } else if c == '"' && !in_single {
            in_double = !in_double;
            current.push(c);
        } else if !in_single && !in_double {
            match c {
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' if depth > 0 => {
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    let segment = current.trim().to_string();
                    if !segment.is_empty() {
                        segments.push(segment);
                    }
                    current.clear();
                }
                _ => current.push(c),
            }
        } else {
            current.push(c);
        }
        i += 1;
    }
    let last = current.trim().to_string();
    if !last.is_empty() {
        segments.push(last);
    }
    segments
}
