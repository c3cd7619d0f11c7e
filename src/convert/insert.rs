//! INSERT conversion.
//!
//! Rewritten at the token level rather than from the statement tree so that
//! arbitrary value expressions survive verbatim. The rewrite flattens
//! single-row, multi-row and ROW() constructor shapes into one normalized
//! multi-row statement, expands a missing column list from schema metadata,
//! renders boolean-classified literals as TRUE/FALSE and wraps values bound
//! for binary columns in `convert_to(..., 'UTF8')`.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use crate::convert::{ConversionContext, ConversionResult};
use crate::dialect::Dialect;
use crate::error::ConvertError;
use crate::metadata::{ColumnInfo, TableInfo};
use crate::tokens::{ScannedValue, TokenParser};

pub fn process(
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) -> Result<(), ConvertError> {
    let sql = convert_insert(raw, context)?;
    result.append_raw(&sql);
    Ok(())
}

fn convert_insert(raw: &str, context: &ConversionContext) -> Result<String, ConvertError> {
    let mut parser =
        TokenParser::new(raw).ok_or_else(|| unsupported("tokenizer rejected INSERT"))?;

    parser.skip_whitespace();
    parser
        .expect_keyword(Keyword::INSERT)
        .ok_or_else(|| unsupported("expected INSERT"))?;
    parser.skip_whitespace();
    let ignore = parser.expect_keyword(Keyword::IGNORE).is_some();
    parser.skip_whitespace();
    parser
        .expect_keyword(Keyword::INTO)
        .ok_or_else(|| unsupported("expected INTO"))?;
    parser.skip_whitespace();
    let table = parser
        .parse_object_name()
        .ok_or_else(|| unsupported("expected table name"))?;

    parser.skip_whitespace();
    let mut columns = Vec::new();
    if parser.check_token(&Token::LParen) {
        parser.advance();
        loop {
            parser.skip_whitespace();
            let column = parser
                .parse_identifier()
                .ok_or_else(|| unsupported("expected column name"))?;
            columns.push(column);
            parser.skip_whitespace();
            if parser.expect_token(&Token::Comma).is_some() {
                continue;
            }
            parser
                .expect_token(&Token::RParen)
                .ok_or_else(|| unsupported("unterminated column list"))?;
            break;
        }
        parser.skip_whitespace();
    }

    if parser.expect_keyword(Keyword::VALUES).is_none()
        && parser.expect_word_ci("VALUE").is_none()
    {
        return Err(unsupported("expected VALUES"));
    }

    let table_meta = context.metadata.find(&table);
    if columns.is_empty() {
        let inferred: Vec<String> = table_meta
            .map(|t| t.columns().iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();
        if inferred.is_empty() {
            return Err(ConvertError::MissingColumnList {
                table: table.clone(),
            });
        }
        columns = inferred;
    }

    let mut rows: Vec<Vec<ScannedValue>> = Vec::new();
    loop {
        parser.skip_whitespace();
        let _ = parser.expect_word_ci("ROW");
        parser.skip_whitespace();
        parser
            .expect_token(&Token::LParen)
            .ok_or_else(|| unsupported("expected value row"))?;
        let mut row = Vec::new();
        loop {
            let value = parser
                .parse_scanned_value(&[])
                .ok_or_else(|| unsupported("empty value expression"))?;
            row.push(value);
            if parser.expect_token(&Token::Comma).is_some() {
                continue;
            }
            parser
                .expect_token(&Token::RParen)
                .ok_or_else(|| unsupported("unterminated value row"))?;
            break;
        }
        if row.len() != columns.len() {
            return Err(ConvertError::ColumnCountMismatch {
                table,
                expected: columns.len(),
                found: row.len(),
            });
        }
        rows.push(row);
        parser.skip_whitespace();
        if parser.expect_token(&Token::Comma).is_some() {
            continue;
        }
        break;
    }
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(unsupported("trailing tokens after VALUES list"));
    }

    let rendered_rows: Vec<String> = rows
        .iter()
        .map(|row| {
            let values: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, value)| render_value(value, &columns[i], &table, table_meta, context))
                .collect();
            format!("    ({})", values.join(", "))
        })
        .collect();

    // INSERT IGNORE: the duplicate-key tolerance maps to ON CONFLICT DO
    // NOTHING on PostgreSQL; the Gauss target accepts it as written.
    let head = if ignore && context.profile.dialect == Dialect::GaussMySql {
        "INSERT IGNORE INTO"
    } else {
        "INSERT INTO"
    };
    let conflict = if ignore && context.profile.dialect == Dialect::Postgres {
        "\nON CONFLICT DO NOTHING"
    } else {
        ""
    };
    Ok(format!(
        "{head} {table} ({}) VALUES\n{}{conflict};\n",
        columns.join(", "),
        rendered_rows.join(",\n")
    ))
}

fn render_value(
    value: &ScannedValue,
    column: &str,
    table: &str,
    table_meta: Option<&TableInfo>,
    context: &ConversionContext,
) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }

    let info = table_meta.and_then(|t| t.column(column));
    let boolean_classified = context.booleans.is_boolean_column(Some(table), column)
        || info.is_some_and(ColumnInfo::is_boolean_like);
    if context.profile.normalize_boolean_literals && boolean_classified {
        if let Some(flag) = value.as_boolean() {
            return context.profile.dialect.format_boolean(flag).to_string();
        }
    }

    let text = strip_binary_prefix(&value.text);
    if info.is_some_and(ColumnInfo::is_binary_like) {
        wrap_binary_literal(&text)
    } else {
        text
    }
}

/// Drop a leading `_binary` literal introducer.
pub(crate) fn strip_binary_prefix(literal: &str) -> String {
    let trimmed = literal.trim();
    if trimmed.len() >= 7 && trimmed[..7].eq_ignore_ascii_case("_binary") {
        return trimmed[7..].trim_start().to_string();
    }
    literal.to_string()
}

/// Wrap a literal for a binary column. Idempotent: NULL and already-wrapped
/// values pass through.
pub(crate) fn wrap_binary_literal(literal: &str) -> String {
    let trimmed = literal.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return literal.to_string();
    }
    if trimmed.to_lowercase().starts_with("convert_to(") {
        return literal.to_string();
    }
    format!("convert_to({literal}, 'UTF8')")
}

fn unsupported(message: &str) -> ConvertError {
    ConvertError::UnsupportedStatement {
        message: message.to_string(),
    }
}
