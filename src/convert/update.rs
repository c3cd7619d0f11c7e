//! UPDATE conversion.
//!
//! Only the assignment values ever change: literals assigned to
//! boolean-classified columns become TRUE/FALSE. Everything else, including
//! the WHERE clause, is rendered back from the original tokens untouched.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use crate::convert::{strip_charset_introducers, ConversionContext, ConversionResult};
use crate::error::ConvertError;
use crate::metadata::ColumnInfo;
use crate::tokens::TokenParser;

pub fn process(
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) -> Result<(), ConvertError> {
    let sql = convert_update(raw, context)?;
    result.append_statement(&strip_charset_introducers(&sql));
    Ok(())
}

fn convert_update(raw: &str, context: &ConversionContext) -> Result<String, ConvertError> {
    let mut parser =
        TokenParser::new(raw).ok_or_else(|| unsupported("tokenizer rejected UPDATE"))?;

    parser.skip_whitespace();
    parser
        .expect_keyword(Keyword::UPDATE)
        .ok_or_else(|| unsupported("expected UPDATE"))?;
    parser.skip_whitespace();
    let table = parser
        .parse_object_name()
        .ok_or_else(|| unsupported("expected table name"))?;

    let set_index = parser
        .find_top_level_keyword(Keyword::SET)
        .ok_or_else(|| unsupported("expected SET"))?;
    // Everything up to and including SET is kept, so table hints and join
    // syntax survive even though only the first name is resolved. Whitespace
    // is collapsed to one line.
    let prefix = parser
        .tokens_to_string(0, set_index + 1)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    parser.set_pos(set_index + 1);

    let mut assignments = Vec::new();
    loop {
        parser.skip_whitespace();
        let column_ref = parser
            .parse_object_name()
            .ok_or_else(|| unsupported("expected assignment target"))?;
        parser.skip_whitespace();
        parser
            .expect_token(&Token::Eq)
            .ok_or_else(|| unsupported("expected = in assignment"))?;
        let value = parser
            .parse_scanned_value(&[Keyword::WHERE])
            .ok_or_else(|| unsupported("empty assignment value"))?;

        let column = column_ref.rsplit('.').next().unwrap_or(&column_ref);
        let rendered = if is_boolean_target(&table, column, context) {
            match value.as_boolean() {
                Some(flag) => context.profile.dialect.format_boolean(flag).to_string(),
                None => value.text,
            }
        } else {
            value.text
        };
        assignments.push(format!("{column_ref} = {rendered}"));

        if parser.expect_token(&Token::Comma).is_some() {
            continue;
        }
        break;
    }

    let suffix = parser.tokens_to_string(parser.pos(), parser.tokens().len());
    let suffix = suffix.trim();

    let mut sql = format!("{prefix} {}", assignments.join(", "));
    if !suffix.is_empty() {
        sql.push(' ');
        sql.push_str(suffix);
    }
    Ok(sql)
}

fn is_boolean_target(table: &str, column: &str, context: &ConversionContext) -> bool {
    if !context.profile.normalize_boolean_literals {
        return false;
    }
    if context.booleans.is_boolean_column(Some(table), column) {
        return true;
    }
    context
        .metadata
        .find(table)
        .and_then(|t| t.column(column))
        .is_some_and(ColumnInfo::is_boolean_like)
}

fn unsupported(message: &str) -> ConvertError {
    ConvertError::UnsupportedStatement {
        message: message.to_string(),
    }
}
