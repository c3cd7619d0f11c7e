//! Raw-text handlers for statements sqlparser rejects.
//!
//! MySQL's `ALTER TABLE ... ADD INDEX` clause list and the stored
//! generated-column idiom both fail statement parsing, so they are
//! recognized directly on the token stream and rewritten here.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use crate::convert::{generated, ConversionContext, ConversionResult};
use crate::dialect::{Dialect, DialectProfile};
use crate::tokens::TokenParser;

struct IndexSpec {
    unique: bool,
    name: String,
    columns: Vec<String>,
}

/// Try every raw-text recognizer in turn. Returns true when one of them
/// produced output.
pub(crate) fn try_handle(
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) -> bool {
    if let Some(statements) = convert_alter_add_index(raw, &context.profile) {
        for statement in &statements {
            result.append_statement(statement);
        }
        return true;
    }
    generated::try_convert_raw(raw, context, result)
}

/// Recognize `ALTER TABLE t ADD [UNIQUE] INDEX name [USING method] (cols),
/// ...` and rewrite the whole clause list. The index method is dropped;
/// per-column DESC markers are kept.
///
/// PostgreSQL targets get one CREATE INDEX per clause. The Gauss target
/// keeps the ALTER shape but reflows it one clause per line.
pub(crate) fn convert_alter_add_index(raw: &str, profile: &DialectProfile) -> Option<Vec<String>> {
    let mut parser = TokenParser::new(raw)?;

    parser.skip_whitespace();
    parser.expect_keyword(Keyword::ALTER)?;
    parser.skip_whitespace();
    parser.expect_keyword(Keyword::TABLE)?;
    parser.skip_whitespace();
    let table = parser.parse_object_name()?;

    let mut indexes = Vec::new();
    loop {
        parser.skip_whitespace();
        parser.expect_keyword(Keyword::ADD)?;
        parser.skip_whitespace();
        let unique = parser.expect_keyword(Keyword::UNIQUE).is_some();
        parser.skip_whitespace();
        if parser.expect_keyword(Keyword::INDEX).is_none()
            && parser.expect_keyword(Keyword::KEY).is_none()
        {
            return None;
        }
        parser.skip_whitespace();
        let name = parser.parse_identifier()?;
        parser.skip_whitespace();
        if parser.expect_keyword(Keyword::USING).is_some() {
            parser.skip_whitespace();
            parser.parse_identifier()?;
            parser.skip_whitespace();
        }
        parser.expect_token(&Token::LParen)?;

        let mut columns = Vec::new();
        loop {
            parser.skip_whitespace();
            let mut column = parser.parse_identifier()?;
            parser.skip_whitespace();
            if parser.expect_keyword(Keyword::DESC).is_some() {
                column.push_str(" DESC");
                parser.skip_whitespace();
            } else if parser.expect_keyword(Keyword::ASC).is_some() {
                parser.skip_whitespace();
            }
            columns.push(column);
            if parser.expect_token(&Token::Comma).is_some() {
                continue;
            }
            parser.expect_token(&Token::RParen)?;
            break;
        }
        indexes.push(IndexSpec {
            unique,
            name,
            columns,
        });

        parser.skip_whitespace();
        if parser.expect_token(&Token::Comma).is_some() {
            continue;
        }
        break;
    }
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return None;
    }

    match profile.dialect {
        Dialect::Postgres => Some(
            indexes
                .iter()
                .map(|index| {
                    let unique = if index.unique { "UNIQUE " } else { "" };
                    format!(
                        "CREATE {unique}INDEX {} ON {table} ({});",
                        index.name,
                        index.columns.join(", ")
                    )
                })
                .collect(),
        ),
        Dialect::GaussMySql => {
            let clauses: Vec<String> = indexes
                .iter()
                .map(|index| {
                    let unique = if index.unique { "UNIQUE " } else { "" };
                    format!(
                        "    ADD {unique}INDEX {} ({})",
                        index.name,
                        index.columns.join(", ")
                    )
                })
                .collect();
            Some(vec![format!(
                "ALTER TABLE {table}\n{};",
                clauses.join(",\n")
            )])
        }
    }
}
