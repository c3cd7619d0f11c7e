//! Statement conversion pipeline.
//!
//! The driver splits the script, parses each statement with sqlparser's
//! MySQL dialect and dispatches on the statement kind. A statement that
//! cannot be parsed goes through the raw-text fallback handlers; a statement
//! that cannot be converted is emitted verbatim with a diagnostic. Nothing
//! is ever dropped, and output order matches input order.

pub mod alter_table;
pub mod create_table;
pub mod fallback;
pub mod generated;
pub mod insert;
pub mod update;

use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use crate::booleans::BooleanColumnRegistry;
use crate::dialect::DialectProfile;
use crate::metadata::SchemaMetadata;
use crate::splitter::split_statements;

static BINARY_INTRODUCER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)_binary\s*(x'|'|0x)").unwrap());
static UTF8MB4_INTRODUCER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)_utf8mb4\s*(')").unwrap());
static DATETIME_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdatetime\b").unwrap());

/// State threaded through a whole conversion run.
pub struct ConversionContext {
    pub profile: DialectProfile,
    pub metadata: SchemaMetadata,
    pub booleans: BooleanColumnRegistry,
    pub diagnostics: Vec<String>,
}

impl ConversionContext {
    pub fn new(profile: DialectProfile) -> Self {
        Self {
            profile,
            metadata: SchemaMetadata::new(),
            booleans: BooleanColumnRegistry::builtin(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_booleans(profile: DialectProfile, booleans: BooleanColumnRegistry) -> Self {
        Self {
            booleans,
            ..Self::new(profile)
        }
    }

    pub fn diag(&mut self, message: String) {
        self.diagnostics.push(message);
    }
}

/// Accumulates converted SQL in statement order.
#[derive(Default)]
pub struct ConversionResult {
    buffer: String,
}

impl ConversionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one statement, adding the terminating semicolon and a
    /// trailing newline when missing. Blank input is ignored.
    pub fn append_statement(&mut self, sql: &str) {
        let trimmed = sql.trim_end();
        if trimmed.is_empty() {
            return;
        }
        self.buffer.push_str(trimmed);
        if !trimmed.ends_with(';') {
            self.buffer.push(';');
        }
        self.buffer.push('\n');
    }

    /// Append pre-formatted text as is.
    pub fn append_raw(&mut self, raw: &str) {
        self.buffer.push_str(raw);
    }

    /// Append a pre-formatted block, guaranteeing it ends with a newline.
    pub fn append_block(&mut self, sql: &str) {
        self.buffer.push_str(sql);
        if !sql.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    pub fn as_sql(&self) -> &str {
        &self.buffer
    }

    pub fn into_sql(self) -> String {
        self.buffer
    }
}

/// Everything a caller needs to know about a finished run.
pub struct ConversionOutcome {
    pub sql: String,
    pub statement_count: usize,
    pub diagnostics: Vec<String>,
}

/// Convert a whole MySQL script for the given target dialect.
pub fn convert_script(script: &str, profile: DialectProfile) -> ConversionOutcome {
    let mut context = ConversionContext::new(profile);
    convert_script_with_context(script, &mut context)
}

/// Same as [`convert_script`] but with caller-supplied context, so custom
/// boolean rules can be injected.
pub fn convert_script_with_context(
    script: &str,
    context: &mut ConversionContext,
) -> ConversionOutcome {
    // MySQL dumps backtick-quote nearly every identifier. Stripping them up
    // front keeps every later stage (parser, regexes, name lookups) working
    // on plain names.
    let script = script.replace('`', "");
    let statements = split_statements(&script);

    let mut result = ConversionResult::new();
    for raw in &statements {
        convert_statement(raw, context, &mut result);
    }

    ConversionOutcome {
        sql: result.into_sql(),
        statement_count: statements.len(),
        diagnostics: std::mem::take(&mut context.diagnostics),
    }
}

fn convert_statement(raw: &str, context: &mut ConversionContext, result: &mut ConversionResult) {
    let cleaned = preprocess(raw);
    match Parser::parse_sql(&MySqlDialect {}, &cleaned) {
        Ok(parsed) if !parsed.is_empty() => {
            for statement in &parsed {
                dispatch(statement, &cleaned, context, result);
            }
        }
        Ok(_) => result.append_statement(&cleaned),
        Err(err) => {
            if fallback::try_handle(&cleaned, context, result) {
                return;
            }
            context.diag(format!(
                "parse failed, kept verbatim: {} ({err})",
                abbreviate(raw)
            ));
            result.append_statement(&cleaned);
        }
    }
}

fn dispatch(
    statement: &Statement,
    raw: &str,
    context: &mut ConversionContext,
    result: &mut ConversionResult,
) {
    let outcome = match statement {
        Statement::CreateTable(create) => create_table::process(create, raw, context, result),
        Statement::AlterTable {
            name, operations, ..
        } => alter_table::process(name, operations, raw, context, result),
        Statement::Insert(_) => insert::process(raw, context, result),
        Statement::Update { .. } => update::process(raw, context, result),
        Statement::Delete(_) => {
            result.append_statement(&strip_charset_introducers(raw));
            Ok(())
        }
        Statement::Drop { .. } | Statement::CreateIndex(_) => {
            result.append_statement(raw);
            Ok(())
        }
        _ => {
            context.diag(format!(
                "statement kind not handled, kept verbatim: {}",
                abbreviate(raw)
            ));
            result.append_statement(raw);
            Ok(())
        }
    };

    if let Err(err) = outcome {
        context.diag(format!(
            "conversion failed, kept verbatim: {} ({err})",
            abbreviate(raw)
        ));
        result.append_statement(raw);
    }
}

/// Strip MySQL literal introducers the target never accepts.
fn preprocess(sql: &str) -> String {
    let sql = BINARY_INTRODUCER.replace_all(sql, "${1}");
    UTF8MB4_INTRODUCER.replace_all(&sql, "${1}").into_owned()
}

/// `_utf8mb4'...'` to a plain string literal, for passthrough paths that
/// skip [`preprocess`]-level rewriting.
pub(crate) fn strip_charset_introducers(sql: &str) -> String {
    UTF8MB4_INTRODUCER.replace_all(sql, "${1}").into_owned()
}

/// Word-bounded `datetime` to `timestamp`, used where MySQL DDL is kept
/// mostly intact.
pub(crate) fn replace_datetime(sql: &str) -> String {
    DATETIME_WORD.replace_all(sql, "timestamp").into_owned()
}

/// Single-line preview of a statement for diagnostics, capped at 120 chars.
pub(crate) fn abbreviate(sql: &str) -> String {
    let single_line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= 120 {
        return single_line;
    }
    let head: String = single_line.chars().take(117).collect();
    format!("{head}...")
}
