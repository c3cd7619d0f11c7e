//! Registry of columns that must be converted to `boolean` regardless of
//! their declared MySQL type.
//!
//! The source dumps declare flags as `tinyint`, `int` or `bit` with numeric
//! defaults. Some of those can be recognized from the type alone
//! (see [`crate::metadata::ColumnInfo::is_boolean_like`]); the rest are known
//! only by name, either globally or per table. The registry holds the
//! name-based rules and is injected into the conversion context, so callers
//! can extend or replace the built-in list.

use std::collections::{HashMap, HashSet};

/// Name-based boolean column rules: a global column allowlist plus
/// table-specific entries.
#[derive(Debug, Clone, Default)]
pub struct BooleanColumnRegistry {
    global_columns: HashSet<String>,
    table_columns: HashMap<String, HashSet<String>>,
}

impl BooleanColumnRegistry {
    /// Empty registry with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the rules for the supported business schema
    /// (system service, workflow engine and BPM tables).
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.add_global_column("is_force_update_password");

        for (table, column) in [
            ("sys_user", "is_force_update_password"),
            ("act_hi_caseactinst", "required_"),
            ("act_hi_detail", "initial_"),
            ("act_ge_bytearray", "generated_"),
            ("act_re_procdef", "has_start_form_key_"),
            ("act_re_procdef", "startable_"),
            ("act_ru_case_execution", "required_"),
            ("act_ru_case_sentry_part", "satisfied_"),
            ("act_ru_execution", "is_active_"),
            ("act_ru_execution", "is_concurrent_"),
            ("act_ru_execution", "is_scope_"),
            ("act_ru_execution", "is_event_scope_"),
            ("act_ru_job", "exclusive_"),
            ("act_ru_variable", "is_concurrent_local_"),
            ("bpm_de_model", "status"),
            ("bpm_de_model", "global_mark"),
            ("bpm_de_model", "batch_support"),
            ("bpm_de_model", "application_advice_support"),
            ("bpm_de_model", "applicant_assign_support"),
            ("bpm_event", "global_mark"),
            ("bpm_event", "global_trigger_mark"),
            ("bpm_proc_button", "global_mark"),
            ("bpm_proc_button", "custom_mark"),
            ("bpm_proc_button", "message_required"),
            ("bpm_proc_button", "edited"),
            ("bpm_proc_button", "selected"),
            ("bpm_proc_def", "approve_batch"),
            ("bpm_proc_def", "global_mark"),
            ("bpm_proc_def", "enable"),
            ("bpm_proc_def", "batch_support"),
            ("bpm_proc_def", "application_advice_support"),
            ("bpm_proc_def", "applicant_assign_support"),
            ("bpm_re_node", "can_save"),
            ("bpm_re_node", "feedback_rule"),
            ("bpm_re_node", "revoke_rule_next_todo"),
            ("bpm_re_node", "revoke_rule_permit_preemption"),
            ("bpm_re_node", "rejected_permit_direct_send"),
            ("bpm_re_node", "signature_rule_permit_assigned"),
            ("bpm_re_node", "cc_rule_permit_assigned"),
            ("bpm_re_node", "cc_assigned_required"),
            ("bpm_re_node", "cc_assigned_scoped"),
            ("bpm_re_node", "empty_approve_skip_rule"),
            ("bpm_re_node", "same_approve_skip_rule"),
            ("bpm_re_node", "multi_reject"),
            ("bpm_re_node", "enable_signature"),
        ] {
            registry.add_table_column(table, column);
        }

        registry
    }

    /// Register a column name that is boolean in every table.
    pub fn add_global_column(&mut self, column: &str) {
        self.global_columns.insert(normalize(column));
    }

    /// Register a column that is boolean in one specific table.
    pub fn add_table_column(&mut self, table: &str, column: &str) {
        self.table_columns
            .entry(normalize(table))
            .or_default()
            .insert(normalize(column));
    }

    /// Whether `column` must become boolean.
    ///
    /// Table-specific rules are consulted first, matching both the full
    /// (possibly schema-qualified) table name and its unqualified form, then
    /// the global allowlist. Names are compared after stripping quoting
    /// characters, trimming and lowercasing.
    pub fn is_boolean_column(&self, table: Option<&str>, column: &str) -> bool {
        let column = normalize(column);
        if column.is_empty() {
            return false;
        }
        if let Some(table) = table {
            let table = normalize(table);
            if self.table_contains(&table, &column) {
                return true;
            }
            if let Some(simple) = table.rsplit('.').next() {
                if simple != table && self.table_contains(simple, &column) {
                    return true;
                }
            }
        }
        self.global_columns.contains(&column)
    }

    fn table_contains(&self, table: &str, column: &str) -> bool {
        self.table_columns
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }
}

fn normalize(name: &str) -> String {
    name.replace(['"', '`'], "").trim().to_lowercase()
}
