//! End-to-end conversion tests driving the public API with a realistic
//! MySQL dump fragment.

use std::fs;

use tempfile::TempDir;

use mysql2pg::{convert_file, convert_script, ConvertOptions, DialectProfile};

const DUMP: &str = r#"
DROP TABLE IF EXISTS `sys_user`;
CREATE TABLE `sys_user` (
  `id` bigint NOT NULL AUTO_INCREMENT COMMENT 'pk',
  `user_name` varchar(64) NOT NULL DEFAULT '' COMMENT 'login name',
  `deleted` tinyint(1) NOT NULL DEFAULT 0,
  `created_at` datetime DEFAULT CURRENT_TIMESTAMP,
  `avatar` longblob,
  `dept_id` bigint DEFAULT NULL,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_user_name` (`user_name`),
  KEY `idx_dept` (`dept_id`),
  CONSTRAINT `fk_dept` FOREIGN KEY (`dept_id`) REFERENCES `sys_dept` (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='user table';
INSERT INTO `sys_user` (`id`, `user_name`, `deleted`, `created_at`, `avatar`, `dept_id`)
VALUES (1, 'admin', 0, '2024-01-01 00:00:00', _binary 'blob', NULL),
       (2, 'guest', 1, NULL, NULL, NULL);
UPDATE `sys_user` SET `deleted` = 1 WHERE `id` = 2;
"#;

// ============================================================================
// PostgreSQL target
// ============================================================================

#[test]
fn test_postgres_full_dump() {
    let outcome = convert_script(DUMP, DialectProfile::postgres());
    let sql = &outcome.sql;

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);

    // DDL restructuring
    assert!(sql.contains("DROP TABLE IF EXISTS sys_user;"), "{sql}");
    assert!(sql.contains("id bigserial PRIMARY KEY"), "{sql}");
    assert!(sql.contains("deleted boolean NOT NULL DEFAULT FALSE"), "{sql}");
    assert!(sql.contains("created_at timestamp DEFAULT CURRENT_TIMESTAMP"), "{sql}");
    assert!(sql.contains("avatar bytea"), "{sql}");
    assert!(sql.contains("dept_id bigint NULL"), "{sql}");
    assert!(!sql.to_uppercase().contains("AUTO_INCREMENT"), "{sql}");
    assert!(!sql.contains('`'), "{sql}");

    // Comments
    assert!(sql.contains("COMMENT ON TABLE sys_user IS 'user table';"), "{sql}");
    assert!(sql.contains("COMMENT ON COLUMN sys_user.id IS 'pk';"), "{sql}");
    assert!(sql.contains("COMMENT ON COLUMN sys_user.user_name IS 'login name';"), "{sql}");

    // Indexes and foreign keys split out
    assert!(sql.contains("CREATE UNIQUE INDEX uk_user_name ON sys_user (user_name);"), "{sql}");
    assert!(sql.contains("CREATE INDEX idx_dept ON sys_user (dept_id);"), "{sql}");
    assert!(
        sql.contains(
            "ALTER TABLE sys_user\n    ADD CONSTRAINT fk_dept FOREIGN KEY (dept_id) REFERENCES sys_dept (id);"
        ),
        "{sql}"
    );

    // DML literal rewriting
    assert!(
        sql.contains("(1, 'admin', FALSE, '2024-01-01 00:00:00', convert_to('blob', 'UTF8'), NULL)"),
        "{sql}"
    );
    assert!(sql.contains("(2, 'guest', TRUE, NULL, NULL, NULL)"), "{sql}");
    assert!(sql.contains("UPDATE sys_user SET deleted = TRUE WHERE id = 2;"), "{sql}");
}

#[test]
fn test_postgres_statement_order_preserved() {
    let outcome = convert_script(DUMP, DialectProfile::postgres());
    let sql = &outcome.sql;

    let drop = sql.find("DROP TABLE").unwrap();
    let create = sql.find("CREATE TABLE sys_user").unwrap();
    let insert = sql.find("INSERT INTO sys_user").unwrap();
    let update = sql.find("UPDATE sys_user").unwrap();
    assert!(drop < create && create < insert && insert < update, "{sql}");
    assert_eq!(outcome.statement_count, 4);
}

#[test]
fn test_metadata_flows_from_ddl_to_later_dml() {
    // The INSERT has no column list; columns come from the CREATE TABLE.
    let script = "CREATE TABLE flags (id bigint PRIMARY KEY, ok tinyint(1));\n\
                  INSERT INTO flags VALUES (1, 1);";
    let outcome = convert_script(script, DialectProfile::postgres());
    assert!(
        outcome.sql.contains("INSERT INTO flags (id, ok) VALUES\n    (1, TRUE);"),
        "{}",
        outcome.sql
    );
}

#[test]
fn test_unconvertible_statement_survives_with_diagnostic() {
    let script = "CREATE TABLE nopk (v varchar(5));\nDROP TABLE nopk;";
    let outcome = convert_script(script, DialectProfile::postgres());
    assert!(outcome.sql.contains("CREATE TABLE nopk (v varchar(5));"), "{}", outcome.sql);
    assert!(outcome.sql.contains("DROP TABLE nopk;"), "{}", outcome.sql);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].contains("no primary key"), "{:?}", outcome.diagnostics);
}

// ============================================================================
// Gauss target
// ============================================================================

#[test]
fn test_gauss_full_dump_is_minimally_changed() {
    let outcome = convert_script(DUMP, DialectProfile::gauss_mysql());
    let sql = &outcome.sql;

    // MySQL DDL shape survives, with only the datetime swap and reflow.
    assert!(sql.contains("AUTO_INCREMENT"), "{sql}");
    assert!(sql.contains("tinyint(1)"), "{sql}");
    assert!(sql.contains("created_at timestamp DEFAULT CURRENT_TIMESTAMP"), "{sql}");
    assert!(!sql.to_lowercase().contains("datetime"), "{sql}");

    // Numeric flags stay numeric.
    assert!(sql.contains("(2, 'guest', 1, NULL, NULL, NULL)"), "{sql}");
    assert!(sql.contains("UPDATE sys_user SET deleted = 1 WHERE id = 2;"), "{sql}");
}

// ============================================================================
// File workflow
// ============================================================================

#[test]
fn test_convert_file_default_output_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.sql");
    fs::write(&input, "DROP TABLE IF EXISTS t;").unwrap();

    let written = convert_file(ConvertOptions {
        input_path: input,
        output_path: None,
        dialect: "postgresql".to_string(),
        verbose: false,
    })
    .unwrap();

    assert_eq!(written, dir.path().join("target.sql"));
    assert_eq!(fs::read_to_string(&written).unwrap(), "DROP TABLE IF EXISTS t;\n");
}

#[test]
fn test_convert_file_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.sql");
    let output = dir.path().join("out").with_extension("sql");
    fs::write(&input, "DROP TABLE IF EXISTS t;").unwrap();

    let written = convert_file(ConvertOptions {
        input_path: input,
        output_path: Some(output.clone()),
        dialect: "gauss-mysql".to_string(),
        verbose: false,
    })
    .unwrap();

    assert_eq!(written, output);
    assert!(output.exists());
}

#[test]
fn test_convert_file_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let result = convert_file(ConvertOptions {
        input_path: dir.path().join("absent.sql"),
        output_path: None,
        dialect: "postgresql".to_string(),
        verbose: false,
    });
    assert!(result.is_err());
}

#[test]
fn test_unrecognized_dialect_uses_standard_profile() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.sql");
    fs::write(
        &input,
        "CREATE TABLE t (id bigint PRIMARY KEY, on_off tinyint(1) DEFAULT 1);",
    )
    .unwrap();

    let written = convert_file(ConvertOptions {
        input_path: input,
        output_path: None,
        dialect: "mystery".to_string(),
        verbose: false,
    })
    .unwrap();

    let sql = fs::read_to_string(&written).unwrap();
    assert!(sql.contains("on_off boolean DEFAULT TRUE"), "{sql}");
}
