//! Statement-by-statement schema migration.
//!
//! The schema script is split into statements and executed in file order, one
//! at a time, since later tables reference earlier ones. Objects that already
//! exist are skipped, which makes re-running the script safe.

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use barberpro_backend::{BackendError, RetryPolicy, SqlExecutor};

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(
        "the exec_sql function is not installed on the backend. Create it once in the SQL editor \
         (see the top of sql/schema.sql), or pass --database-url to migrate over a direct connection"
    )]
    ExecSqlMissing,
    #[error("could not read schema file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Keep going after a failing statement.
    pub force: bool,
    pub retry: RetryPolicy,
}

#[derive(Debug)]
pub struct FailedStatement {
    /// 1-based position in the script.
    pub position: usize,
    pub preview: String,
    pub error: BackendError,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Set when a failure stopped the run before the last statement.
    pub halted: bool,
    pub failures: Vec<FailedStatement>,
}

impl MigrationReport {
    pub fn succeeded(&self) -> bool {
        self.errors == 0
    }
}

/// Quoting state carried from one line to the next.
#[derive(Debug, Default)]
struct Scanner {
    dollar_tag: Option<String>,
    in_string: bool,
}

impl Scanner {
    fn in_literal(&self) -> bool {
        self.dollar_tag.is_some() || self.in_string
    }

    /// Returns `line` without a trailing `--` comment, updating quoting state.
    fn code<'a>(&mut self, line: &'a str) -> &'a str {
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if let Some(tag) = &self.dollar_tag {
                if bytes[i..].starts_with(tag.as_bytes()) {
                    i += tag.len();
                    self.dollar_tag = None;
                } else {
                    i += 1;
                }
                continue;
            }
            match bytes[i] {
                b'\'' => self.in_string = !self.in_string,
                b'-' if !self.in_string && bytes.get(i + 1) == Some(&b'-') => return &line[..i],
                b'$' if !self.in_string => {
                    if let Some(len) = dollar_tag_len(&bytes[i..]) {
                        self.dollar_tag = Some(line[i..i + len].to_string());
                        i += len;
                        continue;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        line
    }
}

/// Length of a `$tag$` opener at the start of `bytes`, if there is one.
fn dollar_tag_len(bytes: &[u8]) -> Option<usize> {
    let close = bytes[1..].iter().position(|&b| b == b'$')?;
    let tag = &bytes[1..1 + close];
    let valid = tag
        .iter()
        .enumerate()
        .all(|(i, &b)| b == b'_' || b.is_ascii_alphabetic() || (i > 0 && b.is_ascii_digit()));
    valid.then_some(close + 2)
}

/// Splits a SQL script into statements.
///
/// A statement ends on a line whose code ends with `;`. Blank lines and `--`
/// comments are dropped, except inside string literals and dollar-quoted
/// bodies, which are kept whole. The terminating `;` is removed. A final
/// statement without `;` is kept.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut scanner = Scanner::default();
    let mut statements = Vec::new();
    let mut current = String::new();

    let mut finish = |current: &mut String| {
        let statement = current.trim().trim_end_matches(';').trim_end();
        if !statement.is_empty() {
            statements.push(statement.to_string());
        }
        current.clear();
    };

    for line in sql.lines() {
        let continues_literal = scanner.in_literal();
        let code = scanner.code(line).trim_end();
        if !continues_literal && code.trim().is_empty() {
            continue;
        }

        current.push_str(code);
        current.push('\n');

        if !scanner.in_literal() && code.ends_with(';') {
            finish(&mut current);
        }
    }
    finish(&mut current);

    statements
}

fn preview(statement: &str) -> String {
    let first_line = statement.lines().next().unwrap_or_default();
    if first_line.chars().count() > 60 {
        format!("{}...", first_line.chars().take(60).collect::<String>())
    } else {
        first_line.to_string()
    }
}

/// Executes `statements` in order.
///
/// Already-existing objects count as skipped. Any other failure is recorded
/// and stops the run unless `options.force` is set. A missing `exec_sql`
/// function aborts immediately since no statement could succeed.
#[instrument(skip_all, fields(executor = executor.describe(), statements = statements.len()))]
pub async fn apply_migration<E>(
    executor: &E,
    statements: &[String],
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError>
where
    E: SqlExecutor + ?Sized,
{
    let mut report = MigrationReport::default();

    for (index, statement) in statements.iter().enumerate() {
        let position = index + 1;
        let result = options
            .retry
            .run("execute statement", || executor.execute_sql(statement))
            .await;

        match result {
            Ok(()) => {
                report.applied += 1;
                debug!(position, statement = %preview(statement), "applied");
            }
            Err(err) if err.is_already_exists() => {
                report.skipped += 1;
                debug!(position, statement = %preview(statement), "already exists, skipped");
            }
            Err(err) if err.is_missing_function() => {
                error!(error = %err, "exec_sql function missing");
                return Err(MigrateError::ExecSqlMissing);
            }
            Err(err) => {
                report.errors += 1;
                error!(position, statement = %preview(statement), error = %err, "statement failed");
                report.failures.push(FailedStatement {
                    position,
                    preview: preview(statement),
                    error: err,
                });
                if !options.force {
                    report.halted = position < statements.len();
                    if report.halted {
                        warn!("stopping migration; re-run with --force to continue past errors");
                    }
                    break;
                }
            }
        }
    }

    info!(
        applied = report.applied,
        skipped = report.skipped,
        errors = report.errors,
        "migration finished"
    );
    Ok(report)
}

/// Loads the script from `path`, or the bundled schema when `None`.
pub fn load_script(path: Option<&str>) -> Result<String, MigrateError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| MigrateError::Read {
            path: path.to_string(),
            source,
        }),
        None => Ok(crate::BUNDLED_SCHEMA.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_statements_around_comments_and_blank_lines() {
        let sql = "\
-- profiles
CREATE TABLE profiles (
  id UUID PRIMARY KEY, -- auth id
  email TEXT NOT NULL
);

-- shops
CREATE TABLE barbershops (id UUID PRIMARY KEY);
   -- indented comment

CREATE INDEX idx_profiles_email ON profiles(email);
";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0],
            "CREATE TABLE profiles (\n  id UUID PRIMARY KEY,\n  email TEXT NOT NULL\n)"
        );
        assert_eq!(statements[1], "CREATE TABLE barbershops (id UUID PRIMARY KEY)");
        assert!(statements[2].starts_with("CREATE INDEX"));
    }

    #[test]
    fn test_keeps_dollar_quoted_bodies_whole() {
        let sql = "\
CREATE OR REPLACE FUNCTION exec_sql(sql text) RETURNS void AS $$
BEGIN
  -- runs arbitrary statements
  EXECUTE sql;
END;
$$ LANGUAGE plpgsql;
SELECT 1;
";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("-- runs arbitrary statements"));
        assert!(statements[0].contains("EXECUTE sql;"));
        assert!(statements[0].ends_with("$$ LANGUAGE plpgsql"));
        assert_eq!(statements[1], "SELECT 1");
    }

    #[test]
    fn test_named_dollar_tags_and_strings() {
        let sql = "\
DO $body$ BEGIN RAISE NOTICE 'a;'; END $body$;
INSERT INTO services (name, description) VALUES ('Corte', 'Corte -- clássico');
";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "DO $body$ BEGIN RAISE NOTICE 'a;'; END $body$");
        assert!(statements[1].ends_with("'Corte -- clássico')"));
    }

    #[test]
    fn test_keeps_trailing_statement_without_semicolon() {
        let statements = split_statements("SELECT 1;\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1".to_string(), "SELECT 2".to_string()]);
    }

    #[test]
    fn test_empty_script() {
        assert!(split_statements("\n-- nothing here\n\n").is_empty());
    }

    #[test]
    fn test_preview_truncates_long_lines() {
        let long = format!("CREATE TABLE {}", "x".repeat(100));
        assert!(preview(&long).ends_with("..."));
        assert_eq!(preview("SELECT 1\nFROM t"), "SELECT 1");
    }

    #[test]
    fn test_bundled_schema_splits_into_statements() {
        let statements = split_statements(crate::BUNDLED_SCHEMA);
        for table in barberpro_models::Table::ALL {
            let needle = format!("CREATE TABLE IF NOT EXISTS public.{table}");
            assert!(
                statements.iter().any(|s| s.starts_with(&needle)),
                "missing {needle}"
            );
        }
    }
}
