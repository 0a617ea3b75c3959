use crate::sql::Statement;
use tracing::Level;

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A `tracing`-based logger that emits each statement before it is executed.
///
/// Events use target `dbkit.sql` with `kind`, `param_count` and `sql` fields.
/// Parameter values are never logged.
///
/// Enable via the crate feature: `dbkit = { features = ["tracing"] }` (on by default).
#[derive(Debug, Clone)]
pub struct SqlTracer {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlTracer {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlTracer {
    /// Create a new tracer with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn emit(&self, stmt: &Statement) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(stmt.sql());
        emit_at_level!(
            self.level,
            target: "dbkit.sql",
            kind = ?stmt.kind(),
            param_count = stmt.params().len(),
            sql = %sql,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let tracer = SqlTracer::new().max_sql_length(10);
        assert_eq!(tracer.truncate_sql("SELECT * FROM users"), "SELECT * F...");
        assert_eq!(tracer.truncate_sql("SELECT 1"), "SELECT 1");
        assert_eq!(
            SqlTracer::new().max_sql_length(2).truncate_sql("éé"),
            "é..."
        );
        assert_eq!(SqlTracer::new().no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
    }
}
