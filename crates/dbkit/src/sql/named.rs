use super::statement::{Params, Statement, StatementKind};
use crate::columns::Columns;
use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::value::Value;
use std::ops::Range;

/// A `:name` placeholder found in SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    name: String,
    span: Range<usize>,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Whether a backslash escapes the next character in the `'...'` literal
/// opening at `start`. MySQL always honours backslash escapes; Postgres only
/// inside `E'...'` strings.
fn backslash_escapes(dialect: Dialect, bytes: &[u8], start: usize) -> bool {
    match dialect {
        Dialect::MySql => true,
        Dialect::Postgres => {
            start > 0
                && matches!(bytes[start - 1], b'E' | b'e')
                && (start < 2 || !is_word_byte(bytes[start - 2]))
        }
    }
}

/// Find `:name` placeholders outside string literals, quoted identifiers and
/// comments. `::` (Postgres casts) is not a placeholder.
fn scan_placeholders(dialect: Dialect, sql: &str) -> Vec<Placeholder> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                let escapes = quote == b'\'' && backslash_escapes(dialect, bytes, i);
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' && escapes {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes
                .get(i + 1)
                .is_some_and(|c| c.is_ascii_alphabetic() || *c == b'_') =>
            {
                let start = i;
                i += 1;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                found.push(Placeholder {
                    name: sql[start + 1..i].to_string(),
                    span: start..i,
                });
            }
            _ => i += 1,
        }
    }
    found
}

/// Bind caller SQL written with `:name` placeholders against `params`.
///
/// Every placeholder needs a value and every value must be referenced. Keys
/// may be given with or without the leading `:`. For numbered dialects the
/// placeholders are rewritten to `$n`, reusing the same number for repeated
/// names.
pub fn bind_named(dialect: Dialect, sql: &str, params: &Columns) -> DbResult<Statement> {
    let placeholders = scan_placeholders(dialect, sql);
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k.strip_prefix(':').unwrap_or(*k) == name)
            .map(|(_, v)| v.clone())
    };

    let mut bound: Vec<(String, Value)> = Vec::new();
    let mut slots = Vec::with_capacity(placeholders.len());
    for p in &placeholders {
        let idx = match bound.iter().position(|(n, _)| *n == p.name) {
            Some(idx) => idx,
            None => {
                let value = lookup(&p.name).ok_or_else(|| {
                    DbError::validation(format!("no value bound for placeholder :{}", p.name))
                })?;
                bound.push((p.name.clone(), value));
                bound.len() - 1
            }
        };
        slots.push(idx);
    }

    if let Some(unused) = params
        .names()
        .map(|k| k.strip_prefix(':').unwrap_or(k))
        .find(|k| !bound.iter().any(|(n, _)| n == k))
    {
        return Err(DbError::validation(format!(
            "parameter :{unused} is not referenced by the statement"
        )));
    }

    let text = if dialect.numbered_placeholders() {
        let mut out = String::with_capacity(sql.len());
        let mut last = 0;
        for (p, idx) in placeholders.iter().zip(&slots) {
            out.push_str(&sql[last..p.span.start]);
            out.push('$');
            out.push_str(&(idx + 1).to_string());
            last = p.span.end;
        }
        out.push_str(&sql[last..]);
        out
    } else {
        sql.to_string()
    };

    Ok(Statement {
        kind: StatementKind::from_sql(sql),
        sql: text,
        params: Params::Named(bound),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(sql: &str) -> Vec<String> {
        names_in(Dialect::MySql, sql)
    }

    fn names_in(dialect: Dialect, sql: &str) -> Vec<String> {
        scan_placeholders(dialect, sql)
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn scan_skips_literals_comments_and_casts() {
        assert_eq!(
            names("SELECT ':no', \"a:b\", `c:d` FROM t WHERE x = :x AND y::text = :y_2"),
            ["x", "y_2"]
        );
        assert_eq!(names("SELECT 1 -- :gone\nWHERE a = :a /* :b */"), ["a"]);
        assert_eq!(names(r"SELECT 'it\'s :not' WHERE a = :a"), ["a"]);
        assert!(names("SELECT 1:2").is_empty());
    }

    #[test]
    fn postgres_backslash_is_literal_outside_escape_strings() {
        assert_eq!(
            names_in(Dialect::Postgres, r"SELECT 'C:\' AS p WHERE 1 = :id"),
            ["id"]
        );
        assert_eq!(
            names_in(Dialect::Postgres, r"SELECT E'it\'s :not' WHERE a = :a"),
            ["a"]
        );
        assert_eq!(
            names_in(Dialect::Postgres, r"SELECT type'x\' WHERE a = :a"),
            ["a"]
        );
    }

    #[test]
    fn postgres_binds_after_trailing_backslash_literal() {
        let params = Columns::new().with("id", 1);
        let stmt = bind_named(
            Dialect::Postgres,
            r"SELECT 'C:\' AS p WHERE 1 = :id",
            &params,
        )
        .unwrap();
        assert_eq!(stmt.sql(), r"SELECT 'C:\' AS p WHERE 1 = $1");
    }

    #[test]
    fn mysql_keeps_text_and_orders_params() {
        let params = Columns::new().with("name", "Ada").with(":id", 1);
        let stmt = bind_named(
            Dialect::MySql,
            "SELECT * FROM users WHERE id = :id AND name = :name",
            &params,
        )
        .unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM users WHERE id = :id AND name = :name");
        assert_eq!(stmt.kind(), StatementKind::Select);
        assert_eq!(
            stmt.params(),
            &Params::Named(vec![
                ("id".to_string(), 1.into()),
                ("name".to_string(), "Ada".into()),
            ])
        );
    }

    #[test]
    fn postgres_numbers_placeholders_and_reuses_repeats() {
        let params = Columns::new().with("a", 1).with("b", 2);
        let stmt = bind_named(
            Dialect::Postgres,
            "SELECT :a + :b + :a, 'x:y'::text",
            &params,
        )
        .unwrap();
        assert_eq!(stmt.sql(), "SELECT $1 + $2 + $1, 'x:y'::text");
        assert_eq!(stmt.params().len(), 2);
    }

    #[test]
    fn missing_and_unused_params_are_rejected() {
        let empty = Columns::new();
        assert!(bind_named(Dialect::MySql, "SELECT :a", &empty).is_err());

        let extra = Columns::new().with("a", 1).with("b", 2);
        let err = bind_named(Dialect::MySql, "SELECT :a", &extra).unwrap_err();
        assert!(err.to_string().contains(":b"));
    }
}
