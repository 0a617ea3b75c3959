use super::statement::{Params, Statement, StatementKind};
use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::ident::{Ident, IntoIdent};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindStyle {
    Named,
    Positional,
}

/// A parameter-safe SQL builder.
///
/// `SqlBuilder` keeps three kinds of input apart: trusted SQL text
/// ([`push`](SqlBuilder::push)), validated identifiers
/// ([`push_ident`](SqlBuilder::push_ident)) and values, which only ever become
/// placeholders ([`push_named`](SqlBuilder::push_named),
/// [`push_positional`](SqlBuilder::push_positional)). Placeholders are
/// rendered for the builder's [`Dialect`] as they are pushed.
#[must_use]
#[derive(Debug)]
pub struct SqlBuilder {
    dialect: Dialect,
    kind: StatementKind,
    sql: String,
    named: Vec<(String, Value)>,
    positional: Vec<Value>,
    style: Option<BindStyle>,
    mixed: bool,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect, kind: StatementKind) -> Self {
        Self {
            dialect,
            kind,
            sql: String::new(),
            named: Vec::new(),
            positional: Vec::new(),
            style: None,
            mixed: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append trusted SQL text. Never pass caller-supplied values here.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a SQL identifier after validating it.
    pub fn push_ident<I: IntoIdent>(&mut self, ident: I) -> DbResult<&mut Self> {
        let ident = ident.into_ident()?;
        Ok(self.push_ident_ref(&ident))
    }

    /// Append a pre-validated [`Ident`].
    pub fn push_ident_ref(&mut self, ident: &Ident) -> &mut Self {
        ident.write_sql(&mut self.sql, self.dialect);
        self
    }

    /// Append a comma-separated list of identifiers.
    pub fn push_ident_list<'a>(
        &mut self,
        idents: impl IntoIterator<Item = &'a Ident>,
    ) -> &mut Self {
        for (i, ident) in idents.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_ident_ref(ident);
        }
        self
    }

    /// Append a named placeholder (`:name`, or `$n` when numbered) and bind
    /// `value` to it.
    pub fn push_named(&mut self, name: &str, value: Value) -> &mut Self {
        self.note_style(BindStyle::Named);
        if self.dialect.numbered_placeholders() {
            let idx = self.named.len() + 1;
            self.sql.push('$');
            self.sql.push_str(&idx.to_string());
        } else {
            self.sql.push(':');
            self.sql.push_str(name);
        }
        self.named.push((name.to_string(), value));
        self
    }

    /// Append a positional placeholder (`?`, or `$n` when numbered) and bind
    /// `value` to it.
    pub fn push_positional(&mut self, value: Value) -> &mut Self {
        self.note_style(BindStyle::Positional);
        self.positional.push(value);
        if self.dialect.numbered_placeholders() {
            self.sql.push('$');
            self.sql.push_str(&self.positional.len().to_string());
        } else {
            self.sql.push('?');
        }
        self
    }

    /// Append `col = :col` for each entry, joined by `separator`.
    pub fn push_assignments<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a Ident, &'a Value)>,
        separator: &str,
    ) -> &mut Self {
        for (i, (ident, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.push_ident_ref(ident)
                .push(" = ")
                .push_column_bind(ident, value.clone());
        }
        self
    }

    /// Bind `value` under a placeholder named after `column`.
    ///
    /// Columns whose sanitized names collide (`` `a b` `` and `a_b`, or
    /// `t.id` and `id`) get `_2`, `_3`, ... suffixes in push order.
    pub fn push_column_bind(&mut self, column: &Ident, value: Value) -> &mut Self {
        let base = placeholder_name(column);
        let mut name = base.clone();
        let mut n = 2;
        while self.named.iter().any(|(used, _)| *used == name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        self.push_named(&name, value)
    }

    fn note_style(&mut self, style: BindStyle) {
        match self.style {
            None => self.style = Some(style),
            Some(s) if s != style => self.mixed = true,
            Some(_) => {}
        }
    }

    /// Current SQL text (placeholders already rendered).
    pub fn as_sql(&self) -> &str {
        &self.sql
    }

    /// Number of values bound so far.
    pub fn param_count(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    /// Validate and produce the final [`Statement`].
    pub fn finish(self) -> DbResult<Statement> {
        if self.mixed {
            return Err(DbError::validation(
                "a statement cannot mix named and positional parameters",
            ));
        }
        if !self.dialect.numbered_placeholders() {
            for (i, (name, _)) in self.named.iter().enumerate() {
                if self.named[..i].iter().any(|(n, _)| n == name) {
                    return Err(DbError::validation(format!(
                        "parameter :{name} is bound more than once"
                    )));
                }
            }
        }
        let params = match self.style {
            Some(BindStyle::Positional) => Params::Positional(self.positional),
            _ => Params::Named(self.named),
        };
        Ok(Statement {
            kind: self.kind,
            sql: self.sql,
            params,
        })
    }
}

/// Placeholder name for a column: its last identifier part with anything
/// outside `[A-Za-z0-9_]` replaced by `_`.
fn placeholder_name(ident: &Ident) -> String {
    ident
        .name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
