//! Safe SQL identifier handling.
//!
//! Table and column names are the only caller-supplied text that ever lands in
//! SQL verbatim, so each one goes through [`Ident`] first.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts (`"..."` or `` `...` ``) allow any characters except NUL;
//!   the quote character is escaped by doubling it
//!
//! Rendering re-quotes quoted parts for the target [`Dialect`].
//!
//! # Example
//! ```ignore
//! use dbkit::{Dialect, Ident};
//!
//! let t = Ident::parse("shop.users")?;
//! assert_eq!(t.to_sql(Dialect::MySql), "shop.users");
//! # Ok::<(), dbkit::DbError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

impl IdentPart {
    /// The part's name without quotes or escapes.
    pub fn as_str(&self) -> &str {
        match self {
            IdentPart::Unquoted(s) | IdentPart::Quoted(s) => s,
        }
    }

    /// The name as the server stores it in its catalog.
    ///
    /// Postgres folds unquoted names to lower case; quoted names and every
    /// MySQL name are kept as written.
    pub fn catalog_name(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (IdentPart::Unquoted(s), Dialect::Postgres) => s.to_ascii_lowercase(),
            _ => self.as_str().to_string(),
        }
    }
}

/// A SQL identifier (column, table, or schema-qualified table name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table`
    /// - Quoted: `"CamelCase"` or `` `order` ``
    /// - Mixed: `shop."UserTable"`
    pub fn parse(s: &str) -> DbResult<Self> {
        if s.is_empty() {
            return Err(DbError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(DbError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(DbError::validation("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(DbError::validation(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if let Some(&quote) = chars.peek().filter(|c| **c == '"' || **c == '`') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => {
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                name.push(quote);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => return Err(DbError::validation("Unclosed quoted identifier")),
                    }
                }
                if name.is_empty() {
                    return Err(DbError::validation("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let ok = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !ok {
                    return Err(DbError::validation(format!(
                        "Invalid character in identifier '{s}': '{c}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(DbError::validation("Empty identifier segment"));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(DbError::validation("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// The last part: the table or column name itself.
    pub fn name(&self) -> &str {
        self.parts.last().map(IdentPart::as_str).unwrap_or_default()
    }

    /// The qualifier directly before [`Ident::name`], if any.
    pub fn schema(&self) -> Option<&str> {
        self.schema_part().map(IdentPart::as_str)
    }

    pub fn name_part(&self) -> Option<&IdentPart> {
        self.parts.last()
    }

    pub fn schema_part(&self) -> Option<&IdentPart> {
        let n = self.parts.len();
        (n >= 2).then(|| &self.parts[n - 2])
    }

    /// Render the identifier as SQL for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, dialect);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String, dialect: Dialect) {
        let quote = dialect.quote_char();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) => out.push_str(s),
                IdentPart::Quoted(s) => {
                    out.push(quote);
                    for ch in s.chars() {
                        if ch == quote {
                            out.push(quote);
                        }
                        out.push(ch);
                    }
                    out.push(quote);
                }
            }
        }
    }
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> DbResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> DbResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> DbResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> DbResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for &String {
    fn into_ident(self) -> DbResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> DbResult<Ident> {
        Ident::parse(&self)
    }
}
