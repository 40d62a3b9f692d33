//! Human-readable rendering of terms, for logs and error messages.
//!
//! ```text
//! r.zip(r.eq_join(r.table("a"), "id", r.table("b"), index="by_id"))
//! r.filter(r.table("users"), |var_1| r.gt(r.get_field(var_1, "age"), 18))
//! ```

use crate::catalog::{self, TermCatalog};
use crate::term::Term;
use crate::term_type::TermType;
use std::fmt;

fn write_list<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Term>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_var(f: &mut fmt::Formatter<'_>, id: Option<&Term>) -> fmt::Result {
    match id.and_then(Term::as_datum) {
        Some(datum) => write!(f, "var_{}", datum.to_json()),
        None => f.write_str("var_?"),
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(datum) = self.as_datum() {
            return write!(f, "{}", datum.to_json());
        }

        match self.tag() {
            TermType::MAKE_ARRAY => {
                f.write_str("[")?;
                write_list(f, self.args())?;
                f.write_str("]")
            }
            TermType::MAKE_OBJ => {
                f.write_str("{")?;
                for (i, (key, value)) in self.optargs().into_iter().flatten().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {value}", serde_json::Value::String(key.clone()))?;
                }
                f.write_str("}")
            }
            TermType::VAR => write_var(f, self.args().first()),
            TermType::IMPLICIT_VAR => f.write_str("r.row"),
            TermType::FUNC => {
                f.write_str("|")?;
                let params = self.args().first().map(Term::args).unwrap_or_default();
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_var(f, Some(param))?;
                }
                f.write_str("| ")?;
                match self.args().get(1) {
                    Some(body) => write!(f, "{body}"),
                    None => Ok(()),
                }
            }
            tag => {
                match catalog::builtin().lookup(tag) {
                    Some(spec) => write!(f, "r.{}(", spec.method)?,
                    None => write!(f, "r.term_{}(", tag)?,
                }
                write_list(f, self.args())?;
                for (i, (key, value)) in self.optargs().into_iter().flatten().enumerate() {
                    if i > 0 || !self.args().is_empty() {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str(")")
            }
        }
    }
}
