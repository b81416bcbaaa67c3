//! CPLEX LP export with symbolic variable and constraint names.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::ModelResult;
use crate::model::{Model, Sense};

/// Render the model in CPLEX LP format.
pub fn to_lp_string(model: &Model) -> String {
    let vars = model.variables();
    let mut out = String::new();

    out.push_str("\\* energy system model *\\\n\n");
    out.push_str("Minimize\n obj:");
    if model.objective().is_empty() {
        out.push_str(" 0");
    } else {
        write_terms(&mut out, model.objective(), |i| vars[i].name.as_str());
    }
    out.push_str("\n\nSubject To\n");

    for c in model.constraints() {
        let _ = write!(out, " {}:", c.name);
        if c.terms.is_empty() {
            out.push_str(" 0");
        } else {
            write_terms(&mut out, &c.terms, |i| vars[i].name.as_str());
        }
        let op = match c.sense {
            Sense::Eq => "=",
            Sense::Le => "<=",
            Sense::Ge => ">=",
        };
        let _ = writeln!(out, " {} {}", op, c.rhs);
    }

    out.push_str("\nBounds\n");
    for v in vars {
        match v.upper {
            Some(ub) if ub == v.lower => {
                let _ = writeln!(out, " {} = {}", v.name, ub);
            }
            Some(ub) => {
                let _ = writeln!(out, " {} <= {} <= {}", v.lower, v.name, ub);
            }
            None if v.lower != 0.0 => {
                let _ = writeln!(out, " {} >= {}", v.name, v.lower);
            }
            None => {}
        }
    }

    out.push_str("\nEnd\n");
    out
}

/// Write the LP file, creating the parent directory if needed.
pub fn write_lp(model: &Model, path: &Path) -> ModelResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_lp_string(model))?;
    Ok(())
}

fn write_terms<'a>(out: &mut String, terms: &[(usize, f64)], name: impl Fn(usize) -> &'a str) {
    for &(i, coef) in terms {
        let sign = if coef < 0.0 { '-' } else { '+' };
        let _ = write!(out, " {} {} {}", sign, coef.abs(), name(i));
    }
}
