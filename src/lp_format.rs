//! Writer for the CPLEX-style .lp file format.
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::ExportError;
use crate::export::ExportContext;
use crate::model::{Constraint, Sense};

/// Writes the whole .lp document. Nothing escapes the call on error.
pub(crate) fn write_lp(ctx: &ExportContext) -> Result<String, ExportError> {
    let mut out = String::new();
    ctx.append_comments("\\", &mut out)?;
    out.push('\n');
    write_objective_block(ctx, &mut out)?;
    write_constraints_block(ctx, &mut out)?;
    let used = used_variables(ctx);
    write_bounds_block(ctx, &used, &mut out)?;
    write_integer_blocks(ctx, &used, &mut out)?;
    write!(out, "\nEnd\n")?;
    Ok(out)
}

fn write_objective_block(ctx: &ExportContext, out: &mut String) -> Result<(), ExportError> {
    let objective = &ctx.model.objective;
    let obj_type = match objective.sense {
        Sense::Maximize => "Maximize\n  obj: ",
        Sense::Minimize => "Minimize\n  obj: ",
    };
    out.push_str(obj_type);
    let wrote_term = write_lp_expression(ctx, &objective.coefficients, out)?;
    if objective.offset != 0.0 {
        if !wrote_term {
            write!(out, "{}", objective.offset)?;
        } else if objective.offset < 0.0 {
            write!(out, " - {}", -objective.offset)?;
        } else {
            write!(out, " + {}", objective.offset)?;
        }
    } else if !wrote_term {
        out.push('0');
    }
    Ok(())
}

fn write_constraints_block(ctx: &ExportContext, out: &mut String) -> Result<(), ExportError> {
    let mut wrote_header = false;
    for (index, constraint) in ctx.model.constraints.iter().enumerate() {
        let lb = constraint.lower_bound;
        let ub = constraint.upper_bound;
        if !lb.is_finite() && !ub.is_finite() {
            // No .lp syntax for a free row; the header comment discloses this.
            continue;
        }
        if !wrote_header {
            write!(out, "\n\nSubject To\n")?;
            wrote_header = true;
        }
        let name = &ctx.constraint_names[index];
        if lb == ub {
            write_constraint_row(ctx, constraint, name, "=", lb, out)?;
        } else if constraint.is_range() {
            // The native range syntax is fragile across readers, so a
            // double-bounded row becomes two inequality rows.
            write_constraint_row(ctx, constraint, &format!("{}_lhs", name), ">=", lb, out)?;
            write_constraint_row(ctx, constraint, &format!("{}_rhs", name), "<=", ub, out)?;
        } else if lb.is_finite() {
            write_constraint_row(ctx, constraint, name, ">=", lb, out)?;
        } else {
            write_constraint_row(ctx, constraint, name, "<=", ub, out)?;
        }
    }
    Ok(())
}

fn write_constraint_row(
    ctx: &ExportContext,
    constraint: &Constraint,
    name: &str,
    operator: &str,
    rhs: f64,
    out: &mut String,
) -> Result<(), ExportError> {
    write!(out, "  {}: ", name)?;
    if !write_lp_expression(ctx, &constraint.coefficients, out)? {
        out.push('0');
    }
    writeln!(out, " {} {}", operator, rhs)?;
    Ok(())
}

/// Writes a sum of `coefficient * name` terms. Returns whether anything was
/// written (all-zero expressions produce no output).
fn write_lp_expression(
    ctx: &ExportContext,
    coefficients: &BTreeMap<usize, f64>,
    out: &mut String,
) -> Result<bool, ExportError> {
    let mut wrote_term = false;
    for (&index, &coefficient) in coefficients {
        if coefficient == 0.0 {
            continue;
        }
        write_lp_term(ctx, index, coefficient, !wrote_term, out)?;
        wrote_term = true;
    }
    Ok(wrote_term)
}

/// Writes one term. A unit coefficient renders as the bare variable name,
/// and negative coefficients carry their own minus so the output never
/// contains "+ -".
fn write_lp_term(
    ctx: &ExportContext,
    index: usize,
    coefficient: f64,
    first: bool,
    out: &mut String,
) -> Result<(), ExportError> {
    let name = ctx
        .variable_names
        .get(index)
        .ok_or(ExportError::VariableIndexOutOfRange {
            index,
            count: ctx.model.variables.len(),
        })?;
    if first {
        if coefficient < 0.0 {
            out.push('-');
        }
    } else if coefficient < 0.0 {
        out.push_str(" - ");
    } else {
        out.push_str(" + ");
    }
    let magnitude = coefficient.abs();
    if magnitude != 1.0 {
        write!(out, "{} ", magnitude)?;
    }
    out.push_str(name);
    Ok(())
}

/// Which variables appear with a nonzero coefficient in the objective or a
/// constraint. Variables appearing in no expression are left out of the
/// file entirely, as the header comment discloses.
fn used_variables(ctx: &ExportContext) -> Vec<bool> {
    let mut used = vec![false; ctx.model.variables.len()];
    let expressions = std::iter::once(&ctx.model.objective.coefficients)
        .chain(ctx.model.constraints.iter().map(|c| &c.coefficients));
    for coefficients in expressions {
        for (&index, &coefficient) in coefficients {
            if coefficient != 0.0 {
                if let Some(slot) = used.get_mut(index) {
                    *slot = true;
                }
            }
        }
    }
    used
}

fn write_bounds_block(
    ctx: &ExportContext,
    used: &[bool],
    out: &mut String,
) -> Result<(), ExportError> {
    write!(out, "\nBounds\n")?;
    for (index, variable) in ctx.model.variables.iter().enumerate() {
        if !used[index] || variable.is_binary() || variable.has_default_bounds() {
            continue;
        }
        let name = &ctx.variable_names[index];
        let lb = variable.lower_bound;
        let ub = variable.upper_bound;
        if lb == ub {
            writeln!(out, "  {} = {}", name, lb)?;
        } else if lb == f64::NEG_INFINITY && ub == f64::INFINITY {
            writeln!(out, "  {} free", name)?;
        } else {
            write!(out, "  ")?;
            // "name <= ub" alone would imply the default lower bound of 0,
            // so a negative-infinite lower bound is spelled out.
            if lb != 0.0 {
                write!(out, "{} <= ", lb)?;
            }
            out.push_str(name);
            if ub < f64::INFINITY {
                write!(out, " <= {}", ub)?;
            }
            out.push('\n');
        }
    }
    Ok(())
}

fn write_integer_blocks(
    ctx: &ExportContext,
    used: &[bool],
    out: &mut String,
) -> Result<(), ExportError> {
    let mut generals = vec![];
    let mut binaries = vec![];
    for (index, variable) in ctx.model.variables.iter().enumerate() {
        if !used[index] {
            continue;
        }
        if variable.is_binary() {
            binaries.push(ctx.variable_names[index].as_str());
        } else if variable.is_integer {
            generals.push(ctx.variable_names[index].as_str());
        }
    }
    if !generals.is_empty() {
        writeln!(out, "\nGenerals")?;
        for name in generals {
            writeln!(out, "  {}", name)?;
        }
    }
    if !binaries.is_empty() {
        writeln!(out, "\nBinaries")?;
        for name in binaries {
            writeln!(out, "  {}", name)?;
        }
    }
    Ok(())
}
