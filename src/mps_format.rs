//! Writer for the MPS file format, fixed and free layout.
use std::fmt;
use std::fmt::Write;

use crate::error::ExportError;
use crate::export::ExportContext;
use crate::model::{Constraint, Sense};

/// Name of the objective row.
const OBJECTIVE_ROW: &str = "COST";

/// Writes the whole MPS document, or fails before any output is produced
/// when the objective is a maximization: MPS encodes minimization only.
pub(crate) fn write_mps(ctx: &ExportContext, fixed: bool) -> Result<String, ExportError> {
    if ctx.model.objective.sense == Sense::Maximize {
        return Err(ExportError::MaximizationNotSupported);
    }
    let mut writer = MpsWriter {
        ctx,
        layout: LineLayout::new(fixed),
        out: String::new(),
    };
    writer.write_document()?;
    Ok(writer.out)
}

/// The sense letter of a constraint row and its effective RHS.
/// Double-bounded rows are `L` rows completed by a RANGES entry; rows with
/// no finite bound are free (`N`) rows without an RHS.
fn row_sense(constraint: &Constraint) -> (&'static str, Option<f64>) {
    let lb = constraint.lower_bound;
    let ub = constraint.upper_bound;
    match (lb.is_finite(), ub.is_finite()) {
        (true, true) if lb == ub => ("E", Some(lb)),
        (true, true) => ("L", Some(ub)),
        (true, false) => ("G", Some(lb)),
        (false, true) => ("L", Some(ub)),
        (false, false) => ("N", None),
    }
}

/// Line layout state. The MPS grammar packs at most two (name, value) pairs
/// per data line; `current_column` counts the pairs already on the open
/// line (0, 1 or 2).
struct LineLayout {
    fixed: bool,
    current_column: u8,
}

impl LineLayout {
    fn new(fixed: bool) -> Self {
        LineLayout {
            fixed,
            current_column: 0,
        }
    }

    /// The head of a line: a two-character field id and a name. Fixed
    /// layout pads both so subsequent pairs align into columns.
    fn append_line_header(&self, id: &str, name: &str, out: &mut String) -> fmt::Result {
        if self.fixed {
            write!(out, " {:<2} {:<8}", id, name)
        } else {
            write!(out, " {} {}", id, name)
        }
    }

    /// A header on a line of its own, as in the ROWS section. The name is
    /// not padded since nothing follows it.
    fn append_line_header_with_newline(
        &self,
        id: &str,
        name: &str,
        out: &mut String,
    ) -> fmt::Result {
        if self.fixed {
            writeln!(out, " {:<2} {}", id, name)
        } else {
            writeln!(out, " {} {}", id, name)
        }
    }

    /// One (name, value) pair.
    fn append_pair(&self, name: &str, value: f64, out: &mut String) -> fmt::Result {
        if self.fixed {
            write!(out, "  {:<8}  {:>12}", name, value)
        } else {
            write!(out, " {} {}", name, value)
        }
    }

    /// Appends a pair under `head`, writing the head only when starting a
    /// fresh line and breaking the line after the second pair.
    fn append_term_with_context(
        &mut self,
        head: &str,
        name: &str,
        value: f64,
        out: &mut String,
    ) -> fmt::Result {
        self.append_new_line_if_two_columns(out)?;
        if self.current_column == 0 {
            self.append_line_header("", head, out)?;
        }
        self.append_pair(name, value, out)?;
        self.current_column += 1;
        Ok(())
    }

    fn append_new_line_if_two_columns(&mut self, out: &mut String) -> fmt::Result {
        if self.current_column == 2 {
            out.push('\n');
            self.current_column = 0;
        }
        Ok(())
    }

    /// Terminates a partially filled line. Called at section boundaries and
    /// when the head name changes, so a new head never continues the
    /// previous line.
    fn finish_line(&mut self, out: &mut String) {
        if self.current_column > 0 {
            out.push('\n');
            self.current_column = 0;
        }
    }
}

struct MpsWriter<'a> {
    ctx: &'a ExportContext<'a>,
    layout: LineLayout,
    out: String,
}

impl<'a> MpsWriter<'a> {
    fn write_document(&mut self) -> Result<(), ExportError> {
        self.ctx.append_comments("*", &mut self.out)?;
        if self.layout.fixed {
            writeln!(self.out, "NAME          {}", self.ctx.model.name)?;
        } else {
            writeln!(self.out, "NAME {}", self.ctx.model.name)?;
        }
        self.append_rows()?;
        let transpose = self.transpose()?;
        self.append_columns_section(&transpose)?;
        self.append_rhs()?;
        self.append_ranges()?;
        self.append_bounds(&transpose)?;
        self.out.push_str("ENDATA\n");
        Ok(())
    }

    fn append_rows(&mut self) -> Result<(), ExportError> {
        self.out.push_str("ROWS\n");
        self.layout
            .append_line_header_with_newline("N", OBJECTIVE_ROW, &mut self.out)?;
        for (index, constraint) in self.ctx.model.constraints.iter().enumerate() {
            let (sense, _) = row_sense(constraint);
            self.layout.append_line_header_with_newline(
                sense,
                &self.ctx.constraint_names[index],
                &mut self.out,
            )?;
        }
        Ok(())
    }

    /// The sparse matrix in column-major order: per variable, the `COST`
    /// entry (when nonzero) followed by its constraint entries in
    /// constraint order. Rejects coefficients referencing a variable the
    /// model does not have.
    fn transpose(&self) -> Result<Vec<Vec<(&'a str, f64)>>, ExportError> {
        let model = self.ctx.model;
        let count = model.variables.len();
        let mut transpose: Vec<Vec<(&str, f64)>> = vec![Vec::new(); count];
        for (&index, &coefficient) in &model.objective.coefficients {
            if coefficient == 0.0 {
                continue;
            }
            transpose
                .get_mut(index)
                .ok_or(ExportError::VariableIndexOutOfRange { index, count })?
                .push((OBJECTIVE_ROW, coefficient));
        }
        for (row, constraint) in model.constraints.iter().enumerate() {
            let row_name = self.ctx.constraint_names[row].as_str();
            for (&index, &coefficient) in &constraint.coefficients {
                if coefficient == 0.0 {
                    continue;
                }
                transpose
                    .get_mut(index)
                    .ok_or(ExportError::VariableIndexOutOfRange { index, count })?
                    .push((row_name, coefficient));
            }
        }
        Ok(transpose)
    }

    fn append_columns_section(
        &mut self,
        transpose: &[Vec<(&'a str, f64)>],
    ) -> Result<(), ExportError> {
        self.out.push_str("COLUMNS\n");
        self.append_columns(false, transpose)?;
        if self.ctx.num_integer + self.ctx.num_binary > 0 {
            self.append_marker("INTORG")?;
            self.append_columns(true, transpose)?;
            self.append_marker("INTEND")?;
        }
        Ok(())
    }

    /// Appends the columns of integer variables when `integrality` is set,
    /// of continuous variables otherwise. Variables appearing in no
    /// expression are left out of the file entirely.
    fn append_columns(
        &mut self,
        integrality: bool,
        transpose: &[Vec<(&'a str, f64)>],
    ) -> Result<(), ExportError> {
        for (index, variable) in self.ctx.model.variables.iter().enumerate() {
            if variable.is_integer != integrality || transpose[index].is_empty() {
                continue;
            }
            for &(row_name, coefficient) in &transpose[index] {
                self.layout.append_term_with_context(
                    &self.ctx.variable_names[index],
                    row_name,
                    coefficient,
                    &mut self.out,
                )?;
            }
            self.layout.finish_line(&mut self.out);
        }
        Ok(())
    }

    fn append_marker(&mut self, marker: &str) -> Result<(), ExportError> {
        writeln!(self.out, "    MARKER    'MARKER'    '{}'", marker)?;
        Ok(())
    }

    fn append_rhs(&mut self) -> Result<(), ExportError> {
        self.out.push_str("RHS\n");
        for (index, constraint) in self.ctx.model.constraints.iter().enumerate() {
            if let (_, Some(rhs)) = row_sense(constraint) {
                self.layout.append_term_with_context(
                    "RHS",
                    &self.ctx.constraint_names[index],
                    rhs,
                    &mut self.out,
                )?;
            }
        }
        // The RHS entry of the objective row holds the negated offset.
        if self.ctx.model.objective.offset != 0.0 {
            self.layout.append_term_with_context(
                "RHS",
                OBJECTIVE_ROW,
                -self.ctx.model.objective.offset,
                &mut self.out,
            )?;
        }
        self.layout.finish_line(&mut self.out);
        Ok(())
    }

    /// One entry of magnitude `ub - lb` per double-bounded constraint.
    /// Together with the `L` sense and the RHS of `ub`, readers reconstruct
    /// the original `[lb, ub]`.
    fn append_ranges(&mut self) -> Result<(), ExportError> {
        if !self.ctx.model.constraints.iter().any(Constraint::is_range) {
            return Ok(());
        }
        self.out.push_str("RANGES\n");
        for (index, constraint) in self.ctx.model.constraints.iter().enumerate() {
            if constraint.is_range() {
                self.layout.append_term_with_context(
                    "RANGE",
                    &self.ctx.constraint_names[index],
                    constraint.upper_bound - constraint.lower_bound,
                    &mut self.out,
                )?;
            }
        }
        self.layout.finish_line(&mut self.out);
        Ok(())
    }

    fn append_bounds(&mut self, transpose: &[Vec<(&'a str, f64)>]) -> Result<(), ExportError> {
        let ctx = self.ctx;
        self.out.push_str("BOUNDS\n");
        for (index, variable) in ctx.model.variables.iter().enumerate() {
            if transpose[index].is_empty() {
                continue;
            }
            let name = ctx.variable_names[index].as_str();
            let lb = variable.lower_bound;
            let ub = variable.upper_bound;
            if variable.is_binary() {
                self.append_bound("BV", name, None)?;
            } else if lb == ub {
                self.append_bound("FX", name, Some(lb))?;
            } else if lb == f64::NEG_INFINITY && ub == f64::INFINITY {
                self.append_bound("FR", name, None)?;
            } else if variable.has_default_bounds() && !variable.is_integer {
                // Continuous [0, +inf) is the implicit default.
                continue;
            } else {
                // Integer variables get explicit entries even at the
                // default, as some readers give integer columns [0, 1].
                if lb == f64::NEG_INFINITY {
                    self.append_bound("MI", name, None)?;
                } else if lb != 0.0 || variable.is_integer {
                    self.append_bound("LO", name, Some(lb))?;
                }
                if ub < f64::INFINITY {
                    self.append_bound("UP", name, Some(ub))?;
                } else if variable.is_integer {
                    self.append_bound("PL", name, None)?;
                }
            }
        }
        Ok(())
    }

    fn append_bound(&mut self, bound_type: &str, name: &str, value: Option<f64>) -> fmt::Result {
        self.layout
            .append_line_header(bound_type, "BOUND", &mut self.out)?;
        match value {
            Some(value) => {
                self.layout.append_pair(name, value, &mut self.out)?;
                self.out.push('\n');
            }
            None => {
                if self.layout.fixed {
                    writeln!(self.out, "  {}", name)?;
                } else {
                    writeln!(self.out, " {}", name)?;
                }
            }
        }
        Ok(())
    }
}
