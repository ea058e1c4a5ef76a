//! The export façade: per-call setup, name resolution and format selection.
use std::fmt;
use std::fmt::Write;

use crate::error::ExportError;
use crate::lp_format;
use crate::model::Model;
use crate::mps_format;
use crate::names::{resolve_names, FIXED_MPS_NAME_LENGTH};

/// Serializes one borrowed model to the supported text formats.
///
/// The exporter holds only the borrow; every export call resolves names and
/// classifies variables from scratch, so calls may be freely interleaved on
/// one instance and always observe the model as it currently is. The model
/// must not be mutated while a call is running.
pub struct ModelExporter<'a> {
    model: &'a Model,
}

impl<'a> ModelExporter<'a> {
    /// Creates an exporter borrowing `model` for its lifetime.
    pub fn new(model: &'a Model) -> Self {
        ModelExporter { model }
    }

    /// Writes the model in the CPLEX-style .lp file format.
    ///
    /// With `obfuscated` set, variable and constraint names are replaced by
    /// synthetic "V1", "C1", ... placeholders; otherwise the model's names
    /// are kept, sanitized and made unique.
    pub fn export_lp_format(&self, obfuscated: bool) -> Result<String, ExportError> {
        let ctx = ExportContext::new(self.model, obfuscated);
        lp_format::write_lp(&ctx)
    }

    /// Writes the model in the MPS file format.
    ///
    /// `fixed_format` asks for the fixed column layout; when a resolved name
    /// is longer than 8 characters the call downgrades to the free layout
    /// instead of failing. Models with a maximization objective are
    /// rejected: MPS encodes minimization only, and flipping the sign here
    /// would silently change the reported objective value.
    pub fn export_mps_format(
        &self,
        fixed_format: bool,
        obfuscated: bool,
    ) -> Result<String, ExportError> {
        let ctx = ExportContext::new(self.model, obfuscated);
        let fixed = fixed_format && ctx.can_use_fixed_mps_format();
        if fixed_format && !fixed {
            log::warn!(
                "fixed MPS format requested, but a resolved name exceeds {} characters; \
                 falling back to free format",
                FIXED_MPS_NAME_LENGTH
            );
        }
        mps_format::write_mps(&ctx, fixed)
    }
}

/// Everything one export call derives from the model before writing:
/// resolved names and the variable classification counts. Built fresh per
/// call and dropped with it.
pub(crate) struct ExportContext<'a> {
    pub(crate) model: &'a Model,
    pub(crate) variable_names: Vec<String>,
    pub(crate) constraint_names: Vec<String>,
    pub(crate) num_continuous: usize,
    pub(crate) num_integer: usize,
    pub(crate) num_binary: usize,
    obfuscated: bool,
}

impl<'a> ExportContext<'a> {
    fn new(model: &'a Model, obfuscated: bool) -> Self {
        let mut num_continuous = 0;
        let mut num_integer = 0;
        let mut num_binary = 0;
        for variable in &model.variables {
            if variable.is_binary() {
                num_binary += 1;
            } else if variable.is_integer {
                num_integer += 1;
            } else {
                num_continuous += 1;
            }
        }
        let variable_names = resolve_names(&model.variables, 'V', obfuscated);
        let constraint_names = resolve_names(&model.constraints, 'C', obfuscated);
        log::debug!(
            "exporting {:?}: {} constraints, {} variables ({} binary, {} integer, {} continuous)",
            model.name,
            model.constraints.len(),
            model.variables.len(),
            num_binary,
            num_integer,
            num_continuous,
        );
        ExportContext {
            model,
            variable_names,
            constraint_names,
            num_continuous,
            num_integer,
            num_binary,
            obfuscated,
        }
    }

    /// True when every resolved name fits the fixed MPS name field. With
    /// obfuscated names the prefix consumes one of the 8 characters, which
    /// caps the 1-based indices at 7 digits.
    pub(crate) fn can_use_fixed_mps_format(&self) -> bool {
        if self.obfuscated {
            let largest = self.model.variables.len().max(self.model.constraints.len());
            return largest <= 9_999_999;
        }
        self.variable_names
            .iter()
            .chain(self.constraint_names.iter())
            .all(|name| name.len() <= FIXED_MPS_NAME_LENGTH)
    }

    /// The comment header shared by both formats: `sep` is "\\" for
    /// .lp output and "*" for MPS output.
    pub(crate) fn append_comments(&self, sep: &str, out: &mut String) -> fmt::Result {
        writeln!(out, "{} Generated by lp-export", sep)?;
        writeln!(out, "{} Name        : {}", sep, self.model.name)?;
        writeln!(out, "{} Constraints : {}", sep, self.model.constraints.len())?;
        writeln!(out, "{} Variables   : {}", sep, self.model.variables.len())?;
        writeln!(out, "{}   Binary    : {}", sep, self.num_binary)?;
        writeln!(out, "{}   Integer   : {}", sep, self.num_integer)?;
        writeln!(out, "{}   Continuous: {}", sep, self.num_continuous)?;
        writeln!(
            out,
            "{} The row set may differ from the source model: a constraint with two",
            sep
        )?;
        writeln!(
            out,
            "{} distinct finite bounds becomes two inequality rows in .lp output,",
            sep
        )?;
        writeln!(
            out,
            "{} and unused variables and unconstrained rows may be left out.",
            sep
        )?;
        Ok(())
    }
}
