#![deny(missing_docs)]
//! A library to write linear and integer programming models
//! in the .lp and MPS file formats.
//!
//! The exporter borrows an already-built [Model] and serializes it; it does
//! no solving, no validation beyond what the grammars require, and no file
//! I/O. Variable and constraint names are made format-legal and unique
//! automatically, or replaced by synthetic placeholders on request.
//!
//! ```
//! use lp_export::{Model, ModelExporter, Objective, Sense, Variable};
//!
//! let model = Model {
//!     name: "tiny".to_string(),
//!     variables: vec![Variable {
//!         name: Some("x".to_string()),
//!         lower_bound: 0.0,
//!         upper_bound: 4.0,
//!         is_integer: false,
//!     }],
//!     constraints: vec![],
//!     objective: Objective {
//!         coefficients: vec![(0, 2.0)].into_iter().collect(),
//!         offset: 0.0,
//!         sense: Sense::Minimize,
//!     },
//! };
//! let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
//! assert!(lp.contains("obj: 2 x"));
//! ```

pub mod error;
pub mod export;
mod lp_format;
pub mod model;
mod mps_format;
pub mod names;

pub use crate::error::ExportError;
pub use crate::export::ModelExporter;
pub use crate::model::{Constraint, Model, Objective, Sense, Variable};
