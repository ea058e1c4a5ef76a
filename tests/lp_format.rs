use std::io::{Read, Write};

use lp_export::{Constraint, ExportError, Model, ModelExporter, Objective, Sense, Variable};

fn var(name: &str, lb: f64, ub: f64, is_integer: bool) -> Variable {
    Variable {
        name: Some(name.to_string()),
        lower_bound: lb,
        upper_bound: ub,
        is_integer,
    }
}

fn con(name: &str, lb: f64, ub: f64, coefficients: &[(usize, f64)]) -> Constraint {
    Constraint {
        name: Some(name.to_string()),
        lower_bound: lb,
        upper_bound: ub,
        coefficients: coefficients.iter().copied().collect(),
    }
}

fn objective(coefficients: &[(usize, f64)], offset: f64, sense: Sense) -> Objective {
    Objective {
        coefficients: coefficients.iter().copied().collect(),
        offset,
        sense,
    }
}

fn simple_model() -> Model {
    Model {
        name: "my_problem".to_string(),
        variables: vec![
            var("x", f64::NEG_INFINITY, f64::INFINITY, false),
            var("y", 0.0, f64::INFINITY, false),
            var("z", 1.0, 10.0, false),
        ],
        constraints: vec![con(
            "cons1",
            5.0,
            f64::INFINITY,
            &[(0, 1.0), (1, 1.0), (2, 1.0)],
        )],
        objective: objective(&[(0, 2.0), (1, 1.0)], 0.0, Sense::Minimize),
    }
}

#[test]
fn simple_problem() {
    let expected = "\\ Generated by lp-export
\\ Name        : my_problem
\\ Constraints : 1
\\ Variables   : 3
\\   Binary    : 0
\\   Integer   : 0
\\   Continuous: 3
\\ The row set may differ from the source model: a constraint with two
\\ distinct finite bounds becomes two inequality rows in .lp output,
\\ and unused variables and unconstrained rows may be left out.

Minimize
  obj: 2 x + y

Subject To
  cons1: x + y + z >= 5

Bounds
  x free
  1 <= z <= 10

End
";
    let model = simple_model();
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert_eq!(lp, expected);
}

#[test]
fn integers_binaries_and_range_split() {
    let model = Model {
        name: "int_problem".to_string(),
        variables: vec![
            var("x", -10.0, 10.0, true),
            var("y", f64::NEG_INFINITY, 16.5, true),
            var("b", 0.0, 1.0, true),
        ],
        constraints: vec![
            con("c1", f64::NEG_INFINITY, -5.0, &[(0, 1.0), (1, -1.0)]),
            con("c2", 2.0, 5.0, &[(0, 1.0), (2, 1.0)]),
        ],
        objective: objective(&[(0, 1.0), (1, -1.0)], 0.0, Sense::Maximize),
    };
    let expected = "\\ Generated by lp-export
\\ Name        : int_problem
\\ Constraints : 2
\\ Variables   : 3
\\   Binary    : 1
\\   Integer   : 2
\\   Continuous: 0
\\ The row set may differ from the source model: a constraint with two
\\ distinct finite bounds becomes two inequality rows in .lp output,
\\ and unused variables and unconstrained rows may be left out.

Maximize
  obj: x - y

Subject To
  c1: x - y <= -5
  c2_lhs: x + b >= 2
  c2_rhs: x + b <= 5

Bounds
  -10 <= x <= 10
  -inf <= y <= 16.5

Generals
  x
  y

Binaries
  b

End
";
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert_eq!(lp, expected);
}

#[test]
fn obfuscated_names() {
    let model = simple_model();
    let lp = ModelExporter::new(&model).export_lp_format(true).unwrap();
    assert!(lp.contains("  obj: 2 V1 + V2"));
    assert!(lp.contains("  C1: V1 + V2 + V3 >= 5"));
    assert!(lp.contains("  V1 free"));
    assert!(lp.contains("  1 <= V3 <= 10"));
    assert!(!lp.contains("cons1"));
}

#[test]
fn names_are_sanitized_in_output() {
    let mut model = simple_model();
    model.variables[0].name = Some("$20<=40".to_string());
    model.constraints[0].name = Some("2x+y".to_string());
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert!(lp.contains("  _2x_y: _$20__40 + y + z >= 5"));
}

#[test]
fn objective_offset_becomes_constant_term() {
    let mut model = simple_model();
    model.objective.offset = -1.5;
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert!(lp.contains("  obj: 2 x + y - 1.5"));
}

#[test]
fn out_of_range_objective_index_fails() {
    let mut model = simple_model();
    model.objective.coefficients.insert(7, 1.0);
    let err = ModelExporter::new(&model)
        .export_lp_format(false)
        .unwrap_err();
    match err {
        ExportError::VariableIndexOutOfRange { index: 7, count: 3 } => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn out_of_range_constraint_index_fails() {
    let mut model = simple_model();
    model.constraints[0].coefficients.insert(3, 2.0);
    assert!(ModelExporter::new(&model).export_lp_format(false).is_err());
}

#[test]
fn unconstrained_row_is_left_out() {
    let mut model = simple_model();
    model.constraints.push(con(
        "loose",
        f64::NEG_INFINITY,
        f64::INFINITY,
        &[(0, 1.0)],
    ));
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert!(!lp.contains("loose"));
}

#[test]
fn unused_variables_are_left_out() {
    // "ghost" appears in no expression; it would otherwise reach the
    // Bounds and Generals sections.
    let mut model = simple_model();
    model.variables.push(var("ghost", -3.0, 7.0, true));
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert!(!lp.contains("ghost"));
}

#[test]
fn equality_and_empty_expressions() {
    let mut model = simple_model();
    model.constraints.push(con("pin", 3.0, 3.0, &[(2, 0.0)]));
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    assert!(lp.contains("  pin: 0 = 3"));
}

#[test]
fn written_file_round_trips() {
    let model = simple_model();
    let lp = ModelExporter::new(&model).export_lp_format(false).unwrap();
    let mut file = tempfile::Builder::new()
        .prefix(&model.name)
        .suffix(".lp")
        .tempfile()
        .unwrap();
    file.write_all(lp.as_bytes()).unwrap();
    file.flush().unwrap();
    let mut read_back = String::new();
    file.reopen().unwrap().read_to_string(&mut read_back).unwrap();
    assert_eq!(read_back, lp);
}
