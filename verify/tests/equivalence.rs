use arche_crossbar::{GeneratorOptions, generate};
use arche_schedule::{NetlistBoundary, OutputBinding, Position, parse_schedule};
use arche_verify::{EquivalenceChecker, SimulationChecker};

fn build(steps: &str, inputs: &[&str], output: Position) -> String {
    let schedule = parse_schedule(steps).unwrap();
    let mut boundary = NetlistBoundary::new().output("y", OutputBinding::Cell(output));
    for input in inputs {
        boundary = boundary.input(*input);
    }
    generate("top", &schedule, &boundary, 3, 3, GeneratorOptions::default()).unwrap().verilog
}

fn and2() -> String {
    build(
        concat!(
            "[",
            r#"[["INPUT", [0, 0], "a"], ["INPUT", [1, 0], "b"]],"#,
            r#"[["NOT", [0, 0], [0, 1], "na"], ["NOT", [1, 0], [1, 1], "nb"]],"#,
            r#"["VNOR", [[0, 1], [1, 1], [2, 1]], "and"]"#,
            "]",
        ),
        &["a", "b"],
        Position::new(2, 1),
    )
}

fn or2() -> String {
    build(
        concat!(
            "[",
            r#"[["INPUT", [0, 0], "a"], ["INPUT", [1, 0], "b"]],"#,
            r#"["VNOR", [[0, 0], [1, 0], [2, 0]], "nor"],"#,
            r#"["NOT", [2, 0], [2, 1], "or"]"#,
            "]",
        ),
        &["a", "b"],
        Position::new(2, 1),
    )
}

#[test]
fn test_double_inversion() {
    let inverted = build(
        concat!(
            "[",
            r#"["INPUT", [0, 0], "a"],"#,
            r#"["NOT", [0, 0], [0, 1], "n1"],"#,
            r#"["NOT", [0, 1], [0, 2], "n2"]"#,
            "]",
        ),
        &["a"],
        Position::new(0, 2),
    );
    let direct = build(r#"[["INPUT", [0, 0], "a"]]"#, &["a"], Position::new(0, 0));
    let result = SimulationChecker::new().check(&inverted, &direct).unwrap();
    assert!(result.equivalent);
}

#[test]
fn test_and_against_or() {
    let result = SimulationChecker::new().check(&and2(), &or2()).unwrap();
    assert!(!result.equivalent);
}

#[test]
fn test_against_reference() {
    let and_reference = "module ref(a, b, y);\ninput a, b;\noutput y;\nassign y = a & b;\nendmodule\n";
    let or_reference = "module ref(a, b, y);\ninput a, b;\noutput y;\nassign y = a | b;\nendmodule\n";
    let checker = SimulationChecker::new();
    assert!(checker.check(&and2(), and_reference).unwrap().equivalent);
    assert!(checker.check(&or2(), or_reference).unwrap().equivalent);
    assert!(!checker.check(&or2(), and_reference).unwrap().equivalent);
}
