use std::fmt::Display;

use arche_crossbar::CrossbarState;
use arche_schedule::{MappingSolution, summarize};

pub const HEADER: &str = "benchmark,#pi,#po,#gates,#level,delay,speedup,r,c,#devices,utilization";

/// One row of the mapping statistics table.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub benchmark: String,
    pub inputs: usize,
    pub outputs: usize,
    pub gates: usize,
    pub level: u32,
    /// Number of time steps of the schedule.
    pub delay: usize,
    /// Average number of operations performed per time step.
    pub speedup: f64,
    pub rows: usize,
    pub cols: usize,
    pub devices: usize,
    pub utilization: f64,
}

impl Report {
    pub fn new(benchmark: &str, solution: &MappingSolution, state: &CrossbarState) -> Self {
        let netlist = &solution.netlist;
        let delay = solution.schedule.len();
        let operations = summarize(&solution.schedule).operation_count();
        let cells = state.rows() * state.cols();
        Report {
            benchmark: benchmark.to_owned(),
            inputs: netlist.inputs().count(),
            outputs: netlist.outputs().count(),
            gates: netlist.gate_count(),
            level: netlist.depth(),
            delay,
            speedup: if delay == 0 { 0.0 } else { operations as f64 / delay as f64 },
            rows: state.rows(),
            cols: state.cols(),
            devices: state.devices_used(),
            utilization: if cells == 0 { 0.0 } else { state.devices_used() as f64 / cells as f64 },
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{:.2},{},{},{},{:.4}",
            self.benchmark,
            self.inputs,
            self.outputs,
            self.gates,
            self.level,
            self.delay,
            self.speedup,
            self.rows,
            self.cols,
            self.devices,
            self.utilization
        )
    }
}

#[cfg(test)]
mod test {
    use arche_crossbar::{Generator, GeneratorOptions};
    use arche_schedule::MappingSolution;

    use super::Report;

    #[test]
    fn test_report() {
        let solution = MappingSolution::parse(
            r#"{
                "netlist": {
                    "nodes": [
                        {"name": "a", "kind": "input"},
                        {"name": "b", "kind": "input"},
                        {"name": "g", "kind": "gate"},
                        {"name": "y", "kind": "output", "position": [0, 2]}
                    ],
                    "edges": [["a", "g"], ["b", "g"], ["g", "y"]]
                },
                "steps": [
                    [["INPUT", [0, 0], "a"], ["INPUT", [0, 1], "b"]],
                    ["HNOR", [[0, 0], [0, 1], [0, 2]], "g"]
                ]
            }"#,
        )
        .unwrap();
        let mut generator = Generator::new(2, 4, GeneratorOptions::default());
        generator.run(&solution.schedule).unwrap();
        let report = Report::new("nor.json", &solution, generator.state());
        assert_eq!(report.to_string(), "nor.json,2,1,1,1,2,1.50,2,4,3,0.3750");
    }
}
