use std::collections::HashMap;
use std::fmt::Write;

use arche_schedule::{NetlistBoundary, Operation, OutputBinding, Position, Schedule, Scope, Step};
use tracing::{debug, debug_span};

use crate::{Assignment, CrossbarState, Emitter, GenerateError, Term};

/// How the members of a batch are checked against each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Members are applied in list order; each one sees the writes of the ones before it.
    #[default]
    Sequential,
    /// Members must not write a cell written or read by another member of the same batch.
    Disjoint,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GeneratorOptions {
    pub batch_policy: BatchPolicy,
}

/// A generated Verilog module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub verilog: String,
    pub wire_count: usize,
}

/// Replays a schedule on a crossbar and collects the assignments it produces.
#[derive(Debug)]
pub struct Generator {
    emitter: Emitter,
    options: GeneratorOptions,
    assignments: Vec<Assignment>,
    steps: usize,
    failure: Option<GenerateError>,
}

impl Generator {
    pub fn new(rows: usize, cols: usize, options: GeneratorOptions) -> Self {
        Generator { emitter: Emitter::new(rows, cols), options, assignments: Vec::new(), steps: 0, failure: None }
    }

    pub fn state(&self) -> &CrossbarState {
        self.emitter.state()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    fn cells_written(&self, operation: &Operation) -> Vec<Position> {
        let state = self.state();
        match operation {
            Operation::Reset { scope: Scope::Rows, indices } => indices
                .iter()
                .filter(|&&row| row < state.rows())
                .flat_map(|&row| (0..state.cols()).map(move |col| Position::new(row, col)))
                .collect(),
            Operation::Reset { scope: Scope::Cols, indices } => indices
                .iter()
                .filter(|&&col| col < state.cols())
                .flat_map(|&col| (0..state.rows()).map(move |row| Position::new(row, col)))
                .collect(),
            _ => operation.writes(),
        }
    }

    fn check_disjoint(&self, operations: &[Operation]) -> Result<(), GenerateError> {
        let step = self.steps;
        let mut writers = HashMap::new();
        for (member, operation) in operations.iter().enumerate() {
            for position in self.cells_written(operation) {
                if writers.insert(position, member).is_some_and(|other| other != member) {
                    return Err(GenerateError::BatchConflict { step, position });
                }
            }
        }
        for (member, operation) in operations.iter().enumerate() {
            for position in operation.reads() {
                if let Some(&writer) = writers.get(&position)
                    && writer != member
                {
                    return Err(GenerateError::BatchConflict { step, position });
                }
            }
        }
        Ok(())
    }

    /// Performs every operation of the next step of the schedule.
    ///
    /// A step either applies completely or not at all: if any member of a batch is rejected, the
    /// members before it are rolled back. The first error is kept, and every later call to
    /// [`Generator::step`] or [`Generator::finish`] returns it again.
    pub fn step(&mut self, step: &Step) -> Result<(), GenerateError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if let Err(error) = self.apply(step) {
            self.failure = Some(error.clone());
            return Err(error);
        }
        self.steps += 1;
        Ok(())
    }

    fn apply(&mut self, step: &Step) -> Result<(), GenerateError> {
        let operations = match step {
            Step::Single(operation) => {
                if let Some(assignment) = self.emitter.emit(operation)? {
                    self.assignments.push(assignment);
                }
                return Ok(());
            }
            Step::Batch(operations) => operations,
        };
        if self.options.batch_policy == BatchPolicy::Disjoint {
            self.check_disjoint(operations)?;
        }
        let checkpoint = self.emitter.clone();
        let committed = self.assignments.len();
        for operation in operations {
            match self.emitter.emit(operation) {
                Ok(Some(assignment)) => self.assignments.push(assignment),
                Ok(None) => (),
                Err(error) => {
                    self.emitter = checkpoint;
                    self.assignments.truncate(committed);
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self, schedule: &Schedule) -> Result<(), GenerateError> {
        for step in schedule {
            self.step(step)?;
        }
        debug!("{} steps, {} wires", self.steps, self.assignments.len());
        Ok(())
    }

    /// The value an output takes once the schedule has run.
    pub fn resolve(&self, name: &str, binding: OutputBinding) -> Result<Term, GenerateError> {
        match binding {
            OutputBinding::Const(value) => Ok(Term::Const(value)),
            OutputBinding::Cell(position) => {
                let state = self.state();
                if !state.contains(position) {
                    return Err(GenerateError::OutOfBounds {
                        operation: format!("output {name}"),
                        rows: state.rows(),
                        cols: state.cols(),
                    });
                }
                Ok(Term::from(state.get(position)))
            }
        }
    }

    /// Assembles the Verilog module for the steps performed so far.
    ///
    /// Fails with the recorded error if any step was rejected.
    pub fn finish(&self, module: &str, boundary: &NetlistBoundary) -> Result<Artifact, GenerateError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let mut outputs = Vec::new();
        for (name, binding) in &boundary.outputs {
            outputs.push((name, self.resolve(name, *binding)?));
        }

        let state = self.state();
        let mut verilog = String::new();
        writeln!(verilog, "// Generated by Arche for {module} for crossbar {}x{}", state.rows(), state.cols()).unwrap();
        let ports = Vec::from_iter(boundary.inputs.iter().chain(boundary.outputs.iter().map(|(name, _)| name)));
        writeln!(verilog, "module {module}({});", join(ports)).unwrap();
        if !boundary.inputs.is_empty() {
            writeln!(verilog, "input {};", join(&boundary.inputs)).unwrap();
        }
        if !boundary.outputs.is_empty() {
            writeln!(verilog, "output {};", join(boundary.outputs.iter().map(|(name, _)| name))).unwrap();
        }
        if !self.assignments.is_empty() {
            writeln!(verilog, "wire {};", join(self.assignments.iter().map(|assignment| &assignment.wire))).unwrap();
        }
        for assignment in &self.assignments {
            writeln!(verilog, "{assignment}").unwrap();
        }
        for (name, term) in outputs {
            writeln!(verilog, "assign {name} = {term};").unwrap();
        }
        writeln!(verilog, "endmodule").unwrap();

        Ok(Artifact { verilog, wire_count: self.assignments.len() })
    }
}

fn join<T: AsRef<str>>(names: impl IntoIterator<Item = T>) -> String {
    Vec::from_iter(names.into_iter().map(|name| name.as_ref().to_owned())).join(", ")
}

/// Generates the Verilog module computed by `schedule` on an R×C crossbar.
pub fn generate(
    module: &str,
    schedule: &Schedule,
    boundary: &NetlistBoundary,
    rows: usize,
    cols: usize,
    options: GeneratorOptions,
) -> Result<Artifact, GenerateError> {
    let _span = debug_span!("generate", module).entered();
    let mut generator = Generator::new(rows, cols, options);
    generator.run(schedule)?;
    generator.finish(module, boundary)
}
