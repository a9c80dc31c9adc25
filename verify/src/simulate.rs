use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use tracing::debug;

use crate::verilog::{Evaluator, Module, parse_module};
use crate::{EquivalenceChecker, EquivalenceResult, Inconclusive};

/// Decides equivalence by evaluating both modules on every input pattern.
///
/// Only suitable for small modules: the number of patterns is exponential in the number of
/// inputs, which is capped at [`SimulationChecker::max_inputs`].
#[derive(Clone, Debug)]
pub struct SimulationChecker {
    max_inputs: usize,
}

impl Default for SimulationChecker {
    fn default() -> Self {
        SimulationChecker { max_inputs: 20 }
    }
}

impl SimulationChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_inputs(&self) -> usize {
        self.max_inputs
    }

    pub fn with_max_inputs(mut self, max_inputs: usize) -> Self {
        self.max_inputs = max_inputs;
        self
    }
}

fn read(which: &str, text: &str) -> Result<Module, Inconclusive> {
    parse_module(text).map_err(|error| Inconclusive { stderr: format!("cannot read {which} module: {error}\n") })
}

fn not_equivalent(reason: String) -> EquivalenceResult {
    EquivalenceResult { equivalent: false, raw_output: format!("Networks are NOT EQUIVALENT. {reason}\n") }
}

impl EquivalenceChecker for SimulationChecker {
    fn check(&self, first: &str, second: &str) -> Result<EquivalenceResult, Inconclusive> {
        let first = read("first", first)?;
        let second = read("second", second)?;

        let first_outputs = BTreeSet::from_iter(first.outputs.iter());
        let second_outputs = BTreeSet::from_iter(second.outputs.iter());
        if first_outputs != second_outputs {
            return Ok(not_equivalent(format!(
                "Output lists differ: {:?} vs {:?}.",
                Vec::from_iter(first_outputs),
                Vec::from_iter(second_outputs)
            )));
        }

        let inputs = Vec::from_iter(BTreeSet::from_iter(first.inputs.iter().chain(&second.inputs)));
        if inputs.len() > self.max_inputs {
            return Err(Inconclusive {
                stderr: format!("{} inputs exceed the simulation limit of {}\n", inputs.len(), self.max_inputs),
            });
        }
        debug!("simulating {} against {} over {} inputs", first.name, second.name, inputs.len());

        let Some(patterns) = u32::try_from(inputs.len()).ok().and_then(|count| 1u64.checked_shl(count)) else {
            return Err(Inconclusive { stderr: format!("{} inputs are too many to enumerate\n", inputs.len()) });
        };
        let failed = |stderr: String| Inconclusive { stderr };
        for pattern in 0..patterns {
            let values = HashMap::from_iter(
                inputs.iter().enumerate().map(|(index, name)| (name.as_str(), (pattern >> index) & 1 != 0)),
            );
            let mut first_eval = Evaluator::new(&first, values.clone());
            let mut second_eval = Evaluator::new(&second, values);
            for output in &first.outputs {
                let first_value = first_eval.signal(output).map_err(failed)?;
                let second_value = second_eval.signal(output).map_err(failed)?;
                if first_value != second_value {
                    let mut reason = format!("Output {output:?} differs for input pattern");
                    for (index, name) in inputs.iter().enumerate() {
                        write!(reason, " {name}={}", (pattern >> index) & 1).unwrap();
                    }
                    reason.push('.');
                    return Ok(not_equivalent(reason));
                }
            }
        }
        Ok(EquivalenceResult { equivalent: true, raw_output: "Networks are equivalent.\n".into() })
    }
}
