use std::fmt::Display;

use jzon::JsonValue;

use crate::{Axis, InvertKind, Operation, Position, Schedule, Scope, Step};

/// A schedule, netlist, or mapping solution that does not follow the expected structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub location: String,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError { location: location.into(), message: message.into() }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
enum Item<'a> {
    Position(Position),
    Index(usize),
    Text(&'a str),
}

pub(crate) fn position_from_json(location: &str, value: &JsonValue) -> Result<Position, ParseError> {
    if value.is_array()
        && value.len() == 2
        && let (Some(row), Some(col)) = (value[0].as_usize(), value[1].as_usize())
    {
        Ok(Position::new(row, col))
    } else {
        Err(ParseError::new(location, format!("expected a [row, col] position, found {value}")))
    }
}

fn is_position_list(value: &JsonValue) -> bool {
    value.is_array() && value.members().next().is_some_and(JsonValue::is_array)
}

// Nested position lists are spliced into the operand list, so that
// `["VNOT", [[19, 7], [20, 7]], "l"]` reads the same as `["VNOT", [19, 7], [20, 7], "l"]`.
// For `reset`, a nested list holds line indices instead.
fn flatten<'a>(location: &str, opcode: &str, value: &'a JsonValue) -> Result<Vec<Item<'a>>, ParseError> {
    let mut items = Vec::new();
    let mut push = |element: &'a JsonValue| -> Result<(), ParseError> {
        let item = if let Some(text) = element.as_str() {
            Item::Text(text)
        } else if let Some(index) = element.as_usize() {
            Item::Index(index)
        } else {
            Item::Position(position_from_json(location, element)?)
        };
        items.push(item);
        Ok(())
    };
    for element in value.members().skip(1) {
        if is_position_list(element) || (opcode == "reset" && element.is_array()) {
            for inner in element.members() {
                push(inner)?;
            }
        } else {
            push(element)?;
        }
    }
    Ok(items)
}

fn split_label<'a>(
    location: &str,
    opcode: &str,
    mut items: Vec<Item<'a>>,
) -> Result<(Vec<Position>, &'a str), ParseError> {
    let Some(Item::Text(label)) = items.pop() else {
        return Err(ParseError::new(location, format!("{opcode} must end with a label")));
    };
    if label.chars().any(char::is_control) {
        return Err(ParseError::new(location, format!("{opcode} label {label:?} contains control characters")));
    }
    let positions = positions_only(location, opcode, items)?;
    Ok((positions, label))
}

fn positions_only(location: &str, opcode: &str, items: Vec<Item<'_>>) -> Result<Vec<Position>, ParseError> {
    items
        .into_iter()
        .map(|item| match item {
            Item::Position(position) => Ok(position),
            other => Err(ParseError::new(location, format!("{opcode} expects positions, found {other:?}"))),
        })
        .collect()
}

fn operation_from_json(location: &str, value: &JsonValue) -> Result<Operation, ParseError> {
    let Some(opcode) = value[0].as_str() else {
        return Err(ParseError::new(location, format!("expected an operation, found {value}")));
    };
    let mut items = flatten(location, opcode, value)?;
    let operation = match opcode {
        "reset" => {
            let scope = match items.pop() {
                Some(Item::Text("r")) => Scope::Rows,
                Some(Item::Text("c")) => Scope::Cols,
                _ => return Err(ParseError::new(location, "reset must end with \"r\" or \"c\"")),
            };
            let indices = items
                .into_iter()
                .map(|item| match item {
                    Item::Index(index) => Ok(index),
                    other => Err(ParseError::new(location, format!("reset expects line indices, found {other:?}"))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Operation::Reset { scope, indices }
        }
        "COPY" | "NOT" | "VNOT" => {
            let (positions, label) = split_label(location, opcode, items)?;
            let &[src, dst] = positions.as_slice() else {
                return Err(ParseError::new(
                    location,
                    format!("{opcode} expects a source and a destination, found {} positions", positions.len()),
                ));
            };
            let kind = match opcode {
                "COPY" => InvertKind::Copy,
                "NOT" => InvertKind::Not,
                _ => InvertKind::VNot,
            };
            Operation::CopyOrInvert { kind, src, dst, label: label.to_owned() }
        }
        "VNOR" | "HNOR" => {
            let (mut operands, label) = split_label(location, opcode, items)?;
            if operands.len() < 2 {
                return Err(ParseError::new(
                    location,
                    format!(
                        "{opcode} expects at least one operand and a destination, found {} positions",
                        operands.len()
                    ),
                ));
            }
            let dst = operands.pop().unwrap();
            let axis = if opcode == "HNOR" { Axis::H } else { Axis::V };
            Operation::Nor { axis, operands, dst, label: label.to_owned() }
        }
        "INPUT" => {
            let (positions, signal) = split_label(location, opcode, items)?;
            let &[dst] = positions.as_slice() else {
                return Err(ParseError::new(location, format!("INPUT expects one position, found {}", positions.len())));
            };
            Operation::Input { dst, signal: signal.to_owned() }
        }
        "SETZERO" => {
            // the trailing label is optional and carries no meaning
            if let Some(Item::Text(_)) = items.last() {
                items.pop();
            }
            let targets = positions_only(location, opcode, items)?;
            if targets.is_empty() {
                return Err(ParseError::new(location, "SETZERO expects at least one position"));
            }
            Operation::SetZero { targets }
        }
        _ => return Err(ParseError::new(location, format!("unrecognized opcode {opcode:?}"))),
    };
    Ok(operation)
}

fn step_from_json(location: &str, value: &JsonValue) -> Result<Step, ParseError> {
    if !value.is_array() || value.is_empty() {
        return Err(ParseError::new(location, format!("expected an operation or a batch, found {value}")));
    }
    if value[0].is_array() {
        let operations = value
            .members()
            .enumerate()
            .map(|(index, member)| operation_from_json(&format!("{location}[{index}]"), member))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Step::Batch(operations))
    } else {
        Ok(Step::Single(operation_from_json(location, value)?))
    }
}

pub fn schedule_from_json(value: &JsonValue) -> Result<Schedule, ParseError> {
    if !value.is_array() {
        return Err(ParseError::new("steps", "expected a list of steps"));
    }
    value.members().enumerate().map(|(index, step)| step_from_json(&format!("steps[{index}]"), step)).collect()
}

pub fn parse_schedule(text: &str) -> Result<Schedule, ParseError> {
    let value = jzon::parse(text).map_err(|error| ParseError::new("", error.to_string()))?;
    schedule_from_json(&value)
}
