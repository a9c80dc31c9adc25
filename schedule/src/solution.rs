use jzon::JsonValue;

use crate::parse::position_from_json;
use crate::{Netlist, Node, NodeKind, ParseError, Schedule, schedule_from_json};

/// Everything the technology mapper produces for one design: the mapped netlist and the
/// schedule that computes it on the crossbar.
#[derive(Clone, Debug)]
pub struct MappingSolution {
    pub name: String,
    /// Crossbar dimensions the solution was mapped for, if the mapper recorded them.
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub netlist: Netlist,
    pub schedule: Schedule,
}

fn dimension_from_json(value: &JsonValue, key: &str) -> Result<Option<usize>, ParseError> {
    let field = &value[key];
    if field.is_null() {
        return Ok(None);
    }
    match field.as_usize() {
        Some(0) | None => Err(ParseError::new(key, format!("expected a positive integer, found {field}"))),
        Some(size) => Ok(Some(size)),
    }
}

fn node_from_json(location: &str, value: &JsonValue) -> Result<Node, ParseError> {
    let Some(name) = value["name"].as_str() else {
        return Err(ParseError::new(location, "node without a name"));
    };
    let kind = match value["kind"].as_str() {
        Some("input") => NodeKind::Input,
        Some("gate") => NodeKind::Gate,
        Some("output") => NodeKind::Output,
        _ => return Err(ParseError::new(location, format!("node {name:?} has no valid kind"))),
    };
    let mut node = Node::new(name, kind);
    let constant = &value["constant"];
    if !constant.is_null() {
        node.constant = match (constant.as_u8(), constant.as_bool()) {
            (Some(0), _) | (_, Some(false)) => Some(false),
            (Some(1), _) | (_, Some(true)) => Some(true),
            _ => return Err(ParseError::new(location, format!("node {name:?} has invalid constant {constant}"))),
        };
    }
    let position = &value["position"];
    if !position.is_null() {
        node.position = Some(position_from_json(location, position)?);
    }
    Ok(node)
}

fn netlist_from_json(value: &JsonValue) -> Result<Netlist, ParseError> {
    let mut netlist = Netlist::new();
    for (index, node) in value["nodes"].members().enumerate() {
        let location = format!("netlist.nodes[{index}]");
        let node = node_from_json(&location, node)?;
        if netlist.find(&node.name).is_some() {
            return Err(ParseError::new(location, format!("duplicate node {:?}", node.name)));
        }
        netlist.add_node(node);
    }
    for (index, edge) in value["edges"].members().enumerate() {
        let location = format!("netlist.edges[{index}]");
        let mut ends = [None, None];
        for (end, name) in ends.iter_mut().zip([&edge[0], &edge[1]]) {
            *end = name.as_str().and_then(|name| netlist.find(name));
        }
        let [Some(from), Some(to)] = ends else {
            return Err(ParseError::new(location, format!("edge {edge} does not connect two known nodes")));
        };
        netlist.add_edge(from, to);
    }
    Ok(netlist)
}

impl MappingSolution {
    pub fn from_json(value: &JsonValue) -> Result<Self, ParseError> {
        if !value.is_object() {
            return Err(ParseError::new("", "expected a mapping solution object"));
        }
        let name = value["name"].as_str().unwrap_or("top").to_owned();
        Ok(MappingSolution {
            name,
            rows: dimension_from_json(value, "rows")?,
            cols: dimension_from_json(value, "cols")?,
            netlist: netlist_from_json(&value["netlist"])?,
            schedule: schedule_from_json(&value["steps"])?,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value = jzon::parse(text).map_err(|error| ParseError::new("", error.to_string()))?;
        Self::from_json(&value)
    }
}
