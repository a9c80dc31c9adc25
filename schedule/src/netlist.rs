use std::collections::VecDeque;
use std::fmt::Display;

use indexmap::IndexMap;

use crate::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Input,
    Gate,
    Output,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Set if the mapper proved the node to be a constant.
    pub constant: Option<bool>,
    /// The cell holding the final value of the node, if it was placed.
    pub position: Option<Position>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Node { name: name.into(), kind, constant: None, position: None }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_constant(mut self, value: bool) -> Self {
        self.constant = Some(value);
        self
    }
}

/// The mapped netlist, as handed over by the technology mapper.
#[derive(Clone, Debug, Default)]
pub struct Netlist {
    names: IndexMap<String, NodeId>,
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
}

/// Where the value of a primary output comes from once the schedule has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputBinding {
    Const(bool),
    Cell(Position),
}

/// The ports of the circuit: input signal names, and for each output its binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetlistBoundary {
    pub inputs: Vec<String>,
    pub outputs: Vec<(String, OutputBinding)>,
}

impl NetlistBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>, binding: OutputBinding) -> Self {
        self.outputs.push((name.into(), binding));
        self
    }
}

/// An output that is neither constant nor placed on the crossbar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnboundOutput {
    pub output: String,
}

impl Display for UnboundOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "output {:?} is neither constant nor bound to a crossbar cell", self.output)
    }
}

impl std::error::Error for UnboundOutput {}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the netlist.
    ///
    /// Panics if a node with the same name already exists.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        let previous = self.names.insert(node.name.clone(), id);
        assert!(previous.is_none(), "duplicate node {:?}", node.name);
        self.nodes.push(node);
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push((from, to));
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index), node))
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.kind == NodeKind::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.kind == NodeKind::Output)
    }

    pub fn gate_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.kind == NodeKind::Gate).count()
    }

    /// Length of the longest path through the netlist, counted in gates.
    ///
    /// Nodes on a combinational cycle are not assigned a level and do not contribute.
    pub fn depth(&self) -> u32 {
        let mut fanin = vec![0usize; self.nodes.len()];
        let mut fanout = vec![Vec::new(); self.nodes.len()];
        for &(from, to) in &self.edges {
            fanin[to.0] += 1;
            fanout[from.0].push(to);
        }
        let mut levels = vec![0u32; self.nodes.len()];
        let mut queue = VecDeque::from_iter((0..self.nodes.len()).filter(|&index| fanin[index] == 0));
        while let Some(index) = queue.pop_front() {
            let level = levels[index];
            for &to in &fanout[index] {
                let next = match self.nodes[to.0].kind {
                    NodeKind::Gate => level + 1,
                    NodeKind::Input | NodeKind::Output => level,
                };
                levels[to.0] = levels[to.0].max(next);
                fanin[to.0] -= 1;
                if fanin[to.0] == 0 {
                    queue.push_back(to.0);
                }
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Collects the port list of the netlist. Constant outputs are bound to their value without
    /// looking at their position at all.
    pub fn boundary(&self) -> Result<NetlistBoundary, UnboundOutput> {
        let mut boundary = NetlistBoundary::new();
        for node in self.inputs() {
            boundary.inputs.push(node.name.clone());
        }
        for node in self.outputs() {
            let binding = match (node.constant, node.position) {
                (Some(value), _) => OutputBinding::Const(value),
                (None, Some(position)) => OutputBinding::Cell(position),
                (None, None) => return Err(UnboundOutput { output: node.name.clone() }),
            };
            boundary.outputs.push((node.name.clone(), binding));
        }
        Ok(boundary)
    }
}

#[cfg(test)]
mod test {
    use crate::{Netlist, Node, NodeKind, OutputBinding, Position};

    fn majority() -> Netlist {
        let mut netlist = Netlist::new();
        let a = netlist.add_node(Node::new("a", NodeKind::Input));
        let b = netlist.add_node(Node::new("b", NodeKind::Input));
        let n1 = netlist.add_node(Node::new("n1", NodeKind::Gate));
        let n2 = netlist.add_node(Node::new("n2", NodeKind::Gate));
        let y = netlist.add_node(Node::new("y", NodeKind::Output).with_position(Position::new(2, 3)));
        netlist.add_node(Node::new("one", NodeKind::Output).with_constant(true).with_position(Position::new(9, 9)));
        netlist.add_edge(a, n1);
        netlist.add_edge(b, n1);
        netlist.add_edge(n1, n2);
        netlist.add_edge(a, n2);
        netlist.add_edge(n2, y);
        netlist
    }

    #[test]
    fn test_depth() {
        let netlist = majority();
        assert_eq!(netlist.gate_count(), 2);
        assert_eq!(netlist.depth(), 2);
        assert_eq!(Netlist::new().depth(), 0);
    }

    #[test]
    fn test_boundary() {
        let boundary = majority().boundary().unwrap();
        assert_eq!(boundary.inputs, vec!["a", "b"]);
        assert_eq!(
            boundary.outputs,
            vec![
                ("y".to_owned(), OutputBinding::Cell(Position::new(2, 3))),
                ("one".to_owned(), OutputBinding::Const(true)),
            ]
        );
    }

    #[test]
    fn test_unbound_output() {
        let mut netlist = majority();
        netlist.add_node(Node::new("z", NodeKind::Output));
        assert_eq!(netlist.boundary().unwrap_err().output, "z");
    }

    #[test]
    fn test_find() {
        let netlist = majority();
        let id = netlist.find("n2").unwrap();
        assert_eq!(netlist.node(id).kind, NodeKind::Gate);
        assert_eq!(netlist.find("q"), None);
    }
}
