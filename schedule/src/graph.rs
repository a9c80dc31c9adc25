use std::fmt::Write;
use std::io;

use crate::{Netlist, NodeKind};

/// Writes the netlist as a graphviz digraph, inputs on the left and outputs on the right.
///
/// Each node is labelled with its name, the cell holding its value if it was placed, and its
/// value if the mapper proved it constant.
pub fn write_dot(writer: &mut impl io::Write, netlist: &Netlist) -> io::Result<()> {
    writeln!(writer, "digraph {{")?;
    writeln!(writer, "  rankdir=LR;")?;
    writeln!(writer, "  node [fontname=\"monospace\"];")?;
    for (id, node) in netlist.iter_nodes() {
        let shape = match node.kind {
            NodeKind::Input => "invhouse",
            NodeKind::Gate => "box",
            NodeKind::Output => "house",
        };
        let mut label = node.name.escape_default().to_string();
        if let Some(position) = node.position {
            write!(label, "\\n{position}").unwrap();
        }
        if let Some(value) = node.constant {
            write!(label, "\\n= {}", value as u8).unwrap();
        }
        writeln!(writer, "  node_{} [shape={shape} label=\"{label}\"];", id.index())?;
    }
    for (from, to) in netlist.edges() {
        writeln!(writer, "  node_{} -> node_{};", from.index(), to.index())?;
    }
    writeln!(writer, "}}")
}
