extern crate dot;

use std::io;
use std::io::Write;

use crate::parser::*;

/// A statement flattened into numbered nodes for GraphViz rendering.
pub struct StatementTree<'a> {
    pub root: &'a Statement,
    pub nodes: Vec<&'a Statement>,
}

type GraphNode = usize;
type GraphEdge = (usize, String, usize);

impl<'a> StatementTree<'a> {
    pub fn new(root: &'a Statement) -> Self {
        let mut nodes = Vec::new();
        Self::nodes_recursive(root, &mut nodes);

        Self { root, nodes }
    }

    pub fn render_dot<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        dot::render(self, writer)
    }

    // pre-order, so node 0 is the root and children follow their parent
    fn nodes_recursive(root: &'a Statement, nodes: &mut Vec<&'a Statement>) {
        nodes.push(root);

        match root {
            Statement::BinaryOp(_, l, r) => {
                Self::nodes_recursive(l, nodes);
                Self::nodes_recursive(r, nodes);
            }
            Statement::Not(f) => Self::nodes_recursive(f, nodes),
            Statement::True | Statement::False | Statement::Var(_) => {}
        }
    }

    fn subtree_size(node: &Statement) -> usize {
        match node {
            Statement::BinaryOp(_, l, r) => 1 + Self::subtree_size(l) + Self::subtree_size(r),
            Statement::Not(f) => 1 + Self::subtree_size(f),
            Statement::True | Statement::False | Statement::Var(_) => 1,
        }
    }
}

impl<'a> dot::Labeller<'a, GraphNode, GraphEdge> for StatementTree<'_> {
    fn graph_id(&self) -> dot::Id<'a> {
        dot::Id::new("statement").expect("cannot create Id named 'statement'")
    }

    fn node_id(&self, n: &GraphNode) -> dot::Id<'a> {
        dot::Id::new(format!("n_{}", n)).unwrap_or_else(|_| panic!("cannot create Id named 'n_{n}'"))
    }

    fn node_label(&self, n: &GraphNode) -> dot::LabelText<'a> {
        match self.nodes[*n] {
            Statement::BinaryOp(op, _, _) => dot::LabelText::label(format!("{:?} {}", op, op)),
            Statement::Not(_) => dot::LabelText::label("Not".to_string()),
            Statement::False => dot::LabelText::label("False".to_string()),
            Statement::True => dot::LabelText::label("True".to_string()),
            Statement::Var(v) => dot::LabelText::label(format!("Var {}", v)),
        }
    }

    fn edge_label(&self, e: &GraphEdge) -> dot::LabelText<'a> {
        dot::LabelText::label(e.1.clone())
    }
}

impl<'a> dot::GraphWalk<'a, GraphNode, GraphEdge> for StatementTree<'_> {
    fn nodes(&self) -> dot::Nodes<'a, GraphNode> {
        (0..self.nodes.len()).collect()
    }

    fn edges(&self) -> dot::Edges<'a, GraphEdge> {
        let mut edges: Vec<GraphEdge> = Vec::new();

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Statement::BinaryOp(_, l, _) => {
                    edges.push((i, "L".to_string(), i + 1));
                    edges.push((i, "R".to_string(), i + 1 + Self::subtree_size(l)));
                }
                Statement::Not(_) => edges.push((i, "".to_string(), i + 1)),
                Statement::False | Statement::True | Statement::Var(_) => {}
            }
        }

        edges.into()
    }

    fn source(&self, e: &GraphEdge) -> GraphNode {
        e.0
    }

    fn target(&self, e: &GraphEdge) -> GraphNode {
        e.2
    }
}
