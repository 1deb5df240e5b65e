//! Expression trees built from postfix tokens.
//!
//! A tree owns its variable table. Variable nodes only carry the upper-cased
//! name; values are bound through [`ExpressionTree::set_variable`] before
//! evaluation.

use std::collections::BTreeMap;

use super::operator::Operator;
use super::parser::{ParseError, Token, to_postfix};

/// Index of a node inside its [`ExpressionTree`].
pub type NodeId = usize;

/// A node of an expression tree. Operator children are indices into the
/// same tree and always precede their parent.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Constant(f64),
    Variable(String),
    Operator {
        operator: Operator,
        left: NodeId,
        right: NodeId,
    },
}

/// A parsed arithmetic expression plus the values of its variables.
///
/// Nodes live in one vector in postfix order, so evaluation and teardown
/// never recurse, however long the formula.
#[derive(Clone, Debug)]
pub struct ExpressionTree {
    nodes: Vec<Node>,
    root: NodeId,
    variables: BTreeMap<String, f64>,
}

impl ExpressionTree {
    /// Parse an infix expression (without the leading `=`).
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        let postfix = to_postfix(expression)?;
        Self::from_postfix(&postfix)
    }

    /// Build a tree from postfix tokens.
    ///
    /// The first operand popped for an operator becomes its right child.
    /// Exactly one node must be left once every token is consumed.
    pub fn from_postfix(tokens: &[Token]) -> Result<Self, ParseError> {
        let mut nodes = Vec::with_capacity(tokens.len());
        let mut variables = BTreeMap::new();
        let mut stack: Vec<NodeId> = Vec::new();

        for token in tokens {
            let node = match token {
                Token::Operator(op) => {
                    let underflow = || ParseError::StackUnderflow {
                        operator: op.symbol(),
                    };
                    let right = stack.pop().ok_or_else(underflow)?;
                    let left = stack.pop().ok_or_else(underflow)?;
                    Node::Operator {
                        operator: *op,
                        left,
                        right,
                    }
                }
                Token::Operand(text) => match parse_number(text) {
                    Some(n) => Node::Constant(n),
                    None => {
                        let name = text.to_uppercase();
                        variables.insert(name.clone(), 0.0);
                        Node::Variable(name)
                    }
                },
            };
            stack.push(nodes.len());
            nodes.push(node);
        }

        let root = stack.pop().ok_or(ParseError::EmptyExpression)?;
        if !stack.is_empty() {
            return Err(ParseError::Leftover {
                count: stack.len() + 1,
            });
        }

        Ok(ExpressionTree {
            nodes,
            root,
            variables,
        })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Names of the variables the expression refers to, upper-cased and sorted.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Bind a value to a variable. Names are case-insensitive.
    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_uppercase(), value);
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(&name.to_uppercase()).copied()
    }

    /// Evaluate the tree. Unbound variables evaluate to 0.
    pub fn evaluate(&mut self) -> f64 {
        // Children precede parents, so one forward pass settles every node.
        let mut values: Vec<f64> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let value = match node {
                Node::Constant(n) => *n,
                Node::Variable(name) => *self.variables.entry(name.clone()).or_insert(0.0),
                Node::Operator {
                    operator,
                    left,
                    right,
                } => operator.apply(values[*left], values[*right]),
            };
            values.push(value);
        }
        values[self.root]
    }
}

/// Operands starting with a digit or `.` are numbers; everything else names
/// a variable.
fn parse_number(token: &str) -> Option<f64> {
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Evaluate a standalone expression with the given variable bindings.
pub fn evaluate_expression(
    expression: &str,
    bindings: &[(String, f64)],
) -> Result<f64, ParseError> {
    let mut tree = ExpressionTree::parse(expression)?;
    for (name, value) in bindings {
        tree.set_variable(name, *value);
    }
    Ok(tree.evaluate())
}
