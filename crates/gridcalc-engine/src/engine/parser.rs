//! Infix to postfix conversion (shunting-yard).
//!
//! Formulas are plain infix arithmetic: operands are runs of any characters
//! other than operators and parentheses, operators are single characters
//! from the operator table. There is no unary minus; an operator where an
//! operand is expected is rejected.

use std::fmt;

use thiserror::Error;

use super::operator::{Associativity, Operator};

/// Errors raised while turning formula text into an expression tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty expression")]
    EmptyExpression,

    #[error("Missing operand at position {position}")]
    EmptyOperand { position: usize },

    #[error("Unbalanced parenthesis at position {position}")]
    UnbalancedParens { position: usize },

    #[error("Operator '{operator}' is missing an operand")]
    StackUnderflow { operator: char },

    #[error("Expression leaves {count} operands without an operator")]
    Leftover { count: usize },
}

/// A token of a postfix expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Operand(String),
    Operator(Operator),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(s) => write!(f, "{}", s),
            Token::Operator(op) => write!(f, "{}", op),
        }
    }
}

enum Pending {
    Op(Operator),
    /// Opening parenthesis and the position it was found at.
    Paren(usize),
}

struct ShuntingYard<'a> {
    input: &'a str,
    output: Vec<Token>,
    stack: Vec<Pending>,
    operand_start: Option<usize>,
    expect_operand: bool,
}

impl<'a> ShuntingYard<'a> {
    fn new(input: &'a str) -> Self {
        ShuntingYard {
            input,
            output: Vec::new(),
            stack: Vec::new(),
            operand_start: None,
            expect_operand: true,
        }
    }

    fn flush_operand(&mut self, end: usize) {
        let Some(start) = self.operand_start.take() else {
            return;
        };
        let text = self.input[start..end].trim();
        if !text.is_empty() {
            self.output.push(Token::Operand(text.to_string()));
            self.expect_operand = false;
        }
    }

    fn push_operator(&mut self, op: Operator) {
        while let Some(Pending::Op(top)) = self.stack.last() {
            let top = *top;
            let binds_tighter = op.precedence() > top.precedence()
                || (op.precedence() == top.precedence()
                    && op.associativity() == Associativity::Right);
            if binds_tighter {
                break;
            }
            self.stack.pop();
            self.output.push(Token::Operator(top));
        }
        self.stack.push(Pending::Op(op));
    }

    fn close_paren(&mut self, position: usize) -> Result<(), ParseError> {
        loop {
            match self.stack.pop() {
                Some(Pending::Op(op)) => self.output.push(Token::Operator(op)),
                Some(Pending::Paren(_)) => return Ok(()),
                None => return Err(ParseError::UnbalancedParens { position }),
            }
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        for (pos, ch) in self.input.char_indices() {
            if ch == '(' {
                self.flush_operand(pos);
                self.stack.push(Pending::Paren(pos));
                self.expect_operand = true;
            } else if ch == ')' {
                self.flush_operand(pos);
                if self.expect_operand {
                    return Err(ParseError::EmptyOperand { position: pos });
                }
                self.close_paren(pos)?;
            } else if let Some(op) = Operator::from_symbol(ch) {
                self.flush_operand(pos);
                if self.expect_operand {
                    return Err(ParseError::EmptyOperand { position: pos });
                }
                self.push_operator(op);
                self.expect_operand = true;
            } else if self.operand_start.is_none() {
                self.operand_start = Some(pos);
            }
        }

        let end = self.input.len();
        self.flush_operand(end);
        if self.expect_operand {
            if self.output.is_empty() && self.stack.is_empty() {
                return Err(ParseError::EmptyExpression);
            }
            return Err(ParseError::EmptyOperand { position: end });
        }

        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Op(op) => self.output.push(Token::Operator(op)),
                Pending::Paren(position) => {
                    return Err(ParseError::UnbalancedParens { position });
                }
            }
        }

        Ok(self.output)
    }
}

/// Convert an infix expression into postfix tokens.
pub fn to_postfix(expression: &str) -> Result<Vec<Token>, ParseError> {
    ShuntingYard::new(expression).run()
}
