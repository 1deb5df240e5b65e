//! The binary operators formulas may use.
//!
//! The operator set is closed, so it lives in a static table rather than
//! being discovered at runtime. The parser asks the table for precedence and
//! associativity, the tree builder asks it which node to build.

use std::fmt;

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// One row of the operator table.
#[derive(Clone, Copy, Debug)]
pub struct OperatorSpec {
    pub symbol: char,
    pub operator: Operator,
    pub precedence: u8,
    pub associativity: Associativity,
}

/// Every operator a formula can contain.
pub const OPERATORS: [OperatorSpec; 4] = [
    OperatorSpec {
        symbol: '+',
        operator: Operator::Add,
        precedence: 3,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        symbol: '-',
        operator: Operator::Subtract,
        precedence: 3,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        symbol: '*',
        operator: Operator::Multiply,
        precedence: 7,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        symbol: '/',
        operator: Operator::Divide,
        precedence: 7,
        associativity: Associativity::Left,
    },
];

impl Operator {
    /// Look up the operator for a symbol, if it is one.
    pub fn from_symbol(symbol: char) -> Option<Operator> {
        OPERATORS
            .iter()
            .find(|spec| spec.symbol == symbol)
            .map(|spec| spec.operator)
    }

    pub fn is_operator(symbol: char) -> bool {
        Self::from_symbol(symbol).is_some()
    }

    pub fn spec(self) -> &'static OperatorSpec {
        match self {
            Operator::Add => &OPERATORS[0],
            Operator::Subtract => &OPERATORS[1],
            Operator::Multiply => &OPERATORS[2],
            Operator::Divide => &OPERATORS[3],
        }
    }

    pub fn symbol(self) -> char {
        self.spec().symbol
    }

    pub fn precedence(self) -> u8 {
        self.spec().precedence
    }

    pub fn associativity(self) -> Associativity {
        self.spec().associativity
    }

    /// Combine two operands. Division by zero follows IEEE semantics.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
