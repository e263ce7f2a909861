//! Bound tree
//!
//! The typed, name-resolved counterpart of the syntax tree. Every bound
//! expression knows its type; structured control statements exist only
//! until lowering replaces them with labels and gotos.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::binding::operators::{BinarySignature, UnarySignature};
use crate::diagnostics::Diagnostic;
use crate::symbols::{FunctionSymbol, SymbolCounter, SymbolId, Type, VariableSymbol};
use crate::value::Value;

/// A jump target inside one lowered body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: String) -> Self {
        Label(name)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum BoundExpression {
    Literal {
        value: Value,
    },

    Variable {
        variable: VariableSymbol,
    },

    Assignment {
        variable: VariableSymbol,
        value: Box<BoundExpression>,
    },

    Unary {
        operator: &'static UnarySignature,
        operand: Box<BoundExpression>,
    },

    Binary {
        operator: &'static BinarySignature,
        lhs: Box<BoundExpression>,
        rhs: Box<BoundExpression>,
    },

    Call {
        function: FunctionSymbol,
        arguments: Vec<BoundExpression>,
    },

    Conversion {
        ty: Type,
        expression: Box<BoundExpression>,
    },

    /// Stand-in after a reported problem; suppresses follow-up diagnostics
    Error,
}

impl BoundExpression {
    pub fn ty(&self) -> Type {
        match self {
            BoundExpression::Literal { value } => value.ty(),
            BoundExpression::Variable { variable } => variable.ty,
            BoundExpression::Assignment { variable, .. } => variable.ty,
            BoundExpression::Unary { operator, .. } => operator.result_type,
            BoundExpression::Binary { operator, .. } => operator.result_type,
            BoundExpression::Call { function, .. } => function.return_type,
            BoundExpression::Conversion { ty, .. } => *ty,
            BoundExpression::Error => Type::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BoundStatement {
    Block(Vec<BoundStatement>),

    VariableDeclaration {
        variable: VariableSymbol,
        initializer: BoundExpression,
    },

    Expression(BoundExpression),

    If {
        condition: BoundExpression,
        then_branch: Box<BoundStatement>,
        else_branch: Option<Box<BoundStatement>>,
    },

    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
        break_label: Label,
        continue_label: Label,
    },

    For {
        variable: VariableSymbol,
        lower: BoundExpression,
        upper: BoundExpression,
        body: Box<BoundStatement>,
        break_label: Label,
        continue_label: Label,
    },

    Label(Label),

    Goto(Label),

    ConditionalGoto {
        label: Label,
        condition: BoundExpression,
        jump_if_true: bool,
    },

    Return(Option<BoundExpression>),
}

/// A flat, lowered statement sequence
#[derive(Debug, Clone, Default)]
pub struct BoundBlockStatement {
    pub statements: Vec<BoundStatement>,
}

/// A function symbol together with its lowered body
#[derive(Debug)]
pub struct FunctionBody {
    pub function: FunctionSymbol,
    pub body: BoundBlockStatement,
}

/// The unit handed to the evaluator
///
/// Immutable once produced. `functions` accumulates the bodies of every
/// submission so far, so that calls bound in earlier submissions keep
/// working after a REPL continuation.
#[derive(Debug)]
pub struct BoundProgram {
    pub diagnostics: Vec<Diagnostic>,
    pub statement: BoundBlockStatement,
    pub functions: HashMap<SymbolId, Rc<FunctionBody>>,
    pub submitted_functions: Vec<Rc<FunctionBody>>,
    pub globals: Vec<VariableSymbol>,
    pub function_symbols: Vec<FunctionSymbol>,
    pub counter: SymbolCounter,
}

impl fmt::Display for BoundExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundExpression::Literal { value } => match value {
                Value::String(text) => write!(f, "{text:?}"),
                other => write!(f, "{other}"),
            },
            BoundExpression::Variable { variable } => write!(f, "{}", variable.name),
            BoundExpression::Assignment { variable, value } => {
                write!(f, "{} represents {value}", variable.name)
            }
            BoundExpression::Unary { operator, operand } => {
                write!(f, "{}{}{operand}", operator.operator, separator(operator.operator))
            }
            BoundExpression::Binary { operator, lhs, rhs } => {
                write!(f, "({lhs} {} {rhs})", operator.operator)
            }
            BoundExpression::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
            BoundExpression::Conversion { ty, expression } => write!(f, "{ty}({expression})"),
            BoundExpression::Error => write!(f, "?"),
        }
    }
}

// the word operator needs a space before its operand, the symbols do not
fn separator(operator: crate::ast::UnaryOperator) -> &'static str {
    match operator {
        crate::ast::UnaryOperator::LogicalNot => " ",
        _ => "",
    }
}

impl fmt::Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundStatement::Block(statements) => {
                write!(f, "block of {} statements", statements.len())
            }
            BoundStatement::VariableDeclaration {
                variable,
                initializer,
            } => {
                let keyword = if variable.readonly {
                    "constant"
                } else {
                    "variable"
                };
                write!(f, "{keyword} {} represents {initializer}", variable.name)
            }
            BoundStatement::Expression(expression) => write!(f, "{expression}"),
            BoundStatement::If { condition, .. } => write!(f, "if {condition}"),
            BoundStatement::While { condition, .. } => write!(f, "while {condition}"),
            BoundStatement::For { variable, .. } => write!(f, "for {}", variable.name),
            BoundStatement::Label(label) => write!(f, "{label}:"),
            BoundStatement::Goto(label) => write!(f, "goto {label}"),
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => {
                let polarity = if *jump_if_true { "if" } else { "unless" };
                write!(f, "goto {label} {polarity} {condition}")
            }
            BoundStatement::Return(None) => write!(f, "return"),
            BoundStatement::Return(Some(expression)) => write!(f, "return {expression}"),
        }
    }
}
