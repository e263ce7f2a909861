//! Syntax tree
//!
//! The immutable tree produced by [parse](crate::parse). Every node
//! carries its source span; the binder consumes the tree read-only.

use crate::common::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Function(FunctionDeclaration),
    Statement(Statement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub name_span: Span,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeClause>,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeClause,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeClause {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Block(Vec<Statement>),

    VariableDeclaration {
        name: String,
        name_span: Span,
        readonly: bool,
        initializer: Expression,
    },

    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    While {
        condition: Expression,
        body: Box<Statement>,
    },

    For {
        variable: String,
        variable_span: Span,
        lower: Expression,
        upper: Expression,
        body: Box<Statement>,
    },

    Break,
    Continue,

    Return {
        expression: Option<Expression>,
    },

    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Integer(i64),
    Boolean(bool),
    String(String),
    Name(String),

    Assignment {
        name: String,
        name_span: Span,
        value: Box<Expression>,
    },

    Unary {
        operator: UnaryOperator,
        operator_span: Span,
        operand: Box<Expression>,
    },

    Binary {
        operator: BinaryOperator,
        operator_span: Span,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    Call {
        name: String,
        name_span: Span,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Positive,
    Negative,
    LogicalNot,
    BitwiseNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Equality,
    Inequality,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

use ptree::{print_tree, Style, TreeItem};
use std::borrow::Cow;
use std::{fmt, io};

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Positive => write!(f, "+"),
            UnaryOperator::Negative => write!(f, "-"),
            UnaryOperator::LogicalNot => write!(f, "not"),
            UnaryOperator::BitwiseNot => write!(f, "~"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Addition => write!(f, "plus"),
            BinaryOperator::Subtraction => write!(f, "minus"),
            BinaryOperator::Multiplication => write!(f, "multiplied by"),
            BinaryOperator::Division => write!(f, "divided by"),
            BinaryOperator::Modulo => write!(f, "modulo"),
            BinaryOperator::Equality => write!(f, "is equal to"),
            BinaryOperator::Inequality => write!(f, "is not equal to"),
            BinaryOperator::Greater => write!(f, "is greater than"),
            BinaryOperator::GreaterOrEqual => write!(f, "is greater than or equal to"),
            BinaryOperator::Less => write!(f, "is less than"),
            BinaryOperator::LessOrEqual => write!(f, "is less than or equal to"),
            BinaryOperator::LogicalAnd => write!(f, "and"),
            BinaryOperator::LogicalOr => write!(f, "or"),
            BinaryOperator::BitwiseAnd => write!(f, "&"),
            BinaryOperator::BitwiseOr => write!(f, "|"),
            BinaryOperator::BitwiseXor => write!(f, "^"),
        }
    }
}

impl CompilationUnit {
    pub fn pretty_print(&self) -> io::Result<()> {
        for member in &self.members {
            match member {
                Member::Function(function) => print_tree(&Node::Function(function.clone()))?,
                Member::Statement(statement) => print_tree(&Node::Statement(statement.clone()))?,
            }
        }
        Ok(())
    }
}

/// A uniform view over the syntax tree for ptree
#[derive(Debug, Clone)]
enum Node {
    Function(FunctionDeclaration),
    Statement(Statement),
    Expression(Expression),
}

impl TreeItem for Node {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        match self {
            Node::Function(function) => {
                let mut signature = format!("function {}(", function.name);
                for (i, parameter) in function.parameters.iter().enumerate() {
                    signature.push_str(&parameter.name);
                    signature.push_str(" as ");
                    signature.push_str(&parameter.ty.name);
                    if i != function.parameters.len() - 1 {
                        signature.push_str(", ");
                    }
                }
                signature.push(')');
                if let Some(clause) = &function.return_type {
                    signature.push_str(" as ");
                    signature.push_str(&clause.name);
                }
                write!(f, "{}", style.paint(signature))
            }
            Node::Statement(statement) => match &statement.kind {
                StatementKind::Block(_) => write!(f, "{}", style.paint("block")),
                StatementKind::VariableDeclaration { name, readonly, .. } => {
                    let keyword = if *readonly { "constant" } else { "variable" };
                    write!(f, "{}", style.paint(format!("{keyword} {name} represents")))
                }
                StatementKind::If { .. } => write!(f, "{}", style.paint("if")),
                StatementKind::While { .. } => write!(f, "{}", style.paint("while")),
                StatementKind::For { variable, .. } => {
                    write!(f, "{}", style.paint(format!("for {variable}")))
                }
                StatementKind::Break => write!(f, "{}", style.paint("break")),
                StatementKind::Continue => write!(f, "{}", style.paint("continue")),
                StatementKind::Return { .. } => write!(f, "{}", style.paint("return")),
                StatementKind::Expression(_) => write!(f, "{}", style.paint("expression")),
            },
            Node::Expression(expression) => match &expression.kind {
                ExpressionKind::Integer(value) => write!(f, "{}", style.paint(value)),
                ExpressionKind::Boolean(value) => write!(f, "{}", style.paint(value)),
                ExpressionKind::String(value) => write!(f, "{}", style.paint(format!("{value:?}"))),
                ExpressionKind::Name(name) => write!(f, "{}", style.paint(name)),
                ExpressionKind::Assignment { name, .. } => {
                    write!(f, "{}", style.paint(format!("{name} represents")))
                }
                ExpressionKind::Unary { operator, .. } => write!(f, "{}", style.paint(operator)),
                ExpressionKind::Binary { operator, .. } => write!(f, "{}", style.paint(operator)),
                ExpressionKind::Call { name, .. } => {
                    write!(f, "{}", style.paint(format!("call {name}")))
                }
            },
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let children = match self {
            Node::Function(function) => vec![Node::Statement(function.body.clone())],
            Node::Statement(statement) => match &statement.kind {
                StatementKind::Block(statements) => {
                    statements.iter().cloned().map(Node::Statement).collect()
                }
                StatementKind::VariableDeclaration { initializer, .. } => {
                    vec![Node::Expression(initializer.clone())]
                }
                StatementKind::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    let mut children = vec![
                        Node::Expression(condition.clone()),
                        Node::Statement(then_branch.as_ref().clone()),
                    ];
                    if let Some(else_branch) = else_branch {
                        children.push(Node::Statement(else_branch.as_ref().clone()));
                    }
                    children
                }
                StatementKind::While { condition, body } => vec![
                    Node::Expression(condition.clone()),
                    Node::Statement(body.as_ref().clone()),
                ],
                StatementKind::For {
                    lower, upper, body, ..
                } => vec![
                    Node::Expression(lower.clone()),
                    Node::Expression(upper.clone()),
                    Node::Statement(body.as_ref().clone()),
                ],
                StatementKind::Break | StatementKind::Continue => Vec::new(),
                StatementKind::Return { expression } => {
                    expression.iter().cloned().map(Node::Expression).collect()
                }
                StatementKind::Expression(expression) => {
                    vec![Node::Expression(expression.clone())]
                }
            },
            Node::Expression(expression) => match &expression.kind {
                ExpressionKind::Integer(_)
                | ExpressionKind::Boolean(_)
                | ExpressionKind::String(_)
                | ExpressionKind::Name(_) => Vec::new(),
                ExpressionKind::Assignment { value, .. } => {
                    vec![Node::Expression(value.as_ref().clone())]
                }
                ExpressionKind::Unary { operand, .. } => {
                    vec![Node::Expression(operand.as_ref().clone())]
                }
                ExpressionKind::Binary { lhs, rhs, .. } => vec![
                    Node::Expression(lhs.as_ref().clone()),
                    Node::Expression(rhs.as_ref().clone()),
                ],
                ExpressionKind::Call { arguments, .. } => {
                    arguments.iter().cloned().map(Node::Expression).collect()
                }
            },
        };

        Cow::from(children)
    }
}
