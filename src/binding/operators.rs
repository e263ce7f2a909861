//! Operator signatures and conversions
//!
//! A fixed table of the legal unary and binary operator signatures.
//! Resolution is exact-match only; a missing entry is not an error here,
//! the binder turns it into a diagnostic.

use crate::ast;
use crate::symbols::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    BitwiseNegation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, PartialEq)]
pub struct UnarySignature {
    pub operator: ast::UnaryOperator,
    pub kind: UnaryOperatorKind,
    pub operand_type: Type,
    pub result_type: Type,
}

#[derive(Debug, PartialEq)]
pub struct BinarySignature {
    pub operator: ast::BinaryOperator,
    pub kind: BinaryOperatorKind,
    pub left_type: Type,
    pub right_type: Type,
    pub result_type: Type,
}

const fn unary(
    operator: ast::UnaryOperator,
    kind: UnaryOperatorKind,
    operand_type: Type,
) -> UnarySignature {
    UnarySignature {
        operator,
        kind,
        operand_type,
        result_type: operand_type,
    }
}

const fn binary(
    operator: ast::BinaryOperator,
    kind: BinaryOperatorKind,
    operand_type: Type,
    result_type: Type,
) -> BinarySignature {
    BinarySignature {
        operator,
        kind,
        left_type: operand_type,
        right_type: operand_type,
        result_type,
    }
}

const UNARY_OPERATORS: &[UnarySignature] = &[
    unary(
        ast::UnaryOperator::LogicalNot,
        UnaryOperatorKind::LogicalNegation,
        Type::Boolean,
    ),
    unary(
        ast::UnaryOperator::Positive,
        UnaryOperatorKind::Identity,
        Type::Integer,
    ),
    unary(
        ast::UnaryOperator::Negative,
        UnaryOperatorKind::Negation,
        Type::Integer,
    ),
    unary(
        ast::UnaryOperator::BitwiseNot,
        UnaryOperatorKind::BitwiseNegation,
        Type::Integer,
    ),
];

const BINARY_OPERATORS: &[BinarySignature] = &[
    binary(
        ast::BinaryOperator::Addition,
        BinaryOperatorKind::Addition,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::Subtraction,
        BinaryOperatorKind::Subtraction,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::Multiplication,
        BinaryOperatorKind::Multiplication,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::Division,
        BinaryOperatorKind::Division,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::Modulo,
        BinaryOperatorKind::Modulo,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::BitwiseAnd,
        BinaryOperatorKind::BitwiseAnd,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::BitwiseOr,
        BinaryOperatorKind::BitwiseOr,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::BitwiseXor,
        BinaryOperatorKind::BitwiseXor,
        Type::Integer,
        Type::Integer,
    ),
    binary(
        ast::BinaryOperator::Greater,
        BinaryOperatorKind::Greater,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Less,
        BinaryOperatorKind::Less,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::GreaterOrEqual,
        BinaryOperatorKind::GreaterOrEquals,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::LessOrEqual,
        BinaryOperatorKind::LessOrEquals,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Equality,
        BinaryOperatorKind::Equals,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Inequality,
        BinaryOperatorKind::NotEquals,
        Type::Integer,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::LogicalAnd,
        BinaryOperatorKind::LogicalAnd,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::LogicalOr,
        BinaryOperatorKind::LogicalOr,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Equality,
        BinaryOperatorKind::Equals,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Inequality,
        BinaryOperatorKind::NotEquals,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::BitwiseAnd,
        BinaryOperatorKind::BitwiseAnd,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::BitwiseOr,
        BinaryOperatorKind::BitwiseOr,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::BitwiseXor,
        BinaryOperatorKind::BitwiseXor,
        Type::Boolean,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Addition,
        BinaryOperatorKind::Addition,
        Type::String,
        Type::String,
    ),
    binary(
        ast::BinaryOperator::Equality,
        BinaryOperatorKind::Equals,
        Type::String,
        Type::Boolean,
    ),
    binary(
        ast::BinaryOperator::Inequality,
        BinaryOperatorKind::NotEquals,
        Type::String,
        Type::Boolean,
    ),
];

/// Resolve a unary operator against an operand type
pub fn bind_unary(
    operator: ast::UnaryOperator,
    operand_type: Type,
) -> Option<&'static UnarySignature> {
    UNARY_OPERATORS
        .iter()
        .find(|op| op.operator == operator && op.operand_type == operand_type)
}

/// Resolve a binary operator against its operand types
pub fn bind_binary(
    operator: ast::BinaryOperator,
    left_type: Type,
    right_type: Type,
) -> Option<&'static BinarySignature> {
    BINARY_OPERATORS.iter().find(|op| {
        op.operator == operator && op.left_type == left_type && op.right_type == right_type
    })
}

/// How one type converts into another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Same type, no conversion node needed
    Identity,
    /// Legal only through an explicit cast
    Explicit,
}

/// Classify the conversion from one type to another, if any exists
pub fn classify_conversion(from: Type, to: Type) -> Option<Conversion> {
    if from == to {
        return Some(Conversion::Identity);
    }

    match (from, to) {
        (Type::Integer | Type::Boolean, Type::String) => Some(Conversion::Explicit),
        (Type::String, Type::Integer | Type::Boolean) => Some(Conversion::Explicit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        assert!(bind_binary(ast::BinaryOperator::Addition, Type::Integer, Type::Integer).is_some());
        assert!(bind_binary(ast::BinaryOperator::Addition, Type::Integer, Type::Boolean).is_none());
        assert!(bind_binary(ast::BinaryOperator::Addition, Type::String, Type::String).is_some());
        assert!(bind_binary(ast::BinaryOperator::Multiplication, Type::String, Type::String).is_none());
    }

    #[test]
    fn comparisons_yield_booleans() {
        let op = bind_binary(ast::BinaryOperator::Less, Type::Integer, Type::Integer).unwrap();
        assert_eq!(op.result_type, Type::Boolean);
    }

    #[test]
    fn integer_and_boolean_do_not_convert() {
        assert_eq!(classify_conversion(Type::Integer, Type::Boolean), None);
        assert_eq!(
            classify_conversion(Type::Integer, Type::String),
            Some(Conversion::Explicit)
        );
        assert_eq!(
            classify_conversion(Type::Integer, Type::Integer),
            Some(Conversion::Identity)
        );
    }
}
