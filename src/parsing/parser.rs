use chumsky::prelude::*;

use super::lexer::Token;
use crate::ast;
use crate::common::Span;

fn binary<P, O>(
    operand: P,
    operator: O,
) -> impl Parser<Token, ast::Expression, Error = Simple<Token, Span>> + Clone
where
    P: Parser<Token, ast::Expression, Error = Simple<Token, Span>> + Clone,
    O: Parser<Token, ast::BinaryOperator, Error = Simple<Token, Span>> + Clone,
{
    operand
        .clone()
        .then(
            operator
                .map_with_span(|op, span: Span| (op, span))
                .then(operand)
                .repeated(),
        )
        .foldl(|lhs, ((operator, operator_span), rhs)| {
            let span = lhs.span.to(rhs.span);
            ast::Expression {
                kind: ast::ExpressionKind::Binary {
                    operator,
                    operator_span,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            }
        })
}

pub fn parser() -> impl Parser<Token, ast::CompilationUnit, Error = Simple<Token, Span>> + Clone {
    let ident = select! { Token::Ident(name) => name }.labelled("identifier");
    let ident_span = ident.clone().map_with_span(|name, span: Span| (name, span));

    let expression = recursive(|expression| {
        let literal = select! {
            Token::Number(value) => ast::ExpressionKind::Integer(value),
            Token::True => ast::ExpressionKind::Boolean(true),
            Token::False => ast::ExpressionKind::Boolean(false),
            Token::String(value) => ast::ExpressionKind::String(value),
        }
        .labelled("value");

        let call = ident_span
            .clone()
            .then(
                expression
                    .clone()
                    .separated_by(just(Token::Comma))
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map(|((name, name_span), arguments)| ast::ExpressionKind::Call {
                name,
                name_span,
                arguments,
            });

        let name = ident.clone().map(ast::ExpressionKind::Name);

        let atom = literal
            .or(call)
            .or(name)
            .map_with_span(|kind, span| ast::Expression { kind, span })
            .or(expression
                .clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)));

        let unary_op = select! {
            Token::Positive => ast::UnaryOperator::Positive,
            Token::Negative => ast::UnaryOperator::Negative,
            Token::Not => ast::UnaryOperator::LogicalNot,
            Token::BitwiseNot => ast::UnaryOperator::BitwiseNot,
        }
        .map_with_span(|op, span: Span| (op, span));

        let unary = unary_op
            .repeated()
            .then(atom)
            .foldr(|(operator, operator_span), operand| {
                let span = operator_span.to(operand.span);
                ast::Expression {
                    kind: ast::ExpressionKind::Unary {
                        operator,
                        operator_span,
                        operand: Box::new(operand),
                    },
                    span,
                }
            });

        let factor = binary(
            unary,
            select! {
                Token::MultipliedBy => ast::BinaryOperator::Multiplication,
                Token::DividedBy => ast::BinaryOperator::Division,
                Token::Modulo => ast::BinaryOperator::Modulo,
            },
        );

        let term = binary(
            factor,
            select! {
                Token::Plus => ast::BinaryOperator::Addition,
                Token::Minus => ast::BinaryOperator::Subtraction,
            },
        );

        let comparison = binary(
            term,
            select! {
                Token::IsEqualTo => ast::BinaryOperator::Equality,
                Token::IsNotEqualTo => ast::BinaryOperator::Inequality,
                Token::IsGreaterThan => ast::BinaryOperator::Greater,
                Token::IsGreaterOrEqual => ast::BinaryOperator::GreaterOrEqual,
                Token::IsLessThan => ast::BinaryOperator::Less,
                Token::IsLessOrEqual => ast::BinaryOperator::LessOrEqual,
            },
        );

        let conjunction = binary(
            comparison,
            select! {
                Token::And => ast::BinaryOperator::LogicalAnd,
                Token::Ampersand => ast::BinaryOperator::BitwiseAnd,
            },
        );

        let disjunction = binary(
            conjunction,
            select! {
                Token::Or => ast::BinaryOperator::LogicalOr,
                Token::Pipe => ast::BinaryOperator::BitwiseOr,
                Token::Caret => ast::BinaryOperator::BitwiseXor,
            },
        );

        let assignment = ident_span
            .clone()
            .then_ignore(just(Token::Represents))
            .then(expression.clone())
            .map_with_span(|((name, name_span), value), span| ast::Expression {
                kind: ast::ExpressionKind::Assignment {
                    name,
                    name_span,
                    value: Box::new(value),
                },
                span,
            });

        assignment.or(disjunction)
    });

    let statement = recursive(|statement| {
        let block = just(Token::Colon)
            .ignore_then(statement.clone().repeated())
            .then_ignore(just(Token::Period))
            .map(ast::StatementKind::Block);

        let variable_declaration = just(Token::KwVariable)
            .to(false)
            .or(just(Token::KwConstant).to(true))
            .then(ident_span.clone())
            .then_ignore(just(Token::Represents))
            .then(expression.clone())
            .map(
                |((readonly, (name, name_span)), initializer)| {
                    ast::StatementKind::VariableDeclaration {
                        name,
                        name_span,
                        readonly,
                        initializer,
                    }
                },
            );

        let if_statement = just(Token::KwIf)
            .ignore_then(expression.clone())
            .then(statement.clone())
            .then(just(Token::KwElse).ignore_then(statement.clone()).or_not())
            .map(|((condition, then_branch), else_branch)| ast::StatementKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            });

        let while_statement = just(Token::KwWhile)
            .ignore_then(expression.clone())
            .then(statement.clone())
            .map(|(condition, body)| ast::StatementKind::While {
                condition,
                body: Box::new(body),
            });

        let for_statement = just(Token::KwFor)
            .ignore_then(ident_span.clone())
            .then_ignore(just(Token::Represents))
            .then(expression.clone())
            .then_ignore(just(Token::KwTo))
            .then(expression.clone())
            .then(statement.clone())
            .map(
                |((((variable, variable_span), lower), upper), body)| ast::StatementKind::For {
                    variable,
                    variable_span,
                    lower,
                    upper,
                    body: Box::new(body),
                },
            );

        let break_statement = just(Token::KwBreak).to(ast::StatementKind::Break);
        let continue_statement = just(Token::KwContinue).to(ast::StatementKind::Continue);

        let return_statement = just(Token::KwReturn)
            .ignore_then(expression.clone().or_not())
            .map(|expression| ast::StatementKind::Return { expression });

        let expression_statement = expression.clone().map(ast::StatementKind::Expression);

        choice((
            block,
            variable_declaration,
            if_statement,
            while_statement,
            for_statement,
            break_statement,
            continue_statement,
            return_statement,
            expression_statement,
        ))
        .map_with_span(|kind, span| ast::Statement { kind, span })
    });

    let type_clause = just(Token::KwAs)
        .ignore_then(ident_span.clone())
        .map(|(name, span)| ast::TypeClause { name, span });

    let parameter = ident_span
        .clone()
        .then(type_clause.clone())
        .map_with_span(|((name, _), ty), span| ast::Parameter { name, ty, span });

    let block_statement = just(Token::Colon)
        .ignore_then(statement.clone().repeated())
        .then_ignore(just(Token::Period))
        .map_with_span(|statements, span| ast::Statement {
            kind: ast::StatementKind::Block(statements),
            span,
        });

    let function = just(Token::KwFunction)
        .ignore_then(ident_span)
        .then(
            parameter
                .separated_by(just(Token::Comma))
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .then(type_clause.or_not())
        .then(block_statement)
        .map_with_span(|((((name, name_span), parameters), return_type), body), span| {
            ast::Member::Function(ast::FunctionDeclaration {
                name,
                name_span,
                parameters,
                return_type,
                body,
                span,
            })
        });

    let member = function.or(statement.map(ast::Member::Statement));

    member
        .repeated()
        .map(|members| ast::CompilationUnit { members })
        .then_ignore(end())
}
