//! Lowering
//!
//! This module is responsible for rewriting the structured control flow of
//! a bound statement (`if`, `while`, `for`) into a flat statement list that
//! uses only labels, gotos and conditional gotos. The main interface is the
//! [lower] function.
//!
//! The rewrite is pure: every legality check already happened during
//! binding, so lowering reports nothing and cannot fail.

use crate::ast;
use crate::binding::{bind_binary, BoundBlockStatement, BoundExpression, BoundStatement, Label};
use crate::symbols::{SymbolCounter, Type, VariableKind, VariableSymbol};
use crate::value::Value;

/// Flatten a bound statement into label/goto form
pub fn lower(statement: BoundStatement, symbols: &mut SymbolCounter) -> BoundBlockStatement {
    let mut lowerer = Lowerer { labels: 0, symbols };
    let mut statements = Vec::new();
    lowerer.lower_statement(statement, &mut statements);
    BoundBlockStatement { statements }
}

/// The main state during lowering
///
/// Keeps track of which labels and compiler-generated variables are fresh.
struct Lowerer<'a> {
    labels: u32,
    symbols: &'a mut SymbolCounter,
}

impl Lowerer<'_> {
    fn fresh_label(&mut self) -> Label {
        self.labels += 1;
        Label::new(format!("label{}", self.labels))
    }

    fn lower_statement(&mut self, statement: BoundStatement, out: &mut Vec<BoundStatement>) {
        match statement {
            BoundStatement::Block(statements) => {
                for statement in statements {
                    self.lower_statement(statement, out);
                }
            }

            BoundStatement::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                None => {
                    // jump past the branch when the condition is false
                    let end_label = self.fresh_label();
                    out.push(BoundStatement::ConditionalGoto {
                        label: end_label.clone(),
                        condition,
                        jump_if_true: false,
                    });
                    self.lower_statement(*then_branch, out);
                    out.push(BoundStatement::Label(end_label));
                }
                Some(else_branch) => {
                    let else_label = self.fresh_label();
                    let end_label = self.fresh_label();
                    out.push(BoundStatement::ConditionalGoto {
                        label: else_label.clone(),
                        condition,
                        jump_if_true: false,
                    });
                    self.lower_statement(*then_branch, out);
                    out.push(BoundStatement::Goto(end_label.clone()));
                    out.push(BoundStatement::Label(else_label));
                    self.lower_statement(*else_branch, out);
                    out.push(BoundStatement::Label(end_label));
                }
            },

            BoundStatement::While {
                condition,
                body,
                break_label,
                continue_label,
            } => {
                // continue re-checks the condition at the loop head
                out.push(BoundStatement::Label(continue_label.clone()));
                out.push(BoundStatement::ConditionalGoto {
                    label: break_label.clone(),
                    condition,
                    jump_if_true: false,
                });
                self.lower_statement(*body, out);
                out.push(BoundStatement::Goto(continue_label));
                out.push(BoundStatement::Label(break_label));
            }

            BoundStatement::For {
                variable,
                lower,
                upper,
                body,
                break_label,
                continue_label,
            } => {
                let rewritten =
                    self.desugar_for(variable, lower, upper, *body, break_label, continue_label);
                for statement in rewritten {
                    self.lower_statement(statement, out);
                }
            }

            other => out.push(other),
        }
    }

    /// `for i represents a to b` becomes a while loop over `i`, with the
    /// upper bound evaluated once into a fresh local and the continue label
    /// placed just before the increment
    fn desugar_for(
        &mut self,
        variable: VariableSymbol,
        lower: BoundExpression,
        upper: BoundExpression,
        body: BoundStatement,
        break_label: Label,
        continue_label: Label,
    ) -> Vec<BoundStatement> {
        let upper_bound = VariableSymbol {
            id: self.symbols.fresh(),
            name: String::from("upperBound"),
            readonly: true,
            ty: Type::Integer,
            kind: VariableKind::Local,
        };

        let comparison = bind_binary(
            ast::BinaryOperator::LessOrEqual,
            Type::Integer,
            Type::Integer,
        )
        .expect("integer comparison is a defined operator");
        let addition = bind_binary(ast::BinaryOperator::Addition, Type::Integer, Type::Integer)
            .expect("integer addition is a defined operator");

        let condition = BoundExpression::Binary {
            operator: comparison,
            lhs: Box::new(BoundExpression::Variable {
                variable: variable.clone(),
            }),
            rhs: Box::new(BoundExpression::Variable {
                variable: upper_bound.clone(),
            }),
        };

        let increment = BoundStatement::Expression(BoundExpression::Assignment {
            variable: variable.clone(),
            value: Box::new(BoundExpression::Binary {
                operator: addition,
                lhs: Box::new(BoundExpression::Variable {
                    variable: variable.clone(),
                }),
                rhs: Box::new(BoundExpression::Literal {
                    value: Value::Integer(1),
                }),
            }),
        });

        let while_body = BoundStatement::Block(vec![
            body,
            BoundStatement::Label(continue_label),
            increment,
        ]);

        vec![
            BoundStatement::VariableDeclaration {
                variable,
                initializer: lower,
            },
            BoundStatement::VariableDeclaration {
                variable: upper_bound,
                initializer: upper,
            },
            BoundStatement::While {
                condition,
                body: Box::new(while_body),
                break_label,
                continue_label: self.fresh_label(),
            },
        ]
    }
}
