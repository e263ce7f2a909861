//! Binding
//!
//! The binder walks the syntax tree, resolves names against the scope
//! chain, assigns a type to every expression and produces a typed bound
//! tree plus the pass's diagnostics. It never stops at the first problem:
//! after reporting, it substitutes a best-effort node (or the error type)
//! so that binding of sibling nodes continues and every genuine problem is
//! reported exactly once.

mod bound;
mod operators;
mod scope;

pub use bound::{
    BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement, FunctionBody, Label,
};
pub use operators::{
    bind_binary, bind_unary, classify_conversion, BinaryOperatorKind, BinarySignature,
    Conversion, UnaryOperatorKind, UnarySignature,
};
pub use scope::{ScopeId, Scopes, Symbol};

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast;
use crate::common::Span;
use crate::diagnostics::Diagnostic;
use crate::symbols::{
    builtin_functions, FunctionSymbol, SymbolCounter, Type, VariableKind, VariableSymbol,
};
use crate::value::Value;
use crate::{flow, lowering};

/// Bind a compilation unit, optionally continuing from a previous program
///
/// The previous program seeds the new pass with its declared globals,
/// functions and symbol counter, which is what gives the REPL its
/// continuation semantics.
pub fn bind_program(previous: Option<&BoundProgram>, unit: &ast::CompilationUnit) -> BoundProgram {
    let mut scopes = Scopes::default();
    let root = scopes.open(None);
    for function in builtin_functions() {
        scopes.declare(root, Symbol::Function(function));
    }

    let (counter, inherited_globals, inherited_functions, inherited_bodies) = match previous {
        Some(previous) => (
            previous.counter,
            previous.globals.clone(),
            previous.function_symbols.clone(),
            previous.functions.clone(),
        ),
        None => (
            SymbolCounter::default(),
            Vec::new(),
            Vec::new(),
            HashMap::new(),
        ),
    };

    // earlier submissions live in a scope between the builtins and this
    // submission, so re-declaring one of their names is legal shadowing
    let mut parent = root;
    if !inherited_globals.is_empty() || !inherited_functions.is_empty() {
        let seed = scopes.open(Some(root));
        for function in &inherited_functions {
            scopes.declare_or_replace(seed, Symbol::Function(function.clone()));
        }
        for variable in &inherited_globals {
            scopes.declare_or_replace(seed, Symbol::Variable(variable.clone()));
        }
        parent = seed;
    }

    let global_scope = scopes.open(Some(parent));

    let mut binder = Binder {
        scopes,
        scope: global_scope,
        diagnostics: Vec::new(),
        symbols: counter,
        labels: 0,
        function: None,
        loops: Vec::new(),
    };

    // declare every function signature first so that bodies and global
    // statements can call them regardless of declaration order
    let mut declared = Vec::new();
    for member in &unit.members {
        if let ast::Member::Function(declaration) = member {
            if let Some(symbol) = binder.bind_function_declaration(declaration) {
                declared.push((symbol, declaration));
            }
        }
    }

    let mut statements = Vec::new();
    for member in &unit.members {
        if let ast::Member::Statement(statement) = member {
            statements.push(binder.bind_statement(statement));
        }
    }

    let mut functions = inherited_bodies;
    let mut submitted_functions = Vec::new();
    for (symbol, declaration) in declared {
        let body = binder.bind_function_body(&symbol, declaration);
        let function_body = Rc::new(FunctionBody {
            function: symbol.clone(),
            body,
        });
        functions.insert(symbol.id, Rc::clone(&function_body));
        submitted_functions.push(function_body);
    }

    let statement = lowering::lower(BoundStatement::Block(statements), &mut binder.symbols);

    let mut globals = inherited_globals;
    merge_by_name(
        &mut globals,
        binder.scopes.declared_variables(global_scope),
        |variable| &variable.name,
    );

    let mut function_symbols = inherited_functions;
    merge_by_name(
        &mut function_symbols,
        binder.scopes.declared_functions(global_scope),
        |function| &function.name,
    );

    BoundProgram {
        diagnostics: binder.diagnostics,
        statement,
        functions,
        submitted_functions,
        globals,
        function_symbols,
        counter: binder.symbols,
    }
}

// the latest declaration of a name wins across submissions
fn merge_by_name<T>(accumulated: &mut Vec<T>, fresh: Vec<T>, name: impl Fn(&T) -> &str) {
    for item in fresh {
        match accumulated
            .iter_mut()
            .find(|existing| name(existing) == name(&item))
        {
            Some(existing) => *existing = item,
            None => accumulated.push(item),
        }
    }
}

struct Binder {
    scopes: Scopes,
    scope: ScopeId,
    diagnostics: Vec<Diagnostic>,
    symbols: SymbolCounter,
    labels: u32,
    function: Option<FunctionSymbol>,
    loops: Vec<(Label, Label)>,
}

impl Binder {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn bind_type_clause(&mut self, clause: &ast::TypeClause) -> Type {
        match Type::lookup(&clause.name) {
            Some(ty) => ty,
            None => {
                self.report(Diagnostic::UndefinedType {
                    name: clause.name.clone(),
                    span: clause.span,
                });
                Type::Error
            }
        }
    }

    fn bind_function_declaration(
        &mut self,
        declaration: &ast::FunctionDeclaration,
    ) -> Option<FunctionSymbol> {
        let mut parameters: Vec<VariableSymbol> = Vec::new();
        for parameter in &declaration.parameters {
            if parameters.iter().any(|p| p.name == parameter.name) {
                self.report(Diagnostic::ParameterAlreadyDeclared {
                    name: parameter.name.clone(),
                    span: parameter.span,
                });
                continue;
            }
            let ty = self.bind_type_clause(&parameter.ty);
            parameters.push(VariableSymbol {
                id: self.symbols.fresh(),
                name: parameter.name.clone(),
                readonly: true,
                ty,
                kind: VariableKind::Parameter,
            });
        }

        let return_type = match &declaration.return_type {
            Some(clause) => self.bind_type_clause(clause),
            None => Type::Void,
        };

        let symbol = FunctionSymbol {
            id: self.symbols.fresh(),
            name: declaration.name.clone(),
            name_span: declaration.name_span,
            parameters,
            return_type,
        };

        if !self.scopes.declare(self.scope, Symbol::Function(symbol.clone())) {
            self.report(Diagnostic::AlreadyDeclared {
                name: declaration.name.clone(),
                span: declaration.name_span,
            });
            return None;
        }

        Some(symbol)
    }

    fn bind_function_body(
        &mut self,
        symbol: &FunctionSymbol,
        declaration: &ast::FunctionDeclaration,
    ) -> BoundBlockStatement {
        let enclosing = self.scope;
        self.scope = self.scopes.open(Some(enclosing));
        for parameter in &symbol.parameters {
            self.scopes
                .declare(self.scope, Symbol::Variable(parameter.clone()));
        }

        self.function = Some(symbol.clone());
        let body = self.bind_statement(&declaration.body);
        self.function = None;
        self.scope = enclosing;

        let lowered = lowering::lower(body, &mut self.symbols);

        if symbol.return_type != Type::Void
            && symbol.return_type != Type::Error
            && !flow::all_paths_return(&lowered)
        {
            self.report(Diagnostic::AllPathsMustReturn {
                span: symbol.name_span,
            });
        }

        lowered
    }

    fn bind_statement(&mut self, statement: &ast::Statement) -> BoundStatement {
        match &statement.kind {
            ast::StatementKind::Block(statements) => {
                let enclosing = self.scope;
                self.scope = self.scopes.open(Some(enclosing));
                let statements = statements.iter().map(|s| self.bind_statement(s)).collect();
                self.scope = enclosing;
                BoundStatement::Block(statements)
            }

            ast::StatementKind::VariableDeclaration {
                name,
                name_span,
                readonly,
                initializer,
            } => {
                let initializer = self.bind_value_expression(initializer);
                let variable = self.bind_variable(name, *name_span, *readonly, initializer.ty());
                BoundStatement::VariableDeclaration {
                    variable,
                    initializer,
                }
            }

            ast::StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.bind_conversion(condition, Type::Boolean, false);
                let then_branch = Box::new(self.bind_statement(then_branch));
                let else_branch = else_branch
                    .as_ref()
                    .map(|statement| Box::new(self.bind_statement(statement)));
                BoundStatement::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }

            ast::StatementKind::While { condition, body } => {
                let condition = self.bind_conversion(condition, Type::Boolean, false);
                let (body, break_label, continue_label) = self.bind_loop_body(body);
                BoundStatement::While {
                    condition,
                    body: Box::new(body),
                    break_label,
                    continue_label,
                }
            }

            ast::StatementKind::For {
                variable,
                variable_span,
                lower,
                upper,
                body,
            } => {
                let lower = self.bind_conversion(lower, Type::Integer, false);
                let upper = self.bind_conversion(upper, Type::Integer, false);

                let enclosing = self.scope;
                self.scope = self.scopes.open(Some(enclosing));
                let variable = self.bind_variable(variable, *variable_span, true, Type::Integer);
                let (body, break_label, continue_label) = self.bind_loop_body(body);
                self.scope = enclosing;

                BoundStatement::For {
                    variable,
                    lower,
                    upper,
                    body: Box::new(body),
                    break_label,
                    continue_label,
                }
            }

            ast::StatementKind::Break => match self.loops.last() {
                Some((break_label, _)) => BoundStatement::Goto(break_label.clone()),
                None => {
                    self.report(Diagnostic::InvalidBreakOrContinue {
                        keyword: "break",
                        span: statement.span,
                    });
                    BoundStatement::Expression(BoundExpression::Error)
                }
            },

            ast::StatementKind::Continue => match self.loops.last() {
                Some((_, continue_label)) => BoundStatement::Goto(continue_label.clone()),
                None => {
                    self.report(Diagnostic::InvalidBreakOrContinue {
                        keyword: "continue",
                        span: statement.span,
                    });
                    BoundStatement::Expression(BoundExpression::Error)
                }
            },

            ast::StatementKind::Return { expression } => {
                self.bind_return(expression.as_ref(), statement.span)
            }

            ast::StatementKind::Expression(expression) => {
                BoundStatement::Expression(self.bind_expression(expression))
            }
        }
    }

    fn bind_variable(
        &mut self,
        name: &str,
        span: Span,
        readonly: bool,
        ty: Type,
    ) -> VariableSymbol {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };

        let variable = VariableSymbol {
            id: self.symbols.fresh(),
            name: name.to_string(),
            readonly,
            ty,
            kind,
        };

        if !self
            .scopes
            .declare(self.scope, Symbol::Variable(variable.clone()))
        {
            self.report(Diagnostic::AlreadyDeclared {
                name: name.to_string(),
                span,
            });
        }

        variable
    }

    fn bind_loop_body(&mut self, body: &ast::Statement) -> (BoundStatement, Label, Label) {
        self.labels += 1;
        let break_label = Label::new(format!("break{}", self.labels));
        let continue_label = Label::new(format!("continue{}", self.labels));

        self.loops
            .push((break_label.clone(), continue_label.clone()));
        let body = self.bind_statement(body);
        self.loops.pop();

        (body, break_label, continue_label)
    }

    fn bind_return(
        &mut self,
        expression: Option<&ast::Expression>,
        span: Span,
    ) -> BoundStatement {
        match self.function.clone() {
            None => {
                self.report(Diagnostic::InvalidReturn { span });
                let expression = expression.map(|e| self.bind_value_expression(e));
                BoundStatement::Return(expression)
            }
            Some(function) => match expression {
                Some(expression) if function.return_type == Type::Void => {
                    self.report(Diagnostic::InvalidReturnExpression {
                        name: function.name.clone(),
                        span: expression.span,
                    });
                    let bound = self.bind_value_expression(expression);
                    BoundStatement::Return(Some(bound))
                }
                Some(expression) => {
                    let bound = self.bind_conversion(expression, function.return_type, false);
                    BoundStatement::Return(Some(bound))
                }
                None if function.return_type != Type::Void
                    && function.return_type != Type::Error =>
                {
                    self.report(Diagnostic::MissingReturnExpression {
                        return_type: function.return_type,
                        span,
                    });
                    BoundStatement::Return(None)
                }
                None => BoundStatement::Return(None),
            },
        }
    }

    fn bind_expression(&mut self, expression: &ast::Expression) -> BoundExpression {
        match &expression.kind {
            ast::ExpressionKind::Integer(value) => BoundExpression::Literal {
                value: Value::Integer(*value),
            },
            ast::ExpressionKind::Boolean(value) => BoundExpression::Literal {
                value: Value::Boolean(*value),
            },
            ast::ExpressionKind::String(value) => BoundExpression::Literal {
                value: Value::String(value.clone()),
            },

            ast::ExpressionKind::Name(name) => self.bind_name(name, expression.span),

            ast::ExpressionKind::Assignment {
                name,
                name_span,
                value,
            } => self.bind_assignment(name, *name_span, value),

            ast::ExpressionKind::Unary {
                operator,
                operator_span,
                operand,
            } => {
                let operand = self.bind_value_expression(operand);
                if operand.ty() == Type::Error {
                    return BoundExpression::Error;
                }
                match operators::bind_unary(*operator, operand.ty()) {
                    Some(op) => BoundExpression::Unary {
                        operator: op,
                        operand: Box::new(operand),
                    },
                    None => {
                        self.report(Diagnostic::UndefinedUnaryOperator {
                            operator: *operator,
                            operand: operand.ty(),
                            span: *operator_span,
                        });
                        // best-effort recovery: keep the operand
                        operand
                    }
                }
            }

            ast::ExpressionKind::Binary {
                operator,
                operator_span,
                lhs,
                rhs,
            } => {
                let lhs = self.bind_value_expression(lhs);
                let rhs = self.bind_value_expression(rhs);
                if lhs.ty() == Type::Error || rhs.ty() == Type::Error {
                    return BoundExpression::Error;
                }
                match operators::bind_binary(*operator, lhs.ty(), rhs.ty()) {
                    Some(op) => BoundExpression::Binary {
                        operator: op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    None => {
                        self.report(Diagnostic::UndefinedBinaryOperator {
                            operator: *operator,
                            left: lhs.ty(),
                            right: rhs.ty(),
                            span: *operator_span,
                        });
                        // best-effort recovery: keep the left operand
                        lhs
                    }
                }
            }

            ast::ExpressionKind::Call {
                name,
                name_span,
                arguments,
            } => self.bind_call(name, *name_span, arguments, expression.span),
        }
    }

    /// Bind an expression that is required to produce a value
    fn bind_value_expression(&mut self, expression: &ast::Expression) -> BoundExpression {
        let bound = self.bind_expression(expression);
        if bound.ty() == Type::Void {
            self.report(Diagnostic::ExpressionMustHaveValue {
                span: expression.span,
            });
            return BoundExpression::Error;
        }
        bound
    }

    fn bind_name(&mut self, name: &str, span: Span) -> BoundExpression {
        match self.scopes.lookup(self.scope, name).cloned() {
            Some(Symbol::Variable(variable)) => BoundExpression::Variable { variable },
            Some(Symbol::Function(_)) => {
                self.report(Diagnostic::NotAVariable {
                    name: name.to_string(),
                    span,
                });
                BoundExpression::Error
            }
            None => {
                self.report(Diagnostic::UndefinedVariable {
                    name: name.to_string(),
                    span,
                });
                BoundExpression::Error
            }
        }
    }

    fn bind_assignment(
        &mut self,
        name: &str,
        name_span: Span,
        value: &ast::Expression,
    ) -> BoundExpression {
        let bound_value = self.bind_value_expression(value);

        let variable = match self.scopes.lookup(self.scope, name).cloned() {
            Some(Symbol::Variable(variable)) => variable,
            Some(Symbol::Function(_)) => {
                self.report(Diagnostic::NotAVariable {
                    name: name.to_string(),
                    span: name_span,
                });
                return bound_value;
            }
            None => {
                self.report(Diagnostic::UndefinedVariable {
                    name: name.to_string(),
                    span: name_span,
                });
                return bound_value;
            }
        };

        if variable.readonly {
            self.report(Diagnostic::CannotAssign {
                name: name.to_string(),
                span: name_span,
            });
        }

        let value = self.coerce(bound_value, value.span, variable.ty, false);
        BoundExpression::Assignment {
            variable,
            value: Box::new(value),
        }
    }

    fn bind_call(
        &mut self,
        name: &str,
        name_span: Span,
        arguments: &[ast::Expression],
        span: Span,
    ) -> BoundExpression {
        // a call of a type name with one argument is an explicit conversion
        if arguments.len() == 1 {
            if let Some(ty) = Type::lookup(name) {
                return self.bind_conversion(&arguments[0], ty, true);
            }
        }

        let mut bound_arguments = Vec::with_capacity(arguments.len());
        for argument in arguments {
            bound_arguments.push(self.bind_value_expression(argument));
        }

        let function = match self.scopes.lookup(self.scope, name).cloned() {
            Some(Symbol::Function(function)) => function,
            Some(Symbol::Variable(_)) => {
                self.report(Diagnostic::NotAFunction {
                    name: name.to_string(),
                    span: name_span,
                });
                return BoundExpression::Error;
            }
            None => {
                self.report(Diagnostic::UndefinedFunction {
                    name: name.to_string(),
                    span: name_span,
                });
                return BoundExpression::Error;
            }
        };

        if bound_arguments.len() != function.parameters.len() {
            self.report(Diagnostic::WrongArgumentCount {
                name: function.name.clone(),
                expected: function.parameters.len(),
                actual: bound_arguments.len(),
                span,
            });
            return BoundExpression::Error;
        }

        let mut converted = Vec::with_capacity(bound_arguments.len());
        for ((argument, bound), parameter) in arguments
            .iter()
            .zip(bound_arguments)
            .zip(&function.parameters)
        {
            let from = bound.ty();
            if from == Type::Error || parameter.ty == Type::Error {
                converted.push(BoundExpression::Error);
                continue;
            }
            match operators::classify_conversion(from, parameter.ty) {
                Some(Conversion::Identity) => converted.push(bound),
                _ => {
                    self.report(Diagnostic::WrongArgumentType {
                        name: parameter.name.clone(),
                        expected: parameter.ty,
                        actual: from,
                        span: argument.span,
                    });
                    converted.push(BoundExpression::Error);
                }
            }
        }

        BoundExpression::Call {
            function,
            arguments: converted,
        }
    }

    fn bind_conversion(
        &mut self,
        expression: &ast::Expression,
        to: Type,
        allow_explicit: bool,
    ) -> BoundExpression {
        let bound = self.bind_value_expression(expression);
        self.coerce(bound, expression.span, to, allow_explicit)
    }

    fn coerce(
        &mut self,
        bound: BoundExpression,
        span: Span,
        to: Type,
        allow_explicit: bool,
    ) -> BoundExpression {
        let from = bound.ty();
        if from == Type::Error || to == Type::Error {
            return BoundExpression::Error;
        }

        match operators::classify_conversion(from, to) {
            None => {
                self.report(Diagnostic::CannotConvert { from, to, span });
                BoundExpression::Error
            }
            Some(Conversion::Identity) => bound,
            Some(Conversion::Explicit) if !allow_explicit => {
                self.report(Diagnostic::CannotConvertImplicitly { from, to, span });
                BoundExpression::Error
            }
            Some(Conversion::Explicit) => BoundExpression::Conversion {
                ty: to,
                expression: Box::new(bound),
            },
        }
    }
}
