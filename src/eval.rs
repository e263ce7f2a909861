//! Evaluation
//!
//! Tree-walk execution of a lowered [BoundProgram]. Statements run under an
//! explicit cursor so that gotos can relocate it arbitrarily within the
//! flattened list; expressions evaluate by ordinary recursion. Variables
//! are resolved purely by symbol identity, which keeps shadowing and
//! REPL-persisted globals unambiguous.
//!
//! The evaluator assumes the program is diagnostic-free. Faults that only
//! exist at run time (division by zero, a failed cast, input problems) are
//! fatal [RuntimeError]s, never diagnostics.

use std::collections::HashMap;
use std::io::{self, Write};

use rand::Rng;
use thiserror::Error;

use crate::binding::{
    BinaryOperatorKind, BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement,
    UnaryOperatorKind,
};
use crate::symbols::{Builtin, SymbolId, Type, VariableKind, VariableSymbol};
use crate::value::Value;

/// The persisted variable store, keyed by symbol identity
pub type Variables = HashMap<SymbolId, Value>;

#[derive(Debug, Error, miette::Diagnostic)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("The value '{value}' is not a valid {ty}")]
    InvalidCast { value: String, ty: Type },

    #[error("random expects a non-negative bound, but received {bound}")]
    NegativeRandomBound { bound: i64 },

    #[error("Variable '{name}' was used before a value was assigned to it")]
    UninitializedVariable { name: String },

    #[error("Failed to read input")]
    Input(#[source] io::Error),

    #[error("Failed to write output")]
    Output(#[source] io::Error),
}

/// How a statement sequence finished
enum Flow {
    Normal,
    Return(Option<Value>),
}

pub struct Evaluator<'a> {
    program: &'a BoundProgram,
    globals: &'a mut Variables,
    locals: Vec<HashMap<SymbolId, Value>>,
    last_value: Option<Value>,
}

impl<'a> Evaluator<'a> {
    pub fn new(program: &'a BoundProgram, globals: &'a mut Variables) -> Self {
        Evaluator {
            program,
            globals,
            // one base frame for compiler-generated locals in global code
            locals: vec![HashMap::new()],
            last_value: None,
        }
    }

    /// Run the program's global statements and yield the submission value
    pub fn evaluate(mut self) -> Result<Option<Value>, RuntimeError> {
        let program = self.program;
        match self.run_block(&program.statement)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(self.last_value.take()),
        }
    }

    fn run_block(&mut self, body: &'a BoundBlockStatement) -> Result<Flow, RuntimeError> {
        let mut labels = HashMap::new();
        for (index, statement) in body.statements.iter().enumerate() {
            if let BoundStatement::Label(label) = statement {
                labels.insert(label, index);
            }
        }

        let mut index = 0;
        while index < body.statements.len() {
            match &body.statements[index] {
                BoundStatement::VariableDeclaration {
                    variable,
                    initializer,
                } => {
                    let value = self.eval_expression(initializer)?;
                    self.last_value = Some(value.clone());
                    self.define(variable, value);
                    index += 1;
                }

                BoundStatement::Expression(expression) => {
                    let value = self.eval_expression(expression)?;
                    self.last_value = match value {
                        Value::Unit => None,
                        value => Some(value),
                    };
                    index += 1;
                }

                BoundStatement::Label(_) => index += 1,

                BoundStatement::Goto(label) => {
                    index = *labels.get(label).expect("jump targets its own body");
                }

                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let condition = match self.eval_expression(condition)? {
                        Value::Boolean(value) => value,
                        _ => unreachable!("conditions are bound as booleans"),
                    };
                    if condition == *jump_if_true {
                        index = *labels.get(label).expect("jump targets its own body");
                    } else {
                        index += 1;
                    }
                }

                BoundStatement::Return(expression) => {
                    let value = match expression {
                        Some(expression) => Some(self.eval_expression(expression)?),
                        None => None,
                    };
                    return Ok(Flow::Return(value));
                }

                BoundStatement::Block(_)
                | BoundStatement::If { .. }
                | BoundStatement::While { .. }
                | BoundStatement::For { .. } => {
                    unreachable!("structured statement in a lowered body")
                }
            }
        }

        Ok(Flow::Normal)
    }

    fn eval_expression(&mut self, expression: &'a BoundExpression) -> Result<Value, RuntimeError> {
        match expression {
            BoundExpression::Literal { value } => Ok(value.clone()),

            BoundExpression::Variable { variable } => self.read(variable),

            BoundExpression::Assignment { variable, value } => {
                let value = self.eval_expression(value)?;
                self.define(variable, value.clone());
                Ok(value)
            }

            BoundExpression::Unary { operator, operand } => {
                let operand = self.eval_expression(operand)?;
                Ok(unary_op(operator.kind, operand))
            }

            BoundExpression::Binary { operator, lhs, rhs } => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                binary_op(operator.kind, lhs, rhs)
            }

            BoundExpression::Call {
                function,
                arguments,
            } => {
                if let Some(builtin) = Builtin::from_id(function.id) {
                    return self.call_builtin(builtin, arguments);
                }

                let mut frame = HashMap::new();
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    frame.insert(parameter.id, self.eval_expression(argument)?);
                }

                let program = self.program;
                let body = program
                    .functions
                    .get(&function.id)
                    .expect("bound calls target declared functions");

                self.locals.push(frame);
                let flow = self.run_block(&body.body);
                self.locals.pop();

                match flow? {
                    Flow::Return(Some(value)) => Ok(value),
                    Flow::Return(None) | Flow::Normal => Ok(Value::Unit),
                }
            }

            BoundExpression::Conversion { ty, expression } => {
                let value = self.eval_expression(expression)?;
                convert(value, *ty)
            }

            BoundExpression::Error => unreachable!("programs with diagnostics are not evaluated"),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtin,
        arguments: &'a [BoundExpression],
    ) -> Result<Value, RuntimeError> {
        match builtin {
            Builtin::Output => {
                let text = match self.eval_expression(&arguments[0])? {
                    Value::String(text) => text,
                    _ => unreachable!("output takes a string"),
                };
                let mut stdout = io::stdout();
                writeln!(stdout, "{text}").map_err(RuntimeError::Output)?;
                Ok(Value::Unit)
            }

            Builtin::Input => {
                let mut line = String::new();
                io::stdin()
                    .read_line(&mut line)
                    .map_err(RuntimeError::Input)?;
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                Ok(Value::String(line))
            }

            Builtin::Random => {
                let bound = match self.eval_expression(&arguments[0])? {
                    Value::Integer(bound) => bound,
                    _ => unreachable!("random takes an integer"),
                };
                if bound < 0 {
                    return Err(RuntimeError::NegativeRandomBound { bound });
                }
                if bound == 0 {
                    return Ok(Value::Integer(0));
                }
                Ok(Value::Integer(rand::thread_rng().gen_range(0..bound)))
            }
        }
    }

    fn define(&mut self, variable: &VariableSymbol, value: Value) {
        match variable.kind {
            VariableKind::Global => {
                self.globals.insert(variable.id, value);
            }
            VariableKind::Local | VariableKind::Parameter => {
                self.locals
                    .last_mut()
                    .expect("there is always an active frame")
                    .insert(variable.id, value);
            }
        }
    }

    fn read(&self, variable: &VariableSymbol) -> Result<Value, RuntimeError> {
        let stored = match variable.kind {
            VariableKind::Global => self.globals.get(&variable.id),
            VariableKind::Local | VariableKind::Parameter => self
                .locals
                .last()
                .expect("there is always an active frame")
                .get(&variable.id),
        };

        stored
            .cloned()
            .ok_or_else(|| RuntimeError::UninitializedVariable {
                name: variable.name.clone(),
            })
    }
}

fn unary_op(kind: UnaryOperatorKind, operand: Value) -> Value {
    match (kind, operand) {
        (UnaryOperatorKind::Identity, value) => value,
        (UnaryOperatorKind::Negation, Value::Integer(value)) => {
            Value::Integer(value.wrapping_neg())
        }
        (UnaryOperatorKind::LogicalNegation, Value::Boolean(value)) => Value::Boolean(!value),
        (UnaryOperatorKind::BitwiseNegation, Value::Integer(value)) => Value::Integer(!value),
        _ => unreachable!("operator signatures are type checked"),
    }
}

fn binary_op(kind: BinaryOperatorKind, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    use BinaryOperatorKind as Op;
    use Value::{Boolean, Integer};

    Ok(match (kind, lhs, rhs) {
        (Op::Addition, Integer(l), Integer(r)) => Integer(l.wrapping_add(r)),
        (Op::Addition, Value::String(l), Value::String(r)) => Value::String(l + &r),
        (Op::Subtraction, Integer(l), Integer(r)) => Integer(l.wrapping_sub(r)),
        (Op::Multiplication, Integer(l), Integer(r)) => Integer(l.wrapping_mul(r)),
        (Op::Division, Integer(l), Integer(r)) => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Integer(l.wrapping_div(r))
        }
        (Op::Modulo, Integer(l), Integer(r)) => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Integer(l.wrapping_rem(r))
        }

        (Op::BitwiseAnd, Integer(l), Integer(r)) => Integer(l & r),
        (Op::BitwiseAnd, Boolean(l), Boolean(r)) => Boolean(l & r),
        (Op::BitwiseOr, Integer(l), Integer(r)) => Integer(l | r),
        (Op::BitwiseOr, Boolean(l), Boolean(r)) => Boolean(l | r),
        (Op::BitwiseXor, Integer(l), Integer(r)) => Integer(l ^ r),
        (Op::BitwiseXor, Boolean(l), Boolean(r)) => Boolean(l ^ r),

        (Op::LogicalAnd, Boolean(l), Boolean(r)) => Boolean(l && r),
        (Op::LogicalOr, Boolean(l), Boolean(r)) => Boolean(l || r),

        (Op::Equals, l, r) => Boolean(l == r),
        (Op::NotEquals, l, r) => Boolean(l != r),

        (Op::Less, Integer(l), Integer(r)) => Boolean(l < r),
        (Op::LessOrEquals, Integer(l), Integer(r)) => Boolean(l <= r),
        (Op::Greater, Integer(l), Integer(r)) => Boolean(l > r),
        (Op::GreaterOrEquals, Integer(l), Integer(r)) => Boolean(l >= r),

        _ => unreachable!("operator signatures are type checked"),
    })
}

fn convert(value: Value, ty: Type) -> Result<Value, RuntimeError> {
    if value.ty() == ty {
        return Ok(value);
    }

    match (value, ty) {
        (Value::Integer(value), Type::String) => Ok(Value::String(value.to_string())),
        (Value::Boolean(value), Type::String) => Ok(Value::String(value.to_string())),
        (Value::String(text), Type::Integer) => match text.trim().parse() {
            Ok(value) => Ok(Value::Integer(value)),
            Err(_) => Err(RuntimeError::InvalidCast { value: text, ty }),
        },
        (Value::String(text), Type::Boolean) => match text.trim() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(RuntimeError::InvalidCast { value: text, ty }),
        },
        _ => unreachable!("conversions are type checked"),
    }
}
