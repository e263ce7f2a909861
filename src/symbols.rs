//! Symbols
//!
//! Named entities the binder declares and resolves: variables, parameters
//! and functions, plus the closed set of types they can have. Every symbol
//! carries a [SymbolId] so that the evaluator and the REPL's persisted
//! variable store can refer to it unambiguously, independent of shadowing.

use std::fmt;

use crate::common::Span;

/// The closed set of types
///
/// `Error` is only ever produced while recovering from a reported problem;
/// it suppresses follow-up diagnostics and never survives a clean binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Boolean,
    String,
    Void,
    Error,
}

impl Type {
    /// Resolve a type name as it appears in a type clause
    pub fn lookup(name: &str) -> Option<Type> {
        match name {
            "integer" => Some(Type::Integer),
            "boolean" => Some(Type::Boolean),
            "string" => Some(Type::String),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "integer"),
            Type::Boolean => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Error => write!(f, "?"),
        }
    }
}

/// A cheap id to refer to symbols unambiguously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYM#{}", self.0)
    }
}

/// Allocator for fresh [SymbolId]s
///
/// The counter is threaded from one binder pass into the next so that ids
/// stay unique across REPL submissions.
#[derive(Debug, Clone, Copy)]
pub struct SymbolCounter(usize);

impl SymbolCounter {
    pub fn fresh(&mut self) -> SymbolId {
        let id = SymbolId(self.0);
        self.0 += 1;
        id
    }
}

impl Default for SymbolCounter {
    fn default() -> Self {
        SymbolCounter(FIRST_USER_SYMBOL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub readonly: bool,
    pub ty: Type,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub name_span: Span,
    pub parameters: Vec<VariableSymbol>,
    pub return_type: Type,
}

/// The builtin routines that call into the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Output,
    Input,
    Random,
}

const OUTPUT_ID: SymbolId = SymbolId(0);
const INPUT_ID: SymbolId = SymbolId(1);
const RANDOM_ID: SymbolId = SymbolId(2);
const FIRST_USER_SYMBOL: usize = 5;

impl Builtin {
    /// Recognize a call target as a builtin, by symbol identity
    pub fn from_id(id: SymbolId) -> Option<Builtin> {
        match id {
            OUTPUT_ID => Some(Builtin::Output),
            INPUT_ID => Some(Builtin::Input),
            RANDOM_ID => Some(Builtin::Random),
            _ => None,
        }
    }
}

/// Function symbols for all builtins, declared into the root scope
pub fn builtin_functions() -> Vec<FunctionSymbol> {
    let parameter = |id: usize, name: &str, ty: Type| VariableSymbol {
        id: SymbolId(id),
        name: name.to_string(),
        readonly: true,
        ty,
        kind: VariableKind::Parameter,
    };

    vec![
        FunctionSymbol {
            id: OUTPUT_ID,
            name: "output".to_string(),
            name_span: Span::default(),
            parameters: vec![parameter(3, "text", Type::String)],
            return_type: Type::Void,
        },
        FunctionSymbol {
            id: INPUT_ID,
            name: "input".to_string(),
            name_span: Span::default(),
            parameters: Vec::new(),
            return_type: Type::String,
        },
        FunctionSymbol {
            id: RANDOM_ID,
            name: "random".to_string(),
            name_span: Span::default(),
            parameters: vec![parameter(4, "max", Type::Integer)],
            return_type: Type::Integer,
        },
    ]
}
