//! Scope arena
//!
//! Scopes form a tree that is only ever walked upward, so they live in an
//! arena indexed by id, each storing its parent's id. A scope owns the
//! symbols declared directly in it; names are unique per scope but may be
//! shadowed in nested scopes.

use crate::symbols::{FunctionSymbol, VariableSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(variable) => &variable.name,
            Symbol::Function(function) => &function.name,
        }
    }
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: Vec<Symbol>,
}

#[derive(Debug, Default)]
pub struct Scopes {
    arena: Vec<Scope>,
}

impl Scopes {
    /// Open a new scope; `None` as parent makes it a root
    pub fn open(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.arena.push(Scope {
            parent,
            symbols: Vec::new(),
        });
        ScopeId(self.arena.len() - 1)
    }

    /// Declare a symbol; false iff the name is already taken in this scope
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> bool {
        let scope = &mut self.arena[scope.0];
        if scope.symbols.iter().any(|s| s.name() == symbol.name()) {
            return false;
        }
        scope.symbols.push(symbol);
        true
    }

    /// Declare a symbol, replacing any previous one with the same name
    ///
    /// Used to seed a continuation scope from an earlier submission, where
    /// the latest declaration of a name wins.
    pub fn declare_or_replace(&mut self, scope: ScopeId, symbol: Symbol) {
        let scope = &mut self.arena[scope.0];
        match scope.symbols.iter_mut().find(|s| s.name() == symbol.name()) {
            Some(existing) => *existing = symbol,
            None => scope.symbols.push(symbol),
        }
    }

    /// Resolve a name against this scope and its parent chain
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let scope = &self.arena[scope.0];
        scope
            .symbols
            .iter()
            .find(|s| s.name() == name)
            .or_else(|| scope.parent.and_then(|parent| self.lookup(parent, name)))
    }

    /// All variables declared directly in this scope, in declaration order
    pub fn declared_variables(&self, scope: ScopeId) -> Vec<VariableSymbol> {
        self.arena[scope.0]
            .symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::Variable(variable) => Some(variable.clone()),
                Symbol::Function(_) => None,
            })
            .collect()
    }

    /// All functions declared directly in this scope, in declaration order
    pub fn declared_functions(&self, scope: ScopeId) -> Vec<FunctionSymbol> {
        self.arena[scope.0]
            .symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::Function(function) => Some(function.clone()),
                Symbol::Variable(_) => None,
            })
            .collect()
    }
}
