//! Control-flow analysis
//!
//! Partitions a lowered statement sequence into basic blocks, connects
//! them with optionally condition-guarded branches and prunes unreachable
//! blocks. The binder uses [all_paths_return] to validate that a non-void
//! function produces a value on every path; the CLI can render the graph
//! in Graphviz dot form.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use crate::binding::{BoundBlockStatement, BoundExpression, BoundStatement, Label};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Synthetic entry block, has no statements
pub const START: BlockId = BlockId(0);
/// Synthetic exit block, has no statements
pub const END: BlockId = BlockId(1);

/// A maximal straight-line run of statements
#[derive(Debug, Default)]
pub struct BasicBlock<'a> {
    pub statements: Vec<&'a BoundStatement>,
    incoming: Vec<usize>,
    outgoing: Vec<usize>,
}

/// A directed edge between two basic blocks
#[derive(Debug)]
pub struct Branch<'a> {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<Condition<'a>>,
}

/// An edge guard: a bound condition, possibly logically negated
#[derive(Debug, Clone, Copy)]
pub struct Condition<'a> {
    pub expression: &'a BoundExpression,
    pub negated: bool,
}

impl fmt::Display for Condition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not {}", self.expression)
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    blocks: Vec<BasicBlock<'a>>,
    branches: Vec<Branch<'a>>,
    block_alive: Vec<bool>,
    branch_alive: Vec<bool>,
}

impl<'a> ControlFlowGraph<'a> {
    pub fn new(body: &'a BoundBlockStatement) -> Self {
        let mut graph = ControlFlowGraph {
            blocks: vec![BasicBlock::default(), BasicBlock::default()],
            branches: Vec::new(),
            block_alive: vec![true, true],
            branch_alive: Vec::new(),
        };

        graph.split_into_blocks(body);
        graph.connect_blocks();
        graph.prune_unreachable();
        graph
    }

    /// A label starts a new block; a goto or return ends one (inclusive)
    fn split_into_blocks(&mut self, body: &'a BoundBlockStatement) {
        let mut statements: Vec<&'a BoundStatement> = Vec::new();

        for statement in &body.statements {
            match statement {
                BoundStatement::Label(_) => {
                    self.flush_block(&mut statements);
                    statements.push(statement);
                }
                BoundStatement::Goto(_)
                | BoundStatement::ConditionalGoto { .. }
                | BoundStatement::Return(_) => {
                    statements.push(statement);
                    self.flush_block(&mut statements);
                }
                BoundStatement::VariableDeclaration { .. } | BoundStatement::Expression(_) => {
                    statements.push(statement);
                }
                BoundStatement::Block(_)
                | BoundStatement::If { .. }
                | BoundStatement::While { .. }
                | BoundStatement::For { .. } => {
                    unreachable!("structured statement in a lowered body")
                }
            }
        }

        self.flush_block(&mut statements);
    }

    fn flush_block(&mut self, statements: &mut Vec<&'a BoundStatement>) {
        if statements.is_empty() {
            return;
        }
        self.blocks.push(BasicBlock {
            statements: std::mem::take(statements),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        self.block_alive.push(true);
    }

    fn connect_blocks(&mut self) {
        if self.blocks.len() == 2 {
            self.connect(START, END, None);
            return;
        }
        self.connect(START, BlockId(2), None);

        let mut label_blocks: HashMap<&'a Label, BlockId> = HashMap::new();
        for (index, block) in self.blocks.iter().enumerate().skip(2) {
            for &statement in &block.statements {
                if let BoundStatement::Label(label) = statement {
                    label_blocks.insert(label, BlockId(index));
                }
            }
        }

        let mut edges: Vec<(BlockId, BlockId, Option<Condition<'a>>)> = Vec::new();
        for index in 2..self.blocks.len() {
            let current = BlockId(index);
            let next = if index == self.blocks.len() - 1 {
                END
            } else {
                BlockId(index + 1)
            };

            let last = self.blocks[index]
                .statements
                .last()
                .copied()
                .expect("basic blocks are never empty");

            match last {
                BoundStatement::Goto(label) => edges.push((current, label_blocks[label], None)),
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    // one edge under the condition, one under its negation
                    edges.push((
                        current,
                        label_blocks[label],
                        Some(Condition {
                            expression: condition,
                            negated: !jump_if_true,
                        }),
                    ));
                    edges.push((
                        current,
                        next,
                        Some(Condition {
                            expression: condition,
                            negated: *jump_if_true,
                        }),
                    ));
                }
                BoundStatement::Return(_) => edges.push((current, END, None)),
                _ => edges.push((current, next, None)),
            }
        }

        for (from, to, condition) in edges {
            self.connect(from, to, condition);
        }
    }

    fn connect(&mut self, from: BlockId, to: BlockId, condition: Option<Condition<'a>>) {
        // a constant guard collapses: always-true loses its label,
        // always-false means the edge is omitted entirely
        let condition = match condition {
            Some(condition) => match condition.expression {
                BoundExpression::Literal {
                    value: Value::Boolean(value),
                } => {
                    if *value != condition.negated {
                        None
                    } else {
                        return;
                    }
                }
                _ => Some(condition),
            },
            None => None,
        };

        let branch = self.branches.len();
        self.branches.push(Branch {
            from,
            to,
            condition,
        });
        self.branch_alive.push(true);
        self.blocks[from.0].outgoing.push(branch);
        self.blocks[to.0].incoming.push(branch);
    }

    /// Iteratively remove blocks with no live incoming branch; each pass
    /// removes one block, so the loop is bounded by the block count
    fn prune_unreachable(&mut self) {
        let real_blocks = self.blocks.len() - 2;
        for _ in 0..real_blocks {
            let dead = (2..self.blocks.len()).find(|&index| {
                self.block_alive[index]
                    && self.blocks[index]
                        .incoming
                        .iter()
                        .all(|&branch| !self.branch_alive[branch])
            });

            match dead {
                Some(index) => self.remove_block(index),
                None => break,
            }
        }
    }

    fn remove_block(&mut self, index: usize) {
        self.block_alive[index] = false;
        let outgoing = std::mem::take(&mut self.blocks[index].outgoing);
        for branch in outgoing {
            self.branch_alive[branch] = false;
        }
    }

    /// The live blocks, synthetic start/end included
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BasicBlock<'a>)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(index, _)| self.block_alive[*index])
            .map(|(index, block)| (BlockId(index), block))
    }

    /// The live branches
    pub fn branches(&self) -> impl Iterator<Item = &Branch<'a>> + '_ {
        self.branches
            .iter()
            .enumerate()
            .filter(|(index, _)| self.branch_alive[*index])
            .map(|(_, branch)| branch)
    }

    /// The live branches arriving at a block
    pub fn incoming(&self, block: BlockId) -> impl Iterator<Item = &Branch<'a>> + '_ {
        self.blocks[block.0]
            .incoming
            .iter()
            .copied()
            .filter(|&branch| self.branch_alive[branch])
            .map(|branch| &self.branches[branch])
    }

    pub fn write_dot(&self, out: &mut dyn io::Write) -> io::Result<()> {
        fn quote(text: &str) -> String {
            format!("\"{}\"", text.replace('"', "\\\""))
        }

        writeln!(out, "digraph G {{")?;

        for (id, block) in self.blocks() {
            let label = if id == START {
                String::from("<Start>")
            } else if id == END {
                String::from("<End>")
            } else {
                block
                    .statements
                    .iter()
                    .map(|statement| statement.to_string())
                    .collect::<Vec<_>>()
                    .join("\\l")
            };
            writeln!(out, "    N{} [label = {} shape = box]", id.0, quote(&label))?;
        }

        for branch in self.branches() {
            let label = branch
                .condition
                .map(|condition| condition.to_string())
                .unwrap_or_default();
            writeln!(
                out,
                "    N{} -> N{} [label = {}]",
                branch.from.0,
                branch.to.0,
                quote(&label)
            )?;
        }

        writeln!(out, "}}")
    }
}

/// Whether every path through this lowered body ends in a return statement
///
/// Only meaningful for non-void function bodies; a body that never reaches
/// the synthetic end (an infinite loop) passes vacuously.
pub fn all_paths_return(body: &BoundBlockStatement) -> bool {
    let graph = ControlFlowGraph::new(body);
    let result = graph.incoming(END).all(|branch| {
        let block = &graph.blocks[branch.from.0];
        matches!(block.statements.last(), Some(BoundStatement::Return(_)))
    });
    result
}
