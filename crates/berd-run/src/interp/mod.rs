//! The tree-walking evaluator.
//!
//! One struct owns every piece of runtime state: the variable store, const
//! store, function table, class registry, field histories, reactive index,
//! deletion set and call stack. Statement evaluation lives in
//! [`stmts`](self::stmts), expression evaluation in
//! [`exprs`](self::exprs); this module holds the struct, the bidirectional
//! statement loop, reactive dispatch, and pattern matching.

mod exprs;
mod stmts;

use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

use berd_par::{Pattern, PatternKind, Stmt, WhenDecl};
use berd_util::{Diagnostic, ErrorKind, FxHashMap, Result, Span, Symbol};

use crate::classes::{ClassRegistry, FieldHistories};
use crate::consts::ConstStore;
use crate::deletion::DeletionSet;
use crate::flow::Flow;
use crate::store::{Mutability, VariableStore};
use crate::value::Value;
use crate::when::{WhenIndex, DISPATCH_LIMIT};

/// A function call frame: parameter bindings plus the method receiver.
#[derive(Default)]
pub struct Frame {
    pub locals: FxHashMap<Symbol, Value>,
}

/// The interpreter. `W` receives everything `print` writes, which keeps
/// the driver on stdout and the tests on a byte buffer.
pub struct Interp<W: Write> {
    pub(crate) vars: VariableStore,
    pub(crate) consts: ConstStore,
    pub(crate) functions: FxHashMap<Symbol, Rc<berd_par::FuncDef>>,
    pub(crate) classes: ClassRegistry,
    pub(crate) field_histories: FieldHistories,
    pub(crate) whens: WhenIndex,
    pub(crate) deleted: DeletionSet,
    pub(crate) frames: Vec<Frame>,
    /// Index of the statement executing in the active list.
    pub(crate) statement_index: usize,
    pub(crate) loop_depth: usize,
    pub(crate) if_depth: usize,
    pub(crate) in_when_body: bool,
    out: W,
}

impl<W: Write> Interp<W> {
    pub fn new(out: W) -> Self {
        Self {
            vars: VariableStore::new(),
            consts: ConstStore::new(),
            functions: FxHashMap::default(),
            classes: ClassRegistry::new(),
            field_histories: FieldHistories::default(),
            whens: WhenIndex::new(),
            deleted: DeletionSet::new(),
            frames: Vec::new(),
            statement_index: 0,
            loop_depth: 0,
            if_depth: 0,
            in_when_body: false,
            out,
        }
    }

    /// Executes a whole program.
    pub fn run(&mut self, program: &[Stmt]) -> Result<()> {
        let flow = self.run_list(program)?;
        // Stray signals are rejected where they are raised, so the
        // top-level list always completes normally.
        debug_assert!(flow.is_normal());
        Ok(())
    }

    /// Recovers the output sink (used by tests to read captured prints).
    pub fn into_output(self) -> W {
        self.out
    }

    pub(crate) fn println(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")
            .map_err(|e| Diagnostic::positionless(ErrorKind::Io, e.to_string()))
    }

    // =========================================================================
    // THE STATEMENT LOOP
    // =========================================================================

    /// Runs a statement list with a direction flag local to the list.
    ///
    /// `reverse!` flips the traversal direction, `forward!` restores it;
    /// execution halts when the index leaves the list at either end.
    /// Lifetime expiry runs before every statement against this list's
    /// local statement index.
    pub(crate) fn run_list(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        let saved_index = self.statement_index;
        let mut index: isize = 0;
        let mut direction: isize = 1;
        let mut result = Flow::Normal;
        while index >= 0 && (index as usize) < stmts.len() {
            self.statement_index = index as usize;
            self.vars
                .expire_lifetimes(self.statement_index, Instant::now());
            let stmt = &stmts[index as usize];
            match &stmt.kind {
                berd_par::StmtKind::Reverse => {
                    direction = -direction;
                    index += direction;
                    continue;
                }
                berd_par::StmtKind::Forward => {
                    direction = 1;
                    index += direction;
                    continue;
                }
                _ => {}
            }
            let flow = self.eval_stmt(stmt)?;
            if !flow.is_normal() {
                result = flow;
                break;
            }
            index += direction;
        }
        self.statement_index = saved_index;
        Ok(result)
    }

    // =========================================================================
    // REACTIVE DISPATCH
    // =========================================================================

    /// Records a mutation of `name` and, unless a dispatch is already
    /// draining, fires the affected subscriptions in FIFO order.
    pub(crate) fn notify_mutation(&mut self, name: Symbol, span: Span) -> Result<()> {
        self.whens.enqueue(name);
        if !self.whens.begin_dispatch() {
            return Ok(());
        }
        let result = self.drain_mutations(span);
        self.whens.end_dispatch();
        result
    }

    fn drain_mutations(&mut self, span: Span) -> Result<()> {
        let mut fired = 0usize;
        while let Some(name) = self.whens.pop_mutation() {
            for decl in self.whens.subs_for(name) {
                fired += 1;
                if fired > DISPATCH_LIMIT {
                    return Err(Diagnostic::safety(
                        "reactive dispatch exceeded the safety bound",
                        span,
                    ));
                }
                self.fire_when(&decl)?;
            }
        }
        Ok(())
    }

    fn fire_when(&mut self, decl: &WhenDecl) -> Result<()> {
        match &decl.pattern {
            None => {
                let cond = self.eval_expr(&decl.target)?;
                if !cond.is_truthy() {
                    return Ok(());
                }
                self.run_when_body(decl, Vec::new())
            }
            Some(pattern) => {
                let value = self.eval_expr(&decl.target)?;
                let mut bindings = Vec::new();
                if !self.match_pattern(pattern, &value, &mut bindings, true)? {
                    return Ok(());
                }
                self.run_when_body(decl, bindings)
            }
        }
    }

    /// Runs a subscription body in a fresh scope with the pattern bindings
    /// declared; the guard sees the bindings too.
    fn run_when_body(&mut self, decl: &WhenDecl, bindings: Vec<(Symbol, Value)>) -> Result<()> {
        self.vars.push_scope();
        for (name, value) in bindings {
            self.vars.declare(name, Mutability::VarVar, value, 1, None);
        }
        let guard_pass = match &decl.guard {
            Some(guard) => self.eval_expr(guard).map(|v| v.is_truthy()),
            None => Ok(true),
        };
        let result = match guard_pass {
            Ok(true) => {
                let saved = self.in_when_body;
                self.in_when_body = true;
                let flow = self.run_list(&decl.body);
                self.in_when_body = saved;
                match flow {
                    Ok(Flow::Normal) => Ok(()),
                    Ok(_) => Err(Diagnostic::context(
                        "a control-flow signal escaped a 'when' body",
                        decl.span,
                    )),
                    Err(e) => Err(e),
                }
            }
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };
        self.vars.pop_scope();
        result
    }

    // =========================================================================
    // PATTERN MATCHING
    // =========================================================================

    /// Matches `value` against `pattern`, appending bindings.
    ///
    /// `strict` controls arity: a `when ... matches` pattern fails on a
    /// missing element, while a destructuring declaration binds
    /// `undefined` instead.
    pub(crate) fn match_pattern(
        &mut self,
        pattern: &Pattern,
        value: &Value,
        bindings: &mut Vec<(Symbol, Value)>,
        strict: bool,
    ) -> Result<bool> {
        match &pattern.kind {
            PatternKind::Binding(name) => {
                bindings.push((*name, value.clone()));
                Ok(true)
            }
            PatternKind::Literal(literal) => {
                let expected = self.eval_expr(literal)?;
                Ok(expected.strict_eq(value))
            }
            PatternKind::Array { elements, rest } => {
                let Value::Array(map) = value else {
                    return Ok(false);
                };
                let values: Vec<Value> = map.values().cloned().collect();
                for (i, elem) in elements.iter().enumerate() {
                    let slot = values.get(i).cloned();
                    let missing = slot.is_none();
                    let element = match slot {
                        Some(v) if !matches!(v, Value::Undefined) => v,
                        _ => match &elem.default {
                            Some(default) => self.eval_expr(default)?,
                            None => {
                                if strict && missing {
                                    return Ok(false);
                                }
                                Value::Undefined
                            }
                        },
                    };
                    if !self.match_pattern(&elem.pattern, &element, bindings, strict)? {
                        return Ok(false);
                    }
                }
                if let Some(rest) = rest {
                    let remaining: Vec<Value> =
                        values.into_iter().skip(elements.len()).collect();
                    bindings.push((*rest, Value::array_from_vec(remaining)));
                }
                Ok(true)
            }
            PatternKind::Object { fields } => {
                let Value::Object(class) = value else {
                    return Ok(false);
                };
                for field in fields {
                    let current = self
                        .classes
                        .instance(*class)
                        .and_then(|inst| inst.fields.get(&field.name))
                        .cloned()
                        .or_else(|| {
                            self.classes
                                .def(*class)
                                .and_then(|def| def.statics.get(&field.name))
                                .cloned()
                        });
                    let bound = match current {
                        Some(v) => v,
                        None => match &field.default {
                            Some(default) => self.eval_expr(default)?,
                            None => {
                                if strict {
                                    return Ok(false);
                                }
                                Value::Undefined
                            }
                        },
                    };
                    bindings.push((field.binding, bound));
                }
                Ok(true)
            }
        }
    }
}
