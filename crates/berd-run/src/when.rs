//! Reactive `when` subscriptions.
//!
//! Subscriptions are indexed by the names their condition (or match target
//! and guard) reads; a rule that reads no names at all subscribes to the
//! wildcard and fires on every mutation. Mutations feed a FIFO queue, and
//! dispatch is non-reentrant: a subscriber that mutates further names
//! appends to the queue of the dispatch already in progress.

use std::collections::VecDeque;
use std::rc::Rc;

use berd_par::{Expr, ExprKind, WhenDecl};
use berd_util::{FxHashMap, FxHashSet, Symbol};

/// Upper bound on subscription firings per dispatch; exceeding it is a
/// fatal safety abort.
pub const DISPATCH_LIMIT: usize = 100_000;

#[derive(Default)]
pub struct WhenIndex {
    subs: Vec<Rc<WhenDecl>>,
    by_dep: FxHashMap<Symbol, Vec<usize>>,
    wildcard: Vec<usize>,
    queue: VecDeque<Symbol>,
    dispatching: bool,
}

impl WhenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule under its dependency names, or the wildcard when
    /// the set is empty.
    pub fn register(&mut self, decl: Rc<WhenDecl>) {
        let mut deps = FxHashSet::default();
        collect_deps(&decl.target, &mut deps);
        if let Some(guard) = &decl.guard {
            collect_deps(guard, &mut deps);
        }
        let index = self.subs.len();
        self.subs.push(decl);
        if deps.is_empty() {
            self.wildcard.push(index);
        } else {
            for dep in deps {
                self.by_dep.entry(dep).or_default().push(index);
            }
        }
    }

    /// Queues a mutated name for dispatch.
    pub fn enqueue(&mut self, name: Symbol) {
        self.queue.push_back(name);
    }

    /// Claims the dispatcher role. Returns `false` when a dispatch is
    /// already draining the queue, in which case the caller must not
    /// recurse.
    pub fn begin_dispatch(&mut self) -> bool {
        if self.dispatching {
            return false;
        }
        self.dispatching = true;
        true
    }

    pub fn end_dispatch(&mut self) {
        self.dispatching = false;
        self.queue.clear();
    }

    pub fn pop_mutation(&mut self) -> Option<Symbol> {
        self.queue.pop_front()
    }

    /// Subscriptions triggered by a mutation of `name`: the ones indexed
    /// under it plus every wildcard rule, in registration order.
    pub fn subs_for(&self, name: Symbol) -> Vec<Rc<WhenDecl>> {
        let mut indices: Vec<usize> = self
            .by_dep
            .get(&name)
            .map(|v| v.clone())
            .unwrap_or_default();
        indices.extend(self.wildcard.iter().copied());
        indices.sort_unstable();
        indices.dedup();
        indices.iter().map(|&i| Rc::clone(&self.subs[i])).collect()
    }
}

/// Collects every identifier an expression reads.
pub fn collect_deps(expr: &Expr, out: &mut FxHashSet<Symbol>) {
    match &expr.kind {
        ExprKind::Ident(name) => {
            out.insert(*name);
        }
        ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_) | ExprKind::Undefined => {}
        ExprKind::Array(elements) => {
            for element in elements {
                collect_deps(element, out);
            }
        }
        ExprKind::Range(range) => {
            collect_deps(&range.lo, out);
            collect_deps(&range.hi, out);
        }
        ExprKind::Unary { operand, .. } => collect_deps(operand, out),
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_deps(lhs, out);
            collect_deps(rhs, out);
        }
        ExprKind::Cond {
            cond,
            on_true,
            on_false,
            on_maybe,
            on_undefined,
        } => {
            collect_deps(cond, out);
            for branch in [on_true, on_false, on_maybe, on_undefined].into_iter().flatten() {
                collect_deps(branch, out);
            }
        }
        ExprKind::Assign { target, value } => {
            collect_deps(target, out);
            collect_deps(value, out);
        }
        ExprKind::Index { base, index } => {
            collect_deps(base, out);
            collect_deps(index, out);
        }
        ExprKind::Call { callee, args } => {
            collect_deps(callee, out);
            for arg in args {
                collect_deps(arg, out);
            }
        }
        ExprKind::IncDec { target, .. } => collect_deps(target, out),
        ExprKind::PowerRun { target, .. } => collect_deps(target, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berd_par::parse;
    use berd_par::StmtKind;

    fn when_decl(source: &str) -> Rc<WhenDecl> {
        let program = parse(source).unwrap();
        match &program[0].kind {
            StmtKind::When(decl) => Rc::clone(decl),
            other => panic!("expected when, got {other:?}"),
        }
    }

    #[test]
    fn test_deps_from_condition() {
        let mut index = WhenIndex::new();
        index.register(when_decl("when score > limit { }"));
        assert_eq!(index.subs_for(Symbol::intern("score")).len(), 1);
        assert_eq!(index.subs_for(Symbol::intern("limit")).len(), 1);
        assert_eq!(index.subs_for(Symbol::intern("other")).len(), 0);
    }

    #[test]
    fn test_wildcard_when_no_deps() {
        let mut index = WhenIndex::new();
        index.register(when_decl("when true { }"));
        assert_eq!(index.subs_for(Symbol::intern("anything")).len(), 1);
    }

    #[test]
    fn test_dispatch_guard() {
        let mut index = WhenIndex::new();
        assert!(index.begin_dispatch());
        assert!(!index.begin_dispatch());
        index.end_dispatch();
        assert!(index.begin_dispatch());
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut index = WhenIndex::new();
        index.enqueue(Symbol::intern("a"));
        index.enqueue(Symbol::intern("b"));
        assert_eq!(index.pop_mutation(), Some(Symbol::intern("a")));
        assert_eq!(index.pop_mutation(), Some(Symbol::intern("b")));
        assert_eq!(index.pop_mutation(), None);
    }
}
