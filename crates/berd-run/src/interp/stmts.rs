//! Statement evaluation.

use std::rc::Rc;
use std::time::Instant;

use berd_par::{
    DeclKind, Expr, ExprKind, LifetimeSpec, Pattern, Stmt, StmtKind, UpdateOp,
};
use berd_util::{Diagnostic, Result, Span, Symbol};

use crate::flow::Flow;
use crate::store::{Lifetime, Mutability};
use crate::value::Value;

use super::exprs::root_ident;
use super::Interp;

impl<W: std::io::Write> Interp<W> {
    pub(crate) fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                self.vars.push_scope();
                let result = self.run_list(stmts);
                self.vars.pop_scope();
                result
            }

            StmtKind::VarDecl {
                decl,
                name,
                lifetime,
                init,
                priority,
                debug,
            } => {
                let value = self.eval_expr(init)?;
                self.declare(*decl, *name, value.clone(), *priority, lifetime, stmt.span)?;
                if *debug > 0 {
                    let text = value.display();
                    self.println(&text)?;
                }
                self.notify_mutation(*name, stmt.span)?;
                Ok(Flow::Normal)
            }

            StmtKind::PatternDecl {
                decl,
                pattern,
                init,
                priority,
                debug,
            } => {
                let value = self.eval_expr(init)?;
                if *debug > 0 {
                    let text = value.display();
                    self.println(&text)?;
                }
                self.declare_pattern(*decl, pattern, &value, *priority, stmt.span)?;
                Ok(Flow::Normal)
            }

            StmtKind::Expr { expr, debug } => {
                let value = self.eval_expr(expr)?;
                if *debug > 0 {
                    let text = self.debug_text(expr, &value);
                    self.println(&text)?;
                }
                Ok(Flow::Normal)
            }

            StmtKind::Delete { target } => {
                self.eval_delete(target, stmt.span)?;
                Ok(Flow::Normal)
            }

            StmtKind::When(decl) => {
                self.whens.register(Rc::clone(decl));
                Ok(Flow::Normal)
            }

            StmtKind::If {
                cond,
                then,
                idk,
                els,
            } => {
                self.if_depth += 1;
                let result = self.run_if(cond, then, idk.as_deref(), els.as_deref());
                self.if_depth -= 1;
                result
            }

            StmtKind::While { cond, body } => {
                self.loop_depth += 1;
                let result = self.run_while(cond, body);
                self.loop_depth -= 1;
                result
            }

            StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(Diagnostic::context("'break' outside of a loop", stmt.span));
                }
                Ok(Flow::Break)
            }

            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(Diagnostic::context(
                        "'continue' outside of a loop",
                        stmt.span,
                    ));
                }
                Ok(Flow::Continue)
            }

            StmtKind::TryAgain => {
                if self.in_when_body {
                    return Err(Diagnostic::context(
                        "'try again' is not allowed inside a 'when' body",
                        stmt.span,
                    ));
                }
                if self.if_depth == 0 {
                    return Err(Diagnostic::context(
                        "'try again' outside of an if statement",
                        stmt.span,
                    ));
                }
                Ok(Flow::TryAgain)
            }

            StmtKind::FuncDecl { name, func } => {
                self.functions.insert(*name, Rc::clone(func));
                Ok(Flow::Normal)
            }

            StmtKind::ClassDecl(decl) => {
                self.field_histories.clear_class(decl.name);
                let mut statics = berd_util::FxHashMap::default();
                for prop in decl.properties.iter().filter(|p| p.is_static) {
                    let value = self.eval_expr(&prop.default)?;
                    self.field_histories.seed(decl.name, prop.name, true, &value);
                    statics.insert(prop.name, value);
                }
                self.classes.define(Rc::clone(decl), statics);
                Ok(Flow::Normal)
            }

            StmtKind::Return { value } => {
                if self.frames.is_empty() {
                    return Err(Diagnostic::context(
                        "'return' outside of a function",
                        stmt.span,
                    ));
                }
                let result = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(result))
            }

            StmtKind::Update { target, op, args } => {
                self.eval_update(target, *op, args, stmt.span)?;
                Ok(Flow::Normal)
            }

            // Direction changes are interpreted by the statement loop.
            StmtKind::Reverse | StmtKind::Forward => Ok(Flow::Normal),
        }
    }

    // =========================================================================
    // DECLARATIONS
    // =========================================================================

    fn declare(
        &mut self,
        decl: DeclKind,
        name: Symbol,
        value: Value,
        priority: i32,
        lifetime: &Option<LifetimeSpec>,
        span: Span,
    ) -> Result<()> {
        if self.consts.contains(name) {
            return Err(Diagnostic::name(
                format!("'{name}' is a global constant and cannot be redeclared"),
                span,
            ));
        }
        if decl == DeclKind::ConstConstConst {
            self.consts.define(name, value);
            return Ok(());
        }
        let mutability = match decl {
            DeclKind::ConstConst => Mutability::ConstConst,
            DeclKind::ConstVar => Mutability::ConstVar,
            DeclKind::VarConst => Mutability::VarConst,
            DeclKind::VarVar => Mutability::VarVar,
            DeclKind::ConstConstConst => unreachable!(),
        };
        let lifetime = lifetime.as_ref().map(|spec| match spec {
            LifetimeSpec::Lines(count) => Lifetime::Lines {
                count: *count,
                declared_at: self.statement_index,
            },
            LifetimeSpec::Seconds(duration) => Lifetime::Seconds {
                duration: *duration,
                created: Instant::now(),
            },
            LifetimeSpec::Infinity => Lifetime::Infinity,
        });
        self.vars.declare(name, mutability, value, priority, lifetime);
        Ok(())
    }

    fn declare_pattern(
        &mut self,
        decl: DeclKind,
        pattern: &Pattern,
        value: &Value,
        priority: i32,
        span: Span,
    ) -> Result<()> {
        let mut bindings = Vec::new();
        // Lenient matching: what the value cannot supply binds undefined.
        let _ = self.match_pattern(pattern, value, &mut bindings, false)?;
        let mut all_names = Vec::new();
        pattern.bindings(&mut all_names);
        for name in all_names {
            let bound = bindings
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined);
            self.declare(decl, name, bound, priority, &None, span)?;
            self.notify_mutation(name, span)?;
        }
        Ok(())
    }

    // =========================================================================
    // DEBUG PRINTING
    // =========================================================================

    /// `x?` on a bare identifier prints its whole history; anything else
    /// prints the value.
    fn debug_text(&self, expr: &Expr, value: &Value) -> String {
        if let ExprKind::Ident(name) = &expr.kind {
            if let Some(entry) = self.vars.entry(*name) {
                return Value::array_from_vec(entry.history().values().to_vec()).display();
            }
        }
        value.display()
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    fn eval_delete(&mut self, target: &Expr, span: Span) -> Result<()> {
        if let ExprKind::Index { base, index } = &target.kind {
            let base_value = self.eval_expr(base)?;
            let index_value = self.eval_expr(index)?;
            match base_value {
                Value::Array(map) => {
                    let key = index_value.to_number();
                    let mut updated = (*map).clone();
                    updated.remove(&crate::value::NumKey(key));
                    self.write_place(base, Value::Array(Rc::new(updated)), true)?;
                    if let Some(root) = root_ident(base) {
                        self.notify_mutation(root, span)?;
                    }
                    return Ok(());
                }
                Value::Object(class) => {
                    let field = Symbol::intern(&index_value.display());
                    if let Some(instance) = self.classes.instance_mut(class) {
                        instance.fields.shift_remove(&field);
                    }
                    self.field_histories.remove(class, field, false);
                    self.notify_mutation(class, span)?;
                    if let Some(root) = root_ident(base) {
                        self.notify_mutation(root, span)?;
                    }
                    return Ok(());
                }
                _ => {}
            }
        }
        let value = self.eval_expr(target)?;
        if !self.deleted.add(&value) {
            return Err(Diagnostic::type_error(
                format!("cannot delete non-primitive value '{}'", value.display()),
                span,
            ));
        }
        Ok(())
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    fn run_if(
        &mut self,
        cond: &Expr,
        then: &Stmt,
        idk: Option<&Stmt>,
        els: Option<&Stmt>,
    ) -> Result<Flow> {
        loop {
            let value = self.eval_expr(cond)?;
            let branch = match &value {
                Value::Bool(crate::value::BoolState::True) => Some(then),
                Value::Bool(crate::value::BoolState::False) => els,
                Value::Bool(crate::value::BoolState::Maybe) => idk,
                Value::Undefined => els,
                other => {
                    if other.is_truthy() {
                        Some(then)
                    } else {
                        els
                    }
                }
            };
            let Some(branch) = branch else {
                return Ok(Flow::Normal);
            };
            match self.eval_stmt(branch)? {
                Flow::TryAgain => continue,
                flow => return Ok(flow),
            }
        }
    }

    fn run_while(&mut self, cond: &Expr, body: &Stmt) -> Result<Flow> {
        loop {
            if !self.eval_expr(cond)?.is_truthy() {
                return Ok(Flow::Normal);
            }
            match self.eval_stmt(body)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Continue | Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
    }

    // =========================================================================
    // UPDATE STATEMENTS
    // =========================================================================

    fn eval_update(
        &mut self,
        target: &Expr,
        op: UpdateOp,
        args: &[Expr],
        span: Span,
    ) -> Result<()> {
        let current = self.eval_expr(target)?;
        let Some(updated) = self.apply_update(&current, op, args, span)? else {
            return Ok(());
        };
        self.write_place(target, updated, false)?;
        if let Some(root) = root_ident(target) {
            self.notify_mutation(root, span)?;
        }
        Ok(())
    }

    /// Computes the new value for an update, or `None` for a nullish
    /// update whose target is already defined.
    fn apply_update(
        &mut self,
        current: &Value,
        op: UpdateOp,
        args: &[Expr],
        span: Span,
    ) -> Result<Option<Value>> {
        use berd_par::BinOp;
        let binary = |op| -> Option<BinOp> {
            Some(match op {
                UpdateOp::Add => BinOp::Add,
                UpdateOp::Sub => BinOp::Sub,
                UpdateOp::Mul => BinOp::Mul,
                UpdateOp::Div => BinOp::Div,
                UpdateOp::Mod => BinOp::Mod,
                UpdateOp::BitAnd => BinOp::BitAnd,
                UpdateOp::BitOr => BinOp::BitOr,
                UpdateOp::BitXor => BinOp::BitXor,
                UpdateOp::Shl => BinOp::Shl,
                UpdateOp::Shr => BinOp::Shr,
                UpdateOp::Min => BinOp::Min,
                UpdateOp::Max => BinOp::Max,
                _ => return None,
            })
        };

        if let Some(bin) = binary(op) {
            let rhs = self.eval_expr(&args[0])?;
            return Ok(Some(self.apply_binary(bin, current, &rhs, span)?));
        }

        match op {
            UpdateOp::Power(exponent) => Ok(Some(Value::Number(
                current.to_number().powi(exponent as i32),
            ))),
            UpdateOp::Root(degree) => Ok(Some(Value::Number(super::exprs::nth_root(
                current.to_number(),
                degree as f64,
            )))),
            UpdateOp::Trig(run) => {
                let n = current.to_number();
                let result = match run {
                    1 => n.sin(),
                    2 => n.cos(),
                    _ => n.tan(),
                };
                Ok(Some(Value::Number(result)))
            }
            UpdateOp::Nullish => {
                if matches!(current, Value::Undefined) {
                    Ok(Some(self.eval_expr(&args[0])?))
                } else {
                    Ok(None)
                }
            }
            UpdateOp::Clamp => {
                let (lo, hi, ends) = self.eval_range(&args[0])?;
                Ok(Some(super::exprs::clamp_value(
                    current.to_number(),
                    lo,
                    hi,
                    ends,
                )))
            }
            UpdateOp::Wrap => {
                let (delta, range_arg) = if args.len() == 2 {
                    (self.eval_expr(&args[0])?.to_number(), &args[1])
                } else {
                    (0.0, &args[0])
                };
                let (lo, hi, ends) = self.eval_range(range_arg)?;
                Ok(Some(super::exprs::wrap_value(
                    current.to_number() + delta,
                    lo,
                    hi,
                    ends,
                )))
            }
            _ => unreachable!("binary update ops handled above"),
        }
    }
}
