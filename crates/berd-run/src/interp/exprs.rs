//! Expression evaluation.

use std::rc::Rc;

use berd_par::{BinOp, Expr, ExprKind, FuncDef, RangeEnds, Step, UnOp};
use berd_util::{Diagnostic, Result, Span, Symbol};

use crate::builtins::{self, Builtin};
use crate::classes::ClassInstance;
use crate::flow::Flow;
use crate::store::AssignError;
use crate::value::{BoolState, NumKey, Value};

use super::{Frame, Interp};

/// The name a method body uses for its receiver.
const RECEIVER: &str = "source";

/// The root identifier of an assignable expression, used to key reactive
/// notifications.
pub(super) fn root_ident(expr: &Expr) -> Option<Symbol> {
    match &expr.kind {
        ExprKind::Ident(name) => Some(*name),
        ExprKind::Index { base, .. } => root_ident(base),
        _ => None,
    }
}

/// Where a `previous`/`next`/`history` argument points.
enum HistTarget {
    Var(Symbol),
    Field {
        class: Symbol,
        field: Symbol,
        is_static: bool,
    },
}

impl<W: std::io::Write> Interp<W> {
    /// Evaluates an expression and enforces the deletion set: producing a
    /// value strictly equal to a deleted primitive is an error.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        let value = self.eval_expr_inner(expr)?;
        if self.deleted.is_deleted(&value) {
            return Err(Diagnostic::deletion(
                format!("Value '{}' has been deleted", value.display()),
                expr.span,
            ));
        }
        Ok(value)
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::string(s)),
            ExprKind::Bool(b) => Ok(Value::Bool(match b {
                berd_par::BoolLit::True => BoolState::True,
                berd_par::BoolLit::False => BoolState::False,
                berd_par::BoolLit::Maybe => BoolState::Maybe,
            })),
            ExprKind::Undefined => Ok(Value::Undefined),

            ExprKind::Ident(name) => self.resolve_ident(*name),

            ExprKind::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::array_from_vec(values))
            }

            ExprKind::Range(_) => Err(Diagnostic::type_error(
                "a range literal is only valid as a clamp or wrap operand",
                expr.span,
            )),

            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                self.apply_unary(*op, &value, expr.span)
            }

            ExprKind::Binary {
                op,
                negated,
                lhs,
                rhs,
            } => {
                if matches!(op, BinOp::Clamp | BinOp::Wrap) {
                    let value = self.eval_expr(lhs)?.to_number();
                    let (lo, hi, ends) = self.eval_range(rhs)?;
                    return Ok(if *op == BinOp::Clamp {
                        clamp_value(value, lo, hi, ends)
                    } else {
                        wrap_value(value, lo, hi, ends)
                    });
                }
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                let result = self.apply_binary(*op, &left, &right, expr.span)?;
                if *negated {
                    return negate_boolean(result, expr.span);
                }
                Ok(result)
            }

            ExprKind::Cond {
                cond,
                on_true,
                on_false,
                on_maybe,
                on_undefined,
            } => {
                let value = self.eval_expr(cond)?;
                let branch = match &value {
                    Value::Bool(BoolState::True) => on_true,
                    Value::Bool(BoolState::False) => on_false,
                    Value::Bool(BoolState::Maybe) => on_maybe,
                    Value::Undefined => on_undefined,
                    other => {
                        if other.is_truthy() {
                            on_true
                        } else {
                            on_false
                        }
                    }
                };
                match branch {
                    Some(expr) => self.eval_expr(expr),
                    None => Ok(Value::Undefined),
                }
            }

            ExprKind::Assign { target, value } => {
                let value = self.eval_expr(value)?;
                self.write_place(target, value.clone(), false)?;
                if let Some(root) = root_ident(target) {
                    self.notify_mutation(root, expr.span)?;
                }
                Ok(value)
            }

            ExprKind::Index { base, index } => {
                let base_value = self.eval_expr(base)?;
                let index_value = self.eval_expr(index)?;
                self.index_read(&base_value, &index_value, expr.span)
            }

            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),

            ExprKind::IncDec { target, steps } => {
                let before = self.eval_expr(target)?;
                let mut n = before.to_number();
                for step in steps {
                    n += match step {
                        Step::Inc => 1.0,
                        Step::Dec => -1.0,
                    };
                }
                self.write_place(target, Value::Number(n), false)?;
                if let Some(root) = root_ident(target) {
                    self.notify_mutation(root, expr.span)?;
                }
                Ok(before)
            }

            ExprKind::PowerRun { target, exponent } => {
                let current = self.eval_expr(target)?.to_number();
                let powered = Value::Number(current.powi(*exponent as i32));
                self.write_place(target, powered.clone(), false)?;
                if let Some(root) = root_ident(target) {
                    self.notify_mutation(root, expr.span)?;
                }
                Ok(powered)
            }
        }
    }

    // =========================================================================
    // NAME RESOLUTION
    // =========================================================================

    /// Lookup chain: call-frame local, const store, variable store, class
    /// singleton; an unresolved identifier is its own name as a string
    /// (the bare-word rule).
    fn resolve_ident(&mut self, name: Symbol) -> Result<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(value) = frame.locals.get(&name) {
                return Ok(value.clone());
            }
        }
        if let Some(value) = self.consts.try_get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.vars.get(name) {
            return Ok(value.clone());
        }
        if self.classes.is_class(name) {
            self.ensure_instance(name)?;
            return Ok(Value::Object(name));
        }
        Ok(Value::string(name.as_str()))
    }

    /// Creates the singleton on first reference, evaluating every declared
    /// instance property default and seeding its field history.
    fn ensure_instance(&mut self, class: Symbol) -> Result<()> {
        if self.classes.has_instance(class) {
            return Ok(());
        }
        let Some(def) = self.classes.def(class) else {
            return Ok(());
        };
        let decl = Rc::clone(&def.decl);
        self.classes.install_instance(class, ClassInstance::default());
        for prop in decl.properties.iter().filter(|p| !p.is_static) {
            let value = self.eval_expr(&prop.default)?;
            self.field_histories.seed(class, prop.name, false, &value);
            if let Some(instance) = self.classes.instance_mut(class) {
                instance.fields.insert(prop.name, value);
            }
        }
        Ok(())
    }

    // =========================================================================
    // INDEXING
    // =========================================================================

    fn index_read(&mut self, base: &Value, index: &Value, span: Span) -> Result<Value> {
        match base {
            Value::Array(map) => {
                let key = index.to_number();
                Ok(map
                    .get(&NumKey(key))
                    .cloned()
                    .unwrap_or(Value::Undefined))
            }
            Value::Object(class) => {
                let field = Symbol::intern(&index.display());
                if let Some(value) = self
                    .classes
                    .instance(*class)
                    .and_then(|inst| inst.fields.get(&field))
                {
                    return Ok(value.clone());
                }
                if let Some(def) = self.classes.def(*class) {
                    if def.method(field, false).is_some() {
                        return Ok(Value::BoundMethod(*class, field));
                    }
                    if let Some(value) = def.statics.get(&field) {
                        return Ok(value.clone());
                    }
                    if def.method(field, true).is_some() {
                        return Ok(Value::BoundMethod(*class, field));
                    }
                    if let Some(fallback) = def.instance_fallback {
                        if let Some(value) = self
                            .classes
                            .instance(*class)
                            .and_then(|inst| inst.fields.get(&fallback))
                        {
                            return Ok(value.clone());
                        }
                    }
                    if let Some(fallback) = def.static_fallback {
                        if let Some(def) = self.classes.def(*class) {
                            if let Some(value) = def.statics.get(&fallback) {
                                return Ok(value.clone());
                            }
                        }
                    }
                }
                Ok(Value::Undefined)
            }
            other => Err(Diagnostic::type_error(
                format!("cannot index into '{}'", other.display()),
                span,
            )),
        }
    }

    // =========================================================================
    // WRITING
    // =========================================================================

    /// Writes `value` into an assignable place.
    ///
    /// `contents` selects which mutability gate applies at the root
    /// identifier: rebinding (`x = v`) checks the first declaration
    /// keyword, an index write-back checks the second.
    pub(crate) fn write_place(
        &mut self,
        target: &Expr,
        value: Value,
        contents: bool,
    ) -> Result<()> {
        match &target.kind {
            ExprKind::Ident(name) => {
                if self.consts.contains(*name) {
                    return Err(Diagnostic::name(
                        format!("'{name}' is a global constant and cannot be assigned"),
                        target.span,
                    ));
                }
                if let Some(frame) = self.frames.last_mut() {
                    if frame.locals.contains_key(name) {
                        frame.locals.insert(*name, value);
                        return Ok(());
                    }
                }
                let result = if contents {
                    self.vars.mutate_contents(*name, value)
                } else {
                    self.vars.assign(*name, value)
                };
                result.map_err(|e| match e {
                    AssignError::NotFound => Diagnostic::name(
                        format!("'{name}' is not defined"),
                        target.span,
                    ),
                    AssignError::NotAssignable => Diagnostic::name(
                        format!("'{name}' is not assignable"),
                        target.span,
                    ),
                    AssignError::ContentsImmutable => Diagnostic::name(
                        format!("the value of '{name}' is immutable"),
                        target.span,
                    ),
                })
            }
            ExprKind::Index { base, index } => {
                let base_value = self.eval_expr(base)?;
                let index_value = self.eval_expr(index)?;
                match base_value {
                    Value::Array(map) => {
                        let key = index_value.to_number();
                        if !key.is_finite() {
                            return Err(Diagnostic::type_error(
                                "array index must be a finite number",
                                index.span,
                            ));
                        }
                        let mut updated = (*map).clone();
                        updated.insert(NumKey(key), value);
                        self.write_place(base, Value::Array(Rc::new(updated)), true)
                    }
                    Value::Object(class) => {
                        let field = Symbol::intern(&index_value.display());
                        let is_static = self
                            .classes
                            .instance(class)
                            .is_some_and(|inst| !inst.fields.contains_key(&field))
                            && self
                                .classes
                                .def(class)
                                .is_some_and(|def| def.statics.contains_key(&field));
                        self.field_histories.record(class, field, is_static, &value);
                        self.set_field_raw(class, field, is_static, value);
                        self.notify_mutation(class, target.span)
                    }
                    other => Err(Diagnostic::type_error(
                        format!("cannot index-assign into '{}'", other.display()),
                        target.span,
                    )),
                }
            }
            _ => Err(Diagnostic::type_error(
                "invalid assignment target",
                target.span,
            )),
        }
    }

    fn set_field_raw(&mut self, class: Symbol, field: Symbol, is_static: bool, value: Value) {
        if is_static {
            if let Some(def) = self.classes.def_mut(class) {
                def.statics.insert(field, value);
            }
        } else if let Some(instance) = self.classes.instance_mut(class) {
            instance.fields.insert(field, value);
        }
    }

    // =========================================================================
    // CALLS
    // =========================================================================

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Result<Value> {
        if let ExprKind::Ident(name) = &callee.kind {
            if let Some(builtin) = Builtin::lookup(name.as_str()) {
                return self.call_builtin(builtin, args, span);
            }
            if let Some(func) = self.functions.get(name).cloned() {
                let values = self.eval_args(args)?;
                return self.call_function(&func, values, None, span);
            }
        }
        let callee_value = self.eval_expr(callee)?;
        match callee_value {
            Value::BoundMethod(class, method) => {
                let func = self
                    .classes
                    .def(class)
                    .and_then(|def| def.func_for(method))
                    .ok_or_else(|| {
                        Diagnostic::type_error(
                            format!("'{class}' has no method '{method}'"),
                            span,
                        )
                    })?;
                let values = self.eval_args(args)?;
                self.call_function(&func, values, Some(Value::Object(class)), span)
            }
            other => Err(Diagnostic::type_error(
                format!("'{}' is not callable", other.display()),
                span,
            )),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Calls a user function: excess arguments are dropped, missing ones
    /// bind `undefined`, and a method receiver binds as `source`.
    fn call_function(
        &mut self,
        func: &Rc<FuncDef>,
        values: Vec<Value>,
        receiver: Option<Value>,
        span: Span,
    ) -> Result<Value> {
        let mut frame = Frame::default();
        for (i, param) in func.params.iter().enumerate() {
            frame
                .locals
                .insert(*param, values.get(i).cloned().unwrap_or(Value::Undefined));
        }
        if let Some(receiver) = receiver {
            frame.locals.insert(Symbol::intern(RECEIVER), receiver);
        }
        self.frames.push(frame);
        let flow = self.run_list(&func.body);
        self.frames.pop();
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Undefined),
            _ => Err(Diagnostic::context(
                "a loop signal escaped a function call",
                span,
            )),
        }
    }

    // =========================================================================
    // BUILT-INS
    // =========================================================================

    fn call_builtin(&mut self, builtin: Builtin, args: &[Expr], span: Span) -> Result<Value> {
        match builtin {
            Builtin::Print => {
                for arg in args {
                    let value = self.eval_expr(arg)?;
                    let text = value.display();
                    self.println(&text)?;
                }
                Ok(Value::Null)
            }

            Builtin::Previous | Builtin::Next => {
                self.check_arity(builtin, args, 1, span)?;
                let back = builtin == Builtin::Previous;
                match self.history_target(&args[0])? {
                    Some(HistTarget::Var(name)) => {
                        let entry = self
                            .vars
                            .entry_mut(name)
                            .expect("history target was resolved above");
                        let changed = if back {
                            entry.step_back()
                        } else {
                            entry.step_forward()
                        };
                        if changed {
                            let value = entry.value.clone();
                            self.notify_mutation(name, span)?;
                            Ok(value)
                        } else {
                            Ok(Value::Undefined)
                        }
                    }
                    Some(HistTarget::Field {
                        class,
                        field,
                        is_static,
                    }) => {
                        let stepped = self
                            .field_histories
                            .get_mut(class, field, is_static)
                            .and_then(|h| if back { h.step_back() } else { h.step_forward() });
                        match stepped {
                            Some(value) => {
                                self.set_field_raw(class, field, is_static, value.clone());
                                self.notify_mutation(class, span)?;
                                Ok(value)
                            }
                            None => Ok(Value::Undefined),
                        }
                    }
                    None => Err(Diagnostic::shape(
                        format!("{} expects a variable or object field", builtin.name()),
                        span,
                    )),
                }
            }

            Builtin::History => {
                self.check_arity(builtin, args, 1, span)?;
                match self.history_target(&args[0])? {
                    Some(HistTarget::Var(name)) => {
                        let entry = self.vars.entry(name).expect("resolved above");
                        Ok(Value::array_from_vec(entry.history().values().to_vec()))
                    }
                    Some(HistTarget::Field {
                        class,
                        field,
                        is_static,
                    }) => Ok(self
                        .field_histories
                        .get(class, field, is_static)
                        .map(|h| Value::array_from_vec(h.values().to_vec()))
                        .unwrap_or(Value::Undefined)),
                    None => Err(Diagnostic::shape(
                        "history expects a variable or object field",
                        span,
                    )),
                }
            }

            Builtin::ToNumber => {
                self.check_arity(builtin, args, 1, span)?;
                let value = self.eval_expr(&args[0])?;
                match &value {
                    Value::Number(_) => Ok(value),
                    Value::Bool(_) => Ok(Value::Number(value.to_number())),
                    Value::Str(_) => {
                        let n = value.to_number();
                        if n.is_nan() {
                            Ok(Value::Undefined)
                        } else {
                            Ok(Value::Number(n))
                        }
                    }
                    _ => Ok(Value::Undefined),
                }
            }

            Builtin::Lines => {
                self.check_arity(builtin, args, 1, span)?;
                let text = self.eval_expr(&args[0])?.display();
                Ok(builtins::split_lines(&text))
            }

            Builtin::Trim => {
                self.check_arity(builtin, args, 1, span)?;
                let text = self.eval_expr(&args[0])?.display();
                Ok(Value::string(text.trim()))
            }

            Builtin::Split => {
                self.check_arity(builtin, args, 2, span)?;
                let text = self.eval_expr(&args[0])?.display();
                let separator = self.eval_expr(&args[1])?.display();
                Ok(builtins::split_text(&text, &separator))
            }

            Builtin::CharAt => {
                self.check_arity(builtin, args, 2, span)?;
                let text = self.eval_expr(&args[0])?.display();
                let index = self.eval_expr(&args[1])?.to_number();
                Ok(builtins::char_at(&text, index))
            }

            Builtin::Slice => {
                self.check_arity(builtin, args, 2, span)?;
                let text = self.eval_expr(&args[0])?.display();
                let start = self.eval_expr(&args[1])?.to_number();
                Ok(builtins::slice_text(&text, start))
            }

            Builtin::ReadFile | Builtin::ReadLines => {
                self.check_arity(builtin, args, 1, span)?;
                let path = self.eval_expr(&args[0])?.display();
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    Diagnostic::io(format!("cannot read '{path}': {e}"), span)
                })?;
                if builtin == Builtin::ReadLines {
                    Ok(builtins::split_lines(&text))
                } else {
                    Ok(Value::string(text))
                }
            }

            Builtin::NumArray => {
                self.check_arity(builtin, args, 2, span)?;
                let init = self.eval_expr(&args[0])?;
                let size = self.eval_expr(&args[1])?.to_number();
                if size.is_nan() || size < 0.0 {
                    return Err(Diagnostic::shape(
                        "numArray size must be a non-negative number",
                        span,
                    ));
                }
                Ok(builtins::num_array(&init, size as usize))
            }
        }
    }

    fn check_arity(
        &self,
        builtin: Builtin,
        args: &[Expr],
        expected: usize,
        span: Span,
    ) -> Result<()> {
        if args.len() != expected {
            return Err(Diagnostic::shape(
                format!(
                    "{} expects {expected} argument(s), got {}",
                    builtin.name(),
                    args.len()
                ),
                span,
            ));
        }
        Ok(())
    }

    fn history_target(&mut self, arg: &Expr) -> Result<Option<HistTarget>> {
        match &arg.kind {
            ExprKind::Ident(name) => {
                if self.vars.entry(*name).is_some() {
                    Ok(Some(HistTarget::Var(*name)))
                } else {
                    Ok(None)
                }
            }
            ExprKind::Index { base, index } => {
                let base_value = self.eval_expr(base)?;
                let Value::Object(class) = base_value else {
                    return Ok(None);
                };
                let field = Symbol::intern(&self.eval_expr(index)?.display());
                let is_static = self
                    .classes
                    .instance(class)
                    .is_some_and(|inst| !inst.fields.contains_key(&field))
                    && self
                        .classes
                        .def(class)
                        .is_some_and(|def| def.statics.contains_key(&field));
                Ok(Some(HistTarget::Field {
                    class,
                    field,
                    is_static,
                }))
            }
            _ => Ok(None),
        }
    }

    // =========================================================================
    // OPERATORS
    // =========================================================================

    fn apply_unary(&self, op: UnOp, value: &Value, span: Span) -> Result<Value> {
        Ok(match op {
            UnOp::Neg => Value::Number(-value.to_number()),
            UnOp::Abs => Value::Number(value.to_number().abs()),
            UnOp::Trig(run) => {
                let n = value.to_number();
                Value::Number(match run {
                    1 => n.sin(),
                    2 => n.cos(),
                    _ => n.tan(),
                })
            }
            UnOp::Root(run) => Value::Number(nth_root(value.to_number(), run as f64 + 1.0)),
            UnOp::Not => return negate_boolean(value.clone(), span),
        })
    }

    /// Binary operator application on already-evaluated operands. Clamp
    /// and wrap never reach here; their range operand is read from the
    /// AST.
    pub(super) fn apply_binary(
        &self,
        op: BinOp,
        lhs: &Value,
        rhs: &Value,
        span: Span,
    ) -> Result<Value> {
        let num = |f: fn(f64, f64) -> f64| Value::Number(f(lhs.to_number(), rhs.to_number()));
        let cmp = |f: fn(f64, f64) -> bool| bool_value(f(lhs.to_number(), rhs.to_number()));
        Ok(match op {
            BinOp::Add => match (lhs, rhs) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                _ => Value::string(format!("{}{}", lhs.display(), rhs.display())),
            },
            BinOp::Sub => num(|a, b| a - b),
            BinOp::Mul => num(|a, b| a * b),
            BinOp::Div => {
                let (a, b) = (lhs.to_number(), rhs.to_number());
                if b.abs() < f64::EPSILON {
                    Value::Undefined
                } else {
                    Value::Number(a / b)
                }
            }
            BinOp::Mod => {
                let (a, b) = (lhs.to_number(), rhs.to_number());
                if b.abs() < f64::EPSILON {
                    Value::Undefined
                } else {
                    Value::Number(a % b)
                }
            }
            BinOp::BitAnd => num(|a, b| ((a as i64) & (b as i64)) as f64),
            BinOp::BitOr => num(|a, b| ((a as i64) | (b as i64)) as f64),
            BinOp::BitXor => num(|a, b| ((a as i64) ^ (b as i64)) as f64),
            BinOp::Shl => num(|a, b| ((a as i64) << ((b as i64) & 63)) as f64),
            BinOp::Shr => num(|a, b| ((a as i64) >> ((b as i64) & 63)) as f64),
            BinOp::Lt => cmp(|a, b| a < b),
            BinOp::Le => cmp(|a, b| a <= b),
            BinOp::Gt => cmp(|a, b| a > b),
            BinOp::Ge => cmp(|a, b| a >= b),
            BinOp::VeryLooseEq => bool_value(lhs.very_loose_eq(rhs)),
            BinOp::LooseEq => bool_value(lhs.loose_eq(rhs)),
            BinOp::StrictEq => bool_value(lhs.strict_eq(rhs)),
            BinOp::VeryStrictEq => bool_value(lhs.very_strict_eq(rhs)),
            BinOp::Min => num(f64::min),
            BinOp::Max => num(f64::max),
            BinOp::Root => {
                let degree = rhs.to_number();
                if degree.abs() < f64::EPSILON {
                    Value::Undefined
                } else {
                    Value::Number(nth_root(lhs.to_number(), degree))
                }
            }
            BinOp::Clamp | BinOp::Wrap => {
                return Err(Diagnostic::type_error(
                    "clamp and wrap need a range operand",
                    span,
                ))
            }
        })
    }

    /// Extracts `(lo, hi, endpoints)` from a range-literal operand.
    pub(super) fn eval_range(&mut self, expr: &Expr) -> Result<(f64, f64, RangeEnds)> {
        match &expr.kind {
            ExprKind::Range(range) => {
                let lo = self.eval_expr(&range.lo)?.to_number();
                let hi = self.eval_expr(&range.hi)?.to_number();
                Ok((lo, hi, range.ends))
            }
            _ => Err(Diagnostic::type_error("expected a range literal", expr.span)),
        }
    }
}

fn bool_value(b: bool) -> Value {
    Value::Bool(if b { BoolState::True } else { BoolState::False })
}

/// Four-state boolean negation: maybe and undefined are their own
/// negations; anything else cannot be negated.
fn negate_boolean(value: Value, span: Span) -> Result<Value> {
    match value {
        Value::Bool(BoolState::True) => Ok(Value::Bool(BoolState::False)),
        Value::Bool(BoolState::False) => Ok(Value::Bool(BoolState::True)),
        Value::Bool(BoolState::Maybe) => Ok(Value::Bool(BoolState::Maybe)),
        Value::Undefined => Ok(Value::Undefined),
        other => Err(Diagnostic::type_error(
            format!("cannot negate '{}'", other.display()),
            span,
        )),
    }
}

/// The n-th root, keeping real results for negative bases with odd
/// integer degrees.
pub(super) fn nth_root(x: f64, degree: f64) -> f64 {
    if x < 0.0 && degree.fract() == 0.0 && (degree as i64) % 2 != 0 {
        -((-x).powf(1.0 / degree))
    } else {
        x.powf(1.0 / degree)
    }
}

/// Pins `value` into a range; exclusive endpoints move one representable
/// step toward the interior. Degenerate or NaN intervals yield undefined.
pub(super) fn clamp_value(value: f64, lo: f64, hi: f64, ends: RangeEnds) -> Value {
    let lo_adj = if ends.incl_lo { lo } else { lo.next_up() };
    let hi_adj = if ends.incl_hi { hi } else { hi.next_down() };
    if value.is_nan() || lo_adj.is_nan() || hi_adj.is_nan() || hi_adj < lo_adj {
        return Value::Undefined;
    }
    Value::Number(value.max(lo_adj).min(hi_adj))
}

/// Wraps `value` into a half-open range of positive width; an inclusive
/// upper endpoint widens the range by one representable step.
pub(super) fn wrap_value(value: f64, lo: f64, hi: f64, ends: RangeEnds) -> Value {
    let lo_adj = if ends.incl_lo { lo } else { lo.next_up() };
    let hi_adj = if ends.incl_hi { hi.next_up() } else { hi };
    let width = hi_adj - lo_adj;
    if value.is_nan() || !width.is_finite() || width <= 0.0 {
        return Value::Undefined;
    }
    Value::Number(((value - lo_adj) % width + width) % width + lo_adj)
}
