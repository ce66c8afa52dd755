//! Expression parsing: a Pratt core driven by whitespace-weighted
//! precedence.
//!
//! The effective precedence of a binary operator occurrence is
//!
//! ```text
//! eff = base(op) - SPACE_WEIGHT * (spaces_left + spaces_right)
//! ```
//!
//! where `SPACE_WEIGHT` exceeds the whole base table, so one extra space on
//! either side outweighs any intrinsic difference between operators. The
//! gap widths come straight from token byte offsets, and skipped `(`/`)`
//! tokens fall inside those gaps. That single rule makes author-inserted
//! parentheses behave conventionally: in `(a + b) * c` the `*` carries the
//! `)` in its left gap and binds looser than the snug `+`.
//!
//! On top of the Pratt loop sit the contextual pieces: prefix operators,
//! glued-bracket indexing, postfix `++`/`--`/`**` runs, paren-less calls,
//! the `? : :: :::` conditional, array literals and range literals, and
//! number-word literals.

use berd_lex::{Keyword, TokenKind};
use berd_util::Result;

use crate::ast::*;
use crate::Parser;

/// One space around an operator outweighs any base-table difference.
pub(crate) const SPACE_WEIGHT: i32 = 10;

/// Base precedence table. Higher binds tighter at equal spacing.
fn base_prec(op: BinOp) -> i32 {
    match op {
        BinOp::VeryLooseEq | BinOp::LooseEq | BinOp::StrictEq | BinOp::VeryStrictEq => 1,
        BinOp::Lt
        | BinOp::Le
        | BinOp::Gt
        | BinOp::Ge
        | BinOp::Min
        | BinOp::Max
        | BinOp::Clamp
        | BinOp::Wrap => 2,
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => 3,
        BinOp::Add | BinOp::Sub => 4,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 5,
        BinOp::Root => 6,
    }
}

/// Operators a prefix `;` may negate.
fn negatable(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::VeryLooseEq
            | BinOp::LooseEq
            | BinOp::StrictEq
            | BinOp::VeryStrictEq
            | BinOp::Lt
            | BinOp::Le
            | BinOp::Gt
            | BinOp::Ge
    )
}

/// A binary operator occurrence found at the cursor.
struct InfixOp {
    op: BinOp,
    negated: bool,
    /// Number of tokens the occurrence spans (2 when `;`-prefixed).
    token_count: usize,
}

impl Parser {
    /// Parses a full expression, including a trailing conditional.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr> {
        let lhs = self.parse_expr_bp(i32::MIN)?;
        self.parse_cond_suffix(lhs)
    }

    /// The Pratt loop. Consumes operators whose effective precedence
    /// exceeds `min_bp`; equal precedence stops, giving left associativity.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: i32) -> Result<Expr> {
        self.skip_parens();
        let mut lhs = self.parse_prefix()?;

        loop {
            self.skip_parens();

            // Assignment: loosest of all, right-associative, and only when
            // the left side is a writable place. Otherwise a lone `=` falls
            // through to very-loose equality below.
            if matches!(self.kind(), TokenKind::Assign)
                && lhs.is_assignable()
                && min_bp == i32::MIN
            {
                self.advance();
                let value = self.parse_expr()?;
                let span = lhs.span.to(value.span);
                lhs = Expr::new(
                    ExprKind::Assign {
                        target: Box::new(lhs),
                        value: Box::new(value),
                    },
                    span,
                );
                continue;
            }

            let Some(infix) = self.peek_infix_op() else {
                break;
            };
            let first = self.pos_index();
            let last = first + infix.token_count - 1;
            let eff = base_prec(infix.op)
                .saturating_sub(SPACE_WEIGHT.saturating_mul(self.op_whitespace(first, last)));
            if eff <= min_bp {
                break;
            }
            for _ in 0..infix.token_count {
                self.advance();
            }
            let rhs = self.parse_expr_bp(eff)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op: infix.op,
                    negated: infix.negated,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    pub(crate) fn pos_index(&self) -> usize {
        self.pos
    }

    /// Identifies a binary operator at the cursor without consuming it.
    fn peek_infix_op(&self) -> Option<InfixOp> {
        let plain = |op| {
            Some(InfixOp {
                op,
                negated: false,
                token_count: 1,
            })
        };
        match self.kind() {
            TokenKind::Plus => plain(BinOp::Add),
            TokenKind::Minus => plain(BinOp::Sub),
            TokenKind::Star => plain(BinOp::Mul),
            TokenKind::Slash => plain(BinOp::Div),
            TokenKind::Percent => plain(BinOp::Mod),
            TokenKind::Amp => plain(BinOp::BitAnd),
            TokenKind::Pipe => plain(BinOp::BitOr),
            TokenKind::Caret => plain(BinOp::BitXor),
            TokenKind::Shl => plain(BinOp::Shl),
            TokenKind::Shr => plain(BinOp::Shr),
            TokenKind::Lt => plain(BinOp::Lt),
            TokenKind::LtEq => plain(BinOp::Le),
            TokenKind::Gt => plain(BinOp::Gt),
            TokenKind::GtEq => plain(BinOp::Ge),
            TokenKind::Assign => plain(BinOp::VeryLooseEq),
            TokenKind::EqEq => plain(BinOp::LooseEq),
            TokenKind::EqEqEq => plain(BinOp::StrictEq),
            TokenKind::EqEqEqEq => plain(BinOp::VeryStrictEq),
            TokenKind::MinOp => plain(BinOp::Min),
            TokenKind::MaxOp => plain(BinOp::Max),
            TokenKind::ClampOp | TokenKind::Kw(Keyword::Clamp) => plain(BinOp::Clamp),
            TokenKind::WrapOp | TokenKind::Kw(Keyword::Wrap) => plain(BinOp::Wrap),
            TokenKind::RootRun(1) => plain(BinOp::Root),
            TokenKind::Semi => {
                // `;` negates an immediately following comparison.
                let inner = match self.peek_kind(1) {
                    TokenKind::Assign => BinOp::VeryLooseEq,
                    TokenKind::EqEq => BinOp::LooseEq,
                    TokenKind::EqEqEq => BinOp::StrictEq,
                    TokenKind::EqEqEqEq => BinOp::VeryStrictEq,
                    TokenKind::Lt => BinOp::Lt,
                    TokenKind::LtEq => BinOp::Le,
                    TokenKind::Gt => BinOp::Gt,
                    TokenKind::GtEq => BinOp::Ge,
                    _ => return None,
                };
                debug_assert!(negatable(inner));
                Some(InfixOp {
                    op: inner,
                    negated: true,
                    token_count: 2,
                })
            }
            _ => None,
        }
    }

    // =========================================================================
    // PREFIX AND ATOMS
    // =========================================================================

    fn parse_prefix(&mut self) -> Result<Expr> {
        self.skip_parens();
        let span = self.span();
        let unop = match self.kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Semi => Some(UnOp::Not),
            TokenKind::PipePipe => Some(UnOp::Abs),
            TokenKind::TildeRun(n) => {
                if *n > 3 {
                    return Err(self.error("too many '~' for a trig operator"));
                }
                Some(UnOp::Trig(*n))
            }
            TokenKind::RootRun(n) => Some(UnOp::Root(*n)),
            _ => None,
        };
        if let Some(op) = unop {
            self.advance();
            let operand = self.parse_prefix()?;
            let span = span.to(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        let atom = self.parse_atom()?;
        self.parse_postfix(atom)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        self.skip_parens();
        if self.looks_like_range(self.pos_index()) {
            return self.parse_range();
        }
        let span = self.span();
        match self.kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::Str(s), span))
            }
            TokenKind::Kw(Keyword::True) => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(BoolLit::True), span))
            }
            TokenKind::Kw(Keyword::False) => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(BoolLit::False), span))
            }
            TokenKind::Kw(Keyword::Maybe) => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(BoolLit::Maybe), span))
            }
            TokenKind::Kw(Keyword::Undefined) => {
                self.advance();
                Ok(Expr::new(ExprKind::Undefined, span))
            }
            // Benign keywords double as plain names in value position.
            TokenKind::Kw(
                kw @ (Keyword::A
                | Keyword::Is
                | Keyword::Static
                | Keyword::Fallback
                | Keyword::Clamp
                | Keyword::Wrap),
            ) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Ident(berd_util::Symbol::intern(kw.lexeme())),
                    span,
                ))
            }
            TokenKind::Ident(sym) => {
                if !self.is_stop_word(sym)
                    && crate::numword::starts_number(sym.as_str())
                    && !self.is_declared(sym)
                {
                    return self.parse_number_words();
                }
                self.advance();
                Ok(Expr::new(ExprKind::Ident(sym), span))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            other => Err(self.error(format!(
                "expected expression, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr> {
        let start = self.span();
        self.advance(); // [
        let mut elements = Vec::new();
        loop {
            self.skip_parens();
            if matches!(self.kind(), TokenKind::RBracket) || self.at_end() {
                break;
            }
            elements.push(self.parse_expr()?);
            self.skip_parens();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBracket, "to close array literal")?;
        Ok(Expr::new(ExprKind::Array(elements), start.to(close.span)))
    }

    // =========================================================================
    // RANGES
    // =========================================================================

    /// Parses a range literal. All four endpoint combinations are written
    /// with brackets: `[lo..hi]`, `[lo..hi)`, `(lo..hi]`, `(lo..hi)`, and
    /// the reversed-bracket exclusive-low form `]lo..hi[`.
    fn parse_range(&mut self) -> Result<Expr> {
        let start = self.span();
        let incl_lo = match self.kind() {
            TokenKind::LBracket => true,
            TokenKind::LParen | TokenKind::RBracket => false,
            _ => return Err(self.error("expected range opening bracket")),
        };
        self.advance();
        let lo = self.parse_range_bound()?;
        self.expect(&TokenKind::DotDot, "between range bounds")?;
        let hi = self.parse_range_bound()?;
        let incl_hi = match self.kind() {
            TokenKind::RBracket => true,
            TokenKind::RParen | TokenKind::LBracket => false,
            other => {
                return Err(self.error(format!(
                    "expected range closing bracket, found {}",
                    other.describe()
                )))
            }
        };
        let close = self.advance();
        Ok(Expr::new(
            ExprKind::Range(Box::new(RangeExpr {
                lo,
                hi,
                ends: RangeEnds { incl_lo, incl_hi },
            })),
            start.to(close.span),
        ))
    }

    /// Range bounds are simple unary terms. Keeping them free of
    /// paren-skipping and call continuation is what lets `)` and `[` act as
    /// range delimiters.
    fn parse_range_bound(&mut self) -> Result<Expr> {
        let span = self.span();
        if self.eat(&TokenKind::Minus) {
            let inner = self.parse_range_bound()?;
            let span = span.to(inner.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnOp::Neg,
                    operand: Box::new(inner),
                },
                span,
            ));
        }
        match self.kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            TokenKind::Ident(sym) => {
                self.advance();
                Ok(Expr::new(ExprKind::Ident(sym), span))
            }
            TokenKind::Kw(Keyword::Undefined) => {
                self.advance();
                Ok(Expr::new(ExprKind::Undefined, span))
            }
            other => Err(self.error(format!(
                "expected range bound, found {}",
                other.describe()
            ))),
        }
    }

    // =========================================================================
    // POSTFIX: INDEXING, INC/DEC RUNS, POWER RUNS, CALLS
    // =========================================================================

    fn parse_postfix(&mut self, mut lhs: Expr) -> Result<Expr> {
        loop {
            match self.kind().clone() {
                // Indexing only when the bracket is glued to the target.
                TokenKind::LBracket
                    if self.glued_to_previous() && !self.looks_like_range(self.pos_index()) =>
                {
                    self.advance();
                    let index = self.parse_expr()?;
                    let close = self.expect(&TokenKind::RBracket, "to close index")?;
                    let span = lhs.span.to(close.span);
                    lhs = Expr::new(
                        ExprKind::Index {
                            base: Box::new(lhs),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    if !lhs.is_assignable() {
                        return Err(self.error("'++'/'--' need an assignable target"));
                    }
                    let mut steps = Vec::new();
                    let mut end = self.span();
                    loop {
                        match self.kind() {
                            TokenKind::PlusPlus => steps.push(Step::Inc),
                            TokenKind::MinusMinus => steps.push(Step::Dec),
                            _ => break,
                        }
                        end = self.span();
                        self.advance();
                    }
                    let span = lhs.span.to(end);
                    lhs = Expr::new(
                        ExprKind::IncDec {
                            target: Box::new(lhs),
                            steps,
                        },
                        span,
                    );
                }
                TokenKind::StarRun(n) => {
                    let n = n as u32;
                    if n % 2 != 0 {
                        return Err(self.error("power run must have an even number of '*'"));
                    }
                    if !lhs.is_assignable() {
                        return Err(self.error("power run needs an assignable target"));
                    }
                    let end = self.span();
                    self.advance();
                    let span = lhs.span.to(end);
                    lhs = Expr::new(
                        ExprKind::PowerRun {
                            target: Box::new(lhs),
                            exponent: 1 + n / 2,
                        },
                        span,
                    );
                }
                _ => {
                    // Paren-less call: a name-like callee followed, on the
                    // same line, by a token that begins an argument and is
                    // not a binary operator continuation.
                    if matches!(lhs.kind, ExprKind::Ident(_) | ExprKind::Index { .. })
                        && self.same_line_continuation(self.pos_index())
                        && self.begins_expression_at(self.pos_index())
                    {
                        lhs = self.parse_call(lhs)?;
                        continue;
                    }
                    return Ok(lhs);
                }
            }
        }
    }

    fn glued_to_previous(&self) -> bool {
        let idx = self.pos_index();
        idx > 0 && self.tokens[idx - 1].span.end == self.tokens[idx].span.start
    }

    fn parse_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut args = Vec::new();
        let mut span = callee.span;
        loop {
            let arg = self.parse_expr()?;
            span = span.to(arg.span);
            args.push(arg);
            self.skip_parens();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    /// Whether the token at `idx` (after paren-whitespace) can begin an
    /// expression in argument position.
    pub(crate) fn begins_expression_at(&self, mut idx: usize) -> bool {
        loop {
            match &self.tokens[idx].kind {
                TokenKind::LParen => {
                    if self.looks_like_range(idx) {
                        return true;
                    }
                    idx += 1;
                }
                TokenKind::RParen => idx += 1,
                TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::LBracket
                | TokenKind::PipePipe
                | TokenKind::TildeRun(_)
                | TokenKind::RootRun(_) => return true,
                TokenKind::Ident(sym) => return !self.is_stop_word(*sym),
                TokenKind::Kw(
                    Keyword::True
                    | Keyword::False
                    | Keyword::Maybe
                    | Keyword::Undefined
                    | Keyword::A
                    | Keyword::Is
                    | Keyword::Static
                    | Keyword::Fallback,
                ) => return true,
                // `;` starts an argument only as a unary not, never when it
                // prefixes a comparison operator.
                TokenKind::Semi => {
                    return !matches!(
                        self.tokens[(idx + 1).min(self.tokens.len() - 1)].kind,
                        TokenKind::Assign
                            | TokenKind::EqEq
                            | TokenKind::EqEqEq
                            | TokenKind::EqEqEqEq
                            | TokenKind::Lt
                            | TokenKind::LtEq
                            | TokenKind::Gt
                            | TokenKind::GtEq
                    )
                }
                _ => return false,
            }
        }
    }

    // =========================================================================
    // CONDITIONAL
    // =========================================================================

    /// Parses `COND ? A [: B] [:: C] [::: D]` if a conditional follows.
    ///
    /// A lone `?` that is not followed by something expression-shaped is
    /// left in place for the statement terminator (debug marker).
    fn parse_cond_suffix(&mut self, cond: Expr) -> Result<Expr> {
        self.skip_parens();
        if !matches!(self.kind(), TokenKind::Question(1))
            || !self.same_line_continuation(self.pos_index())
            || !self.same_line_continuation(self.pos_index() + 1)
            || !self.begins_expression_at(self.pos_index() + 1)
        {
            return Ok(cond);
        }
        self.advance();
        let on_true = self.parse_expr_bp(i32::MIN)?;
        let mut span = cond.span.to(on_true.span);
        let mut on_false = None;
        let mut on_maybe = None;
        let mut on_undefined = None;
        loop {
            self.skip_parens();
            let TokenKind::Colon(n) = self.kind() else {
                break;
            };
            let n = *n;
            if n > 3 {
                return Err(self.error("too many ':' in conditional"));
            }
            self.advance();
            let branch = self.parse_expr_bp(i32::MIN)?;
            span = span.to(branch.span);
            let slot = match n {
                1 => &mut on_false,
                2 => &mut on_maybe,
                _ => &mut on_undefined,
            };
            *slot = Some(Box::new(branch));
        }
        Ok(Expr::new(
            ExprKind::Cond {
                cond: Box::new(cond),
                on_true: Some(Box::new(on_true)),
                on_false,
                on_maybe,
                on_undefined,
            },
            span,
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
