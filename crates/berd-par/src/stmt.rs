//! Statement parsing.

use std::rc::Rc;

use berd_lex::{Keyword, TokenKind};
use berd_util::{Result, Span, Symbol};

use crate::ast::*;
use crate::Parser;

/// Truncated spellings of `function` the grammar accepts.
const FUNCTION_WORDS: [&str; 5] = ["func", "fun", "fn", "functi", "f"];

impl Parser {
    /// Parses one statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt> {
        let start = self.span();
        match self.kind().clone() {
            TokenKind::LBrace => {
                let stmts = self.parse_block_stmts()?;
                Ok(self.stmt(StmtKind::Block(stmts), start))
            }
            TokenKind::Kw(Keyword::Const) | TokenKind::Kw(Keyword::Var) => {
                self.parse_declaration()
            }
            TokenKind::Kw(Keyword::Delete) => {
                self.advance();
                let target = self.parse_expr()?;
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Delete { target }, start))
            }
            TokenKind::Kw(Keyword::Reverse) => {
                self.advance();
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Reverse, start))
            }
            TokenKind::Kw(Keyword::Forward) => {
                self.advance();
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Forward, start))
            }
            TokenKind::Kw(Keyword::When) => self.parse_when(),
            TokenKind::Kw(Keyword::If) => self.parse_if(),
            TokenKind::Kw(Keyword::While) => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = Box::new(self.parse_stmt()?);
                Ok(self.stmt(StmtKind::While { cond, body }, start))
            }
            TokenKind::Kw(Keyword::Break) => {
                self.advance();
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Break, start))
            }
            TokenKind::Kw(Keyword::Continue) => {
                self.advance();
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Continue, start))
            }
            TokenKind::Kw(Keyword::Return) => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.parse_terminator();
                Ok(self.stmt(StmtKind::Return { value }, start))
            }
            TokenKind::Ident(sym)
                if sym.as_str() == "try"
                    && matches!(self.peek_kind(1), TokenKind::Ident(next) if next.as_str() == "again") =>
            {
                self.advance();
                self.advance();
                self.parse_terminator();
                Ok(self.stmt(StmtKind::TryAgain, start))
            }
            ref kind if Self::is_function_word(kind) && self.looks_like_function_decl() => {
                let (name, func) = self.parse_func_parts()?;
                self.parse_terminator();
                self.declare_name(name);
                Ok(self.stmt(StmtKind::FuncDecl { name, func }, start))
            }
            ref kind if Self::token_name(kind).is_some() && self.looks_like_class_decl() => {
                self.parse_class_decl()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn stmt(&self, kind: StmtKind, start: Span) -> Stmt {
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Stmt {
            kind,
            span: start.to(end),
        }
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Bang(_)
                | TokenKind::InvertedBang
                | TokenKind::Question(_)
                | TokenKind::RBrace
                | TokenKind::Eof
        )
    }

    /// Parses `{ stmt* }` and returns the inner statements.
    pub(crate) fn parse_block_stmts(&mut self) -> Result<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace, "to open block")?;
        self.push_declared();
        let mut stmts = Vec::new();
        while !matches!(self.kind(), TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.pop_declared();
        self.expect(&TokenKind::RBrace, "to close block")?;
        Ok(stmts)
    }

    // =========================================================================
    // DECLARATIONS
    // =========================================================================

    fn parse_declaration(&mut self) -> Result<Stmt> {
        let start = self.span();
        let first_const = matches!(self.kind(), TokenKind::Kw(Keyword::Const));
        self.advance();
        let second_const = match self.kind() {
            TokenKind::Kw(Keyword::Const) => true,
            TokenKind::Kw(Keyword::Var) => false,
            other => {
                return Err(self.error(format!(
                    "expected 'const' or 'var' in declaration, found {}",
                    other.describe()
                )))
            }
        };
        self.advance();

        let mut decl = match (first_const, second_const) {
            (true, true) => DeclKind::ConstConst,
            (true, false) => DeclKind::ConstVar,
            (false, true) => DeclKind::VarConst,
            (false, false) => DeclKind::VarVar,
        };
        // A third `const` elevates to the global write-once store.
        if decl == DeclKind::ConstConst
            && matches!(self.kind(), TokenKind::Kw(Keyword::Const))
            && (Self::token_name(self.peek_kind(1)).is_some()
                || matches!(self.peek_kind(1), TokenKind::LBracket | TokenKind::LBrace))
        {
            self.advance();
            decl = DeclKind::ConstConstConst;
        }

        if matches!(self.kind(), TokenKind::LBracket | TokenKind::LBrace) {
            let pattern = self.parse_pattern()?;
            self.expect(&TokenKind::Assign, "in declaration")?;
            let init = self.parse_expr()?;
            let term = self.parse_terminator();
            let mut names = Vec::new();
            pattern.bindings(&mut names);
            for name in names {
                self.declare_name(name);
            }
            return Ok(self.stmt(
                StmtKind::PatternDecl {
                    decl,
                    pattern,
                    init,
                    priority: term.priority,
                    debug: term.debug,
                },
                start,
            ));
        }

        let (name, _) = self.parse_name("variable name")?;
        let lifetime = if matches!(self.kind(), TokenKind::Lt) {
            Some(self.parse_lifetime()?)
        } else {
            None
        };
        self.expect(&TokenKind::Assign, "in declaration")?;
        let init = self.parse_expr()?;
        let term = self.parse_terminator();
        self.declare_name(name);
        Ok(self.stmt(
            StmtKind::VarDecl {
                decl,
                name,
                lifetime,
                init,
                priority: term.priority,
                debug: term.debug,
            },
            start,
        ))
    }

    /// `<N>` statements, `<Ns>` seconds, `<Infinity>` forever.
    fn parse_lifetime(&mut self) -> Result<LifetimeSpec> {
        self.advance(); // <
        let spec = match self.kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                if matches!(self.kind(), TokenKind::Ident(sym) if sym.as_str() == "s") {
                    self.advance();
                    LifetimeSpec::Seconds(n)
                } else {
                    LifetimeSpec::Lines(n as u32)
                }
            }
            TokenKind::Ident(sym) if sym.as_str() == "Infinity" => {
                self.advance();
                LifetimeSpec::Infinity
            }
            other => {
                return Err(self.error(format!(
                    "expected lifetime, found {}",
                    other.describe()
                )))
            }
        };
        self.expect(&TokenKind::Gt, "to close lifetime")?;
        Ok(spec)
    }

    // =========================================================================
    // WHEN
    // =========================================================================

    fn parse_when(&mut self) -> Result<Stmt> {
        let start = self.span();
        self.advance(); // when
        let (target, pattern, guard) = self.with_when_header(|p| {
            let target = p.parse_expr()?;
            let mut pattern = None;
            let mut guard = None;
            if matches!(p.kind(), TokenKind::Ident(sym) if sym.as_str() == "matches") {
                p.advance();
                let parsed = p.parse_pattern()?;
                p.push_declared();
                let mut bound = Vec::new();
                parsed.bindings(&mut bound);
                for name in bound {
                    p.declare_name(name);
                }
                if matches!(p.kind(), TokenKind::Ident(sym) if sym.as_str() == "where") {
                    p.advance();
                    guard = Some(p.parse_expr()?);
                }
                p.pop_declared();
                pattern = Some(parsed);
            }
            Ok((target, pattern, guard))
        })?;
        let body = self.parse_block_stmts()?;
        self.parse_terminator();
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Ok(self.stmt(
            StmtKind::When(Rc::new(WhenDecl {
                target,
                pattern,
                guard,
                body,
                span: start.to(end),
            })),
            start,
        ))
    }

    // =========================================================================
    // IF
    // =========================================================================

    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.span();
        self.advance(); // if
        let cond = self.parse_expr()?;
        let then = Box::new(self.parse_stmt()?);
        let mut idk = None;
        let mut els = None;
        loop {
            if matches!(self.kind(), TokenKind::Kw(Keyword::Idk)) {
                if idk.is_some() {
                    return Err(self.error("duplicate 'idk' branch"));
                }
                self.advance();
                idk = Some(Box::new(self.parse_stmt()?));
            } else if matches!(self.kind(), TokenKind::Kw(Keyword::Else)) {
                if els.is_some() {
                    return Err(self.error("duplicate 'else' branch"));
                }
                self.advance();
                els = Some(Box::new(self.parse_stmt()?));
            } else {
                break;
            }
        }
        Ok(self.stmt(StmtKind::If {
            cond,
            then,
            idk,
            els,
        }, start))
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    fn is_function_word(kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Kw(Keyword::Function) => true,
            TokenKind::Ident(sym) => FUNCTION_WORDS.contains(&sym.as_str()),
            _ => false,
        }
    }

    /// Lookahead: function word, then a name, then a parameter list made of
    /// names/commas/parens, then `=>`.
    fn looks_like_function_decl(&self) -> bool {
        let mut idx = self.pos + 1;
        loop {
            match &self.tokens[idx].kind {
                TokenKind::LParen | TokenKind::RParen => idx += 1,
                _ => break,
            }
        }
        if Self::token_name(&self.tokens[idx].kind).is_none() {
            return false;
        }
        idx += 1;
        loop {
            match &self.tokens[idx].kind {
                TokenKind::LParen | TokenKind::RParen | TokenKind::Comma => idx += 1,
                TokenKind::FatArrow => return true,
                kind if Self::token_name(kind).is_some() => idx += 1,
                _ => return false,
            }
        }
    }

    /// Parses `name params => body` after a function word.
    fn parse_func_parts(&mut self) -> Result<(Symbol, Rc<FuncDef>)> {
        self.advance(); // function word
        self.skip_parens();
        let (name, _) = self.parse_name("function name")?;
        let mut params = Vec::new();
        self.skip_parens();
        while let Some(param) = Self::token_name(self.kind()) {
            params.push(param);
            self.advance();
            self.skip_parens();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_parens();
        }
        self.skip_parens();
        self.expect(&TokenKind::FatArrow, "before function body")?;

        self.push_declared();
        for param in &params {
            self.declare_name(*param);
        }
        let body = if matches!(self.kind(), TokenKind::LBrace) {
            self.parse_block_stmts()?
        } else {
            // A bare expression body is sugar for `return EXPR`.
            let start = self.span();
            let value = self.parse_expr()?;
            let span = start.to(value.span);
            vec![Stmt {
                kind: StmtKind::Return { value: Some(value) },
                span,
            }]
        };
        self.pop_declared();
        Ok((name, Rc::new(FuncDef { params, body })))
    }

    // =========================================================================
    // CLASSES
    // =========================================================================

    fn looks_like_class_decl(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::Kw(Keyword::Is))
            && matches!(self.peek_kind(2), TokenKind::Kw(Keyword::A))
            && matches!(self.peek_kind(3), TokenKind::Kw(Keyword::Class))
    }

    fn parse_class_decl(&mut self) -> Result<Stmt> {
        let start = self.span();
        let (name, _) = self.parse_name("class name")?;
        self.advance(); // is
        self.advance(); // a
        self.advance(); // class
        self.expect(&TokenKind::LBrace, "to open class body")?;
        self.push_declared();

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        while !matches!(self.kind(), TokenKind::RBrace) && !self.at_end() {
            let is_static = self.eat(&TokenKind::Kw(Keyword::Static));
            // `fallback` is a flag only when a property name follows it.
            let is_fallback = matches!(self.kind(), TokenKind::Kw(Keyword::Fallback))
                && Self::token_name(self.peek_kind(1)).is_some()
                && self.eat(&TokenKind::Kw(Keyword::Fallback));

            if !is_fallback && Self::is_function_word(self.kind()) && self.looks_like_function_decl()
            {
                let (method_name, func) = self.parse_func_parts()?;
                self.parse_terminator();
                methods.push(MethodDecl {
                    name: method_name,
                    func,
                    is_static,
                });
                continue;
            }

            let (prop_name, _) = self.parse_name("property name")?;
            match self.kind() {
                TokenKind::Colon(1) => {
                    self.advance();
                }
                other => {
                    return Err(self.error(format!(
                        "expected ':' after property name, found {}",
                        other.describe()
                    )))
                }
            }
            let default = self.parse_expr()?;
            self.parse_terminator();
            properties.push(PropertyDecl {
                name: prop_name,
                is_static,
                is_fallback,
                default,
            });
        }
        self.pop_declared();
        self.expect(&TokenKind::RBrace, "to close class body")?;
        self.parse_terminator();
        self.declare_name(name);
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Ok(self.stmt(
            StmtKind::ClassDecl(Rc::new(ClassDeclAst {
                name,
                methods,
                properties,
                span: start.to(end),
            })),
            start,
        ))
    }

    // =========================================================================
    // EXPRESSION AND UPDATE STATEMENTS
    // =========================================================================

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let start = self.span();
        let expr = self.parse_expr()?;

        if expr.is_assignable() && matches!(self.kind(), TokenKind::Colon(1)) {
            if let Some(op) = Self::update_op_for(self.peek_kind(1)) {
                self.advance(); // :
                let op = self.consume_update_op(op)?;
                let args = self.parse_update_args(op)?;
                self.parse_terminator();
                return Ok(self.stmt(
                    StmtKind::Update {
                        target: expr,
                        op,
                        args,
                    },
                    start,
                ));
            }
        }

        let term = self.parse_terminator();
        Ok(self.stmt(
            StmtKind::Expr {
                expr,
                debug: term.debug,
            },
            start,
        ))
    }

    /// Maps the token after the `:` to an update operator, if it is one.
    fn update_op_for(kind: &TokenKind) -> Option<UpdateOp> {
        Some(match kind {
            TokenKind::Plus => UpdateOp::Add,
            TokenKind::Minus => UpdateOp::Sub,
            TokenKind::Star => UpdateOp::Mul,
            TokenKind::Slash => UpdateOp::Div,
            TokenKind::Percent => UpdateOp::Mod,
            TokenKind::StarRun(n) => UpdateOp::Power(1 + (*n as u32) / 2),
            TokenKind::RootRun(n) => UpdateOp::Root(*n as u32 + 1),
            TokenKind::Amp => UpdateOp::BitAnd,
            TokenKind::Pipe => UpdateOp::BitOr,
            TokenKind::Caret => UpdateOp::BitXor,
            TokenKind::Shl => UpdateOp::Shl,
            TokenKind::Shr => UpdateOp::Shr,
            TokenKind::Question(2) => UpdateOp::Nullish,
            TokenKind::Lt => UpdateOp::Min,
            TokenKind::Gt => UpdateOp::Max,
            TokenKind::TildeRun(n) if *n <= 3 => UpdateOp::Trig(*n),
            TokenKind::ClampOp | TokenKind::Kw(Keyword::Clamp) => UpdateOp::Clamp,
            TokenKind::WrapOp | TokenKind::Kw(Keyword::Wrap) => UpdateOp::Wrap,
            _ => return None,
        })
    }

    fn consume_update_op(&mut self, op: UpdateOp) -> Result<UpdateOp> {
        if let (UpdateOp::Power(_), TokenKind::StarRun(n)) = (op, self.kind()) {
            if *n % 2 != 0 {
                return Err(self.error("power update must have an even number of '*'"));
            }
        }
        self.advance();
        Ok(op)
    }

    fn parse_update_args(&mut self, op: UpdateOp) -> Result<Vec<Expr>> {
        match op {
            UpdateOp::Power(_) | UpdateOp::Root(_) | UpdateOp::Trig(_) => Ok(Vec::new()),
            UpdateOp::Wrap => {
                let first = self.parse_expr()?;
                if self.begins_expression_at(self.pos) {
                    let second = self.parse_expr()?;
                    Ok(vec![first, second])
                } else {
                    Ok(vec![first])
                }
            }
            _ => Ok(vec![self.parse_expr()?]),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn parse_one(source: &str) -> Stmt {
        let mut program = parse(source).expect("parse failure");
        assert_eq!(program.len(), 1, "expected one statement");
        program.remove(0)
    }

    #[test]
    fn test_declaration_kinds() {
        let decl = |src: &str| match parse_one(src).kind {
            StmtKind::VarDecl { decl, .. } => decl,
            other => panic!("expected declaration, got {other:?}"),
        };
        assert_eq!(decl("const const x = 1!"), DeclKind::ConstConst);
        assert_eq!(decl("const var x = 1!"), DeclKind::ConstVar);
        assert_eq!(decl("var const x = 1!"), DeclKind::VarConst);
        assert_eq!(decl("var var x = 1!"), DeclKind::VarVar);
        assert_eq!(decl("const const const x = 1!"), DeclKind::ConstConstConst);
    }

    #[test]
    fn test_declaration_priority_and_debug() {
        match parse_one("var var x = 1!!!").kind {
            StmtKind::VarDecl { priority, .. } => assert_eq!(priority, 3),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("var var x = 1¡").kind {
            StmtKind::VarDecl { priority, .. } => assert_eq!(priority, 0),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("var var x = 1?").kind {
            StmtKind::VarDecl { debug, .. } => assert_eq!(debug, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_keyword_as_variable_name() {
        match parse_one("var var a = 0!").kind {
            StmtKind::VarDecl { name, .. } => assert_eq!(name.as_str(), "a"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lifetimes() {
        let lifetime = |src: &str| match parse_one(src).kind {
            StmtKind::VarDecl { lifetime, .. } => lifetime,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(lifetime("var var x<2> = 1!"), Some(LifetimeSpec::Lines(2)));
        assert_eq!(
            lifetime("var var x<5s> = 1!"),
            Some(LifetimeSpec::Seconds(5.0))
        );
        assert_eq!(
            lifetime("var var x<Infinity> = 1!"),
            Some(LifetimeSpec::Infinity)
        );
        assert_eq!(lifetime("var var x = 1!"), None);
    }

    #[test]
    fn test_destructuring_declaration() {
        match parse_one("var var [a, b = 2, ...rest] = xs!").kind {
            StmtKind::PatternDecl { pattern, .. } => {
                assert!(matches!(pattern.kind, PatternKind::Array { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("const const {x, y: alias} = point!").kind {
            StmtKind::PatternDecl { pattern, .. } => {
                assert!(matches!(pattern.kind, PatternKind::Object { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reverse_forward_delete() {
        assert!(matches!(parse_one("reverse!").kind, StmtKind::Reverse));
        assert!(matches!(parse_one("forward!").kind, StmtKind::Forward));
        assert!(matches!(
            parse_one("delete 3!").kind,
            StmtKind::Delete { .. }
        ));
    }

    #[test]
    fn test_if_idk_else_any_order() {
        match parse_one("if maybe { 1! } idk { 2! } else { 3! }").kind {
            StmtKind::If { idk, els, .. } => {
                assert!(idk.is_some());
                assert!(els.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("if maybe { 1! } else { 3! } idk { 2! }").kind {
            StmtKind::If { idk, els, .. } => {
                assert!(idk.is_some());
                assert!(els.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_while_break_continue_try_again() {
        match parse_one("while x < 3 { break! }").kind {
            StmtKind::While { body, .. } => {
                assert!(matches!(body.kind, StmtKind::Block(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse_one("continue!").kind, StmtKind::Continue));
        assert!(matches!(parse_one("try again!").kind, StmtKind::TryAgain));
    }

    #[test]
    fn test_function_spellings() {
        for head in ["function", "func", "fun", "fn", "functi", "f"] {
            let source = format!("{head} add a, b => a + b!");
            match parse_one(&source).kind {
                StmtKind::FuncDecl { name, func } => {
                    assert_eq!(name.as_str(), "add");
                    assert_eq!(func.params.len(), 2);
                    assert!(matches!(func.body[0].kind, StmtKind::Return { .. }));
                }
                other => panic!("unexpected {other:?} for {head}"),
            }
        }
    }

    #[test]
    fn test_function_with_parens_and_block() {
        match parse_one("function greet(name) => { print name! }").kind {
            StmtKind::FuncDecl { func, .. } => {
                assert_eq!(func.params.len(), 1);
                assert_eq!(func.body.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_function_word_still_callable() {
        // `f` only starts a declaration when followed by name ... =>
        match parse_one("f 1!").kind {
            StmtKind::Expr { expr, .. } => {
                assert!(matches!(expr.kind, ExprKind::Call { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_when_condition_form() {
        match parse_one("when a > 2 { print \"big\"! }").kind {
            StmtKind::When(decl) => {
                assert!(decl.pattern.is_none());
                assert_eq!(decl.body.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_when_pattern_form() {
        match parse_one("when xs matches [a, b] where a < b { print a! }").kind {
            StmtKind::When(decl) => {
                assert!(decl.pattern.is_some());
                assert!(decl.guard.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_class_declaration() {
        let source = "Player is a class {
            health: 100!
            static count: 0!
            fallback missing: \"none\"!
            function heal amount => { }
            static function reset => { }
        }";
        match parse_one(source).kind {
            StmtKind::ClassDecl(class) => {
                assert_eq!(class.name.as_str(), "Player");
                assert_eq!(class.properties.len(), 3);
                assert!(class.properties[1].is_static);
                assert!(class.properties[2].is_fallback);
                assert_eq!(class.methods.len(), 2);
                assert!(class.methods[1].is_static);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_return_forms() {
        assert!(matches!(
            parse_one("return!").kind,
            StmtKind::Return { value: None }
        ));
        assert!(matches!(
            parse_one("return 5!").kind,
            StmtKind::Return { value: Some(_) }
        ));
    }

    #[test]
    fn test_update_statements() {
        let update = |src: &str| match parse_one(src).kind {
            StmtKind::Update { op, args, .. } => (op, args.len()),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(update("x :+ 5!"), (UpdateOp::Add, 1));
        assert_eq!(update("x :?? 3!"), (UpdateOp::Nullish, 1));
        assert_eq!(update("x :< 10!"), (UpdateOp::Min, 1));
        assert_eq!(update("x :****!"), (UpdateOp::Power(3), 0));
        assert_eq!(update("x :\\\\!"), (UpdateOp::Root(3), 0));
        assert_eq!(update("x :~~!"), (UpdateOp::Trig(2), 0));
        assert_eq!(update("x :▷ [0..10]!"), (UpdateOp::Clamp, 1));
        assert_eq!(update("x :↻ [0..10)!"), (UpdateOp::Wrap, 1));
        assert_eq!(update("x :↻ 5 [0..10)!"), (UpdateOp::Wrap, 2));
        assert_eq!(update("x :clamp [0..1]!"), (UpdateOp::Clamp, 1));
    }

    #[test]
    fn test_debug_expression_statement() {
        match parse_one("x?").kind {
            StmtKind::Expr { debug, .. } => assert_eq!(debug, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_block_statement() {
        match parse_one("{ var var x = 1!  print x! }").kind {
            StmtKind::Block(stmts) => assert_eq!(stmts.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_program_of_scenario_statements() {
        let program = parse(
            "var var x = 1!\n x = 2!\n x = 3!\n print history(x)!",
        )
        .unwrap();
        assert_eq!(program.len(), 4);
    }

    #[test]
    fn test_unexpected_token_is_fatal() {
        assert!(parse("var var = 3!").is_err());
        assert!(parse("if { }").is_err());
    }
}
