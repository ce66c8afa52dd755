//! Abstract syntax tree.
//!
//! Statements and expressions carry their source [`Span`] so runtime errors
//! can point back into the file. Bodies that outlive parsing (function
//! bodies, class declarations, reactive `when` rules) sit behind `Rc` so
//! the interpreter can register them without cloning subtrees.

use std::rc::Rc;

use berd_util::{Span, Symbol};

/// A parsed program: the top-level statement list.
pub type Program = Vec<Stmt>;

// =============================================================================
// STATEMENTS
// =============================================================================

/// A statement with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `{ ... }` - a block introducing a new scope.
    Block(Vec<Stmt>),

    /// `const var NAME<lifetime> = EXPR!!`
    VarDecl {
        decl: DeclKind,
        name: Symbol,
        lifetime: Option<LifetimeSpec>,
        init: Expr,
        priority: i32,
        debug: u8,
    },

    /// Declaration with an array or object pattern in place of the name.
    PatternDecl {
        decl: DeclKind,
        pattern: Pattern,
        init: Expr,
        priority: i32,
        debug: u8,
    },

    /// A bare expression; `debug > 0` means the value is printed.
    Expr { expr: Expr, debug: u8 },

    /// `delete EXPR!`
    Delete { target: Expr },

    /// `reverse!` - flip statement traversal direction.
    Reverse,

    /// `forward!` - restore forward traversal.
    Forward,

    /// `when ...` - register a reactive rule.
    When(Rc<WhenDecl>),

    /// `if COND THEN [idk IDKB] [else ELSEB]`
    If {
        cond: Expr,
        then: Box<Stmt>,
        idk: Option<Box<Stmt>>,
        els: Option<Box<Stmt>>,
    },

    /// `while COND BODY`
    While { cond: Expr, body: Box<Stmt> },

    Break,
    Continue,
    /// `try again` - re-evaluate the enclosing if.
    TryAgain,

    /// `function NAME a, b => BODY`
    FuncDecl { name: Symbol, func: Rc<FuncDef> },

    /// `NAME is a class { ... }`
    ClassDecl(Rc<ClassDeclAst>),

    /// `return [EXPR]!`
    Return { value: Option<Expr> },

    /// `TARGET :OP [ARGS]!` - in-place update.
    Update {
        target: Expr,
        op: UpdateOp,
        args: Vec<Expr>,
    },
}

/// Mutability of a declaration, from its two (or three) leading keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    ConstConst,
    ConstVar,
    VarConst,
    VarVar,
    /// `const const const` - global write-once.
    ConstConstConst,
}

impl DeclKind {
    /// Whether the binding itself may be reassigned.
    pub fn reassignable(&self) -> bool {
        matches!(self, DeclKind::VarConst | DeclKind::VarVar)
    }
}

/// Declaration lifetime: `<N>` statements, `<Ns>` seconds, or `<Infinity>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifetimeSpec {
    Lines(u32),
    Seconds(f64),
    Infinity,
}

/// A reactive rule. Condition form leaves `pattern` empty; pattern form is
/// `when TARGET matches PATTERN [where GUARD] BODY`.
#[derive(Clone, Debug, PartialEq)]
pub struct WhenDecl {
    pub target: Expr,
    pub pattern: Option<Pattern>,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A user function: parameter names and body statements.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub params: Vec<Symbol>,
    pub body: Vec<Stmt>,
}

/// A parsed class declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDeclAst {
    pub name: Symbol,
    pub methods: Vec<MethodDecl>,
    pub properties: Vec<PropertyDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: Symbol,
    pub func: Rc<FuncDef>,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDecl {
    pub name: Symbol,
    pub is_static: bool,
    pub is_fallback: bool,
    pub default: Expr,
}

// =============================================================================
// PATTERNS
// =============================================================================

/// A destructuring or `when`-match pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Bind the whole value to a name.
    Binding(Symbol),
    /// Match against a literal value.
    Literal(Expr),
    /// `[a, b = default, ...rest]`
    Array {
        elements: Vec<PatternElem>,
        rest: Option<Symbol>,
    },
    /// `{name, name: alias, name = default}`
    Object { fields: Vec<FieldPattern> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternElem {
    pub pattern: Pattern,
    pub default: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldPattern {
    /// Field looked up on the matched value.
    pub name: Symbol,
    /// Name bound in the surrounding scope (defaults to `name`).
    pub binding: Symbol,
    pub default: Option<Expr>,
}

impl Pattern {
    /// Collects every name this pattern binds, in source order.
    pub fn bindings(&self, out: &mut Vec<Symbol>) {
        match &self.kind {
            PatternKind::Binding(name) => out.push(*name),
            PatternKind::Literal(_) => {}
            PatternKind::Array { elements, rest } => {
                for elem in elements {
                    elem.pattern.bindings(out);
                }
                if let Some(rest) = rest {
                    out.push(*rest);
                }
            }
            PatternKind::Object { fields } => {
                for field in fields {
                    out.push(field.binding);
                }
            }
        }
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// An expression with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this expression may be assigned to or updated in place.
    pub fn is_assignable(&self) -> bool {
        matches!(self.kind, ExprKind::Ident(_) | ExprKind::Index { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Bool(BoolLit),
    Undefined,
    Ident(Symbol),

    /// `[a, b, c]` - literal array, keys start at -1.
    Array(Vec<Expr>),

    /// `[lo..hi]` and its half-open bracket variants.
    Range(Box<RangeExpr>),

    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinOp,
        /// True when the operator was prefixed with `;` (negated result).
        negated: bool,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `COND ? A [: B] [:: C] [::: D]` - branch by boolean state.
    Cond {
        cond: Box<Expr>,
        on_true: Option<Box<Expr>>,
        on_false: Option<Box<Expr>>,
        on_maybe: Option<Box<Expr>>,
        on_undefined: Option<Box<Expr>>,
    },

    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// `base[index]` with the bracket glued to `base`.
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    /// Postfix `++`/`--` run; evaluates to the value before the updates.
    IncDec {
        target: Box<Expr>,
        steps: Vec<Step>,
    },

    /// Postfix even `*` run; writes back `target^exponent` and evaluates to
    /// the new value.
    PowerRun {
        target: Box<Expr>,
        exponent: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeEnds {
    pub incl_lo: bool,
    pub incl_hi: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeExpr {
    pub lo: Expr,
    pub hi: Expr,
    pub ends: RangeEnds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolLit {
    True,
    False,
    Maybe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Inc,
    Dec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    /// `-x`
    Neg,
    /// `;x` - four-state boolean negation.
    Not,
    /// `||x` - absolute value.
    Abs,
    /// `~x` `~~x` `~~~x` - sin, cos, tan by run length.
    Trig(u8),
    /// `\x` run - n-th root, degree = run length + 1.
    Root(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    /// `=` - display-string comparison.
    VeryLooseEq,
    /// `==`
    LooseEq,
    /// `===`
    StrictEq,
    /// `====`
    VeryStrictEq,
    /// `<>` / `⌊⌋`
    Min,
    /// `><` / `⌈⌉`
    Max,
    /// `▷` / `clamp`
    Clamp,
    /// `↻` / `wrap`
    Wrap,
    /// Infix `\` - `a \ b` is the b-th root of a.
    Root,
}

/// Operator of an update statement `target :OP args`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `:**` run - raise to 1 + run/2.
    Power(u32),
    /// `:\` run - take the (run+1)-th root.
    Root(u32),
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    /// `:??` - assign only while the current value is undefined.
    Nullish,
    /// `:<`
    Min,
    /// `:>`
    Max,
    /// `:~` run - sin/cos/tan in place.
    Trig(u8),
    /// `:▷ [range]`
    Clamp,
    /// `:↻ [delta] [range]`
    Wrap,
}
