//! Expression compiler.
//!
//! The flat node list is folded into an expression tree once, at compile
//! time. Binding follows the usual scripting rules: `!` tightest, then
//! comparisons, then `&&`, then `||`, each left to right. A node list that
//! does not form an expression still compiles; the problem is reported by
//! every call to [`Compiled::evaluate`], so a bad directive fails at render
//! time like any other evaluation error.

use std::cmp::Ordering;
use std::rc::Rc;

use que_carton::CompactString;
use que_relief::{
    Arguments, AstNode, ComparisonOp, EvalError, EvalResult, FieldRef, LogicalOp, Value,
};

use crate::dependencies::Dependencies;
use crate::scope::{resolve_arguments, Scope};

/// Evaluable expression tree
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Field(FieldRef),
    Call { name: FieldRef, args: Arguments },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A compiled directive expression
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    nodes: Vec<AstNode>,
    source: String,
    /// `None` for an empty expression, `Err` for an invalid one
    program: Result<Option<Expr>, CompactString>,
    dependencies: Dependencies,
}

/// Compile a node list
pub fn compile(nodes: Vec<AstNode>) -> Compiled {
    let source = serialize(&nodes);
    let program = TreeBuilder::new(&nodes).build();
    if let Err(message) = &program {
        tracing::debug!(%source, %message, "expression will fail when evaluated");
    }
    let dependencies = Dependencies::of_nodes(&nodes);
    Compiled {
        nodes,
        source,
        program,
        dependencies,
    }
}

/// Tokenize, classify and compile a directive value
pub fn compile_expression(source: &str) -> Compiled {
    compile(que_armature::parse_expression(source))
}

/// Concatenate nodes in source order: calls are appended as-is, every other
/// node is preceded by a space.
fn serialize(nodes: &[AstNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        if !matches!(node, AstNode::Function(_)) {
            out.push(' ');
        }
        out.push_str(&node.to_string());
    }
    out
}

impl Compiled {
    /// The classified nodes, in source order
    pub fn nodes(&self) -> &[AstNode] {
        &self.nodes
    }

    /// Serialized form, e.g. ` context.count > 0`
    pub fn to_source(&self) -> &str {
        &self.source
    }

    /// Whether the nodes form a valid expression
    pub fn is_valid(&self) -> bool {
        self.program.is_ok()
    }

    /// Fields this expression may read
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Evaluate against live state. Every call re-reads all fields and
    /// re-invokes all methods.
    pub fn evaluate<S: Scope + ?Sized>(&self, scope: &S) -> EvalResult {
        match &self.program {
            Ok(Some(expr)) => eval(expr, scope),
            Ok(None) => Ok(Value::Undefined),
            Err(message) => Err(EvalError::syntax(self.source.trim_start(), message.clone())),
        }
    }

    /// Bind to a component context, producing a no-argument callable
    pub fn bind<S>(self: Rc<Self>, scope: Rc<S>) -> impl Fn() -> EvalResult
    where
        S: Scope + ?Sized + 'static,
    {
        move || self.evaluate(&*scope)
    }
}

fn eval<S: Scope + ?Sized>(expr: &Expr, scope: &S) -> EvalResult {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Field(field) => Ok(scope.field(field.name())),
        Expr::Call { name, args } => scope.call(name.name(), &resolve_arguments(args, scope)),
        Expr::Not(inner) => Ok(Value::Bool(!eval(inner, scope)?.is_truthy())),
        Expr::And(left, right) => {
            let left = eval(left, scope)?;
            if left.is_truthy() {
                eval(right, scope)
            } else {
                Ok(left)
            }
        }
        Expr::Or(left, right) => {
            let left = eval(left, scope)?;
            if left.is_truthy() {
                Ok(left)
            } else {
                eval(right, scope)
            }
        }
        Expr::Compare { op, left, right } => {
            let left = eval(left, scope)?;
            let right = eval(right, scope)?;
            Ok(Value::Bool(compare(*op, &left, &right)))
        }
    }
}

fn compare(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    match op {
        ComparisonOp::StrictEq => left.strict_eq(right),
        ComparisonOp::StrictNe => !left.strict_eq(right),
        ComparisonOp::LooseEq => left.loose_eq(right),
        ComparisonOp::LooseNe => !left.loose_eq(right),
        ComparisonOp::Lt => left.loose_cmp(right) == Some(Ordering::Less),
        ComparisonOp::Le => matches!(
            left.loose_cmp(right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ComparisonOp::Gt => left.loose_cmp(right) == Some(Ordering::Greater),
        ComparisonOp::Ge => matches!(
            left.loose_cmp(right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Precedence-climbing fold over the flat node list
struct TreeBuilder<'n> {
    nodes: &'n [AstNode],
    pos: usize,
}

type BuildResult = Result<Expr, CompactString>;

impl<'n> TreeBuilder<'n> {
    fn new(nodes: &'n [AstNode]) -> Self {
        Self { nodes, pos: 0 }
    }

    fn build(mut self) -> Result<Option<Expr>, CompactString> {
        if self.nodes.is_empty() {
            return Ok(None);
        }
        let expr = self.or()?;
        match self.nodes.get(self.pos) {
            None => Ok(Some(expr)),
            Some(node) => Err(format!("unexpected `{node}` after a complete operand").into()),
        }
    }

    fn peek(&self) -> Option<&'n AstNode> {
        self.nodes.get(self.pos)
    }

    fn eat_logical(&mut self, op: LogicalOp) -> bool {
        if self.peek() == Some(&AstNode::Logical(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> BuildResult {
        let mut left = self.and()?;
        while self.eat_logical(LogicalOp::Or) {
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> BuildResult {
        let mut left = self.comparison()?;
        while self.eat_logical(LogicalOp::And) {
            let right = self.comparison()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> BuildResult {
        let mut left = self.unary()?;
        while let Some(&AstNode::Comparison(op)) = self.peek() {
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> BuildResult {
        if self.eat_logical(LogicalOp::Not) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.operand()
    }

    fn operand(&mut self) -> BuildResult {
        let Some(node) = self.peek() else {
            return Err("unexpected end of expression".into());
        };
        let expr = match node {
            AstNode::Function(func) => negate(
                Expr::Call {
                    name: func.name.clone(),
                    args: func.args.clone(),
                },
                func.negated,
            ),
            AstNode::Variable { field, negated } => negate(Expr::Field(field.clone()), *negated),
            AstNode::String(s) => Expr::Literal(Value::String(s.clone())),
            AstNode::Number(n) => Expr::Literal(Value::Number(*n)),
            AstNode::Logical(_) | AstNode::Comparison(_) => {
                return Err(format!("expected an operand, found `{node}`").into());
            }
        };
        self.pos += 1;
        Ok(expr)
    }
}

fn negate(expr: Expr, negated: bool) -> Expr {
    if negated {
        Expr::Not(Box::new(expr))
    } else {
        expr
    }
}
