//! Lightweight expression model for function bodies and initializers.
//!
//! # Design
//!
//! [`Expression`] is an identity-cached handle on an expression node. Its
//! shape is read on demand through [`Expression::kind`]; child expressions
//! come back as cached handles too, so walking a body twice yields the same
//! objects. Lambdas and anonymous functions surface as
//! [`FunctionDeclaration`]s and local declarations inside blocks as
//! [`Declaration`]s.

use crate::annotation::AnnotationValue;
use crate::declaration::{Declaration, FunctionDeclaration};
use crate::error::CompilerError;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::{TypeArgument, TypeReference};
use crate::session::Session;
use crate::types::{get_ks_type_cached, Type};
use ksp_ir::syntax::{BinaryOperator, CastOperator, ExpressionNode, JumpKind, UnaryOperator};
use ksp_ir::SyntaxId;
use std::sync::Arc;

/// An expression in a body, initializer, default value or argument.
pub struct Expression {
    node: SyntaxId,
}

/// One statement of a block.
#[derive(Clone, Debug)]
pub enum Statement {
    Expression(Arc<Expression>),
    Declaration(Declaration),
}

/// One `when` branch; no conditions means `else`.
#[derive(Clone, Debug)]
pub struct WhenBranch {
    pub conditions: Vec<Arc<Expression>>,
    pub body: Option<Arc<Expression>>,
}

impl WhenBranch {
    pub fn is_else(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Argument of a call.
#[derive(Clone, Debug)]
pub struct CallArgument {
    pub name: Option<SymbolName>,
    pub is_spread: bool,
    pub value: Option<Arc<Expression>>,
}

/// The shape of an expression.
#[derive(Clone, Debug)]
pub enum ExpressionKind {
    Constant(AnnotationValue),
    NameReference(SymbolName),
    Call {
        callee: Arc<Expression>,
        type_arguments: Vec<Arc<TypeArgument>>,
        arguments: Vec<CallArgument>,
        trailing_lambda: Option<Arc<Expression>>,
    },
    /// `receiver.selector`, or `receiver?.selector` when `safe`.
    Qualified {
        receiver: Arc<Expression>,
        selector: Arc<Expression>,
        safe: bool,
    },
    If {
        condition: Arc<Expression>,
        then_branch: Option<Arc<Expression>>,
        else_branch: Option<Arc<Expression>>,
    },
    When {
        subject: Option<Arc<Expression>>,
        branches: Vec<WhenBranch>,
    },
    /// Lambda or anonymous function.
    Lambda(Arc<FunctionDeclaration>),
    Unary {
        operator: UnaryOperator,
        operand: Option<Arc<Expression>>,
        prefix: bool,
    },
    Binary {
        operator: BinaryOperator,
        left: Arc<Expression>,
        right: Arc<Expression>,
    },
    Jump {
        kind: JumpKind,
        label: Option<SymbolName>,
        value: Option<Arc<Expression>>,
    },
    /// `as`, `as?`, `is` and `!is`.
    Cast {
        expression: Arc<Expression>,
        operator: CastOperator,
        type_ref: Arc<TypeReference>,
    },
    Labeled {
        label: SymbolName,
        expression: Option<Arc<Expression>>,
    },
    Block(Vec<Statement>),
    /// A declaration in expression position, e.g. an object literal.
    Declaration(Declaration),
}

impl Expression {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<Expression> {
        session
            .caches()
            .expressions
            .get_or_put(node, || Expression { node })
    }

    pub fn node(&self) -> SyntaxId {
        self.node
    }

    fn child(session: &Session, node: SyntaxId) -> Arc<Expression> {
        Self::from_syntax(session, node)
    }

    fn optional(session: &Session, node: Option<SyntaxId>) -> Option<Arc<Expression>> {
        node.map(|node| Self::from_syntax(session, node))
    }

    fn error(&self, session: &Session, message: &str) -> CompilerError {
        CompilerError::new(
            session.file_path_of(self.node),
            session.syntax().span(self.node).start,
            message,
        )
    }

    /// Shape of the expression.
    ///
    /// A cast without its left-hand expression, or a node that is neither
    /// an expression nor a declaration, is a [`CompilerError`].
    pub fn try_kind(&self, session: &Session) -> Result<ExpressionKind, CompilerError> {
        let syntax = session.syntax();
        let Some(expression) = syntax.kind(self.node).as_expression() else {
            return match Declaration::from_syntax(session, self.node) {
                Some(declaration) => Ok(ExpressionKind::Declaration(declaration)),
                None => Err(self.error(session, "node is not an expression")),
            };
        };
        let name = |name: ksp_ir::Name| SymbolName::from(session.name_text(name));
        Ok(match expression {
            ExpressionNode::Constant(constant) => {
                ExpressionKind::Constant(AnnotationValue::from_constant(session, constant))
            }
            ExpressionNode::NameReference(reference) => ExpressionKind::NameReference(name(*reference)),
            ExpressionNode::Call {
                callee,
                type_arguments,
                arguments,
                trailing_lambda,
            } => ExpressionKind::Call {
                callee: Self::child(session, *callee),
                type_arguments: type_arguments
                    .iter()
                    .map(|&argument| TypeArgument::from_syntax(session, argument))
                    .collect(),
                arguments: arguments
                    .iter()
                    .filter_map(|&argument| syntax.kind(argument).as_value_argument())
                    .map(|argument| CallArgument {
                        name: argument.name.map(name),
                        is_spread: argument.is_spread,
                        value: Self::optional(session, argument.value),
                    })
                    .collect(),
                trailing_lambda: Self::optional(session, *trailing_lambda),
            },
            ExpressionNode::Qualified {
                receiver,
                selector,
                safe,
            } => ExpressionKind::Qualified {
                receiver: Self::child(session, *receiver),
                selector: Self::child(session, *selector),
                safe: *safe,
            },
            ExpressionNode::If {
                condition,
                then_branch,
                else_branch,
            } => ExpressionKind::If {
                condition: Self::child(session, *condition),
                then_branch: Self::optional(session, *then_branch),
                else_branch: Self::optional(session, *else_branch),
            },
            ExpressionNode::When { subject, branches } => ExpressionKind::When {
                subject: Self::optional(session, *subject),
                branches: branches
                    .iter()
                    .map(|branch| WhenBranch {
                        conditions: branch
                            .conditions
                            .iter()
                            .map(|&condition| Self::child(session, condition))
                            .collect(),
                        body: Self::optional(session, branch.body),
                    })
                    .collect(),
            },
            ExpressionNode::Lambda { function } => {
                ExpressionKind::Lambda(FunctionDeclaration::from_syntax(session, *function))
            }
            ExpressionNode::Unary {
                op,
                operand,
                prefix,
            } => ExpressionKind::Unary {
                operator: *op,
                operand: Self::optional(session, *operand),
                prefix: *prefix,
            },
            ExpressionNode::Binary { op, left, right } => ExpressionKind::Binary {
                operator: *op,
                left: Self::child(session, *left),
                right: Self::child(session, *right),
            },
            ExpressionNode::Jump { kind, label, value } => ExpressionKind::Jump {
                kind: *kind,
                label: label.map(name),
                value: Self::optional(session, *value),
            },
            ExpressionNode::Cast {
                expression,
                op,
                type_ref,
            } => {
                let Some(expression) = expression else {
                    return Err(self.error(
                        session,
                        &format!("'{}' has no left-hand expression", op.keyword()),
                    ));
                };
                ExpressionKind::Cast {
                    expression: Self::child(session, *expression),
                    operator: *op,
                    type_ref: TypeReference::from_syntax(session, *type_ref),
                }
            }
            ExpressionNode::Labeled { label, expression } => ExpressionKind::Labeled {
                label: name(*label),
                expression: Self::optional(session, *expression),
            },
            ExpressionNode::Block { statements } => ExpressionKind::Block(
                statements
                    .iter()
                    .map(|&statement| match Declaration::from_syntax(session, statement) {
                        Some(declaration) => Statement::Declaration(declaration),
                        None => Statement::Expression(Self::child(session, statement)),
                    })
                    .collect(),
            ),
        })
    }

    /// # Panics
    /// Panics when [`Expression::try_kind`] fails.
    pub fn kind(&self, session: &Session) -> ExpressionKind {
        match self.try_kind(session) {
            Ok(kind) => kind,
            Err(error) => panic!("{error}"),
        }
    }

    /// Type the host computed for this expression; the error type, hinted
    /// with the expression text, when there is none.
    pub fn resolve(&self, session: &Session) -> Type {
        match session
            .resolver()
            .resolve_expression_type(session.syntax(), self.node)
        {
            Some(host) => get_ks_type_cached(session, &host),
            None => Type::Error(session.error_type(Some(&self.text(session)))),
        }
    }

    /// The nearest enclosing declaration.
    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        session
            .syntax()
            .ancestors(self.node)
            .find_map(|ancestor| Declaration::from_syntax(session, ancestor))
    }

    pub fn origin(&self) -> Origin {
        Origin::Source
    }

    pub fn location(&self, session: &Session) -> Location {
        session.location_of(self.node)
    }

    /// Source-like rendering of the expression's shape.
    ///
    /// Malformed nodes render as `<error>` instead of failing.
    pub fn text(&self, session: &Session) -> String {
        let Ok(kind) = self.try_kind(session) else {
            return "<error>".to_owned();
        };
        let text = |expression: &Arc<Expression>| expression.text(session);
        let optional = |expression: &Option<Arc<Expression>>| {
            expression.as_ref().map_or_else(String::new, |e| e.text(session))
        };
        match kind {
            ExpressionKind::Constant(value) => value.render(session),
            ExpressionKind::NameReference(name) => name.to_string(),
            ExpressionKind::Call {
                callee,
                type_arguments,
                arguments,
                trailing_lambda,
            } => {
                let mut out = text(&callee);
                if !type_arguments.is_empty() {
                    let rendered: Vec<String> =
                        type_arguments.iter().map(|a| a.render(session)).collect();
                    out.push_str(&format!("<{}>", rendered.join(", ")));
                }
                let rendered: Vec<String> = arguments
                    .iter()
                    .map(|argument| {
                        let mut piece = String::new();
                        if let Some(name) = &argument.name {
                            piece.push_str(&format!("{name} = "));
                        }
                        if argument.is_spread {
                            piece.push('*');
                        }
                        piece.push_str(&optional(&argument.value));
                        piece
                    })
                    .collect();
                out.push_str(&format!("({})", rendered.join(", ")));
                if let Some(lambda) = trailing_lambda {
                    out.push(' ');
                    out.push_str(&text(&lambda));
                }
                out
            }
            ExpressionKind::Qualified {
                receiver,
                selector,
                safe,
            } => {
                let dot = if safe { "?." } else { "." };
                format!("{}{dot}{}", text(&receiver), text(&selector))
            }
            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = format!("if ({}) {}", text(&condition), optional(&then_branch));
                if let Some(otherwise) = else_branch {
                    out.push_str(&format!(" else {}", text(&otherwise)));
                }
                out
            }
            ExpressionKind::When { subject, branches } => {
                let mut out = String::from("when ");
                if let Some(subject) = subject {
                    out.push_str(&format!("({}) ", text(&subject)));
                }
                let rendered: Vec<String> = branches
                    .iter()
                    .map(|branch| {
                        let head = if branch.is_else() {
                            "else".to_owned()
                        } else {
                            let conditions: Vec<String> =
                                branch.conditions.iter().map(text).collect();
                            conditions.join(", ")
                        };
                        format!("{head} -> {}", optional(&branch.body))
                    })
                    .collect();
                out.push_str(&format!("{{ {} }}", rendered.join("; ")));
                out
            }
            ExpressionKind::Lambda(function) => {
                let parameters: Vec<String> = function
                    .parameters(session)
                    .iter()
                    .filter_map(|parameter| parameter.name(session))
                    .map(|name| name.to_string())
                    .collect();
                let body = function
                    .body(session)
                    .map_or_else(String::new, |body| body.text(session));
                if function.function_kind(session) == crate::kinds::FunctionKind::Anonymous {
                    format!("fun({}) {body}", parameters.join(", "))
                } else if parameters.is_empty() {
                    format!("{{ {body} }}")
                } else {
                    format!("{{ {} -> {body} }}", parameters.join(", "))
                }
            }
            ExpressionKind::Unary {
                operator,
                operand,
                prefix,
            } => {
                if prefix {
                    format!("{}{}", operator.symbol(), optional(&operand))
                } else {
                    format!("{}{}", optional(&operand), operator.symbol())
                }
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => format!("{} {} {}", text(&left), operator.symbol(), text(&right)),
            ExpressionKind::Jump { kind, label, value } => {
                let mut out = kind.keyword().to_owned();
                if let Some(label) = label {
                    out.push_str(&format!("@{label}"));
                }
                if let Some(value) = value {
                    out.push(' ');
                    out.push_str(&text(&value));
                }
                out
            }
            ExpressionKind::Cast {
                expression,
                operator,
                type_ref,
            } => format!(
                "{} {} {}",
                text(&expression),
                operator.keyword(),
                type_ref.render(session)
            ),
            ExpressionKind::Labeled { label, expression } => {
                format!("{label}@ {}", optional(&expression))
            }
            ExpressionKind::Block(statements) => {
                let rendered: Vec<String> = statements
                    .iter()
                    .map(|statement| match statement {
                        Statement::Expression(expression) => text(expression),
                        Statement::Declaration(declaration) => declaration
                            .try_simple_name(session)
                            .map_or_else(|_| "<declaration>".to_owned(), |n| n.to_string()),
                    })
                    .collect();
                format!("{{ {} }}", rendered.join("; "))
            }
            ExpressionKind::Declaration(declaration) => declaration
                .try_simple_name(session)
                .map_or_else(|_| "<declaration>".to_owned(), |n| n.to_string()),
        }
    }
}

impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expression({:?})", self.node)
    }
}

/// Declarations written directly in a body: the statements of a block, or
/// the body itself when it is a declaration.
pub(crate) fn local_declarations(session: &Session, body: SyntaxId) -> Vec<Declaration> {
    match session.syntax().kind(body).as_expression() {
        Some(ExpressionNode::Block { statements }) => statements
            .iter()
            .filter_map(|&statement| Declaration::from_syntax(session, statement))
            .collect(),
        _ => Declaration::from_syntax(session, body).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests;
