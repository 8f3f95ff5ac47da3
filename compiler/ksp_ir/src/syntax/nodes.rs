//! Node kinds of the host syntax tree.
//!
//! Nodes refer to their children by [`SyntaxId`]. Every field the host
//! could not fill (a missing name, an absent type) is an `Option`, because
//! the model must cope with trees from code that does not compile.

use super::SyntaxId;
use crate::{ConstantValue, LineIndex, Modifiers, Name};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct FileNode {
    pub path: Arc<str>,
    /// Dotted package name, empty for the root package.
    pub package: Arc<str>,
    pub annotations: Vec<SyntaxId>,
    pub declarations: Vec<SyntaxId>,
    pub lines: LineIndex,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClassKeyword {
    #[default]
    Class,
    Interface,
    Object,
    EnumEntry,
}

/// `where T : Bound` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeConstraint {
    pub subject: Name,
    pub bound: SyntaxId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassNode {
    /// `None` for anonymous objects.
    pub name: Option<Name>,
    pub keyword: ClassKeyword,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_parameters: Vec<SyntaxId>,
    pub constraints: Vec<TypeConstraint>,
    pub supertypes: Vec<SyntaxId>,
    pub primary_constructor: Option<SyntaxId>,
    pub declarations: Vec<SyntaxId>,
    pub doc: Option<Arc<str>>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FunctionForm {
    #[default]
    Named,
    PrimaryConstructor,
    SecondaryConstructor,
    /// Lambda or anonymous function; `fun_keyword` tells them apart.
    Literal { fun_keyword: bool },
}

impl FunctionForm {
    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            FunctionForm::PrimaryConstructor | FunctionForm::SecondaryConstructor
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionNode {
    pub name: Option<Name>,
    pub form: FunctionForm,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_parameters: Vec<SyntaxId>,
    pub constraints: Vec<TypeConstraint>,
    pub receiver: Option<SyntaxId>,
    pub parameters: Vec<SyntaxId>,
    pub return_type: Option<SyntaxId>,
    /// Expression body, or a `Block` expression for block bodies.
    pub body: Option<SyntaxId>,
    pub doc: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyNode {
    pub name: Option<Name>,
    pub is_var: bool,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_parameters: Vec<SyntaxId>,
    pub receiver: Option<SyntaxId>,
    pub type_ref: Option<SyntaxId>,
    pub initializer: Option<SyntaxId>,
    pub delegate: Option<SyntaxId>,
    pub getter: Option<SyntaxId>,
    pub setter: Option<SyntaxId>,
    pub doc: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccessorNode {
    pub is_getter: bool,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    /// Setter value parameter.
    pub parameter: Option<SyntaxId>,
    pub return_type: Option<SyntaxId>,
    pub body: Option<SyntaxId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParameterBinding {
    Val,
    Var,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterNode {
    pub name: Option<Name>,
    /// `val`/`var` on a constructor parameter.
    pub binding: Option<ParameterBinding>,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_ref: Option<SyntaxId>,
    pub default_value: Option<SyntaxId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeAliasNode {
    pub name: Option<Name>,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_parameters: Vec<SyntaxId>,
    pub aliased: Option<SyntaxId>,
    pub doc: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeParameterNode {
    pub name: Option<Name>,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub bound: Option<SyntaxId>,
}

/// A type position: `@A suspend T`. The element is a user type, a
/// function type, `dynamic`, or a nullable/parenthesized wrapper of those.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeReferenceNode {
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub element: Option<SyntaxId>,
}

/// `Outer.Inner<Arg>`; the qualifier is itself a `UserType` node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserTypeNode {
    pub qualifier: Option<SyntaxId>,
    pub name: Option<Name>,
    pub arguments: Vec<SyntaxId>,
}

/// `Receiver.(Params) -> Return`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionTypeNode {
    pub receiver: Option<SyntaxId>,
    pub parameters: Vec<SyntaxId>,
    pub return_type: Option<SyntaxId>,
}

/// `T?` or `(T)`, possibly carrying its own annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrapperTypeNode {
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub inner: Option<SyntaxId>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ProjectionKind {
    #[default]
    Invariant,
    In,
    Out,
    Star,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeProjectionNode {
    pub kind: ProjectionKind,
    pub modifiers: Modifiers,
    pub annotations: Vec<SyntaxId>,
    pub type_ref: Option<SyntaxId>,
}

/// `@field:Anno` targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UseSiteKeyword {
    File,
    Property,
    Field,
    Get,
    Set,
    Receiver,
    Param,
    SetParam,
    Delegate,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationEntryNode {
    pub use_site: Option<UseSiteKeyword>,
    pub short_name: Name,
    pub type_ref: Option<SyntaxId>,
    pub arguments: Vec<SyntaxId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueArgumentNode {
    pub name: Option<Name>,
    pub is_spread: bool,
    pub value: Option<SyntaxId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    Increment,
    Decrement,
    NotNullAssert,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
            UnaryOperator::NotNullAssert => "!!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Div,
    Rem,
    Equals,
    NotEquals,
    Identical,
    NotIdentical,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    And,
    Or,
    Elvis,
    Range,
    In,
    NotIn,
    Assign,
    PlusAssign,
    MinusAssign,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Identical => "===",
            BinaryOperator::NotIdentical => "!==",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Elvis => "?:",
            BinaryOperator::Range => "..",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "!in",
            BinaryOperator::Assign => "=",
            BinaryOperator::PlusAssign => "+=",
            BinaryOperator::MinusAssign => "-=",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JumpKind {
    Return,
    Break,
    Continue,
    Throw,
}

impl JumpKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JumpKind::Return => "return",
            JumpKind::Break => "break",
            JumpKind::Continue => "continue",
            JumpKind::Throw => "throw",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastOperator {
    As,
    SafeAs,
    Is,
    NotIs,
}

impl CastOperator {
    pub fn keyword(self) -> &'static str {
        match self {
            CastOperator::As => "as",
            CastOperator::SafeAs => "as?",
            CastOperator::Is => "is",
            CastOperator::NotIs => "!is",
        }
    }
}

/// One `when` branch. No conditions means `else`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WhenBranchNode {
    pub conditions: Vec<SyntaxId>,
    pub body: Option<SyntaxId>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionNode {
    Constant(ConstantValue),
    NameReference(Name),
    Call {
        callee: SyntaxId,
        type_arguments: Vec<SyntaxId>,
        arguments: Vec<SyntaxId>,
        trailing_lambda: Option<SyntaxId>,
    },
    /// `a.b` or `a?.b`
    Qualified {
        receiver: SyntaxId,
        selector: SyntaxId,
        safe: bool,
    },
    If {
        condition: SyntaxId,
        then_branch: Option<SyntaxId>,
        else_branch: Option<SyntaxId>,
    },
    When {
        subject: Option<SyntaxId>,
        branches: Vec<WhenBranchNode>,
    },
    /// The literal's `Function` node.
    Lambda { function: SyntaxId },
    Unary {
        op: UnaryOperator,
        operand: Option<SyntaxId>,
        prefix: bool,
    },
    Binary {
        op: BinaryOperator,
        left: SyntaxId,
        right: SyntaxId,
    },
    Jump {
        kind: JumpKind,
        label: Option<Name>,
        value: Option<SyntaxId>,
    },
    Cast {
        expression: Option<SyntaxId>,
        op: CastOperator,
        type_ref: SyntaxId,
    },
    Labeled {
        label: Name,
        expression: Option<SyntaxId>,
    },
    /// Statements; declarations appear as their own node kinds.
    Block { statements: Vec<SyntaxId> },
}

/// Every kind of host syntax node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    File(FileNode),
    Class(ClassNode),
    Function(FunctionNode),
    Property(PropertyNode),
    Accessor(AccessorNode),
    Parameter(ParameterNode),
    TypeAlias(TypeAliasNode),
    TypeParameter(TypeParameterNode),
    TypeReference(TypeReferenceNode),
    UserType(UserTypeNode),
    FunctionType(FunctionTypeNode),
    NullableType(WrapperTypeNode),
    ParenthesizedType(WrapperTypeNode),
    DynamicType,
    TypeProjection(TypeProjectionNode),
    AnnotationEntry(AnnotationEntryNode),
    ValueArgument(ValueArgumentNode),
    Expression(ExpressionNode),
}

macro_rules! node_conversions {
    ($($variant:ident($node:ty) => $accessor:ident;)*) => {
        $(
            impl From<$node> for NodeKind {
                fn from(node: $node) -> Self {
                    NodeKind::$variant(node)
                }
            }
        )*

        impl NodeKind {
            $(
                pub fn $accessor(&self) -> Option<&$node> {
                    match self {
                        NodeKind::$variant(node) => Some(node),
                        _ => None,
                    }
                }
            )*
        }
    };
}

node_conversions! {
    File(FileNode) => as_file;
    Class(ClassNode) => as_class;
    Function(FunctionNode) => as_function;
    Property(PropertyNode) => as_property;
    Accessor(AccessorNode) => as_accessor;
    Parameter(ParameterNode) => as_parameter;
    TypeAlias(TypeAliasNode) => as_type_alias;
    TypeParameter(TypeParameterNode) => as_type_parameter;
    TypeReference(TypeReferenceNode) => as_type_reference;
    UserType(UserTypeNode) => as_user_type;
    FunctionType(FunctionTypeNode) => as_function_type;
    TypeProjection(TypeProjectionNode) => as_type_projection;
    AnnotationEntry(AnnotationEntryNode) => as_annotation_entry;
    ValueArgument(ValueArgumentNode) => as_value_argument;
    Expression(ExpressionNode) => as_expression;
}

impl NodeKind {
    /// `T?` or `(T)` wrapper.
    pub fn as_wrapper_type(&self) -> Option<&WrapperTypeNode> {
        match self {
            NodeKind::NullableType(node) | NodeKind::ParenthesizedType(node) => Some(node),
            _ => None,
        }
    }

    /// Name token of a named node.
    pub fn name(&self) -> Option<Name> {
        match self {
            NodeKind::Class(node) => node.name,
            NodeKind::Function(node) => node.name,
            NodeKind::Property(node) => node.name,
            NodeKind::Parameter(node) => node.name,
            NodeKind::TypeAlias(node) => node.name,
            NodeKind::TypeParameter(node) => node.name,
            NodeKind::UserType(node) => node.name,
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            NodeKind::Class(node) => node.modifiers,
            NodeKind::Function(node) => node.modifiers,
            NodeKind::Property(node) => node.modifiers,
            NodeKind::Accessor(node) => node.modifiers,
            NodeKind::Parameter(node) => node.modifiers,
            NodeKind::TypeAlias(node) => node.modifiers,
            NodeKind::TypeParameter(node) => node.modifiers,
            NodeKind::TypeReference(node) => node.modifiers,
            NodeKind::NullableType(node) | NodeKind::ParenthesizedType(node) => node.modifiers,
            NodeKind::TypeProjection(node) => node.modifiers,
            _ => Modifiers::empty(),
        }
    }

    /// Annotation entries written directly on this node.
    pub fn annotations(&self) -> &[SyntaxId] {
        match self {
            NodeKind::File(node) => &node.annotations,
            NodeKind::Class(node) => &node.annotations,
            NodeKind::Function(node) => &node.annotations,
            NodeKind::Property(node) => &node.annotations,
            NodeKind::Accessor(node) => &node.annotations,
            NodeKind::Parameter(node) => &node.annotations,
            NodeKind::TypeAlias(node) => &node.annotations,
            NodeKind::TypeParameter(node) => &node.annotations,
            NodeKind::TypeReference(node) => &node.annotations,
            NodeKind::NullableType(node) | NodeKind::ParenthesizedType(node) => &node.annotations,
            NodeKind::TypeProjection(node) => &node.annotations,
            _ => &[],
        }
    }

    /// Raw doc comment attached to a declaration.
    pub fn doc(&self) -> Option<&str> {
        match self {
            NodeKind::Class(node) => node.doc.as_deref(),
            NodeKind::Function(node) => node.doc.as_deref(),
            NodeKind::Property(node) => node.doc.as_deref(),
            NodeKind::TypeAlias(node) => node.doc.as_deref(),
            _ => None,
        }
    }

    /// Type parameter nodes of a generic declaration.
    pub fn type_parameters(&self) -> &[SyntaxId] {
        match self {
            NodeKind::Class(node) => &node.type_parameters,
            NodeKind::Function(node) => &node.type_parameters,
            NodeKind::Property(node) => &node.type_parameters,
            NodeKind::TypeAlias(node) => &node.type_parameters,
            _ => &[],
        }
    }

    /// `where` clauses of a generic declaration.
    pub fn constraints(&self) -> &[TypeConstraint] {
        match self {
            NodeKind::Class(node) => &node.constraints,
            NodeKind::Function(node) => &node.constraints,
            _ => &[],
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<SyntaxId> {
        let mut out = Vec::new();
        match self {
            NodeKind::File(node) => {
                out.extend(&node.annotations);
                out.extend(&node.declarations);
            }
            NodeKind::Class(node) => {
                out.extend(&node.annotations);
                out.extend(&node.type_parameters);
                out.extend(node.constraints.iter().map(|c| c.bound));
                out.extend(node.primary_constructor);
                out.extend(&node.supertypes);
                out.extend(&node.declarations);
            }
            NodeKind::Function(node) => {
                out.extend(&node.annotations);
                out.extend(&node.type_parameters);
                out.extend(node.constraints.iter().map(|c| c.bound));
                out.extend(node.receiver);
                out.extend(&node.parameters);
                out.extend(node.return_type);
                out.extend(node.body);
            }
            NodeKind::Property(node) => {
                out.extend(&node.annotations);
                out.extend(&node.type_parameters);
                out.extend(node.receiver);
                out.extend(node.type_ref);
                out.extend(node.initializer);
                out.extend(node.delegate);
                out.extend(node.getter);
                out.extend(node.setter);
            }
            NodeKind::Accessor(node) => {
                out.extend(&node.annotations);
                out.extend(node.parameter);
                out.extend(node.return_type);
                out.extend(node.body);
            }
            NodeKind::Parameter(node) => {
                out.extend(&node.annotations);
                out.extend(node.type_ref);
                out.extend(node.default_value);
            }
            NodeKind::TypeAlias(node) => {
                out.extend(&node.annotations);
                out.extend(&node.type_parameters);
                out.extend(node.aliased);
            }
            NodeKind::TypeParameter(node) => {
                out.extend(&node.annotations);
                out.extend(node.bound);
            }
            NodeKind::TypeReference(node) => {
                out.extend(&node.annotations);
                out.extend(node.element);
            }
            NodeKind::UserType(node) => {
                out.extend(node.qualifier);
                out.extend(&node.arguments);
            }
            NodeKind::FunctionType(node) => {
                out.extend(node.receiver);
                out.extend(&node.parameters);
                out.extend(node.return_type);
            }
            NodeKind::NullableType(node) | NodeKind::ParenthesizedType(node) => {
                out.extend(&node.annotations);
                out.extend(node.inner);
            }
            NodeKind::DynamicType => {}
            NodeKind::TypeProjection(node) => {
                out.extend(&node.annotations);
                out.extend(node.type_ref);
            }
            NodeKind::AnnotationEntry(node) => {
                out.extend(node.type_ref);
                out.extend(&node.arguments);
            }
            NodeKind::ValueArgument(node) => out.extend(node.value),
            NodeKind::Expression(expression) => expression_children(expression, &mut out),
        }
        out
    }
}

fn expression_children(expression: &ExpressionNode, out: &mut Vec<SyntaxId>) {
    match expression {
        ExpressionNode::Constant(_) | ExpressionNode::NameReference(_) => {}
        ExpressionNode::Call {
            callee,
            type_arguments,
            arguments,
            trailing_lambda,
        } => {
            out.push(*callee);
            out.extend(type_arguments);
            out.extend(arguments);
            out.extend(*trailing_lambda);
        }
        ExpressionNode::Qualified {
            receiver, selector, ..
        } => {
            out.push(*receiver);
            out.push(*selector);
        }
        ExpressionNode::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.push(*condition);
            out.extend(*then_branch);
            out.extend(*else_branch);
        }
        ExpressionNode::When { subject, branches } => {
            out.extend(*subject);
            for branch in branches {
                out.extend(&branch.conditions);
                out.extend(branch.body);
            }
        }
        ExpressionNode::Lambda { function } => out.push(*function),
        ExpressionNode::Unary { operand, .. } => out.extend(*operand),
        ExpressionNode::Binary { left, right, .. } => {
            out.push(*left);
            out.push(*right);
        }
        ExpressionNode::Jump { value, .. } => out.extend(*value),
        ExpressionNode::Cast {
            expression,
            type_ref,
            ..
        } => {
            out.extend(*expression);
            out.push(*type_ref);
        }
        ExpressionNode::Labeled { expression, .. } => out.extend(*expression),
        ExpressionNode::Block { statements } => out.extend(statements),
    }
}
