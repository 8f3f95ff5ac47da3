//! Small programs built node by node.

use super::{MockResolver, RecordingTracker};
use crate::declaration::ClassDeclaration;
use crate::name::SymbolName;
use crate::session::{Session, SessionOptions};
use ksp_ir::syntax::{
    ArenaBuilder, ClassKeyword, ClassNode, ExpressionNode, FunctionForm, FunctionNode,
    ParameterBinding, PropertyNode,
};
use ksp_ir::{
    ClassDescriptor, Descriptor, DescriptorKind, HostClassKind, Modality, Modifiers, Name,
    SyntaxId,
};
use std::sync::Arc;

/// Builder for a first-round program.
pub struct Fixture {
    builder: ArenaBuilder,
    resolver: Arc<MockResolver>,
    tracker: Arc<RecordingTracker>,
    options: SessionOptions,
}

impl Fixture {
    pub fn new() -> Self {
        let builder = ArenaBuilder::new();
        let resolver = Arc::new(MockResolver::new(Arc::clone(builder.interner())));
        Fixture {
            builder,
            resolver,
            tracker: Arc::new(RecordingTracker::new()),
            options: SessionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn builder(&mut self) -> &mut ArenaBuilder {
        &mut self.builder
    }

    pub fn resolver(&self) -> &Arc<MockResolver> {
        &self.resolver
    }

    pub fn name(&self, text: &str) -> Name {
        self.builder.name(text)
    }

    /// Push `node` named `name`.
    pub fn class(&mut self, name: &str, node: ClassNode) -> SyntaxId {
        let name = self.name(name);
        self.builder.push(ClassNode {
            name: Some(name),
            ..node
        })
    }

    pub fn function(&mut self, name: &str, node: FunctionNode) -> SyntaxId {
        let name = self.name(name);
        self.builder.push(FunctionNode {
            name: Some(name),
            ..node
        })
    }

    pub fn property(&mut self, name: &str, node: PropertyNode) -> SyntaxId {
        let name = self.name(name);
        self.builder.push(PropertyNode {
            name: Some(name),
            ..node
        })
    }

    pub fn primary_constructor(&mut self, parameters: Vec<SyntaxId>) -> SyntaxId {
        self.builder.push(FunctionNode {
            form: FunctionForm::PrimaryConstructor,
            parameters,
            ..FunctionNode::default()
        })
    }

    pub fn file(&mut self, path: &str, package: &str, declarations: Vec<SyntaxId>) -> SyntaxId {
        self.builder.add_file(path, package, declarations)
    }

    /// Index the arena and open a session over it.
    pub fn finish(self) -> Program {
        let syntax = Arc::new(self.builder.finish());
        self.resolver.index(&syntax);
        let session = Session::with_options(
            syntax,
            Arc::clone(&self.resolver) as Arc<dyn ksp_ir::Resolver>,
            Arc::clone(&self.tracker) as Arc<dyn ksp_ir::LookupTracker>,
            self.options,
        );
        Program {
            session,
            resolver: self.resolver,
            tracker: self.tracker,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A session plus the mocks behind it.
pub struct Program {
    pub session: Session,
    pub resolver: Arc<MockResolver>,
    pub tracker: Arc<RecordingTracker>,
}

impl Program {
    /// Start the next round with the files `edit` adds or replaces.
    pub fn next_round(&mut self, edit: impl FnOnce(&mut ArenaBuilder)) {
        let mut builder = ArenaBuilder::next_round(self.session.syntax());
        edit(&mut builder);
        let syntax = Arc::new(builder.finish());
        self.resolver.index(&syntax);
        self.session.begin_round(syntax);
    }

    /// Class by qualified name; panics when there is none.
    pub fn class(&self, qualified: &str) -> Arc<ClassDeclaration> {
        match self.session.class_by_name(&SymbolName::new(qualified)) {
            Some(class) => class,
            None => panic!("no class named {qualified}"),
        }
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("session", &self.session)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

// Scenarios

/// `class Foo(val x: Int)`
pub fn constructor_property() -> Program {
    let mut fixture = Fixture::new();
    let int = fixture.builder().type_ref("Int");
    let x = fixture
        .builder()
        .binding_parameter("x", Some(ParameterBinding::Val), Some(int));
    let constructor = fixture.primary_constructor(vec![x]);
    let foo = fixture.class(
        "Foo",
        ClassNode {
            primary_constructor: Some(constructor),
            ..ClassNode::default()
        },
    );
    fixture.file("Foo.kt", "", vec![foo]);
    fixture.finish()
}

/// `val y: NonExistentType = TODO()`
pub fn unresolved_property() -> Program {
    let mut fixture = Fixture::new();
    let missing = fixture.builder().type_ref("NonExistentType");
    let callee = fixture.builder().name_ref("TODO");
    let call = fixture.builder().expression(ExpressionNode::Call {
        callee,
        type_arguments: Vec::new(),
        arguments: Vec::new(),
        trailing_lambda: None,
    });
    let y = fixture.property(
        "y",
        PropertyNode {
            type_ref: Some(missing),
            initializer: Some(call),
            ..PropertyNode::default()
        },
    );
    fixture.file("Y.kt", "", vec![y]);
    fixture.finish()
}

/// `sealed class Expr` with `class Const : Expr()` in package `lib`.
///
/// The source variant declares both in `Expr.kt`; the binary variant only
/// registers descriptors, as a compiled dependency would.
pub fn sealed_hierarchy(from_source: bool) -> Program {
    let mut fixture = Fixture::new();
    if from_source {
        let expr = fixture.class(
            "Expr",
            ClassNode {
                modifiers: Modifiers::SEALED,
                ..ClassNode::default()
            },
        );
        let supertype = fixture.builder().type_ref("Expr");
        let constant = fixture.class(
            "Const",
            ClassNode {
                supertypes: vec![supertype],
                ..ClassNode::default()
            },
        );
        fixture.file("Expr.kt", "lib", vec![expr, constant]);
        return fixture.finish();
    }

    let resolver = Arc::clone(fixture.resolver());
    let expr = resolver.library_class("lib.Expr", HostClassKind::Class);
    resolver.update(expr, |descriptor| descriptor.modality = Modality::Sealed);
    let expr_type = resolver.class_type(expr, false);
    let name = fixture.name("Const");
    let constant = resolver.insert(|id| {
        let mut descriptor = Descriptor::new(
            id,
            name,
            DescriptorKind::Class(ClassDescriptor {
                supertypes: vec![expr_type],
                ..ClassDescriptor::default()
            }),
        );
        descriptor.qualified_name = Some(Arc::from("lib.Const"));
        descriptor.package = Arc::from("lib");
        descriptor
    });
    resolver.update(expr, |descriptor| {
        if let DescriptorKind::Class(class) = &mut descriptor.kind {
            class.sealed_subclasses.push(constant);
        }
    });
    fixture.finish()
}

/// `interface Shape` and `class Square` side by side, neither with a
/// written constructor.
pub fn implicit_constructors() -> Program {
    let mut fixture = Fixture::new();
    let shape = fixture.class(
        "Shape",
        ClassNode {
            keyword: ClassKeyword::Interface,
            ..ClassNode::default()
        },
    );
    let shape_ref = fixture.builder().type_ref("Shape");
    let square = fixture.class(
        "Square",
        ClassNode {
            supertypes: vec![shape_ref],
            ..ClassNode::default()
        },
    );
    fixture.file("Shapes.kt", "geo", vec![shape, square]);
    fixture.finish()
}
