//! A name-based resolver and a recording lookup tracker.

use ksp_ir::syntax::{ClassKeyword, ClassNode, ExpressionNode, NodeKind, ParameterBinding, ProjectionKind};
use ksp_ir::{
    AccessorDescriptor, AnnotationDescriptor, Builtin, ClassDescriptor, ConstantValue, Descriptor,
    DescriptorFlags, DescriptorId, DescriptorKind, DescriptorSource, DescriptorTable,
    FunctionDescriptor, HostClassKind, HostType, LookupTracker, MemberKind, Modality, Modifiers, Name,
    ParameterDescriptor, ProjectionVariance, PropertyDescriptor, Resolver, SharedInterner,
    SyntaxArena, SyntaxId, TypeAliasDescriptor, TypeConstructor, TypeDiagnostic,
    TypeParameterDescriptor, TypeProjection, Visibility,
};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;

/// Library classes every mock program can name.
const STDLIB: [&str; 12] = [
    "kotlin.Any",
    "kotlin.Nothing",
    "kotlin.Unit",
    "kotlin.Boolean",
    "kotlin.Byte",
    "kotlin.Short",
    "kotlin.Int",
    "kotlin.Long",
    "kotlin.Float",
    "kotlin.Double",
    "kotlin.Char",
    "kotlin.String",
];

const FLAG_MODIFIERS: [(Modifiers, DescriptorFlags); 15] = [
    (Modifiers::EXPECT, DescriptorFlags::EXPECT),
    (Modifiers::ACTUAL, DescriptorFlags::ACTUAL),
    (Modifiers::EXTERNAL, DescriptorFlags::EXTERNAL),
    (Modifiers::SUSPEND, DescriptorFlags::SUSPEND),
    (Modifiers::INLINE, DescriptorFlags::INLINE),
    (Modifiers::OPERATOR, DescriptorFlags::OPERATOR),
    (Modifiers::INFIX, DescriptorFlags::INFIX),
    (Modifiers::TAILREC, DescriptorFlags::TAILREC),
    (Modifiers::LATEINIT, DescriptorFlags::LATEINIT),
    (Modifiers::DATA, DescriptorFlags::DATA),
    (Modifiers::INNER, DescriptorFlags::INNER),
    (Modifiers::VALUE, DescriptorFlags::VALUE),
    (Modifiers::FUN, DescriptorFlags::FUN),
    (Modifiers::CONST, DescriptorFlags::CONST),
    (Modifiers::COMPANION, DescriptorFlags::COMPANION),
];

/// Resolver that answers by name over the syntax arena.
///
/// Source declarations get descriptors when [`MockResolver::index`] sees
/// their file; library declarations are added with
/// [`MockResolver::library_class`] and [`MockResolver::insert`]. A name in
/// a type position resolves to a type parameter in scope, then to a class
/// whose qualified name is the written name or ends with it. Every resolved
/// answer is memoized per node, so repeated questions get the same handle;
/// unresolved ones are asked again.
///
/// All state sits behind a mutex; tests may change answers between rounds.
pub struct MockResolver {
    state: Mutex<MockState>,
}

struct MockState {
    interner: SharedInterner,
    descriptors: DescriptorTable,
    /// Classifiers by qualified name. A later round overwrites.
    classes: FxHashMap<Arc<str>, DescriptorId>,
    /// Top-level functions and properties by qualified name.
    callables: FxHashMap<Arc<str>, Vec<DescriptorId>>,
    class_types: FxHashMap<(DescriptorId, bool), HostType>,
    type_answers: FxHashMap<SyntaxId, HostType>,
    expression_types: FxHashMap<SyntaxId, HostType>,
    rebinding: FxHashMap<SyntaxId, Option<SyntaxId>>,
    counterparts: FxHashMap<DescriptorId, Vec<DescriptorId>>,
    indexed_files: FxHashSet<SyntaxId>,
}

impl MockResolver {
    /// Resolver with the `kotlin` builtins, sharing the arena's interner.
    pub fn new(interner: SharedInterner) -> Self {
        let mut state = MockState {
            interner,
            descriptors: DescriptorTable::new(),
            classes: FxHashMap::default(),
            callables: FxHashMap::default(),
            class_types: FxHashMap::default(),
            type_answers: FxHashMap::default(),
            expression_types: FxHashMap::default(),
            rebinding: FxHashMap::default(),
            counterparts: FxHashMap::default(),
            indexed_files: FxHashSet::default(),
        };
        for qualified in STDLIB {
            state.library_class(qualified, HostClassKind::Class);
        }
        MockResolver {
            state: Mutex::new(state),
        }
    }

    pub fn name(&self, text: &str) -> Name {
        self.state.lock().interner.intern(text)
    }

    /// Add a compiled class with default visibility and modality.
    pub fn library_class(&self, qualified: &str, kind: HostClassKind) -> DescriptorId {
        self.state.lock().library_class(qualified, kind)
    }

    /// Add any descriptor, built for the id it will receive.
    pub fn insert(&self, build: impl FnOnce(DescriptorId) -> Descriptor) -> DescriptorId {
        self.state.lock().insert(build)
    }

    pub fn update(&self, id: DescriptorId, edit: impl FnOnce(&mut Descriptor)) {
        self.state.lock().update(id, edit);
    }

    /// The shared non-generic type of a class.
    pub fn class_type(&self, id: DescriptorId, nullable: bool) -> HostType {
        self.state.lock().class_type(id, nullable)
    }

    /// The shared type of a class named by its qualified name.
    pub fn type_named(&self, qualified: &str) -> Option<HostType> {
        let mut state = self.state.lock();
        let id = state.lookup_class(qualified)?;
        Some(state.class_type(id, false))
    }

    /// Parameter of a library function.
    pub fn parameter(&self, name: &str, ty: HostType) -> ParameterDescriptor {
        ParameterDescriptor {
            name: self.name(name),
            ty,
            is_vararg: false,
            is_crossinline: false,
            is_noinline: false,
            has_default: false,
            default_value: None,
            annotations: Vec::new(),
        }
    }

    /// Descriptor the resolver built for a source node.
    pub fn descriptor_of(&self, node: SyntaxId) -> Option<Arc<Descriptor>> {
        self.state.lock().descriptors.by_source(node)
    }

    /// Build descriptors for every file of `syntax` not indexed yet.
    pub fn index(&self, syntax: &SyntaxArena) {
        self.state.lock().index(syntax);
    }

    /// Report `new` as the current-round node of `old`; `None` for gone.
    pub fn rebind(&self, old: SyntaxId, new: Option<SyntaxId>) {
        self.state.lock().rebinding.insert(old, new);
    }

    pub fn set_expression_type(&self, expression: SyntaxId, ty: HostType) {
        self.state.lock().expression_types.insert(expression, ty);
    }

    pub fn set_counterparts(&self, declaration: DescriptorId, counterparts: Vec<DescriptorId>) {
        self.state.lock().counterparts.insert(declaration, counterparts);
    }
}

impl std::fmt::Debug for MockResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockResolver")
            .field("descriptors", &state.descriptors.len())
            .field("files", &state.indexed_files.len())
            .finish_non_exhaustive()
    }
}

impl MockState {
    fn text(&self, name: Name) -> Arc<str> {
        self.interner.lookup(name)
    }

    fn insert(&mut self, build: impl FnOnce(DescriptorId) -> Descriptor) -> DescriptorId {
        let id = self.descriptors.insert_with(build);
        self.register(id);
        id
    }

    fn update(&mut self, id: DescriptorId, edit: impl FnOnce(&mut Descriptor)) {
        self.descriptors.update(id, edit);
        self.register(id);
    }

    fn register(&mut self, id: DescriptorId) {
        let Some(descriptor) = self.descriptors.get(id) else {
            return;
        };
        let Some(qualified) = descriptor.qualified_name.clone() else {
            return;
        };
        match descriptor.kind {
            DescriptorKind::Class(_) | DescriptorKind::TypeAlias(_) => {
                self.classes.insert(qualified, id);
            }
            DescriptorKind::Function(_) | DescriptorKind::Property(_)
                if descriptor.container.is_none() =>
            {
                let ids = self.callables.entry(qualified).or_default();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => {}
        }
    }

    fn library_class(&mut self, qualified: &str, kind: HostClassKind) -> DescriptorId {
        let (package, simple) = qualified.rsplit_once('.').unwrap_or(("", qualified));
        let name = self.interner.intern(simple);
        self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::Class(ClassDescriptor {
                    kind,
                    ..ClassDescriptor::default()
                }),
            );
            descriptor.qualified_name = Some(Arc::from(qualified));
            descriptor.package = Arc::from(package);
            if kind == HostClassKind::Interface {
                descriptor.modality = Modality::Abstract;
            }
            descriptor
        })
    }

    fn class_type(&mut self, id: DescriptorId, nullable: bool) -> HostType {
        self.class_types
            .entry((id, nullable))
            .or_insert_with(|| HostType::class(id, Vec::new(), nullable))
            .clone()
    }

    fn lookup_class(&self, dotted: &str) -> Option<DescriptorId> {
        if let Some(&id) = self.classes.get(dotted) {
            return Some(id);
        }
        let suffix = format!(".{dotted}");
        let mut matches: Vec<(&Arc<str>, &DescriptorId)> = self
            .classes
            .iter()
            .filter(|(qualified, _)| qualified.ends_with(&suffix))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(b.0));
        matches.first().map(|(_, &id)| id)
    }

    fn builtin(&mut self, qualified: &str) -> Option<HostType> {
        let id = self.lookup_class(qualified)?;
        Some(self.class_type(id, false))
    }

    // Type resolution

    fn resolve_type_node(&mut self, syntax: &SyntaxArena, node: SyntaxId) -> HostType {
        if let Some(answer) = self.type_answers.get(&node) {
            return answer.clone();
        }
        let answer = match syntax.kind(node) {
            NodeKind::TypeReference(reference) => match reference.element {
                Some(element) => self.element_type(syntax, element, false),
                None => other_error("missing type"),
            },
            _ => other_error("not a type reference"),
        };
        // Unresolved answers may change once a later round adds the class.
        if !answer.is_error() {
            self.type_answers.insert(node, answer.clone());
        }
        answer
    }

    fn element_type(&mut self, syntax: &SyntaxArena, element: SyntaxId, nullable: bool) -> HostType {
        match syntax.kind(element) {
            NodeKind::NullableType(wrapper) => match wrapper.inner {
                Some(inner) => self.element_type(syntax, inner, true),
                None => other_error("missing type"),
            },
            NodeKind::ParenthesizedType(wrapper) => match wrapper.inner {
                Some(inner) => self.element_type(syntax, inner, nullable),
                None => other_error("missing type"),
            },
            NodeKind::UserType(_) => self.user_type(syntax, element, nullable),
            NodeKind::FunctionType(function) => {
                let name = format!("kotlin.Function{}", function.parameters.len());
                match self.lookup_class(&name) {
                    Some(id) => self.class_type(id, nullable),
                    None => HostType::error(TypeDiagnostic::UnresolvedClass {
                        name: Arc::from(name),
                    }),
                }
            }
            NodeKind::DynamicType => other_error("dynamic"),
            _ => other_error("not a type"),
        }
    }

    fn user_type(&mut self, syntax: &SyntaxArena, node: SyntaxId, nullable: bool) -> HostType {
        let dotted = dotted_name(syntax, node);
        let arguments = syntax
            .kind(node)
            .as_user_type()
            .map(|user_type| user_type.arguments.clone())
            .unwrap_or_default();
        if !dotted.contains('.') {
            if let Some(parameter) = self.type_parameter_in_scope(syntax, node, &dotted) {
                return HostType::type_parameter(parameter, nullable);
            }
        }
        let Some(id) = self.lookup_class(&dotted) else {
            return HostType::error(TypeDiagnostic::UnresolvedClass {
                name: Arc::from(dotted),
            });
        };
        if let Some(DescriptorKind::TypeAlias(alias)) = self.descriptors.get(id).map(|d| d.kind.clone()) {
            return if nullable {
                alias.expanded.make_nullable()
            } else {
                alias.expanded
            };
        }
        if arguments.is_empty() {
            return self.class_type(id, nullable);
        }
        let mut projections = Vec::with_capacity(arguments.len());
        for argument in arguments {
            projections.push(self.projection(syntax, argument));
        }
        HostType::class(id, projections, nullable)
    }

    fn projection(&mut self, syntax: &SyntaxArena, node: SyntaxId) -> TypeProjection {
        let Some(projection) = syntax.kind(node).as_type_projection() else {
            return TypeProjection::Star;
        };
        let variance = match projection.kind {
            ProjectionKind::Star => return TypeProjection::Star,
            ProjectionKind::Invariant => ProjectionVariance::Invariant,
            ProjectionKind::In => ProjectionVariance::In,
            ProjectionKind::Out => ProjectionVariance::Out,
        };
        match projection.type_ref {
            Some(type_ref) => TypeProjection::Type {
                variance,
                ty: self.resolve_type_node(syntax, type_ref),
            },
            None => TypeProjection::Star,
        }
    }

    fn type_parameter_in_scope(
        &self,
        syntax: &SyntaxArena,
        node: SyntaxId,
        name: &str,
    ) -> Option<DescriptorId> {
        syntax.ancestors(node).find_map(|ancestor| {
            syntax
                .kind(ancestor)
                .type_parameters()
                .iter()
                .find(|&&parameter| {
                    syntax
                        .kind(parameter)
                        .name()
                        .is_some_and(|found| &*self.text(found) == name)
                })
                .and_then(|&parameter| self.descriptors.by_source(parameter))
                .map(|descriptor| descriptor.id)
        })
    }

    fn is_subtype(&self, sub: &HostType, sup: &HostType) -> bool {
        if sub.is_error() || sup.is_error() {
            return false;
        }
        if sub.is_marked_nullable() && !sup.is_marked_nullable() && !sup.is_flexible() {
            return false;
        }
        let Some(TypeConstructor::Class(target)) = sup.constructor() else {
            return sub == sup;
        };
        let is_named = |id: DescriptorId, name: &str| {
            self.descriptors
                .get(id)
                .is_some_and(|d| d.qualified_name.as_deref() == Some(name))
        };
        if is_named(*target, "kotlin.Any") {
            return true;
        }
        let mut queue: VecDeque<HostType> = VecDeque::from([sub.clone()]);
        let mut visited = FxHashSet::default();
        while let Some(current) = queue.pop_front() {
            match current.constructor() {
                Some(TypeConstructor::Class(id)) => {
                    if id == target || is_named(*id, "kotlin.Nothing") {
                        return true;
                    }
                    if !visited.insert(*id) {
                        continue;
                    }
                    if let Some(class) = self.descriptors.get(*id).and_then(|d| d.as_class().cloned()) {
                        queue.extend(class.supertypes);
                    }
                }
                Some(TypeConstructor::TypeParameter(id)) => {
                    if let Some(parameter) = self
                        .descriptors
                        .get(*id)
                        .and_then(|d| d.as_type_parameter().cloned())
                    {
                        queue.extend(parameter.upper_bounds);
                    }
                }
                Some(TypeConstructor::NotFound(_)) | None => {}
            }
        }
        false
    }

    // Constants and inference

    fn constant(syntax: &SyntaxArena, expression: SyntaxId) -> Option<ConstantValue> {
        match syntax.kind(expression).as_expression()? {
            ExpressionNode::Constant(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn constant_type(&mut self, value: &ConstantValue) -> Option<HostType> {
        let name = match value {
            ConstantValue::Null => {
                let nothing = self.lookup_class("kotlin.Nothing")?;
                return Some(self.class_type(nothing, true));
            }
            ConstantValue::Bool(_) => "kotlin.Boolean",
            ConstantValue::Char(_) => "kotlin.Char",
            ConstantValue::Byte(_) => "kotlin.Byte",
            ConstantValue::Short(_) => "kotlin.Short",
            ConstantValue::Int(_) => "kotlin.Int",
            ConstantValue::Long(_) => "kotlin.Long",
            ConstantValue::Float(_) => "kotlin.Float",
            ConstantValue::Double(_) => "kotlin.Double",
            ConstantValue::String(_) => "kotlin.String",
            ConstantValue::ClassLiteral(_)
            | ConstantValue::EnumEntry(_)
            | ConstantValue::Annotation(_)
            | ConstantValue::Array(_) => return None,
        };
        self.builtin(name)
    }

    fn infer_expression(&mut self, syntax: &SyntaxArena, expression: SyntaxId) -> Option<HostType> {
        if let Some(ty) = self.expression_types.get(&expression) {
            return Some(ty.clone());
        }
        let value = Self::constant(syntax, expression)?;
        self.constant_type(&value)
    }

    fn resolve_annotation_entry(
        &mut self,
        syntax: &SyntaxArena,
        entry: SyntaxId,
    ) -> Option<AnnotationDescriptor> {
        let node = syntax.kind(entry).as_annotation_entry()?;
        let annotation_type = self.resolve_type_node(syntax, node.type_ref?);
        if annotation_type.is_error() {
            return None;
        }
        let parameter_names: Vec<Name> = match annotation_type.constructor() {
            Some(TypeConstructor::Class(id)) => self
                .descriptors
                .get(*id)
                .and_then(|class| class.as_class()?.primary_constructor)
                .and_then(|constructor| self.descriptors.get(constructor))
                .and_then(|constructor| {
                    constructor
                        .as_function()
                        .map(|f| f.value_parameters.iter().map(|p| p.name).collect())
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let mut arguments = Vec::new();
        for (position, &argument) in node.arguments.iter().enumerate() {
            let Some(argument) = syntax.kind(argument).as_value_argument() else {
                continue;
            };
            let Some(name) = argument.name.or_else(|| parameter_names.get(position).copied()) else {
                continue;
            };
            let Some(value) = argument.value.and_then(|value| Self::constant(syntax, value)) else {
                continue;
            };
            arguments.push((name, value));
        }
        Some(AnnotationDescriptor {
            annotation_type,
            arguments,
        })
    }

    // Indexing source declarations

    fn index(&mut self, syntax: &SyntaxArena) {
        let files: Vec<SyntaxId> = syntax
            .files()
            .iter()
            .copied()
            .filter(|file| self.indexed_files.insert(*file))
            .collect();

        let mut classes = Vec::new();
        for &file in &files {
            let Some(node) = syntax.kind(file).as_file() else {
                continue;
            };
            let package = Arc::clone(&node.package);
            for &declaration in &node.declarations {
                match syntax.kind(declaration) {
                    NodeKind::Class(_) => {
                        self.declare_class(syntax, declaration, &package, None, &mut classes);
                    }
                    NodeKind::TypeAlias(_) => self.declare_type_alias(syntax, declaration, &package),
                    _ => {}
                }
            }
        }

        for &file in &files {
            let Some(node) = syntax.kind(file).as_file() else {
                continue;
            };
            let package = Arc::clone(&node.package);
            for &declaration in &node.declarations {
                match syntax.kind(declaration) {
                    NodeKind::Function(_) => {
                        self.define_function(syntax, declaration, None, &package);
                    }
                    NodeKind::Property(_) => {
                        self.define_property(syntax, declaration, None, &package);
                    }
                    NodeKind::TypeAlias(alias) => {
                        let expanded = alias
                            .aliased
                            .map(|aliased| self.resolve_type_node(syntax, aliased));
                        if let (Some(expanded), Some(id)) =
                            (expanded, self.descriptors.by_source(declaration).map(|d| d.id))
                        {
                            self.update(id, |descriptor| {
                                if let DescriptorKind::TypeAlias(alias) = &mut descriptor.kind {
                                    alias.expanded = expanded;
                                }
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        for &class in &classes {
            self.define_class(syntax, class);
        }
        self.link_sealed_subclasses(&classes);
        tracing::debug!(files = files.len(), classes = classes.len(), "indexed source files");
    }

    fn qualified(package: &str, outer: Option<&str>, simple: &str) -> Arc<str> {
        match outer {
            Some(outer) => Arc::from(format!("{outer}.{simple}")),
            None if package.is_empty() => Arc::from(simple),
            None => Arc::from(format!("{package}.{simple}")),
        }
    }

    fn declare_class(
        &mut self,
        syntax: &SyntaxArena,
        node: SyntaxId,
        package: &Arc<str>,
        outer: Option<(DescriptorId, Arc<str>)>,
        out: &mut Vec<SyntaxId>,
    ) {
        let Some(class) = syntax.kind(node).as_class() else {
            return;
        };
        let name = class.name.unwrap_or(Name::EMPTY);
        let simple = self.text(name);
        let qualified = Self::qualified(package, outer.as_ref().map(|(_, q)| &**q), &simple);
        let kind = host_class_kind(class);
        let id = self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::Class(ClassDescriptor {
                    kind,
                    ..ClassDescriptor::default()
                }),
            );
            descriptor.qualified_name = Some(Arc::clone(&qualified));
            descriptor.package = Arc::clone(package);
            descriptor.container = outer.as_ref().map(|(id, _)| *id);
            descriptor.visibility = visibility(class.modifiers);
            descriptor.modality = if kind == HostClassKind::Interface {
                Modality::Abstract
            } else {
                modality(class.modifiers)
            };
            descriptor.flags = flags(class.modifiers);
            descriptor.source = Some(node);
            descriptor
        });
        let type_parameters = self.declare_type_parameters(syntax, &class.type_parameters, id);
        self.update(id, |descriptor| {
            if let DescriptorKind::Class(class) = &mut descriptor.kind {
                class.type_parameters = type_parameters;
            }
        });
        out.push(node);
        for &member in &class.declarations {
            if syntax.kind(member).as_class().is_some() {
                self.declare_class(syntax, member, package, Some((id, Arc::clone(&qualified))), out);
            }
        }
    }

    fn declare_type_alias(&mut self, syntax: &SyntaxArena, node: SyntaxId, package: &Arc<str>) {
        let Some(alias) = syntax.kind(node).as_type_alias() else {
            return;
        };
        let name = alias.name.unwrap_or(Name::EMPTY);
        let qualified = Self::qualified(package, None, &self.text(name));
        let id = self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::TypeAlias(TypeAliasDescriptor {
                    type_parameters: Vec::new(),
                    expanded: other_error("alias not expanded yet"),
                }),
            );
            descriptor.qualified_name = Some(qualified);
            descriptor.package = Arc::clone(package);
            descriptor.visibility = visibility(alias.modifiers);
            descriptor.source = Some(node);
            descriptor
        });
        let type_parameters = self.declare_type_parameters(syntax, &alias.type_parameters, id);
        self.update(id, |descriptor| {
            if let DescriptorKind::TypeAlias(alias) = &mut descriptor.kind {
                alias.type_parameters = type_parameters;
            }
        });
    }

    fn declare_type_parameters(
        &mut self,
        syntax: &SyntaxArena,
        nodes: &[SyntaxId],
        owner: DescriptorId,
    ) -> Vec<DescriptorId> {
        let mut ids = Vec::with_capacity(nodes.len());
        for (index, &node) in nodes.iter().enumerate() {
            let Some(parameter) = syntax.kind(node).as_type_parameter() else {
                continue;
            };
            let variance = if parameter.modifiers.contains(Modifiers::IN) {
                ProjectionVariance::In
            } else if parameter.modifiers.contains(Modifiers::OUT) {
                ProjectionVariance::Out
            } else {
                ProjectionVariance::Invariant
            };
            let name = parameter.name.unwrap_or(Name::EMPTY);
            let is_reified = parameter.modifiers.contains(Modifiers::REIFIED);
            ids.push(self.insert(|id| {
                let mut descriptor = Descriptor::new(
                    id,
                    name,
                    DescriptorKind::TypeParameter(TypeParameterDescriptor {
                        variance,
                        is_reified,
                        upper_bounds: Vec::new(),
                        index: u32::try_from(index).unwrap_or(u32::MAX),
                    }),
                );
                descriptor.container = Some(owner);
                descriptor.source = Some(node);
                descriptor
            }));
        }
        ids
    }

    /// Upper bounds of the type parameters of `owner`, from the parameter
    /// itself and from `where` clauses.
    fn resolve_bounds(&mut self, syntax: &SyntaxArena, owner: SyntaxId) {
        let kind = syntax.kind(owner);
        for &node in kind.type_parameters() {
            let Some(parameter) = syntax.kind(node).as_type_parameter() else {
                continue;
            };
            let Some(id) = self.descriptors.by_source(node).map(|d| d.id) else {
                continue;
            };
            let mut bound_nodes: Vec<SyntaxId> = parameter.bound.into_iter().collect();
            bound_nodes.extend(
                kind.constraints()
                    .iter()
                    .filter(|constraint| Some(constraint.subject) == parameter.name)
                    .map(|constraint| constraint.bound),
            );
            let bounds: Vec<HostType> = bound_nodes
                .into_iter()
                .map(|bound| self.resolve_type_node(syntax, bound))
                .collect();
            self.update(id, |descriptor| {
                if let DescriptorKind::TypeParameter(parameter) = &mut descriptor.kind {
                    parameter.upper_bounds = bounds;
                }
            });
        }
    }

    fn define_class(&mut self, syntax: &SyntaxArena, node: SyntaxId) {
        let Some(class) = syntax.kind(node).as_class() else {
            return;
        };
        let Some(descriptor) = self.descriptors.by_source(node) else {
            return;
        };
        let id = descriptor.id;
        let package = Arc::clone(&descriptor.package);
        self.resolve_bounds(syntax, node);

        let supertypes: Vec<HostType> = class
            .supertypes
            .iter()
            .map(|&supertype| self.resolve_type_node(syntax, supertype))
            .collect();
        self.update(id, |descriptor| {
            if let DescriptorKind::Class(class) = &mut descriptor.kind {
                class.supertypes = supertypes;
            }
        });

        let mut members = Vec::new();
        let mut constructors = Vec::new();
        let mut primary_constructor = None;
        if let Some(constructor) = class.primary_constructor {
            let constructor_id = self.define_function(syntax, constructor, Some(id), &package);
            primary_constructor = Some(constructor_id);
            constructors.push(constructor_id);
            let parameters = syntax
                .kind(constructor)
                .as_function()
                .map(|function| function.parameters.clone())
                .unwrap_or_default();
            for parameter in parameters {
                if let Some(property) = self.define_parameter_property(syntax, parameter, id) {
                    members.push(property);
                }
            }
        }
        for &member in &class.declarations {
            match syntax.kind(member) {
                NodeKind::Class(_) => {
                    members.extend(self.descriptors.by_source(member).map(|d| d.id));
                }
                NodeKind::Function(function) if function.form.is_constructor() => {
                    constructors.push(self.define_function(syntax, member, Some(id), &package));
                }
                NodeKind::Function(_) => {
                    members.push(self.define_function(syntax, member, Some(id), &package));
                }
                NodeKind::Property(_) => {
                    members.push(self.define_property(syntax, member, Some(id), &package));
                }
                _ => {}
            }
        }
        self.update(id, |descriptor| {
            if let DescriptorKind::Class(class) = &mut descriptor.kind {
                class.members = members;
                class.constructors = constructors;
                class.primary_constructor = primary_constructor;
            }
        });
    }

    fn define_function(
        &mut self,
        syntax: &SyntaxArena,
        node: SyntaxId,
        container: Option<DescriptorId>,
        package: &Arc<str>,
    ) -> DescriptorId {
        let Some(function) = syntax.kind(node).as_function() else {
            return self.insert(|id| Descriptor::new(id, Name::EMPTY, DescriptorKind::NotFound));
        };
        let is_constructor = function.form.is_constructor();
        let name = if is_constructor {
            self.interner.intern("<init>")
        } else {
            function.name.unwrap_or(Name::EMPTY)
        };
        let qualified = container
            .is_none()
            .then(|| Self::qualified(package, None, &self.text(name)));
        let id = self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::Function(FunctionDescriptor {
                    is_constructor,
                    has_dispatch_receiver: container.is_some() && !is_constructor,
                    ..FunctionDescriptor::default()
                }),
            );
            descriptor.qualified_name = qualified;
            descriptor.package = Arc::clone(package);
            descriptor.container = container;
            descriptor.visibility = visibility(function.modifiers);
            descriptor.modality = modality(function.modifiers);
            descriptor.flags = flags(function.modifiers);
            descriptor.source = Some(node);
            descriptor
        });

        let type_parameters = self.declare_type_parameters(syntax, &function.type_parameters, id);
        self.resolve_bounds(syntax, node);
        let value_parameters: Vec<ParameterDescriptor> = function
            .parameters
            .iter()
            .map(|&parameter| self.parameter_descriptor(syntax, parameter))
            .collect();
        let receiver = function
            .receiver
            .map(|receiver| self.resolve_type_node(syntax, receiver));
        let return_type = match (function.return_type, function.body) {
            (Some(written), _) => Some(self.resolve_type_node(syntax, written)),
            _ if is_constructor => container.map(|class| self.class_type(class, false)),
            (None, Some(body)) if !is_block(syntax, body) => self.infer_expression(syntax, body),
            (None, _) => self.builtin("kotlin.Unit"),
        };
        let overridden = if function.modifiers.contains(Modifiers::OVERRIDE) {
            self.find_overridden(container, name, Some(value_parameters.len()))
        } else {
            Vec::new()
        };
        self.update(id, |descriptor| {
            if let DescriptorKind::Function(function) = &mut descriptor.kind {
                function.type_parameters = type_parameters;
                function.value_parameters = value_parameters;
                function.receiver = receiver;
                function.return_type = return_type;
                function.overridden = overridden;
            }
        });
        id
    }

    fn parameter_descriptor(&mut self, syntax: &SyntaxArena, node: SyntaxId) -> ParameterDescriptor {
        let Some(parameter) = syntax.kind(node).as_parameter() else {
            return ParameterDescriptor {
                name: Name::EMPTY,
                ty: other_error("not a parameter"),
                is_vararg: false,
                is_crossinline: false,
                is_noinline: false,
                has_default: false,
                default_value: None,
                annotations: Vec::new(),
            };
        };
        let ty = match parameter.type_ref {
            Some(type_ref) => self.resolve_type_node(syntax, type_ref),
            None => other_error("missing parameter type"),
        };
        ParameterDescriptor {
            name: parameter.name.unwrap_or(Name::EMPTY),
            ty,
            is_vararg: parameter.modifiers.contains(Modifiers::VARARG),
            is_crossinline: parameter.modifiers.contains(Modifiers::CROSSINLINE),
            is_noinline: parameter.modifiers.contains(Modifiers::NOINLINE),
            has_default: parameter.default_value.is_some(),
            default_value: parameter
                .default_value
                .and_then(|value| Self::constant(syntax, value)),
            annotations: Vec::new(),
        }
    }

    /// Property descriptor of a `val`/`var` constructor parameter.
    fn define_parameter_property(
        &mut self,
        syntax: &SyntaxArena,
        node: SyntaxId,
        class: DescriptorId,
    ) -> Option<DescriptorId> {
        let parameter = syntax.kind(node).as_parameter()?;
        let binding = parameter.binding?;
        let ty = match parameter.type_ref {
            Some(type_ref) => self.resolve_type_node(syntax, type_ref),
            None => other_error("missing parameter type"),
        };
        let is_var = binding == ParameterBinding::Var;
        let name = parameter.name.unwrap_or(Name::EMPTY);
        let modifiers = parameter.modifiers;
        let package = self
            .descriptors
            .get(class)
            .map_or_else(|| Arc::from(""), |d| Arc::clone(&d.package));
        Some(self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::Property(PropertyDescriptor {
                    type_parameters: Vec::new(),
                    ty,
                    receiver: None,
                    has_dispatch_receiver: true,
                    is_var,
                    getter: Some(default_accessor()),
                    setter: is_var.then(default_accessor),
                    backing_field_required: true,
                    compile_time_initializer: None,
                    is_delegated: false,
                    member_kind: MemberKind::Declaration,
                    overridden: Vec::new(),
                }),
            );
            descriptor.package = package;
            descriptor.container = Some(class);
            descriptor.visibility = visibility(modifiers);
            descriptor.modality = modality(modifiers);
            descriptor.source = Some(node);
            descriptor
        }))
    }

    fn define_property(
        &mut self,
        syntax: &SyntaxArena,
        node: SyntaxId,
        container: Option<DescriptorId>,
        package: &Arc<str>,
    ) -> DescriptorId {
        let Some(property) = syntax.kind(node).as_property() else {
            return self.insert(|id| Descriptor::new(id, Name::EMPTY, DescriptorKind::NotFound));
        };
        let name = property.name.unwrap_or(Name::EMPTY);
        let simple = self.text(name);
        let qualified = container
            .is_none()
            .then(|| Self::qualified(package, None, &simple));
        let modifiers = property.modifiers;
        let id = self.insert(|id| {
            let mut descriptor = Descriptor::new(
                id,
                name,
                DescriptorKind::Property(PropertyDescriptor {
                    type_parameters: Vec::new(),
                    ty: other_error("property type not resolved yet"),
                    receiver: None,
                    has_dispatch_receiver: container.is_some(),
                    is_var: property.is_var,
                    getter: None,
                    setter: None,
                    backing_field_required: false,
                    compile_time_initializer: None,
                    is_delegated: property.delegate.is_some(),
                    member_kind: MemberKind::Declaration,
                    overridden: Vec::new(),
                }),
            );
            descriptor.qualified_name = qualified;
            descriptor.package = Arc::clone(package);
            descriptor.container = container;
            descriptor.visibility = visibility(modifiers);
            descriptor.modality = modality(modifiers);
            descriptor.flags = flags(modifiers);
            descriptor.source = Some(node);
            descriptor
        });

        let type_parameters = self.declare_type_parameters(syntax, &property.type_parameters, id);
        self.resolve_bounds(syntax, node);
        let ty = match (property.type_ref, property.initializer) {
            (Some(type_ref), _) => self.resolve_type_node(syntax, type_ref),
            (None, Some(initializer)) => self
                .infer_expression(syntax, initializer)
                .unwrap_or_else(|| other_error(&format!("cannot infer type of {simple}"))),
            (None, None) => other_error(&format!("cannot infer type of {simple}")),
        };
        let receiver = property
            .receiver
            .map(|receiver| self.resolve_type_node(syntax, receiver));
        let accessor = |written: Option<SyntaxId>| AccessorDescriptor {
            visibility: visibility(modifiers),
            is_default: written.is_none(),
            ..AccessorDescriptor::default()
        };
        let getter = Some(accessor(property.getter));
        let setter = property.is_var.then(|| accessor(property.setter));
        let backing_field_required = !modifiers.contains(Modifiers::ABSTRACT)
            && property.delegate.is_none()
            && receiver.is_none()
            && (property.initializer.is_some() || property.getter.is_none());
        let compile_time_initializer = if modifiers.contains(Modifiers::CONST) {
            property
                .initializer
                .and_then(|initializer| Self::constant(syntax, initializer))
        } else {
            None
        };
        let overridden = if modifiers.contains(Modifiers::OVERRIDE) {
            self.find_overridden(container, name, None)
        } else {
            Vec::new()
        };
        self.update(id, |descriptor| {
            if let DescriptorKind::Property(property) = &mut descriptor.kind {
                property.type_parameters = type_parameters;
                property.ty = ty;
                property.receiver = receiver;
                property.getter = getter;
                property.setter = setter;
                property.backing_field_required = backing_field_required;
                property.compile_time_initializer = compile_time_initializer;
                property.overridden = overridden;
            }
        });
        id
    }

    /// Nearest members of the supertypes of `container` that a member named
    /// `name` overrides. `arity` is the parameter count of a function;
    /// `None` looks for properties.
    fn find_overridden(
        &self,
        container: Option<DescriptorId>,
        name: Name,
        arity: Option<usize>,
    ) -> Vec<DescriptorId> {
        let Some(class) = container.and_then(|id| self.descriptors.get(id)) else {
            return Vec::new();
        };
        let mut queue: VecDeque<HostType> = class
            .as_class()
            .map(|class| class.supertypes.iter().cloned().collect())
            .unwrap_or_default();
        let mut visited = FxHashSet::default();
        while let Some(supertype) = queue.pop_front() {
            let Some(TypeConstructor::Class(id)) = supertype.constructor() else {
                continue;
            };
            if !visited.insert(*id) {
                continue;
            }
            let Some(class) = self.descriptors.get(*id).and_then(|d| d.as_class().cloned()) else {
                continue;
            };
            let found: Vec<DescriptorId> = class
                .members
                .iter()
                .filter_map(|&member| self.descriptors.get(member))
                .filter(|member| member.name == name)
                .filter(|member| match (&member.kind, arity) {
                    (DescriptorKind::Function(function), Some(arity)) => {
                        function.value_parameters.len() == arity
                    }
                    (DescriptorKind::Property(_), None) => true,
                    _ => false,
                })
                .map(|member| member.id)
                .collect();
            if !found.is_empty() {
                return found;
            }
            queue.extend(class.supertypes);
        }
        Vec::new()
    }

    /// Source classes whose supertype is a sealed class become its
    /// subclasses, in indexing order.
    fn link_sealed_subclasses(&mut self, classes: &[SyntaxId]) {
        for &node in classes {
            let Some(subclass) = self.descriptors.by_source(node) else {
                continue;
            };
            let supertypes = subclass
                .as_class()
                .map(|class| class.supertypes.clone())
                .unwrap_or_default();
            for supertype in supertypes {
                let Some(TypeConstructor::Class(parent)) = supertype.constructor() else {
                    continue;
                };
                let is_sealed = self
                    .descriptors
                    .get(*parent)
                    .is_some_and(|parent| parent.modality == Modality::Sealed);
                if !is_sealed {
                    continue;
                }
                let child = subclass.id;
                self.update(*parent, |descriptor| {
                    if let DescriptorKind::Class(class) = &mut descriptor.kind {
                        if !class.sealed_subclasses.contains(&child) {
                            class.sealed_subclasses.push(child);
                        }
                    }
                });
            }
        }
    }
}

fn other_error(message: &str) -> HostType {
    HostType::error(TypeDiagnostic::Other(Arc::from(message)))
}

fn default_accessor() -> AccessorDescriptor {
    AccessorDescriptor {
        is_default: true,
        ..AccessorDescriptor::default()
    }
}

/// `a.b.C` for a chain of qualified user types.
fn dotted_name(syntax: &SyntaxArena, node: SyntaxId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(node);
    while let Some(id) = current {
        let Some(user_type) = syntax.kind(id).as_user_type() else {
            break;
        };
        if let Some(name) = user_type.name {
            segments.push(syntax.name_text(name));
        }
        current = user_type.qualifier;
    }
    segments.reverse();
    segments.join(".")
}

fn is_block(syntax: &SyntaxArena, expression: SyntaxId) -> bool {
    matches!(
        syntax.kind(expression).as_expression(),
        Some(ExpressionNode::Block { .. })
    )
}

fn host_class_kind(class: &ClassNode) -> HostClassKind {
    match class.keyword {
        ClassKeyword::Interface => HostClassKind::Interface,
        ClassKeyword::Object => HostClassKind::Object,
        ClassKeyword::EnumEntry => HostClassKind::EnumEntry,
        ClassKeyword::Class if class.modifiers.contains(Modifiers::ENUM) => HostClassKind::EnumClass,
        ClassKeyword::Class if class.modifiers.contains(Modifiers::ANNOTATION) => {
            HostClassKind::AnnotationClass
        }
        ClassKeyword::Class => HostClassKind::Class,
    }
}

fn visibility(modifiers: Modifiers) -> Visibility {
    if modifiers.contains(Modifiers::PRIVATE) {
        Visibility::Private
    } else if modifiers.contains(Modifiers::PROTECTED) {
        Visibility::Protected
    } else if modifiers.contains(Modifiers::INTERNAL) {
        Visibility::Internal
    } else {
        Visibility::Public
    }
}

fn modality(modifiers: Modifiers) -> Modality {
    if modifiers.contains(Modifiers::SEALED) {
        Modality::Sealed
    } else if modifiers.contains(Modifiers::ABSTRACT) {
        Modality::Abstract
    } else if modifiers.contains(Modifiers::OPEN) {
        Modality::Open
    } else {
        Modality::Final
    }
}

fn flags(modifiers: Modifiers) -> DescriptorFlags {
    FLAG_MODIFIERS
        .iter()
        .filter(|(modifier, _)| modifiers.contains(*modifier))
        .fold(DescriptorFlags::empty(), |acc, (_, flag)| acc | *flag)
}

impl DescriptorSource for MockResolver {
    fn descriptor(&self, id: DescriptorId) -> Option<Arc<Descriptor>> {
        self.state.lock().descriptors.get(id)
    }

    fn name_text(&self, name: Name) -> Arc<str> {
        self.state.lock().text(name)
    }
}

impl Resolver for MockResolver {
    fn resolve_declaration(&self, _syntax: &SyntaxArena, node: SyntaxId) -> Option<Arc<Descriptor>> {
        self.state.lock().descriptors.by_source(node)
    }

    fn resolve_type(&self, syntax: &SyntaxArena, type_ref: SyntaxId) -> Option<HostType> {
        syntax.kind(type_ref).as_type_reference()?;
        Some(self.state.lock().resolve_type_node(syntax, type_ref))
    }

    fn resolve_annotation_entry(
        &self,
        syntax: &SyntaxArena,
        entry: SyntaxId,
    ) -> Option<AnnotationDescriptor> {
        self.state.lock().resolve_annotation_entry(syntax, entry)
    }

    fn resolve_constant(&self, syntax: &SyntaxArena, expression: SyntaxId) -> Option<ConstantValue> {
        MockState::constant(syntax, expression)
    }

    fn resolve_expression_type(&self, syntax: &SyntaxArena, expression: SyntaxId) -> Option<HostType> {
        self.state.lock().infer_expression(syntax, expression)
    }

    fn find_class(&self, _syntax: &SyntaxArena, qualified_name: &str) -> Option<Arc<Descriptor>> {
        let state = self.state.lock();
        let id = state.classes.get(qualified_name)?;
        state.descriptors.get(*id)
    }

    fn find_callables(&self, _syntax: &SyntaxArena, qualified_name: &str) -> Vec<Arc<Descriptor>> {
        let state = self.state.lock();
        state
            .callables
            .get(qualified_name)
            .map(|ids| ids.iter().filter_map(|&id| state.descriptors.get(id)).collect())
            .unwrap_or_default()
    }

    fn is_subtype(&self, sub: &HostType, sup: &HostType) -> bool {
        self.state.lock().is_subtype(sub, sup)
    }

    fn builtin_type(&self, builtin: Builtin) -> HostType {
        let qualified = match builtin {
            Builtin::Any => "kotlin.Any",
            Builtin::Nothing => "kotlin.Nothing",
            Builtin::Unit => "kotlin.Unit",
        };
        self.state
            .lock()
            .builtin(qualified)
            .unwrap_or_else(|| HostType::not_found(qualified))
    }

    fn current_round_node(&self, _syntax: &SyntaxArena, node: SyntaxId) -> Option<SyntaxId> {
        self.state
            .lock()
            .rebinding
            .get(&node)
            .copied()
            .unwrap_or(Some(node))
    }

    fn expect_actual_counterparts(&self, descriptor: &Descriptor) -> Vec<DescriptorId> {
        self.state
            .lock()
            .counterparts
            .get(&descriptor.id)
            .cloned()
            .unwrap_or_default()
    }
}

/// One dependency recorded through [`LookupTracker`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Supertypes(HostType),
    SealedSubclasses(String),
    Member(DescriptorId),
}

/// Tracker that keeps every recording, in call order.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    lookups: Mutex<Vec<Lookup>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().clone()
    }

    /// Class names whose sealed subclasses were enumerated.
    pub fn sealed_lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .iter()
            .filter_map(|lookup| match lookup {
                Lookup::SealedSubclasses(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lookups.lock().clear();
    }
}

impl LookupTracker for RecordingTracker {
    fn record_lookup_with_supertypes(&self, ty: &HostType) {
        self.lookups.lock().push(Lookup::Supertypes(ty.clone()));
    }

    fn record_get_sealed_subclasses(&self, class_name: &str) {
        self.lookups
            .lock()
            .push(Lookup::SealedSubclasses(class_name.to_owned()));
    }

    fn record_lookup_for_member(&self, member: &Descriptor) {
        self.lookups.lock().push(Lookup::Member(member.id));
    }
}
