//! The shape graph: immutable nodes of the model.
//!
//! A [`Shape`] is a common envelope (id, traits, source location, mixin
//! list) over a [`ShapeKind`] payload that varies by kind. Shapes are only
//! produced by freezing a [`ShapeBuilder`](builder::ShapeBuilder) and are
//! immutable and freely shareable afterwards.

pub mod builder;
pub mod shape_id;

use std::{fmt, sync::OnceLock};

use indexmap::IndexMap;

use crate::{
    SourceLocation, Trait, TraitMap,
    error::ExpectationError,
    shapes::shape_id::{ShapeId, ToShapeId},
};

/// The scalar shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Blob,
    String,
    Timestamp,
    Document,
}

impl SimpleType {
    /// Returns `true` for the boolean and numeric kinds that honor the
    /// legacy `box` trait.
    pub fn is_boxable(self) -> bool {
        matches!(
            self,
            SimpleType::Boolean
                | SimpleType::Byte
                | SimpleType::Short
                | SimpleType::Integer
                | SimpleType::Long
                | SimpleType::Float
                | SimpleType::Double
        )
    }
}

/// Discriminant of every shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Blob,
    String,
    Timestamp,
    Document,
    Enum,
    List,
    Set,
    Map,
    Structure,
    Union,
    Service,
    Resource,
    Operation,
    Member,
}

impl From<SimpleType> for ShapeType {
    fn from(simple: SimpleType) -> Self {
        match simple {
            SimpleType::Boolean => ShapeType::Boolean,
            SimpleType::Byte => ShapeType::Byte,
            SimpleType::Short => ShapeType::Short,
            SimpleType::Integer => ShapeType::Integer,
            SimpleType::Long => ShapeType::Long,
            SimpleType::Float => ShapeType::Float,
            SimpleType::Double => ShapeType::Double,
            SimpleType::BigInteger => ShapeType::BigInteger,
            SimpleType::BigDecimal => ShapeType::BigDecimal,
            SimpleType::Blob => ShapeType::Blob,
            SimpleType::String => ShapeType::String,
            SimpleType::Timestamp => ShapeType::Timestamp,
            SimpleType::Document => ShapeType::Document,
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Boolean => "boolean",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Blob => "blob",
            ShapeType::String => "string",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Document => "document",
            ShapeType::Enum => "enum",
            ShapeType::List => "list",
            ShapeType::Set => "set",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Service => "service",
            ShapeType::Resource => "resource",
            ShapeType::Operation => "operation",
            ShapeType::Member => "member",
        };
        write!(f, "{name}")
    }
}

/// Ordered mapping from member name to member shape.
pub type MemberMap = IndexMap<String, Shape>;

/// List payload: a single `member` member shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ListShape {
    pub(crate) member: Box<Shape>,
}

impl ListShape {
    pub fn member(&self) -> &Shape {
        &self.member
    }
}

/// Set payload. Sets are deprecated aliases for lists with unique items;
/// the equivalent list form is memoized on first request.
#[derive(Debug, Clone, PartialEq)]
pub struct SetShape {
    pub(crate) member: Box<Shape>,
    pub(crate) list_form: ListFormCache,
}

impl SetShape {
    pub fn member(&self) -> &Shape {
        &self.member
    }
}

/// Memoized list form of a set shape.
///
/// The cache is skipped by equality and not carried across clones; it is
/// purely a per-value computation cache.
#[derive(Default)]
pub(crate) struct ListFormCache(OnceLock<Box<Shape>>);

impl ListFormCache {
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> Shape) -> &Shape {
        self.0.get_or_init(|| Box::new(init()))
    }
}

impl Clone for ListFormCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for ListFormCache {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl fmt::Debug for ListFormCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListFormCache")
    }
}

/// Map payload: `key` and `value` member shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub(crate) key: Box<Shape>,
    pub(crate) value: Box<Shape>,
}

impl MapShape {
    pub fn key(&self) -> &Shape {
        &self.key
    }

    pub fn value(&self) -> &Shape {
        &self.value
    }
}

/// Structure payload: ordered named members.
#[derive(Debug, Clone)]
pub struct StructureShape {
    pub(crate) members: MemberMap,
}

/// Union payload: ordered named members, exactly one of which is present
/// in any value of the union.
#[derive(Debug, Clone)]
pub struct UnionShape {
    pub(crate) members: MemberMap,
}

/// Enum payload: ordered unit-targeting members, each carrying a resolved
/// string `enumValue` trait.
#[derive(Debug, Clone)]
pub struct EnumShape {
    pub(crate) members: MemberMap,
}

macro_rules! ordered_member_eq {
    ($($payload:ty),*) => {
        $(
            // Member order is significant, so compare entries pairwise
            // instead of using IndexMap's order-insensitive equality.
            impl PartialEq for $payload {
                fn eq(&self, other: &Self) -> bool {
                    self.members.iter().eq(other.members.iter())
                }
            }
        )*
    };
}

ordered_member_eq!(StructureShape, UnionShape, EnumShape);

impl StructureShape {
    pub fn members(&self) -> &MemberMap {
        &self.members
    }
}

impl UnionShape {
    pub fn members(&self) -> &MemberMap {
        &self.members
    }
}

impl EnumShape {
    pub fn members(&self) -> &MemberMap {
        &self.members
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// Service payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceShape {
    pub(crate) version: String,
    pub(crate) operations: Vec<ShapeId>,
    pub(crate) resources: Vec<ShapeId>,
    pub(crate) errors: Vec<ShapeId>,
    pub(crate) bound_shapes: Vec<ShapeId>,
    pub(crate) rename: IndexMap<ShapeId, String>,
}

impl ServiceShape {
    /// The service version string; empty when unset.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operations(&self) -> &[ShapeId] {
        &self.operations
    }

    pub fn resources(&self) -> &[ShapeId] {
        &self.resources
    }

    /// Common errors that every operation bound to the service can return.
    pub fn errors(&self) -> &[ShapeId] {
        &self.errors
    }

    /// Shapes explicitly bound to the service outside the operation and
    /// resource graph, in declaration order.
    pub fn bound_shapes(&self) -> &[ShapeId] {
        &self.bound_shapes
    }

    /// The name to use for a shape in the context of this service, honoring
    /// the service's rename table.
    pub fn contextual_name<'a>(&'a self, id: &'a ShapeId) -> &'a str {
        self.rename.get(id).map(String::as_str).unwrap_or(id.name())
    }
}

/// Resource payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceShape {
    pub(crate) identifiers: IndexMap<String, ShapeId>,
    pub(crate) operations: Vec<ShapeId>,
    pub(crate) resources: Vec<ShapeId>,
}

impl ResourceShape {
    pub fn identifiers(&self) -> &IndexMap<String, ShapeId> {
        &self.identifiers
    }

    pub fn operations(&self) -> &[ShapeId] {
        &self.operations
    }

    pub fn resources(&self) -> &[ShapeId] {
        &self.resources
    }
}

/// Operation payload. Input and output default to the unit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationShape {
    pub(crate) input: ShapeId,
    pub(crate) output: ShapeId,
    pub(crate) errors: Vec<ShapeId>,
}

impl OperationShape {
    pub fn input(&self) -> &ShapeId {
        &self.input
    }

    pub fn output(&self) -> &ShapeId {
        &self.output
    }

    pub fn errors(&self) -> &[ShapeId] {
        &self.errors
    }
}

/// Member payload: the target the member points at. The container relation
/// is derived from the member's id, not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    pub(crate) target: ShapeId,
}

impl MemberShape {
    pub fn target(&self) -> &ShapeId {
        &self.target
    }
}

/// Kind-specific payload of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Simple(SimpleType),
    List(ListShape),
    Set(SetShape),
    Map(MapShape),
    Structure(StructureShape),
    Union(UnionShape),
    Enum(EnumShape),
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
    Member(MemberShape),
}

/// An immutable node in the model graph.
///
/// Produced once by [`ShapeBuilder::build`](builder::ShapeBuilder::build)
/// and never mutated afterwards; "changing" a shape means building a new one
/// via [`Shape::to_builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) traits: TraitMap,
    pub(crate) source: SourceLocation,
    pub(crate) mixins: Vec<ShapeId>,
    pub(crate) kind: ShapeKind,
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }

    /// All traits applied to the shape, in insertion order.
    pub fn traits(&self) -> &TraitMap {
        &self.traits
    }

    /// Ids of the mixins this shape was built from, in declaration order.
    pub fn mixins(&self) -> &[ShapeId] {
        &self.mixins
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn shape_type(&self) -> ShapeType {
        match &self.kind {
            ShapeKind::Simple(simple) => (*simple).into(),
            ShapeKind::List(_) => ShapeType::List,
            ShapeKind::Set(_) => ShapeType::Set,
            ShapeKind::Map(_) => ShapeType::Map,
            ShapeKind::Structure(_) => ShapeType::Structure,
            ShapeKind::Union(_) => ShapeType::Union,
            ShapeKind::Enum(_) => ShapeType::Enum,
            ShapeKind::Service(_) => ShapeType::Service,
            ShapeKind::Resource(_) => ShapeType::Resource,
            ShapeKind::Operation(_) => ShapeType::Operation,
            ShapeKind::Member(_) => ShapeType::Member,
        }
    }

    pub fn get_trait(&self, id: &ShapeId) -> Option<&Trait> {
        self.traits.get(id)
    }

    pub fn has_trait(&self, id: &ShapeId) -> bool {
        self.traits.contains_key(id)
    }

    /// Get a trait, failing with an [`ExpectationError`] when absent.
    pub fn expect_trait(&self, id: &ShapeId) -> Result<&Trait, ExpectationError> {
        self.get_trait(id)
            .ok_or_else(|| ExpectationError::missing_trait(&self.id, id))
    }

    /// The member shapes of this shape, in declaration order. Empty for
    /// kinds without members.
    pub fn members(&self) -> impl Iterator<Item = &Shape> {
        let members: Vec<&Shape> = match &self.kind {
            ShapeKind::List(list) => vec![&list.member],
            ShapeKind::Set(set) => vec![&set.member],
            ShapeKind::Map(map) => vec![&map.key, &map.value],
            ShapeKind::Structure(payload) => payload.members.values().collect(),
            ShapeKind::Union(payload) => payload.members.values().collect(),
            ShapeKind::Enum(payload) => payload.members.values().collect(),
            _ => Vec::new(),
        };
        members.into_iter()
    }

    /// Look up a member by name.
    pub fn member(&self, name: &str) -> Option<&Shape> {
        self.members()
            .find(|member| member.id.member() == Some(name))
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, ShapeKind::Member(_))
    }

    pub fn as_member(&self) -> Option<&MemberShape> {
        match &self.kind {
            ShapeKind::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceShape> {
        match &self.kind {
            ShapeKind::Service(service) => Some(service),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumShape> {
        match &self.kind {
            ShapeKind::Enum(payload) => Some(payload),
            _ => None,
        }
    }

    /// The target of this shape when it is a member.
    pub fn target(&self) -> Option<&ShapeId> {
        self.as_member().map(MemberShape::target)
    }

    /// The id of the shape containing this member, derived from the
    /// member's own id.
    pub fn member_container(&self) -> Option<ShapeId> {
        self.is_member().then(|| self.id.without_member())
    }

    /// The name of this member within its container.
    pub fn member_name(&self) -> Option<&str> {
        if self.is_member() { self.id.member() } else { None }
    }

    /// The list representation of this shape.
    ///
    /// Lists return themselves. Sets, which are deprecated aliases for
    /// lists with unique items, return a memoized list form: repeated calls
    /// on the same shape value return the same reference. Other kinds
    /// return `None`.
    pub fn as_list(&self) -> Option<&Shape> {
        match &self.kind {
            ShapeKind::List(_) => Some(self),
            ShapeKind::Set(set) => Some(set.list_form.get_or_init(|| Shape {
                id: self.id.clone(),
                traits: self.traits.clone(),
                source: self.source.clone(),
                mixins: self.mixins.clone(),
                kind: ShapeKind::List(ListShape {
                    member: set.member.clone(),
                }),
            })),
            _ => None,
        }
    }
}

impl ToShapeId for Shape {
    fn to_shape_id(&self) -> &ShapeId {
        &self.id
    }
}
