//! Mutable staging builders for shapes.
//!
//! A [`ShapeBuilder`] is a single-writer staging object: rule violations
//! observed while staging are recorded and reported when [`build`] freezes
//! the builder into an immutable [`Shape`], so the fluent API never has to
//! return mid-chain errors.
//!
//! [`build`]: ShapeBuilder::build
//!
//! # Examples
//!
//! ```
//! use seam_model::{ShapeBuilder, ShapeId};
//!
//! let string_id: ShapeId = "example.weather#CityName".parse().unwrap();
//! let structure = ShapeBuilder::structure()
//!     .id("example.weather#City".parse().unwrap())
//!     .member("name", string_id)
//!     .build()
//!     .unwrap();
//! assert_eq!(structure.members().count(), 1);
//! ```

use indexmap::IndexMap;

use crate::{
    Node, SourceLocation, StructuralError, Trait, TraitMap,
    shapes::{
        EnumShape, ListFormCache, ListShape, MapShape, MemberMap, MemberShape, OperationShape,
        ResourceShape, ServiceShape, SetShape, Shape, ShapeKind, ShapeType, SimpleType,
        StructureShape, UnionShape, shape_id::ShapeId,
    },
    traits::{prelude, sync_box_traits},
};

/// Staging builder for every shape kind.
///
/// Created through one of the kind constructors ([`structure`],
/// [`service`], [`member`], ...). Freezing with [`build`] validates the
/// kind's rule table and produces an immutable [`Shape`].
///
/// [`structure`]: ShapeBuilder::structure
/// [`service`]: ShapeBuilder::service
/// [`member`]: ShapeBuilder::member_shape
/// [`build`]: ShapeBuilder::build
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    shape_type: ShapeType,
    id: Option<ShapeId>,
    traits: TraitMap,
    source: SourceLocation,
    mixins: Vec<ShapeId>,
    members: MemberMap,
    inherited: MemberMap,
    target: Option<ShapeId>,
    version: Option<String>,
    operations: Vec<ShapeId>,
    resources: Vec<ShapeId>,
    errors: Vec<ShapeId>,
    bound_shapes: Vec<ShapeId>,
    rename: IndexMap<ShapeId, String>,
    identifiers: IndexMap<String, ShapeId>,
    input: Option<ShapeId>,
    output: Option<ShapeId>,
    staged_errors: Vec<String>,
}

impl ShapeBuilder {
    fn new(shape_type: ShapeType) -> Self {
        Self {
            shape_type,
            id: None,
            traits: TraitMap::new(),
            source: SourceLocation::none(),
            mixins: Vec::new(),
            members: MemberMap::new(),
            inherited: MemberMap::new(),
            target: None,
            version: None,
            operations: Vec::new(),
            resources: Vec::new(),
            errors: Vec::new(),
            bound_shapes: Vec::new(),
            rename: IndexMap::new(),
            identifiers: IndexMap::new(),
            input: None,
            output: None,
            staged_errors: Vec::new(),
        }
    }

    pub fn simple(simple: SimpleType) -> Self {
        Self::new(simple.into())
    }

    pub fn boolean() -> Self {
        Self::simple(SimpleType::Boolean)
    }

    pub fn integer() -> Self {
        Self::simple(SimpleType::Integer)
    }

    pub fn string() -> Self {
        Self::simple(SimpleType::String)
    }

    pub fn timestamp() -> Self {
        Self::simple(SimpleType::Timestamp)
    }

    pub fn structure() -> Self {
        Self::new(ShapeType::Structure)
    }

    pub fn union() -> Self {
        Self::new(ShapeType::Union)
    }

    /// An enum shape: a string restricted to named unit-targeting members.
    pub fn enum_shape() -> Self {
        Self::new(ShapeType::Enum)
    }

    pub fn list() -> Self {
        Self::new(ShapeType::List)
    }

    /// A set shape. Sets are deprecated list aliases, so the implicit
    /// unique-items trait is attached up front.
    pub fn set() -> Self {
        let mut builder = Self::new(ShapeType::Set);
        let id = prelude::unique_items().clone();
        builder.traits.insert(id.clone(), Trait::new(id, Node::Bool(true)));
        builder
    }

    pub fn map() -> Self {
        Self::new(ShapeType::Map)
    }

    pub fn service() -> Self {
        Self::new(ShapeType::Service)
    }

    pub fn resource() -> Self {
        Self::new(ShapeType::Resource)
    }

    pub fn operation() -> Self {
        Self::new(ShapeType::Operation)
    }

    /// A member shape; its id must carry a member segment.
    pub fn member_shape() -> Self {
        Self::new(ShapeType::Member)
    }

    /// The kind this builder will freeze into.
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// The staged id, if one has been set.
    pub fn get_id(&self) -> Option<&ShapeId> {
        self.id.as_ref()
    }

    /// Set the shape id.
    ///
    /// Setting the id on a shape that already has members re-parents every
    /// existing member's id under the new container, preserving member
    /// names, so renaming an aggregate needs no caller bookkeeping.
    pub fn id(mut self, id: ShapeId) -> Self {
        if self.shape_type != ShapeType::Member && id.is_member() {
            self.stage(format!(
                "a {} shape id must not contain a member segment, found `{id}`",
                self.shape_type
            ));
            return self;
        }
        for (name, member) in self.members.iter_mut().chain(self.inherited.iter_mut()) {
            member.id = id
                .with_member(name)
                .expect("existing member names are valid tokens");
        }
        self.id = Some(id);
        self
    }

    pub fn source(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    /// Apply a trait, replacing any existing trait with the same id.
    ///
    /// The synthetic enum trait is reserved for internal bookkeeping and
    /// may not be applied directly; doing so fails the build.
    pub fn add_trait(mut self, value: Trait) -> Self {
        if value.id() == prelude::enum_trait() {
            self.stage(format!(
                "the `{}` trait is synthesized from enum members and cannot be applied directly",
                prelude::enum_trait()
            ));
            return self;
        }
        self.traits.insert(value.id().clone(), value);
        self
    }

    /// Remove a trait by id. Removing the reserved synthetic enum trait
    /// fails the build.
    pub fn remove_trait(mut self, id: &ShapeId) -> Self {
        if id == prelude::enum_trait() {
            self.stage(format!(
                "the `{}` trait is synthesized from enum members and cannot be removed directly",
                prelude::enum_trait()
            ));
            return self;
        }
        self.traits.shift_remove(id);
        self
    }

    /// Declare a mixin to merge into this shape at assembly time.
    pub fn mixin(mut self, id: ShapeId) -> Self {
        self.mixins.push(id);
        self
    }

    /// Add a fully built member shape, keyed by its member name.
    pub fn add_member(mut self, member: Shape) -> Self {
        let Some(name) = member.id().member().map(str::to_string) else {
            self.stage(format!(
                "`{}` is not a member shape and cannot be added as a member",
                member.id()
            ));
            return self;
        };
        let member = if self.shape_type == ShapeType::Enum {
            match self.check_enum_member(member) {
                Some(member) => member,
                None => return self,
            }
        } else {
            member
        };
        self.members.insert(name, member);
        self
    }

    /// Convenience for adding a plain member by name and target. The
    /// builder's id must already be set.
    pub fn member(mut self, name: &str, target: ShapeId) -> Self {
        let Some(id) = &self.id else {
            self.stage(format!("an id must be set before adding member `{name}`"));
            return self;
        };
        match id.with_member(name) {
            Ok(member_id) => {
                let member = Shape {
                    id: member_id,
                    traits: TraitMap::new(),
                    source: self.source.clone(),
                    mixins: Vec::new(),
                    kind: ShapeKind::Member(MemberShape { target }),
                };
                self.add_member(member)
            }
            Err(err) => {
                self.stage(err.to_string());
                self
            }
        }
    }

    /// Remove a member by name. On enum shapes the synthesized enum trait
    /// reflects the removal automatically, since it is derived from the
    /// member list when the builder freezes.
    pub fn remove_member(mut self, name: &str) -> Self {
        self.members.shift_remove(name);
        self.inherited.shift_remove(name);
        self
    }

    pub fn clear_members(mut self) -> Self {
        self.members.clear();
        self.inherited.clear();
        self
    }

    /// Set the target of a member shape.
    pub fn target(mut self, target: ShapeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn add_operation(mut self, id: ShapeId) -> Self {
        self.operations.push(id);
        self
    }

    pub fn add_resource(mut self, id: ShapeId) -> Self {
        self.resources.push(id);
        self
    }

    pub fn add_error(mut self, id: ShapeId) -> Self {
        self.errors.push(id);
        self
    }

    /// Bind an auxiliary shape to a service, outside the operation and
    /// resource graph. Binding order is preserved.
    pub fn add_bound_shape(mut self, id: ShapeId) -> Self {
        self.bound_shapes.push(id);
        self
    }

    pub fn clear_bound_shapes(mut self) -> Self {
        self.bound_shapes.clear();
        self
    }

    /// Record a contextual rename of a shape within a service.
    pub fn put_rename(mut self, id: ShapeId, name: impl Into<String>) -> Self {
        self.rename.insert(id, name.into());
        self
    }

    /// Declare a resource identifier.
    pub fn identifier(mut self, name: impl Into<String>, target: ShapeId) -> Self {
        self.identifiers.insert(name.into(), target);
        self
    }

    pub fn input(mut self, id: ShapeId) -> Self {
        self.input = Some(id);
        self
    }

    pub fn output(mut self, id: ShapeId) -> Self {
        self.output = Some(id);
        self
    }

    /// Freeze the builder into an immutable [`Shape`].
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] carrying the shape id and source
    /// location on any staged rule violation, a missing id, wrong member
    /// arity for the kind, a member not parented to this shape, or a
    /// member-kind shape without a target.
    pub fn build(mut self) -> Result<Shape, StructuralError> {
        if let Some(message) = self.staged_errors.first() {
            return Err(self.error(message.clone()));
        }

        let Some(id) = self.id.clone() else {
            return Err(self.error("shape is missing an id"));
        };
        if self.shape_type == ShapeType::Member && !id.is_member() {
            return Err(self.error(format!(
                "a member shape id must contain a member segment, found `{id}`"
            )));
        }

        // Inherited members precede local ones in the frozen shape.
        if !self.inherited.is_empty() {
            let local = std::mem::take(&mut self.members);
            self.members = std::mem::take(&mut self.inherited);
            self.members.extend(local);
        }

        for member in self.members.values() {
            if member.id().without_member() != id {
                return Err(self.error(format!(
                    "member `{}` is not parented to `{id}`",
                    member.id()
                )));
            }
        }

        let kind = self.build_kind(&id)?;

        let mut traits = std::mem::take(&mut self.traits);
        sync_box_traits(&mut traits);
        if let ShapeKind::Enum(payload) = &kind {
            if let Some(synthesized) = synthesize_enum_trait(&payload.members) {
                traits.insert(prelude::enum_trait().clone(), synthesized);
            }
        }

        Ok(Shape {
            id,
            traits,
            source: self.source,
            mixins: self.mixins,
            kind,
        })
    }

    fn build_kind(&mut self, id: &ShapeId) -> Result<ShapeKind, StructuralError> {
        match self.shape_type {
            ShapeType::List => Ok(ShapeKind::List(ListShape {
                member: self.take_sole_member(id, "list")?,
            })),
            ShapeType::Set => Ok(ShapeKind::Set(SetShape {
                member: self.take_sole_member(id, "set")?,
                list_form: ListFormCache::default(),
            })),
            ShapeType::Map => {
                let (key, value) = self.take_map_members(id)?;
                Ok(ShapeKind::Map(MapShape { key, value }))
            }
            ShapeType::Structure => Ok(ShapeKind::Structure(StructureShape {
                members: std::mem::take(&mut self.members),
            })),
            ShapeType::Union => Ok(ShapeKind::Union(UnionShape {
                members: std::mem::take(&mut self.members),
            })),
            ShapeType::Enum => Ok(ShapeKind::Enum(EnumShape {
                members: std::mem::take(&mut self.members),
            })),
            ShapeType::Service => {
                self.forbid_members(id)?;
                Ok(ShapeKind::Service(ServiceShape {
                    version: self.version.take().unwrap_or_default(),
                    operations: std::mem::take(&mut self.operations),
                    resources: std::mem::take(&mut self.resources),
                    errors: std::mem::take(&mut self.errors),
                    bound_shapes: std::mem::take(&mut self.bound_shapes),
                    rename: std::mem::take(&mut self.rename),
                }))
            }
            ShapeType::Resource => {
                self.forbid_members(id)?;
                Ok(ShapeKind::Resource(ResourceShape {
                    identifiers: std::mem::take(&mut self.identifiers),
                    operations: std::mem::take(&mut self.operations),
                    resources: std::mem::take(&mut self.resources),
                }))
            }
            ShapeType::Operation => {
                self.forbid_members(id)?;
                Ok(ShapeKind::Operation(OperationShape {
                    input: self.input.take().unwrap_or_else(|| prelude::unit().clone()),
                    output: self.output.take().unwrap_or_else(|| prelude::unit().clone()),
                    errors: std::mem::take(&mut self.errors),
                }))
            }
            ShapeType::Member => {
                let Some(target) = self.target.take() else {
                    return Err(self.error(format!("member `{id}` has no target")));
                };
                Ok(ShapeKind::Member(MemberShape { target }))
            }
            // Every remaining kind is a simple shape.
            simple_type => {
                self.forbid_members(id)?;
                Ok(ShapeKind::Simple(simple_type_of(simple_type)))
            }
        }
    }

    fn take_sole_member(
        &mut self,
        id: &ShapeId,
        kind: &str,
    ) -> Result<Box<Shape>, StructuralError> {
        if self.members.len() != 1 || !self.members.contains_key("member") {
            return Err(self.error(format!(
                "a {kind} shape requires exactly one member named `member`, `{id}` has {}",
                self.members.len()
            )));
        }
        let (_, member) = self.members.pop().expect("length checked above");
        Ok(Box::new(member))
    }

    fn take_map_members(
        &mut self,
        id: &ShapeId,
    ) -> Result<(Box<Shape>, Box<Shape>), StructuralError> {
        if self.members.len() != 2
            || !self.members.contains_key("key")
            || !self.members.contains_key("value")
        {
            return Err(self.error(format!(
                "a map shape requires exactly `key` and `value` members, `{id}` has [{}]",
                self.members.keys().cloned().collect::<Vec<_>>().join(", ")
            )));
        }
        let value = self.members.shift_remove("value").expect("checked above");
        let key = self.members.shift_remove("key").expect("checked above");
        Ok((Box::new(key), Box::new(value)))
    }

    fn forbid_members(&mut self, id: &ShapeId) -> Result<(), StructuralError> {
        if self.members.is_empty() {
            Ok(())
        } else {
            Err(self.error(format!(
                "a {} shape may not have members, `{id}` has {}",
                self.shape_type,
                self.members.len()
            )))
        }
    }

    /// Validate an enum member, synthesizing its value trait when absent.
    fn check_enum_member(&mut self, mut member: Shape) -> Option<Shape> {
        let target = member.target().expect("enum members are member shapes");
        if target != prelude::unit() {
            self.stage(format!(
                "enum member `{}` must target `{}`, but targets `{target}`",
                member.id(),
                prelude::unit()
            ));
            return None;
        }
        match member.get_trait(prelude::enum_value()) {
            None => {
                let name = member
                    .id()
                    .member()
                    .expect("checked by add_member")
                    .to_string();
                let id = prelude::enum_value().clone();
                member.traits.insert(id.clone(), Trait::new(id, Node::String(name)));
            }
            Some(value_trait) => {
                if value_trait.value().as_str().is_none() {
                    self.stage(format!(
                        "enum member `{}` has an `{}` trait without a string value",
                        member.id(),
                        prelude::enum_value()
                    ));
                    return None;
                }
            }
        }
        Some(member)
    }

    /// Ids of the declared mixins, in declaration order.
    pub(crate) fn mixin_ids(&self) -> &[ShapeId] {
        &self.mixins
    }

    /// Merge a resolved mixin into this builder: traits not already present
    /// locally first, then members not declared locally or already taken
    /// from an earlier mixin, preserving the mixin's internal member order
    /// and re-parenting member ids. Mixins merge in declaration order;
    /// inherited members end up ahead of locally declared ones when the
    /// builder freezes.
    pub(crate) fn merge_mixin(&mut self, mixin: &Shape) {
        for (trait_id, value) in mixin.traits() {
            // The synthetic enum trait is re-derived at freeze time.
            if trait_id == prelude::enum_trait() {
                continue;
            }
            if !self.traits.contains_key(trait_id) {
                self.traits.insert(trait_id.clone(), value.clone());
            }
        }

        let Some(id) = self.id.clone() else {
            return;
        };
        for member in mixin.members() {
            let name = member
                .member_name()
                .expect("built members carry member ids")
                .to_string();
            if self.members.contains_key(&name) || self.inherited.contains_key(&name) {
                continue;
            }
            let mut inherited = member.clone();
            inherited.id = id
                .with_member(&name)
                .expect("member names are valid tokens");
            if self.shape_type == ShapeType::Enum {
                if let Some(inherited) = self.check_enum_member(inherited) {
                    self.inherited.insert(name, inherited);
                }
            } else {
                self.inherited.insert(name, inherited);
            }
        }
    }

    fn stage(&mut self, message: String) {
        self.staged_errors.push(message);
    }

    fn error(&self, message: impl Into<String>) -> StructuralError {
        StructuralError::new(self.id.clone(), self.source.clone(), message)
    }
}

impl Shape {
    /// Thaw the shape back into a builder.
    ///
    /// Round-trips exactly: `shape.to_builder().build()` equals the
    /// original shape, member order included.
    pub fn to_builder(&self) -> ShapeBuilder {
        let mut builder = ShapeBuilder::new(self.shape_type());
        builder.id = Some(self.id.clone());
        builder.source = self.source.clone();
        builder.mixins = self.mixins.clone();
        // The synthetic enum trait is re-derived from members on build.
        builder.traits = self
            .traits
            .iter()
            .filter(|(id, _)| *id != prelude::enum_trait())
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect();

        match &self.kind {
            ShapeKind::Simple(_) => {}
            ShapeKind::List(list) => {
                builder.members = member_map(&[&list.member]);
            }
            ShapeKind::Set(set) => {
                builder.members = member_map(&[&set.member]);
            }
            ShapeKind::Map(map) => {
                builder.members = member_map(&[&map.key, &map.value]);
            }
            ShapeKind::Structure(payload) => builder.members = payload.members.clone(),
            ShapeKind::Union(payload) => builder.members = payload.members.clone(),
            ShapeKind::Enum(payload) => builder.members = payload.members.clone(),
            ShapeKind::Service(service) => {
                builder.version = Some(service.version.clone());
                builder.operations = service.operations.clone();
                builder.resources = service.resources.clone();
                builder.errors = service.errors.clone();
                builder.bound_shapes = service.bound_shapes.clone();
                builder.rename = service.rename.clone();
            }
            ShapeKind::Resource(resource) => {
                builder.identifiers = resource.identifiers.clone();
                builder.operations = resource.operations.clone();
                builder.resources = resource.resources.clone();
            }
            ShapeKind::Operation(operation) => {
                builder.input = Some(operation.input.clone());
                builder.output = Some(operation.output.clone());
                builder.errors = operation.errors.clone();
            }
            ShapeKind::Member(member) => builder.target = Some(member.target.clone()),
        }
        builder
    }
}

fn member_map(members: &[&Shape]) -> MemberMap {
    members
        .iter()
        .map(|member| {
            let name = member
                .id()
                .member()
                .expect("built members carry member ids")
                .to_string();
            (name, (*member).clone())
        })
        .collect()
}

/// Derive the synthetic enum trait from the current ordered member list.
/// Returns `None` when the member list is empty.
fn synthesize_enum_trait(members: &MemberMap) -> Option<Trait> {
    if members.is_empty() {
        return None;
    }
    let entries: Vec<Node> = members
        .iter()
        .map(|(name, member)| {
            let value = member
                .get_trait(prelude::enum_value())
                .and_then(|value_trait| value_trait.value().as_str())
                .expect("enum members carry resolved string value traits")
                .to_string();
            let mut entry = IndexMap::new();
            entry.insert("name".to_string(), Node::String(name.clone()));
            entry.insert("value".to_string(), Node::String(value));
            Node::Object(entry)
        })
        .collect();
    Some(Trait::new(prelude::enum_trait().clone(), Node::Array(entries)))
}

fn simple_type_of(shape_type: ShapeType) -> SimpleType {
    match shape_type {
        ShapeType::Boolean => SimpleType::Boolean,
        ShapeType::Byte => SimpleType::Byte,
        ShapeType::Short => SimpleType::Short,
        ShapeType::Integer => SimpleType::Integer,
        ShapeType::Long => SimpleType::Long,
        ShapeType::Float => SimpleType::Float,
        ShapeType::Double => SimpleType::Double,
        ShapeType::BigInteger => SimpleType::BigInteger,
        ShapeType::BigDecimal => SimpleType::BigDecimal,
        ShapeType::Blob => SimpleType::Blob,
        ShapeType::String => SimpleType::String,
        ShapeType::Timestamp => SimpleType::Timestamp,
        ShapeType::Document => SimpleType::Document,
        other => unreachable!("`{other}` is not a simple shape type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    #[test]
    fn test_build_requires_id() {
        let err = ShapeBuilder::string().build().unwrap_err();
        assert!(err.to_string().contains("missing an id"));
    }

    #[test]
    fn test_rejects_member_segment_on_non_member_shape() {
        let err = ShapeBuilder::service()
            .id(id("ns.foo#Bar$baz"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("member segment"));
    }

    #[test]
    fn test_id_propagates_to_members() {
        let set = ShapeBuilder::set()
            .id(id("ns.foo#bar"))
            .member("member", id("ns.foo#bam"))
            .id(id("ns.bar#bar"))
            .build()
            .unwrap();
        let member = set.members().next().unwrap();
        assert_eq!(member.id(), &id("ns.bar#bar$member"));
        assert_eq!(member.target(), Some(&id("ns.foo#bam")));
    }

    #[test]
    fn test_set_carries_implicit_unique_items() {
        let set = ShapeBuilder::set()
            .id(id("ns.foo#Tags"))
            .member("member", id("ns.foo#Tag"))
            .build()
            .unwrap();
        assert!(set.has_trait(prelude::unique_items()));
    }

    #[test]
    fn test_set_list_form_is_memoized() {
        let set = ShapeBuilder::set()
            .id(id("ns.foo#Tags"))
            .member("member", id("ns.foo#Tag"))
            .build()
            .unwrap();
        let first = set.as_list().unwrap();
        let second = set.as_list().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.shape_type(), ShapeType::List);
        assert!(first.has_trait(prelude::unique_items()));
    }

    #[test]
    fn test_list_requires_sole_member() {
        let err = ShapeBuilder::list().id(id("ns.foo#L")).build().unwrap_err();
        assert!(err.to_string().contains("exactly one member"));
    }

    #[test]
    fn test_map_requires_key_and_value() {
        let err = ShapeBuilder::map()
            .id(id("ns.foo#M"))
            .member("key", id("ns.foo#K"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("`key` and `value`"));
    }

    #[test]
    fn test_simple_shape_rejects_members() {
        let err = ShapeBuilder::string()
            .id(id("ns.foo#S"))
            .member("member", id("ns.foo#T"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("may not have members"));
    }

    #[test]
    fn test_enum_member_must_target_unit() {
        let err = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .member("SPADE", id("ns.foo#NotUnit"))
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ns.foo#Suit$SPADE"), "{message}");
        assert!(message.contains("ns.foo#NotUnit"), "{message}");
    }

    #[test]
    fn test_enum_member_synthesizes_value_trait() {
        let suit = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .member("SPADE", prelude::unit().clone())
            .build()
            .unwrap();
        let member = suit.member("SPADE").unwrap();
        let value = member.get_trait(prelude::enum_value()).unwrap();
        assert_eq!(value.value().as_str(), Some("SPADE"));
    }

    #[test]
    fn test_enum_member_rejects_non_string_value_trait() {
        let member = Shape {
            id: id("ns.foo#Suit$SPADE"),
            traits: TraitMap::from_iter([(
                prelude::enum_value().clone(),
                Trait::new(prelude::enum_value().clone(), Node::Number(1.0)),
            )]),
            source: SourceLocation::none(),
            mixins: Vec::new(),
            kind: ShapeKind::Member(MemberShape {
                target: prelude::unit().clone(),
            }),
        };
        let err = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .add_member(member)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("without a string value"));
    }

    #[test]
    fn test_enum_trait_synthesized_and_updated_by_member_removal() {
        let builder = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .member("SPADE", prelude::unit().clone())
            .member("HEART", prelude::unit().clone());

        let full = builder.clone().build().unwrap();
        let entries = full
            .get_trait(prelude::enum_trait())
            .unwrap()
            .value()
            .as_array()
            .unwrap()
            .len();
        assert_eq!(entries, 2);

        let trimmed = builder.clone().remove_member("HEART").build().unwrap();
        let entries = trimmed
            .get_trait(prelude::enum_trait())
            .unwrap()
            .value()
            .as_array()
            .unwrap()
            .len();
        assert_eq!(entries, 1);

        let empty = builder
            .remove_member("SPADE")
            .remove_member("HEART")
            .build()
            .unwrap();
        assert!(empty.get_trait(prelude::enum_trait()).is_none());
    }

    #[test]
    fn test_reserved_enum_trait_cannot_be_applied_or_removed() {
        let applied = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .add_trait(Trait::annotation(prelude::enum_trait().clone()))
            .build();
        assert!(applied.unwrap_err().to_string().contains("directly"));

        let removed = ShapeBuilder::enum_shape()
            .id(id("ns.foo#Suit"))
            .remove_trait(prelude::enum_trait())
            .build();
        assert!(removed.unwrap_err().to_string().contains("directly"));
    }

    #[test]
    fn test_member_requires_target() {
        let err = ShapeBuilder::member_shape()
            .id(id("ns.foo#Bar$baz"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no target"));
    }

    #[test]
    fn test_box_trait_synchronized_at_freeze() {
        let boxed = ShapeBuilder::integer()
            .id(id("ns.foo#Count"))
            .add_trait(Trait::annotation(prelude::box_trait().clone()))
            .build()
            .unwrap();
        assert!(boxed.has_trait(prelude::box_v1()));
    }

    #[test]
    fn test_service_version_defaults_to_empty() {
        let service = ShapeBuilder::service().id(id("ns.foo#Svc")).build().unwrap();
        assert_eq!(service.as_service().unwrap().version(), "");
    }

    #[test]
    fn test_service_contextual_name_honors_rename() {
        let renamed = id("ns.foo#Name");
        let service = ShapeBuilder::service()
            .id(id("ns.foo#Svc"))
            .version("1")
            .put_rename(renamed.clone(), "FooName")
            .build()
            .unwrap();
        let payload = service.as_service().unwrap();
        assert_eq!(payload.contextual_name(&renamed), "FooName");
        assert_eq!(payload.contextual_name(&id("ns.foo#Other")), "Other");
    }

    #[test]
    fn test_operation_defaults_to_unit_io() {
        let operation = ShapeBuilder::operation()
            .id(id("ns.foo#Ping"))
            .build()
            .unwrap();
        let ShapeKind::Operation(payload) = operation.kind() else {
            panic!("expected operation payload");
        };
        assert_eq!(payload.input(), prelude::unit());
        assert_eq!(payload.output(), prelude::unit());
    }
}
