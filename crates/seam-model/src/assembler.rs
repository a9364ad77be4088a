//! Model assembly: mixin resolution, closure validation, and freezing a
//! batch of shapes into a [`Model`].
//!
//! Assembly is all-or-nothing: every structural error found in the batch is
//! collected and reported together, and no partially merged model is ever
//! produced.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    algo::{tarjan_scc, toposort},
    graph::{DiGraph, NodeIndex},
};

use crate::{
    Model, Shape, ShapeBuilder, ShapeKind, SourceLocation, StructuralError,
    shapes::shape_id::ShapeId,
    traits::{Trait, prelude},
};

/// Assembles shapes and builders into an immutable, closed [`Model`].
///
/// # Examples
///
/// ```
/// use seam_model::{ModelAssembler, ShapeBuilder, ShapeId};
///
/// let model = ModelAssembler::new()
///     .add_builder(ShapeBuilder::string().id("ns.demo#Name".parse().unwrap()))
///     .assemble()
///     .unwrap();
/// assert!(model.get_shape(&"ns.demo#Name".parse::<ShapeId>().unwrap()).is_some());
/// ```
#[derive(Default)]
pub struct ModelAssembler {
    builders: Vec<ShapeBuilder>,
}

impl ModelAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already built shape to the batch.
    pub fn add_shape(mut self, shape: Shape) -> Self {
        self.builders.push(shape.to_builder());
        self
    }

    /// Add a staged builder to the batch; it is frozen during assembly.
    pub fn add_builder(mut self, builder: ShapeBuilder) -> Self {
        self.builders.push(builder);
        self
    }

    /// Resolve mixins, freeze every builder, validate model closure, and
    /// produce the model.
    ///
    /// # Errors
    ///
    /// Returns every [`StructuralError`] found in the batch: builder rule
    /// violations, duplicate ids, unresolved or cyclic mixins, and dangling
    /// references. A mixin cycle fails the whole assembly and names every
    /// shape id in the cycle.
    pub fn assemble(mut self) -> Result<Model, Vec<StructuralError>> {
        debug!(shape_count = self.builders.len(); "assembling model");
        let mut errors = Vec::new();

        self.inject_unit_shape();

        // Index builders by id; builders without one surface their own
        // build error here.
        let mut staged: IndexMap<ShapeId, ShapeBuilder> = IndexMap::new();
        for builder in self.builders {
            match builder.get_id().cloned() {
                Some(id) => {
                    if staged.contains_key(&id) {
                        errors.push(StructuralError::new(
                            Some(id.clone()),
                            SourceLocation::none(),
                            format!("duplicate shape id `{id}` in model assembly"),
                        ));
                    } else {
                        staged.insert(id, builder);
                    }
                }
                None => match builder.build() {
                    Ok(shape) => unreachable!("`{}` built without an id", shape.id()),
                    Err(err) => errors.push(err),
                },
            }
        }

        let merge_order = match mixin_merge_order(&staged, &mut errors) {
            Some(order) => order,
            // Cyclic mixins: nothing can be merged safely.
            None => return Err(errors),
        };

        let mut built: IndexMap<ShapeId, Shape> = IndexMap::new();
        for id in merge_order {
            let Some(mut builder) = staged.shift_remove(&id) else {
                continue;
            };
            for mixin_id in builder.mixin_ids().to_vec() {
                match built.get(&mixin_id) {
                    Some(mixin) => builder.merge_mixin(mixin),
                    None => errors.push(StructuralError::new(
                        Some(id.clone()),
                        SourceLocation::none(),
                        format!("mixin `{mixin_id}` of `{id}` does not resolve to a shape"),
                    )),
                }
            }
            match builder.build() {
                Ok(shape) => {
                    trace!(id:? = shape.id(); "built shape");
                    built.insert(id, shape);
                }
                Err(err) => errors.push(err),
            }
        }

        let model = flatten(built, &mut errors);
        if errors.is_empty() {
            debug!(shape_count = model.len(); "assembled model");
            Ok(model)
        } else {
            Err(errors)
        }
    }

    /// The distinguished unit shape is part of every model.
    fn inject_unit_shape(&mut self) {
        let unit = prelude::unit();
        let present = self
            .builders
            .iter()
            .any(|builder| builder.get_id() == Some(unit));
        if !present {
            self.builders.push(
                ShapeBuilder::structure()
                    .id(unit.clone())
                    .add_trait(Trait::annotation(prelude::unit_type().clone())),
            );
        }
    }
}

/// Topological merge order over the mixin dependency graph, mixins ahead of
/// the shapes that use them. Returns `None` after recording an error for
/// each mixin cycle.
fn mixin_merge_order(
    staged: &IndexMap<ShapeId, ShapeBuilder>,
    errors: &mut Vec<StructuralError>,
) -> Option<Vec<ShapeId>> {
    let mut graph: DiGraph<ShapeId, ()> = DiGraph::new();
    let mut nodes: IndexMap<&ShapeId, NodeIndex> = IndexMap::new();
    for id in staged.keys() {
        nodes.insert(id, graph.add_node(id.clone()));
    }
    for (id, builder) in staged {
        for mixin_id in builder.mixin_ids() {
            // Unresolved mixins are reported during the merge pass.
            if let (Some(&mixin), Some(&dependent)) = (nodes.get(mixin_id), nodes.get(id)) {
                graph.add_edge(mixin, dependent, ());
            }
        }
    }

    let mut cyclic = false;
    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || (component.len() == 1 && graph.contains_edge(component[0], component[0]));
        if is_cycle {
            cyclic = true;
            let mut ids: Vec<String> = component
                .iter()
                .map(|&node| graph[node].to_string())
                .collect();
            ids.sort();
            errors.push(StructuralError::new(
                Some(graph[component[0]].clone()),
                SourceLocation::none(),
                format!("mixin cycle detected among [{}]", ids.join(", ")),
            ));
        }
    }
    if cyclic {
        return None;
    }

    let order = toposort(&graph, None).expect("cycles rejected above");
    Some(order.into_iter().map(|node| graph[node].clone()).collect())
}

/// Flatten built shapes and their members into the model map and validate
/// closure: member containers and every declared reference must resolve.
fn flatten(built: IndexMap<ShapeId, Shape>, errors: &mut Vec<StructuralError>) -> Model {
    let mut map: BTreeMap<ShapeId, Shape> = BTreeMap::new();
    for (id, shape) in &built {
        for member in shape.members() {
            map.insert(member.id().clone(), member.clone());
        }
        map.insert(id.clone(), shape.clone());
    }

    for shape in built.values() {
        let mut check = |referenced: &ShapeId, relation: &str| {
            if !map.contains_key(referenced) {
                errors.push(StructuralError::new(
                    Some(shape.id().clone()),
                    shape.source().clone(),
                    format!("{relation} `{referenced}` of `{}` does not resolve", shape.id()),
                ));
            }
        };

        for member in shape.members() {
            check(member.target().expect("member shapes carry targets"), "member target");
        }
        match shape.kind() {
            ShapeKind::Member(member) => {
                check(member.target(), "member target");
                check(&shape.id().without_member(), "member container");
            }
            ShapeKind::Service(service) => {
                for id in service.operations() {
                    check(id, "service operation");
                }
                for id in service.resources() {
                    check(id, "service resource");
                }
                for id in service.errors() {
                    check(id, "service error");
                }
                for id in service.bound_shapes() {
                    check(id, "service bound shape");
                }
            }
            ShapeKind::Resource(resource) => {
                for id in resource.operations() {
                    check(id, "resource operation");
                }
                for id in resource.resources() {
                    check(id, "resource binding");
                }
                for id in resource.identifiers().values() {
                    check(id, "resource identifier");
                }
            }
            ShapeKind::Operation(operation) => {
                check(operation.input(), "operation input");
                check(operation.output(), "operation output");
                for id in operation.errors() {
                    check(id, "operation error");
                }
            }
            _ => {}
        }
    }

    Model::from_shapes(map)
}
