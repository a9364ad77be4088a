//! Round-trip tests for the shape builder API.
//!
//! Thawing any built shape with `to_builder` and freezing it again must
//! reproduce the original shape exactly, member order included.

use seam_model::{Node, ShapeBuilder, ShapeId, SimpleType, Trait, prelude};

fn id(text: &str) -> ShapeId {
    text.parse().unwrap()
}

#[test]
fn test_simple_shapes_round_trip() {
    for (index, simple) in [
        SimpleType::Boolean,
        SimpleType::Integer,
        SimpleType::Blob,
        SimpleType::String,
        SimpleType::Timestamp,
        SimpleType::Document,
    ]
    .into_iter()
    .enumerate()
    {
        let shape = ShapeBuilder::simple(simple)
            .id(id(&format!("ns.foo#Shape{index}")))
            .build()
            .unwrap();
        assert_eq!(shape.to_builder().build().unwrap(), shape);
    }
}

#[test]
fn test_list_and_set_round_trip() {
    let list = ShapeBuilder::list()
        .id(id("ns.foo#Names"))
        .member("member", id("ns.foo#Name"))
        .add_trait(Trait::annotation(prelude::sparse().clone()))
        .build()
        .unwrap();
    assert_eq!(list.to_builder().build().unwrap(), list);

    let set = ShapeBuilder::set()
        .id(id("ns.foo#Tags"))
        .member("member", id("ns.foo#Tag"))
        .build()
        .unwrap();
    let rebuilt = set.to_builder().build().unwrap();
    assert_eq!(rebuilt, set);
    assert!(rebuilt.has_trait(prelude::unique_items()));
}

#[test]
fn test_map_round_trip() {
    let map = ShapeBuilder::map()
        .id(id("ns.foo#Index"))
        .member("key", id("ns.foo#Name"))
        .member("value", id("ns.foo#Count"))
        .build()
        .unwrap();
    assert_eq!(map.to_builder().build().unwrap(), map);
}

#[test]
fn test_structure_round_trip_preserves_member_order() {
    let structure = ShapeBuilder::structure()
        .id(id("ns.foo#User"))
        .member("zeta", id("ns.foo#Name"))
        .member("alpha", id("ns.foo#Name"))
        .member("mid", id("ns.foo#Name"))
        .build()
        .unwrap();
    let rebuilt = structure.to_builder().build().unwrap();

    assert_eq!(rebuilt, structure);
    let names: Vec<_> = rebuilt.members().filter_map(|m| m.member_name()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_union_round_trip() {
    let union = ShapeBuilder::union()
        .id(id("ns.foo#Choice"))
        .member("b", id("ns.foo#Name"))
        .member("a", id("ns.foo#Count"))
        .build()
        .unwrap();
    assert_eq!(union.to_builder().build().unwrap(), union);
}

#[test]
fn test_enum_round_trip_preserves_member_order_and_synthetic_trait() {
    let suit = ShapeBuilder::enum_shape()
        .id(id("ns.foo#Suit"))
        .member("DIAMOND", prelude::unit().clone())
        .member("CLUB", prelude::unit().clone())
        .build()
        .unwrap();
    let rebuilt = suit.to_builder().build().unwrap();

    assert_eq!(rebuilt, suit);
    assert_eq!(
        rebuilt.get_trait(prelude::enum_trait()),
        suit.get_trait(prelude::enum_trait())
    );
    let names: Vec<_> = rebuilt.members().filter_map(|m| m.member_name()).collect();
    assert_eq!(names, ["DIAMOND", "CLUB"]);
}

#[test]
fn test_service_round_trip() {
    let service = ShapeBuilder::service()
        .id(id("ns.foo#Weather"))
        .version("2026-08-29")
        .add_operation(id("ns.foo#GetForecast"))
        .add_error(id("ns.foo#Throttled"))
        .add_bound_shape(id("ns.foo#Aux"))
        .put_rename(id("ns.foo#Name"), "WeatherName")
        .build()
        .unwrap();
    assert_eq!(service.to_builder().build().unwrap(), service);
}

#[test]
fn test_resource_and_operation_round_trip() {
    let resource = ShapeBuilder::resource()
        .id(id("ns.foo#City"))
        .identifier("cityId", id("ns.foo#CityId"))
        .add_operation(id("ns.foo#GetCity"))
        .build()
        .unwrap();
    assert_eq!(resource.to_builder().build().unwrap(), resource);

    let operation = ShapeBuilder::operation()
        .id(id("ns.foo#GetCity"))
        .input(id("ns.foo#GetCityInput"))
        .output(id("ns.foo#GetCityOutput"))
        .add_error(id("ns.foo#NoSuchCity"))
        .build()
        .unwrap();
    assert_eq!(operation.to_builder().build().unwrap(), operation);
}

#[test]
fn test_member_round_trip() {
    let member = ShapeBuilder::member_shape()
        .id(id("ns.foo#User$name"))
        .target(id("ns.foo#Name"))
        .add_trait(Trait::new(prelude::required().clone(), Node::Bool(true)))
        .build()
        .unwrap();
    assert_eq!(member.to_builder().build().unwrap(), member);
}
