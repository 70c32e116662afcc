// tests/pipeline_graph.rs

mod common;
use crate::common::{AssetBuilder, PipelineBuilder};

use assetdag::pipeline::{AssetType, Pipeline};

fn names(assets: Vec<&assetdag::pipeline::Asset>) -> Vec<&str> {
    assets.into_iter().map(|a| a.name.as_str()).collect()
}

/// raw -> (clean_a, clean_b) -> mart
fn diamond() -> Pipeline {
    PipelineBuilder::new("diamond")
        .with_asset(AssetBuilder::empty("raw").build())
        .with_asset(AssetBuilder::empty("clean_a").depends("raw").build())
        .with_asset(AssetBuilder::empty("clean_b").depends("raw").build())
        .with_asset(
            AssetBuilder::empty("mart")
                .depends("clean_a")
                .depends("clean_b")
                .build(),
        )
        .build()
}

#[test]
fn direct_neighbours_follow_definition_order() {
    let p = diamond();

    assert_eq!(names(p.upstreams_of("mart")), vec!["clean_a", "clean_b"]);
    assert_eq!(names(p.downstreams_of("raw")), vec!["clean_a", "clean_b"]);
    assert!(p.upstreams_of("raw").is_empty());
    assert!(p.downstreams_of("mart").is_empty());
}

#[test]
fn transitive_closures_exclude_the_asset_itself() {
    let p = diamond();

    assert_eq!(names(p.ancestors_of("mart")), vec!["raw", "clean_a", "clean_b"]);
    assert_eq!(
        names(p.descendants_of("raw")),
        vec!["clean_a", "clean_b", "mart"]
    );
    assert_eq!(names(p.ancestors_of("clean_b")), vec!["raw"]);
}

#[test]
fn unknown_names_yield_nothing() {
    let p = diamond();

    assert!(!p.contains("nope"));
    assert!(p.asset("nope").is_none());
    assert!(p.upstreams_of("nope").is_empty());
    assert!(p.descendants_of("nope").is_empty());
}

#[test]
fn dangling_upstreams_are_kept_on_the_asset_but_not_in_the_graph() {
    let p = PipelineBuilder::new("dangling")
        .with_asset(AssetBuilder::empty("a").depends("ghost").build())
        .build();

    assert_eq!(p.asset("a").unwrap().upstreams, vec!["ghost".to_string()]);
    assert!(p.upstreams_of("a").is_empty());
    assert!(p.name_graph().find_cycles().is_empty());
}

#[test]
fn duplicated_names_resolve_to_first_occurrence() {
    let p = PipelineBuilder::new("dupes")
        .with_asset(AssetBuilder::new("x", "python").build())
        .with_asset(AssetBuilder::new("x", "shell").build())
        .with_asset(AssetBuilder::empty("y").depends("x").build())
        .build();

    assert_eq!(p.asset_index("x"), Some(0));
    assert_eq!(p.asset("x").unwrap().kind(), Some(AssetType::Python));
    assert_eq!(p.graph().upstream_indices(2), vec![0]);
}

#[test]
fn assets_by_tag_counts_repeated_tags_once() {
    let p = common::tagged_pipeline();

    assert_eq!(
        names(p.assets_by_tag("tag2")),
        vec!["asset1", "asset3", "asset5"]
    );
    assert_eq!(names(p.assets_by_tag("tag3")), vec!["asset4"]);
    assert!(p.assets_by_tag("missing").is_empty());
}

#[test]
fn self_dependency_is_a_one_node_cycle() {
    let p = PipelineBuilder::new("selfish")
        .with_asset(AssetBuilder::empty("a").build())
        .with_asset(AssetBuilder::empty("b").depends("b").build())
        .build();

    assert_eq!(p.name_graph().find_cycles(), vec![vec![1]]);
}

#[test]
fn name_graph_merges_duplicated_names_into_one_node() {
    let p = PipelineBuilder::new("dupes")
        .with_asset(AssetBuilder::empty("x").build())
        .with_asset(AssetBuilder::empty("y").depends("x").build())
        .with_asset(AssetBuilder::empty("x").depends("y").build())
        .build();

    let graph = p.name_graph();
    assert_eq!(graph.names(), ["x".to_string(), "y".to_string()]);
    assert_eq!(graph.find_cycles(), vec![vec![0, 1]]);
    // The scheduler's graph only sees the first `x`.
    assert_eq!(p.graph().upstream_indices(0), Vec::<usize>::new());
}

#[test]
fn cycles_are_reported_once_per_member_set() {
    // a -> b -> c -> a, plus d hanging off the cycle
    let p = PipelineBuilder::new("loop")
        .with_asset(AssetBuilder::empty("a").depends("c").build())
        .with_asset(AssetBuilder::empty("b").depends("a").build())
        .with_asset(AssetBuilder::empty("c").depends("b").build())
        .with_asset(AssetBuilder::empty("d").depends("a").build())
        .build();

    let cycles = p.name_graph().find_cycles();
    assert_eq!(cycles.len(), 1);

    let mut members = cycles[0].clone();
    members.sort_unstable();
    assert_eq!(members, vec![0, 1, 2]);
}

#[test]
fn ancestors_in_a_cycle_terminate() {
    let p = PipelineBuilder::new("loop")
        .with_asset(AssetBuilder::empty("a").depends("b").build())
        .with_asset(AssetBuilder::empty("b").depends("a").build())
        .build();

    assert_eq!(names(p.ancestors_of("a")), vec!["b"]);
    assert_eq!(names(p.descendants_of("a")), vec!["b"]);
}

#[test]
fn asset_type_round_trips_through_its_wire_name() {
    for kind in AssetType::ALL {
        assert_eq!(kind.as_str().parse::<AssetType>(), Ok(kind));
    }
    assert!("bq.sqlx".parse::<AssetType>().is_err());
    assert!(!AssetType::Empty.requires_executable());
    assert!(!AssetType::Ingestr.requires_executable());
    assert!(AssetType::AthenaSql.requires_executable());
}
