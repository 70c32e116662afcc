#![allow(dead_code)]

pub use assetdag_test_utils::builders::{AssetBuilder, PipelineBuilder};
pub use assetdag_test_utils::init_tracing;

use assetdag::pipeline::Pipeline;

/// Five assets, three of which carry `tag2` (asset5 lists it twice).
pub fn tagged_pipeline() -> Pipeline {
    PipelineBuilder::new("tagged")
        .with_asset(AssetBuilder::empty("asset1").tag("tag1").tag("tag2").build())
        .with_asset(AssetBuilder::empty("asset2").tag("tag1").build())
        .with_asset(AssetBuilder::empty("asset3").tag("tag2").build())
        .with_asset(AssetBuilder::empty("asset4").tag("tag3").build())
        .with_asset(AssetBuilder::empty("asset5").tag("tag2").tag("tag2").build())
        .build()
}

/// a -> b -> c, plus an independent d.
pub fn chain_with_sibling() -> Pipeline {
    PipelineBuilder::new("chain")
        .with_asset(AssetBuilder::empty("a").build())
        .with_asset(AssetBuilder::empty("b").depends("a").build())
        .with_asset(AssetBuilder::empty("c").depends("b").build())
        .with_asset(AssetBuilder::empty("d").build())
        .build()
}
