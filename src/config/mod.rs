pub mod color;
pub mod tree_config;

pub use color::{Color, Palette};
pub use tree_config::{
    OrnamentGroupConfig, OrnamentKind, OrnamentMaterial, OrnamentPrimitive, OrnamentsConfig,
    Range, TreeConfig,
};
