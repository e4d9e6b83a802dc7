pub mod assemble;
pub mod geometry;
pub mod material;
pub mod tables;
pub mod validate;

pub use assemble::{CodeFragment, assemble};
pub use geometry::{GeometryParams, ResolvedGeometry, params_for, resolve};
pub use material::{
    AnimationExpr, AnimationStep, Axis, Clock, EffectTag, MaterialExpr, PropertyValue, basic,
    synthesize, synthesize_named,
};
pub use tables::{
    ColorKey, ColorLiteral, DescriptorTables, GeometryKind, MaterialKind, RENDERER_NAMESPACE,
    ShapeKey, UnknownKey,
};
pub use validate::{SnippetValidator, StructuralElement};
