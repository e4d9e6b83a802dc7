use std::fmt;

use crate::tables::{DescriptorTables, GeometryKind, ShapeKey};

/// Ordered numeric constructor arguments for a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParams(Vec<f64>);

impl GeometryParams {
    pub fn new(literals: impl IntoIterator<Item = f64>) -> Self {
        Self(literals.into_iter().collect())
    }

    /// Fallback used for anything without a parameter entry.
    pub fn unit() -> Self {
        Self(vec![1.0, 1.0, 1.0])
    }

    pub fn literals(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for GeometryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, literal) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{literal}")?;
        }
        Ok(())
    }
}

/// Geometry selected for a shape name together with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGeometry {
    pub kind: Option<GeometryKind>,
    pub params: GeometryParams,
}

pub fn params_for(tables: &DescriptorTables, kind: GeometryKind) -> GeometryParams {
    tables
        .geometry_params(kind)
        .cloned()
        .unwrap_or_else(GeometryParams::unit)
}

/// Resolves a shape name to its geometry. Total: an unknown name yields no
/// kind and the unit parameters.
pub fn resolve(tables: &DescriptorTables, shape: &str) -> ResolvedGeometry {
    let kind = ShapeKey::from_name(shape).and_then(|shape| tables.geometry_kind(shape));
    let params = match kind {
        Some(kind) => params_for(tables, kind),
        None => GeometryParams::unit(),
    };
    ResolvedGeometry { kind, params }
}

#[cfg(test)]
mod tests {
    use super::{GeometryParams, params_for, resolve};
    use crate::tables::{DescriptorTables, GeometryKind};

    #[test]
    fn sphere_resolves_to_documented_params() {
        let tables = DescriptorTables::standard();
        let resolved = resolve(&tables, "sphere");
        assert_eq!(resolved.kind, Some(GeometryKind::Sphere));
        assert_eq!(resolved.params.to_string(), "1.5, 32, 32");
    }

    #[test]
    fn params_render_without_trailing_zeros() {
        let tables = DescriptorTables::standard();
        assert_eq!(resolve(&tables, "cube").params.to_string(), "2, 2, 2");
        assert_eq!(resolve(&tables, "cylinder").params.to_string(), "1, 1, 3, 32");
        assert_eq!(resolve(&tables, "torus").params.to_string(), "1.5, 0.5, 16, 100");
        assert_eq!(resolve(&tables, "ring").params.to_string(), "0.5, 1.5, 32");
        assert_eq!(resolve(&tables, "octahedron").params.to_string(), "1.5");
    }

    #[test]
    fn unknown_shape_falls_back_to_unit_params() {
        let tables = DescriptorTables::standard();
        let resolved = resolve(&tables, "hexagonal prism");
        assert_eq!(resolved.kind, None);
        assert_eq!(resolved.params, GeometryParams::unit());
        assert_eq!(resolved.params.to_string(), "1, 1, 1");
        assert_eq!(resolve(&tables, "").params.literals().len(), 3);
    }

    #[test]
    fn params_for_every_kind_is_non_empty() {
        let tables = DescriptorTables::standard();
        for shape in tables.shapes() {
            let kind = tables.geometry_kind(shape).expect("shape has geometry");
            assert!(!params_for(&tables, kind).literals().is_empty());
        }
    }
}
