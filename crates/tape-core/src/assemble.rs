use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::GeometryParams;
use crate::material::{AnimationExpr, MaterialExpr};
use crate::tables::{GeometryKind, RENDERER_NAMESPACE};

/// Generated Three.js snippet binding a single mesh to `object`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeFragment(String);

impl CodeFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CodeFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composes the fragments into a snippet. Every output has the mesh
/// bound to `object`, both shadow flags set and one animate hook.
pub fn assemble(
    kind: GeometryKind,
    params: &GeometryParams,
    material: &MaterialExpr,
    animation: &AnimationExpr,
) -> CodeFragment {
    let ns = RENDERER_NAMESPACE;
    CodeFragment(format!(
        "const geometry = new {ns}.{kind}({params});
const material = {material};
const object = new {ns}.Mesh(geometry, material);
object.castShadow = true;
object.receiveShadow = true;
object.userData.animate = () => {{
    {animation}
}};"
    ))
}

#[cfg(test)]
mod tests {
    use super::assemble;
    use crate::geometry::resolve;
    use crate::material::{EffectTag, basic, synthesize};
    use crate::tables::{ColorKey, DescriptorTables, GeometryKind, ShapeKey};

    #[test]
    fn gold_sphere_has_expected_statements() {
        let tables = DescriptorTables::standard();
        let gold = tables.color(ColorKey::Gold).expect("gold is in the palette");
        let resolved = resolve(&tables, "sphere");
        let (material, animation) = basic(ShapeKey::Sphere, gold);
        let code = assemble(GeometryKind::Sphere, &resolved.params, &material, &animation);

        let expected = "const geometry = new THREE.SphereGeometry(1.5, 32, 32);
const material = new THREE.MeshStandardMaterial({ color: 0xffd700, metalness: 0.3, roughness: 0.4 });
const object = new THREE.Mesh(geometry, material);
object.castShadow = true;
object.receiveShadow = true;
object.userData.animate = () => {
    object.rotation.y += 0.02; object.position.y = Math.sin(Date.now() * 0.001) * 0.3;
};";
        assert_eq!(code.as_str(), expected);
    }

    #[test]
    fn advanced_fragment_embeds_material_expression() {
        let tables = DescriptorTables::standard();
        let resolved = resolve(&tables, "octahedron");
        let (material, animation) =
            synthesize(crate::ColorLiteral::new(0xffffff), Some(EffectTag::Crystal));
        let code = assemble(GeometryKind::Octahedron, &resolved.params, &material, &animation);

        assert!(code.as_str().starts_with("const geometry = new THREE.OctahedronGeometry(1.5);"));
        assert!(code.as_str().contains(&format!("const material = {material};")));
        assert!(code.as_str().contains(&animation.to_string()));
    }

    #[test]
    fn fragment_serializes_as_plain_string() {
        let tables = DescriptorTables::standard();
        let resolved = resolve(&tables, "cube");
        let (material, animation) = synthesize(crate::ColorLiteral::new(0x0000ff), None);
        let code = assemble(GeometryKind::Box, &resolved.params, &material, &animation);

        let json = serde_json::to_value(&code).expect("fragment should serialize");
        assert_eq!(json.as_str(), Some(code.as_str()));
    }
}
