use std::fmt;
use std::str::FromStr;

use crate::tables::{ColorLiteral, MaterialKind, RENDERER_NAMESPACE, ShapeKey, UnknownKey};

/// Material effects with a dedicated synthesis recipe. Anything else is
/// represented as `None` and gets the plain recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectTag {
    Metallic,
    Emissive,
    Floating,
    Pulsing,
    Rainbow,
    Glass,
    Wood,
    Crystal,
    Plasma,
}

impl EffectTag {
    pub const ALL: [EffectTag; 9] = [
        EffectTag::Metallic,
        EffectTag::Emissive,
        EffectTag::Floating,
        EffectTag::Pulsing,
        EffectTag::Rainbow,
        EffectTag::Glass,
        EffectTag::Wood,
        EffectTag::Crystal,
        EffectTag::Plasma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectTag::Metallic => "metallic",
            EffectTag::Emissive => "emissive",
            EffectTag::Floating => "floating",
            EffectTag::Pulsing => "pulsing",
            EffectTag::Rainbow => "rainbow",
            EffectTag::Glass => "glass",
            EffectTag::Wood => "wood",
            EffectTag::Crystal => "crystal",
            EffectTag::Plasma => "plasma",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|effect| effect.name() == name)
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectTag {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownKey::new("effect", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Color(ColorLiteral),
    Scalar(f64),
    Flag(bool),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Color(color) => write!(f, "{color}"),
            // Material scalars always carry a decimal point (`0.0`, `1.0`).
            PropertyValue::Scalar(value) => write!(f, "{value:?}"),
            PropertyValue::Flag(value) => write!(f, "{value}"),
        }
    }
}

/// Material constructor call with an ordered property object.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialExpr {
    kind: MaterialKind,
    properties: Vec<(&'static str, PropertyValue)>,
}

impl MaterialExpr {
    pub fn new(kind: MaterialKind, color: ColorLiteral) -> Self {
        Self {
            kind,
            properties: vec![("color", PropertyValue::Color(color))],
        }
    }

    pub fn scalar(mut self, name: &'static str, value: f64) -> Self {
        self.properties.push((name, PropertyValue::Scalar(value)));
        self
    }

    pub fn color(mut self, name: &'static str, value: ColorLiteral) -> Self {
        self.properties.push((name, PropertyValue::Color(value)));
        self
    }

    pub fn flag(mut self, name: &'static str, value: bool) -> Self {
        self.properties.push((name, PropertyValue::Flag(value)));
        self
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        self.properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn scalar_value(&self, name: &str) -> Option<f64> {
        match self.property(name)? {
            PropertyValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for MaterialExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {RENDERER_NAMESPACE}.{}({{ ", self.kind.identifier())?;
        for (index, (name, value)) in self.properties.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(" })")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Time argument of a sinusoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clock {
    /// `Date.now() * rate`
    WallClock(f64),
    /// `time * rate`; needs a preceding [`AnimationStep::DeclareTime`].
    Time(f64),
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clock::WallClock(rate) => write!(f, "Date.now() * {rate}"),
            Clock::Time(rate) => write!(f, "time * {rate}"),
        }
    }
}

/// One statement of an animation hook body.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationStep {
    Rotate {
        axis: Axis,
        step: f64,
    },
    Bob {
        clock: Clock,
        amplitude: f64,
    },
    Modulate {
        property: &'static str,
        base: f64,
        clock: Clock,
        amplitude: f64,
    },
    ScalePulse {
        clock: Clock,
        amplitude: f64,
    },
    DeclareTime {
        rate: f64,
    },
    /// Cycles the material hue from the declared `time`.
    HueCycle {
        rate: f64,
        saturation: f64,
        lightness: f64,
    },
}

impl fmt::Display for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationStep::Rotate { axis, step } => {
                write!(f, "object.rotation.{} += {step};", axis.name())
            }
            AnimationStep::Bob { clock, amplitude } => {
                write!(f, "object.position.y = Math.sin({clock}) * {amplitude};")
            }
            AnimationStep::Modulate {
                property,
                base,
                clock,
                amplitude,
            } => write!(
                f,
                "object.material.{property} = {base} + Math.sin({clock}) * {amplitude};"
            ),
            AnimationStep::ScalePulse { clock, amplitude } => {
                write!(f, "object.scale.setScalar(1 + Math.sin({clock}) * {amplitude});")
            }
            AnimationStep::DeclareTime { rate } => {
                write!(f, "const time = Date.now() * {rate};")
            }
            AnimationStep::HueCycle {
                rate,
                saturation,
                lightness,
            } => write!(
                f,
                "object.material.color.setHSL((time * {rate}) % 1, {saturation}, {lightness});"
            ),
        }
    }
}

/// Body of the `userData.animate` hook.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationExpr(Vec<AnimationStep>);

impl AnimationExpr {
    pub fn new(steps: Vec<AnimationStep>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[AnimationStep] {
        &self.0
    }

    pub fn rotated_axes(&self) -> Vec<Axis> {
        self.0
            .iter()
            .filter_map(|step| match step {
                AnimationStep::Rotate { axis, .. } => Some(*axis),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for AnimationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

fn rotate(axis: Axis, step: f64) -> AnimationStep {
    AnimationStep::Rotate { axis, step }
}

fn bob(rate: f64, amplitude: f64) -> AnimationStep {
    AnimationStep::Bob {
        clock: Clock::WallClock(rate),
        amplitude,
    }
}

fn plain_material(color: ColorLiteral) -> MaterialExpr {
    MaterialExpr::new(MaterialKind::Standard, color)
        .scalar("metalness", 0.3)
        .scalar("roughness", 0.4)
}

fn dual_axis_rotation() -> Vec<AnimationStep> {
    vec![rotate(Axis::X, 0.01), rotate(Axis::Y, 0.01)]
}

/// Material and animation for an effect. `None` selects the plain recipe.
pub fn synthesize(color: ColorLiteral, effect: Option<EffectTag>) -> (MaterialExpr, AnimationExpr) {
    let standard = || MaterialExpr::new(MaterialKind::Standard, color);
    let physical = || MaterialExpr::new(MaterialKind::Physical, color);

    let (material, steps) = match effect {
        Some(EffectTag::Metallic) => (
            standard().scalar("metalness", 0.9).scalar("roughness", 0.1),
            vec![
                rotate(Axis::Y, 0.02),
                AnimationStep::Modulate {
                    property: "metalness",
                    base: 0.9,
                    clock: Clock::WallClock(0.002),
                    amplitude: 0.1,
                },
            ],
        ),
        Some(EffectTag::Emissive) => (
            standard()
                .color("emissive", color)
                .scalar("emissiveIntensity", 0.3),
            vec![
                rotate(Axis::X, 0.01),
                rotate(Axis::Y, 0.01),
                AnimationStep::Modulate {
                    property: "emissiveIntensity",
                    base: 0.3,
                    clock: Clock::WallClock(0.003),
                    amplitude: 0.2,
                },
            ],
        ),
        Some(EffectTag::Floating) => (
            standard().scalar("metalness", 0.2).scalar("roughness", 0.8),
            vec![rotate(Axis::Y, 0.01), bob(0.001, 1.5)],
        ),
        Some(EffectTag::Pulsing) => (
            standard().scalar("metalness", 0.5).scalar("roughness", 0.3),
            vec![
                rotate(Axis::X, 0.005),
                rotate(Axis::Y, 0.01),
                AnimationStep::ScalePulse {
                    clock: Clock::WallClock(0.003),
                    amplitude: 0.3,
                },
            ],
        ),
        Some(EffectTag::Rainbow) => (
            standard().scalar("metalness", 0.3).scalar("roughness", 0.4),
            vec![
                rotate(Axis::Y, 0.02),
                AnimationStep::DeclareTime { rate: 0.001 },
                AnimationStep::HueCycle {
                    rate: 0.2,
                    saturation: 0.8,
                    lightness: 0.5,
                },
            ],
        ),
        Some(EffectTag::Glass) => (
            physical()
                .scalar("transmission", 0.9)
                .scalar("opacity", 0.1)
                .flag("transparent", true)
                .scalar("roughness", 0.0)
                .scalar("metalness", 0.0),
            vec![rotate(Axis::X, 0.005), rotate(Axis::Y, 0.01), bob(0.001, 0.2)],
        ),
        Some(EffectTag::Wood) => (
            standard().scalar("metalness", 0.0).scalar("roughness", 0.9),
            vec![rotate(Axis::Y, 0.01)],
        ),
        Some(EffectTag::Crystal) => (
            physical()
                .scalar("transmission", 0.7)
                .scalar("opacity", 0.3)
                .flag("transparent", true)
                .scalar("roughness", 0.0)
                .scalar("metalness", 0.1)
                .scalar("clearcoat", 1.0),
            vec![
                rotate(Axis::X, 0.01),
                rotate(Axis::Y, 0.015),
                rotate(Axis::Z, 0.005),
            ],
        ),
        Some(EffectTag::Plasma) => (
            standard()
                .color("emissive", color)
                .scalar("emissiveIntensity", 0.5),
            vec![
                rotate(Axis::Y, 0.03),
                AnimationStep::DeclareTime { rate: 0.001 },
                AnimationStep::Modulate {
                    property: "emissiveIntensity",
                    base: 0.5,
                    clock: Clock::Time(2.0),
                    amplitude: 0.3,
                },
                AnimationStep::HueCycle {
                    rate: 0.5,
                    saturation: 1.0,
                    lightness: 0.5,
                },
            ],
        ),
        None => (plain_material(color), dual_axis_rotation()),
    };

    (material, AnimationExpr::new(steps))
}

/// Synthesizes from an effect name; unrecognised names get the plain recipe.
pub fn synthesize_named(color: ColorLiteral, effect: &str) -> (MaterialExpr, AnimationExpr) {
    synthesize(color, EffectTag::from_name(effect))
}

/// Plain material with a shape-specific animation, used for the basic
/// shape family.
pub fn basic(shape: ShapeKey, color: ColorLiteral) -> (MaterialExpr, AnimationExpr) {
    let steps = match shape {
        ShapeKey::Sphere => vec![rotate(Axis::Y, 0.02), bob(0.001, 0.3)],
        ShapeKey::Cube => vec![
            rotate(Axis::X, 0.01),
            rotate(Axis::Y, 0.01),
            rotate(Axis::Z, 0.005),
        ],
        ShapeKey::Cylinder => vec![rotate(Axis::Y, 0.02), bob(0.001, 0.2)],
        ShapeKey::Cone => vec![rotate(Axis::Y, 0.015), bob(0.0015, 0.4)],
        ShapeKey::Torus => vec![rotate(Axis::X, 0.01), rotate(Axis::Y, 0.02)],
        _ => dual_axis_rotation(),
    };
    (plain_material(color), AnimationExpr::new(steps))
}

#[cfg(test)]
mod tests {
    use super::{Axis, EffectTag, PropertyValue, basic, synthesize, synthesize_named};
    use crate::tables::{ColorLiteral, MaterialKind, ShapeKey};

    const GOLD: ColorLiteral = ColorLiteral::new(0xffd700);

    #[test]
    fn metallic_is_highly_metallic() {
        let (material, animation) = synthesize(GOLD, Some(EffectTag::Metallic));
        assert!(material.scalar_value("metalness").unwrap_or_default() >= 0.9);
        assert_eq!(
            material.to_string(),
            "new THREE.MeshStandardMaterial({ color: 0xffd700, metalness: 0.9, roughness: 0.1 })"
        );
        assert_eq!(
            animation.to_string(),
            "object.rotation.y += 0.02; object.material.metalness = 0.9 + Math.sin(Date.now() * 0.002) * 0.1;"
        );
    }

    #[test]
    fn glass_is_transmissive_and_transparent() {
        let (material, _) = synthesize(ColorLiteral::new(0x88ccff), Some(EffectTag::Glass));
        assert_eq!(material.kind(), MaterialKind::Physical);
        assert!(material.scalar_value("transmission").is_some());
        assert_eq!(material.property("transparent"), Some(PropertyValue::Flag(true)));
        let rendered = material.to_string();
        assert!(rendered.contains("transmission: 0.9"));
        assert!(rendered.contains("transparent: true"));
        assert!(rendered.contains("roughness: 0.0"));
    }

    #[test]
    fn crystal_has_clearcoat() {
        let (material, animation) = synthesize(ColorLiteral::new(0xffffff), Some(EffectTag::Crystal));
        assert!(material.to_string().contains("clearcoat: 1.0"));
        assert_eq!(animation.rotated_axes(), vec![Axis::X, Axis::Y, Axis::Z]);
    }

    #[test]
    fn glow_effects_set_emissive_color() {
        for effect in [EffectTag::Emissive, EffectTag::Plasma] {
            let (material, animation) = synthesize(GOLD, Some(effect));
            assert_eq!(material.property("emissive"), Some(PropertyValue::Color(GOLD)));
            assert!(material.scalar_value("emissiveIntensity").is_some());
            assert!(animation.to_string().contains("emissiveIntensity"));
        }
    }

    #[test]
    fn plasma_declares_time_before_using_it() {
        let (_, animation) = synthesize(ColorLiteral::new(0xff00ff), Some(EffectTag::Plasma));
        let rendered = animation.to_string();
        let declared = rendered.find("const time").expect("time is declared");
        let used = rendered.find("Math.sin(time * 2)").expect("time is used");
        assert!(declared < used);
        assert!(rendered.ends_with("object.material.color.setHSL((time * 0.5) % 1, 1, 0.5);"));
    }

    #[test]
    fn remaining_effects_carry_their_signature() {
        let cases = [
            (EffectTag::Floating, "object.position.y = Math.sin(Date.now() * 0.001) * 1.5;"),
            (EffectTag::Pulsing, "object.scale.setScalar(1 + Math.sin(Date.now() * 0.003) * 0.3);"),
            (EffectTag::Rainbow, "object.material.color.setHSL((time * 0.2) % 1, 0.8, 0.5);"),
            (EffectTag::Wood, "object.rotation.y += 0.01;"),
        ];
        for (effect, expected) in cases {
            let (_, animation) = synthesize(GOLD, Some(effect));
            assert!(
                animation.to_string().contains(expected),
                "{effect}: {animation}"
            );
        }
        let (wood, _) = synthesize(GOLD, Some(EffectTag::Wood));
        assert_eq!(wood.scalar_value("roughness"), Some(0.9));

        let (floating, _) = synthesize(GOLD, Some(EffectTag::Floating));
        assert_eq!(floating.kind(), MaterialKind::Standard);
        assert_eq!(floating.scalar_value("metalness"), Some(0.2));
        assert_eq!(floating.scalar_value("roughness"), Some(0.8));

        let (pulsing, _) = synthesize(GOLD, Some(EffectTag::Pulsing));
        assert_eq!(pulsing.kind(), MaterialKind::Standard);
        assert_eq!(pulsing.scalar_value("metalness"), Some(0.5));
        assert_eq!(pulsing.scalar_value("roughness"), Some(0.3));
    }

    #[test]
    fn unknown_effect_uses_plain_recipe() {
        let (material, animation) = synthesize_named(GOLD, "sparkly");
        assert_eq!(material.kind(), MaterialKind::Standard);
        assert_eq!(material.scalar_value("metalness"), Some(0.3));
        assert_eq!(material.scalar_value("roughness"), Some(0.4));
        assert_eq!(animation.rotated_axes(), vec![Axis::X, Axis::Y]);
        assert_eq!(
            animation.to_string(),
            "object.rotation.x += 0.01; object.rotation.y += 0.01;"
        );
        assert_eq!((material, animation), synthesize(GOLD, None));
    }

    #[test]
    fn synthesis_is_deterministic() {
        for effect in EffectTag::ALL {
            assert_eq!(synthesize(GOLD, Some(effect)), synthesize(GOLD, Some(effect)));
        }
    }

    #[test]
    fn basic_recipes_follow_the_shape() {
        let (material, sphere) = basic(ShapeKey::Sphere, GOLD);
        assert_eq!(material.scalar_value("metalness"), Some(0.3));
        assert_eq!(
            sphere.to_string(),
            "object.rotation.y += 0.02; object.position.y = Math.sin(Date.now() * 0.001) * 0.3;"
        );

        let (_, cone) = basic(ShapeKey::Cone, GOLD);
        assert!(cone.to_string().contains("Math.sin(Date.now() * 0.0015) * 0.4"));

        let (_, ring) = basic(ShapeKey::Ring, GOLD);
        assert_eq!(ring.rotated_axes(), vec![Axis::X, Axis::Y]);
    }
}
