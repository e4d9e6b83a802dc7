use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::geometry::GeometryParams;

/// Namespace prefix for every renderer constructor emitted in a snippet.
pub const RENDERER_NAMESPACE: &str = "THREE";

/// Shape vocabulary accepted by the synthesizer, in canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKey {
    Sphere,
    Cube,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Ring,
    Dodecahedron,
    Icosahedron,
    Octahedron,
    Tetrahedron,
}

impl ShapeKey {
    pub const ALL: [ShapeKey; 11] = [
        ShapeKey::Sphere,
        ShapeKey::Cube,
        ShapeKey::Cylinder,
        ShapeKey::Cone,
        ShapeKey::Torus,
        ShapeKey::Plane,
        ShapeKey::Ring,
        ShapeKey::Dodecahedron,
        ShapeKey::Icosahedron,
        ShapeKey::Octahedron,
        ShapeKey::Tetrahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKey::Sphere => "sphere",
            ShapeKey::Cube => "cube",
            ShapeKey::Cylinder => "cylinder",
            ShapeKey::Cone => "cone",
            ShapeKey::Torus => "torus",
            ShapeKey::Plane => "plane",
            ShapeKey::Ring => "ring",
            ShapeKey::Dodecahedron => "dodecahedron",
            ShapeKey::Icosahedron => "icosahedron",
            ShapeKey::Octahedron => "octahedron",
            ShapeKey::Tetrahedron => "tetrahedron",
        }
    }

    /// Looks up a shape by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    kind: &'static str,
    name: String,
}

impl UnknownKey {
    pub(crate) fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.name)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for ShapeKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownKey::new("shape", s))
    }
}

/// Renderer geometry constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeometryKind {
    Sphere,
    Box,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Ring,
    Dodecahedron,
    Icosahedron,
    Octahedron,
    Tetrahedron,
}

impl GeometryKind {
    pub fn identifier(self) -> &'static str {
        match self {
            GeometryKind::Sphere => "SphereGeometry",
            GeometryKind::Box => "BoxGeometry",
            GeometryKind::Cylinder => "CylinderGeometry",
            GeometryKind::Cone => "ConeGeometry",
            GeometryKind::Torus => "TorusGeometry",
            GeometryKind::Plane => "PlaneGeometry",
            GeometryKind::Ring => "RingGeometry",
            GeometryKind::Dodecahedron => "DodecahedronGeometry",
            GeometryKind::Icosahedron => "IcosahedronGeometry",
            GeometryKind::Octahedron => "OctahedronGeometry",
            GeometryKind::Tetrahedron => "TetrahedronGeometry",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Named palette entries, in canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorKey {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
    Gold,
    Silver,
}

impl ColorKey {
    pub const ALL: [ColorKey; 10] = [
        ColorKey::Red,
        ColorKey::Green,
        ColorKey::Blue,
        ColorKey::Yellow,
        ColorKey::Purple,
        ColorKey::Orange,
        ColorKey::Pink,
        ColorKey::Cyan,
        ColorKey::Gold,
        ColorKey::Silver,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorKey::Red => "red",
            ColorKey::Green => "green",
            ColorKey::Blue => "blue",
            ColorKey::Yellow => "yellow",
            ColorKey::Purple => "purple",
            ColorKey::Orange => "orange",
            ColorKey::Pink => "pink",
            ColorKey::Cyan => "cyan",
            ColorKey::Gold => "gold",
            ColorKey::Silver => "silver",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.name() == name)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownKey::new("color", s))
    }
}

/// 24-bit RGB color rendered as a `0xrrggbb` integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorLiteral(u32);

impl ColorLiteral {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }
}

impl fmt::Display for ColorLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialKind {
    Standard,
    Physical,
    Basic,
    Lambert,
    Phong,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Standard,
        MaterialKind::Physical,
        MaterialKind::Basic,
        MaterialKind::Lambert,
        MaterialKind::Phong,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            MaterialKind::Standard => "MeshStandardMaterial",
            MaterialKind::Physical => "MeshPhysicalMaterial",
            MaterialKind::Basic => "MeshBasicMaterial",
            MaterialKind::Lambert => "MeshLambertMaterial",
            MaterialKind::Phong => "MeshPhongMaterial",
        }
    }
}

/// Immutable lookup data shared by the resolver, synthesizer and corpus
/// generator. Built once and passed around by reference.
#[derive(Debug, Clone)]
pub struct DescriptorTables {
    geometries: BTreeMap<ShapeKey, GeometryKind>,
    colors: BTreeMap<ColorKey, ColorLiteral>,
    params: BTreeMap<GeometryKind, GeometryParams>,
}

impl DescriptorTables {
    pub fn standard() -> Self {
        let geometries = BTreeMap::from([
            (ShapeKey::Sphere, GeometryKind::Sphere),
            (ShapeKey::Cube, GeometryKind::Box),
            (ShapeKey::Cylinder, GeometryKind::Cylinder),
            (ShapeKey::Cone, GeometryKind::Cone),
            (ShapeKey::Torus, GeometryKind::Torus),
            (ShapeKey::Plane, GeometryKind::Plane),
            (ShapeKey::Ring, GeometryKind::Ring),
            (ShapeKey::Dodecahedron, GeometryKind::Dodecahedron),
            (ShapeKey::Icosahedron, GeometryKind::Icosahedron),
            (ShapeKey::Octahedron, GeometryKind::Octahedron),
            (ShapeKey::Tetrahedron, GeometryKind::Tetrahedron),
        ]);

        let colors = BTreeMap::from([
            (ColorKey::Red, ColorLiteral::new(0xff0000)),
            (ColorKey::Green, ColorLiteral::new(0x00ff00)),
            (ColorKey::Blue, ColorLiteral::new(0x0000ff)),
            (ColorKey::Yellow, ColorLiteral::new(0xffff00)),
            (ColorKey::Purple, ColorLiteral::new(0x800080)),
            (ColorKey::Orange, ColorLiteral::new(0xffa500)),
            (ColorKey::Pink, ColorLiteral::new(0xffc0cb)),
            (ColorKey::Cyan, ColorLiteral::new(0x00ffff)),
            (ColorKey::Gold, ColorLiteral::new(0xffd700)),
            (ColorKey::Silver, ColorLiteral::new(0xc0c0c0)),
        ]);

        let params = BTreeMap::from([
            (GeometryKind::Sphere, GeometryParams::new([1.5, 32.0, 32.0])),
            (GeometryKind::Box, GeometryParams::new([2.0, 2.0, 2.0])),
            (GeometryKind::Cylinder, GeometryParams::new([1.0, 1.0, 3.0, 32.0])),
            (GeometryKind::Cone, GeometryParams::new([1.5, 3.0, 8.0])),
            (GeometryKind::Torus, GeometryParams::new([1.5, 0.5, 16.0, 100.0])),
            (GeometryKind::Plane, GeometryParams::new([3.0, 3.0])),
            (GeometryKind::Ring, GeometryParams::new([0.5, 1.5, 32.0])),
            (GeometryKind::Dodecahedron, GeometryParams::new([1.5])),
            (GeometryKind::Icosahedron, GeometryParams::new([1.5])),
            (GeometryKind::Octahedron, GeometryParams::new([1.5])),
            (GeometryKind::Tetrahedron, GeometryParams::new([1.5])),
        ]);

        Self {
            geometries,
            colors,
            params,
        }
    }

    pub fn geometry_kind(&self, shape: ShapeKey) -> Option<GeometryKind> {
        self.geometries.get(&shape).copied()
    }

    pub fn color(&self, color: ColorKey) -> Option<ColorLiteral> {
        self.colors.get(&color).copied()
    }

    pub fn geometry_params(&self, kind: GeometryKind) -> Option<&GeometryParams> {
        self.params.get(&kind)
    }

    /// Shapes with a geometry mapping, in canonical order.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeKey> + '_ {
        self.geometries.keys().copied()
    }

    /// Palette entries, in canonical order.
    pub fn colors(&self) -> impl Iterator<Item = (ColorKey, ColorLiteral)> + '_ {
        self.colors.iter().map(|(key, literal)| (*key, *literal))
    }
}

impl Default for DescriptorTables {
    fn default() -> Self {
        Self::standard()
    }
}
