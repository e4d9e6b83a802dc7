//! Structural smoke test for snippets.
//!
//! The check is purely textual: it does not parse or execute JavaScript, so
//! a snippet that passes may still be broken, and an equivalent snippet that
//! orders its tokens differently may be rejected.

use std::fmt;

use regex::Regex;

/// The six elements every snippet must contain, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralElement {
    Geometry,
    Material,
    Mesh,
    CastShadow,
    ReceiveShadow,
    AnimateHook,
}

impl StructuralElement {
    pub const ALL: [StructuralElement; 6] = [
        StructuralElement::Geometry,
        StructuralElement::Material,
        StructuralElement::Mesh,
        StructuralElement::CastShadow,
        StructuralElement::ReceiveShadow,
        StructuralElement::AnimateHook,
    ];

    fn pattern(self) -> &'static str {
        match self {
            StructuralElement::Geometry => r"const\s+geometry\s*=\s*new\s+THREE\.",
            StructuralElement::Material => r"const\s+material\s*=\s*new\s+THREE\.",
            StructuralElement::Mesh => r"const\s+object\s*=\s*new\s+THREE\.Mesh",
            StructuralElement::CastShadow => r"object\.castShadow\s*=\s*true",
            StructuralElement::ReceiveShadow => r"object\.receiveShadow\s*=\s*true",
            StructuralElement::AnimateHook => r"object\.userData\.animate\s*=",
        }
    }
}

impl fmt::Display for StructuralElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructuralElement::Geometry => "geometry statement",
            StructuralElement::Material => "material statement",
            StructuralElement::Mesh => "mesh construction bound to `object`",
            StructuralElement::CastShadow => "castShadow assignment",
            StructuralElement::ReceiveShadow => "receiveShadow assignment",
            StructuralElement::AnimateHook => "userData.animate hook",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct SnippetValidator {
    rules: Vec<(StructuralElement, Regex)>,
}

impl SnippetValidator {
    pub fn new() -> Self {
        let rules = StructuralElement::ALL
            .into_iter()
            .map(|element| {
                let regex = Regex::new(element.pattern()).expect("valid structural pattern");
                (element, regex)
            })
            .collect();
        Self { rules }
    }

    /// First element the snippet lacks. Checking stops there.
    pub fn first_missing(&self, fragment: &str) -> Option<StructuralElement> {
        self.rules
            .iter()
            .find(|(_, regex)| !regex.is_match(fragment))
            .map(|(element, _)| *element)
    }

    pub fn validate(&self, fragment: &str) -> bool {
        self.first_missing(fragment).is_none()
    }
}

impl Default for SnippetValidator {
    fn default() -> Self {
        Self::new()
    }
}
