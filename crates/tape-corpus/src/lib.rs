use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tape_core::{
    CodeFragment, ColorLiteral, DescriptorTables, EffectTag, GeometryKind, SnippetValidator,
    assemble, basic, params_for, resolve, synthesize,
};

pub const DEFAULT_CORPUS_FILE: &str = "threejs_training_data.json";
pub const DEFAULT_FINE_TUNE_FILE: &str = "threejs_finetune_dataset.jsonl";

pub const FINE_TUNE_SYSTEM_PROMPT: &str = "You are an expert Three.js developer. Generate only clean JavaScript code without any markdown formatting, comments, or explanations.";

pub const PROMPT_TEMPLATES: [&str; 4] = [
    "You are an expert Three.js developer. Generate ONLY JavaScript code to create a 3D {object_type}.",
    "Create a Three.js {object_type} with {color} color and {material_type} material.",
    "Generate Three.js code for a {adjective} {object_type} that {animation_description}.",
    "Build a 3D {object_type} using Three.js with realistic {material_property} and smooth animation.",
];

pub fn prompt_templates() -> &'static [&'static str] {
    &PROMPT_TEMPLATES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BasicShapes,
    AdvancedObjects,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub prompt: String,
    pub code: CodeFragment,
    pub category: Category,
}

/// Hand-picked prompt with the shape, color and effect it should produce.
#[derive(Debug, Clone, Copy)]
pub struct CuratedObject {
    pub prompt: &'static str,
    pub shape: &'static str,
    pub color: ColorLiteral,
    pub effect: EffectTag,
}

const fn curated(
    prompt: &'static str,
    shape: &'static str,
    color: u32,
    effect: EffectTag,
) -> CuratedObject {
    CuratedObject {
        prompt,
        shape,
        color: ColorLiteral::new(color),
        effect,
    }
}

pub const CURATED_OBJECTS: [CuratedObject; 10] = [
    curated("spinning golden sphere", "sphere", 0xffd700, EffectTag::Metallic),
    curated("glowing blue cube", "cube", 0x0000ff, EffectTag::Emissive),
    curated("floating red cylinder", "cylinder", 0xff0000, EffectTag::Floating),
    curated("pulsing green torus", "torus", 0x00ff00, EffectTag::Pulsing),
    curated("rotating rainbow cone", "cone", 0xff0000, EffectTag::Rainbow),
    curated("transparent glass sphere", "sphere", 0x88ccff, EffectTag::Glass),
    curated("metallic silver cube", "cube", 0xc0c0c0, EffectTag::Metallic),
    curated("wooden brown cylinder", "cylinder", 0x8b4513, EffectTag::Wood),
    curated("crystal clear diamond", "octahedron", 0xffffff, EffectTag::Crystal),
    curated("glowing plasma ball", "sphere", 0xff00ff, EffectTag::Plasma),
];

pub struct CorpusGenerator<'a> {
    tables: &'a DescriptorTables,
    curated: &'a [CuratedObject],
}

impl<'a> CorpusGenerator<'a> {
    pub fn new(tables: &'a DescriptorTables) -> Self {
        Self {
            tables,
            curated: &CURATED_OBJECTS,
        }
    }

    pub fn with_curated(mut self, curated: &'a [CuratedObject]) -> Self {
        self.curated = curated;
        self
    }

    /// Every shape/color pair first, then the curated objects in listed
    /// order.
    pub fn generate(&self) -> Vec<Example> {
        let mut examples = self.basic_shapes();
        examples.extend(self.advanced_objects());
        examples
    }

    pub fn basic_shapes(&self) -> Vec<Example> {
        let mut examples = Vec::new();
        for shape in self.tables.shapes() {
            let kind = self
                .tables
                .geometry_kind(shape)
                .unwrap_or(GeometryKind::Box);
            let params = params_for(self.tables, kind);
            for (color_key, color) in self.tables.colors() {
                let (material, animation) = basic(shape, color);
                examples.push(Example {
                    prompt: format!("Create a {color_key} {shape}"),
                    code: assemble(kind, &params, &material, &animation),
                    category: Category::BasicShapes,
                });
            }
        }
        examples
    }

    pub fn advanced_objects(&self) -> Vec<Example> {
        self.curated
            .iter()
            .map(|object| {
                let kind = resolve(self.tables, object.shape)
                    .kind
                    .unwrap_or(GeometryKind::Box);
                let params = params_for(self.tables, kind);
                let (material, animation) = synthesize(object.color, Some(object.effect));
                Example {
                    prompt: object.prompt.to_string(),
                    code: assemble(kind, &params, &material, &animation),
                    category: Category::AdvancedObjects,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuneRecord {
    pub messages: Vec<Message>,
}

impl FineTuneRecord {
    pub fn from_example(example: &Example) -> Self {
        Self {
            messages: vec![
                Message {
                    role: Role::System,
                    content: FINE_TUNE_SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: Role::User,
                    content: format!("Create Three.js code for: {}", example.prompt),
                },
                Message {
                    role: Role::Assistant,
                    content: example.code.as_str().to_string(),
                },
            ],
        }
    }

    pub fn assistant_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == Role::Assistant)
            .map(|message| message.content.as_str())
    }
}

pub fn fine_tune_records(examples: &[Example]) -> Vec<FineTuneRecord> {
    examples.iter().map(FineTuneRecord::from_example).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CorpusError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Writes the whole corpus as one pretty-printed JSON array.
pub fn write_corpus(path: impl AsRef<Path>, examples: &[Example]) -> Result<(), CorpusError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| CorpusError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, examples).map_err(|err| CorpusError::json(path, err))?;
    writer.flush().map_err(|err| CorpusError::io(path, err))
}

/// Writes one JSON object per line.
pub fn write_fine_tune(
    path: impl AsRef<Path>,
    records: &[FineTuneRecord],
) -> Result<(), CorpusError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| CorpusError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|err| CorpusError::json(path, err))?;
        writer
            .write_all(b"\n")
            .map_err(|err| CorpusError::io(path, err))?;
    }
    writer.flush().map_err(|err| CorpusError::io(path, err))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSummary {
    pub total: usize,
    pub basic_shapes: usize,
    pub advanced_objects: usize,
    pub checked: usize,
    pub passed: usize,
}

/// Counts examples per category and validates the first `check` of them.
pub fn summarize(examples: &[Example], validator: &SnippetValidator, check: usize) -> CorpusSummary {
    let count = |category: Category| {
        examples
            .iter()
            .filter(|example| example.category == category)
            .count()
    };
    let checked = check.min(examples.len());
    let passed = examples[..checked]
        .iter()
        .filter(|example| validator.validate(example.code.as_str()))
        .count();

    CorpusSummary {
        total: examples.len(),
        basic_shapes: count(Category::BasicShapes),
        advanced_objects: count(Category::AdvancedObjects),
        checked,
        passed,
    }
}
