use std::collections::HashMap;
use std::error::Error;
use std::fs;

use tape_core::{
    CodeFragment, ColorKey, ColorLiteral, DescriptorTables, EffectTag, GeometryKind,
    ShapeKey, SnippetValidator, assemble, basic, params_for, resolve, synthesize,
};
use tape_corpus::{
    CorpusGenerator, DEFAULT_CORPUS_FILE, DEFAULT_FINE_TUNE_FILE, fine_tune_records,
    prompt_templates, summarize, write_corpus, write_fine_tune,
};
use tracing_subscriber::EnvFilter;

type DynError = Box<dyn Error>;
type Flags = HashMap<String, String>;

const DEFAULT_CHECK_COUNT: usize = 10;
const SAMPLE_COUNT: usize = 3;
const PREVIEW_CHARS: usize = 100;

fn main() -> Result<(), DynError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let tables = DescriptorTables::standard();
    match args[0].as_str() {
        "generate" => run_generate(&tables, &args[1..]),
        "synthesize" => run_synthesize(&tables, &args[1..]),
        "validate" => run_validate(&args[1..]),
        "templates" => {
            print!("{}", template_listing());
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn run_generate(tables: &DescriptorTables, args: &[String]) -> Result<(), DynError> {
    let flags = parse_flags(args)?;
    let corpus_out = optional_str(&flags, "--corpus-out", DEFAULT_CORPUS_FILE);
    let fine_tune_out = optional_str(&flags, "--finetune-out", DEFAULT_FINE_TUNE_FILE);
    let check = optional_usize(&flags, "--check", DEFAULT_CHECK_COUNT)?;

    let examples = CorpusGenerator::new(tables).generate();
    write_corpus(corpus_out, &examples)?;
    tracing::info!(count = examples.len(), path = corpus_out, "wrote example corpus");

    let summary = summarize(&examples, &SnippetValidator::new(), check);
    println!(
        "Validation: {}/{} examples passed",
        summary.passed, summary.checked
    );

    let records = fine_tune_records(&examples);
    write_fine_tune(fine_tune_out, &records)?;
    tracing::info!(count = records.len(), path = fine_tune_out, "wrote fine-tune dataset");

    println!(
        "Generated {} examples ({} basic shapes, {} advanced objects)",
        summary.total, summary.basic_shapes, summary.advanced_objects
    );
    for (index, example) in examples.iter().take(SAMPLE_COUNT).enumerate() {
        println!();
        println!("Example {}:", index + 1);
        println!("Prompt: {}", example.prompt);
        println!("Code Preview: {}...", preview(example.code.as_str()));
    }
    Ok(())
}

fn run_synthesize(tables: &DescriptorTables, args: &[String]) -> Result<(), DynError> {
    let flags = parse_flags(args)?;
    let shape = required_str(&flags, "--shape")?;
    let color = parse_color(tables, required_str(&flags, "--color")?)?;
    let effect = flags.get("--effect").map(String::as_str);

    println!("{}", synthesize_snippet(tables, shape, color, effect));
    Ok(())
}

/// Basic shape recipe without an effect; otherwise the effect recipe with
/// unknown shapes drawn as a cube.
fn synthesize_snippet(
    tables: &DescriptorTables,
    shape: &str,
    color: ColorLiteral,
    effect: Option<&str>,
) -> CodeFragment {
    let kind = resolve(tables, shape).kind.unwrap_or(GeometryKind::Box);
    let params = params_for(tables, kind);
    let (material, animation) = match (effect, ShapeKey::from_name(shape)) {
        (None, Some(shape)) => basic(shape, color),
        _ => synthesize(color, effect.and_then(EffectTag::from_name)),
    };
    assemble(kind, &params, &material, &animation)
}

fn run_validate(args: &[String]) -> Result<(), DynError> {
    let flags = parse_flags(args)?;
    let path = required_str(&flags, "--file")?;
    let fragment = fs::read_to_string(path)?;

    match SnippetValidator::new().first_missing(&fragment) {
        None => {
            println!("valid");
            Ok(())
        }
        Some(missing) => Err(format!("invalid snippet: missing {missing}").into()),
    }
}

fn template_listing() -> String {
    prompt_templates()
        .iter()
        .enumerate()
        .map(|(index, template)| format!("{}. {template}\n", index + 1))
        .collect()
}

/// Accepts a palette name or a `0xrrggbb` literal.
fn parse_color(tables: &DescriptorTables, value: &str) -> Result<ColorLiteral, DynError> {
    if let Some(literal) = ColorKey::from_name(value).and_then(|key| tables.color(key)) {
        return Ok(literal);
    }

    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix('#'))
        .ok_or_else(|| format!("unknown color: {value}"))?;
    if hex.len() != 6 {
        return Err(format!("color literal must have six hex digits: {value}").into());
    }
    let rgb = u32::from_str_radix(hex, 16)
        .map_err(|err| format!("invalid color literal {value}: {err}"))?;
    Ok(ColorLiteral::new(rgb))
}

fn preview(code: &str) -> String {
    code.chars().take(PREVIEW_CHARS).collect()
}

fn parse_flags(args: &[String]) -> Result<Flags, DynError> {
    if !args.len().is_multiple_of(2) {
        return Err("expected flag-value pairs".into());
    }

    let mut flags = HashMap::new();
    let mut index = 0;
    while index < args.len() {
        let flag = args[index].as_str();
        if !flag.starts_with("--") {
            return Err(format!("expected flag at position {}", index + 1).into());
        }
        let value = args[index + 1].clone();
        if flags.insert(flag.to_string(), value).is_some() {
            return Err(format!("duplicate flag: {flag}").into());
        }
        index += 2;
    }
    Ok(flags)
}

fn required_str<'a>(flags: &'a Flags, key: &str) -> Result<&'a str, DynError> {
    flags
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| format!("missing required {key}").into())
}

fn optional_usize(flags: &Flags, key: &str, default: usize) -> Result<usize, DynError> {
    match flags.get(key) {
        Some(value) => value
            .parse::<usize>()
            .map_err(|err| format!("invalid usize for {key}: {err}").into()),
        None => Ok(default),
    }
}

fn optional_str<'a>(flags: &'a Flags, key: &str, default: &'a str) -> &'a str {
    flags.get(key).map(String::as_str).unwrap_or(default)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  tape-cli generate [--corpus-out <path>] [--finetune-out <path>] [--check <usize>]"
    );
    eprintln!("  tape-cli synthesize --shape <name> --color <name|0xrrggbb> [--effect <name>]");
    eprintln!("  tape-cli validate --file <path>");
    eprintln!("  tape-cli templates");
}
