//! Minimal CLI: infer → (schema | graph)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::graph::{TypeGraph, TypeId};
use crate::inference::{Inference, InferenceOptions, Inferred};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a shared type graph from JSON/NDJSON samples and print it as JSON Schema or as a raw graph dump
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print a draft-07 JSON Schema
    Schema(SchemaOut),
    /// infer and print every node of the deduplicated type graph
    Graph(GraphOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InferenceSettings {
    /// name hint for the top-level type
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// never replace many same-typed properties with a map
    #[arg(long, default_value_t = false)]
    no_maps: bool,

    /// never turn repeated short strings into enums
    #[arg(long, default_value_t = false)]
    no_enums: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference_settings: InferenceSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct GraphOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference_settings: InferenceSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value)) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;

            let mut documents = Vec::new();
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let doc = serde_json::from_str::<Value>(line).with_context(|| {
                        format!("failed to parse NDJSON line {} ({source_path_str})", line_no + 1)
                    })?;
                    documents.push(doc);
                }
            } else {
                let doc = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                documents.push(doc);
            }
            debug!(path = %source_path_str, documents = documents.len(), "loaded source");

            for json_value in documents {
                let json_value = match self.json_pointer.as_deref() {
                    None => json_value,
                    Some(pointer) => match json_value.pointer(pointer) {
                        Some(selected) => selected.clone(),
                        None => {
                            debug!(path = %source_path_str, pointer, "pointer matched nothing, skipping");
                            continue;
                        }
                    },
                };
                match self.jq_expr.as_ref() {
                    None => apply(json_value),
                    Some(jq_expr) => {
                        let result = crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                            format!("failed to apply jq expression to source file ({source_path_str})")
                        })?;
                        result.into_iter().for_each(&mut apply);
                    }
                }
            }
        }
        Ok(())
    }
}

impl InferenceSettings {
    fn options(&self) -> InferenceOptions {
        InferenceOptions { infer_maps: !self.no_maps, infer_enums: !self.no_enums }
    }

    fn infer(&self, input_settings: &InputSettings) -> Result<Inferred> {
        let mut inf = Inference::new(self.options());
        input_settings.load_process(|value| {
            inf.observe_value(&value);
        })?;
        info!(documents = inf.sample_count(), "inferring types");
        let inferred = inf.solve(&self.root_type)?;
        info!(types = inferred.graph.len(), "type graph built");
        Ok(inferred)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let Inferred { graph, root } = target.inference_settings.infer(&target.input_settings)?;
                let schema = crate::schema::emit_schema(&graph, root);
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&schema)?)
            }
            Command::Graph(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let Inferred { graph, root } = target.inference_settings.infer(&target.input_settings)?;
                let dump = graph_dump(&graph, root);
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&dump)?)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn graph_dump(graph: &TypeGraph, root: TypeId) -> Value {
    let types: Vec<Value> = graph
        .iter()
        .map(|(id, kind)| {
            json!({
                "id": id,
                "names": graph.name_hints(id).collect::<Vec<_>>(),
                "kind": kind,
            })
        })
        .collect();
    json!({ "root": root, "types": types })
}

fn write_output(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
