//! Reading and checking the `[project]` table of a pyproject.toml.
//!
//! Run with: cargo run --example pyproject [path/to/pyproject.toml]

use std::error::Error;
use typed_toml::project::ProjectParser;
use typed_toml::{load, loads, to_string, TomlDecoder, TomlEncoder};

const SAMPLE: &str = r#"[project]
name = "spam"
version = "2020.0.0"
description = "Lovely Spam! Wonderful Spam!"
keywords = ["egg", "bacon", "sausage", "tomatoes", "Lobster Thermidor"]
dependencies = ["httpx", "gidgethub[httpx]>4.0.0", "django>2.1"]

[project.urls]
homepage = "example.com"
documentation = "readthedocs.org"

[project.entry-points."spam.magical"]
tomatoes = "spam:main_tomatoes"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let decoder = TomlDecoder::new();
    let doc = match std::env::args().nth(1) {
        Some(path) => load(path, &decoder)?,
        None => loads(SAMPLE, &decoder)?,
    };

    let parser = ProjectParser::new();
    let project = match parser.parse_document(&doc) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("error: {}", e);
            if let Some(docs) = e.documentation() {
                eprintln!("  see {}", docs);
            }
            std::process::exit(1);
        }
    };

    println!("Name: {}", project.name);
    if let Some(description) = &project.description {
        println!("Description: {}", description);
    }
    println!("Keywords (sorted): {:?}", project.keywords);
    for (group, entries) in &project.entry_points {
        println!("Entry point group {:?}: {} entries", group, entries.len());
    }

    if let Some(project_table) = doc.get("project").and_then(|v| v.as_table()) {
        let ignored = parser.schema().undeclared_keys(project_table);
        if !ignored.is_empty() {
            println!("Not checked: {}", ignored.join(", "));
        }
    }

    // Broken input reports the failing key
    let broken = loads("[project]\nname = \"spam\"\nurls = {foo = 1234}\n", &decoder)?;
    if let Err(e) = parser.parse_document(&broken) {
        println!("\nBroken input: {}", e);
    }

    println!("\nNormalized:\n{}", to_string(&NormalizedDoc { project }, &TomlEncoder::new())?);
    Ok(())
}

#[derive(serde::Serialize)]
struct NormalizedDoc {
    project: typed_toml::project::ProjectMetadata,
}
