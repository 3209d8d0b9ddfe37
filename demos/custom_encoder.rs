//! Customizing output with encoder strategies.
//!
//! Run with: cargo run --example custom_encoder

use std::error::Error;
use typed_toml::{dumps, loads, toml, Encoder, TomlDecoder, TomlEncoder};

/// Writes arrays with more than three elements one element per line.
struct TallArrays;

impl Encoder for TallArrays {
    fn render_array(&self, items: Vec<String>) -> String {
        if items.len() <= 3 {
            return format!("[{}]", items.join(", "));
        }
        let mut out = String::from("[\n");
        for item in items {
            out.push_str("    ");
            out.push_str(&item);
            out.push_str(",\n");
        }
        out.push(']');
        out
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let source = r#"[project]
name = "spam"
keywords = ["egg", "bacon", "sausage", "tomatoes", "Lobster Thermidor"]
readme = {file = "README.rst", content-type = "text/x-rst"}
"#;
    let doc = loads(source, &TomlDecoder::new())?;

    println!("Default encoder:");
    println!("{}", dumps(&doc, &TomlEncoder::new())?);

    println!("Preserving inline tables:");
    let inline = TomlEncoder::new().preserve_inline(true);
    println!("{}", dumps(&doc, &inline)?);

    println!("Tab separated arrays:");
    let tabbed = TomlEncoder::new().with_separator(",\t")?;
    println!("{}", dumps(&doc, &tabbed)?);

    println!("Tall arrays:");
    println!("{}", dumps(&doc, &TallArrays)?);

    // Separators must be a comma plus whitespace
    if let Err(e) = TomlEncoder::new().with_separator("|") {
        println!("Rejected separator: {}", e);
    }

    let built = toml!({ "tool": { "whey": { "platforms": ["Windows", "macOS", "Linux"] } } });
    if let Some(table) = built.as_table() {
        println!("\nBuilt with toml!:\n{}", dumps(table, &TomlEncoder::new())?);
    }

    Ok(())
}
