//! Basic parsing example

use std::env;
use xmlnest::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <xml-file>", args[0]);
        std::process::exit(1);
    }

    let parser = Parser::new().with_namespaces(true);
    let doc = parser.parse_file(&args[1])?;

    println!("Parsed {} successfully", args[1]);
    if let Some(version) = doc.declaration_attribute("version") {
        println!("  XML version: {}", version);
    }
    println!("  Elements: {}", doc.element_count());

    // Show the first 5 elements
    if let Some(root) = doc.root() {
        for element in root.descendants().take(5) {
            match element.text() {
                Some(text) => println!("  - {}: {}", element.name(), text),
                None => println!("  - {}", element.name()),
            }
        }
    }

    Ok(())
}
