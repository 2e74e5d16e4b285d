use kerfcheck::{classify_explained, AttributeBundle};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <bundle.json>", args[0]);
        std::process::exit(2);
    }

    let data = std::fs::read_to_string(&args[1])?;
    let bundle: AttributeBundle = serde_json::from_str(&data)?;
    let (category, rule) = classify_explained(&bundle);
    println!("{category} (rule: {rule})");
    Ok(())
}
