use kerfcheck::{InspectConfig, Inspector};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <reference.png> <part.png> [tolerance_px] [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let config = match args.get(3) {
        Some(tol) => InspectConfig::with_tolerance(tol.parse()?),
        None => InspectConfig::default(),
    };
    let inspector = Inspector::new(config)?;
    inspector.load_reference_file(Path::new(&args[1]))?;

    let bytes = std::fs::read(&args[2])?;
    let verdict = inspector.inspect(&bytes);
    println!("{}: {}", verdict.status, verdict.message);

    if let Some(out_path) = args.get(4) {
        let json = serde_json::to_string_pretty(&verdict)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
