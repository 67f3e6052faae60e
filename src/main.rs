use anyhow::Context;
use clap::Parser;
use csv_bridge::utils::{filename, logger};
use csv_bridge::{CellValue, CliConfig, Command, CsvEngine, SchemaFile, TypedRecord};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    match config.command {
        Command::Import {
            input,
            schema,
            encoding,
            output,
            validate_headers,
        } => run_import(&input, &schema, encoding, output, validate_headers),
        Command::Export {
            input,
            headers,
            encoding,
            output,
            base_name,
            tag,
        } => run_export(&input, headers, encoding, output, &base_name, tag),
    }
}

fn run_import(
    input: &Path,
    schema_path: &Path,
    encoding: Option<String>,
    output: Option<PathBuf>,
    validate_headers: bool,
) -> anyhow::Result<()> {
    let schema = SchemaFile::load(schema_path)
        .with_context(|| format!("failed to load schema {}", schema_path.display()))?;

    let encoding = encoding
        .or_else(|| schema.encoding.clone())
        .unwrap_or_else(|| csv_bridge::core::tokenizer::DEFAULT_ENCODING.to_string());
    let engine = CsvEngine::with_encoding(encoding);

    let mut reader =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;

    let expected = validate_headers.then(|| schema.expected_headers());
    let report = engine.import(&mut reader, expected.as_deref(), &schema.columns);

    if let Some(error) = &report.error {
        eprintln!("❌ Import failed: {}", error);
        std::process::exit(1);
    }

    if !report.diagnostics.is_empty() {
        eprintln!(
            "⚠️  {} rows/columns reported defects (run with --verbose for details)",
            report.diagnostics.len()
        );
    }

    let json = serde_json::to_string_pretty(&report.records)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "✅ {} records imported to {}",
                report.records.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_export(
    input: &Path,
    headers: Vec<String>,
    encoding: String,
    output: Option<PathBuf>,
    base_name: &str,
    tag: Option<String>,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(&text).context("input must be a JSON array of flat objects")?;

    let records: Vec<TypedRecord> = rows
        .iter()
        .map(|row| {
            let mut record = TypedRecord::new();
            for (key, value) in row {
                record.insert(key.clone(), CellValue::from_json(value));
            }
            record
        })
        .collect();

    let path = output.unwrap_or_else(|| {
        PathBuf::from(filename::timestamped_file_name(
            base_name,
            tag.as_deref(),
            ".csv",
        ))
    });

    let engine = CsvEngine::with_encoding(encoding);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    engine.export(&mut writer, &headers, &records)?;

    println!(
        "✅ {} records exported to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
