//! Writes the OpenAPI document for the biology learning API.
//!
//! Usage: `openapi [OUTPUT]`, defaulting to `openapi.json` in the working directory.

use biolearn_api::router::ApiDoc;
use std::path::{Path, PathBuf};
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

/// Serializes `api_doc` as pretty JSON and writes it to `path`.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    generate_spec(ApiDoc::openapi(), &output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
