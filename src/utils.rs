use crate::error::Res;
use anyhow::Context;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Res<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Read all of stdin to a `String`.
pub(crate) async fn read_stdin() -> Res<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read from stdin")?;
    Ok(input)
}
