use crate::error::CliError;
use serde::Serialize;
use std::path::Path;

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

/// Pretty-prints `value` to `path`, or to stdout when no path is given.
pub async fn emit<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_emit_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        emit(&json!({ "type": "root" }), Some(file.path())).await.unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&written).unwrap(),
            json!({ "type": "root" })
        );
    }
}
