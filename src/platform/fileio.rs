use std::path::Path;

use tracing::info;

/// Reads the file at `file_path` to completion and returns it as a string.
///
/// The returned future does not resolve until the entire file has been read;
/// partial contents are never handed to the caller.
pub async fn load_as_string<P>(file_path: P) -> std::io::Result<String>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    info!("load file as string: {file_path:?}");
    std::fs::read_to_string(file_path)
}
