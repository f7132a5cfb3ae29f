use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::models::Category;

/// Read a newline-delimited URL list. Lines are trimmed and blank lines
/// skipped; a missing or empty list is a startup error.
pub fn read_url_list(path: &Path) -> Result<Vec<String>, ScrapeError> {
    let content = fs::read_to_string(path).map_err(|source| ScrapeError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;

    let urls: Vec<String> = content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return Err(ScrapeError::EmptySeeds(path.to_path_buf()));
    }

    Ok(urls)
}

/// Persist collected product URLs as `urls_<category>.txt`, one per line.
pub fn write_url_list(
    dir: &Path,
    category: &Category,
    urls: &[String],
) -> Result<PathBuf, ScrapeError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("urls_{}.txt", category));

    let mut content = urls.join("\n");
    content.push('\n');
    fs::write(&path, content)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls_category.txt");
        fs::write(&path, "https://a/1\n\n  https://a/2  \n\n").unwrap();

        let urls = read_url_list(&path).unwrap();
        assert_eq!(urls, vec!["https://a/1".to_string(), "https://a/2".to_string()]);
    }

    #[test]
    fn missing_or_empty_lists_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(read_url_list(&missing), Err(ScrapeError::SeedFile { .. })));

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "\n \n").unwrap();
        assert!(matches!(read_url_list(&empty), Err(ScrapeError::EmptySeeds(_))));
    }

    #[test]
    fn written_list_reads_back_with_its_category() {
        let dir = tempfile::tempdir().unwrap();
        let urls = vec!["https://a/1".to_string(), "https://a/2".to_string()];

        let path = write_url_list(dir.path(), &Category("rice".into()), &urls).unwrap();
        assert_eq!(Category::from_url_list(&path).as_str(), "rice");
        assert_eq!(read_url_list(&path).unwrap(), urls);
    }
}
