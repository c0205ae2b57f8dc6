//! Folder batch processing.
//!
//! Every `.pdf` file in an input directory gets a `<stem>.json` outline in
//! the output directory. A document that fails still gets a file (with the
//! empty outline) and the batch moves on.
//!
//! Inputs whose names differ only in extension case (`a.pdf`, `a.PDF`) map
//! to the same output file. They run one after another in name order, so the
//! last one wins and the result does not depend on thread timing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::model::DocumentOutline;
use crate::outline::OutlineExtractor;
use crate::render::write_json;

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Input PDF
    pub input: PathBuf,
    /// JSON file written (or attempted)
    pub output: PathBuf,
    /// Number of headings written
    pub heading_count: usize,
    /// Why extraction failed, if it did
    pub extract_error: Option<String>,
    /// Why the JSON file could not be written, if it could not
    pub save_error: Option<String>,
    /// Later input that replaced this file's output
    pub overwritten_by: Option<PathBuf>,
}

impl FileOutcome {
    /// File name of the input, for display.
    pub fn input_name(&self) -> String {
        display_name(&self.input)
    }

    /// File name of the output, for display.
    pub fn output_name(&self) -> String {
        display_name(&self.output)
    }

    /// Check if the document was extracted and its JSON file kept.
    pub fn is_success(&self) -> bool {
        self.extract_error.is_none() && self.is_saved()
    }

    /// Check if the JSON file was written and not replaced afterwards.
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none() && self.overwritten_by.is_none()
    }
}

/// Summary of a folder run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of PDF files found
    pub found: usize,
    /// One outcome per file, ordered by input file name
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of fully successful files.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files with any error.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Number of JSON files left in the output directory.
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    /// Check if no PDF files were found.
    pub fn is_empty(&self) -> bool {
        self.found == 0
    }
}

/// PDF files directly inside `dir`, sorted by name.
pub fn list_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// JSON path for `input` inside `output_dir`.
pub fn output_path_for<P: AsRef<Path>>(input: &Path, output_dir: P) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.as_ref().join(format!("{}.json", stem))
}

/// Process every PDF in `input_dir`, writing outlines into `output_dir`.
pub fn process_folder<P, Q>(
    input_dir: P,
    output_dir: Q,
    extractor: &OutlineExtractor,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_folder_with(input_dir, output_dir, extractor, |_| {})
}

/// Like [`process_folder`], calling `on_file` as each file finishes.
///
/// With parallel processing enabled `on_file` may be called from several
/// threads and out of name order; the returned report is always in name
/// order.
pub fn process_folder_with<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    extractor: &OutlineExtractor,
    on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&FileOutcome) + Sync + Send,
{
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    fs::create_dir_all(output_dir)?;
    let files = list_pdf_files(input_dir)?;

    if files.is_empty() {
        log::info!("No PDF files found in {}", input_dir.display());
        return Ok(BatchReport::default());
    }
    log::info!("Found {} PDF files to process", files.len());

    let groups = group_by_output(&files, output_dir);

    let run = |group: &Vec<PathBuf>| {
        let mut outcomes: Vec<FileOutcome> = group
            .iter()
            .map(|input| process_file(input, output_dir, extractor))
            .collect();
        mark_overwritten(&mut outcomes);
        for outcome in &outcomes {
            on_file(outcome);
        }
        outcomes
    };

    let mut outcomes: Vec<FileOutcome> = if extractor.options().parallel {
        groups.par_iter().flat_map_iter(run).collect()
    } else {
        groups.iter().flat_map(run).collect()
    };
    outcomes.sort_by(|a, b| a.input.cmp(&b.input));

    Ok(BatchReport {
        found: files.len(),
        outcomes,
    })
}

/// Split sorted inputs into groups sharing an output path, keeping name order
/// inside each group.
fn group_by_output(files: &[PathBuf], output_dir: &Path) -> Vec<Vec<PathBuf>> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<Vec<PathBuf>> = Vec::new();

    for input in files {
        let next = groups.len();
        let i = *index.entry(output_path_for(input, output_dir)).or_insert(next);
        if i == next {
            groups.push(Vec::new());
        }
        groups[i].push(input.clone());
    }

    groups
}

/// Record which earlier outcomes of a group had their file replaced by the
/// last successful write.
fn mark_overwritten(outcomes: &mut [FileOutcome]) {
    let Some(last) = outcomes.iter().rposition(|o| o.save_error.is_none()) else {
        return;
    };
    let winner = outcomes[last].input.clone();

    for outcome in &mut outcomes[..last] {
        if outcome.save_error.is_none() {
            log::warn!(
                "{} overwritten by {}",
                outcome.output.display(),
                display_name(&winner)
            );
            outcome.overwritten_by = Some(winner.clone());
        }
    }
}

/// Extract one file and write its JSON, recording any failure.
fn process_file(input: &Path, output_dir: &Path, extractor: &OutlineExtractor) -> FileOutcome {
    log::info!("Processing: {}", display_name(input));
    let output = output_path_for(input, output_dir);

    let (outline, extract_error) = match extractor.extract_file(input) {
        Ok(outline) => (outline, None),
        Err(e) => {
            log::error!("Error processing {}: {}", input.display(), e);
            (DocumentOutline::empty(), Some(e.to_string()))
        }
    };

    let save_error = match write_json(&outline, &output) {
        Ok(()) => {
            log::info!(
                "Saved: {} (found {} headings)",
                display_name(&output),
                outline.heading_count()
            );
            None
        }
        Err(e) => {
            log::error!("Error saving {}: {}", output.display(), e);
            Some(e.to_string())
        }
    };

    FileOutcome {
        input: input.to_path_buf(),
        output,
        heading_count: outline.heading_count(),
        extract_error,
        save_error,
        overwritten_by: None,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_output_path_for() {
        let path = output_path_for(Path::new("in/Report.Final.PDF"), "out");
        assert_eq!(path, PathBuf::from("out/Report.Final.json"));
    }

    #[test]
    fn test_list_pdf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"").unwrap();
        fs::write(dir.path().join("A.PDF"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let names: Vec<String> = list_pdf_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn test_group_by_output_joins_case_variants() {
        let files = vec![
            PathBuf::from("in/Report.PDF"),
            PathBuf::from("in/Report.pdf"),
            PathBuf::from("in/other.pdf"),
        ];

        let groups = group_by_output(&files, Path::new("out"));
        assert_eq!(
            groups,
            vec![
                vec![PathBuf::from("in/Report.PDF"), PathBuf::from("in/Report.pdf")],
                vec![PathBuf::from("in/other.pdf")],
            ]
        );
    }

    #[test]
    fn test_mark_overwritten_last_write_wins() {
        let outcome = |name: &str, save_error: Option<&str>| FileOutcome {
            input: PathBuf::from(name),
            output: PathBuf::from("out/a.json"),
            heading_count: 0,
            extract_error: None,
            save_error: save_error.map(str::to_string),
            overwritten_by: None,
        };
        let mut outcomes = vec![
            outcome("a.PDF", None),
            outcome("a.Pdf", None),
            outcome("a.pdf", Some("disk full")),
        ];

        mark_overwritten(&mut outcomes);
        assert_eq!(outcomes[0].overwritten_by, Some(PathBuf::from("a.Pdf")));
        assert!(outcomes[1].is_saved());
        assert!(!outcomes[2].is_saved());
    }

    #[test]
    fn test_empty_input_dir() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("nested/out");

        let report = process_folder(input.path(), &out_dir, &OutlineExtractor::new()).unwrap();
        assert!(report.is_empty());
        assert!(out_dir.is_dir());
    }

    #[test]
    fn test_missing_input_dir_is_error() {
        let output = tempfile::tempdir().unwrap();
        let result = process_folder(
            "/nonexistent/input/dir",
            output.path(),
            &OutlineExtractor::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pdf_writes_empty_result() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), b"this is not a pdf").unwrap();

        let calls = AtomicUsize::new(0);
        let report = process_folder_with(input.path(), output.path(), &OutlineExtractor::new(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.found, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.saved(), 1);

        let outcome = &report.outcomes[0];
        assert!(outcome.extract_error.is_some());
        assert_eq!(outcome.output_name(), "broken.json");

        let written = fs::read_to_string(output.path().join("broken.json")).unwrap();
        let parsed: DocumentOutline = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, DocumentOutline::empty());
    }
}
