//! Discovering manuscripts and binding them into books.
//!
//! The library root holds one directory per author (a shelf), and each shelf
//! holds one Markdown file per book. Shelves and manuscripts are visited in
//! name order so runs are repeatable. A manuscript that fails to parse or
//! render is logged and counted, and the batch moves on to the next one.

use crate::manuscript::Manuscript;
use crate::sinks::{Outcome, Sink};
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use indicatif::ProgressBar;
use log::{debug, error, info};
use std::path::{Path, PathBuf};

/// One author's directory of manuscripts.
#[derive(Debug, Clone)]
pub struct Shelf {
    /// Directory name, used for output paths and links
    pub name: String,
    pub path: PathBuf,
    pub manuscripts: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
    pub shelves: Vec<Shelf>,
}

impl Library {
    /// Scan `root` for shelves and the manuscripts on them. Only files whose
    /// name matches `pattern` count as manuscripts. A missing root is created
    /// empty.
    pub fn scan(root: &Path, pattern: &str) -> Result<Library> {
        if !root.exists() {
            std::fs::create_dir_all(root).with_context(|| {
                format!("Failed to create books directory: {}", root.display())
            })?;
            info!("created empty books directory {}", root.display());
        }

        let matcher = Glob::new(pattern)
            .with_context(|| format!("Invalid manuscript glob pattern: {}", pattern))?
            .compile_matcher();

        let mut shelves = Vec::new();
        for path in sorted_entries(root)? {
            let Some(name) = visible_name(&path) else {
                continue;
            };
            if !path.is_dir() {
                debug!("ignoring {}, not an author directory", path.display());
                continue;
            }

            let manuscripts = sorted_entries(&path)?
                .into_iter()
                .filter(|p| p.is_file() && is_manuscript(&matcher, p))
                .collect();
            shelves.push(Shelf {
                name,
                path,
                manuscripts,
            });
        }

        Ok(Library {
            root: root.to_path_buf(),
            shelves,
        })
    }

    pub fn manuscript_count(&self) -> usize {
        self.shelves.iter().map(|s| s.manuscripts.len()).sum()
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

/// File name of `path`, unless it is hidden.
fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    (!name.starts_with('.')).then_some(name)
}

fn is_manuscript(matcher: &GlobMatcher, path: &Path) -> bool {
    match path.file_name() {
        Some(name) => !name.to_string_lossy().starts_with('.') && matcher.is_match(name),
        None => false,
    }
}

/// Totals from a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: usize,
    pub skipped: usize,
    /// Manuscripts (or shelves) that could not be processed
    pub failed: Vec<PathBuf>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Feed every manuscript in the library through `sink`.
///
/// Per-manuscript failures are logged and recorded in the report rather than
/// stopping the batch. Only a failure to finish the sink as a whole is
/// returned as an error.
pub fn bind<S: Sink>(
    library: &Library,
    sink: &mut S,
    progress: &ProgressBar,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for shelf in &library.shelves {
        for path in &shelf.manuscripts {
            progress.set_message(path.display().to_string());
            debug!("processing {}", path.display());

            let outcome = Manuscript::load(path, sink.target())
                .and_then(|manuscript| sink.render_book(shelf, &manuscript));
            match outcome {
                Ok(Outcome::Created(out)) => {
                    debug!("{} -> {}", path.display(), out.display());
                    report.created += 1;
                }
                Ok(Outcome::Skipped(out)) => {
                    debug!("{} -> {} (skipped)", path.display(), out.display());
                    report.skipped += 1;
                }
                Err(e) => {
                    error!("{}: {e:#}", path.display());
                    report.failed.push(path.clone());
                }
            }
            progress.inc(1);
        }

        if let Err(e) = sink.finish_shelf(shelf) {
            error!("{}: {e:#}", shelf.path.display());
            report.failed.push(shelf.path.clone());
        }
    }

    sink.finish().with_context(|| "Failed to finish output")?;
    progress.finish_with_message("done");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manuscript::Target;

    fn touch(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("can create parent");
        }
        std::fs::write(path, contents).expect("can write file");
    }

    #[test]
    fn can_scan_library() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path().join("books");
        touch(&root.join("zed").join("b.md"), "b");
        touch(&root.join("zed").join("a.md"), "a");
        touch(&root.join("zed").join("notes.txt"), "not a book");
        touch(&root.join("amy").join("only.md"), "only");
        touch(&root.join(".git").join("HEAD"), "ref");
        touch(&root.join("stray.md"), "not on a shelf");

        let library = Library::scan(&root, "*.md").expect("can scan");
        let names: Vec<_> = library.shelves.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
        assert_eq!(
            library.shelves[1].manuscripts,
            vec![root.join("zed").join("a.md"), root.join("zed").join("b.md")]
        );
        assert_eq!(library.manuscript_count(), 3);
    }

    #[test]
    fn missing_root_is_created() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path().join("books");
        let library = Library::scan(&root, "*.md").expect("can scan");
        assert!(root.is_dir());
        assert!(library.shelves.is_empty());
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        assert!(Library::scan(dir.path(), "[").is_err());
    }

    /// Records what it was asked to render.
    #[derive(Default)]
    struct Recorder {
        books: Vec<String>,
        shelves: Vec<String>,
        finished: bool,
    }

    impl Sink for Recorder {
        fn target(&self) -> Target {
            Target::Html
        }

        fn render_book(&mut self, _shelf: &Shelf, manuscript: &Manuscript) -> Result<Outcome> {
            let filename = manuscript.metadata.filename().to_string();
            self.books.push(filename.clone());
            if filename.starts_with("old") {
                Ok(Outcome::Skipped(PathBuf::from(filename)))
            } else {
                Ok(Outcome::Created(PathBuf::from(filename)))
            }
        }

        fn finish_shelf(&mut self, shelf: &Shelf) -> Result<()> {
            self.shelves.push(shelf.name.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn failing_manuscripts_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path().join("books");
        touch(&root.join("amy").join("a.md"), "---\ntitle: A\n---\nbody");
        touch(&root.join("amy").join("broken.md"), "---\nnever closed");
        touch(&root.join("amy").join("old.md"), "body");
        touch(&root.join("bob").join("c.md"), "body");

        let library = Library::scan(&root, "*.md").expect("can scan");
        let mut sink = Recorder::default();
        let report = bind(&library, &mut sink, &ProgressBar::hidden()).expect("batch completes");

        assert_eq!(sink.books, vec!["a.html", "old.html", "c.html"]);
        assert_eq!(sink.shelves, vec!["amy", "bob"]);
        assert!(sink.finished);
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, vec![root.join("amy").join("broken.md")]);
        assert!(report.has_failures());
    }
}
