//! Site traversal: find managed pages and update them in place.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use ignore::WalkBuilder;

use crate::app::merge;
use crate::domain::marker;
use crate::infra::fs::{read_text, write_text};

/// Inputs controlling one traversal run.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// File or directory tree to process.
    pub root: PathBuf,
    /// Filename substring filter. Empty matches everything.
    pub filter: String,
}

impl WalkOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Totals accumulated across one traversal run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub skipped: usize,
}

/// How a single candidate file was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Merged and written back.
    Merged,
    /// No template-reference tag: not a managed file.
    NotManaged,
    /// The file is its own template; templates are never merged into
    /// themselves.
    SelfReference,
}

/// Walks a root path and re-templates every managed page in place.
///
/// Owns the run counters and the one-slot template cache. The cache keeps
/// the most recently loaded template keyed by resolved path, because a
/// directory of pages usually shares one template; the merge itself never
/// depends on it.
#[derive(Debug, Default)]
pub struct Walker {
    template_path: Option<PathBuf>,
    template_text: String,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process `root` and return the run totals.
    ///
    /// Every per-file failure is reported on the error stream and counted as
    /// a skip; only a root that cannot be enumerated at all aborts the run.
    pub fn run(&mut self, opts: &WalkOptions) -> Result<RunStats> {
        if !opts.root.exists() {
            bail!("no such file or directory: {}", opts.root.display());
        }

        let mut stats = RunStats::default();
        let walk = WalkBuilder::new(&opts.root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if !entry.file_name().to_string_lossy().contains(&opts.filter) {
                continue;
            }

            match self.process_file(entry.path()) {
                Ok(Disposition::Merged) => stats.processed += 1,
                Ok(Disposition::NotManaged | Disposition::SelfReference) => stats.skipped += 1,
                Err(err) => {
                    eprintln!("{}: {err:#}", entry.path().display());
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Re-template one file. Nothing is written unless the merge succeeds.
    fn process_file(&mut self, path: &Path) -> Result<Disposition> {
        let target = read_text(path)?;
        let Some(reference) = marker::template_reference(&target) else {
            return Ok(Disposition::NotManaged);
        };
        tracing::debug!(file = %path.display(), template = reference.name, "processing managed file");

        let template_path = resolve_template(path, reference.name);
        if !template_path.exists() {
            bail!("template file not found: {}", template_path.display());
        }
        if is_same_file(path, &template_path) {
            return Ok(Disposition::SelfReference);
        }

        let template = self.template_text(&template_path)?;
        let merged = merge::apply_template(template, &target)?;
        write_text(path, &merged)?;
        Ok(Disposition::Merged)
    }

    /// Template text for `path`, reloading only when the resolved path
    /// changed since the previous call.
    fn template_text(&mut self, path: &Path) -> Result<&str> {
        if self.template_path.as_deref() != Some(path) {
            tracing::debug!(template = %path.display(), "loading template");
            self.template_text = read_text(path)?;
            self.template_path = Some(path.to_path_buf());
        }
        Ok(&self.template_text)
    }
}

/// Resolve a template reference against the directory of the page declaring
/// it. An absolute reference wins over the join.
fn resolve_template(page: &Path, reference: &str) -> PathBuf {
    match page.parent() {
        Some(dir) => dir.join(reference),
        None => PathBuf::from(reference),
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<!--eztemplate_base.html-->\n<header>v2</header>\n\
        <!--ezstart_body-->default<!--ezend_body-->\n<footer>shared</footer>\n";

    fn page(body: &str) -> String {
        format!(
            "<!--eztemplate_base.html-->\n<header>v1</header>\n\
             <!--ezstart_body-->{body}<!--ezend_body-->\n<footer>old</footer>\n"
        )
    }

    fn run(root: &Path, filter: &str) -> RunStats {
        let opts = WalkOptions::new(root).with_filter(filter);
        Walker::new().run(&opts).expect("walk succeeds")
    }

    #[test]
    fn updates_pages_and_reports_totals() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(root.join("base.html"), TEMPLATE)?;
        fs::write(root.join("index.html"), page("<p>index</p>"))?;
        fs::write(root.join("about.html"), page("<p>about</p>"))?;
        fs::write(root.join("notes.txt"), "no tags here")?;

        let stats = run(root, "");
        // The template skips as a self-reference, the plain file as unmanaged.
        assert_eq!(stats, RunStats { processed: 2, skipped: 2 });

        let index = fs::read_to_string(root.join("index.html"))?;
        assert!(index.contains("<header>v2</header>"));
        assert!(index.contains("<!--ezstart_body--><p>index</p><!--ezend_body-->"));
        assert!(!index.contains("old"));

        let template = fs::read_to_string(root.join("base.html"))?;
        assert_eq!(template, TEMPLATE);
        Ok(())
    }

    #[test]
    fn recurses_into_subdirectories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::create_dir_all(root.join("docs"))?;
        fs::write(root.join("base.html"), TEMPLATE)?;
        fs::write(
            root.join("docs/guide.html"),
            "<!--eztemplate_../base.html-->\n\
             <!--ezstart_body--><p>guide</p><!--ezend_body-->\n",
        )?;

        let stats = run(root, "");
        assert_eq!(stats, RunStats { processed: 1, skipped: 1 });

        let guide = fs::read_to_string(root.join("docs/guide.html"))?;
        assert!(guide.starts_with("<!--eztemplate_../base.html-->"));
        assert!(guide.contains("<footer>shared</footer>"));
        Ok(())
    }

    #[test]
    fn structural_mismatch_leaves_the_file_untouched() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(root.join("base.html"), TEMPLATE)?;
        let broken = "<!--eztemplate_base.html-->\
            <!--ezstart_sidebar-->not in template<!--ezend_sidebar-->";
        fs::write(root.join("page.html"), broken)?;

        let stats = run(root, "");
        assert_eq!(stats, RunStats { processed: 0, skipped: 2 });
        assert_eq!(fs::read_to_string(root.join("page.html"))?, broken);
        Ok(())
    }

    #[test]
    fn missing_template_counts_as_a_skip() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(
            root.join("orphan.html"),
            "<!--eztemplate_gone.html--><!--ezstart_a-->x<!--ezend_a-->",
        )?;

        let stats = run(root, "");
        assert_eq!(stats, RunStats { processed: 0, skipped: 1 });
        Ok(())
    }

    #[test]
    fn filename_filter_narrows_the_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(root.join("base.html"), TEMPLATE)?;
        fs::write(root.join("index.html"), page("<p>index</p>"))?;
        fs::write(root.join("index.txt"), page("<p>text twin</p>"))?;

        let stats = run(root, ".html");
        assert_eq!(stats, RunStats { processed: 1, skipped: 1 });

        // The filtered-out twin keeps its stale design.
        let twin = fs::read_to_string(root.join("index.txt"))?;
        assert!(twin.contains("<header>v1</header>"));
        Ok(())
    }

    #[test]
    fn accepts_a_single_file_root() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(root.join("base.html"), TEMPLATE)?;
        fs::write(root.join("only.html"), page("<p>only</p>"))?;

        let stats = run(&root.join("only.html"), "");
        assert_eq!(stats, RunStats { processed: 1, skipped: 0 });

        let only = fs::read_to_string(root.join("only.html"))?;
        assert!(only.contains("<header>v2</header>"));
        Ok(())
    }

    #[test]
    fn shared_template_is_read_once_per_slot() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();

        fs::write(root.join("base.html"), TEMPLATE)?;
        fs::write(root.join("a.html"), page("<p>a</p>"))?;
        fs::write(root.join("b.html"), page("<p>b</p>"))?;

        let mut walker = Walker::new();
        let stats = walker.run(&WalkOptions::new(root))?;
        assert_eq!(stats.processed, 2);
        assert_eq!(walker.template_path.as_deref(), Some(root.join("base.html").as_path()));
        Ok(())
    }

    #[test]
    fn nonexistent_root_aborts_the_run() {
        let opts = WalkOptions::new("/definitely/not/here");
        assert!(Walker::new().run(&opts).is_err());
    }
}
