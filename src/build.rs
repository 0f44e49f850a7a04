//! Stylesheet build: walks sources, groups files into cascade layers and
//! renders them as `@layer` blocks.
//!
//! Sources are processed in the order given. Within a source:
//! - File paths are sorted before grouping, so concatenation order inside a
//!   layer never depends on directory enumeration order
//! - Layers are ordered shallow before deep, then alphabetically
//!
//! Layers from different sources are never merged or reordered across
//! sources, even when their names coincide.

use crate::error::{Error, Result};
use crate::layer::{depth, layer_name};
use crate::source::Source;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// File extension of eligible stylesheet fragments
pub const CSS_EXTENSION: &str = ".css";

/// A cascade layer assembled from one or more files of a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Dot-separated layer name, prefix included
    pub name: String,
    /// Number of dots in `name`
    pub depth: usize,
    /// Contributing file paths, in concatenation order
    pub files: Vec<String>,
    /// Concatenated file contents, each followed by a newline
    #[serde(skip)]
    pub content: String,
}

impl Layer {
    fn new(name: String) -> Self {
        Self {
            depth: depth(&name),
            name,
            files: Vec::new(),
            content: String::new(),
        }
    }

    fn append(&mut self, path: &str, content: &str) {
        self.files.push(path.to_string());
        self.content.push_str(content);
        self.content.push('\n');
    }
}

/// Walk every source and return the final, ordered layer list.
pub fn collect_layers(sources: &[Source<'_>]) -> Result<Vec<Layer>> {
    let mut all_layers = Vec::new();

    for source in sources {
        let layers = source_layers(source)?;
        debug!(
            "Source {:?} contributed {} layers",
            source.root_path(),
            layers.len()
        );
        all_layers.extend(layers);
    }

    Ok(all_layers)
}

/// Layers of a single source, sorted by depth then name
fn source_layers(source: &Source<'_>) -> Result<Vec<Layer>> {
    let fs = source.fs();
    let root = source.root_path();

    debug!("Walking source {:?}", root);

    let entries = fs.walk(root).map_err(|e| Error::walk(root, e))?;

    let mut file_paths: Vec<String> = entries
        .into_iter()
        .filter(|entry| !entry.is_dir && entry.path.ends_with(CSS_EXTENSION))
        .map(|entry| entry.path)
        .collect();

    if file_paths.is_empty() {
        debug!("No stylesheets under {:?}, skipping", root);
        return Ok(Vec::new());
    }

    file_paths.sort();

    let mut layers: Vec<Layer> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for file_path in &file_paths {
        let content = fs
            .read_to_string(file_path)
            .map_err(|e| Error::read(file_path, e))?;

        let mut name = layer_name(file_path, root);
        if !source.layer_prefix().is_empty() {
            name = format!("{}.{}", source.layer_prefix(), name);
        }

        debug!("{} -> @layer {}", file_path, name);

        let slot = *index.entry(name.clone()).or_insert_with(|| {
            layers.push(Layer::new(name));
            layers.len() - 1
        });
        layers[slot].append(file_path, &content);
    }

    layers.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.name.cmp(&b.name)));

    Ok(layers)
}

/// Render layers as a layer order declaration followed by one block per layer.
///
/// ```text
/// @layer name1, name2;
/// @layer name1 {
/// ...content...
/// }
/// @layer name2 {
/// ...content...
/// }
/// ```
///
/// No layers renders as an empty string.
pub fn render(layers: &[Layer]) -> String {
    if layers.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
    let mut out = String::new();

    out.push_str("@layer ");
    out.push_str(&names.join(", "));
    out.push_str(";\n");

    for layer in layers {
        out.push_str("@layer ");
        out.push_str(&layer.name);
        out.push_str(" {\n");
        out.push_str(&layer.content);
        out.push_str("}\n");
    }

    out
}

/// Walk one or more sources and return the combined stylesheet.
///
/// Empty sources contribute nothing; if no source holds any stylesheet the
/// result is an empty string, not an error. Any walk or read failure aborts
/// the whole build.
pub fn build(sources: &[Source<'_>]) -> Result<String> {
    let layers = collect_layers(sources)?;
    let css = render(&layers);

    if !css.is_empty() {
        info!("Built {} layers ({} bytes)", layers.len(), css.len());
    }

    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Entry, MemoryFs, SourceFs};
    use std::io;

    fn names(layers: &[Layer]) -> Vec<&str> {
        layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Handle whose walk always fails
    struct BrokenFs;

    impl SourceFs for BrokenFs {
        fn walk(&self, _root: &str) -> io::Result<Vec<Entry>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
        }

        fn read_to_string(&self, _path: &str) -> io::Result<String> {
            unreachable!("walk never succeeds")
        }
    }

    /// Handle that lists a file it cannot read
    struct VanishingFs;

    impl SourceFs for VanishingFs {
        fn walk(&self, _root: &str) -> io::Result<Vec<Entry>> {
            Ok(vec![Entry::file("ghost.css")])
        }

        fn read_to_string(&self, _path: &str) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::NotFound, "file vanished"))
        }
    }

    #[test]
    fn test_single_root_file() {
        let memory = MemoryFs::new().with_file("reset.css", "* { margin: 0; }");

        let css = build(&[Source::new(&memory)]).unwrap();

        assert_eq!(css, "@layer reset;\n@layer reset {\n* { margin: 0; }\n}\n");
    }

    #[test]
    fn test_files_in_layer_concatenate_alphabetically() {
        let memory = MemoryFs::new()
            .with_file("base/typography.css", "h1 {}")
            .with_file("base/links.css", "a {}");

        let css = build(&[Source::new(&memory)]).unwrap();

        assert_eq!(css, "@layer base;\n@layer base {\na {}\nh1 {}\n}\n");
    }

    #[test]
    fn test_layer_order_depth_then_name() {
        let memory = MemoryFs::new()
            .with_file("reset.css", "")
            .with_file("base/file.css", "")
            .with_file("base/elements/btn.css", "");

        let layers = collect_layers(&[Source::new(&memory)]).unwrap();

        assert_eq!(names(&layers), vec!["base", "reset", "base.elements"]);
        assert_eq!(layers[2].depth, 1);
        assert_eq!(layers[2].files, vec!["base/elements/btn.css"]);
    }

    #[test]
    fn test_sources_keep_their_order() {
        let first = MemoryFs::new()
            .with_file("reset.css", "")
            .with_file("base/elements/btn.css", "");
        let second = MemoryFs::new().with_file("button/primary.css", "");

        let layers = collect_layers(&[
            Source::new(&first),
            Source::new(&second).prefix("comp"),
        ])
        .unwrap();

        // comp.button has the same depth as base.elements but sorts after
        // only because its source comes second
        assert_eq!(names(&layers), vec!["reset", "base.elements", "comp.button"]);
    }

    #[test]
    fn test_prefix_counts_towards_depth() {
        let memory = MemoryFs::new()
            .with_file("tokens.css", "")
            .with_file("card/body.css", "");

        let layers = collect_layers(&[Source::new(&memory).prefix("ui")]).unwrap();

        assert_eq!(names(&layers), vec!["ui.card", "ui.tokens"]);
        assert!(layers.iter().all(|l| l.depth == 1));
    }

    #[test]
    fn test_root_restricts_walk_and_naming() {
        let memory = MemoryFs::new()
            .with_file("css/reset.css", "r")
            .with_file("css/base/links.css", "a")
            .with_file("other/ignored.css", "x");

        let layers = collect_layers(&[Source::new(&memory).root("css")]).unwrap();

        assert_eq!(names(&layers), vec!["base", "reset"]);
    }

    #[test]
    fn test_non_css_files_are_ignored() {
        let memory = MemoryFs::new()
            .with_file("reset.css", "r")
            .with_file("notes.md", "# notes")
            .with_file("base/logo.svg", "<svg/>")
            .with_file("base/app.scss", "$x: 1;");

        let layers = collect_layers(&[Source::new(&memory)]).unwrap();

        assert_eq!(names(&layers), vec!["reset"]);
    }

    #[test]
    fn test_empty_source_is_not_an_error() {
        let empty = MemoryFs::new().with_file("readme.md", "");
        assert_eq!(build(&[Source::new(&empty)]).unwrap(), "");
        assert_eq!(build(&[]).unwrap(), "");
    }

    #[test]
    fn test_empty_source_between_others_is_skipped() {
        let first = MemoryFs::new().with_file("a.css", "a");
        let empty = MemoryFs::new();
        let last = MemoryFs::new().with_file("b.css", "b");

        let layers = collect_layers(&[
            Source::new(&first),
            Source::new(&empty),
            Source::new(&last),
        ])
        .unwrap();

        assert_eq!(names(&layers), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_file_still_renders_block() {
        let memory = MemoryFs::new().with_file("empty.css", "");

        let css = build(&[Source::new(&memory)]).unwrap();

        assert_eq!(css, "@layer empty;\n@layer empty {\n\n}\n");
    }

    #[test]
    fn test_same_name_across_sources_is_not_merged() {
        let first = MemoryFs::new().with_file("reset.css", "one");
        let second = MemoryFs::new().with_file("reset.css", "two");

        let css = build(&[Source::new(&first), Source::new(&second)]).unwrap();

        assert_eq!(
            css,
            "@layer reset, reset;\n@layer reset {\none\n}\n@layer reset {\ntwo\n}\n"
        );
    }

    #[test]
    fn test_root_file_and_directory_share_layer() {
        let memory = MemoryFs::new()
            .with_file("base.css", "root")
            .with_file("base/links.css", "nested");

        let layers = collect_layers(&[Source::new(&memory)]).unwrap();

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].content, "root\nnested\n");
    }

    #[test]
    fn test_walk_failure_aborts_build() {
        let good = MemoryFs::new().with_file("a.css", "a");

        let err = build(&[Source::new(&good), Source::new(&BrokenFs).root("css")]).unwrap_err();

        assert_eq!(err.phase(), "walk");
        assert!(err.to_string().starts_with("walk filesystem"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_missing_root_is_walk_failure() {
        let memory = MemoryFs::new().with_file("css/a.css", "a");

        let err = build(&[Source::new(&memory).root("styles")]).unwrap_err();

        assert!(matches!(err, Error::Walk { ref root, .. } if root == "styles"));
    }

    #[test]
    fn test_read_failure_names_path() {
        let err = build(&[Source::new(&VanishingFs)]).unwrap_err();

        assert_eq!(err.phase(), "read");
        assert_eq!(err.path(), "ghost.css");
        assert_eq!(err.to_string(), "read ghost.css: file vanished");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
