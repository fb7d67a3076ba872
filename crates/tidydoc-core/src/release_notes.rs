//! A release notes directive.
//!
//! `.. release-notes:: <dir>` scans the directory for files whose stem is a
//! full version number (`1.2.0.md`, `1.3.0.rst`) and renders them newest
//! first, grouped into one section per minor version:
//!
//! ```text
//! _v1.3:
//!
//! Version 1.3
//! ===========
//!
//! .. include:: 1.3.0.rst
//!
//! _v1.2:
//!
//! Version 1.2
//! ===========
//!
//! .. include:: 1.2.1.md
//! .. include:: 1.2.0.md
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use semver::Version;
use tidydoc_host::{
    App, Directive, DirectiveContext, DirectiveError, ExtensionMetadata, Node, SetupError,
};

pub const NAME: &str = "tidydoc.release_notes";

/// Matches a full version number including patch part, maybe with more after.
fn full_version() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:\..*)?$").unwrap())
}

fn parse_version(stem: &str) -> Option<Version> {
    let captures = full_version().captures(stem)?;
    let part = |i: usize| captures[i].parse().ok();
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Directive rendering release notes, grouping them by minor versions.
pub struct ReleaseNotes;

impl ReleaseNotes {
    fn version_files(dir: &Path) -> Result<Vec<(Version, PathBuf)>, DirectiveError> {
        let mut versions = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(version) = parse_version(stem) {
                versions.push((version, path));
            }
        }
        versions.sort_by(|a, b| b.cmp(a));
        Ok(versions)
    }

    fn render_version_group(major: u64, minor: u64, files: &[(Version, PathBuf)]) -> Vec<Node> {
        let mut children = vec![Node::Title(format!("Version {major}.{minor}"))];
        children.extend(
            files
                .iter()
                .map(|(_, path)| Node::Include { path: path.clone() }),
        );
        vec![
            Node::Target {
                refid: format!("v{major}-{minor}"),
                names: vec![format!("v{major}.{minor}")],
            },
            Node::Section {
                names: vec![format!("version {major}.{minor}")],
                children,
            },
        ]
    }
}

impl Directive for ReleaseNotes {
    fn run(&self, ctx: &DirectiveContext) -> Result<Vec<Node>, DirectiveError> {
        let arg = ctx
            .arguments
            .first()
            .ok_or_else(|| DirectiveError::Message("missing directory argument".to_owned()))?;
        let mut dir = PathBuf::from(arg);
        if dir.is_relative() {
            if !ctx.source_file.is_file() {
                return Err(DirectiveError::Message(format!(
                    "Cannot find relative path to: {}",
                    ctx.source_file.display()
                )));
            }
            let parent = ctx.source_file.parent().unwrap_or_else(|| ".".as_ref());
            dir = parent.join(arg);
        }
        if !dir.is_dir() {
            return Err(DirectiveError::Message(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        let versions = Self::version_files(&dir)?;
        let mut nodes = Vec::new();
        let mut group_start = 0;
        while group_start < versions.len() {
            let (major, minor) = {
                let v = &versions[group_start].0;
                (v.major, v.minor)
            };
            let group_end = versions[group_start..]
                .iter()
                .position(|(v, _)| (v.major, v.minor) != (major, minor))
                .map_or(versions.len(), |offset| group_start + offset);
            nodes.extend(Self::render_version_group(
                major,
                minor,
                &versions[group_start..group_end],
            ));
            group_start = group_end;
        }
        Ok(nodes)
    }
}

/// Add the `release-notes` directive.
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, SetupError> {
    app.add_directive("release-notes", ReleaseNotes);
    Ok(crate::metadata())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn notes_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.2.0.md", "1.2.1.md", "1.3.0.rst", "notes.md", "1.2.md"] {
            fs::write(dir.path().join(name), "content").unwrap();
        }
        fs::write(dir.path().join("index.rst"), ".. release-notes:: .").unwrap();
        dir
    }

    fn run(dir: &tempfile::TempDir, argument: &str) -> Result<Vec<Node>, DirectiveError> {
        ReleaseNotes.run(&DirectiveContext {
            arguments: vec![argument.to_owned()],
            source_file: dir.path().join("index.rst"),
            content_offset: 0,
        })
    }

    fn include_name(node: &Node) -> &str {
        let Node::Include { path } = node else {
            panic!("expected include, got {node:?}");
        };
        path.file_name().unwrap().to_str().unwrap()
    }

    #[test]
    fn test_groups_by_minor_version_descending() {
        let dir = notes_dir();
        let nodes = run(&dir, ".").unwrap();
        assert_eq!(nodes.len(), 4);

        let Node::Target { refid, names } = &nodes[0] else {
            panic!("expected target");
        };
        assert_eq!(refid, "v1-3");
        assert_eq!(names, &["v1.3"]);
        let Node::Section { names, children } = &nodes[1] else {
            panic!("expected section");
        };
        assert_eq!(names, &["version 1.3"]);
        assert_eq!(children[0], Node::Title("Version 1.3".to_owned()));
        assert_eq!(include_name(&children[1]), "1.3.0.rst");

        let Node::Section { children, .. } = &nodes[3] else {
            panic!("expected section");
        };
        assert_eq!(include_name(&children[1]), "1.2.1.md");
        assert_eq!(include_name(&children[2]), "1.2.0.md");
    }

    #[test]
    fn test_partial_versions_ignored() {
        let dir = notes_dir();
        let nodes = run(&dir, ".").unwrap();
        for node in &nodes {
            if let Node::Section { children, .. } = node {
                for child in &children[1..] {
                    assert_ne!(include_name(child), "1.2.md");
                    assert_ne!(include_name(child), "notes.md");
                }
            }
        }
    }

    #[test]
    fn test_missing_directory_errors() {
        let dir = notes_dir();
        let err = run(&dir, "nonexistent").unwrap_err();
        assert!(err.to_string().starts_with("Not a directory: "));
    }

    #[test]
    fn test_relative_dir_needs_real_source_file() {
        let err = ReleaseNotes
            .run(&DirectiveContext {
                arguments: vec![".".to_owned()],
                source_file: PathBuf::from("/nonexistent/index.rst"),
                content_offset: 0,
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("Cannot find relative path to: "));
    }

    #[test]
    fn test_directive_registered() {
        let mut app = App::new();
        setup(&mut app).unwrap();
        let dir = notes_dir();
        let nodes = app
            .run_directive(
                "release-notes",
                &DirectiveContext {
                    arguments: vec![dir.path().to_str().unwrap().to_owned()],
                    source_file: PathBuf::from("index.rst"),
                    content_offset: 0,
                },
            )
            .unwrap();
        assert!(!nodes.is_empty());
    }
}
