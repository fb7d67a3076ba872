//! GitHub URLs for documented objects.
//!
//! Registers a `github_url` role that turns a qualified name into a link to
//! the defining source file on GitHub, with a line-range fragment when the
//! exact lines are known. The repository base URL comes from the theme
//! configuration: either the `html_context` style (`github_user`,
//! `github_repo`, `github_version`) or the `html_theme_options` style
//! (`repository_url`, `repository_branch`).

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::json;
use thiserror::Error;
use tidydoc_host::{App, Config, ExtensionMetadata, Node, Rebuild, SetupError};

pub const NAME: &str = "tidydoc.rtd_github_links";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'%');

/// A qualified name that no registered source location covers.
#[derive(Error, Debug)]
#[error("cannot resolve '{0}' to a source location")]
pub struct LinkError(pub String);

/// Where one documented object lives in the source tree.
#[derive(Debug, Clone)]
struct SourceLocation {
    module: String,
    lines: Option<(usize, usize)>,
}

/// Source locations gathered while documenting.
///
/// Modules map to their file path relative to the repository root prefix;
/// objects map to their module plus the line range of their definition.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    modules: BTreeMap<String, String>,
    objects: BTreeMap<String, SourceLocation>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and its slash-separated file path.
    pub fn add_module(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.modules.insert(name.into(), path.into());
    }

    /// Register an object with its defining module and line range.
    pub fn add_object(
        &mut self,
        qualname: impl Into<String>,
        module: impl Into<String>,
        lines: Option<(usize, usize)>,
    ) {
        self.objects
            .insert(qualname.into(), SourceLocation { module: module.into(), lines });
    }

    /// Resolve a qualified name to a file path and optional line range.
    ///
    /// Objects are looked up directly; anything else is reduced to its
    /// longest registered module prefix.
    fn resolve(&self, qualname: &str) -> Result<(&str, Option<(usize, usize)>), LinkError> {
        if let Some(location) = self.objects.get(qualname) {
            let path = self
                .modules
                .get(&location.module)
                .ok_or_else(|| LinkError(qualname.to_owned()))?;
            return Ok((path, location.lines));
        }
        let mut modname = qualname;
        loop {
            if let Some(path) = self.modules.get(modname) {
                return Ok((path, None));
            }
            let Some((parent, _)) = modname.rsplit_once('.') else {
                return Err(LinkError(qualname.to_owned()));
            };
            modname = parent;
        }
    }
}

/// The configured link builder, frozen at config-inited time.
pub struct GithubLinks {
    base_url: String,
    prefix: String,
    registry: SourceRegistry,
}

impl GithubLinks {
    /// The GitHub URL for an object's qualified name.
    pub fn url(&self, qualname: &str) -> Result<String, LinkError> {
        let (path, lines) = self.registry.resolve(qualname)?;
        let path: Vec<String> = self
            .prefix
            .split('/')
            .chain(path.split('/'))
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();
        let fragment = match lines {
            Some((start, end)) => format!("#L{start}-L{end}"),
            None => String::new(),
        };
        Ok(format!("{}/{}{fragment}", self.base_url, path.join("/")))
    }

    /// Resolver for the host's linkcode integration.
    ///
    /// Only the `py` domain is linked; other domains get no source link.
    #[must_use]
    pub fn linkcode_resolve(&self, domain: &str, module: &str, fullname: &str) -> Option<String> {
        if domain != "py" || module.is_empty() {
            return None;
        }
        self.url(&format!("{module}.{fullname}")).ok()
    }
}

/// Derive the repository base URL from the theme configuration.
fn infer_base_url(config: &Config) -> Result<String, SetupError> {
    let context_keys = ["github_user", "github_repo", "github_version"];
    let theme_keys = ["repository_url", "repository_branch"];

    if context_keys.iter().all(|k| config.html_context.contains_key(*k)) {
        return Ok(format!(
            "https://github.com/{}/{}/tree/{}",
            config.html_context["github_user"],
            config.html_context["github_repo"],
            config.html_context["github_version"],
        ));
    }
    if theme_keys.iter().all(|k| config.html_theme_options.contains_key(*k)) {
        return Ok(format!(
            "{}/tree/{}",
            config.html_theme_options["repository_url"],
            config.html_theme_options["repository_branch"],
        ));
    }

    let missing_context: Vec<_> = context_keys
        .iter()
        .filter(|k| !config.html_context.contains_key(**k))
        .collect();
    let missing_theme: Vec<_> = theme_keys
        .iter()
        .filter(|k| !config.html_theme_options.contains_key(**k))
        .collect();
    Err(SetupError::Config(format!(
        "extension {NAME} needs html_context {missing_context:?} \
         or html_theme_options {missing_theme:?} to be defined"
    )))
}

/// Register the `github_url` role and the linkcode resolver state.
///
/// Returns a handle to the link builder; it is populated when the
/// config-inited hooks run.
pub fn setup(
    app: &mut App,
    registry: SourceRegistry,
) -> Result<Rc<OnceCell<GithubLinks>>, SetupError> {
    app.config
        .add_value("rtd_links_prefix", json!("."), Rebuild::None);

    let state: Rc<OnceCell<GithubLinks>> = Rc::new(OnceCell::new());

    {
        let state = Rc::clone(&state);
        let registry = std::cell::RefCell::new(Some(registry));
        app.on_config_inited(move |config| {
            let base_url = infer_base_url(config)?;
            let prefix: String = config.get("rtd_links_prefix")?;
            if let Some(registry) = registry.borrow_mut().take() {
                let _ = state.set(GithubLinks { base_url, prefix, registry });
            }
            Ok(())
        });
    }

    {
        let state = Rc::clone(&state);
        app.add_role("github_url", move |qualname| {
            match state.get().and_then(|links| links.url(qualname).ok()) {
                Some(url) => Node::Raw(url),
                None => Node::text(""),
            }
        });
    }

    Ok(state)
}

/// Register and report extension metadata.
pub fn setup_with_metadata(
    app: &mut App,
    registry: SourceRegistry,
) -> Result<ExtensionMetadata, SetupError> {
    setup(app, registry)?;
    Ok(crate::metadata())
}
