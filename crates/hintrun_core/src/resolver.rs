//! Configuration cascade.
//!
//! Lookup order for a source file:
//! 1. `<plugin dir>/.jshintrc`, the tool-level defaults, always applied first
//! 2. The nearest of, walking from the source file's directory up to the
//!    filesystem root and then the user's home directory:
//!    `.jshintrc`, or `package.json` with a `jshintConfig` section
//!
//! Only the nearest configuration is applied; directories further up are not
//! merged in. A file that fails to load is reported and skipped.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::parse_object;
use crate::{ConfigError, Configuration, Fragment, JSHINTRC, MANIFEST_KEY, PACKAGE_JSON};

/// Maximum length of an `extends` chain.
pub const MAX_EXTENDS_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    /// A dedicated `.jshintrc`-style file.
    Dedicated,
    /// A package manifest; only its nested section is configuration.
    Manifest,
}

/// Outcome of resolving the configuration for one source file.
#[derive(Debug, Default)]
pub struct Resolution {
    /// The effective configuration.
    pub configuration: Configuration,
    /// Files that failed to load, in the order they were encountered.
    pub warnings: Vec<ConfigError>,
    /// Files that contributed to the configuration, bases before the files
    /// extending them.
    pub applied: Vec<PathBuf>,
}

impl Resolution {
    /// User-facing notices for every file that failed to load.
    pub fn notices(&self) -> impl Iterator<Item = String> + '_ {
        self.warnings.iter().map(ConfigError::notice)
    }
}

/// Resolves the effective configuration for source files.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    plugin_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl ConfigResolver {
    /// Creates a resolver whose tool-level defaults live in `plugin_dir`.
    ///
    /// The home directory defaults to the current user's.
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: Some(plugin_dir.into()),
            home_dir: dirs::home_dir(),
            config_file: None,
        }
    }

    /// Creates a resolver without tool-level defaults.
    pub fn without_plugin_dir() -> Self {
        Self {
            plugin_dir: None,
            home_dir: dirs::home_dir(),
            config_file: None,
        }
    }

    /// Overrides the home directory that ends the cascade.
    pub fn with_home_dir(mut self, home_dir: Option<PathBuf>) -> Self {
        self.home_dir = home_dir;
        self
    }

    /// Uses `path` instead of searching the cascade.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Directories searched for `source_path`, nearest first, ending with the
    /// home directory unless the walk already passed through it.
    pub fn candidate_locations(&self, source_path: &Path) -> Vec<PathBuf> {
        let absolute = std::path::absolute(source_path)
            .map(|p| normalize(&p))
            .unwrap_or_else(|_| source_path.to_path_buf());
        let start = absolute.parent().unwrap_or(&absolute);

        let mut locations: Vec<PathBuf> = start.ancestors().map(Path::to_path_buf).collect();
        if let Some(home) = &self.home_dir
            && !locations.contains(home)
        {
            locations.push(home.clone());
        }
        locations
    }

    /// Resolves the effective configuration for `source_path`.
    ///
    /// Never fails; files that cannot be loaded are listed in
    /// [`Resolution::warnings`].
    pub fn resolve(&self, source_path: &Path) -> Resolution {
        let mut loader = Loader::new(self.home_dir.as_deref());
        let mut configuration = Configuration::new();

        if let Some(plugin_dir) = &self.plugin_dir {
            let defaults = plugin_dir.join(JSHINTRC);
            if defaults.is_file()
                && let Some(fragment) = loader.load(&defaults, FileKind::Dedicated)
            {
                debug!("Applied tool defaults from {}", defaults.display());
                configuration.apply(fragment);
            }
        }

        let nearest = match &self.config_file {
            Some(path) => loader.load(path, FileKind::Dedicated),
            None => self
                .candidate_locations(source_path)
                .iter()
                .find_map(|dir| loader.load_nearest(dir)),
        };

        match nearest {
            Some(fragment) => configuration.apply(fragment),
            None => debug!("No configuration found for {}", source_path.display()),
        }

        Resolution {
            configuration,
            warnings: loader.warnings,
            applied: loader.applied,
        }
    }
}

struct Loader<'a> {
    home_dir: Option<&'a Path>,
    warnings: Vec<ConfigError>,
    applied: Vec<PathBuf>,
}

impl<'a> Loader<'a> {
    fn new(home_dir: Option<&'a Path>) -> Self {
        Self {
            home_dir,
            warnings: Vec::new(),
            applied: Vec::new(),
        }
    }

    fn report(&mut self, error: ConfigError) {
        warn!("{}", error);
        self.warnings.push(error);
    }

    /// Loads the configuration held in `dir`, if any.
    fn load_nearest(&mut self, dir: &Path) -> Option<Fragment> {
        debug!("Searching for config in {}", dir.display());

        let rc = dir.join(JSHINTRC);
        if rc.is_file()
            && let Some(fragment) = self.load(&rc, FileKind::Dedicated)
        {
            return Some(fragment);
        }

        let manifest = dir.join(PACKAGE_JSON);
        if manifest.is_file() {
            return self.load(&manifest, FileKind::Manifest);
        }

        None
    }

    /// Loads `path` and everything it extends. Returns `None` when the file
    /// failed to load or holds no configuration.
    fn load(&mut self, path: &Path, kind: FileKind) -> Option<Fragment> {
        let mut visited = Vec::new();
        match self.load_with_extends(path, kind, &mut visited) {
            Ok(Some(fragment)) => {
                info!("Using config: {}", path.display());
                Some(fragment)
            }
            Ok(None) => None,
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    fn load_with_extends(
        &mut self,
        path: &Path,
        kind: FileKind,
        visited: &mut Vec<PathBuf>,
    ) -> Result<Option<Fragment>, ConfigError> {
        let canonical = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if visited.contains(&canonical) {
            return Err(ConfigError::CircularExtends {
                path: path.to_path_buf(),
                chain: visited.clone(),
            });
        }
        if visited.len() >= MAX_EXTENDS_DEPTH {
            return Err(ConfigError::ExtendsDepthExceeded {
                path: path.to_path_buf(),
                max_depth: MAX_EXTENDS_DEPTH,
            });
        }
        visited.push(canonical);

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut object = parse_object(&content, path)?;

        if kind == FileKind::Manifest {
            match object.remove(MANIFEST_KEY) {
                Some(Value::Object(nested)) => object = nested,
                _ => {
                    debug!("No {} section in {}", MANIFEST_KEY, path.display());
                    return Ok(None);
                }
            }
        }

        let mut fragment = Fragment::from_object(object);

        if let Some(target) = fragment.extends.take() {
            let base_path = resolve_extends_path(&target, path, self.home_dir);
            debug!(
                "Config {} extends {}, loading base first",
                path.display(),
                base_path.display()
            );

            match self.load_with_extends(&base_path, FileKind::Dedicated, visited) {
                Ok(Some(base)) => fragment = base.overlay(fragment),
                Ok(None) => {}
                Err(e) => self.report(e),
            }
        }

        self.applied.push(path.to_path_buf());
        Ok(Some(fragment))
    }
}

/// Resolves an `extends` target relative to the file declaring it.
///
/// - `~/` prefix: expanded to the home directory
/// - Relative paths: resolved against the declaring file's directory
/// - Absolute paths: used as-is
fn resolve_extends_path(target: &str, declaring_file: &Path, home_dir: Option<&Path>) -> PathBuf {
    if let (Some(rest), Some(home)) = (target.strip_prefix("~/"), home_dir) {
        return home.join(rest);
    }

    let path = Path::new(target);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let dir = declaring_file.parent().unwrap_or(Path::new("."));
    normalize(&dir.join(path))
}

/// Removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
