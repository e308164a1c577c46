use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locates the [`syn::Path`] under which another crate is reachable from the
/// crate invoking a proc-macro.
///
/// ```rust
/// # use crunchy_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("crunchy_serialize"));
/// ```
///
/// Reading the manifest is not cheap. Call this once per macro invocation
/// and pass the result around.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the name begins with `crunchy_` and the facade crate `crunchy` is a
///    dependency, return `::crunchy::short_name`
///    (e.g. `crunchy_serialize` -> `::crunchy::serialize`).
/// 3. Repeat steps 1-2 in `dev-dependencies`.
/// 4. Otherwise fall back to `::crate_name`.
///
/// A crate referring to itself gets the fallback, so it needs
/// `extern crate self as crate_name;` in its root.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "crunchy";
const CRATE_PREFIX: &str = "crunchy_";

impl Manifest {
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(
        cargo_manifest_path: &Path,
    ) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_str<T: syn::parse::Parse>(path: &str) -> T {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_str(&format!("::{name}")));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            let mut path = Self::parse_str::<syn::Path>(&format!("::{FACADE_NAME}"));
            path.segments.push(Self::parse_str(module));
            return Some(path);
        }
        None
    }

    /// Return a [`syn::Path`] for the package named `name`. See the
    /// type-level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(table)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }

        Self::parse_str(&format!("::{name}"))
    }

    /// Runs `func` with the [`Manifest`] of the calling crate.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use toml_edit::Document;

    use super::Manifest;

    fn path_string(path: &syn::Path) -> String {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        format!("::{}", segments.join("::"))
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(Box::from(text)).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\ncrunchy_serialize = \"0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("crunchy_serialize")), "::crunchy_serialize");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dependencies]\ncrunchy = { path = \"..\" }\n");
        assert_eq!(path_string(&m.get_crate_path("crunchy_serialize")), "::crunchy::serialize");
    }

    #[test]
    fn dev_dependencies_and_fallback() {
        let m = manifest("[dev-dependencies]\ncrunchy = \"0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("crunchy_buffer")), "::crunchy::buffer");
        assert_eq!(path_string(&m.get_crate_path("serde")), "::serde");
    }
}
