// Default-compiler resolution: from an explicit language id, or from the
// input file's extension. The network fetch and the interactive prompt
// sit behind traits so the rules stay testable without either.

use std::path::Path;

use anyhow::{Context, Result};

use crate::api::{ApiClient, ApiError, Language};

/// Source of language metadata. The API client is the production
/// implementation.
pub trait LanguageSource {
    fn languages(&self, fields: &[&str]) -> Result<Vec<Language>, ApiError>;
}

impl LanguageSource for ApiClient {
    fn languages(&self, fields: &[&str]) -> Result<Vec<Language>, ApiError> {
        ApiClient::languages(self, fields)
    }
}

/// Picks one compiler id when several languages claim the same file
/// extension.
pub trait Chooser {
    fn choose(&mut self, ext: &str, candidates: &[Language]) -> Result<String>;
}

/// Default compiler of the given language id, if the service knows it.
pub fn default_for_language(
    source: &impl LanguageSource,
    language: &str,
) -> Result<Option<String>> {
    let langs = source
        .languages(&["id", "defaultCompiler"])
        .context("Could not get the list of available languages")?;

    Ok(langs
        .into_iter()
        .find(|lang| lang.id == language)
        .map(|lang| lang.default_compiler))
}

/// Default compiler for the file's extension. Returns `None` when the
/// extension is missing or no language claims it.
pub fn default_for_file(
    source: &impl LanguageSource,
    path: &Path,
    chooser: &mut dyn Chooser,
) -> Result<Option<String>> {
    let Some(ext) = dotted_extension(path) else {
        return Ok(None);
    };

    // C++ toolchains also claim .c files; go straight to the C default.
    if ext == ".c" {
        return default_for_language(source, "c");
    }

    let langs = source
        .languages(&["name", "extensions", "defaultCompiler"])
        .context("Could not get the list of available languages")?;

    pick_by_extension(langs, &ext, chooser)
}

fn dotted_extension(path: &Path) -> Option<String> {
    path.extension().map(|ext| format!(".{}", ext.to_string_lossy()))
}

fn pick_by_extension(
    langs: Vec<Language>,
    ext: &str,
    chooser: &mut dyn Chooser,
) -> Result<Option<String>> {
    let mut candidates: Vec<Language> = langs
        .into_iter()
        .filter(|lang| lang.extensions.iter().any(|known| known == ext))
        .collect();

    match candidates.len() {
        0 => Ok(None),
        1 => Ok(Some(candidates.remove(0).default_compiler)),
        _ => chooser.choose(ext, &candidates).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn lang(id: &str, default: &str, extensions: &[&str]) -> Language {
        Language {
            id: id.into(),
            name: id.to_uppercase(),
            default_compiler: default.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Canned language list that records which fields each call asked for.
    struct FakeSource {
        langs: Vec<Language>,
        requests: RefCell<Vec<Vec<String>>>,
    }

    impl FakeSource {
        fn new(langs: Vec<Language>) -> FakeSource {
            FakeSource {
                langs,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl LanguageSource for FakeSource {
        fn languages(&self, fields: &[&str]) -> Result<Vec<Language>, ApiError> {
            self.requests
                .borrow_mut()
                .push(fields.iter().map(|field| field.to_string()).collect());
            Ok(self.langs.clone())
        }
    }

    /// Chooser that must never be consulted.
    struct NoChooser;

    impl Chooser for NoChooser {
        fn choose(&mut self, _ext: &str, _candidates: &[Language]) -> Result<String> {
            panic!("chooser should not be consulted");
        }
    }

    /// Chooser that always answers the same id.
    struct Scripted(&'static str);

    impl Chooser for Scripted {
        fn choose(&mut self, _ext: &str, candidates: &[Language]) -> Result<String> {
            assert!(candidates.len() > 1);
            Ok(self.0.into())
        }
    }

    fn catalog() -> Vec<Language> {
        vec![
            lang("c", "cg132", &[".c", ".h"]),
            lang("c++", "g132", &[".cpp", ".cc", ".h"]),
            lang("rust", "r1740", &[".rs"]),
        ]
    }

    #[test]
    fn explicit_language_resolves_its_default() {
        let source = FakeSource::new(catalog());
        let found = default_for_language(&source, "rust").unwrap();
        assert_eq!(found.as_deref(), Some("r1740"));
    }

    #[test]
    fn unknown_language_resolves_to_nothing() {
        let source = FakeSource::new(catalog());
        assert_eq!(default_for_language(&source, "cobol").unwrap(), None);
    }

    #[test]
    fn unique_extension_skips_the_prompt() {
        let source = FakeSource::new(catalog());
        let found =
            default_for_file(&source, Path::new("lib.rs"), &mut NoChooser).unwrap();
        assert_eq!(found.as_deref(), Some("r1740"));
    }

    #[test]
    fn unmatched_extension_resolves_to_nothing() {
        let source = FakeSource::new(catalog());
        let found =
            default_for_file(&source, Path::new("build.zig"), &mut NoChooser).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn missing_extension_resolves_without_a_fetch() {
        let source = FakeSource::new(catalog());
        let found = default_for_file(&source, Path::new("Makefile"), &mut NoChooser).unwrap();
        assert_eq!(found, None);
        assert!(source.requests.borrow().is_empty());
    }

    #[test]
    fn dot_c_goes_straight_to_the_c_default() {
        let source = FakeSource::new(catalog());
        let found =
            default_for_file(&source, Path::new("main.c"), &mut NoChooser).unwrap();
        assert_eq!(found.as_deref(), Some("cg132"));

        // One id lookup, never the extensions scan.
        let requests = source.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], vec!["id", "defaultCompiler"]);
    }

    #[test]
    fn ambiguous_extension_defers_to_the_chooser() {
        let source = FakeSource::new(catalog());
        let found =
            default_for_file(&source, Path::new("util.h"), &mut Scripted("g132")).unwrap();
        assert_eq!(found.as_deref(), Some("g132"));
    }
}
