use crate::error::{FameError, Result};

/// Lower-cased language name → file extensions (with leading dot).
static LANGUAGE_EXTENSIONS: &[(&str, &[&str])] = &[
    ("c",            &[".c", ".h"]),
    ("c++",          &[".cpp", ".cc", ".cxx", ".c++", ".hpp", ".hh", ".hxx", ".h++", ".inl"]),
    ("c#",           &[".cs", ".csx"]),
    ("clojure",      &[".clj", ".cljs", ".cljc", ".edn"]),
    ("css",          &[".css"]),
    ("dart",         &[".dart"]),
    ("dockerfile",   &[".dockerfile"]),
    ("elixir",       &[".ex", ".exs"]),
    ("erlang",       &[".erl", ".hrl"]),
    ("go",           &[".go"]),
    ("go module",    &[".mod"]),
    ("haskell",      &[".hs", ".lhs"]),
    ("html",         &[".html", ".htm", ".xhtml"]),
    ("java",         &[".java"]),
    ("javascript",   &[".js", ".cjs", ".mjs", ".jsx"]),
    ("json",         &[".json"]),
    ("kotlin",       &[".kt", ".kts"]),
    ("lua",          &[".lua"]),
    ("makefile",     &[".mk", ".mak"]),
    ("markdown",     &[".md", ".markdown"]),
    ("objective-c",  &[".m"]),
    ("perl",         &[".pl", ".pm"]),
    ("php",          &[".php"]),
    ("protocol buffer", &[".proto"]),
    ("python",       &[".py", ".pyi", ".pyw"]),
    ("r",            &[".r"]),
    ("ruby",         &[".rb", ".rake", ".gemspec"]),
    ("rust",         &[".rs"]),
    ("scala",        &[".scala", ".sc"]),
    ("shell",        &[".sh", ".bash", ".zsh"]),
    ("sql",          &[".sql"]),
    ("swift",        &[".swift"]),
    ("toml",         &[".toml"]),
    ("typescript",   &[".ts", ".tsx", ".mts", ".cts"]),
    ("xml",          &[".xml", ".xsd", ".xsl"]),
    ("yaml",         &[".yml", ".yaml"]),
];

/// Resolves language names (case-insensitive) to their extensions.
///
/// Every unknown name is reported in one error so the user can fix them all
/// at once.
pub fn extensions_for(languages: &[String]) -> Result<Vec<String>> {
    let mut extensions = Vec::new();
    let mut unknown = Vec::new();

    for language in languages {
        let wanted = language.trim().to_lowercase();
        match LANGUAGE_EXTENSIONS.iter().find(|(name, _)| *name == wanted) {
            Some((_, exts)) => extensions.extend(exts.iter().map(|e| e.to_string())),
            None => unknown.push(language.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(FameError::UnsupportedLanguages(unknown));
    }
    Ok(extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let exts = extensions_for(&langs(&["Go", "RUST"])).expect("known languages");
        assert!(exts.contains(&".go".to_string()));
        assert!(exts.contains(&".rs".to_string()));
    }

    #[test]
    fn test_unknown_languages_are_all_reported() {
        let err = extensions_for(&langs(&["go", "klingon", "elvish"])).unwrap_err();
        match &err {
            FameError::UnsupportedLanguages(names) => assert_eq!(names, &langs(&["klingon", "elvish"])),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.is_configuration());
        assert!(err.to_string().contains("klingon, elvish"));
    }

    #[test]
    fn test_every_extension_has_leading_dot() {
        for (lang, exts) in LANGUAGE_EXTENSIONS.iter() {
            assert!(!exts.is_empty(), "{lang} has no extensions");
            for ext in exts.iter() {
                assert!(ext.starts_with('.'), "{lang}: {ext} must start with '.'");
            }
        }
    }
}
