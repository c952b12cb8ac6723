//! Helpers shared by every dialect writer

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::schema::ParamDef;

use super::output;
use super::template_engine::{TemplateEngine, WrapperContext};

/// Deduplicate parameters by name, keeping the last occurrence
///
/// Position follows the first occurrence so declaration order stays stable;
/// the definition itself comes from the last occurrence, letting a later
/// redeclaration refine an earlier one.
#[must_use]
pub fn dedup_by_name(params: &[ParamDef]) -> Vec<&ParamDef> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut ordered: Vec<&ParamDef> = Vec::with_capacity(params.len());
    for param in params {
        match seen.get(param.name.as_str()) {
            Some(&slot) => ordered[slot] = param,
            None => {
                seen.insert(param.name.as_str(), ordered.len());
                ordered.push(param);
            }
        }
    }
    ordered
}

/// Escape a value for embedding inside a double-quoted Ruby string literal
///
/// Besides the usual backslash escapes, `#{` must be neutralized or the
/// emitted literal would interpolate at proxy runtime.
#[must_use]
pub fn sanitize_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '#' if chars.peek() == Some(&'{') => out.push_str("\\#"),
            other => out.push(other),
        }
    }
    out
}

/// Human text for a parameter: its description, else its example
#[must_use]
pub fn description_text(param: &ParamDef) -> Option<String> {
    if let Some(description) = &param.description {
        return Some(description.clone());
    }
    param.example.as_ref().map(|example| format!("e.g. {example}"))
}

/// Clean a route description for embedding in a generated tool declaration
///
/// The leading path separator in fallback descriptions reads poorly in tool
/// listings, so the first slash becomes a space before literal escaping.
#[must_use]
pub fn clean_description(description: &str) -> String {
    sanitize_string_literal(&description.replacen('/', " ", 1))
}

/// Substitute `:name` placeholders in a path using a dialect-supplied renderer
///
/// Names are substituted longest first so `:id` never clobbers the prefix of
/// `:identifier` appearing in the same path.
#[must_use]
pub fn substitute_path(path: &str, names: &[String], render: impl Fn(&str) -> String) -> String {
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_by_key(|name| std::cmp::Reverse(name.len()));

    let mut out = path.to_string();
    for name in sorted {
        out = out.replace(&format!(":{name}"), &render(name));
    }
    out
}

/// Walk up from `start` looking for the nearest `Gemfile`
#[must_use]
pub fn find_nearest_gemfile(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join("Gemfile");
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

fn env_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

/// Locate an executable by name in a `PATH`-style search list
fn find_in_path(name: &str, search: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let search = search?;
    env::split_paths(search)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Resolve the interpreter the wrapper execs
///
/// An explicit `RUBY` override wins; otherwise the generating process's
/// `PATH` is searched so the emitted script carries an absolute path and
/// stays runnable from shells with a different `PATH`. The bare name is the
/// last resort when no installation can be found at generation time.
fn resolve_interpreter(override_bin: Option<&str>, search: Option<&std::ffi::OsStr>) -> String {
    if let Some(bin) = override_bin {
        if !bin.is_empty() {
            return bin.to_string();
        }
    }
    find_in_path("ruby", search)
        .map_or_else(|| "ruby".to_string(), |p| p.display().to_string())
}

/// Directory exported onto the wrapper's `PATH`, so sibling executables of
/// the pinned interpreter (`bundle`, `gem`) resolve alongside it
fn interpreter_dir(ruby_bin: &str) -> String {
    let path = Path::new(ruby_bin);
    if path.is_absolute() {
        path.parent().map(|dir| dir.display().to_string()).unwrap_or_default()
    } else {
        String::new()
    }
}

/// Emit the wrapper script launching a generated server with a pinned gem environment
///
/// The Ruby environment is captured at generation time: `BUNDLE_GEMFILE` from
/// the environment or the nearest Gemfile above the working directory,
/// `BUNDLE_PATH` falling back to `GEM_HOME`, and the interpreter resolved to
/// an absolute path with its directory prepended to the script's `PATH`.
/// Variables that resolve empty are omitted from the script rather than
/// exported blank.
///
/// # Errors
///
/// Returns a codegen error on template failure or an IO error if the file
/// cannot be written.
pub fn write_wrapper_script(
    engine: &TemplateEngine,
    config: &GeneratorConfig,
    group: Option<&str>,
) -> GenResult<PathBuf> {
    let config = config.for_group(group);
    let bundle_gemfile = match env::var("BUNDLE_GEMFILE") {
        Ok(path) if !path.is_empty() => path,
        _ => env::current_dir()
            .ok()
            .and_then(|dir| find_nearest_gemfile(&dir))
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    };
    let gem_home = env_or_empty("GEM_HOME");
    let bundle_path = match env_or_empty("BUNDLE_PATH") {
        path if path.is_empty() => gem_home.clone(),
        path => path,
    };
    let ruby_bin = resolve_interpreter(
        env::var("RUBY").ok().as_deref(),
        env::var_os("PATH").as_deref(),
    );
    let ruby_bin_dir = interpreter_dir(&ruby_bin);

    let context = WrapperContext {
        bundle_gemfile,
        gem_home,
        gem_path: env_or_empty("GEM_PATH"),
        bundle_path,
        ruby_bin,
        ruby_bin_dir,
        server_file: config.server_file_name(group),
    };

    let script = engine.render_wrapper(&context)?;
    let path = config.output_dir.join(config.wrapper_file_name(group));
    output::write_executable(&path, &script)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::params;

    #[test]
    fn test_dedup_keeps_last_definition_at_first_position() {
        let defs = params(|b| {
            b.string("name", true);
            b.integer("age", false);
            b.string("name", false).describe("refined");
        });
        let deduped = dedup_by_name(&defs);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "name");
        assert!(!deduped[0].required);
        assert_eq!(deduped[0].description.as_deref(), Some("refined"));
        assert_eq!(deduped[1].name, "age");
    }

    #[test]
    fn test_sanitize_string_literal() {
        assert_eq!(
            sanitize_string_literal("say \"hi\"\nto #{them}\\now"),
            "say \\\"hi\\\"\\nto \\#{them}\\\\now"
        );
        assert_eq!(sanitize_string_literal("plain"), "plain");
    }

    #[test]
    fn test_substitute_path_longest_name_first() {
        let names = vec!["id".to_string(), "identifier".to_string()];
        let out = substitute_path("/a/:identifier/b/:id", &names, |n| format!("#{{{n}}}"));
        assert_eq!(out, "/a/#{identifier}/b/#{id}");
    }

    #[test]
    fn test_find_nearest_gemfile_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gemfile"), "source \"https://rubygems.org\"\n").unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_nearest_gemfile(&nested), Some(dir.path().join("Gemfile")));
    }

    #[test]
    fn test_find_nearest_gemfile_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_nearest_gemfile(dir.path()), None);
    }

    #[test]
    fn test_resolve_interpreter_prefers_override() {
        let resolved = resolve_interpreter(Some("/opt/ruby/bin/ruby"), None);
        assert_eq!(resolved, "/opt/ruby/bin/ruby");
    }

    #[test]
    fn test_resolve_interpreter_searches_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ruby"), "#!/bin/sh\n").unwrap();
        let search = env::join_paths([dir.path()]).unwrap();

        let resolved = resolve_interpreter(None, Some(search.as_os_str()));
        assert_eq!(resolved, dir.path().join("ruby").display().to_string());
        assert!(Path::new(&resolved).is_absolute());
    }

    #[test]
    fn test_resolve_interpreter_falls_back_to_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        let search = env::join_paths([dir.path()]).unwrap();
        assert_eq!(resolve_interpreter(None, Some(search.as_os_str())), "ruby");
        assert_eq!(resolve_interpreter(None, None), "ruby");
    }

    #[test]
    fn test_interpreter_dir_only_for_absolute_paths() {
        assert_eq!(interpreter_dir("/opt/ruby/bin/ruby"), "/opt/ruby/bin");
        assert_eq!(interpreter_dir("ruby"), "");
    }
}
