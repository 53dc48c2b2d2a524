//! Include/exclude rule matching over request methods and URLs.
//!
//! A rule is a pair of optional case-insensitive regexes with a fixed
//! precedence: an include match always wins, an exclude match rejects
//! everything the include does not rescue, and no patterns at all means
//! "allowed".

use regex::{Regex, RegexBuilder};

/// Compile a pattern the way every tracker rule is compiled: case-insensitive,
/// built exactly once at configuration time.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A compiled exclude/include pattern pair.
#[derive(Debug, Clone, Default)]
pub struct IncludeExclude {
    exclude: Option<Regex>,
    include: Option<Regex>,
}

impl IncludeExclude {
    /// Compile both patterns. Used directly by tests; the tracker compiles
    /// field-by-field for precise configuration errors.
    pub fn new(exclude: Option<&str>, include: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            exclude: exclude.map(compile).transpose()?,
            include: include.map(compile).transpose()?,
        })
    }

    /// Build from already-compiled patterns.
    pub fn from_compiled(exclude: Option<Regex>, include: Option<Regex>) -> Self {
        Self { exclude, include }
    }

    /// Evaluate the pair against one input.
    ///
    /// `exclude_test` passes when no exclude pattern is configured or the
    /// input does not match it; `include_test` passes only when an include
    /// pattern is configured and the input matches. The result is the OR of
    /// the two, so an include match overrides any exclusion.
    pub fn matches(&self, input: &str) -> bool {
        let exclude_test = !self
            .exclude
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(input));
        let include_test = self
            .include
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(input));

        exclude_test || include_test
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(exclude: Option<&str>, include: Option<&str>) -> IncludeExclude {
        IncludeExclude::new(exclude, include).unwrap()
    }

    #[test]
    fn no_patterns_allows_everything() {
        assert!(rule(None, None).matches("/anything"));
        assert!(rule(None, None).matches(""));
    }

    #[test]
    fn exclude_rejects_matching_input() {
        let r = rule(Some("^/internal"), None);
        assert!(!r.matches("/internal/metrics"));
        assert!(r.matches("/public"));
    }

    #[test]
    fn include_overrides_exclude() {
        let r = rule(Some(".*"), Some("^/keep"));
        assert!(r.matches("/keep/this"));
        assert!(!r.matches("/drop/this"));
    }

    #[test]
    fn include_without_exclude_is_not_a_filter() {
        // Absence of an exclude pattern defaults to "allowed"; the include
        // pattern only ever rescues, it never rejects.
        let r = rule(None, Some("^/only"));
        assert!(r.matches("/only/path"));
        assert!(r.matches("/anything/else"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let r = rule(Some("^/admin"), None);
        assert!(!r.matches("/ADMIN/panel"));

        let r = rule(Some(".*"), Some("^post$"));
        assert!(r.matches("POST"));
        assert!(!r.matches("GET"));
    }

    #[test]
    fn invalid_pattern_is_a_compile_error() {
        assert!(IncludeExclude::new(Some("["), None).is_err());
        assert!(IncludeExclude::new(None, Some("(unclosed")).is_err());
    }
}
