//! What the content scan looks at and what it looks for.

/// Source, markup, build-descriptor, and platform-project file extensions.
pub const SCANNED_EXTENSIONS: &[&str] = &["kt", "kts", "xml", "swift", "plist", "pro", "pbxproj"];

/// Directory names skipped at any depth below the scan root.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "build"];

/// Case-insensitive alternatives for a leftover template namespace or app name.
/// `com.template` only counts as a whole dotted token, so `com.templates` or
/// `com.mytemplate.app` do not match.
pub const MARKER_PATTERNS: &[&str] = &[
    r"com\.template\.",
    r"com\.template[^a-z0-9]",
    r"com\.template$",
    r"TemplateApp",
];

/// Lines containing any of these are known false positives. The Gradle wrapper
/// script mentions its own Groovy template.
pub const BENIGN_MARKERS: &[&str] = &["generated from the Groovy template"];

/// One regex source matching any marker, case-insensitively.
pub fn marker_regex_source() -> String {
    format!("(?i){}", MARKER_PATTERNS.join("|"))
}
