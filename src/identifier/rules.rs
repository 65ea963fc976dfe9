//! Declarative tables for identifier validation.

pub const PROJECT_NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9]*$";

/// Lowercase, at least two dot-separated segments, each starting with a letter.
pub const PACKAGE_NAME_PATTERN: &str = r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$";

/// Apple bundle identifiers allow mixed case and hyphens.
pub const BUNDLE_ID_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9-]*(\.[a-zA-Z][a-zA-Z0-9-]*)+$";

/// Longer package names run into file path limits on some build hosts.
pub const MAX_PACKAGE_NAME_LEN: usize = 100;

/// Leading namespaces owned by the platform and language libraries.
pub const RESERVED_PACKAGE_PREFIXES: &[&str] = &["java", "javax", "android", "kotlin", "kotlinx"];

/// Words that cannot appear as a package segment.
pub const RESERVED_KEYWORDS: &[&str] = &[
    // keywords
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    // literals
    "true",
    "false",
    "null",
    // reserved identifier
    "_",
    // contextual keywords
    "var",
    "yield",
    "record",
    "sealed",
    "permits",
];

pub fn is_reserved_keyword(segment: &str) -> bool {
    RESERVED_KEYWORDS.contains(&segment)
}

pub fn is_reserved_prefix(segment: &str) -> bool {
    RESERVED_PACKAGE_PREFIXES.contains(&segment)
}
