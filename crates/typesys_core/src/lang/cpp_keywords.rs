//! Host-language keyword vocabulary (for signature parameter-name detection).

/// Words that can end a type spelling, so a trailing one is never a parameter name.
pub const TYPE_WORDS: &[&str] = &[
    "bool", "char", "char16_t", "char32_t", "double", "float", "int", "long", "short", "signed", "unsigned", "void",
    "wchar_t", "const", "volatile",
];

/// Check whether `word` is part of a fundamental type spelling.
pub fn is_type_word(word: &str) -> bool {
    TYPE_WORDS.contains(&word)
}
