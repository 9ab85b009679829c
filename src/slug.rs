//! URL slug helpers

use rand::Rng;

/// Lowercase ASCII slug; non-ASCII letters are transliterated first
pub fn slugify(input: &str) -> String {
    ::slug::slugify(input)
}

/// Slug with an 8-char random hex suffix, used when the plain slug is taken
pub fn with_random_suffix(slug: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{:08x}", slug, suffix)
}
