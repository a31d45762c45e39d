//! URL helpers.

/// Strip one trailing `/`, if present.
pub fn without_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_trailing_slash() {
        assert_eq!(without_trailing_slash("https://x/y/"), "https://x/y");
        assert_eq!(without_trailing_slash("https://x/y//"), "https://x/y/");
        assert_eq!(without_trailing_slash("https://x/y"), "https://x/y");
        assert_eq!(without_trailing_slash(""), "");
    }
}
