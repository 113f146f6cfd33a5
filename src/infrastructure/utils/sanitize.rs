use ammonia::Builder;
use std::collections::HashSet;

/// Strips all markup from user-submitted text, keeping the inner text.
pub fn sanitize_plain_text(input: &str) -> String {
    Builder::default()
        .tags(HashSet::new())
        .clean(input.trim())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_tags_and_scripts() {
        assert_eq!(sanitize_plain_text("  <b>Janez</b> Novak "), "Janez Novak");
        assert_eq!(sanitize_plain_text("Hi<script>alert(1)</script>"), "Hi");
    }
}
