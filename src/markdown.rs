use pulldown_cmark::{html, Options, Parser};

/// Renders note Markdown to the HTML stored next to the source file.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraph() {
        assert_eq!(render_markdown("hello"), "<p>hello</p>\n");
    }

    #[test]
    fn renders_list() {
        let out = render_markdown("- buy milk");
        assert!(out.contains("<li>buy milk</li>"), "unexpected output: {out}");
    }

    #[test]
    fn renders_strikethrough() {
        let out = render_markdown("~~done~~");
        assert!(out.contains("<del>done</del>"), "unexpected output: {out}");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render_markdown(""), "");
    }
}
