use pulldown_cmark::{html, Options, Parser};

/// Renders Markdown to HTML. Raw HTML in the input is passed through unsanitized.
pub fn render(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);

    out
}
