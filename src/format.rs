//! Markup formatting for provider text.
//!
//! The provider answers with a small markdown subset: `**strong**`, `*em*`
//! and newlines. Text is parsed into an inline tree first and rendered
//! afterwards, so every text node is escaped on the way out.

use colored::Colorize;

/// One inline node of formatted summary text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    LineBreak,
}

/// Parsed summary text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub nodes: Vec<Inline>,
}

/// Parse provider text and render it as HTML markup.
pub fn format_summary(raw: &str) -> String {
    Markup::parse(raw).to_html()
}

impl Markup {
    /// Parse raw provider text. Never fails: unmatched asterisks stay literal.
    pub fn parse(raw: &str) -> Self {
        let mut nodes = Vec::new();
        for (i, line) in raw.split('\n').enumerate() {
            if i > 0 {
                nodes.push(Inline::LineBreak);
            }
            parse_line(line, &mut nodes);
        }
        Markup { nodes }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            render_html(node, &mut out);
        }
        out
    }

    /// Render with ANSI bold/italic for a terminal
    pub fn to_terminal(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            render_terminal(node, Style::default(), &mut out);
        }
        out
    }

    /// Text content only, emphasis dropped
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            render_plain(node, &mut out);
        }
        out
    }
}

enum Token {
    Text(String),
    Star,
    Node(Inline),
}

/// Carriage returns and Unicode line/paragraph separators end a pairing run
/// without producing a break; they are kept as text.
const RUN_BOUNDARIES: [char; 3] = ['\r', '\u{2028}', '\u{2029}'];

fn parse_line(line: &str, nodes: &mut Vec<Inline>) {
    let mut rest = line;
    while let Some(pos) = rest.find(RUN_BOUNDARIES) {
        let boundary = rest[pos..].chars().next().unwrap_or('\r');
        append(nodes, parse_run(&rest[..pos]));
        push_text(nodes, boundary.to_string());
        rest = &rest[pos + boundary.len_utf8()..];
    }
    append(nodes, parse_run(rest));
}

fn append(nodes: &mut Vec<Inline>, more: Vec<Inline>) {
    for node in more {
        match node {
            Inline::Text(text) => push_text(nodes, text),
            other => nodes.push(other),
        }
    }
}

/// Strong spans first (leftmost `**`, shortest close), then emphasis pairs
/// over what is left.
fn parse_run(line: &str) -> Vec<Inline> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        push_text_tokens(&rest[..open], &mut tokens);
        let inner = emphasize(text_tokens(&after[..close]));
        tokens.push(Token::Node(Inline::Strong(inner)));
        rest = &after[close + 2..];
    }
    push_text_tokens(rest, &mut tokens);

    emphasize(tokens)
}

fn text_tokens(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_text_tokens(s, &mut tokens);
    tokens
}

fn push_text_tokens(s: &str, tokens: &mut Vec<Token>) {
    for (i, part) in s.split('*').enumerate() {
        if i > 0 {
            tokens.push(Token::Star);
        }
        if !part.is_empty() {
            tokens.push(Token::Text(part.to_string()));
        }
    }
}

/// Pair stars left to right; anything between a pair becomes emphasis.
fn emphasize(tokens: Vec<Token>) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut open: Option<Vec<Inline>> = None;

    for token in tokens {
        let target = open.as_mut().unwrap_or(&mut out);
        match token {
            Token::Text(text) => push_text(target, text),
            Token::Node(node) => target.push(node),
            Token::Star => match open.take() {
                Some(inner) => out.push(Inline::Emphasis(inner)),
                None => open = Some(Vec::new()),
            },
        }
    }

    // Unpaired star stays literal
    if let Some(inner) = open {
        push_text(&mut out, "*".to_string());
        for node in inner {
            match node {
                Inline::Text(text) => push_text(&mut out, text),
                other => out.push(other),
            }
        }
    }

    out
}

fn push_text(nodes: &mut Vec<Inline>, text: String) {
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        last.push_str(&text);
    } else {
        nodes.push(Inline::Text(text));
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

fn render_html(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => escape_html(text, out),
        Inline::Strong(children) => {
            out.push_str("<strong>");
            children.iter().for_each(|c| render_html(c, out));
            out.push_str("</strong>");
        }
        Inline::Emphasis(children) => {
            out.push_str("<em>");
            children.iter().for_each(|c| render_html(c, out));
            out.push_str("</em>");
        }
        Inline::LineBreak => out.push_str("<br>"),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Style {
    bold: bool,
    italic: bool,
}

fn render_terminal(node: &Inline, style: Style, out: &mut String) {
    match node {
        Inline::Text(text) => {
            let mut styled = text.normal();
            if style.bold {
                styled = styled.bold();
            }
            if style.italic {
                styled = styled.italic();
            }
            out.push_str(&styled.to_string());
        }
        Inline::Strong(children) => {
            let inner = Style { bold: true, ..style };
            children.iter().for_each(|c| render_terminal(c, inner, out));
        }
        Inline::Emphasis(children) => {
            let inner = Style { italic: true, ..style };
            children.iter().for_each(|c| render_terminal(c, inner, out));
        }
        Inline::LineBreak => out.push('\n'),
    }
}

fn render_plain(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => out.push_str(text),
        Inline::Strong(children) | Inline::Emphasis(children) => {
            children.iter().for_each(|c| render_plain(c, out));
        }
        Inline::LineBreak => out.push('\n'),
    }
}
