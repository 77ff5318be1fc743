use console::{Style, style};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Render markdown as styled terminal text
pub fn render(input: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(input, options);

    let mut state = RenderState::new();
    for event in parser {
        state.handle(event);
    }
    state.finish()
}

struct RenderState {
    lines: Vec<String>,
    style_stack: Vec<Style>,
    links: Vec<String>,
    list_stack: Vec<Option<u64>>,
    blockquote_depth: usize,
}

impl RenderState {
    fn new() -> Self {
        Self {
            lines: vec![String::new()],
            style_stack: vec![Style::new()],
            links: Vec::new(),
            list_stack: Vec::new(),
            blockquote_depth: 0,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(text) => self.push_raw(&style(text.to_string()).cyan().to_string()),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::SoftBreak | Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.ensure_blank_line();
                self.push_raw(&style("-".repeat(40)).dim().to_string());
                self.new_line();
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.ensure_blank_line();
                self.push_style(heading_style(level));
            }
            Tag::Emphasis => self.push_style(Style::new().italic()),
            Tag::Strong => self.push_style(Style::new().bold()),
            Tag::Strikethrough => self.push_style(Style::new().strikethrough()),
            Tag::BlockQuote(_) => {
                self.ensure_blank_line();
                self.blockquote_depth += 1;
                self.push_quote_prefix();
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.ensure_blank_line();
                }
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.start_block_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push_raw(&format!("{}{}", indent, marker));
            }
            Tag::CodeBlock(_) => {
                self.ensure_blank_line();
                self.push_style(Style::new().cyan());
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                self.push_style(Style::new().underlined());
            }
            Tag::Paragraph => {
                if self.list_stack.is_empty() {
                    self.ensure_blank_line();
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.pop_style();
                self.new_line();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::BlockQuote(_) => {
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.new_line();
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.new_line();
                }
            }
            TagEnd::CodeBlock => {
                self.pop_style();
                self.trim_trailing_empty_line();
                self.new_line();
            }
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.links.pop() {
                    self.push_raw(&style(format!(" ({})", url)).dim().to_string());
                }
            }
            TagEnd::Paragraph => {
                if self.list_stack.is_empty() {
                    self.new_line();
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        while self.lines.len() > 1 && self.lines.last().is_some_and(|line| line.trim().is_empty()) {
            self.lines.pop();
        }
        while self.lines.len() > 1 && self.lines.first().is_some_and(|line| line.is_empty()) {
            self.lines.remove(0);
        }
        self.lines.join("\n")
    }

    fn current_line_is_empty(&self) -> bool {
        self.lines.last().is_none_or(|line| line.is_empty())
    }

    fn start_block_line(&mut self) {
        if !self.current_line_is_empty() {
            self.new_line();
        }
    }

    fn ensure_blank_line(&mut self) {
        if !self.current_line_is_empty() {
            self.new_line();
        }
        let previous_blank = self.lines.len() < 2
            || self
                .lines
                .get(self.lines.len() - 2)
                .is_some_and(|line| line.is_empty());
        if !previous_blank {
            self.new_line();
        }
    }

    fn trim_trailing_empty_line(&mut self) {
        if self.lines.len() > 1 && self.current_line_is_empty() {
            self.lines.pop();
        }
    }

    fn new_line(&mut self) {
        self.lines.push(String::new());
        self.push_quote_prefix();
    }

    fn push_quote_prefix(&mut self) {
        if self.blockquote_depth > 0 {
            let prefix = style("│ ".repeat(self.blockquote_depth)).dim().to_string();
            self.push_raw(&prefix);
        }
    }

    fn push_style(&mut self, extra: Style) {
        // console styles don't merge, so nested spans take the innermost style
        self.style_stack.push(extra);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        let current = self.style_stack.last().cloned().unwrap_or_else(Style::new);
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                self.push_raw(&current.apply_to(part).to_string());
            }
            if parts.peek().is_some() {
                self.new_line();
            }
        }
    }

    fn push_raw(&mut self, text: &str) {
        match self.lines.last_mut() {
            Some(line) => line.push_str(text),
            None => self.lines.push(text.to_string()),
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::new().bold().underlined(),
        HeadingLevel::H2 => Style::new().bold().magenta(),
        _ => Style::new().bold(),
    }
}
