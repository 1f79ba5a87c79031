use html_escape::encode_text;

use crate::app_config::ThemeConfig;
use crate::diff::{DiffTag, RenderInstruction};
use crate::render::Renderer;

// @const: Title used when none is set
const DEFAULT_TITLE: &str = "Subtitle changes";

/// Standalone HTML page with coloured line backgrounds
#[derive(Debug)]
pub struct HtmlRenderer {
    // @field: Colours and font
    theme: ThemeConfig,

    // @field: Page title
    title: String,

    // @field: Rendered lines
    body: String,
}

impl HtmlRenderer {
    pub fn new(theme: ThemeConfig) -> Self {
        Self {
            theme,
            title: DEFAULT_TITLE.to_string(),
            body: String::new(),
        }
    }

    // @sets: Page title, usually the two compared file names
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn colors_for(&self, tag: DiffTag) -> Option<(&str, &str)> {
        match tag {
            DiffTag::Unchanged => None,
            DiffTag::Removed => Some((self.theme.removed.as_str(), self.theme.removed_highlight.as_str())),
            DiffTag::Added => Some((self.theme.added.as_str(), self.theme.added_highlight.as_str())),
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, instruction: &RenderInstruction) {
        let mut line = String::new();

        match self.colors_for(instruction.tag) {
            None => {
                line.push_str(instruction.prefix());
                line.push_str(&encode_text(&instruction.line));
            }
            Some((background, highlight)) => {
                line.push_str(&format!("<span style=\"background-color: {}\">", background));
                line.push_str(instruction.prefix());
                for (text, highlighted) in instruction.segments() {
                    if highlighted {
                        line.push_str(&format!(
                            "<span style=\"background-color: {}\">{}</span>",
                            highlight,
                            encode_text(text)
                        ));
                    } else {
                        line.push_str(&encode_text(text));
                    }
                }
                line.push_str("</span>");
            }
        }

        self.body.push_str(&line);
        self.body.push('\n');
    }

    fn finish(&mut self) -> String {
        let body = std::mem::take(&mut self.body);
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title}</title>\n\
             </head>\n\
             <body style=\"background-color: {background}; color: {foreground};\">\n\
             <pre style=\"font-family: {font}, monospace; margin: 0;\">\n\
             {body}</pre>\n\
             </body>\n\
             </html>\n",
            title = encode_text(&self.title),
            background = self.theme.background,
            foreground = self.theme.foreground,
            font = encode_text(&self.theme.font_family),
            body = body,
        )
    }
}
