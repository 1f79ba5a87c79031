/*!
 * Renderers turning classified diff lines into a document.
 *
 * Every output format implements the same [`Renderer`] trait, so the diff
 * core never knows how its result is displayed:
 * - `plain`: text with `- `, `+ ` and two-space prefixes (also used for `.diff` files)
 * - `html`: standalone HTML page using the configured theme
 * - `ansi`: coloured terminal output
 */

use anyhow::Result;
use std::fmt::Debug;

use crate::app_config::{OutputFormat, ThemeConfig};
use crate::diff::RenderInstruction;

pub use self::ansi::AnsiRenderer;
pub use self::html::HtmlRenderer;
pub use self::plain::PlainTextRenderer;

pub mod ansi;
pub mod html;
pub mod plain;

/// Common trait for all output formats
///
/// Instructions are fed one at a time in diff order; the finished document is
/// collected with [`Renderer::finish`].
pub trait Renderer: Debug {
    /// Append one classified line to the document
    fn render(&mut self, instruction: &RenderInstruction);

    /// Return the rendered document, leaving the renderer empty
    fn finish(&mut self) -> String;
}

/// Feed all instructions to a renderer and return the finished document
pub fn render_all(renderer: &mut dyn Renderer, instructions: &[RenderInstruction]) -> String {
    for instruction in instructions {
        renderer.render(instruction);
    }
    renderer.finish()
}

/// Create the renderer for an output format
pub fn create_renderer(format: OutputFormat, theme: &ThemeConfig) -> Result<Box<dyn Renderer>> {
    let renderer: Box<dyn Renderer> = match format {
        OutputFormat::Text | OutputFormat::Diff => Box::new(PlainTextRenderer::new()),
        OutputFormat::Html => Box::new(HtmlRenderer::new(theme.clone())),
        OutputFormat::Ansi => Box::new(AnsiRenderer::new(theme)?),
    };
    Ok(renderer)
}
