use crate::diff::RenderInstruction;
use crate::render::Renderer;

/// Plain text output, one prefixed line per instruction
#[derive(Debug, Default)]
pub struct PlainTextRenderer {
    buffer: String,
}

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for PlainTextRenderer {
    fn render(&mut self, instruction: &RenderInstruction) {
        self.buffer.push_str(instruction.prefix());
        self.buffer.push_str(&instruction.line);
        self.buffer.push('\n');
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
