/// Line break marker shared by every fragment.
pub const BR: &str = "<br/>";

/// Annotated text under construction: plain text plus a fixed set of markers.
#[derive(Debug, Default, Clone)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn h2(&mut self, text: &str) -> &mut Self {
        self.wrap("h2", text)
    }

    pub fn h3(&mut self, text: &str) -> &mut Self {
        self.wrap("h3", text)
    }

    pub fn h4(&mut self, text: &str) -> &mut Self {
        self.wrap("h4", text)
    }

    pub fn bold(&mut self, text: &str) -> &mut Self {
        self.wrap("b", text)
    }

    pub fn br(&mut self) -> &mut Self {
        self.buf.push_str(BR);
        self
    }

    /// Plain text or already-rendered markup, appended verbatim.
    pub fn push(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn wrap(&mut self, tag: &str, text: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.buf.push_str(text);
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }
}
