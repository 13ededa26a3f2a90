#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    title: String,
    content: Vec<String>,
}

impl Notebook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Notes in the order they were added.
    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn add_content(&mut self, note: impl Into<String>) {
        self.content.push(note.into());
    }
}
