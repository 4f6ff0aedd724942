/// One documented invocation of an application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocExample {
    pub comment: String,
    pub parameters: Vec<(String, String)>,
}

impl DocExample {
    pub fn new(comment: impl Into<String>) -> Self {
        DocExample {
            comment: comment.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// `app -key value ...`, in declaration order.
    pub fn command_line(&self, application: &str) -> String {
        let mut line = application.to_string();
        for (key, value) in &self.parameters {
            line.push_str(" -");
            line.push_str(key);
            if !value.is_empty() {
                line.push(' ');
                line.push_str(value);
            }
        }
        line
    }
}

/// Documentation metadata built during `init`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDoc {
    pub long_description: String,
    pub limitations: String,
    pub authors: String,
    pub see_also: String,
    pub tags: Vec<String>,
    pub examples: Vec<DocExample>,
}

impl ApplicationDoc {
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn add_example(&mut self, example: DocExample) {
        self.examples.push(example);
    }

    pub fn command_lines(&self, application: &str) -> Vec<String> {
        self.examples
            .iter()
            .map(|e| e.command_line(application))
            .collect()
    }
}
