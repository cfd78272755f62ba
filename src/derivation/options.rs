/// Options for building a derived store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Name attached to the store's log events and `Debug` output.
    pub label: Option<String>,
}

impl DeriveOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
