use thiserror::Error;

/// How the decoder treats anomalies in best-effort metadata such as annotations.
///
/// Structural problems (bad constant tags, unknown attribute names, truncated buffers) are fatal
/// under either policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Record a [`Diagnostic`] and keep decoding.
    #[default]
    Lenient,
    /// Turn every [`Diagnostic`] into an error.
    Strict,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("element_value tag [{tag}] at offset {offset} is not defined")]
    UnknownElementValueTag { tag: char, offset: usize },
    #[error("{attribute} attribute left {remaining} bytes unread at offset {offset}")]
    UnreadAttributeBytes {
        attribute: &'static str,
        offset: usize,
        remaining: usize,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics(pub Vec<Diagnostic>);
impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}
impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
