/// A commit as reported by the history backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Author name
    pub author: String,
    /// Author date, ISO 8601
    pub date: String,
    /// Commit subject
    pub message: String,
}

impl Commit {
    /// Create a new commit record
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Commit {
            hash: hash.into(),
            author: author.into(),
            date: date.into(),
            message: message.into(),
        }
    }
}
