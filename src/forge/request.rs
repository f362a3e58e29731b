use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tag as listed by the forge, most recent first.
pub struct Tag {
    pub name: String,
    /// API url of the tagged commit.
    pub commit_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// State reported by a commit status.
pub enum StatusState {
    Pending,
    Success,
    Failure,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// A single status entry attached to a commit.
pub struct CommitStatus {
    pub state: StatusState,
    /// Name of the check reporting the status.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Release to publish: tag, title and rendered notes.
pub struct ReleaseRecord {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Existing release found for a tag.
pub struct ReleaseByTagResponse {
    pub tag: String,
    pub url: String,
}
