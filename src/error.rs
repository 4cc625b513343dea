use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeatmapError>;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<reqwest::Error>),
    #[error("Azure DevOps returned {status} for {url}{hint}")]
    Status {
        status: u16,
        url: String,
        hint: &'static str,
    },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

// reqwest::Error is large; keep the enum small by boxing it
impl From<reqwest::Error> for HeatmapError {
    fn from(err: reqwest::Error) -> Self {
        HeatmapError::Http(Box::new(err))
    }
}

impl HeatmapError {
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        let hint = match status {
            401 | 203 => " (check that AZURE_DEVOPS_PAT is valid and not expired)",
            403 => " (the token lacks the Code (Read) and Project (Read) scopes)",
            _ => "",
        };
        HeatmapError::Status {
            status,
            url: url.into(),
            hint,
        }
    }
}
