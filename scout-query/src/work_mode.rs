use crate::QueryError;

/// Where a job is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkMode {
    Onsite,
    Remote,
    Hybrid,
}

impl WorkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkMode::Onsite => "onsite",
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
        }
    }

    /// Classify free text by containment. "remote" wins over "hybrid";
    /// anything else is onsite.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("remote") {
            WorkMode::Remote
        } else if lower.contains("hybrid") {
            WorkMode::Hybrid
        } else {
            WorkMode::Onsite
        }
    }
}

/// The caller's work mode constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkModePreference {
    #[default]
    Any,
    Only(WorkMode),
}

impl WorkModePreference {
    /// Parse the wire value. Absent or blank means `Any`.
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        let Some(raw) = raw else { return Ok(Self::Any) };
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "" | "any" => Ok(Self::Any),
            "onsite" | "on-site" | "on site" => Ok(Self::Only(WorkMode::Onsite)),
            "remote" => Ok(Self::Only(WorkMode::Remote)),
            "hybrid" => Ok(Self::Only(WorkMode::Hybrid)),
            _ => Err(QueryError::UnknownWorkMode(raw.to_string())),
        }
    }

    /// Whether a record with the given (possibly unknown) mode satisfies the constraint.
    pub fn admits(self, mode: Option<WorkMode>) -> bool {
        match self {
            Self::Any => true,
            Self::Only(wanted) => mode == Some(wanted),
        }
    }
}
