use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier for a skill entry (e.g., `"14"`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

/// URL-safe, human-readable skill identifier (e.g., `apple-notes`).
///
/// Used as the path segment of `/skills/{slug}` and as the lookup key of the
/// catalog index.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSlug(pub String);

/// URL-safe category identifier (e.g., `smart-home`).
///
/// Skills reference their category by slug; the reference is not guaranteed
/// to resolve.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySlug(pub String);

impl SkillId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SkillSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CategorySlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Agent platform a skill targets.
///
/// Unlike open-ended labels, the platform set is closed: unknown values are
/// rejected when a catalog is parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    OpenClaw,
    Claude,
    Universal,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::OpenClaw, Platform::Claude, Platform::Universal];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::OpenClaw => "openclaw",
            Platform::Claude => "claude",
            Platform::Universal => "universal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openclaw" => Some(Platform::OpenClaw),
            "claude" => Some(Platform::Claude),
            "universal" => Some(Platform::Universal),
            _ => None,
        }
    }
}

impl Serialize for Platform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Platform::parse(&value).ok_or_else(|| {
            D::Error::custom(format!(
                "unknown platform '{value}', expected one of openclaw, claude, universal"
            ))
        })
    }
}
