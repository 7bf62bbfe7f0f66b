use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use treebolic_core::NodeData;

/// Which node field a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchScope {
    #[default]
    Label,
    Content,
    Link,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchMode {
    Equals,
    #[default]
    StartsWith,
    Includes,
}

impl MatchScope {
    pub const ALL: [MatchScope; 4] = [Self::Label, Self::Content, Self::Link, Self::Id];

    fn field<'a>(&self, node: &'a NodeData) -> Option<&'a str> {
        match self {
            Self::Label => node.label.as_deref(),
            Self::Content => node.content.as_deref(),
            Self::Link => node.link.as_deref(),
            Self::Id => Some(node.id.as_str()),
        }
    }
}

impl MatchMode {
    pub const ALL: [MatchMode; 3] = [Self::Equals, Self::StartsWith, Self::Includes];

    fn test(&self, haystack: &str, target: &str) -> bool {
        match self {
            Self::Equals => haystack == target,
            Self::StartsWith => haystack.starts_with(target),
            Self::Includes => haystack.contains(target),
        }
    }
}

impl fmt::Display for MatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Label => "label",
            Self::Content => "content",
            Self::Link => "link",
            Self::Id => "id",
        })
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equals => "equals",
            Self::StartsWith => "startswith",
            Self::Includes => "includes",
        })
    }
}

impl FromStr for MatchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "content" => Ok(Self::Content),
            "link" => Ok(Self::Link),
            "id" => Ok(Self::Id),
            _ => Err(format!("unknown match scope: {s}")),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equals" => Ok(Self::Equals),
            "startswith" | "starts-with" => Ok(Self::StartsWith),
            "includes" => Ok(Self::Includes),
            _ => Err(format!("unknown match mode: {s}")),
        }
    }
}

pub trait Matcher: Send {
    fn matches(&self, node: &NodeData) -> bool;
}

/// Accepts every node.
pub struct AllMatcher;

impl Matcher for AllMatcher {
    fn matches(&self, _node: &NodeData) -> bool {
        true
    }
}

pub struct CaseMatcher {
    target: String,
    scope: MatchScope,
    mode: MatchMode,
}

impl CaseMatcher {
    pub fn new(target: impl Into<String>, scope: MatchScope, mode: MatchMode) -> Self {
        Self {
            target: target.into(),
            scope,
            mode,
        }
    }
}

impl Matcher for CaseMatcher {
    fn matches(&self, node: &NodeData) -> bool {
        if self.target.is_empty() {
            return false;
        }
        self.scope
            .field(node)
            .is_some_and(|field| self.mode.test(field, &self.target))
    }
}

pub struct NoCaseMatcher {
    target: String,
    scope: MatchScope,
    mode: MatchMode,
}

impl NoCaseMatcher {
    pub fn new(target: &str, scope: MatchScope, mode: MatchMode) -> Self {
        Self {
            target: target.to_lowercase(),
            scope,
            mode,
        }
    }
}

impl Matcher for NoCaseMatcher {
    fn matches(&self, node: &NodeData) -> bool {
        if self.target.is_empty() {
            return false;
        }
        self.scope
            .field(node)
            .is_some_and(|field| self.mode.test(&field.to_lowercase(), &self.target))
    }
}
