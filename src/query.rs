use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Region;

pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{count} invalid query parameter(s)", count = .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

// Closed string enums with a wire name per variant
macro_rules! closed_set {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

closed_set!(SortBy {
    Ranking => "ranking",
    Name => "name",
    WinRate => "winrate",
    Points => "points",
});

closed_set!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

closed_set!(RankingType {
    Teams => "teams",
    Players => "players",
    Combined => "combined",
});

closed_set!(Period {
    Current => "current",
    Last30Days => "30d",
    Last90Days => "90d",
    Season => "season",
    AllTime => "all-time",
});

// GET /api/teams parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsQuery {
    pub page: u32,
    pub limit: u32,
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub min_rank: u32,
    pub max_rank: u32,
    pub include_stats: bool,
}

impl Default for TeamsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            region: Region::All,
            search: None,
            sort_by: SortBy::Ranking,
            sort_order: SortOrder::Asc,
            min_rank: 1,
            max_rank: 100,
            include_stats: false,
        }
    }
}

impl TeamsQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let defaults = Self::default();
        let mut p = ParamReader::new(params);

        let query = Self {
            page: p.integer("page", defaults.page, 1, u32::MAX),
            limit: p.integer("limit", defaults.limit, 1, MAX_LIMIT),
            region: p.region("region", defaults.region),
            search: p.text("search"),
            sort_by: p.choice("sortBy", defaults.sort_by, SortBy::VALUES),
            sort_order: p.choice("sortOrder", defaults.sort_order, SortOrder::VALUES),
            min_rank: p.integer("minRank", defaults.min_rank, 1, u32::MAX),
            max_rank: p.integer("maxRank", defaults.max_rank, 1, u32::MAX),
            include_stats: p.flag("includeStats"),
        };
        if query.min_rank > query.max_rank {
            p.reject("maxRank", "must be greater than or equal to minRank");
        }

        p.finish(query)
    }

    pub fn cache_key(&self) -> String {
        format!(
            "teams:{}:{}:{}:{}:{}:{}",
            self.region,
            self.search.as_deref().unwrap_or("").to_lowercase(),
            self.min_rank,
            self.max_rank,
            self.sort_by,
            self.sort_order
        )
    }
}

// GET /api/rankings parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsQuery {
    #[serde(rename = "type")]
    pub kind: RankingType,
    pub region: Region,
    pub period: Period,
    pub limit: u32,
    pub include_history: bool,
    pub include_stats: bool,
}

impl Default for RankingsQuery {
    fn default() -> Self {
        Self {
            kind: RankingType::Teams,
            region: Region::Global,
            period: Period::Current,
            limit: 50,
            include_history: false,
            include_stats: false,
        }
    }
}

impl RankingsQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let defaults = Self::default();
        let mut p = ParamReader::new(params);

        let query = Self {
            kind: p.choice("type", defaults.kind, RankingType::VALUES),
            region: p.region("region", defaults.region),
            period: p.choice("period", defaults.period, Period::VALUES),
            limit: p.integer("limit", defaults.limit, 1, MAX_LIMIT),
            include_history: p.flag("includeHistory"),
            include_stats: p.flag("includeStats"),
        };

        p.finish(query)
    }

    pub fn cache_key(&self) -> String {
        format!("{}_{}_{}", self.kind, self.region, self.period)
    }
}

struct ParamReader<'a> {
    params: &'a HashMap<String, String>,
    issues: Vec<FieldIssue>,
}

impl<'a> ParamReader<'a> {
    fn new(params: &'a HashMap<String, String>) -> Self {
        Self {
            params,
            issues: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue::new(field, message));
    }

    fn choice<T: FromStr>(&mut self, field: &str, default: T, allowed: &[&str]) -> T {
        let params = self.params;
        match params.get(field) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                self.reject(
                    field,
                    format!("expected one of {}, got '{raw}'", allowed.join(", ")),
                );
                default
            }),
        }
    }

    fn region(&mut self, field: &str, default: Region) -> Region {
        let allowed: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
        self.choice(field, default, &allowed)
    }

    // empty values fall back to the default
    fn integer(&mut self, field: &str, default: u32, min: u32, max: u32) -> u32 {
        let params = self.params;
        let raw = match params.get(field).map(|v| v.trim()) {
            None | Some("") => return default,
            Some(raw) => raw,
        };
        match raw.parse::<u32>() {
            Ok(n) if n >= min && n <= max => n,
            Ok(_) if max == u32::MAX => {
                self.reject(field, format!("must be at least {min}"));
                default
            }
            Ok(_) => {
                self.reject(field, format!("must be between {min} and {max}"));
                default
            }
            Err(_) => {
                self.reject(field, format!("expected a positive integer, got '{raw}'"));
                default
            }
        }
    }

    fn flag(&self, field: &str) -> bool {
        self.params.get(field).is_some_and(|v| v == "true")
    }

    fn text(&self, field: &str) -> Option<String> {
        self.params
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}
