//! Enumerations and field types shared across the tracker.
//!
//! This module defines task priorities, the display theme, and the filter and
//! sort selections the task and resource views are projected with.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task importance. Serialized with the capitalised names used in storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl Priority {
    /// Sort weight: higher sorts first.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Cycle used by selector widgets.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Colour scheme, persisted as the bare string `"light"` or `"dark"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Completion filter for the task list.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

/// Available orderings for the task list.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Priority,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Priority => "Priority",
        }
    }

    pub fn toggled(self) -> SortKey {
        match self {
            SortKey::Date => SortKey::Priority,
            SortKey::Priority => SortKey::Date,
        }
    }
}

/// Either every category or exactly one. Used for tasks and resources alike.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }

    /// Step through `all` followed by each entry of `categories`, wrapping around.
    pub fn cycle(&self, categories: &[String]) -> CategoryFilter {
        match self {
            CategoryFilter::All => categories
                .first()
                .map(|c| CategoryFilter::Only(c.clone()))
                .unwrap_or(CategoryFilter::All),
            CategoryFilter::Only(current) => {
                let pos = categories.iter().position(|c| c == current);
                match pos.and_then(|i| categories.get(i + 1)) {
                    Some(next) => CategoryFilter::Only(next.clone()),
                    None => CategoryFilter::All,
                }
            }
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("category cannot be empty".into());
        }
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => f.write_str(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_weights_order_high_first() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
    }

    #[test]
    fn priority_serializes_capitalised() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn theme_round_trips_through_plain_strings() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("purple"), None);
        assert_eq!(Theme::Light.toggled().as_str(), "dark");
    }

    #[test]
    fn category_filter_parses_all_case_insensitively() {
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Work".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only("Work".into()))
        );
        assert!("  ".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn category_filter_cycles_back_to_all() {
        let cats = vec!["Personal".to_string(), "Work".to_string()];
        let f = CategoryFilter::All.cycle(&cats);
        assert_eq!(f, CategoryFilter::Only("Personal".into()));
        let f = f.cycle(&cats);
        assert_eq!(f, CategoryFilter::Only("Work".into()));
        assert_eq!(f.cycle(&cats), CategoryFilter::All);
    }
}
