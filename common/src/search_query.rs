//! Shared search query models and helpers.
//!
//! The option enums travel as their numeric discriminant (`"0"`, `"1"`, `"2"`)
//! in the query string of `/api/retrieved_info`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error for a discriminant that does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub type_name: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown discriminant for {}: {}.", self.type_name, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

macro_rules! discriminant_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn discriminant(self) -> u8 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Lower-case name, as typed on the command line.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL.iter().copied().find(|v| v.label().eq_ignore_ascii_case(label))
            }
        }

        impl FromStr for $name {
            type Err = UnknownDiscriminant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| s.parse::<u8>().ok() == Some(v.discriminant()))
                    .ok_or_else(|| UnknownDiscriminant { type_name: stringify!($name), value: s.to_string() })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownDiscriminant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.discriminant().to_string()
            }
        }
    };
}

discriminant_enum! {
    /// The search result is sorted by ...
    SearchSortBy {
        Time = 0 => "time",
        Hot = 1 => "hot",
        Relevance = 2 => "relevance",
    }
}

discriminant_enum! {
    SearchField {
        /// Only search title
        Title = 0 => "title",
        /// Only search code
        Code = 1 => "code",
        /// Title, body and code
        All = 2 => "all",
    }
}

discriminant_enum! {
    SearchMethod {
        Naive = 0 => "naive",
        Complex = 1 => "complex",
        Regex = 2 => "regex",
    }
}

/// Advanced options of a search.
///
/// Values are immutable; the `with_*` helpers return an updated copy so that
/// a request already built from the old value is never affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryOptions {
    pub sort_by: SearchSortBy,
    pub search_field: SearchField,
    pub search_method: SearchMethod,
}

impl Default for SearchQueryOptions {
    fn default() -> Self {
        Self {
            sort_by: SearchSortBy::Relevance,
            search_field: SearchField::All,
            search_method: SearchMethod::Naive,
        }
    }
}

impl SearchQueryOptions {
    pub fn with_sort_by(self, sort_by: SearchSortBy) -> Self {
        Self { sort_by, ..self }
    }

    pub fn with_search_field(self, search_field: SearchField) -> Self {
        Self { search_field, ..self }
    }

    pub fn with_search_method(self, search_method: SearchMethod) -> Self {
        Self { search_method, ..self }
    }

    /// Query-string pairs, every value flattened to a string.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("sortBy", self.sort_by.into()),
            ("searchField", self.search_field.into()),
            ("searchMethod", self.search_method.into()),
        ]
    }
}

pub fn is_search_key_valid(search_key: &str) -> bool {
    !search_key.is_empty()
}

/// The query string typed by the user plus the options it is searched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQueryModel {
    pub query_string: String,
    pub options: SearchQueryOptions,
}

impl SearchQueryModel {
    pub fn new(query_string: impl Into<String>, options: SearchQueryOptions) -> Self {
        Self { query_string: query_string.into(), options }
    }

    pub fn is_valid(&self) -> bool {
        is_search_key_valid(&self.query_string)
    }

    pub fn set_query_string(&mut self, query_string: impl Into<String>) {
        self.query_string = query_string.into();
    }

    /// Replaces the options with `update(options)`.
    pub fn update_options(&mut self, update: impl FnOnce(SearchQueryOptions) -> SearchQueryOptions) -> SearchQueryOptions {
        self.options = update(self.options);
        self.options
    }
}
