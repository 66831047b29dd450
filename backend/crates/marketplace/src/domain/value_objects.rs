//! Domain Value Objects
//!
//! Closed vocabularies of the listing aggregates. Every enum travels as its
//! lowercase code and is parsed exactly (case-sensitive); an unknown code is
//! a validation error, never coerced.

use std::fmt;

use derive_more::Display;
use serde::{Deserialize, Serialize};

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $code)] $variant),+
        }

        impl $name {
            /// Every declared variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[inline]
            pub const fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Exact, case-sensitive lookup
            #[inline]
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// `"a, b, c"` for validation messages
            pub fn codes() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

// ============================================================================
// Product vocabulary
// ============================================================================

coded_enum! {
    pub enum ProductCategory {
        Seeds => "seeds",
        Fertilizers => "fertilizers",
        Tools => "tools",
        Equipment => "equipment",
        Other => "other",
    }
}

coded_enum! {
    /// Unit the quantity is measured in
    pub enum Unit {
        Kg => "kg",
        G => "g",
        L => "l",
        Ml => "ml",
        Piece => "piece",
        Acre => "acre",
        Other => "other",
    }
}

coded_enum! {
    #[derive(Default)]
    pub enum ProductStatus {
        #[default]
        Available => "available",
        Sold => "sold",
        Pending => "pending",
    }
}

/// Review score, 1 to 5 stars inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    /// Whole stars only; `4.0` is accepted, `4.5` is not
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(1.0..=5.0).contains(&value) {
            return None;
        }
        Self::new(value as u8)
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating {} outside 1..=5", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

// ============================================================================
// Post vocabulary
// ============================================================================

coded_enum! {
    #[derive(Default)]
    pub enum PostCategory {
        #[default]
        Discussion => "discussion",
        Question => "question",
        SuccessStory => "success_story",
        TipsTricks => "tips_tricks",
    }
}

// ============================================================================
// Job vocabulary
// ============================================================================

coded_enum! {
    pub enum JobType {
        FarmLabor => "farm_labor",
        LandLease => "land_lease",
        Seasonal => "seasonal",
        Permanent => "permanent",
        Other => "other",
    }
}

coded_enum! {
    pub enum SalaryPeriod {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
        PerSeason => "per_season",
        Negotiable => "negotiable",
    }
}

coded_enum! {
    #[derive(Default)]
    pub enum JobStatus {
        #[default]
        Open => "open",
        Closed => "closed",
        Filled => "filled",
    }
}

/// Offered pay; both parts are optional on a posting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub amount: Option<f64>,
    pub period: Option<SalaryPeriod>,
}

// ============================================================================
// Application lifecycle
// ============================================================================

coded_enum! {
    /// State of one applicant entry on a job
    ///
    /// `pending` → `reviewed` → `accepted | rejected`; the review step may be
    /// skipped. `accepted` and `rejected` are terminal.
    #[derive(Default)]
    pub enum ApplicationStatus {
        #[default]
        Pending => "pending",
        Reviewed => "reviewed",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

impl ApplicationStatus {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Whether the employer may move an entry from `self` to `next`
    pub const fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Reviewed)
                | (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Reviewed, Self::Accepted)
                | (Self::Reviewed, Self::Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_and_are_case_sensitive() {
        for c in ProductCategory::ALL {
            assert_eq!(ProductCategory::from_code(c.code()), Some(*c));
        }
        assert_eq!(ProductCategory::from_code("Seeds"), None);
        assert_eq!(JobType::from_code("farm_labor"), Some(JobType::FarmLabor));
        assert_eq!(JobType::from_code("farm-labor"), None);
        assert_eq!(Unit::codes(), "kg, g, l, ml, piece, acre, other");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&PostCategory::SuccessStory).unwrap();
        assert_eq!(json, "\"success_story\"");
        let back: SalaryPeriod = serde_json::from_str("\"per_season\"").unwrap();
        assert_eq!(back, SalaryPeriod::PerSeason);
        assert!(serde_json::from_str::<JobStatus>("\"Open\"").is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ProductStatus::default(), ProductStatus::Available);
        assert_eq!(PostCategory::default(), PostCategory::Discussion);
        assert_eq!(JobStatus::default(), JobStatus::Open);
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert_eq!(Rating::new(5).map(|r| r.stars()), Some(5));
        assert_eq!(Rating::from_f64(4.0), Rating::new(4));
        assert!(Rating::from_f64(4.5).is_none());
        assert!(serde_json::from_str::<Rating>("7").is_err());
        assert_eq!(Rating::new(3).unwrap().to_string(), "3");
    }

    #[test]
    fn test_application_transitions() {
        use ApplicationStatus::*;

        assert!(Pending.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Reviewed.can_transition_to(Accepted));
        assert!(Reviewed.can_transition_to(Rejected));

        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Reviewed.can_transition_to(Reviewed));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Accepted, Rejected] {
            assert!(terminal.is_terminal());
            for next in ApplicationStatus::ALL {
                assert!(!terminal.can_transition_to(*next));
            }
        }
    }
}
