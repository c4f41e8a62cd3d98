//! List bindings for the catalog entities.
//!
//! Search fields, sort keys and facets per screen:
//!
//! | entity | searched fields | sort keys |
//! |--------|-----------------|-----------|
//! | course | title, code, instructor, semester, level, tags | title, code, instructor, members, created |
//! | topic  | name, description, tags, categories, semester | name, order, views, created |
//! | user   | full name, e-mail, degree | name, e-mail, semester, gender, degree, created |
//!
//! Users additionally have a verification facet.  "Created" keys sort
//! newest first and counters (members, views) highest first; everything
//! else ascends.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sowp_store::{Course, Topic, User};

use crate::listing::{cmp_ci, contains_ci, Listable};

/// Generates `FromStr` and `Display` for a sort enum from its CLI names.
macro_rules! named_keys {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|key| key.name() == wanted)
                    .ok_or_else(|| {
                        let names: Vec<&str> = $ty::ALL.iter().map(|k| k.name()).collect();
                        format!("unknown sort key '{s}', expected one of: {}", names.join(", "))
                    })
            }
        }
    };
}

// ----------------------------------------------------------------------
// Courses
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSort {
    Title,
    Code,
    Instructor,
    Members,
    Created,
}

named_keys!(CourseSort {
    Title => "title",
    Code => "code",
    Instructor => "instructor",
    Members => "members",
    Created => "created",
});

impl Listable for Course {
    type Sort = CourseSort;
    type Facet = ();
    const SINGULAR: &'static str = "course";
    const PLURAL: &'static str = "courses";

    fn matches(&self, needle: &str) -> bool {
        [
            &self.title,
            &self.course_code,
            &self.instructor,
            &self.semester,
            &self.level,
        ]
        .into_iter()
        .any(|field| contains_ci(field, needle))
            || self.tags.iter().any(|tag| contains_ci(tag, needle))
    }

    fn compare(&self, other: &Self, key: CourseSort) -> Ordering {
        match key {
            CourseSort::Title => cmp_ci(&self.title, &other.title),
            CourseSort::Code => cmp_ci(&self.course_code, &other.course_code),
            CourseSort::Instructor => cmp_ci(&self.instructor, &other.instructor),
            CourseSort::Members => other.members.cmp(&self.members),
            CourseSort::Created => other.created_at.cmp(&self.created_at),
        }
    }
}

// ----------------------------------------------------------------------
// Topics
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSort {
    Name,
    Order,
    Views,
    Created,
}

named_keys!(TopicSort {
    Name => "name",
    Order => "order",
    Views => "views",
    Created => "created",
});

impl Listable for Topic {
    type Sort = TopicSort;
    type Facet = ();
    const SINGULAR: &'static str = "topic";
    const PLURAL: &'static str = "topics";

    fn matches(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.description,
            &self.tags,
            &self.categories,
            &self.semester,
        ]
        .into_iter()
        .any(|field| contains_ci(field, needle))
    }

    fn compare(&self, other: &Self, key: TopicSort) -> Ordering {
        match key {
            TopicSort::Name => cmp_ci(&self.name, &other.name),
            TopicSort::Order => self.order_index.cmp(&other.order_index),
            TopicSort::Views => other.views.cmp(&self.views),
            TopicSort::Created => other.created_at.cmp(&self.created_at),
        }
    }
}

// ----------------------------------------------------------------------
// Users
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    Name,
    Email,
    Semester,
    Gender,
    Degree,
    Created,
}

named_keys!(UserSort {
    Name => "name",
    Email => "email",
    Semester => "semester",
    Gender => "gender",
    Degree => "degree",
    Created => "created",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerificationFilter {
    #[default]
    All,
    Verified,
    Unverified,
}

impl FromStr for VerificationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "verified" => Ok(Self::Verified),
            "unverified" => Ok(Self::Unverified),
            other => Err(format!(
                "unknown filter '{other}', expected all, verified or unverified"
            )),
        }
    }
}

impl Listable for User {
    type Sort = UserSort;
    type Facet = VerificationFilter;
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn matches(&self, needle: &str) -> bool {
        [&self.full_name, &self.email, &self.degree]
            .into_iter()
            .any(|field| contains_ci(field, needle))
    }

    fn compare(&self, other: &Self, key: UserSort) -> Ordering {
        match key {
            UserSort::Name => cmp_ci(&self.full_name, &other.full_name),
            UserSort::Email => cmp_ci(&self.email, &other.email),
            UserSort::Semester => cmp_ci(&self.semester, &other.semester),
            UserSort::Gender => cmp_ci(&self.gender, &other.gender),
            UserSort::Degree => cmp_ci(&self.degree, &other.degree),
            UserSort::Created => other.created_at.cmp(&self.created_at),
        }
    }

    fn in_facet(&self, facet: &VerificationFilter) -> bool {
        match facet {
            VerificationFilter::All => true,
            VerificationFilter::Verified => self.email_verified,
            VerificationFilter::Unverified => !self.email_verified,
        }
    }
}
