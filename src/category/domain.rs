//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, non-empty color tag for displaying a category, e.g. "bg-green-500".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Create a category color.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryColor] if `color` is an empty string.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        if color.is_empty() {
            Err(Error::EmptyCategoryColor)
        } else {
            Ok(Self(color.to_string()))
        }
    }

    /// Create a category color without validation.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A budget category, e.g. 'Food' or 'Housing'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub color: CategoryColor,
}

/// A category that has not been added to the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The unique display name, e.g. "Food".
    pub name: CategoryName,
    /// The color tag used when displaying the category.
    pub color: CategoryColor,
}

impl NewCategory {
    /// Validate the raw `name` and `color` of a new category.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] or [Error::EmptyCategoryColor] if
    /// either string is empty.
    pub fn new(name: &str, color: &str) -> Result<Self, Error> {
        Ok(Self {
            name: CategoryName::new(name)?,
            color: CategoryColor::new(color)?,
        })
    }
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub color: String,
}
