use models::User;

use crate::errors::ServiceError;

/// Predicates for the filtered listing. Absent predicates match everything;
/// present ones combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub name: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
}

/// What `GET /users` should produce for a given query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// No query parameters at all: show the create form.
    View,
    /// At least one parameter: JSON listing narrowed by the filter.
    Filtered(ListFilter),
}

impl Listing {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Any parameter, recognised or not, selects `Filtered`. A recognised
    /// parameter is a predicate as soon as it is present: `name=` matches
    /// only an empty name and a blank `minAge`/`maxAge` bound reads as 0.
    /// Other bounds must be integers.
    pub fn from_query(raw: Option<&str>) -> Result<Self, ServiceError> {
        let pairs: Vec<(String, String)> = match raw {
            None => Vec::new(),
            Some(q) => serde_urlencoded::from_str(q)
                .map_err(|e| ServiceError::BadRequest(format!("malformed query string: {e}")))?,
        };
        if pairs.is_empty() {
            return Ok(Listing::View);
        }

        let mut filter = ListFilter::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => filter.name = Some(value),
                "minAge" => filter.min_age = Some(parse_bound("minAge", &value)?),
                "maxAge" => filter.max_age = Some(parse_bound("maxAge", &value)?),
                _ => {}
            }
        }
        Ok(Listing::Filtered(filter))
    }
}

fn parse_bound(key: &str, value: &str) -> Result<i64, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|_| ServiceError::BadRequest(format!("{key} must be an integer")))
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_age.is_none() && self.max_age.is_none()
    }

    pub fn matches(&self, user: &User) -> bool {
        let age = i128::from(user.age);
        self.name.as_deref().map_or(true, |n| user.name == n)
            && self.min_age.map_or(true, |min| age >= i128::from(min))
            && self.max_age.map_or(true, |max| age <= i128::from(max))
    }

    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        if self.is_empty() {
            return users;
        }
        users.into_iter().filter(|u| self.matches(u)).collect()
    }
}
