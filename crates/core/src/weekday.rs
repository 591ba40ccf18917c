//! Weekday tokens used by an alert's active-day set.
//!
//! Tokens are the three-letter English abbreviations (`"Mon"` .. `"Sun"`),
//! matched exactly. Ordering follows the ISO week, Monday first, so a
//! `BTreeSet<Weekday>` iterates in calendar order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Every weekday in calendar order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the seven weekday tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized weekday token '{0}'")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

/// The days an alert is active on, iterated Monday first.
///
/// Serializes as the bare token list, e.g. `["Mon", "Wed"]`. Duplicates
/// collapse on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekdaySet(BTreeSet<Weekday>);

impl WeekdaySet {
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    /// Storage tokens in calendar order.
    pub fn tokens(&self) -> Vec<String> {
        self.iter().map(|day| day.as_str().to_string()).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<String>> for WeekdaySet {
    type Error = UnknownWeekday;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        tokens.iter().map(|t| t.parse::<Weekday>()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_token() {
        for day in Weekday::ALL {
            assert_eq!(day.as_str().parse::<Weekday>(), Ok(day));
        }
    }

    #[test]
    fn rejects_other_spellings() {
        assert!("mon".parse::<Weekday>().is_err());
        assert!("Monday".parse::<Weekday>().is_err());
        assert!("".parse::<Weekday>().is_err());
    }

    #[test]
    fn orders_monday_first() {
        assert!(Weekday::Mon < Weekday::Sun);
        assert!(Weekday::Fri < Weekday::Sat);
    }

    #[test]
    fn converts_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sun);
        assert_eq!(Weekday::from(chrono::Weekday::Wed), Weekday::Wed);
    }

    #[test]
    fn set_collapses_duplicates_in_calendar_order() {
        let set: WeekdaySet = [Weekday::Sun, Weekday::Mon, Weekday::Sun].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.tokens(), vec!["Mon", "Sun"]);
        assert_eq!(serde_json::to_value(&set).unwrap(), serde_json::json!(["Mon", "Sun"]));
    }

    #[test]
    fn set_from_stored_tokens() {
        let set = WeekdaySet::try_from(vec!["Fri".to_string(), "Tue".to_string()]).unwrap();
        assert!(set.contains(Weekday::Tue));
        assert!(!set.contains(Weekday::Wed));

        let err = WeekdaySet::try_from(vec!["Funday".to_string()]).unwrap_err();
        assert_eq!(err, UnknownWeekday("Funday".to_string()));
    }
}
