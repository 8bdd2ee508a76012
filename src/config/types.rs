use std::fmt;
use std::sync::OnceLock;

use regex_lite::{Regex, RegexBuilder};
use serde::de::Visitor;
use serde::{Deserialize, Deserializer};

/// A duration given in the config either as a number of seconds or as a string like `1h 30m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(std::time::Duration);

impl Duration {
    pub fn from_secs(seconds: u64) -> Self {
        Self(std::time::Duration::from_secs(seconds))
    }

    fn parse(s: &str) -> Result<Self, String> {
        static REGEXP: OnceLock<Regex> = OnceLock::new();

        let regexp = REGEXP.get_or_init(|| {
            RegexBuilder::new(
                r"
                ^
                (?:(?<days>    \d+)d)? \s*
                (?:(?<hours>   \d+)h)? \s*
                (?:(?<minutes> \d+)m)? \s*
                (?:(?<seconds> \d+)s)?
                $",
            )
            .ignore_whitespace(true)
            .build()
            .expect("the duration regex is valid")
        });

        let captures = regexp
            .captures(s.trim())
            .ok_or_else(|| format!("`{s}` is not a duration"))?;

        let mut total: u64 = 0;
        let mut matched = false;

        for (name, scale) in [("days", 24), ("hours", 60), ("minutes", 60), ("seconds", 1)] {
            let value = match captures.name(name) {
                Some(m) => {
                    matched = true;
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|e| format!("could not parse {name} in `{s}`: {e}"))?
                }

                None => 0,
            };

            total = total
                .checked_add(value)
                .and_then(|t| t.checked_mul(scale))
                .ok_or_else(|| format!("duration `{s}` is too large"))?;
        }

        if !matched {
            return Err(format!("`{s}` is not a duration"));
        }

        Ok(Self::from_secs(total))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a number of seconds or a duration like `1h 30m`")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_u64(v.try_into().map_err(E::custom)?)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Duration::from_secs(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Duration::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(duration: std::time::Duration) -> Self {
        Self(duration)
    }
}

impl From<Duration> for std::time::Duration {
    fn from(duration: Duration) -> Self {
        duration.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_durations() {
        assert_eq!(Duration::parse("1d 2h 3m 4s"), Ok(Duration::from_secs(93784)));
        assert_eq!(Duration::parse("90m"), Ok(Duration::from_secs(5400)));
        assert_eq!(Duration::parse("45s"), Ok(Duration::from_secs(45)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Duration::parse("").is_err());
        assert!(Duration::parse("soon").is_err());
        assert!(Duration::parse("5 minutes").is_err());
        assert!(Duration::parse("99999999999999999999d").is_err());
    }
}
