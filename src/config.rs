use chrono::{Local, NaiveDate};

/// Environment variable that pins the reference date, as `YYYY-MM-DD`.
pub const REFERENCE_DATE_ENV: &str = "EMI_REFERENCE_DATE";

/// Where the "today" used to measure loan progress comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceDate {
    /// The local calendar date at the time of the call (production)
    #[default]
    Today,
    /// A pinned date, for tests and replays
    Fixed(NaiveDate),
}

impl ReferenceDate {
    /// Create from the environment
    /// - EMI_REFERENCE_DATE unset: `Today`
    /// - EMI_REFERENCE_DATE=2024-06-01: `Fixed(2024-06-01)`
    pub fn from_env() -> Self {
        Self::parse(std::env::var(REFERENCE_DATE_ENV).ok().as_deref())
    }

    /// Interprets a raw setting. Anything that is not an ISO date falls back to `Today`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => ReferenceDate::Today,
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => ReferenceDate::Fixed(date),
                Err(e) => {
                    tracing::warn!(value = raw, "Invalid {}, using today: {}", REFERENCE_DATE_ENV, e);
                    ReferenceDate::Today
                }
            },
        }
    }

    /// Resolves to a calendar date. This is the only place the wall clock is read.
    pub fn resolve(&self) -> NaiveDate {
        match self {
            ReferenceDate::Today => Local::now().date_naive(),
            ReferenceDate::Fixed(date) => *date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, ReferenceDate::Today)]
    #[case(Some(""), ReferenceDate::Today)]
    #[case(Some("not-a-date"), ReferenceDate::Today)]
    #[case(Some("2024-02-30"), ReferenceDate::Today)]
    #[case(Some(" 2024-06-01 "), ReferenceDate::Fixed(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))]
    fn test_parse(#[case] value: Option<&str>, #[case] expected: ReferenceDate) {
        assert_eq!(ReferenceDate::parse(value), expected);
    }

    #[test]
    fn test_fixed_resolves_to_itself() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        assert_eq!(ReferenceDate::Fixed(date).resolve(), date);
    }
}
