use std::str::FromStr;
use thiserror::Error;
use time::Month;

/// Languages in which month titles and the weekday header can be shown
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Locale {
    #[default]
    English,
    German,
    French,
    Spanish,
    Dutch,
}

impl Locale {
    fn months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::English => &[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
            Locale::German => &[
                "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.",
                "Nov.", "Dez.",
            ],
            Locale::French => &[
                "Janv.", "Févr.", "Mars", "Avr.", "Mai", "Juin", "Juil.", "Août", "Sept.", "Oct.",
                "Nov.", "Déc.",
            ],
            Locale::Spanish => &[
                "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sept", "Oct", "Nov", "Dic",
            ],
            Locale::Dutch => &[
                "Jan", "Feb", "Mrt", "Apr", "Mei", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dec",
            ],
        }
    }

    // Sunday first
    fn weekdays(self) -> &'static [&'static str; 7] {
        match self {
            Locale::English => &["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
            Locale::German => &["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
            Locale::French => &["Di", "Lu", "Ma", "Me", "Je", "Ve", "Sa"],
            Locale::Spanish => &["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sá"],
            Locale::Dutch => &["Zo", "Ma", "Di", "Wo", "Do", "Vr", "Za"],
        }
    }

    /// Short, capitalized name of `month`
    pub(crate) fn short_month(self, month: Month) -> &'static str {
        self.months()[usize::from(u8::from(month) - 1)]
    }

    /// Weekday abbreviations laid out to match the calendar's day columns
    pub(crate) fn weekday_header(self) -> String {
        let mut s = String::new();
        for (i, name) in self.weekdays().iter().enumerate() {
            if i > 0 {
                s.push_str("    ");
            }
            s.push(' ');
            s.push_str(name);
        }
        s.push(' ');
        s
    }
}

impl FromStr for Locale {
    type Err = UnknownLocaleError;

    /// Parses a locale tag such as `en`, `de-AT`, or `fr_CA`; only the
    /// language subtag is considered.
    fn from_str(s: &str) -> Result<Locale, UnknownLocaleError> {
        let language = s.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::English),
            "de" => Ok(Locale::German),
            "fr" => Ok(Locale::French),
            "es" => Ok(Locale::Spanish),
            "nl" => Ok(Locale::Dutch),
            _ => Err(UnknownLocaleError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown or unsupported locale: {0:?}")]
pub(crate) struct UnknownLocaleError(String);
