use serde::{Deserialize, Serialize};

/// Weather condition categories, keyed by the provider's "main" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    Unknown,
}

const LABELS: &[(&str, Condition)] = &[
    ("Clear", Condition::Clear),
    ("Clouds", Condition::Clouds),
    ("Rain", Condition::Rain),
    ("Drizzle", Condition::Drizzle),
    ("Thunderstorm", Condition::Thunderstorm),
    ("Snow", Condition::Snow),
    ("Mist", Condition::Mist),
    ("Smoke", Condition::Smoke),
    ("Haze", Condition::Haze),
    ("Dust", Condition::Dust),
    ("Fog", Condition::Fog),
    ("Sand", Condition::Sand),
    ("Ash", Condition::Ash),
    ("Squall", Condition::Squall),
    ("Tornado", Condition::Tornado),
];

impl Condition {
    /// Map a provider label to a category. Never fails: anything outside the
    /// table is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        LABELS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(label))
            .map(|(_, condition)| *condition)
            .unwrap_or(Condition::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        LABELS
            .iter()
            .find(|(_, condition)| condition == self)
            .map(|(label, _)| *label)
            .unwrap_or("Unknown")
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Drizzle,
            Condition::Thunderstorm,
            Condition::Snow,
            Condition::Mist,
            Condition::Smoke,
            Condition::Haze,
            Condition::Dust,
            Condition::Fog,
            Condition::Sand,
            Condition::Ash,
            Condition::Squall,
            Condition::Tornado,
            Condition::Unknown,
        ]
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
