//! Mapping from WMO weather codes to descriptions and display categories.
//!
//! Both the current-weather card and the forecast cards go through
//! [`classify`], so the two never disagree about what a code means.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Language of the descriptions handed to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    /// Map a geocoding language code. Anything without a translation is English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Self::Ru,
            _ => Self::En,
        }
    }
}

/// Display category used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    Clear,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    /// Any code outside the known set.
    Unknown,
}

impl StyleCategory {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Cloudy => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle | Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "🌥️",
        }
    }

    /// Compact description shared by every code in the category.
    pub fn label(&self, lang: Lang) -> &'static str {
        let (en, ru) = match self {
            Self::Clear => ("Clear", "Ясно"),
            Self::Cloudy => ("Cloudy", "Облачно"),
            Self::Fog => ("Fog", "Туман"),
            Self::Drizzle => ("Drizzle", "Морось"),
            Self::Rain => ("Rain", "Дождь"),
            Self::Snow => ("Snow", "Снег"),
            Self::Thunderstorm => ("Thunderstorm", "Гроза"),
            Self::Unknown => ("Unknown", "Неизвестно"),
        };
        pick(lang, en, ru)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

fn pick(lang: Lang, en: &'static str, ru: &'static str) -> &'static str {
    match lang {
        Lang::En => en,
        Lang::Ru => ru,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Expanded, code-specific description.
    pub description: &'static str,
    /// Compact description.
    pub label: &'static str,
    pub icon: &'static str,
    pub style: StyleCategory,
}

/// Classify a weather code with English text.
pub fn classify(code: i32) -> Classification {
    classify_in(code, Lang::En)
}

/// Classify a weather code. Total: unknown codes get [`StyleCategory::Unknown`].
pub fn classify_in(code: i32, lang: Lang) -> Classification {
    let (style, en, ru) = match code {
        0 => (StyleCategory::Clear, "Clear sky", "Ясное небо"),
        1 => (StyleCategory::Clear, "Mainly clear", "В основном ясно"),
        2 => (StyleCategory::Cloudy, "Partly cloudy", "Частичная облачность"),
        3 => (StyleCategory::Cloudy, "Overcast", "Пасмурно"),
        45 => (StyleCategory::Fog, "Fog", "Туман"),
        48 => (StyleCategory::Fog, "Depositing rime fog", "Туман с изморозью"),
        51 => (StyleCategory::Drizzle, "Light drizzle", "Легкая морось"),
        53 => (StyleCategory::Drizzle, "Moderate drizzle", "Умеренная морось"),
        55 => (StyleCategory::Drizzle, "Dense drizzle", "Сильная морось"),
        61 => (StyleCategory::Rain, "Light rain", "Легкий дождь"),
        63 => (StyleCategory::Rain, "Moderate rain", "Умеренный дождь"),
        65 => (StyleCategory::Rain, "Heavy rain", "Сильный дождь"),
        71 => (StyleCategory::Snow, "Light snow", "Легкий снег"),
        73 => (StyleCategory::Snow, "Moderate snow", "Умеренный снег"),
        75 => (StyleCategory::Snow, "Heavy snow", "Сильный снег"),
        95 => (StyleCategory::Thunderstorm, "Thunderstorm", "Гроза"),
        96 => (
            StyleCategory::Thunderstorm,
            "Thunderstorm with light hail",
            "Гроза с небольшим градом",
        ),
        99 => (
            StyleCategory::Thunderstorm,
            "Thunderstorm with heavy hail",
            "Гроза с сильным градом",
        ),
        _ => (StyleCategory::Unknown, "Unknown", "Неизвестно"),
    };

    Classification {
        description: pick(lang, en, ru),
        label: style.label(lang),
        icon: style.icon(),
        style,
    }
}
