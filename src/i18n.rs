//! Static UI strings for the two supported locales.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    #[default]
    En,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn translations(self) -> &'static Translations {
        match self {
            Self::Ru => &RU,
            Self::En => &EN,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    pub header: Header,
    pub upload: Upload,
    pub anime_title: Field,
    pub character: CharacterField,
    pub generate: Generate,
    pub result: Upload,
    pub alerts: Alerts,
    pub alt: Alt,
    pub file: FilePicker,
    pub provider: ProviderLabels,
    pub errors: ErrorMessages,
}

#[derive(Debug, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub subtitle: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Upload {
    pub title: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Field {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CharacterField {
    pub title: &'static str,
    pub optional: &'static str,
    pub placeholder: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Generate {
    pub button: &'static str,
    pub generating: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alerts {
    pub missing_fields: &'static str,
    pub generation_complete: &'static str,
    pub generation_error: &'static str,
    pub analyzing: &'static str,
    pub generating: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alt {
    pub selected_photo: &'static str,
    pub generated_avatar: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FilePicker {
    pub choose: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProviderLabels {
    pub title: &'static str,
    pub gemini: &'static str,
    pub openai: &'static str,
}

/// One message per [`crate::error::ErrorCode`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessages {
    pub billing: &'static str,
    pub rate_limit: &'static str,
    pub invalid_api_key: &'static str,
    pub content_policy: &'static str,
    pub unknown: &'static str,
    pub missing_title: &'static str,
    pub missing_image_and_title: &'static str,
    pub invalid_image: &'static str,
}

static RU: Translations = Translations {
    header: Header {
        title: "🎌 Генератор Аниме Аватаров",
        subtitle: "Превратите свое селфи в любимого аниме персонажа!",
    },
    upload: Upload {
        title: "Загрузите Ваше Фото",
    },
    anime_title: Field {
        title: "Впишите название аниме *",
        placeholder: "например: Наруто, Атака Титанов, Сейлор Мун, Ван Пис...",
        description: "Укажите аниме, в стилистике которого хотите создать аватар",
    },
    character: CharacterField {
        title: "Укажите аниме персонажа",
        optional: "(опционально)",
        placeholder: "например: Наруто Узумаки, Эрен Йегер, Усаги Цукино...",
        description: "Если не указать, вы станете уникальным персонажем этого мира. Если указать - станете этим персонажем",
    },
    generate: Generate {
        button: "✨ Создать Аватар",
        generating: "🎨 Генерируем...",
    },
    result: Upload {
        title: "Ваш Аниме Аватар",
    },
    alerts: Alerts {
        missing_fields: "Пожалуйста, выберите фото и укажите название аниме!",
        generation_complete: "Аниме аватар успешно сгенерирован!",
        generation_error: "Ошибка при генерации аватара. Попробуйте снова.",
        analyzing: "Анализируем фото...",
        generating: "Генерируем аниме аватар...",
    },
    alt: Alt {
        selected_photo: "Выбранное фото",
        generated_avatar: "Сгенерированный аниме аватар",
    },
    file: FilePicker {
        choose: "Выберите файл или перетащите сюда",
    },
    provider: ProviderLabels {
        title: "Генератор",
        gemini: "Google Gemini (по фото)",
        openai: "OpenAI DALL·E",
    },
    errors: ErrorMessages {
        billing: "Ошибка биллинга. Проверьте баланс аккаунта.",
        rate_limit: "Превышен лимит запросов. Попробуйте позже.",
        invalid_api_key: "Неверная конфигурация API ключа.",
        content_policy: "Нарушение политики контента. Попробуйте другое изображение.",
        unknown: "Ошибка при генерации аватара. Попробуйте снова.",
        missing_title: "Не указано обязательное поле: animeTitle",
        missing_image_and_title: "Не указаны обязательные поля: imageBase64 и animeTitle",
        invalid_image: "Некорректное изображение imageBase64",
    },
};

static EN: Translations = Translations {
    header: Header {
        title: "🎌 Anime Avatar Generator",
        subtitle: "Transform your selfie into your favorite anime character!",
    },
    upload: Upload {
        title: "Upload Your Photo",
    },
    anime_title: Field {
        title: "Enter Anime Title *",
        placeholder: "e.g., Naruto, Attack on Titan, Sailor Moon, One Piece...",
        description: "Specify the anime style you want for your avatar",
    },
    character: CharacterField {
        title: "Specify Anime Character",
        optional: "(optional)",
        placeholder: "e.g., Naruto Uzumaki, Eren Yeager, Usagi Tsukino...",
        description: "If not specified, you'll become a unique character in this world. If specified - you'll become this character",
    },
    generate: Generate {
        button: "✨ Generate Avatar",
        generating: "🎨 Generating...",
    },
    result: Upload {
        title: "Your Anime Avatar",
    },
    alerts: Alerts {
        missing_fields: "Please select a photo and specify anime title!",
        generation_complete: "Anime avatar generated successfully!",
        generation_error: "Error generating avatar. Please try again.",
        analyzing: "Analyzing photo...",
        generating: "Generating anime avatar...",
    },
    alt: Alt {
        selected_photo: "Selected photo",
        generated_avatar: "Generated anime avatar",
    },
    file: FilePicker {
        choose: "Choose file or drag here",
    },
    provider: ProviderLabels {
        title: "Generator",
        gemini: "Google Gemini (from photo)",
        openai: "OpenAI DALL·E",
    },
    errors: ErrorMessages {
        billing: "OpenAI billing error. Please check your account balance.",
        rate_limit: "Rate limit exceeded. Please try again later.",
        invalid_api_key: "Invalid API key configuration.",
        content_policy: "Content policy violation. Please try a different image or description.",
        unknown: "Error generating avatar. Please try again.",
        missing_title: "Missing required field: animeTitle",
        missing_image_and_title: "Missing required fields: imageBase64 and animeTitle",
        invalid_image: "Invalid imageBase64",
    },
};
