//! User-facing reply texts in Swedish and English.

use crate::error::AdapterError;
use crate::options::Language;

/// What the user asked for, used to pick the failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    Update,
}

pub fn added(lang: Language, item: &str) -> String {
    match lang {
        Language::Swedish => format!("Lagt till {item} på koplista"),
        Language::English => format!("Added {item} to the shopping list"),
    }
}

pub fn removed(lang: Language, item: &str) -> String {
    match lang {
        Language::Swedish => format!("Tog bort {item} från koplista"),
        Language::English => format!("Removed {item} from the shopping list"),
    }
}

pub fn failure(lang: Language, action: Action, err: &AdapterError, item: &str) -> String {
    match (err, lang) {
        (AdapterError::MissingItem, Language::Swedish) => match action {
            Action::Add => "Jag hörde inte vad som skulle läggas till".to_string(),
            Action::Remove => "Jag hörde inte vad som skulle tas bort".to_string(),
            Action::Update => "Jag hörde inte vad som skulle uppdateras".to_string(),
        },
        (AdapterError::MissingItem, Language::English) => "I didn't catch the item name".to_string(),
        (AdapterError::NotConfigured, Language::Swedish) => "Koplista är inte konfigurerad".to_string(),
        (AdapterError::NotConfigured, Language::English) => {
            "Koplista integration is not configured".to_string()
        }
        (AdapterError::InvalidCall(reason), Language::Swedish) => format!("Ogiltigt anrop: {reason}"),
        (AdapterError::InvalidCall(reason), Language::English) => format!("Invalid request: {reason}"),
        (AdapterError::UnknownList(list), Language::Swedish) => {
            format!("Hittade ingen lista som heter {list}")
        }
        (AdapterError::UnknownList(list), Language::English) => {
            format!("There is no shopping list called {list}")
        }
        (AdapterError::UnknownItem { item, .. }, Language::Swedish) => {
            format!("Hittade inte {item} på koplista")
        }
        (AdapterError::UnknownItem { item, .. }, Language::English) => {
            format!("{item} is not on the shopping list")
        }
        (AdapterError::Api(_), lang) => api_failure(lang, action, item),
    }
}

fn api_failure(lang: Language, action: Action, item: &str) -> String {
    match (action, lang) {
        (Action::Add, Language::Swedish) => format!("Kunde inte lägga till {item} på koplista"),
        (Action::Add, Language::English) => format!("Failed to add {item} to the shopping list"),
        (Action::Remove, Language::Swedish) => format!("Kunde inte ta bort {item} från koplista"),
        (Action::Remove, Language::English) => {
            format!("Failed to remove {item} from the shopping list")
        }
        (Action::Update, Language::Swedish) => format!("Kunde inte uppdatera {item} på koplista"),
        (Action::Update, Language::English) => format!("Failed to update {item} on the shopping list"),
    }
}
