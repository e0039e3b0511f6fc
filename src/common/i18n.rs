// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;

pub const DEFAULT_LANG: &str = "en";

// Arquivos de mensagens embutidos no binário
const BUNDLES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Mensagens por idioma, indexadas pelo código do erro.
#[derive(Clone, Debug)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in BUNDLES {
            let bundle: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("arquivo de tradução inválido: {lang}"))?;
            messages.insert(lang.to_string(), bundle);
        }
        Ok(Self { messages: Arc::new(messages) })
    }

    /// Idioma pedido → inglês → a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|bundle| bundle.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|bundle| bundle.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundles_share_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let en = &store.messages["en"];
        let pt = &store.messages["pt"];
        for key in en.keys() {
            assert!(pt.contains_key(key), "chave sem tradução em pt: {key}");
        }
    }

    #[test]
    fn falls_back_to_key_when_missing() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "does_not_exist"), "does_not_exist");
        assert_eq!(store.translate("fr", "review_not_found"), store.translate("en", "review_not_found"));
    }
}
