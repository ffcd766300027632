// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Pt,
    Zh,
}

impl Lang {
    fn from_tag(tag: &str) -> Option<Self> {
        // "pt-BR" -> "pt", "zh-CN" -> "zh"
        match tag.split('-').next().unwrap_or(tag).to_ascii_lowercase().as_str() {
            "en" => Some(Lang::En),
            "pt" => Some(Lang::Pt),
            "zh" => Some(Lang::Zh),
            _ => None,
        }
    }
}

// Nosso extrator de idioma
#[derive(Debug, Clone, Copy, Default)]
pub struct Locale(pub Lang);

impl Locale {
    /// Primeiro idioma suportado do cabeçalho, na ordem de preferência (q=) do cliente.
    pub fn from_accept_language(header_str: &str) -> Self {
        let lang = accept_language::parse(header_str)
            .iter()
            .find_map(|tag| Lang::from_tag(tag))
            .unwrap_or_default();
        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_accept_language)
            .unwrap_or_default();

        Ok(locale)
    }
}
