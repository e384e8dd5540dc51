//! Slide list → display cards → markup.
//!
//! Pure functions; every re-render replaces the previous output wholesale.

use askama::Template;

use crate::catalog::types::{Slide, SlideId};

/// Display-ready view of one slide. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideCard {
    pub id: SlideId,
    pub title: String,
    pub thumb_url: String,
    pub description: String,
    pub tags: String,
}

impl From<&Slide> for SlideCard {
    fn from(slide: &Slide) -> Self {
        Self {
            id: slide.id.clone(),
            title: slide.name().to_string(),
            thumb_url: slide.thumb_url.clone().unwrap_or_default(),
            description: slide.description().to_string(),
            tags: slide.tags().join(" • "),
        }
    }
}

pub fn cards(slides: &[Slide]) -> Vec<SlideCard> {
    slides.iter().map(SlideCard::from).collect()
}

#[derive(Template)]
#[template(path = "cards.html")]
struct CardsTemplate<'a> {
    cards: &'a [SlideCard],
}

/// HTML for the result list. Values are escaped by the template engine.
pub fn render_markup(cards: &[SlideCard]) -> String {
    match (CardsTemplate { cards }).render() {
        Ok(html) => html,
        Err(err) => {
            tracing::error!(%err, "failed to render slide cards");
            String::new()
        }
    }
}
