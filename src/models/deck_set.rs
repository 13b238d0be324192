//! Container for all available decks
use super::Deck;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct DeckSet {
    pub decks: Vec<Arc<Deck>>,
}

impl DeckSet {
    pub fn new(decks: Vec<Deck>) -> Self {
        Self {
            decks: decks.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Deck>> {
        self.decks.iter().find(|deck| deck.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Adds a deck, replacing any loaded deck with the same id.
    pub fn upsert(&mut self, deck: Deck) {
        let deck = Arc::new(deck);
        match self.decks.iter_mut().find(|d| d.id == deck.id) {
            Some(slot) => *slot = deck,
            None => self.decks.push(deck),
        }
    }
}
