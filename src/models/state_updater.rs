use crate::cards::view::CardsView;

pub trait StateUpdater: StateUpdaterFunctions + std::fmt::Debug + Send + Sync {}

pub trait StateUpdaterFunctions {
    /// Called after every transition of the cards view, with the view as it is now.
    fn update_cards(&self, cards: &CardsView) -> anyhow::Result<()>;
}
