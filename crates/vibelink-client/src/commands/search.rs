use vibelink_shared::error::ApiError;

use crate::api;
use crate::state::{Action, SearchAction};
use crate::Client;

impl Client {
    /// Search-as-you-type. Call on every keystroke: only the last call in a
    /// quiet period issues a request. Returns whether this call did.
    pub async fn search(&self, query: &str) -> Result<bool, ApiError> {
        self.store
            .dispatch(Action::Search(SearchAction::QueryChanged(query.to_string())));

        let term = query.trim();
        if term.is_empty() {
            self.search_debounce.supersede();
            self.store.dispatch(Action::Search(SearchAction::Cleared));
            return Ok(false);
        }

        if !self.search_debounce.settle().await {
            return Ok(false);
        }

        self.store.dispatch(Action::Search(SearchAction::Pending));
        tracing::debug!(query = term, "searching");
        let results = api::search::search(&self.session, term)
            .await
            .map_err(|e| self.fail(e, |m| Action::Search(SearchAction::Failed(m))))?;
        self.store
            .dispatch(Action::Search(SearchAction::Results(results)));
        Ok(true)
    }

    pub fn close_search(&self) {
        self.store.dispatch(Action::Search(SearchAction::Closed));
    }

    pub fn clear_search(&self) {
        self.search_debounce.supersede();
        self.store
            .dispatch(Action::Search(SearchAction::QueryChanged(String::new())));
        self.store.dispatch(Action::Search(SearchAction::Cleared));
    }
}
