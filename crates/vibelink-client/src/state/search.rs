use vibelink_shared::models::SearchResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub is_open: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    QueryChanged(String),
    Pending,
    Results(Vec<SearchResult>),
    Cleared,
    Closed,
    Failed(String),
}

pub fn reduce(state: &mut SearchState, action: SearchAction) {
    match action {
        SearchAction::QueryChanged(q) => {
            state.is_open = !q.trim().is_empty();
            state.query = q;
        }
        SearchAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        SearchAction::Results(results) => {
            state.is_loading = false;
            state.results = results;
        }
        SearchAction::Cleared => {
            state.is_loading = false;
            state.results.clear();
        }
        SearchAction::Closed => {
            state.is_open = false;
        }
        SearchAction::Failed(message) => {
            state.is_loading = false;
            state.error = Some(message);
        }
    }
}
