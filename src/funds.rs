use once_cell::sync::Lazy;

use crate::error::FundListError;

static BUNDLED_FUNDS: Lazy<Vec<String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/mutual_funds.json")).unwrap_or_else(|e| {
        tracing::error!("Bundled fund list is malformed: {e}");
        Vec::new()
    })
});

/// Known fund names offered as suggestions by the form.
pub fn bundled_funds() -> &'static [String] {
    &BUNDLED_FUNDS
}

/// Read a JSON array of fund names from `path`.
pub fn load_fund_list(path: &str) -> Result<Vec<String>, FundListError> {
    let data = std::fs::read_to_string(path).map_err(|source| FundListError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str::<Vec<String>>(&data).map_err(|source| FundListError::Format {
        path: path.to_string(),
        source,
    })
}

/// Names that contain `query`, ignoring case, in list order.
///
/// An empty query matches nothing: the caller hides the suggestion list.
pub fn filter_candidates<'a>(query: &str, names: &'a [String]) -> Vec<&'a str> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
