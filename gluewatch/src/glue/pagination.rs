use std::future::Future;

/// One page of a token-paginated Glue listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// Fetch pages until the continuation token is exhausted, concatenating items in the order
/// they were returned. The first request carries no token. An empty token ends the listing
/// the same as an absent one.
pub async fn drain_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut next_token = None;
    let mut nr_pages = 0_usize;

    loop {
        let page = fetch_page(next_token.take()).await?;
        nr_pages += 1;
        items.extend(page.items);

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(%nr_pages, nr_items=%items.len(), "drained paginated listing");
    Ok(items)
}
