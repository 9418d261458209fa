//! Offset/limit pagination over list endpoints
//!
//! A [`Paginator`] owns one list request and a cursor. Each successful page
//! advances the offset by the page size; once the offset reaches the total
//! count declared by the server the paginator is exhausted and refuses to
//! fetch again.

use super::client::ApiClient;
use super::decode::ListResponse;
use super::error::{ApiError, ApiResult};
use super::query::{LIMIT_PARAM, OFFSET_PARAM};
use super::request::Request;
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Page size and starting offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorOptions {
    pub limit: u32,
    pub offset: u64,
}

impl PaginatorOptions {
    pub fn new(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// Sequential page fetcher for one list request
pub struct Paginator<T> {
    client: ApiClient,
    request: Request<(), ListResponse<T>>,
    limit: u32,
    offset: u64,
    last_page: bool,
}

impl<T: DeserializeOwned> Paginator<T> {
    /// Fails with [`ApiError::InvalidLimit`] when `options.limit` is zero
    pub fn new(
        client: &ApiClient,
        request: Request<(), ListResponse<T>>,
        options: PaginatorOptions,
    ) -> ApiResult<Self> {
        if options.limit == 0 {
            return Err(ApiError::InvalidLimit);
        }

        Ok(Self {
            client: client.clone(),
            request,
            limit: options.limit,
            offset: options.offset,
            last_page: false,
        })
    }

    /// True once the last page has been returned
    pub fn is_last_page(&self) -> bool {
        self.last_page
    }

    /// Offset the next page will be requested at
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetch the next page
    pub async fn next_page(&mut self) -> ApiResult<ListResponse<T>> {
        self.next_page_with_cancel(&CancellationToken::new()).await
    }

    pub async fn next_page_with_cancel(
        &mut self,
        cancel: &CancellationToken,
    ) -> ApiResult<ListResponse<T>> {
        if self.last_page {
            return Err(ApiError::NoMorePages);
        }

        let page_request = self
            .request
            .clone()
            .with_query_param(LIMIT_PARAM, self.limit)
            .with_query_param(OFFSET_PARAM, self.offset);

        let page = page_request.send_with_cancel(&self.client, cancel).await?;

        self.offset = self.offset.saturating_add(u64::from(self.limit));
        if page.count <= self.offset {
            self.last_page = true;
        }
        tracing::debug!(
            "{}: fetched {} of {} items, next offset {}{}",
            self.request.path(),
            page.results.len(),
            page.count,
            self.offset,
            if self.last_page { " (last page)" } else { "" }
        );

        Ok(page)
    }

    /// Stream of the remaining pages, ending after the last one
    pub fn into_stream(self) -> impl Stream<Item = ApiResult<ListResponse<T>>> {
        self.into_stream_with_cancel(CancellationToken::new())
    }

    /// Like [`Paginator::into_stream`]; cancelling `cancel` ends the stream
    /// with [`ApiError::Cancelled`]
    pub fn into_stream_with_cancel(
        self,
        cancel: CancellationToken,
    ) -> impl Stream<Item = ApiResult<ListResponse<T>>> {
        stream::try_unfold((self, cancel), |(mut paginator, cancel)| async move {
            if paginator.is_last_page() {
                return Ok::<_, ApiError>(None);
            }
            let page = paginator.next_page_with_cancel(&cancel).await?;
            Ok(Some((page, (paginator, cancel))))
        })
    }

    /// Fetch every remaining page and concatenate the items
    pub async fn collect_all(self) -> ApiResult<Vec<T>> {
        self.collect_all_with_cancel(CancellationToken::new()).await
    }

    pub async fn collect_all_with_cancel(self, cancel: CancellationToken) -> ApiResult<Vec<T>> {
        self.into_stream_with_cancel(cancel)
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page.results);
                Ok::<_, ApiError>(items)
            })
            .await
    }
}
