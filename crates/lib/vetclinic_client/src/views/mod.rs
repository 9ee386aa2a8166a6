//! View-models for list screens and the booking form.
//!
//! Screens never see an `Err` for ordinary failures: the error is turned
//! into a [`Notice`] and the view stays usable. Only an expired session is
//! handed back so the composition root can navigate.

pub mod booking;

use std::future::Future;

use crate::error::{ApiError, ApiResult};

pub use booking::BookingController;

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Record a failure as a notice; only an expired session propagates.
pub(crate) fn report(notice: &mut Option<Notice>, err: ApiError) -> ApiResult<()> {
    *notice = Some(Notice::Error(err.user_message()));
    if err.is_unauthenticated() {
        Err(err)
    } else {
        Ok(())
    }
}

/// Items of one resource plus load state.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    loading: bool,
    notice: Option<Notice>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            notice: None,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Replace the items with the result of `fetch`. On failure the
    /// previous items stay and an error notice is set.
    pub async fn load(&mut self, fetch: impl Future<Output = ApiResult<Vec<T>>>) -> ApiResult<()> {
        self.loading = true;
        let result = fetch.await;
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => report(&mut self.notice, e),
        }
    }

    /// Run a create/update/delete. Returns whether it succeeded; callers
    /// reload afterwards.
    pub async fn mutate<R>(
        &mut self,
        action: impl Future<Output = ApiResult<R>>,
        success: &str,
    ) -> ApiResult<bool> {
        match action.await {
            Ok(_) => {
                self.notice = Some(Notice::Success(success.to_string()));
                Ok(true)
            }
            Err(e) => report(&mut self.notice, e).map(|()| false),
        }
    }

    /// Run a delete and drop the matching items locally on success.
    pub async fn remove(
        &mut self,
        delete: impl Future<Output = ApiResult<()>>,
        matches: impl Fn(&T) -> bool,
        success: &str,
    ) -> ApiResult<bool> {
        let removed = self.mutate(delete, success).await?;
        if removed {
            self.items.retain(|item| !matches(item));
        }
        Ok(removed)
    }
}
