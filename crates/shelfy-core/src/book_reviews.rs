// ── Book review page ──
//
// A single book with its reviews and an inline "add review" box. The
// book and its reviews load together; a posted review triggers a refetch
// of the review list only.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::Context;
use crate::error::CoreError;
use crate::list::LoadState;
use crate::model::{Book, EntityId, Review};
use crate::resource::{Draft, Resource, ReviewDraft, Reviews};

const LOAD_FAILED: &str = "Failed to load book";
const REVIEWS_FAILED: &str = "Failed to load reviews";

pub struct BookReviewPage {
    ctx: Context,
    book_id: EntityId,
    book: Option<Book>,
    reviews: Vec<Review>,
    state: LoadState,
    draft: ReviewDraft,
    submitting: bool,
    error: Option<String>,
    lifetime: CancellationToken,
}

impl BookReviewPage {
    pub fn new(ctx: Context, book_id: EntityId) -> Self {
        Self {
            ctx,
            book_id,
            book: None,
            reviews: Vec::new(),
            state: LoadState::Idle,
            draft: ReviewDraft::for_book(book_id),
            submitting: false,
            error: None,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn book_id(&self) -> EntityId {
        self.book_id
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline error from the last failed post.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_review_text(&mut self, text: &str) {
        text.clone_into(&mut self.draft.ulasan);
    }

    /// Fetch the book and its reviews concurrently.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(err) => {
                self.state = LoadState::Failed {
                    message: err.to_string(),
                };
                return Err(err);
            }
        };
        self.state = LoadState::Loading;

        let api = self.ctx.api();
        let id = self.book_id.get();
        let fetch = async {
            tokio::try_join!(
                api.get_book(&token, id),
                api.list_book_reviews(&token, id, None),
            )
            .map_err(CoreError::from)
        };
        let result = tokio::select! {
            biased;
            () = self.lifetime.cancelled() => Err(CoreError::Cancelled),
            result = fetch => result,
        };

        match result {
            Ok((book, reviews)) => {
                self.book = Some(Book::from(book));
                self.reviews = reviews.into_iter().map(Review::from).collect();
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(err) => {
                warn!(book = %self.book_id, error = %err, "book page load failed");
                self.state = LoadState::Failed {
                    message: err.user_message(LOAD_FAILED),
                };
                Err(err)
            }
        }
    }

    /// Post the draft review, then refetch this book's reviews. A failed
    /// refetch keeps the old list and marks `state` failed; the post
    /// itself still counts as saved.
    pub async fn add_review(&mut self) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::InProgress {
                operation: "posting review".into(),
            });
        }
        if let Err(err) = self.draft.validate() {
            self.error = Some(err.user_message(Reviews::SAVE_FAILED));
            return Err(err);
        }
        let token = self.ctx.token()?;

        self.submitting = true;
        self.error = None;
        let api = self.ctx.api();
        let posted = tokio::select! {
            biased;
            () = self.lifetime.cancelled() => Err(CoreError::Cancelled),
            result = Reviews::create(api, &token, &self.draft) => result,
        };
        self.submitting = false;

        if let Err(err) = posted {
            warn!(book = %self.book_id, error = %err, "posting review failed");
            self.error = Some(err.user_message(Reviews::SAVE_FAILED));
            return Err(err);
        }
        info!(book = %self.book_id, "review posted");
        self.draft = ReviewDraft::for_book(self.book_id);

        // The review is saved; a failed refetch only leaves the list stale.
        let id = self.book_id.get();
        let refetched = tokio::select! {
            biased;
            () = self.lifetime.cancelled() => Err(CoreError::Cancelled),
            result = api.list_book_reviews(&token, id, None) => result.map_err(CoreError::from),
        };
        match refetched {
            Ok(reviews) => {
                self.reviews = reviews.into_iter().map(Review::from).collect();
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(book = %self.book_id, error = %err, "review refetch failed");
                self.state = LoadState::Failed {
                    message: err.user_message(REVIEWS_FAILED),
                };
            }
        }
        Ok(())
    }

    pub fn dispose(&self) {
        self.lifetime.cancel();
    }
}

impl Drop for BookReviewPage {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
