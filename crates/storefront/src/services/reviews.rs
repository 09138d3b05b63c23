//! Reviews service: testimonials and new customer reviews.

use thiserror::Error;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::models::review::{MAX_RATING, MIN_RATING};
use crate::models::{Review, Session, Testimonials};
use crate::notify::Notifier;
use crate::services::surface;

const ADD_FAILED: &str = "Failed to add review";

/// Review input errors. Display text is shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Please select a rating")]
    MissingRating,

    #[error("Rating must be between {MIN_RATING} and {MAX_RATING}")]
    RatingOutOfRange(u8),

    #[error("Please write a comment")]
    EmptyComment,
}

/// Check a review before it is sent. A rating of zero means none was picked.
///
/// # Errors
///
/// Returns the first problem found: rating, then comment.
pub fn validate_review(rating: u8, comment: &str) -> Result<(), ReviewError> {
    if rating == 0 {
        return Err(ReviewError::MissingRating);
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ReviewError::RatingOutOfRange(rating));
    }
    if comment.trim().is_empty() {
        return Err(ReviewError::EmptyComment);
    }
    Ok(())
}

pub struct ReviewService<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    session: &'a Session,
    testimonials: &'a mut Testimonials,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub fn new(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        session: &'a Session,
        testimonials: &'a mut Testimonials,
    ) -> Self {
        Self {
            api,
            notifier,
            session,
            testimonials,
        }
    }

    /// Reviews as last loaded.
    #[must_use]
    pub fn testimonials(&self) -> &Testimonials {
        self.testimonials
    }

    /// Load every review.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; previous reviews are kept.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&Testimonials, StorefrontError> {
        let reviews = self
            .api
            .list_reviews()
            .await
            .map_err(|e| surface(self.notifier, e, "Failed to load reviews"))?;

        self.testimonials.replace(reviews);
        Ok(self.testimonials)
    }

    /// Post a review as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the user is signed out, or
    /// the backend refuses.
    #[instrument(skip(self, comment))]
    pub async fn add(&mut self, rating: u8, comment: &str) -> Result<Review, StorefrontError> {
        if let Err(e) = validate_review(rating, comment) {
            return Err(surface(self.notifier, e, ADD_FAILED));
        }

        let session = self.session;
        let token = session
            .token()
            .map_err(|e| surface(self.notifier, e, ADD_FAILED))?;

        let review = self
            .api
            .add_review(token, rating, comment.trim())
            .await
            .map_err(|e| surface(self.notifier, e, ADD_FAILED))?;

        self.testimonials.push_front(review.clone());
        self.notifier.success("Thank you for your review!");
        Ok(review)
    }
}
