//! Customer reviews shown as testimonials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hawk_leather_core::pagination::TESTIMONIALS_PER_PAGE;
use hawk_leather_core::{Page, Paginator, ReviewId, UserId};

/// Lowest accepted star rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted star rating.
pub const MAX_RATING: u8 = 5;

/// A review with its author's display details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author_id: Option<UserId>,
    pub author_name: String,
    pub author_occupation: String,
    pub initials: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Reviews as last fetched.
#[derive(Debug, Clone, Default)]
pub struct Testimonials {
    reviews: Vec<Review>,
}

impl Testimonials {
    /// All fetched reviews.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// A page of reviews, nine per page.
    #[must_use]
    pub fn page(&self, page: usize) -> Page<'_, Review> {
        Paginator::new(TESTIMONIALS_PER_PAGE).page(&self.reviews, page)
    }

    /// Mean rating, or `None` when there are no reviews.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // review counts never approach f64 precision
        Some(f64::from(sum) / self.reviews.len() as f64)
    }

    pub(crate) fn replace(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    pub(crate) fn push_front(&mut self, review: Review) {
        self.reviews.insert(0, review);
    }
}
