//! Human review feedback on task results.

use super::TaskDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reviewer rating in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RatingOutOfRange`] when the value is outside
    /// `[1, 5]`.
    pub const fn new(value: u8) -> Result<Self, TaskDomainError> {
        if value >= 1 && value <= 5 {
            Ok(Self(value))
        } else {
            Err(TaskDomainError::RatingOutOfRange(value))
        }
    }

    /// Returns the underlying rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = TaskDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Review verdict submitted by a human for a task result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    /// Whether the reviewer accepted the result.
    pub was_approved: bool,
    /// Correction instructions for a rejected result.
    pub correction: Option<String>,
    /// Optional quality rating.
    pub rating: Option<Rating>,
    /// Identifier of the reviewer.
    pub reviewer_id: Option<String>,
}

impl FeedbackSubmission {
    /// Creates an approval.
    #[must_use]
    pub const fn approve() -> Self {
        Self {
            was_approved: true,
            correction: None,
            rating: None,
            reviewer_id: None,
        }
    }

    /// Creates a rejection without correction text.
    #[must_use]
    pub const fn reject() -> Self {
        Self {
            was_approved: false,
            correction: None,
            rating: None,
            reviewer_id: None,
        }
    }

    /// Sets correction instructions.
    #[must_use]
    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    /// Sets the rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the reviewer identifier.
    #[must_use]
    pub fn with_reviewer(mut self, reviewer_id: impl Into<String>) -> Self {
        self.reviewer_id = Some(reviewer_id.into());
        self
    }
}

/// Feedback stamped onto a task after review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanFeedback {
    /// Whether the reviewer accepted the result.
    pub was_approved: bool,
    /// Correction instructions for a rejected result.
    pub correction: Option<String>,
    /// Optional quality rating.
    pub rating: Option<Rating>,
    /// Identifier of the reviewer.
    pub reviewer_id: Option<String>,
    /// When the review was recorded.
    pub reviewed_at: DateTime<Utc>,
}

impl HumanFeedback {
    /// Stamps a submission with its review time.
    #[must_use]
    pub fn from_submission(submission: FeedbackSubmission, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            was_approved: submission.was_approved,
            correction: submission.correction,
            rating: submission.rating,
            reviewer_id: submission.reviewer_id,
            reviewed_at,
        }
    }
}
