use serde::Deserialize;

use crate::entities::movie;

/// A movie in the personal list.
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub poster_url: String,
}

impl From<movie::Model> for Movie {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            year: model.year,
            description: model.description,
            rating: model.rating,
            review: model.review,
            poster_url: model.poster_url,
        }
    }
}

/// Fields needed to add a catalog title to the list. Rating and review start unset.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub poster_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingUpdate {
    pub rating: f64,
    pub review: Option<String>,
}

/// A movie with its position in the list; rank 1 is the best rated.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedMovie {
    pub rank: usize,
    pub movie: Movie,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Raw rating/review input as submitted by the edit form.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

impl EditForm {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
            review: movie.review.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<RatingUpdate, FieldError> {
        let raw = self.rating.trim();
        if raw.is_empty() {
            return Err(FieldError { field: "rating", message: "Rating is required".to_string() });
        }

        let rating = raw.parse::<f64>().ok().filter(|r| r.is_finite()).ok_or_else(|| {
            FieldError {
                field: "rating",
                message: format!("\"{raw}\" is not a number, try something like 7.5"),
            }
        })?;

        let review = self.review.trim();
        Ok(RatingUpdate {
            rating,
            review: (!review.is_empty()).then(|| review.to_string()),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub title: String,
}
