use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};

use crate::error::ApiError;

/// `Form<T>` whose rejection is an [`ApiError::BadRequest`] with the usual JSON body.
#[derive(Debug)]
pub struct ValidForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidForm<T>
where
    Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected form: {}", rejection.body_text());
                Err(ApiError::bad_request(rejection.body_text()))
            }
        }
    }
}
