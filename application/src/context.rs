//! [`Context`]-related definitions.

use std::sync::{
    atomic::{self, AtomicU16},
    Arc,
};

use axum::{async_trait, extract::FromRequestParts};
use juniper::{http as gql, IntoFieldError as _};
use service::domain::{session, Session};

use crate::{define_error, AsError, Error, GraphQLResponse, Service};

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`session::Slot`] holding the live [`Session`].
    sessions: Arc<session::Slot>,

    /// Error status code.
    error_status_code: AtomicU16,
}

impl Context {
    /// Creates a new [`Context`] of a single request.
    #[must_use]
    pub fn new(service: Service, sessions: Arc<session::Slot>) -> Self {
        Self {
            service,
            sessions,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
        }
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Returns the live [`Session`].
    ///
    /// # Errors
    ///
    /// Errors if no [`Session`] has been established yet.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.sessions
            .current()
            .await
            .ok_or_else(|| SessionError::NoSession.into())
            .map_err(self.error())
    }

    /// Ensures the live [`Session`] (if any) can be replaced, so a new one
    /// may be established.
    ///
    /// # Errors
    ///
    /// Errors if the live [`Session`] has a transaction in flight.
    pub async fn ensure_session_replaceable(&self) -> Result<(), Error> {
        self.sessions
            .ensure_idle()
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }

    /// Makes the provided [`Session`] the live one.
    ///
    /// # Errors
    ///
    /// Errors if the live [`Session`] has got a transaction in flight in the
    /// meantime.
    pub async fn set_current_session(
        &self,
        session: Session,
    ) -> Result<(), Error> {
        let id = session.id;
        let replaced = self
            .sessions
            .replace(session)
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())?;
        match replaced {
            Some(old) => tracing::info!(
                "`Session({})` is replaced with `Session({id})`",
                old.id,
            ),
            None => tracing::info!("`Session({id})` is established"),
        }
        Ok(())
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = GraphQLResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let missing = |what: &str| GraphQLResponse {
            error_status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            body: gql::GraphQLBatchResponse::Single(
                gql::GraphQLResponse::error(
                    Error::internal(&format!("missing `{what}` extension"))
                        .into_field_error(),
                ),
            ),
        };

        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| missing("Service"))?;
        let sessions = parts
            .extensions
            .get::<Arc<session::Slot>>()
            .cloned()
            .ok_or_else(|| missing("Slot"))?;

        Ok(Self::new(service, sessions))
    }
}

impl AsError for session::Busy {
    fn try_as_error(&self) -> Option<Error> {
        Some(SessionError::Busy.into())
    }
}

define_error! {
    enum SessionError {
        #[code = "NO_SESSION"]
        #[status = UNAUTHORIZED]
        #[message = "No wallet session is established"]
        NoSession,

        #[code = "SESSION_BUSY"]
        #[status = CONFLICT]
        #[message = "Live wallet session has a transaction in flight"]
        Busy,
    }
}
