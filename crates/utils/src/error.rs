use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumIter};

#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, EnumIter, Hash)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-rs", ts(export))]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ProcuraErrorType {
  NotLoggedIn,
  NotAnAdmin,
  NotAllowed,
  NotFound,
  /// The definition code has no active version, so no instance can be created
  /// from it.
  DefinitionNotActive,
  /// An assignee spec resolved to zero user ids. Fatal to the operation that
  /// triggered the resolution.
  NoApproversFound,
  /// A terminal step or instance was asked to transition again.
  InvalidTransition,
  /// Another transaction committed the same case code first. Retryable: the
  /// caller re-runs generation + insert from scratch.
  DuplicateCaseCode,
  EmptyWorkflowDefinition,
  WorkflowDefinitionAlreadyExists,
  TooManyWorkflowSteps,
  CouldntCreateWorkflowDefinition,
  CouldntCreateWorkflowInstance,
  CouldntUpdateWorkflowInstance,
  CouldntCreateStepInstance,
  CouldntUpdateStepInstance,
  CouldntCreateCase,
  CouldntCreateNotification,
  CouldntUpdateNotification,
  RoleNotFound,
  UserNotFound,
  InvalidField(String),
  DatabaseError,
  Unknown(String),
}

cfg_if! {
  if #[cfg(feature = "full")] {

    use std::{fmt, backtrace::Backtrace};
    pub type ProcuraResult<T> = Result<T, ProcuraError>;

    pub struct ProcuraError {
      pub error_type: ProcuraErrorType,
      pub inner: anyhow::Error,
      pub context: Backtrace,
    }

    impl ProcuraError {
      /// Whether the caller may safely re-run the whole failed operation.
      /// Everything except a lost case-code race is terminal.
      pub fn is_retryable(&self) -> bool {
        self.error_type == ProcuraErrorType::DuplicateCaseCode
      }
    }

    impl<T> From<T> for ProcuraError
    where
      T: Into<anyhow::Error>,
    {
      fn from(t: T) -> Self {
        let cause = t.into();
        let error_type = match cause.downcast_ref::<diesel::result::Error>() {
          Some(&diesel::NotFound) => ProcuraErrorType::NotFound,
          Some(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            info,
          )) if info.constraint_name() == Some("procurement_case_case_code_key") => {
            ProcuraErrorType::DuplicateCaseCode
          }
          _ => ProcuraErrorType::Unknown(format!("{}", &cause)),
        };
        ProcuraError {
          error_type,
          inner: cause,
          context: Backtrace::capture(),
        }
      }
    }

    impl Debug for ProcuraError {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcuraError")
         .field("message", &self.error_type)
         .field("inner", &self.inner)
         .field("context", &self.context)
         .finish()
      }
    }

    impl fmt::Display for ProcuraError {
      fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{}", self.inner)?;
        fmt::Display::fmt(&self.context, f)
      }
    }

    impl actix_web::error::ResponseError for ProcuraError {
      fn status_code(&self) -> actix_web::http::StatusCode {
        match self.error_type {
          ProcuraErrorType::NotLoggedIn => actix_web::http::StatusCode::UNAUTHORIZED,
          ProcuraErrorType::NotAnAdmin | ProcuraErrorType::NotAllowed => {
            actix_web::http::StatusCode::FORBIDDEN
          }
          ProcuraErrorType::NotFound => actix_web::http::StatusCode::NOT_FOUND,
          ProcuraErrorType::DuplicateCaseCode => actix_web::http::StatusCode::CONFLICT,
          _ => actix_web::http::StatusCode::BAD_REQUEST,
        }
      }

      fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(&self.error_type)
      }
    }

    impl From<ProcuraErrorType> for ProcuraError {
      fn from(error_type: ProcuraErrorType) -> Self {
        let inner = anyhow::anyhow!("{}", error_type);
        ProcuraError {
          error_type,
          inner,
          context: Backtrace::capture(),
        }
      }
    }

    pub trait ProcuraErrorExt<T, E: Into<anyhow::Error>> {
      fn with_procura_type(self, error_type: ProcuraErrorType) -> ProcuraResult<T>;
    }

    impl<T, E: Into<anyhow::Error>> ProcuraErrorExt<T, E> for Result<T, E> {
      fn with_procura_type(self, error_type: ProcuraErrorType) -> ProcuraResult<T> {
        self.map_err(|error| ProcuraError {
          error_type,
          inner: error.into(),
          context: Backtrace::capture(),
        })
      }
    }

    pub trait ProcuraErrorExt2<T> {
      fn with_procura_type(self, error_type: ProcuraErrorType) -> ProcuraResult<T>;
      fn into_anyhow(self) -> Result<T, anyhow::Error>;
    }

    impl<T> ProcuraErrorExt2<T> for ProcuraResult<T> {
      fn with_procura_type(self, error_type: ProcuraErrorType) -> ProcuraResult<T> {
        self.map_err(|mut e| {
          e.error_type = error_type;
          e
        })
      }
      // this function can't be an impl From or similar because it would conflict with one of the
      // other broad Into<> implementations
      fn into_anyhow(self) -> Result<T, anyhow::Error> {
        self.map_err(|e| e.inner)
      }
    }

  }
}
