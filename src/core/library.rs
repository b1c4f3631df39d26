use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    NotFound {
        message: String,
    },
    DuplicateKey {
        message: String,
    },
    // removal attempted while the book is checked out
    ItemOnLoan {
        message: String,
    },
    AlreadyOnLoan {
        message: String,
    },
    NotOnLoan {
        message: String,
    },
    NotHolder {
        message: String,
    },
    InvalidDuration {
        message: String,
    },
    DuplicatePending {
        message: String,
    },
    RequestNotPending {
        message: String,
    },
    InvalidCredentials {
        message: String,
    },
    Forbidden {
        message: String,
    },
    // The durable commit failed. rolled_back tells the caller whether the
    // in-memory mutation was undone so that memory and storage still agree.
    Persistence {
        message: String,
        rolled_back: bool,
    },
}

impl LibraryError {
    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn item_on_loan(message: &str) -> LibraryError {
        LibraryError::ItemOnLoan { message: message.to_string() }
    }

    pub fn already_on_loan(message: &str) -> LibraryError {
        LibraryError::AlreadyOnLoan { message: message.to_string() }
    }

    pub fn not_on_loan(message: &str) -> LibraryError {
        LibraryError::NotOnLoan { message: message.to_string() }
    }

    pub fn not_holder(message: &str) -> LibraryError {
        LibraryError::NotHolder { message: message.to_string() }
    }

    pub fn invalid_duration(message: &str) -> LibraryError {
        LibraryError::InvalidDuration { message: message.to_string() }
    }

    pub fn duplicate_pending(message: &str) -> LibraryError {
        LibraryError::DuplicatePending { message: message.to_string() }
    }

    pub fn request_not_pending(message: &str) -> LibraryError {
        LibraryError::RequestNotPending { message: message.to_string() }
    }

    pub fn invalid_credentials(message: &str) -> LibraryError {
        LibraryError::InvalidCredentials { message: message.to_string() }
    }

    pub fn forbidden(message: &str) -> LibraryError {
        LibraryError::Forbidden { message: message.to_string() }
    }

    pub fn persistence(message: &str, rolled_back: bool) -> LibraryError {
        LibraryError::Persistence { message: message.to_string(), rolled_back }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::persistence(
            format!("snapshot io {:?}", err).as_str(), false)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::persistence(
            format!("snapshot json parsing {:?}", err).as_str(), false)
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::ItemOnLoan { message } => {
                write!(f, "{}", message)
            }
            LibraryError::AlreadyOnLoan { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotOnLoan { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotHolder { message } => {
                write!(f, "{}", message)
            }
            LibraryError::InvalidDuration { message } => {
                write!(f, "{}", message)
            }
            LibraryError::DuplicatePending { message } => {
                write!(f, "{}", message)
            }
            LibraryError::RequestNotPending { message } => {
                write!(f, "{}", message)
            }
            LibraryError::InvalidCredentials { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Forbidden { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Persistence { message, rolled_back } => {
                write!(f, "{} rolled_back={}", message, rolled_back)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the library engine.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    // Approved and Rejected are terminal, a request never leaves them.
    pub fn is_terminal(&self) -> bool {
        *self != RequestStatus::Pending
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => RequestStatus::Pending,
            "Approved" => RequestStatus::Approved,
            "Rejected" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Curator,
    Requester,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Administrator" => Role::Administrator,
            "Curator" => Role::Curator,
            "Requester" => Role::Requester,
            _ => Role::Requester,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "Administrator"),
            Role::Curator => write!(f, "Curator"),
            Role::Requester => write!(f, "Requester"),
        }
    }
}
